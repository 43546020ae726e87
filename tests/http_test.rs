use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tareas::http::{router, AppState};
use tareas::{JsonStore, StoreConfig};
use tempfile::TempDir;
use tower::ServiceExt;

fn app(tmp: &TempDir) -> Router {
    let store = JsonStore::open(&StoreConfig::new(tmp.path())).unwrap();
    router(AppState::new(store))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_home_and_health() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].as_str().unwrap().contains("funcionando"));

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_fresh_tenant_document() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    let (status, body) = send(&app, Method::GET, "/leer_json/nuevo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "tasks": [],
            "categories": [{"name": "General"}, {"name": "Trabajo"}, {"name": "Personal"}]
        })
    );
}

#[tokio::test]
async fn test_save_single_and_many_tasks() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    let (status, body) = send(
        &app,
        Method::POST,
        "/guardar_json/t1",
        Some(json!({"datos": {"id": "1", "title": "uno"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mensaje"], "Datos guardados en JSON");

    send(
        &app,
        Method::POST,
        "/guardar_json/t1",
        Some(json!({"datos": [{"id": "2"}, {"id": "3"}]})),
    )
    .await;

    let (_, body) = send(&app, Method::GET, "/leer_json/t1", None).await;
    let ids: Vec<&str> = body["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(body["tasks"][0]["title"], "uno");
}

#[tokio::test]
async fn test_save_invalid_payload_is_client_error() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    for datos in [json!("texto"), json!(42), json!([1, 2])] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/guardar_json/t1",
            Some(json!({"datos": datos})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["mensaje"].as_str().unwrap().contains("Invalid payload"));
    }

    let (status, _) = send(&app, Method::POST, "/guardar_json/t1", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, Method::GET, "/leer_json/t1", None).await;
    assert_eq!(body["tasks"], json!([]));
}

#[tokio::test]
async fn test_save_refuses_document_with_unexpected_shape() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);
    let path = tmp.path().join("t1.json");
    let raw = r#"{"tasks": {"id": 1, "title": "keep me"}}"#;
    std::fs::write(&path, raw).unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/guardar_json/t1",
        Some(json!({"datos": {"id": 2}})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["mensaje"].as_str().unwrap().contains("refusing to overwrite"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), raw);
}

#[tokio::test]
async fn test_invalid_tenant_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    let (status, _) = send(&app, Method::GET, "/leer_json/..", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/leer_json/a%2Fb", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_category_add_list_delete() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    let (status, body) = send(
        &app,
        Method::POST,
        "/agregar_categoria/t1",
        Some(json!({"name": "café"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mensaje"], "Categoría añadida exitosamente.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/agregar_categoria/t1",
        Some(json!({"name": "CAFE "})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mensaje"], "La categoría ya existe.");

    let (_, body) = send(&app, Method::POST, "/agregar_categoria/t1", Some(json!("ocio"))).await;
    assert_eq!(body["mensaje"], "Categoría añadida exitosamente.");

    let (_, body) = send(&app, Method::GET, "/leer_categorias/t1", None).await;
    assert_eq!(
        body,
        json!([
            {"name": "General"},
            {"name": "Trabajo"},
            {"name": "Personal"},
            {"name": "Café"},
            {"name": "Ocio"}
        ])
    );

    // Deletion is literal: the unaccented name leaves "Café" in place.
    let (status, body) = send(&app, Method::DELETE, "/eliminar_categoria/t1/cafe", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mensaje"], "Categoría eliminada exitosamente.");
    let (_, body) = send(&app, Method::GET, "/leer_categorias/t1", None).await;
    assert_eq!(body.as_array().unwrap().len(), 5);

    send(&app, Method::DELETE, "/eliminar_categoria/t1/Caf%C3%A9", None).await;
    let (_, body) = send(&app, Method::GET, "/leer_categorias/t1", None).await;
    assert!(!body.as_array().unwrap().contains(&json!({"name": "Café"})));
}

#[tokio::test]
async fn test_category_name_required() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    for payload in [json!({}), json!({"name": "   "}), json!(""), json!(7)] {
        let (status, body) = send(&app, Method::POST, "/agregar_categoria/t1", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["mensaje"], "La categoría es requerida.");
    }
}

#[tokio::test]
async fn test_delete_task_by_path_id() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    send(
        &app,
        Method::POST,
        "/guardar_json/t1",
        Some(json!({"datos": [{"id": "a"}, {"id": "b"}, {"id": 7}]})),
    )
    .await;

    let (status, body) = send(&app, Method::DELETE, "/eliminar_tarea/t1/a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mensaje"], "Tarea eliminada exitosamente.");

    // Numeric ids are not matched by a path segment.
    let (status, _) = send(&app, Method::DELETE, "/eliminar_tarea/t1/7", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/leer_json/t1", None).await;
    assert_eq!(body["tasks"], json!([{"id": "b"}, {"id": 7}]));
}

#[tokio::test]
async fn test_search_category() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    send(
        &app,
        Method::POST,
        "/guardar_json/t1",
        Some(json!({"datos": [
            {"id": 1, "category": "Trabajo"},
            {"id": 2},
            {"id": 3, "category": "Personal"}
        ]})),
    )
    .await;

    let (status, body) = send(&app, Method::GET, "/buscar_categoria/t1/Trabajo", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"tasks": [{"id": 1, "category": "Trabajo"}]}));

    let (_, body) = send(&app, Method::GET, "/buscar_categoria/t1/trabajo", None).await;
    assert_eq!(body, json!({"tasks": []}));
}

#[tokio::test]
async fn test_merge_files() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    send(
        &app,
        Method::POST,
        "/guardar_json/dest",
        Some(json!({"datos": {"id": 1, "x": "dest"}})),
    )
    .await;
    send(
        &app,
        Method::POST,
        "/guardar_json/src",
        Some(json!({"datos": [{"id": 1, "x": "src"}, {"id": 2}]})),
    )
    .await;
    send(&app, Method::POST, "/agregar_categoria/src", Some(json!({"name": "Ocio"}))).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/unir_archivos",
        Some(json!({"origen": "src", "destino": "dest"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let msg = body["mensaje"].as_str().unwrap();
    assert!(msg.contains("src") && msg.contains("dest"));

    let (_, body) = send(&app, Method::GET, "/leer_json/dest", None).await;
    assert_eq!(body["tasks"], json!([{"id": 1, "x": "src"}, {"id": 2}]));
    assert_eq!(
        body["categories"],
        json!([
            {"name": "General"},
            {"name": "Trabajo"},
            {"name": "Personal"},
            {"name": "Ocio"}
        ])
    );

    assert!(!tmp.path().join("src.json").exists());
    let (_, body) = send(&app, Method::GET, "/leer_json/src", None).await;
    assert_eq!(body["tasks"], json!([]));
}

#[tokio::test]
async fn test_merge_validation() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    let cases = [
        json!({}),
        json!({"origen": "a"}),
        json!({"destino": "b"}),
        json!({"origen": "", "destino": "b"}),
        json!({"origen": "a", "destino": "a"}),
        json!({"origen": "../a", "destino": "b"}),
    ];
    for body in cases {
        let (status, response) =
            send(&app, Method::POST, "/unir_archivos", Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert!(response["mensaje"].is_string());
    }

    // Nothing was created by the rejected requests.
    assert!(!tmp.path().join("a.json").exists());
    assert!(!tmp.path().join("b.json").exists());
}
