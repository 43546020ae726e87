use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiError, AppState, Message};
use crate::entity::{Category, Document, Task, TaskPayload, TenantId};
use crate::error::StoreError;
use crate::storage::outcome::TASKS_SAVED;

// ── Request / response bodies ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SaveTasksRequest {
    #[serde(default)]
    pub datos: Value,
}

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub origen: Option<String>,
    pub destino: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TasksResponse {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

fn parse_tenant(raw: &str) -> Result<TenantId, ApiError> {
    Ok(TenantId::parse(raw)?)
}

// ── Handlers ──────────────────────────────────────────────────────────────

pub async fn home() -> Json<Value> {
    Json(serde_json::json!({
        "message": "API funcionando correctamente",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn save_tasks(
    State(state): State<AppState>,
    Path(raw_tenant): Path<String>,
    Json(body): Json<SaveTasksRequest>,
) -> Result<Json<Message>, ApiError> {
    let tenant = parse_tenant(&raw_tenant)?;
    let payload = TaskPayload::from_value(body.datos)?;
    state.store.append_tasks(&tenant, payload)?;
    Ok(Json(Message::new(TASKS_SAVED)))
}

pub async fn read_document(
    State(state): State<AppState>,
    Path(raw_tenant): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let tenant = parse_tenant(&raw_tenant)?;
    Ok(Json(state.store.read(&tenant)))
}

pub async fn read_categories(
    State(state): State<AppState>,
    Path(raw_tenant): Path<String>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let tenant = parse_tenant(&raw_tenant)?;
    Ok(Json(state.store.list_categories(&tenant)))
}

/// Accepts `{"name": "..."}` or a bare JSON string.
pub async fn add_category(
    State(state): State<AppState>,
    Path(raw_tenant): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Message>, ApiError> {
    let tenant = parse_tenant(&raw_tenant)?;
    let name = match &body {
        Value::String(name) => Some(name.as_str()),
        Value::Object(fields) => fields.get("name").and_then(Value::as_str),
        _ => None,
    }
    .filter(|name| !name.trim().is_empty())
    .ok_or(ApiError::CategoryRequired)?;

    let outcome = state.store.add_category(&tenant, name)?;
    Ok(Json(Message::new(outcome.message())))
}

/// The path segment is compared as a JSON string, never coerced to a number.
pub async fn delete_task(
    State(state): State<AppState>,
    Path((raw_tenant, task_id)): Path<(String, String)>,
) -> Result<Json<Message>, ApiError> {
    let tenant = parse_tenant(&raw_tenant)?;
    let removal = state.store.delete_task(&tenant, &Value::String(task_id))?;
    Ok(Json(Message::new(removal.task_message())))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path((raw_tenant, name)): Path<(String, String)>,
) -> Result<Json<Message>, ApiError> {
    let tenant = parse_tenant(&raw_tenant)?;
    let removal = state.store.delete_category(&tenant, &name)?;
    Ok(Json(Message::new(removal.category_message())))
}

pub async fn search_category(
    State(state): State<AppState>,
    Path((raw_tenant, name)): Path<(String, String)>,
) -> Result<Json<TasksResponse>, ApiError> {
    let tenant = parse_tenant(&raw_tenant)?;
    Ok(Json(TasksResponse {
        tasks: state.store.tasks_by_category(&tenant, &name),
    }))
}

pub async fn merge_files(
    State(state): State<AppState>,
    Json(body): Json<MergeRequest>,
) -> Result<Json<Message>, ApiError> {
    let origen = body
        .origen
        .filter(|s| !s.is_empty())
        .ok_or(StoreError::MissingField("origen"))?;
    let destino = body
        .destino
        .filter(|s| !s.is_empty())
        .ok_or(StoreError::MissingField("destino"))?;
    if origen == destino {
        return Err(StoreError::SameTenant(origen).into());
    }

    let source = parse_tenant(&origen)?;
    let destination = parse_tenant(&destino)?;
    let report = state.store.merge_and_delete(&source, &destination)?;
    Ok(Json(Message::new(report.message())))
}
