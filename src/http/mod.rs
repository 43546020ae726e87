//! HTTP transport for the document store.
//!
//! Routes:
//! - `POST   /guardar_json/{tenant}` — append tasks (`{"datos": task | [task]}`)
//! - `GET    /leer_json/{tenant}` — full document
//! - `GET    /leer_categorias/{tenant}` — category list
//! - `POST   /agregar_categoria/{tenant}` — add category (`{"name": ...}`)
//! - `DELETE /eliminar_tarea/{tenant}/{task_id}` — delete tasks by id
//! - `DELETE /eliminar_categoria/{tenant}/{name}` — delete category by name
//! - `GET    /buscar_categoria/{tenant}/{name}` — tasks in a category
//! - `POST   /unir_archivos` — merge (`{"origen": ..., "destino": ...}`)
//! - `GET    /` and `GET /health` — liveness

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::Result;
use crate::storage::JsonStore;

pub use error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonStore>,
}

impl AppState {
    pub fn new(store: JsonStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Status body used by every mutating route and by errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub mensaje: String,
}

impl Message {
    pub fn new(mensaje: impl Into<String>) -> Self {
        Self {
            mensaje: mensaje.into(),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/health", get(handlers::health))
        .route("/guardar_json/{tenant}", post(handlers::save_tasks))
        .route("/leer_json/{tenant}", get(handlers::read_document))
        .route("/leer_categorias/{tenant}", get(handlers::read_categories))
        .route("/agregar_categoria/{tenant}", post(handlers::add_category))
        .route(
            "/eliminar_tarea/{tenant}/{task_id}",
            delete(handlers::delete_task),
        )
        .route(
            "/eliminar_categoria/{tenant}/{name}",
            delete(handlers::delete_category),
        )
        .route(
            "/buscar_categoria/{tenant}/{name}",
            get(handlers::search_category),
        )
        .route("/unir_archivos", post(handlers::merge_files))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Run the HTTP server until ctrl-c.
pub async fn serve(config: &ServerConfig) -> Result<()> {
    let store = JsonStore::open(&config.store)?;
    let app = router(AppState::new(store));

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        data_dir = %config.store.data_dir.display(),
        log_level = %config.log_level,
        "tareas server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("tareas server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
