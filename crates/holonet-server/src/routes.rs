//! Static route table and shared handler state.

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use holonet_graph::CharacterStore;

use crate::error::ApiError;
use crate::handlers;
use crate::keepalive::{HealthMonitor, HealthSnapshot, HealthState};

/// State injected into every handler.
///
/// Built once at start-up; the store is the only path to the database.
#[derive(Clone)]
pub struct AppState<S> {
    pub store: S,
    pub health: HealthMonitor,
}

impl<S: CharacterStore> AppState<S> {
    pub fn new(store: S, health: HealthMonitor) -> Self {
        Self { store, health }
    }
}

/// Build the router.
///
/// A client that disconnects mid-request drops the handler future and,
/// with it, the in-flight database call.
pub fn router<S: CharacterStore>(state: AppState<S>) -> Router {
    let chars = Router::new()
        .route(
            "/",
            get(handlers::list_characters::<S>).post(handlers::create_character::<S>),
        )
        .route(
            "/{name}",
            get(handlers::get_character::<S>)
                .patch(handlers::update_character::<S>)
                .delete(handlers::delete_character::<S>),
        );

    Router::new()
        .route("/", get(index))
        .route("/health", get(health::<S>))
        .nest("/chars", chars)
        .fallback(no_route)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `GET /` — a short description of the API.
async fn index() -> Json<serde_json::Value> {
    Json(json!({
        "service": "holonet",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            { "method": "POST", "path": "/chars", "description": "Create a character" },
            { "method": "GET", "path": "/chars", "description": "List all characters" },
            { "method": "GET", "path": "/chars/{name}", "description": "Get a character by name" },
            { "method": "PATCH", "path": "/chars/{name}", "description": "Update hair_color, height or birth_year" },
            { "method": "DELETE", "path": "/chars/{name}", "description": "Delete a character and its relationships" },
            { "method": "GET", "path": "/health", "description": "Database reachability" }
        ]
    }))
}

/// Unmatched paths get the same JSON error shape as every other failure.
async fn no_route(method: Method, uri: Uri) -> ApiError {
    ApiError::NoRoute(format!("{method} {}", uri.path()))
}

/// `GET /health` — 503 only once the store is considered unreachable.
async fn health<S: CharacterStore>(
    State(state): State<AppState<S>>,
) -> (StatusCode, Json<HealthSnapshot>) {
    let snapshot = state.health.snapshot();
    let status = match snapshot.state {
        HealthState::Unreachable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    };
    (status, Json(snapshot))
}
