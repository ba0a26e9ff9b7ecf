//! Character request handlers.
//!
//! Each handler makes exactly one store call, so it holds at most one
//! pooled database session for its lifetime. Path names are used
//! verbatim: case-sensitive, untrimmed.

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use holonet_core::{Character, CharacterPatch};
use holonet_graph::CharacterStore;

use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// `POST /chars`
pub async fn create_character<S: CharacterStore>(
    State(state): State<AppState<S>>,
    body: Result<Json<Character>, JsonRejection>,
) -> Result<(StatusCode, Json<Character>), ApiError> {
    let Json(character) = body?;
    let created = state.store.create(&character).await?;
    tracing::info!(name = %created.name, "Character created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /chars`
pub async fn list_characters<S: CharacterStore>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<Character>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

/// `GET /chars/{name}`
pub async fn get_character<S: CharacterStore>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
) -> Result<Json<Character>, ApiError> {
    Ok(Json(state.store.get(&name).await?))
}

/// `PATCH /chars/{name}`
pub async fn update_character<S: CharacterStore>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Character>, ApiError> {
    let patch = parse_patch(&body)?;
    let updated = state.store.update(&name, &patch).await?;
    tracing::info!(name = %updated.name, fields = patch.entries().len(), "Character updated");
    Ok(Json(updated))
}

/// `DELETE /chars/{name}`
pub async fn delete_character<S: CharacterStore>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete(&name).await?;
    tracing::info!(name = %name, "Character deleted");
    Ok(Json(MessageResponse {
        message: "Character deleted successfully".to_string(),
    }))
}

/// A missing or blank PATCH body is an empty patch, so the request still
/// reaches the name lookup. Anything else must be valid JSON.
fn parse_patch(body: &[u8]) -> Result<CharacterPatch, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CharacterPatch::default());
    }
    let Json(patch) = Json::<CharacterPatch>::from_bytes(body)?;
    Ok(patch)
}
