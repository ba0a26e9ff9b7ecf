//! HTTP error mapping.
//!
//! Business outcomes reach the client with a specific status and message.
//! Every other fault is logged in full and reduced to an opaque 500.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use holonet_graph::GraphError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Character not found")]
    NotFound,

    #[error("No route for {0}")]
    NoRoute(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(#[source] GraphError),
}

/// JSON body for every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::NotFound { .. } => ApiError::NotFound,
            GraphError::ConstraintViolation { name, .. } => {
                ApiError::BadRequest(format!("A character named '{name}' already exists"))
            }
            other => ApiError::Internal(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound | ApiError::NoRoute(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(source) = &self {
            tracing::error!(error = %source, detail = ?source, "Internal server error");
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_errors_map_to_statuses() {
        let not_found: ApiError = GraphError::NotFound {
            label: "Character".into(),
            name: "Yoda".into(),
        }
        .into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Character not found");

        let dup: ApiError = GraphError::ConstraintViolation {
            label: "Character".into(),
            name: "Yoda".into(),
        }
        .into();
        assert_eq!(dup.status(), StatusCode::BAD_REQUEST);
        assert_eq!(dup.to_string(), "A character named 'Yoda' already exists");

        let internal: ApiError = GraphError::Connection("bolt://10.0.0.5 refused".into()).into();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.to_string(), "Internal server error");
    }
}
