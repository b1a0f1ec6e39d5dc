//! API error types with IntoResponse
//!
//! Store failures, constraint violations included, become
//! `500 {"error": "<database message>"}`. Unparsable JSON bodies become
//! `400 {"error": "<parser message>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::db::DbError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    /// Store read/write failure (500, logged)
    Database(DbError),

    /// Request body is not valid JSON (400)
    InvalidBody(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Database(e @ DbError::ConstraintViolation(_)) => {
                tracing::warn!("Constraint violation: {}", e);
                e.message()
            }
            Self::Database(e) => {
                tracing::error!("Database error: {}", e);
                e.message()
            }
            Self::InvalidBody(msg) => msg.clone(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        Self::Database(e)
    }
}
