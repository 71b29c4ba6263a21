use crate::error::BoardError;
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

impl IntoResponse for BoardError {
    fn into_response(self) -> Response {
        let status = match &self {
            BoardError::Validation(_) | BoardError::Duplicate => StatusCode::BAD_REQUEST,
            BoardError::NotFound(_) => StatusCode::NOT_FOUND,
            BoardError::Storage(e) => {
                error!(error = %e, "storage failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(ApiResponse::failure(self.to_string()))).into_response()
    }
}

/// 200 with `value` as `data`.
pub fn ok_json<T: Serialize>(value: &T) -> Response {
    match serde_json::to_value(value) {
        Ok(data) => (StatusCode::OK, Json(ApiResponse::ok(data))).into_response(),
        Err(e) => BoardError::Storage(e.into()).into_response(),
    }
}

pub fn not_found(what: impl Into<String>) -> Response {
    BoardError::NotFound(what.into()).into_response()
}
