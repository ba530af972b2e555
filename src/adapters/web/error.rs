//! HTTP error responses for the web adapter.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::domain::error::StockeaseError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

pub fn status_from_error(err: &StockeaseError) -> StatusCode {
    match err {
        StockeaseError::NoData { .. } => StatusCode::NOT_FOUND,
        StockeaseError::InvalidParameter { .. }
        | StockeaseError::ConfigMissing { .. }
        | StockeaseError::ConfigInvalid { .. }
        | StockeaseError::ConfigParse { .. } => StatusCode::BAD_REQUEST,
        StockeaseError::Ingest { .. }
        | StockeaseError::Database { .. }
        | StockeaseError::DatabaseQuery { .. }
        | StockeaseError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<StockeaseError> for WebError {
    fn from(err: StockeaseError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.message, "request failed");
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
