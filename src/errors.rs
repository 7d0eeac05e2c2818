use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::models::response::ErrorResponse;

pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";

/// Request-level failures. Both variants abort the broadcast and surface as HTTP 500.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Provider(String),
}

impl BroadcastError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    pub fn message(&self) -> &str {
        match self {
            BroadcastError::Validation(message) | BroadcastError::Provider(message) => message,
        }
    }
}

impl IntoResponse for BroadcastError {
    fn into_response(self) -> Response {
        let message = match self.message() {
            "" => INTERNAL_SERVER_ERROR.to_string(),
            message => message.to_string(),
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse { error: message }),
        )
            .into_response()
    }
}
