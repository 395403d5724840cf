//! HTTP route handlers

pub mod rooms;
pub mod status;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sumito_core::MessageError;

use crate::state::RoomError;

/// Error body returned by every failing route
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn forbidden(message: &str) -> Self {
        Self {
            status: StatusCode::FORBIDDEN,
            message: message.to_string(),
        }
    }

    pub fn internal(message: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<RoomError> for ApiError {
    fn from(err: RoomError) -> Self {
        match err {
            RoomError::NotFound => Self {
                status: StatusCode::NOT_FOUND,
                message: "room not found".to_string(),
            },
            RoomError::Full => Self {
                status: StatusCode::CONFLICT,
                message: "room is full".to_string(),
            },
        }
    }
}

impl From<MessageError> for ApiError {
    fn from(err: MessageError) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: err.to_string(),
        }
    }
}
