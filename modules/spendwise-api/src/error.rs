use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

/// Error returned to HTTP callers. Bodies are `{"error": ...}`, with
/// `detail` and `raw` added for diagnosable server-side failures.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Token is not valid or expired")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{message}")]
    Internal {
        message: &'static str,
        detail: Option<String>,
        raw: Option<String>,
    },
}

impl ApiError {
    pub fn internal(message: &'static str) -> Self {
        ApiError::Internal {
            message,
            detail: None,
            raw: None,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = json!({ "error": self.to_string() });
        if let ApiError::Internal { detail, raw, .. } = self {
            if let Some(detail) = detail {
                body["detail"] = json!(detail);
            }
            if let Some(raw) = raw {
                body["raw"] = json!(raw);
            }
        }
        (status, Json(body)).into_response()
    }
}
