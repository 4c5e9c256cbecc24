//! The JSON envelope shared by every endpoint.
//!
//! Successful responses look like `{"status": "ok", ...fields}` where the
//! fields come from the wrapped payload. Failures look like
//! `{"status": "error", "message": "..."}` and carry their own HTTP status.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope<T> {
    Ok(T),
    Error {
        message: String,
        #[serde(skip)]
        status_code: StatusCode,
    },
}

impl<T> Envelope<T> {
    pub fn error(status_code: StatusCode, message: impl Into<String>) -> Self {
        Envelope::Error {
            message: message.into(),
            status_code,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Envelope::Ok(_) => StatusCode::OK,
            Envelope::Error { status_code, .. } => *status_code,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Renders an error envelope with no payload type attached.
pub fn error_response(status_code: StatusCode, message: impl Into<String>) -> Response {
    Envelope::<()>::error(status_code, message).into_response()
}
