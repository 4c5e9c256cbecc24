use axum::http::{Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use shared::envelope::error_response;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PagingError {
    /// Paginated operations may only be read.
    #[error("paginated resources only accept GET, got {0}")]
    UnsupportedMethod(Method),

    #[error("merged collections cannot be looked up by id: {0}")]
    UnsupportedLookup(String),

    #[error("could not read activity source {path:?}: {source}")]
    SourceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse activity source {path:?}: {source}")]
    SourceFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl IntoResponse for PagingError {
    fn into_response(self) -> Response {
        match self {
            // No body: handling of other verbs is not ours to do.
            PagingError::UnsupportedMethod(_) => (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, "GET")],
            )
                .into_response(),
            PagingError::UnsupportedLookup(_) => {
                error_response(StatusCode::NOT_FOUND, self.to_string())
            }
            PagingError::SourceIo { .. } | PagingError::SourceFormat { .. } => {
                tracing::error!(error = %self, "activity source failure");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
        }
    }
}
