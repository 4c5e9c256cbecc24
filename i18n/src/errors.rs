use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use shared::envelope::error_response;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::properties::PropertiesError;

#[derive(Error, Debug)]
pub enum I18nError {
    #[error(
        "All mandatory bundle identification parameters not specified: '$PLUGIN_NAME/$PLUGIN_VERSION/$BUNDLE_NAME' (and optional $LOCALE)."
    )]
    MalformedIdentity,

    #[error("Unknown plugin or resource bundle: {0}")]
    UnknownIdentity(String),

    #[error("invalid locale: {0:?}")]
    InvalidLocale(String),

    #[error("{0}")]
    Loader(#[from] Arc<LoadError>),
}

/// Failures reading a bundle that exists. A bundle that simply isn't there
/// is not an error.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {path:?}: {source}")]
    Properties {
        path: PathBuf,
        #[source]
        source: PropertiesError,
    },
}

impl IntoResponse for I18nError {
    fn into_response(self) -> Response {
        let status = match &self {
            I18nError::MalformedIdentity | I18nError::InvalidLocale(_) => StatusCode::BAD_REQUEST,
            I18nError::UnknownIdentity(_) => StatusCode::NOT_FOUND,
            I18nError::Loader(err) => {
                tracing::error!(error = %err, "bundle loading failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        error_response(status, self.to_string())
    }
}
