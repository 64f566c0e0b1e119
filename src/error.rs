/*
 * Responsibility
 * - Error types shared by the crate (configuration binding, nonce access)
 * - IntoResponse for NonceError so handlers relying on the nonce fail loudly
 */
use std::path::PathBuf;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    #[error("invalid configuration: {key} = {value:?}")]
    Invalid { key: String, value: String },
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Unknown token for one of the tri-state header enums.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct ParseHeaderValueError {
    pub kind: &'static str,
    pub value: String,
}

#[derive(Debug, Error)]
pub enum NonceError {
    #[error("NonceService is not configured")]
    NotConfigured,

    #[error("failed to gather entropy for nonce: {0}")]
    Entropy(getrandom::Error),
}

#[derive(Serialize)]
struct ErrorResponseBody {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for NonceError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "csp nonce requested but unavailable");

        let body = ErrorResponseBody {
            error: ErrorBody {
                code: "INTERNAL",
                message: self.to_string(),
            },
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
