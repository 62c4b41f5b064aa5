//! Recipe API error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to the recipe API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Server answered with a non-success status
    #[error("recipe API returned {status}: {body}")]
    Http { status: u16, body: String },

    /// GraphQL-level error reported in the response `errors` array
    #[error("{message}")]
    Graphql { message: String },

    /// Connection could not be established or was dropped
    #[error("connection failed: {0}")]
    Connection(String),

    /// Request timed out
    #[error("request timed out")]
    Timeout,

    /// Response carried no data for the requested field
    #[error("response is missing '{field}'")]
    MissingData { field: String },

    /// Response body could not be decoded
    #[error("invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Requested recipe does not exist
    #[error("recipe '{id}' not found")]
    NotFound { id: String },

    /// Fixture file could not be loaded
    #[error("failed to load fixture '{path}': {message}")]
    Fixture { path: PathBuf, message: String },
}

impl ApiError {
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    pub fn graphql(message: impl Into<String>) -> Self {
        Self::Graphql {
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    pub fn missing_data(field: impl Into<String>) -> Self {
        Self::MissingData {
            field: field.into(),
        }
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn fixture(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Fixture {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Connection(err.to_string())
        } else if err.is_decode() {
            ApiError::Connection(format!("failed to read response: {}", err))
        } else {
            ApiError::Connection(format!("request failed: {}", err))
        }
    }
}
