//! Unified error types and HTTP error mapping.
//!
//! Services and repositories return [`Error`]; the API layer turns it into a
//! status code and an `{"error": "..."}` body through [`IntoResponse`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy shared by every layer of the service.
#[derive(Debug, Error)]
pub enum Error {
    /// Client-correctable input defect (missing field, wrong envelope count, ...)
    #[error("{message}")]
    Validation {
        /// Human-readable description of the defect
        message: String,
    },

    /// Referenced entity does not exist
    #[error("{entity} not found")]
    NotFound {
        /// What was being looked up, e.g. `"lixi config"`
        entity: &'static str,
    },

    /// Operation forbidden by the current state
    #[error("{message}")]
    Conflict {
        /// Human-readable reason
        message: String,
    },

    /// Bad credentials or an invalid bearer token
    #[error("{message}")]
    Auth {
        /// Human-readable reason
        message: String,
    },

    /// Unexpected persistence-layer fault, constraint violations included
    #[error("Storage error: {message}")]
    Storage {
        /// Driver or decode detail; logged, never sent to clients
        message: String,
    },

    /// Missing or malformed application configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable reason
        message: String,
    },

    /// Failure in hashing, token signing or a blocking task
    #[error("Internal error: {message}")]
    Internal {
        /// Detail; logged, never sent to clients
        message: String,
    },

    /// Filesystem failure while reading the seed file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// The status code this error is reported with.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::Conflict { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Auth { .. } => StatusCode::UNAUTHORIZED,
            Self::Storage { .. } | Self::Config { .. } | Self::Internal { .. } | Self::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<sea_orm::DbErr> for Error {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::Storage {
            message: value.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Storage {
            message: format!("envelope encoding: {value}"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::Conflict {
                message: "cannot delete active config".to_string()
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Error::NotFound {
                entity: "lixi config"
            }
            .status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::Auth {
                message: "invalid credentials".to_string()
            }
            .status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_db_errors_are_storage_failures() {
        let err: Error = sea_orm::DbErr::Custom("unique violation".to_string()).into();
        assert!(matches!(err, Error::Storage { .. }));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::NotFound {
            entity: "lixi config",
        };
        assert_eq!(err.to_string(), "lixi config not found");
    }
}
