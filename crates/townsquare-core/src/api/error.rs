use reqwest::StatusCode;
use thiserror::Error;
use tracing::warn;

use crate::auth::StoreError;

use super::http::HttpError;

/// Message registration reports when the server could not be reached.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Network error. Please check your connection and try again.";

/// Message carried by [`ApiError::MissingCredential`].
pub const MISSING_CREDENTIAL_MESSAGE: &str = "Authentication token not found. Please log in.";

/// The single error surfaced by every service operation.
///
/// `Display` always yields a message fit to show a user as-is.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No response arrived: connection refused, DNS failure, timeout.
    #[error("{message}")]
    Unreachable {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Authentication token not found. Please log in.")]
    MissingCredential,

    #[error("Failed to access stored credentials: {0}")]
    Storage(#[from] StoreError),

    #[error("{0}")]
    Validation(String),

    /// Success status, but the payload was not what the operation expects.
    #[error("{0}")]
    InvalidResponse(String),
}

/// Fieldless category of an [`ApiError`], for callers that branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    TransportUnreachable,
    ServerRejected,
    MissingCredential,
    StorageFailure,
    ValidationFailure,
    InvalidResponse,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unreachable { .. } => ErrorKind::TransportUnreachable,
            ApiError::Rejected { .. } => ErrorKind::ServerRejected,
            ApiError::MissingCredential => ErrorKind::MissingCredential,
            ApiError::Storage(_) => ErrorKind::StorageFailure,
            ApiError::Validation(_) => ErrorKind::ValidationFailure,
            ApiError::InvalidResponse(_) => ErrorKind::InvalidResponse,
        }
    }

    /// HTTP status of a server rejection.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Map a transport-level failure, preferring the server's `error` field
    /// and falling back to `fallback`.
    pub fn from_http(err: HttpError, fallback: &str) -> Self {
        match err {
            HttpError::Unreachable(source) => ApiError::Unreachable {
                message: fallback.to_string(),
                source,
            },
            HttpError::Rejected { status, body } => ApiError::Rejected {
                status,
                message: body
                    .message()
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback.to_string()),
            },
            HttpError::Decode { .. } => ApiError::InvalidResponse(fallback.to_string()),
            HttpError::InvalidRequest(detail) => {
                warn!(%detail, "Request could not be built");
                ApiError::Validation(fallback.to_string())
            }
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }
}
