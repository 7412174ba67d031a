//! Error types for lead-console.

use serde_json::Value;
use thiserror::Error;

/// Message used when a call needs a session but none is stored.
pub const NO_TOKEN_MESSAGE: &str = "No authentication token";

/// Message used when the API rejects the attached token.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Message used for every transport-level failure.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";

/// Message substituted when an error response carries no parseable body.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

/// The single error shape produced by the request dispatcher.
///
/// Every failed dispatch resolves to exactly one of these, whether the
/// failure came from a missing session, an API rejection or the transport.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct DispatchError {
    message: String,
    status: u16,
    payload: Option<Value>,
}

/// Coarse classification of a [`DispatchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No session, or the API answered 401.
    Unauthenticated,
    /// The API answered with a non-2xx status other than 401.
    Rejected,
    /// The request never produced a usable response.
    Transport,
}

impl DispatchError {
    /// Create an error with an explicit message, status and payload.
    pub fn new(message: impl Into<String>, status: u16, payload: Option<Value>) -> Self {
        Self {
            message: message.into(),
            status,
            payload,
        }
    }

    /// No token stored, the request was never sent.
    pub fn no_token() -> Self {
        Self::new(NO_TOKEN_MESSAGE, 401, None)
    }

    /// The API rejected the bearer token.
    pub fn unauthorized() -> Self {
        Self::new(UNAUTHORIZED_MESSAGE, 401, None)
    }

    /// Transport failure; `detail` is kept in the payload for diagnostics.
    pub fn network(detail: impl std::fmt::Display) -> Self {
        Self::new(
            NETWORK_ERROR_MESSAGE,
            0,
            Some(serde_json::json!({ "error": detail.to_string() })),
        )
    }

    /// Build an error from a non-2xx response body.
    ///
    /// `body` is the parsed JSON error body, or `None` if it could not be
    /// parsed, in which case a generic payload is substituted.
    pub fn from_response(status: u16, body: Option<Value>) -> Self {
        let payload =
            body.unwrap_or_else(|| serde_json::json!({ "message": GENERIC_ERROR_MESSAGE }));
        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP Error {status}"));
        Self::new(message, status, Some(payload))
    }

    /// Human-readable message suitable for display.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status code, or 0 for transport failures.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Structured body returned by the server, if any.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    pub fn kind(&self) -> ErrorKind {
        match self.status {
            0 => ErrorKind::Transport,
            401 => ErrorKind::Unauthenticated,
            _ => ErrorKind::Rejected,
        }
    }

    /// True when the caller should send the user back to login.
    pub fn is_unauthenticated(&self) -> bool {
        self.kind() == ErrorKind::Unauthenticated
    }
}

/// Errors raised by session storage backends.
///
/// These never reach callers of the session store; it logs them and treats
/// the affected keys as absent.
#[derive(Error, Debug)]
pub enum StorageError {
    /// I/O error on the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backing file is not a valid key/value document.
    #[error("corrupt storage document: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Internal lock was poisoned.
    #[error("internal lock poisoned")]
    LockPoisoned,
}

/// Convenience Result type for dispatcher operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
