//! Shared error type across metrix crates.

use std::sync::{Mutex, MutexGuard};

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Identifier is well-formed but unknown.
    NotFound,
    /// Name already taken (name-uniqueness mode only).
    AlreadyExists,
    /// Identifier is not a valid metric id.
    InvalidKey,
    /// Observation is not a finite number.
    InvalidValue,
    /// Configuration rejected at load time.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::AlreadyExists => "ALREADY_EXISTS",
            ClientCode::InvalidKey => "INVALID_KEY",
            ClientCode::InvalidValue => "INVALID_VALUE",
            ClientCode::BadConfig => "BAD_CONFIG",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MetrixError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetrixError {
    #[error("metric not found: {0}")]
    NotFound(String),
    #[error("metric already exists: {0}")]
    AlreadyExists(String),
    #[error("invalid metric id: {0}")]
    InvalidKey(String),
    #[error("invalid value: {0}")]
    InvalidValue(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl MetrixError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            MetrixError::NotFound(_) => ClientCode::NotFound,
            MetrixError::AlreadyExists(_) => ClientCode::AlreadyExists,
            MetrixError::InvalidKey(_) => ClientCode::InvalidKey,
            MetrixError::InvalidValue(_) => ClientCode::InvalidValue,
            MetrixError::BadConfig(_) => ClientCode::BadConfig,
            MetrixError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            MetrixError::Internal(_) => ClientCode::Internal,
        }
    }
}

/// Lock a per-key mutex, surfacing poisoning as `Internal` instead of panicking.
pub(crate) fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>> {
    m.lock()
        .map_err(|e| MetrixError::Internal(format!("lock poisoned: {e}")))
}
