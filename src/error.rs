//! Error types for the profile registry.

use thiserror::Error;

use crate::credentials::CredentialError;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A credential-service call failed. Propagated unchanged; the registry
    /// never mutates state after a failed credential call.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// No profile with the given id exists in the registry.
    #[error("profile not found: {0}")]
    ProfileNotFound(String),

    /// A profile with the given id is already registered.
    #[error("profile already exists: {0}")]
    DuplicateProfile(String),

    /// The profile input was rejected before any side effect ran.
    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    /// Reading or writing the state snapshot failed.
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Snapshot(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Snapshot(e.to_string())
    }
}
