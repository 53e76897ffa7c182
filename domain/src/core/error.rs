//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown evaluation strategy: {0} (expected one of: {1})")]
    UnknownStrategy(String, String),

    #[error("Invalid release version: {0}")]
    InvalidVersion(String),

    #[error("Invalid commit id: {0}")]
    InvalidCommit(String),

    #[error("Invalid port assignment: {0}")]
    InvalidPorts(String),

    #[error("Invalid workflow transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },
}
