//! Error types for dhcphosts
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::protocol::Status;
use crate::record::KeyField;

/// Result type alias using HostError
pub type Result<T> = std::result::Result<T, HostError>;

/// Unified error type for dhcphosts operations
///
/// "Not found" is never an error here: lookups and deletes return `Option`.
#[derive(Debug, Error)]
pub enum HostError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Hosts File Errors
    // -------------------------------------------------------------------------
    /// A `dhcp-host=` line whose fields could not be parsed.
    /// `line` is 1-based, or 0 when no file context is known.
    #[error("Malformed dhcp-host entry at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Duplicated {field} address: {value}")]
    DuplicateKey { field: KeyField, value: String },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A record whose fields cannot be written as one `dhcp-host=` line
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Non-OK response received by a client
    #[error("Request rejected ({status:?}): {message}")]
    Rejected { status: Status, message: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl HostError {
    /// Create a malformed record error without line context
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line: 0,
            reason: reason.into(),
        }
    }

    /// True when the failure was caused by the caller's input rather than
    /// by the hosts file or the host machine.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            HostError::DuplicateKey { .. }
                | HostError::InvalidAddress(_)
                | HostError::InvalidRecord(_)
                | HostError::Protocol(_)
        )
    }
}

impl From<bincode::Error> for HostError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
