//! Response definitions
//!
//! Represents responses to clients.

use crate::error::{HostError, Result};
use crate::record::HostRecord;

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    Conflict = 0x02,
    BadRequest = 0x03,
    Error = 0x04,
}

impl Status {
    /// Parse a status byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Status::Ok),
            0x01 => Some(Status::NotFound),
            0x02 => Some(Status::Conflict),
            0x03 => Some(Status::BadRequest),
            0x04 => Some(Status::Error),
            _ => None,
        }
    }
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (bincode records for OK, UTF-8 message otherwise)
    pub payload: Option<Vec<u8>>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<Vec<u8>>) -> Self {
        Self {
            status: Status::Ok,
            payload,
        }
    }

    /// OK carrying one record
    pub fn record(record: &HostRecord) -> Result<Self> {
        Ok(Self::ok(Some(bincode::serialize(record)?)))
    }

    /// OK carrying a list of records
    pub fn records(records: &[HostRecord]) -> Result<Self> {
        Ok(Self::ok(Some(bincode::serialize(records)?)))
    }

    /// Create a NOT_FOUND response
    pub fn not_found(message: &str) -> Self {
        Self::with_message(Status::NotFound, message)
    }

    /// Create a CONFLICT response
    pub fn conflict(message: &str) -> Self {
        Self::with_message(Status::Conflict, message)
    }

    /// Create a BAD_REQUEST response
    pub fn bad_request(message: &str) -> Self {
        Self::with_message(Status::BadRequest, message)
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self::with_message(Status::Error, message)
    }

    /// Map a failed operation to a status
    pub fn from_error(err: &HostError) -> Self {
        match err {
            HostError::DuplicateKey { .. } => Self::conflict(&err.to_string()),
            e if e.is_client_error() => Self::bad_request(&e.to_string()),
            e => Self::error(&e.to_string()),
        }
    }

    fn with_message(status: Status, message: &str) -> Self {
        Self {
            status,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }

    /// Payload as text (lossy), for non-OK responses
    pub fn message(&self) -> Option<String> {
        self.payload
            .as_deref()
            .map(|p| String::from_utf8_lossy(p).into_owned())
    }

    /// Decode a single-record OK payload
    pub fn into_record(self) -> Result<HostRecord> {
        let payload = self
            .payload
            .ok_or_else(|| HostError::Protocol("Expected a record payload".to_string()))?;
        Ok(bincode::deserialize(&payload)?)
    }

    /// Decode a record-list OK payload
    pub fn into_records(self) -> Result<Vec<HostRecord>> {
        let payload = self
            .payload
            .ok_or_else(|| HostError::Protocol("Expected a record list payload".to_string()))?;
        Ok(bincode::deserialize(&payload)?)
    }
}
