//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Simple Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: LIST           - Payload: empty
//! - 0x02: GET_BY_MAC     - Payload: mac
//! - 0x03: GET_BY_IP      - Payload: ipv4
//! - 0x04: INSERT         - Payload: record
//! - 0x05: UPDATE         - Payload: record
//! - 0x06: REMOVE_BY_MAC  - Payload: mac
//! - 0x07: REMOVE_BY_IP   - Payload: ipv4
//! - 0x08: PING           - Payload: empty
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01: NOT_FOUND
//! - 0x02: CONFLICT     (duplicate MAC or IP on insert)
//! - 0x03: BAD_REQUEST
//! - 0x04: ERROR

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Response, Status};
pub use codec::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
