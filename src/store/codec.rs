//! Record codec
//!
//! Maps one hosts-file line to one [`HostRecord`] and back.
//!
//! ## Line Format
//! ```text
//! dhcp-host=<mac>,<ipv4>,<hostname>[,<interface>]
//! ```
//! Lines without the `dhcp-host=` prefix are not records. They are skipped by
//! the store and dropped on the next rewrite.

use std::net::Ipv4Addr;

use crate::error::{HostError, Result};
use crate::record::{HostRecord, MacAddr};

/// Prefix that marks a static host reservation line
pub const RECORD_PREFIX: &str = "dhcp-host=";

/// Field separator within a record line
pub const FIELD_SEPARATOR: char = ',';

/// Decode a single line
///
/// Returns:
/// - `Ok(Some(record))`: the line is a valid reservation
/// - `Ok(None)`: the line is not a reservation (comment, other directive, blank)
/// - `Err(MalformedRecord)`: the line has the prefix but bad fields
pub fn decode_line(line: &str) -> Result<Option<HostRecord>> {
    let Some(body) = line.strip_prefix(RECORD_PREFIX) else {
        return Ok(None);
    };

    let fields: Vec<&str> = body.split(FIELD_SEPARATOR).map(str::trim).collect();
    if fields.len() != 3 && fields.len() != 4 {
        return Err(HostError::malformed(format!(
            "expected 3 or 4 fields, found {}",
            fields.len()
        )));
    }

    let mac_address: MacAddr = fields[0]
        .parse()
        .map_err(|_| HostError::malformed(format!("invalid MAC address '{}'", fields[0])))?;

    let ip_address: Ipv4Addr = fields[1]
        .parse()
        .map_err(|_| HostError::malformed(format!("invalid IPv4 address '{}'", fields[1])))?;

    let host_name = fields[2];
    if host_name.is_empty() {
        return Err(HostError::malformed("empty host name"));
    }

    let mut record = HostRecord::new(mac_address, ip_address, host_name);
    if let Some(interface_name) = fields.get(3) {
        record = record.with_interface(*interface_name);
    }

    Ok(Some(record))
}

/// Encode a record as a single line (no trailing newline)
pub fn encode_line(record: &HostRecord) -> String {
    let mut line = format!(
        "{}{},{},{}",
        RECORD_PREFIX, record.mac_address, record.ip_address, record.host_name
    );

    if let Some(interface_name) = record.interface_name.as_deref().filter(|n| !n.is_empty()) {
        line.push(FIELD_SEPARATOR);
        line.push_str(interface_name);
    }

    line
}
