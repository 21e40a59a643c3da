//! Record Module
//!
//! The static DHCP host reservation and its identity keys.
//!
//! ## Identity
//! A reservation is identified by either of two natural keys:
//! - the hardware (MAC) address
//! - the IPv4 address
//!
//! Uniqueness of both keys across the hosts file is enforced by the
//! service layer, not by the record or the store.

mod mac;

pub use mac::{MacAddr, MAC_LEN};

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::error::{HostError, Result};

/// A single static DHCP host reservation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    /// Hardware address of the client
    pub mac_address: MacAddr,

    /// Address the DHCP server always hands to this client
    pub ip_address: Ipv4Addr,

    /// Host name announced for the client
    pub host_name: String,

    /// Interface the reservation is scoped to (`None` = any interface)
    pub interface_name: Option<String>,
}

impl HostRecord {
    /// Create a reservation without an interface restriction
    pub fn new(mac_address: MacAddr, ip_address: Ipv4Addr, host_name: impl Into<String>) -> Self {
        Self {
            mac_address,
            ip_address,
            host_name: host_name.into(),
            interface_name: None,
        }
    }

    /// Scope the reservation to an interface. An empty name clears the scope.
    pub fn with_interface(mut self, interface_name: impl Into<String>) -> Self {
        let name = interface_name.into();
        self.interface_name = if name.is_empty() { None } else { Some(name) };
        self
    }

    /// Check that the record survives a write and re-read unchanged
    ///
    /// The host name must be non-empty. Neither the host name nor the
    /// interface may contain `,`, whitespace or control characters. An
    /// interface, when present, must be non-empty.
    pub fn validate(&self) -> Result<()> {
        check_field("host name", &self.host_name)?;
        if let Some(interface_name) = &self.interface_name {
            check_field("interface name", interface_name)?;
        }
        Ok(())
    }

    /// Value of the given key for this record, as text
    pub fn key(&self, field: KeyField) -> String {
        match field {
            KeyField::Mac => self.mac_address.to_string(),
            KeyField::Ip => self.ip_address.to_string(),
        }
    }
}

fn check_field(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(HostError::InvalidRecord(format!("empty {}", what)));
    }
    if let Some(c) = value
        .chars()
        .find(|c| *c == ',' || c.is_whitespace() || c.is_control())
    {
        return Err(HostError::InvalidRecord(format!(
            "{} {:?} contains forbidden character {:?}",
            what, value, c
        )));
    }
    Ok(())
}

/// The two uniqueness keys of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyField {
    Mac,
    Ip,
}

impl fmt::Display for KeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyField::Mac => f.write_str("MAC"),
            KeyField::Ip => f.write_str("IP"),
        }
    }
}
