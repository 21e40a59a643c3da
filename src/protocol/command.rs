//! Command definitions
//!
//! Represents requests from clients.

use std::net::Ipv4Addr;

use crate::record::{HostRecord, MacAddr};

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    List = 0x01,
    GetByMac = 0x02,
    GetByIp = 0x03,
    Insert = 0x04,
    Update = 0x05,
    RemoveByMac = 0x06,
    RemoveByIp = 0x07,
    Ping = 0x08,
}

impl TryFrom<u8> for CommandType {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Ok(match byte {
            0x01 => CommandType::List,
            0x02 => CommandType::GetByMac,
            0x03 => CommandType::GetByIp,
            0x04 => CommandType::Insert,
            0x05 => CommandType::Update,
            0x06 => CommandType::RemoveByMac,
            0x07 => CommandType::RemoveByIp,
            0x08 => CommandType::Ping,
            other => return Err(other),
        })
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every reservation
    List,

    /// Look up a reservation by hardware address
    GetByMac { mac: MacAddr },

    /// Look up a reservation by IPv4 address
    GetByIp { ip: Ipv4Addr },

    /// Add a reservation (uniqueness checked)
    Insert { record: HostRecord },

    /// Replace reservations sharing the MAC or IP
    Update { record: HostRecord },

    /// Remove a reservation by hardware address
    RemoveByMac { mac: MacAddr },

    /// Remove a reservation by IPv4 address
    RemoveByIp { ip: Ipv4Addr },

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::List => CommandType::List,
            Command::GetByMac { .. } => CommandType::GetByMac,
            Command::GetByIp { .. } => CommandType::GetByIp,
            Command::Insert { .. } => CommandType::Insert,
            Command::Update { .. } => CommandType::Update,
            Command::RemoveByMac { .. } => CommandType::RemoveByMac,
            Command::RemoveByIp { .. } => CommandType::RemoveByIp,
            Command::Ping => CommandType::Ping,
        }
    }

    /// True for commands that modify the hosts file
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Insert { .. }
                | Command::Update { .. }
                | Command::RemoveByMac { .. }
                | Command::RemoveByIp { .. }
        )
    }
}
