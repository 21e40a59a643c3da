//! Hardware address type
//!
//! Six-octet MAC address with case-insensitive parsing and lower-case output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HostError;

/// Number of octets in an Ethernet hardware address
pub const MAC_LEN: usize = 6;

/// A 6-byte hardware address
///
/// Accepts `xx:xx:xx:xx:xx:xx` or `xx-xx-xx-xx-xx-xx` (one separator
/// throughout, hex digits in either case). Always displays as lower-case
/// colon-separated octets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MacAddr([u8; MAC_LEN]);

impl MacAddr {
    pub const fn new(octets: [u8; MAC_LEN]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; MAC_LEN] {
        self.0
    }
}

impl From<[u8; MAC_LEN]> for MacAddr {
    fn from(octets: [u8; MAC_LEN]) -> Self {
        Self(octets)
    }
}

impl FromStr for MacAddr {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || HostError::InvalidAddress(format!("'{}' is not a MAC address", s));

        // "aa:bb:cc:dd:ee:ff" is exactly 17 characters
        if s.len() != MAC_LEN * 3 - 1 {
            return Err(invalid());
        }

        let separator = match s.as_bytes()[2] {
            b @ (b':' | b'-') => b as char,
            _ => return Err(invalid()),
        };

        let mut octets = [0u8; MAC_LEN];
        let mut parts = s.split(separator);
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            a, b, c, d, e, g
        )
    }
}
