//! Store Module
//!
//! Durable persistence of the full reservation set as a dnsmasq hosts file.
//!
//! ## Responsibilities
//! - Parse the hosts file into records (via the codec)
//! - Look up records by predicate, first match in file order
//! - Append / remove single records by rewriting the whole file
//!
//! ## Load-Modify-Store
//! ```text
//!   read file ──► decode lines ──► Vec<HostRecord>
//!                                       │ modify in memory
//!   rename tmp ◄── write tmp ◄── encode lines
//! ```
//! Nothing is cached between calls: every operation starts from the file.
//! The store does not enforce key uniqueness and does not serialize
//! concurrent cycles; see [`crate::service`] for both.

pub mod codec;
mod file;

pub use codec::{decode_line, encode_line, RECORD_PREFIX};
pub use file::FileHostStore;

use std::net::Ipv4Addr;

use crate::error::Result;
use crate::record::{HostRecord, MacAddr};

/// Predicate used to select records
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostFilter {
    /// Same hardware address
    Mac(MacAddr),

    /// Same IPv4 address
    Ip(Ipv4Addr),

    /// Equal in every field
    Record(HostRecord),
}

impl HostFilter {
    pub fn matches(&self, record: &HostRecord) -> bool {
        match self {
            HostFilter::Mac(mac) => record.mac_address == *mac,
            HostFilter::Ip(ip) => record.ip_address == *ip,
            HostFilter::Record(other) => record == other,
        }
    }
}

/// Persistence capability for host records
///
/// Every method performs its own complete read (and, for mutations, write)
/// of the backing storage.
pub trait HostStore: Send + Sync {
    /// All records in storage order
    fn load_all(&self) -> Result<Vec<HostRecord>>;

    /// First record matching `filter`, or `None`
    fn find_one(&self, filter: &HostFilter) -> Result<Option<HostRecord>>;

    /// Add a record after all existing ones
    fn append(&self, record: &HostRecord) -> Result<()>;

    /// Remove the first record matching `filter` and return it.
    /// Storage is left untouched when nothing matches.
    fn delete_one(&self, filter: &HostFilter) -> Result<Option<HostRecord>>;
}
