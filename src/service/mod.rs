//! Service Module
//!
//! Domain operations on static host reservations.
//!
//! ## Responsibilities
//! - Enforce MAC / IP uniqueness on insert
//! - Replace-by-key semantics for update
//! - Optionally serialize load-modify-store cycles (see [`WriteMode`])

mod hosts;

pub use hosts::StaticHostService;

use std::net::Ipv4Addr;

use crate::error::Result;
use crate::record::{HostRecord, MacAddr};

/// How mutating operations are coordinated between concurrent callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// No coordination. Concurrent mutations race on the hosts file and the
    /// last writer wins.
    #[default]
    Unserialized,

    /// One mutating operation at a time, held across its whole
    /// load-modify-store sequence.
    Serialized,
}

/// Host reservation operations consumed by the protocol layer
pub trait HostService: Send + Sync {
    /// Add a reservation.
    ///
    /// Fails with `InvalidRecord` if the record cannot be stored as one line
    /// (see [`HostRecord::validate`]), and with `DuplicateKey` if the MAC
    /// (checked first) or the IP is already reserved.
    fn insert(&self, record: &HostRecord) -> Result<()>;

    /// Replace any reservation holding the record's MAC or IP with `record`.
    ///
    /// The record is validated like `insert`. Returns the displaced
    /// reservations. No uniqueness check is made: a
    /// record sharing only the MAC and another sharing only the IP are both
    /// removed.
    fn update(&self, record: &HostRecord) -> Result<Vec<HostRecord>>;

    /// All reservations in file order
    fn fetch_all(&self) -> Result<Vec<HostRecord>>;

    fn fetch_by_mac(&self, mac: MacAddr) -> Result<Option<HostRecord>>;

    fn fetch_by_ip(&self, ip: Ipv4Addr) -> Result<Option<HostRecord>>;

    /// Remove the reservation for `mac`. `None` means there was nothing to remove.
    fn remove_by_mac(&self, mac: MacAddr) -> Result<Option<HostRecord>>;

    /// Remove the reservation for `ip`. `None` means there was nothing to remove.
    fn remove_by_ip(&self, ip: Ipv4Addr) -> Result<Option<HostRecord>>;
}
