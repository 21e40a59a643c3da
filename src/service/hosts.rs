//! Static host service
//!
//! [`HostService`] implementation on top of any [`HostStore`].

use std::net::Ipv4Addr;

use parking_lot::{Mutex, MutexGuard};

use crate::error::{HostError, Result};
use crate::record::{HostRecord, KeyField, MacAddr};
use crate::store::{HostFilter, HostStore};

use super::{HostService, WriteMode};

/// Stateless service over a host store
///
/// ## Concurrency
/// - Reads never lock.
/// - With [`WriteMode::Serialized`], `insert`, `update` and the removals
///   hold `write_lock` for their entire sequence of store calls, so a
///   uniqueness check cannot be invalidated before the append lands.
/// - With [`WriteMode::Unserialized`] the lock is never taken.
pub struct StaticHostService<S: HostStore> {
    /// Backing store (re-read on every call)
    store: S,

    write_mode: WriteMode,

    /// Serializes mutations in `WriteMode::Serialized`
    write_lock: Mutex<()>,
}

impl<S: HostStore> StaticHostService<S> {
    /// Service without write serialization
    pub fn new(store: S) -> Self {
        Self::with_write_mode(store, WriteMode::default())
    }

    pub fn with_write_mode(store: S, write_mode: WriteMode) -> Self {
        Self {
            store,
            write_mode,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the backing store
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    /// Take the write lock if this service serializes writes
    fn write_guard(&self) -> Option<MutexGuard<'_, ()>> {
        match self.write_mode {
            WriteMode::Serialized => Some(self.write_lock.lock()),
            WriteMode::Unserialized => None,
        }
    }

    fn duplicate(field: KeyField, record: &HostRecord) -> HostError {
        HostError::DuplicateKey {
            field,
            value: record.key(field),
        }
    }
}

impl<S: HostStore> HostService for StaticHostService<S> {
    fn insert(&self, record: &HostRecord) -> Result<()> {
        record.validate()?;
        let _write_guard = self.write_guard();

        if self
            .store
            .find_one(&HostFilter::Mac(record.mac_address))?
            .is_some()
        {
            tracing::debug!("Rejected insert, MAC {} already reserved", record.mac_address);
            return Err(Self::duplicate(KeyField::Mac, record));
        }

        if self
            .store
            .find_one(&HostFilter::Ip(record.ip_address))?
            .is_some()
        {
            tracing::debug!("Rejected insert, IP {} already reserved", record.ip_address);
            return Err(Self::duplicate(KeyField::Ip, record));
        }

        self.store.append(record)?;
        tracing::info!(
            "Added static host {} -> {} ({})",
            record.mac_address,
            record.ip_address,
            record.host_name
        );
        Ok(())
    }

    fn update(&self, record: &HostRecord) -> Result<Vec<HostRecord>> {
        record.validate()?;
        let _write_guard = self.write_guard();

        let mut displaced = Vec::new();
        if let Some(old) = self.store.delete_one(&HostFilter::Mac(record.mac_address))? {
            displaced.push(old);
        }
        if let Some(old) = self.store.delete_one(&HostFilter::Ip(record.ip_address))? {
            displaced.push(old);
        }

        if displaced.len() > 1 {
            // Two distinct reservations each shared one key with the new record
            tracing::warn!(
                "Update of {} -> {} replaced two reservations: {} -> {} and {} -> {}",
                record.mac_address,
                record.ip_address,
                displaced[0].mac_address,
                displaced[0].ip_address,
                displaced[1].mac_address,
                displaced[1].ip_address
            );
        }

        self.store.append(record)?;
        tracing::info!(
            "Updated static host {} -> {} ({}), {} replaced",
            record.mac_address,
            record.ip_address,
            record.host_name,
            displaced.len()
        );
        Ok(displaced)
    }

    fn fetch_all(&self) -> Result<Vec<HostRecord>> {
        self.store.load_all()
    }

    fn fetch_by_mac(&self, mac: MacAddr) -> Result<Option<HostRecord>> {
        self.store.find_one(&HostFilter::Mac(mac))
    }

    fn fetch_by_ip(&self, ip: Ipv4Addr) -> Result<Option<HostRecord>> {
        self.store.find_one(&HostFilter::Ip(ip))
    }

    fn remove_by_mac(&self, mac: MacAddr) -> Result<Option<HostRecord>> {
        let _write_guard = self.write_guard();

        let removed = self.store.delete_one(&HostFilter::Mac(mac))?;
        if let Some(record) = &removed {
            tracing::info!("Removed static host {} -> {}", record.mac_address, record.ip_address);
        }
        Ok(removed)
    }

    fn remove_by_ip(&self, ip: Ipv4Addr) -> Result<Option<HostRecord>> {
        let _write_guard = self.write_guard();

        let removed = self.store.delete_one(&HostFilter::Ip(ip))?;
        if let Some(record) = &removed {
            tracing::info!("Removed static host {} -> {}", record.mac_address, record.ip_address);
        }
        Ok(removed)
    }
}
