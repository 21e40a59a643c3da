//! Configuration for dhcphosts
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{HostError, Result};
use crate::service::WriteMode;

/// Default location of the dnsmasq static reservations file
pub const DEFAULT_HOSTS_FILE: &str = "/etc/dnsmasq.d/04-dhcp-static-leases.conf";

/// Default TCP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:6904";

/// Main configuration for a dhcphosts instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// dnsmasq file holding the `dhcp-host=` reservations
    pub hosts_file: PathBuf,

    /// Coordination of concurrent mutations
    pub write_mode: WriteMode,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Number of connection worker threads
    pub worker_threads: usize,

    /// Max accepted connections waiting for a worker
    pub max_connections: usize,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts_file: PathBuf::from(DEFAULT_HOSTS_FILE),
            write_mode: WriteMode::Unserialized,
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            worker_threads: 4,
            max_connections: 64,
            read_timeout_ms: 5000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.hosts_file.as_os_str().is_empty() {
            return Err(HostError::Config("hosts_file must not be empty".to_string()));
        }
        if self.worker_threads == 0 {
            return Err(HostError::Config(
                "worker_threads must be greater than 0".to_string(),
            ));
        }
        if self.max_connections == 0 {
            return Err(HostError::Config(
                "max_connections must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the hosts file path
    pub fn hosts_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.hosts_file = path.into();
        self
    }

    /// Set how concurrent mutations are coordinated
    pub fn write_mode(mut self, mode: WriteMode) -> Self {
        self.config.write_mode = mode;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of connection worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the maximum number of queued connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
