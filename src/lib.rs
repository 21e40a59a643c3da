//! # dhcphosts
//!
//! Static DHCP host reservation manager for dnsmasq with:
//! - Line codec for `dhcp-host=` entries
//! - Whole-file load-modify-store persistence, nothing cached between calls
//! - MAC / IP uniqueness enforcement with optional write serialization
//! - TCP-based client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                  (Multiple Clients)                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    HostService                               │
//! │        (uniqueness checks, optional write lock)              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     HostStore                                │
//! │          (load / find / append / delete, per call)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │  Line codec   │──► /etc/dnsmasq.d/*.conf
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod store;
pub mod service;
pub mod network;
pub mod protocol;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{HostError, Result};
pub use config::Config;
pub use record::{HostRecord, KeyField, MacAddr};
pub use store::{FileHostStore, HostFilter, HostStore};
pub use service::{HostService, StaticHostService, WriteMode};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of dhcphosts
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
