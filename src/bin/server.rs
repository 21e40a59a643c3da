//! dhcphosts Server Binary
//!
//! Serves the static host reservations of one dnsmasq file over TCP.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use dhcphosts::config::{DEFAULT_HOSTS_FILE, DEFAULT_LISTEN_ADDR};
use dhcphosts::network::Server;
use dhcphosts::{Config, FileHostStore, HostService, StaticHostService, WriteMode};
use tracing_subscriber::{fmt, EnvFilter};

/// dhcphosts Server
#[derive(Parser, Debug)]
#[command(name = "dhcphosts-server")]
#[command(about = "Manage dnsmasq static DHCP host reservations")]
#[command(version)]
struct Args {
    /// dnsmasq file holding the dhcp-host= entries
    #[arg(short = 'f', long, env = "DHCPHOSTS_HOSTS_FILE", default_value = DEFAULT_HOSTS_FILE)]
    hosts_file: PathBuf,

    /// Listen address (host:port)
    #[arg(short, long, env = "DHCPHOSTS_LISTEN", default_value = DEFAULT_LISTEN_ADDR)]
    listen: String,

    /// Connection worker threads
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Maximum queued connections
    #[arg(short, long, default_value = "64")]
    max_connections: usize,

    /// Run one mutation at a time (prevents lost updates between clients)
    #[arg(long, env = "DHCPHOSTS_SERIALIZE_WRITES")]
    serialize_writes: bool,

    /// Create an empty hosts file if it does not exist
    #[arg(long)]
    create: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();

    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    tracing::info!("dhcphosts Server v{}", dhcphosts::VERSION);
    tracing::info!("Hosts file: {}", args.hosts_file.display());
    tracing::info!("Listen address: {}", args.listen);

    let write_mode = if args.serialize_writes {
        WriteMode::Serialized
    } else {
        WriteMode::Unserialized
    };

    let config = Config::builder()
        .hosts_file(&args.hosts_file)
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .max_connections(args.max_connections)
        .write_mode(write_mode)
        .build();

    if let Err(e) = config.validate() {
        tracing::error!("{}", e);
        std::process::exit(1);
    }

    let store = if args.create {
        match FileHostStore::create(&config.hosts_file) {
            Ok(store) => store,
            Err(e) => {
                tracing::error!("Failed to create hosts file: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        if !config.hosts_file.exists() {
            tracing::warn!(
                "Hosts file {} does not exist; requests will fail until it is created",
                config.hosts_file.display()
            );
        }
        FileHostStore::new(&config.hosts_file)
    };

    let service: Arc<dyn HostService> =
        Arc::new(StaticHostService::with_write_mode(store, config.write_mode));

    tracing::info!("Write mode: {:?}", config.write_mode);

    let mut server = Server::new(config, service);
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
