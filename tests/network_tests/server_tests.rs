//! Server Tests
//!
//! End-to-end tests over TCP: a server bound to an ephemeral port, driven
//! through the blocking client.

use std::fs;
use std::io::{Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use dhcphosts::network::{Client, Server};
use dhcphosts::protocol::{decode_response, Command, Status};
use dhcphosts::record::{HostRecord, MacAddr};
use dhcphosts::service::{HostService, StaticHostService, WriteMode};
use dhcphosts::store::FileHostStore;
use dhcphosts::{Config, HostError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

struct TestServer {
    _temp_dir: TempDir,
    hosts_file: PathBuf,
    addr: SocketAddr,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    fn start(contents: &str) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let hosts_file = temp_dir.path().join("static.conf");
        fs::write(&hosts_file, contents).unwrap();

        let config = Config::builder()
            .hosts_file(&hosts_file)
            .listen_addr("127.0.0.1:0")
            .worker_threads(2)
            .max_connections(8)
            .read_timeout_ms(2000)
            .write_mode(WriteMode::Serialized)
            .build();
        config.validate().unwrap();

        let service: Arc<dyn HostService> = Arc::new(StaticHostService::with_write_mode(
            FileHostStore::new(&config.hosts_file),
            config.write_mode,
        ));

        let mut server = Server::new(config, service);
        let addr = server.bind().unwrap();
        let shutdown = server.shutdown_handle();
        let handle = thread::spawn(move || server.run().unwrap());

        Self {
            _temp_dir: temp_dir,
            hosts_file,
            addr,
            shutdown,
            handle: Some(handle),
        }
    }

    fn client(&self) -> Client {
        let mut client = Client::connect(self.addr).unwrap();
        client.set_timeout(Some(Duration::from_secs(5))).unwrap();
        client
    }

    fn file_contents(&self) -> String {
        fs::read_to_string(&self.hosts_file).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn mac(s: &str) -> MacAddr {
    s.parse().unwrap()
}

fn host(mac_str: &str, ip: [u8; 4], name: &str) -> HostRecord {
    HostRecord::new(mac(mac_str), Ipv4Addr::from(ip), name)
}

// =============================================================================
// Basic Operations
// =============================================================================

#[test]
fn test_ping() {
    let server = TestServer::start("");
    let mut client = server.client();

    client.ping().unwrap();
}

#[test]
fn test_insert_then_lookups() {
    let server = TestServer::start("");
    let mut client = server.client();
    let record = host("0a:50:e2:e9:02:22", [192, 168, 11, 145], "docker02");

    client.insert(&record).unwrap();

    assert_eq!(client.list().unwrap(), vec![record.clone()]);
    assert_eq!(
        client.get_by_mac(mac("0A:50:E2:E9:02:22")).unwrap(),
        Some(record.clone())
    );
    assert_eq!(
        client.get_by_ip(Ipv4Addr::new(192, 168, 11, 145)).unwrap(),
        Some(record)
    );
    assert_eq!(
        server.file_contents(),
        "dhcp-host=0a:50:e2:e9:02:22,192.168.11.145,docker02\n"
    );
}

#[test]
fn test_lookup_miss_is_none() {
    let server = TestServer::start("");
    let mut client = server.client();

    assert_eq!(client.get_by_mac(mac("ff:ff:ff:ff:ff:ff")).unwrap(), None);
    assert_eq!(client.get_by_ip(Ipv4Addr::new(10, 9, 9, 9)).unwrap(), None);
}

#[test]
fn test_duplicate_insert_is_conflict() {
    let server = TestServer::start("dhcp-host=aa:aa:aa:aa:aa:aa,10.0.0.1,alpha\n");
    let mut client = server.client();

    let err = client
        .insert(&host("bb:bb:bb:bb:bb:bb", [10, 0, 0, 1], "bravo"))
        .unwrap_err();

    match err {
        HostError::Rejected { status, message } => {
            assert_eq!(status, Status::Conflict);
            assert_eq!(message, "Duplicated IP address: 10.0.0.1");
        }
        other => panic!("Expected Rejected, got {:?}", other),
    }

    // Connection stays usable after a rejected request
    assert_eq!(client.list().unwrap().len(), 1);
}

#[test]
fn test_unwritable_record_is_bad_request() {
    let original = "dhcp-host=aa:aa:aa:aa:aa:aa,10.0.0.1,alpha\n";
    let server = TestServer::start(original);
    let mut client = server.client();

    let err = client
        .insert(&host("aa:aa:aa:aa:aa:01", [10, 0, 0, 2], "a,b,c"))
        .unwrap_err();
    match err {
        HostError::Rejected { status, message } => {
            assert_eq!(status, Status::BadRequest);
            assert!(message.starts_with("Invalid record"), "message: {}", message);
        }
        other => panic!("Expected Rejected, got {:?}", other),
    }

    let err = client
        .update(&host("aa:aa:aa:aa:aa:aa", [10, 0, 0, 1], "alpha").with_interface("eth 0"))
        .unwrap_err();
    assert!(matches!(
        err,
        HostError::Rejected {
            status: Status::BadRequest,
            ..
        }
    ));

    assert_eq!(server.file_contents(), original);
    assert_eq!(client.list().unwrap().len(), 1);
}

#[test]
fn test_update_returns_displaced_records() {
    let server = TestServer::start(
        "dhcp-host=aa:aa:aa:aa:aa:aa,10.0.0.1,a\ndhcp-host=bb:bb:bb:bb:bb:bb,10.0.0.2,b\n",
    );
    let mut client = server.client();
    let record = host("aa:aa:aa:aa:aa:aa", [10, 0, 0, 2], "x");

    let displaced = client.update(&record).unwrap();

    assert_eq!(
        displaced,
        vec![
            host("aa:aa:aa:aa:aa:aa", [10, 0, 0, 1], "a"),
            host("bb:bb:bb:bb:bb:bb", [10, 0, 0, 2], "b"),
        ]
    );
    assert_eq!(client.list().unwrap(), vec![record]);
}

#[test]
fn test_remove_hit_and_miss() {
    let original = "# keep\ndhcp-host=aa:aa:aa:aa:aa:aa,10.0.0.1,a\n";
    let server = TestServer::start(original);
    let mut client = server.client();

    assert_eq!(client.remove_by_ip(Ipv4Addr::new(10, 0, 0, 9)).unwrap(), None);
    assert_eq!(server.file_contents(), original);

    assert_eq!(
        client.remove_by_mac(mac("aa:aa:aa:aa:aa:aa")).unwrap(),
        Some(host("aa:aa:aa:aa:aa:aa", [10, 0, 0, 1], "a"))
    );
    assert_eq!(server.file_contents(), "");
}

#[test]
fn test_storage_error_is_reported() {
    let server = TestServer::start("");
    fs::write(&server.hosts_file, "dhcp-host=broken\n").unwrap();
    let mut client = server.client();

    match client.list() {
        Err(HostError::Rejected { status, message }) => {
            assert_eq!(status, Status::Error);
            assert!(message.contains("line 1"), "message: {}", message);
        }
        other => panic!("Expected Rejected, got {:?}", other),
    }
}

// =============================================================================
// Connection Handling
// =============================================================================

#[test]
fn test_multiple_clients() {
    let server = TestServer::start("");

    let handles: Vec<_> = (0..4u8)
        .map(|i| {
            let addr = server.addr;
            thread::spawn(move || {
                let mut client = Client::connect(addr).unwrap();
                client
                    .insert(&HostRecord::new(
                        MacAddr::new([0x02, 0, 0, 0, 0, i]),
                        Ipv4Addr::new(10, 0, 1, i + 1),
                        format!("client-{}", i),
                    ))
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let mut client = server.client();
    assert_eq!(client.list().unwrap().len(), 4);
}

#[test]
fn test_unknown_command_gets_bad_request() {
    let server = TestServer::start("");
    let mut stream = TcpStream::connect(server.addr).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();

    stream.write_all(&[0x7F, 0x00, 0x00, 0x00, 0x00]).unwrap();

    let mut reply = Vec::new();
    stream.read_to_end(&mut reply).unwrap();

    let response = decode_response(&reply).unwrap();
    assert_eq!(response.status, Status::BadRequest);
    assert!(response.message().unwrap().contains("Unknown command type"));
}

#[test]
fn test_raw_request_round_trip() {
    let server = TestServer::start("dhcp-host=aa:aa:aa:aa:aa:aa,10.0.0.1,a,eth0\n");
    let mut client = server.client();

    let response = client
        .request(&Command::GetByMac {
            mac: mac("aa:aa:aa:aa:aa:aa"),
        })
        .unwrap();

    assert!(response.is_ok());
    let record = response.into_record().unwrap();
    assert_eq!(record.interface_name.as_deref(), Some("eth0"));
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_defaults_are_valid() {
    let config = Config::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.write_mode, WriteMode::Unserialized);
    assert_eq!(config.listen_addr, "127.0.0.1:6904");
}

#[test]
fn test_config_rejects_zero_workers() {
    let config = Config::builder().worker_threads(0).build();
    assert!(matches!(config.validate(), Err(HostError::Config(_))));

    let config = Config::builder().max_connections(0).build();
    assert!(matches!(config.validate(), Err(HostError::Config(_))));

    let config = Config::builder().hosts_file("").build();
    assert!(matches!(config.validate(), Err(HostError::Config(_))));
}

#[test]
fn test_bind_failure_is_io_error() {
    let server = TestServer::start("");

    let config = Config::builder().listen_addr(server.addr.to_string()).build();
    let service: Arc<dyn HostService> =
        Arc::new(StaticHostService::new(FileHostStore::new(&server.hosts_file)));
    let mut second = Server::new(config, service);

    assert!(matches!(second.bind(), Err(HostError::Io(_))));
}
