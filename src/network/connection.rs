//! Connection Handler
//!
//! Handles individual client connections.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::TcpStream;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{HostError, Result};
use crate::protocol::{read_command, write_response, Command, Response};
use crate::service::HostService;

/// Handles a single client connection
pub struct Connection {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Reservation operations
    service: Arc<dyn HostService>,

    /// Peer address for logging
    peer_addr: String,
}

impl Connection {
    /// Create a new connection handler
    pub fn new(stream: TcpStream, service: Arc<dyn HostService>) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            service,
            peer_addr,
        })
    }

    /// Configure connection timeouts (0 = no timeout)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }
        Ok(())
    }

    /// Handle the connection (blocking until closed)
    ///
    /// Reads commands in a loop and sends responses.
    /// Returns when the client disconnects, times out, or sends garbage.
    pub fn handle(&mut self) -> Result<()> {
        tracing::debug!("Connection established from {}", self.peer_addr);

        loop {
            let command = match read_command(&mut self.reader) {
                Ok(cmd) => cmd,
                Err(HostError::Io(ref e)) if Self::is_disconnect(e.kind()) => {
                    tracing::debug!("Client {} disconnected ({:?})", self.peer_addr, e.kind());
                    return Ok(());
                }
                Err(HostError::Io(ref e))
                    if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) =>
                {
                    tracing::debug!("Read timeout for client {}", self.peer_addr);
                    return Ok(());
                }
                Err(e @ HostError::Protocol(_)) => {
                    // Framing can no longer be trusted
                    tracing::warn!("Bad request from {}: {}", self.peer_addr, e);
                    let _ = self.send_response(Response::bad_request(&e.to_string()));
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Error reading from {}: {}", self.peer_addr, e);
                    let _ = self.send_response(Response::error(&e.to_string()));
                    return Err(e);
                }
            };

            tracing::trace!("Received command from {}: {:?}", self.peer_addr, command);

            let response = self.execute_command(command);

            if let Err(e) = self.send_response(response) {
                if let HostError::Io(ref io_err) = e {
                    if Self::is_disconnect(io_err.kind()) || io_err.kind() == ErrorKind::BrokenPipe {
                        tracing::debug!(
                            "Client {} disconnected before response could be sent: {}",
                            self.peer_addr,
                            e
                        );
                        return Ok(());
                    }
                }
                tracing::warn!("Error writing to {}: {}", self.peer_addr, e);
                return Err(e);
            }
        }
    }

    fn is_disconnect(kind: ErrorKind) -> bool {
        matches!(
            kind,
            ErrorKind::UnexpectedEof | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted
        )
    }

    /// Execute a command and return a response
    fn execute_command(&self, command: Command) -> Response {
        let mutation = command.is_mutation();

        let result = match command {
            Command::List => self
                .service
                .fetch_all()
                .and_then(|records| Response::records(&records)),
            Command::GetByMac { mac } => match self.service.fetch_by_mac(mac) {
                Ok(Some(record)) => Response::record(&record),
                Ok(None) => Ok(Response::not_found(&format!(
                    "No static host found for MAC address {}",
                    mac
                ))),
                Err(e) => Err(e),
            },
            Command::GetByIp { ip } => match self.service.fetch_by_ip(ip) {
                Ok(Some(record)) => Response::record(&record),
                Ok(None) => Ok(Response::not_found(&format!(
                    "No static host found for IP address {}",
                    ip
                ))),
                Err(e) => Err(e),
            },
            Command::Insert { record } => self
                .service
                .insert(&record)
                .and_then(|_| Response::record(&record)),
            Command::Update { record } => self
                .service
                .update(&record)
                .and_then(|displaced| Response::records(&displaced)),
            Command::RemoveByMac { mac } => match self.service.remove_by_mac(mac) {
                Ok(Some(record)) => Response::record(&record),
                Ok(None) => Ok(Response::not_found(&format!(
                    "Nothing to delete for MAC address {}",
                    mac
                ))),
                Err(e) => Err(e),
            },
            Command::RemoveByIp { ip } => match self.service.remove_by_ip(ip) {
                Ok(Some(record)) => Response::record(&record),
                Ok(None) => Ok(Response::not_found(&format!(
                    "Nothing to delete for IP address {}",
                    ip
                ))),
                Err(e) => Err(e),
            },
            Command::Ping => Ok(Response::ok(Some(b"PONG".to_vec()))),
        };

        result.unwrap_or_else(|e| {
            if e.is_client_error() {
                tracing::debug!("Request from {} rejected: {}", self.peer_addr, e);
            } else if mutation {
                tracing::error!("Update from {} failed: {}", self.peer_addr, e);
            } else {
                tracing::error!("Lookup from {} failed: {}", self.peer_addr, e);
            }
            Response::from_error(&e)
        })
    }

    /// Send a response to the client
    fn send_response(&mut self, response: Response) -> Result<()> {
        write_response(&mut self.writer, &response)
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}
