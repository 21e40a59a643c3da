//! Blocking client for the dhcphosts protocol

use std::io::{BufReader, BufWriter};
use std::net::{Ipv4Addr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::error::{HostError, Result};
use crate::protocol::{read_response, write_command, Command, Response, Status};
use crate::record::{HostRecord, MacAddr};

/// A connection to a dhcphosts server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_nodelay(true)?;

        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
        })
    }

    /// Bound how long a single request may wait for its response
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        self.reader.get_ref().set_read_timeout(timeout)?;
        self.writer.get_ref().set_write_timeout(timeout)?;
        Ok(())
    }

    /// Send a command and wait for the raw response
    pub fn request(&mut self, command: &Command) -> Result<Response> {
        write_command(&mut self.writer, command)?;
        read_response(&mut self.reader)
    }

    pub fn ping(&mut self) -> Result<()> {
        let response = Self::expect_ok(self.request(&Command::Ping)?)?;
        match response.payload.as_deref() {
            Some(b"PONG") => Ok(()),
            _ => Err(HostError::Protocol("Unexpected PING reply".to_string())),
        }
    }

    pub fn list(&mut self) -> Result<Vec<HostRecord>> {
        Self::expect_ok(self.request(&Command::List)?)?.into_records()
    }

    pub fn get_by_mac(&mut self, mac: MacAddr) -> Result<Option<HostRecord>> {
        let response = self.request(&Command::GetByMac { mac })?;
        Self::optional_record(response)
    }

    pub fn get_by_ip(&mut self, ip: Ipv4Addr) -> Result<Option<HostRecord>> {
        let response = self.request(&Command::GetByIp { ip })?;
        Self::optional_record(response)
    }

    /// Add a reservation; a duplicate MAC or IP comes back as `Rejected { status: Conflict, .. }`
    pub fn insert(&mut self, record: &HostRecord) -> Result<()> {
        let response = self.request(&Command::Insert {
            record: record.clone(),
        })?;
        Self::expect_ok(response).map(|_| ())
    }

    /// Replace by MAC/IP, returning the displaced reservations
    pub fn update(&mut self, record: &HostRecord) -> Result<Vec<HostRecord>> {
        let response = self.request(&Command::Update {
            record: record.clone(),
        })?;
        Self::expect_ok(response)?.into_records()
    }

    pub fn remove_by_mac(&mut self, mac: MacAddr) -> Result<Option<HostRecord>> {
        let response = self.request(&Command::RemoveByMac { mac })?;
        Self::optional_record(response)
    }

    pub fn remove_by_ip(&mut self, ip: Ipv4Addr) -> Result<Option<HostRecord>> {
        let response = self.request(&Command::RemoveByIp { ip })?;
        Self::optional_record(response)
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn expect_ok(response: Response) -> Result<Response> {
        if response.is_ok() {
            return Ok(response);
        }
        Err(HostError::Rejected {
            status: response.status,
            message: response.message().unwrap_or_default(),
        })
    }

    fn optional_record(response: Response) -> Result<Option<HostRecord>> {
        if response.status == Status::NotFound {
            return Ok(None);
        }
        Self::expect_ok(response)?.into_record().map(Some)
    }
}
