//! TCP Server
//!
//! Accepts connections and dispatches to worker threads.

use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, TrySendError};

use crate::config::Config;
use crate::error::{HostError, Result};
use crate::protocol::{write_response, Response};
use crate::service::HostService;

use super::Connection;

/// How long the accept loop sleeps when no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// TCP server exposing a [`HostService`]
///
/// ## Threading
/// - The calling thread runs a non-blocking accept loop
/// - Accepted streams go through a bounded channel (`max_connections`)
/// - `worker_threads` workers each serve one connection at a time
pub struct Server {
    config: Config,
    service: Arc<dyn HostService>,
    listener: Option<TcpListener>,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Create a new server with the given config and service
    pub fn new(config: Config, service: Arc<dyn HostService>) -> Self {
        Self {
            config,
            service,
            listener: None,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Bind the listen address and return the bound socket address
    ///
    /// Called by `run` if not called beforehand. Binding separately lets
    /// callers use port 0 and learn the real port.
    pub fn bind(&mut self) -> Result<SocketAddr> {
        if let Some(listener) = &self.listener {
            return Ok(listener.local_addr()?);
        }

        let listener = TcpListener::bind(&self.config.listen_addr).map_err(|e| {
            tracing::error!("Failed to bind {}: {}", self.config.listen_addr, e);
            HostError::Io(e)
        })?;
        listener.set_nonblocking(true)?;

        let addr = listener.local_addr()?;
        tracing::info!("Listening on {}", addr);
        self.listener = Some(listener);
        Ok(addr)
    }

    /// Flag that stops the accept loop once set
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// Signal the server to shutdown gracefully
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Start the server (blocking until shutdown)
    ///
    /// Workers finish their current connection before `run` returns.
    pub fn run(&mut self) -> Result<()> {
        self.bind()?;
        let listener = match self.listener.take() {
            Some(listener) => listener,
            None => return Err(HostError::Config("listener not bound".to_string())),
        };

        let (tx, rx) = channel::bounded::<TcpStream>(self.config.max_connections);
        let workers: Vec<JoinHandle<()>> = (0..self.config.worker_threads)
            .map(|id| self.spawn_worker(id, rx.clone()))
            .collect::<std::io::Result<_>>()?;
        drop(rx);

        while !self.shutdown.load(Ordering::SeqCst) {
            match listener.accept() {
                Ok((stream, peer)) => {
                    // Some platforms hand out non-blocking sockets from a non-blocking listener
                    if let Err(e) = stream.set_nonblocking(false) {
                        tracing::warn!("Dropping connection from {}: {}", peer, e);
                        continue;
                    }

                    match tx.try_send(stream) {
                        Ok(()) => {}
                        Err(TrySendError::Full(mut stream)) => {
                            tracing::warn!("Connection queue full, rejecting {}", peer);
                            let _ = write_response(&mut stream, &Response::error("Server busy"));
                        }
                        Err(TrySendError::Disconnected(_)) => {
                            tracing::error!("All workers have exited, stopping accept loop");
                            break;
                        }
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    tracing::warn!("Accept failed: {}", e);
                }
            }
        }

        tracing::info!("Shutting down, waiting for {} workers", workers.len());
        drop(tx);
        for worker in workers {
            if worker.join().is_err() {
                tracing::error!("Worker thread panicked");
            }
        }

        Ok(())
    }

    fn spawn_worker(&self, id: usize, rx: Receiver<TcpStream>) -> std::io::Result<JoinHandle<()>> {
        let service = Arc::clone(&self.service);
        let read_timeout_ms = self.config.read_timeout_ms;
        let write_timeout_ms = self.config.write_timeout_ms;

        thread::Builder::new()
            .name(format!("dhcphosts-worker-{}", id))
            .spawn(move || {
                for stream in rx.iter() {
                    let result = Connection::new(stream, Arc::clone(&service)).and_then(|mut conn| {
                        conn.set_timeouts(read_timeout_ms, write_timeout_ms)?;
                        conn.handle()
                    });

                    if let Err(e) = result {
                        tracing::warn!("Connection ended with error: {}", e);
                    }
                }
                tracing::debug!("Worker {} stopped", id);
            })
    }
}
