//! Connection Handler
//!
//! Each accepted client gets a [`ConnectionHandler`] running as its own task
//! on the event loop thread. The handler owns the client's read buffer; the
//! store is shared through the [`Dispatcher`].
//!
//! ## Connection Lifecycle
//!
//! ```text
//! 1. Client connects
//!        │
//!        ▼
//! 2. ┌──────────────────────────────┐
//!    │      Main Loop               │
//!    │                              │
//!    │  Parse every complete frame  │
//!    │  in the buffer, dispatch it, │
//!    │  queue the reply             │
//!    │              │               │
//!    │              ▼               │
//!    │  Flush queued replies        │
//!    │              │               │
//!    │              ▼               │
//!    │  Read up to 1 KiB more       │
//!    │              │               │
//!    │         [Loop back]          │
//!    └──────────────────────────────┘
//!        │
//!        ▼
//! 3. EOF or I/O error: the task ends
//! ```
//!
//! ## Buffer Management
//!
//! TCP is a byte stream: one read may hold half a request or several
//! pipelined ones. Bytes accumulate in a `BytesMut` until the parser reports
//! a complete value, and replies go out in request order.
//!
//! Bytes that are not valid RESP get an `-ERR Protocol error` reply and are
//! dropped along with everything else buffered; the connection stays open.

use crate::commands::Dispatcher;
use crate::protocol::{Frame, RespParser, RespValue};
use bytes::BytesMut;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::{debug, error, info, trace, warn};

/// Maximum number of bytes taken from the socket per read
pub const READ_CHUNK_SIZE: usize = 1024;

/// Maximum size for the read buffer (64 KB). This is also the effective
/// cap on a single request, well below the parser's `MAX_BULK_SIZE`.
pub const MAX_BUFFER_SIZE: usize = 64 * 1024;

const INITIAL_BUFFER_SIZE: usize = 4096;

/// Counters shared by every connection.
#[derive(Debug, Default)]
pub struct ConnectionStats {
    /// Total number of connections accepted
    pub connections_accepted: AtomicU64,
    /// Currently open connections
    pub active_connections: AtomicU64,
    /// Recognized commands executed
    pub commands_processed: AtomicU64,
    /// Frames that matched no command
    pub commands_ignored: AtomicU64,
    /// Malformed requests that were discarded
    pub protocol_errors: AtomicU64,
    pub bytes_read: AtomicU64,
    pub bytes_written: AtomicU64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn command_processed(&self) {
        self.commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn command_ignored(&self) {
        self.commands_ignored.fetch_add(1, Ordering::Relaxed);
    }

    pub fn protocol_error(&self) {
        self.protocol_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn bytes_written(&self, count: usize) {
        self.bytes_written.fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Serves one client over any byte stream.
pub struct ConnectionHandler<S> {
    stream: BufWriter<S>,

    /// Client's address (for logging)
    addr: SocketAddr,

    buffer: BytesMut,

    dispatcher: Dispatcher,

    parser: RespParser,

    stats: Arc<ConnectionStats>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(
        stream: S,
        addr: SocketAddr,
        dispatcher: Dispatcher,
        stats: Arc<ConnectionStats>,
    ) -> Self {
        stats.connection_opened();

        Self {
            stream: BufWriter::new(stream),
            addr,
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            dispatcher,
            parser: RespParser::new(),
            stats,
        }
    }

    /// Serves the client until it disconnects or the connection fails.
    pub async fn run(mut self) -> Result<(), ConnectionError> {
        info!(client = %self.addr, "Client connected");

        let result = self.main_loop().await;

        match &result {
            Ok(()) => info!(client = %self.addr, "Client disconnected"),
            Err(ConnectionError::ClientDisconnected) => {
                info!(client = %self.addr, "Client disconnected")
            }
            Err(ConnectionError::IoError(io_err))
                if io_err.kind() == std::io::ErrorKind::ConnectionReset =>
            {
                debug!(client = %self.addr, "Connection reset by client")
            }
            Err(e) => warn!(client = %self.addr, error = %e, "Connection error"),
        }

        self.stats.connection_closed();
        result
    }

    async fn main_loop(&mut self) -> Result<(), ConnectionError> {
        loop {
            let mut replied = false;

            while let Some(value) = self.try_parse_value().await? {
                let Some(frame) = Frame::from_resp(value) else {
                    debug!(client = %self.addr, "Ignoring value that is not a command");
                    continue;
                };

                match self.dispatcher.dispatch(&frame) {
                    Some(reply) => {
                        self.stats.command_processed();
                        self.queue_reply(&reply).await?;
                        replied = true;
                    }
                    None => self.stats.command_ignored(),
                }
            }

            if replied {
                self.stream.flush().await?;
            }

            self.read_more_data().await?;
        }
    }

    /// Takes one complete value off the front of the buffer.
    ///
    /// On malformed input the client gets an error reply and the buffer is
    /// cleared, so the next read starts from a clean slate.
    async fn try_parse_value(&mut self) -> Result<Option<RespValue>, ConnectionError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        match self.parser.parse(&self.buffer) {
            Ok(Some((value, consumed))) => {
                let _ = self.buffer.split_to(consumed);
                trace!(
                    client = %self.addr,
                    consumed = consumed,
                    remaining = self.buffer.len(),
                    "Parsed frame"
                );
                Ok(Some(value))
            }
            Ok(None) => {
                trace!(
                    client = %self.addr,
                    buffered = self.buffer.len(),
                    "Incomplete frame, need more data"
                );
                Ok(None)
            }
            Err(e) => {
                warn!(client = %self.addr, error = %e, "Protocol error");
                let reply = RespValue::error(format!("ERR Protocol error: {}", e));
                self.queue_reply(&reply).await?;
                self.stream.flush().await?;
                self.stats.protocol_error();
                self.buffer.clear();
                Ok(None)
            }
        }
    }

    async fn read_more_data(&mut self) -> Result<(), ConnectionError> {
        if self.buffer.len() >= MAX_BUFFER_SIZE {
            error!(
                client = %self.addr,
                size = self.buffer.len(),
                "Buffer size limit exceeded"
            );
            return Err(ConnectionError::BufferFull);
        }

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        let n = self.stream.read(&mut chunk).await?;

        if n == 0 {
            if self.buffer.is_empty() {
                return Err(ConnectionError::ClientDisconnected);
            }
            return Err(ConnectionError::UnexpectedEof);
        }

        self.buffer.extend_from_slice(&chunk[..n]);
        self.stats.bytes_read(n);
        trace!(client = %self.addr, bytes = n, "Read data");

        Ok(())
    }

    /// Writes a reply into the outgoing buffer. The caller flushes.
    async fn queue_reply(&mut self, reply: &RespValue) -> Result<(), ConnectionError> {
        let bytes = reply.serialize();
        self.stream.write_all(&bytes).await?;
        self.stats.bytes_written(bytes.len());
        trace!(client = %self.addr, bytes = bytes.len(), "Queued reply");
        Ok(())
    }
}

/// Errors that end a connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Client closed the connection between requests
    #[error("Client disconnected")]
    ClientDisconnected,

    /// Client closed the connection mid-request
    #[error("Unexpected end of stream")]
    UnexpectedEof,

    #[error("Buffer size limit exceeded")]
    BufferFull,
}

/// Runs a [`ConnectionHandler`] to completion.
///
/// Errors are logged and swallowed: a failing client never affects the
/// server or any other connection.
pub async fn handle_connection<S>(
    stream: S,
    addr: SocketAddr,
    dispatcher: Dispatcher,
    stats: Arc<ConnectionStats>,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let handler = ConnectionHandler::new(stream, addr, dispatcher, stats);
    if let Err(e) = handler.run().await {
        match e {
            ConnectionError::ClientDisconnected => {}
            ConnectionError::IoError(ref io_err)
                if io_err.kind() == std::io::ErrorKind::ConnectionReset => {}
            _ => {
                debug!(client = %addr, error = %e, "Connection ended with error");
            }
        }
    }
}
