//! Client Connections
//!
//! One [`ConnectionHandler`] per connected client. Handlers are generic over
//! the byte stream, so tests drive them with in-memory mocks and the server
//! drives them with `TcpStream`s.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 Server                       │
//! │             accept() loop                    │
//! └──────────────────────┬───────────────────────┘
//!                        │ spawn_local
//!                        ▼
//! ┌──────────────────────────────────────────────┐
//! │              ConnectionHandler               │
//! │                                              │
//! │  read ──> parse ──> dispatch ──> reply       │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! let dispatcher = Dispatcher::new(Rc::new(RefCell::new(Store::new())));
//! let stats = Arc::new(ConnectionStats::new());
//!
//! let (stream, addr) = listener.accept().await?;
//! tokio::task::spawn_local(handle_connection(stream, addr, dispatcher.clone(), stats));
//! ```

pub mod handler;

pub use handler::{
    handle_connection, ConnectionError, ConnectionHandler, ConnectionStats, READ_CHUNK_SIZE,
};
