//! # respkv - A Small Redis-Compatible Key-Value Server
//!
//! respkv speaks RESP over TCP and keeps everything in memory: strings with
//! optional expiry, and lists.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                    respkv (one event loop thread)                │
//! │                                                                  │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐           │
//! │  │   Server    │───>│ Connection  │───>│ Dispatcher  │           │
//! │  │ (Listener)  │    │  Handler    │    │             │           │
//! │  └─────────────┘    └──────┬──────┘    └──────┬──────┘           │
//! │                            │                  │                  │
//! │                            ▼                  ▼                  │
//! │                     ┌─────────────┐    ┌─────────────┐           │
//! │                     │    RESP     │    │    Store    │           │
//! │                     │   Parser    │    │  (HashMap)  │           │
//! │                     └─────────────┘    └─────────────┘           │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```no_run
//! use respkv::Server;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> std::io::Result<()> {
//!     let server = Server::bind("127.0.0.1:6379").await?;
//!     server.run_until(tokio::signal::ctrl_c()).await
//! }
//! ```
//!
//! ## Supported Commands
//!
//! - `PING`
//! - `ECHO message`
//! - `GET key`
//! - `SET key value [EX seconds | PX milliseconds]`
//! - `RPUSH key value [value ...]` / `LPUSH key value [value ...]`
//! - `LRANGE key start stop`
//!
//! Anything else gets no reply at all.
//!
//! ## Module Overview
//!
//! - [`protocol`]: RESP encoders, parser and request frames
//! - [`storage`]: the store, with lazy expiry
//! - [`commands`]: command matching and execution
//! - [`connection`]: per-client read/dispatch/reply loop
//! - [`server`]: listener and accept loop
//!
//! ## Expiry
//!
//! Expiry is lazy only. A string whose expiry time has passed reads as
//! missing but stays in memory until overwritten.

pub mod commands;
pub mod connection;
pub mod protocol;
pub mod server;
pub mod storage;

pub use commands::{Command, CommandKind, Dispatcher};
pub use connection::{handle_connection, ConnectionStats};
pub use protocol::{Frame, ParseError, RespParser, RespValue};
pub use server::Server;
pub use storage::{Store, StoredValue};

/// The default port respkv listens on (same as Redis)
pub const DEFAULT_PORT: u16 = 6379;

/// The default host respkv binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
