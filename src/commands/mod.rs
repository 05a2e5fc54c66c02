//! Command Processing
//!
//! Receives decoded frames, executes them against the store, and returns the
//! reply to send back.
//!
//! ```text
//! Client Request
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  RESP Parser    │  (protocol module)
//! └────────┬────────┘
//!          │ Frame
//!          ▼
//! ┌─────────────────┐
//! │   Dispatcher    │  (this module)
//! │                 │
//! │  - Resolve      │
//! │  - Validate     │
//! │  - Execute      │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     Store       │  (storage module)
//! └─────────────────┘
//! ```
//!
//! Supported: `PING`, `ECHO`, `GET`, `SET`, `RPUSH`, `LPUSH`, `LRANGE`.

pub mod command;
pub mod dispatcher;

pub use command::{Arity, Command, CommandError, CommandKind, WRONGTYPE};
pub use dispatcher::Dispatcher;
