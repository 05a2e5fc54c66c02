//! Storage Module
//!
//! The in-memory store behind every command. One [`Store`] lives for the
//! whole process: created at startup, owned by the server, dropped at
//! shutdown. Nothing is persisted.
//!
//! ## Example
//!
//! ```
//! use respkv::storage::Store;
//! use bytes::Bytes;
//!
//! let mut store = Store::new();
//! store.append_list_tail(Bytes::from("list"), vec![Bytes::from("a"), Bytes::from("b")]);
//! assert_eq!(store.slice_list(b"list", 0, 1), vec![Bytes::from("a"), Bytes::from("b")]);
//! ```

pub mod engine;

pub use engine::{Store, StoredValue, StringEntry};
