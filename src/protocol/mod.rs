//! RESP Protocol Implementation
//!
//! This module turns raw client bytes into command frames and replies into
//! wire bytes.
//!
//! ## Modules
//!
//! - `types`: the `RespValue` enum and the RESP encoders
//! - `parser`: incremental parser and the flat request tokenizer
//! - `frame`: `Frame`, a request reduced to command name + arguments
//!
//! ## Example
//!
//! ```
//! use respkv::protocol::{parse_message, Frame, RespValue};
//! use bytes::Bytes;
//!
//! let data = b"*2\r\n$3\r\nGET\r\n$3\r\nfoo\r\n";
//! let (value, consumed) = parse_message(data).unwrap().unwrap();
//! assert_eq!(consumed, data.len());
//!
//! let frame = Frame::from_resp(value).unwrap();
//! assert!(frame.is_named("GET"));
//!
//! let reply = RespValue::bulk_string(Bytes::from("bar"));
//! assert_eq!(reply.serialize(), b"$3\r\nbar\r\n");
//! ```

pub mod frame;
pub mod parser;
pub mod types;

pub use frame::Frame;
pub use parser::{decode_frame, parse_message, ParseError, ParseResult, RespParser};
pub use types::{
    encode_array, encode_integer, encode_null_array, encode_null_bulk_string, encode_string,
    RespValue,
};
