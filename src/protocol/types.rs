//! RESP (Redis Serialization Protocol) Data Types
//!
//! This module defines the reply values the server writes back to clients
//! and the low-level encoders that turn them into wire bytes.
//!
//! ## Protocol Format
//!
//! Each RESP type starts with a type prefix byte:
//! - `+` Simple String
//! - `-` Error
//! - `:` Integer
//! - `$` Bulk String
//! - `*` Array
//!
//! All types are terminated with CRLF (`\r\n`).
//!
//! ## Examples
//!
//! Simple String: `+OK\r\n`
//! Error: `-ERR syntax error\r\n`
//! Integer: `:3\r\n`
//! Bulk String: `$3\r\nbar\r\n`
//! Array: `*2\r\n$1\r\na\r\n$1\r\nb\r\n`
//! Null Bulk String: `$-1\r\n`
//! Null (empty) Array: `*0\r\n`

use bytes::Bytes;

/// The CRLF terminator used in RESP protocol
pub const CRLF: &[u8] = b"\r\n";

/// Reply for a key that does not exist (or has lazily expired).
pub const NULL_BULK_STRING: &[u8] = b"$-1\r\n";

/// Reply for an empty or invalid range.
pub const NULL_ARRAY: &[u8] = b"*0\r\n";

/// RESP protocol type prefixes
pub mod prefix {
    pub const SIMPLE_STRING: u8 = b'+';
    pub const ERROR: u8 = b'-';
    pub const INTEGER: u8 = b':';
    pub const BULK_STRING: u8 = b'$';
    pub const ARRAY: u8 = b'*';
}

/// Encodes an optional payload as a bulk string: `$<len>\r\n<value>\r\n`.
///
/// `None` encodes to an empty byte sequence, not to the null bulk string.
/// Use [`encode_null_bulk_string`] for an absent key.
pub fn encode_string(value: Option<&[u8]>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(value) = value {
        write_bulk(&mut buf, value);
    }
    buf
}

/// The fixed `$-1\r\n` marker.
pub fn encode_null_bulk_string() -> Vec<u8> {
    NULL_BULK_STRING.to_vec()
}

/// The fixed `*0\r\n` marker.
pub fn encode_null_array() -> Vec<u8> {
    NULL_ARRAY.to_vec()
}

/// Encodes an integer as `:<n>\r\n`. Only negative values carry a sign.
pub fn encode_integer(value: i64) -> Vec<u8> {
    let mut buf = Vec::new();
    write_integer(&mut buf, value);
    buf
}

/// Encodes a sequence of values as an array.
///
/// Each element is encoded according to its own kind (integer, nested
/// array, bulk string, ...). An empty sequence encodes to the null array.
pub fn encode_array(elements: &[RespValue]) -> Vec<u8> {
    let mut buf = Vec::new();
    write_array(&mut buf, elements);
    buf
}

fn write_bulk(buf: &mut Vec<u8>, data: &[u8]) {
    buf.push(prefix::BULK_STRING);
    buf.extend_from_slice(data.len().to_string().as_bytes());
    buf.extend_from_slice(CRLF);
    buf.extend_from_slice(data);
    buf.extend_from_slice(CRLF);
}

fn write_integer(buf: &mut Vec<u8>, value: i64) {
    buf.push(prefix::INTEGER);
    buf.extend_from_slice(value.to_string().as_bytes());
    buf.extend_from_slice(CRLF);
}

fn write_array(buf: &mut Vec<u8>, elements: &[RespValue]) {
    if elements.is_empty() {
        buf.extend_from_slice(NULL_ARRAY);
        return;
    }

    buf.push(prefix::ARRAY);
    buf.extend_from_slice(elements.len().to_string().as_bytes());
    buf.extend_from_slice(CRLF);
    for element in elements {
        element.serialize_into(buf);
    }
}

/// Represents a value in the RESP protocol.
///
/// Used both for values produced by the parser and for replies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RespValue {
    /// Simple strings are used for non-binary safe strings.
    /// They cannot contain CRLF characters.
    /// Format: `+<string>\r\n`
    SimpleString(String),

    /// Errors are similar to simple strings but indicate an error condition.
    /// Format: `-<error message>\r\n`
    Error(String),

    /// 64-bit signed integers.
    /// Format: `:<integer>\r\n`
    Integer(i64),

    /// Bulk strings are binary-safe strings.
    /// Format: `$<length>\r\n<data>\r\n`
    BulkString(Bytes),

    /// Null bulk string, `$-1\r\n`
    Null,

    /// Arrays can contain any RESP type, including nested arrays.
    /// Format: `*<count>\r\n<element1><element2>...`
    /// An empty array is written as `*0\r\n`.
    Array(Vec<RespValue>),
}

impl RespValue {
    /// Creates a new simple string response.
    ///
    /// # Example
    /// ```
    /// use respkv::protocol::types::RespValue;
    /// let ok = RespValue::simple_string("OK");
    /// assert_eq!(ok.serialize(), b"+OK\r\n");
    /// ```
    pub fn simple_string(s: impl Into<String>) -> Self {
        RespValue::SimpleString(s.into())
    }

    /// Creates a new error response.
    pub fn error(s: impl Into<String>) -> Self {
        RespValue::Error(s.into())
    }

    /// Creates a new integer response.
    pub fn integer(n: i64) -> Self {
        RespValue::Integer(n)
    }

    /// Creates a new bulk string response.
    ///
    /// # Example
    /// ```
    /// use respkv::protocol::types::RespValue;
    /// use bytes::Bytes;
    /// let bulk = RespValue::bulk_string(Bytes::from("bar"));
    /// assert_eq!(bulk.serialize(), b"$3\r\nbar\r\n");
    /// ```
    pub fn bulk_string(data: impl Into<Bytes>) -> Self {
        RespValue::BulkString(data.into())
    }

    /// Creates a null response.
    pub fn null() -> Self {
        RespValue::Null
    }

    /// Creates an array response.
    pub fn array(values: Vec<RespValue>) -> Self {
        RespValue::Array(values)
    }

    pub fn ok() -> Self {
        RespValue::SimpleString("OK".to_string())
    }

    pub fn pong() -> Self {
        RespValue::SimpleString("PONG".to_string())
    }

    /// Serializes the RESP value to bytes for sending over the wire.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf);
        buf
    }

    /// Serializes the RESP value into an existing buffer.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        match self {
            RespValue::SimpleString(s) => {
                buf.push(prefix::SIMPLE_STRING);
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(CRLF);
            }
            RespValue::Error(s) => {
                buf.push(prefix::ERROR);
                buf.extend_from_slice(s.as_bytes());
                buf.extend_from_slice(CRLF);
            }
            RespValue::Integer(n) => write_integer(buf, *n),
            RespValue::BulkString(data) => write_bulk(buf, data),
            RespValue::Null => buf.extend_from_slice(NULL_BULK_STRING),
            RespValue::Array(values) => write_array(buf, values),
        }
    }
}

impl From<i64> for RespValue {
    fn from(n: i64) -> Self {
        RespValue::Integer(n)
    }
}

impl From<Bytes> for RespValue {
    fn from(data: Bytes) -> Self {
        RespValue::BulkString(data)
    }
}

impl From<&str> for RespValue {
    fn from(s: &str) -> Self {
        RespValue::BulkString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_string() {
        assert_eq!(encode_string(Some(&b"PONG"[..])), b"$4\r\nPONG\r\n");
        assert_eq!(encode_string(Some(&b""[..])), b"$0\r\n\r\n");
    }

    #[test]
    fn test_encode_string_none_is_empty() {
        assert!(encode_string(None).is_empty());
    }

    #[test]
    fn test_encode_string_counts_bytes() {
        // "héllo" is five characters but six bytes
        assert_eq!(
            encode_string(Some("héllo".as_bytes())),
            "$6\r\nhéllo\r\n".as_bytes()
        );
    }

    #[test]
    fn test_null_markers() {
        assert_eq!(encode_null_bulk_string(), b"$-1\r\n");
        assert_eq!(encode_null_array(), b"*0\r\n");
    }

    #[test]
    fn test_encode_integer() {
        assert_eq!(encode_integer(3), b":3\r\n");
        assert_eq!(encode_integer(0), b":0\r\n");
        assert_eq!(encode_integer(-42), b":-42\r\n");
    }

    #[test]
    fn test_encode_array() {
        assert_eq!(encode_array(&[]), b"*0\r\n");
        assert_eq!(
            encode_array(&["a".into(), "b".into()]),
            b"*2\r\n$1\r\na\r\n$1\r\nb\r\n"
        );
        assert_eq!(
            encode_array(&[
                RespValue::integer(1),
                RespValue::integer(2),
                RespValue::integer(3)
            ]),
            b"*3\r\n:1\r\n:2\r\n:3\r\n"
        );
    }

    #[test]
    fn test_encode_array_mixed_and_nested() {
        let elements = vec![
            RespValue::integer(1),
            RespValue::array(vec!["x".into(), RespValue::integer(-2)]),
            "y".into(),
        ];
        assert_eq!(
            encode_array(&elements),
            b"*3\r\n:1\r\n*2\r\n$1\r\nx\r\n:-2\r\n$1\r\ny\r\n"
        );
    }

    #[test]
    fn test_nested_empty_array_uses_null_marker() {
        let value = RespValue::array(vec![RespValue::array(vec![])]);
        assert_eq!(value.serialize(), b"*1\r\n*0\r\n");
    }

    #[test]
    fn test_simple_string_serialize() {
        assert_eq!(RespValue::ok().serialize(), b"+OK\r\n");
        assert_eq!(RespValue::pong().serialize(), b"+PONG\r\n");
    }

    #[test]
    fn test_error_serialize() {
        let value = RespValue::error("ERR syntax error");
        assert_eq!(value.serialize(), b"-ERR syntax error\r\n");
    }

    #[test]
    fn test_null_serialize() {
        assert_eq!(RespValue::null().serialize(), b"$-1\r\n");
    }
}
