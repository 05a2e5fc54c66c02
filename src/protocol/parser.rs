//! RESP Request Parser
//!
//! Two ways of reading a client request live here:
//!
//! - [`RespParser`]: an incremental parser for the full RESP grammar. The
//!   connection handler feeds it its read buffer and gets back either a
//!   complete value plus the number of bytes it consumed, or `None` when
//!   more bytes are needed.
//! - [`decode_frame`]: the flat tokenizer, which splits one request on runs
//!   of line terminators. A RESP array of bulk strings becomes a token
//!   sequence such as `["*2", "$4", "ECHO", "$3", "hey", ""]`.
//!
//! ## Parse results
//!
//! - `Ok(Some((value, consumed)))` - a value was parsed from the first `consumed` bytes
//! - `Ok(None)` - the message is incomplete
//! - `Err(ParseError)` - the bytes are not valid RESP

use crate::protocol::types::{prefix, RespValue, CRLF};
use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur during RESP parsing.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    #[error("invalid UTF-8: {0}")]
    InvalidUtf8(String),

    /// Bulk string length is negative (but not -1 for null)
    #[error("invalid bulk length: {0}")]
    InvalidBulkLength(i64),

    /// Array length is negative (but not -1 for null)
    #[error("invalid multibulk length: {0}")]
    InvalidArrayLength(i64),

    /// Protocol violation (missing CRLF, etc.)
    #[error("{0}")]
    ProtocolError(String),

    #[error("message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: usize, max: usize },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Maximum size for a single bulk string (512 MB, same as Redis). Over a
/// connection the read buffer cap (64 KB) is reached first.
pub const MAX_BULK_SIZE: usize = 512 * 1024 * 1024;

/// Maximum array nesting depth (prevent stack overflow)
pub const MAX_NESTING_DEPTH: usize = 32;

/// An incremental RESP parser.
///
/// # Example
///
/// ```
/// use respkv::protocol::{RespParser, RespValue};
///
/// let mut parser = RespParser::new();
/// let (value, consumed) = parser
///     .parse(b"*2\r\n$3\r\nGET\r\n$3\r\nfoo\r\n")
///     .unwrap()
///     .unwrap();
/// assert_eq!(consumed, 22);
/// assert!(matches!(value, RespValue::Array(ref items) if items.len() == 2));
/// ```
#[derive(Debug, Default)]
pub struct RespParser {
    /// Current nesting depth (for array parsing)
    depth: usize,
}

impl RespParser {
    pub fn new() -> Self {
        Self { depth: 0 }
    }

    /// Attempts to parse one RESP value from the start of `buf`.
    pub fn parse(&mut self, buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
        self.depth = 0;
        self.parse_value(buf)
    }

    fn parse_value(&mut self, buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
        if buf.is_empty() {
            return Ok(None);
        }

        if self.depth > MAX_NESTING_DEPTH {
            return Err(ParseError::ProtocolError(format!(
                "maximum nesting depth exceeded: {}",
                MAX_NESTING_DEPTH
            )));
        }

        match buf[0] {
            prefix::SIMPLE_STRING => Ok(read_line(&buf[1..])?
                .map(|(line, used)| (RespValue::SimpleString(line.to_string()), 1 + used))),
            prefix::ERROR => Ok(read_line(&buf[1..])?
                .map(|(line, used)| (RespValue::Error(line.to_string()), 1 + used))),
            prefix::INTEGER => Ok(read_number(&buf[1..])?
                .map(|(n, used)| (RespValue::Integer(n), 1 + used))),
            prefix::BULK_STRING => self.parse_bulk_string(buf),
            prefix::ARRAY => self.parse_array(buf),
            _ => self.parse_inline(buf),
        }
    }

    /// Parses a bulk string: `$<length>\r\n<data>\r\n`
    fn parse_bulk_string(&mut self, buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
        let (length, header) = match read_number(&buf[1..])? {
            Some((n, used)) => (n, 1 + used),
            None => return Ok(None),
        };

        if length == -1 {
            return Ok(Some((RespValue::Null, header)));
        }
        if length < 0 {
            return Err(ParseError::InvalidBulkLength(length));
        }

        let length = length as usize;
        if length > MAX_BULK_SIZE {
            return Err(ParseError::MessageTooLarge {
                size: length,
                max: MAX_BULK_SIZE,
            });
        }

        let total_needed = header + length + CRLF.len();
        if buf.len() < total_needed {
            return Ok(None);
        }

        if &buf[header + length..total_needed] != CRLF {
            return Err(ParseError::ProtocolError(
                "bulk string missing trailing CRLF".to_string(),
            ));
        }

        let data = Bytes::copy_from_slice(&buf[header..header + length]);
        Ok(Some((RespValue::BulkString(data), total_needed)))
    }

    /// Parses an array: `*<count>\r\n<elements...>`
    fn parse_array(&mut self, buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
        let (count, mut consumed) = match read_number(&buf[1..])? {
            Some((n, used)) => (n, 1 + used),
            None => return Ok(None),
        };

        if count == -1 {
            return Ok(Some((RespValue::Null, consumed)));
        }
        if count < 0 {
            return Err(ParseError::InvalidArrayLength(count));
        }

        let count = count as usize;
        // Cap the preallocation; a hostile count must not reserve memory up front.
        let mut elements = Vec::with_capacity(count.min(1024));

        self.depth += 1;
        for _ in 0..count {
            match self.parse_value(&buf[consumed..])? {
                Some((value, used)) => {
                    elements.push(value);
                    consumed += used;
                }
                None => return Ok(None),
            }
        }
        self.depth -= 1;

        Ok(Some((RespValue::Array(elements), consumed)))
    }

    /// Parses an inline command: `PING\r\n`, `SET foo bar\r\n`
    fn parse_inline(&mut self, buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
        let (line, used) = match read_line(buf)? {
            Some(found) => found,
            None => return Ok(None),
        };

        let elements: Vec<RespValue> = line
            .split_whitespace()
            .map(|part| RespValue::BulkString(Bytes::copy_from_slice(part.as_bytes())))
            .collect();

        if elements.is_empty() {
            return Err(ParseError::ProtocolError(
                "empty inline command".to_string(),
            ));
        }

        Ok(Some((RespValue::Array(elements), used)))
    }
}

/// Reads a CRLF-terminated UTF-8 line. Returns the line and the bytes used
/// including the terminator.
fn read_line(buf: &[u8]) -> ParseResult<Option<(&str, usize)>> {
    match find_crlf(buf) {
        Some(pos) => {
            let line = std::str::from_utf8(&buf[..pos])
                .map_err(|e| ParseError::InvalidUtf8(e.to_string()))?;
            Ok(Some((line, pos + CRLF.len())))
        }
        None => Ok(None),
    }
}

fn read_number(buf: &[u8]) -> ParseResult<Option<(i64, usize)>> {
    match read_line(buf)? {
        Some((line, used)) => {
            let n = line
                .parse::<i64>()
                .map_err(|_| ParseError::InvalidInteger(line.to_string()))?;
            Ok(Some((n, used)))
        }
        None => Ok(None),
    }
}

/// Finds the position of CRLF in the buffer.
#[inline]
fn find_crlf(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == CRLF)
}

/// Parses a single RESP message from bytes with a fresh parser.
pub fn parse_message(buf: &[u8]) -> ParseResult<Option<(RespValue, usize)>> {
    RespParser::new().parse(buf)
}

/// Splits one raw request into flat tokens.
///
/// The input is decoded as UTF-8 and split on every run of `\r`/`\n`
/// characters. Length markers such as `*3` and `$4` stay in the sequence,
/// so for a well-formed array of bulk strings the command name is token 2
/// and the arguments are tokens 4, 6, 8, .... A trailing terminator leaves
/// an empty last token.
///
/// ```
/// use respkv::protocol::decode_frame;
///
/// let tokens = decode_frame(b"*1\r\n$4\r\nPING\r\n").unwrap();
/// assert_eq!(tokens, vec!["*1", "$4", "PING", ""]);
/// ```
pub fn decode_frame(raw: &[u8]) -> ParseResult<Vec<String>> {
    let text = std::str::from_utf8(raw).map_err(|e| ParseError::InvalidUtf8(e.to_string()))?;

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_terminator = false;

    for ch in text.chars() {
        if ch == '\r' || ch == '\n' {
            if !in_terminator {
                tokens.push(std::mem::take(&mut current));
                in_terminator = true;
            }
        } else {
            in_terminator = false;
            current.push(ch);
        }
    }
    tokens.push(current);

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_string() {
        let (value, consumed) = parse_message(b"+OK\r\n").unwrap().unwrap();
        assert_eq!(value, RespValue::SimpleString("OK".to_string()));
        assert_eq!(consumed, 5);
    }

    #[test]
    fn test_parse_simple_string_incomplete() {
        assert!(parse_message(b"+OK").unwrap().is_none());
    }

    #[test]
    fn test_parse_error() {
        let (value, consumed) = parse_message(b"-ERR boom\r\n").unwrap().unwrap();
        assert_eq!(value, RespValue::Error("ERR boom".to_string()));
        assert_eq!(consumed, 11);
    }

    #[test]
    fn test_parse_integer() {
        let (value, _) = parse_message(b":-42\r\n").unwrap().unwrap();
        assert_eq!(value, RespValue::Integer(-42));
    }

    #[test]
    fn test_parse_invalid_integer() {
        let result = parse_message(b":not_a_number\r\n");
        assert!(matches!(result, Err(ParseError::InvalidInteger(_))));
    }

    #[test]
    fn test_parse_bulk_string() {
        let (value, consumed) = parse_message(b"$5\r\nhello\r\n").unwrap().unwrap();
        assert_eq!(value, RespValue::BulkString(Bytes::from("hello")));
        assert_eq!(consumed, 11);
    }

    #[test]
    fn test_parse_null_bulk_string() {
        let (value, consumed) = parse_message(b"$-1\r\n").unwrap().unwrap();
        assert_eq!(value, RespValue::Null);
        assert_eq!(consumed, 5);
    }

    #[test]
    fn test_parse_bulk_string_incomplete() {
        assert!(parse_message(b"$5\r\nhel").unwrap().is_none());
    }

    #[test]
    fn test_parse_bulk_string_bad_terminator() {
        let result = parse_message(b"$3\r\nfooXY");
        assert!(matches!(result, Err(ParseError::ProtocolError(_))));
    }

    #[test]
    fn test_parse_negative_bulk_length() {
        let result = parse_message(b"$-5\r\n");
        assert_eq!(result, Err(ParseError::InvalidBulkLength(-5)));
    }

    #[test]
    fn test_parse_array() {
        let input = b"*3\r\n$3\r\nSET\r\n$3\r\nfoo\r\n$3\r\nbar\r\n";
        let (value, consumed) = parse_message(input).unwrap().unwrap();
        assert_eq!(
            value,
            RespValue::Array(vec![
                RespValue::BulkString(Bytes::from("SET")),
                RespValue::BulkString(Bytes::from("foo")),
                RespValue::BulkString(Bytes::from("bar")),
            ])
        );
        assert_eq!(consumed, input.len());
    }

    #[test]
    fn test_parse_array_incomplete() {
        assert!(parse_message(b"*2\r\n$3\r\nGET\r\n").unwrap().is_none());
        assert!(parse_message(b"*2\r\n").unwrap().is_none());
    }

    #[test]
    fn test_parse_pipelined_consumes_first_only() {
        let input = b"*1\r\n$4\r\nPING\r\n*1\r\n$4\r\nPING\r\n";
        let (_, consumed) = parse_message(input).unwrap().unwrap();
        assert_eq!(consumed, 14);
    }

    #[test]
    fn test_parse_nested_array() {
        let (value, _) = parse_message(b"*2\r\n:1\r\n*2\r\n:2\r\n:3\r\n")
            .unwrap()
            .unwrap();
        assert_eq!(
            value,
            RespValue::Array(vec![
                RespValue::Integer(1),
                RespValue::Array(vec![RespValue::Integer(2), RespValue::Integer(3)]),
            ])
        );
    }

    #[test]
    fn test_parse_too_deep() {
        let mut input = Vec::new();
        for _ in 0..=MAX_NESTING_DEPTH + 1 {
            input.extend_from_slice(b"*1\r\n");
        }
        input.extend_from_slice(b":1\r\n");
        assert!(matches!(
            parse_message(&input),
            Err(ParseError::ProtocolError(_))
        ));
    }

    #[test]
    fn test_parse_inline_command() {
        let (value, consumed) = parse_message(b"SET foo bar\r\n").unwrap().unwrap();
        assert_eq!(consumed, 13);
        assert_eq!(
            value,
            RespValue::Array(vec![
                RespValue::BulkString(Bytes::from("SET")),
                RespValue::BulkString(Bytes::from("foo")),
                RespValue::BulkString(Bytes::from("bar")),
            ])
        );
    }

    #[test]
    fn test_parse_empty_inline_command() {
        assert!(matches!(
            parse_message(b"   \r\n"),
            Err(ParseError::ProtocolError(_))
        ));
    }

    #[test]
    fn test_binary_safe_bulk_string() {
        let (value, _) = parse_message(b"$5\r\nhel\x00o\r\n").unwrap().unwrap();
        assert_eq!(value, RespValue::BulkString(Bytes::from(&b"hel\x00o"[..])));
    }

    #[test]
    fn test_decode_frame_ping() {
        let tokens = decode_frame(b"*1\r\n$4\r\nPING\r\n").unwrap();
        assert_eq!(tokens, vec!["*1", "$4", "PING", ""]);
    }

    #[test]
    fn test_decode_frame_echo() {
        let tokens = decode_frame(b"*2\r\n$4\r\nECHO\r\n$3\r\nhey\r\n").unwrap();
        assert_eq!(tokens, vec!["*2", "$4", "ECHO", "$3", "hey", ""]);
    }

    #[test]
    fn test_decode_frame_collapses_terminator_runs() {
        let tokens = decode_frame(b"*1\r\n\r\n\n$4\rPING").unwrap();
        assert_eq!(tokens, vec!["*1", "$4", "PING"]);
    }

    #[test]
    fn test_decode_frame_leading_terminator() {
        let tokens = decode_frame(b"\r\nPING").unwrap();
        assert_eq!(tokens, vec!["", "PING"]);
    }

    #[test]
    fn test_decode_frame_empty_input() {
        assert_eq!(decode_frame(b"").unwrap(), vec![""]);
    }

    #[test]
    fn test_decode_frame_rejects_invalid_utf8() {
        assert!(matches!(
            decode_frame(b"*1\r\n$2\r\n\xff\xfe\r\n"),
            Err(ParseError::InvalidUtf8(_))
        ));
    }
}
