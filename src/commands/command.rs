//! Supported Commands
//!
//! The command set is closed: every request either resolves to one of the
//! [`CommandKind`] variants or is not a command at all.
//!
//! ## Commands
//!
//! - `PING` - reply `PONG`
//! - `ECHO message` - reply with `message`
//! - `GET key` - string value, or null
//! - `SET key value [EX seconds | PX milliseconds]` - store a string
//! - `RPUSH key value [value ...]` - push onto the tail of a list
//! - `LPUSH key value [value ...]` - push onto the head of a list
//! - `LRANGE key start stop` - inclusive range, negative indices count from the end
//!
//! Matching is on the case-insensitive name plus the request's length in the
//! flat token layout (see [`Frame::token_len`]).

use crate::protocol::{Frame, RespValue};
use crate::storage::{Store, StoredValue};
use bytes::Bytes;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Error text for a command run against a key holding the other value type.
pub const WRONGTYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

/// Argument errors. The `Display` text is the RESP error reply.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("ERR value is not an integer or out of range")]
    NotAnInteger,

    #[error("ERR syntax error")]
    SyntaxError,

    #[error("ERR invalid expire time in '{0}' command")]
    InvalidExpireTime(&'static str),

    #[error("ERR wrong number of arguments for '{0}' command")]
    WrongArity(&'static str),
}

/// Accepted request lengths, counted in flat tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, token_len: usize) -> bool {
        match self {
            Arity::Exact(n) => token_len == n,
            Arity::AtLeast(n) => token_len >= n,
        }
    }
}

/// The supported commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Get,
    Set,
    Ping,
    Echo,
    RPush,
    LPush,
    LRange,
}

impl CommandKind {
    /// Every command, in dispatch order.
    pub const ALL: [CommandKind; 7] = [
        CommandKind::Get,
        CommandKind::Set,
        CommandKind::Ping,
        CommandKind::Echo,
        CommandKind::RPush,
        CommandKind::LPush,
        CommandKind::LRange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CommandKind::Get => "GET",
            CommandKind::Set => "SET",
            CommandKind::Ping => "PING",
            CommandKind::Echo => "ECHO",
            CommandKind::RPush => "RPUSH",
            CommandKind::LPush => "LPUSH",
            CommandKind::LRange => "LRANGE",
        }
    }

    pub fn arity(self) -> Arity {
        match self {
            CommandKind::Ping => Arity::Exact(4),
            CommandKind::Echo | CommandKind::Get => Arity::Exact(6),
            CommandKind::Set | CommandKind::RPush | CommandKind::LPush => Arity::AtLeast(8),
            CommandKind::LRange => Arity::Exact(10),
        }
    }

    /// Returns true if `frame` is a request for this command.
    pub fn matches(self, frame: &Frame) -> bool {
        frame.is_named(self.name()) && self.arity().accepts(frame.token_len())
    }
}

/// A request with its arguments extracted and typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ping,
    Echo {
        message: Bytes,
    },
    Get {
        key: Bytes,
    },
    Set {
        key: Bytes,
        value: Bytes,
        ttl: Option<Duration>,
    },
    RPush {
        key: Bytes,
        values: Vec<Bytes>,
    },
    LPush {
        key: Bytes,
        values: Vec<Bytes>,
    },
    LRange {
        key: Bytes,
        start: i64,
        stop: i64,
    },
}

impl Command {
    /// Extracts the arguments of `kind` from `frame`.
    pub fn from_frame(kind: CommandKind, frame: &Frame) -> Result<Self, CommandError> {
        let arg = |index: usize| {
            frame
                .arg(index)
                .cloned()
                .ok_or(CommandError::WrongArity(kind.name()))
        };

        let command = match kind {
            CommandKind::Ping => Command::Ping,
            CommandKind::Echo => Command::Echo { message: arg(0)? },
            CommandKind::Get => Command::Get { key: arg(0)? },
            CommandKind::Set => Command::Set {
                key: arg(0)?,
                value: arg(1)?,
                ttl: parse_set_options(frame.args().get(2..).unwrap_or_default())?,
            },
            CommandKind::RPush => Command::RPush {
                key: arg(0)?,
                values: push_values(kind, frame)?,
            },
            CommandKind::LPush => Command::LPush {
                key: arg(0)?,
                values: push_values(kind, frame)?,
            },
            CommandKind::LRange => Command::LRange {
                key: arg(0)?,
                start: parse_integer(&arg(1)?)?,
                stop: parse_integer(&arg(2)?)?,
            },
        };

        Ok(command)
    }

    /// Runs the command against `store` and returns the reply.
    ///
    /// `now` is the time used both to stamp new expiries and to decide
    /// whether existing strings have expired.
    pub fn execute(self, store: &mut Store, now: Instant) -> RespValue {
        match self {
            Command::Ping => RespValue::pong(),
            Command::Echo { message } => RespValue::bulk_string(message),
            Command::Get { key } => match store.get_live(&key, now) {
                None => RespValue::null(),
                Some(StoredValue::String(entry)) => RespValue::bulk_string(entry.value.clone()),
                Some(StoredValue::List(_)) => RespValue::error(WRONGTYPE),
            },
            Command::Set { key, value, ttl } => {
                let expires_at = match ttl {
                    Some(ttl) => match now.checked_add(ttl) {
                        Some(at) => Some(at),
                        None => {
                            return RespValue::error(
                                CommandError::InvalidExpireTime("set").to_string(),
                            )
                        }
                    },
                    None => None,
                };
                store.set_string(key, value, expires_at);
                RespValue::ok()
            }
            Command::RPush { key, values } => {
                if holds_string(store, &key, now) {
                    return RespValue::error(WRONGTYPE);
                }
                RespValue::integer(store.append_list_tail(key, values) as i64)
            }
            Command::LPush { key, values } => {
                if holds_string(store, &key, now) {
                    return RespValue::error(WRONGTYPE);
                }
                RespValue::integer(store.prepend_list_head(key, values) as i64)
            }
            Command::LRange { key, start, stop } => lrange(store, &key, start, stop, now),
        }
    }
}

fn holds_string(store: &Store, key: &[u8], now: Instant) -> bool {
    matches!(store.get_live(key, now), Some(StoredValue::String(_)))
}

fn lrange(store: &Store, key: &[u8], start: i64, stop: i64, now: Instant) -> RespValue {
    let len = match store.get_live(key, now) {
        Some(StoredValue::List(list)) => list.len() as i64,
        _ => return RespValue::array(Vec::new()),
    };

    let start = if start < 0 { len + start } else { start };
    let stop = if stop < 0 { len + stop } else { stop };

    // Out-of-range bounds are not clamped.
    if start < 0 || stop >= len || start > stop {
        return RespValue::array(Vec::new());
    }

    let items = store.slice_list(key, start as usize, stop as usize);
    RespValue::array(items.into_iter().map(RespValue::BulkString).collect())
}

fn push_values(kind: CommandKind, frame: &Frame) -> Result<Vec<Bytes>, CommandError> {
    match frame.args().get(1..) {
        Some(values) if !values.is_empty() => Ok(values.to_vec()),
        _ => Err(CommandError::WrongArity(kind.name())),
    }
}

/// Parses `[EX seconds | PX milliseconds]`.
fn parse_set_options(options: &[Bytes]) -> Result<Option<Duration>, CommandError> {
    let mut ttl = None;
    let mut options = options.iter();

    while let Some(option) = options.next() {
        let millis_per_unit: u64 = if option.eq_ignore_ascii_case(b"EX") {
            1000
        } else if option.eq_ignore_ascii_case(b"PX") {
            1
        } else {
            return Err(CommandError::SyntaxError);
        };

        if ttl.is_some() {
            return Err(CommandError::SyntaxError);
        }

        let amount = parse_integer(options.next().ok_or(CommandError::SyntaxError)?)?;
        if amount <= 0 {
            return Err(CommandError::InvalidExpireTime("set"));
        }

        let millis = (amount as u64)
            .checked_mul(millis_per_unit)
            .ok_or(CommandError::InvalidExpireTime("set"))?;
        ttl = Some(Duration::from_millis(millis));
    }

    Ok(ttl)
}

fn parse_integer(raw: &[u8]) -> Result<i64, CommandError> {
    std::str::from_utf8(raw)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(CommandError::NotAnInteger)
}
