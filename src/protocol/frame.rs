//! Command Frames
//!
//! A [`Frame`] is one client request reduced to a command name and its
//! positional arguments. It can be built from a parsed RESP array or from
//! the flat token layout produced by [`decode_frame`](super::decode_frame).

use crate::protocol::types::RespValue;
use bytes::Bytes;

/// One decoded client request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    name: Bytes,
    args: Vec<Bytes>,
}

impl Frame {
    pub fn new(name: impl Into<Bytes>, args: Vec<Bytes>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Builds a frame from a parsed RESP value.
    ///
    /// Only a non-empty array of bulk or simple strings is a command;
    /// anything else returns `None`.
    pub fn from_resp(value: RespValue) -> Option<Self> {
        let items = match value {
            RespValue::Array(items) => items,
            _ => return None,
        };

        let mut parts = items
            .into_iter()
            .map(|item| match item {
                RespValue::BulkString(data) => Some(data),
                RespValue::SimpleString(s) => Some(Bytes::from(s)),
                _ => None,
            })
            .collect::<Option<Vec<Bytes>>>()?;

        if parts.is_empty() {
            return None;
        }
        let name = parts.remove(0);
        Some(Self { name, args: parts })
    }

    /// Builds a frame from flat tokens such as
    /// `["*2", "$3", "GET", "$3", "foo", ""]`.
    ///
    /// The sequence must start with an array marker, alternate length
    /// markers with values, and end with the empty token left by the final
    /// terminator. Anything else returns `None`.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Option<Self> {
        if tokens.len() < 4 || tokens.len() % 2 != 0 {
            return None;
        }
        if !tokens[0].as_ref().starts_with('*') {
            return None;
        }
        if !tokens[tokens.len() - 1].as_ref().is_empty() {
            return None;
        }

        let name = Bytes::copy_from_slice(tokens[2].as_ref().as_bytes());
        let args = tokens
            .iter()
            .skip(4)
            .step_by(2)
            .take((tokens.len() - 4) / 2)
            .map(|token| Bytes::copy_from_slice(token.as_ref().as_bytes()))
            .collect();

        Some(Self { name, args })
    }

    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// The command name as text, for logging.
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }

    /// Returns true if the command name equals `name`, ignoring ASCII case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.as_bytes())
    }

    pub fn args(&self) -> &[Bytes] {
        &self.args
    }

    pub fn arg(&self, index: usize) -> Option<&Bytes> {
        self.args.get(index)
    }

    /// Number of tokens this request occupies in the flat token layout:
    /// array marker, name marker, name, a marker and value per argument,
    /// and the trailing empty token.
    pub fn token_len(&self) -> usize {
        4 + 2 * self.args.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::decode_frame;

    #[test]
    fn test_from_resp() {
        let value = RespValue::array(vec![
            RespValue::bulk_string(Bytes::from("GET")),
            RespValue::bulk_string(Bytes::from("foo")),
        ]);
        let frame = Frame::from_resp(value).unwrap();
        assert!(frame.is_named("get"));
        assert_eq!(frame.args(), &[Bytes::from("foo")]);
        assert_eq!(frame.token_len(), 6);
    }

    #[test]
    fn test_from_resp_rejects_non_commands() {
        assert!(Frame::from_resp(RespValue::integer(1)).is_none());
        assert!(Frame::from_resp(RespValue::array(vec![])).is_none());
        assert!(Frame::from_resp(RespValue::array(vec![
            RespValue::bulk_string(Bytes::from("GET")),
            RespValue::integer(3),
        ]))
        .is_none());
    }

    #[test]
    fn test_from_tokens() {
        let frame = Frame::from_tokens(&["*3", "$3", "SET", "$3", "key", "$5", "value", ""]).unwrap();
        assert_eq!(frame.name(), b"SET");
        assert_eq!(frame.args(), &[Bytes::from("key"), Bytes::from("value")]);
        assert_eq!(frame.token_len(), 8);
    }

    #[test]
    fn test_from_tokens_without_arguments() {
        let frame = Frame::from_tokens(&["*1", "$4", "PING", ""]).unwrap();
        assert!(frame.is_named("PING"));
        assert!(frame.args().is_empty());
        assert_eq!(frame.token_len(), 4);
    }

    #[test]
    fn test_from_tokens_rejects_malformed() {
        assert!(Frame::from_tokens(&["*1", "$4"]).is_none());
        assert!(Frame::from_tokens(&["$4", "PING"]).is_none());
        // Missing the trailing terminator token
        assert!(Frame::from_tokens(&["*2", "$3", "GET", "$3", "key"]).is_none());
        assert!(Frame::from_tokens(&["+1", "$4", "PING", ""]).is_none());
    }

    #[test]
    fn test_decoded_tokens_match_parsed_frame() {
        let raw = b"*3\r\n$5\r\nRPUSH\r\n$4\r\nlist\r\n$3\r\nfoo\r\n";
        let tokens = decode_frame(raw).unwrap();
        let from_tokens = Frame::from_tokens(tokens.as_slice()).unwrap();
        let (value, _) = crate::protocol::parse_message(raw).unwrap().unwrap();
        assert_eq!(Frame::from_resp(value).unwrap(), from_tokens);
    }
}
