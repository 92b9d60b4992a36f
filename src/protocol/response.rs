//! Response definitions
//!
//! Represents responses to clients, and the typed replies the engine
//! produces before they are encoded.

use super::codec::{encode_columns, encode_keys, MAX_PAYLOAD_SIZE};

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    Error = 0x02,
}

/// A response to send to client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (value, column list, key list, or error message)
    pub payload: Option<Vec<u8>>,
}

impl Response {
    /// Create an OK response with optional payload
    pub fn ok(payload: Option<Vec<u8>>) -> Self {
        Self {
            status: Status::Ok,
            payload,
        }
    }

    /// Create a NOT_FOUND response (the "absent" value)
    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            payload: None,
        }
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Some(message.as_bytes().to_vec()),
        }
    }
}

/// Result of executing a command against the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A point lookup; `None` when absent
    Value(Option<Vec<u8>>),

    /// Sorted (column, value) pairs
    Columns(Vec<(Vec<u8>, Vec<u8>)>),

    /// Keys in no particular order
    Keys(Vec<Vec<u8>>),

    /// A mutation completed
    Done,

    Pong,
}

impl From<Reply> for Response {
    /// Replies whose payload would not fit in one frame become an
    /// ERROR response, so the client never sees an oversized frame.
    fn from(reply: Reply) -> Self {
        let response = match reply {
            Reply::Value(Some(value)) => Response::ok(Some(value)),
            Reply::Value(None) => Response::not_found(),
            Reply::Columns(columns) => Response::ok(Some(encode_columns(&columns))),
            Reply::Keys(keys) => Response::ok(Some(encode_keys(&keys))),
            Reply::Done => Response::ok(None),
            Reply::Pong => Response::ok(Some(b"PONG".to_vec())),
        };

        match response.payload.as_ref().map(Vec::len) {
            Some(len) if len > MAX_PAYLOAD_SIZE as usize => Response::error(&format!(
                "Response too large: {} bytes (max {})",
                len, MAX_PAYLOAD_SIZE
            )),
            _ => response,
        }
    }
}
