//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Simple Binary)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: LIST_KEYS  - Payload: empty
//! - 0x02: GET        - Payload: key + col
//! - 0x03: GET_KEY    - Payload: key
//! - 0x04: GET_SLICE  - Payload: key + start bound + stop bound
//! - 0x05: SET        - Payload: key + col + val
//! - 0x06: DELETE     - Payload: key + col
//! - 0x07: DELETE_KEY - Payload: key
//! - 0x08: PING       - Payload: empty
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01: NOT_FOUND (GET on an absent key/column)
//! - 0x02: ERROR

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Reply, Response, Status};
pub use codec::{
    decode_columns, decode_command, decode_keys, decode_response, encode_columns,
    encode_command, encode_keys, encode_response, read_command, read_response, write_command,
    write_response, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
