//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request (Command) Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Payload by Command Type
//! Every field is `len (4 bytes, BE) + bytes`. A slice bound is
//! `flag (1)` followed by a field when the flag is 1.
//! - LIST_KEYS:  empty
//! - GET:        key + col
//! - GET_KEY:    key
//! - GET_SLICE:  key + start bound + stop bound
//! - SET:        key + col + val
//! - DELETE:     key + col
//! - DELETE_KEY: key
//! - PING:       empty
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! Column lists are `count (4) + (col field + val field)*`; key lists are
//! `count (4) + key field*`.

use std::io::{Read, Write};

use bytes::{Buf, BufMut, BytesMut};

use super::{Command, CommandType, Response, Status};
use crate::error::{KcvError, Result};

/// Header size: 1 byte command/status + 4 bytes length
pub const HEADER_SIZE: usize = 5;

/// Maximum payload size (16 MB)
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

const BOUND_OPEN: u8 = 0x00;
const BOUND_COLUMN: u8 = 0x01;

// =============================================================================
// Field Helpers
// =============================================================================

fn put_field(buf: &mut BytesMut, field: &[u8]) {
    buf.put_u32(field.len() as u32);
    buf.put_slice(field);
}

fn put_bound(buf: &mut BytesMut, bound: Option<&[u8]>) {
    match bound {
        Some(col) => {
            buf.put_u8(BOUND_COLUMN);
            put_field(buf, col);
        }
        None => buf.put_u8(BOUND_OPEN),
    }
}

/// Sequential reader over a command or response payload
struct FieldReader<'a> {
    buf: &'a [u8],
    context: &'static str,
}

impl<'a> FieldReader<'a> {
    fn new(buf: &'a [u8], context: &'static str) -> Self {
        Self { buf, context }
    }

    fn read_u32(&mut self, what: &str) -> Result<u32> {
        if self.buf.remaining() < 4 {
            return Err(KcvError::Protocol(format!(
                "{}: missing {} length",
                self.context, what
            )));
        }
        Ok(self.buf.get_u32())
    }

    fn read_field(&mut self, what: &str) -> Result<Vec<u8>> {
        let len = self.read_u32(what)? as usize;
        if self.buf.remaining() < len {
            return Err(KcvError::Protocol(format!(
                "{}: incomplete {} (expected {}, got {})",
                self.context,
                what,
                len,
                self.buf.remaining()
            )));
        }
        let field = self.buf[..len].to_vec();
        self.buf.advance(len);
        Ok(field)
    }

    fn read_bound(&mut self, what: &str) -> Result<Option<Vec<u8>>> {
        if !self.buf.has_remaining() {
            return Err(KcvError::Protocol(format!(
                "{}: missing {} flag",
                self.context, what
            )));
        }
        match self.buf.get_u8() {
            BOUND_OPEN => Ok(None),
            BOUND_COLUMN => self.read_field(what).map(Some),
            flag => Err(KcvError::InvalidInput(format!(
                "{}: invalid {} flag 0x{:02x}",
                self.context, what, flag
            ))),
        }
    }

    fn finish(self) -> Result<()> {
        if self.buf.has_remaining() {
            return Err(KcvError::Protocol(format!(
                "{}: {} unexpected trailing bytes",
                self.context,
                self.buf.remaining()
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command to bytes
///
/// Format: cmd_type (1) + payload_len (4) + payload
pub fn encode_command(command: &Command) -> Vec<u8> {
    let mut payload = BytesMut::new();

    match command {
        Command::ListKeys | Command::Ping => {}
        Command::Get { key, col } | Command::Delete { key, col } => {
            put_field(&mut payload, key);
            put_field(&mut payload, col);
        }
        Command::GetKey { key } | Command::DeleteKey { key } => {
            put_field(&mut payload, key);
        }
        Command::GetSlice { key, start, stop } => {
            put_field(&mut payload, key);
            put_bound(&mut payload, start.as_deref());
            put_bound(&mut payload, stop.as_deref());
        }
        Command::Set { key, col, val } => {
            put_field(&mut payload, key);
            put_field(&mut payload, col);
            put_field(&mut payload, val);
        }
    }

    frame(command.command_type() as u8, &payload)
}

/// Decode a command from bytes
pub fn decode_command(bytes: &[u8]) -> Result<Command> {
    let (cmd_byte, payload) = split_frame(bytes, "command")?;

    let cmd_type = CommandType::from_byte(cmd_byte).ok_or_else(|| {
        KcvError::Protocol(format!("Unknown command type: 0x{:02x}", cmd_byte))
    })?;

    let command = match cmd_type {
        CommandType::ListKeys => {
            FieldReader::new(payload, "LIST_KEYS command").finish()?;
            Command::ListKeys
        }
        CommandType::Get => {
            let mut reader = FieldReader::new(payload, "GET command");
            let key = reader.read_field("key")?;
            let col = reader.read_field("col")?;
            reader.finish()?;
            Command::Get { key, col }
        }
        CommandType::GetKey => {
            let mut reader = FieldReader::new(payload, "GET_KEY command");
            let key = reader.read_field("key")?;
            reader.finish()?;
            Command::GetKey { key }
        }
        CommandType::GetSlice => {
            let mut reader = FieldReader::new(payload, "GET_SLICE command");
            let key = reader.read_field("key")?;
            let start = reader.read_bound("start")?;
            let stop = reader.read_bound("stop")?;
            reader.finish()?;
            Command::GetSlice { key, start, stop }
        }
        CommandType::Set => {
            let mut reader = FieldReader::new(payload, "SET command");
            let key = reader.read_field("key")?;
            let col = reader.read_field("col")?;
            let val = reader.read_field("val")?;
            reader.finish()?;
            Command::Set { key, col, val }
        }
        CommandType::Delete => {
            let mut reader = FieldReader::new(payload, "DELETE command");
            let key = reader.read_field("key")?;
            let col = reader.read_field("col")?;
            reader.finish()?;
            Command::Delete { key, col }
        }
        CommandType::DeleteKey => {
            let mut reader = FieldReader::new(payload, "DELETE_KEY command");
            let key = reader.read_field("key")?;
            reader.finish()?;
            Command::DeleteKey { key }
        }
        CommandType::Ping => {
            FieldReader::new(payload, "PING command").finish()?;
            Command::Ping
        }
    };

    Ok(command)
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response to bytes
///
/// Format: status (1) + payload_len (4) + payload
pub fn encode_response(response: &Response) -> Vec<u8> {
    let payload = response.payload.as_deref().unwrap_or(&[]);
    frame(response.status as u8, payload)
}

/// Decode a response from bytes
pub fn decode_response(bytes: &[u8]) -> Result<Response> {
    let (status_byte, payload) = split_frame(bytes, "response")?;

    let status = match status_byte {
        0x00 => Status::Ok,
        0x01 => Status::NotFound,
        0x02 => Status::Error,
        _ => {
            return Err(KcvError::Protocol(format!(
                "Unknown response status: 0x{:02x}",
                status_byte
            )))
        }
    };

    let payload = if payload.is_empty() {
        None
    } else {
        Some(payload.to_vec())
    };

    Ok(Response { status, payload })
}

/// Encode a list of (column, value) pairs as a response payload
pub fn encode_columns(columns: &[(Vec<u8>, Vec<u8>)]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    buf.put_u32(columns.len() as u32);
    for (col, val) in columns {
        put_field(&mut buf, col);
        put_field(&mut buf, val);
    }
    buf.to_vec()
}

/// Decode a column list payload
pub fn decode_columns(payload: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
    let mut reader = FieldReader::new(payload, "column list");
    let count = reader.read_u32("column count")? as usize;

    let mut columns = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        let col = reader.read_field("col")?;
        let val = reader.read_field("val")?;
        columns.push((col, val));
    }
    reader.finish()?;

    Ok(columns)
}

/// Encode a list of keys as a response payload
pub fn encode_keys(keys: &[Vec<u8>]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    buf.put_u32(keys.len() as u32);
    for key in keys {
        put_field(&mut buf, key);
    }
    buf.to_vec()
}

/// Decode a key list payload
pub fn decode_keys(payload: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut reader = FieldReader::new(payload, "key list");
    let count = reader.read_u32("key count")? as usize;

    let mut keys = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        keys.push(reader.read_field("key")?);
    }
    reader.finish()?;

    Ok(keys)
}

// =============================================================================
// Framing
// =============================================================================

fn frame(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut message = BytesMut::with_capacity(HEADER_SIZE + payload.len());
    message.put_u8(tag);
    message.put_u32(payload.len() as u32);
    message.put_slice(payload);
    message.to_vec()
}

/// Split a frame into its tag byte and payload, validating lengths
fn split_frame<'a>(bytes: &'a [u8], what: &str) -> Result<(u8, &'a [u8])> {
    if bytes.len() < HEADER_SIZE {
        return Err(KcvError::Protocol(format!(
            "Incomplete {} header: expected {} bytes, got {}",
            what,
            HEADER_SIZE,
            bytes.len()
        )));
    }

    let tag = bytes[0];
    let payload_len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]) as usize;

    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(KcvError::Protocol(format!(
            "{} payload too large: {} bytes (max {})",
            what, payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let total_len = HEADER_SIZE + payload_len;
    if bytes.len() < total_len {
        return Err(KcvError::Protocol(format!(
            "Incomplete {} payload: expected {} bytes, got {}",
            what,
            total_len,
            bytes.len()
        )));
    }

    Ok((tag, &bytes[HEADER_SIZE..total_len]))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one complete frame (header + payload) from a stream
fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let payload_len = u32::from_be_bytes([header[1], header[2], header[3], header[4]]) as usize;

    if payload_len > MAX_PAYLOAD_SIZE as usize {
        return Err(KcvError::Protocol(format!(
            "Payload too large: {} bytes (max {})",
            payload_len, MAX_PAYLOAD_SIZE
        )));
    }

    let mut message = vec![0u8; HEADER_SIZE + payload_len];
    message[..HEADER_SIZE].copy_from_slice(&header);
    if payload_len > 0 {
        reader.read_exact(&mut message[HEADER_SIZE..])?;
    }

    Ok(message)
}

/// Read a complete command from a stream
///
/// Blocks until a complete command is received or an error occurs
pub fn read_command<R: Read>(reader: &mut R) -> Result<Command> {
    let message = read_frame(reader)?;
    decode_command(&message)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: Read>(reader: &mut R) -> Result<Response> {
    let message = read_frame(reader)?;
    decode_response(&message)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    let bytes = encode_response(response);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
