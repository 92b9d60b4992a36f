//! Command definitions
//!
//! Represents commands from clients.

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    ListKeys = 0x01,
    Get = 0x02,
    GetKey = 0x03,
    GetSlice = 0x04,
    Set = 0x05,
    Delete = 0x06,
    DeleteKey = 0x07,
    Ping = 0x08,
}

impl CommandType {
    /// Map a wire byte to a command type
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(CommandType::ListKeys),
            0x02 => Some(CommandType::Get),
            0x03 => Some(CommandType::GetKey),
            0x04 => Some(CommandType::GetSlice),
            0x05 => Some(CommandType::Set),
            0x06 => Some(CommandType::Delete),
            0x07 => Some(CommandType::DeleteKey),
            0x08 => Some(CommandType::Ping),
            _ => None,
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List every key holding at least one column
    ListKeys,

    /// Get the value at a key/column
    Get { key: Vec<u8>, col: Vec<u8> },

    /// Get all columns under a key
    GetKey { key: Vec<u8> },

    /// Get an inclusive column slice; `None` is an open end
    GetSlice {
        key: Vec<u8>,
        start: Option<Vec<u8>>,
        stop: Option<Vec<u8>>,
    },

    /// Set the value at a key/column
    Set {
        key: Vec<u8>,
        col: Vec<u8>,
        val: Vec<u8>,
    },

    /// Delete one column from a key
    Delete { key: Vec<u8>, col: Vec<u8> },

    /// Delete a key and all its columns
    DeleteKey { key: Vec<u8> },

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::ListKeys => CommandType::ListKeys,
            Command::Get { .. } => CommandType::Get,
            Command::GetKey { .. } => CommandType::GetKey,
            Command::GetSlice { .. } => CommandType::GetSlice,
            Command::Set { .. } => CommandType::Set,
            Command::Delete { .. } => CommandType::Delete,
            Command::DeleteKey { .. } => CommandType::DeleteKey,
            Command::Ping => CommandType::Ping,
        }
    }

    /// Whether executing this command can change the store
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Command::Set { .. } | Command::Delete { .. } | Command::DeleteKey { .. }
        )
    }
}
