//! Blocking TCP client
//!
//! Speaks the binary protocol to a running server.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::{KcvError, Result};
use crate::protocol::{
    decode_columns, decode_keys, read_response, write_command, Command, Response, Status,
};

/// A connection to a KCVStore server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| KcvError::Network(format!("Failed to connect: {}", e)))?;
        stream.set_nodelay(true)?;
        let read_stream = stream.try_clone()?;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(stream),
        })
    }

    /// Send a command and wait for its raw response
    pub fn request(&mut self, command: &Command) -> Result<Response> {
        write_command(&mut self.writer, command)?;
        read_response(&mut self.reader)
    }

    pub fn ping(&mut self) -> Result<()> {
        self.expect_ok(&Command::Ping).map(|_| ())
    }

    pub fn get_keys(&mut self) -> Result<Vec<Vec<u8>>> {
        let payload = self.expect_ok(&Command::ListKeys)?;
        decode_keys(&payload)
    }

    /// `Ok(None)` when the key/column is absent
    pub fn get(&mut self, key: &[u8], col: &[u8]) -> Result<Option<Vec<u8>>> {
        let response = self.request(&Command::Get {
            key: key.to_vec(),
            col: col.to_vec(),
        })?;
        match response.status {
            Status::Ok => Ok(Some(response.payload.unwrap_or_default())),
            Status::NotFound => Ok(None),
            Status::Error => Err(server_error(response)),
        }
    }

    pub fn get_key(&mut self, key: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let payload = self.expect_ok(&Command::GetKey { key: key.to_vec() })?;
        decode_columns(&payload)
    }

    pub fn get_slice(
        &mut self,
        key: &[u8],
        start: Option<&[u8]>,
        stop: Option<&[u8]>,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let payload = self.expect_ok(&Command::GetSlice {
            key: key.to_vec(),
            start: start.map(<[u8]>::to_vec),
            stop: stop.map(<[u8]>::to_vec),
        })?;
        decode_columns(&payload)
    }

    pub fn set(&mut self, key: &[u8], col: &[u8], val: &[u8]) -> Result<()> {
        self.expect_ok(&Command::Set {
            key: key.to_vec(),
            col: col.to_vec(),
            val: val.to_vec(),
        })
        .map(|_| ())
    }

    pub fn delete(&mut self, key: &[u8], col: &[u8]) -> Result<()> {
        self.expect_ok(&Command::Delete {
            key: key.to_vec(),
            col: col.to_vec(),
        })
        .map(|_| ())
    }

    pub fn delete_key(&mut self, key: &[u8]) -> Result<()> {
        self.expect_ok(&Command::DeleteKey { key: key.to_vec() })
            .map(|_| ())
    }

    /// Send a command and require an OK status, returning the payload
    fn expect_ok(&mut self, command: &Command) -> Result<Vec<u8>> {
        let response = self.request(command)?;
        match response.status {
            Status::Ok => Ok(response.payload.unwrap_or_default()),
            Status::NotFound => Err(KcvError::Protocol(format!(
                "Unexpected NOT_FOUND for {:?}",
                command.command_type()
            ))),
            Status::Error => Err(server_error(response)),
        }
    }
}

fn server_error(response: Response) -> KcvError {
    let message = response
        .payload
        .map(|p| String::from_utf8_lossy(&p).into_owned())
        .unwrap_or_else(|| "unknown server error".to_string());
    KcvError::Network(format!("Server error: {}", message))
}
