//! Wire protocol encoding and decoding
//!
//! Frame format (little-endian, no padding):
//! - 4 bytes: opcode ordinal (u32)
//! - 4 bytes: payload length (u32)
//! - N bytes: UTF-8 JSON payload
//!
//! The protocol defines no upper bound on payload length, so none is
//! enforced here.

use std::io;

use bytes::BufMut;
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::errors::IpcError;

/// Frame opcodes. The ordinal values are part of the wire format and
/// must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum OpCode {
    Handshake = 0,
    Message = 1,
    Close = 2,
}

impl OpCode {
    /// Maps a wire ordinal back to an opcode.
    pub fn from_ordinal(raw: u32) -> Option<OpCode> {
        match raw {
            0 => Some(OpCode::Handshake),
            1 => Some(OpCode::Message),
            2 => Some(OpCode::Close),
            _ => None,
        }
    }
}

/// One decoded unit of wire exchange.
#[derive(Debug, Clone)]
pub struct Packet {
    pub opcode: OpCode,
    pub payload: Value,
}

/// Encode a frame for transmission.
pub fn encode(opcode: OpCode, payload: &Value) -> Result<Vec<u8>, IpcError> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| IpcError::MalformedFrame(format!("unserializable payload: {}", e)))?;

    let mut buf = Vec::with_capacity(8 + json.len());
    buf.put_u32_le(opcode as u32);
    buf.put_u32_le(json.len() as u32);
    buf.extend_from_slice(&json);
    Ok(buf)
}

/// Read one complete frame from the source.
///
/// Awaits until the 8-byte header and the full payload it declares have
/// both arrived; short reads are absorbed by the exact-read loop. Returns
/// `Ok(None)` when the source reaches end-of-stream at a frame boundary
/// (graceful disconnect). An unknown opcode ordinal, a stream that ends
/// short of the declared payload length, or a payload that is not valid
/// JSON all fail with [`IpcError::MalformedFrame`].
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Packet>, IpcError>
where
    R: AsyncRead + Unpin,
{
    let mut header = [0u8; 8];
    match reader.read_exact(&mut header).await {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(IpcError::Io(e)),
    }

    let ordinal = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let length = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;

    let opcode = OpCode::from_ordinal(ordinal)
        .ok_or_else(|| IpcError::MalformedFrame(format!("unknown opcode ordinal {}", ordinal)))?;

    let mut body = vec![0u8; length];
    match reader.read_exact(&mut body).await {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
            return Err(IpcError::MalformedFrame(format!(
                "stream ended before {}-byte payload completed",
                length
            )));
        }
        Err(e) => return Err(IpcError::Io(e)),
    }

    let payload = serde_json::from_slice(&body)
        .map_err(|e| IpcError::MalformedFrame(format!("invalid JSON payload: {}", e)))?;

    Ok(Some(Packet { opcode, payload }))
}
