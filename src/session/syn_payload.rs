//! SYN payload shapes.
//!
//! The distilled protocol is ambiguous about whether file-mode and streaming-mode SYN
//! packets share one payload shape. `original_source/audio_stream_sender.py` shows the
//! streaming SYN additionally carries a filename that the file-mode SYN
//! (`audio_protocol.py`) never does. Resolved here as two distinct variants,
//! distinguished by which session mode constructed them — never by inspecting payload
//! length, per the open question in the design notes.

use crate::error::{Error, Result};

const MAX_NAME_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynPayload {
    /// File-mode SYN: just the compression flag.
    File { compressed: bool },
    /// Streaming-mode SYN: compression flag plus the transmitted file's name.
    Streaming { compressed: bool, name: String },
}

impl SynPayload {
    pub fn encode(&self) -> Vec<u8> {
        match self {
            SynPayload::File { compressed } => vec![*compressed as u8],
            SynPayload::Streaming { compressed, name } => {
                let name_bytes = name.as_bytes();
                let len = name_bytes.len().min(MAX_NAME_LEN);
                let mut out = Vec::with_capacity(2 + len);
                out.push(*compressed as u8);
                out.push(len as u8);
                out.extend_from_slice(&name_bytes[..len]);
                out
            }
        }
    }

    /// Decode a file-mode SYN payload: exactly the 1-byte compression flag.
    pub fn decode_file(payload: &[u8]) -> Result<Self> {
        let compressed = payload.first().copied().unwrap_or(0) == 1;
        Ok(SynPayload::File { compressed })
    }

    /// Decode a streaming-mode SYN payload: `compress_flag ‖ name_len ‖ name_bytes`.
    pub fn decode_streaming(payload: &[u8]) -> Result<Self> {
        if payload.len() < 2 {
            return Err(Error::MalformedFrame(
                "streaming SYN payload shorter than compress_flag+name_len".into(),
            ));
        }
        let compressed = payload[0] == 1;
        let name_len = payload[1] as usize;
        let name_bytes = payload.get(2..2 + name_len).ok_or_else(|| {
            Error::MalformedFrame(format!(
                "streaming SYN declares name_len {name_len} beyond payload bounds"
            ))
        })?;
        let name = String::from_utf8_lossy(name_bytes).into_owned();
        Ok(SynPayload::Streaming { compressed, name })
    }

    pub fn compressed(&self) -> bool {
        match self {
            SynPayload::File { compressed } | SynPayload::Streaming { compressed, .. } => {
                *compressed
            }
        }
    }
}
