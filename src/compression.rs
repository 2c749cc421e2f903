//! Optional lossless compression of the pre-framing byte stream.
//!
//! Uses zlib-framed deflate at the maximum compression level, matching the original
//! protocol's `zlib.compress(data, level=9)` — a self-describing stream (2-byte header,
//! adler32 trailer) rather than raw deflate, so a receiver never has to guess the
//! decompressed size up front.

use flate2::Compression;
use flate2::write::{ZlibDecoder, ZlibEncoder};
use std::io::Write;

use crate::error::{Error, Result};

/// Compress `data` at maximum level. Never fails for in-memory buffers.
pub fn compress(data: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(data)
        .expect("writing to an in-memory buffer cannot fail");
    encoder
        .finish()
        .expect("finishing an in-memory zlib stream cannot fail")
}

/// Decompress a zlib stream produced by [`compress`].
///
/// A malformed or truncated stream is a terminal [`Error::PayloadCorrupt`] for the
/// session that requested it.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(Vec::new());
    decoder
        .write_all(data)
        .map_err(|e| Error::PayloadCorrupt(e.to_string()))?;
    decoder
        .finish()
        .map_err(|e| Error::PayloadCorrupt(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_arbitrary_bytes() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(8);
        let compressed = compress(&data);
        assert!(compressed.len() < data.len());
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn round_trips_empty_input() {
        let compressed = compress(&[]);
        assert_eq!(decompress(&compressed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn garbage_input_is_payload_corrupt() {
        let err = decompress(&[0xDE, 0xAD, 0xBE, 0xEF]).unwrap_err();
        assert!(matches!(err, Error::PayloadCorrupt(_)));
    }
}
