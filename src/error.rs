use thiserror::Error;

/// The crate-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The crate-wide error type.
///
/// This is intentionally decoupled from `anyhow` so downstream libraries aren't forced
/// to adopt `anyhow` in their own public APIs.
///
/// Every variant maps to one entry of the error taxonomy: the bit/symbol codec and tone
/// generator never fail (they are total functions over valid inputs), and the packet
/// decoder reports a soft `valid` flag rather than erroring on a bad checksum — only
/// malformed/unparseable frames raise [`Error::MalformedFrame`] or
/// [`Error::UnknownType`] here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("usage error: {0}")]
    UsageError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error("checksum failed for packet seq {seq}")]
    ChecksumFailed { seq: u8 },

    #[error("unknown packet type: {value}")]
    UnknownType { value: u8 },

    #[error("handshake failed: {0}")]
    FailedHandshake(String),

    #[error("incomplete session, {} packet(s) missing", .missing.len())]
    IncompleteNeedsRetx { missing: Vec<u8> },

    #[error("payload corrupt: {0}")]
    PayloadCorrupt(String),

    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("cancelled")]
    Cancelled,
}

impl Error {
    /// The process exit code this error maps to (see the external interface table).
    ///
    /// `0` (success) is never returned from here; callers only consult this on an `Err`
    /// path.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::UsageError(_) => 1,
            Error::IncompleteNeedsRetx { .. } => 3,
            _ => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_match_external_interface_table() {
        assert_eq!(Error::UsageError("x".into()).exit_code(), 1);
        assert_eq!(Error::FailedHandshake("x".into()).exit_code(), 2);
        assert_eq!(Error::PayloadCorrupt("x".into()).exit_code(), 2);
        assert_eq!(
            Error::IncompleteNeedsRetx { missing: vec![1] }.exit_code(),
            3
        );
    }
}
