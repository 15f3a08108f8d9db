//! Crate-wide error type.
//!
//! A closed set of named failure modes, distinguishing the signature stream's
//! failure modes from the delta stream's so a caller can tell which side of an
//! operation went wrong without string-matching a message.

use thiserror::Error;

/// Errors produced while generating a signature, encoding a delta, or applying one.
#[derive(Debug, Error)]
pub enum Error {
    /// The signature stream did not begin with `HS_SIG_MAGIC`.
    #[error("unsupported signature version: found magic 0x{found:08x}")]
    UnsupportedSignatureVersion {
        /// The magic value actually found at the start of the stream.
        found: u32,
    },

    /// The signature stream ended before a complete header or record could be read.
    #[error("truncated signature: stream ended before a full header or record")]
    TruncatedSignature,

    /// The signature stream contained a record with a malformed strong-hash width.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// The delta stream did not begin with `HS_LT_MAGIC`.
    #[error("unsupported delta version: found magic 0x{found:08x}")]
    UnsupportedDeltaVersion {
        /// The magic value actually found at the start of the stream.
        found: u32,
    },

    /// The delta stream contained an unknown command tag or a truncated payload.
    #[error("malformed delta: {0}")]
    MalformedDelta(String),

    /// An I/O failure occurred on the caller-supplied reader or writer.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The caller's cancellation probe requested the operation stop.
    #[error("operation cancelled")]
    Cancelled,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
