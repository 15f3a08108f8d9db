//! Streaming remote-differential encoder: signature generation, delta encoding
//! against a remote signature, and patch application.
//!
//! # Design
//!
//! A round trip has three parties, each touched by one function in this crate:
//!
//! 1. The holder of the *old* file computes a [`Signature`] ([`generate_signature`])
//!    and sends it to the holder of the *new* file.
//! 2. The holder of the *new* file loads that signature into a [`SignatureIndex`]
//!    and runs [`Encoder::encode`] to produce a delta stream, which embeds a fresh
//!    signature of the new file as it goes.
//! 3. The holder of the old file replays the delta with [`patch::apply`] (or
//!    [`patch::apply_capturing`] to retain the embedded signature for the next
//!    round without re-reading the reconstructed file).
//!
//! # Invariants
//!
//! - Weak checksums are librsync's mod-2^16 rolling sum ([`weak`]), not zlib's
//!   Adler-32.
//! - Strong checksums are full, untruncated BLAKE3 digests ([`strong`]).
//! - Both wire formats (signature stream, delta stream) begin with a magic value
//!   and are big-endian throughout ([`framing`]).
//!
//! # Errors
//!
//! All fallible operations return [`Error`]/[`Result`]; see that module for the
//! full set of error kinds.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod command;
pub mod encoder;
pub mod error;
pub mod framing;
pub mod literal;
pub mod newsig;
pub mod patch;
pub mod readahead;
pub mod signature;
pub mod stats;
pub mod strong;
pub mod weak;

pub use command::{Command, CommandWriter};
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use patch::{apply, apply_capturing};
pub use signature::{
    generate_signature, generate_signature_with_block_size, read_signature, write_signature,
    Signature, SignatureIndex, SignatureRecord, DEFAULT_BLOCK_SIZE,
};
pub use stats::Stats;
