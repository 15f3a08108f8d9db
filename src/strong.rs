//! Strong content-addressing hash.
//!
//! The full, untruncated BLAKE3 digest is used directly rather than sliced down,
//! trading a few header bytes for full collision resistance.

/// Width, in bytes, of a strong sum (a full BLAKE3 digest).
pub const STRONG_SUM_LEN: usize = 32;

/// A fixed-width content hash over a block's contents.
pub type StrongSum = [u8; STRONG_SUM_LEN];

/// Hashes a byte slice with BLAKE3.
#[inline]
#[must_use]
pub fn strong_sum(data: &[u8]) -> StrongSum {
    *blake3::hash(data).as_bytes()
}
