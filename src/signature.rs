//! Signature records, signature generation, and the signature index.
//!
//! A signature describes an old file as a sequence of per-block `(weak, strong)`
//! checksum pairs. It can be held in memory as a [`Signature`], serialized to the
//! wire format so it can be sent to a remote peer and reloaded, or indexed as a
//! [`SignatureIndex`] for fast weak-checksum lookups while encoding a delta.

use crate::error::{Error, Result};
use crate::framing::{self, read_exact_or_eof};
use crate::strong::{strong_sum, StrongSum, STRONG_SUM_LEN};
use crate::weak::seed_value;
use std::collections::HashMap;
use std::io::{Read, Write};

/// Magic value at the start of a signature stream.
pub const HS_SIG_MAGIC: u32 = 0x7273_0141;

/// Default block length used when the caller doesn't specify one.
pub const DEFAULT_BLOCK_SIZE: u32 = 4096;

/// One `(weak, strong)` pair describing a single block of the signed file.
///
/// A record's position in [`Signature::records`] (1-based) is its block index; the
/// type itself carries no index field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureRecord {
    /// Rolling weak checksum of the block.
    pub weak: u32,
    /// Strong (BLAKE3) checksum of the block.
    pub strong: StrongSum,
}

/// A complete in-memory signature: the block length plus every block's record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signature {
    /// Block length used to compute every record.
    pub block_len: u32,
    /// Records in block order, starting at block index 1.
    pub records: Vec<SignatureRecord>,
}

/// Computes a signature of `reader` using the default block length.
///
/// # Errors
/// Returns an error if reading from `reader` fails.
pub fn generate_signature<R: Read>(reader: R) -> Result<Signature> {
    generate_signature_with_block_size(reader, DEFAULT_BLOCK_SIZE)
}

/// Computes a signature of `reader`, chunking it into `block_len`-byte blocks.
///
/// Reads one block at a time, hashes it weak and strong, and records it; a short
/// or empty read ends the loop.
///
/// # Errors
/// Returns an error if reading from `reader` fails.
pub fn generate_signature_with_block_size<R: Read>(
    mut reader: R,
    block_len: u32,
) -> Result<Signature> {
    let mut records = Vec::new();
    let mut buffer = vec![0u8; block_len as usize];

    loop {
        let n = read_exact_or_eof(&mut reader, &mut buffer)?;
        if n == 0 {
            break;
        }
        let chunk = &buffer[..n];
        records.push(SignatureRecord {
            weak: seed_value(chunk),
            strong: strong_sum(chunk),
        });
        if n < buffer.len() {
            break;
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(block_len, records = records.len(), "generated signature");

    Ok(Signature { block_len, records })
}

/// Writes `sig` to `writer` as a magic header followed by its records.
///
/// # Errors
/// Returns an error if writing to `writer` fails.
pub fn write_signature<W: Write>(sig: &Signature, mut writer: W) -> Result<()> {
    framing::write_u32(&mut writer, HS_SIG_MAGIC)?;
    framing::write_u32(&mut writer, sig.block_len)?;
    for record in &sig.records {
        framing::write_u32(&mut writer, record.weak)?;
        writer.write_all(&record.strong)?;
    }
    Ok(())
}

/// Reads a signature stream produced by [`write_signature`].
///
/// # Errors
/// Returns [`Error::UnsupportedSignatureVersion`] on a magic mismatch,
/// [`Error::MalformedSignature`] on a partial trailing record, or an I/O error.
pub fn read_signature<R: Read>(mut reader: R) -> Result<Signature> {
    let magic = read_u32_or_truncated(&mut reader)?;
    if magic != HS_SIG_MAGIC {
        return Err(Error::UnsupportedSignatureVersion { found: magic });
    }
    let block_len = read_u32_or_truncated(&mut reader)?;
    if block_len == 0 {
        return Err(Error::MalformedSignature(
            "block length must be positive".to_string(),
        ));
    }

    let mut records = Vec::new();
    loop {
        let mut weak_buf = [0u8; 4];
        let n = read_exact_or_eof(&mut reader, &mut weak_buf)?;
        if n == 0 {
            break;
        }
        if n < weak_buf.len() {
            return Err(Error::MalformedSignature(
                "stream ended mid-record (weak checksum)".to_string(),
            ));
        }
        let weak = u32::from_be_bytes(weak_buf);

        let mut strong = [0u8; STRONG_SUM_LEN];
        let n = read_exact_or_eof(&mut reader, &mut strong)?;
        if n != STRONG_SUM_LEN {
            return Err(Error::MalformedSignature(
                "stream ended mid-record (strong checksum)".to_string(),
            ));
        }

        records.push(SignatureRecord { weak, strong });
    }

    Ok(Signature { block_len, records })
}

/// Reads a big-endian `u32`, mapping a short read to [`Error::TruncatedSignature`].
fn read_u32_or_truncated<R: Read>(reader: &mut R) -> Result<u32> {
    framing::read_u32(reader).map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            Error::TruncatedSignature
        } else {
            Error::Io(e)
        }
    })
}

/// An immutable index over a [`Signature`], answering weak+strong probes.
///
/// Groups records by weak checksum so a probe only has to compare strong sums
/// against the (usually small) set of records sharing that weak value.
#[derive(Debug, Clone, Default)]
pub struct SignatureIndex {
    block_len: u32,
    weak_to_records: HashMap<u32, Vec<(StrongSum, u32)>>,
    record_count: u32,
}

impl SignatureIndex {
    /// Builds an index from an in-memory [`Signature`].
    #[must_use]
    pub fn from_signature(sig: &Signature) -> Self {
        let mut weak_to_records: HashMap<u32, Vec<(StrongSum, u32)>> = HashMap::new();
        for (i, record) in sig.records.iter().enumerate() {
            let block_index = u32::try_from(i + 1).expect("block index fits in u32");
            weak_to_records
                .entry(record.weak)
                .or_default()
                .push((record.strong, block_index));
        }
        Self {
            block_len: sig.block_len,
            weak_to_records,
            record_count: u32::try_from(sig.records.len()).expect("record count fits in u32"),
        }
    }

    /// Reads a signature stream and builds its index in one step.
    ///
    /// # Errors
    /// See [`read_signature`].
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        let sig = read_signature(reader)?;
        Ok(Self::from_signature(&sig))
    }

    /// Block length every record in this index was computed with.
    #[must_use]
    pub const fn block_len(&self) -> u32 {
        self.block_len
    }

    /// Total number of records held by this index.
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.record_count
    }

    /// Reports whether this index holds zero records (e.g. an empty old file).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    /// Looks up the lowest block index whose weak and strong sums both match
    /// `bytes`, or `None` if no record shares `weak`.
    ///
    /// `bytes` must be `<= block_len` long; short trailing blocks are matched
    /// against their own (shorter) strong sum.
    #[must_use]
    pub fn find_match(&self, weak: u32, bytes: &[u8]) -> Option<u32> {
        let candidates = self.weak_to_records.get(&weak)?;
        let strong = strong_sum(bytes);
        candidates
            .iter()
            .find(|(s, _)| *s == strong)
            .map(|(_, block_index)| *block_index)
    }
}
