//! Command records and their wire codec.
//!
//! A delta stream is a sequence of tagged records: literal data, a back-reference
//! into the old file, an embedded signature of the new file, or the terminal
//! end-of-stream marker.

use crate::error::{Error, Result};
use crate::framing;
use crate::signature::Signature;
use crate::stats::Stats;
use std::io::{Read, Write};

const TAG_DATA: u8 = 0;
const TAG_COPY: u8 = 1;
const TAG_SIGNATURE: u8 = 2;
const TAG_EOF: u8 = 3;

/// Magic value at the start of a token (delta) stream.
pub const HS_LT_MAGIC: u32 = 0x7273_0241;

/// One record of the token stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A run of literal bytes copied verbatim into the new file.
    Data(Vec<u8>),
    /// A back-reference into the old file: `length` bytes starting at `offset`.
    Copy {
        /// Absolute byte offset into the old file.
        offset: u64,
        /// Number of bytes to copy.
        length: u64,
    },
    /// The embedded signature of the new file.
    Signature(Signature),
    /// Terminal sentinel; no further records follow.
    Eof,
}

/// Encodes commands onto a writer, coalescing adjacent `Copy` records.
///
/// A `Copy` is held back until a non-contiguous `Copy`, a `Data`, a `Signature`, or
/// `Eof` forces it out, so two back-to-back matching blocks collapse into a single
/// record.
pub struct CommandWriter<W> {
    writer: W,
    stats: Stats,
    pending_copy: Option<(u64, u64)>,
}

impl<W: Write> CommandWriter<W> {
    /// Wraps `writer`; does not write anything until the first command.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            stats: Stats::default(),
            pending_copy: None,
        }
    }

    /// Writes the `HS_LT_MAGIC` stream header.
    ///
    /// # Errors
    /// Returns an error if writing to the underlying writer fails.
    pub fn write_magic(&mut self) -> Result<()> {
        framing::write_u32(&mut self.writer, HS_LT_MAGIC)
    }

    /// Writes a `Data` command, flushing any pending `Copy` first.
    ///
    /// A no-op for an empty slice.
    ///
    /// # Errors
    /// Returns an error if writing to the underlying writer fails.
    pub fn write_data(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        self.flush_pending_copy()?;
        framing::write_u8(&mut self.writer, TAG_DATA)?;
        framing::write_u64(&mut self.writer, data.len() as u64)?;
        self.writer.write_all(data)?;
        self.stats.lit_cmds += 1;
        self.stats.lit_bytes += data.len() as u64;
        Ok(())
    }

    /// Records a `Copy`, merging it into the pending one if contiguous.
    ///
    /// A no-op for zero length.
    ///
    /// # Errors
    /// Returns an error if flushing a superseded pending `Copy` fails.
    pub fn write_copy(&mut self, offset: u64, length: u64) -> Result<()> {
        if length == 0 {
            return Ok(());
        }
        match self.pending_copy {
            Some((pending_offset, pending_len)) if pending_offset + pending_len == offset => {
                self.pending_copy = Some((pending_offset, pending_len + length));
            }
            Some(_) => {
                self.flush_pending_copy()?;
                self.pending_copy = Some((offset, length));
            }
            None => {
                self.pending_copy = Some((offset, length));
            }
        }
        Ok(())
    }

    fn flush_pending_copy(&mut self) -> Result<()> {
        if let Some((offset, length)) = self.pending_copy.take() {
            framing::write_u8(&mut self.writer, TAG_COPY)?;
            framing::write_u64(&mut self.writer, offset)?;
            framing::write_u64(&mut self.writer, length)?;
            self.stats.copy_cmds += 1;
            self.stats.copy_bytes += length;
        }
        Ok(())
    }

    /// Writes a `Signature` command, flushing any pending `Copy` first.
    ///
    /// Always emits a record, even for an empty signature, so callers can rely on
    /// its position in the stream rather than its mere presence — an empty new
    /// file still carries a `Signature` command ahead of `Eof`.
    ///
    /// # Errors
    /// Returns an error if writing to the underlying writer fails.
    pub fn write_signature(&mut self, sig: &Signature) -> Result<()> {
        self.flush_pending_copy()?;
        framing::write_u8(&mut self.writer, TAG_SIGNATURE)?;
        framing::write_u32(&mut self.writer, sig.block_len)?;
        framing::write_u64(&mut self.writer, sig.records.len() as u64)?;
        let mut bytes = 0u64;
        for record in &sig.records {
            framing::write_u32(&mut self.writer, record.weak)?;
            self.writer.write_all(&record.strong)?;
            bytes += 4 + crate::strong::STRONG_SUM_LEN as u64;
        }
        self.stats.sig_cmds += 1;
        self.stats.sig_bytes += bytes;
        Ok(())
    }

    /// Writes the terminal `Eof` sentinel, flushing any pending `Copy` first.
    ///
    /// # Errors
    /// Returns an error if writing to the underlying writer fails.
    pub fn write_eof(&mut self) -> Result<()> {
        self.flush_pending_copy()?;
        framing::write_u8(&mut self.writer, TAG_EOF)
    }

    /// Consumes the writer, returning the accumulated stats.
    pub fn into_stats(self) -> Stats {
        self.stats
    }

    /// Borrows the stats accumulated so far.
    #[must_use]
    pub const fn stats(&self) -> &Stats {
        &self.stats
    }
}

/// Decodes one command from `reader`.
///
/// # Errors
/// Returns [`Error::MalformedDelta`] on an unknown tag or a truncated payload, or an
/// I/O error from the underlying reader.
pub fn read_command<R: Read>(mut reader: R) -> Result<Command> {
    let tag = read_tag(&mut reader)?;

    match tag {
        TAG_DATA => {
            let len = read_u64_field(&mut reader, "data length")?;
            let len = usize::try_from(len)
                .map_err(|_| Error::MalformedDelta("data length overflows usize".to_string()))?;
            let mut data = vec![0u8; len];
            reader
                .read_exact(&mut data)
                .map_err(|_| Error::MalformedDelta("truncated data payload".to_string()))?;
            Ok(Command::Data(data))
        }
        TAG_COPY => {
            let offset = read_u64_field(&mut reader, "copy offset")?;
            let length = read_u64_field(&mut reader, "copy length")?;
            Ok(Command::Copy { offset, length })
        }
        TAG_SIGNATURE => {
            let block_len = read_u32_field(&mut reader, "signature block length")?;
            let count = read_u64_field(&mut reader, "signature record count")?;
            let count = usize::try_from(count)
                .map_err(|_| Error::MalformedDelta("record count overflows usize".to_string()))?;
            let mut records = Vec::with_capacity(count.min(1 << 20));
            for _ in 0..count {
                let weak = read_u32_field(&mut reader, "signature record weak checksum")?;
                let mut strong = [0u8; crate::strong::STRONG_SUM_LEN];
                reader
                    .read_exact(&mut strong)
                    .map_err(|_| Error::MalformedDelta("truncated signature record".to_string()))?;
                records.push(crate::signature::SignatureRecord { weak, strong });
            }
            Ok(Command::Signature(Signature { block_len, records }))
        }
        TAG_EOF => Ok(Command::Eof),
        other => Err(Error::MalformedDelta(format!("unknown command tag {other}"))),
    }
}

fn read_tag<R: Read>(mut reader: R) -> Result<u8> {
    let mut tag = [0u8; 1];
    reader
        .read_exact(&mut tag)
        .map_err(|_| Error::MalformedDelta("truncated command tag".to_string()))?;
    Ok(tag[0])
}

/// Reads a `u32` field of a command payload, mapping a short read to
/// [`Error::MalformedDelta`] rather than the signature stream's truncation error.
fn read_u32_field<R: Read>(reader: &mut R, what: &str) -> Result<u32> {
    framing::read_u32(reader).map_err(|e| map_delta_eof(e, what))
}

/// Reads a `u64` field of a command payload, mapping a short read to
/// [`Error::MalformedDelta`] rather than the signature stream's truncation error.
fn read_u64_field<R: Read>(reader: &mut R, what: &str) -> Result<u64> {
    framing::read_u64(reader).map_err(|e| map_delta_eof(e, what))
}

fn map_delta_eof(e: std::io::Error, what: &str) -> Error {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
        Error::MalformedDelta(format!("truncated {what}"))
    } else {
        Error::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_copies_coalesce() {
        let mut buf = Vec::new();
        let mut writer = CommandWriter::new(&mut buf);
        writer.write_copy(0, 4).unwrap();
        writer.write_copy(4, 4).unwrap();
        writer.write_eof().unwrap();

        assert_eq!(writer.stats().copy_cmds, 1);
        assert_eq!(writer.stats().copy_bytes, 8);
    }

    #[test]
    fn non_adjacent_copies_stay_separate() {
        let mut buf = Vec::new();
        let mut writer = CommandWriter::new(&mut buf);
        writer.write_copy(0, 4).unwrap();
        writer.write_copy(100, 4).unwrap();
        writer.write_eof().unwrap();

        assert_eq!(writer.stats().copy_cmds, 2);
    }

    #[test]
    fn roundtrip_all_command_kinds() {
        let mut buf = Vec::new();
        let mut writer = CommandWriter::new(&mut buf);
        writer.write_data(b"hello").unwrap();
        writer.write_copy(10, 5).unwrap();
        writer
            .write_signature(&Signature {
                block_len: 4,
                records: vec![crate::signature::SignatureRecord {
                    weak: 7,
                    strong: [0u8; crate::strong::STRONG_SUM_LEN],
                }],
            })
            .unwrap();
        writer.write_eof().unwrap();

        let mut cursor = &buf[..];
        assert_eq!(read_command(&mut cursor).unwrap(), Command::Data(b"hello".to_vec()));
        assert_eq!(
            read_command(&mut cursor).unwrap(),
            Command::Copy { offset: 10, length: 5 }
        );
        match read_command(&mut cursor).unwrap() {
            Command::Signature(sig) => {
                assert_eq!(sig.block_len, 4);
                assert_eq!(sig.records.len(), 1);
            }
            other => panic!("expected Signature, got {other:?}"),
        }
        assert_eq!(read_command(&mut cursor).unwrap(), Command::Eof);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let buf = [0xFFu8];
        let err = read_command(&buf[..]).unwrap_err();
        assert!(matches!(err, Error::MalformedDelta(_)));
    }
}
