//! New-signature emitter.
//!
//! Buffers a signature record for every `block_len`-aligned position in the *new*
//! file as the encoder scans past it, independent of where matches land, so a
//! recipient reconstructing the new file can retain its signature for the next
//! round without a second pass.

use crate::command::CommandWriter;
use crate::error::Result;
use crate::signature::{Signature, SignatureRecord};
use crate::strong::strong_sum;
use std::io::Write;

/// Buffers new-signature records until end-of-stream, then flushes them once.
pub struct NewSigEmitter {
    block_len: u32,
    records: Vec<SignatureRecord>,
}

impl NewSigEmitter {
    /// Creates an emitter for the given block length.
    #[must_use]
    pub fn new(block_len: u32) -> Self {
        Self {
            block_len,
            records: Vec::new(),
        }
    }

    /// Emits a new-signature record for `block` if `absolute_cursor` lands on a
    /// `block_len` boundary.
    ///
    /// `weak` is the caller's current rolling checksum, which at the moment this is
    /// called covers exactly `block`.
    pub fn tick(&mut self, absolute_cursor: u64, weak: u32, block: &[u8]) {
        if absolute_cursor % u64::from(self.block_len) != 0 {
            return;
        }
        self.records.push(SignatureRecord {
            weak,
            strong: strong_sum(block),
        });
    }

    /// Flushes the buffered records as a single `Signature` command.
    ///
    /// Always emits, even with zero records, per [`CommandWriter::write_signature`].
    ///
    /// # Errors
    /// Returns an error if writing to `commands` fails.
    pub fn drain<W: Write>(&mut self, commands: &mut CommandWriter<W>) -> Result<()> {
        let records = std::mem::take(&mut self.records);
        #[cfg(feature = "tracing")]
        tracing::trace!(records = records.len(), "draining new-signature buffer");
        commands.write_signature(&Signature {
            block_len: self.block_len,
            records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_only_on_block_boundaries() {
        let mut emitter = NewSigEmitter::new(4);
        emitter.tick(0, 1, b"abcd");
        emitter.tick(1, 2, b"bcde");
        emitter.tick(4, 3, b"efgh");
        assert_eq!(emitter.records.len(), 2);
    }

    #[test]
    fn drain_always_emits_even_when_empty() {
        let mut emitter = NewSigEmitter::new(4);
        let mut buf = Vec::new();
        let mut writer = CommandWriter::new(&mut buf);
        emitter.drain(&mut writer).unwrap();
        assert_eq!(writer.stats().sig_cmds, 1);
    }
}
