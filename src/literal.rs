//! Literal byte accumulator.
//!
//! Buffers bytes that didn't match any block in the old file, so a run of
//! unmatched bytes becomes a single `Data` command instead of one per byte.

use crate::command::CommandWriter;
use crate::error::Result;
use std::io::Write;

/// Accumulates literal bytes between matches; flushed as a single `Data` command.
#[derive(Debug, Default)]
pub struct LiteralBuffer {
    buf: Vec<u8>,
}

impl LiteralBuffer {
    /// Creates an empty literal buffer.
    #[must_use]
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Appends one literal byte.
    pub fn push(&mut self, byte: u8) {
        self.buf.push(byte);
    }

    /// Appends a run of literal bytes (used for the end-of-file short tail).
    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Reports whether the buffer currently holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes the buffered bytes as one `Data` command and empties the buffer.
    ///
    /// A no-op when the buffer is empty, so flushing between two matches never
    /// emits a spurious empty command.
    ///
    /// # Errors
    /// Returns an error if writing to `commands` fails.
    pub fn flush<W: Write>(&mut self, commands: &mut CommandWriter<W>) -> Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let data = std::mem::take(&mut self.buf);
        commands.write_data(&data)
    }
}
