//! The top-level streaming encode loop.
//!
//! Scans the new file against a [`SignatureIndex`] of the old file one block at a
//! time: a matched block becomes a `Copy`, an unmatched byte joins a buffered run
//! of literal bytes, and every `block_len`-aligned position in the new file gets a
//! fresh signature record for the next round.

use crate::command::CommandWriter;
use crate::error::{Error, Result};
use crate::literal::LiteralBuffer;
use crate::newsig::NewSigEmitter;
use crate::readahead::ReadaheadBuffer;
use crate::signature::SignatureIndex;
use crate::stats::Stats;
use crate::weak::{seed_value, RollingSum};
use std::io::{Read, Write};

/// Drives the streaming encode loop.
///
/// Stateless between calls: all mutable state lives in the buffers local to
/// [`Encoder::encode`], so a single `Encoder` value may drive multiple independent
/// encodes (even concurrently, each with its own reader/writer/index).
#[derive(Default)]
pub struct Encoder<'a> {
    cancel: Option<&'a dyn Fn() -> bool>,
}

impl<'a> Encoder<'a> {
    /// Creates an encoder with no cancellation probe.
    #[must_use]
    pub fn new() -> Self {
        Self { cancel: None }
    }

    /// Creates an encoder that checks `cancel` at the top of every outer iteration.
    #[must_use]
    pub fn with_cancellation(cancel: &'a dyn Fn() -> bool) -> Self {
        Self { cancel: Some(cancel) }
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_some_and(|c| c()) {
            return Err(Error::Cancelled);
        }
        Ok(())
    }

    /// Encodes `reader` against `index`, writing the delta to `writer`.
    ///
    /// # Errors
    /// Returns [`Error::Cancelled`] if the cancellation probe fires, or an I/O error
    /// from either the reader or the writer. No partial output is valid on error;
    /// the caller must discard whatever was written to `writer`.
    pub fn encode<R: Read, W: Write>(
        &self,
        index: &SignatureIndex,
        mut reader: R,
        writer: W,
    ) -> Result<Stats> {
        let block_len = index.block_len() as usize;
        let mut commands = CommandWriter::new(writer);
        commands.write_magic()?;

        let mut newsig = NewSigEmitter::new(index.block_len());
        let mut literal = LiteralBuffer::new();
        let mut readahead = ReadaheadBuffer::new(block_len);

        self.check_cancelled()?;
        let initial_read = readahead.fill(&mut reader)?;
        if initial_read == 0 {
            // Empty new file: P6 still requires the signature and EOF records.
            newsig.drain(&mut commands)?;
            commands.write_eof()?;
            return Ok(commands.into_stats());
        }

        if initial_read < block_len {
            self.encode_short_whole_file(index, &mut readahead, initial_read, &mut newsig, &mut commands)?;
            newsig.drain(&mut commands)?;
            commands.write_eof()?;
            return Ok(commands.into_stats());
        }

        let mut rolling = RollingSum::new();
        rolling.seed(readahead.window(block_len));

        loop {
            self.check_cancelled()?;
            self.scan_full_blocks(index, &mut readahead, &mut rolling, &mut newsig, &mut literal, &mut commands)?;

            readahead.slide();
            self.check_cancelled()?;
            let before = readahead.amount();
            let n = readahead.fill(&mut reader)?;
            if n == 0 {
                break;
            }
            if before < block_len && readahead.amount() >= block_len {
                rolling.seed(readahead.window(block_len));
            }
        }

        self.encode_tail(index, &mut readahead, &mut newsig, &mut literal, &mut commands)?;

        literal.flush(&mut commands)?;
        newsig.drain(&mut commands)?;
        commands.write_eof()?;
        Ok(commands.into_stats())
    }

    /// Handles the degenerate case where the whole new file is shorter than one
    /// block (so no incremental rolling is ever needed).
    fn encode_short_whole_file<W: Write>(
        &self,
        index: &SignatureIndex,
        readahead: &mut ReadaheadBuffer,
        len: usize,
        newsig: &mut NewSigEmitter,
        commands: &mut CommandWriter<W>,
    ) -> Result<()> {
        let window = readahead.window(len);
        let weak = seed_value(window);
        newsig.tick(readahead.absolute_cursor(), weak, window);

        match index.find_match(weak, window) {
            Some(block_idx) => {
                let offset = u64::from(block_idx - 1) * u64::from(index.block_len());
                commands.write_copy(offset, len as u64)?;
            }
            None => commands.write_data(window)?,
        }
        Ok(())
    }

    /// The main scan: while at least one full block remains in the readahead
    /// buffer, tick the new-signature emitter, probe the index, and either copy a
    /// matched block or buffer one literal byte.
    fn scan_full_blocks<W: Write>(
        &self,
        index: &SignatureIndex,
        readahead: &mut ReadaheadBuffer,
        rolling: &mut RollingSum,
        newsig: &mut NewSigEmitter,
        literal: &mut LiteralBuffer,
        commands: &mut CommandWriter<W>,
    ) -> Result<()> {
        let block_len = index.block_len() as usize;

        while readahead.amount() - readahead.cursor() >= block_len {
            let weak = rolling.value();
            let abs_cursor = readahead.absolute_cursor();
            let window = readahead.window(block_len);
            newsig.tick(abs_cursor, weak, window);

            if let Some(block_idx) = index.find_match(weak, window) {
                literal.flush(commands)?;
                let offset = u64::from(block_idx - 1) * index.block_len() as u64;
                commands.write_copy(offset, block_len as u64)?;
                readahead.advance(block_len);

                #[cfg(feature = "tracing")]
                tracing::trace!(block_idx, offset, "matched block, emitted copy");

                if readahead.amount() - readahead.cursor() >= block_len {
                    rolling.seed(readahead.window(block_len));
                } else {
                    rolling.reset();
                }
                continue;
            }

            let out_byte = readahead.byte_at_cursor();
            literal.push(out_byte);
            readahead.advance(1);

            if readahead.amount() - readahead.cursor() >= block_len {
                let in_byte = readahead.byte_at(block_len - 1);
                rolling.roll(out_byte, in_byte, block_len as u32);
            }
        }
        Ok(())
    }

    /// Handles whatever is left once the source is truly exhausted (fewer than one
    /// full block remains). A fresh, non-incremental checksum is computed directly
    /// over the short tail rather than continuing the rolling update.
    fn encode_tail<W: Write>(
        &self,
        index: &SignatureIndex,
        readahead: &mut ReadaheadBuffer,
        newsig: &mut NewSigEmitter,
        literal: &mut LiteralBuffer,
        commands: &mut CommandWriter<W>,
    ) -> Result<()> {
        let remaining = readahead.amount() - readahead.cursor();
        if remaining == 0 {
            return Ok(());
        }

        let window = readahead.window(remaining);
        let weak = seed_value(window);
        let abs_cursor = readahead.absolute_cursor();
        newsig.tick(abs_cursor, weak, window);

        match index.find_match(weak, window) {
            Some(block_idx) => {
                literal.flush(commands)?;
                let offset = u64::from(block_idx - 1) * u64::from(index.block_len());
                commands.write_copy(offset, remaining as u64)?;
            }
            None => literal.extend_from_slice(window),
        }
        Ok(())
    }
}
