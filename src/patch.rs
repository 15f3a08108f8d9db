//! Delta application.
//!
//! Reconstructs the new file by replaying a delta stream against a seekable old
//! file: literal data is copied straight through, and each back-reference seeks
//! into the old file and copies the referenced range.

use crate::command::{read_command, Command};
use crate::error::{Error, Result};
use crate::framing;
use crate::signature::Signature;
use crate::stats::Stats;
use std::io::{self, Read, Seek, SeekFrom, Write};

/// Applies a delta stream to `old`, writing the reconstructed file to `new`.
///
/// Discards any embedded signature command; use [`apply_capturing`] to retrieve it
/// without a second pass over `new`.
///
/// # Errors
/// Returns [`Error::UnsupportedDeltaVersion`] on a magic mismatch,
/// [`Error::MalformedDelta`] on a truncated or invalid command stream, or an I/O
/// error from `old`, `delta`, or `new`.
pub fn apply<R: Read + Seek, D: Read, W: Write>(old: R, delta: D, new: W) -> Result<Stats> {
    let (stats, _) = apply_capturing(old, delta, new)?;
    Ok(stats)
}

/// Applies a delta stream to `old`, writing the reconstructed file to `new`, and
/// also returns the embedded signature of `new` if the delta carried one.
///
/// Tracks the old file's current read position so consecutive `Copy` commands
/// that are already contiguous in the old file don't trigger a redundant seek.
///
/// # Errors
/// See [`apply`].
pub fn apply_capturing<R: Read + Seek, D: Read, W: Write>(
    mut old: R,
    mut delta: D,
    mut new: W,
) -> Result<(Stats, Option<Signature>)> {
    let magic = framing::read_u32(&mut delta).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::MalformedDelta("truncated delta stream: missing magic".to_string())
        } else {
            Error::Io(e)
        }
    })?;
    if magic != crate::command::HS_LT_MAGIC {
        return Err(Error::UnsupportedDeltaVersion { found: magic });
    }

    let mut stats = Stats::default();
    let mut current_pos: u64 = 0;
    let mut captured_signature = None;

    loop {
        match read_command(&mut delta)? {
            Command::Data(data) => {
                new.write_all(&data)?;
                stats.lit_cmds += 1;
                stats.lit_bytes += data.len() as u64;
            }
            Command::Copy { offset, length } => {
                if current_pos != offset {
                    old.seek(SeekFrom::Start(offset))?;
                }
                let copied = io::copy(&mut (&mut old).take(length), &mut new)?;
                if copied != length {
                    return Err(Error::MalformedDelta(format!(
                        "copy command requested {length} bytes but old file yielded only {copied}"
                    )));
                }
                current_pos = offset + length;
                stats.copy_cmds += 1;
                stats.copy_bytes += length;

                #[cfg(feature = "tracing")]
                tracing::trace!(offset, length, "applied copy");
            }
            Command::Signature(sig) => {
                stats.sig_cmds += 1;
                stats.sig_bytes += sig
                    .records
                    .len()
                    .checked_mul(4 + crate::strong::STRONG_SUM_LEN)
                    .map(|n| n as u64)
                    .unwrap_or(u64::MAX);
                captured_signature = Some(sig);
            }
            Command::Eof => break,
        }
    }

    Ok((stats, captured_signature))
}
