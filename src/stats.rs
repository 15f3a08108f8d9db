//! Monotonic counters surfaced to callers after an encode or patch pass.

/// Counters describing the commands emitted by an encode, or consumed by a patch.
///
/// Fields only ever increase during a single call; see [`crate::error::Error`] for
/// why their contents are not contractual on a failed call.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Number of `Data` (literal) commands emitted.
    pub lit_cmds: u64,
    /// Total literal bytes carried by `Data` commands.
    pub lit_bytes: u64,
    /// Number of `Signature` commands emitted (normally exactly one).
    pub sig_cmds: u64,
    /// Total bytes of embedded signature payload (`4 + STRONG_SUM_LEN` per record).
    pub sig_bytes: u64,
    /// Number of `Copy` commands emitted, after coalescing.
    pub copy_cmds: u64,
    /// Total bytes covered by `Copy` commands.
    pub copy_bytes: u64,
}
