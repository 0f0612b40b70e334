//! Store error types

use sive_snapshot::Identity;
use std::path::PathBuf;

/// Errors raised by the version store
///
/// Every variant is fatal to the submission being processed: persistence
/// failures must surface to the caller rather than silently skip a write.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Underlying storage cannot be read or written
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] std::io::Error),

    /// A persisted log line failed to decode
    #[error("corrupt record in {path}: {source}")]
    Corrupt {
        /// Log file holding the bad line
        path: PathBuf,
        /// Decode failure
        #[source]
        source: serde_json::Error,
    },

    /// A record failed to encode for appending
    #[error("record encoding failed: {0}")]
    Encode(serde_json::Error),

    /// Commit log replay found a broken ordinal sequence or hash chain
    #[error("commit log chain violation for {identity} at ordinal {ordinal}")]
    ChainViolation {
        /// Identity whose log is damaged
        identity: Identity,
        /// First ordinal that fails verification
        ordinal: u64,
    },
}
