//! Gate error types

use sive_store::StoreError;

/// Errors surfaced by a submission evaluation
///
/// Only storage failures are fatal to a `submit` call. Remediation failures
/// never appear here: the gate degrades to returning the flagged snapshot
/// unmodified, because withholding feedback entirely would stall the
/// learner.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    /// Version or anomaly storage failed; nothing was partially committed
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl GateError {
    /// Whether retrying the same submission could succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(StoreError::Unavailable(_)))
    }
}
