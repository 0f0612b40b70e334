//! External collaborator seams
//!
//! The gate talks to two collaborators through single-method abstractions so
//! the core stays testable against fakes: a remediation transform (an LLM
//! service that perturbs suspicious code into a subtly broken variant) and
//! an identity bootstrap (a stable pseudonym source).

use async_trait::async_trait;
use sive_snapshot::{Identity, IdentityError, Snapshot};

/// Remediation transform collaborator
///
/// Input is the suspicious snapshot; output is structurally similar code
/// with subtly altered correctness, already stripped of any explanatory text
/// or markup fencing. Implementations are typically network-bound and may
/// fail or time out; the gate degrades gracefully when they do.
#[async_trait]
pub trait Remediator: Send + Sync {
    /// Produce a remediated variant of the given snapshot
    ///
    /// # Errors
    /// Returns an error if the backing service is unavailable or produced
    /// unusable output
    async fn remediate(&self, snapshot: &Snapshot) -> Result<Snapshot, TransformError>;
}

/// Identity bootstrap collaborator
///
/// Contract: the same token is returned on every call within the lifetime
/// of the persisted state backing the implementation.
pub trait IdentitySource: Send + Sync {
    /// The stable identity for this process
    ///
    /// # Errors
    /// Returns an error if the persisted token cannot be read or created
    fn identity(&self) -> Result<Identity, BootstrapError>;
}

/// Errors from the remediation collaborator
///
/// All variants are non-fatal to a submission: the gate falls back to the
/// original flagged snapshot rather than stalling the learner.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// Backend could not be reached or answered with an error
    #[error("remediation backend unavailable: {0}")]
    Unavailable(String),

    /// Backend did not answer within the configured deadline
    #[error("remediation timed out after {timeout_secs}s")]
    TimedOut { timeout_secs: u64 },

    /// Backend answered with nothing usable as code
    #[error("remediation returned empty output")]
    EmptyOutput,
}

/// Errors from the identity bootstrap collaborator
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// Token storage could not be read or written
    #[error("identity storage unavailable: {0}")]
    Storage(#[from] std::io::Error),

    /// Persisted token fails identity validation
    #[error("persisted identity invalid: {0}")]
    Invalid(#[from] IdentityError),

    /// Persisted token file is not decodable
    #[error("persisted identity malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}
