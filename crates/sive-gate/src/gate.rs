//! Submission gate
//!
//! Single entry point per submission event. Each call reads the identity's
//! current head, classifies the delta, and either commits through the
//! version store or records an anomaly and requests a remediated variant
//! from the external transform collaborator.

use crate::collab::{Remediator, TransformError};
use crate::config::GateConfig;
use crate::error::GateError;
use dashmap::DashMap;
use sive_classify::{ChangeClassifier, Verdict};
use sive_snapshot::{AnomalyEvent, Identity, Snapshot, VersionRecord};
use sive_store::{Commit, VersionStore};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Terminal outcome of one submission evaluation
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Organic change: committed (or an idempotent no-op)
    Committed(Commit),
    /// Suspicious change: withheld, anomaly recorded, replacement content
    /// for the caller to present as the new working text
    Withheld {
        /// The logged anomaly
        event: AnomalyEvent,
        /// Remediated variant, or the original flagged snapshot when the
        /// transform collaborator was unavailable
        replacement: Snapshot,
    },
}

impl SubmitOutcome {
    /// Whether the submission was committed
    #[inline]
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }

    /// The appended record, if the submission committed new content
    #[inline]
    #[must_use]
    pub fn record(&self) -> Option<&VersionRecord> {
        match self {
            Self::Committed(commit) => commit.record(),
            Self::Withheld { .. } => None,
        }
    }
}

/// Orchestrates submission evaluation over store, classifier and remediator
///
/// Holds no persistent state of its own: everything durable lives in the
/// version store, and the per-identity mutexes only serialize in-flight
/// evaluations.
pub struct GateController {
    store: Arc<VersionStore>,
    classifier: ChangeClassifier,
    remediator: Arc<dyn Remediator>,
    locks: DashMap<Identity, Arc<Mutex<()>>>,
    config: GateConfig,
}

impl std::fmt::Debug for GateController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GateController")
            .field("config", &self.config)
            .field("store_root", &self.store.root())
            .finish_non_exhaustive()
    }
}

impl GateController {
    /// Create a gate over the given store and remediation collaborator
    #[must_use]
    pub fn new(store: Arc<VersionStore>, remediator: Arc<dyn Remediator>, config: GateConfig) -> Self {
        Self {
            store,
            classifier: ChangeClassifier::new(config.classifier),
            remediator,
            locks: DashMap::new(),
            config,
        }
    }

    /// Configuration in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Backing version store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &VersionStore {
        &self.store
    }

    /// Evaluate one submission for `identity`
    ///
    /// The identity's lock is held from before the head read until the
    /// outcome is determined, including across the awaited remediation call,
    /// so evaluations for one identity never interleave. Distinct identities
    /// proceed independently.
    ///
    /// # Errors
    /// Returns [`GateError::Storage`] if persisted state cannot be read or
    /// written; remediation failures degrade to returning the flagged
    /// snapshot and are not errors
    pub async fn submit(
        &self,
        identity: &Identity,
        incoming: Snapshot,
    ) -> Result<SubmitOutcome, GateError> {
        let lock = self.lock_for(identity);
        let _guard = lock.lock().await;

        self.store.initialize(identity)?;
        let head = self.store.current_head(identity)?;

        match self.classifier.classify(&head, &incoming) {
            Verdict::Organic => {
                let commit = self.store.commit(identity, &incoming)?;
                Ok(SubmitOutcome::Committed(commit))
            }
            Verdict::Suspicious { inserted_lines } => {
                let event = AnomalyEvent::new(identity.clone(), inserted_lines);
                self.store.append_anomaly(&event)?;
                tracing::warn!(
                    identity = %identity,
                    inserted_lines,
                    "suspicious insertion, submission withheld"
                );

                let replacement = self.request_remediation(&incoming).await;
                Ok(SubmitOutcome::Withheld { event, replacement })
            }
        }
    }

    /// Ask the transform collaborator for a perturbed variant
    ///
    /// Falls back to the flagged snapshot on failure or timeout so the
    /// learner always gets content back.
    async fn request_remediation(&self, flagged: &Snapshot) -> Snapshot {
        let deadline = self.config.remediation_timeout();
        let result = tokio::time::timeout(deadline, self.remediator.remediate(flagged)).await;
        match result {
            Ok(Ok(remediated)) => {
                tracing::info!("remediated variant substituted for flagged submission");
                remediated
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "remediation failed, presenting flagged snapshot");
                flagged.clone()
            }
            Err(_) => {
                let err = TransformError::TimedOut {
                    timeout_secs: self.config.remediation_timeout_secs,
                };
                tracing::warn!(error = %err, "remediation timed out, presenting flagged snapshot");
                flagged.clone()
            }
        }
    }

    /// Lock handle for one identity, created on first use
    fn lock_for(&self, identity: &Identity) -> Arc<Mutex<()>> {
        self.locks
            .entry(identity.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NeverCalled;

    #[async_trait]
    impl Remediator for NeverCalled {
        async fn remediate(&self, _snapshot: &Snapshot) -> Result<Snapshot, TransformError> {
            panic!("remediator must not run for organic submissions");
        }
    }

    fn gate(remediator: Arc<dyn Remediator>) -> (tempfile::TempDir, GateController) {
        let dir = tempfile::TempDir::new().unwrap();
        let store = Arc::new(VersionStore::open(dir.path()).unwrap());
        (dir, GateController::new(store, remediator, GateConfig::new()))
    }

    fn identity() -> Identity {
        Identity::new("abc123").unwrap()
    }

    #[tokio::test]
    async fn organic_submission_never_touches_remediator() {
        let (_dir, gate) = gate(Arc::new(NeverCalled));
        let outcome = gate
            .submit(&identity(), Snapshot::new("int main(){}"))
            .await
            .unwrap();
        assert!(outcome.is_committed());
        assert_eq!(outcome.record().unwrap().ordinal, 0);
    }

    #[tokio::test]
    async fn resubmitting_head_is_a_committed_no_op() {
        let (_dir, gate) = gate(Arc::new(NeverCalled));
        let id = identity();
        gate.submit(&id, Snapshot::new("int main(){}")).await.unwrap();
        let outcome = gate.submit(&id, Snapshot::new("int main(){}")).await.unwrap();

        assert!(outcome.is_committed());
        assert!(outcome.record().is_none());
        assert_eq!(gate.store().records(&id).unwrap().len(), 1);
    }
}
