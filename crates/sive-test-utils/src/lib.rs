//! Testing utilities for the SIVE workspace
//!
//! Shared fakes, fixtures, and constructors.

#![allow(missing_docs)]

use async_trait::async_trait;
use sive_gate::{
    BootstrapError, GateConfig, GateController, IdentitySource, Remediator, TransformError,
};
use sive_snapshot::{Identity, Snapshot};
use sive_store::VersionStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Remediator that always returns the same canned snapshot.
pub struct FixedRemediator {
    output: Snapshot,
    calls: AtomicUsize,
}

impl FixedRemediator {
    pub fn new(output: impl Into<Snapshot>) -> Self {
        Self {
            output: output.into(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of remediation requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Remediator for FixedRemediator {
    async fn remediate(&self, _snapshot: &Snapshot) -> Result<Snapshot, TransformError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.output.clone())
    }
}

/// Remediator whose backing service is always down.
pub struct FailingRemediator;

#[async_trait]
impl Remediator for FailingRemediator {
    async fn remediate(&self, _snapshot: &Snapshot) -> Result<Snapshot, TransformError> {
        Err(TransformError::Unavailable("connection refused".to_string()))
    }
}

/// Remediator that stalls longer than any test deadline.
pub struct SlowRemediator {
    pub delay: Duration,
    pub output: Snapshot,
}

#[async_trait]
impl Remediator for SlowRemediator {
    async fn remediate(&self, _snapshot: &Snapshot) -> Result<Snapshot, TransformError> {
        tokio::time::sleep(self.delay).await;
        Ok(self.output.clone())
    }
}

/// Identity source returning one fixed token.
pub struct StaticIdentitySource(pub Identity);

impl IdentitySource for StaticIdentitySource {
    fn identity(&self) -> Result<Identity, BootstrapError> {
        Ok(self.0.clone())
    }
}

pub fn identity(token: &str) -> Identity {
    Identity::new(token).unwrap()
}

/// Snapshot of `n` distinct numbered lines sharing a prefix.
pub fn snapshot_of_lines(prefix: &str, n: usize) -> Snapshot {
    let text: String = (0..n).map(|i| format!("{prefix} {i}\n")).collect();
    Snapshot::new(text)
}

/// Append `n` distinct lines to an existing snapshot.
pub fn with_appended_lines(base: &Snapshot, prefix: &str, n: usize) -> Snapshot {
    Snapshot::new(format!(
        "{}{}",
        base.as_str(),
        snapshot_of_lines(prefix, n).as_str()
    ))
}

/// Fresh store in a temporary directory; the directory guard must be kept
/// alive for the duration of the test.
pub fn temp_store() -> (TempDir, Arc<VersionStore>) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(VersionStore::open(dir.path()).unwrap());
    (dir, store)
}

/// Gate over a fresh temp store and the given remediator.
pub fn temp_gate(
    remediator: Arc<dyn Remediator>,
    config: GateConfig,
) -> (TempDir, Arc<GateController>) {
    let (dir, store) = temp_store();
    (dir, Arc::new(GateController::new(store, remediator, config)))
}
