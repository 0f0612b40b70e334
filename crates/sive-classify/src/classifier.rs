//! Change classification
//!
//! Decides whether a transition from one snapshot to the next represents
//! organic incremental editing or a suspicious bulk insertion.

use crate::diff::line_delta;
use serde::{Deserialize, Serialize};
use sive_snapshot::Snapshot;

/// Classifier verdict for a submission transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Incremental editing; safe to commit
    Organic,
    /// Bulk insertion over the configured threshold; withhold the commit
    Suspicious {
        /// Pure-insertion line count that tripped the threshold
        inserted_lines: usize,
    },
}

impl Verdict {
    /// Whether this verdict withholds the commit
    #[inline]
    #[must_use]
    pub fn is_suspicious(&self) -> bool {
        matches!(self, Self::Suspicious { .. })
    }
}

/// Classifier policy configuration
///
/// Both knobs are policy, not structural invariants: deployments tune them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Maximum pure-insertion line count still considered organic
    pub insertion_threshold: usize,
    /// Exempt the very first submission (empty old snapshot) from the
    /// threshold check
    pub exempt_initial: bool,
}

impl ClassifierConfig {
    /// Create the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a different insertion threshold
    #[inline]
    #[must_use]
    pub fn with_insertion_threshold(mut self, threshold: usize) -> Self {
        self.insertion_threshold = threshold;
        self
    }

    /// With first-submission exemption enabled or disabled
    #[inline]
    #[must_use]
    pub fn with_exempt_initial(mut self, exempt: bool) -> Self {
        self.exempt_initial = exempt;
        self
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            insertion_threshold: 5,
            exempt_initial: true,
        }
    }
}

/// Diff-based change classifier
///
/// Stateless apart from its configuration; one classifier can serve any
/// number of identities concurrently.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeClassifier {
    config: ClassifierConfig,
}

impl ChangeClassifier {
    /// Create a classifier with the given configuration
    #[inline]
    #[must_use]
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Configuration in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify the transition from `old` to `new`
    ///
    /// Counts lines present in `new` but absent from the LCS alignment with
    /// `old`. Reordered or context-preserving edits stay aligned and are not
    /// miscounted; only genuinely new lines contribute.
    #[must_use]
    pub fn classify(&self, old: &Snapshot, new: &Snapshot) -> Verdict {
        if old.is_empty() && self.config.exempt_initial {
            tracing::debug!("first submission, threshold check exempted");
            return Verdict::Organic;
        }

        let delta = line_delta(old.as_str(), new.as_str());
        let verdict = if delta.inserted > self.config.insertion_threshold {
            Verdict::Suspicious {
                inserted_lines: delta.inserted,
            }
        } else {
            Verdict::Organic
        };
        tracing::debug!(
            inserted = delta.inserted,
            deleted = delta.deleted,
            threshold = self.config.insertion_threshold,
            suspicious = verdict.is_suspicious(),
            "classified submission transition"
        );
        verdict
    }
}
