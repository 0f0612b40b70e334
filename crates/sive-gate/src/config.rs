//! Gate configuration

use serde::{Deserialize, Serialize};
use sive_classify::ClassifierConfig;
use std::time::Duration;

/// Gate policy configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Change-classification policy
    pub classifier: ClassifierConfig,
    /// Deadline for the remediation collaborator before the gate falls back
    /// to the original flagged snapshot
    pub remediation_timeout_secs: u64,
}

impl GateConfig {
    /// Create the default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a different classifier configuration
    #[inline]
    #[must_use]
    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = classifier;
        self
    }

    /// With a different insertion threshold
    #[inline]
    #[must_use]
    pub fn with_insertion_threshold(mut self, threshold: usize) -> Self {
        self.classifier = self.classifier.with_insertion_threshold(threshold);
        self
    }

    /// With a different remediation deadline
    #[inline]
    #[must_use]
    pub fn with_remediation_timeout_secs(mut self, secs: u64) -> Self {
        self.remediation_timeout_secs = secs;
        self
    }

    /// Remediation deadline as a [`Duration`]
    #[inline]
    #[must_use]
    pub fn remediation_timeout(&self) -> Duration {
        Duration::from_secs(self.remediation_timeout_secs)
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            classifier: ClassifierConfig::default(),
            remediation_timeout_secs: 30,
        }
    }
}
