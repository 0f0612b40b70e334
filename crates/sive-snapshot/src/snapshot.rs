//! Submission snapshots
//!
//! A [`Snapshot`] holds the literal full text of one code submission at one
//! instant. Snapshots are ephemeral values; only the version store decides
//! what gets persisted.

use crate::hash::ContentHash;
use serde::{Deserialize, Serialize};

/// Literal full-text content of one submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(String);

impl Snapshot {
    /// Create a snapshot from text
    #[inline]
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The empty snapshot (no submission yet)
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Content as a string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the underlying text
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Whether any content has been submitted
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over content lines (without terminators)
    #[inline]
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.lines()
    }

    /// Number of content lines
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.0.lines().count()
    }

    /// Content hash of the literal text
    #[inline]
    #[must_use]
    pub fn hash(&self) -> ContentHash {
        ContentHash::compute(self.0.as_bytes())
    }
}

impl From<String> for Snapshot {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for Snapshot {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl AsRef<str> for Snapshot {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_snapshot_has_no_lines() {
        let snapshot = Snapshot::empty();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.line_count(), 0);
    }

    #[test]
    fn line_count_ignores_trailing_newline() {
        assert_eq!(Snapshot::new("a\nb").line_count(), 2);
        assert_eq!(Snapshot::new("a\nb\n").line_count(), 2);
    }

    #[test]
    fn hash_matches_literal_text() {
        let snapshot = Snapshot::new("int main(){}");
        assert_eq!(snapshot.hash(), ContentHash::compute(b"int main(){}"));
    }

    #[test]
    fn equality_is_textual() {
        assert_eq!(Snapshot::new("x"), Snapshot::from("x"));
        assert_ne!(Snapshot::new("x"), Snapshot::new("x\n"));
    }

    #[test]
    fn serde_is_transparent() {
        let snapshot = Snapshot::new("line1\nline2");
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, "\"line1\\nline2\"");
        let decoded: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, decoded);
    }
}
