//! Committed version records and anomaly events
//!
//! A [`VersionRecord`] is one immutable committed snapshot for one identity.
//! Records carry a hash-chain pair (`prev_entry`, `entry`) so an append-only
//! commit log is tamper-evident when replayed. An [`AnomalyEvent`] marks a
//! rejected submission; it never produces a version record.

use crate::hash::ContentHash;
use crate::identity::Identity;
use crate::snapshot::Snapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Unique anomaly event identifier (ULID for sortability)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(pub Ulid);

impl EventId {
    /// Generate a new event ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One committed snapshot for one identity
///
/// # Invariants
/// - `ordinal` values for one identity are strictly increasing from 0 with
///   no gaps
/// - `content_hash` is always the hash of `content`
/// - `entry` seals the record over `prev_entry`; records are never edited
///   or deleted once appended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Owning identity
    pub identity: Identity,
    /// Position in the identity's commit chain, starting at 0
    pub ordinal: u64,
    /// Full submission text (not a patch)
    pub content: Snapshot,
    /// Hash of `content`
    pub content_hash: ContentHash,
    /// Commit timestamp
    pub committed_at: DateTime<Utc>,
    /// Entry hash of the preceding record (zero anchor for ordinal 0)
    pub prev_entry: ContentHash,
    /// Chain hash sealing this record
    pub entry: ContentHash,
}

impl VersionRecord {
    /// Build a sealed record for the next position in a chain
    #[must_use]
    pub fn seal(
        identity: Identity,
        ordinal: u64,
        content: Snapshot,
        committed_at: DateTime<Utc>,
        prev_entry: ContentHash,
    ) -> Self {
        let content_hash = content.hash();
        let mut record = Self {
            identity,
            ordinal,
            content,
            content_hash,
            committed_at,
            prev_entry,
            entry: ContentHash::default(),
        };
        record.entry = record.entry_hash();
        record
    }

    /// Recompute the chain hash over this record's sealed fields
    #[must_use]
    pub fn entry_hash(&self) -> ContentHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.identity.as_str().as_bytes());
        hasher.update(&[0]);
        hasher.update(&self.ordinal.to_le_bytes());
        hasher.update(self.committed_at.to_rfc3339().as_bytes());
        hasher.update(&[0]);
        hasher.update(self.content_hash.as_bytes());
        hasher.update(self.prev_entry.as_bytes());
        ContentHash::new(*hasher.finalize().as_bytes())
    }

    /// Verify internal integrity (content hash and chain hash)
    #[inline]
    #[must_use]
    pub fn verify(&self) -> bool {
        self.content_hash == self.content.hash() && self.entry == self.entry_hash()
    }
}

/// Record of a rejected submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyEvent {
    /// Unique event ID
    pub event_id: EventId,
    /// Owning identity
    pub identity: Identity,
    /// Pure-insertion line count that triggered rejection
    pub inserted_lines: usize,
    /// Detection timestamp
    pub detected_at: DateTime<Utc>,
}

impl AnomalyEvent {
    /// Create an event stamped with the current time
    #[inline]
    #[must_use]
    pub fn new(identity: Identity, inserted_lines: usize) -> Self {
        Self {
            event_id: EventId::new(),
            identity,
            inserted_lines,
            detected_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity::new("abc123").unwrap()
    }

    #[test]
    fn sealed_record_verifies() {
        let record = VersionRecord::seal(
            identity(),
            0,
            Snapshot::new("int main(){}"),
            Utc::now(),
            ContentHash::default(),
        );
        assert_eq!(record.ordinal, 0);
        assert!(record.prev_entry.is_zero());
        assert!(record.verify());
    }

    #[test]
    fn tampered_content_fails_verification() {
        let mut record = VersionRecord::seal(
            identity(),
            0,
            Snapshot::new("int main(){}"),
            Utc::now(),
            ContentHash::default(),
        );
        record.content = Snapshot::new("int main(){ system(\"rm -rf /\"); }");
        assert!(!record.verify());
    }

    #[test]
    fn tampered_ordinal_fails_verification() {
        let mut record = VersionRecord::seal(
            identity(),
            3,
            Snapshot::new("x"),
            Utc::now(),
            ContentHash::compute(b"prev"),
        );
        record.ordinal = 4;
        assert!(!record.verify());
    }

    #[test]
    fn chain_links_through_prev_entry() {
        let first = VersionRecord::seal(
            identity(),
            0,
            Snapshot::new("v0"),
            Utc::now(),
            ContentHash::default(),
        );
        let second = VersionRecord::seal(
            identity(),
            1,
            Snapshot::new("v1"),
            Utc::now(),
            first.entry,
        );
        assert_eq!(second.prev_entry, first.entry);
        assert_ne!(second.entry, first.entry);
        assert!(second.verify());
    }

    #[test]
    fn record_serde_round_trip_preserves_chain() {
        let record = VersionRecord::seal(
            identity(),
            0,
            Snapshot::new("line1\nline2\n"),
            Utc::now(),
            ContentHash::default(),
        );
        let json = serde_json::to_string(&record).unwrap();
        let decoded: VersionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, decoded);
        assert!(decoded.verify());
    }

    #[test]
    fn anomaly_event_records_insertion_count() {
        let event = AnomalyEvent::new(identity(), 12);
        assert_eq!(event.inserted_lines, 12);
        assert_eq!(event.identity, identity());
    }

    #[test]
    fn anomaly_event_ids_are_unique() {
        let a = AnomalyEvent::new(identity(), 6);
        let b = AnomalyEvent::new(identity(), 6);
        assert_ne!(a.event_id, b.event_id);
    }
}
