//! Durable version store
//!
//! Per-identity append-only history of submitted code. Each identity owns a
//! working file holding the current head plus two append-only logs (commits
//! and anomalies). Ordinal assignment and the chain tip live in an in-memory
//! state map recovered from the commit log on first access, so histories
//! survive process restarts.

use crate::error::StoreError;
use crate::layout::{anomaly_log_path, commit_log_path, identity_dir, working_path};
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use sive_snapshot::{AnomalyEvent, ContentHash, Identity, Snapshot, VersionRecord};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Outcome of a commit request
#[derive(Debug, Clone, PartialEq)]
pub enum Commit {
    /// Content differed from the head; a new record was appended
    Appended(VersionRecord),
    /// Content was identical to the head; nothing was written
    Unchanged,
}

impl Commit {
    /// The appended record, if any
    #[inline]
    #[must_use]
    pub fn record(&self) -> Option<&VersionRecord> {
        match self {
            Self::Appended(record) => Some(record),
            Self::Unchanged => None,
        }
    }

    /// Whether this commit was a no-op
    #[inline]
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// Per-identity in-memory chain position
#[derive(Debug, Clone, Copy, Default)]
struct HeadState {
    /// Ordinal the next appended record will take
    next_ordinal: u64,
    /// Entry hash of the latest record (zero anchor when empty)
    chain_tip: ContentHash,
}

/// Durable, ordered, append-only storage of identity code histories
///
/// # Invariants
/// - Records for one identity are strictly ordered from ordinal 0 with no
///   gaps; none is ever edited or deleted
/// - After a successful commit the working file equals the latest record's
///   content
/// - Ordinal assignment is linearized per identity, so concurrent commits
///   cannot mint duplicates
#[derive(Debug)]
pub struct VersionStore {
    root: PathBuf,
    states: DashMap<Identity, HeadState>,
}

impl VersionStore {
    /// Open a store rooted at `root`, creating the directory if needed
    ///
    /// # Errors
    /// Returns [`StoreError::Unavailable`] if the root cannot be created
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "opened version store");
        Ok(Self {
            root,
            states: DashMap::new(),
        })
    }

    /// Store root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensure storage exists for `identity`
    ///
    /// Idempotent: repeated calls are no-ops. On first access the identity's
    /// directory is created, the commit log is replayed to recover the chain
    /// position, and a missing working file is restored from the latest
    /// record.
    ///
    /// # Errors
    /// Returns an error if storage cannot be read or written
    pub fn initialize(&self, identity: &Identity) -> Result<(), StoreError> {
        self.with_state(identity, |_| Ok(()))
    }

    /// Content of the latest committed record
    ///
    /// Absence is a valid state: an identity with no commits yields the
    /// empty snapshot, not an error.
    ///
    /// # Errors
    /// Returns an error only on a genuine read failure
    pub fn current_head(&self, identity: &Identity) -> Result<Snapshot, StoreError> {
        read_working(&self.root, identity)
    }

    /// Commit a snapshot as the identity's next version
    ///
    /// Identical content is an idempotent no-op: no record, no side effect.
    /// Otherwise one immutable log entry is appended and the working file is
    /// overwritten to match.
    ///
    /// # Errors
    /// Returns an error if either write fails; a failed write is never
    /// reported as success
    pub fn commit(&self, identity: &Identity, snapshot: &Snapshot) -> Result<Commit, StoreError> {
        self.with_state(identity, |state| {
            let head = read_working(&self.root, identity)?;
            if head == *snapshot {
                tracing::debug!(identity = %identity, "content unchanged, skipping commit");
                return Ok(Commit::Unchanged);
            }

            let record = VersionRecord::seal(
                identity.clone(),
                state.next_ordinal,
                snapshot.clone(),
                Utc::now(),
                state.chain_tip,
            );
            append_json_line(&commit_log_path(&self.root, identity), &record)?;
            fs::write(working_path(&self.root, identity), snapshot.as_str())?;

            state.next_ordinal = record.ordinal + 1;
            state.chain_tip = record.entry;
            tracing::info!(
                identity = %identity,
                ordinal = record.ordinal,
                hash = %record.content_hash.short(),
                "committed new version"
            );
            Ok(Commit::Appended(record))
        })
    }

    /// Append a rejected-submission event to the identity's anomaly log
    ///
    /// # Errors
    /// Returns an error if the append fails
    pub fn append_anomaly(&self, event: &AnomalyEvent) -> Result<(), StoreError> {
        fs::create_dir_all(identity_dir(&self.root, &event.identity))?;
        append_json_line(&anomaly_log_path(&self.root, &event.identity), event)?;
        tracing::warn!(
            identity = %event.identity,
            event_id = %event.event_id,
            inserted_lines = event.inserted_lines,
            "anomaly recorded"
        );
        Ok(())
    }

    /// Replay the identity's full commit log
    ///
    /// # Errors
    /// Returns an error on read failure or a corrupt log line
    pub fn records(&self, identity: &Identity) -> Result<Vec<VersionRecord>, StoreError> {
        read_json_lines(&commit_log_path(&self.root, identity))
    }

    /// Replay the identity's anomaly log
    ///
    /// # Errors
    /// Returns an error on read failure or a corrupt log line
    pub fn anomalies(&self, identity: &Identity) -> Result<Vec<AnomalyEvent>, StoreError> {
        read_json_lines(&anomaly_log_path(&self.root, identity))
    }

    /// Verify the identity's commit log ordinals and hash chain
    ///
    /// # Errors
    /// Returns [`StoreError::ChainViolation`] at the first record whose
    /// ordinal, chain link, or hashes do not replay cleanly
    pub fn verify_chain(&self, identity: &Identity) -> Result<(), StoreError> {
        let mut prev = ContentHash::default();
        for (position, record) in self.records(identity)?.iter().enumerate() {
            if record.ordinal != position as u64 || record.prev_entry != prev || !record.verify() {
                return Err(StoreError::ChainViolation {
                    identity: identity.clone(),
                    ordinal: record.ordinal,
                });
            }
            prev = record.entry;
        }
        Ok(())
    }

    /// Run `f` with the identity's chain state, recovering it on first access
    ///
    /// Holding the map entry across `f` linearizes ordinal assignment per
    /// identity; entries are never removed.
    fn with_state<R>(
        &self,
        identity: &Identity,
        f: impl FnOnce(&mut HeadState) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let mut guard = match self.states.entry(identity.clone()) {
            Entry::Occupied(occupied) => occupied.into_ref(),
            Entry::Vacant(vacant) => {
                let recovered = self.recover_state(identity)?;
                vacant.insert(recovered)
            }
        };
        f(guard.value_mut())
    }

    /// Rebuild chain position from the persisted commit log
    fn recover_state(&self, identity: &Identity) -> Result<HeadState, StoreError> {
        fs::create_dir_all(identity_dir(&self.root, identity))?;
        let records = self.records(identity)?;
        match records.last() {
            Some(last) => {
                let working = working_path(&self.root, identity);
                if !working.exists() {
                    tracing::warn!(
                        identity = %identity,
                        "working file missing, restoring from latest record"
                    );
                    fs::write(&working, last.content.as_str())?;
                }
                Ok(HeadState {
                    next_ordinal: last.ordinal + 1,
                    chain_tip: last.entry,
                })
            }
            None => Ok(HeadState::default()),
        }
    }
}

/// Read the working file, treating absence as the empty snapshot
fn read_working(root: &Path, identity: &Identity) -> Result<Snapshot, StoreError> {
    match fs::read_to_string(working_path(root, identity)) {
        Ok(text) => Ok(Snapshot::new(text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Snapshot::empty()),
        Err(err) => Err(err.into()),
    }
}

/// Append one serialized value as a JSON line
fn append_json_line<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let line = serde_json::to_string(value).map_err(StoreError::Encode)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Read a JSONL file, treating absence as the empty log
fn read_json_lines<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str(line).map_err(|source| StoreError::Corrupt {
                path: path.to_path_buf(),
                source,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn open_store() -> (TempDir, VersionStore) {
        let dir = TempDir::new().unwrap();
        let store = VersionStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn identity(token: &str) -> Identity {
        Identity::new(token).unwrap()
    }

    #[test]
    fn initialize_is_idempotent() {
        let (_dir, store) = open_store();
        let id = identity("abc123");
        store.initialize(&id).unwrap();
        store.initialize(&id).unwrap();
        assert_eq!(store.current_head(&id).unwrap(), Snapshot::empty());
    }

    #[test]
    fn head_is_empty_before_any_commit() {
        let (_dir, store) = open_store();
        let head = store.current_head(&identity("fresh")).unwrap();
        assert!(head.is_empty());
    }

    #[test]
    fn first_commit_takes_ordinal_zero() {
        let (_dir, store) = open_store();
        let id = identity("abc123");
        let commit = store.commit(&id, &Snapshot::new("int main(){}")).unwrap();

        let record = commit.record().unwrap();
        assert_eq!(record.ordinal, 0);
        assert!(record.prev_entry.is_zero());
        assert_eq!(store.current_head(&id).unwrap(), Snapshot::new("int main(){}"));
    }

    #[test]
    fn ordinals_increase_without_gaps() {
        let (_dir, store) = open_store();
        let id = identity("abc123");
        for i in 0..4u64 {
            let commit = store.commit(&id, &Snapshot::new(format!("v{i}"))).unwrap();
            assert_eq!(commit.record().unwrap().ordinal, i);
        }
        let ordinals: Vec<u64> = store.records(&id).unwrap().iter().map(|r| r.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2, 3]);
    }

    #[test]
    fn identical_commit_is_a_no_op() {
        let (_dir, store) = open_store();
        let id = identity("abc123");
        store.commit(&id, &Snapshot::new("same")).unwrap();
        let second = store.commit(&id, &Snapshot::new("same")).unwrap();

        assert!(second.is_unchanged());
        assert_eq!(store.records(&id).unwrap().len(), 1);
    }

    #[test]
    fn working_file_matches_head_after_commit() {
        let (dir, store) = open_store();
        let id = identity("abc123");
        store.commit(&id, &Snapshot::new("one\ntwo\n")).unwrap();

        let on_disk =
            fs::read_to_string(dir.path().join("abc123").join(crate::layout::WORKING_FILE))
                .unwrap();
        assert_eq!(on_disk, "one\ntwo\n");
    }

    #[test]
    fn reopen_recovers_chain_position() {
        let dir = TempDir::new().unwrap();
        let id = identity("abc123");
        {
            let store = VersionStore::open(dir.path()).unwrap();
            store.commit(&id, &Snapshot::new("v0")).unwrap();
            store.commit(&id, &Snapshot::new("v1")).unwrap();
        }

        let reopened = VersionStore::open(dir.path()).unwrap();
        assert_eq!(reopened.current_head(&id).unwrap(), Snapshot::new("v1"));
        let commit = reopened.commit(&id, &Snapshot::new("v2")).unwrap();
        assert_eq!(commit.record().unwrap().ordinal, 2);
        reopened.verify_chain(&id).unwrap();
    }

    #[test]
    fn missing_working_file_is_restored_from_log() {
        let dir = TempDir::new().unwrap();
        let id = identity("abc123");
        {
            let store = VersionStore::open(dir.path()).unwrap();
            store.commit(&id, &Snapshot::new("v0")).unwrap();
        }
        fs::remove_file(dir.path().join("abc123").join(crate::layout::WORKING_FILE)).unwrap();

        let reopened = VersionStore::open(dir.path()).unwrap();
        reopened.initialize(&id).unwrap();
        assert_eq!(reopened.current_head(&id).unwrap(), Snapshot::new("v0"));
    }

    #[test]
    fn verify_chain_accepts_clean_history() {
        let (_dir, store) = open_store();
        let id = identity("abc123");
        for i in 0..3u64 {
            store.commit(&id, &Snapshot::new(format!("v{i}"))).unwrap();
        }
        store.verify_chain(&id).unwrap();
    }

    #[test]
    fn verify_chain_detects_edited_record() {
        let (dir, store) = open_store();
        let id = identity("abc123");
        store.commit(&id, &Snapshot::new("v0")).unwrap();
        store.commit(&id, &Snapshot::new("v1")).unwrap();

        let log = dir.path().join("abc123").join(crate::layout::COMMIT_LOG);
        let edited = fs::read_to_string(&log).unwrap().replace("v0", "vX");
        fs::write(&log, edited).unwrap();

        let fresh = VersionStore::open(dir.path()).unwrap();
        assert!(matches!(
            fresh.verify_chain(&id),
            Err(StoreError::ChainViolation { ordinal: 0, .. })
        ));
    }

    #[test]
    fn garbage_log_line_reports_corrupt_record() {
        let (dir, store) = open_store();
        let id = identity("abc123");
        store.commit(&id, &Snapshot::new("v0")).unwrap();

        let log = dir.path().join("abc123").join(crate::layout::COMMIT_LOG);
        let mut text = fs::read_to_string(&log).unwrap();
        text.push_str("{not json\n");
        fs::write(&log, text).unwrap();

        let fresh = VersionStore::open(dir.path()).unwrap();
        assert!(matches!(
            fresh.records(&id),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn anomalies_append_to_separate_log() {
        let (_dir, store) = open_store();
        let id = identity("abc123");
        store.commit(&id, &Snapshot::new("v0")).unwrap();
        store
            .append_anomaly(&AnomalyEvent::new(id.clone(), 12))
            .unwrap();

        let anomalies = store.anomalies(&id).unwrap();
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].inserted_lines, 12);
        // the rejected snapshot never became a record
        assert_eq!(store.records(&id).unwrap().len(), 1);
    }

    #[test]
    fn identities_own_disjoint_histories() {
        let (_dir, store) = open_store();
        let a = identity("learner_a");
        let b = identity("learner_b");

        store.commit(&a, &Snapshot::new("a0")).unwrap();
        store.commit(&b, &Snapshot::new("b0")).unwrap();
        store.commit(&a, &Snapshot::new("a1")).unwrap();

        assert_eq!(store.records(&a).unwrap().len(), 2);
        assert_eq!(store.records(&b).unwrap().len(), 1);
        assert_eq!(store.current_head(&b).unwrap(), Snapshot::new("b0"));
    }
}
