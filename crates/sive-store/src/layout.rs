//! On-disk layout
//!
//! Each identity owns one directory under the store root:
//!
//! ```text
//! <root>/<identity>/working.src       current head, literal content
//! <root>/<identity>/commits.jsonl     append-only hash-chained commit log
//! <root>/<identity>/anomalies.jsonl   append-only anomaly log
//! ```
//!
//! The logs are read-only to everything except the store itself.

use sive_snapshot::Identity;
use std::path::{Path, PathBuf};

/// File name of the working head slot
pub const WORKING_FILE: &str = "working.src";

/// File name of the commit log
pub const COMMIT_LOG: &str = "commits.jsonl";

/// File name of the anomaly log
pub const ANOMALY_LOG: &str = "anomalies.jsonl";

/// Directory owned by one identity
#[inline]
#[must_use]
pub(crate) fn identity_dir(root: &Path, identity: &Identity) -> PathBuf {
    root.join(identity.as_str())
}

/// Path of the identity's working file
#[inline]
#[must_use]
pub(crate) fn working_path(root: &Path, identity: &Identity) -> PathBuf {
    identity_dir(root, identity).join(WORKING_FILE)
}

/// Path of the identity's commit log
#[inline]
#[must_use]
pub(crate) fn commit_log_path(root: &Path, identity: &Identity) -> PathBuf {
    identity_dir(root, identity).join(COMMIT_LOG)
}

/// Path of the identity's anomaly log
#[inline]
#[must_use]
pub(crate) fn anomaly_log_path(root: &Path, identity: &Identity) -> PathBuf {
    identity_dir(root, identity).join(ANOMALY_LOG)
}
