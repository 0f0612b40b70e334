//! SIVE Version Store
//!
//! Durable, ordered, append-only storage of per-identity code histories.
//!
//! # Core Concepts
//!
//! - [`VersionStore`]: per-identity working file plus append-only commit and
//!   anomaly logs under one root directory
//! - [`Commit`]: appended record or idempotent no-op
//! - [`StoreError`]: every persistence failure surfaces; none is swallowed
//!
//! Commit-log entries are hash-chained through their `prev_entry`/`entry`
//! fields, so [`VersionStore::verify_chain`] can detect edits to a log that
//! is supposed to be immutable.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod layout;
mod store;

pub use error::StoreError;
pub use layout::{ANOMALY_LOG, COMMIT_LOG, WORKING_FILE};
pub use store::{Commit, VersionStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
