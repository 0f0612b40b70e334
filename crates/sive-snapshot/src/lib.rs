//! SIVE Snapshot Types
//!
//! Foundational types for the submission integrity engine.
//!
//! # Core Concepts
//!
//! - [`Identity`]: opaque stable token scoping one learner's state
//! - [`Snapshot`]: literal full text of one submission at one instant
//! - [`ContentHash`]: 32-byte Blake3 hash for content addressing
//! - [`VersionRecord`]: one immutable, chain-sealed committed snapshot
//! - [`AnomalyEvent`]: log entry marking a rejected submission
//!
//! # Example
//!
//! ```rust,ignore
//! use sive_snapshot::{Identity, Snapshot, VersionRecord};
//!
//! let identity = Identity::new("abc123")?;
//! let snapshot = Snapshot::new("int main(){}");
//! println!("hash: {}", snapshot.hash());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod hash;
mod identity;
mod record;
mod snapshot;

pub use hash::{ContentHash, HashError};
pub use identity::{Identity, IdentityError};
pub use record::{AnomalyEvent, EventId, VersionRecord};
pub use snapshot::Snapshot;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
