//! SIVE Submission Gate
//!
//! The single integration seam between an editor front end and the
//! submission history: every raw text submission enters through
//! [`GateController::submit`] and leaves as either a committed version or a
//! withheld anomaly with replacement content.
//!
//! # Core Concepts
//!
//! - [`GateController`]: per-identity serialized classify-and-commit
//! - [`SubmitOutcome`]: `Committed` or `Withheld`
//! - [`Remediator`] / [`IdentitySource`]: single-method collaborator seams,
//!   fakeable in tests
//! - [`GateConfig`]: classifier policy plus remediation deadline
//!
//! # Example
//!
//! ```rust,ignore
//! use sive_gate::{GateConfig, GateController};
//!
//! let gate = GateController::new(store, remediator, GateConfig::new());
//! match gate.submit(&identity, snapshot).await? {
//!     SubmitOutcome::Committed(commit) => { /* show committed code */ }
//!     SubmitOutcome::Withheld { replacement, .. } => { /* present replacement */ }
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod collab;
mod config;
mod error;
mod gate;

pub use collab::{BootstrapError, IdentitySource, Remediator, TransformError};
pub use config::GateConfig;
pub use error::GateError;
pub use gate::{GateController, SubmitOutcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
