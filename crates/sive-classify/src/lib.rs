//! SIVE Change Classification
//!
//! Decides whether a submission transition is organic incremental editing or
//! a suspicious bulk insertion.
//!
//! # Core Concepts
//!
//! - [`ChangeClassifier`]: LCS-line-diff insertion counting with a policy
//!   threshold
//! - [`ClassifierConfig`]: tunable policy (threshold, first-submission
//!   exemption)
//! - [`Verdict`]: `Organic` or `Suspicious`
//! - [`line_delta`]: the underlying line-level measurement
//!
//! A pure length-delta check would misclassify legitimate large rewrites and
//! miss cleverly spread pastes; counting lines absent from the alignment
//! approximates how much genuinely new text appeared at once.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod classifier;
mod diff;

pub use classifier::{ChangeClassifier, ClassifierConfig, Verdict};
pub use diff::{line_delta, LineDelta};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
