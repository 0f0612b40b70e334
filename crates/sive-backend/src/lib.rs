//! SIVE Backend Collaborators
//!
//! Concrete implementations of the gate's collaborator seams:
//!
//! - [`OpenAiRemediator`]: remediation transform backed by an
//!   OpenAI-compatible chat-completions service
//! - [`PseudonymFile`]: identity bootstrap persisting one generated
//!   pseudonym per installation
//!
//! The core gate never depends on this crate; it is wired in by the
//! embedding application and replaced by fakes in tests.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod openai;
mod pseudonym;

pub use openai::{OpenAiConfig, OpenAiRemediator};
pub use pseudonym::{PseudonymFile, PSEUDONYM_LEN};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
