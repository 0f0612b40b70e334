//! Learner identities
//!
//! An [`Identity`] is an opaque stable token scoping all version and anomaly
//! state for one learner. Tokens double as on-disk directory names, so the
//! character set is restricted at construction time.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Opaque per-learner token
///
/// # Invariants
/// - 1..=64 characters
/// - ASCII alphanumerics, `-` and `_` only (safe as a path segment)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    /// Maximum token length in characters
    pub const MAX_LEN: usize = 64;

    /// Create a validated identity
    ///
    /// # Errors
    /// Returns an error if the token is empty, too long, or contains
    /// characters outside `[A-Za-z0-9_-]`
    pub fn new(token: impl Into<String>) -> Result<Self, IdentityError> {
        let token = token.into();
        if token.is_empty() {
            return Err(IdentityError::Empty);
        }
        if token.len() > Self::MAX_LEN {
            return Err(IdentityError::TooLong {
                max: Self::MAX_LEN,
                actual: token.len(),
            });
        }
        if let Some(ch) = token
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-' && *c != '_')
        {
            return Err(IdentityError::InvalidCharacter { ch });
        }
        Ok(Self(token))
    }

    /// Token as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Identity {
    type Err = IdentityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Identity {
    type Error = IdentityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Identity> for String {
    fn from(identity: Identity) -> Self {
        identity.0
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors raised by identity validation
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Empty token
    #[error("identity token is empty")]
    Empty,

    /// Token exceeds the length limit
    #[error("identity token too long: max {max}, got {actual}")]
    TooLong { max: usize, actual: usize },

    /// Token contains a character outside the allowed set
    #[error("identity token contains invalid character {ch:?}")]
    InvalidCharacter { ch: char },
}
