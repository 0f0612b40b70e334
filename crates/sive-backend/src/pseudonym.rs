//! Persisted pseudonym identity source
//!
//! Generates one random pseudonym per installation and keeps returning it
//! for as long as the token file exists. The file is JSON so it stays
//! hand-inspectable next to the submission store.

use once_cell::sync::OnceCell;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sive_gate::{BootstrapError, IdentitySource};
use sive_snapshot::Identity;
use std::fs;
use std::path::{Path, PathBuf};

/// Pseudonym token length in characters
pub const PSEUDONYM_LEN: usize = 8;

#[derive(Debug, Serialize, Deserialize)]
struct PseudonymRecord {
    pseudonym: Identity,
}

/// Identity source persisting a generated pseudonym in a JSON file
///
/// The token is created once on first use and never regenerated while the
/// file exists; repeated calls within one process hit an in-memory cache.
#[derive(Debug)]
pub struct PseudonymFile {
    path: PathBuf,
    cached: OnceCell<Identity>,
}

impl PseudonymFile {
    /// Use the token file at `path`, creating it on first access
    #[inline]
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: OnceCell::new(),
        }
    }

    /// Token file location
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_or_generate(&self) -> Result<Identity, BootstrapError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let record: PseudonymRecord = serde_json::from_str(&text)?;
                Ok(record.pseudonym)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let identity = generate_pseudonym()?;
                let record = PseudonymRecord {
                    pseudonym: identity.clone(),
                };
                if let Some(parent) = self.path.parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
                fs::write(&self.path, serde_json::to_string(&record)?)?;
                tracing::info!(identity = %identity, path = %self.path.display(), "pseudonym generated");
                Ok(identity)
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl IdentitySource for PseudonymFile {
    fn identity(&self) -> Result<Identity, BootstrapError> {
        self.cached
            .get_or_try_init(|| self.load_or_generate())
            .cloned()
    }
}

/// Generate a fresh random alphanumeric pseudonym
fn generate_pseudonym() -> Result<Identity, BootstrapError> {
    let token: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(PSEUDONYM_LEN)
        .map(char::from)
        .collect();
    Ok(Identity::new(token)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn generates_and_persists_on_first_use() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("user_pseudonym.json");
        let source = PseudonymFile::new(&path);

        let identity = source.identity().unwrap();
        assert_eq!(identity.as_str().len(), PSEUDONYM_LEN);
        assert!(path.exists());
    }

    #[test]
    fn returns_same_token_on_every_call() {
        let dir = TempDir::new().unwrap();
        let source = PseudonymFile::new(dir.path().join("user_pseudonym.json"));

        let first = source.identity().unwrap();
        let second = source.identity().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn survives_process_restart_via_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("user_pseudonym.json");

        let first = PseudonymFile::new(&path).identity().unwrap();
        let second = PseudonymFile::new(&path).identity().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn regenerates_once_file_is_gone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("user_pseudonym.json");

        let first = PseudonymFile::new(&path).identity().unwrap();
        fs::remove_file(&path).unwrap();
        let second = PseudonymFile::new(&path).identity().unwrap();
        // 62^8 token space; a collision here means generation is broken
        assert_ne!(first, second);
    }

    #[test]
    fn malformed_file_is_an_error_not_a_regeneration() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("user_pseudonym.json");
        fs::write(&path, "{broken").unwrap();

        let result = PseudonymFile::new(&path).identity();
        assert!(matches!(result, Err(BootstrapError::Malformed(_))));
    }
}
