//! Staleness fingerprinting.
//!
//! The fingerprint is a wrapping sum of per-file components, so it is
//! order-independent and survives renames that keep the aggregate unchanged.
//! It is a cache-busting heuristic, not an integrity check: two different
//! catalog sets can collide, and that is accepted. The default component is
//! the file modification time; an opt-in mode hashes file contents with
//! xxHash3 instead for trees where mtimes are unreliable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use xxhash_rust::xxh3::xxh3_64;

use crate::catalog::CatalogFile;
use crate::config::FingerprintMode;
use crate::error::PresseError;

/// Compute the aggregate fingerprint of a catalog set.
///
/// An empty set yields 0, which is also the "nothing persisted" sentinel:
/// a bundle with no catalogs is rebuilt on every bootstrap, so fixing an
/// empty base-directory configuration never requires clearing cache state
/// by hand.
pub fn compute(files: &[CatalogFile], mode: FingerprintMode) -> Result<u64, PresseError> {
    let mut total: u64 = 0;
    for file in files {
        let component = match mode {
            FingerprintMode::ModTime => file
                .modified
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
            FingerprintMode::ContentHash => {
                let bytes = fs::read(&file.path).map_err(|source| PresseError::CatalogRead {
                    path: file.path.clone(),
                    source,
                })?;
                xxh3_64(&bytes)
            }
        };
        total = total.wrapping_add(component);
    }
    Ok(total)
}

/// Outcome of a staleness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Staleness {
    /// Whether the artifact must be regenerated
    pub stale: bool,
    /// The fingerprint of the current catalog set
    pub current: u64,
}

/// Decide whether the artifact needs regenerating.
///
/// Stale when the artifact file is absent, when nothing was persisted yet
/// (persisted fingerprint 0), or when the persisted fingerprint differs from
/// the current one.
pub fn evaluate(current: u64, persisted: u64, artifact_exists: bool) -> Staleness {
    Staleness {
        stale: !artifact_exists || persisted == 0 || persisted != current,
        current,
    }
}

/// Persistence for the last-built fingerprint.
///
/// A decimal integer in a newline-terminated text file. Absent or unparsable
/// content reads as 0, which forces a rebuild rather than failing.
#[derive(Debug, Clone)]
pub struct FingerprintStore {
    path: PathBuf,
}

impl FingerprintStore {
    /// Create a store at the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted fingerprint, or 0 when absent or unparsable.
    pub fn load(&self) -> u64 {
        match fs::read_to_string(&self.path) {
            Ok(text) => text.trim().parse().unwrap_or(0),
            Err(err) => {
                if err.kind() != io::ErrorKind::NotFound {
                    tracing::warn!(path = %self.path.display(), %err, "failed to read fingerprint");
                }
                0
            }
        }
    }

    /// Persist a fingerprint, creating parent directories as needed.
    pub fn save(&self, value: u64) -> Result<(), PresseError> {
        let write = || -> io::Result<()> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, format!("{value}\n"))
        };
        write().map_err(|source| PresseError::FingerprintWrite {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, SystemTime};

    fn file_with_mtime(secs: u64) -> CatalogFile {
        CatalogFile {
            path: PathBuf::from("/messages/ru/app.json"),
            base: PathBuf::from("/messages"),
            modified: UNIX_EPOCH + Duration::from_secs(secs),
        }
    }

    #[test]
    fn mod_time_fingerprint_is_the_sum() {
        let files = vec![file_with_mtime(100), file_with_mtime(250)];
        assert_eq!(compute(&files, FingerprintMode::ModTime).unwrap(), 350);
    }

    #[test]
    fn mod_time_fingerprint_is_order_independent() {
        let a = vec![file_with_mtime(100), file_with_mtime(250)];
        let b = vec![file_with_mtime(250), file_with_mtime(100)];
        assert_eq!(
            compute(&a, FingerprintMode::ModTime).unwrap(),
            compute(&b, FingerprintMode::ModTime).unwrap()
        );
    }

    #[test]
    fn empty_set_fingerprints_to_zero() {
        assert_eq!(compute(&[], FingerprintMode::ModTime).unwrap(), 0);
        assert_eq!(compute(&[], FingerprintMode::ContentHash).unwrap(), 0);
    }

    #[test]
    fn content_hash_ignores_mtime_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        std::fs::write(&path, "{}").unwrap();

        let file = |modified| CatalogFile {
            path: path.clone(),
            base: dir.path().to_path_buf(),
            modified,
        };
        let before = compute(
            &[file(UNIX_EPOCH + Duration::from_secs(1))],
            FingerprintMode::ContentHash,
        )
        .unwrap();
        let after = compute(
            &[file(SystemTime::now())],
            FingerprintMode::ContentHash,
        )
        .unwrap();
        assert_eq!(before, after);

        std::fs::write(&path, r#"{"Hello": "Bonjour"}"#).unwrap();
        let changed = compute(&[file(SystemTime::now())], FingerprintMode::ContentHash).unwrap();
        assert_ne!(before, changed);
    }

    #[test]
    fn staleness_rule() {
        assert!(evaluate(10, 10, false).stale, "absent artifact is stale");
        assert!(evaluate(10, 0, true).stale, "zero persisted is stale");
        assert!(evaluate(10, 9, true).stale, "changed fingerprint is stale");
        assert!(!evaluate(10, 10, true).stale, "matching fingerprint is fresh");
    }

    #[test]
    fn store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FingerprintStore::new(dir.path().join("runtime/i18n.fingerprint"));

        assert_eq!(store.load(), 0, "absent file reads as 0");
        store.save(1234567).unwrap();
        assert_eq!(store.load(), 1234567);
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "1234567\n",
            "newline-terminated decimal text"
        );
    }

    #[test]
    fn store_treats_garbage_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fingerprint");
        std::fs::write(&path, "not a number\n").unwrap();

        assert_eq!(FingerprintStore::new(&path).load(), 0);
    }
}
