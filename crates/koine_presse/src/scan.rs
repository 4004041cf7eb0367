//! Catalog discovery.
//!
//! Walks the configured base directories and returns every catalog file
//! beneath them, sorted and de-duplicated. The sorted order is what makes
//! fingerprints and duplicate-key resolution reproducible across runs.

use std::io;
use std::path::PathBuf;

use ignore::WalkBuilder;

use crate::catalog::CatalogFile;
use crate::error::PresseError;

/// Enumerate all catalog files under the given base directories.
///
/// `extension` is matched without the dot (e.g. `"json"`). Hidden and
/// gitignored files are included: the catalog tree is data, not source to be
/// filtered. A base directory that does not exist is a configuration bug and
/// fails the scan outright.
///
/// The result is sorted lexicographically by path and de-duplicated by path;
/// when base directories are nested, the earlier-configured base owns a file
/// found through both.
pub fn scan(base_dirs: &[PathBuf], extension: &str) -> Result<Vec<CatalogFile>, PresseError> {
    let mut files = Vec::new();

    for base in base_dirs {
        if !base.is_dir() {
            return Err(PresseError::BaseDirMissing { path: base.clone() });
        }

        for entry in WalkBuilder::new(base).standard_filters(false).build() {
            let entry = entry.map_err(|err| {
                let detail = err.to_string();
                match err.into_io_error() {
                    Some(io_err) => PresseError::Io(io_err),
                    None => PresseError::Io(io::Error::new(io::ErrorKind::Other, detail)),
                }
            })?;

            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            if !path.extension().is_some_and(|ext| ext == extension) {
                continue;
            }

            let modified = path.metadata()?.modified()?;
            files.push(CatalogFile {
                path: path.to_path_buf(),
                base: base.clone(),
                modified,
            });
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files.dedup_by(|a, b| a.path == b.path);

    tracing::debug!(count = files.len(), "catalog scan complete");
    Ok(files)
}
