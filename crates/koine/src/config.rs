//! Configuration file loading for koine.
//!
//! Reads `koine.config.json` from the current working directory, or from the
//! path given with `--config`. The file deserializes straight into a
//! [`BundleConfig`]; absent keys take their defaults.

use std::path::{Path, PathBuf};

use koine_presse::BundleConfig;

pub const DEFAULT_CONFIG_FILE: &str = "koine.config.json";

/// Load the bundle configuration.
///
/// Without `--config`, a missing `koine.config.json` is not an error and
/// defaults apply. An explicit `--config` path must exist, and a file that
/// exists but does not parse is always refused; falling back to defaults
/// there would quietly build the wrong bundle.
pub fn load_config(explicit: Option<&Path>) -> Result<BundleConfig, String> {
    let path: PathBuf = match explicit {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    };

    if explicit.is_none() && !path.exists() {
        return Ok(BundleConfig::default());
    }

    let text = std::fs::read_to_string(&path)
        .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    serde_json::from_str(&text).map_err(|e| format!("failed to parse {}: {e}", path.display()))
}
