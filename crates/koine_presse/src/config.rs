//! Bundle configuration.
//!
//! These options describe where catalogs live, where the compiled artifact
//! and its fingerprint go, and how the emitted script is named. The shape is
//! designed to deserialize directly from `koine.config.json`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::PresseError;

/// On-disk format of the catalog files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogFormat {
    /// Flat JSON object, `message -> text` (default)
    #[default]
    Json,
    /// Flat TOML table, `message -> text`
    Toml,
}

impl CatalogFormat {
    /// File extension scanned for, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            CatalogFormat::Json => "json",
            CatalogFormat::Toml => "toml",
        }
    }
}

/// How the staleness fingerprint is derived from the catalog set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FingerprintMode {
    /// Sum of file modification times. Cheap; tolerates renames that keep the
    /// aggregate unchanged; collisions possible and accepted (default)
    #[default]
    ModTime,
    /// Sum of per-file xxHash3 content hashes. Reads every catalog on each
    /// check; use when mtimes are unreliable (e.g. fresh checkouts)
    ContentHash,
}

fn default_webroot() -> PathBuf {
    PathBuf::from("web")
}

fn default_artifact_path() -> PathBuf {
    PathBuf::from("js/i18n.js")
}

fn default_fingerprint_path() -> PathBuf {
    PathBuf::from("runtime/i18n.fingerprint")
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_global_name() -> String {
    "KOINE_I18N".to_string()
}

fn default_namespace() -> String {
    "koine".to_string()
}

/// Configuration for one translation bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleConfig {
    /// Directories scanned recursively for catalog files (default: empty).
    ///
    /// An empty set is legal and produces an empty bundle; a configured
    /// directory that does not exist is an error.
    #[serde(default)]
    pub base_dirs: Vec<PathBuf>,

    /// Directory the artifact path is relative to (default: `web`)
    #[serde(default = "default_webroot")]
    pub webroot: PathBuf,

    /// Artifact location inside the webroot, also used as the public URL path
    /// (default: `js/i18n.js`)
    #[serde(default = "default_artifact_path")]
    pub artifact_path: PathBuf,

    /// Where the last-built fingerprint is persisted
    /// (default: `runtime/i18n.fingerprint`)
    #[serde(default = "default_fingerprint_path")]
    pub fingerprint_path: PathBuf,

    /// Language the message keys are authored in; lookups for it fall back to
    /// the literal message (default: `en`)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Global variable the serialized mapping is assigned to
    /// (default: `KOINE_I18N`)
    #[serde(default = "default_global_name")]
    pub global_name: String,

    /// Namespace object the `t` function is installed into
    /// (default: `koine`)
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Catalog file format (default: json)
    #[serde(default)]
    pub catalog_format: CatalogFormat,

    /// Staleness fingerprint derivation (default: modTime)
    #[serde(default)]
    pub fingerprint_mode: FingerprintMode,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            base_dirs: Vec::new(),
            webroot: default_webroot(),
            artifact_path: default_artifact_path(),
            fingerprint_path: default_fingerprint_path(),
            source_language: default_source_language(),
            global_name: default_global_name(),
            namespace: default_namespace(),
            catalog_format: CatalogFormat::default(),
            fingerprint_mode: FingerprintMode::default(),
        }
    }
}

impl BundleConfig {
    /// Check the values that end up spliced into the emitted script.
    ///
    /// `global_name` and `namespace` must be JavaScript identifiers and
    /// `source_language` must look like a language code; anything else would
    /// let configuration rewrite the generated script.
    pub fn validate(&self) -> Result<(), PresseError> {
        if !is_js_identifier(&self.global_name) {
            return Err(PresseError::Config(format!(
                "globalName {:?} is not a JavaScript identifier",
                self.global_name
            )));
        }
        if !is_js_identifier(&self.namespace) {
            return Err(PresseError::Config(format!(
                "namespace {:?} is not a JavaScript identifier",
                self.namespace
            )));
        }
        if !crate::bundle::is_language_segment(&self.source_language) {
            return Err(PresseError::Config(format!(
                "sourceLanguage {:?} must contain only ASCII letters and hyphens",
                self.source_language
            )));
        }
        Ok(())
    }

    /// Absolute (or CWD-relative) location the artifact is written to.
    pub fn artifact_file(&self) -> PathBuf {
        self.webroot.join(&self.artifact_path)
    }

    /// Public URL path of the artifact, without cache busting.
    pub fn artifact_url_path(&self) -> String {
        let rel = self.artifact_path.to_string_lossy().replace('\\', "/");
        format!("/{}", rel.trim_start_matches('/'))
    }
}

fn is_js_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = BundleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.artifact_file(), PathBuf::from("web/js/i18n.js"));
        assert_eq!(config.artifact_url_path(), "/js/i18n.js");
    }

    #[test]
    fn rejects_non_identifier_global() {
        let config = BundleConfig {
            global_name: "window.I18N".into(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PresseError::Config(_))));
    }

    #[test]
    fn rejects_script_injection_in_namespace() {
        let config = BundleConfig {
            namespace: "x;alert(1)".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_odd_source_language() {
        let config = BundleConfig {
            source_language: "en'US".into(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: BundleConfig =
            serde_json::from_str(r#"{"baseDirs": ["messages"]}"#).unwrap();
        assert_eq!(config.base_dirs, vec![PathBuf::from("messages")]);
        assert_eq!(config.source_language, "en");
        assert_eq!(config.catalog_format, CatalogFormat::Json);
        assert_eq!(config.fingerprint_mode, FingerprintMode::ModTime);
    }

    #[test]
    fn deserializes_content_hash_mode() {
        let config: BundleConfig =
            serde_json::from_str(r#"{"fingerprintMode": "contentHash"}"#).unwrap();
        assert_eq!(config.fingerprint_mode, FingerprintMode::ContentHash);
    }
}
