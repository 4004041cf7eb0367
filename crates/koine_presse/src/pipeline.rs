//! The compile-and-cache pipeline.
//!
//! One bootstrap call per page request (or process start) keeps the artifact
//! current: scan the catalog directories, compare fingerprints, regenerate
//! when anything changed, and hand back the cache-busted URL the host should
//! inject. The artifact is written before the fingerprint is persisted; a
//! crash between the two leaves a mismatched fingerprint behind and the next
//! bootstrap simply rebuilds.

use crate::bundle;
use crate::catalog::{loader_for, CatalogFile, CatalogLoader};
use crate::config::BundleConfig;
use crate::error::PresseError;
use crate::fingerprint::{self, FingerprintStore};
use crate::runtime::render_runtime_script;
use crate::scan::scan;

/// What a bootstrap produced: the script URL to inject and how it got there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Public URL of the artifact with the fingerprint as cache buster,
    /// e.g. `/js/i18n.js?v=3405691582`.
    pub url: String,
    /// Fingerprint of the catalog set the artifact reflects.
    pub fingerprint: u64,
    /// Whether this bootstrap regenerated the artifact.
    pub rebuilt: bool,
}

/// A read-only look at the bundle, for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleStatus {
    /// Catalog files the scanner found.
    pub catalog_files: usize,
    /// Fingerprint of the catalog set on disk right now.
    pub current: u64,
    /// Fingerprint persisted by the last build, 0 when never built.
    pub persisted: u64,
    /// Whether the artifact file exists.
    pub artifact_exists: bool,
    /// Whether the next bootstrap would rebuild.
    pub stale: bool,
}

/// Drives one bundle from configuration to served artifact.
pub struct Pipeline {
    config: BundleConfig,
    loader: Box<dyn CatalogLoader>,
    store: FingerprintStore,
}

impl Pipeline {
    /// Build a pipeline with the loader implied by `catalogFormat`.
    pub fn new(config: BundleConfig) -> Result<Self, PresseError> {
        let loader = loader_for(config.catalog_format);
        Self::with_loader(config, loader)
    }

    /// Build a pipeline with a custom catalog loader.
    ///
    /// The loader replaces parsing only; discovery still scans for the
    /// extension implied by `catalogFormat`.
    pub fn with_loader(
        config: BundleConfig,
        loader: Box<dyn CatalogLoader>,
    ) -> Result<Self, PresseError> {
        config.validate()?;
        let store = FingerprintStore::new(config.fingerprint_path.clone());
        Ok(Self {
            config,
            loader,
            store,
        })
    }

    /// The configuration this pipeline runs with.
    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    /// The resolver script on its own, for hosts that inline it.
    pub fn runtime_script(&self) -> String {
        render_runtime_script(
            &self.config.namespace,
            &self.config.global_name,
            &self.config.source_language,
        )
    }

    /// Report the bundle's state without touching anything.
    pub fn status(&self) -> Result<BundleStatus, PresseError> {
        let (files, current) = self.survey()?;
        let persisted = self.store.load();
        let artifact_exists = self.config.artifact_file().exists();
        let staleness = fingerprint::evaluate(current, persisted, artifact_exists);
        Ok(BundleStatus {
            catalog_files: files.len(),
            current,
            persisted,
            artifact_exists,
            stale: staleness.stale,
        })
    }

    /// Ensure the artifact is current and return its registration.
    ///
    /// Regenerates only when the staleness rule says so. A catalog set with
    /// zero files fingerprints to 0, which the rule always treats as stale,
    /// so an empty configuration rebuilds its (empty) artifact on every
    /// bootstrap rather than pinning old state.
    pub fn bootstrap(&self) -> Result<Registration, PresseError> {
        let (files, current) = self.survey()?;
        let persisted = self.store.load();
        let artifact_exists = self.config.artifact_file().exists();
        let staleness = fingerprint::evaluate(current, persisted, artifact_exists);

        if staleness.stale {
            self.write_bundle(&files, current)?;
        } else {
            tracing::debug!(fingerprint = current, "artifact is current");
        }

        Ok(self.registration(current, staleness.stale))
    }

    /// Regenerate unconditionally, staleness notwithstanding.
    pub fn rebuild(&self) -> Result<Registration, PresseError> {
        let (files, current) = self.survey()?;
        self.write_bundle(&files, current)?;
        Ok(self.registration(current, true))
    }

    fn survey(&self) -> Result<(Vec<CatalogFile>, u64), PresseError> {
        let files = scan(
            &self.config.base_dirs,
            self.config.catalog_format.extension(),
        )?;
        let current = fingerprint::compute(&files, self.config.fingerprint_mode)?;
        Ok((files, current))
    }

    fn write_bundle(&self, files: &[CatalogFile], current: u64) -> Result<(), PresseError> {
        let mapping = bundle::build(
            files,
            self.config.catalog_format.extension(),
            self.loader.as_ref(),
        )?;
        let artifact = bundle::render(&mapping, &self.config)?;
        bundle::write_artifact(&self.config.artifact_file(), &artifact)?;
        self.store.save(current)?;
        tracing::info!(
            languages = mapping.language_count(),
            messages = mapping.message_count(),
            fingerprint = current,
            "translation bundle rebuilt"
        );
        Ok(())
    }

    fn registration(&self, fingerprint: u64, rebuilt: bool) -> Registration {
        Registration {
            url: format!("{}?v={}", self.config.artifact_url_path(), fingerprint),
            fingerprint,
            rebuilt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config_in(root: &Path) -> BundleConfig {
        BundleConfig {
            base_dirs: vec![root.join("messages")],
            webroot: root.join("web"),
            fingerprint_path: root.join("runtime/i18n.fingerprint"),
            ..Default::default()
        }
    }

    fn seed_catalogs(root: &Path) {
        std::fs::create_dir_all(root.join("messages/ru")).unwrap();
        std::fs::write(
            root.join("messages/ru/app.json"),
            r#"{"Hello": "Привет"}"#,
        )
        .unwrap();
    }

    #[test]
    fn first_bootstrap_builds_the_artifact() {
        let dir = tempfile::tempdir().unwrap();
        seed_catalogs(dir.path());
        let pipeline = Pipeline::new(config_in(dir.path())).unwrap();

        let registration = pipeline.bootstrap().unwrap();
        assert!(registration.rebuilt);
        assert_eq!(
            registration.url,
            format!("/js/i18n.js?v={}", registration.fingerprint)
        );

        let artifact = std::fs::read_to_string(dir.path().join("web/js/i18n.js")).unwrap();
        assert!(artifact.contains("Привет"));
        assert!(artifact.contains("ns.t = function"));
    }

    #[test]
    fn unchanged_catalogs_do_not_rebuild() {
        let dir = tempfile::tempdir().unwrap();
        seed_catalogs(dir.path());
        let pipeline = Pipeline::new(config_in(dir.path())).unwrap();

        let first = pipeline.bootstrap().unwrap();
        let second = pipeline.bootstrap().unwrap();
        assert!(first.rebuilt);
        assert!(!second.rebuilt);
        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(first.url, second.url);
    }

    #[test]
    fn rebuild_ignores_freshness() {
        let dir = tempfile::tempdir().unwrap();
        seed_catalogs(dir.path());
        let pipeline = Pipeline::new(config_in(dir.path())).unwrap();

        pipeline.bootstrap().unwrap();
        let forced = pipeline.rebuild().unwrap();
        assert!(forced.rebuilt);
    }

    #[test]
    fn status_never_writes() {
        let dir = tempfile::tempdir().unwrap();
        seed_catalogs(dir.path());
        let pipeline = Pipeline::new(config_in(dir.path())).unwrap();

        let status = pipeline.status().unwrap();
        assert_eq!(status.catalog_files, 1);
        assert!(status.stale);
        assert!(!status.artifact_exists);
        assert_eq!(status.persisted, 0);
        assert!(!dir.path().join("web/js/i18n.js").exists());

        pipeline.bootstrap().unwrap();
        let status = pipeline.status().unwrap();
        assert!(!status.stale);
        assert!(status.artifact_exists);
        assert_eq!(status.persisted, status.current);
    }

    #[test]
    fn invalid_config_is_refused_up_front() {
        let dir = tempfile::tempdir().unwrap();
        let config = BundleConfig {
            global_name: "not a name".into(),
            ..config_in(dir.path())
        };
        assert!(matches!(
            Pipeline::new(config),
            Err(PresseError::Config(_))
        ));
    }
}
