//! # koine_presse
//!
//! Presse - Translation bundle compiler and resolver for Koine.
//!
//! ## Name Origin
//!
//! **Presse** is the printing press: it takes a drawer of loose manuscripts
//! and produces one finished print run, repeating it only when the
//! manuscripts change. Similarly, `koine_presse` gathers per-language
//! translation catalogs and prints them into a single browser-ready script,
//! regenerating the print only when a catalog was touched.
//!
//! ## Architecture
//!
//! ```text
//! +------------------------------------------------------------------+
//! |                     koine_presse (pipeline)                      |
//! +------------------------------------------------------------------+
//! |                                                                  |
//! |  +----------------+    +---------------------+                   |
//! |  |    scanner     |--->|    fingerprint      |                   |
//! |  |  (base dirs)   |    |  (mtime / content)  |                   |
//! |  +----------------+    +---------------------+                   |
//! |          |                       | stale?                        |
//! |          v                       v                               |
//! |  +----------------+    +---------------------+    +-----------+  |
//! |  |    catalog     |--->|       bundle        |--->| artifact  |  |
//! |  | (json / toml)  |    | mapping + renderer  |    | i18n.js   |  |
//! |  +----------------+    +---------------------+    +-----------+  |
//! |                                  |                               |
//! |                                  v                               |
//! |  +-----------------------------------------------------------+  |
//! |  |                     resolution                            |  |
//! |  |  runtime (emitted JS, browser)  |  resolver (Rust, server) |  |
//! |  +-----------------------------------------------------------+  |
//! +------------------------------------------------------------------+
//! ```
//!
//! ## Features
//!
//! - Recursive catalog discovery under configured base directories
//! - Staleness detection via aggregate mtime or content-hash fingerprints
//! - Deterministic `language -> category -> message` bundle compilation
//! - Script-safe JSON embedding and a self-installing browser resolver
//! - Cache-busted artifact URLs keyed by the fingerprint
//! - A server-side resolver with the same fallback and substitution rules
//!
//! ## Usage
//!
//! ```no_run
//! use koine_presse::{BundleConfig, Pipeline};
//!
//! fn main() -> Result<(), koine_presse::PresseError> {
//!     let config = BundleConfig {
//!         base_dirs: vec!["messages".into()],
//!         ..Default::default()
//!     };
//!     let registration = Pipeline::new(config)?.bootstrap()?;
//!     println!("<script src=\"{}\"></script>", registration.url);
//!     Ok(())
//! }
//! ```

pub mod bundle;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod pipeline;
pub mod resolver;
pub mod runtime;
pub mod scan;

pub use bundle::TranslationMapping;
pub use catalog::{
    CatalogEntries, CatalogFile, CatalogLoader, JsonCatalogLoader, TomlCatalogLoader,
};
pub use config::{BundleConfig, CatalogFormat, FingerprintMode};
pub use error::PresseError;
pub use pipeline::{BundleStatus, Pipeline, Registration};
pub use resolver::{ParamValue, Resolver, ResolverHost};
