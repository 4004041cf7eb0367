//! # Koine
//!
//! Translation bundles for the web, compiled and cached.
//!
//! This crate re-exports the Koine sub-crates for unified documentation.
//!
//! ## Crates
//!
//! - [`presse`] - Catalog scanning, fingerprinting, bundle compilation and
//!   runtime resolution

/// Catalog scanning, fingerprinting, bundle compilation and runtime resolution.
pub use koine_presse as presse;
