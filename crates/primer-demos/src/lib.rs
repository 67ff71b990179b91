//! Demo bundler for primer documentation.
//!
//! Consumes a manifest mapping logical chunk names to HTML entry pages,
//! injects the widget named by each entry into its mount container, and emits
//! bundled pages with content-hashed script assets.

pub mod bundler;
pub mod manifest;

pub use bundler::{BundleError, BundleResult, DemoBundler, EntryFailure};
pub use manifest::{DemoEntry, DemoManifest, ManifestError};
