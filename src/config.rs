//! Command tree manifests

pub mod manifest;

pub use manifest::{CommandEntry, HandlerRegistry, Manifest, ManifestError};
