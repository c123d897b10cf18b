//! Base templates: lookup, copying, and manifest merging
//!
//! This module provides:
//! - Template directory resolution per framework/variant
//! - Template copying with npm-safe file renames
//! - `package.json` merging with module dependencies

pub mod copier;
pub mod locator;
pub mod manifest;

pub use copier::copy_template;
pub use locator::resolve_template;
pub use manifest::{merge_manifest, write_manifest};
