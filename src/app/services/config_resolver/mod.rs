//! Configuration resolution
//!
//! Turns a configuration request (the default procedure, a catalog name, or
//! an inline tree) into a [`ResolvedConfig`]: inheritance followed, ancestors
//! deep-merged by priority, and every variable in canonical
//! `variables -> test -> parameters` shape.
//!
//! # Inheritance
//!
//! `inherit` names one ancestor or an ordered list of them. Earlier entries
//! win collisions, the configuration's own keys win over every ancestor, and
//! nested objects are merged key by key. A test set to `null` is disabled.
//!
//! ```no_run
//! use profile_qc::{ConfigCatalog, ConfigSpec};
//! use serde_json::json;
//!
//! let catalog = ConfigCatalog::builtin();
//! let config = catalog.resolve(ConfigSpec::Inline(json!({
//!     "inherit": ["cotede", "gtspp"],
//!     "temperature": {"spike": 4.0, "woa_normbias": null}
//! })))?;
//! assert!(config.test_params("temperature", "woa_normbias").is_none());
//! # Ok::<(), profile_qc::QcError>(())
//! ```

pub mod catalog;
pub mod merge;
pub mod resolver;

#[cfg(test)]
pub mod tests;

pub use catalog::{ConfigCatalog, load_config};
pub use resolver::{ConfigSpec, ResolvedConfig};
