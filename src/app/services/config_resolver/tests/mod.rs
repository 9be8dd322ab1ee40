//! Tests for configuration resolution

pub mod resolver_tests;

use crate::app::services::config_resolver::ConfigCatalog;
use serde_json::json;

/// Catalog with a small synthetic family of configurations
///
/// `base` is inherited by both `left` and `right`, and `diamond` inherits
/// from both of them.
pub fn family_catalog() -> ConfigCatalog {
    ConfigCatalog::builtin()
        .with_entry(
            "base",
            json!({
                "revision": "base",
                "temperature": {
                    "global_range": {"minval": -2, "maxval": 40},
                    "spike": 2.0
                }
            }),
        )
        .with_entry(
            "left",
            json!({
                "inherit": "base",
                "temperature": {"spike": 4.0, "gradient": 10.0}
            }),
        )
        .with_entry(
            "right",
            json!({
                "inherit": "base",
                "temperature": {"spike": 6.0},
                "salinity": {"spike": 0.3}
            }),
        )
        .with_entry("diamond", json!({"inherit": ["left", "right"]}))
}
