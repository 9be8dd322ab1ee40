//! Tests for inheritance resolution

use super::*;
use crate::QcError;
use crate::app::services::config_resolver::{ConfigSpec, ResolvedConfig, load_config};
use serde_json::json;

fn threshold(config: &ResolvedConfig, variable: &str, test: &str) -> Option<f64> {
    config.test_params(variable, test)?.get("threshold")?.as_f64()
}

#[test]
fn test_inline_without_inherit_keeps_parameters() {
    let config = load_config(json!({"temperature": {"global_range": "test"}})).unwrap();
    assert_eq!(
        config.test_params("temperature", "global_range"),
        Some(&json!({"threshold": "test"}))
    );
    assert_eq!(config.test_count(), 1);
}

#[test]
fn test_inline_sections_are_preserved() {
    let config = load_config(json!({"main": {"valid_datetime": null}})).unwrap();
    assert!(config.variables.is_empty());
    assert_eq!(config.sections.get("main"), Some(&json!({"valid_datetime": null})));
}

#[test]
fn test_flat_description_is_a_section() {
    let config = load_config(json!({
        "inherit": "gtspp",
        "description": "regional tweak",
        "temperature": {"spike": 1.5}
    }))
    .unwrap();

    assert_eq!(config.sections.get("description"), Some(&json!("regional tweak")));
    assert!(!config.variables.contains_key("description"));
    assert_eq!(threshold(&config, "temperature", "spike"), Some(1.5));
}

#[test]
fn test_default_resolves_cotede() {
    let default = load_config(ConfigSpec::Default).unwrap();
    let named = load_config("cotede").unwrap();
    assert_eq!(default, named);
    assert!(default.test_count() > 0);
}

#[test]
fn test_inheriting_without_changes_reproduces_ancestor() {
    let cotede = load_config("cotede").unwrap();
    let inherited = load_config(json!({"inherit": "cotede"})).unwrap();
    assert_eq!(cotede, inherited);
}

#[test]
fn test_first_inherited_entry_wins() {
    let catalog = family_catalog();
    let config = catalog
        .resolve(json!({"inherit": ["left", "right"]}))
        .unwrap();

    assert_eq!(threshold(&config, "temperature", "spike"), Some(4.0));
    // keys only present in the lower priority parent are still merged in
    assert_eq!(threshold(&config, "salinity", "spike"), Some(0.3));
    assert_eq!(threshold(&config, "temperature", "gradient"), Some(10.0));

    let reversed = catalog
        .resolve(json!({"inherit": ["right", "left"]}))
        .unwrap();
    assert_eq!(threshold(&reversed, "temperature", "spike"), Some(6.0));
}

#[test]
fn test_own_keys_win_over_ancestors() {
    let config = family_catalog()
        .resolve(json!({
            "inherit": ["left", "right"],
            "temperature": {"global_range": {"maxval": 30}}
        }))
        .unwrap();

    assert_eq!(
        config.test_params("temperature", "global_range"),
        Some(&json!({"minval": -2, "maxval": 30}))
    );
}

#[test]
fn test_diamond_inheritance_is_not_a_cycle() {
    let config = family_catalog().resolve("diamond").unwrap();
    assert_eq!(threshold(&config, "temperature", "spike"), Some(4.0));
    assert_eq!(config.sections.get("revision"), Some(&json!("base")));
}

#[test]
fn test_null_disables_inherited_test() {
    let config = family_catalog()
        .resolve(json!({"inherit": "left", "temperature": {"spike": null}}))
        .unwrap();
    assert!(config.test_params("temperature", "spike").is_none());
    assert!(config.test_params("temperature", "gradient").is_some());
}

#[test]
fn test_null_overrides_lower_priority_ancestors() {
    let catalog = family_catalog().with_entry(
        "no_spike",
        json!({"inherit": "left", "temperature": {"spike": null}}),
    );
    let config = catalog
        .resolve(json!({"inherit": ["no_spike", "right"]}))
        .unwrap();
    assert!(config.test_params("temperature", "spike").is_none());
}

#[test]
fn test_inheritance_cycle_is_reported() {
    let catalog = family_catalog()
        .with_entry("a", json!({"inherit": "b"}))
        .with_entry("b", json!({"inherit": ["base", "c"]}))
        .with_entry("c", json!({"inherit": "a"}));

    match catalog.resolve("a") {
        Err(QcError::ConfigurationCycle { chain }) => {
            assert_eq!(chain, vec!["a", "b", "c", "a"]);
        }
        other => panic!("Expected ConfigurationCycle, got {other:?}"),
    }
}

#[test]
fn test_self_inheritance_is_a_cycle() {
    let catalog = family_catalog().with_entry("selfish", json!({"inherit": "selfish"}));
    assert!(matches!(
        catalog.resolve("selfish"),
        Err(QcError::ConfigurationCycle { .. })
    ));
}

#[test]
fn test_unknown_names_are_not_found() {
    match load_config("no_such_procedure") {
        Err(QcError::ConfigurationNotFound { name }) => assert_eq!(name, "no_such_procedure"),
        other => panic!("Expected ConfigurationNotFound, got {other:?}"),
    }
    assert!(matches!(
        load_config(json!({"inherit": "missing_parent"})),
        Err(QcError::ConfigurationNotFound { .. })
    ));
}

#[test]
fn test_non_object_inline_is_rejected() {
    assert!(matches!(
        load_config(json!([1, 2, 3])),
        Err(QcError::Configuration { .. })
    ));
}

#[test]
fn test_resolution_is_idempotent() {
    for spec in [
        ConfigSpec::from("cotede"),
        ConfigSpec::from("eurogoos"),
        ConfigSpec::from(json!({"inherit": ["cotede", "argo"], "salinity": {"spike": 1.0}})),
    ] {
        let once = load_config(spec).unwrap();
        let twice = load_config(&once).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_to_value_is_canonical() {
    let config = load_config(json!({"revision": "x", "temperature": {"spike": 2.0}})).unwrap();
    assert_eq!(
        config.to_value(),
        json!({
            "revision": "x",
            "variables": {"temperature": {"spike": {"threshold": 2.0}}}
        })
    );
}

#[test]
fn test_spec_conversions() {
    assert_eq!(ConfigSpec::from(None::<&str>), ConfigSpec::Default);
    assert_eq!(
        ConfigSpec::from(Some("argo")),
        ConfigSpec::Named("argo".to_string())
    );
    assert_eq!(
        ConfigSpec::from("argo".to_string()),
        ConfigSpec::Named("argo".to_string())
    );
}
