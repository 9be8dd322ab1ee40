//! Inheritance resolution over a configuration catalog

use super::catalog::ConfigCatalog;
use super::merge::{deep_merge, inherit_chain, normalize, prune_disabled};
use crate::constants::VARIABLES_KEY;
use crate::{QcError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// What the caller asks to resolve
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConfigSpec {
    /// The catalog's default configuration
    #[default]
    Default,
    /// A configuration of the catalog, by name
    Named(String),
    /// A configuration tree supplied by the caller
    Inline(Value),
}

impl From<&str> for ConfigSpec {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for ConfigSpec {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<Option<&str>> for ConfigSpec {
    fn from(name: Option<&str>) -> Self {
        name.map_or(Self::Default, Self::from)
    }
}

impl From<Value> for ConfigSpec {
    fn from(value: Value) -> Self {
        Self::Inline(value)
    }
}

impl From<&ResolvedConfig> for ConfigSpec {
    fn from(config: &ResolvedConfig) -> Self {
        Self::Inline(config.to_value())
    }
}

/// A fully merged configuration in canonical shape
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedConfig {
    /// Variable name to test name to test parameters
    #[serde(default)]
    pub variables: BTreeMap<String, BTreeMap<String, Value>>,

    /// Every other top-level section, carried through untouched
    #[serde(flatten)]
    pub sections: BTreeMap<String, Value>,
}

impl ResolvedConfig {
    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    /// Parameters of `test` on `variable`, if configured
    pub fn test_params(&self, variable: &str, test: &str) -> Option<&Value> {
        self.variables.get(variable)?.get(test)
    }

    /// Number of configured (variable, test) pairs
    pub fn test_count(&self) -> usize {
        self.variables.values().map(BTreeMap::len).sum()
    }

    /// Canonical JSON form
    pub fn to_value(&self) -> Value {
        let mut root: Map<String, Value> = self
            .sections
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        let variables = self
            .variables
            .iter()
            .map(|(variable, tests)| {
                let tests = tests
                    .iter()
                    .map(|(test, params)| (test.clone(), params.clone()))
                    .collect();
                (variable.clone(), Value::Object(tests))
            })
            .collect();
        root.insert(VARIABLES_KEY.to_string(), Value::Object(variables));

        Value::Object(root)
    }
}

/// Resolve `spec` against `catalog`
pub(crate) fn resolve(catalog: &ConfigCatalog, spec: &ConfigSpec) -> Result<ResolvedConfig> {
    let mut stack = Vec::new();
    let mut tree = match spec {
        ConfigSpec::Default => resolve_named(catalog, catalog.default_name(), &mut stack)?,
        ConfigSpec::Named(name) => resolve_named(catalog, name, &mut stack)?,
        ConfigSpec::Inline(value) => resolve_value(catalog, value, &mut stack)?,
    };

    // Disabled tests are dropped only once every level is merged, so a
    // `null` still overrides lower priority ancestors.
    prune_disabled(&mut tree);

    Ok(serde_json::from_value(Value::Object(tree))?)
}

/// `stack` holds the chain of names currently being resolved
fn resolve_named(
    catalog: &ConfigCatalog,
    name: &str,
    stack: &mut Vec<String>,
) -> Result<Map<String, Value>> {
    if let Some(start) = stack.iter().position(|entry| entry == name) {
        let mut chain = stack[start..].to_vec();
        chain.push(name.to_string());
        return Err(QcError::ConfigurationCycle { chain });
    }

    let value = catalog.get(name)?;
    debug!("Resolving configuration '{}'", name);

    stack.push(name.to_string());
    let resolved = resolve_value(catalog, &value, stack);
    stack.pop();

    resolved
}

fn resolve_value(
    catalog: &ConfigCatalog,
    value: &Value,
    stack: &mut Vec<String>,
) -> Result<Map<String, Value>> {
    let config = value.as_object().ok_or_else(|| {
        QcError::configuration(format!("a configuration must be an object, got {value}"))
    })?;

    let ancestors = inherit_chain(config)?;
    let own = normalize(config)?;

    // Lowest priority first, so every later merge overrides what came before
    let mut merged = Map::new();
    for ancestor in ancestors.iter().rev() {
        let resolved = resolve_named(catalog, ancestor, stack)?;
        deep_merge(&mut merged, resolved);
    }
    deep_merge(&mut merged, own);

    Ok(merged)
}
