//! Canonical shape normalisation and deep merging of configuration trees

use crate::constants::{INHERIT_KEY, RESERVED_SECTIONS, VARIABLES_KEY};
use crate::{QcError, Result};
use serde_json::{Map, Value};

/// Recursively merge `overlay` into `base`; `overlay` wins on collisions
///
/// Two objects under the same key are merged key by key; any other
/// combination replaces the base value.
pub fn deep_merge(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(base_obj)), Value::Object(overlay_obj)) => {
                deep_merge(base_obj, overlay_obj);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Names listed under `inherit`, highest priority first
pub fn inherit_chain(config: &Map<String, Value>) -> Result<Vec<String>> {
    match config.get(INHERIT_KEY) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(name)) => Ok(vec![name.clone()]),
        Some(Value::Array(names)) => names
            .iter()
            .map(|name| {
                name.as_str().map(str::to_string).ok_or_else(|| {
                    QcError::configuration(format!(
                        "'{INHERIT_KEY}' entries must be configuration names, got {name}"
                    ))
                })
            })
            .collect(),
        Some(other) => Err(QcError::configuration(format!(
            "'{INHERIT_KEY}' must be a name or a list of names, got {other}"
        ))),
    }
}

/// Bring a configuration object into canonical shape, dropping `inherit`
///
/// Without a `variables` key every non-reserved top-level object is taken as
/// a variable; other top-level values (a `description` string) stay sections.
/// Scalar test parameters `x` become `{"threshold": x}`; `null`
/// test entries are kept so they can disable an inherited test.
pub fn normalize(config: &Map<String, Value>) -> Result<Map<String, Value>> {
    let mut canonical = Map::new();
    let mut variables = Map::new();

    match config.get(VARIABLES_KEY) {
        Some(Value::Object(declared)) => {
            for (key, value) in config {
                if key != INHERIT_KEY && key != VARIABLES_KEY {
                    canonical.insert(key.clone(), value.clone());
                }
            }
            for (name, tests) in declared {
                variables.insert(name.clone(), normalize_variable(name, tests)?);
            }
        }
        Some(other) => {
            return Err(QcError::configuration(format!(
                "'{VARIABLES_KEY}' must map variable names to tests, got {other}"
            )));
        }
        None => {
            for (key, value) in config {
                if key == INHERIT_KEY {
                    continue;
                }
                if RESERVED_SECTIONS.contains(&key.as_str()) || !value.is_object() {
                    canonical.insert(key.clone(), value.clone());
                } else {
                    variables.insert(key.clone(), normalize_variable(key, value)?);
                }
            }
        }
    }

    canonical.insert(VARIABLES_KEY.to_string(), Value::Object(variables));
    Ok(canonical)
}

fn normalize_variable(name: &str, tests: &Value) -> Result<Value> {
    let tests = tests.as_object().ok_or_else(|| {
        QcError::configuration(format!(
            "variable '{name}' must map test names to parameters, got {tests}"
        ))
    })?;

    let normalized = tests
        .iter()
        .map(|(test, params)| {
            let params = match params {
                Value::Object(_) | Value::Null => params.clone(),
                scalar => {
                    let mut wrapped = Map::new();
                    wrapped.insert("threshold".to_string(), scalar.clone());
                    Value::Object(wrapped)
                }
            };
            (test.clone(), params)
        })
        .collect();

    Ok(Value::Object(normalized))
}

/// Remove tests disabled with `null` after merging
pub fn prune_disabled(config: &mut Map<String, Value>) {
    if let Some(Value::Object(variables)) = config.get_mut(VARIABLES_KEY) {
        for tests in variables.values_mut() {
            if let Value::Object(tests) = tests {
                tests.retain(|_, params| !params.is_null());
            }
        }
    }
}
