//! Registry mapping configuration test names to implementations
//!
//! Configurations refer to tests by name. The registry turns a
//! (name, parameters) pair into a configured [`QcTest`]; unknown names are a
//! configuration error rather than a silent skip.

use super::{
    QcTest, cum_rate_of_change, density_inversion, global_range, gradient, profile_envelop,
    rate_of_change, spike, woa_normbias,
};
use crate::{QcError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// Builds a configured test from its parameter object
pub type TestFactory = fn(&serde_json::Value) -> Result<Arc<dyn QcTest>>;

#[derive(Debug, Clone)]
pub struct TestRegistry {
    factories: BTreeMap<String, TestFactory>,
}

impl TestRegistry {
    /// Registry without any test
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry holding every test shipped with the crate
    pub fn builtin() -> Self {
        Self::empty()
            .with_test(global_range::NAME, |p| {
                Ok(Arc::new(global_range::GlobalRange::from_config(p)?))
            })
            .with_test(rate_of_change::NAME, |p| {
                Ok(Arc::new(rate_of_change::RateOfChange::from_config(p)?))
            })
            .with_test(cum_rate_of_change::NAME, |p| {
                Ok(Arc::new(cum_rate_of_change::CumRateOfChange::from_config(p)?))
            })
            .with_test(spike::NAME, |p| Ok(Arc::new(spike::Spike::from_config(p)?)))
            .with_test(gradient::NAME, |p| {
                Ok(Arc::new(gradient::Gradient::from_config(p)?))
            })
            .with_test(density_inversion::NAME, |p| {
                Ok(Arc::new(density_inversion::DensityInversion::from_config(p)?))
            })
            .with_test(woa_normbias::NAME, |p| {
                Ok(Arc::new(woa_normbias::WoaNormbias::from_config(p)?))
            })
            .with_test(profile_envelop::NAME, |p| {
                Ok(Arc::new(profile_envelop::ProfileEnvelop::from_config(p)?))
            })
    }

    /// Register a test, replacing any test of the same name
    pub fn with_test(mut self, name: impl Into<String>, factory: TestFactory) -> Self {
        self.register(name, factory);
        self
    }

    pub fn register(&mut self, name: impl Into<String>, factory: TestFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Configure the test registered under `name`
    pub fn build(&self, name: &str, params: &serde_json::Value) -> Result<Arc<dyn QcTest>> {
        let factory = self.factories.get(name).ok_or_else(|| {
            QcError::configuration(format!(
                "unknown QC test '{name}' (available: {})",
                self.factories
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;

        debug!("Configuring test '{}' with {}", name, params);
        factory(params)
    }
}

impl Default for TestRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
