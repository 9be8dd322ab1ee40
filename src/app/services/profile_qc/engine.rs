//! Planning and sequential evaluation

use super::result::{QcResult, TestOutcome};
use crate::app::models::{MaskedSeries, Profile};
use crate::app::services::capabilities::Capabilities;
use crate::app::services::config_resolver::{ConfigCatalog, ConfigSpec, ResolvedConfig};
use crate::app::services::qc_tests::{QcTest, TestInput, TestOutput, TestRegistry};
use crate::config::QcSettings;
use crate::constants::OVERALL_FLAG_KEY;
use crate::{QcError, Result};
use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A configured test, under the name it has in the configuration
#[derive(Debug, Clone)]
pub(crate) struct PlannedTest {
    pub name: String,
    pub test: Arc<dyn QcTest>,
}

/// QC engine for one resolved configuration
///
/// The plan is built and validated once; the same engine can then evaluate
/// any number of profiles.
#[derive(Debug, Clone)]
pub struct ProfileQc {
    config: ResolvedConfig,
    pub(crate) plan: BTreeMap<String, Vec<PlannedTest>>,
    pub(crate) capabilities: Capabilities,
    pub(crate) workers: usize,
}

impl ProfileQc {
    /// Engine with the built-in tests and detected capabilities
    pub fn new(config: ResolvedConfig) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: ResolvedConfig) -> ProfileQcBuilder {
        ProfileQcBuilder::new(config)
    }

    /// Resolve `spec` with a catalog built from `settings`
    pub fn from_settings(settings: &QcSettings, spec: impl Into<ConfigSpec>) -> Result<Self> {
        settings.validate()?;
        let catalog = ConfigCatalog::from_settings(settings)?;
        let config = catalog.resolve(spec)?;
        Self::builder(config).with_workers(settings.workers).build()
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Tests planned for `variable`, in evaluation order
    pub fn test_names(&self, variable: &str) -> impl Iterator<Item = &str> {
        self.plan
            .get(variable)
            .into_iter()
            .flatten()
            .map(|planned| planned.name.as_str())
    }

    /// Run every planned test on `profile`, one after the other
    pub fn evaluate(&self, profile: &Profile) -> QcResult {
        let start = Instant::now();
        let mut result = QcResult::default();

        for (variable, tests) in &self.plan {
            let Some(series) = profile.get(variable) else {
                debug!("Configured variable '{}' is not in the profile", variable);
                result.unevaluated_variables.push(variable.clone());
                continue;
            };

            for planned in tests {
                let (output, outcome) = run_test(
                    planned,
                    variable,
                    series,
                    profile,
                    &self.capabilities,
                );
                result.record(variable, &planned.name, output, outcome);
            }
            result.aggregate_variable(variable, series.len());
        }

        info!("QC finished in {:?}: {}", start.elapsed(), result.summary());
        result
    }
}

/// Configures a [`ProfileQc`]
#[derive(Debug, Clone)]
pub struct ProfileQcBuilder {
    config: ResolvedConfig,
    registry: TestRegistry,
    capabilities: Capabilities,
    workers: usize,
}

impl ProfileQcBuilder {
    fn new(config: ResolvedConfig) -> Self {
        Self {
            config,
            registry: TestRegistry::builtin(),
            capabilities: Capabilities::detect(),
            workers: num_cpus::get(),
        }
    }

    pub fn with_registry(mut self, registry: TestRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Concurrency of [`ProfileQc::evaluate_concurrent`]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Validate every configured test and build the plan
    pub fn build(self) -> Result<ProfileQc> {
        if self.workers == 0 {
            return Err(QcError::configuration("workers must be at least 1"));
        }

        let plan = build_plan(&self.config, &self.registry)?;
        info!(
            "Planned {} test(s) over {} variable(s)",
            plan.values().map(Vec::len).sum::<usize>(),
            plan.len()
        );

        Ok(ProfileQc {
            config: self.config,
            plan,
            capabilities: self.capabilities,
            workers: self.workers,
        })
    }
}

fn build_plan(
    config: &ResolvedConfig,
    registry: &TestRegistry,
) -> Result<BTreeMap<String, Vec<PlannedTest>>> {
    let mut plan = BTreeMap::new();

    for (variable, tests) in &config.variables {
        let mut planned = Vec::with_capacity(tests.len());
        for (name, params) in tests {
            if name == OVERALL_FLAG_KEY {
                return Err(QcError::configuration(format!(
                    "variable '{variable}': '{OVERALL_FLAG_KEY}' is reserved for aggregated flags"
                )));
            }

            let test = registry.build(name, params).map_err(|e| match e {
                QcError::Configuration { message } => {
                    QcError::configuration(format!("variable '{variable}': {message}"))
                }
                other => other,
            })?;
            planned.push(PlannedTest {
                name: name.clone(),
                test,
            });
        }
        plan.insert(variable.clone(), planned);
    }

    Ok(plan)
}

/// Evaluate one test, turning its errors into an outcome
pub(crate) fn run_test(
    planned: &PlannedTest,
    variable: &str,
    series: &MaskedSeries,
    profile: &Profile,
    capabilities: &Capabilities,
) -> (TestOutput, TestOutcome) {
    let start = Instant::now();
    let input = TestInput {
        variable,
        series,
        profile,
        capabilities,
    };

    let missing = planned
        .test
        .required_variables()
        .iter()
        .find(|required| !profile.contains(required));

    let evaluated = match missing {
        Some(required) => Err(QcError::missing_variable(&planned.name, *required)),
        None => panic::catch_unwind(AssertUnwindSafe(|| planned.test.evaluate(&input)))
            .unwrap_or_else(|payload| {
                Err(QcError::test_execution(
                    variable,
                    &planned.name,
                    format!("panicked: {}", panic_message(payload.as_ref())),
                ))
            })
            .and_then(|output| check_output(&planned.name, variable, series.len(), output)),
    };

    match evaluated {
        Ok(output) => {
            debug!(
                "Evaluated {}.{} in {:?}",
                variable,
                planned.name,
                start.elapsed()
            );
            (output, TestOutcome::Evaluated)
        }
        Err(e) if e.is_skip() => {
            warn!("Skipping {} on '{}': {}", planned.name, variable, e);
            (
                TestOutput::not_evaluated(series.len()),
                TestOutcome::Skipped {
                    reason: e.to_string(),
                },
            )
        }
        Err(e) => {
            warn!("Test {} failed on '{}': {}", planned.name, variable, e);
            (
                TestOutput::not_evaluated(series.len()),
                TestOutcome::Failed {
                    reason: e.to_string(),
                },
            )
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Outputs must cover every observation of the tested variable
fn check_output(test: &str, variable: &str, len: usize, output: TestOutput) -> Result<TestOutput> {
    if output.flags.len() != len || output.diagnostic.len() != len {
        return Err(QcError::test_execution(
            variable,
            test,
            format!(
                "produced {} flag(s) and {} diagnostic value(s) for {} observation(s)",
                output.flags.len(),
                output.diagnostic.len(),
                len
            ),
        ));
    }
    Ok(output)
}
