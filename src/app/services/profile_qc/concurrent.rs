//! Concurrent evaluation on tokio's blocking pool

use super::engine::{ProfileQc, run_test};
use super::result::{QcResult, TestOutcome};
use crate::app::models::{MaskedSeries, Profile};
use crate::app::services::qc_tests::TestOutput;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::{debug, info, warn};

struct TaskOutput {
    variable: String,
    test: String,
    output: TestOutput,
    outcome: TestOutcome,
}

impl ProfileQc {
    /// Run every planned test on `profile`, up to `workers` at a time
    ///
    /// Produces the same result as [`ProfileQc::evaluate`], panicking tests
    /// included. A blocking task that still fails to join is recorded as a
    /// failed test.
    pub async fn evaluate_concurrent(&self, profile: Arc<Profile>) -> QcResult {
        let start = Instant::now();
        let mut result = QcResult::default();
        let mut tasks = Vec::new();

        for (variable, tests) in &self.plan {
            if profile.contains(variable) {
                tasks.extend(tests.iter().map(|planned| (variable.clone(), planned.clone())));
            } else {
                debug!("Configured variable '{}' is not in the profile", variable);
                result.unevaluated_variables.push(variable.clone());
            }
        }

        debug!(
            "Evaluating {} test(s) with {} worker(s)",
            tasks.len(),
            self.workers
        );

        let outputs = stream::iter(tasks)
            .map(|(variable, planned)| {
                let profile = Arc::clone(&profile);
                let capabilities = self.capabilities.clone();
                async move {
                    let len = profile.get(&variable).map_or(0, MaskedSeries::len);
                    let test = planned.name.clone();

                    let joined = task::spawn_blocking({
                        let variable = variable.clone();
                        move || match profile.get(&variable) {
                            Some(series) => {
                                run_test(&planned, &variable, series, &profile, &capabilities)
                            }
                            None => (
                                TestOutput::not_evaluated(0),
                                TestOutcome::Skipped {
                                    reason: format!("variable '{variable}' is not in the profile"),
                                },
                            ),
                        }
                    })
                    .await;

                    let (output, outcome) = joined.unwrap_or_else(|e| {
                        warn!("Test {} panicked on '{}': {}", test, variable, e);
                        (
                            TestOutput::not_evaluated(len),
                            TestOutcome::Failed {
                                reason: format!("test task did not complete: {e}"),
                            },
                        )
                    });

                    TaskOutput {
                        variable,
                        test,
                        output,
                        outcome,
                    }
                }
            })
            .buffer_unordered(self.workers)
            .collect::<Vec<_>>()
            .await;

        for task in outputs {
            result.record(&task.variable, &task.test, task.output, task.outcome);
        }

        // Aggregation waits for every test of a variable
        for variable in self.plan.keys() {
            if let Some(series) = profile.get(variable) {
                result.aggregate_variable(variable, series.len());
            }
        }

        info!(
            "Concurrent QC finished in {:?}: {}",
            start.elapsed(),
            result.summary()
        );
        result
    }
}
