//! Results of a profile QC run

use super::aggregation::aggregate;
use crate::app::models::{Flag, MaskedSeries};
use crate::app::services::qc_tests::TestOutput;
use crate::constants::OVERALL_FLAG_KEY;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// What happened to one (variable, test) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TestOutcome {
    Evaluated,
    /// The test could not be attempted (missing variable or capability)
    Skipped { reason: String },
    /// The test was attempted and failed
    Failed { reason: String },
}

impl TestOutcome {
    pub fn is_evaluated(&self) -> bool {
        matches!(self, Self::Evaluated)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Evaluated => None,
            Self::Skipped { reason } | Self::Failed { reason } => Some(reason),
        }
    }
}

/// Flags, diagnostics and outcomes of every configured test
///
/// All maps are keyed by variable, then by test name. `flags` additionally
/// holds the aggregated flags of each variable under `overall`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QcResult {
    pub flags: BTreeMap<String, BTreeMap<String, Vec<Flag>>>,
    pub diagnostics: BTreeMap<String, BTreeMap<String, MaskedSeries>>,
    pub outcomes: BTreeMap<String, BTreeMap<String, TestOutcome>>,
    /// Configured variables the profile does not carry
    pub unevaluated_variables: Vec<String>,
}

impl QcResult {
    /// Aggregated flags of `variable`
    pub fn overall(&self, variable: &str) -> Option<&[Flag]> {
        self.flags_for(variable, OVERALL_FLAG_KEY)
    }

    pub fn flags_for(&self, variable: &str, test: &str) -> Option<&[Flag]> {
        self.flags.get(variable)?.get(test).map(Vec::as_slice)
    }

    pub fn diagnostic(&self, variable: &str, test: &str) -> Option<&MaskedSeries> {
        self.diagnostics.get(variable)?.get(test)
    }

    pub fn outcome(&self, variable: &str, test: &str) -> Option<&TestOutcome> {
        self.outcomes.get(variable)?.get(test)
    }

    /// Variables that were evaluated
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }

    /// (variable, test, reason) of every test that failed
    pub fn failed_tests(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.outcomes_matching(|outcome| matches!(outcome, TestOutcome::Failed { .. }))
    }

    /// (variable, test, reason) of every test that was skipped
    pub fn skipped_tests(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.outcomes_matching(|outcome| matches!(outcome, TestOutcome::Skipped { .. }))
    }

    fn outcomes_matching(
        &self,
        predicate: fn(&TestOutcome) -> bool,
    ) -> impl Iterator<Item = (&str, &str, &str)> {
        self.outcomes.iter().flat_map(move |(variable, tests)| {
            tests
                .iter()
                .filter(move |(_, outcome)| predicate(outcome))
                .map(move |(test, outcome)| {
                    (
                        variable.as_str(),
                        test.as_str(),
                        outcome.reason().unwrap_or_default(),
                    )
                })
        })
    }

    pub fn summary(&self) -> QcSummary {
        let mut summary = QcSummary {
            variables: self.flags.len(),
            ..QcSummary::default()
        };

        for outcome in self.outcomes.values().flat_map(BTreeMap::values) {
            match outcome {
                TestOutcome::Evaluated => summary.tests_evaluated += 1,
                TestOutcome::Skipped { .. } => summary.tests_skipped += 1,
                TestOutcome::Failed { .. } => summary.tests_failed += 1,
            }
        }

        for flags in self.flags.values().filter_map(|tests| tests.get(OVERALL_FLAG_KEY)) {
            for flag in flags {
                *summary.overall_counts.entry(flag.code()).or_default() += 1;
            }
        }

        summary
    }

    pub(crate) fn record(
        &mut self,
        variable: &str,
        test: &str,
        output: TestOutput,
        outcome: TestOutcome,
    ) {
        self.flags
            .entry(variable.to_string())
            .or_default()
            .insert(test.to_string(), output.flags);
        self.diagnostics
            .entry(variable.to_string())
            .or_default()
            .insert(test.to_string(), output.diagnostic);
        self.outcomes
            .entry(variable.to_string())
            .or_default()
            .insert(test.to_string(), outcome);
    }

    /// Compute `overall` once every test of `variable` is recorded
    pub(crate) fn aggregate_variable(&mut self, variable: &str, len: usize) {
        let tests = self.flags.entry(variable.to_string()).or_default();
        let overall = {
            let test_flags: Vec<&[Flag]> = tests
                .iter()
                .filter(|(name, _)| name.as_str() != OVERALL_FLAG_KEY)
                .map(|(_, flags)| flags.as_slice())
                .collect();
            aggregate(len, &test_flags)
        };
        tests.insert(OVERALL_FLAG_KEY.to_string(), overall);
    }
}

/// Counts over a [`QcResult`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QcSummary {
    pub variables: usize,
    pub tests_evaluated: usize,
    pub tests_skipped: usize,
    pub tests_failed: usize,
    /// Number of observations per overall flag code
    pub overall_counts: BTreeMap<u8, usize>,
}

impl fmt::Display for QcSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} variable(s), {} test(s) evaluated, {} skipped, {} failed",
            self.variables, self.tests_evaluated, self.tests_skipped, self.tests_failed
        )
    }
}
