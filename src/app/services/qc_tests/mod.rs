//! Library of individual QC tests
//!
//! Each test evaluates one physical or statistical criterion on a variable of
//! a profile and returns a continuous diagnostic together with one flag per
//! observation. Tests are independent, pure, and never mutate the profile.
//!
//! # Flag conventions
//!
//! All tests share the same rules, implemented by [`threshold_flags`]:
//!
//! - an observation whose input is missing gets [`Flag::Missing`] and a
//!   missing diagnostic
//! - an observation whose input is present but whose diagnostic is undefined
//!   (no neighbour, no reference) gets [`Flag::NoQc`]
//! - otherwise the configured good or bad flag, by comparing the diagnostic
//!   against the test's criterion
//!
//! # Available tests
//!
//! - [`global_range`] - closed interval check
//! - [`rate_of_change`] - first difference against a threshold
//! - [`cum_rate_of_change`] - exponentially weighted rate of change
//! - [`spike`] and [`gradient`] - comparison with the neighbours' mean
//! - [`density_inversion`] - static stability, needs an equation of state
//! - [`woa_normbias`] - normalized bias against a reference climatology
//! - [`profile_envelop`] - depth dependent ranges

pub mod cum_rate_of_change;
pub mod density_inversion;
pub mod global_range;
pub mod gradient;
pub mod profile_envelop;
pub mod rate_of_change;
pub mod registry;
pub mod spike;
pub mod woa_normbias;

#[cfg(test)]
pub mod tests;

pub use registry::{TestFactory, TestRegistry};

use crate::app::models::{Flag, MaskedSeries, Profile};
use crate::app::services::capabilities::Capabilities;
use crate::{QcError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::fmt;

/// Everything a test sees when it is evaluated
#[derive(Debug, Clone, Copy)]
pub struct TestInput<'a> {
    /// Name of the variable under test
    pub variable: &'a str,
    /// Data of the variable under test
    pub series: &'a MaskedSeries,
    /// Whole profile, for tests that need auxiliary variables
    pub profile: &'a Profile,
    pub capabilities: &'a Capabilities,
}

impl<'a> TestInput<'a> {
    /// Auxiliary variable required by `test`
    pub fn require(&self, test: &str, variable: &str) -> Result<&'a MaskedSeries> {
        self.profile
            .get(variable)
            .ok_or_else(|| QcError::missing_variable(test, variable))
    }
}

/// Diagnostic and flags produced by one test on one variable
#[derive(Debug, Clone, PartialEq)]
pub struct TestOutput {
    pub diagnostic: MaskedSeries,
    pub flags: Vec<Flag>,
}

impl TestOutput {
    pub fn new(diagnostic: MaskedSeries, flags: Vec<Flag>) -> Self {
        Self { diagnostic, flags }
    }

    /// Output of a test that could not be evaluated
    pub fn not_evaluated(len: usize) -> Self {
        Self {
            diagnostic: MaskedSeries::missing(len),
            flags: vec![Flag::Missing; len],
        }
    }
}

/// A QC test, configured with its parameters
pub trait QcTest: Send + Sync + fmt::Debug {
    /// Name under which the test appears in configurations and results
    fn name(&self) -> &'static str;

    /// Profile variables the test needs besides the variable under test
    fn required_variables(&self) -> &'static [&'static str] {
        &[]
    }

    fn evaluate(&self, input: &TestInput<'_>) -> Result<TestOutput>;
}

// =============================================================================
// Shared Helpers
// =============================================================================

fn default_flag_good() -> Flag {
    Flag::Good
}

fn default_flag_bad() -> Flag {
    Flag::Bad
}

/// Flags assigned to observations that pass or fail a test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FlagCodes {
    #[serde(default = "default_flag_good")]
    pub flag_good: Flag,

    #[serde(default = "default_flag_bad")]
    pub flag_bad: Flag,
}

impl Default for FlagCodes {
    fn default() -> Self {
        Self {
            flag_good: default_flag_good(),
            flag_bad: default_flag_bad(),
        }
    }
}

/// Derive flags from a diagnostic
///
/// `inputs` are the series the diagnostic was computed from; a position
/// missing in any of them is flagged [`Flag::Missing`].
pub fn threshold_flags(
    inputs: &[&MaskedSeries],
    diagnostic: &MaskedSeries,
    codes: FlagCodes,
    is_bad: impl Fn(f64) -> bool,
) -> Vec<Flag> {
    (0..diagnostic.len())
        .map(|i| {
            if inputs.iter().any(|series| series.is_missing(i)) {
                Flag::Missing
            } else {
                match diagnostic.get(i) {
                    None => Flag::NoQc,
                    Some(value) if is_bad(value) => codes.flag_bad,
                    Some(_) => codes.flag_good,
                }
            }
        })
        .collect()
}

/// Deserialize the parameters of `test` from its configuration object
pub fn parse_params<T: DeserializeOwned>(test: &str, params: &serde_json::Value) -> Result<T> {
    T::deserialize(params)
        .map_err(|e| QcError::configuration(format!("invalid parameters for test '{test}': {e}")))
}

/// Reject non-finite numeric parameters
pub(crate) fn ensure_finite(test: &str, parameter: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(QcError::configuration(format!(
            "parameter '{parameter}' of test '{test}' must be a finite number"
        )))
    }
}

/// Positions where the observation and both immediate neighbours are defined
pub(crate) fn neighbour_statistic(
    series: &MaskedSeries,
    statistic: impl Fn(f64, f64, f64) -> f64,
) -> MaskedSeries {
    (0..series.len())
        .map(|i| {
            if i == 0 {
                return None;
            }
            match (series.get(i - 1), series.get(i), series.get(i + 1)) {
                (Some(prev), Some(curr), Some(next)) => Some(statistic(prev, curr, next)),
                _ => None,
            }
        })
        .collect()
}
