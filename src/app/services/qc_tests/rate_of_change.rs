//! Rate of change test
//!
//! The diagnostic is the first difference between consecutive observations,
//! by position rather than by physical distance.

use super::{FlagCodes, QcTest, TestInput, TestOutput, ensure_finite, parse_params, threshold_flags};
use crate::Result;
use serde::Deserialize;

pub const NAME: &str = "rate_of_change";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RateOfChangeParams {
    pub threshold: f64,

    #[serde(flatten)]
    pub codes: FlagCodes,
}

#[derive(Debug, Clone)]
pub struct RateOfChange {
    params: RateOfChangeParams,
}

impl RateOfChange {
    pub fn new(params: RateOfChangeParams) -> Result<Self> {
        ensure_finite(NAME, "threshold", params.threshold)?;
        Ok(Self { params })
    }

    pub fn from_config(params: &serde_json::Value) -> Result<Self> {
        Self::new(parse_params(NAME, params)?)
    }
}

/// First difference of `series`; position 0 is always missing
pub fn rate_of_change(series: &crate::MaskedSeries) -> crate::MaskedSeries {
    series.diff()
}

impl QcTest for RateOfChange {
    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(&self, input: &TestInput<'_>) -> Result<TestOutput> {
        let diagnostic = rate_of_change(input.series);
        let threshold = self.params.threshold;
        let flags = threshold_flags(&[input.series], &diagnostic, self.params.codes, |d| {
            d.abs() > threshold
        });
        Ok(TestOutput::new(diagnostic, flags))
    }
}
