//! Gradient test
//!
//! `|x[i] - (x[i-1] + x[i+1]) / 2|`. Undefined at both ends and next to a
//! missing observation.

use super::{
    FlagCodes, QcTest, TestInput, TestOutput, ensure_finite, neighbour_statistic, parse_params,
    threshold_flags,
};
use crate::Result;
use crate::app::models::MaskedSeries;
use serde::Deserialize;

pub const NAME: &str = "gradient";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GradientParams {
    pub threshold: f64,

    #[serde(flatten)]
    pub codes: FlagCodes,
}

#[derive(Debug, Clone)]
pub struct Gradient {
    params: GradientParams,
}

impl Gradient {
    pub fn new(params: GradientParams) -> Result<Self> {
        ensure_finite(NAME, "threshold", params.threshold)?;
        Ok(Self { params })
    }

    pub fn from_config(params: &serde_json::Value) -> Result<Self> {
        Self::new(parse_params(NAME, params)?)
    }
}

pub fn gradient(series: &MaskedSeries) -> MaskedSeries {
    neighbour_statistic(series, |prev, curr, next| (curr - (prev + next) / 2.0).abs())
}

impl QcTest for Gradient {
    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(&self, input: &TestInput<'_>) -> Result<TestOutput> {
        let diagnostic = gradient(input.series);
        let threshold = self.params.threshold;
        let flags = threshold_flags(&[input.series], &diagnostic, self.params.codes, |g| {
            g > threshold
        });
        Ok(TestOutput::new(diagnostic, flags))
    }
}
