//! Spike test
//!
//! `|x[i] - (x[i-1] + x[i+1]) / 2| - |(x[i+1] - x[i-1]) / 2|`, the departure
//! from the neighbours' mean minus half the neighbours' spread, so a steep
//! but smooth gradient does not read as a spike. Undefined unless both
//! neighbours are defined.

use super::{
    FlagCodes, QcTest, TestInput, TestOutput, ensure_finite, neighbour_statistic, parse_params,
    threshold_flags,
};
use crate::Result;
use crate::app::models::MaskedSeries;
use serde::Deserialize;

pub const NAME: &str = "spike";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SpikeParams {
    pub threshold: f64,

    #[serde(flatten)]
    pub codes: FlagCodes,
}

#[derive(Debug, Clone)]
pub struct Spike {
    params: SpikeParams,
}

impl Spike {
    pub fn new(params: SpikeParams) -> Result<Self> {
        ensure_finite(NAME, "threshold", params.threshold)?;
        Ok(Self { params })
    }

    pub fn from_config(params: &serde_json::Value) -> Result<Self> {
        Self::new(parse_params(NAME, params)?)
    }
}

pub fn spike(series: &MaskedSeries) -> MaskedSeries {
    neighbour_statistic(series, |prev, curr, next| {
        (curr - (prev + next) / 2.0).abs() - ((next - prev) / 2.0).abs()
    })
}

impl QcTest for Spike {
    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(&self, input: &TestInput<'_>) -> Result<TestOutput> {
        let diagnostic = spike(input.series);
        let threshold = self.params.threshold;
        let flags = threshold_flags(&[input.series], &diagnostic, self.params.codes, |s| {
            s > threshold
        });
        Ok(TestOutput::new(diagnostic, flags))
    }
}
