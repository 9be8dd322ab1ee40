//! Cumulative rate of change test
//!
//! Combines consecutive absolute rates of change recursively with an
//! exponential memory, `c[i] = memory * c[i-1] + (1 - memory) * r[i]`, so a
//! slow drift that never trips the single-step test still builds up.
//!
//! Rates are taken against the previous defined observation. The accumulator
//! is seeded with the first defined rate; a defined observation seen before
//! any rate exists gets `0.0` (nothing accumulated yet). Position 0 is always
//! undefined.

use super::{FlagCodes, QcTest, TestInput, TestOutput, ensure_finite, parse_params, threshold_flags};
use crate::app::models::MaskedSeries;
use crate::{QcError, Result};
use serde::Deserialize;

pub const NAME: &str = "cum_rate_of_change";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CumRateOfChangeParams {
    pub memory: f64,

    /// Without a threshold the test only computes the diagnostic
    #[serde(default)]
    pub threshold: Option<f64>,

    #[serde(flatten)]
    pub codes: FlagCodes,
}

#[derive(Debug, Clone)]
pub struct CumRateOfChange {
    params: CumRateOfChangeParams,
}

impl CumRateOfChange {
    pub fn new(params: CumRateOfChangeParams) -> Result<Self> {
        if !(0.0..=1.0).contains(&params.memory) {
            return Err(QcError::configuration(format!(
                "test '{NAME}': memory must be within [0, 1], got {}",
                params.memory
            )));
        }
        if let Some(threshold) = params.threshold {
            ensure_finite(NAME, "threshold", threshold)?;
        }
        Ok(Self { params })
    }

    pub fn from_config(params: &serde_json::Value) -> Result<Self> {
        Self::new(parse_params(NAME, params)?)
    }
}

/// Exponentially weighted cumulative rate of change of `series`
pub fn cum_rate_of_change(series: &MaskedSeries, memory: f64) -> MaskedSeries {
    let mut output = Vec::with_capacity(series.len());
    let mut previous: Option<f64> = None;
    let mut accumulated: Option<f64> = None;

    for (i, value) in series.iter().enumerate() {
        let Some(value) = value else {
            output.push(None);
            continue;
        };

        if i > 0 {
            let cumulative = match (previous, accumulated) {
                (Some(prev), Some(acc)) => memory * acc + (1.0 - memory) * (value - prev).abs(),
                (Some(prev), None) => (value - prev).abs(),
                (None, _) => 0.0,
            };
            if previous.is_some() {
                accumulated = Some(cumulative);
            }
            output.push(Some(cumulative));
        } else {
            output.push(None);
        }

        previous = Some(value);
    }

    MaskedSeries::new(output)
}

impl QcTest for CumRateOfChange {
    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(&self, input: &TestInput<'_>) -> Result<TestOutput> {
        let diagnostic = cum_rate_of_change(input.series, self.params.memory);
        let threshold = self.params.threshold;
        let flags = threshold_flags(&[input.series], &diagnostic, self.params.codes, |c| {
            threshold.is_some_and(|t| c > t)
        });
        Ok(TestOutput::new(diagnostic, flags))
    }
}
