//! Global range test
//!
//! Flags observations outside a closed interval of physically plausible
//! values. The diagnostic is the observation itself.

use super::{FlagCodes, QcTest, TestInput, TestOutput, ensure_finite, parse_params, threshold_flags};
use crate::{QcError, Result};
use serde::Deserialize;

pub const NAME: &str = "global_range";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GlobalRangeParams {
    #[serde(alias = "min")]
    pub minval: f64,

    #[serde(alias = "max")]
    pub maxval: f64,

    #[serde(flatten)]
    pub codes: FlagCodes,
}

#[derive(Debug, Clone)]
pub struct GlobalRange {
    params: GlobalRangeParams,
}

impl GlobalRange {
    pub fn new(params: GlobalRangeParams) -> Result<Self> {
        ensure_finite(NAME, "minval", params.minval)?;
        ensure_finite(NAME, "maxval", params.maxval)?;
        if params.minval > params.maxval {
            return Err(QcError::configuration(format!(
                "test '{NAME}': minval {} is greater than maxval {}",
                params.minval, params.maxval
            )));
        }
        Ok(Self { params })
    }

    pub fn from_config(params: &serde_json::Value) -> Result<Self> {
        Self::new(parse_params(NAME, params)?)
    }
}

impl QcTest for GlobalRange {
    fn name(&self) -> &'static str {
        NAME
    }

    fn evaluate(&self, input: &TestInput<'_>) -> Result<TestOutput> {
        let range = self.params.minval..=self.params.maxval;
        let diagnostic = input.series.clone();
        let flags = threshold_flags(&[input.series], &diagnostic, self.params.codes, |value| {
            !range.contains(&value)
        });
        Ok(TestOutput::new(diagnostic, flags))
    }
}
