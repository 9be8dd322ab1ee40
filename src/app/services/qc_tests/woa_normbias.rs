//! Climatology comparison (normalized bias) test
//!
//! `(x - mean) / std` against a reference climatology interpolated onto the
//! cast's pressure axis by the configured [`ClimatologyProvider`].
//!
//! [`ClimatologyProvider`]: crate::app::services::capabilities::ClimatologyProvider

use super::{FlagCodes, QcTest, TestInput, TestOutput, ensure_finite, parse_params, threshold_flags};
use crate::app::models::MaskedSeries;
use crate::app::services::capabilities::{ClimatologyRequest, ReferenceProfile};
use crate::constants::{DEFAULT_NORMBIAS_THRESHOLD, PRESSURE};
use crate::{QcError, Result};
use serde::Deserialize;
use tracing::debug;

pub const NAME: &str = "woa_normbias";

const REQUIRED: &[&str] = &[PRESSURE];

fn default_threshold() -> f64 {
    DEFAULT_NORMBIAS_THRESHOLD
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WoaNormbiasParams {
    /// Largest acceptable bias, in standard deviations
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(flatten)]
    pub codes: FlagCodes,
}

#[derive(Debug, Clone)]
pub struct WoaNormbias {
    params: WoaNormbiasParams,
}

impl WoaNormbias {
    pub fn new(params: WoaNormbiasParams) -> Result<Self> {
        ensure_finite(NAME, "threshold", params.threshold)?;
        if params.threshold <= 0.0 {
            return Err(QcError::configuration(format!(
                "test '{NAME}': threshold must be positive, got {}",
                params.threshold
            )));
        }
        Ok(Self { params })
    }

    pub fn from_config(params: &serde_json::Value) -> Result<Self> {
        Self::new(parse_params(NAME, params)?)
    }
}

/// Normalized bias of `series` against `reference`
///
/// Undefined where the reference is missing or its standard deviation is not
/// positive.
pub fn normalized_bias(
    series: &MaskedSeries,
    reference: &ReferenceProfile,
) -> Option<MaskedSeries> {
    if reference.mean.len() != series.len() || reference.std.len() != series.len() {
        return None;
    }

    Some(
        (0..series.len())
            .map(|i| match (series.get(i), reference.mean.get(i), reference.std.get(i)) {
                (Some(x), Some(mean), Some(std)) if std > 0.0 => Some((x - mean) / std),
                _ => None,
            })
            .collect(),
    )
}

impl QcTest for WoaNormbias {
    fn name(&self) -> &'static str {
        NAME
    }

    fn required_variables(&self) -> &'static [&'static str] {
        REQUIRED
    }

    fn evaluate(&self, input: &TestInput<'_>) -> Result<TestOutput> {
        let provider = input
            .capabilities
            .climatology
            .as_ref()
            .ok_or_else(|| QcError::missing_dependency(NAME, "a climatology provider"))?;

        let metadata = input.profile.metadata();
        let day_of_year = metadata
            .day_of_year()
            .ok_or_else(|| QcError::missing_variable(NAME, "timestamp"))?;
        let (latitude, longitude) = metadata
            .position()
            .ok_or_else(|| QcError::missing_variable(NAME, "position"))?;
        let depths = input.require(NAME, PRESSURE)?;

        let request = ClimatologyRequest {
            variable: input.variable,
            day_of_year,
            latitude,
            longitude,
            depths,
        };

        // A provider that cannot serve the cast is treated like a missing one
        let reference = provider.reference(&request).map_err(|e| {
            debug!("Climatology unavailable for '{}': {}", input.variable, e);
            QcError::missing_dependency(NAME, format!("reference climatology ({e})"))
        })?;

        let diagnostic = normalized_bias(input.series, &reference).ok_or_else(|| {
            QcError::test_execution(
                input.variable,
                NAME,
                format!(
                    "reference climatology has {} levels, profile has {}",
                    reference.mean.len(),
                    input.series.len()
                ),
            )
        })?;

        let threshold = self.params.threshold;
        let flags = threshold_flags(&[input.series], &diagnostic, self.params.codes, |b| {
            b.abs() > threshold
        });
        Ok(TestOutput::new(diagnostic, flags))
    }
}
