//! Density inversion test
//!
//! Based on test 14 of the Argo real-time QC manual. Potential density is
//! computed at the surface, differenced between consecutive observations and
//! multiplied by the sign of the pressure difference, so a stable water
//! column gives a non-negative diagnostic whether the cast was taken
//! descending or ascending. Observations whose diagnostic falls below the
//! threshold are flagged bad.

use super::{FlagCodes, QcTest, TestInput, TestOutput, ensure_finite, parse_params, threshold_flags};
use crate::app::models::MaskedSeries;
use crate::app::services::capabilities::EquationOfState;
use crate::constants::{
    DEFAULT_DENSITY_INVERSION_THRESHOLD, DENSITY_REFERENCE_PRESSURE, PRESSURE, SALINITY,
    TEMPERATURE,
};
use crate::{QcError, Result};
use serde::Deserialize;
use tracing::debug;

pub const NAME: &str = "density_inversion";

const REQUIRED: &[&str] = &[TEMPERATURE, SALINITY, PRESSURE];

fn default_threshold() -> f64 {
    DEFAULT_DENSITY_INVERSION_THRESHOLD
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DensityInversionParams {
    /// Lowest acceptable density step, kg/m³
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    #[serde(flatten)]
    pub codes: FlagCodes,
}

#[derive(Debug, Clone)]
pub struct DensityInversion {
    params: DensityInversionParams,
}

impl DensityInversion {
    pub fn new(params: DensityInversionParams) -> Result<Self> {
        ensure_finite(NAME, "threshold", params.threshold)?;
        Ok(Self { params })
    }

    pub fn from_config(params: &serde_json::Value) -> Result<Self> {
        Self::new(parse_params(NAME, params)?)
    }
}

/// Signed potential density step between consecutive observations
///
/// `d[i] = sign(P[i] - P[i-1]) * (rho0[i] - rho0[i-1])`, position 0 missing.
/// Fails when the three series differ in length.
pub fn density_step(
    eos: &dyn EquationOfState,
    variable: &str,
    temperature: &MaskedSeries,
    salinity: &MaskedSeries,
    pressure: &MaskedSeries,
) -> Result<MaskedSeries> {
    if temperature.len() != salinity.len() || temperature.len() != pressure.len() {
        return Err(QcError::test_execution(
            variable,
            NAME,
            format!(
                "temperature, salinity and pressure must have the same length, got {}, {} and {}",
                temperature.len(),
                salinity.len(),
                pressure.len()
            ),
        ));
    }

    let rho0: MaskedSeries = (0..temperature.len())
        .map(|i| match (salinity.get(i), temperature.get(i), pressure.get(i)) {
            (Some(s), Some(t), Some(p)) => {
                Some(eos.potential_density(s, t, p, DENSITY_REFERENCE_PRESSURE))
            }
            _ => None,
        })
        .collect();

    Ok(rho0
        .diff()
        .zip_with(&pressure.diff(), |drho, dp| sign(dp) * drho)
        .unwrap_or_else(|| MaskedSeries::missing(temperature.len())))
}

/// Sign with `sign(0) = 0`, unlike `f64::signum`
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl QcTest for DensityInversion {
    fn name(&self) -> &'static str {
        NAME
    }

    fn required_variables(&self) -> &'static [&'static str] {
        REQUIRED
    }

    fn evaluate(&self, input: &TestInput<'_>) -> Result<TestOutput> {
        let eos = input
            .capabilities
            .equation_of_state
            .as_ref()
            .ok_or_else(|| QcError::missing_dependency(NAME, "an equation of state"))?;

        let temperature = input.require(NAME, TEMPERATURE)?;
        let salinity = input.require(NAME, SALINITY)?;
        let pressure = input.require(NAME, PRESSURE)?;

        let diagnostic =
            density_step(eos.as_ref(), input.variable, temperature, salinity, pressure)?;
        if diagnostic.len() != input.series.len() {
            return Err(QcError::test_execution(
                input.variable,
                NAME,
                format!(
                    "variable has {} observations but the density profile has {}",
                    input.series.len(),
                    diagnostic.len()
                ),
            ));
        }

        debug!(
            "Density inversion on '{}' using {}: {} defined steps",
            input.variable,
            eos.name(),
            diagnostic.count_valid()
        );

        let threshold = self.params.threshold;
        let flags = threshold_flags(
            &[input.series, temperature, salinity, pressure],
            &diagnostic,
            self.params.codes,
            |d| d < threshold,
        );
        Ok(TestOutput::new(diagnostic, flags))
    }
}
