//! Profile envelope test
//!
//! A depth dependent range check. Each layer `pmin < p <= pmax` carries its
//! own `[minval, maxval]`; observations are checked against the first layer
//! containing their pressure. Observations outside every layer, or without a
//! pressure, are not evaluated.

use super::{FlagCodes, QcTest, TestInput, TestOutput, ensure_finite, parse_params};
use crate::app::models::{Flag, MaskedSeries};
use crate::constants::PRESSURE;
use crate::{QcError, Result};
use serde::Deserialize;

pub const NAME: &str = "profile_envelop";

const REQUIRED: &[&str] = &[PRESSURE];

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnvelopeLayer {
    pub pmin: f64,
    pub pmax: f64,
    pub minval: f64,
    pub maxval: f64,
}

impl EnvelopeLayer {
    fn contains_pressure(&self, pressure: f64) -> bool {
        pressure > self.pmin && pressure <= self.pmax
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProfileEnvelopParams {
    pub layers: Vec<EnvelopeLayer>,

    #[serde(flatten)]
    pub codes: FlagCodes,
}

#[derive(Debug, Clone)]
pub struct ProfileEnvelop {
    params: ProfileEnvelopParams,
}

impl ProfileEnvelop {
    pub fn new(params: ProfileEnvelopParams) -> Result<Self> {
        if params.layers.is_empty() {
            return Err(QcError::configuration(format!(
                "test '{NAME}' needs at least one layer"
            )));
        }
        for layer in &params.layers {
            ensure_finite(NAME, "minval", layer.minval)?;
            ensure_finite(NAME, "maxval", layer.maxval)?;
            if layer.pmin >= layer.pmax || layer.minval > layer.maxval {
                return Err(QcError::configuration(format!(
                    "test '{NAME}': invalid layer {layer:?}"
                )));
            }
        }
        Ok(Self { params })
    }

    pub fn from_config(params: &serde_json::Value) -> Result<Self> {
        Self::new(parse_params(NAME, params)?)
    }

    fn layer_for(&self, pressure: f64) -> Option<&EnvelopeLayer> {
        self.params
            .layers
            .iter()
            .find(|layer| layer.contains_pressure(pressure))
    }
}

impl QcTest for ProfileEnvelop {
    fn name(&self) -> &'static str {
        NAME
    }

    fn required_variables(&self) -> &'static [&'static str] {
        REQUIRED
    }

    fn evaluate(&self, input: &TestInput<'_>) -> Result<TestOutput> {
        let pressure = input.require(NAME, PRESSURE)?;
        if pressure.len() != input.series.len() {
            return Err(QcError::test_execution(
                input.variable,
                NAME,
                format!(
                    "pressure has {} observations, variable has {}",
                    pressure.len(),
                    input.series.len()
                ),
            ));
        }

        let codes = self.params.codes;
        let mut diagnostic = Vec::with_capacity(input.series.len());
        let mut flags = Vec::with_capacity(input.series.len());

        for (value, p) in input.series.iter().zip(pressure.iter()) {
            let layer = p.and_then(|p| self.layer_for(p));
            match (value, layer) {
                (None, _) => {
                    diagnostic.push(None);
                    flags.push(Flag::Missing);
                }
                (Some(_), None) => {
                    diagnostic.push(None);
                    flags.push(Flag::NoQc);
                }
                (Some(v), Some(layer)) => {
                    diagnostic.push(Some(v));
                    flags.push(if (layer.minval..=layer.maxval).contains(&v) {
                        codes.flag_good
                    } else {
                        codes.flag_bad
                    });
                }
            }
        }

        Ok(TestOutput::new(MaskedSeries::new(diagnostic), flags))
    }
}
