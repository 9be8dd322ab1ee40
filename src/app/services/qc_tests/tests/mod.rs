//! Tests for the QC test library
//!
//! Each file covers one test; helpers here build inputs and capabilities.

pub mod profile_envelop_tests;
pub mod rate_of_change_tests;

use crate::app::models::{Flag, MaskedSeries, Profile};
use crate::app::services::capabilities::{Capabilities, EquationOfState};
use std::sync::Arc;

/// Series from optional values
pub fn series(values: &[Option<f64>]) -> MaskedSeries {
    MaskedSeries::new(values.to_vec())
}

/// Flags from their numeric codes
pub fn flags(codes: &[u8]) -> Vec<Flag> {
    codes
        .iter()
        .map(|&c| Flag::try_from(c).expect("valid flag code"))
        .collect()
}

/// Equation of state with a trivially checkable density, `rho = 1000 + S - T`
#[derive(Debug)]
pub struct LinearEos;

impl EquationOfState for LinearEos {
    fn name(&self) -> &str {
        "linear"
    }

    fn potential_density(&self, salinity: f64, temperature: f64, _pressure: f64, _pr: f64) -> f64 {
        1000.0 + salinity - temperature
    }
}

pub fn linear_capabilities() -> Capabilities {
    Capabilities::none().with_equation_of_state(Arc::new(LinearEos))
}

/// Profile with a single temperature variable
pub fn temperature_profile(values: &[Option<f64>]) -> Profile {
    Profile::new().with_variable("temperature", series(values))
}

/// Assert two series agree element-wise within `tolerance`
pub fn assert_series_close(actual: &MaskedSeries, expected: &[Option<f64>], tolerance: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch: {actual:?}");
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        match (a, e) {
            (None, None) => {}
            (Some(a), Some(e)) => assert!(
                (a - e).abs() <= tolerance,
                "position {i}: expected {e}, got {a}"
            ),
            _ => panic!("position {i}: expected {e:?}, got {a:?}"),
        }
    }
}

/// Evaluate `test` on `variable` of `profile`
pub fn run(
    test: &dyn crate::app::services::qc_tests::QcTest,
    profile: &Profile,
    variable: &str,
    capabilities: &Capabilities,
) -> crate::Result<crate::app::services::qc_tests::TestOutput> {
    let input = crate::app::services::qc_tests::TestInput {
        variable,
        series: profile.get(variable).expect("variable present"),
        profile,
        capabilities,
    };
    test.evaluate(&input)
}
