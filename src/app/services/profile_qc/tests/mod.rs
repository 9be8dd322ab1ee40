//! Tests for the profile QC engine

pub mod aggregation_tests;

use crate::app::models::{Flag, MaskedSeries, Profile};
use crate::app::services::config_resolver::{ResolvedConfig, load_config};
use crate::app::services::qc_tests::{QcTest, TestInput, TestOutput};
use serde_json::Value;

pub fn series(values: &[Option<f64>]) -> MaskedSeries {
    MaskedSeries::new(values.to_vec())
}

pub fn flags(codes: &[u8]) -> Vec<Flag> {
    codes
        .iter()
        .map(|&code| Flag::try_from(code).unwrap())
        .collect()
}

pub fn inline(config: Value) -> ResolvedConfig {
    crate::logging::try_setup_test_logging();
    load_config(config).unwrap()
}

/// A user test that panics on every input
#[derive(Debug)]
pub struct Panicking;

impl QcTest for Panicking {
    fn name(&self) -> &'static str {
        "panicking"
    }

    fn evaluate(&self, _input: &TestInput<'_>) -> crate::Result<TestOutput> {
        panic!("instrument exploded");
    }
}

/// Small CTD cast with a spike in temperature at 20 dbar
pub fn ctd_profile() -> Profile {
    Profile::new()
        .with_variable(
            "pressure",
            series(&[Some(0.0), Some(10.0), Some(20.0), Some(30.0), Some(40.0)]),
        )
        .with_variable(
            "temperature",
            series(&[Some(25.0), Some(24.5), Some(30.0), Some(23.5), None]),
        )
        .with_variable(
            "salinity",
            series(&[Some(35.0), Some(35.1), Some(35.1), Some(35.2), Some(35.2)]),
        )
}
