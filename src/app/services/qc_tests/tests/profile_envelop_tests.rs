//! Tests for the profile envelope test

use super::*;
use crate::QcError;
use crate::app::services::qc_tests::profile_envelop::ProfileEnvelop;
use serde_json::json;

fn envelope() -> ProfileEnvelop {
    ProfileEnvelop::from_config(&json!({
        "layers": [
            {"pmin": -5, "pmax": 50, "minval": -2, "maxval": 35},
            {"pmin": 50, "pmax": 1000, "minval": -2, "maxval": 20}
        ]
    }))
    .unwrap()
}

#[test]
fn test_profile_envelop_uses_layer_of_each_pressure() {
    let profile = Profile::new()
        .with_variable(
            "temperature",
            series(&[Some(30.0), Some(30.0), Some(10.0), Some(5.0), None]),
        )
        .with_variable(
            "pressure",
            series(&[Some(10.0), Some(100.0), Some(50.0), Some(2000.0), Some(20.0)]),
        );

    let output = run(&envelope(), &profile, "temperature", &Capabilities::none()).unwrap();

    // 50 dbar belongs to the upper layer; 2000 dbar is outside the envelope
    assert_eq!(output.flags, flags(&[1, 4, 1, 0, 9]));
    assert_eq!(output.diagnostic.values()[3], None);
}

#[test]
fn test_profile_envelop_missing_pressure_is_not_evaluated() {
    let profile = Profile::new()
        .with_variable("temperature", series(&[Some(30.0)]))
        .with_variable("pressure", series(&[None]));

    let output = run(&envelope(), &profile, "temperature", &Capabilities::none()).unwrap();
    assert_eq!(output.flags, flags(&[0]));
}

#[test]
fn test_profile_envelop_without_pressure() {
    let profile = temperature_profile(&[Some(10.0)]);
    let err = run(&envelope(), &profile, "temperature", &Capabilities::none()).unwrap_err();
    assert!(matches!(err, QcError::MissingVariable { .. }));
}

#[test]
fn test_profile_envelop_pressure_length_mismatch() {
    let profile = Profile::new()
        .with_variable("temperature", series(&[Some(10.0), Some(11.0)]))
        .with_variable("pressure", series(&[Some(10.0)]));
    let err = run(&envelope(), &profile, "temperature", &Capabilities::none()).unwrap_err();
    assert!(matches!(err, QcError::TestExecution { .. }));
}

#[test]
fn test_profile_envelop_rejects_bad_layers() {
    assert!(ProfileEnvelop::from_config(&json!({"layers": []})).is_err());
    assert!(
        ProfileEnvelop::from_config(&json!({
            "layers": [{"pmin": 100, "pmax": 10, "minval": 0, "maxval": 1}]
        }))
        .is_err()
    );
}
