//! Tests for the rate of change test

use super::*;
use crate::app::services::qc_tests::rate_of_change::{RateOfChange, rate_of_change};
use serde_json::json;

#[test]
fn test_rate_of_change_first_position_is_missing() {
    let diagnostic = rate_of_change(&series(&[Some(1.0), Some(3.0), Some(2.0)]));
    assert_eq!(diagnostic.values(), &[None, Some(2.0), Some(-1.0)]);
}

#[test]
fn test_rate_of_change_single_observation() {
    let diagnostic = rate_of_change(&series(&[Some(7.0)]));
    assert_eq!(diagnostic.values(), &[None]);
}

#[test]
fn test_rate_of_change_empty_series() {
    assert!(rate_of_change(&series(&[])).is_empty());
}

#[test]
fn test_rate_of_change_missing_neighbour_propagates() {
    let diagnostic = rate_of_change(&series(&[Some(1.0), None, Some(2.0), Some(4.0)]));
    assert_eq!(diagnostic.values(), &[None, None, None, Some(2.0)]);
}

#[test]
fn test_rate_of_change_flags() {
    let test = RateOfChange::from_config(&json!({"threshold": 4.0})).unwrap();
    let profile = temperature_profile(&[Some(10.0), Some(11.0), Some(20.0), None, Some(19.0)]);
    let output = run(&test, &profile, "temperature", &Capabilities::none()).unwrap();

    // Position 0 has no neighbour: input valid, diagnostic undefined
    assert_eq!(output.flags, flags(&[0, 1, 4, 9, 0]));
}

#[test]
fn test_rate_of_change_negative_step_uses_absolute_value() {
    let test = RateOfChange::from_config(&json!({"threshold": 1.0})).unwrap();
    let profile = temperature_profile(&[Some(10.0), Some(5.0)]);
    let output = run(&test, &profile, "temperature", &Capabilities::none()).unwrap();
    assert_eq!(output.flags, flags(&[0, 4]));
}

#[test]
fn test_rate_of_change_scalar_threshold_is_rejected_without_normalisation() {
    assert!(RateOfChange::from_config(&json!(4.0)).is_err());
}
