//! Tests for flag aggregation

use super::*;
use crate::app::services::profile_qc::{aggregate, aggregate_position};

#[test]
fn test_worst_opinion_wins() {
    assert_eq!(aggregate_position(flags(&[1, 4, 2])), Flag::Bad);
    assert_eq!(aggregate_position(flags(&[1, 2])), Flag::ProbablyGood);
    assert_eq!(aggregate_position(flags(&[3, 1, 1])), Flag::ProbablyBad);
}

#[test]
fn test_no_qc_and_missing_carry_no_opinion() {
    assert_eq!(aggregate_position(flags(&[1, 0, 9])), Flag::Good);
    assert_eq!(aggregate_position(flags(&[0, 9])), Flag::Missing);
    assert_eq!(aggregate_position(flags(&[0])), Flag::Missing);
    assert_eq!(aggregate_position(Vec::new()), Flag::Missing);
}

#[test]
fn test_aggregation_is_order_independent() {
    let a = flags(&[1, 9, 0, 2]);
    let b = flags(&[4, 1, 0, 9]);
    let c = flags(&[0, 3, 0, 1]);

    let forward = aggregate(4, &[&a, &b, &c]);
    let backward = aggregate(4, &[&c, &b, &a]);

    assert_eq!(forward, flags(&[4, 3, 9, 2]));
    assert_eq!(forward, backward);
}

#[test]
fn test_aggregate_without_tests() {
    assert_eq!(aggregate(3, &[]), flags(&[9, 9, 9]));
    assert!(aggregate(0, &[]).is_empty());
}
