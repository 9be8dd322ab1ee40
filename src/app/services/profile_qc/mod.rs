//! Profile QC engine
//!
//! Builds a validated plan from a [`ResolvedConfig`], runs every configured
//! test on every configured variable present in a profile, and reduces the
//! per-test flags into an `overall` flag per observation.
//!
//! Tests that cannot run are isolated: a missing auxiliary variable or
//! capability skips the test, a failing precondition fails it. Either way the
//! test is reported with all-missing flags and diagnostics and an entry in
//! [`QcResult::outcomes`], and the remaining tests still run.
//!
//! [`ResolvedConfig`]: crate::app::services::config_resolver::ResolvedConfig

pub mod aggregation;
pub mod concurrent;
pub mod engine;
pub mod result;

#[cfg(test)]
pub mod tests;

pub use aggregation::{aggregate, aggregate_position};
pub use engine::{ProfileQc, ProfileQcBuilder};
pub use result::{QcResult, QcSummary, TestOutcome};
