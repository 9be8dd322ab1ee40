//! Reference climatology capability
//!
//! Retrieving and interpolating an atlas (e.g. the World Ocean Atlas) is the
//! job of an external collaborator. The QC core only consumes the mean and
//! standard deviation it returns on the profile's own depth axis.

use crate::app::models::MaskedSeries;
use crate::{QcError, Result};
use std::collections::BTreeMap;

/// Request for a reference profile at one cast
#[derive(Debug, Clone, Copy)]
pub struct ClimatologyRequest<'a> {
    /// Variable to look up (e.g. "temperature")
    pub variable: &'a str,
    /// Day of year of the cast, 1-based
    pub day_of_year: u32,
    pub latitude: f64,
    pub longitude: f64,
    /// Depth axis (pressure, dbar) to interpolate onto
    pub depths: &'a MaskedSeries,
}

/// Reference mean and standard deviation on the requested depth axis
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceProfile {
    pub mean: MaskedSeries,
    pub std: MaskedSeries,
}

impl ReferenceProfile {
    pub fn new(mean: impl Into<MaskedSeries>, std: impl Into<MaskedSeries>) -> Self {
        Self {
            mean: mean.into(),
            std: std.into(),
        }
    }
}

/// Source of reference climatology profiles
pub trait ClimatologyProvider: Send + Sync {
    fn reference(&self, request: &ClimatologyRequest<'_>) -> Result<ReferenceProfile>;
}

/// Provider serving pre-interpolated reference profiles held in memory
///
/// Useful when the caller has already interpolated the atlas onto the cast,
/// which is the usual arrangement when profiles are processed in batches.
#[derive(Debug, Clone, Default)]
pub struct StaticClimatology {
    references: BTreeMap<String, ReferenceProfile>,
}

impl StaticClimatology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference(
        mut self,
        variable: impl Into<String>,
        reference: ReferenceProfile,
    ) -> Self {
        self.references.insert(variable.into(), reference);
        self
    }
}

impl ClimatologyProvider for StaticClimatology {
    fn reference(&self, request: &ClimatologyRequest<'_>) -> Result<ReferenceProfile> {
        self.references
            .get(request.variable)
            .cloned()
            .ok_or_else(|| {
                QcError::missing_dependency(
                    "woa_normbias",
                    format!("reference climatology for '{}'", request.variable),
                )
            })
    }
}
