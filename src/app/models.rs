//! Data models for profile quality control
//!
//! This module contains the core data structures shared by the QC tests and
//! the engine: quality flags, missing-aware numeric series, and profiles.

use crate::constants::flags;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

// =============================================================================
// Quality Flags
// =============================================================================

/// Quality flag attached to a single observation
///
/// Codes are ordinal for the evaluated range: `Good < ProbablyGood <
/// ProbablyBad < Bad`. `NoQc` and `Missing` carry no opinion about the
/// measurement and are ignored by flag aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Flag {
    /// No QC was performed
    NoQc = flags::NO_QC,
    /// Good data
    Good = flags::GOOD,
    /// Probably good data
    ProbablyGood = flags::PROBABLY_GOOD,
    /// Probably bad data
    ProbablyBad = flags::PROBABLY_BAD,
    /// Bad data
    Bad = flags::BAD,
    /// Missing value or not evaluated
    Missing = flags::MISSING,
}

impl Flag {
    /// Numeric flag code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// True for flags that express a finding about the measurement
    pub fn is_opinion(self) -> bool {
        !matches!(self, Flag::NoQc | Flag::Missing)
    }
}

impl TryFrom<u8> for Flag {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            flags::NO_QC => Ok(Flag::NoQc),
            flags::GOOD => Ok(Flag::Good),
            flags::PROBABLY_GOOD => Ok(Flag::ProbablyGood),
            flags::PROBABLY_BAD => Ok(Flag::ProbablyBad),
            flags::BAD => Ok(Flag::Bad),
            flags::MISSING => Ok(Flag::Missing),
            other => Err(format!(
                "invalid flag code {other}: expected one of {:?}",
                flags::ALL_VALUES
            )),
        }
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for Flag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for Flag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        Flag::try_from(code).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Missing-aware Numeric Series
// =============================================================================

/// Ordered numeric measurements where any element may be missing
///
/// Arithmetic follows masked-array semantics: missing combined with anything
/// is missing. Non-finite values are stored as missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaskedSeries {
    values: Vec<Option<f64>>,
}

impl MaskedSeries {
    /// Create a series, masking any non-finite value
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self {
            values: values
                .into_iter()
                .map(|v| v.filter(|x| x.is_finite()))
                .collect(),
        }
    }

    /// Create a series from raw floats, treating NaN and infinities as missing
    pub fn from_values(values: &[f64]) -> Self {
        values.iter().map(|&v| Some(v)).collect()
    }

    /// Create a fully missing series of the given length
    pub fn missing(len: usize) -> Self {
        Self {
            values: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`, `None` if missing or out of bounds
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn is_missing(&self, index: usize) -> bool {
        self.get(index).is_none()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.values.iter().copied()
    }

    /// Number of non-missing values
    pub fn count_valid(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }

    /// Apply `f` to every defined value
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        self.iter().map(|v| v.map(&f)).collect()
    }

    pub fn abs(&self) -> Self {
        self.map(f64::abs)
    }

    /// First difference by position; position 0 is always missing
    pub fn diff(&self) -> Self {
        std::iter::once(None)
            .chain(
                self.values
                    .windows(2)
                    .map(|pair| match (pair[0], pair[1]) {
                        (Some(prev), Some(curr)) => Some(curr - prev),
                        _ => None,
                    }),
            )
            .take(self.len())
            .collect()
    }

    /// Combine two series element-wise; `None` when lengths differ
    pub fn zip_with(&self, other: &MaskedSeries, f: impl Fn(f64, f64) -> f64) -> Option<Self> {
        if self.len() != other.len() {
            return None;
        }

        Some(
            self.iter()
                .zip(other.iter())
                .map(|(a, b)| match (a, b) {
                    (Some(a), Some(b)) => Some(f(a, b)),
                    _ => None,
                })
                .collect(),
        )
    }
}

impl FromIterator<Option<f64>> for MaskedSeries {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl From<Vec<Option<f64>>> for MaskedSeries {
    fn from(values: Vec<Option<f64>>) -> Self {
        Self::new(values)
    }
}

impl From<Vec<f64>> for MaskedSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::from_values(&values)
    }
}

// =============================================================================
// Profile
// =============================================================================

/// Time and position of a cast, used to request reference climatology
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileMetadata {
    /// Time of the cast
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Latitude in decimal degrees north
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees east
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl ProfileMetadata {
    pub fn new(timestamp: DateTime<Utc>, latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }

    /// Day of year (1-based) of the cast
    pub fn day_of_year(&self) -> Option<u32> {
        self.timestamp.map(|t| t.ordinal())
    }

    /// Cast position as (latitude, longitude)
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Measurements of one vertical cast, keyed by variable name
///
/// A profile is read-only input to the engine. Variables tested together
/// must share a length; the engine checks this per test.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    variables: BTreeMap<String, MaskedSeries>,

    #[serde(default)]
    metadata: ProfileMetadata,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable, builder style
    pub fn with_variable(
        mut self,
        name: impl Into<String>,
        series: impl Into<MaskedSeries>,
    ) -> Self {
        self.insert(name, series);
        self
    }

    pub fn with_metadata(mut self, metadata: ProfileMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Insert or replace a variable
    pub fn insert(&mut self, name: impl Into<String>, series: impl Into<MaskedSeries>) {
        self.variables.insert(name.into(), series.into());
    }

    pub fn get(&self, name: &str) -> Option<&MaskedSeries> {
        self.variables.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn variable_names(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }

    pub fn metadata(&self) -> &ProfileMetadata {
        &self.metadata
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
