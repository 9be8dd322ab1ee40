//! Application constants for profile quality control
//!
//! Flag codes, canonical configuration keys, and the standard variable
//! names used by multi-variable tests.

// =============================================================================
// Quality Control Flags
// =============================================================================

/// Flag codes as used by the IOC/GTSPP/Argo family of QC procedures
pub mod flags {
    /// No QC was performed on this value
    pub const NO_QC: u8 = 0;

    /// Good data
    pub const GOOD: u8 = 1;

    /// Probably good data
    pub const PROBABLY_GOOD: u8 = 2;

    /// Probably bad data, potentially correctable
    pub const PROBABLY_BAD: u8 = 3;

    /// Bad data
    pub const BAD: u8 = 4;

    /// Missing value, or the test could not be evaluated
    pub const MISSING: u8 = 9;

    /// All valid flag codes
    pub const ALL_VALUES: &[u8] = &[NO_QC, GOOD, PROBABLY_GOOD, PROBABLY_BAD, BAD, MISSING];
}

/// Key under which the aggregated flag of each variable is reported
pub const OVERALL_FLAG_KEY: &str = "overall";

// =============================================================================
// Configuration Layout
// =============================================================================

/// Top-level key holding the inheritance chain
pub const INHERIT_KEY: &str = "inherit";

/// Top-level key holding per-variable test configuration
pub const VARIABLES_KEY: &str = "variables";

/// Top-level keys that are never treated as variable names
pub const RESERVED_SECTIONS: &[&str] = &[INHERIT_KEY, VARIABLES_KEY, "main", "revision"];

/// Configuration used when the caller does not name one
pub const DEFAULT_CONFIG_NAME: &str = "cotede";

/// Directory (under the user config dir) holding user configuration files
pub const USER_CONFIG_DIR_NAME: &str = "profile_qc";

/// Sub-directory holding QC configuration files
pub const QC_CONFIG_SUBDIR: &str = "qc_cfg";

// =============================================================================
// Standard Variable Names
// =============================================================================

pub const TEMPERATURE: &str = "temperature";
pub const SALINITY: &str = "salinity";
pub const PRESSURE: &str = "pressure";

/// Reference pressure (dbar) for potential density in the density inversion test
pub const DENSITY_REFERENCE_PRESSURE: f64 = 0.0;

/// Default density inversion threshold in kg/m³ (Argo real-time QC)
pub const DEFAULT_DENSITY_INVERSION_THRESHOLD: f64 = -0.03;

/// Default normalized bias threshold, in standard deviations
pub const DEFAULT_NORMBIAS_THRESHOLD: f64 = 3.0;
