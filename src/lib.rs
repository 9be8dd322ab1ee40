//! Profile QC Library
//!
//! Configuration-driven quality control of oceanographic profiles
//! (temperature, salinity, pressure and other variables measured along a
//! cast).
//!
//! This library provides tools for:
//! - Resolving named or inline QC configurations with inheritance
//! - Running range, rate of change, spike, gradient, density inversion,
//!   climatology and profile envelope tests on each configured variable
//! - Reducing per-test flags into one overall flag per observation
//! - Isolating tests that cannot run, with their outcome recorded
//! - Evaluating tests concurrently on tokio's blocking pool
//! - Reading profiles from, and writing flags to, polars DataFrames
//!
//! ```no_run
//! use profile_qc::{MaskedSeries, Profile, ProfileQc, load_config};
//!
//! let config = load_config("cotede")?;
//! let qc = ProfileQc::new(config)?;
//!
//! let profile = Profile::new()
//!     .with_variable("pressure", vec![0.0, 10.0, 20.0])
//!     .with_variable("temperature", MaskedSeries::new(vec![Some(25.0), None, Some(24.1)]));
//! let result = qc.evaluate(&profile);
//! println!("{:?}", result.overall("temperature"));
//! # Ok::<(), profile_qc::QcError>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod capabilities;
        pub mod config_resolver;
        pub mod profile_qc;
        pub mod qc_tests;
    }
    pub mod adapters {
        pub mod dataframe;
    }
}

// Re-export commonly used types
pub use app::models::{Flag, MaskedSeries, Profile, ProfileMetadata};
#[cfg(feature = "eos80")]
pub use app::services::capabilities::Eos80;
pub use app::services::capabilities::{
    Capabilities, ClimatologyProvider, ClimatologyRequest, EquationOfState, ReferenceProfile,
    StaticClimatology,
};
pub use app::services::config_resolver::{ConfigCatalog, ConfigSpec, ResolvedConfig, load_config};
pub use app::services::profile_qc::{
    ProfileQc, ProfileQcBuilder, QcResult, QcSummary, TestOutcome, aggregate,
};
pub use app::services::qc_tests::{QcTest, TestInput, TestOutput, TestRegistry};
pub use config::QcSettings;
pub use error::{QcError, Result};
