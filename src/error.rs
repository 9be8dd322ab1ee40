//! Error handling for profile quality control.
//!
//! Configuration errors are fatal to a run. Dependency, variable and
//! execution errors are attributed to a single (variable, test) pair and
//! recovered by the engine.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Configuration not found: {name}")]
    ConfigurationNotFound { name: String },

    #[error("Configuration inheritance cycle: {}", chain.join(" -> "))]
    ConfigurationCycle { chain: Vec<String> },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Test '{test}' requires {capability}, which is not available")]
    MissingDependency { test: String, capability: String },

    #[error("Test '{test}' requires variable '{variable}', which is missing from the profile")]
    MissingVariable { test: String, variable: String },

    #[error("No QC result for variable '{variable}'")]
    VariableNotEvaluated { variable: String },

    #[error("Test '{test}' failed on variable '{variable}': {reason}")]
    TestExecution {
        variable: String,
        test: String,
        reason: String,
    },
}

impl QcError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a configuration not found error
    pub fn configuration_not_found(name: impl Into<String>) -> Self {
        Self::ConfigurationNotFound { name: name.into() }
    }

    /// Create a missing dependency error
    pub fn missing_dependency(test: impl Into<String>, capability: impl Into<String>) -> Self {
        Self::MissingDependency {
            test: test.into(),
            capability: capability.into(),
        }
    }

    /// Create a missing variable error
    pub fn missing_variable(test: impl Into<String>, variable: impl Into<String>) -> Self {
        Self::MissingVariable {
            test: test.into(),
            variable: variable.into(),
        }
    }

    /// Create an error for a result lookup on a variable that was not evaluated
    pub fn variable_not_evaluated(variable: impl Into<String>) -> Self {
        Self::VariableNotEvaluated {
            variable: variable.into(),
        }
    }

    /// Create a test execution error
    pub fn test_execution(
        variable: impl Into<String>,
        test: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::TestExecution {
            variable: variable.into(),
            test: test.into(),
            reason: reason.into(),
        }
    }

    /// True for errors the engine records against one test and moves past
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MissingDependency { .. }
                | Self::MissingVariable { .. }
                | Self::TestExecution { .. }
        )
    }

    /// True when the test was not attempted at all (as opposed to failing)
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Self::MissingDependency { .. } | Self::MissingVariable { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, QcError>;
