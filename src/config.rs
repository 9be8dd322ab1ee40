//! Engine settings.
//!
//! Settings choose the default QC procedure, the worker count for
//! concurrent evaluation, and where user configurations are read from.
//! They are independent of the QC configurations themselves.

use crate::{QcError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QcSettings {
    /// Configuration resolved when the caller does not name one
    pub default_config: String,

    /// Concurrent (variable, test) evaluations
    pub workers: usize,

    /// User configuration directory, overriding the platform location
    pub user_config_dir: Option<PathBuf>,

    /// Read user configuration files at all
    pub load_user_configs: bool,
}

impl Default for QcSettings {
    fn default() -> Self {
        Self {
            default_config: crate::constants::DEFAULT_CONFIG_NAME.to_string(),
            workers: num_cpus::get(),
            user_config_dir: None,
            load_user_configs: true,
        }
    }
}

impl QcSettings {
    /// Load settings from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        debug!("Loading settings from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(QcError::configuration("workers must be at least 1"));
        }
        if self.default_config.is_empty() {
            return Err(QcError::configuration("default_config must name a configuration"));
        }
        Ok(())
    }

    pub fn with_default_config(mut self, name: impl Into<String>) -> Self {
        self.default_config = name.into();
        self
    }

    /// Create settings with custom worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_user_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.user_config_dir = Some(dir.into());
        self
    }

    pub fn with_load_user_configs(mut self, load: bool) -> Self {
        self.load_user_configs = load;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = QcSettings::default();
        assert_eq!(settings.default_config, "cotede");
        assert!(settings.workers >= 1);
        assert!(settings.user_config_dir.is_none());
        assert!(settings.load_user_configs);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let settings = QcSettings::default()
            .with_default_config("argo")
            .with_workers(2)
            .with_user_config_dir("/tmp/qc")
            .with_load_user_configs(false);

        assert_eq!(settings.default_config, "argo");
        assert_eq!(settings.workers, 2);
        assert_eq!(settings.user_config_dir, Some(PathBuf::from("/tmp/qc")));
        assert!(!settings.load_user_configs);
    }

    #[test]
    fn test_from_json_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{"default_config": "gtspp", "workers": 3}"#).unwrap();

        let settings = QcSettings::from_json_file(&path).unwrap();
        assert_eq!(settings.default_config, "gtspp");
        assert_eq!(settings.workers, 3);
        assert!(settings.load_user_configs);
    }

    #[test]
    fn test_from_json_file_rejects_zero_workers() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{"workers": 0}"#).unwrap();

        assert!(matches!(
            QcSettings::from_json_file(&path),
            Err(QcError::Configuration { .. })
        ));
    }
}
