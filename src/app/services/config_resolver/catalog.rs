//! Named QC configurations available for resolution
//!
//! The crate ships the `cotede`, `gtspp`, `argo` and `eurogoos` procedures.
//! Further configurations can be read from a directory of `*.json` files,
//! each named after its file stem, or registered in memory. User entries
//! shadow built-ins of the same name.

use super::resolver::{self, ConfigSpec, ResolvedConfig};
use crate::config::QcSettings;
use crate::constants::{DEFAULT_CONFIG_NAME, QC_CONFIG_SUBDIR, USER_CONFIG_DIR_NAME};
use crate::{QcError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const BUILTIN_CONFIGS: &[(&str, &str)] = &[
    ("argo", include_str!("../../../qc_cfg/argo.json")),
    ("cotede", include_str!("../../../qc_cfg/cotede.json")),
    ("eurogoos", include_str!("../../../qc_cfg/eurogoos.json")),
    ("gtspp", include_str!("../../../qc_cfg/gtspp.json")),
];

#[derive(Debug, Clone)]
enum CatalogEntry {
    /// Bundled JSON source, parsed on use
    Builtin(&'static str),
    User(Value),
}

#[derive(Debug, Clone)]
pub struct ConfigCatalog {
    entries: BTreeMap<String, CatalogEntry>,
    default_name: String,
}

impl ConfigCatalog {
    /// Catalog of the configurations bundled with the crate
    pub fn builtin() -> Self {
        let entries = BUILTIN_CONFIGS
            .iter()
            .map(|&(name, source)| (name.to_string(), CatalogEntry::Builtin(source)))
            .collect();

        Self {
            entries,
            default_name: DEFAULT_CONFIG_NAME.to_string(),
        }
    }

    /// Built-ins plus the standard user directory, when it exists
    pub fn discover() -> Result<Self> {
        match Self::user_config_dir() {
            Some(dir) => Self::builtin().with_user_dir(&dir),
            None => Ok(Self::builtin()),
        }
    }

    pub fn from_settings(settings: &QcSettings) -> Result<Self> {
        let mut catalog = Self::builtin().with_default_name(settings.default_config.clone());

        if settings.load_user_configs {
            if let Some(dir) = settings
                .user_config_dir
                .clone()
                .or_else(Self::user_config_dir)
            {
                catalog = catalog.with_user_dir(&dir)?;
            }
        }

        Ok(catalog)
    }

    /// Standard location of user configurations
    pub fn user_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(USER_CONFIG_DIR_NAME).join(QC_CONFIG_SUBDIR))
    }

    /// Register an in-memory configuration
    pub fn with_entry(mut self, name: impl Into<String>, config: Value) -> Self {
        self.entries.insert(name.into(), CatalogEntry::User(config));
        self
    }

    /// Name resolved for [`ConfigSpec::Default`]
    pub fn with_default_name(mut self, name: impl Into<String>) -> Self {
        self.default_name = name.into();
        self
    }

    /// Load every `*.json` file in `dir`; a missing directory adds nothing
    pub fn with_user_dir(mut self, dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            debug!("No user configuration directory at {}", dir.display());
            return Ok(self);
        }

        let pattern = dir.join("*.json");
        let paths = glob::glob(&pattern.to_string_lossy()).map_err(|e| {
            QcError::configuration(format!("invalid configuration directory pattern: {e}"))
        })?;

        let mut loaded = 0;
        for path in paths {
            let path = path.map_err(|e| QcError::Io(e.into()))?;
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let content = std::fs::read_to_string(&path)?;
            let config: Value = serde_json::from_str(&content)?;

            if self.entries.contains_key(name) {
                debug!("User configuration '{}' shadows an existing entry", name);
            }
            self.entries
                .insert(name.to_string(), CatalogEntry::User(config));
            loaded += 1;
        }

        info!(
            "Loaded {} user configuration(s) from {}",
            loaded,
            dir.display()
        );
        Ok(self)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Raw, unresolved configuration registered under `name`
    pub fn get(&self, name: &str) -> Result<Value> {
        match self.entries.get(name) {
            Some(CatalogEntry::Builtin(source)) => Ok(serde_json::from_str(source)?),
            Some(CatalogEntry::User(config)) => Ok(config.clone()),
            None => Err(QcError::configuration_not_found(name)),
        }
    }

    /// Resolve a configuration, following its inheritance chain
    pub fn resolve(&self, spec: impl Into<ConfigSpec>) -> Result<ResolvedConfig> {
        resolver::resolve(self, &spec.into())
    }
}

impl Default for ConfigCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Resolve `spec` against the built-in catalog
pub fn load_config(spec: impl Into<ConfigSpec>) -> Result<ResolvedConfig> {
    ConfigCatalog::builtin().resolve(spec)
}
