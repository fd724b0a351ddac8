//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::EngineConfig;

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml   # Rules, reconciliation tolerances, input layout
/// └── roster.yaml   # Employee roster (loaded by YamlRoster)
/// ```
///
/// # Example
///
/// ```no_run
/// use job_cost_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Overtime after {}h", loader.config().rules.weekly_overtime_threshold_hours);
/// # Ok::<(), job_cost_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns `ConfigNotFound` if `engine.yaml` is missing and
    /// `ConfigParseError` if it is not valid YAML for [`EngineConfig`].
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let engine_path = path.as_ref().join("engine.yaml");
        let config = load_yaml::<EngineConfig>(&engine_path)?;
        Ok(Self { config })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}

/// Loads and parses a YAML file.
pub(crate) fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
    let path_str = path.display().to_string();

    let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
        path: path_str.clone(),
    })?;

    serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
        path: path_str,
        message: e.to_string(),
    })
}
