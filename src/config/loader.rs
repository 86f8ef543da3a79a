use std::{collections::HashMap, env, fs, path::Path};

use crate::errors::ConfigError;

use super::analyzer_config::{AnalyzerConfig, ENV_PREFIX, PartialAnalyzerConfig};

/// Loads analyzer settings from an optional TOML file and the environment.
pub struct ConfigLoader {
    env_override: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Create a loader reading the process environment
    pub fn new() -> Self {
        Self { env_override: None }
    }

    /// Create a loader with a fixed set of variables instead of the process
    /// environment (for testing)
    pub fn with_env(env_map: HashMap<String, String>) -> Self {
        Self {
            env_override: Some(env_map),
        }
    }

    /// Load settings. A missing file falls back to defaults.
    pub fn load_config(&self, path: Option<&Path>) -> Result<AnalyzerConfig, ConfigError> {
        let partial = match path {
            Some(path) => self.load_partial_config(path)?,
            None => None,
        };
        let env_map = self.collect_env_vars();
        AnalyzerConfig::from_partial_and_env(partial, &env_map)
    }

    /// Read the partial settings file, if it exists
    fn load_partial_config(
        &self,
        path: &Path,
    ) -> Result<Option<PartialAnalyzerConfig>, ConfigError> {
        if !path.exists() {
            tracing::info!("Analyzer settings file {:?} not found, using defaults", path);
            return Ok(None);
        }

        let display = path.display().to_string();
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::FileRead(display.clone(), e))?;
        let partial = toml::from_str(&content).map_err(|e| ConfigError::TomlParse(display, e))?;
        tracing::info!("Loaded analyzer settings from {:?}", path);
        Ok(Some(partial))
    }

    /// Collect the variables relevant to the analyzer
    fn collect_env_vars(&self) -> HashMap<String, String> {
        match &self.env_override {
            Some(env_map) => env_map.clone(),
            None => env::vars().filter(|(key, _)| key.starts_with(ENV_PREFIX)).collect(),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
