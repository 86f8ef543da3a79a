use serde::Deserialize;
use std::{collections::HashMap, path::Path};

use super::loader::ConfigLoader;
use crate::errors::ConfigError;
use crate::lifecycle::LifecyclePolicy;

// Environment variable names
pub const ENV_PREFIX: &str = "CONFBIND_";
pub const ENV_MAX_DECORATION_DEPTH: &str = "CONFBIND_MAX_DECORATION_DEPTH";
pub const ENV_LIFECYCLE_POLICY: &str = "CONFBIND_LIFECYCLE_POLICY";

pub const DEFAULT_MAX_DECORATION_DEPTH: usize = 64;

/// Settings of the analyzer itself (not of the configuration types it inspects).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Maximum number of decoration layers a deep strip removes before giving
    /// up. `None` disables the guard.
    pub max_decoration_depth: Option<usize>,
    pub lifecycle_policy: LifecyclePolicy,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_decoration_depth: Some(DEFAULT_MAX_DECORATION_DEPTH),
            lifecycle_policy: LifecyclePolicy::default(),
        }
    }
}

/// Analyzer settings as read from a file; every key is optional.
#[derive(Deserialize, Debug, Default)]
pub struct PartialAnalyzerConfig {
    max_decoration_depth: Option<usize>,
    lifecycle_policy: Option<LifecyclePolicy>,
}

/// Zero disables the depth guard.
fn depth_limit(depth: usize) -> Option<usize> {
    (depth > 0).then_some(depth)
}

impl AnalyzerConfig {
    /// Load settings from a TOML file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        ConfigLoader::new().load_config(Some(path))
    }

    /// Default settings with environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        ConfigLoader::new().load_config(None)
    }

    /// Parse settings from a TOML document. The environment is not consulted.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let partial: PartialAnalyzerConfig = toml::from_str(content)
            .map_err(|e| ConfigError::TomlParse("<string>".to_string(), e))?;
        Self::from_partial_and_env(Some(partial), &HashMap::new())
    }

    /// Resolve file settings and environment overrides; the environment wins.
    pub fn from_partial_and_env(
        partial: Option<PartialAnalyzerConfig>,
        env_map: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();
        let mut config = AnalyzerConfig::default();

        if let Some(depth) = partial.max_decoration_depth {
            config.max_decoration_depth = depth_limit(depth);
        }
        if let Some(policy) = partial.lifecycle_policy {
            config.lifecycle_policy = policy;
        }

        if let Some(value) = env_map.get(ENV_MAX_DECORATION_DEPTH) {
            config.max_decoration_depth = match value.trim().to_ascii_lowercase().as_str() {
                "none" | "off" | "unbounded" => None,
                other => other
                    .parse::<usize>()
                    .map(depth_limit)
                    .map_err(|_| ConfigError::InvalidEnv {
                        key: ENV_MAX_DECORATION_DEPTH.to_string(),
                        value: value.clone(),
                    })?,
            };
        }
        if let Some(value) = env_map.get(ENV_LIFECYCLE_POLICY) {
            config.lifecycle_policy =
                value
                    .parse::<LifecyclePolicy>()
                    .map_err(|_| ConfigError::InvalidEnv {
                        key: ENV_LIFECYCLE_POLICY.to_string(),
                        value: value.clone(),
                    })?;
        }

        Ok(config)
    }
}
