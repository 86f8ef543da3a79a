pub mod analyzer_config;
pub mod loader;

// Re-export commonly used types
pub use analyzer_config::{AnalyzerConfig, PartialAnalyzerConfig};
pub use loader::ConfigLoader;

// Re-export constants
pub use analyzer_config::{
    DEFAULT_MAX_DECORATION_DEPTH, ENV_LIFECYCLE_POLICY, ENV_MAX_DECORATION_DEPTH,
};
