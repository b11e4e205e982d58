//! Configuration module for model-hierarchy.
//!
//! This module provides the configuration system:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use model_hierarchy::config::{AppConfig, ConfigPreset};
//!
//! let config = AppConfig::from_preset(ConfigPreset::Strict);
//!
//! let overrides = AppConfig::builder().max_pages(50).build();
//! let (config, loaded_from) = AppConfig::from_file_with_overrides(None, &overrides);
//! ```
//!
//! # Configuration File
//!
//! Place a `.model-hierarchy.yaml` file in your project root or
//! `~/.config/model-hierarchy/`:
//!
//! ```yaml
//! pagination:
//!   max_pages: 200
//! policy:
//!   orphans: fail
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    ConfigPreset, DEFAULT_BASE_URL, DEFAULT_DATA_PATH, DEFAULT_MANUFACTURING_PATH,
    DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS,
};
pub use types::{
    AppConfig, AppConfigBuilder, OutputConfig, PaginationConfig, PolicyConfig, ProviderConfig,
};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, generate_full_example_config, load_config_file,
    load_or_default, user_config_dir, ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use it to validate `.model-hierarchy.yaml` files.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
}
