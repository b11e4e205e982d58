//! Configuration types for model-hierarchy.

use super::defaults::{
    DEFAULT_BASE_URL, DEFAULT_DATA_PATH, DEFAULT_MANUFACTURING_PATH, DEFAULT_MAX_RETRIES,
    DEFAULT_TIMEOUT_SECS,
};
use crate::hierarchy::{OrphanPolicy, DEFAULT_MAX_PAGES};
use crate::pipeline::{HierarchyOptions, ResolutionPolicy};
use crate::reports::ReportFormat;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Unified application configuration that can be loaded from CLI args or config files.
///
/// CLI arguments override file settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// Remote provider connection settings
    pub provider: ProviderConfig,
    /// Cursor pagination limits
    pub pagination: PaginationConfig,
    /// Orphan and name-resolution policies
    pub policy: PolicyConfig,
    /// Output configuration (format, file)
    pub output: OutputConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AppConfig` builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Options for the hierarchy pipeline.
    #[must_use]
    pub const fn hierarchy_options(&self) -> HierarchyOptions {
        HierarchyOptions {
            max_pages: self.pagination.max_pages,
            orphans: self.policy.orphans,
            resolution: self.policy.resolution,
        }
    }
}

// ============================================================================
// Builder for AppConfig
// ============================================================================

/// Builder for constructing `AppConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Set the provider base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.provider.base_url = url.into();
        self
    }

    /// Serve data from an offline fixture instead of the remote API.
    pub fn fixture(mut self, path: Option<PathBuf>) -> Self {
        self.config.provider.fixture = path;
        self
    }

    /// Set the per-request timeout in seconds.
    pub const fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.provider.timeout_secs = secs;
        self
    }

    /// Set the overall deadline for one command, in seconds.
    pub const fn deadline_secs(mut self, secs: Option<u64>) -> Self {
        self.config.pagination.deadline_secs = secs;
        self
    }

    /// Set the page cap for cursor loops.
    pub const fn max_pages(mut self, max_pages: usize) -> Self {
        self.config.pagination.max_pages = max_pages;
        self
    }

    /// Set the orphan policy.
    pub const fn orphans(mut self, policy: OrphanPolicy) -> Self {
        self.config.policy.orphans = policy;
        self
    }

    /// Set the name resolution policy.
    pub const fn resolution(mut self, policy: ResolutionPolicy) -> Self {
        self.config.policy.resolution = policy;
        self
    }

    /// Set the output format.
    pub const fn output_format(mut self, format: ReportFormat) -> Self {
        self.config.output.format = format;
        self
    }

    /// Set the output file.
    pub fn output_file(mut self, file: Option<PathBuf>) -> Self {
        self.config.output.file = file;
        self
    }

    /// Build the `AppConfig`.
    #[must_use]
    pub fn build(self) -> AppConfig {
        self.config
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Remote provider connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ProviderConfig {
    /// Scheme and host of the API
    pub base_url: String,
    /// Path of the data GraphQL endpoint
    pub data_path: String,
    /// Path of the manufacturing GraphQL endpoint
    pub manufacturing_path: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retries after a transport failure
    pub max_retries: u8,
    /// Offline fixture document to serve instead of the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixture: Option<PathBuf>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            data_path: DEFAULT_DATA_PATH.to_string(),
            manufacturing_path: DEFAULT_MANUFACTURING_PATH.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            fixture: None,
        }
    }
}

impl ProviderConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Client settings for the GraphQL provider.
    #[cfg(feature = "graphql")]
    #[must_use]
    pub fn graphql_config(&self) -> crate::provider::GraphQlConfig {
        crate::provider::GraphQlConfig {
            base_url: self.base_url.clone(),
            data_path: self.data_path.clone(),
            manufacturing_path: self.manufacturing_path.clone(),
            timeout: self.timeout(),
            max_retries: self.max_retries,
        }
    }
}

/// Cursor pagination limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PaginationConfig {
    /// Maximum pages one cursor loop may fetch
    pub max_pages: usize,
    /// Overall deadline for one command in seconds (unbounded when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_secs: Option<u64>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            deadline_secs: None,
        }
    }
}

impl PaginationConfig {
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

/// Orphan and name-resolution policies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PolicyConfig {
    /// Occurrences whose parent never appears: drop or fail
    pub orphans: OrphanPolicy,
    /// Names matching several projects or components: first-match or unique
    pub resolution: ResolutionPolicy,
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: ReportFormat,
    /// Output file path (None for stdout)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}
