//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::defaults::{
    DEFAULT_BASE_URL, DEFAULT_DATA_PATH, DEFAULT_MANUFACTURING_PATH, DEFAULT_MAX_RETRIES,
    DEFAULT_TIMEOUT_SECS,
};
use super::types::AppConfig;
use crate::hierarchy::{OrphanPolicy, DEFAULT_MAX_PAGES};
use crate::pipeline::ResolutionPolicy;
use crate::reports::ReportFormat;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Directory name under the user config directory.
pub const CONFIG_DIR_NAME: &str = "model-hierarchy";

/// Standard config file names to search for.
const CONFIG_FILE_NAMES: &[&str] = &[
    ".model-hierarchy.yaml",
    ".model-hierarchy.yml",
    "model-hierarchy.yaml",
    "model-hierarchy.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. Git repository root (if in a repo)
/// 4. User config directory (~/.config/model-hierarchy/)
/// 5. Home directory
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if let Some(path) = find_config_in_dir(&cwd) {
            return Some(path);
        }
    }

    if let Some(path) = find_git_root().and_then(|root| find_config_in_dir(&root)) {
        return Some(path);
    }

    if let Some(path) = user_config_dir().and_then(|dir| find_config_in_dir(&dir)) {
        return Some(path);
    }

    dirs::home_dir().and_then(|home| find_config_in_dir(&home))
}

/// The per-user configuration directory, when the platform has one.
#[must_use]
pub fn user_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

/// Find the git repository root by walking up the directory tree.
fn find_git_root() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();

    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "Config file not found: {}", path.display()),
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AppConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AppConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    // An empty file deserializes to unit, not a mapping
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    Ok(serde_yaml::from_str(&content)?)
}

/// Load config from discovered file, or return default.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    discover_config_file(explicit_path).map_or_else(
        || (AppConfig::default(), None),
        |path| match load_config_file(&path) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (AppConfig::default(), None)
            }
        },
    )
}

// ============================================================================
// Configuration Merging
// ============================================================================

impl AppConfig {
    /// Merge another config into this one, with `other` taking precedence.
    ///
    /// Only values that differ from the defaults override, so a config built
    /// from CLI flags can be layered over a file config.
    pub fn merge(&mut self, other: &Self) {
        // Provider
        if other.provider.base_url != DEFAULT_BASE_URL {
            self.provider.base_url.clone_from(&other.provider.base_url);
        }
        if other.provider.data_path != DEFAULT_DATA_PATH {
            self.provider.data_path.clone_from(&other.provider.data_path);
        }
        if other.provider.manufacturing_path != DEFAULT_MANUFACTURING_PATH {
            self.provider
                .manufacturing_path
                .clone_from(&other.provider.manufacturing_path);
        }
        if other.provider.timeout_secs != DEFAULT_TIMEOUT_SECS {
            self.provider.timeout_secs = other.provider.timeout_secs;
        }
        if other.provider.max_retries != DEFAULT_MAX_RETRIES {
            self.provider.max_retries = other.provider.max_retries;
        }
        if other.provider.fixture.is_some() {
            self.provider.fixture.clone_from(&other.provider.fixture);
        }

        // Pagination
        if other.pagination.max_pages != DEFAULT_MAX_PAGES {
            self.pagination.max_pages = other.pagination.max_pages;
        }
        if other.pagination.deadline_secs.is_some() {
            self.pagination.deadline_secs = other.pagination.deadline_secs;
        }

        // Policy
        if other.policy.orphans != OrphanPolicy::default() {
            self.policy.orphans = other.policy.orphans;
        }
        if other.policy.resolution != ResolutionPolicy::default() {
            self.policy.resolution = other.policy.resolution;
        }

        // Output - only override if explicitly set
        if other.output.format != ReportFormat::Auto {
            self.output.format = other.output.format;
        }
        if other.output.file.is_some() {
            self.output.file.clone_from(&other.output.file);
        }
    }

    /// Load from file and merge with CLI overrides.
    #[must_use]
    pub fn from_file_with_overrides(
        config_path: Option<&Path>,
        cli_overrides: &Self,
    ) -> (Self, Option<PathBuf>) {
        let (mut config, loaded_from) = load_or_default(config_path);
        config.merge(cli_overrides);
        (config, loaded_from)
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AppConfig::default();
    format!(
        r"# model-hierarchy configuration
# Place this file at .model-hierarchy.yaml in your project root or ~/.config/model-hierarchy/

{}",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}

/// Generate a commented example config with all options.
#[must_use]
pub fn generate_full_example_config() -> String {
    r"# model-hierarchy configuration file
# ==================================
#
# Place it at:
#   - .model-hierarchy.yaml in your project root
#   - ~/.config/model-hierarchy/model-hierarchy.yaml for global config
#
# CLI arguments always override file settings. The access token is never
# read from this file; pass --token or set MODEL_HIERARCHY_TOKEN.

provider:
  base_url: https://developer.api.autodesk.com
  # Data endpoint (hubs, folders, items)
  data_path: /graphql
  # Manufacturing endpoint (projects, components, occurrences)
  manufacturing_path: /mfg/graphql
  # Per-request timeout in seconds
  timeout_secs: 30
  # Retries after a transport failure
  max_retries: 3
  # Serve data from an offline JSON fixture instead
  # fixture: ./fixture.json

pagination:
  # Maximum pages per cursor loop
  max_pages: 1000
  # Overall deadline per command in seconds
  # deadline_secs: 120

policy:
  # Occurrences whose parent never appears: drop, fail
  orphans: drop
  # Several projects/components with the same name: first-match, unique
  resolution: first-match

output:
  # Format: auto, text, json, outline
  format: auto
  # Output file path (omit for stdout)
  # file: hierarchy.json
"
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_find_config_in_dir() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(".model-hierarchy.yaml");
        std::fs::write(&config_path, "pagination:\n  max_pages: 10\n").unwrap();

        assert_eq!(find_config_in_dir(tmp.path()), Some(config_path));
    }

    #[test]
    fn test_find_config_prefers_dotfile() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("model-hierarchy.yml"), "").unwrap();
        std::fs::write(tmp.path().join(".model-hierarchy.yml"), "").unwrap();

        assert_eq!(
            find_config_in_dir(tmp.path()),
            Some(tmp.path().join(".model-hierarchy.yml"))
        );
    }

    #[test]
    fn test_find_config_in_dir_not_found() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_in_dir(tmp.path()), None);
    }

    #[test]
    fn test_load_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.yaml");
        let yaml = r"
provider:
  timeout_secs: 5
pagination:
  max_pages: 20
  deadline_secs: 60
policy:
  resolution: unique
output:
  format: outline
";
        std::fs::write(&config_path, yaml).unwrap();

        let config = load_config_file(&config_path).unwrap();
        assert_eq!(config.provider.timeout_secs, 5);
        assert_eq!(config.pagination.max_pages, 20);
        assert_eq!(config.pagination.deadline_secs, Some(60));
        assert_eq!(config.policy.resolution, ResolutionPolicy::Unique);
        assert_eq!(config.output.format, ReportFormat::Outline);
    }

    #[test]
    fn test_load_empty_config_file() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("empty.yaml");
        std::fs::write(&config_path, "\n").unwrap();
        assert_eq!(load_config_file(&config_path).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config_file(Path::new("/nonexistent/config.yaml"));
        assert!(matches!(result, Err(ConfigFileError::NotFound(_))));
    }

    #[test]
    fn test_load_config_file_parse_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("bad.yaml");
        std::fs::write(&config_path, "policy:\n  orphans: sometimes\n").unwrap();
        assert!(matches!(
            load_config_file(&config_path),
            Err(ConfigFileError::Parse(_))
        ));
    }

    #[test]
    fn test_config_merge() {
        let mut base = AppConfig::default();
        base.pagination.max_pages = 50;
        base.provider.timeout_secs = 10;

        let overrides = AppConfig::builder()
            .timeout_secs(3)
            .orphans(OrphanPolicy::Fail)
            .output_format(ReportFormat::Json)
            .build();
        base.merge(&overrides);

        // Untouched by the overrides
        assert_eq!(base.pagination.max_pages, 50);
        assert_eq!(base.provider.timeout_secs, 3);
        assert_eq!(base.policy.orphans, OrphanPolicy::Fail);
        assert_eq!(base.output.format, ReportFormat::Json);
    }

    #[test]
    fn test_generated_configs_parse() {
        let example = generate_example_config();
        assert!(example.contains("pagination:"));
        let parsed: AppConfig = serde_yaml::from_str(&example).unwrap();
        assert_eq!(parsed, AppConfig::default());

        let full: AppConfig = serde_yaml::from_str(&generate_full_example_config()).unwrap();
        assert_eq!(full, AppConfig::default());
    }

    #[test]
    fn test_discover_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("custom-config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "pagination:\n  max_pages: 3").unwrap();

        assert_eq!(discover_config_file(Some(&config_path)), Some(config_path));
    }
}
