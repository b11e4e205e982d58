//! Configuration validation for model-hierarchy.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{AppConfig, OutputConfig, PaginationConfig, PolicyConfig, ProviderConfig};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.provider.validate());
        errors.extend(self.pagination.validate());
        errors.extend(self.policy.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for ProviderConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !(self.base_url.starts_with("https://") || self.base_url.starts_with("http://")) {
            errors.push(ConfigError::new(
                "provider.base_url",
                format!("Must start with http:// or https://, got '{}'", self.base_url),
            ));
        }
        for (field, path) in [
            ("provider.data_path", &self.data_path),
            ("provider.manufacturing_path", &self.manufacturing_path),
        ] {
            if !path.starts_with('/') {
                errors.push(ConfigError::new(
                    field,
                    format!("Endpoint path must start with '/', got '{path}'"),
                ));
            }
        }
        if self.timeout_secs == 0 {
            errors.push(ConfigError::new(
                "provider.timeout_secs",
                "Timeout must be at least 1 second",
            ));
        }
        if self.max_retries > 10 {
            errors.push(ConfigError::new(
                "provider.max_retries",
                format!("At most 10 retries are allowed, got {}", self.max_retries),
            ));
        }
        if let Some(ref fixture) = self.fixture {
            if !fixture.exists() {
                errors.push(ConfigError::new(
                    "provider.fixture",
                    format!("Fixture file does not exist: {}", fixture.display()),
                ));
            }
        }

        errors
    }
}

impl Validatable for PaginationConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.max_pages == 0 {
            errors.push(ConfigError::new(
                "pagination.max_pages",
                "At least one page must be allowed",
            ));
        }
        if self.deadline_secs == Some(0) {
            errors.push(ConfigError::new(
                "pagination.deadline_secs",
                "Deadline must be at least 1 second (omit it for no deadline)",
            ));
        }
        errors
    }
}

impl Validatable for PolicyConfig {
    fn validate(&self) -> Vec<ConfigError> {
        // Both policies are closed enums
        Vec::new()
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let Some(ref file_path) = self.file {
            if let Some(parent) = file_path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    errors.push(ConfigError::new(
                        "output.file",
                        format!("Parent directory does not exist: {}", parent.display()),
                    ));
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().is_valid());
    }

    #[test]
    fn test_provider_validation() {
        let config = ProviderConfig {
            base_url: "ftp://example.com".into(),
            data_path: "graphql".into(),
            timeout_secs: 0,
            max_retries: 11,
            ..ProviderConfig::default()
        };
        let fields: Vec<String> = config.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "provider.base_url",
                "provider.data_path",
                "provider.timeout_secs",
                "provider.max_retries"
            ]
        );
    }

    #[test]
    fn test_missing_fixture_is_reported() {
        let config = ProviderConfig {
            fixture: Some(PathBuf::from("/nonexistent/fixture.json")),
            ..ProviderConfig::default()
        };
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn test_pagination_validation() {
        let config = PaginationConfig {
            max_pages: 0,
            deadline_secs: Some(0),
        };
        assert_eq!(config.validate().len(), 2);
        assert!(PaginationConfig::default().is_valid());
    }

    #[test]
    fn test_output_parent_directory() {
        let config = OutputConfig {
            file: Some(PathBuf::from("/nonexistent/dir/out.json")),
            ..OutputConfig::default()
        };
        assert!(!config.is_valid());

        let relative = OutputConfig {
            file: Some(PathBuf::from("out.json")),
            ..OutputConfig::default()
        };
        assert!(relative.is_valid());
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::new("pagination.max_pages", "too small");
        assert_eq!(err.to_string(), "pagination.max_pages: too small");
    }

    #[test]
    fn test_app_config_collects_sections() {
        let mut config = AppConfig::default();
        config.pagination.max_pages = 0;
        config.provider.timeout_secs = 0;
        assert_eq!(config.validate().len(), 2);
    }
}
