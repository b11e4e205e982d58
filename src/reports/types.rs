//! Report type definitions.

use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Auto-detect: text on a terminal, JSON otherwise
    #[default]
    Auto,
    /// Indented hierarchy text or tab-separated node rows
    Text,
    /// Structured JSON output
    Json,
    /// Nested outline JSON for tree widgets
    Outline,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Outline => write!(f, "outline"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_serde() {
        for format in [
            ReportFormat::Auto,
            ReportFormat::Text,
            ReportFormat::Json,
            ReportFormat::Outline,
        ] {
            let json = serde_json::to_string(&format).unwrap();
            assert_eq!(json, format!("\"{format}\""));
        }
    }
}
