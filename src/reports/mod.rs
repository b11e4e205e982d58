//! Output formats for command results.
//!
//! Two kinds of result are reported:
//! - one level of lazy expansion (a node id and its children)
//! - a component hierarchy (resolved id, indented text, built tree)
//!
//! Formats:
//! - Text: indented hierarchy text, or tab-separated node rows
//! - JSON: the wire shapes tree widgets and HTTP callers consume
//! - Outline: nested `{id, text, children}` JSON

mod json;
mod outline;
mod text;
mod types;

pub use json::JsonReporter;
pub use outline::OutlineReporter;
pub use text::TextReporter;
pub use types::ReportFormat;

use crate::model::{NodeId, TreeNode};
use crate::pipeline::HierarchyOutcome;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Report one level of expansion below `node`.
    fn generate_expansion_report(
        &self,
        node: &NodeId,
        children: &[TreeNode],
    ) -> Result<String, ReportError>;

    /// Report a component hierarchy.
    fn generate_hierarchy_report(&self, outcome: &HierarchyOutcome) -> Result<String, ReportError>;

    /// Write a hierarchy report to a writer
    fn write_hierarchy_report(
        &self,
        outcome: &HierarchyOutcome,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let report = self.generate_hierarchy_report(outcome)?;
        writer.write_all(report.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format.
///
/// `Auto` must be resolved by the caller; it falls back to text here.
#[must_use]
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Json => Box::new(JsonReporter::new()),
        ReportFormat::Outline => Box::new(OutlineReporter::new()),
        ReportFormat::Text | ReportFormat::Auto => Box::new(TextReporter::new()),
    }
}
