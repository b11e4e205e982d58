//! JSON report generator.

use super::{ReportError, ReportFormat, ReportGenerator};
use crate::model::{NodeId, TreeNode};
use crate::pipeline::HierarchyOutcome;
use serde::Serialize;

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<String, ReportError> {
        let mut json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        json.push('\n');
        Ok(json)
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    /// The children array exactly as tree widgets request it.
    fn generate_expansion_report(
        &self,
        _node: &NodeId,
        children: &[TreeNode],
    ) -> Result<String, ReportError> {
        self.to_json(&children)
    }

    /// `{componentVersionId, hierarchyText}`
    fn generate_hierarchy_report(&self, outcome: &HierarchyOutcome) -> Result<String, ReportError> {
        self.to_json(&outcome.hierarchy)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}
