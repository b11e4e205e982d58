//! Plain text reports.

use super::{ReportError, ReportFormat, ReportGenerator};
use crate::hierarchy::{repeated_parts, INDENT_WIDTH};
use crate::model::{NodeId, TreeNode};
use crate::pipeline::HierarchyOutcome;
use std::fmt::Write;

/// Text reporter: hierarchy text verbatim, node rows tab-separated.
///
/// Parts placed more than once are listed after the hierarchy text under a
/// `Repeated occurrences:` heading; the name lines above it are unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReporter;

impl TextReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportGenerator for TextReporter {
    fn generate_expansion_report(
        &self,
        _node: &NodeId,
        children: &[TreeNode],
    ) -> Result<String, ReportError> {
        let mut out = String::new();
        for child in children {
            let marker = if child.has_children { "+" } else { "-" };
            writeln!(out, "{marker}\t{}\t{}\t{}", child.kind, child.id, child.label)
                .map_err(|e| ReportError::SerializationError(e.to_string()))?;
        }
        Ok(out)
    }

    fn generate_hierarchy_report(&self, outcome: &HierarchyOutcome) -> Result<String, ReportError> {
        let mut out = outcome.hierarchy.hierarchy_text.clone();
        let repeated = repeated_parts(&outcome.tree);
        if repeated.is_empty() {
            return Ok(out);
        }
        out.push_str("\nRepeated occurrences:\n");
        let indent = " ".repeat(INDENT_WIDTH);
        for (path, count) in repeated {
            writeln!(out, "{indent}{path} x{count}")
                .map_err(|e| ReportError::SerializationError(e.to_string()))?;
        }
        Ok(out)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Text
    }
}
