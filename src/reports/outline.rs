//! Nested outline JSON for tree widgets.

use super::{ReportError, ReportFormat, ReportGenerator};
use crate::hierarchy::{to_outline, OutlineNode};
use crate::model::{NodeId, TreeNode};
use crate::pipeline::HierarchyOutcome;

/// Outline reporter
#[derive(Debug, Clone, Copy, Default)]
pub struct OutlineReporter;

impl OutlineReporter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReportGenerator for OutlineReporter {
    /// One outline node per child; expandable children get an empty list.
    fn generate_expansion_report(
        &self,
        _node: &NodeId,
        children: &[TreeNode],
    ) -> Result<String, ReportError> {
        let nodes: Vec<OutlineNode> = children
            .iter()
            .map(|child| OutlineNode {
                id: Some(child.id.encode()),
                text: child.label.clone(),
                count: None,
                children: Vec::new(),
            })
            .collect();
        let mut json = serde_json::to_string_pretty(&nodes)?;
        json.push('\n');
        Ok(json)
    }

    fn generate_hierarchy_report(&self, outcome: &HierarchyOutcome) -> Result<String, ReportError> {
        let outline = if outcome.hierarchy.is_fallback() {
            outcome.hierarchy.clone().with_outline().outline
        } else {
            Some(to_outline(&outcome.tree))
        };
        let mut json = serde_json::to_string_pretty(&outline.into_iter().collect::<Vec<_>>())?;
        json.push('\n');
        Ok(json)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Outline
    }
}
