//! Component assembly data: flat occurrence edges and the materialized tree.

use serde::{Deserialize, Serialize};

/// One edge of the component-assembly graph as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceRecord {
    pub child_id: String,
    pub child_name: String,
    /// `None` means "directly under the queried root"
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl OccurrenceRecord {
    pub fn new(
        parent_id: Option<&str>,
        child_id: impl Into<String>,
        child_name: impl Into<String>,
    ) -> Self {
        Self {
            child_id: child_id.into(),
            child_name: child_name.into(),
            parent_id: parent_id.map(str::to_string),
        }
    }
}

/// A node of the materialized assembly tree.
///
/// The tree owns its children, so a built `ComponentNode` can never contain a
/// cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentNode {
    pub id: String,
    pub name: String,
    /// Number of occurrence records that placed this component under its parent
    pub instances: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ComponentNode>,
}

impl ComponentNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            instances: 1,
            children: Vec::new(),
        }
    }

    /// Total node count including `self`.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// A root is never empty; provided for clippy's `len_without_is_empty`.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Depth of the deepest descendant (0 for a lone root).
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            stack.extend(node.children.iter().map(|c| (c, depth + 1)));
        }
        max
    }

    /// Find a descendant (or self) by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Self> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter());
        }
        None
    }

    /// Names of the direct children, in order.
    #[must_use]
    pub fn child_names(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.name.as_str()).collect()
    }
}
