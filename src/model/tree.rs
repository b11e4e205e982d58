//! Nodes returned by one level of lazy tree expansion.

use super::node_id::{NodeId, NodeKind};
use serde::{Deserialize, Serialize};

/// One child row for a lazily expanded tree widget.
///
/// Serializes to the shape jsTree-style widgets consume:
/// `{"id", "parent", "text", "type", "children"}` where `children` is the
/// "can be expanded" flag rather than a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub parent: NodeId,
    #[serde(rename = "text")]
    pub label: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(rename = "children")]
    pub has_children: bool,
}

impl TreeNode {
    /// Create a node; `has_children` is derived from the kind.
    ///
    /// Items are the only leaves of the browse hierarchy.
    pub fn new(id: NodeId, parent: NodeId, label: impl Into<String>) -> Self {
        debug_assert!(!id.is_root(), "the root is never a child row");
        let kind = id.kind().unwrap_or(NodeKind::Hub);
        Self {
            has_children: kind != NodeKind::Item,
            id,
            parent,
            label: label.into(),
            kind,
        }
    }
}
