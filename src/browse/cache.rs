//! Memo of already expanded nodes for interactive browsing.

use super::expander::TreeExpander;
use crate::error::Result;
use crate::model::{NodeId, TreeNode};
use crate::provider::{HierarchyProvider, RequestContext};
use std::collections::HashMap;

/// Children fetched so far, keyed by the expanded node.
///
/// Lives for one browsing session; nothing is persisted.
#[derive(Debug, Default)]
pub struct ExpansionCache {
    entries: HashMap<NodeId, Vec<TreeNode>>,
}

impl ExpansionCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, node: &NodeId) -> Option<&[TreeNode]> {
        self.entries.get(node).map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_loaded(&self, node: &NodeId) -> bool {
        self.entries.contains_key(node)
    }

    /// Children of `node`, expanding through the provider on first access.
    pub fn get_or_expand<P: HierarchyProvider + ?Sized>(
        &mut self,
        expander: &TreeExpander<'_, P>,
        ctx: &RequestContext,
        node: &NodeId,
    ) -> Result<&[TreeNode]> {
        if !self.entries.contains_key(node) {
            let children = expander.children(ctx, node)?;
            self.entries.insert(node.clone(), children);
        }
        Ok(self.get(node).unwrap_or_default())
    }

    /// Forget `node` so the next access fetches it again.
    pub fn invalidate(&mut self, node: &NodeId) {
        self.entries.remove(node);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
