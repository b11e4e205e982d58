//! State of the interactive tree browser.

use crate::browse::{ExpansionCache, TreeExpander};
use crate::error::Result;
use crate::model::{NodeId, NodeKind, TreeNode};
use crate::provider::{AccessToken, HierarchyProvider, RequestContext};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use std::collections::HashSet;
use std::time::Duration;
use tui_tree_widget::{TreeItem, TreeState};

/// Text of the row shown under a node whose children were never fetched.
pub const PLACEHOLDER_LABEL: &str = "(not loaded)";

/// Browser over the hub → project → folder → item tree.
///
/// Children are fetched when a node is first opened and kept in an
/// [`ExpansionCache`] for the rest of the session. Tree identifiers are the
/// encoded [`NodeId`]s.
pub struct BrowserApp<'a, P: HierarchyProvider + ?Sized> {
    expander: TreeExpander<'a, P>,
    provider_name: &'static str,
    token: AccessToken,
    expansion_timeout: Option<Duration>,
    cache: ExpansionCache,
    /// Widget state: selection and opened paths
    pub state: TreeState<String>,
    /// One-line message for the status bar
    pub status: Option<String>,
    pub should_quit: bool,
}

impl<'a, P: HierarchyProvider + ?Sized> BrowserApp<'a, P> {
    pub fn new(provider: &'a P, token: AccessToken) -> Self {
        Self {
            expander: TreeExpander::new(provider),
            provider_name: provider.name(),
            token,
            expansion_timeout: None,
            cache: ExpansionCache::new(),
            state: TreeState::default(),
            status: None,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.expander = self.expander.with_max_pages(max_pages);
        self
    }

    /// Deadline applied to each expansion separately.
    #[must_use]
    pub const fn with_expansion_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.expansion_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    /// Number of nodes whose children have been fetched.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.cache.len()
    }

    fn request_context(&self) -> RequestContext {
        let ctx = RequestContext::new(self.token.clone());
        match self.expansion_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }

    /// Fetch the hubs and select the first one.
    pub fn load_root(&mut self) -> Result<()> {
        let ctx = self.request_context();
        let hubs = self
            .cache
            .get_or_expand(&self.expander, &ctx, &NodeId::Root)?;
        let first = hubs.first().map(|hub| hub.id.encode());
        self.status = Some(format!("{} hubs", hubs.len()));
        if let Some(first) = first {
            self.state.select(vec![first]);
        }
        Ok(())
    }

    /// Widget items for everything fetched so far.
    #[must_use]
    pub fn items(&self) -> Vec<TreeItem<'static, String>> {
        self.children_items(&NodeId::Root)
    }

    fn children_items(&self, parent: &NodeId) -> Vec<TreeItem<'static, String>> {
        let Some(children) = self.cache.get(parent) else {
            return Vec::new();
        };
        // The widget rejects duplicate identifiers among siblings
        let mut seen = HashSet::new();
        children
            .iter()
            .filter(|child| seen.insert(child.id.encode()))
            .map(|child| self.item(child))
            .collect()
    }

    fn item(&self, node: &TreeNode) -> TreeItem<'static, String> {
        let id = node.id.encode();
        let text = node_line(node);
        if !node.has_children {
            return TreeItem::new_leaf(id, text);
        }

        let children = if self.cache.is_loaded(&node.id) {
            self.children_items(&node.id)
        } else {
            vec![TreeItem::new_leaf(
                String::new(),
                Line::styled(PLACEHOLDER_LABEL, Style::default().fg(Color::DarkGray)),
            )]
        };
        match TreeItem::new(id.clone(), text.clone(), children) {
            Ok(item) => item,
            Err(e) => {
                tracing::debug!("Cannot nest children of {id}: {e}");
                TreeItem::new_leaf(id, text)
            }
        }
    }

    /// The decoded id of the selected row; `None` on placeholders.
    #[must_use]
    pub fn selected_node(&self) -> Option<NodeId> {
        self.state
            .selected()
            .last()
            .and_then(|raw| NodeId::decode(raw).ok())
            .filter(|node| !node.is_root())
    }

    /// Fetch the selected node's children if needed, then open it.
    pub fn expand_selected(&mut self) {
        let path = self.state.selected().to_vec();
        let Some(node) = self.selected_node() else {
            return;
        };
        if node.kind() == Some(NodeKind::Item) {
            self.status = Some(format!("{node} has no children"));
            return;
        }
        if !self.cache.is_loaded(&node) {
            let ctx = self.request_context();
            match self.cache.get_or_expand(&self.expander, &ctx, &node) {
                Ok(children) => {
                    let count = children.len();
                    self.status = Some(format!("{node}: {count} children"));
                }
                Err(e) => {
                    tracing::warn!("Expansion of {node} failed: {e}");
                    self.status = Some(format!("Error: {e}"));
                    return;
                }
            }
        }
        self.state.open(path);
    }

    /// Close the selected node, or move to its parent when already closed.
    pub fn collapse_selected(&mut self) {
        self.state.key_left();
    }

    pub fn toggle_selected(&mut self) {
        let path = self.state.selected().to_vec();
        if self.state.opened().contains(&path) {
            self.state.close(&path);
        } else {
            self.expand_selected();
        }
    }

    /// Drop the selected node's cached children and fetch them again.
    ///
    /// With an item or nothing selected, the whole tree is reloaded.
    pub fn reload_selected(&mut self) {
        match self.selected_node() {
            Some(node) if node.kind() != Some(NodeKind::Item) => {
                self.cache.invalidate(&node);
                self.expand_selected();
            }
            _ => {
                self.cache.clear();
                self.state = TreeState::default();
                if let Err(e) = self.load_root() {
                    self.status = Some(format!("Error: {e}"));
                }
            }
        }
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}

fn kind_color(kind: NodeKind) -> Color {
    match kind {
        NodeKind::Hub => Color::Magenta,
        NodeKind::Project => Color::Cyan,
        NodeKind::Folder => Color::Yellow,
        NodeKind::Item => Color::Green,
    }
}

fn node_line(node: &TreeNode) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<8}", node.kind.tag()),
            Style::default().fg(kind_color(node.kind)),
        ),
        Span::raw(node.label.clone()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::FixtureProvider;

    fn fixture() -> FixtureProvider {
        FixtureProvider::from_json(
            r#"{
                "hubs": [{"id": "H1", "name": "Hub One"}],
                "projects": {"H1": [{"id": "P1", "name": "Alpha"}]},
                "projectItems": {"P1": [{"typeName": "DesignItem", "id": "I1", "name": "Bracket"}]}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_root_loads_with_placeholder() {
        let provider = fixture();
        let mut app = BrowserApp::new(&provider, AccessToken::new("t"));
        app.load_root().unwrap();

        let items = app.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].identifier(), "hub_H1");
        // Not fetched yet, so only the placeholder row
        assert_eq!(items[0].children().len(), 1);
        assert_eq!(app.selected_node(), Some(NodeId::hub("H1")));
    }

    #[test]
    fn test_expand_fetches_once() {
        let provider = fixture();
        let mut app = BrowserApp::new(&provider, AccessToken::new("t"));
        app.load_root().unwrap();

        app.expand_selected();
        app.state.close(&["hub_H1".to_string()]);
        app.expand_selected();
        assert_eq!(provider.calls("list_projects"), 1);
        assert_eq!(app.loaded_count(), 2);

        let items = app.items();
        assert_eq!(items[0].children()[0].identifier(), "project_H1_P1");
    }

    #[test]
    fn test_reload_refetches() {
        let provider = fixture();
        let mut app = BrowserApp::new(&provider, AccessToken::new("t"));
        app.load_root().unwrap();
        app.expand_selected();
        app.reload_selected();
        assert_eq!(provider.calls("list_projects"), 2);
    }

    #[test]
    fn test_items_are_not_expanded() {
        let provider = fixture();
        let mut app = BrowserApp::new(&provider, AccessToken::new("t"));
        app.load_root().unwrap();
        app.expand_selected();
        app.state
            .select(vec!["hub_H1".to_string(), "project_H1_P1".to_string()]);
        app.expand_selected();
        app.state.select(vec![
            "hub_H1".to_string(),
            "project_H1_P1".to_string(),
            "item_I1".to_string(),
        ]);
        app.expand_selected();
        assert_eq!(app.status.as_deref(), Some("item_I1 has no children"));
        // hubs, projects, then items and folder pages of P1
        assert_eq!(provider.total_calls(), 4);
    }

    #[test]
    fn test_placeholder_row_is_not_a_node() {
        let provider = fixture();
        let mut app = BrowserApp::new(&provider, AccessToken::new("t"));
        app.load_root().unwrap();
        app.state.select(vec!["hub_H1".to_string(), String::new()]);
        assert_eq!(app.selected_node(), None);
        app.expand_selected();
        assert_eq!(provider.total_calls(), 1);
    }
}
