//! One-level expansion of the hub → project → folder → item tree.

use crate::error::{ErrorContext, HierarchyError, Result};
use crate::hierarchy::{collect_pages, DEFAULT_MAX_PAGES};
use crate::model::{NodeId, TreeNode};
use crate::provider::{HierarchyProvider, RequestContext};

/// Label used for hubs the provider returns without a name.
pub const UNNAMED_HUB: &str = "Unnamed Hub";

/// Answers "what are the children of this node" with one provider round per
/// call (plus folder pages, which are merged).
pub struct TreeExpander<'a, P: HierarchyProvider + ?Sized> {
    provider: &'a P,
    max_pages: usize,
}

impl<'a, P: HierarchyProvider + ?Sized> TreeExpander<'a, P> {
    pub const fn new(provider: &'a P) -> Self {
        Self {
            provider,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    /// Cap on folder pages merged for one project.
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Decode a client-supplied id and expand it.
    pub fn expand(&self, ctx: &RequestContext, raw_id: &str) -> Result<Vec<TreeNode>> {
        let node = NodeId::decode(raw_id)?;
        self.children(ctx, &node)
    }

    /// Children of `node`, each with `node` as its parent.
    pub fn children(&self, ctx: &RequestContext, node: &NodeId) -> Result<Vec<TreeNode>> {
        let children = match node {
            NodeId::Root => self.hubs(ctx),
            NodeId::Hub { hub_id } => self.projects(ctx, hub_id),
            NodeId::Project { hub_id, project_id } => self.project_contents(ctx, hub_id, project_id),
            NodeId::Folder { hub_id, folder_id } => self.folder_contents(ctx, hub_id, folder_id),
            NodeId::Item { .. } => Err(HierarchyError::UnsupportedExpansion {
                id: node.encode(),
            }),
        }
        .with_context(|| format!("expanding {node}"))?;

        tracing::debug!(
            "Expanded {node} via {}: {} children",
            self.provider.name(),
            children.len()
        );
        Ok(children)
    }

    fn hubs(&self, ctx: &RequestContext) -> Result<Vec<TreeNode>> {
        let hubs = self.provider.list_hubs(ctx)?;
        hubs.into_iter()
            .map(|hub| {
                require_id("hub", &hub.id)?;
                let label = hub.name.unwrap_or_else(|| UNNAMED_HUB.to_string());
                Ok(TreeNode::new(NodeId::hub(hub.id), NodeId::Root, label))
            })
            .collect()
    }

    fn projects(&self, ctx: &RequestContext, hub_id: &str) -> Result<Vec<TreeNode>> {
        let parent = NodeId::hub(hub_id);
        let projects = self.provider.list_projects(ctx, hub_id)?;
        projects
            .into_iter()
            .map(|project| {
                require_id("project", &project.id)?;
                Ok(TreeNode::new(
                    NodeId::project(hub_id, project.id),
                    parent.clone(),
                    project.name,
                ))
            })
            .collect()
    }

    /// Items directly in the project first, then every top-level folder.
    fn project_contents(
        &self,
        ctx: &RequestContext,
        hub_id: &str,
        project_id: &str,
    ) -> Result<Vec<TreeNode>> {
        let parent = NodeId::project(hub_id, project_id);
        let items = self.provider.list_items_in_project(ctx, project_id)?;
        let (folders, stats) =
            collect_pages(ctx, "project folders", self.max_pages, |cursor| {
                self.provider.list_folders_page(ctx, project_id, cursor)
            })?;
        tracing::debug!(
            "Project {project_id}: {} items, {} folders over {} page(s)",
            items.len(),
            folders.len(),
            stats.pages
        );

        let mut nodes = Vec::with_capacity(items.len() + folders.len());
        for item in items {
            require_id("item", &item.id)?;
            let label = item.label();
            nodes.push(TreeNode::new(NodeId::item(item.id), parent.clone(), label));
        }
        for folder in folders {
            require_id("folder", &folder.id)?;
            nodes.push(TreeNode::new(
                NodeId::folder(hub_id, folder.id),
                parent.clone(),
                folder.name,
            ));
        }
        Ok(nodes)
    }

    fn folder_contents(
        &self,
        ctx: &RequestContext,
        hub_id: &str,
        folder_id: &str,
    ) -> Result<Vec<TreeNode>> {
        let parent = NodeId::folder(hub_id, folder_id);
        let entries = self.provider.list_folder_contents(ctx, hub_id, folder_id)?;
        entries
            .into_iter()
            .map(|entry| {
                require_id("folder entry", &entry.id)?;
                let label = entry.label();
                let id = if entry.is_folder() {
                    NodeId::folder(hub_id, entry.id)
                } else {
                    NodeId::item(entry.id)
                };
                Ok(TreeNode::new(id, parent.clone(), label))
            })
            .collect()
    }
}

/// Provider ids become segments of encoded node ids, which cannot be empty.
fn require_id(what: &str, id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(HierarchyError::invalid_response(
            format!("{what} listing"),
            format!("{what} without an id"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentEntry, Folder, Hub, NodeKind, OccurrenceRecord, Page, Project};
    use crate::provider::{AccessToken, FixtureProvider};

    /// Serves one hub, one project item and a first folder page, and fails
    /// everything else with a 503.
    struct UnavailableProvider;

    fn unavailable<T>(op: &str) -> Result<T> {
        Err(HierarchyError::request_failed(op, 503, "service unavailable"))
    }

    impl HierarchyProvider for UnavailableProvider {
        fn name(&self) -> &'static str {
            "unavailable"
        }

        fn list_hubs(&self, _ctx: &RequestContext) -> Result<Vec<Hub>> {
            Ok(vec![Hub {
                id: "H1".into(),
                name: Some("Hub One".into()),
            }])
        }

        fn list_projects(&self, _ctx: &RequestContext, _hub_id: &str) -> Result<Vec<Project>> {
            unavailable("list projects")
        }

        fn list_folders_page(
            &self,
            _ctx: &RequestContext,
            _project_id: &str,
            cursor: Option<&str>,
        ) -> Result<Page<Folder>> {
            match cursor {
                None => Ok(Page {
                    items: vec![Folder {
                        id: "F1".into(),
                        name: "Designs".into(),
                        object_count: 0,
                    }],
                    next_cursor: Some("2".into()),
                }),
                Some(_) => unavailable("list folders"),
            }
        }

        fn list_items_in_project(
            &self,
            _ctx: &RequestContext,
            _project_id: &str,
        ) -> Result<Vec<ContentEntry>> {
            Ok(vec![ContentEntry::new("DesignItem", "I1", "Bracket")])
        }

        fn list_folder_contents(
            &self,
            _ctx: &RequestContext,
            _hub_id: &str,
            _folder_id: &str,
        ) -> Result<Vec<ContentEntry>> {
            unavailable("list folder contents")
        }

        fn resolve_project_ids(
            &self,
            _ctx: &RequestContext,
            _hub_name: &str,
            _project_name: &str,
        ) -> Result<Vec<String>> {
            unavailable("resolve projects")
        }

        fn resolve_component_version_ids(
            &self,
            _ctx: &RequestContext,
            _project_id: &str,
            _component_name: &str,
        ) -> Result<Vec<String>> {
            unavailable("resolve components")
        }

        fn fetch_occurrence_page(
            &self,
            _ctx: &RequestContext,
            _component_version_id: &str,
            _cursor: Option<&str>,
        ) -> Result<Page<OccurrenceRecord>> {
            unavailable("fetch occurrences")
        }
    }

    fn ctx() -> RequestContext {
        RequestContext::new(AccessToken::new("t"))
    }

    fn provider() -> FixtureProvider {
        FixtureProvider::from_json(
            r#"{
                "hubs": [{"id": "H1", "name": "Hub One"}, {"id": "H2", "name": null}],
                "projects": {"H1": [{"id": "P1", "name": "Alpha"}]},
                "projectItems": {"P1": [{"typeName": "DesignItem", "id": "I1", "name": "Bracket"}]},
                "folderPages": {"P1": [
                    [{"id": "F1", "name": "Designs", "objectCount": 2}],
                    [{"id": "F9", "name": "Archive"}]
                ]},
                "folderContents": {"F1": [
                    {"typeName": "Folder", "id": "F2", "name": "Sub"},
                    {"typeName": "DrawingItem", "id": "I2", "name": "Sheet"}
                ]}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_root_lists_hubs() {
        let p = provider();
        let nodes = TreeExpander::new(&p).expand(&ctx(), "#").unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].id, NodeId::hub("H1"));
        assert_eq!(nodes[0].parent, NodeId::Root);
        assert_eq!(nodes[1].label, UNNAMED_HUB);
        assert!(nodes.iter().all(|n| n.has_children));
    }

    #[test]
    fn test_project_items_then_folders() {
        let p = provider();
        let nodes = TreeExpander::new(&p).expand(&ctx(), "project_H1_P1").unwrap();
        let ids: Vec<String> = nodes.iter().map(|n| n.id.encode()).collect();
        assert_eq!(ids, vec!["item_I1", "folder_H1_F1", "folder_H1_F9"]);
        assert_eq!(nodes[0].label, "DesignItem: Bracket");
        assert!(!nodes[0].has_children);
        assert_eq!(nodes[1].label, "Designs");
        assert_eq!(p.calls("list_folders_page"), 2);
    }

    #[test]
    fn test_folder_contents_keep_hub() {
        let p = provider();
        let nodes = TreeExpander::new(&p).expand(&ctx(), "folder_H1_F1").unwrap();
        assert_eq!(nodes[0].id, NodeId::folder("H1", "F2"));
        assert_eq!(nodes[0].label, "Folder: Sub");
        assert_eq!(nodes[1].kind, NodeKind::Item);
        assert_eq!(nodes[1].parent, NodeId::folder("H1", "F1"));
    }

    #[test]
    fn test_item_cannot_expand() {
        let p = provider();
        let err = TreeExpander::new(&p).expand(&ctx(), "item_I1").unwrap_err();
        assert!(matches!(err, HierarchyError::UnsupportedExpansion { .. }));
        assert!(err.is_client_error());
        assert_eq!(p.total_calls(), 0);
    }

    #[test]
    fn test_provider_failure_keeps_status() {
        let err = TreeExpander::new(&UnavailableProvider)
            .expand(&ctx(), "hub_H1")
            .unwrap_err();
        match err {
            HierarchyError::ProviderRequestFailed {
                context, status, ..
            } => {
                assert_eq!(status, 503);
                assert_eq!(context, "expanding hub_H1: list projects");
            }
            other => panic!("Expected ProviderRequestFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_folder_page_aborts_project_contents() {
        let err = TreeExpander::new(&UnavailableProvider)
            .expand(&ctx(), "project_H1_P1")
            .unwrap_err();
        match err {
            HierarchyError::ProviderRequestFailed {
                context, status, ..
            } => {
                assert_eq!(status, 503);
                assert_eq!(
                    context,
                    "expanding project_H1_P1: project folders page 2: list folders"
                );
            }
            other => panic!("Expected ProviderRequestFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_provider_id_is_invalid_response() {
        let p = FixtureProvider::from_json(
            r#"{
                "hubs": [{"id": "", "name": "Nameless"}],
                "folderContents": {"F1": [{"typeName": "DrawingItem", "id": "", "name": "Sheet"}]}
            }"#,
        )
        .unwrap();
        let expander = TreeExpander::new(&p);

        let err = expander.expand(&ctx(), "#").unwrap_err();
        assert!(matches!(err, HierarchyError::InvalidResponse { .. }));
        assert!(err.to_string().contains("hub without an id"));

        let err = expander.expand(&ctx(), "folder_H1_F1").unwrap_err();
        assert!(matches!(err, HierarchyError::InvalidResponse { .. }));
    }

    #[test]
    fn test_malformed_id_makes_no_calls() {
        let p = provider();
        let err = TreeExpander::new(&p).expand(&ctx(), "bogus_1").unwrap_err();
        assert!(matches!(err, HierarchyError::MalformedIdentifier { .. }));
        assert_eq!(p.total_calls(), 0);
    }
}
