//! End-to-end tests against the shared JSON fixture.
//!
//! These exercise expansion, name resolution, pagination and tree building
//! through the public API, with the fixture provider standing in for the
//! remote GraphQL API.

use model_hierarchy::error::ProtocolErrorKind;
use model_hierarchy::model::{Hub, Page};
use model_hierarchy::provider::{CancelFlag, FixtureData};
use model_hierarchy::{
    get_component_hierarchy, resolve_hierarchy, AccessToken, FixtureProvider, HierarchyError,
    HierarchyOptions, HierarchyProvider, NodeId, NodeKind, OccurrencePaginator, OccurrenceRecord,
    OrphanPolicy, RequestContext, ResolutionPolicy, TreeBuilder, TreeExpander,
};
use std::path::{Path, PathBuf};

// ============================================================================
// Test Fixtures
// ============================================================================

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture_path(name: &str) -> PathBuf {
    Path::new(FIXTURES_DIR).join(name)
}

fn workspace() -> FixtureProvider {
    FixtureProvider::load(&fixture_path("workspace.json")).expect("fixture should load")
}

fn ctx() -> RequestContext {
    RequestContext::new(AccessToken::new("integration"))
}

fn ids(nodes: &[model_hierarchy::TreeNode]) -> Vec<String> {
    nodes.iter().map(|n| n.id.encode()).collect()
}

// ============================================================================
// Lazy expansion
// ============================================================================

mod expansion {
    use super::*;

    #[test]
    fn root_lists_hubs() {
        let provider = workspace();
        let hubs = TreeExpander::new(&provider).expand(&ctx(), "#").unwrap();
        assert_eq!(ids(&hubs), vec!["hub_H1", "hub_H2"]);
        assert!(hubs.iter().all(|h| h.parent == NodeId::Root));
        assert_eq!(hubs[0].label, "Hub One");
        assert_eq!(hubs[1].label, "Unnamed Hub");
    }

    #[test]
    fn hub_lists_projects() {
        let provider = workspace();
        let projects = TreeExpander::new(&provider).expand(&ctx(), "hub_H1").unwrap();
        assert_eq!(ids(&projects), vec!["project_H1_P1"]);
        assert_eq!(projects[0].parent, NodeId::hub("H1"));
        assert_eq!(projects[0].kind, NodeKind::Project);
    }

    #[test]
    fn project_lists_items_then_folders_across_pages() {
        let provider = workspace();
        let children = TreeExpander::new(&provider)
            .expand(&ctx(), "project_H1_P1")
            .unwrap();
        assert_eq!(
            ids(&children),
            vec!["item_I1", "folder_H1_F1", "folder_H1_F9"]
        );
        assert_eq!(children[0].label, "DesignItem: Bracket");
        assert_eq!(children[1].label, "Designs");
        assert!(!children[0].has_children);
        assert!(children[1].has_children);
        // Both folder pages were merged
        assert_eq!(provider.calls("list_folders_page"), 2);
    }

    #[test]
    fn folder_contents_keep_hub() {
        let provider = workspace();
        let children = TreeExpander::new(&provider)
            .expand(&ctx(), "folder_H1_F1")
            .unwrap();
        assert_eq!(ids(&children), vec!["item_I2", "folder_H1_F2"]);
        assert_eq!(children[1].label, "Folder: Drawings");

        let nested = TreeExpander::new(&provider)
            .expand(&ctx(), &children[1].id.encode())
            .unwrap();
        assert_eq!(ids(&nested), vec!["item_I3"]);
    }

    #[test]
    fn walking_every_level_reaches_all_items() {
        let provider = workspace();
        let expander = TreeExpander::new(&provider);
        let mut pending = vec![NodeId::Root];
        let mut items = Vec::new();
        while let Some(node) = pending.pop() {
            for child in expander.children(&ctx(), &node).unwrap() {
                if child.has_children {
                    pending.push(child.id);
                } else {
                    items.push(child.id.encode());
                }
            }
        }
        items.sort();
        assert_eq!(items, vec!["item_I1", "item_I2", "item_I3"]);
    }

    #[test]
    fn client_errors() {
        let provider = workspace();
        let expander = TreeExpander::new(&provider);

        let malformed = expander.expand(&ctx(), "project_H1").unwrap_err();
        assert!(malformed.is_client_error());

        let leaf = expander.expand(&ctx(), "item_I1").unwrap_err();
        assert!(leaf.is_client_error());
        assert_eq!(provider.total_calls(), 0);
    }

    #[test]
    fn escaped_identifiers_reach_the_provider_verbatim() {
        let provider = FixtureProvider::new(FixtureData {
            hubs: vec![Hub {
                id: "a.b_c%d".into(),
                name: Some("Odd".into()),
            }],
            ..FixtureData::default()
        });
        let hubs = TreeExpander::new(&provider).expand(&ctx(), "#").unwrap();
        let encoded = hubs[0].id.encode();
        assert_eq!(encoded, "hub_a.b%5Fc%25d");
        assert_eq!(NodeId::decode(&encoded).unwrap(), NodeId::hub("a.b_c%d"));
    }
}

// ============================================================================
// Component hierarchy
// ============================================================================

mod component_hierarchy {
    use super::*;

    #[test]
    fn widget_hierarchy_follows_all_pages() {
        let provider = workspace();
        let outcome = resolve_hierarchy(
            &provider,
            &ctx(),
            "Hub One",
            "Alpha",
            "Widget",
            &HierarchyOptions::default(),
        )
        .unwrap();

        assert_eq!(outcome.hierarchy.component_version_id.as_deref(), Some("CV1"));
        assert_eq!(
            outcome.hierarchy.hierarchy_text,
            "Root (Widget)\n     Arm\n          Bolt\n          Washer\n     Cover\n"
        );
        assert_eq!(outcome.tree.len(), 5);
        assert_eq!(provider.calls("fetch_occurrence_page"), 2);

        let pagination = outcome.pagination.unwrap();
        assert_eq!((pagination.pages, pagination.records), (2, 4));
        assert!(!outcome.build.unwrap().is_lossy());
    }

    #[test]
    fn unresolvable_component_yields_placeholder() {
        let provider = workspace();
        let hierarchy = get_component_hierarchy(
            &provider,
            &ctx(),
            "Hub One",
            "Alpha",
            "Widget2",
            &HierarchyOptions::default(),
        )
        .unwrap();

        assert_eq!(
            serde_json::to_value(&hierarchy).unwrap(),
            serde_json::json!({"componentVersionId": null, "hierarchyText": "Root (Widget2)\n"})
        );
        assert_eq!(provider.calls("fetch_occurrence_page"), 0);
    }

    #[test]
    fn component_without_version_is_unresolved() {
        let provider = workspace();
        let hierarchy = get_component_hierarchy(
            &provider,
            &ctx(),
            "Hub One",
            "Alpha",
            "Sketch",
            &HierarchyOptions::default(),
        )
        .unwrap();
        assert!(hierarchy.is_fallback());
    }

    #[test]
    fn unknown_project_is_fatal() {
        let provider = workspace();
        let err = get_component_hierarchy(
            &provider,
            &ctx(),
            "Hub One",
            "Nope",
            "Widget",
            &HierarchyOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, HierarchyError::NotFound { what: "project", .. }));
    }

    #[test]
    fn orphan_is_dropped_by_default() {
        // [(null, A), (A, B), (Z, C)] under root CV2
        let provider = workspace();
        let outcome = resolve_hierarchy(
            &provider,
            &ctx(),
            "Hub One",
            "Alpha",
            "Gadget",
            &HierarchyOptions::default(),
        )
        .unwrap();

        assert_eq!(outcome.tree.child_names(), vec!["A"]);
        assert_eq!(outcome.tree.children[0].child_names(), vec!["B"]);
        assert!(outcome.tree.find("C").is_none());
        assert_eq!(outcome.build.unwrap().orphaned, 1);
    }

    #[test]
    fn orphan_fails_under_strict_policy() {
        let provider = workspace();
        let options = HierarchyOptions {
            orphans: OrphanPolicy::Fail,
            ..HierarchyOptions::default()
        };
        let err = resolve_hierarchy(&provider, &ctx(), "Hub One", "Alpha", "Gadget", &options)
            .unwrap_err();
        assert!(matches!(
            err.protocol_kind(),
            Some(ProtocolErrorKind::OrphanedOccurrence { child_id, parent_id })
                if child_id == "C" && parent_id == "Z"
        ));
    }

    #[test]
    fn ambiguous_names_under_unique_policy() {
        let provider = FixtureProvider::from_json(
            r#"{
                "hubs": [{"id": "H1", "name": "Hub"}],
                "projects": {"H1": [{"id": "P1", "name": "Dup"}, {"id": "P2", "name": "Dup"}]}
            }"#,
        )
        .unwrap();
        let options = HierarchyOptions {
            resolution: ResolutionPolicy::Unique,
            ..HierarchyOptions::default()
        };
        let err = resolve_hierarchy(&provider, &ctx(), "Hub", "Dup", "Widget", &options)
            .unwrap_err();
        assert!(matches!(
            err.protocol_kind(),
            Some(ProtocolErrorKind::AmbiguousMatch { count: 2, .. })
        ));

        // First match picks P1, which has no components
        let hierarchy = get_component_hierarchy(
            &provider,
            &ctx(),
            "Hub",
            "Dup",
            "Widget",
            &HierarchyOptions::default(),
        )
        .unwrap();
        assert!(hierarchy.is_fallback());
    }

    #[test]
    fn cancelled_context_stops_before_any_call() {
        let provider = workspace();
        let flag = CancelFlag::new();
        flag.cancel();
        let ctx = ctx().with_cancel_flag(flag);
        let err = get_component_hierarchy(
            &provider,
            &ctx,
            "Hub One",
            "Alpha",
            "Widget",
            &HierarchyOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, HierarchyError::Cancelled));
        assert_eq!(provider.total_calls(), 0);
    }
}

// ============================================================================
// Pagination
// ============================================================================

mod pagination {
    use super::*;

    fn paged(pages: usize, per_page: usize) -> FixtureProvider {
        let mut data = FixtureData::default();
        let pages: Vec<Vec<OccurrenceRecord>> = (0..pages)
            .map(|p| {
                (0..per_page)
                    .map(|i| OccurrenceRecord::new(None, format!("N{p}-{i}"), format!("Part {p}-{i}")))
                    .collect()
            })
            .collect();
        data.occurrence_pages.insert("CV".into(), pages);
        FixtureProvider::new(data)
    }

    #[test]
    fn collects_every_page_in_order() {
        let provider = paged(7, 3);
        let records = OccurrencePaginator::new(&provider)
            .fetch_all(&ctx(), "CV")
            .unwrap();
        assert_eq!(records.len(), 21);
        assert_eq!(records[0].child_id, "N0-0");
        assert_eq!(records[20].child_id, "N6-2");
        assert_eq!(provider.calls("fetch_occurrence_page"), 7);
    }

    #[test]
    fn page_cap_trips() {
        let provider = paged(5, 1);
        let err = OccurrencePaginator::new(&provider)
            .with_max_pages(4)
            .fetch_all(&ctx(), "CV")
            .unwrap_err();
        assert!(matches!(
            err.protocol_kind(),
            Some(ProtocolErrorKind::PageLimitExceeded { limit: 4 })
        ));
    }

    #[test]
    fn unknown_version_is_one_empty_page() {
        let provider = paged(1, 1);
        let page: Page<OccurrenceRecord> = provider
            .fetch_occurrence_page(&ctx(), "missing", None)
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.continuation(), None);
    }

    #[test]
    fn built_tree_matches_record_count() {
        let provider = paged(4, 25);
        let records = OccurrencePaginator::new(&provider)
            .fetch_all(&ctx(), "CV")
            .unwrap();
        let (tree, stats) = TreeBuilder::new().build("CV", "Flat", &records).unwrap();
        assert_eq!(tree.children.len(), 100);
        assert_eq!(stats.nodes, 101);
    }
}
