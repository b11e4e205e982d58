//! Property-based tests for identifiers, tree building and rendering.

use model_hierarchy::model::Page;
use model_hierarchy::provider::FixtureData;
use model_hierarchy::{
    parse_indented, render_text, to_outline, AccessToken, ComponentNode, FixtureProvider,
    NodeId, OccurrencePaginator, OccurrenceRecord, RequestContext, TreeBuilder, INDENT_WIDTH,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn segment() -> impl Strategy<Value = String> {
    "\\PC{1,12}"
}

fn any_node_id() -> impl Strategy<Value = NodeId> {
    prop_oneof![
        Just(NodeId::Root),
        segment().prop_map(NodeId::hub),
        (segment(), segment()).prop_map(|(h, p)| NodeId::project(h, p)),
        (segment(), segment()).prop_map(|(h, f)| NodeId::folder(h, f)),
        segment().prop_map(NodeId::item),
    ]
}

fn part_name() -> impl Strategy<Value = String> {
    "[A-Za-z0-9][A-Za-z0-9 ()._-]{0,12}"
}

/// Occurrences of a well-formed tree: node `i` hangs off the root or off an
/// earlier node.
fn assembly() -> impl Strategy<Value = Vec<OccurrenceRecord>> {
    prop::collection::vec((any::<prop::sample::Index>(), part_name()), 0..40).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (parent, name))| {
                // Slot 0 is the root, slot k is node k - 1
                let slot = parent.index(i + 1);
                let parent = (slot > 0).then(|| format!("N{}", slot - 1));
                OccurrenceRecord::new(parent.as_deref(), format!("N{i}"), name)
            })
            .collect()
    })
}

/// Children sorted by id, so trees differing only in sibling order compare equal.
fn canonical(node: &ComponentNode) -> ComponentNode {
    let mut copy = node.clone();
    let mut stack = vec![&mut copy];
    while let Some(node) = stack.pop() {
        node.children.sort_by(|a, b| a.id.cmp(&b.id));
        stack.extend(node.children.iter_mut());
    }
    copy
}

fn ctx() -> RequestContext {
    RequestContext::new(AccessToken::new("prop"))
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn node_id_round_trips(id in any_node_id()) {
        let encoded = id.encode();
        prop_assert_eq!(NodeId::decode(&encoded).unwrap(), id);
    }

    #[test]
    fn decode_never_panics(raw in "\\PC{0,40}") {
        let _ = NodeId::decode(&raw);
    }

    #[test]
    fn render_then_parse_matches_outline(records in assembly(), root in part_name()) {
        let (tree, _) = TreeBuilder::new().build("CV", &root, &records).unwrap();
        let parsed = parse_indented(&render_text(&tree), INDENT_WIDTH);
        prop_assert_eq!(parsed, vec![to_outline(&tree).text_only()]);
    }

    #[test]
    fn every_record_becomes_a_node(records in assembly()) {
        let (tree, stats) = TreeBuilder::new().build("CV", "Root", &records).unwrap();
        prop_assert_eq!(tree.len(), records.len() + 1);
        prop_assert_eq!(stats.nodes, records.len() + 1);
        prop_assert!(!stats.is_lossy());
    }

    #[test]
    fn record_order_does_not_change_the_tree(
        (records, shuffled) in assembly().prop_flat_map(|r| (Just(r.clone()), Just(r).prop_shuffle()))
    ) {
        let (a, stats_a) = TreeBuilder::new().build("CV", "Root", &records).unwrap();
        let (b, stats_b) = TreeBuilder::new().build("CV", "Root", &shuffled).unwrap();
        prop_assert_eq!(canonical(&a), canonical(&b));
        prop_assert_eq!(stats_a, stats_b);
    }

    #[test]
    fn pagination_collects_every_page(pages in 1usize..12, per_page in 0usize..6) {
        let mut data = FixtureData::default();
        let content: Vec<Vec<OccurrenceRecord>> = (0..pages)
            .map(|p| {
                (0..per_page)
                    .map(|i| OccurrenceRecord::new(None, format!("N{p}.{i}"), "Part"))
                    .collect()
            })
            .collect();
        data.occurrence_pages.insert("CV".into(), content);
        let provider = FixtureProvider::new(data);

        let records = OccurrencePaginator::new(&provider).fetch_all(&ctx(), "CV").unwrap();
        prop_assert_eq!(records.len(), pages * per_page);
        prop_assert_eq!(provider.calls("fetch_occurrence_page"), pages);
    }

    #[test]
    fn empty_cursor_ends_pagination(cursor in prop::option::of(Just(String::new()))) {
        let page = Page { items: vec![1u8], next_cursor: cursor };
        prop_assert_eq!(page.continuation(), None);
    }
}
