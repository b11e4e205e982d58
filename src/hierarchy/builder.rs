//! Materializes a flat occurrence list into a rooted assembly tree.
//!
//! The provider does not promise parent-before-child delivery, so building
//! happens in two passes: every child id is registered first, then each
//! record is linked to its parent. Every reported parent reference, including
//! the ones a conflicting placement discards, is checked for cycles before the
//! owned [`ComponentNode`] tree is assembled, so the outcome does not depend on
//! record order.

use super::stats::BuildStats;
use crate::error::{HierarchyError, ProtocolErrorKind, Result};
use crate::model::{ComponentNode, OccurrenceRecord};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// What to do with an occurrence whose parent was never reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum OrphanPolicy {
    /// Leave it (and anything below it) out of the tree
    #[default]
    Drop,
    /// Abort the build with a protocol error
    Fail,
}

const ROOT: usize = 0;

struct Slot<'a> {
    id: &'a str,
    name: &'a str,
    parent: Option<usize>,
    instances: usize,
    children: Vec<usize>,
}

/// Reachability of a slot from the root, memoized during cycle detection.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Reach {
    Unknown,
    Visiting,
    Root,
    Detached,
}

/// Depth-first visit state over the reported parent edges.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    New,
    Open,
    Done,
}

/// Builds [`ComponentNode`] trees from occurrence records.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    orphans: OrphanPolicy,
}

impl TreeBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_orphan_policy(mut self, policy: OrphanPolicy) -> Self {
        self.orphans = policy;
        self
    }

    /// Build the tree rooted at `root_id`.
    ///
    /// Records with no parent, or with `root_id` as parent, hang directly off
    /// the root. A child placed twice under the same parent gains an instance;
    /// a child reported under a second, different parent keeps its first
    /// placement.
    pub fn build(
        &self,
        root_id: &str,
        root_name: &str,
        records: &[OccurrenceRecord],
    ) -> Result<(ComponentNode, BuildStats)> {
        let mut stats = BuildStats {
            records: records.len(),
            ..BuildStats::default()
        };

        // Pass 1: register every child id.
        let mut index: IndexMap<&str, usize> = IndexMap::with_capacity(records.len() + 1);
        let mut slots = vec![Slot {
            id: root_id,
            name: root_name,
            parent: None,
            instances: 1,
            children: Vec::new(),
        }];
        index.insert(root_id, ROOT);

        for record in records {
            let child = record.child_id.as_str();
            if child == root_id || record.parent_id.as_deref() == Some(child) {
                return Err(cycle(child));
            }
            index.entry(child).or_insert_with(|| {
                slots.push(Slot {
                    id: child,
                    name: &record.child_name,
                    parent: None,
                    instances: 0,
                    children: Vec::new(),
                });
                slots.len() - 1
            });
        }

        // Pass 2: link children to parents.
        let mut reported: Vec<Vec<usize>> = vec![Vec::new(); slots.len()];
        for record in records {
            let parent = match record.parent_id.as_deref() {
                None => ROOT,
                Some(id) if id == root_id => ROOT,
                Some(id) => match index.get(id) {
                    Some(&slot) => slot,
                    None => {
                        self.orphan(record, id)?;
                        stats.orphaned += 1;
                        continue;
                    }
                },
            };
            let child = index[record.child_id.as_str()];
            if !reported[child].contains(&parent) {
                reported[child].push(parent);
            }
            match slots[child].parent {
                None => {
                    slots[child].parent = Some(parent);
                    slots[child].instances = 1;
                    slots[parent].children.push(child);
                }
                Some(existing) if existing == parent => {
                    slots[child].instances += 1;
                    stats.repeated_instances += 1;
                }
                Some(existing) => {
                    tracing::debug!(
                        "Occurrence '{}' already placed under '{}', ignoring parent '{}'",
                        record.child_id,
                        slots[existing].id,
                        slots[parent].id
                    );
                    stats.conflicting_placements += 1;
                }
            }
        }

        check_acyclic(&slots, &reported)?;
        let reach = reachability(&slots)?;
        stats.unreachable = reach
            .iter()
            .zip(&slots)
            .filter(|(r, slot)| **r == Reach::Detached && slot.parent.is_some())
            .count();

        let root = materialize(&slots);
        stats.nodes = root.len();
        Ok((root, stats))
    }

    fn orphan(&self, record: &OccurrenceRecord, parent_id: &str) -> Result<()> {
        match self.orphans {
            OrphanPolicy::Drop => {
                tracing::debug!(
                    "Dropping occurrence '{}': parent '{parent_id}' was never reported",
                    record.child_id
                );
                Ok(())
            }
            OrphanPolicy::Fail => Err(HierarchyError::protocol(
                "building hierarchy",
                ProtocolErrorKind::OrphanedOccurrence {
                    child_id: record.child_id.clone(),
                    parent_id: parent_id.to_string(),
                },
            )),
        }
    }
}

fn cycle(node_id: &str) -> HierarchyError {
    HierarchyError::protocol(
        "building hierarchy",
        ProtocolErrorKind::Cycle {
            node_id: node_id.to_string(),
        },
    )
}

/// Fail when the reported parent edges, placed or not, contain a loop.
fn check_acyclic(slots: &[Slot<'_>], reported: &[Vec<usize>]) -> Result<()> {
    let mut marks = vec![Mark::New; slots.len()];
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..slots.len() {
        if marks[start] != Mark::New {
            continue;
        }
        marks[start] = Mark::Open;
        stack.push((start, 0));
        while let Some(top) = stack.last_mut() {
            let (node, edge) = *top;
            match reported[node].get(edge) {
                Some(&parent) => {
                    top.1 += 1;
                    match marks[parent] {
                        Mark::Open => return Err(cycle(slots[parent].id)),
                        Mark::New => {
                            marks[parent] = Mark::Open;
                            stack.push((parent, 0));
                        }
                        Mark::Done => {}
                    }
                }
                None => {
                    marks[node] = Mark::Done;
                    stack.pop();
                }
            }
        }
    }
    Ok(())
}

/// Walk every placed parent chain once, failing on a chain that revisits itself.
fn reachability(slots: &[Slot<'_>]) -> Result<Vec<Reach>> {
    let mut reach = vec![Reach::Unknown; slots.len()];
    reach[ROOT] = Reach::Root;
    let mut path = Vec::new();

    for start in 0..slots.len() {
        let mut current = start;
        let outcome = loop {
            match reach[current] {
                Reach::Root | Reach::Detached => break reach[current],
                Reach::Visiting => return Err(cycle(slots[current].id)),
                Reach::Unknown => {}
            }
            reach[current] = Reach::Visiting;
            path.push(current);
            match slots[current].parent {
                Some(parent) => current = parent,
                None => break Reach::Detached,
            }
        };
        for slot in path.drain(..) {
            reach[slot] = outcome;
        }
    }
    Ok(reach)
}

/// Assemble the owned tree below the root without recursion.
fn materialize(slots: &[Slot<'_>]) -> ComponentNode {
    let mut order = Vec::with_capacity(slots.len());
    let mut stack = vec![ROOT];
    while let Some(slot) = stack.pop() {
        order.push(slot);
        stack.extend(slots[slot].children.iter().rev());
    }

    let mut built: Vec<Option<ComponentNode>> = (0..slots.len()).map(|_| None).collect();
    for &slot in order.iter().rev() {
        let children = slots[slot]
            .children
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        built[slot] = Some(ComponentNode {
            id: slots[slot].id.to_string(),
            name: slots[slot].name.to_string(),
            instances: slots[slot].instances,
            children,
        });
    }
    built[ROOT]
        .take()
        .unwrap_or_else(|| ComponentNode::new(slots[ROOT].id, slots[ROOT].name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occ(parent: Option<&str>, child: &str) -> OccurrenceRecord {
        OccurrenceRecord::new(parent, child, format!("name-{child}"))
    }

    fn build(records: &[OccurrenceRecord]) -> Result<(ComponentNode, BuildStats)> {
        TreeBuilder::new().build("R", "Root", records)
    }

    #[test]
    fn test_children_in_encounter_order() {
        let (tree, stats) = build(&[
            occ(None, "A"),
            occ(Some("A"), "B"),
            occ(None, "C"),
            occ(Some("A"), "D"),
        ])
        .unwrap();
        assert_eq!(tree.child_names(), vec!["name-A", "name-C"]);
        assert_eq!(tree.children[0].child_names(), vec!["name-B", "name-D"]);
        assert_eq!(stats.nodes, 5);
        assert!(!stats.is_lossy());
    }

    #[test]
    fn test_child_before_parent() {
        let (tree, _) = build(&[occ(Some("A"), "B"), occ(None, "A")]).unwrap();
        assert_eq!(tree.find("A").unwrap().child_names(), vec!["name-B"]);
    }

    #[test]
    fn test_root_id_as_parent() {
        let (tree, _) = build(&[occ(Some("R"), "A")]).unwrap();
        assert_eq!(tree.child_names(), vec!["name-A"]);
    }

    #[test]
    fn test_orphan_dropped_with_descendants() {
        let (tree, stats) = build(&[
            occ(None, "A"),
            occ(Some("A"), "B"),
            occ(Some("Z"), "C"),
            occ(Some("C"), "D"),
        ])
        .unwrap();
        assert_eq!(tree.len(), 3);
        assert!(tree.find("C").is_none());
        assert!(tree.find("D").is_none());
        assert_eq!(stats.orphaned, 1);
        assert_eq!(stats.unreachable, 1);
    }

    #[test]
    fn test_orphan_fail_policy() {
        let err = TreeBuilder::new()
            .with_orphan_policy(OrphanPolicy::Fail)
            .build("R", "Root", &[occ(None, "A"), occ(Some("Z"), "C")])
            .unwrap_err();
        assert_eq!(
            err.protocol_kind(),
            Some(&ProtocolErrorKind::OrphanedOccurrence {
                child_id: "C".into(),
                parent_id: "Z".into()
            })
        );
    }

    #[test]
    fn test_repeated_and_conflicting_placements() {
        let (tree, stats) = build(&[
            occ(None, "A"),
            occ(None, "B"),
            occ(Some("A"), "S"),
            occ(Some("A"), "S"),
            occ(Some("B"), "S"),
        ])
        .unwrap();
        let a = tree.find("A").unwrap();
        assert_eq!(a.children[0].instances, 2);
        assert!(tree.find("B").unwrap().children.is_empty());
        assert_eq!(stats.repeated_instances, 1);
        assert_eq!(stats.conflicting_placements, 1);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_first_reported_name_wins() {
        let (tree, _) = build(&[
            OccurrenceRecord::new(None, "A", "First"),
            OccurrenceRecord::new(None, "A", "Second"),
        ])
        .unwrap();
        assert_eq!(tree.child_names(), vec!["First"]);
    }

    #[test]
    fn test_self_reference_is_cycle() {
        let err = build(&[occ(Some("A"), "A")]).unwrap_err();
        assert!(matches!(err.protocol_kind(), Some(ProtocolErrorKind::Cycle { .. })));
    }

    #[test]
    fn test_root_as_child_is_cycle() {
        let err = build(&[occ(None, "A"), occ(Some("A"), "R")]).unwrap_err();
        assert_eq!(
            err.protocol_kind(),
            Some(&ProtocolErrorKind::Cycle { node_id: "R".into() })
        );
    }

    #[test]
    fn test_two_node_cycle() {
        let err = build(&[occ(None, "X"), occ(Some("B"), "A"), occ(Some("A"), "B")]).unwrap_err();
        assert!(matches!(err.protocol_kind(), Some(ProtocolErrorKind::Cycle { .. })));
    }

    #[test]
    fn test_loop_hidden_behind_first_placement_is_cycle() {
        // A is placed under the root first, so (B, A) only conflicts with it
        let placed_first = [occ(None, "A"), occ(Some("A"), "B"), occ(Some("B"), "A")];
        let rotated = [occ(Some("B"), "A"), occ(None, "A"), occ(Some("A"), "B")];
        for records in [&placed_first, &rotated] {
            let err = build(records).unwrap_err();
            assert!(
                matches!(err.protocol_kind(), Some(ProtocolErrorKind::Cycle { .. })),
                "{records:?}: {err}"
            );
        }
    }

    #[test]
    fn test_conflicting_parent_without_loop_still_builds() {
        let (tree, stats) = build(&[
            occ(Some("B"), "C"),
            occ(None, "A"),
            occ(Some("A"), "B"),
            occ(Some("A"), "C"),
        ])
        .unwrap();
        assert_eq!(tree.find("B").unwrap().child_names(), vec!["name-C"]);
        assert_eq!(stats.conflicting_placements, 1);
    }

    #[test]
    fn test_empty_occurrences() {
        let (tree, stats) = build(&[]).unwrap();
        assert_eq!(tree, ComponentNode::new("R", "Root"));
        assert_eq!(stats.nodes, 1);
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let mut records = vec![occ(None, "n0")];
        for i in 1..5_000 {
            records.push(occ(Some(&format!("n{}", i - 1)), &format!("n{i}")));
        }
        let (tree, _) = build(&records).unwrap();
        assert_eq!(tree.depth(), 5_000);
    }
}
