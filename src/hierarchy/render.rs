//! Text and outline renderings of an assembly tree.
//!
//! The text form is one node per line, indented by [`INDENT_WIDTH`] spaces
//! per level under a `Root (<name>)` header. [`parse_indented`] turns that
//! text (or any consistently indented text) back into nested
//! [`OutlineNode`]s for tree widgets.

use crate::model::ComponentNode;
use serde::{Deserialize, Serialize};

/// Spaces per depth level in rendered hierarchy text.
pub const INDENT_WIDTH: usize = 5;

/// Generic nested node for tree widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    /// Placements under the same parent, when more than one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            count: None,
            children: Vec::new(),
        }
    }

    /// Copy of this outline with every id and count removed, i.e. what
    /// [`parse_indented`] recovers from the rendered text.
    #[must_use]
    pub fn text_only(&self) -> Self {
        let mut copy = self.clone();
        let mut stack = vec![&mut copy];
        while let Some(node) = stack.pop() {
            node.id = None;
            node.count = None;
            stack.extend(node.children.iter_mut());
        }
        copy
    }
}

/// Header line naming the tree's root.
#[must_use]
pub fn root_line(name: &str) -> String {
    format!("Root ({})", single_line(name))
}

/// Render with the default indent width.
#[must_use]
pub fn render_text(root: &ComponentNode) -> String {
    render_text_with_indent(root, INDENT_WIDTH)
}

/// Render `root` as indented text, one node per `\n`-terminated line.
#[must_use]
pub fn render_text_with_indent(root: &ComponentNode, width: usize) -> String {
    let mut out = root_line(&root.name);
    out.push('\n');

    let mut stack: Vec<(&ComponentNode, usize)> =
        root.children.iter().rev().map(|c| (c, 1)).collect();
    while let Some((node, depth)) = stack.pop() {
        out.extend(std::iter::repeat(' ').take(depth * width));
        out.push_str(&single_line(&node.name));
        out.push('\n');
        stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
    }
    out
}

fn single_line(name: &str) -> String {
    name.replace(['\r', '\n'], " ")
}

/// Structural outline of `root`, carrying component ids.
///
/// The root's text is its header line, so the result matches what
/// [`parse_indented`] yields for the rendered text apart from the ids.
#[must_use]
pub fn to_outline(root: &ComponentNode) -> OutlineNode {
    // Collect pre-order, then build bottom-up so deep trees need no recursion.
    let mut order: Vec<(&ComponentNode, usize)> = Vec::new();
    let mut stack = vec![(root, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        order.push((node, depth));
        stack.extend(node.children.iter().rev().map(|c| (c, depth + 1)));
    }

    // pending[d] holds finished children waiting for their parent at depth d - 1
    let mut pending: Vec<Vec<OutlineNode>> = Vec::new();
    for &(node, depth) in order.iter().rev() {
        if pending.len() <= depth + 1 {
            pending.resize_with(depth + 2, Vec::new);
        }
        let mut children = std::mem::take(&mut pending[depth + 1]);
        children.reverse();
        let text = if depth == 0 {
            root_line(&node.name)
        } else {
            single_line(&node.name)
        };
        pending[depth].push(OutlineNode {
            id: Some(node.id.clone()),
            text,
            count: (node.instances > 1).then_some(node.instances),
            children,
        });
    }
    pending
        .first_mut()
        .and_then(Vec::pop)
        .unwrap_or_else(|| OutlineNode::new(root_line(&root.name)))
}

/// Parts placed more than once under the same parent, in pre-order.
///
/// Each entry is the `/`-joined name path below the root and the number of
/// placements.
#[must_use]
pub fn repeated_parts(root: &ComponentNode) -> Vec<(String, usize)> {
    let mut repeated = Vec::new();
    let mut stack: Vec<(&ComponentNode, String)> = root
        .children
        .iter()
        .rev()
        .map(|c| (c, single_line(&c.name)))
        .collect();
    while let Some((node, path)) = stack.pop() {
        if node.instances > 1 {
            repeated.push((path.clone(), node.instances));
        }
        stack.extend(
            node.children
                .iter()
                .rev()
                .map(|c| (c, format!("{path} / {}", single_line(&c.name)))),
        );
    }
    repeated
}

/// Parse indented text into an outline forest.
///
/// Blank lines are skipped. A line's level is its leading whitespace count
/// divided by `width`; each line becomes a child of the closest preceding
/// line with a lower level, or a new root when there is none.
#[must_use]
pub fn parse_indented(text: &str, width: usize) -> Vec<OutlineNode> {
    let width = width.max(1);
    let mut roots = Vec::new();
    let mut stack: Vec<(usize, OutlineNode)> = Vec::new();

    for line in text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            continue;
        }
        let content = line.trim_start();
        let indent = line.chars().count() - content.chars().count();
        let level = indent / width;

        while stack.last().is_some_and(|(top, _)| *top >= level) {
            if let Some((_, done)) = stack.pop() {
                attach(&mut stack, &mut roots, done);
            }
        }
        stack.push((level, OutlineNode::new(content)));
    }

    while let Some((_, done)) = stack.pop() {
        attach(&mut stack, &mut roots, done);
    }
    roots
}

fn attach(stack: &mut [(usize, OutlineNode)], roots: &mut Vec<OutlineNode>, node: OutlineNode) {
    match stack.last_mut() {
        Some((_, parent)) => parent.children.push(node),
        None => roots.push(node),
    }
}
