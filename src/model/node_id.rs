//! Composite node identifiers for the lazy hub/project/folder/item tree.
//!
//! A [`NodeId`] carries everything needed to expand a node without walking its
//! ancestors again: project and folder ids embed the owning hub id, because the
//! folder-contents query is scoped by hub.
//!
//! # Encoding
//!
//! `kind_segment[_segment]`, joined with `_`. Each segment is escaped first
//! (`%` → `%25`, `_` → `%5F`), so provider identifiers may contain any
//! character. Plain identifiers encode verbatim:
//!
//! | node | encoding |
//! |---|---|
//! | root | `#` |
//! | hub `H1` | `hub_H1` |
//! | project `P1` in hub `H1` | `project_H1_P1` |
//! | folder `F1` in hub `H1` | `folder_H1_F1` |
//! | item `I1` | `item_I1` |

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::HierarchyError;

/// Root sentinel understood by tree widgets as "top level".
pub const ROOT_SENTINEL: &str = "#";

const SEPARATOR: char = '_';

/// Kind tag of an expandable tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Hub,
    Project,
    Folder,
    Item,
}

impl NodeKind {
    /// Tag used as the first segment of an encoded id.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Hub => "hub",
            Self::Project => "project",
            Self::Folder => "folder",
            Self::Item => "item",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "hub" => Some(Self::Hub),
            "project" => Some(Self::Project),
            "folder" => Some(Self::Folder),
            "item" => Some(Self::Item),
            _ => None,
        }
    }

    /// Number of segments following the tag.
    const fn segment_count(self) -> usize {
        match self {
            Self::Hub | Self::Item => 1,
            Self::Project | Self::Folder => 2,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Decoded node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeId {
    /// The invisible root; its children are the hubs
    Root,
    Hub { hub_id: String },
    Project { hub_id: String, project_id: String },
    Folder { hub_id: String, folder_id: String },
    /// Items are leaves and only carry their own id
    Item { item_id: String },
}

impl NodeId {
    pub fn hub(hub_id: impl Into<String>) -> Self {
        Self::Hub {
            hub_id: hub_id.into(),
        }
    }

    pub fn project(hub_id: impl Into<String>, project_id: impl Into<String>) -> Self {
        Self::Project {
            hub_id: hub_id.into(),
            project_id: project_id.into(),
        }
    }

    pub fn folder(hub_id: impl Into<String>, folder_id: impl Into<String>) -> Self {
        Self::Folder {
            hub_id: hub_id.into(),
            folder_id: folder_id.into(),
        }
    }

    pub fn item(item_id: impl Into<String>) -> Self {
        Self::Item {
            item_id: item_id.into(),
        }
    }

    /// Kind of this node, `None` for the root.
    #[must_use]
    pub const fn kind(&self) -> Option<NodeKind> {
        match self {
            Self::Root => None,
            Self::Hub { .. } => Some(NodeKind::Hub),
            Self::Project { .. } => Some(NodeKind::Project),
            Self::Folder { .. } => Some(NodeKind::Folder),
            Self::Item { .. } => Some(NodeKind::Item),
        }
    }

    #[must_use]
    pub const fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }

    /// Encode to the canonical string form.
    #[must_use]
    pub fn encode(&self) -> String {
        self.to_string()
    }

    /// Decode a client-supplied identifier.
    ///
    /// `"#"` and `""` decode to [`NodeId::Root`].
    pub fn decode(raw: &str) -> Result<Self, HierarchyError> {
        if raw.is_empty() || raw == ROOT_SENTINEL {
            return Ok(Self::Root);
        }

        let mut parts = raw.split(SEPARATOR);
        // split always yields at least one element
        let tag = parts.next().unwrap_or_default();
        let kind = NodeKind::from_tag(tag)
            .ok_or_else(|| HierarchyError::malformed(raw, format!("unknown kind '{tag}'")))?;

        let segments = parts
            .map(|segment| unescape(segment).map_err(|reason| HierarchyError::malformed(raw, reason)))
            .collect::<Result<Vec<_>, _>>()?;

        if segments.len() != kind.segment_count() {
            return Err(HierarchyError::malformed(
                raw,
                format!(
                    "{kind} id needs {} segment(s), found {}",
                    kind.segment_count(),
                    segments.len()
                ),
            ));
        }
        if segments.iter().any(String::is_empty) {
            return Err(HierarchyError::malformed(raw, "empty segment"));
        }

        let mut segments = segments.into_iter();
        let mut next = || segments.next().unwrap_or_default();
        Ok(match kind {
            NodeKind::Hub => Self::Hub { hub_id: next() },
            NodeKind::Project => Self::Project {
                hub_id: next(),
                project_id: next(),
            },
            NodeKind::Folder => Self::Folder {
                hub_id: next(),
                folder_id: next(),
            },
            NodeKind::Item => Self::Item { item_id: next() },
        })
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, segments): (NodeKind, [&str; 2]) = match self {
            Self::Root => return f.write_str(ROOT_SENTINEL),
            Self::Hub { hub_id } => (NodeKind::Hub, [hub_id, ""]),
            Self::Project { hub_id, project_id } => (NodeKind::Project, [hub_id, project_id]),
            Self::Folder { hub_id, folder_id } => (NodeKind::Folder, [hub_id, folder_id]),
            Self::Item { item_id } => (NodeKind::Item, [item_id, ""]),
        };

        f.write_str(kind.tag())?;
        for segment in &segments[..kind.segment_count()] {
            write!(f, "{SEPARATOR}{}", escape(segment))?;
        }
        Ok(())
    }
}

impl FromStr for NodeId {
    type Err = HierarchyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::decode(&raw).map_err(serde::de::Error::custom)
    }
}

fn escape(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match c {
            '%' => out.push_str("%25"),
            SEPARATOR => out.push_str("%5F"),
            other => out.push(other),
        }
    }
    out
}

fn unescape(segment: &str) -> Result<String, String> {
    let mut out = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let code = rest.get(pos + 1..pos + 3);
        match code {
            Some("25") => out.push('%'),
            Some("5F" | "5f") => out.push(SEPARATOR),
            _ => return Err(format!("invalid escape in segment '{segment}'")),
        }
        rest = &rest[pos + 3..];
    }
    out.push_str(rest);
    Ok(out)
}
