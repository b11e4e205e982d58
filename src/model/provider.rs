//! Records returned by a remote hierarchy provider.

use serde::{Deserialize, Serialize};

/// Provider `typeName` that marks a folder inside mixed folder contents.
pub const FOLDER_TYPE_NAME: &str = "Folder";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hub {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub object_count: u64,
}

/// An entry of a heterogeneous item/folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    /// Provider discriminator, e.g. `DesignItem`, `DrawingItem`, `Folder`
    pub type_name: String,
    pub id: String,
    pub name: String,
}

impl ContentEntry {
    pub fn new(type_name: impl Into<String>, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.type_name == FOLDER_TYPE_NAME
    }

    /// Display label `<typeName>: <name>`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}: {}", self.type_name, self.name)
    }
}

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Continuation token; `None` or empty means this was the last page
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }

    pub fn with_cursor(items: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            items,
            next_cursor: Some(cursor.into()),
        }
    }

    /// The continuation cursor, treating an empty string as absent.
    #[must_use]
    pub fn continuation(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }
}
