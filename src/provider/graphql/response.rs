//! GraphQL request and response payloads.
//!
//! Only the fields the provider queries are modelled. Lists the API may send
//! as `null` are `Option<Vec<_>>` and flattened by [`Results::into_vec`].

use crate::model::{ContentEntry, Folder, OccurrenceRecord};
use serde::{Deserialize, Serialize};

/// POST body of a GraphQL request.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: serde_json::Value,
}

/// Top-level GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Option<Vec<GraphQlErrorEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQlErrorEntry {
    #[serde(default)]
    pub message: String,
}

impl<T> GraphQlResponse<T> {
    /// Joined error messages, if the response carried any.
    pub fn error_summary(&self) -> Option<String> {
        let errors = self.errors.as_ref().filter(|e| !e.is_empty())?;
        Some(
            errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// `{ results: [...] }` wrapper used by every list field.
#[derive(Debug, Clone, Deserialize)]
pub struct Results<T> {
    pub results: Option<Vec<T>>,
}

impl<T> Results<T> {
    pub fn into_vec(self) -> Vec<T> {
        self.results.unwrap_or_default()
    }
}

/// `{ results: [...], pagination: { cursor } }`
#[derive(Debug, Clone, Deserialize)]
pub struct PagedResults<T> {
    pub results: Option<Vec<T>>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

impl<T> PagedResults<T> {
    pub fn cursor(&self) -> Option<String> {
        self.pagination.as_ref().and_then(|p| p.cursor.clone())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdOnly {
    pub id: String,
}

// ============================================================================
// Per-query data shapes
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct HubRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HubsData {
    pub hubs: Option<Results<HubRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectsData {
    pub projects: Option<Results<ProjectRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub object_count: Option<u64>,
}

impl From<FolderRecord> for Folder {
    fn from(record: FolderRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.unwrap_or_default(),
            object_count: record.object_count.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoldersData {
    pub folders_by_project: Option<PagedResults<FolderRecord>>,
}

/// Entry of an item or folder-contents listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentRecord {
    #[serde(rename = "__typename")]
    pub type_name: String,
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl From<ContentRecord> for ContentEntry {
    fn from(record: ContentRecord) -> Self {
        Self::new(record.type_name, record.id, record.name.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectItemsData {
    pub items_by_project: Option<Results<ContentRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderItemsData {
    pub items_by_folder: Option<Results<ContentRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HubWithProjects {
    pub projects: Option<Results<IdOnly>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectIdsData {
    pub hubs: Option<Results<HubWithProjects>>,
}

/// A `DesignItem` fragment; other item types deserialize with no version.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignItemRecord {
    #[serde(default)]
    pub tip_root_component_version: Option<IdOnly>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectItems {
    pub items: Option<Results<DesignItemRecord>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentVersionIdsData {
    pub project: Option<ProjectItems>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedComponent {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceEdge {
    #[serde(default)]
    pub parent_component_version: Option<IdOnly>,
    pub component_version: NamedComponent,
}

impl From<OccurrenceEdge> for OccurrenceRecord {
    fn from(edge: OccurrenceEdge) -> Self {
        Self {
            child_id: edge.component_version.id,
            child_name: edge.component_version.name.unwrap_or_default(),
            parent_id: edge.parent_component_version.map(|p| p.id),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentVersionRecord {
    #[serde(default)]
    pub all_occurrences: Option<PagedResults<OccurrenceEdge>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrencesData {
    pub component_version: Option<ComponentVersionRecord>,
}
