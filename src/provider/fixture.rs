//! Offline provider backed by a JSON document.
//!
//! Paginated listings are stored as lists of pages. The cursor handed back for
//! page `n + 1` is simply `"n + 1"`, so a fixture behaves like a well-formed
//! remote API without any network access.

use super::{HierarchyProvider, RequestContext};
use crate::error::{ErrorContext, HierarchyError, Result};
use crate::model::{ContentEntry, Folder, Hub, OccurrenceRecord, Page, Project};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

/// A component as the fixture's name resolution sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureComponent {
    pub name: String,
    /// `None` models an item without a tip root component version
    #[serde(default)]
    pub version_id: Option<String>,
}

/// Serialized fixture document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FixtureData {
    pub hubs: Vec<Hub>,
    /// Projects keyed by hub id
    pub projects: IndexMap<String, Vec<Project>>,
    /// Folder pages keyed by project id
    pub folder_pages: IndexMap<String, Vec<Vec<Folder>>>,
    /// Items directly in a project, keyed by project id
    pub project_items: IndexMap<String, Vec<ContentEntry>>,
    /// Mixed folder contents keyed by folder id
    pub folder_contents: IndexMap<String, Vec<ContentEntry>>,
    /// Named components keyed by project id
    pub components: IndexMap<String, Vec<FixtureComponent>>,
    /// Occurrence pages keyed by component version id
    pub occurrence_pages: IndexMap<String, Vec<Vec<OccurrenceRecord>>>,
}

/// [`HierarchyProvider`] serving a [`FixtureData`] document.
#[derive(Debug)]
pub struct FixtureProvider {
    data: FixtureData,
    calls: Mutex<IndexMap<&'static str, usize>>,
}

impl FixtureProvider {
    pub fn new(data: FixtureData) -> Self {
        Self {
            data,
            calls: Mutex::new(IndexMap::new()),
        }
    }

    /// Parse a fixture document.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: FixtureData = serde_json::from_str(json).context("parsing fixture")?;
        Ok(Self::new(data))
    }

    /// Load a fixture document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| HierarchyError::io(path, e))?;
        let provider = Self::from_json(&content)
            .with_context(|| format!("fixture {}", path.display()))?;
        tracing::debug!(
            "Loaded fixture {} ({} hubs)",
            path.display(),
            provider.data.hubs.len()
        );
        Ok(provider)
    }

    #[must_use]
    pub const fn data(&self) -> &FixtureData {
        &self.data
    }

    /// Number of calls made to one provider operation.
    #[must_use]
    pub fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    /// Number of calls made to any provider operation.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .sum()
    }

    fn record(&self, ctx: &RequestContext, operation: &'static str) -> Result<()> {
        ctx.check()?;
        *self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(operation)
            .or_insert(0) += 1;
        Ok(())
    }
}

/// Serve page `cursor` out of `pages`.
fn page_at<T: Clone>(
    operation: &str,
    pages: Option<&Vec<Vec<T>>>,
    cursor: Option<&str>,
) -> Result<Page<T>> {
    let index = match cursor {
        None => 0,
        Some(raw) => raw.parse::<usize>().map_err(|_| {
            HierarchyError::request_failed(operation, 400, format!("invalid cursor '{raw}'"))
        })?,
    };
    let Some(pages) = pages else {
        return Ok(Page::last(Vec::new()));
    };
    let Some(items) = pages.get(index) else {
        // An empty listing is served as one empty page.
        if index == 0 {
            return Ok(Page::last(Vec::new()));
        }
        return Err(HierarchyError::request_failed(
            operation,
            400,
            format!("cursor '{index}' is past the last page"),
        ));
    };
    if index + 1 < pages.len() {
        Ok(Page::with_cursor(items.clone(), (index + 1).to_string()))
    } else {
        Ok(Page::last(items.clone()))
    }
}

impl HierarchyProvider for FixtureProvider {
    fn name(&self) -> &'static str {
        "fixture"
    }

    fn list_hubs(&self, ctx: &RequestContext) -> Result<Vec<Hub>> {
        self.record(ctx, "list_hubs")?;
        Ok(self.data.hubs.clone())
    }

    fn list_projects(&self, ctx: &RequestContext, hub_id: &str) -> Result<Vec<Project>> {
        self.record(ctx, "list_projects")?;
        Ok(self.data.projects.get(hub_id).cloned().unwrap_or_default())
    }

    fn list_folders_page(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<Folder>> {
        self.record(ctx, "list_folders_page")?;
        page_at(
            "list folders",
            self.data.folder_pages.get(project_id),
            cursor,
        )
    }

    fn list_items_in_project(
        &self,
        ctx: &RequestContext,
        project_id: &str,
    ) -> Result<Vec<ContentEntry>> {
        self.record(ctx, "list_items_in_project")?;
        Ok(self
            .data
            .project_items
            .get(project_id)
            .cloned()
            .unwrap_or_default())
    }

    fn list_folder_contents(
        &self,
        ctx: &RequestContext,
        _hub_id: &str,
        folder_id: &str,
    ) -> Result<Vec<ContentEntry>> {
        self.record(ctx, "list_folder_contents")?;
        Ok(self
            .data
            .folder_contents
            .get(folder_id)
            .cloned()
            .unwrap_or_default())
    }

    fn resolve_project_ids(
        &self,
        ctx: &RequestContext,
        hub_name: &str,
        project_name: &str,
    ) -> Result<Vec<String>> {
        self.record(ctx, "resolve_project_ids")?;
        let ids = self
            .data
            .hubs
            .iter()
            .filter(|hub| hub.name.as_deref() == Some(hub_name))
            .filter_map(|hub| self.data.projects.get(&hub.id))
            .flatten()
            .filter(|project| project.name == project_name)
            .map(|project| project.id.clone())
            .collect();
        Ok(ids)
    }

    fn resolve_component_version_ids(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        component_name: &str,
    ) -> Result<Vec<String>> {
        self.record(ctx, "resolve_component_version_ids")?;
        let ids = self
            .data
            .components
            .get(project_id)
            .into_iter()
            .flatten()
            .filter(|c| c.name == component_name)
            .filter_map(|c| c.version_id.clone())
            .collect();
        Ok(ids)
    }

    fn fetch_occurrence_page(
        &self,
        ctx: &RequestContext,
        component_version_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<OccurrenceRecord>> {
        self.record(ctx, "fetch_occurrence_page")?;
        page_at(
            "fetch occurrences",
            self.data.occurrence_pages.get(component_version_id),
            cursor,
        )
    }
}
