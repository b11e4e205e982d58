//! Live provider speaking the hub/project GraphQL API.
//!
//! Hubs, folders and items are served by the data endpoint; projects, name
//! resolution and assembly occurrences by the manufacturing endpoint.

mod client;
mod queries;
mod response;

pub use client::{Endpoint, GraphQlClient, GraphQlConfig};

use self::response::{
    ComponentVersionIdsData, FolderItemsData, FoldersData, HubsData, OccurrencesData,
    ProjectIdsData, ProjectItemsData, ProjectsData, Results,
};
use super::{HierarchyProvider, RequestContext};
use crate::error::{ErrorContext, OptionContext, Result};
use crate::model::{ContentEntry, Folder, Hub, OccurrenceRecord, Page, Project};
use serde_json::json;

/// [`HierarchyProvider`] backed by [`GraphQlClient`].
pub struct GraphQlProvider {
    client: GraphQlClient,
}

impl GraphQlProvider {
    pub fn new(config: GraphQlConfig) -> Result<Self> {
        Ok(Self {
            client: GraphQlClient::new(config)?,
        })
    }

    #[must_use]
    pub const fn client(&self) -> &GraphQlClient {
        &self.client
    }
}

fn flatten<T, U: From<T>>(results: Option<Results<T>>) -> Vec<U> {
    results
        .map(Results::into_vec)
        .unwrap_or_default()
        .into_iter()
        .map(U::from)
        .collect()
}

impl HierarchyProvider for GraphQlProvider {
    fn name(&self) -> &'static str {
        "GraphQL"
    }

    fn list_hubs(&self, ctx: &RequestContext) -> Result<Vec<Hub>> {
        let data: HubsData =
            self.client
                .execute(ctx, Endpoint::Data, "list hubs", queries::HUBS, json!({}))?;
        Ok(data
            .hubs
            .map(Results::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|h| Hub {
                id: h.id,
                name: h.name,
            })
            .collect())
    }

    fn list_projects(&self, ctx: &RequestContext, hub_id: &str) -> Result<Vec<Project>> {
        let data: ProjectsData = self.client.execute(
            ctx,
            Endpoint::Manufacturing,
            "list projects",
            queries::PROJECTS,
            json!({ "hubId": hub_id }),
        )?;
        Ok(data
            .projects
            .map(Results::into_vec)
            .unwrap_or_default()
            .into_iter()
            .map(|p| Project {
                id: p.id,
                name: p.name.unwrap_or_default(),
            })
            .collect())
    }

    fn list_folders_page(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<Folder>> {
        let data: FoldersData = self.client.execute(
            ctx,
            Endpoint::Data,
            "list folders",
            queries::FOLDERS_BY_PROJECT,
            json!({ "projectId": project_id, "cursor": cursor }),
        )?;
        let Some(paged) = data.folders_by_project else {
            return Ok(Page::last(Vec::new()));
        };
        let next_cursor = paged.cursor();
        Ok(Page {
            items: paged
                .results
                .unwrap_or_default()
                .into_iter()
                .map(Folder::from)
                .collect(),
            next_cursor,
        })
    }

    fn list_items_in_project(
        &self,
        ctx: &RequestContext,
        project_id: &str,
    ) -> Result<Vec<ContentEntry>> {
        let data: ProjectItemsData = self.client.execute(
            ctx,
            Endpoint::Data,
            "list project items",
            queries::ITEMS_BY_PROJECT,
            json!({ "projectId": project_id }),
        )?;
        Ok(flatten(data.items_by_project))
    }

    fn list_folder_contents(
        &self,
        ctx: &RequestContext,
        hub_id: &str,
        folder_id: &str,
    ) -> Result<Vec<ContentEntry>> {
        let data: FolderItemsData = self.client.execute(
            ctx,
            Endpoint::Data,
            "list folder contents",
            queries::ITEMS_BY_FOLDER,
            json!({ "hubId": hub_id, "folderId": folder_id }),
        )?;
        Ok(flatten(data.items_by_folder))
    }

    fn resolve_project_ids(
        &self,
        ctx: &RequestContext,
        hub_name: &str,
        project_name: &str,
    ) -> Result<Vec<String>> {
        let data: ProjectIdsData = self
            .client
            .execute(
                ctx,
                Endpoint::Manufacturing,
                "resolve project",
                queries::PROJECT_IDS,
                json!({ "hubName": hub_name, "projectName": project_name }),
            )
            .with_context(|| format!("project '{project_name}' in hub '{hub_name}'"))?;
        Ok(data
            .hubs
            .map(Results::into_vec)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|hub| hub.projects)
            .flat_map(Results::into_vec)
            .map(|p| p.id)
            .collect())
    }

    fn resolve_component_version_ids(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        component_name: &str,
    ) -> Result<Vec<String>> {
        let data: ComponentVersionIdsData = self
            .client
            .execute(
                ctx,
                Endpoint::Manufacturing,
                "resolve component",
                queries::COMPONENT_VERSION_IDS,
                json!({ "projectId": project_id, "componentName": component_name }),
            )
            .with_context(|| format!("component '{component_name}'"))?;
        Ok(data
            .project
            .and_then(|p| p.items)
            .map(Results::into_vec)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| item.tip_root_component_version)
            .map(|v| v.id)
            .collect())
    }

    fn fetch_occurrence_page(
        &self,
        ctx: &RequestContext,
        component_version_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<OccurrenceRecord>> {
        let data: OccurrencesData = self.client.execute(
            ctx,
            Endpoint::Manufacturing,
            "fetch occurrences",
            queries::OCCURRENCES,
            json!({ "componentVersionId": component_version_id, "cursor": cursor }),
        )?;
        let version = data
            .component_version
            .context_none(format!("componentVersion '{component_version_id}'"))?;
        let Some(paged) = version.all_occurrences else {
            return Ok(Page::last(Vec::new()));
        };
        let next_cursor = paged.cursor();
        Ok(Page {
            items: paged
                .results
                .unwrap_or_default()
                .into_iter()
                .map(OccurrenceRecord::from)
                .collect(),
            next_cursor,
        })
    }
}
