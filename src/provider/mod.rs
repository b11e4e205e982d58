//! Remote hierarchy providers.
//!
//! The aggregation core only talks to a [`HierarchyProvider`]. Two
//! implementations ship with the crate:
//!
//! - [`GraphQlProvider`] (feature `graphql`): the live GraphQL-over-HTTPS API
//! - [`FixtureProvider`]: an offline JSON document, used by tests and `--fixture`

mod context;
mod fixture;
#[cfg(feature = "graphql")]
pub mod graphql;

pub use context::{AccessToken, CancelFlag, RequestContext};
pub use fixture::{FixtureComponent, FixtureData, FixtureProvider};
#[cfg(feature = "graphql")]
pub use graphql::{GraphQlConfig, GraphQlProvider};

use crate::error::Result;
use crate::model::{ContentEntry, Folder, Hub, OccurrenceRecord, Page, Project};

/// Capability the aggregation core requires from a remote hierarchy source.
///
/// Every call receives the caller's [`RequestContext`]; implementations must
/// authenticate with its token and should honor its deadline and cancel flag.
///
/// # Example
///
/// ```ignore
/// use model_hierarchy::provider::{FixtureProvider, HierarchyProvider, RequestContext};
///
/// let provider: Box<dyn HierarchyProvider> = if let Some(path) = fixture {
///     Box::new(FixtureProvider::load(path)?)
/// } else {
///     Box::new(GraphQlProvider::new(graphql_config)?)
/// };
///
/// let hubs = provider.list_hubs(&ctx)?;
/// ```
pub trait HierarchyProvider: Send + Sync {
    /// Short name used in log lines (e.g. "GraphQL", "fixture").
    fn name(&self) -> &'static str;

    fn list_hubs(&self, ctx: &RequestContext) -> Result<Vec<Hub>>;

    fn list_projects(&self, ctx: &RequestContext, hub_id: &str) -> Result<Vec<Project>>;

    /// One page of top-level folders; the caller follows `next_cursor`.
    fn list_folders_page(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<Folder>>;

    fn list_items_in_project(
        &self,
        ctx: &RequestContext,
        project_id: &str,
    ) -> Result<Vec<ContentEntry>>;

    /// Mixed folder contents; sub-folders carry the `Folder` type name.
    fn list_folder_contents(
        &self,
        ctx: &RequestContext,
        hub_id: &str,
        folder_id: &str,
    ) -> Result<Vec<ContentEntry>>;

    /// Ids of every project named `project_name` in hubs named `hub_name`,
    /// in provider order.
    fn resolve_project_ids(
        &self,
        ctx: &RequestContext,
        hub_name: &str,
        project_name: &str,
    ) -> Result<Vec<String>>;

    /// Tip root component version ids of the items named `component_name`.
    fn resolve_component_version_ids(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        component_name: &str,
    ) -> Result<Vec<String>>;

    /// One page of the flattened occurrence list below a component version.
    fn fetch_occurrence_page(
        &self,
        ctx: &RequestContext,
        component_version_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<OccurrenceRecord>>;
}

impl<P: HierarchyProvider + ?Sized> HierarchyProvider for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn list_hubs(&self, ctx: &RequestContext) -> Result<Vec<Hub>> {
        (**self).list_hubs(ctx)
    }

    fn list_projects(&self, ctx: &RequestContext, hub_id: &str) -> Result<Vec<Project>> {
        (**self).list_projects(ctx, hub_id)
    }

    fn list_folders_page(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<Folder>> {
        (**self).list_folders_page(ctx, project_id, cursor)
    }

    fn list_items_in_project(
        &self,
        ctx: &RequestContext,
        project_id: &str,
    ) -> Result<Vec<ContentEntry>> {
        (**self).list_items_in_project(ctx, project_id)
    }

    fn list_folder_contents(
        &self,
        ctx: &RequestContext,
        hub_id: &str,
        folder_id: &str,
    ) -> Result<Vec<ContentEntry>> {
        (**self).list_folder_contents(ctx, hub_id, folder_id)
    }

    fn resolve_project_ids(
        &self,
        ctx: &RequestContext,
        hub_name: &str,
        project_name: &str,
    ) -> Result<Vec<String>> {
        (**self).resolve_project_ids(ctx, hub_name, project_name)
    }

    fn resolve_component_version_ids(
        &self,
        ctx: &RequestContext,
        project_id: &str,
        component_name: &str,
    ) -> Result<Vec<String>> {
        (**self).resolve_component_version_ids(ctx, project_id, component_name)
    }

    fn fetch_occurrence_page(
        &self,
        ctx: &RequestContext,
        component_version_id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<OccurrenceRecord>> {
        (**self).fetch_occurrence_page(ctx, component_version_id, cursor)
    }
}
