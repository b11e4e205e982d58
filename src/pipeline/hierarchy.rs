//! Named-component hierarchy retrieval:
//! resolve project → resolve component version → paginate → build → render.

use crate::error::{ErrorContext, HierarchyError, ProtocolErrorKind, Result};
use crate::hierarchy::{
    parse_indented, render_text, root_line, BuildStats, OccurrencePaginator, OrphanPolicy,
    OutlineNode, PaginationStats, TreeBuilder, DEFAULT_MAX_PAGES, INDENT_WIDTH,
};
use crate::model::ComponentNode;
use crate::provider::{HierarchyProvider, RequestContext};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How to pick one id when a name resolves to several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionPolicy {
    /// Take the first match in provider order
    #[default]
    FirstMatch,
    /// Reject names that match more than once
    Unique,
}

impl ResolutionPolicy {
    /// Pick one id out of `matches`; `None` when there are none.
    pub fn select(
        self,
        what: &'static str,
        name: &str,
        mut matches: Vec<String>,
    ) -> Result<Option<String>> {
        if self == Self::Unique && matches.len() > 1 {
            return Err(HierarchyError::protocol(
                format!("resolving {what}"),
                ProtocolErrorKind::AmbiguousMatch {
                    what,
                    name: name.to_string(),
                    count: matches.len(),
                },
            ));
        }
        if matches.len() > 1 {
            tracing::debug!("{} {what}s named '{name}', using the first", matches.len());
        }
        Ok(if matches.is_empty() {
            None
        } else {
            Some(matches.swap_remove(0))
        })
    }
}

/// Result of a hierarchy request as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHierarchy {
    /// `None` when the component name did not resolve
    pub component_version_id: Option<String>,
    pub hierarchy_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outline: Option<OutlineNode>,
}

impl ComponentHierarchy {
    /// Placeholder returned for a component that could not be resolved.
    #[must_use]
    pub fn fallback(component_name: &str) -> Self {
        Self {
            component_version_id: None,
            hierarchy_text: format!("{}\n", root_line(component_name)),
            outline: None,
        }
    }

    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.component_version_id.is_none()
    }

    /// Attach the outline parsed from the hierarchy text.
    #[must_use]
    pub fn with_outline(mut self) -> Self {
        self.outline = parse_indented(&self.hierarchy_text, INDENT_WIDTH)
            .into_iter()
            .next();
        self
    }
}

/// Everything produced while answering one hierarchy request.
#[derive(Debug, Clone)]
pub struct HierarchyOutcome {
    pub hierarchy: ComponentHierarchy,
    /// The built tree; a lone root for the fallback
    pub tree: ComponentNode,
    pub pagination: Option<PaginationStats>,
    pub build: Option<BuildStats>,
}

/// Knobs for hierarchy retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyOptions {
    pub max_pages: usize,
    pub orphans: OrphanPolicy,
    pub resolution: ResolutionPolicy,
}

impl Default for HierarchyOptions {
    fn default() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            orphans: OrphanPolicy::default(),
            resolution: ResolutionPolicy::default(),
        }
    }
}

/// Retrieve the hierarchy text of one named component.
///
/// An unknown project is an error. An unknown component is not: it yields
/// `{componentVersionId: null, hierarchyText: "Root (<component>)\n"}`.
pub fn get_component_hierarchy<P: HierarchyProvider + ?Sized>(
    provider: &P,
    ctx: &RequestContext,
    hub_name: &str,
    project_name: &str,
    component_name: &str,
    options: &HierarchyOptions,
) -> Result<ComponentHierarchy> {
    resolve_hierarchy(provider, ctx, hub_name, project_name, component_name, options)
        .map(|outcome| outcome.hierarchy)
}

/// Like [`get_component_hierarchy`], keeping the tree and statistics.
pub fn resolve_hierarchy<P: HierarchyProvider + ?Sized>(
    provider: &P,
    ctx: &RequestContext,
    hub_name: &str,
    project_name: &str,
    component_name: &str,
    options: &HierarchyOptions,
) -> Result<HierarchyOutcome> {
    let project_matches = provider.resolve_project_ids(ctx, hub_name, project_name)?;
    let project_id = options
        .resolution
        .select("project", project_name, project_matches)?
        .ok_or_else(|| HierarchyError::NotFound {
            what: "project",
            name: format!("{project_name} (hub {hub_name})"),
        })?;
    tracing::debug!("Project '{project_name}' resolved to {project_id}");

    let component_matches =
        provider.resolve_component_version_ids(ctx, &project_id, component_name)?;
    let Some(version_id) =
        options
            .resolution
            .select("component", component_name, component_matches)?
    else {
        tracing::warn!(
            "Component '{component_name}' not found in project '{project_name}', returning an empty hierarchy"
        );
        return Ok(HierarchyOutcome {
            hierarchy: ComponentHierarchy::fallback(component_name),
            tree: ComponentNode::new("", component_name),
            pagination: None,
            build: None,
        });
    };
    tracing::debug!("Component '{component_name}' resolved to {version_id}");

    let (records, pagination) = OccurrencePaginator::new(provider)
        .with_max_pages(options.max_pages)
        .fetch_all_with_stats(ctx, &version_id)
        .with_context(|| format!("hierarchy for '{component_name}'"))?;

    let (tree, build) = TreeBuilder::new()
        .with_orphan_policy(options.orphans)
        .build(&version_id, component_name, &records)
        .with_context(|| format!("hierarchy for '{component_name}'"))?;
    build.log_summary();

    Ok(HierarchyOutcome {
        hierarchy: ComponentHierarchy {
            component_version_id: Some(version_id),
            hierarchy_text: render_text(&tree),
            outline: None,
        },
        tree,
        pagination: Some(pagination),
        build: Some(build),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_policy() {
        let picked = ResolutionPolicy::FirstMatch
            .select("project", "Alpha", vec!["P1".into(), "P2".into()])
            .unwrap();
        assert_eq!(picked.as_deref(), Some("P1"));
        assert_eq!(
            ResolutionPolicy::FirstMatch
                .select("project", "Alpha", vec![])
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_unique_policy() {
        let err = ResolutionPolicy::Unique
            .select("component", "Widget", vec!["a".into(), "b".into()])
            .unwrap_err();
        assert_eq!(
            err.protocol_kind(),
            Some(&ProtocolErrorKind::AmbiguousMatch {
                what: "component",
                name: "Widget".into(),
                count: 2
            })
        );
        assert_eq!(
            ResolutionPolicy::Unique
                .select("component", "Widget", vec!["a".into()])
                .unwrap()
                .as_deref(),
            Some("a")
        );
    }

    #[test]
    fn test_fallback_shape() {
        let fallback = ComponentHierarchy::fallback("Widget");
        assert!(fallback.is_fallback());
        assert_eq!(
            serde_json::to_value(&fallback).unwrap(),
            serde_json::json!({"componentVersionId": null, "hierarchyText": "Root (Widget)\n"})
        );
    }

    #[test]
    fn test_with_outline() {
        let hierarchy = ComponentHierarchy {
            component_version_id: Some("CV1".into()),
            hierarchy_text: "Root (W)\n     A\n".into(),
            outline: None,
        }
        .with_outline();
        let outline = hierarchy.outline.unwrap();
        assert_eq!(outline.text, "Root (W)");
        assert_eq!(outline.children[0].text, "A");
    }
}
