//! Hierarchy command handler.
//!
//! Implements the `hierarchy` subcommand: resolve a component by name and
//! print its assembly tree.

use super::Session;
use crate::pipeline::{auto_detect_format, exit_codes, resolve_hierarchy, write_output, OutputTarget};
use crate::reports::create_reporter;
use anyhow::{Context, Result};

/// Names identifying one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyRequest {
    pub hub: String,
    pub project: String,
    pub component: String,
}

/// Run the hierarchy command.
///
/// Returns [`exit_codes::FALLBACK_USED`] when the component did not resolve
/// and the placeholder tree was printed.
pub fn run_hierarchy(session: &Session, request: &HierarchyRequest) -> Result<i32> {
    let provider = session.provider()?;
    let ctx = session.request_context();
    let options = session.config.hierarchy_options();

    let outcome = resolve_hierarchy(
        &provider,
        &ctx,
        &request.hub,
        &request.project,
        &request.component,
        &options,
    )
    .with_context(|| {
        format!(
            "Failed to retrieve hierarchy of '{}' in {}/{}",
            request.component, request.hub, request.project
        )
    })?;

    let target = OutputTarget::from_option(session.config.output.file.clone());
    let format = auto_detect_format(session.config.output.format, &target);
    let report = create_reporter(format)
        .generate_hierarchy_report(&outcome)
        .context("Failed to render hierarchy")?;
    write_output(&report, &target, session.quiet)?;

    if outcome.hierarchy.is_fallback() {
        return Ok(exit_codes::FALLBACK_USED);
    }
    Ok(exit_codes::SUCCESS)
}
