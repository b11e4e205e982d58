//! Expand command handler.
//!
//! Implements the `expand` subcommand: print one level of the hub, project,
//! folder and item tree.

use super::Session;
use crate::browse::TreeExpander;
use crate::model::NodeId;
use crate::pipeline::{auto_detect_format, exit_codes, write_output, OutputTarget};
use crate::reports::create_reporter;
use anyhow::{Context, Result};

/// Run the expand command for `node_id` (`#` for the top level).
pub fn run_expand(session: &Session, node_id: &str) -> Result<i32> {
    // Decode before touching the provider so a bad id never costs a request
    let node = NodeId::decode(node_id)?;
    let provider = session.provider()?;
    let ctx = session.request_context();

    let children = TreeExpander::new(&provider)
        .with_max_pages(session.config.pagination.max_pages)
        .children(&ctx, &node)?;
    tracing::info!("{node}: {} children", children.len());

    let target = OutputTarget::from_option(session.config.output.file.clone());
    let format = auto_detect_format(session.config.output.format, &target);
    let report = create_reporter(format)
        .generate_expansion_report(&node, &children)
        .context("Failed to render expansion")?;
    write_output(&report, &target, session.quiet)?;

    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::test_support::session;
    use crate::pipeline::exit_code_for;
    use crate::reports::ReportFormat;

    #[test]
    fn test_expand_root_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("root.json");
        let code = run_expand(&session(out.clone(), ReportFormat::Json), "#").unwrap();
        assert_eq!(code, exit_codes::SUCCESS);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(value[0]["id"], "hub_H1");
        assert_eq!(value[0]["parent"], "#");
        assert_eq!(value[1]["text"], "Unnamed Hub");
    }

    #[test]
    fn test_expand_project_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("project.txt");
        run_expand(&session(out.clone(), ReportFormat::Text), "project_H1_P1").unwrap();

        let text = std::fs::read_to_string(out).unwrap();
        let ids: Vec<&str> = text
            .lines()
            .map(|line| line.split('\t').nth(2).unwrap())
            .collect();
        assert_eq!(ids, vec!["item_I1", "folder_H1_F1", "folder_H1_F9"]);
    }

    #[test]
    fn test_expand_client_errors() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path().join("x"), ReportFormat::Json);

        let malformed = run_expand(&session, "widget_42").unwrap_err();
        assert_eq!(exit_code_for(&malformed), exit_codes::CLIENT_ERROR);

        let leaf = run_expand(&session, "item_I1").unwrap_err();
        assert_eq!(exit_code_for(&leaf), exit_codes::CLIENT_ERROR);
    }
}
