//! Browse command handler.
//!
//! Implements the `browse` subcommand: the interactive tree browser.

use super::Session;
use crate::pipeline::exit_codes;
use crate::tui::{run_browser, BrowserApp};
use anyhow::{Context, Result};

/// Run the browse command.
pub fn run_browse(session: &Session) -> Result<i32> {
    let provider = session.provider()?;
    let mut app = BrowserApp::new(&provider, session.token.clone())
        .with_max_pages(session.config.pagination.max_pages)
        .with_expansion_timeout(session.config.pagination.deadline());

    // Fail before taking over the terminal
    app.load_root().context("Failed to list hubs")?;
    run_browser(&mut app).context("Terminal error")?;

    Ok(exit_codes::SUCCESS)
}
