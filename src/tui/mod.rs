//! Interactive terminal browser using ratatui.
//!
//! Shows the hub → project → folder → item tree and fetches one level per
//! opened node through the lazy tree expander.

mod app;
mod events;
mod ui;

pub use app::{BrowserApp, PLACEHOLDER_LABEL};
pub use events::{handle_key_event, Event, EventHandler};
pub use ui::run_browser;
