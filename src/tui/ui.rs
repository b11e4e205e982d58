//! Rendering and main loop of the tree browser.

use super::app::BrowserApp;
use super::events::{handle_key_event, Event, EventHandler};
use crate::provider::HierarchyProvider;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io::{self, stdout};
use tui_tree_widget::Tree;

/// Minimum terminal size requirements.
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 8;

const KEY_HINTS: &[(&str, &str)] = &[
    ("↑↓", "move"),
    ("→/Enter", "expand"),
    ("←", "collapse"),
    ("Space", "toggle"),
    ("r", "reload"),
    ("q", "quit"),
];

/// Run the browser until the user quits.
pub fn run_browser<P: HierarchyProvider + ?Sized>(app: &mut BrowserApp<'_, P>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::default();
    let result = main_loop(&mut terminal, app, &events);

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn main_loop<P: HierarchyProvider + ?Sized>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut BrowserApp<'_, P>,
    events: &EventHandler,
) -> io::Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| render(frame, app))?;
        match events.next()? {
            Event::Key(key) => handle_key_event(app, key),
            Event::Resize(_, _) | Event::Tick => {}
        }
    }
    Ok(())
}

/// Main render function.
fn render<P: HierarchyProvider + ?Sized>(frame: &mut Frame, app: &mut BrowserApp<'_, P>) {
    let area = frame.area();
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_size_warning(frame, area);
        return;
    }

    let [header, body, status, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("model-hierarchy", Style::default().bold()),
            Span::raw(format!("  source: {}", app.provider_name())),
        ])),
        header,
    );

    let items = app.items();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Hubs ({} nodes loaded) ", app.loaded_count()));
    match Tree::new(&items) {
        Ok(tree) => {
            let tree = tree
                .block(block)
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");
            frame.render_stateful_widget(tree, body, &mut app.state);
        }
        Err(e) => frame.render_widget(Paragraph::new(e.to_string()).block(block), body),
    }

    let status_line = app.status.as_deref().unwrap_or("");
    frame.render_widget(
        Paragraph::new(status_line).style(Style::default().fg(Color::Yellow)),
        status,
    );

    let hints: Vec<Span> = KEY_HINTS
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(*key, Style::default().fg(Color::Cyan)),
                Span::raw(format!(" {action}  ")),
            ]
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(hints)), footer);
}

/// Render a "terminal too small" message.
fn render_size_warning(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::styled("Terminal too small", Style::default().fg(Color::Yellow).bold()),
        Line::from(format!(
            "{}x{} < {MIN_WIDTH}x{MIN_HEIGHT}",
            area.width, area.height
        )),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{AccessToken, FixtureProvider};
    use ratatui::backend::TestBackend;

    #[test]
    fn test_render_shows_hubs() {
        let provider = FixtureProvider::from_json(
            r#"{"hubs": [{"id": "H1", "name": "Hub One"}]}"#,
        )
        .unwrap();
        let mut app = BrowserApp::new(&provider, AccessToken::new("t"));
        app.load_root().unwrap();

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|frame| render(frame, &mut app)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("Hub One"));
        assert!(screen.contains("source: fixture"));
    }

    #[test]
    fn test_render_expanded_hub_then_move_down() {
        let provider = FixtureProvider::from_json(
            r#"{
                "hubs": [{"id": "H1", "name": "Hub One"}],
                "projects": {"H1": [{"id": "P1", "name": "Alpha"}]}
            }"#,
        )
        .unwrap();
        let mut app = BrowserApp::new(&provider, AccessToken::new("t"));
        app.load_root().unwrap();
        app.expand_selected();

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|frame| render(frame, &mut app)).unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Alpha"));
        assert!(!screen.contains(crate::tui::PLACEHOLDER_LABEL));

        // Navigation needs the layout of the previous frame
        app.state.key_down();
        assert_eq!(app.selected_node(), Some(crate::model::NodeId::project("H1", "P1")));
    }

    #[test]
    fn test_small_terminal_warning() {
        let provider = FixtureProvider::new(Default::default());
        let mut app = BrowserApp::new(&provider, AccessToken::new("t"));
        let mut terminal = Terminal::new(TestBackend::new(20, 4)).unwrap();
        terminal.draw(|frame| render(frame, &mut app)).unwrap();

        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(screen.contains("Terminal too small"));
    }
}
