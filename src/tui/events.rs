//! Event handling for the tree browser.

use super::app::BrowserApp;
use crate::provider::HierarchyProvider;
use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

/// Terminal events.
#[allow(dead_code)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
}

/// Event handler polling the terminal on a background thread.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
    _tx: mpsc::Sender<Event>,
}

impl Default for EventHandler {
    fn default() -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(250);

        let event_tx = tx.clone();
        thread::spawn(move || loop {
            let sent = if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(CrosstermEvent::Key(key)) => event_tx.send(Event::Key(key)),
                    Ok(CrosstermEvent::Resize(w, h)) => event_tx.send(Event::Resize(w, h)),
                    _ => Ok(()),
                }
            } else {
                event_tx.send(Event::Tick)
            };
            if sent.is_err() {
                break;
            }
        });

        Self { rx, _tx: tx }
    }
}

impl EventHandler {
    pub fn next(&self) -> io::Result<Event> {
        self.rx.recv().map_err(io::Error::other)
    }
}

/// Handle a key press.
pub fn handle_key_event<P: HierarchyProvider + ?Sized>(app: &mut BrowserApp<'_, P>, key: KeyEvent) {
    // Windows reports releases too
    if key.kind != KeyEventKind::Press {
        return;
    }
    app.clear_status();

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => {
            app.state.key_up();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.state.key_down();
        }
        KeyCode::Home | KeyCode::Char('g') => {
            app.state.select_first();
        }
        KeyCode::End | KeyCode::Char('G') => {
            app.state.select_last();
        }
        KeyCode::Left | KeyCode::Char('h') => app.collapse_selected(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Enter => app.expand_selected(),
        KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Char('r') => app.reload_selected(),
        _ => {}
    }
}
