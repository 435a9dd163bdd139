use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::config;
use crate::fetch::{FetchCmd, FetchEvent, Fetcher};
use crate::playlist::SortKey;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// Main terminal event loop: folds fetch events into the app, draws, and
/// handles input. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    fetcher: &Fetcher,
    events_rx: &mpsc::Receiver<FetchEvent>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        while let Ok(ev) = events_rx.try_recv() {
            app.apply(ev);
        }

        let display = app.display_indices();
        terminal.draw(|f| ui::draw(f, app, &display, &settings.ui))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, fetcher, state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Apply one key press. Returns `true` when the app should quit.
pub(super) fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    fetcher: &Fetcher,
    state: &mut EventLoopState,
) -> bool {
    if app.filter_mode {
        state.pending_gg = false;
        match key.code {
            KeyCode::Esc => app.clear_filter(),
            KeyCode::Backspace => app.pop_filter_char(),
            KeyCode::Char('j') | KeyCode::Char('n')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                app.next()
            }
            KeyCode::Char('k') | KeyCode::Char('p')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                app.prev()
            }
            KeyCode::Char(c) => {
                if !c.is_control() {
                    app.push_filter_char(c);
                }
            }
            KeyCode::Enter => app.exit_filter_mode(),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            state.pending_gg = false;
            return true;
        }
        KeyCode::Char('/') => {
            state.pending_gg = false;
            app.enter_filter_mode();
        }
        KeyCode::Char('s') => {
            state.pending_gg = false;
            app.cycle_sort();
        }
        KeyCode::Char(c @ '0'..='9') => {
            state.pending_gg = false;
            let picked = c.to_digit(10).and_then(|d| SortKey::from_index(d as usize));
            if let Some(key) = picked {
                app.set_sort(key);
            }
        }
        KeyCode::Char('r') => {
            state.pending_gg = false;
            // Loads cannot be cancelled; events from a running one would mix in.
            if app.is_loading() {
                return false;
            }
            if let Some(id) = app.playlist_id.clone() {
                app.begin_load(id.clone());
                if fetcher.send(FetchCmd::Load(id)).is_err() {
                    tracing::error!("fetch worker is gone, cannot reload");
                    app.apply(FetchEvent::Failed("fetch worker stopped".to_string()));
                }
            }
        }
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            state.pending_gg = false;
            app.last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.pending_gg = false;
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.pending_gg = false;
            app.prev();
        }
        KeyCode::Char('K') => {
            state.pending_gg = false;
            app.toggle_details_window();
        }
        KeyCode::Char(_) => {
            // g pending should clear on any other printable char
            state.pending_gg = false;
        }
        _ => {}
    }

    false
}
