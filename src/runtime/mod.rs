use std::env;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::api::{self, SpotifyClient};
use crate::app::App;
use crate::fetch::{FetchCmd, FetchEvent, Fetcher};

mod event_loop;
mod logging;
mod settings;


pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    if let Some(path) = logging::init_logging(&settings.logging) {
        tracing::info!(log = %path.display(), "cadence starting");
    }

    let arg = env::args()
        .nth(1)
        .ok_or("usage: cadence <playlist id | spotify URI | open.spotify.com link>")?;
    let playlist_id = api::parse_playlist_id(&arg)?;

    let client = SpotifyClient::new(&settings.api)?;

    let (events_tx, events_rx) = mpsc::channel::<FetchEvent>();
    let fetcher = Fetcher::new(Box::new(client), settings.fetch.clone(), events_tx);

    let mut app = App::new(&settings.ui);
    app.begin_load(playlist_id.clone());
    fetcher.send(FetchCmd::Load(playlist_id))?;

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &fetcher,
        &events_rx,
        &mut state,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // An in-flight load is not cancelled; the worker exits once it sees Quit.
    if app.is_loading() {
        drop(fetcher);
    } else {
        fetcher.join();
    }
    tracing::info!("cadence exiting");

    run_result
}
