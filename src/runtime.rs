//! Runtime wiring: load settings, scan the catalog, bring up the playback
//! session and drive the terminal event loop.

use std::env;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::App;
use crate::bridge::PlaybackBridge;
use crate::catalog::scan;
use crate::engine::{EngineTuning, RodioEngine};
use crate::mpris::ControlCmd;

mod event_loop;
mod session;
mod settings;

use session::PlaybackSession;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let dir = env::args().nth(1).unwrap_or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| "Music".to_string())
    });

    // The catalog is loaded exactly once per session start.
    let items = scan(Path::new(&dir), &settings.library);
    let mut app = App::new(items);

    let tuning = EngineTuning {
        seek_back: Duration::from_millis(settings.playback.seek_back_ms),
        seek_forward: Duration::from_millis(settings.playback.seek_forward_ms),
    };

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let media = crate::mpris::spawn_mpris(control_tx);

    let bridge = PlaybackBridge::spawn(move |listener| Box::new(RodioEngine::spawn(listener, tuning)));
    let session = PlaybackSession::new(bridge, media);

    app.set_snapshot_handle(session.bridge().observe());

    // Present the catalog to the engine, prepared but not started.
    if app.has_items() {
        session.bridge().load_queue(app.queue_entries());
    }

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // If the loop unwinds, dropping `session` still runs the full teardown.
    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &session, &control_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    session.shutdown();

    run_result
}
