use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, PlaybackStatus, UiEvent};
use crate::config::Settings;
use crate::mpris::ControlCmd;
use crate::ui;

use super::session::PlaybackSession;

/// Main terminal event loop: syncs the app from the bridge, refreshes the
/// media session on change, draws, and dispatches input. Returns `Ok(())`
/// when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &Settings,
    app: &mut App,
    session: &PlaybackSession,
    control_rx: &Receiver<ControlCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_media_index: Option<usize> = None;
    let mut last_media_status = app.status();

    loop {
        app.sync();

        // Refresh the media session even when changes come from media keys
        // or auto-advance rather than our own keys.
        if app.current_index != last_media_index || app.status() != last_media_status {
            session.media().set_now_playing(app.current_item());
            session.media().set_playback(app.status());
            last_media_index = app.current_index;
            last_media_status = app.status();
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, session) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, app, session) {
                    return Ok(());
                }
            }
        }
    }
}

fn submit(app: &App, session: &PlaybackSession, event: UiEvent) {
    if let Some(intent) = app.intent_for(event) {
        session.bridge().submit(intent);
    }
}

/// Returns true when the command asks the application to exit.
fn handle_control_cmd(cmd: ControlCmd, app: &App, session: &PlaybackSession) -> bool {
    let event = match cmd {
        ControlCmd::Quit => return true,
        // Play/Pause are one-directional; only toggle when they would change
        // something.
        ControlCmd::Play => {
            if app.status() == PlaybackStatus::Playing {
                return false;
            }
            UiEvent::PlayPause
        }
        ControlCmd::Pause => {
            if app.status() != PlaybackStatus::Playing {
                return false;
            }
            UiEvent::PlayPause
        }
        ControlCmd::PlayPause => UiEvent::PlayPause,
        ControlCmd::Stop => UiEvent::Stop,
        ControlCmd::Next => UiEvent::SkipNext,
        ControlCmd::SeekBack => UiEvent::SeekBack,
        ControlCmd::SeekForward => UiEvent::SeekForward,
    };

    submit(app, session, event);
    false
}

/// Returns true when the key asks the application to exit.
fn handle_key_event(key: KeyEvent, app: &mut App, session: &PlaybackSession) -> bool {
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Enter => {
            if app.has_items() {
                submit(app, session, UiEvent::ItemTapped(app.selected));
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => submit(app, session, UiEvent::PlayPause),
        KeyCode::Char('n') => submit(app, session, UiEvent::SkipNext),
        KeyCode::Char('h') => submit(app, session, UiEvent::SeekBack),
        KeyCode::Char('l') => submit(app, session, UiEvent::SeekForward),
        KeyCode::Char('s') => submit(app, session, UiEvent::Stop),
        KeyCode::Char('x') => app.dismiss_notice(),
        _ => {}
    }

    false
}
