//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`. All
//! state comes in through `App`; nothing here talks to the bridge.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::app::{App, PlaybackStatus};
use crate::config::UiSettings;

const CONTROLS_TEXT: &str = "[j/k] up/down | [enter] play selected | [space/p] play/pause | \
                             [n] next | [h/l] rewind/fast-forward | [s] stop | \
                             [x] dismiss error | [q] quit";

/// Render one frame.
pub fn draw(f: &mut Frame, app: &App, ui: &UiSettings) {
    let mut constraints = vec![
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(5),
    ];
    if app.notice.is_some() {
        constraints.push(Constraint::Length(3));
    }
    if ui.show_controls_help {
        constraints.push(Constraint::Length(3));
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    draw_header(f, chunks[0], ui);
    draw_item_list(f, chunks[1], app);
    draw_now_playing(f, chunks[2], app);

    let mut next = 3;
    if app.notice.is_some() {
        draw_notice(f, chunks[next], app);
        next += 1;
    }
    if ui.show_controls_help {
        draw_controls(f, chunks[next]);
    }
}

fn draw_header(f: &mut Frame, area: Rect, ui: &UiSettings) {
    let header = Paragraph::new(ui.header_text.clone())
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_item_list(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Library ({}) ", app.items.len()));

    if !app.has_items() {
        let empty = Paragraph::new("No audio files found. Point vivace at a folder with music.")
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(block.padding(Padding::vertical(1)));
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let marker = if app.current_index == Some(i) {
                "▶ "
            } else {
                "  "
            };
            let mut line = ListItem::new(format!("{marker}{}", item.list_label()));
            if app.current_index == Some(i) {
                line = line.style(Style::default().add_modifier(Modifier::BOLD));
            }
            line
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_now_playing(f: &mut Frame, area: Rect, app: &App) {
    let status = match (app.is_buffering, app.status()) {
        (true, _) => "Buffering",
        (false, PlaybackStatus::Playing) => "Playing",
        (false, PlaybackStatus::Paused) => "Paused",
        (false, PlaybackStatus::Stopped) => "Stopped",
    };

    let title = app
        .current_item()
        .map(|item| item.list_label())
        .unwrap_or_else(|| "-".to_string());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {status} "));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let song = Paragraph::new(format!("Song: {title}"));
    f.render_widget(song, rows[0]);

    let label = format!(
        "{} / {}",
        app.progress_label,
        App::format_timestamp(app.duration)
    );
    let gauge = Gauge::default()
        .ratio(f64::from(app.progress_percent / 100.0).clamp(0.0, 1.0))
        .label(label);
    f.render_widget(gauge, rows[1]);
}

fn draw_notice(f: &mut Frame, area: Rect, app: &App) {
    let message = app.notice.as_deref().unwrap_or_default();
    let notice = Paragraph::new(format!("{message}  [x] dismiss"))
        .style(Style::default().red())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Error "));
    f.render_widget(notice, area);
}

fn draw_controls(f: &mut Frame, area: Rect) {
    let controls = Paragraph::new(CONTROLS_TEXT)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(controls, area);
}
