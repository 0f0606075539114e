use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::bridge::{PlaybackIntent, PlaybackSnapshot};
use crate::catalog::AudioItem;

use super::*;

fn item(id: u64, title: &str) -> AudioItem {
    AudioItem {
        id,
        title: title.into(),
        artist: Some("Artist".into()),
        display_name: format!("{title}.mp3"),
        path: format!("/tmp/{title}.mp3").into(),
        source: format!("file:///tmp/{title}.mp3"),
        duration: Duration::from_secs(300),
    }
}

#[test]
fn progress_percent_is_zero_for_unknown_duration() {
    assert_eq!(
        App::progress_percent(Duration::from_secs(42), Duration::ZERO),
        0.0
    );
    assert_eq!(App::progress_percent(Duration::ZERO, Duration::ZERO), 0.0);
}

#[test]
fn progress_percent_scales_and_clamps() {
    let d = Duration::from_secs(300);
    assert_eq!(App::progress_percent(Duration::from_secs(150), d), 50.0);
    assert_eq!(App::progress_percent(Duration::ZERO, d), 0.0);
    assert_eq!(App::progress_percent(Duration::from_secs(400), d), 100.0);
}

#[test]
fn format_timestamp_is_zero_padded_minutes_seconds() {
    assert_eq!(
        App::format_timestamp(Duration::from_millis(125_000)),
        "02:05"
    );
    assert_eq!(App::format_timestamp(Duration::ZERO), "00:00");
}

#[test]
fn format_timestamp_wraps_past_an_hour() {
    // No hours component; minutes keep counting.
    assert_eq!(
        App::format_timestamp(Duration::from_millis(3_725_000)),
        "62:05"
    );
}

#[test]
fn percent_seek_converts_with_the_last_known_duration() {
    let mut app = App::new(vec![item(0, "a")]);
    app.duration = Duration::from_secs(300);

    assert_eq!(
        app.intent_for(UiEvent::SeekToPercent(50.0)),
        Some(PlaybackIntent::SeekTo(Duration::from_secs(150)))
    );
    // Out-of-range drags clamp instead of failing.
    assert_eq!(
        app.intent_for(UiEvent::SeekToPercent(150.0)),
        Some(PlaybackIntent::SeekTo(Duration::from_secs(300)))
    );
}

#[test]
fn percent_seek_without_a_duration_maps_to_nothing() {
    let app = App::new(vec![item(0, "a")]);
    assert_eq!(app.intent_for(UiEvent::SeekToPercent(50.0)), None);
}

#[test]
fn tap_and_transport_events_map_to_their_intents() {
    let app = App::new(vec![item(0, "a"), item(1, "b")]);
    assert_eq!(
        app.intent_for(UiEvent::ItemTapped(1)),
        Some(PlaybackIntent::SelectItem(1))
    );
    assert_eq!(
        app.intent_for(UiEvent::PlayPause),
        Some(PlaybackIntent::PlayPause)
    );
    assert_eq!(
        app.intent_for(UiEvent::SkipNext),
        Some(PlaybackIntent::SkipNext)
    );
    assert_eq!(app.intent_for(UiEvent::Stop), Some(PlaybackIntent::Stop));
}

#[test]
fn sync_derives_fields_from_the_snapshot() {
    let mut app = App::new(vec![item(0, "a"), item(1, "b")]);
    let handle = Arc::new(Mutex::new(PlaybackSnapshot {
        is_playing: true,
        is_buffering: false,
        current_index: Some(1),
        duration: Duration::from_secs(300),
        position: Duration::from_millis(125_000),
        error: None,
    }));
    app.set_snapshot_handle(handle);

    app.sync();

    assert!(app.is_playing);
    assert_eq!(app.current_item().map(|i| i.title.as_str()), Some("b"));
    assert!((app.progress_percent - 41.666_668).abs() < 0.01);
    assert_eq!(app.progress_label, "02:05");
    assert_eq!(app.status(), PlaybackStatus::Playing);
}

#[test]
fn status_distinguishes_stopped_from_paused() {
    let mut app = App::new(vec![item(0, "a")]);
    assert_eq!(app.status(), PlaybackStatus::Stopped);

    app.current_index = Some(0);
    assert_eq!(app.status(), PlaybackStatus::Paused);
}

#[test]
fn dismissed_notice_stays_hidden_until_the_message_changes() {
    let mut app = App::new(vec![item(0, "a")]);
    let handle = Arc::new(Mutex::new(PlaybackSnapshot {
        error: Some("failed to decode x".into()),
        ..PlaybackSnapshot::default()
    }));
    app.set_snapshot_handle(handle.clone());

    app.sync();
    assert_eq!(app.notice.as_deref(), Some("failed to decode x"));

    app.dismiss_notice();
    app.sync();
    assert_eq!(app.notice, None);

    handle.lock().unwrap().error = Some("failed to decode y".into());
    app.sync();
    assert_eq!(app.notice.as_deref(), Some("failed to decode y"));
}

#[test]
fn selection_wraps_both_ways() {
    let mut app = App::new(vec![item(0, "a"), item(1, "b"), item(2, "c")]);
    app.select_prev();
    assert_eq!(app.selected, 2);
    app.select_next();
    assert_eq!(app.selected, 0);
}

#[test]
fn queue_entries_carry_the_catalog_metadata() {
    let app = App::new(vec![item(0, "a")]);
    let entries = app.queue_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "a");
    assert_eq!(entries[0].artist.as_deref(), Some("Artist"));
    assert_eq!(entries[0].subtitle.as_deref(), Some("a.mp3"));
}
