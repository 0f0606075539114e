use super::*;
use std::sync::mpsc;
use std::time::Duration;

fn make_item() -> AudioItem {
    AudioItem {
        id: 7,
        title: "Test Title".to_string(),
        artist: Some("Test Artist".to_string()),
        display_name: "test.mp3".to_string(),
        path: "/tmp/music/test.mp3".into(),
        source: "file:///tmp/music/test.mp3".to_string(),
        duration: Duration::from_micros(1_234_567),
    }
}

#[test]
fn set_now_playing_sets_and_clears_shared_state() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };

    let item = make_item();
    handle.set_now_playing(Some(&item));

    {
        let s = state.lock().unwrap();
        assert_eq!(s.title.as_deref(), Some("Test Title"));
        assert_eq!(s.artist, vec!["Test Artist".to_string()]);
        assert_eq!(s.url.as_deref(), Some("file:///tmp/music/test.mp3"));
        assert_eq!(s.length_micros, Some(1_234_567));
        assert_eq!(
            s.track_id.as_ref().map(|p| p.as_str()),
            Some("/org/mpris/MediaPlayer2/track/7")
        );
    }

    handle.set_now_playing(None);
    {
        let s = state.lock().unwrap();
        assert_eq!(s.title, None);
        assert!(s.artist.is_empty());
        assert_eq!(s.url, None);
        assert_eq!(s.length_micros, None);
        assert!(s.track_id.is_none());
    }
}

#[test]
fn playback_status_maps_state_to_spec_strings() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    {
        let mut s = state.lock().unwrap();
        s.playback = PlaybackStatus::Stopped;
    }
    assert_eq!(iface.playback_status(), "Stopped");

    {
        let mut s = state.lock().unwrap();
        s.playback = PlaybackStatus::Playing;
    }
    assert_eq!(iface.playback_status(), "Playing");

    {
        let mut s = state.lock().unwrap();
        s.playback = PlaybackStatus::Paused;
    }
    assert_eq!(iface.playback_status(), "Paused");
}

#[test]
fn metadata_includes_expected_keys_when_present() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, _rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface {
        tx,
        state: state.clone(),
    };

    let handle = MprisHandle {
        state: state.clone(),
    };
    handle.set_now_playing(Some(&make_item()));

    let map = iface.metadata();
    for k in [
        "mpris:trackid",
        "xesam:title",
        "xesam:artist",
        "xesam:url",
        "mpris:length",
    ] {
        assert!(map.contains_key(k), "missing key: {k}");
    }
}

#[test]
fn clear_resets_metadata_and_reports_stopped() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let handle = MprisHandle {
        state: state.clone(),
    };
    handle.set_now_playing(Some(&make_item()));
    handle.set_playback(PlaybackStatus::Playing);

    handle.clear();

    let s = state.lock().unwrap();
    assert_eq!(s.playback, PlaybackStatus::Stopped);
    assert_eq!(s.title, None);
    assert!(s.artist.is_empty());
    assert!(s.track_id.is_none());
}

#[test]
fn previous_and_seek_translate_to_rewind_and_fast_forward() {
    let state = Arc::new(Mutex::new(SharedState::default()));
    let (tx, rx) = mpsc::channel::<ControlCmd>();
    let iface = PlayerIface { tx, state };

    iface.previous();
    iface.seek(-1_000_000);
    iface.seek(1_000_000);

    let got: Vec<String> = rx.try_iter().map(|c| format!("{c:?}")).collect();
    assert_eq!(got, vec!["SeekBack", "SeekBack", "SeekForward"]);
}
