//! Application model: catalog list, selection and derived playback fields.

use std::time::Duration;

use crate::bridge::{PlaybackIntent, SnapshotHandle};
use crate::catalog::AudioItem;
use crate::engine::QueueEntry;

/// Coarse playback status for external surfaces (media session, status
/// line).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped,
    Playing,
    Paused,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self::Stopped
    }
}

/// Events coming out of the render layer (and the media session, routed
/// through the same path).
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    PlayPause,
    /// The user activated the item at this catalog index.
    ItemTapped(usize),
    /// A seek drag released at this percentage of the track, `[0, 100]`.
    SeekToPercent(f32),
    SkipNext,
    SeekBack,
    SeekForward,
    Stop,
}

/// The main application model. The event loop calls `sync` every iteration
/// to refresh the derived fields from the bridge's latest snapshot.
pub struct App {
    pub items: Vec<AudioItem>,
    pub selected: usize,

    pub is_playing: bool,
    pub is_buffering: bool,
    pub current_index: Option<usize>,
    pub duration: Duration,
    pub progress_percent: f32,
    pub progress_label: String,

    /// Error banner content, already filtered for dismissal.
    pub notice: Option<String>,
    dismissed: Option<String>,

    snapshot: Option<SnapshotHandle>,
}

impl App {
    /// Create a new `App` over the scanned catalog.
    pub fn new(items: Vec<AudioItem>) -> Self {
        Self {
            items,
            selected: 0,
            is_playing: false,
            is_buffering: false,
            current_index: None,
            duration: Duration::ZERO,
            progress_percent: 0.0,
            progress_label: Self::format_timestamp(Duration::ZERO),
            notice: None,
            dismissed: None,
            snapshot: None,
        }
    }

    /// Attach the bridge's published state.
    pub fn set_snapshot_handle(&mut self, handle: SnapshotHandle) {
        self.snapshot = Some(handle);
    }

    /// Pull the latest snapshot and recompute every derived field.
    pub fn sync(&mut self) {
        let Some(snap) = self
            .snapshot
            .as_ref()
            .and_then(|h| h.lock().ok().map(|s| s.clone()))
        else {
            return;
        };

        self.is_playing = snap.is_playing;
        self.is_buffering = snap.is_buffering;
        self.current_index = snap.current_index;
        self.duration = snap.duration;
        self.progress_percent = Self::progress_percent(snap.position, snap.duration);
        self.progress_label = Self::format_timestamp(snap.position);

        // A dismissed message stays hidden until a different one arrives.
        self.notice = match snap.error {
            Some(msg) if self.dismissed.as_deref() != Some(msg.as_str()) => Some(msg),
            _ => None,
        };
    }

    /// Hide the current error banner until the message changes.
    pub fn dismiss_notice(&mut self) {
        if let Some(msg) = self.notice.take() {
            self.dismissed = Some(msg);
        }
    }

    /// Map a UI event onto the playback intent to submit, if any.
    pub fn intent_for(&self, event: UiEvent) -> Option<PlaybackIntent> {
        match event {
            UiEvent::PlayPause => Some(PlaybackIntent::PlayPause),
            UiEvent::ItemTapped(index) => Some(PlaybackIntent::SelectItem(index)),
            UiEvent::SeekToPercent(percent) => {
                // A slider reports percent; the bridge wants an absolute
                // position, converted with the last known duration.
                if self.duration > Duration::ZERO {
                    let fraction = (percent / 100.0).clamp(0.0, 1.0);
                    Some(PlaybackIntent::SeekTo(self.duration.mul_f32(fraction)))
                } else {
                    None
                }
            }
            UiEvent::SkipNext => Some(PlaybackIntent::SkipNext),
            UiEvent::SeekBack => Some(PlaybackIntent::SeekBack),
            UiEvent::SeekForward => Some(PlaybackIntent::SeekForward),
            UiEvent::Stop => Some(PlaybackIntent::Stop),
        }
    }

    /// Percentage of the track played, guarded for unknown durations.
    pub fn progress_percent(position: Duration, duration: Duration) -> f32 {
        if duration.is_zero() {
            return 0.0;
        }
        let percent = position.as_millis() as f32 / duration.as_millis() as f32 * 100.0;
        percent.clamp(0.0, 100.0)
    }

    /// Format a position as `MM:SS` with zero-padded seconds. There is no
    /// hours component; anything past an hour keeps counting minutes.
    pub fn format_timestamp(position: Duration) -> String {
        let secs = position.as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }

    /// Coarse status derived from the synced fields.
    pub fn status(&self) -> PlaybackStatus {
        if self.is_playing {
            PlaybackStatus::Playing
        } else if self.current_index.is_some() {
            PlaybackStatus::Paused
        } else {
            PlaybackStatus::Stopped
        }
    }

    /// The item currently presented by the engine, if any.
    pub fn current_item(&self) -> Option<&AudioItem> {
        self.current_index.and_then(|i| self.items.get(i))
    }

    /// Return true if the catalog contains any items.
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }

    /// Move the selection down, wrapping at the end.
    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    /// Move the selection up, wrapping at the top.
    pub fn select_prev(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }

    /// Translate the catalog into the entries the engine consumes.
    pub fn queue_entries(&self) -> Vec<QueueEntry> {
        self.items
            .iter()
            .map(|item| QueueEntry {
                source: item.path.clone(),
                title: item.title.clone(),
                artist: item.artist.clone(),
                subtitle: Some(item.display_name.clone()),
                artwork: None,
            })
            .collect()
    }
}
