//! Published playback state and the intents that drive it.

use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A discrete playback command from the user (or a media-session
/// controller). Constructed, dispatched, discarded.
#[derive(Clone, Debug, PartialEq)]
pub enum PlaybackIntent {
    /// Toggle between playing and paused.
    PlayPause,
    /// Jump to the queue item at this index. Selecting the item that is
    /// already current toggles play/pause instead of restarting it.
    SelectItem(usize),
    /// Seek to an absolute position; clamped to the known duration.
    SeekTo(Duration),
    /// Seek to a fraction of the track in `[0, 1]`; ignored while the
    /// duration is unknown.
    SeekToFraction(f32),
    /// Rewind by the transport increment.
    SeekBack,
    /// Fast-forward by the transport increment.
    SeekForward,
    /// Advance to the next queue item.
    SkipNext,
    /// Stop being audible without tearing the session down.
    Stop,
}

/// The bridge's view of playback, updated facet by facet.
///
/// The engine signals its facets independently (an item transition says
/// nothing about whether playback kept running), so each field here is only
/// touched by the event that owns it. Readers get whole snapshots and must
/// treat every read as the full current truth: publication is a single
/// overwritten slot, and intermediate values can be missed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlaybackSnapshot {
    /// Audio is currently running.
    pub is_playing: bool,
    /// The engine is preparing a source.
    pub is_buffering: bool,
    /// Queue index of the current item, once one has been presented.
    pub current_index: Option<usize>,
    /// Duration of the current item; zero while unknown.
    pub duration: Duration,
    /// Last sampled playback position.
    pub position: Duration,
    /// Most recent engine failure, until the next successful load.
    pub error: Option<String>,
}

/// Shared single-slot handle to the latest snapshot. The bridge writes,
/// everyone else reads; last write wins.
pub type SnapshotHandle = Arc<Mutex<PlaybackSnapshot>>;
