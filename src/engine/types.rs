//! Engine-facing types: queue entries, lifecycle events and the engine trait.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// One element of the playback queue, in the shape the engine consumes.
///
/// Carries display metadata alongside the source so an engine can forward it
/// to platform surfaces (media sessions) without reaching back into the
/// catalog.
#[derive(Clone, Debug)]
pub struct QueueEntry {
    /// Path of the audio file to decode.
    pub source: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    /// Secondary display line (the file name, for this application).
    pub subtitle: Option<String>,
    /// Cover art location, when one exists.
    pub artwork: Option<PathBuf>,
}

/// Lifecycle callbacks emitted by an engine.
///
/// Facets are signalled independently: an `ItemChanged` says nothing about
/// whether playback is running, and `PlayingChanged` says nothing about which
/// item is current. Consumers fold them into their own view of the world.
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// The engine is preparing a source; `position` is where playback will
    /// resume once ready.
    Buffering { position: Duration },
    /// The current source is prepared and its duration is known.
    Ready { duration: Duration },
    /// Playback started or stopped being audible.
    PlayingChanged { is_playing: bool },
    /// The queue position moved to `index`.
    ItemChanged { index: usize },
    /// A source could not be opened or decoded.
    Error { message: String },
}

/// Callback through which an engine reports `EngineEvent`s.
pub type EngineListener = Arc<dyn Fn(EngineEvent) + Send + Sync>;

/// Seek increments applied by relative seeks.
#[derive(Clone, Copy, Debug)]
pub struct EngineTuning {
    pub seek_back: Duration,
    pub seek_forward: Duration,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            seek_back: Duration::from_secs(5),
            seek_forward: Duration::from_secs(15),
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
}

/// A playback engine as seen by the state bridge.
///
/// Commands are fire-and-forget; their outcome arrives through the
/// `EngineListener` the engine was constructed with. `position` is the one
/// synchronous query because the bridge samples it on a timer.
pub trait PlaybackEngine: Send {
    /// Replace the queue and prepare the first entry without starting
    /// playback.
    fn load_queue(&mut self, entries: Vec<QueueEntry>);
    /// Start or resume playback of the current entry.
    fn play(&mut self);
    /// Pause playback, keeping the current entry and position.
    fn pause(&mut self);
    /// Jump to the entry at `index` and start playing it from the top.
    fn select_item(&mut self, index: usize);
    /// Advance to the next entry, if there is one.
    fn skip_next(&mut self);
    /// Seek to an absolute position within the current entry.
    fn seek_to(&mut self, position: Duration);
    /// Rewind by the engine's configured back increment.
    fn seek_back(&mut self);
    /// Fast-forward by the engine's configured forward increment.
    fn seek_forward(&mut self);
    /// Stop being audible without forgetting the queue.
    fn stop(&mut self);
    /// Release every resource the engine holds. Terminal.
    fn release(&mut self);
    /// Current playback position within the current entry.
    fn position(&self) -> Duration;
}
