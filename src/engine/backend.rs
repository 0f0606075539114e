//! rodio-backed `PlaybackEngine`.
//!
//! The engine runs on its own thread: it owns the output stream and the
//! current sink, processes commands in arrival order, and detects
//! end-of-track on a receive timeout to auto-advance through the queue.
//! Lifecycle events go out through the listener the engine was spawned with.

use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use lofty::AudioFile;
use rodio::{OutputStreamBuilder, Sink};

use super::clock::PositionClock;
use super::sink::create_sink_at;
use super::types::{EngineEvent, EngineListener, EngineTuning, PlaybackEngine, QueueEntry};

const IDLE_POLL: Duration = Duration::from_millis(200);

#[derive(Debug)]
enum EngineCmd {
    LoadQueue(Vec<QueueEntry>),
    Play,
    Pause,
    SelectItem(usize),
    SkipNext,
    SeekTo(Duration),
    SeekBack,
    SeekForward,
    Stop,
    Release,
}

type ClockHandle = Arc<Mutex<PositionClock>>;

pub struct RodioEngine {
    tx: Sender<EngineCmd>,
    clock: ClockHandle,
    join: Option<JoinHandle<()>>,
}

impl RodioEngine {
    /// Spawn the engine thread. Events start flowing into `listener` as soon
    /// as a queue is loaded.
    pub fn spawn(listener: EngineListener, tuning: EngineTuning) -> Self {
        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let clock: ClockHandle = Arc::new(Mutex::new(PositionClock::default()));

        let clock_for_thread = clock.clone();
        let join = thread::spawn(move || run_engine(rx, listener, tuning, clock_for_thread));

        Self {
            tx,
            clock,
            join: Some(join),
        }
    }

    fn send(&self, cmd: EngineCmd) {
        // A dead engine thread means the output device is gone; commands
        // become no-ops and the error event already went out.
        let _ = self.tx.send(cmd);
    }
}

impl PlaybackEngine for RodioEngine {
    fn load_queue(&mut self, entries: Vec<QueueEntry>) {
        self.send(EngineCmd::LoadQueue(entries));
    }

    fn play(&mut self) {
        self.send(EngineCmd::Play);
    }

    fn pause(&mut self) {
        self.send(EngineCmd::Pause);
    }

    fn select_item(&mut self, index: usize) {
        self.send(EngineCmd::SelectItem(index));
    }

    fn skip_next(&mut self) {
        self.send(EngineCmd::SkipNext);
    }

    fn seek_to(&mut self, position: Duration) {
        self.send(EngineCmd::SeekTo(position));
    }

    fn seek_back(&mut self) {
        self.send(EngineCmd::SeekBack);
    }

    fn seek_forward(&mut self) {
        self.send(EngineCmd::SeekForward);
    }

    fn stop(&mut self) {
        self.send(EngineCmd::Stop);
    }

    fn release(&mut self) {
        self.send(EngineCmd::Release);
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }

    fn position(&self) -> Duration {
        self.clock
            .lock()
            .map(|c| c.position())
            .unwrap_or(Duration::ZERO)
    }
}

/// Mutable state owned by the engine thread.
struct EngineState {
    stream: rodio::OutputStream,
    listener: EngineListener,
    tuning: EngineTuning,
    clock: ClockHandle,
    entries: Vec<QueueEntry>,
    index: usize,
    sink: Option<Sink>,
    paused: bool,
}

fn run_engine(
    rx: Receiver<EngineCmd>,
    listener: EngineListener,
    tuning: EngineTuning,
    clock: ClockHandle,
) {
    let stream = match OutputStreamBuilder::open_default_stream() {
        Ok(stream) => stream,
        Err(e) => {
            listener(EngineEvent::Error {
                message: format!("no audio output device available: {e}"),
            });
            return;
        }
    };
    // rodio logs to stderr when OutputStream is dropped. That's useful in
    // debugging, but noisy for a TUI app.
    let mut stream = stream;
    stream.log_on_drop(false);

    let mut state = EngineState {
        stream,
        listener,
        tuning,
        clock,
        entries: Vec::new(),
        index: 0,
        sink: None,
        paused: true,
    };

    loop {
        match rx.recv_timeout(IDLE_POLL) {
            Ok(EngineCmd::LoadQueue(entries)) => state.load_queue(entries),
            Ok(EngineCmd::Play) => state.play(),
            Ok(EngineCmd::Pause) => state.pause(),
            Ok(EngineCmd::SelectItem(i)) => state.start_item(i, true),
            Ok(EngineCmd::SkipNext) => state.skip_next(),
            Ok(EngineCmd::SeekTo(pos)) => state.seek_to(pos),
            Ok(EngineCmd::SeekBack) => state.seek_back(),
            Ok(EngineCmd::SeekForward) => state.seek_forward(),
            Ok(EngineCmd::Stop) => state.stop(),
            Ok(EngineCmd::Release) => {
                state.stop_silently();
                break;
            }
            Err(RecvTimeoutError::Timeout) => state.check_track_end(),
            Err(RecvTimeoutError::Disconnected) => {
                state.stop_silently();
                break;
            }
        }
    }
}

impl EngineState {
    fn emit(&self, event: EngineEvent) {
        (self.listener)(event);
    }

    fn with_clock(&self, f: impl FnOnce(&mut PositionClock)) {
        if let Ok(mut clock) = self.clock.lock() {
            f(&mut clock);
        }
    }

    fn clock_position(&self) -> Duration {
        self.clock
            .lock()
            .map(|c| c.position())
            .unwrap_or(Duration::ZERO)
    }

    fn clock_limit(&self) -> Duration {
        self.clock
            .lock()
            .map(|c| c.limit())
            .unwrap_or(Duration::ZERO)
    }

    /// Replace the queue and prepare the first entry without autoplay.
    fn load_queue(&mut self, entries: Vec<QueueEntry>) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.paused = true;
        self.entries = entries;
        self.index = 0;
        self.with_clock(|c| c.reset(Duration::ZERO));

        if !self.entries.is_empty() {
            self.start_item(0, false);
        }
    }

    /// Prepare and (optionally) start the entry at `i`. Emits the transition,
    /// buffering and readiness events in order; on failure the error event
    /// replaces them and playback stops.
    fn start_item(&mut self, i: usize, autoplay: bool) {
        if i >= self.entries.len() {
            log::warn!("engine: ignoring out-of-range item {i}");
            return;
        }

        let was_playing = self.sink.is_some() && !self.paused;
        if let Some(s) = self.sink.take() {
            s.stop();
        }

        self.index = i;
        self.emit(EngineEvent::ItemChanged { index: i });
        self.emit(EngineEvent::Buffering {
            position: Duration::ZERO,
        });

        let entry = &self.entries[i];
        log::debug!(
            "starting item {i}: {} - {} ({})",
            entry.artist.as_deref().unwrap_or("?"),
            entry.title,
            entry.subtitle.as_deref().unwrap_or(""),
        );

        let path = entry.source.clone();
        let new_sink = match create_sink_at(&self.stream, &path, Duration::ZERO) {
            Ok(sink) => sink,
            Err(e) => {
                self.paused = true;
                self.with_clock(|c| c.reset(Duration::ZERO));
                self.emit(EngineEvent::Error {
                    message: e.to_string(),
                });
                if was_playing {
                    self.emit(EngineEvent::PlayingChanged { is_playing: false });
                }
                return;
            }
        };

        let duration = probe_duration(&path);
        self.with_clock(|c| c.reset(duration));
        self.emit(EngineEvent::Ready { duration });

        if autoplay {
            new_sink.play();
            self.paused = false;
            self.with_clock(|c| c.resume());
        } else {
            self.paused = true;
        }
        self.sink = Some(new_sink);

        if autoplay {
            self.emit(EngineEvent::PlayingChanged { is_playing: true });
        }
    }

    fn play(&mut self) {
        match &self.sink {
            Some(sink) => {
                if self.paused {
                    sink.play();
                    self.paused = false;
                    self.with_clock(|c| c.resume());
                    self.emit(EngineEvent::PlayingChanged { is_playing: true });
                }
            }
            None => {
                if !self.entries.is_empty() {
                    self.start_item(self.index, true);
                }
            }
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = &self.sink {
            if !self.paused {
                sink.pause();
                self.paused = true;
                self.with_clock(|c| c.pause());
                self.emit(EngineEvent::PlayingChanged { is_playing: false });
            }
        }
    }

    fn skip_next(&mut self) {
        if self.index + 1 < self.entries.len() {
            self.start_item(self.index + 1, true);
        }
    }

    /// Seeking rebuilds the current sink and skips into the file
    /// (`Source::skip_duration`; works for common formats).
    fn seek_to(&mut self, position: Duration) {
        if self.sink.is_none() {
            return;
        }

        let limit = self.clock_limit();
        let target = if limit > Duration::ZERO {
            position.min(limit)
        } else {
            position
        };

        if let Some(s) = self.sink.take() {
            s.stop();
        }

        let path = self.entries[self.index].source.clone();
        let new_sink = match create_sink_at(&self.stream, &path, target) {
            Ok(sink) => sink,
            Err(e) => {
                let was_playing = !self.paused;
                self.paused = true;
                self.with_clock(|c| c.pause());
                self.emit(EngineEvent::Error {
                    message: e.to_string(),
                });
                if was_playing {
                    self.emit(EngineEvent::PlayingChanged { is_playing: false });
                }
                return;
            }
        };

        if !self.paused {
            new_sink.play();
        }
        self.sink = Some(new_sink);
        self.with_clock(|c| c.seek(target));
    }

    fn seek_back(&mut self) {
        let target = self.clock_position().saturating_sub(self.tuning.seek_back);
        self.seek_to(target);
    }

    fn seek_forward(&mut self) {
        let target = self.clock_position().saturating_add(self.tuning.seek_forward);
        self.seek_to(target);
    }

    /// Stop being audible. The queue, index and position stay; this is the
    /// "stop" transport action, not teardown.
    fn stop(&mut self) {
        let was_playing = self.sink.is_some() && !self.paused;
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.paused = true;
        self.with_clock(|c| c.pause());
        if was_playing {
            self.emit(EngineEvent::PlayingChanged { is_playing: false });
        }
    }

    /// Teardown path: stop without emitting events (the listener's consumer
    /// is going away too).
    fn stop_silently(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.paused = true;
        self.with_clock(|c| c.pause());
    }

    /// End-of-track handling, run on every receive timeout.
    fn check_track_end(&mut self) {
        let ended = self
            .sink
            .as_ref()
            .map(|s| !self.paused && s.empty())
            .unwrap_or(false);
        if !ended {
            return;
        }

        if self.index + 1 < self.entries.len() {
            self.start_item(self.index + 1, true);
        } else {
            // Last track ran out: park at the end, paused.
            self.sink = None;
            self.paused = true;
            let limit = self.clock_limit();
            self.with_clock(|c| {
                c.pause();
                if limit > Duration::ZERO {
                    c.seek(limit);
                }
            });
            self.emit(EngineEvent::PlayingChanged { is_playing: false });
        }
    }
}

/// Total duration of the file at `path`, from its tag properties. Zero when
/// the file cannot be probed; consumers treat zero as "unknown".
fn probe_duration(path: &Path) -> Duration {
    lofty::read_from_path(path)
        .map(|tagged| tagged.properties().duration())
        .unwrap_or(Duration::ZERO)
}
