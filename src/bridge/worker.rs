use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::engine::{EngineEvent, EngineListener, PlaybackEngine, QueueEntry};

use super::state::{PlaybackIntent, PlaybackSnapshot, SnapshotHandle};

/// How often the position facet is refreshed while audio is running.
pub const SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

enum BridgeMsg {
    Intent(PlaybackIntent),
    LoadQueue(Vec<QueueEntry>),
    Engine(EngineEvent),
    Shutdown,
}

/// Handle to the bridge worker. Cheap operations only; the worker thread does
/// the actual engine traffic.
pub struct PlaybackBridge {
    tx: Sender<BridgeMsg>,
    snapshot: SnapshotHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl PlaybackBridge {
    /// Spawn the worker with the production sampling interval. `make_engine`
    /// runs on the worker thread and receives the listener the engine must
    /// report through.
    pub fn spawn<F>(make_engine: F) -> Self
    where
        F: FnOnce(EngineListener) -> Box<dyn PlaybackEngine> + Send + 'static,
    {
        Self::with_sample_interval(SAMPLE_INTERVAL, make_engine)
    }

    /// Same as `spawn` with an explicit sampling interval.
    pub fn with_sample_interval<F>(interval: Duration, make_engine: F) -> Self
    where
        F: FnOnce(EngineListener) -> Box<dyn PlaybackEngine> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<BridgeMsg>();
        let snapshot: SnapshotHandle = Arc::new(Mutex::new(PlaybackSnapshot::default()));

        let event_tx = tx.clone();
        let listener: EngineListener = Arc::new(move |event| {
            let _ = event_tx.send(BridgeMsg::Engine(event));
        });

        let snapshot_for_worker = snapshot.clone();
        let join = thread::spawn(move || {
            let worker = Worker {
                engine: make_engine(listener),
                snapshot: snapshot_for_worker,
                queue_len: 0,
                interval,
                next_sample: None,
            };
            worker.run(rx);
        });

        Self {
            tx,
            snapshot,
            join: Mutex::new(Some(join)),
        }
    }

    /// Dispatch an intent. Validation and forwarding happen on the worker.
    pub fn submit(&self, intent: PlaybackIntent) {
        let _ = self.tx.send(BridgeMsg::Intent(intent));
    }

    /// Present a queue to the engine, prepared but not started.
    pub fn load_queue(&self, entries: Vec<QueueEntry>) {
        let _ = self.tx.send(BridgeMsg::LoadQueue(entries));
    }

    /// The single-slot published state.
    pub fn observe(&self) -> SnapshotHandle {
        self.snapshot.clone()
    }

    /// Stop sampling, quiesce the engine and release it, then join the
    /// worker. Safe to call more than once.
    pub fn shutdown(&self) {
        let _ = self.tx.send(BridgeMsg::Shutdown);
        if let Ok(mut join) = self.join.lock() {
            if let Some(handle) = join.take() {
                let _ = handle.join();
            }
        }
    }
}

struct Worker {
    engine: Box<dyn PlaybackEngine>,
    snapshot: SnapshotHandle,
    queue_len: usize,
    interval: Duration,
    /// Deadline of the next position sample; `None` while not sampling.
    next_sample: Option<Instant>,
}

impl Worker {
    fn run(mut self, rx: Receiver<BridgeMsg>) {
        loop {
            let msg = match self.next_sample {
                Some(deadline) => {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match rx.recv_timeout(wait) {
                        Ok(msg) => msg,
                        Err(RecvTimeoutError::Timeout) => {
                            self.sample_position();
                            continue;
                        }
                        Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                None => match rx.recv() {
                    Ok(msg) => msg,
                    Err(_) => break,
                },
            };

            match msg {
                BridgeMsg::Intent(intent) => self.handle_intent(intent),
                BridgeMsg::LoadQueue(entries) => {
                    self.queue_len = entries.len();
                    self.engine.load_queue(entries);
                }
                BridgeMsg::Engine(event) => self.apply_event(event),
                BridgeMsg::Shutdown => {
                    self.teardown();
                    break;
                }
            }
        }
    }

    fn publish(&self, update: impl FnOnce(&mut PlaybackSnapshot)) {
        if let Ok(mut snap) = self.snapshot.lock() {
            update(&mut snap);
        }
    }

    fn current(&self) -> PlaybackSnapshot {
        self.snapshot
            .lock()
            .map(|snap| snap.clone())
            .unwrap_or_default()
    }

    fn sample_position(&mut self) {
        let position = self.engine.position();
        self.publish(|snap| snap.position = position);
        self.next_sample = Some(Instant::now() + self.interval);
    }

    fn start_sampler(&mut self) {
        if self.next_sample.is_none() {
            self.next_sample = Some(Instant::now() + self.interval);
        }
    }

    fn cancel_sampler(&mut self) {
        self.next_sample = None;
    }

    fn handle_intent(&mut self, intent: PlaybackIntent) {
        match intent {
            PlaybackIntent::PlayPause => self.toggle_play(),

            PlaybackIntent::SelectItem(index) => {
                if index >= self.queue_len {
                    log::warn!(
                        "dropping selection of item {index}, queue holds {}",
                        self.queue_len
                    );
                    return;
                }
                if self.current().current_index == Some(index) {
                    // Re-selecting the current item means pause/resume, not a
                    // restart from zero.
                    self.toggle_play();
                } else {
                    self.engine.select_item(index);
                }
            }

            PlaybackIntent::SeekTo(position) => self.seek_absolute(position),

            PlaybackIntent::SeekToFraction(fraction) => {
                let duration = self.current().duration;
                if duration > Duration::ZERO {
                    let fraction = fraction.clamp(0.0, 1.0);
                    self.seek_absolute(duration.mul_f32(fraction));
                }
            }

            PlaybackIntent::SeekBack => self.engine.seek_back(),
            PlaybackIntent::SeekForward => self.engine.seek_forward(),
            PlaybackIntent::SkipNext => self.engine.skip_next(),

            PlaybackIntent::Stop => {
                self.cancel_sampler();
                self.engine.stop();
            }
        }
    }

    fn toggle_play(&mut self) {
        if self.current().is_playing {
            self.engine.pause();
        } else {
            self.engine.play();
        }
    }

    fn seek_absolute(&mut self, position: Duration) {
        let duration = self.current().duration;
        let target = if duration > Duration::ZERO {
            position.min(duration)
        } else {
            position
        };
        self.engine.seek_to(target);
        // Reflect the seek immediately so a dragged slider does not snap
        // back while waiting for the next sample.
        self.publish(|snap| snap.position = target);
    }

    fn apply_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::Buffering { position } => {
                self.cancel_sampler();
                self.publish(|snap| {
                    snap.is_buffering = true;
                    snap.position = position;
                });
            }
            EngineEvent::Ready { duration } => {
                self.publish(|snap| {
                    snap.is_buffering = false;
                    snap.duration = duration;
                    snap.error = None;
                });
            }
            EngineEvent::PlayingChanged { is_playing } => {
                self.publish(|snap| {
                    snap.is_playing = is_playing;
                    if is_playing {
                        snap.is_buffering = false;
                    }
                });
                if is_playing {
                    self.start_sampler();
                } else {
                    self.cancel_sampler();
                }
            }
            EngineEvent::ItemChanged { index } => {
                // Only the queue-position facet moves; whether playback kept
                // running is signalled separately.
                self.publish(|snap| snap.current_index = Some(index));
            }
            EngineEvent::Error { message } => {
                log::warn!("engine error: {message}");
                self.publish(|snap| {
                    snap.is_buffering = false;
                    snap.error = Some(message);
                });
            }
        }
    }

    /// Teardown in the required order; every step runs unconditionally.
    fn teardown(&mut self) {
        self.cancel_sampler();
        self.engine.pause();
        self.engine.stop();
        self.engine.release();
    }
}
