//! Position accounting for the engine thread.
//!
//! rodio sinks do not report a playback position, so the engine keeps its own
//! clock: accumulated time while paused plus a running `Instant` while
//! playing, capped at the known track duration.

use std::time::{Duration, Instant};

#[derive(Debug, Default)]
pub(super) struct PositionClock {
    base: Duration,
    started_at: Option<Instant>,
    limit: Duration,
}

impl PositionClock {
    /// Rewind to zero for a track of `limit` length. A zero limit means the
    /// duration is unknown and the clock runs uncapped.
    pub(super) fn reset(&mut self, limit: Duration) {
        self.base = Duration::ZERO;
        self.started_at = None;
        self.limit = limit;
    }

    pub(super) fn resume(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    pub(super) fn pause(&mut self) {
        self.base = self.position();
        self.started_at = None;
    }

    /// Move the clock to `position`, preserving the running/paused state.
    pub(super) fn seek(&mut self, position: Duration) {
        self.base = self.clamp(position);
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    pub(super) fn position(&self) -> Duration {
        let elapsed = self
            .started_at
            .map_or(Duration::ZERO, |since| since.elapsed());
        self.clamp(self.base + elapsed)
    }

    pub(super) fn limit(&self) -> Duration {
        self.limit
    }

    fn clamp(&self, value: Duration) -> Duration {
        if self.limit > Duration::ZERO {
            value.min(self.limit)
        } else {
            value
        }
    }
}
