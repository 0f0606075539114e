//! The long-lived owner of the playback machinery.
//!
//! `PlaybackSession` is the single owner of the bridge (and, through it, the
//! engine) and the media session. Everything else holds read handles or
//! submits intents; nothing else may construct an engine. Teardown runs the
//! same ordered sequence on explicit shutdown and on drop, so an unwinding
//! exit path releases the engine and clears the media surface too.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::bridge::PlaybackBridge;
use crate::mpris::MprisHandle;

pub struct PlaybackSession {
    bridge: PlaybackBridge,
    media: MprisHandle,
    torn_down: AtomicBool,
}

impl PlaybackSession {
    pub fn new(bridge: PlaybackBridge, media: MprisHandle) -> Self {
        Self {
            bridge,
            media,
            torn_down: AtomicBool::new(false),
        }
    }

    pub fn bridge(&self) -> &PlaybackBridge {
        &self.bridge
    }

    pub fn media(&self) -> &MprisHandle {
        &self.media
    }

    /// Tear the session down: stop sampling and quiesce/release the engine
    /// (the bridge runs that sequence), then clear the media session. Safe to
    /// call more than once; later calls are no-ops.
    pub fn shutdown(&self) {
        if self.torn_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.bridge.shutdown();
        self.media.clear();
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}
