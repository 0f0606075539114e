//! Playback state bridge: the seam between the engine and everything else.
//!
//! One worker thread accepts user intents, forwards validated commands to the
//! engine, folds the engine's independently signalled callbacks into a single
//! published snapshot, and samples the playback position on a fixed interval
//! while audio is running. All engine traffic goes through this one thread,
//! so commands can never interleave.

mod state;
mod worker;

pub use state::*;
pub use worker::PlaybackBridge;
