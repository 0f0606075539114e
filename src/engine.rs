//! Playback engine: the component that actually makes noise.
//!
//! `PlaybackEngine` models a native player the way the rest of the program
//! wants to see it: it swallows a queue, obeys transport commands, and
//! reports everything that happens through an `EngineListener` callback. The
//! production implementation (`RodioEngine`) drives rodio on a dedicated
//! thread; the state bridge never learns which implementation it talks to.

mod backend;
mod clock;
mod sink;
mod types;

pub use backend::RodioEngine;
pub use types::*;
