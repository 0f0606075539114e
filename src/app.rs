//! Application module: the presentation state the UI renders from.
//!
//! `App` owns the catalog list and selection, mirrors the bridge's latest
//! snapshot into display-ready fields, and maps UI events onto playback
//! intents.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
