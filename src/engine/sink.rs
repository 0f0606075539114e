//! Utilities for creating `rodio` sinks from queue entries.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position. Open and decode failures
//! are returned to the caller so they can surface as engine error events.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::EngineError;

/// Create a paused `Sink` for the file at `path` that starts playback at
/// `start_at`.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<Sink, EngineError> {
    let file = File::open(path).map_err(|e| EngineError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;

    let source = Decoder::new(BufReader::new(file))
        .map_err(|e| EngineError::Decode {
            path: path.to_path_buf(),
            source: e,
        })?
        // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
        .skip_duration(start_at);

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
