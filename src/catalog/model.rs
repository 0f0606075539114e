use std::path::PathBuf;
use std::time::Duration;

/// A playable audio file found by the scanner.
///
/// Items are created once per scan and never mutated afterwards; replacing
/// the in-memory list is the only way they change.
#[derive(Clone, Debug)]
pub struct AudioItem {
    /// Stable identifier within the current catalog (assigned after sorting).
    pub id: u64,
    /// Track title from tags, or the file stem when untagged.
    pub title: String,
    /// Track artist from tags, if any.
    pub artist: Option<String>,
    /// The file name as it appears on disk.
    pub display_name: String,
    /// Filesystem path used for decoding.
    pub path: PathBuf,
    /// `file://` URI handed to external consumers (media session metadata).
    pub source: String,
    /// Total duration reported by the tag reader.
    pub duration: Duration,
}

impl AudioItem {
    /// One line of text for list rendering: "Artist - Title" when the artist
    /// is known, otherwise just the title.
    pub fn list_label(&self) -> String {
        match self.artist.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => format!("{} - {}", a, self.title),
            _ => self.title.clone(),
        }
    }
}
