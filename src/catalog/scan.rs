use std::path::Path;
use std::time::Duration;

use lofty::{AudioFile, ItemKey, TaggedFileExt};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::AudioItem;

fn is_audio_file(path: &Path, settings: &LibrarySettings) -> bool {
    let exts: Vec<String> = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

/// Scan `dir` for playable audio files and build the catalog.
///
/// Tags are read with lofty; untagged files fall back to the file stem as
/// title. The list is sorted case-insensitively by title and ids are assigned
/// in sorted order, so an id is stable for the lifetime of the list.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<AudioItem> {
    let mut items: Vec<AudioItem> = Vec::new();

    let mut walker = WalkDir::new(dir).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    for entry in walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file()
            || (!settings.include_hidden && is_hidden(path))
            || !is_audio_file(path, settings)
        {
            continue;
        }

        let display_name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        let mut title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        let mut artist: Option<String> = None;
        let mut duration = Duration::ZERO;

        if let Ok(tagged) = lofty::read_from_path(path) {
            duration = tagged.properties().duration();

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.get_string(&ItemKey::TrackTitle) {
                    if !v.trim().is_empty() {
                        title = v.to_string();
                    }
                }
                if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
                    let v = v.trim();
                    if !v.is_empty() {
                        artist = Some(v.to_string());
                    }
                }
            }
        }

        items.push(AudioItem {
            id: 0,
            title,
            artist,
            display_name,
            source: file_uri(path),
            path: path.to_path_buf(),
            duration,
        });
    }

    items.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()));
    for (i, item) in items.iter_mut().enumerate() {
        item.id = i as u64;
    }

    log::debug!("catalog: {} items under {}", items.len(), dir.display());
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn is_audio_file_matches_configured_extensions_case_insensitive() {
        let settings = LibrarySettings::default();
        assert!(is_audio_file(Path::new("/tmp/a.mp3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.MP3"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.flac"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.wav"), &settings));
        assert!(is_audio_file(Path::new("/tmp/a.ogg"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a.txt"), &settings));
        assert!(!is_audio_file(Path::new("/tmp/a"), &settings));
    }

    #[test]
    fn scan_filters_non_audio_and_sorts_by_title_case_insensitive() {
        let dir = tempdir().unwrap();

        fs::write(dir.path().join("b.MP3"), b"not a real mp3").unwrap();
        fs::write(dir.path().join("A.ogg"), b"not a real ogg").unwrap();
        fs::write(dir.path().join("c.txt"), b"ignore me").unwrap();

        let items = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "A");
        assert_eq!(items[0].display_name, "A.ogg");
        assert_eq!(items[1].title, "b");
        assert_eq!(items[1].display_name, "b.MP3");
    }

    #[test]
    fn scan_assigns_sequential_ids_and_file_uris() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("one.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("two.mp3"), b"not real").unwrap();

        let items = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, 0);
        assert_eq!(items[1].id, 1);
        for item in &items {
            assert!(item.source.starts_with("file://"));
            assert!(item.source.ends_with(&item.display_name));
        }
    }

    #[test]
    fn scan_respects_include_hidden_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden.mp3"), b"not real").unwrap();
        fs::write(dir.path().join("visible.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            include_hidden: false,
            ..LibrarySettings::default()
        };
        let items = scan(dir.path(), &settings);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].display_name, "visible.mp3");
    }

    #[test]
    fn scan_respects_recursive_false() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("root.mp3"), b"not real").unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("child.mp3"), b"not real").unwrap();

        let settings = LibrarySettings {
            recursive: false,
            ..LibrarySettings::default()
        };
        let items = scan(dir.path(), &settings);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].display_name, "root.mp3");
    }

    #[test]
    fn untagged_files_report_zero_duration() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("raw.wav"), b"not real").unwrap();

        let items = scan(dir.path(), &LibrarySettings::default());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].duration, Duration::ZERO);
        assert_eq!(items[0].artist, None);
    }

    #[test]
    fn list_label_prefers_artist_dash_title() {
        let item = AudioItem {
            id: 0,
            title: "Song".into(),
            artist: Some("Artist".into()),
            display_name: "song.mp3".into(),
            path: "/tmp/song.mp3".into(),
            source: "file:///tmp/song.mp3".into(),
            duration: Duration::ZERO,
        };
        assert_eq!(item.list_label(), "Artist - Song");

        let untitled = AudioItem {
            artist: Some("   ".into()),
            ..item
        };
        assert_eq!(untitled.list_label(), "Song");
    }
}
