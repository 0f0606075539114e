use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/vivace/config.toml` or
/// `~/.config/vivace/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `VIVACE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Rewind increment for the seek-back action (milliseconds).
    pub seek_back_ms: u64,
    /// Fast-forward increment for the seek-forward action (milliseconds).
    pub seek_forward_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            seek_back_ms: 5_000,
            seek_forward_ms: 15_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,
    /// Whether the controls help line is shown at the bottom.
    pub show_controls_help: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ vivace ~ ".to_string(),
            show_controls_help: true,
        }
    }
}
