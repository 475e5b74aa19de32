use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/rondo/config.toml` or
/// `~/.config/rondo/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `RONDO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub library: LibrarySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Period of the position-reporting tick in the audio thread
    /// (milliseconds).
    pub poll_interval_ms: u64,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered as the big heading.
    pub heading_text: String,
    /// Background color, `#rrggbb`.
    pub background: String,
    /// Accent color of the "Load Music" button, `#rrggbb`.
    pub load_button: String,
    /// Accent color of the "Load Folder" button, `#rrggbb`.
    pub folder_button: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            heading_text: "MUSIC PLAYER 1.0".to_string(),
            background: "#1e1e1e".to_string(),
            load_button: "#4CAF50".to_string(),
            folder_button: "#2196F3".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds the slider moves per seek key press.
    pub seek_step_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self {
            seek_step_seconds: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File suffixes to treat as audio (case-sensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks when scanning a folder.
    pub follow_links: bool,
    /// Directory the picker starts in; defaults to the current directory.
    pub start_dir: Option<String>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec!["mp3".into(), "flac".into(), "ogg".into()],
            follow_links: true,
            start_dir: None,
        }
    }
}
