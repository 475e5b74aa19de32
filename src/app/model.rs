//! Player state model: `App`, `PlaybackState` and the transport buttons.
//!
//! `App` is the single owner of the track list, the current index and
//! the playback state. The UI reads it; the runtime mutates it through
//! the methods here and forwards the resulting audio commands.

use std::time::Duration;

use crate::audio::PlaybackHandle;
use crate::library::{Picker, Track};
use crate::metadata::format_mmss;

/// Title shown when nothing is playing.
pub const DEFAULT_TITLE: &str = "Music Player 1.0";

/// The playback state of the application.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// The on-screen buttons, in focus-cycle order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    Load,
    LoadFolder,
    Play,
    Pause,
    Stop,
    Next,
    Previous,
}

impl Button {
    pub const ALL: [Button; 7] = [
        Button::Load,
        Button::LoadFolder,
        Button::Play,
        Button::Pause,
        Button::Stop,
        Button::Next,
        Button::Previous,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Button::Load => " Load Music ",
            Button::LoadFolder => " Load Folder ",
            Button::Play => " ▶ ",
            Button::Pause => " || ",
            Button::Stop => " ■ ",
            Button::Next => " → ",
            Button::Previous => " ← ",
        }
    }

    /// Transport buttons stay disabled until a track list is loaded.
    pub fn is_transport(self) -> bool {
        !matches!(self, Button::Load | Button::LoadFolder)
    }
}

/// What is currently playing, as shown in the label and slider bound.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NowPlaying {
    pub label: String,
    pub duration: Duration,
}

/// The main application model.
pub struct App {
    pub tracks: Vec<Track>,
    pub current: usize,
    pub playback: PlaybackState,
    pub playback_handle: Option<PlaybackHandle>,

    pub now_playing: Option<NowPlaying>,
    /// Last known playback offset, kept in the slider.
    pub slider_pos: Duration,

    pub focus: Button,
    pub picker: Option<Picker>,
    pub status: Option<String>,
}

impl App {
    pub fn new() -> Self {
        Self {
            tracks: Vec::new(),
            current: 0,
            playback: PlaybackState::Stopped,
            playback_handle: None,
            now_playing: None,
            slider_pos: Duration::ZERO,
            focus: Button::Load,
            picker: None,
            status: None,
        }
    }

    /// Attach a `PlaybackHandle` used to observe playback progress.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    /// Return true if the track list contains any entries.
    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Transport controls are enabled exactly when a list is loaded.
    pub fn controls_enabled(&self) -> bool {
        self.has_tracks()
    }

    pub fn button_enabled(&self, button: Button) -> bool {
        !button.is_transport() || self.controls_enabled()
    }

    /// Replace the track list with a freshly selected one.
    ///
    /// A non-empty list resets the current index to 0 and lands in
    /// Stopped with the default title. An empty selection (cancelled
    /// dialog, folder without matches) changes nothing and returns
    /// false.
    pub fn load_tracks(&mut self, tracks: Vec<Track>) -> bool {
        if tracks.is_empty() {
            return false;
        }
        self.tracks = tracks;
        self.current = 0;
        self.playback = PlaybackState::Stopped;
        self.clear_now_playing();
        self.status = None;
        true
    }

    /// Step the current index forward, clamped at the last track.
    /// Returns the new index, or `None` when already at the end.
    pub fn advance(&mut self) -> Option<usize> {
        if self.current + 1 < self.tracks.len() {
            self.current += 1;
            Some(self.current)
        } else {
            None
        }
    }

    /// Step the current index backward, clamped at 0.
    /// Returns the new index, or `None` when already at the start.
    pub fn retreat(&mut self) -> Option<usize> {
        if self.current > 0 && self.current < self.tracks.len() {
            self.current -= 1;
            Some(self.current)
        } else {
            None
        }
    }

    /// Publish fresh metadata for the track that just became current.
    pub fn set_now_playing(&mut self, name: &str, duration: Duration) {
        self.now_playing = Some(NowPlaying {
            label: format!("{} - {}", name, format_mmss(duration)),
            duration,
        });
        self.slider_pos = Duration::ZERO;
    }

    /// Reset the label to the default title and zero the slider.
    pub fn clear_now_playing(&mut self) {
        self.now_playing = None;
        self.slider_pos = Duration::ZERO;
    }

    /// The "now playing" line shown under the heading.
    pub fn now_playing_text(&self) -> String {
        match &self.now_playing {
            Some(np) => format!("Now Playing: {}", np.label),
            None => DEFAULT_TITLE.to_string(),
        }
    }

    /// Absolute seek target after stepping the slider by `step` seconds,
    /// clamped to the current track's duration. `None` when no track
    /// metadata is loaded.
    pub fn seek_target(&self, forward: bool, step: u64) -> Option<Duration> {
        let duration = self.now_playing.as_ref()?.duration;
        let step = Duration::from_secs(step);
        let target = if forward {
            (self.slider_pos + step).min(duration)
        } else {
            self.slider_pos.saturating_sub(step)
        };
        Some(target)
    }

    pub fn focus_next(&mut self) {
        let pos = Button::ALL.iter().position(|b| *b == self.focus).unwrap_or(0);
        self.focus = Button::ALL[(pos + 1) % Button::ALL.len()];
    }

    pub fn focus_prev(&mut self) {
        let pos = Button::ALL.iter().position(|b| *b == self.focus).unwrap_or(0);
        self.focus = Button::ALL[(pos + Button::ALL.len() - 1) % Button::ALL.len()];
    }

    pub fn set_status(&mut self, msg: String) {
        self.status = Some(msg);
    }
}
