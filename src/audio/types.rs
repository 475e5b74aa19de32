//! Audio-related small types and handles.
//!
//! Commands sent to the audio thread, the shared playback info read by
//! the UI, and the errors the playback path can produce.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

#[derive(Debug)]
pub enum AudioCmd {
    /// Load the file fresh from disk and start playing at position 0.
    /// `generation` tags this command so the runtime can tell the new
    /// sink apart from whatever was loaded before.
    Play { generation: u64, path: PathBuf },
    /// Suspend output without discarding the position.
    Pause,
    /// Resume output exactly where pause left it.
    Resume,
    /// Halt and discard the position.
    Stop,
    /// Jump to an absolute offset in the current track. Ignored when
    /// nothing is loaded.
    SeekTo(Duration),
    /// Quit the audio thread, fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// Tag of the `Play` command whose sink is currently loaded, `None`
    /// after a stop or when the track drained on its own.
    pub generation: Option<u64>,
    /// Elapsed playback time for the current track.
    pub elapsed: Duration,
    /// Whether the sink is currently producing sound.
    pub playing: bool,
    /// Last load/decode failure, if any; the runtime consumes it.
    pub error: Option<String>,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        source: rodio::decoder::DecoderError,
    },
}
