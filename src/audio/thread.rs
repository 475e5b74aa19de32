use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use crate::config::AudioSettings;

use super::sink::create_sink_at;
use super::types::{AudioCmd, PlaybackHandle};

/// Everything the audio thread tracks about the stream it drives.
struct PlayerState {
    stream: OutputStream,
    info: PlaybackHandle,
    sink: Option<Sink>,
    generation: Option<u64>,
    path: Option<PathBuf>,
    paused: bool,
    /// Wall-clock instant playback (re)started; `None` while paused.
    started_at: Option<Instant>,
    /// Elapsed time accumulated across pauses and seeks.
    accumulated: Duration,
}

impl PlayerState {
    fn new(stream: OutputStream, info: PlaybackHandle) -> Self {
        Self {
            stream,
            info,
            sink: None,
            generation: None,
            path: None,
            paused: false,
            started_at: None,
            accumulated: Duration::ZERO,
        }
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    /// Load `path` fresh from disk and start playing at position 0.
    /// A failed load keeps the previous state and publishes the error.
    fn play(&mut self, generation: u64, path: PathBuf) {
        let new_sink = match create_sink_at(&self.stream, &path, Duration::ZERO) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("audio: {e}");
                if let Ok(mut info) = self.info.lock() {
                    info.error = Some(e.to_string());
                }
                return;
            }
        };

        if let Some(old) = self.sink.take() {
            old.stop();
        }

        new_sink.play();
        self.sink = Some(new_sink);
        self.generation = Some(generation);
        self.path = Some(path);
        self.paused = false;
        self.started_at = Some(Instant::now());
        self.accumulated = Duration::ZERO;

        if let Ok(mut info) = self.info.lock() {
            info.generation = Some(generation);
            info.elapsed = Duration::ZERO;
            info.playing = true;
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.generation = None;
        self.path = None;
        self.paused = false;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        if let Ok(mut info) = self.info.lock() {
            info.generation = None;
            info.elapsed = Duration::ZERO;
            info.playing = false;
        }
    }

    fn pause(&mut self) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        if self.paused {
            return;
        }
        s.pause();
        if let Some(st) = self.started_at.take() {
            self.accumulated += st.elapsed();
        }
        self.paused = true;
        if let Ok(mut info) = self.info.lock() {
            info.playing = false;
        }
    }

    fn resume(&mut self) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        if !self.paused {
            return;
        }
        s.play();
        self.started_at = Some(Instant::now());
        self.paused = false;
        if let Ok(mut info) = self.info.lock() {
            info.playing = true;
        }
    }

    /// Jump to an absolute offset by rebuilding the sink and skipping
    /// into the file. No-op when nothing is loaded.
    fn seek_to(&mut self, target: Duration) {
        let Some(path) = self.path.clone() else {
            return;
        };
        if self.sink.is_none() {
            return;
        }

        let new_sink = match create_sink_at(&self.stream, &path, target) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("audio: seek rebuild failed: {e}");
                if let Ok(mut info) = self.info.lock() {
                    info.error = Some(e.to_string());
                }
                return;
            }
        };

        if let Some(old) = self.sink.take() {
            old.stop();
        }

        if self.paused {
            self.started_at = None;
        } else {
            new_sink.play();
            self.started_at = Some(Instant::now());
        }
        self.sink = Some(new_sink);
        self.accumulated = target;

        if let Ok(mut info) = self.info.lock() {
            info.elapsed = target;
        }
    }

    /// Periodic wake-up: publish the current offset while sound is
    /// being produced, and fold a drained sink into a stop.
    fn tick(&mut self) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        if self.paused {
            return;
        }
        if s.empty() {
            // The track finished on its own.
            self.stop();
            return;
        }
        let elapsed = self.elapsed();
        if let Ok(mut info) = self.info.lock() {
            info.elapsed = elapsed;
        }
    }

    fn fade_out(&mut self, fade_out_ms: u64) {
        let Some(s) = self.sink.as_ref() else {
            return;
        };
        if fade_out_ms == 0 || self.paused {
            s.stop();
            return;
        }
        let steps: u64 = 20;
        let step_ms = (fade_out_ms / steps).max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            s.set_volume(1.0 - t);
            thread::sleep(Duration::from_millis(step_ms));
        }
        s.stop();
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    playback_info: PlaybackHandle,
    audio_settings: AudioSettings,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream =
            OutputStreamBuilder::open_default_stream().expect("ERR: No audio output device");
        // rodio logs to stderr when OutputStream is dropped. That's useful in
        // debugging, but noisy for a TUI app.
        let mut stream = stream;
        stream.log_on_drop(false);

        let mut state = PlayerState::new(stream, playback_info);
        let poll = Duration::from_millis(audio_settings.poll_interval_ms.max(10));

        loop {
            match rx.recv_timeout(poll) {
                Ok(cmd) => match cmd {
                    AudioCmd::Play { generation, path } => state.play(generation, path),
                    AudioCmd::Pause => state.pause(),
                    AudioCmd::Resume => state.resume(),
                    AudioCmd::Stop => state.stop(),
                    AudioCmd::SeekTo(target) => state.seek_to(target),
                    AudioCmd::Quit { fade_out_ms } => {
                        state.fade_out(fade_out_ms);
                        // Publish the silenced state for any final frame.
                        if let Ok(mut info) = state.info.lock() {
                            info.playing = false;
                        }
                        break;
                    }
                },
                Err(RecvTimeoutError::Timeout) => state.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}
