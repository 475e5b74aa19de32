use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{App, Button, PlaybackState};
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config;
use crate::library::{Picker, PickerMode, PickerOutcome, folder_tracks, tracks_from_paths};
use crate::metadata;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::update_mpris;
use crate::ui;

/// State tracked by the runtime event loop across iterations.
pub struct EventLoopState {
    /// Tag of a `Play` command sent to the audio thread but not yet
    /// confirmed back through the playback handle. While set, an empty
    /// playback generation means "still loading", not "track finished" —
    /// the old sink may drain before the new command is picked up.
    pub pending_play: Option<u64>,
    /// Monotonic tag handed to each `Play` command.
    play_generation: u64,
    /// Last-known playback state as emitted to MPRIS.
    last_mpris_playback: PlaybackState,
    /// Last-known now-playing label as emitted to MPRIS.
    last_mpris_title: Option<String>,
}

impl EventLoopState {
    pub fn new(app: &App) -> Self {
        Self {
            pending_play: None,
            play_generation: 0,
            last_mpris_playback: app.playback,
            last_mpris_title: None,
        }
    }
}

/// Main terminal event loop: handles input, UI drawing, sync with the audio
/// thread and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        sync_from_audio(app, state);

        // Keep MPRIS in sync even when changes come from media keys or a
        // track ending on its own.
        let title = app.now_playing.as_ref().map(|np| np.label.clone());
        if app.playback != state.last_mpris_playback || title != state.last_mpris_title {
            update_mpris(mpris, app);
            state.last_mpris_playback = app.playback;
            state.last_mpris_title = title;
        }

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, settings, app, audio_player, state) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, app, audio_player, state) {
                    return Ok(());
                }
            }
        }
    }
}

/// Pull the audio thread's published state into the model: the slider
/// follows the elapsed offset, load errors land in the status line, and
/// a drained sink turns Playing back into Stopped.
fn sync_from_audio(app: &mut App, state: &mut EventLoopState) {
    let Some(handle) = app.playback_handle.as_ref().cloned() else {
        return;
    };
    let Ok(mut info) = handle.lock() else {
        return;
    };

    let generation = info.generation;
    let playing = info.playing;
    let elapsed = info.elapsed;
    let error = info.error.take();
    drop(info);

    // The slider follows only while the sink actually produces sound.
    if playing {
        app.slider_pos = elapsed;
    }

    if let Some(msg) = error {
        app.set_status(msg);
        // The Play we were waiting for failed; fall back to Stopped.
        if state.pending_play.take().is_some() {
            app.playback = PlaybackState::Stopped;
            app.clear_now_playing();
        }
        return;
    }

    match state.pending_play {
        Some(pending) if generation == Some(pending) => state.pending_play = None,
        Some(_) => {}
        None => {
            if app.playback == PlaybackState::Playing && generation.is_none() {
                // The track ran to its natural end.
                app.playback = PlaybackState::Stopped;
                app.clear_now_playing();
            }
        }
    }
}

/// Returns true when the loop should exit.
fn handle_control_cmd(
    cmd: ControlCmd,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    state: &mut EventLoopState,
) -> bool {
    match cmd {
        ControlCmd::Quit => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return true;
        }
        ControlCmd::Play => press_play(app, audio_player, state),
        ControlCmd::Pause => press_pause(app, audio_player),
        ControlCmd::PlayPause => press_play_pause(app, audio_player, state),
        ControlCmd::Stop => press_stop(app, audio_player, state),
        ControlCmd::Next => press_next(app, audio_player, state),
        ControlCmd::Prev => press_prev(app, audio_player, state),
    }
    false
}

/// Returns true when the loop should exit.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    state: &mut EventLoopState,
) -> bool {
    if app.picker.is_some() {
        handle_picker_key(key, settings, app, audio_player, state);
        return false;
    }

    match key.code {
        KeyCode::Char('q') => {
            audio_player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
            return true;
        }
        KeyCode::Char('o') => open_picker(PickerMode::Files, settings, app),
        KeyCode::Char('O') => open_picker(PickerMode::Folder, settings, app),
        KeyCode::Tab | KeyCode::Char('l') => app.focus_next(),
        KeyCode::BackTab | KeyCode::Char('h') => app.focus_prev(),
        KeyCode::Enter => activate_button(app.focus, settings, app, audio_player, state),
        KeyCode::Char(' ') | KeyCode::Char('p') => press_play_pause(app, audio_player, state),
        KeyCode::Char('s') => press_stop(app, audio_player, state),
        KeyCode::Char('n') => press_next(app, audio_player, state),
        KeyCode::Char('b') => press_prev(app, audio_player, state),
        KeyCode::Right => seek(true, settings, app, audio_player),
        KeyCode::Left => seek(false, settings, app, audio_player),
        _ => {}
    }
    false
}

fn handle_picker_key(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    state: &mut EventLoopState,
) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            // Cancelled selections leave the loaded list untouched.
            app.picker = None;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(p) = app.picker.as_mut() {
                p.move_down();
            }
        }
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(p) = app.picker.as_mut() {
                p.move_up();
            }
        }
        KeyCode::Backspace | KeyCode::Char('h') => {
            if let Some(Err(e)) = app.picker.as_mut().map(Picker::ascend) {
                app.set_status(format!("cannot read directory: {e}"));
                app.picker = None;
            }
        }
        KeyCode::Char(' ') => {
            if let Some(p) = app.picker.as_mut() {
                p.toggle_mark();
            }
        }
        KeyCode::Enter => {
            let on_dir = app
                .picker
                .as_ref()
                .and_then(Picker::cursor_entry)
                .is_some_and(|e| e.is_dir);
            if on_dir {
                if let Some(Err(e)) = app.picker.as_mut().map(Picker::descend) {
                    app.set_status(format!("cannot read directory: {e}"));
                    app.picker = None;
                }
            } else {
                confirm_picker(settings, app, audio_player, state);
            }
        }
        KeyCode::Char('y') => confirm_picker(settings, app, audio_player, state),
        _ => {}
    }
}

fn open_picker(mode: PickerMode, settings: &config::Settings, app: &mut App) {
    let dir = settings
        .library
        .start_dir
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));

    match Picker::open(mode, &dir, &settings.library.extensions) {
        Ok(p) => app.picker = Some(p),
        Err(e) => app.set_status(format!("cannot open {}: {e}", dir.display())),
    }
}

fn confirm_picker(
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    state: &mut EventLoopState,
) {
    let Some(outcome) = app.picker.as_ref().map(Picker::confirm) else {
        return;
    };

    let tracks = match outcome {
        PickerOutcome::Files(paths) => tracks_from_paths(paths),
        PickerOutcome::Folder(dir) => {
            let tracks = folder_tracks(&dir, &settings.library);
            if tracks.is_empty() {
                app.set_status(format!("no audio files in {}", dir.display()));
            }
            tracks
        }
        PickerOutcome::Pending => return,
    };

    app.picker = None;
    if app.load_tracks(tracks) {
        // A fresh list replaces whatever was playing.
        let _ = audio_player.send(AudioCmd::Stop);
        state.pending_play = None;
    }
}

fn activate_button(
    button: Button,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    state: &mut EventLoopState,
) {
    if !app.button_enabled(button) {
        return;
    }
    match button {
        Button::Load => open_picker(PickerMode::Files, settings, app),
        Button::LoadFolder => open_picker(PickerMode::Folder, settings, app),
        Button::Play => press_play(app, audio_player, state),
        Button::Pause => press_pause(app, audio_player),
        Button::Stop => press_stop(app, audio_player, state),
        Button::Next => press_next(app, audio_player, state),
        Button::Previous => press_prev(app, audio_player, state),
    }
}

/// Start the current track from the beginning: probe its duration for
/// the label and slider bound, then hand the path to the audio thread.
fn start_current(app: &mut App, audio_player: &AudioPlayer, state: &mut EventLoopState) {
    let Some(track) = app.tracks.get(app.current) else {
        return;
    };
    let name = track.name.clone();
    let path = track.path.clone();

    match metadata::probe_duration(&path) {
        Ok(duration) => {
            app.set_now_playing(&name, duration);
            app.status = None;
            app.playback = PlaybackState::Playing;
            state.play_generation += 1;
            state.pending_play = Some(state.play_generation);
            let _ = audio_player.send(AudioCmd::Play {
                generation: state.play_generation,
                path,
            });
        }
        Err(e) => {
            log::warn!("cannot start {}: {e}", path.display());
            app.set_status(format!("cannot read {name}"));
        }
    }
}

fn press_play(app: &mut App, audio_player: &AudioPlayer, state: &mut EventLoopState) {
    match app.playback {
        PlaybackState::Paused => {
            let _ = audio_player.send(AudioCmd::Resume);
            app.playback = PlaybackState::Playing;
        }
        PlaybackState::Stopped | PlaybackState::Playing => {
            if app.has_tracks() {
                start_current(app, audio_player, state);
            }
        }
    }
}

fn press_pause(app: &mut App, audio_player: &AudioPlayer) {
    if app.playback == PlaybackState::Playing {
        let _ = audio_player.send(AudioCmd::Pause);
        app.playback = PlaybackState::Paused;
    }
}

fn press_play_pause(app: &mut App, audio_player: &AudioPlayer, state: &mut EventLoopState) {
    match app.playback {
        PlaybackState::Playing => press_pause(app, audio_player),
        PlaybackState::Paused => press_play(app, audio_player, state),
        PlaybackState::Stopped => {
            if app.has_tracks() {
                start_current(app, audio_player, state);
            }
        }
    }
}

fn press_stop(app: &mut App, audio_player: &AudioPlayer, state: &mut EventLoopState) {
    let _ = audio_player.send(AudioCmd::Stop);
    app.playback = PlaybackState::Stopped;
    app.clear_now_playing();
    state.pending_play = None;
}

fn press_next(app: &mut App, audio_player: &AudioPlayer, state: &mut EventLoopState) {
    if app.has_tracks() && app.advance().is_some() {
        start_current(app, audio_player, state);
    }
}

fn press_prev(app: &mut App, audio_player: &AudioPlayer, state: &mut EventLoopState) {
    if app.has_tracks() && app.retreat().is_some() {
        start_current(app, audio_player, state);
    }
}

fn seek(forward: bool, settings: &config::Settings, app: &mut App, audio_player: &AudioPlayer) {
    if app.playback == PlaybackState::Stopped {
        return;
    }
    if let Some(target) = app.seek_target(forward, settings.controls.seek_step_seconds) {
        let _ = audio_player.send(AudioCmd::SeekTo(target));
        app.slider_pos = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::DEFAULT_TITLE;
    use crate::audio::{PlaybackHandle, PlaybackInfo};
    use std::sync::{Arc, Mutex};

    fn app_with_handle() -> (App, PlaybackHandle) {
        let handle: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));
        let mut app = App::new();
        app.set_playback_handle(handle.clone());
        (app, handle)
    }

    #[test]
    fn drained_sink_resets_playing_to_stopped() {
        let (mut app, handle) = app_with_handle();
        let mut state = EventLoopState::new(&app);
        app.set_now_playing("song.mp3", Duration::from_secs(185));
        app.playback = PlaybackState::Playing;
        // No pending play and no loaded generation: the track ran out.
        handle.lock().unwrap().generation = None;

        sync_from_audio(&mut app, &mut state);

        assert_eq!(app.playback, PlaybackState::Stopped);
        assert_eq!(app.now_playing_text(), DEFAULT_TITLE);
        assert_eq!(app.slider_pos, Duration::ZERO);
    }

    #[test]
    fn load_failure_surfaces_status_and_stops() {
        let (mut app, handle) = app_with_handle();
        let mut state = EventLoopState::new(&app);
        app.set_now_playing("bad.mp3", Duration::from_secs(10));
        app.playback = PlaybackState::Playing;
        state.pending_play = Some(1);
        handle.lock().unwrap().error = Some("failed to decode /m/bad.mp3".to_string());

        sync_from_audio(&mut app, &mut state);

        assert_eq!(app.playback, PlaybackState::Stopped);
        assert_eq!(app.status.as_deref(), Some("failed to decode /m/bad.mp3"));
        assert!(state.pending_play.is_none());
        assert_eq!(app.now_playing_text(), DEFAULT_TITLE);
        // The error was consumed; a second sync changes nothing.
        assert!(handle.lock().unwrap().error.is_none());
        sync_from_audio(&mut app, &mut state);
        assert_eq!(app.playback, PlaybackState::Stopped);
    }

    #[test]
    fn pending_play_shields_against_a_stale_drained_sink() {
        let (mut app, handle) = app_with_handle();
        let mut state = EventLoopState::new(&app);
        app.set_now_playing("song.mp3", Duration::from_secs(30));
        app.playback = PlaybackState::Playing;
        // A restart is in flight: the previous sink drained before the
        // audio thread picked up the new Play command.
        state.pending_play = Some(2);
        handle.lock().unwrap().generation = None;

        sync_from_audio(&mut app, &mut state);
        assert_eq!(app.playback, PlaybackState::Playing);

        // The new sink comes up and confirms the tag.
        handle.lock().unwrap().generation = Some(2);
        sync_from_audio(&mut app, &mut state);
        assert!(state.pending_play.is_none());
        assert_eq!(app.playback, PlaybackState::Playing);
    }

    #[test]
    fn slider_follows_elapsed_only_while_sound_is_produced() {
        let (mut app, handle) = app_with_handle();
        let mut state = EventLoopState::new(&app);
        app.set_now_playing("song.mp3", Duration::from_secs(60));
        app.playback = PlaybackState::Playing;
        {
            let mut info = handle.lock().unwrap();
            info.generation = Some(1);
            info.playing = true;
            info.elapsed = Duration::from_secs(7);
        }
        sync_from_audio(&mut app, &mut state);
        assert_eq!(app.slider_pos, Duration::from_secs(7));

        // Paused: the published offset must not move the slider.
        {
            let mut info = handle.lock().unwrap();
            info.playing = false;
            info.elapsed = Duration::from_secs(9);
        }
        sync_from_audio(&mut app, &mut state);
        assert_eq!(app.slider_pos, Duration::from_secs(7));
    }
}
