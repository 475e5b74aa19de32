use std::fs::File;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config as LogConfig, LevelFilter, WriteLogger};

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::mpris::ControlCmd;

mod event_loop;
mod mpris_sync;
mod settings;

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let log_file = std::env::temp_dir().join("rondo.log");
    WriteLogger::init(LevelFilter::Info, LogConfig::default(), File::create(log_file)?)?;
    Ok(())
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    if let Err(e) = init_logging() {
        // Logging is best-effort; the player still works without it.
        eprintln!("rondo: could not open log file: {e}");
    }

    let audio_player = AudioPlayer::new(settings.audio.clone());
    let mut app = App::new();
    app.set_playback_handle(audio_player.playback_handle());

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    mpris_sync::update_mpris(&mpris, &app);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = {
        let mut state = event_loop::EventLoopState::new(&app);
        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &audio_player,
            &mpris,
            &control_rx,
            &mut state,
        )
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
