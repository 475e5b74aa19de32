use super::*;
use crate::library::Track;
use std::path::PathBuf;
use std::time::Duration;

fn t(name: &str) -> Track {
    Track {
        path: PathBuf::from(format!("/music/{name}")),
        name: name.into(),
    }
}

#[test]
fn new_app_starts_stopped_with_controls_disabled() {
    let app = App::new();
    assert_eq!(app.playback, PlaybackState::Stopped);
    assert!(!app.controls_enabled());
    assert!(app.button_enabled(Button::Load));
    assert!(app.button_enabled(Button::LoadFolder));
    for b in Button::ALL {
        if b.is_transport() {
            assert!(!app.button_enabled(b), "{b:?} should start disabled");
        }
    }
    assert_eq!(app.now_playing_text(), DEFAULT_TITLE);
}

#[test]
fn load_tracks_resets_index_and_enables_controls() {
    let mut app = App::new();
    app.current = 3;
    app.playback = PlaybackState::Playing;

    assert!(app.load_tracks(vec![t("a.mp3"), t("b.ogg")]));
    assert_eq!(app.current, 0);
    assert_eq!(app.playback, PlaybackState::Stopped);
    assert!(app.controls_enabled());
    for b in Button::ALL {
        assert!(app.button_enabled(b));
    }
}

#[test]
fn load_empty_selection_is_a_no_op() {
    let mut app = App::new();
    assert!(app.load_tracks(vec![t("a.mp3")]));
    app.current = 0;

    assert!(!app.load_tracks(Vec::new()));
    assert_eq!(app.tracks.len(), 1);
    assert!(app.controls_enabled());
}

#[test]
fn advance_clamps_at_last_index() {
    let mut app = App::new();
    app.load_tracks(vec![t("a.mp3"), t("b.mp3")]);

    assert_eq!(app.advance(), Some(1));
    // At the last valid index: state and index stay unchanged, the
    // caller gets no index to load.
    assert_eq!(app.advance(), None);
    assert_eq!(app.current, 1);
}

#[test]
fn retreat_clamps_at_zero() {
    let mut app = App::new();
    app.load_tracks(vec![t("a.mp3"), t("b.mp3")]);

    assert_eq!(app.retreat(), None);
    assert_eq!(app.current, 0);

    app.advance();
    assert_eq!(app.retreat(), Some(0));
}

#[test]
fn advance_on_empty_list_is_inert() {
    let mut app = App::new();
    assert_eq!(app.advance(), None);
    assert_eq!(app.retreat(), None);
    assert_eq!(app.current, 0);
}

#[test]
fn now_playing_label_shows_name_and_duration() {
    let mut app = App::new();
    app.set_now_playing("song.mp3", Duration::from_secs(185));
    assert_eq!(app.now_playing_text(), "Now Playing: song.mp3 - 03:05");
    assert_eq!(app.slider_pos, Duration::ZERO);

    app.clear_now_playing();
    assert_eq!(app.now_playing_text(), DEFAULT_TITLE);
}

#[test]
fn seek_target_clamps_to_track_bounds() {
    let mut app = App::new();
    assert_eq!(app.seek_target(true, 5), None);

    app.set_now_playing("song.mp3", Duration::from_secs(30));
    app.slider_pos = Duration::from_secs(28);
    assert_eq!(app.seek_target(true, 5), Some(Duration::from_secs(30)));

    app.slider_pos = Duration::from_secs(2);
    assert_eq!(app.seek_target(false, 5), Some(Duration::ZERO));
    assert_eq!(app.seek_target(true, 5), Some(Duration::from_secs(7)));
}

#[test]
fn focus_cycles_through_all_buttons() {
    let mut app = App::new();
    assert_eq!(app.focus, Button::Load);

    for expected in Button::ALL.iter().skip(1) {
        app.focus_next();
        assert_eq!(app.focus, *expected);
    }
    app.focus_next();
    assert_eq!(app.focus, Button::Load);

    app.focus_prev();
    assert_eq!(app.focus, Button::Previous);
}
