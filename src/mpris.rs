//! MPRIS (org.mpris.MediaPlayer2) service so desktop media keys and
//! `playerctl` can drive the transport.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use zbus::{Connection, interface};
use zvariant::{OwnedValue, Value};

use crate::app::PlaybackState;

/// Transport gestures arriving from outside the terminal.
#[derive(Clone, Debug)]
pub enum ControlCmd {
    Quit,
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Prev,
}

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
}

pub struct MprisHandle {
    state: Arc<Mutex<SharedState>>,
}

impl MprisHandle {
    pub fn set_playback(&self, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
        }
    }

    pub fn set_title(&self, title: Option<String>) {
        if let Ok(mut s) = self.state.lock() {
            s.title = title;
        }
    }
}

struct RootIface {
    tx: Sender<ControlCmd>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for a terminal app.
    }

    fn quit(&self) {
        let _ = self.tx.send(ControlCmd::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "rondo"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<ControlCmd>,
    state: Arc<Mutex<SharedState>>,
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(ControlCmd::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(ControlCmd::Prev);
    }

    fn play(&self) {
        let _ = self.tx.send(ControlCmd::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(ControlCmd::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(ControlCmd::PlayPause);
    }

    fn stop(&self) {
        let _ = self.tx.send(ControlCmd::Stop);
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        // Minimal metadata so `playerctl metadata` shows something.
        let mut map = HashMap::new();
        let title = self
            .state
            .lock()
            .ok()
            .and_then(|s| s.title.clone())
            .unwrap_or_default();

        let title_value = OwnedValue::try_from(Value::from(title)).unwrap_or_else(|_| {
            OwnedValue::try_from(Value::from(String::new())).expect("OwnedValue conversion")
        });

        map.insert("xesam:title".to_string(), title_value);
        map
    }
}

pub fn spawn_mpris(tx: Sender<ControlCmd>) -> MprisHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let path = "/org/mpris/MediaPlayer2";

            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("MPRIS: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection.request_name("org.mpris.MediaPlayer2.rondo").await {
                log::warn!("MPRIS: failed to acquire name: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server.at(path, RootIface { tx: tx.clone() }).await {
                log::warn!("MPRIS: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    path,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                log::warn!("MPRIS: failed to register player iface: {e}");
                return;
            }

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    MprisHandle { state }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn playback_status_maps_state_to_mpris_strings() {
        let state = Arc::new(Mutex::new(SharedState::default()));
        let (tx, _rx) = mpsc::channel::<ControlCmd>();
        let iface = PlayerIface {
            tx,
            state: state.clone(),
        };

        assert_eq!(iface.playback_status(), "Stopped");

        state.lock().unwrap().playback = PlaybackState::Playing;
        assert_eq!(iface.playback_status(), "Playing");

        state.lock().unwrap().playback = PlaybackState::Paused;
        assert_eq!(iface.playback_status(), "Paused");
    }

    #[test]
    fn metadata_carries_the_now_playing_title() {
        let state = Arc::new(Mutex::new(SharedState::default()));
        let (tx, _rx) = mpsc::channel::<ControlCmd>();
        let iface = PlayerIface {
            tx,
            state: state.clone(),
        };

        state.lock().unwrap().title = Some("song.mp3 - 03:05".to_string());
        let map = iface.metadata();
        assert!(map.contains_key("xesam:title"));
    }

    #[test]
    fn handle_updates_shared_state() {
        let state = Arc::new(Mutex::new(SharedState::default()));
        let handle = MprisHandle {
            state: state.clone(),
        };

        handle.set_playback(PlaybackState::Playing);
        handle.set_title(Some("t".into()));
        {
            let s = state.lock().unwrap();
            assert_eq!(s.playback, PlaybackState::Playing);
            assert_eq!(s.title.as_deref(), Some("t"));
        }

        handle.set_title(None);
        assert!(state.lock().unwrap().title.is_none());
    }
}
