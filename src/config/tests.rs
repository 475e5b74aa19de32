use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_rondo_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("RONDO_CONFIG_PATH", "/tmp/rondo-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/rondo-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("rondo")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("rondo")
            .join("config.toml")
    );
}

#[test]
fn defaults_match_the_reference_player() {
    let s = Settings::default();
    assert_eq!(s.ui.heading_text, "MUSIC PLAYER 1.0");
    assert_eq!(s.ui.background, "#1e1e1e");
    assert_eq!(s.ui.load_button, "#4CAF50");
    assert_eq!(s.ui.folder_button, "#2196F3");
    assert_eq!(s.audio.poll_interval_ms, 100);
    assert_eq!(s.controls.seek_step_seconds, 5);
    assert_eq!(
        s.library.extensions,
        vec!["mp3".to_string(), "flac".to_string(), "ogg".to_string()]
    );
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r##"
[audio]
poll_interval_ms = 250
quit_fade_out_ms = 123

[controls]
seek_step_seconds = 9

[ui]
heading_text = "hello"
background = "#000000"

[library]
extensions = ["mp3"]
follow_links = false
start_dir = "/music"
"##,
    )
    .unwrap();

    let _g1 = EnvGuard::set("RONDO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("RONDO__AUDIO__POLL_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.audio.poll_interval_ms, 250);
    assert_eq!(s.audio.quit_fade_out_ms, 123);
    assert_eq!(s.controls.seek_step_seconds, 9);
    assert_eq!(s.ui.heading_text, "hello");
    assert_eq!(s.ui.background, "#000000");
    // Unset fields fall back to defaults.
    assert_eq!(s.ui.load_button, "#4CAF50");
    assert_eq!(s.library.extensions, vec!["mp3".to_string()]);
    assert!(!s.library.follow_links);
    assert_eq!(s.library.start_dir.as_deref(), Some("/music"));
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[controls]
seek_step_seconds = 5
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("RONDO_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("RONDO__CONTROLS__SEEK_STEP_SECONDS", "30");

    let s = Settings::load().unwrap();
    assert_eq!(s.controls.seek_step_seconds, 30);
}

#[test]
fn validate_rejects_out_of_range_values() {
    let mut s = Settings::default();
    s.audio.poll_interval_ms = 1;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.controls.seek_step_seconds = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.library.extensions.clear();
    assert!(s.validate().is_err());
}
