use std::path::PathBuf;

/// A playable entry in the track list.
///
/// Duration is not stored here; it is probed from the file's tags each
/// time the track becomes current (see `crate::metadata`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    pub name: String,
}

impl Track {
    /// Build a track from a path, using the file basename as its name.
    pub fn from_path(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, name }
    }
}

/// Map selected paths to tracks, preserving selection order.
pub fn tracks_from_paths(paths: Vec<PathBuf>) -> Vec<Track> {
    paths.into_iter().map(Track::from_path).collect()
}
