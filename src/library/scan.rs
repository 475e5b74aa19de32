use std::path::Path;

use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::model::Track;

/// Whether a file name carries one of the configured audio suffixes.
///
/// The match is deliberately case-sensitive: `song.MP3` is not a
/// supported name unless `MP3` is in the extension list.
pub fn is_supported(file_name: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| {
        let ext = ext.trim().trim_start_matches('.');
        !ext.is_empty() && file_name.ends_with(&format!(".{ext}"))
    })
}

/// List the playable tracks among a directory's immediate children.
///
/// Only plain files directly inside `dir` are considered; there is no
/// recursion, no sorting (the filesystem's enumeration order is kept)
/// and no check that the files actually decode.
pub fn folder_tracks(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks: Vec<Track> = Vec::new();

    for entry in WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
    {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let supported = path
            .file_name()
            .and_then(|s| s.to_str())
            .map(|name| is_supported(name, &settings.extensions))
            .unwrap_or(false);
        if supported {
            tracks.push(Track::from_path(path.to_path_buf()));
        }
    }

    tracks
}
