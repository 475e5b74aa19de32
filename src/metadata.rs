//! On-demand duration probing via a fixed chain of tag readers.
//!
//! The file extension is never trusted for dispatch: readers are tried
//! in a fixed order (MPEG, then FLAC, then Ogg Vorbis) and the first one
//! that parses the file wins. Only when every reader fails does the
//! probe return an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::error::LoftyError;
use lofty::file::FileType;
use lofty::prelude::AudioFile;
use lofty::probe::Probe;
use thiserror::Error;

/// Reader priority for duration probing.
pub const READER_ORDER: [FileType; 3] = [FileType::Mpeg, FileType::Flac, FileType::Vorbis];

#[derive(Debug, Error)]
pub enum MetadataError {
    /// Every reader in [`READER_ORDER`] refused the file; carries the
    /// last reader's error.
    #[error("no tag reader could parse {}: {source}", path.display())]
    Unreadable { path: PathBuf, source: LoftyError },
}

fn read_duration_as(path: &Path, file_type: FileType) -> Result<Duration, LoftyError> {
    let tagged = Probe::open(path)?.set_file_type(file_type).read()?;
    Ok(tagged.properties().duration())
}

/// Probe the total duration of the audio file at `path`.
pub fn probe_duration(path: &Path) -> Result<Duration, MetadataError> {
    let mut last = match read_duration_as(path, READER_ORDER[0]) {
        Ok(d) => return Ok(d),
        Err(e) => e,
    };
    for file_type in &READER_ORDER[1..] {
        match read_duration_as(path, *file_type) {
            Ok(d) => return Ok(d),
            Err(e) => last = e,
        }
    }
    Err(MetadataError::Unreadable {
        path: path.to_path_buf(),
        source: last,
    })
}

/// Format a `Duration` as zero-padded `MM:SS`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
