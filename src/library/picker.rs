//! Modal file/folder chooser rendered over the main view.
//!
//! The picker owns only navigation state; the runtime feeds it key
//! gestures and reads the outcome. File selections keep the order in
//! which the user marked them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::scan::is_supported;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PickerMode {
    /// Choose one or more audio files.
    Files,
    /// Choose a directory whose immediate children become the track list.
    Folder,
}

#[derive(Debug, Clone)]
pub struct PickerEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
}

/// What a confirm gesture produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Files(Vec<PathBuf>),
    Folder(PathBuf),
    /// Nothing to confirm yet (e.g. no file marked or under the cursor).
    Pending,
}

pub struct Picker {
    pub mode: PickerMode,
    pub cwd: PathBuf,
    pub entries: Vec<PickerEntry>,
    pub cursor: usize,
    pub marked: Vec<PathBuf>,
    extensions: Vec<String>,
}

impl Picker {
    /// Open a picker rooted at `dir`.
    pub fn open(mode: PickerMode, dir: &Path, extensions: &[String]) -> io::Result<Self> {
        let mut picker = Self {
            mode,
            cwd: dir.to_path_buf(),
            entries: Vec::new(),
            cursor: 0,
            marked: Vec::new(),
            extensions: extensions.to_vec(),
        };
        picker.refresh()?;
        Ok(picker)
    }

    /// Re-list the current directory. Directories always show; files only
    /// in Files mode and only when their name carries a supported suffix.
    /// Entries keep the filesystem's enumeration order.
    fn refresh(&mut self) -> io::Result<()> {
        self.entries.clear();
        self.cursor = 0;

        for entry in fs::read_dir(&self.cwd)? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = path.is_dir();

            if is_dir {
                self.entries.push(PickerEntry { path, name, is_dir });
            } else if self.mode == PickerMode::Files && is_supported(&name, &self.extensions) {
                self.entries.push(PickerEntry { path, name, is_dir });
            }
        }

        Ok(())
    }

    pub fn cursor_entry(&self) -> Option<&PickerEntry> {
        self.entries.get(self.cursor)
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Descend into the directory under the cursor, if any.
    pub fn descend(&mut self) -> io::Result<()> {
        let Some(entry) = self.cursor_entry() else {
            return Ok(());
        };
        if !entry.is_dir {
            return Ok(());
        }
        self.cwd = entry.path.clone();
        self.refresh()
    }

    /// Go up to the parent directory, if there is one.
    pub fn ascend(&mut self) -> io::Result<()> {
        let Some(parent) = self.cwd.parent().map(Path::to_path_buf) else {
            return Ok(());
        };
        self.cwd = parent;
        self.refresh()
    }

    pub fn is_marked(&self, path: &Path) -> bool {
        self.marked.iter().any(|p| p == path)
    }

    /// Mark or unmark the file under the cursor (Files mode only).
    /// Marks accumulate in selection order.
    pub fn toggle_mark(&mut self) {
        if self.mode != PickerMode::Files {
            return;
        }
        let Some(entry) = self.cursor_entry() else {
            return;
        };
        if entry.is_dir {
            return;
        }
        let path = entry.path.clone();
        if let Some(pos) = self.marked.iter().position(|p| *p == path) {
            self.marked.remove(pos);
        } else {
            self.marked.push(path);
        }
    }

    /// Confirm the selection.
    ///
    /// Files mode returns the marked paths in selection order, or the
    /// file under the cursor when nothing was marked. Folder mode
    /// returns the directory currently listed.
    pub fn confirm(&self) -> PickerOutcome {
        match self.mode {
            PickerMode::Files => {
                if !self.marked.is_empty() {
                    return PickerOutcome::Files(self.marked.clone());
                }
                match self.cursor_entry() {
                    Some(entry) if !entry.is_dir => {
                        PickerOutcome::Files(vec![entry.path.clone()])
                    }
                    _ => PickerOutcome::Pending,
                }
            }
            PickerMode::Folder => PickerOutcome::Folder(self.cwd.clone()),
        }
    }
}
