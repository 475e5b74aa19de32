//! Library selection: folder scanning and the in-app file/folder picker.
//!
//! The picker produces ordered lists of track paths; the scanner turns a
//! chosen folder into tracks by filtering its immediate children.

mod model;
mod picker;
mod scan;

pub use model::*;
pub use picker::*;
pub use scan::*;
