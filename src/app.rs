//! Application module: exposes the player state model used by the UI
//! and runtime.
//!
//! The `App` model lives in `app::model` and owns the track list, the
//! current index and the playback state machine.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
