//! Audio playback: a dedicated thread owning the rodio output stream,
//! driven by commands and publishing progress through a shared handle.

mod player;
mod sink;
mod thread;
mod types;

pub use player::*;
pub use types::*;
