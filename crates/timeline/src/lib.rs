use thiserror::Error;

mod clip;
pub use clip::*;
mod collection;
pub use collection::*;
mod config;
pub use config::*;
mod snap;
pub use snap::*;
mod selection;
pub use selection::*;
mod drag;
pub use drag::*;
mod history;
pub use history::*;
mod clipboard;
pub use clipboard::*;
mod keyboard;
pub use keyboard::*;
mod timecode;
pub use timecode::*;
mod engine;
pub use engine::*;
mod commands;
pub use commands::*;

/// Timeline positions and durations, in seconds.
pub type Seconds = f64;

#[derive(Debug, Error)]
pub enum TimelineError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("clip not found: {0}")]
    ClipNotFound(ClipId),
    #[error("no clip at index {0}")]
    ClipIndexOutOfRange(usize),
    #[error("a pointer gesture is already in progress")]
    GestureInProgress,
    #[error("no pointer gesture in progress")]
    NoActiveGesture,
    #[error("no marquee selection in progress")]
    NoActiveMarquee,
}
