//! Photomark Replay
//!
//! Headless driver that replays recorded host events through the annotation
//! engine and writes the resulting annotation JSON and PNG layer.

mod error;
mod replay;
mod script;

pub use error::ReplayError;
pub use replay::{LoggingObserver, ReplayOptions, ReplayReport, engine_for, replay, run};
pub use script::{Event, Script, SurfaceSize};
