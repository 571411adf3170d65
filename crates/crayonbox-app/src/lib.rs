//! Crayonbox command-line host.
//!
//! Feeds recorded input scripts through a [`crayonbox_core::DrawingSession`]
//! and writes the resulting images.

pub mod config;
pub mod replay;

pub use config::load_config;
pub use replay::{ReplayError, ReplaySummary, Replayer, Script, ScriptStep};
