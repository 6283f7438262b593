//! Watch-mode tasks
//!
//! The refresh task polls the remote definition; the watch task renders it
//! once per second. They share snapshots over a watch channel.

pub mod refresh;
pub mod watch;

// Re-export main functions
pub use refresh::refresh_task;
pub use watch::{render_status, watch_task};
