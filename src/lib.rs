//! roundtimer - Terminal client for a shared multi-segment interval timer
//!
//! The `round` module is the computation core: pure functions that derive a
//! timer's lifecycle state, the active segment, and recalculated start
//! instants for edits. The rest of the crate fetches definitions from the
//! remote service and drives a 1 Hz terminal display.

pub mod api;
pub mod config;
pub mod model;
pub mod round;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::ApiClient;
pub use config::Config;
pub use model::{Segment, Timer};
pub use round::{evaluate_round, evaluate_segment, format_duration, recalculate_start_at};
pub use utils::shutdown_signal;
