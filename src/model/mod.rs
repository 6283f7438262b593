//! Wire data model shared with the remote timer service
//!
//! Field names follow the server's JSON shape exactly; renaming anything
//! here breaks interoperability.

pub mod segment;
pub mod timer;

// Re-export main types
pub use segment::{validate_segments, Segment, Sound};
pub use timer::{DisplayOptions, PreStartBehaviour, Timer, TimerMetadata};
