//! Timer progression core
//!
//! Pure, clock-free computation: given a timer definition and an instant,
//! derive the lifecycle state, the active segment and its remaining time,
//! and the `start_at` adjustments for edit actions. Everything else in this
//! crate is glue around these functions.

pub mod progression;
pub mod recalc;

// Re-export the computation entry points
pub use progression::{
    evaluate_round, evaluate_segment, format_duration, RoundPosition, RoundState, SegmentPosition,
};
pub use recalc::{recalculate_start_at, EditAction};
