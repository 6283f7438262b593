//! Start-instant recalculation for edit actions
//!
//! When segments are edited or a timer is restarted/stopped/resumed, the new
//! `start_at` must keep the displayed progression continuous (or reset it on
//! purpose). The rules here mirror what remote displays expect: the same
//! logical point in the cycle maps onto the new segment layout, preserving
//! the time *remaining* in the current phase.

use anyhow::Result;
use tracing::{debug, warn};

use crate::model::{Segment, Timer};

use super::{evaluate_round, evaluate_segment, RoundState};

/// Edit action applied to a timer definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    /// Persist an edited segment list
    Save,
    /// Reset the cycle to the current instant
    Restart,
    /// Pause the timer; only `stop_at` changes
    Stop,
    /// Clear `stop_at` and continue where the timer was paused
    Resume,
}

/// Compute the `start_at` for an edited timer
///
/// Every branch returns a finite instant; the only error is a propagated
/// precondition violation (a timer whose old segments sum to zero).
pub fn recalculate_start_at(
    action: EditAction,
    new_segments: &[Segment],
    timer: &Timer,
    now_ms: i64,
) -> Result<i64> {
    match action {
        EditAction::Restart => Ok(now_ms),
        EditAction::Stop => Ok(timer.start_at),
        EditAction::Save => {
            if same_durations(&timer.segments, new_segments) {
                // Only labels/colors/sounds changed; timing is untouched.
                return Ok(timer.start_at);
            }
            reposition(new_segments, timer, now_ms, now_ms)
        }
        EditAction::Resume => {
            // Resuming reconstructs the state as of the stop instant.
            let Some(stop_at) = timer.stop_at else {
                return Ok(timer.start_at);
            };
            reposition(new_segments, timer, stop_at, now_ms)
        }
    }
}

fn same_durations(old: &[Segment], new: &[Segment]) -> bool {
    old.len() == new.len() && old.iter().zip(new).all(|(a, b)| a.time == b.time)
}

/// Map the old position at `reference_ms` onto `new_segments`, anchored to
/// `now_ms`
fn reposition(
    new_segments: &[Segment],
    timer: &Timer,
    reference_ms: i64,
    now_ms: i64,
) -> Result<i64> {
    let round = evaluate_round(timer, reference_ms)?;
    if round.state != RoundState::Running {
        // Waiting, finished and stopped timers have no live position to
        // carry over; the action is a no-op on timing.
        return Ok(timer.start_at);
    }

    let old = evaluate_segment(round.time_in_round, &timer.segments)?;

    // Three-tier match: label, then position, then hard reset.
    let matched = new_segments
        .iter()
        .position(|s| s.label == old.segment.label)
        .or_else(|| (old.index < new_segments.len()).then_some(old.index));

    let Some(matched_index) = matched else {
        warn!(
            "segment '{}' has no counterpart after the edit, resetting timer '{}' to now",
            old.segment.label, timer.id
        );
        return Ok(now_ms);
    };

    let matched_segment = &new_segments[matched_index];
    let time_before: u64 = new_segments[..matched_index].iter().map(|s| s.time).sum();

    // Preserve the remaining time in the matched segment, clamping to its
    // start when the old remaining value no longer fits.
    let time_in_new = if old.remaining_ms > matched_segment.time {
        0
    } else {
        matched_segment.time - old.remaining_ms
    };

    debug!(
        "repositioned '{}' onto segment '{}' at index {} ({}ms into the new round)",
        timer.id,
        matched_segment.label,
        matched_index,
        time_before + time_in_new
    );

    Ok(now_ms - time_before as i64 - time_in_new as i64)
}
