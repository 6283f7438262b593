//! Round and segment progression evaluation
//!
//! Pure functions only: the caller supplies the current instant, so every
//! result is deterministic and testable without touching the clock.

use anyhow::{bail, Result};

use crate::model::{Segment, Timer};

/// Lifecycle state of a timer at a given instant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// `start_at` is still in the future
    Waiting,
    Running,
    /// Single-run timer that completed its one pass
    Finished,
    /// `stop_at` is set and already passed
    Stopped,
}

/// Position within the segment cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundPosition {
    /// Milliseconds into the current round; 0 when waiting or finished
    pub time_in_round: u64,
    pub state: RoundState,
}

/// The active segment and how much of it is left
#[derive(Debug, Clone, Copy)]
pub struct SegmentPosition<'a> {
    pub segment: &'a Segment,
    pub index: usize,
    /// Always in `1..=segment.time`
    pub remaining_ms: u64,
}

/// Determine lifecycle state and position in the round at `now_ms`
///
/// When `stop_at` has passed, evaluation is clamped to that instant, so a
/// stopped timer holds the position it had when it was stopped.
pub fn evaluate_round(timer: &Timer, now_ms: i64) -> Result<RoundPosition> {
    let total = timer.total_round_time();
    if total == 0 {
        bail!(
            "timer '{}' has no segments with positive duration",
            timer.id
        );
    }

    let mut effective = now_ms;
    let mut stopped = false;
    if let Some(stop_at) = timer.stop_at {
        if stop_at < now_ms {
            effective = stop_at;
            stopped = true;
        }
    }

    let elapsed = effective - timer.start_at;

    if elapsed < 0 {
        return Ok(RoundPosition {
            time_in_round: 0,
            state: RoundState::Waiting,
        });
    }

    // A finished single-run timer never wraps, so this compares the raw
    // elapsed time, not elapsed modulo round length.
    if !timer.repeat && !stopped && elapsed as u64 > total {
        return Ok(RoundPosition {
            time_in_round: 0,
            state: RoundState::Finished,
        });
    }

    Ok(RoundPosition {
        time_in_round: elapsed as u64 % total,
        state: if stopped {
            RoundState::Stopped
        } else {
            RoundState::Running
        },
    })
}

/// Find the segment active at `time_in_round` and the time left in it
///
/// Walks the list accumulating durations; the first segment whose cumulative
/// end strictly exceeds `time_in_round` is current. An input of exactly 0
/// selects the first segment at full duration, and an input exactly on a
/// boundary selects the *next* segment, never a zero-remaining prior one.
pub fn evaluate_segment<'a>(
    time_in_round: u64,
    segments: &'a [Segment],
) -> Result<SegmentPosition<'a>> {
    if segments.is_empty() {
        bail!("cannot evaluate segment position on an empty segment list");
    }

    let mut consumed = 0u64;
    for (index, segment) in segments.iter().enumerate() {
        let end = consumed + segment.time;
        if time_in_round < end {
            return Ok(SegmentPosition {
                segment,
                index,
                remaining_ms: end - time_in_round,
            });
        }
        consumed = end;
    }

    bail!(
        "time in round {}ms is past the total round time of {}ms",
        time_in_round,
        consumed
    );
}

/// Format a millisecond duration as `MM:SS`, or `HH:MM:SS` above one hour
///
/// Negative input is clamped to zero.
pub fn format_duration(millis: i64) -> String {
    let seconds = (millis / 1000).max(0);

    let hours = seconds / 3600;
    let minutes = (seconds / 60) % 60;
    let seconds = seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
