//! Segment and sound cue wire types

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

fn default_zero() -> u64 {
    0
}

/// One sound cue within a segment
///
/// `trigger_time` is the displayed remaining value, in whole seconds, at
/// which the cue fires (e.g. 60 for "one minute left").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sound {
    pub filename: String,
    pub trigger_time: u64,
}

/// One timed phase of a round
///
/// Segment order defines cycle position and is never reordered by this
/// client. The `label` doubles as the identity key when segments are edited,
/// so duplicate labels make edit continuity ambiguous (first match wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub label: String,
    /// Segment duration in milliseconds, always > 0
    pub time: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Value (ms) the countdown display ends at; 0 counts down to zero
    #[serde(default = "default_zero")]
    pub count_to: u64,
    #[serde(default)]
    pub sounds: Vec<Sound>,
}

impl Segment {
    /// Check that every sound cue fits inside the displayed countdown range
    /// `[count_to, count_to + time]`
    pub fn validate(&self) -> Result<()> {
        if self.time == 0 {
            bail!("segment '{}' has zero duration", self.label);
        }

        for sound in &self.sounds {
            let trigger_ms = sound.trigger_time * 1000;
            if trigger_ms < self.count_to || trigger_ms > self.count_to + self.time {
                bail!(
                    "sound '{}' in segment '{}' triggers at {}s, outside the displayed range",
                    sound.filename,
                    self.label,
                    sound.trigger_time
                );
            }
        }

        Ok(())
    }
}

/// Validate a full segment list before sending it to the server
pub fn validate_segments(segments: &[Segment]) -> Result<()> {
    if segments.is_empty() {
        bail!("timer must have at least one segment");
    }

    for segment in segments {
        segment.validate()?;
    }

    Ok(())
}
