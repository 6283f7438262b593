//! Timer definition as served by the remote API

use serde::{Deserialize, Serialize};

use super::Segment;

/// What a display shows before `start_at` is reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PreStartBehaviour {
    #[default]
    ShowFirstSegment,
    ShowLastSegment,
    /// Count down to the start instant instead of holding a segment
    RunNormally,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayOptions {
    #[serde(default)]
    pub clock: bool,
    #[serde(default)]
    pub pre_start_behaviour: PreStartBehaviour,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimerMetadata {
    /// Grace period (ms) added to stop/restart instants so slow displays
    /// receive the update before it takes effect
    #[serde(default)]
    pub delay_start_stop: u64,
}

/// A remote timer definition
///
/// `start_at`/`stop_at` are absolute epoch milliseconds. A `start_at` in the
/// future means the timer has not started yet; a set `stop_at` means the
/// timer is administratively paused as of that instant. The client never
/// mutates a `Timer` in place; edits go through the recalculator and a PUT.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timer {
    pub id: String,
    pub start_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_at: Option<i64>,
    pub repeat: bool,
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub display_options: DisplayOptions,
    #[serde(default)]
    pub metadata: TimerMetadata,
}

impl Timer {
    /// Duration of one full cycle through all segments, in milliseconds
    pub fn total_round_time(&self) -> u64 {
        self.segments.iter().map(|s| s.time).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_round_time_sums_segment_durations() {
        let timer: Timer = serde_json::from_str(
            r#"{
                "id": "abcde",
                "start_at": 1700000000000,
                "repeat": true,
                "segments": [
                    {"label": "A", "time": 15000},
                    {"label": "B", "time": 45000}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(timer.total_round_time(), 60_000);
        assert!(timer.stop_at.is_none());
    }

    #[test]
    fn display_options_and_metadata_default_when_missing() {
        let timer: Timer = serde_json::from_str(
            r#"{"id": "x", "start_at": 0, "repeat": false, "segments": []}"#,
        )
        .unwrap();

        assert!(!timer.display_options.clock);
        assert_eq!(
            timer.display_options.pre_start_behaviour,
            PreStartBehaviour::ShowFirstSegment
        );
        assert_eq!(timer.metadata.delay_start_stop, 0);
    }

    #[test]
    fn unset_stop_at_is_omitted_from_json() {
        let timer = Timer {
            id: "x".to_string(),
            start_at: 1,
            ..Default::default()
        };
        let json = serde_json::to_string(&timer).unwrap();
        assert!(!json.contains("stop_at"));
    }
}
