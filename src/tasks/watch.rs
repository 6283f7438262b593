//! Terminal watch loop: evaluate the timer every second and render it

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use chrono::DateTime;
use tokio::sync::watch;
use tokio::time::interval;
use tracing::{error, info};

use crate::model::{PreStartBehaviour, Sound, Timer};
use crate::round::{evaluate_round, evaluate_segment, format_duration, RoundState};

/// Render one status line for `timer` at `now_ms`
///
/// Pre-start rendering follows the timer's `pre_start_behaviour`: hold the
/// first or last segment at full duration, or count down to the start
/// instant. Displayed segment values include `count_to`, matching what the
/// hardware displays show.
pub fn render_status(timer: &Timer, now_ms: i64) -> Result<String> {
    let round = evaluate_round(timer, now_ms)?;

    let body = match round.state {
        RoundState::Waiting => match timer.display_options.pre_start_behaviour {
            PreStartBehaviour::ShowFirstSegment => {
                let first = &timer.segments[0];
                format!(
                    "{}  {}",
                    format_duration((first.count_to + first.time) as i64),
                    first.label
                )
            }
            PreStartBehaviour::ShowLastSegment => {
                let last = &timer.segments[timer.segments.len() - 1];
                format!(
                    "{}  {}",
                    format_duration((last.count_to + last.time) as i64),
                    last.label
                )
            }
            PreStartBehaviour::RunNormally => {
                format!(
                    "{}  starts in",
                    format_duration(timer.start_at - now_ms)
                )
            }
        },
        RoundState::Finished => "finished".to_string(),
        RoundState::Running | RoundState::Stopped => {
            let pos = evaluate_segment(round.time_in_round, &timer.segments)?;
            let displayed = pos.segment.count_to + pos.remaining_ms;
            let mut line = format!("{}  {}", format_duration(displayed as i64), pos.segment.label);
            if round.state == RoundState::Stopped {
                line.push_str("  [stopped]");
            }
            line
        }
    };

    if timer.display_options.clock {
        let clock = DateTime::from_timestamp_millis(now_ms)
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default();
        return Ok(format!("{}  |  {}", clock, body));
    }

    Ok(body)
}

/// Sound cues due at `now_ms`, as (segment index, sound) pairs
///
/// A cue is due when the displayed remaining value, in whole seconds, equals
/// its `trigger_time`. The watch loop deduplicates across ticks.
pub fn due_cues(timer: &Timer, now_ms: i64) -> Result<Vec<(usize, Sound)>> {
    let round = evaluate_round(timer, now_ms)?;
    if round.state != RoundState::Running {
        return Ok(Vec::new());
    }

    let pos = evaluate_segment(round.time_in_round, &timer.segments)?;
    let displayed_seconds = (pos.segment.count_to + pos.remaining_ms) / 1000;

    Ok(pos
        .segment
        .sounds
        .iter()
        .filter(|s| s.trigger_time == displayed_seconds)
        .map(|s| (pos.index, s.clone()))
        .collect())
}

/// Suppresses a cue repeating on consecutive ticks within the same second
///
/// An empty tick re-arms the gate, so the same cue fires again when its
/// segment comes around in a later round.
struct CueGate {
    last: Option<(usize, u64)>,
}

impl CueGate {
    fn new() -> Self {
        Self { last: None }
    }

    fn advance(&mut self, cues: Vec<(usize, Sound)>) -> Vec<Sound> {
        if cues.is_empty() {
            self.last = None;
            return Vec::new();
        }

        let mut due = Vec::new();
        for (index, sound) in cues {
            let key = (index, sound.trigger_time);
            if self.last != Some(key) {
                self.last = Some(key);
                due.push(sound);
            }
        }
        due
    }
}

/// Foreground task driving the 1 Hz display until shutdown or finish
pub async fn watch_task(mut updates_rx: watch::Receiver<Timer>) {
    let mut interval = interval(Duration::from_secs(1));
    let mut cue_gate = CueGate::new();

    loop {
        interval.tick().await;

        let timer = updates_rx.borrow_and_update().clone();
        let now_ms = chrono::Utc::now().timestamp_millis();

        let line = match render_status(&timer, now_ms) {
            Ok(line) => line,
            Err(e) => {
                error!("Cannot evaluate timer '{}': {}", timer.id, e);
                break;
            }
        };

        match due_cues(&timer, now_ms) {
            Ok(cues) => {
                for sound in cue_gate.advance(cues) {
                    // Terminal bell in place of actual audio playback.
                    print!("\x07");
                    info!("Sound cue: {} ({}s)", sound.filename, sound.trigger_time);
                }
            }
            Err(e) => error!("Cannot evaluate sound cues: {}", e),
        }

        print!("\r\x1b[2K{}", line);
        let _ = io::stdout().flush();

        if !timer.repeat {
            if let Ok(round) = evaluate_round(&timer, now_ms) {
                if round.state == RoundState::Finished {
                    println!();
                    info!("Timer '{}' finished", timer.id);
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DisplayOptions, Segment};

    const NOW: i64 = 1_700_000_000_000;

    fn segment(label: &str, time: u64) -> Segment {
        Segment {
            label: label.to_string(),
            time,
            color: None,
            count_to: 0,
            sounds: Vec::new(),
        }
    }

    fn timer(start_at: i64) -> Timer {
        Timer {
            id: "test".to_string(),
            start_at,
            stop_at: None,
            repeat: false,
            segments: vec![segment("Switch!", 15_000), segment("Boulder!", 240_000)],
            ..Default::default()
        }
    }

    #[test]
    fn renders_running_segment_with_remaining_time() {
        let t = timer(NOW - 20_000);
        // 20s in: Boulder! with 235s remaining.
        assert_eq!(render_status(&t, NOW).unwrap(), "03:55  Boulder!");
    }

    #[test]
    fn renders_stopped_marker() {
        let mut t = timer(NOW - 100_000);
        t.stop_at = Some(t.start_at + 20_000);
        assert_eq!(render_status(&t, NOW).unwrap(), "03:55  Boulder!  [stopped]");
    }

    #[test]
    fn renders_finished() {
        let t = timer(NOW - 300_000);
        assert_eq!(render_status(&t, NOW).unwrap(), "finished");
    }

    #[test]
    fn pre_start_shows_first_segment_by_default() {
        let t = timer(NOW + 30_000);
        assert_eq!(render_status(&t, NOW).unwrap(), "00:15  Switch!");
    }

    #[test]
    fn pre_start_can_show_last_segment() {
        let mut t = timer(NOW + 30_000);
        t.display_options.pre_start_behaviour = PreStartBehaviour::ShowLastSegment;
        assert_eq!(render_status(&t, NOW).unwrap(), "04:00  Boulder!");
    }

    #[test]
    fn pre_start_run_normally_counts_down_to_start() {
        let mut t = timer(NOW + 90_000);
        t.display_options.pre_start_behaviour = PreStartBehaviour::RunNormally;
        assert_eq!(render_status(&t, NOW).unwrap(), "01:30  starts in");
    }

    #[test]
    fn count_to_offsets_the_displayed_value() {
        let mut t = timer(NOW - 5_000);
        t.segments[0].count_to = 60_000;
        // 10s remaining in Switch!, displayed as 1:10.
        assert_eq!(render_status(&t, NOW).unwrap(), "01:10  Switch!");
    }

    #[test]
    fn clock_option_prefixes_the_line() {
        let mut t = timer(NOW - 20_000);
        t.display_options = DisplayOptions {
            clock: true,
            ..Default::default()
        };
        let line = render_status(&t, NOW).unwrap();
        assert!(line.ends_with("|  03:55  Boulder!"));
        // 1_700_000_000_000 ms is 22:13:20 UTC.
        assert!(line.starts_with("22:13:20"));
    }

    #[test]
    fn cue_fires_when_displayed_seconds_hit_trigger_time() {
        let mut t = timer(NOW - 20_000);
        t.segments[1].sounds.push(Sound {
            filename: "beep.mp3".to_string(),
            trigger_time: 60,
        });

        // 235s displayed: nothing due.
        assert!(due_cues(&t, NOW).unwrap().is_empty());

        // 60s displayed: 15s + 240s - 60s = 195s into the round.
        let at_trigger = t.start_at + 195_000;
        let cues = due_cues(&t, at_trigger).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].0, 1);
        assert_eq!(cues[0].1.filename, "beep.mp3");
    }

    #[test]
    fn cue_fires_again_in_later_rounds() {
        let mut t = timer(NOW);
        t.repeat = true;
        t.segments[1].sounds.push(Sound {
            filename: "beep.mp3".to_string(),
            trigger_time: 60,
        });

        // 15s + 240s round; 60s show on the display while the round is
        // 194.001s-195s old, so two of the four ticks hit the trigger.
        let mut gate = CueGate::new();
        let mut fired = Vec::new();
        for round_start in [0i64, 255_000] {
            for offset in [193_000, 194_500, 195_000, 196_000] {
                let cues = due_cues(&t, NOW + round_start + offset).unwrap();
                fired.extend(gate.advance(cues));
            }
        }

        // Once per round: duplicate ticks within the trigger second are
        // suppressed, but the next round re-arms the gate.
        assert_eq!(fired.len(), 2);
        assert!(fired.iter().all(|s| s.filename == "beep.mp3"));
    }

    #[test]
    fn no_cues_while_stopped_or_waiting() {
        let mut t = timer(NOW + 10_000);
        t.segments[0].sounds.push(Sound {
            filename: "beep.mp3".to_string(),
            trigger_time: 15,
        });
        assert!(due_cues(&t, NOW).unwrap().is_empty());

        let mut stopped = timer(NOW - 100_000);
        stopped.segments[1].sounds.push(Sound {
            filename: "beep.mp3".to_string(),
            trigger_time: 235,
        });
        stopped.stop_at = Some(stopped.start_at + 20_000);
        assert!(due_cues(&stopped, NOW).unwrap().is_empty());
    }
}
