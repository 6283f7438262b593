//! Edit workflow: recalculate timing, then persist the update

use anyhow::Result;
use tracing::info;

use crate::model::{validate_segments, Segment, Timer};
use crate::round::{recalculate_start_at, EditAction};

use super::client::ApiClient;
use super::requests::TimerUpdateRequest;

/// Build the update payload for an edit action without sending it
///
/// `now_ms` is supplied by the caller so the result stays deterministic.
/// Stop and restart instants honor `metadata.delay_start_stop`, giving slow
/// displays time to receive the update before it takes effect.
pub fn build_update(
    timer: &Timer,
    action: EditAction,
    new_segments: &[Segment],
    now_ms: i64,
) -> Result<TimerUpdateRequest> {
    validate_segments(new_segments)?;

    let delay = timer.metadata.delay_start_stop as i64;
    let effective_now = match action {
        EditAction::Restart => now_ms + delay,
        _ => now_ms,
    };

    let start_at = recalculate_start_at(action, new_segments, timer, effective_now)?;

    let stop_at = match action {
        EditAction::Stop => Some(now_ms + delay),
        EditAction::Restart | EditAction::Resume => None,
        // Saving must not resume a stopped timer.
        EditAction::Save => timer.stop_at,
    };

    Ok(TimerUpdateRequest {
        start_at,
        stop_at,
        repeat: timer.repeat,
        segments: new_segments.to_vec(),
        display_options: timer.display_options.clone(),
        metadata: timer.metadata.clone(),
    })
}

/// Apply an edit action against the remote service
pub async fn apply_edit(
    client: &ApiClient,
    token: &str,
    timer: &Timer,
    action: EditAction,
    new_segments: &[Segment],
    now_ms: i64,
) -> Result<Timer> {
    let request = build_update(timer, action, new_segments, now_ms)?;

    info!(
        "applying {:?} to timer '{}' (start_at {} -> {})",
        action, timer.id, timer.start_at, request.start_at
    );

    client.update_timer(&timer.id, token, &request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TimerMetadata;

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

    fn timer() -> Timer {
        Timer {
            id: "test".to_string(),
            start_at: NOW - 20_000,
            stop_at: None,
            repeat: true,
            segments: vec![segment("A", 15_000), segment("B", 45_000)],
            metadata: TimerMetadata {
                delay_start_stop: 2_000,
            },
            ..Default::default()
        }
    }

    #[test]
    fn stop_sets_a_delayed_stop_instant_and_keeps_start_at() {
        let t = timer();
        let update = build_update(&t, EditAction::Stop, &t.segments.clone(), NOW).unwrap();
        assert_eq!(update.start_at, t.start_at);
        assert_eq!(update.stop_at, Some(NOW + 2_000));
    }

    #[test]
    fn restart_is_delayed_by_the_grace_period() {
        let t = timer();
        let update = build_update(&t, EditAction::Restart, &t.segments.clone(), NOW).unwrap();
        assert_eq!(update.start_at, NOW + 2_000);
        assert_eq!(update.stop_at, None);
    }

    #[test]
    fn resume_clears_stop_at() {
        let mut t = timer();
        t.stop_at = Some(t.start_at + 10_000);
        let update = build_update(&t, EditAction::Resume, &t.segments.clone(), NOW).unwrap();
        assert_eq!(update.stop_at, None);
    }

    #[test]
    fn save_keeps_an_existing_stop_at() {
        let mut t = timer();
        t.stop_at = Some(t.start_at + 10_000);
        let update = build_update(&t, EditAction::Save, &t.segments.clone(), NOW).unwrap();
        assert_eq!(update.stop_at, t.stop_at);
        assert_eq!(update.start_at, t.start_at);
    }

    #[test]
    fn invalid_new_segments_are_rejected_before_any_recalculation() {
        let t = timer();
        assert!(build_update(&t, EditAction::Save, &[], NOW).is_err());
        assert!(build_update(&t, EditAction::Save, &[segment("A", 0)], NOW).is_err());
    }
}
