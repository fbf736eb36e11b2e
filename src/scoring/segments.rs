use crate::domain::event::CheckpointRole;
use crate::scoring::types::{ElementaryTime, MatchedPunch, SegmentTimes};

/// Convert a fully-matched punch list into elapsed segment times.
///
/// Consecutive entries form a segment unless the first one is a `freeze` or
/// `end` checkpoint: those close their incoming segment but never open an
/// outgoing one, so the freeze -> thaw gap and anything after the finish are
/// excluded from the total. The best-segment time is the unique pair flagged
/// `starts_best_segment` -> `ends_best_segment`; it stays included in the
/// total and is additionally reported on its own.
///
/// Timestamps are same-day wall-clock values; an event crossing midnight is
/// not handled.
pub fn compute_segments(matched: &[MatchedPunch]) -> SegmentTimes {
    let mut elementary = Vec::new();

    for pair in matched.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        if matches!(from.checkpoint.role, CheckpointRole::Freeze | CheckpointRole::End) {
            continue;
        }
        let seconds = (to.time - from.time).num_seconds() as f64;
        elementary.push(ElementaryTime {
            seconds,
            from: from.checkpoint.clone(),
            to: to.checkpoint.clone(),
        });
    }

    let total_seconds = elementary.iter().map(|segment| segment.seconds).sum();
    let best_segment_seconds = elementary
        .iter()
        .find(|segment| segment.from.starts_best_segment && segment.to.ends_best_segment)
        .map(|segment| segment.seconds);

    SegmentTimes {
        elementary,
        total_seconds,
        best_segment_seconds,
    }
}
