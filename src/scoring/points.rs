use crate::domain::event::{Event, EventKind, Medal};
use crate::scoring::types::{CoursePoints, MatchedPunch, SegmentTimes};

/// Bonus/malus against a reference time given in minutes. Under the
/// reference earns `bonus_per_minute` per full-or-fractional minute saved,
/// over it costs `malus_per_minute` per minute lost, hitting it exactly
/// adjusts nothing.
fn speed_points(
    effective_seconds: f64,
    reference_minutes: f64,
    bonus_per_minute: f64,
    malus_per_minute: f64,
) -> f64 {
    let reference_seconds = reference_minutes * 60.0;
    if effective_seconds < reference_seconds {
        (reference_seconds - effective_seconds) / 60.0 * bonus_per_minute
    } else if effective_seconds > reference_seconds {
        -((effective_seconds - reference_seconds) / 60.0 * malus_per_minute)
    } else {
        0.0
    }
}

/// Score one course run from its already-computed segment times.
///
/// The best-segment window is scored against its own reference triple and
/// carved out of the main course time first, so a team is never charged
/// twice for the same seconds.
pub fn score_course(event: &Event, matched: &[MatchedPunch], times: &SegmentTimes) -> CoursePoints {
    let EventKind::Course {
        reference_time_minutes,
        bonus_per_minute,
        malus_per_minute,
        best_segment,
        ..
    } = &event.kind
    else {
        // Activities never reach the course scorer.
        return CoursePoints {
            speed: 0.0,
            best_segment: None,
            checkpoint_bonus: 0.0,
            participation: event.participation_points,
            total: event.participation_points,
        };
    };

    let best_segment_points = match (best_segment, times.best_segment_seconds) {
        (Some(descriptor), Some(seconds)) => Some(speed_points(
            seconds,
            descriptor.reference_time_minutes,
            descriptor.bonus_per_minute,
            descriptor.malus_per_minute,
        )),
        _ => None,
    };

    let effective_seconds = match times.best_segment_seconds {
        Some(best) if best_segment.is_some() => times.total_seconds - best,
        _ => times.total_seconds,
    };
    let speed = speed_points(
        effective_seconds,
        *reference_time_minutes,
        *bonus_per_minute,
        *malus_per_minute,
    );

    let checkpoint_bonus: f64 = matched
        .iter()
        .map(|punch| punch.checkpoint.bonus_points)
        .sum();
    let participation = event.participation_points;

    let total =
        speed + best_segment_points.unwrap_or(0.0) + checkpoint_bonus + participation;

    CoursePoints {
        speed,
        best_segment: best_segment_points,
        checkpoint_bonus,
        participation,
        total,
    }
}

/// Flat participation points plus the medal-table lookup.
pub fn score_activity(event: &Event, medal: Medal) -> f64 {
    let medal_value = match &event.kind {
        EventKind::Activity { medal_points } => medal_points.points_for(medal),
        EventKind::Course { .. } => 0.0,
    };
    event.participation_points + medal_value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::{
        BestSegment, Checkpoint, CheckpointRole, Discipline, MedalPoints,
    };

    fn course(best_segment: Option<BestSegment>) -> Event {
        Event::new(
            "Course A".to_string(),
            50.0,
            EventKind::Course {
                discipline: Discipline::Trail,
                reference_time_minutes: 60.0,
                bonus_per_minute: 2.0,
                malus_per_minute: 2.0,
                best_segment,
            },
        )
    }

    fn times(total_seconds: f64, best_segment_seconds: Option<f64>) -> SegmentTimes {
        SegmentTimes {
            elementary: Vec::new(),
            total_seconds,
            best_segment_seconds,
        }
    }

    #[test]
    fn five_minutes_under_reference_earns_ten_points() {
        let event = course(None);
        let points = score_course(&event, &[], &times(3300.0, None));
        assert_eq!(points.speed, 10.0);
    }

    #[test]
    fn five_minutes_over_reference_costs_ten_points() {
        let event = course(None);
        let points = score_course(&event, &[], &times(3900.0, None));
        assert_eq!(points.speed, -10.0);
    }

    #[test]
    fn exactly_the_reference_adjusts_nothing() {
        let event = course(None);
        let points = score_course(&event, &[], &times(3600.0, None));
        assert_eq!(points.speed, 0.0);
    }

    #[test]
    fn scoring_is_monotonic_per_minute() {
        let event = course(None);
        let at_reference = score_course(&event, &[], &times(3600.0, None));
        let one_under = score_course(&event, &[], &times(3540.0, None));
        let one_over = score_course(&event, &[], &times(3660.0, None));

        // One minute saved is worth exactly bonus_per_minute, one minute
        // lost exactly malus_per_minute.
        assert_eq!(one_under.total - at_reference.total, 2.0);
        assert_eq!(at_reference.total - one_over.total, 2.0);
    }

    #[test]
    fn best_segment_time_is_carved_out_of_the_course_time() {
        let event = course(Some(BestSegment {
            reference_time_minutes: 10.0,
            bonus_per_minute: 3.0,
            malus_per_minute: 3.0,
        }));
        // 65 min on course, 8 min of which in the best segment: the course
        // is judged on 57 min (3 under reference), the segment on 8 min
        // (2 under its own reference).
        let points = score_course(&event, &[], &times(3900.0, Some(480.0)));

        assert_eq!(points.speed, 6.0);
        assert_eq!(points.best_segment, Some(6.0));
        assert_eq!(points.total, 6.0 + 6.0 + 50.0);
    }

    #[test]
    fn matched_checkpoint_bonuses_are_summed_once_each() {
        let event = course(None);
        let matched = vec![
            MatchedPunch {
                checkpoint: Checkpoint::new("S1".to_string(), 31, CheckpointRole::Start, 1.5),
                time: chrono::NaiveTime::parse_from_str("09:00:00", "%H:%M:%S").unwrap(),
            },
            MatchedPunch {
                checkpoint: Checkpoint::new("S2".to_string(), 32, CheckpointRole::End, 2.5),
                time: chrono::NaiveTime::parse_from_str("10:00:00", "%H:%M:%S").unwrap(),
            },
        ];

        let points = score_course(&event, &matched, &times(3600.0, None));

        assert_eq!(points.checkpoint_bonus, 4.0);
        assert_eq!(points.participation, 50.0);
        assert_eq!(points.total, 54.0);
    }

    #[test]
    fn activity_points_combine_participation_and_medal() {
        let event = Event::new(
            "Climbing".to_string(),
            10.0,
            EventKind::Activity {
                medal_points: MedalPoints {
                    gold: 15.0,
                    silver: 10.0,
                    bronze: 5.0,
                },
            },
        );

        assert_eq!(score_activity(&event, Medal::Gold), 25.0);
        assert_eq!(score_activity(&event, Medal::Bronze), 15.0);
    }
}
