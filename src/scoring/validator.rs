use crate::domain::event::{Checkpoint, Event, MASS_START_DEVICE};
use crate::scoring::types::MatchedPunch;

/// Expected checkpoints of `event` absent from the matched list.
///
/// The expected set is a multiset in course order, excluding the synthetic
/// mass-start device. Checkpoints are identified by operator (one volunteer,
/// one device), and each matched punch satisfies at most one expectation.
pub fn missing_checkpoints(event: &Event, matched: &[MatchedPunch]) -> Vec<Checkpoint> {
    let mut unconsumed: Vec<&str> = matched
        .iter()
        .map(|punch| punch.checkpoint.operator_id.as_str())
        .collect();
    let mut missing = Vec::new();

    for checkpoint in &event.checkpoints {
        if checkpoint.device_id == MASS_START_DEVICE {
            continue;
        }
        match unconsumed
            .iter()
            .position(|operator| *operator == checkpoint.operator_id)
        {
            Some(position) => {
                unconsumed.swap_remove(position);
            }
            None => missing.push(checkpoint.clone()),
        }
    }

    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::{CheckpointRole, Discipline, EventKind};
    use crate::scoring::matcher::match_punches;
    use crate::scoring::types::Punch;
    use chrono::NaiveTime;

    fn course_with_devices(devices: &[(&str, i32, CheckpointRole)]) -> Event {
        let mut event = Event::new(
            "Course A".to_string(),
            50.0,
            EventKind::Course {
                discipline: Discipline::Trail,
                reference_time_minutes: 60.0,
                bonus_per_minute: 2.0,
                malus_per_minute: 2.0,
                best_segment: None,
            },
        );
        for (operator, device, role) in devices {
            event
                .append_checkpoint(Checkpoint::new(operator.to_string(), *device, *role, 0.0))
                .unwrap();
        }
        event
    }

    fn punch(device_id: i32, time: &str) -> Punch {
        Punch {
            device_id,
            time: NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap(),
        }
    }

    #[test]
    fn missing_end_checkpoint_is_reported() {
        let event = course_with_devices(&[
            ("S1", 11, CheckpointRole::Start),
            ("S2", 12, CheckpointRole::End),
        ]);
        let raw = vec![punch(11, "09:00:00")];
        let matched = match_punches(&raw, &event.checkpoints);

        let missing = missing_checkpoints(&event, &matched);

        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].device_id, 12);
    }

    #[test]
    fn fully_matched_event_has_nothing_missing() {
        let event = course_with_devices(&[
            ("S1", 11, CheckpointRole::Start),
            ("S2", 12, CheckpointRole::End),
        ]);
        let raw = vec![punch(11, "09:00:00"), punch(12, "09:30:00")];
        let matched = match_punches(&raw, &event.checkpoints);

        assert!(missing_checkpoints(&event, &matched).is_empty());
    }

    #[test]
    fn synthetic_mass_start_device_is_never_expected() {
        let event = course_with_devices(&[
            ("MS", MASS_START_DEVICE, CheckpointRole::Start),
            ("S2", 12, CheckpointRole::End),
        ]);
        // No mass start configured: the -1 checkpoint was never punched.
        let raw = vec![punch(12, "09:30:00")];
        let matched = match_punches(&raw, &event.checkpoints);

        // Matching stalls on the -1 checkpoint, but validation must not
        // blame the synthetic device.
        let missing = missing_checkpoints(&event, &matched);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].device_id, 12);
    }
}
