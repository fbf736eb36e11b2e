use crate::domain::event::Checkpoint;
use crate::scoring::types::{MatchedPunch, Punch};

/// Align a team's raw punch stream with an event's checkpoint order.
///
/// Two-pointer scan over the raw reads: a read whose device equals the
/// currently-awaited checkpoint's device consumes both; any other read is
/// noise and is skipped. A punch for a later checkpoint arriving before the
/// awaited one is therefore discarded, never matched out of order.
/// Checkpoints nobody punched are simply absent from the result; reporting
/// absences is the validator's job, not a matching error.
pub fn match_punches(raw: &[Punch], checkpoints: &[Checkpoint]) -> Vec<MatchedPunch> {
    let mut matched = Vec::new();
    let mut awaited = checkpoints.iter();
    let mut current = awaited.next();

    for punch in raw {
        let Some(checkpoint) = current else {
            break;
        };
        if punch.device_id == checkpoint.device_id {
            matched.push(MatchedPunch {
                checkpoint: checkpoint.clone(),
                time: punch.time,
            });
            current = awaited.next();
        }
    }

    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::CheckpointRole;
    use chrono::NaiveTime;

    fn checkpoint(operator: &str, device: i32, role: CheckpointRole) -> Checkpoint {
        Checkpoint::new(operator.to_string(), device, role, 0.0)
    }

    fn punch(device_id: i32, time: &str) -> Punch {
        Punch {
            device_id,
            time: NaiveTime::parse_from_str(time, "%H:%M:%S").unwrap(),
        }
    }

    fn course_checkpoints() -> Vec<Checkpoint> {
        vec![
            checkpoint("S1", 31, CheckpointRole::Start),
            checkpoint("S2", 32, CheckpointRole::Freeze),
            checkpoint("S3", 33, CheckpointRole::Thaw),
            checkpoint("S4", 34, CheckpointRole::End),
        ]
    }

    #[test]
    fn skips_noise_and_preserves_checkpoint_order() {
        let raw = vec![
            punch(99, "08:55:00"), // unrelated device before the start
            punch(31, "09:00:00"),
            punch(77, "09:10:00"), // noise mid-course
            punch(32, "09:20:00"),
            punch(33, "09:30:00"),
            punch(34, "09:50:00"),
        ];

        let matched = match_punches(&raw, &course_checkpoints());

        let devices: Vec<i32> = matched.iter().map(|m| m.checkpoint.device_id).collect();
        assert_eq!(devices, vec![31, 32, 33, 34]);
    }

    #[test]
    fn out_of_order_punch_is_treated_as_noise() {
        // Device 32 read before the awaited start: discarded, not matched.
        // Checkpoint 32 then stays awaited, so the later reads for 33 and
        // 34 are discarded too.
        let raw = vec![
            punch(32, "08:58:00"),
            punch(31, "09:00:00"),
            punch(33, "09:30:00"),
            punch(34, "09:50:00"),
        ];

        let matched = match_punches(&raw, &course_checkpoints());

        let devices: Vec<i32> = matched.iter().map(|m| m.checkpoint.device_id).collect();
        assert_eq!(devices, vec![31]);
    }

    #[test]
    fn never_matches_a_checkpoint_twice() {
        let raw = vec![
            punch(31, "09:00:00"),
            punch(31, "09:00:05"), // double read of the same device
            punch(32, "09:20:00"),
            punch(33, "09:30:00"),
            punch(34, "09:50:00"),
        ];

        let matched = match_punches(&raw, &course_checkpoints());

        assert_eq!(matched.len(), 4);
        let starts = matched
            .iter()
            .filter(|m| m.checkpoint.device_id == 31)
            .count();
        assert_eq!(starts, 1);
    }

    #[test]
    fn absent_checkpoints_are_simply_missing_from_the_result() {
        let raw = vec![punch(31, "09:00:00"), punch(34, "09:50:00")];

        let matched = match_punches(&raw, &course_checkpoints());

        // 32 was never punched, so 33 and 34 stay unmatched too: order is
        // event-defined, not best-effort.
        let devices: Vec<i32> = matched.iter().map(|m| m.checkpoint.device_id).collect();
        assert_eq!(devices, vec![31]);
    }
}
