use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::ScoringError;

/// Device id of the synthetic punch injected when a day starts with a mass
/// departure. Never appears on a physical checkpoint.
pub const MASS_START_DEVICE: i32 = -1;

/// Role of a checkpoint within the course order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckpointRole {
    Start,
    End,
    Freeze,
    Thaw,
    BestSegmentStart,
    BestSegmentEnd,
}

/// One physical punch point of an event.
///
/// Two checkpoints describe the same physical punch when they share an
/// operator id, regardless of device: one volunteer holds one device.
#[derive(Debug, Clone, Serialize)]
pub struct Checkpoint {
    pub operator_id: String,
    pub device_id: i32,
    pub role: CheckpointRole,
    pub bonus_points: f64,
    /// Set by role, or by deduplication when a best-segment boundary collapses
    /// into the adjacent course boundary.
    pub starts_best_segment: bool,
    pub ends_best_segment: bool,
}

impl Checkpoint {
    pub fn new(operator_id: String, device_id: i32, role: CheckpointRole, bonus_points: f64) -> Self {
        Self {
            operator_id,
            device_id,
            role,
            bonus_points,
            starts_best_segment: role == CheckpointRole::BestSegmentStart,
            ends_best_segment: role == CheckpointRole::BestSegmentEnd,
        }
    }

    fn has_best_segment_role(&self) -> bool {
        matches!(
            self.role,
            CheckpointRole::BestSegmentStart | CheckpointRole::BestSegmentEnd
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Discipline {
    Trail,
    Bike,
}

/// Timing parameters of the nested best-segment window of a course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestSegment {
    pub reference_time_minutes: f64,
    pub bonus_per_minute: f64,
    pub malus_per_minute: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    /// Lenient on casing and whitespace, strict on the value itself.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "gold" => Some(Medal::Gold),
            "silver" => Some(Medal::Silver),
            "bronze" => Some(Medal::Bronze),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedalPoints {
    pub gold: f64,
    pub silver: f64,
    pub bronze: f64,
}

impl MedalPoints {
    pub fn points_for(&self, medal: Medal) -> f64 {
        match medal {
            Medal::Gold => self.gold,
            Medal::Silver => self.silver,
            Medal::Bronze => self.bronze,
        }
    }
}

/// Kind-specific event payload. Scoring dispatches on this tag.
#[derive(Debug, Clone, Serialize)]
pub enum EventKind {
    Course {
        discipline: Discipline,
        reference_time_minutes: f64,
        bonus_per_minute: f64,
        malus_per_minute: f64,
        best_segment: Option<BestSegment>,
    },
    Activity {
        medal_points: MedalPoints,
    },
}

/// A scored course or judged activity within one day.
///
/// Structure is frozen after setup; only the accumulated segment statistics
/// mutate afterwards (filled by the missing-punch diagnostic).
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub name: String,
    pub participation_points: f64,
    pub kind: EventKind,
    /// Physical course order. A sequence, not a set.
    pub checkpoints: Vec<Checkpoint>,
    /// Mean elementary time in seconds per "from-to" operator pair, averaged
    /// across all teams that punched the pair cleanly.
    pub mean_segment_times: HashMap<String, f64>,
}

impl Event {
    pub fn new(name: String, participation_points: f64, kind: EventKind) -> Self {
        Self {
            name,
            participation_points,
            kind,
            checkpoints: Vec::new(),
            mean_segment_times: HashMap::new(),
        }
    }

    pub fn is_course(&self) -> bool {
        matches!(self.kind, EventKind::Course { .. })
    }

    pub fn is_activity(&self) -> bool {
        matches!(self.kind, EventKind::Activity { .. })
    }

    pub fn best_segment(&self) -> Option<&BestSegment> {
        match &self.kind {
            EventKind::Course { best_segment, .. } => best_segment.as_ref(),
            EventKind::Activity { .. } => None,
        }
    }

    /// Append the next checkpoint in course order.
    ///
    /// A second checkpoint with an operator already present is a definition
    /// error, except when one of the two carries a best-segment boundary
    /// role: that pair is legal and collapsed later by
    /// [`Event::collapse_best_segment_boundaries`].
    pub fn append_checkpoint(&mut self, checkpoint: Checkpoint) -> Result<(), ScoringError> {
        let duplicate = self.checkpoints.iter().any(|existing| {
            existing.operator_id == checkpoint.operator_id
                && !existing.has_best_segment_role()
                && !checkpoint.has_best_segment_role()
        });
        if duplicate {
            return Err(ScoringError::DuplicateCheckpoint {
                event: self.name.clone(),
                operator_id: checkpoint.operator_id,
            });
        }
        self.checkpoints.push(checkpoint);
        Ok(())
    }

    /// Merge best-segment boundary checkpoints into the adjacent course
    /// boundary when the same operator recorded both.
    ///
    /// Run once the closing `end` checkpoint is in place. A
    /// `best-segment-start` is preceded by the opening `start`/`thaw`
    /// checkpoint; a `best-segment-end` is followed by the closing
    /// `freeze`/`end`. Same operator means one physical punch, so the
    /// boundary checkpoint is dropped and the neighbour flagged instead.
    /// Removal indices are collected first and the sequence rebuilt in one
    /// pass, so iteration never sees shifted indices.
    pub fn collapse_best_segment_boundaries(&mut self) {
        let mut drop_indices = Vec::new();

        for idx in 0..self.checkpoints.len() {
            match self.checkpoints[idx].role {
                CheckpointRole::BestSegmentStart => {
                    if idx > 0 && self.checkpoints[idx - 1].operator_id == self.checkpoints[idx].operator_id {
                        self.checkpoints[idx - 1].starts_best_segment = true;
                        drop_indices.push(idx);
                    }
                }
                CheckpointRole::BestSegmentEnd => {
                    if idx + 1 < self.checkpoints.len()
                        && self.checkpoints[idx + 1].operator_id == self.checkpoints[idx].operator_id
                    {
                        self.checkpoints[idx + 1].ends_best_segment = true;
                        drop_indices.push(idx);
                    }
                }
                _ => {}
            }
        }

        if !drop_indices.is_empty() {
            self.checkpoints = self
                .checkpoints
                .iter()
                .enumerate()
                .filter(|(idx, _)| !drop_indices.contains(idx))
                .map(|(_, checkpoint)| checkpoint.clone())
                .collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(best_segment: bool) -> Event {
        Event::new(
            "Trail North".to_string(),
            10.0,
            EventKind::Course {
                discipline: Discipline::Trail,
                reference_time_minutes: 60.0,
                bonus_per_minute: 2.0,
                malus_per_minute: 2.0,
                best_segment: best_segment.then(|| BestSegment {
                    reference_time_minutes: 10.0,
                    bonus_per_minute: 3.0,
                    malus_per_minute: 3.0,
                }),
            },
        )
    }

    fn checkpoint(operator: &str, device: i32, role: CheckpointRole) -> Checkpoint {
        Checkpoint::new(operator.to_string(), device, role, 0.0)
    }

    #[test]
    fn collapse_merges_shared_operator_boundaries() {
        let mut event = course(true);
        event.append_checkpoint(checkpoint("S1", 31, CheckpointRole::Start)).unwrap();
        event.append_checkpoint(checkpoint("S1", 31, CheckpointRole::BestSegmentStart)).unwrap();
        event.append_checkpoint(checkpoint("S2", 32, CheckpointRole::BestSegmentEnd)).unwrap();
        event.append_checkpoint(checkpoint("S2", 32, CheckpointRole::End)).unwrap();

        let naive_len = event.checkpoints.len();
        event.collapse_best_segment_boundaries();

        assert_eq!(event.checkpoints.len(), naive_len - 2);
        assert!(event.checkpoints[0].starts_best_segment);
        assert_eq!(event.checkpoints[0].role, CheckpointRole::Start);
        assert!(event.checkpoints[1].ends_best_segment);
        assert_eq!(event.checkpoints[1].role, CheckpointRole::End);
    }

    #[test]
    fn collapse_keeps_distinct_operator_boundaries() {
        let mut event = course(true);
        event.append_checkpoint(checkpoint("S1", 31, CheckpointRole::Start)).unwrap();
        event.append_checkpoint(checkpoint("S3", 33, CheckpointRole::BestSegmentStart)).unwrap();
        event.append_checkpoint(checkpoint("S4", 34, CheckpointRole::BestSegmentEnd)).unwrap();
        event.append_checkpoint(checkpoint("S2", 32, CheckpointRole::End)).unwrap();

        event.collapse_best_segment_boundaries();

        assert_eq!(event.checkpoints.len(), 4);
        assert!(event.checkpoints[1].starts_best_segment);
        assert!(event.checkpoints[2].ends_best_segment);
        assert!(!event.checkpoints[0].starts_best_segment);
    }

    #[test]
    fn duplicate_operator_is_a_definition_error() {
        let mut event = course(false);
        event.append_checkpoint(checkpoint("S1", 31, CheckpointRole::Start)).unwrap();
        let err = event
            .append_checkpoint(checkpoint("S1", 35, CheckpointRole::End))
            .unwrap_err();
        assert!(matches!(err, ScoringError::DuplicateCheckpoint { .. }));
    }

    #[test]
    fn medal_parse_is_strict_on_value() {
        assert_eq!(Medal::parse(" Gold "), Some(Medal::Gold));
        assert_eq!(Medal::parse("platinum"), None);
    }
}
