use chrono::NaiveTime;
use serde::Serialize;

use crate::domain::event::Checkpoint;

/// One timestamped chip read, in raw read order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Punch {
    pub device_id: i32,
    pub time: NaiveTime,
}

/// A raw punch reconciled with the checkpoint it satisfies.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedPunch {
    pub checkpoint: Checkpoint,
    pub time: NaiveTime,
}

/// Elapsed time between two consecutive matched checkpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ElementaryTime {
    pub seconds: f64,
    pub from: Checkpoint,
    pub to: Checkpoint,
}

impl ElementaryTime {
    /// Key used when averaging the same physical segment across teams.
    pub fn segment_key(&self) -> String {
        format!("{}-{}", self.from.operator_id, self.to.operator_id)
    }
}

/// All elapsed times for one team on one course.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentTimes {
    pub elementary: Vec<ElementaryTime>,
    pub total_seconds: f64,
    /// Present when a uniquely-flagged best-segment pair was found.
    pub best_segment_seconds: Option<f64>,
}

/// Points breakdown for one team on one course.
#[derive(Debug, Clone, Serialize)]
pub struct CoursePoints {
    pub speed: f64,
    pub best_segment: Option<f64>,
    pub checkpoint_bonus: f64,
    pub participation: f64,
    pub total: f64,
}
