use serde::Serialize;

use crate::domain::event::{Checkpoint, Event, Medal, MASS_START_DEVICE};
use crate::scoring::types::{CoursePoints, MatchedPunch, Punch, SegmentTimes};

/// One team's result on one course: filled left to right by the pipeline
/// (matching, validation, timing, scoring) and never revisited.
#[derive(Debug, Clone, Serialize)]
pub struct CourseRun {
    pub event_name: String,
    pub matched: Vec<MatchedPunch>,
    /// Expected checkpoints absent from `matched` (synthetic mass-start
    /// device excluded).
    pub missing: Vec<Checkpoint>,
    pub segments: Option<SegmentTimes>,
    pub points: Option<CoursePoints>,
}

impl CourseRun {
    pub fn new(event_name: String, matched: Vec<MatchedPunch>, missing: Vec<Checkpoint>) -> Self {
        Self {
            event_name,
            matched,
            missing,
            segments: None,
            points: None,
        }
    }
}

/// One judged-activity result for a team.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub event_name: String,
    pub medal: Medal,
    /// Participation points plus the medal-table lookup.
    pub points: f64,
}

/// Named point subtotals for reporting. Best-segment figures are already
/// included in the course figures, never added twice.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamTotals {
    pub courses_time_seconds: f64,
    pub course_points: f64,
    pub best_segment_time_seconds: f64,
    pub best_segment_points: f64,
    pub activity_points: f64,
    pub grand_total: f64,
}

/// One competing unit, identified by chip and bib.
#[derive(Debug, Clone, Serialize)]
pub struct Team {
    pub chip_id: u32,
    pub bib: u32,
    pub name: String,
    pub members: Vec<(String, String)>,
    pub is_corporate: bool,
    pub category: String,
    pub contact: String,
    /// Raw chip reads in read order. Sparse: unrelated devices appear,
    /// expected ones may not.
    pub punches: Vec<Punch>,
    pub runs: Vec<CourseRun>,
    pub activities: Vec<ActivityEntry>,
    pub totals: TeamTotals,
}

impl Team {
    /// Device-id overlap test: the team ran an event if any real punch
    /// (the injected mass-start read does not count) hit one of the
    /// event's devices.
    pub fn ran_event(&self, event: &Event) -> bool {
        self.punches.iter().any(|punch| {
            punch.device_id != MASS_START_DEVICE
                && event
                    .checkpoints
                    .iter()
                    .any(|checkpoint| checkpoint.device_id == punch.device_id)
        })
    }

    pub fn missing_any(&self) -> bool {
        self.runs.iter().any(|run| !run.missing.is_empty())
    }

    /// Roll the per-run and per-activity figures up into the named subtotals.
    pub fn aggregate_totals(&mut self) {
        let mut totals = TeamTotals::default();

        for run in &self.runs {
            if let Some(segments) = &run.segments {
                totals.courses_time_seconds += segments.total_seconds;
                if let Some(best) = segments.best_segment_seconds {
                    totals.best_segment_time_seconds += best;
                }
            }
            if let Some(points) = &run.points {
                totals.course_points += points.total;
                if let Some(best) = points.best_segment {
                    totals.best_segment_points += best;
                }
            }
        }

        totals.activity_points = self.activities.iter().map(|entry| entry.points).sum();
        totals.grand_total = totals.course_points + totals.activity_points;
        self.totals = totals;
    }
}
