use serde::{Deserialize, Serialize};

use crate::domain::event::CheckpointRole;

/// Input record shapes handed over by the ingestion collaborators.
///
/// Field layout follows the source rows one to one; the pipeline turns these
/// into the richer `Event`/`Team` entities.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKindRecord {
    CourseTrail,
    CourseBike,
    Activity,
}

/// One event-definition row. Course rows carry the timing triple, activity
/// rows the medal table; the unused side stays at its default. A row named
/// `<event> best-segment` is merged into that course's best-segment
/// descriptor instead of defining a new event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub name: String,
    pub kind: EventKindRecord,
    #[serde(default)]
    pub participation_points: f64,
    #[serde(default)]
    pub reference_time_minutes: f64,
    #[serde(default)]
    pub bonus_per_minute: f64,
    #[serde(default)]
    pub malus_per_minute: f64,
    #[serde(default)]
    pub medal_points: Option<MedalPointsRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedalPointsRecord {
    pub gold: f64,
    pub silver: f64,
    pub bronze: f64,
}

/// One checkpoint-assignment row, referencing its event by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointRecord {
    pub event_name: String,
    pub operator_id: String,
    pub device_id: i32,
    pub role: CheckpointRole,
    #[serde(default)]
    pub bonus_points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberRecord {
    pub first: String,
    pub last: String,
}

/// One team-definition row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRecord {
    pub chip_id: u32,
    pub bib_number: u32,
    #[serde(default)]
    pub is_corporate: bool,
    pub category: String,
    pub team_name: String,
    pub members: Vec<MemberRecord>,
    #[serde(default)]
    pub contact: String,
}

/// One raw chip read: device id plus `hh:mm:ss` wall-clock time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPunchRecord {
    pub device_id: i32,
    pub time: String,
}

/// All reads of one chip for the day, in read order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchRecord {
    pub chip_id: u32,
    pub punches: Vec<RawPunchRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityPlacingRecord {
    pub bib_number: u32,
    pub medal: String,
}

/// Judged results of one activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityResultRecord {
    pub activity_name: String,
    pub results: Vec<ActivityPlacingRecord>,
}

/// Complete typed snapshot of one day, as loaded from the day file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayRecords {
    /// Optional shared start time (`hh:mm:ss`), validated strictly before use.
    #[serde(default)]
    pub mass_start: Option<String>,
    pub events: Vec<EventRecord>,
    pub checkpoints: Vec<CheckpointRecord>,
    pub teams: Vec<TeamRecord>,
    pub punches: Vec<PunchRecord>,
    #[serde(default)]
    pub activity_results: Vec<ActivityResultRecord>,
}
