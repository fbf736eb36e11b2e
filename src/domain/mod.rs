pub mod event;
pub mod models;
pub mod team;

pub use event::{BestSegment, Checkpoint, CheckpointRole, Discipline, Event, EventKind, Medal, MedalPoints, MASS_START_DEVICE};
pub use models::DayRecords;
pub use team::{ActivityEntry, CourseRun, Team, TeamTotals};
