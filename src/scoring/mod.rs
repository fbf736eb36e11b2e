pub mod matcher;
pub mod points;
pub mod segments;
pub mod types;
pub mod validator;

pub use matcher::match_punches;
pub use points::{score_activity, score_course};
pub use segments::compute_segments;
pub use types::{CoursePoints, ElementaryTime, MatchedPunch, Punch, SegmentTimes};
pub use validator::missing_checkpoints;
