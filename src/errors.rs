use thiserror::Error;

/// Fatal errors raised while building day definitions or reconciling punches.
///
/// Definition errors abort immediately; `MissingPunches` is only raised after
/// every team has been validated and the segment-average diagnostic has run.
#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("event '{name}' is not defined; known events: {known:?}")]
    UnknownEvent { name: String, known: Vec<String> },

    #[error("operator '{operator_id}' is already assigned to event '{event}'")]
    DuplicateCheckpoint { event: String, operator_id: String },

    #[error("chip {chip_id} is assigned to more than one team")]
    DuplicateChip { chip_id: u32 },

    #[error("bib {bib} is not registered in the team list")]
    UnknownBib { bib: u32 },

    #[error("unrecognized medal '{medal}' in results for '{activity}'")]
    UnknownMedal { activity: String, medal: String },

    #[error("mass start time '{value}' is not in hh:mm:ss format")]
    InvalidMassStartFormat { value: String },

    #[error("{team_count} team(s) have missing punches: {details}")]
    MissingPunches { team_count: usize, details: String },
}
