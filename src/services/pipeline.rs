use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use chrono::NaiveTime;
use log::{info, warn};
use regex::Regex;

use crate::config::AppConfig;
use crate::domain::event::{Checkpoint, CheckpointRole, Discipline, Event, EventKind, Medal, MedalPoints};
use crate::domain::models::{CheckpointRecord, DayRecords, EventKindRecord, EventRecord};
use crate::domain::team::{ActivityEntry, CourseRun, Team};
use crate::errors::ScoringError;
use crate::scoring;
use crate::scoring::types::Punch;

/// Finalized output of one scored day, handed to reporting collaborators.
#[derive(Debug)]
pub struct DayResults {
    pub events: Vec<Event>,
    pub teams: Vec<Team>,
}

impl DayResults {
    /// Teams ordered by grand total, best first.
    pub fn ranking(&self) -> Vec<&Team> {
        let mut ranked: Vec<&Team> = self.teams.iter().collect();
        ranked.sort_by(|a, b| {
            b.totals
                .grand_total
                .partial_cmp(&a.totals.grand_total)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}

/// One-shot batch pipeline over a fixed day snapshot.
///
/// Ordering is the only cross-team dependency: definitions are built first,
/// the mass start injected, every team matched and validated before any
/// abort decision, and timing/scoring run only once the day is known to be
/// complete. Per-team work is independent; events are read-only during it.
pub struct DayPipeline {
    config: AppConfig,
    records: DayRecords,
}

impl DayPipeline {
    pub fn new(records: DayRecords, config: AppConfig) -> Self {
        Self { config, records }
    }

    /// Run the full day: definitions, reconciliation, timing, scoring.
    pub fn run(self) -> Result<DayResults> {
        info!("=== Starting Day Scoring ===");

        let (mut events, mut teams) = self.reconcile()?;

        info!("Step 5: Computing segment times...");
        compute_times(&mut teams, &events)?;

        info!("Step 6: Assigning activity results...");
        assign_activities(&mut teams, &events, &self.records.activity_results)?;

        info!("Step 7: Scoring...");
        score_teams(&mut teams, &events)?;
        accumulate_segment_averages(&mut events, &teams);

        info!("=== Day Scoring Complete ===");
        Ok(DayResults { events, teams })
    }

    /// Definitions + matching + validation only: a dry run for organizers
    /// checking punch data before results are final.
    pub fn check(self) -> Result<DayResults> {
        let (events, teams) = self.reconcile()?;
        info!("All punches accounted for: {} team(s) validated", teams.len());
        Ok(DayResults { events, teams })
    }

    /// Steps shared by `run` and `check`: build definitions, assign punches,
    /// inject the mass start, match and validate every team.
    fn reconcile(&self) -> Result<(Vec<Event>, Vec<Team>)> {
        info!("Step 1: Building events and checkpoints...");
        let mut events = build_events(&self.records.events, self.config.pipeline.best_segment_suffix)?;
        append_checkpoints(&mut events, &self.records.checkpoints)?;
        warn_on_course_structure(&events);
        info!("  → {} event(s) defined", events.len());

        info!("Step 2: Building teams and assigning punch records...");
        let mut teams = build_teams(&self.records)?;
        assign_punches(&mut teams, &self.records, self.config.pipeline.time_format)?;
        info!("  → {} team(s) in the running", teams.len());

        info!("Step 3: Mass-start injection...");
        inject_mass_start(
            &mut teams,
            self.records.mass_start.as_deref(),
            self.config.pipeline.mass_start_device_id,
        )?;

        info!("Step 4: Matching punches and validating completeness...");
        let missing_any = match_and_validate(&mut teams, &events);
        if missing_any {
            // Best-effort diagnostic before aborting: average the segment
            // times of unaffected team/event pairs so organizers can spot
            // the broken checkpoint.
            compute_times(&mut teams, &events)?;
            accumulate_segment_averages(&mut events, &teams);
            return Err(missing_punches_error(&teams).into());
        }

        Ok((events, teams))
    }
}

/// Build the event set from definition rows. Rows named
/// `<event><suffix>` merge into that course's best-segment descriptor
/// instead of defining a new event, so they must follow their base row.
fn build_events(records: &[EventRecord], best_segment_suffix: &str) -> Result<Vec<Event>> {
    let mut events: Vec<Event> = Vec::new();

    for record in records {
        if let Some(base_name) = record.name.strip_suffix(best_segment_suffix) {
            merge_best_segment(&mut events, base_name, record)?;
            continue;
        }

        let kind = match record.kind {
            EventKindRecord::CourseTrail => course_kind(record, Discipline::Trail),
            EventKindRecord::CourseBike => course_kind(record, Discipline::Bike),
            EventKindRecord::Activity => EventKind::Activity {
                medal_points: record
                    .medal_points
                    .as_ref()
                    .map(|table| MedalPoints {
                        gold: table.gold,
                        silver: table.silver,
                        bronze: table.bronze,
                    })
                    .unwrap_or(MedalPoints {
                        gold: 0.0,
                        silver: 0.0,
                        bronze: 0.0,
                    }),
            },
        };

        info!("  Defined event '{}'", record.name);
        events.push(Event::new(record.name.clone(), record.participation_points, kind));
    }

    Ok(events)
}

fn course_kind(record: &EventRecord, discipline: Discipline) -> EventKind {
    EventKind::Course {
        discipline,
        reference_time_minutes: record.reference_time_minutes,
        bonus_per_minute: record.bonus_per_minute,
        malus_per_minute: record.malus_per_minute,
        best_segment: None,
    }
}

fn merge_best_segment(events: &mut [Event], base_name: &str, record: &EventRecord) -> Result<()> {
    let known = event_names(events);
    let event = events
        .iter_mut()
        .find(|event| event.name == base_name)
        .ok_or_else(|| ScoringError::UnknownEvent {
            name: base_name.to_string(),
            known,
        })?;

    if let EventKind::Course { best_segment, .. } = &mut event.kind {
        *best_segment = Some(crate::domain::event::BestSegment {
            reference_time_minutes: record.reference_time_minutes,
            bonus_per_minute: record.bonus_per_minute,
            malus_per_minute: record.malus_per_minute,
        });
        info!("  Merged best-segment descriptor into '{}'", base_name);
    }
    Ok(())
}

/// Append checkpoints to their events in record order, collapsing
/// best-segment boundaries once a course's closing checkpoint is in place.
fn append_checkpoints(events: &mut [Event], records: &[CheckpointRecord]) -> Result<()> {
    for record in records {
        let known = event_names(events);
        let event = events
            .iter_mut()
            .find(|event| event.name == record.event_name)
            .ok_or_else(|| ScoringError::UnknownEvent {
                name: record.event_name.clone(),
                known,
            })?;

        let checkpoint = Checkpoint::new(
            record.operator_id.clone(),
            record.device_id,
            record.role,
            record.bonus_points,
        );
        info!(
            "  Added checkpoint {} ({:?}) to '{}'",
            record.device_id, record.role, event.name
        );
        event.append_checkpoint(checkpoint)?;

        if record.role == CheckpointRole::End && event.best_segment().is_some() {
            event.collapse_best_segment_boundaries();
        }
    }
    Ok(())
}

/// A course opens with a `start` (or resumes with a `thaw`) and closes with
/// an `end`. Anything else is almost certainly a typo in the checkpoint
/// sheet; flagged loudly but not fatal.
fn warn_on_course_structure(events: &[Event]) {
    for event in events.iter().filter(|event| event.is_course()) {
        let Some(first) = event.checkpoints.first() else {
            warn!("Course '{}' has no checkpoints assigned", event.name);
            continue;
        };
        if !matches!(first.role, CheckpointRole::Start | CheckpointRole::Thaw) {
            warn!(
                "Course '{}' opens with a {:?} checkpoint instead of a start",
                event.name, first.role
            );
        }
        if let Some(last) = event.checkpoints.last() {
            if last.role != CheckpointRole::End {
                warn!(
                    "Course '{}' closes with a {:?} checkpoint instead of an end",
                    event.name, last.role
                );
            }
        }
    }
}

fn build_teams(records: &DayRecords) -> Result<Vec<Team>> {
    let mut seen_chips = HashSet::new();
    let mut teams = Vec::new();

    for record in &records.teams {
        if !seen_chips.insert(record.chip_id) {
            return Err(ScoringError::DuplicateChip {
                chip_id: record.chip_id,
            }
            .into());
        }
        teams.push(Team {
            chip_id: record.chip_id,
            bib: record.bib_number,
            name: record.team_name.clone(),
            members: record
                .members
                .iter()
                .map(|member| (member.first.clone(), member.last.clone()))
                .collect(),
            is_corporate: record.is_corporate,
            category: record.category.clone(),
            contact: record.contact.clone(),
            punches: Vec::new(),
            runs: Vec::new(),
            activities: Vec::new(),
            totals: Default::default(),
        });
    }

    Ok(teams)
}

/// Attach raw punch records to their teams by chip id. An unassigned chip
/// read is a data-quality warning, not an error; a team left with zero
/// punches is dropped from the day rather than scored as empty.
fn assign_punches(teams: &mut Vec<Team>, records: &DayRecords, time_format: &str) -> Result<()> {
    for record in &records.punches {
        let Some(team) = teams.iter_mut().find(|team| team.chip_id == record.chip_id) else {
            warn!("Chip {} has no registered team; read ignored", record.chip_id);
            continue;
        };

        let mut punches = Vec::with_capacity(record.punches.len());
        for raw in &record.punches {
            let time = NaiveTime::parse_from_str(&raw.time, time_format).with_context(|| {
                format!(
                    "invalid punch time '{}' for chip {} (device {})",
                    raw.time, record.chip_id, raw.device_id
                )
            })?;
            punches.push(Punch {
                device_id: raw.device_id,
                time,
            });
        }
        team.punches = punches;
    }

    teams.retain(|team| {
        if team.punches.is_empty() {
            warn!(
                "Team [{}] {} (chip {}) has no punches; excluded from the day",
                team.bib, team.name, team.chip_id
            );
            false
        } else {
            true
        }
    });

    Ok(())
}

/// Prepend the shared synthetic start punch (device -1) to every team's raw
/// record. The time format is validated strictly: two-digit groups only.
fn inject_mass_start(teams: &mut [Team], mass_start: Option<&str>, device_id: i32) -> Result<()> {
    let Some(raw) = mass_start else {
        info!("  No mass start configured");
        return Ok(());
    };

    let format_error = || ScoringError::InvalidMassStartFormat {
        value: raw.to_string(),
    };
    let pattern = Regex::new(r"^\d{2}:\d{2}:\d{2}$").expect("static pattern");
    if !pattern.is_match(raw) {
        return Err(format_error().into());
    }
    let time = NaiveTime::parse_from_str(raw, "%H:%M:%S").map_err(|_| format_error())?;

    for team in teams.iter_mut() {
        team.punches.insert(0, Punch { device_id, time });
    }
    info!("  Mass start {} injected for every team", raw);
    Ok(())
}

/// Match every team against every course it ran and record what is missing.
/// Validation never short-circuits: partial results for all teams are kept
/// so the day-level abort can report everything at once.
fn match_and_validate(teams: &mut [Team], events: &[Event]) -> bool {
    let mut missing_any = false;

    for team in teams.iter_mut() {
        for event in events.iter().filter(|event| event.is_course()) {
            if !team.ran_event(event) {
                continue;
            }
            let matched = scoring::match_punches(&team.punches, &event.checkpoints);
            let missing = scoring::missing_checkpoints(event, &matched);
            for checkpoint in &missing {
                warn!(
                    "Team [{}] {} ran '{}' but never punched device {} (operator {})",
                    team.bib, team.name, event.name, checkpoint.device_id, checkpoint.operator_id
                );
                missing_any = true;
            }
            team.runs.push(CourseRun::new(event.name.clone(), matched, missing));
        }
    }

    missing_any
}

fn missing_punches_error(teams: &[Team]) -> ScoringError {
    let affected: Vec<String> = teams
        .iter()
        .filter(|team| team.missing_any())
        .map(|team| {
            let events: Vec<&str> = team
                .runs
                .iter()
                .filter(|run| !run.missing.is_empty())
                .map(|run| run.event_name.as_str())
                .collect();
            format!("[{}] {} ({})", team.bib, team.name, events.join(", "))
        })
        .collect();

    ScoringError::MissingPunches {
        team_count: affected.len(),
        details: affected.join("; "),
    }
}

/// Segment timing for every run that has nothing missing.
fn compute_times(teams: &mut [Team], events: &[Event]) -> Result<()> {
    for team in teams.iter_mut() {
        for run in team.runs.iter_mut().filter(|run| run.missing.is_empty()) {
            let times = scoring::compute_segments(&run.matched);
            let event = find_event(events, &run.event_name)?;
            if event.best_segment().is_some() && times.best_segment_seconds.is_none() {
                warn!(
                    "Team [{}] {}: no flagged best-segment pair found on '{}'",
                    team.bib, team.name, run.event_name
                );
            }
            run.segments = Some(times);
        }
    }
    Ok(())
}

/// Attach judged activity results to teams by bib number.
fn assign_activities(
    teams: &mut [Team],
    events: &[Event],
    records: &[crate::domain::models::ActivityResultRecord],
) -> Result<()> {
    for record in records {
        let event = find_event(events, &record.activity_name)?;

        for placing in &record.results {
            let medal = Medal::parse(&placing.medal).ok_or_else(|| ScoringError::UnknownMedal {
                activity: record.activity_name.clone(),
                medal: placing.medal.clone(),
            })?;
            let team = teams
                .iter_mut()
                .find(|team| team.bib == placing.bib_number)
                .ok_or(ScoringError::UnknownBib {
                    bib: placing.bib_number,
                })?;

            let points = scoring::score_activity(event, medal);
            info!(
                "  '{}': {:?} for [{}] {} ({} pts)",
                event.name, medal, team.bib, team.name, points
            );
            team.activities.push(ActivityEntry {
                event_name: event.name.clone(),
                medal,
                points,
            });
        }
    }
    Ok(())
}

/// Apply the points formula to every run and roll up team totals.
fn score_teams(teams: &mut [Team], events: &[Event]) -> Result<()> {
    for team in teams.iter_mut() {
        for run in team.runs.iter_mut() {
            let event = find_event(events, &run.event_name)?;
            if let Some(times) = &run.segments {
                run.points = Some(scoring::score_course(event, &run.matched, times));
            }
        }
        team.aggregate_totals();
        info!(
            "  [{}] {}: {:.1} pts ({:.1} courses, {:.1} activities)",
            team.bib,
            team.name,
            team.totals.grand_total,
            team.totals.course_points,
            team.totals.activity_points
        );
    }
    Ok(())
}

/// Average each course's elementary segment times over every clean run.
/// This feeds the missing-punch diagnostic and the per-event statistics.
pub fn accumulate_segment_averages(events: &mut [Event], teams: &[Team]) {
    let mut samples: HashMap<String, HashMap<String, (f64, u32)>> = HashMap::new();

    for team in teams {
        for run in team.runs.iter().filter(|run| run.missing.is_empty()) {
            let Some(times) = &run.segments else { continue };
            let per_event = samples.entry(run.event_name.clone()).or_default();
            for segment in &times.elementary {
                let entry = per_event.entry(segment.segment_key()).or_insert((0.0, 0));
                entry.0 += segment.seconds;
                entry.1 += 1;
            }
        }
    }

    for event in events.iter_mut() {
        let Some(per_event) = samples.get(&event.name) else { continue };
        event.mean_segment_times = per_event
            .iter()
            .map(|(key, (sum, count))| (key.clone(), sum / f64::from(*count)))
            .collect();
        info!(
            "  Mean segment times for '{}': {:?}",
            event.name, event.mean_segment_times
        );
    }
}

fn event_names(events: &[Event]) -> Vec<String> {
    events.iter().map(|event| event.name.clone()).collect()
}

fn find_event<'a>(events: &'a [Event], name: &str) -> Result<&'a Event, ScoringError> {
    events
        .iter()
        .find(|event| event.name == name)
        .ok_or_else(|| ScoringError::UnknownEvent {
            name: name.to_string(),
            known: event_names(events),
        })
}
