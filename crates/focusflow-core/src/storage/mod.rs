mod config;
pub mod database;
pub mod memory;

pub use config::{Config, SchedulerSection};
pub use database::PlannerDb;
pub use memory::MemoryStore;

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::{DatabaseError, Result};
use crate::note::Note;
use crate::plan::DayPlan;
use crate::profile::{Profile, Subject};

/// Persistence contract for the planner.
///
/// The profile is a singleton record; subjects and notes are keyed by id and
/// day plans by calendar date. Every `save_*` call is an upsert.
pub trait PlannerStore {
    fn profile(&self) -> Result<Option<Profile>, DatabaseError>;
    fn save_profile(&mut self, profile: &Profile) -> Result<(), DatabaseError>;

    /// All subjects in the order they were first added.
    fn subjects(&self) -> Result<Vec<Subject>, DatabaseError>;
    fn save_subject(&mut self, subject: &Subject) -> Result<(), DatabaseError>;
    /// Returns `false` if no subject had that id.
    fn delete_subject(&mut self, id: &str) -> Result<bool, DatabaseError>;

    fn timetable(&self, date: NaiveDate) -> Result<Option<DayPlan>, DatabaseError>;
    fn save_timetable(&mut self, plan: &DayPlan) -> Result<(), DatabaseError>;
    /// All stored plans ordered by date.
    fn timetables(&self) -> Result<Vec<DayPlan>, DatabaseError>;

    /// All notes, newest first.
    fn notes(&self) -> Result<Vec<Note>, DatabaseError>;
    fn save_note(&mut self, note: &Note) -> Result<(), DatabaseError>;
    fn delete_note(&mut self, id: &str) -> Result<bool, DatabaseError>;
}

/// Returns the FocusFlow data directory, creating it if needed.
///
/// `FOCUSFLOW_DATA_DIR` overrides the location. Otherwise it is
/// `~/.config/focusflow/`, or `~/.config/focusflow-dev/` when
/// `FOCUSFLOW_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("FOCUSFLOW_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("FOCUSFLOW_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("focusflow-dev")
            } else {
                base_dir.join("focusflow")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
