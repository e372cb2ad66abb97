//! # FocusFlow Core Library
//!
//! This library provides the core logic for the FocusFlow study timetable
//! planner. A student's profile (age, school hours, optional study window) and
//! subject list (priority, weakness, mood) are turned into a week of
//! fixed-length study slots separated by short breaks.
//!
//! ## Architecture
//!
//! - **Scheduler**: availability windows, subject weighting, a shuffled
//!   distribution pool and the slot allocator, driven once per day for seven
//!   consecutive dates
//! - **Storage**: SQLite persistence for profile, subjects, plans and notes,
//!   plus TOML-based configuration
//! - **Stats**: aggregates for dashboard charts
//!
//! ## Key Components
//!
//! - [`StudyScheduler`]: Daily and weekly plan generation
//! - [`Planner`]: Store-backed context for generating and editing plans
//! - [`PlannerDb`]: SQLite store
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod note;
pub mod plan;
pub mod planner;
pub mod profile;
pub mod scheduler;
pub mod stats;
pub mod storage;

pub use clock::{ClockTime, TimeRange};
pub use error::{ConfigError, CoreError, DatabaseError, TimeParseError, ValidationError};
pub use note::Note;
pub use plan::{retime_row, DayPlan, ScheduledSlot, SlotAssignment, SlotStatus, BREAK_LABEL};
pub use planner::Planner;
pub use profile::{slot_duration, Mood, Priority, Profile, Subject, Weakness};
pub use scheduler::{SchedulerConfig, StudyScheduler};
pub use stats::{ChartDatum, DashboardSummary};
pub use storage::{data_dir, Config, MemoryStore, PlannerDb, PlannerStore};
