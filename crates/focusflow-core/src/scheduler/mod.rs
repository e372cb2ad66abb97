//! Study timetable generation.
//!
//! The daily pipeline is:
//! - find availability windows from the profile ([`availability_windows`])
//! - weigh subjects by priority, weakness and mood ([`weigh_subjects`])
//! - expand the weights into a shuffled [`DistributionPool`]
//! - walk the windows in fixed-length steps, one subject per slot, with a
//!   short break between slots ([`SlotAllocator`])
//!
//! The weekly driver repeats this for seven consecutive dates. Randomness is
//! always supplied by the caller so a seeded generator reproduces a plan.

mod allocator;
mod availability;
mod weighting;

pub use allocator::{DistributionPool, SlotAllocator};
pub use availability::availability_windows;
pub use weighting::{subject_weight, weigh_subjects, WeightedSubject, Weighting};

use chrono::NaiveDate;
use rand::Rng;

use crate::clock::ClockTime;
use crate::plan::DayPlan;
use crate::profile::{Profile, Subject};

/// Number of days produced by [`StudyScheduler::generate_weekly`].
pub const WEEK_LENGTH: usize = 7;

pub const DEFAULT_BREAK_MINUTES: u32 = 10;
pub const DEFAULT_POST_SCHOOL_BUFFER_MINUTES: u32 = 60;
pub const DEFAULT_SLOT_COLOR: &str = "#3b82f6";
pub const DEFAULT_DAY_START: ClockTime = ClockTime::hm(6, 0);
pub const DEFAULT_DAY_END: ClockTime = ClockTime::hm(22, 0);
pub const DEFAULT_SCHOOL_START: ClockTime = ClockTime::hm(8, 0);
pub const DEFAULT_SCHOOL_END: ClockTime = ClockTime::hm(15, 0);

/// Scheduling policy values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Gap inserted between consecutive slots (minutes)
    pub break_minutes: u32,
    /// Earliest time the school-hours fallback may use
    pub day_start: ClockTime,
    /// Latest time the school-hours fallback may use
    pub day_end: ClockTime,
    /// Rest/commute time after school before studying (minutes)
    pub post_school_buffer_minutes: u32,
    pub default_school_start: ClockTime,
    pub default_school_end: ClockTime,
    /// Slot color for subjects without one
    pub default_color: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            break_minutes: DEFAULT_BREAK_MINUTES,
            day_start: DEFAULT_DAY_START,
            day_end: DEFAULT_DAY_END,
            post_school_buffer_minutes: DEFAULT_POST_SCHOOL_BUFFER_MINUTES,
            default_school_start: DEFAULT_SCHOOL_START,
            default_school_end: DEFAULT_SCHOOL_END,
            default_color: DEFAULT_SLOT_COLOR.to_string(),
        }
    }
}

/// Generates day and week study plans.
#[derive(Debug, Clone, Default)]
pub struct StudyScheduler {
    config: SchedulerConfig,
}

impl StudyScheduler {
    /// Create a new scheduler with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Generate the plan for one date.
    ///
    /// Returns `None` when there are no subjects. A profile without usable
    /// free time still yields a plan, just with no slots.
    pub fn generate_daily<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        subjects: &[Subject],
        date: NaiveDate,
        rng: &mut R,
    ) -> Option<DayPlan> {
        if subjects.is_empty() {
            return None;
        }

        let slot_minutes = profile.slot_duration();
        let windows = availability_windows(profile, slot_minutes, &self.config);

        let weighting = weigh_subjects(subjects);
        let mut pool = DistributionPool::build(&weighting);
        pool.shuffle(rng);

        let allocator = SlotAllocator::new(slot_minutes, self.config.break_minutes, &self.config.default_color);
        let slots = allocator.allocate(&windows, &pool);

        if slots.is_empty() {
            tracing::warn!(%date, windows = windows.len(), "no study slots fit this day");
        } else {
            tracing::debug!(%date, slots = slots.len(), slot_minutes, "generated day plan");
        }

        Some(DayPlan::new(date, slots))
    }

    /// Generate plans for [`WEEK_LENGTH`] consecutive dates from `start`.
    ///
    /// Each day gets its own shuffle from the same generator. Days that
    /// produce no plan are left out.
    pub fn generate_weekly<R: Rng + ?Sized>(
        &self,
        profile: &Profile,
        subjects: &[Subject],
        start: NaiveDate,
        rng: &mut R,
    ) -> Vec<DayPlan> {
        let mut week = Vec::with_capacity(WEEK_LENGTH);
        let mut current = Some(start);

        for _ in 0..WEEK_LENGTH {
            let Some(date) = current else { break };
            if let Some(plan) = self.generate_daily(profile, subjects, date, rng) {
                week.push(plan);
            }
            current = date.succ_opt();
        }

        tracing::info!(%start, days = week.len(), subjects = subjects.len(), "generated weekly timetable");
        week
    }
}
