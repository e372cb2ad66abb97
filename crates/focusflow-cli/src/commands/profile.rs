//! Student profile commands.

use clap::Subcommand;
use focusflow_core::{ClockTime, Profile, TimeRange};

use super::{open_planner, print_json, CliResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the saved profile
    Show,
    /// Create or update the profile. Omitted fields keep their value.
    Set {
        /// Age in years (required when no profile exists yet)
        #[arg(long)]
        age: Option<u32>,
        /// School start, "08:00" or "8:00 AM"
        #[arg(long)]
        school_start: Option<ClockTime>,
        /// School end
        #[arg(long)]
        school_end: Option<ClockTime>,
        /// Preferred study window start
        #[arg(long)]
        study_start: Option<ClockTime>,
        /// Preferred study window end (may be past midnight)
        #[arg(long)]
        study_end: Option<ClockTime>,
        /// Remove the preferred study window
        #[arg(long, conflicts_with_all = ["study_start", "study_end"])]
        clear_study_window: bool,
        /// Explicit free range, e.g. "16:00-18:30". Repeat for more; replaces
        /// any saved ranges.
        #[arg(long = "slot", value_parser = parse_range)]
        slots: Vec<TimeRange>,
    },
}

fn parse_range(input: &str) -> Result<TimeRange, String> {
    let (start, end) = input
        .split_once('-')
        .ok_or_else(|| format!("expected START-END, got '{input}'"))?;
    let start: ClockTime = start.trim().parse().map_err(|e| format!("{e}"))?;
    let end: ClockTime = end.trim().parse().map_err(|e| format!("{e}"))?;
    if start >= end {
        return Err(format!("range '{input}' ends before it starts"));
    }
    Ok(TimeRange::new(start, end))
}

pub fn run(action: ProfileAction) -> CliResult {
    let mut planner = open_planner()?;

    match action {
        ProfileAction::Show => match planner.profile()? {
            Some(profile) => print_json(&profile)?,
            None => return Err("no profile saved; run `focusflow profile set --age <AGE>`".into()),
        },
        ProfileAction::Set {
            age,
            school_start,
            school_end,
            study_start,
            study_end,
            clear_study_window,
            slots,
        } => {
            let mut profile = match (planner.profile()?, age) {
                (Some(existing), _) => existing,
                (None, Some(age)) => Profile::new(age),
                (None, None) => return Err("--age is required for a new profile".into()),
            };

            if let Some(age) = age {
                profile.age = age;
            }
            if school_start.is_some() {
                profile.school_start = school_start;
            }
            if school_end.is_some() {
                profile.school_end = school_end;
            }
            if clear_study_window {
                profile.study_start = None;
                profile.study_end = None;
            }
            if study_start.is_some() {
                profile.study_start = study_start;
            }
            if study_end.is_some() {
                profile.study_end = study_end;
            }
            if !slots.is_empty() {
                profile.available_slots = slots;
            }

            planner.save_profile(&profile)?;
            print_json(&profile)?;
        }
    }
    Ok(())
}
