//! Weekly timetable commands.

use chrono::NaiveDate;
use clap::Subcommand;
use focusflow_core::{ClockTime, Config, SlotStatus};
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

use super::{open_planner_with, print_json, today, CliResult};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Generate (or regenerate) seven days starting at --start
    Generate {
        /// First date, YYYY-MM-DD (default: today)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// RNG seed for a reproducible plan (overrides config `seed`)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show stored plans for seven days starting at --start
    Show {
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    /// Reassign one slot to a subject or a break
    Edit {
        /// Date of the plan, YYYY-MM-DD
        date: NaiveDate,
        /// Slot index within the day (0-based)
        index: usize,
        /// Subject id to study in this slot
        #[arg(long, required_unless_present = "as_break")]
        subject: Option<String>,
        /// Turn the slot into a break
        #[arg(long = "break", conflicts_with = "subject")]
        as_break: bool,
    },
    /// Move a slot row to a new start time on every day of the week
    Retime {
        /// Slot index within each day (0-based)
        index: usize,
        /// New start time
        time: ClockTime,
        #[arg(long)]
        start: Option<NaiveDate>,
    },
    /// Mark a slot as done
    Done {
        date: NaiveDate,
        index: usize,
        /// Mark as pending again
        #[arg(long)]
        undo: bool,
    },
}

pub fn run(action: PlanAction) -> CliResult {
    let config = Config::load()?;
    let mut planner = open_planner_with(&config)?;

    match action {
        PlanAction::Generate { start, seed } => {
            let start = start.unwrap_or_else(today);
            let mut rng = match seed.or(config.seed) {
                Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
                None => Mcg128Xsl64::from_entropy(),
            };
            let week = planner.generate_week(start, &mut rng)?;
            print_json(&week)?;
        }
        PlanAction::Show { start } => {
            let week = planner.load_week(start.unwrap_or_else(today))?;
            print_json(&week)?;
        }
        PlanAction::Edit {
            date,
            index,
            subject,
            as_break: _,
        } => {
            let day = planner.edit_slot(date, index, subject.as_deref())?;
            print_json(&day)?;
        }
        PlanAction::Retime { index, time, start } => {
            let week = planner.retime_row(start.unwrap_or_else(today), index, time)?;
            print_json(&week)?;
        }
        PlanAction::Done { date, index, undo } => {
            let status = if undo { SlotStatus::Pending } else { SlotStatus::Done };
            let day = planner.mark_slot(date, index, status)?;
            print_json(&day)?;
        }
    }
    Ok(())
}
