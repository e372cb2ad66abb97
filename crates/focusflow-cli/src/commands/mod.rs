pub mod config;
pub mod note;
pub mod plan;
pub mod profile;
pub mod stats;
pub mod subject;

use chrono::{Local, NaiveDate};
use focusflow_core::{Config, Planner, PlannerDb};
use serde::Serialize;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Open the planner on the default database with the configured policy.
pub fn open_planner() -> Result<Planner<PlannerDb>, Box<dyn std::error::Error>> {
    open_planner_with(&Config::load()?)
}

/// Open the planner with an already loaded config.
pub fn open_planner_with(config: &Config) -> Result<Planner<PlannerDb>, Box<dyn std::error::Error>> {
    let db = PlannerDb::open()?;
    Ok(Planner::with_config(db, config.scheduler()))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
