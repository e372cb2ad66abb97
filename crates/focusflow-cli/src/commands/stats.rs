use super::{open_planner, print_json, CliResult};

pub fn run() -> CliResult {
    let planner = open_planner()?;
    print_json(&planner.dashboard()?)
}
