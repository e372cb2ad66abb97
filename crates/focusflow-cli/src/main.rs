use clap::{Parser, Subcommand};

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "focusflow", version, about = "FocusFlow study timetable planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Student profile (age, school hours, study window)
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Subject management
    Subject {
        #[command(subcommand)]
        action: commands::subject::SubjectAction,
    },
    /// Weekly timetable generation and editing
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Study notes
    Note {
        #[command(subcommand)]
        action: commands::note::NoteAction,
    },
    /// Dashboard aggregates
    Stats,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    logging::init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Subject { action } => commands::subject::run(action),
        Commands::Plan { action } => commands::plan::run(action),
        Commands::Note { action } => commands::note::run(action),
        Commands::Stats => commands::stats::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
