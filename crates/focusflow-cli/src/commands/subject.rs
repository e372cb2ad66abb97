use clap::Subcommand;
use focusflow_core::scheduler::subject_weight;
use focusflow_core::{Mood, Priority, Subject, Weakness};
use serde::Serialize;
use uuid::Uuid;

use super::{open_planner, print_json, CliResult};

#[derive(Subcommand)]
pub enum SubjectAction {
    /// Add a subject
    Add {
        /// Subject name
        name: String,
        /// High, Medium or Low
        #[arg(long, default_value = "Medium")]
        priority: Priority,
        /// Weak or Strong
        #[arg(long, default_value = "Strong")]
        weakness: Weakness,
        /// Like, Neutral or Dislike
        #[arg(long, default_value = "Neutral")]
        mood: Mood,
        /// Slot color, e.g. "#10b981"
        #[arg(long)]
        color: Option<String>,
    },
    /// List subjects with their scheduling weight
    List,
    /// Remove a subject by id
    Remove {
        id: String,
    },
}

#[derive(Serialize)]
struct SubjectRow<'a> {
    #[serde(flatten)]
    subject: &'a Subject,
    weight: u32,
}

pub fn run(action: SubjectAction) -> CliResult {
    let mut planner = open_planner()?;

    match action {
        SubjectAction::Add {
            name,
            priority,
            weakness,
            mood,
            color,
        } => {
            let mut subject = Subject::new(Uuid::new_v4().to_string(), name, priority, weakness, mood);
            subject.color = color;
            planner.add_subject(&subject)?;
            print_json(&subject)?;
        }
        SubjectAction::List => {
            let subjects = planner.subjects()?;
            let rows: Vec<_> = subjects
                .iter()
                .map(|subject| SubjectRow {
                    subject,
                    weight: subject_weight(subject),
                })
                .collect();
            print_json(&rows)?;
        }
        SubjectAction::Remove { id } => {
            planner.remove_subject(&id)?;
            println!("subject removed: {id}");
        }
    }
    Ok(())
}
