use clap::Subcommand;
use focusflow_core::Note;
use uuid::Uuid;

use super::{open_planner, print_json, CliResult};

#[derive(Subcommand)]
pub enum NoteAction {
    /// Add a note
    Add {
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
        /// Link the note to a subject id
        #[arg(long)]
        subject: Option<String>,
    },
    /// List notes, newest first
    List,
    /// Remove a note by id
    Remove {
        id: String,
    },
}

pub fn run(action: NoteAction) -> CliResult {
    let mut planner = open_planner()?;

    match action {
        NoteAction::Add {
            title,
            content,
            subject,
        } => {
            let mut note = Note::new(Uuid::new_v4().to_string(), title, content)?;
            note.subject_id = subject;
            planner.add_note(&note)?;
            print_json(&note)?;
        }
        NoteAction::List => print_json(&planner.notes()?)?,
        NoteAction::Remove { id } => {
            planner.remove_note(&id)?;
            println!("note removed: {id}");
        }
    }
    Ok(())
}
