//! Free-form study notes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<String>,
}

impl Note {
    /// Create a note stamped with the current time.
    ///
    /// # Errors
    /// Returns an error if both title and content are blank.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let note = Self {
            id: id.into(),
            title: title.into(),
            content: content.into(),
            timestamp: Utc::now(),
            subject_id: None,
        };
        note.validate()?;
        Ok(note)
    }

    pub fn for_subject(mut self, subject_id: impl Into<String>) -> Self {
        self.subject_id = Some(subject_id.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() && self.content.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "note".into(),
                message: "title and content are both empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_note_is_rejected() {
        assert!(Note::new("1", "  ", "\n").is_err());
        assert!(Note::new("1", "", "content only").is_ok());
        assert!(Note::new("1", "title only", "").is_ok());
    }

    #[test]
    fn note_links_to_subject() {
        let note = Note::new("1", "Integrals", "practice set 4").unwrap().for_subject("math");
        assert_eq!(note.subject_id.as_deref(), Some("math"));
    }
}
