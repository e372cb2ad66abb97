//! In-process store, used by tests and by hosts that persist elsewhere.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::PlannerStore;
use crate::error::DatabaseError;
use crate::note::Note;
use crate::plan::DayPlan;
use crate::profile::{Profile, Subject};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    profile: Option<Profile>,
    subjects: Vec<Subject>,
    timetables: BTreeMap<NaiveDate, DayPlan>,
    notes: Vec<Note>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlannerStore for MemoryStore {
    fn profile(&self) -> Result<Option<Profile>, DatabaseError> {
        Ok(self.profile.clone())
    }

    fn save_profile(&mut self, profile: &Profile) -> Result<(), DatabaseError> {
        self.profile = Some(profile.clone());
        Ok(())
    }

    fn subjects(&self) -> Result<Vec<Subject>, DatabaseError> {
        Ok(self.subjects.clone())
    }

    fn save_subject(&mut self, subject: &Subject) -> Result<(), DatabaseError> {
        match self.subjects.iter_mut().find(|s| s.id == subject.id) {
            Some(existing) => *existing = subject.clone(),
            None => self.subjects.push(subject.clone()),
        }
        Ok(())
    }

    fn delete_subject(&mut self, id: &str) -> Result<bool, DatabaseError> {
        let before = self.subjects.len();
        self.subjects.retain(|s| s.id != id);
        Ok(self.subjects.len() != before)
    }

    fn timetable(&self, date: NaiveDate) -> Result<Option<DayPlan>, DatabaseError> {
        Ok(self.timetables.get(&date).cloned())
    }

    fn save_timetable(&mut self, plan: &DayPlan) -> Result<(), DatabaseError> {
        self.timetables.insert(plan.date, plan.clone());
        Ok(())
    }

    fn timetables(&self) -> Result<Vec<DayPlan>, DatabaseError> {
        Ok(self.timetables.values().cloned().collect())
    }

    fn notes(&self) -> Result<Vec<Note>, DatabaseError> {
        let mut notes = self.notes.clone();
        // Stable sort keeps later inserts first among equal timestamps.
        notes.reverse();
        notes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(notes)
    }

    fn save_note(&mut self, note: &Note) -> Result<(), DatabaseError> {
        match self.notes.iter_mut().find(|n| n.id == note.id) {
            Some(existing) => *existing = note.clone(),
            None => self.notes.push(note.clone()),
        }
        Ok(())
    }

    fn delete_note(&mut self, id: &str) -> Result<bool, DatabaseError> {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        Ok(self.notes.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Mood, Priority, Weakness};

    #[test]
    fn subject_upsert_replaces_in_place() {
        let mut store = MemoryStore::new();
        let a = Subject::new("a", "Math", Priority::High, Weakness::Weak, Mood::Like);
        let b = Subject::new("b", "Art", Priority::Low, Weakness::Strong, Mood::Like);
        store.save_subject(&a).unwrap();
        store.save_subject(&b).unwrap();
        let a2 = Subject {
            priority: Priority::Low,
            ..a
        };
        store.save_subject(&a2).unwrap();
        assert_eq!(store.subjects().unwrap(), vec![a2, b]);
    }

    #[test]
    fn timetables_are_date_ordered() {
        let mut store = MemoryStore::new();
        let d = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        store.save_timetable(&DayPlan::new(d.succ_opt().unwrap(), vec![])).unwrap();
        store.save_timetable(&DayPlan::new(d, vec![])).unwrap();
        let dates: Vec<_> = store.timetables().unwrap().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d, d.succ_opt().unwrap()]);
    }

    #[test]
    fn delete_reports_missing() {
        let mut store = MemoryStore::new();
        assert!(!store.delete_note("x").unwrap());
        store.save_note(&Note::new("x", "t", "").unwrap()).unwrap();
        assert!(store.delete_note("x").unwrap());
    }
}
