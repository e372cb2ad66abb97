//! Planner context: owns a store and the scheduling policy.
//!
//! Every user-facing operation goes through [`Planner`], which loads what it
//! needs from the store, applies the change and writes it back.

use chrono::NaiveDate;
use rand::Rng;

use crate::clock::ClockTime;
use crate::error::{CoreError, ValidationError};
use crate::note::Note;
use crate::plan::{self, DayPlan, SlotAssignment, SlotStatus};
use crate::profile::{Profile, Subject};
use crate::scheduler::{SchedulerConfig, StudyScheduler, WEEK_LENGTH};
use crate::stats::DashboardSummary;
use crate::storage::PlannerStore;

pub struct Planner<S: PlannerStore> {
    store: S,
    scheduler: StudyScheduler,
}

impl<S: PlannerStore> Planner<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, SchedulerConfig::default())
    }

    pub fn with_config(store: S, config: SchedulerConfig) -> Self {
        Self {
            store,
            scheduler: StudyScheduler::with_config(config),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn profile(&self) -> Result<Option<Profile>, CoreError> {
        Ok(self.store.profile()?)
    }

    pub fn save_profile(&mut self, profile: &Profile) -> Result<(), CoreError> {
        if let Some(range) = profile.available_slots.iter().find(|r| r.start >= r.end) {
            return Err(ValidationError::InvalidValue {
                field: "available_slots".into(),
                message: format!("range {} - {} is empty", range.start, range.end),
            }
            .into());
        }

        let mut ranges = profile.available_slots.clone();
        ranges.sort_by_key(|r| r.start);
        if let Some(pair) = ranges.windows(2).find(|pair| pair[1].start < pair[0].end) {
            return Err(ValidationError::InvalidValue {
                field: "available_slots".into(),
                message: format!(
                    "ranges {} - {} and {} - {} overlap",
                    pair[0].start, pair[0].end, pair[1].start, pair[1].end
                ),
            }
            .into());
        }

        self.store.save_profile(profile)?;
        tracing::debug!(age = profile.age, "saved profile");
        Ok(())
    }

    pub fn subjects(&self) -> Result<Vec<Subject>, CoreError> {
        Ok(self.store.subjects()?)
    }

    /// Insert or update a subject.
    pub fn add_subject(&mut self, subject: &Subject) -> Result<(), CoreError> {
        if subject.name.trim().is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "name".into(),
                message: "subject name is empty".into(),
            }
            .into());
        }
        self.store.save_subject(subject)?;
        tracing::debug!(id = %subject.id, name = %subject.name, "saved subject");
        Ok(())
    }

    /// Delete a subject. Existing plans keep the slots it was given.
    pub fn remove_subject(&mut self, id: &str) -> Result<(), CoreError> {
        if !self.store.delete_subject(id)? {
            return Err(not_found("subject", id));
        }
        Ok(())
    }

    /// Generate and store seven consecutive days from `start`.
    ///
    /// Regenerating overwrites whatever was stored for those dates.
    ///
    /// # Errors
    /// Fails with [`ValidationError::MissingProfile`] before a profile is
    /// saved, and [`ValidationError::EmptyCollection`] with no subjects.
    pub fn generate_week<R: Rng + ?Sized>(
        &mut self,
        start: NaiveDate,
        rng: &mut R,
    ) -> Result<Vec<DayPlan>, CoreError> {
        let profile = self.store.profile()?.ok_or(ValidationError::MissingProfile)?;
        let subjects = self.store.subjects()?;
        if subjects.is_empty() {
            return Err(ValidationError::EmptyCollection("subjects".into()).into());
        }

        let week = self.scheduler.generate_weekly(&profile, &subjects, start, rng);
        for day in &week {
            self.store.save_timetable(day)?;
        }
        Ok(week)
    }

    /// Stored plans for the seven dates from `start`. Dates without a plan
    /// are skipped.
    pub fn load_week(&self, start: NaiveDate) -> Result<Vec<DayPlan>, CoreError> {
        let mut week = Vec::with_capacity(WEEK_LENGTH);
        for date in start.iter_days().take(WEEK_LENGTH) {
            if let Some(plan) = self.store.timetable(date)? {
                week.push(plan);
            }
        }
        Ok(week)
    }

    fn load_day(&self, date: NaiveDate) -> Result<DayPlan, CoreError> {
        self.store
            .timetable(date)?
            .ok_or_else(|| not_found("timetable", &date.to_string()))
    }

    /// Reassign one slot to a subject, or to a break when `subject_id` is
    /// `None`.
    pub fn edit_slot(
        &mut self,
        date: NaiveDate,
        index: usize,
        subject_id: Option<&str>,
    ) -> Result<DayPlan, CoreError> {
        let mut day = self.load_day(date)?;
        let color = self.scheduler.config().default_color.as_str();

        match subject_id {
            Some(id) => {
                let subjects = self.store.subjects()?;
                let subject = subjects
                    .iter()
                    .find(|s| s.id == id)
                    .ok_or_else(|| not_found("subject", id))?;
                day.assign(index, SlotAssignment::Subject(subject), color)?;
            }
            None => day.assign(index, SlotAssignment::Break, color)?,
        }

        self.store.save_timetable(&day)?;
        Ok(day)
    }

    pub fn mark_slot(
        &mut self,
        date: NaiveDate,
        index: usize,
        status: SlotStatus,
    ) -> Result<DayPlan, CoreError> {
        let mut day = self.load_day(date)?;
        day.set_status(index, status)?;
        self.store.save_timetable(&day)?;
        Ok(day)
    }

    /// Move row `index` to `new_start` on every stored day of the week from
    /// `start`.
    pub fn retime_row(
        &mut self,
        start: NaiveDate,
        index: usize,
        new_start: ClockTime,
    ) -> Result<Vec<DayPlan>, CoreError> {
        let mut week = self.load_week(start)?;
        if week.is_empty() {
            return Err(not_found("timetable", &start.to_string()));
        }
        let changed = plan::retime_row(&mut week, index, new_start)?;
        for day in &week {
            self.store.save_timetable(day)?;
        }
        tracing::debug!(%start, index, %new_start, changed, "retimed row");
        Ok(week)
    }

    pub fn notes(&self) -> Result<Vec<Note>, CoreError> {
        Ok(self.store.notes()?)
    }

    pub fn add_note(&mut self, note: &Note) -> Result<(), CoreError> {
        note.validate()?;
        self.store.save_note(note)?;
        Ok(())
    }

    pub fn remove_note(&mut self, id: &str) -> Result<(), CoreError> {
        if !self.store.delete_note(id)? {
            return Err(not_found("note", id));
        }
        Ok(())
    }

    /// Dashboard aggregates over every subject and stored plan.
    pub fn dashboard(&self) -> Result<DashboardSummary, CoreError> {
        let subjects = self.store.subjects()?;
        let plans = self.store.timetables()?;
        Ok(DashboardSummary::build(&subjects, &plans))
    }
}

fn not_found(kind: &'static str, key: &str) -> CoreError {
    ValidationError::NotFound {
        kind,
        key: key.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::TimeRange;
    use crate::plan::BREAK_LABEL;
    use crate::profile::{Mood, Priority, Weakness};
    use crate::storage::MemoryStore;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    fn ready_planner() -> Planner<MemoryStore> {
        let mut planner = Planner::new(MemoryStore::new());
        planner
            .save_profile(&Profile::new(16).with_study_window(t("16:00"), t("19:00")))
            .unwrap();
        planner
            .add_subject(&Subject::new("math", "Math", Priority::High, Weakness::Weak, Mood::Dislike))
            .unwrap();
        planner
            .add_subject(
                &Subject::new("art", "Art", Priority::Low, Weakness::Strong, Mood::Like)
                    .with_color("#10b981"),
            )
            .unwrap();
        planner
    }

    #[test]
    fn generate_requires_profile_then_subjects() {
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        let mut planner = Planner::new(MemoryStore::new());
        let err = planner.generate_week(monday(), &mut rng).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::MissingProfile)));

        planner.save_profile(&Profile::new(16)).unwrap();
        let err = planner.generate_week(monday(), &mut rng).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::EmptyCollection(_))));
    }

    #[test]
    fn generated_week_is_stored() {
        let mut planner = ready_planner();
        let mut rng = Mcg128Xsl64::seed_from_u64(7);
        let week = planner.generate_week(monday(), &mut rng).unwrap();
        assert_eq!(week.len(), 7);
        assert_eq!(planner.load_week(monday()).unwrap(), week);
        // 16:00-19:00 with 45 minute slots and 10 minute breaks.
        assert!(week.iter().all(|d| d.slots.len() == 3));
    }

    #[test]
    fn regenerate_overwrites_dates() {
        let mut planner = ready_planner();
        planner.generate_week(monday(), &mut Mcg128Xsl64::seed_from_u64(1)).unwrap();
        let second = planner.generate_week(monday(), &mut Mcg128Xsl64::seed_from_u64(2)).unwrap();
        assert_eq!(planner.store().timetables().unwrap(), second);
    }

    #[test]
    fn edit_slot_to_subject_and_break() {
        let mut planner = ready_planner();
        planner.generate_week(monday(), &mut Mcg128Xsl64::seed_from_u64(1)).unwrap();

        let day = planner.edit_slot(monday(), 0, Some("art")).unwrap();
        assert_eq!(day.slots[0].subject_name, "Art");
        assert_eq!(day.slots[0].color, "#10b981");

        let day = planner.edit_slot(monday(), 1, None).unwrap();
        assert_eq!(day.slots[1].subject_name, BREAK_LABEL);
        assert!(day.slots[1].is_break());
        assert_eq!(planner.load_week(monday()).unwrap()[0], day);

        assert!(planner.edit_slot(monday(), 0, Some("nope")).is_err());
        assert!(planner.edit_slot(monday(), 99, None).is_err());
        assert!(planner.edit_slot(monday() - chrono::Days::new(1), 0, None).is_err());
    }

    #[test]
    fn mark_slot_done_persists() {
        let mut planner = ready_planner();
        planner.generate_week(monday(), &mut Mcg128Xsl64::seed_from_u64(1)).unwrap();
        planner.mark_slot(monday(), 2, SlotStatus::Done).unwrap();
        let stored = planner.store().timetable(monday()).unwrap().unwrap();
        assert_eq!(stored.slots[2].status, SlotStatus::Done);
        assert_eq!(stored.slots[0].status, SlotStatus::Pending);
    }

    #[test]
    fn retime_row_moves_every_day() {
        let mut planner = ready_planner();
        planner.generate_week(monday(), &mut Mcg128Xsl64::seed_from_u64(1)).unwrap();
        let week = planner.retime_row(monday(), 0, t("20:00")).unwrap();
        for day in &week {
            let last = day.slots.last().unwrap();
            assert_eq!(last.start_time, t("20:00"));
            assert_eq!(last.end_time, t("20:45"));
            assert_eq!(day.slots[0].start_time, t("16:55"));
        }
        assert_eq!(planner.load_week(monday()).unwrap(), week);

        assert!(planner.retime_row(monday(), 0, t("23:30")).is_err());
    }

    #[test]
    fn retime_row_onto_occupied_time_is_rejected() {
        let mut planner = ready_planner();
        let week = planner.generate_week(monday(), &mut Mcg128Xsl64::seed_from_u64(1)).unwrap();

        // Row 0 (16:00-16:45) moved to 17:00 would overlap 16:55-17:40.
        let err = planner.retime_row(monday(), 0, t("17:00")).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidValue { .. })));
        assert_eq!(planner.load_week(monday()).unwrap(), week);
    }

    #[test]
    fn overlapping_available_slots_are_rejected() {
        let mut planner = Planner::new(MemoryStore::new());
        let mut profile = Profile::new(16);
        profile.available_slots = vec![
            TimeRange::new(t("17:00"), t("19:00")),
            TimeRange::new(t("16:00"), t("18:00")),
        ];
        let err = planner.save_profile(&profile).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::InvalidValue { .. })));
        assert!(planner.profile().unwrap().is_none());

        // Back-to-back ranges are fine and plan without overlaps.
        profile.available_slots = vec![
            TimeRange::new(t("16:00"), t("17:00")),
            TimeRange::new(t("17:00"), t("18:00")),
        ];
        planner.save_profile(&profile).unwrap();
        planner
            .add_subject(&Subject::new("math", "Math", Priority::High, Weakness::Weak, Mood::Like))
            .unwrap();
        let week = planner.generate_week(monday(), &mut Mcg128Xsl64::seed_from_u64(1)).unwrap();
        assert!(week.iter().all(DayPlan::is_well_ordered));
        assert_eq!(week[0].slots.len(), 2);
    }

    #[test]
    fn remove_missing_records() {
        let mut planner = ready_planner();
        planner.remove_subject("art").unwrap();
        assert_eq!(planner.subjects().unwrap().len(), 1);
        assert!(planner.remove_subject("art").is_err());
        assert!(planner.remove_note("x").is_err());
    }

    #[test]
    fn blank_subject_name_rejected() {
        let mut planner = Planner::new(MemoryStore::new());
        let blank = Subject::new("x", "  ", Priority::High, Weakness::Weak, Mood::Like);
        assert!(planner.add_subject(&blank).is_err());
    }

    #[test]
    fn dashboard_counts_stored_week() {
        let mut planner = ready_planner();
        planner.generate_week(monday(), &mut Mcg128Xsl64::seed_from_u64(1)).unwrap();
        let summary = planner.dashboard().unwrap();
        assert_eq!(summary.subject_count, 2);
        assert_eq!(summary.planned_minutes, 7 * 3 * 45);
    }
}
