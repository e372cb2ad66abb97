//! SQLite-backed planner storage.
//!
//! Holds the profile, subjects, generated day plans and notes in
//! `<data_dir>/focusflow.db`.

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{data_dir, PlannerStore};
use crate::error::{CoreError, DatabaseError};
use crate::note::Note;
use crate::plan::{DayPlan, ScheduledSlot};
use crate::profile::{Mood, Priority, Profile, Subject, Weakness};

const PROFILE_KEY: &str = "user_profile";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// SQLite database for planner records.
pub struct PlannerDb {
    conn: Connection,
}

impl PlannerDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `<data_dir>/focusflow.db`.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("focusflow.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (or create) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS profile (
                id    TEXT PRIMARY KEY,
                data  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS subjects (
                id        TEXT PRIMARY KEY,
                name      TEXT NOT NULL,
                priority  TEXT NOT NULL,
                weakness  TEXT NOT NULL,
                mood      TEXT NOT NULL,
                color     TEXT
            );

            CREATE TABLE IF NOT EXISTS timetables (
                date      TEXT PRIMARY KEY,
                day_name  TEXT NOT NULL,
                slots     TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS notes (
                id          TEXT PRIMARY KEY,
                title       TEXT NOT NULL DEFAULT '',
                content     TEXT NOT NULL DEFAULT '',
                timestamp   TEXT NOT NULL,
                subject_id  TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_notes_timestamp ON notes(timestamp);",
        )
    }
}

fn corrupt(table: &'static str, key: &str, err: impl std::fmt::Display) -> DatabaseError {
    DatabaseError::Corrupt {
        table,
        key: key.to_string(),
        message: err.to_string(),
    }
}

fn decode_plan(date: String, day_name: String, slots: String) -> Result<DayPlan, DatabaseError> {
    let parsed_date = NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|e| corrupt("timetables", &date, e))?;
    let slots: Vec<ScheduledSlot> = serde_json::from_str(&slots).map_err(|e| corrupt("timetables", &date, e))?;
    Ok(DayPlan {
        date: parsed_date,
        day_name,
        slots,
    })
}

impl PlannerStore for PlannerDb {
    fn profile(&self) -> Result<Option<Profile>, DatabaseError> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT data FROM profile WHERE id = ?1",
                params![PROFILE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        data.map(|json| serde_json::from_str(&json).map_err(|e| corrupt("profile", PROFILE_KEY, e)))
            .transpose()
    }

    fn save_profile(&mut self, profile: &Profile) -> Result<(), DatabaseError> {
        let json = serde_json::to_string(profile).map_err(|e| corrupt("profile", PROFILE_KEY, e))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO profile (id, data) VALUES (?1, ?2)",
            params![PROFILE_KEY, json],
        )?;
        Ok(())
    }

    fn subjects(&self) -> Result<Vec<Subject>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, priority, weakness, mood, color FROM subjects ORDER BY rowid",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
            ))
        })?;

        let mut subjects = Vec::new();
        for row in rows {
            let (id, name, priority, weakness, mood, color) = row?;
            subjects.push(Subject {
                id,
                name,
                priority: priority.parse().unwrap_or(Priority::Other),
                weakness: weakness.parse().unwrap_or(Weakness::Other),
                mood: mood.parse().unwrap_or(Mood::Other),
                color,
            });
        }
        Ok(subjects)
    }

    fn save_subject(&mut self, subject: &Subject) -> Result<(), DatabaseError> {
        // ON CONFLICT keeps the original rowid, so ordering survives edits.
        self.conn.execute(
            "INSERT INTO subjects (id, name, priority, weakness, mood, color)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                priority = excluded.priority,
                weakness = excluded.weakness,
                mood = excluded.mood,
                color = excluded.color",
            params![
                subject.id,
                subject.name,
                subject.priority.as_str(),
                subject.weakness.as_str(),
                subject.mood.as_str(),
                subject.color,
            ],
        )?;
        Ok(())
    }

    fn delete_subject(&mut self, id: &str) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute("DELETE FROM subjects WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }

    fn timetable(&self, date: NaiveDate) -> Result<Option<DayPlan>, DatabaseError> {
        let key = date.format(DATE_FORMAT).to_string();
        let row = self
            .conn
            .query_row(
                "SELECT date, day_name, slots FROM timetables WHERE date = ?1",
                params![key],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)),
            )
            .optional()?;
        row.map(|(date, day_name, slots)| decode_plan(date, day_name, slots))
            .transpose()
    }

    fn save_timetable(&mut self, plan: &DayPlan) -> Result<(), DatabaseError> {
        let key = plan.date_key();
        let slots = serde_json::to_string(&plan.slots).map_err(|e| corrupt("timetables", &key, e))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO timetables (date, day_name, slots) VALUES (?1, ?2, ?3)",
            params![key, plan.day_name, slots],
        )?;
        Ok(())
    }

    fn timetables(&self) -> Result<Vec<DayPlan>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT date, day_name, slots FROM timetables ORDER BY date")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?))
        })?;

        let mut plans = Vec::new();
        for row in rows {
            let (date, day_name, slots) = row?;
            plans.push(decode_plan(date, day_name, slots)?);
        }
        Ok(plans)
    }

    fn notes(&self) -> Result<Vec<Note>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, content, timestamp, subject_id FROM notes
             ORDER BY timestamp DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;

        let mut notes = Vec::new();
        for row in rows {
            let (id, title, content, timestamp, subject_id) = row?;
            let timestamp = DateTime::parse_from_rfc3339(&timestamp)
                .map_err(|e| corrupt("notes", &id, e))?
                .with_timezone(&Utc);
            notes.push(Note {
                id,
                title,
                content,
                timestamp,
                subject_id,
            });
        }
        Ok(notes)
    }

    fn save_note(&mut self, note: &Note) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO notes (id, title, content, timestamp, subject_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                note.id,
                note.title,
                note.content,
                // Fixed width so text order matches time order.
                note.timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true),
                note.subject_id,
            ],
        )?;
        Ok(())
    }

    fn delete_note(&mut self, id: &str) -> Result<bool, DatabaseError> {
        let changed = self.conn.execute("DELETE FROM notes WHERE id = ?1", params![id])?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockTime;
    use crate::plan::SlotStatus;
    use chrono::Duration;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn sample_plan() -> DayPlan {
        DayPlan::new(
            NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            vec![ScheduledSlot {
                subject_id: Some("math".into()),
                subject_name: "Math".into(),
                color: "#3b82f6".into(),
                start_time: t("16:00"),
                end_time: t("16:45"),
                status: SlotStatus::Pending,
            }],
        )
    }

    #[test]
    fn profile_is_a_singleton() {
        let mut db = PlannerDb::open_memory().unwrap();
        assert!(db.profile().unwrap().is_none());

        db.save_profile(&Profile::new(15)).unwrap();
        db.save_profile(&Profile::new(16).with_study_window(t("18:00"), t("21:00"))).unwrap();

        let profile = db.profile().unwrap().unwrap();
        assert_eq!(profile.age, 16);
        assert_eq!(profile.study_start, Some(t("18:00")));
        let rows: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM profile", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn subjects_upsert_keeps_order() {
        let mut db = PlannerDb::open_memory().unwrap();
        let math = Subject::new("1", "Math", Priority::High, Weakness::Weak, Mood::Dislike);
        let art = Subject::new("2", "Art", Priority::Low, Weakness::Strong, Mood::Like).with_color("#10b981");
        db.save_subject(&math).unwrap();
        db.save_subject(&art).unwrap();

        let renamed = Subject {
            name: "Mathematics".into(),
            ..math
        };
        db.save_subject(&renamed).unwrap();

        let subjects = db.subjects().unwrap();
        assert_eq!(subjects, vec![renamed, art]);

        assert!(db.delete_subject("1").unwrap());
        assert!(!db.delete_subject("1").unwrap());
        assert_eq!(db.subjects().unwrap().len(), 1);
    }

    #[test]
    fn timetable_roundtrip_by_date() {
        let mut db = PlannerDb::open_memory().unwrap();
        let plan = sample_plan();
        db.save_timetable(&plan).unwrap();

        assert_eq!(db.timetable(plan.date).unwrap(), Some(plan.clone()));
        assert!(db.timetable(plan.date.succ_opt().unwrap()).unwrap().is_none());
        assert_eq!(db.timetables().unwrap(), vec![plan]);
    }

    #[test]
    fn notes_newest_first() {
        let mut db = PlannerDb::open_memory().unwrap();
        let mut older = Note::new("a", "Old", "first").unwrap();
        older.timestamp -= Duration::hours(1);
        let newer = Note::new("b", "New", "second").unwrap().for_subject("1");
        db.save_note(&older).unwrap();
        db.save_note(&newer).unwrap();

        let notes = db.notes().unwrap();
        assert_eq!(notes, vec![newer, older]);

        assert!(db.delete_note("a").unwrap());
        assert_eq!(db.notes().unwrap().len(), 1);
    }

    #[test]
    fn corrupt_timetable_is_reported() {
        let db = PlannerDb::open_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO timetables (date, day_name, slots) VALUES ('2024-03-04', 'Monday', 'not json')",
                [],
            )
            .unwrap();
        let err = db.timetables().unwrap_err();
        assert!(matches!(err, DatabaseError::Corrupt { table: "timetables", .. }));
    }

    #[test]
    fn file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planner.db");
        {
            let mut db = PlannerDb::open_at(&path).unwrap();
            db.save_timetable(&sample_plan()).unwrap();
        }
        let db = PlannerDb::open_at(&path).unwrap();
        assert_eq!(db.timetables().unwrap(), vec![sample_plan()]);
    }
}
