//! Day plans and the edits a timetable view can apply to them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::error::ValidationError;
use crate::profile::Subject;

/// Label used for slots the user turned into a break.
pub const BREAK_LABEL: &str = "Break";

/// Progress marker on a scheduled slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    #[default]
    Pending,
    Done,
}

/// One subject-labeled study block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSlot {
    /// `None` once the slot has been turned into a break.
    pub subject_id: Option<String>,
    pub subject_name: String,
    pub color: String,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    #[serde(default)]
    pub status: SlotStatus,
}

impl ScheduledSlot {
    pub fn duration_minutes(&self) -> u32 {
        self.start_time.minutes_until(self.end_time)
    }

    pub fn is_break(&self) -> bool {
        self.subject_id.is_none() && self.subject_name == BREAK_LABEL
    }
}

/// What a slot should be rewritten to.
#[derive(Debug, Clone, Copy)]
pub enum SlotAssignment<'a> {
    Subject(&'a Subject),
    Break,
}

/// All scheduled slots for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub date: NaiveDate,
    pub day_name: String,
    pub slots: Vec<ScheduledSlot>,
}

impl DayPlan {
    /// Build a plan for `date`, ordering `slots` by start time.
    pub fn new(date: NaiveDate, mut slots: Vec<ScheduledSlot>) -> Self {
        slots.sort_by_key(|s| s.start_time);
        Self {
            date,
            day_name: weekday_name(date),
            slots,
        }
    }

    /// Calendar-date key used by stores, `YYYY-MM-DD`.
    pub fn date_key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    fn slot_mut(&mut self, index: usize) -> Result<&mut ScheduledSlot, ValidationError> {
        let len = self.slots.len();
        let date = self.date;
        self.slots.get_mut(index).ok_or_else(|| ValidationError::OutOfBounds {
            collection: format!("slots of {date}"),
            index,
            len,
        })
    }

    /// Rewrite the subject of one slot, keeping its time.
    pub fn assign(
        &mut self,
        index: usize,
        assignment: SlotAssignment<'_>,
        default_color: &str,
    ) -> Result<(), ValidationError> {
        let slot = self.slot_mut(index)?;
        match assignment {
            SlotAssignment::Subject(subject) => {
                slot.subject_id = Some(subject.id.clone());
                slot.subject_name = subject.name.clone();
                slot.color = subject
                    .color
                    .clone()
                    .unwrap_or_else(|| default_color.to_string());
            }
            SlotAssignment::Break => {
                slot.subject_id = None;
                slot.subject_name = BREAK_LABEL.to_string();
            }
        }
        Ok(())
    }

    pub fn set_status(&mut self, index: usize, status: SlotStatus) -> Result<(), ValidationError> {
        self.slot_mut(index)?.status = status;
        Ok(())
    }

    /// Whether slots are ordered and pairwise non-overlapping.
    pub fn is_well_ordered(&self) -> bool {
        self.slots
            .windows(2)
            .all(|pair| pair[1].start_time >= pair[0].end_time)
    }

    pub fn study_minutes(&self) -> u32 {
        self.slots
            .iter()
            .filter(|s| !s.is_break())
            .map(ScheduledSlot::duration_minutes)
            .sum()
    }
}

/// Full English weekday name, e.g. `Monday`.
pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Move the slot at row `index` to `new_start` in every plan that has that
/// row, keeping each slot's duration, then re-sort each plan. The moved slot
/// may not overlap any other slot of its day.
///
/// Returns the number of plans changed.
pub fn retime_row(
    plans: &mut [DayPlan],
    index: usize,
    new_start: ClockTime,
) -> Result<usize, ValidationError> {
    // Validate every day first so a failure leaves all plans untouched.
    let mut updates = Vec::with_capacity(plans.len());
    for (day, plan) in plans.iter().enumerate() {
        let Some(slot) = plan.slots.get(index) else {
            continue;
        };
        let new_end = new_start
            .checked_add_minutes(slot.duration_minutes())
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "start_time".into(),
                message: format!(
                    "a {}-minute slot starting at {new_start} runs past midnight",
                    slot.duration_minutes()
                ),
            })?;
        let clash = plan
            .slots
            .iter()
            .enumerate()
            .find(|&(i, other)| i != index && new_start < other.end_time && other.start_time < new_end);
        if let Some((_, other)) = clash {
            return Err(ValidationError::InvalidValue {
                field: "start_time".into(),
                message: format!(
                    "{new_start} - {new_end} overlaps {} ({} - {}) on {}",
                    other.subject_name, other.start_time, other.end_time, plan.date
                ),
            });
        }
        updates.push((day, new_end));
    }

    if updates.is_empty() {
        return Err(ValidationError::OutOfBounds {
            collection: "timetable rows".into(),
            index,
            len: plans.iter().map(|p| p.slots.len()).max().unwrap_or(0),
        });
    }

    for &(day, new_end) in &updates {
        let plan = &mut plans[day];
        plan.slots[index].start_time = new_start;
        plan.slots[index].end_time = new_end;
        plan.slots.sort_by_key(|s| s.start_time);
    }
    Ok(updates.len())
}
