//! Aggregates for dashboard charts.
//!
//! Charts only need `{label, value, color}` rows; drawing is up to the host.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::plan::DayPlan;
use crate::profile::{Priority, Subject, Weakness};

const RED: &str = "#ef4444";
const AMBER: &str = "#f59e0b";
const EMERALD: &str = "#10b981";
const BLUE: &str = "#3b82f6";

/// One bar or pie slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDatum {
    pub label: String,
    pub value: u32,
    pub color: String,
}

impl ChartDatum {
    fn new(label: impl Into<String>, value: u32, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
            color: color.into(),
        }
    }
}

fn count<F: Fn(&Subject) -> bool>(subjects: &[Subject], pred: F) -> u32 {
    subjects.iter().filter(|s| pred(s)).count() as u32
}

/// Subject counts per priority. Unrecognized priorities are not counted.
pub fn priority_mix(subjects: &[Subject]) -> Vec<ChartDatum> {
    vec![
        ChartDatum::new("High", count(subjects, |s| s.priority == Priority::High), RED),
        ChartDatum::new("Med", count(subjects, |s| s.priority == Priority::Medium), AMBER),
        ChartDatum::new("Low", count(subjects, |s| s.priority == Priority::Low), EMERALD),
    ]
}

/// Weak versus strong subject counts.
pub fn weakness_mix(subjects: &[Subject]) -> Vec<ChartDatum> {
    vec![
        ChartDatum::new("Weak", count(subjects, |s| s.weakness == Weakness::Weak), RED),
        ChartDatum::new("Strong", count(subjects, |s| s.weakness == Weakness::Strong), BLUE),
    ]
}

/// Planned minutes per subject across `plans`, largest first.
///
/// Break slots are skipped. Subjects are keyed by name so edited slots
/// group with generated ones.
pub fn study_load(plans: &[DayPlan]) -> Vec<ChartDatum> {
    let mut totals: HashMap<&str, (u32, &str)> = HashMap::new();
    for slot in plans.iter().flat_map(|p| &p.slots).filter(|s| !s.is_break()) {
        let entry = totals
            .entry(slot.subject_name.as_str())
            .or_insert((0, slot.color.as_str()));
        entry.0 += slot.duration_minutes();
    }

    let mut load: Vec<_> = totals
        .into_iter()
        .map(|(name, (minutes, color))| ChartDatum::new(name, minutes, color))
        .collect();
    load.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.label.cmp(&b.label)));
    load
}

/// Everything the dashboard shows at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub subject_count: usize,
    pub priority_mix: Vec<ChartDatum>,
    pub weakness_mix: Vec<ChartDatum>,
    pub study_load: Vec<ChartDatum>,
    pub planned_minutes: u32,
}

impl DashboardSummary {
    pub fn build(subjects: &[Subject], plans: &[DayPlan]) -> Self {
        Self {
            subject_count: subjects.len(),
            priority_mix: priority_mix(subjects),
            weakness_mix: weakness_mix(subjects),
            study_load: study_load(plans),
            planned_minutes: plans.iter().map(DayPlan::study_minutes).sum(),
        }
    }
}
