//! Subject weighting from priority, weakness and mood.

use crate::profile::{Mood, Priority, Subject, Weakness};

impl Priority {
    pub fn score(&self) -> u32 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low | Priority::Other => 1,
        }
    }
}

impl Weakness {
    pub fn score(&self) -> u32 {
        match self {
            Weakness::Weak => 2,
            Weakness::Strong | Weakness::Other => 1,
        }
    }
}

impl Mood {
    /// Disliked subjects get an extra share so they are not neglected.
    pub fn bonus(&self) -> u32 {
        match self {
            Mood::Dislike => 1,
            Mood::Like | Mood::Neutral | Mood::Other => 0,
        }
    }
}

/// Integer weight of a subject: priority + weakness + mood bonus.
pub fn subject_weight(subject: &Subject) -> u32 {
    subject.priority.score() + subject.weakness.score() + subject.mood.bonus()
}

/// A subject paired with its computed weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedSubject<'a> {
    pub subject: &'a Subject,
    pub weight: u32,
}

/// Weighted view over a subject list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Weighting<'a> {
    pub subjects: Vec<WeightedSubject<'a>>,
    pub total_weight: u32,
}

impl<'a> Weighting<'a> {
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    pub fn weight_of(&self, subject_id: &str) -> Option<u32> {
        self.subjects
            .iter()
            .find(|w| w.subject.id == subject_id)
            .map(|w| w.weight)
    }
}

/// Weigh every subject, preserving input order.
pub fn weigh_subjects(subjects: &[Subject]) -> Weighting<'_> {
    let subjects: Vec<_> = subjects
        .iter()
        .map(|subject| WeightedSubject {
            subject,
            weight: subject_weight(subject),
        })
        .collect();
    let total_weight = subjects.iter().map(|w| w.weight).sum();
    Weighting {
        subjects,
        total_weight,
    }
}
