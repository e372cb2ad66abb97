//! Student profile and subject records.

use serde::{Deserialize, Serialize};

use crate::clock::{ClockTime, TimeRange};

/// Daily schedule profile of the student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub age: u32,
    #[serde(default)]
    pub school_start: Option<ClockTime>,
    #[serde(default)]
    pub school_end: Option<ClockTime>,
    #[serde(default)]
    pub study_start: Option<ClockTime>,
    #[serde(default)]
    pub study_end: Option<ClockTime>,
    /// Explicit free-time windows, used verbatim when no study window is set.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available_slots: Vec<TimeRange>,
}

impl Profile {
    pub fn new(age: u32) -> Self {
        Self {
            age,
            ..Self::default()
        }
    }

    pub fn with_school_hours(mut self, start: ClockTime, end: ClockTime) -> Self {
        self.school_start = Some(start);
        self.school_end = Some(end);
        self
    }

    pub fn with_study_window(mut self, start: ClockTime, end: ClockTime) -> Self {
        self.study_start = Some(start);
        self.study_end = Some(end);
        self
    }

    /// Length of every study slot for this profile's age.
    pub fn slot_duration(&self) -> u32 {
        slot_duration(self.age)
    }
}

/// Age-tiered slot length in minutes: 30 under 14, 45 up to 18, 60 above.
pub fn slot_duration(age: u32) -> u32 {
    if age < 14 {
        30
    } else if age <= 18 {
        45
    } else {
        60
    }
}

/// How important the subject is to the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
    /// Unrecognized value, scored like `Low`.
    #[serde(other)]
    Other,
}

/// Self-assessed proficiency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weakness {
    Strong,
    Weak,
    #[serde(other)]
    Other,
}

/// How the student feels about the subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Like,
    Neutral,
    Dislike,
    #[serde(other)]
    Other,
}

macro_rules! impl_label {
    ($ty:ty { $($variant:ident => $label:literal),* $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)*
                }
            }
        }

        impl std::str::FromStr for $ty {
            type Err = std::convert::Infallible;

            /// Case-insensitive; unknown labels map to `Other`.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $(
                    if s.trim().eq_ignore_ascii_case($label) {
                        return Ok(Self::$variant);
                    }
                )*
                Ok(Self::Other)
            }
        }
    };
}

impl_label!(Priority { High => "High", Medium => "Medium", Low => "Low", Other => "Other" });
impl_label!(Weakness { Strong => "Strong", Weak => "Weak", Other => "Other" });
impl_label!(Mood { Like => "Like", Neutral => "Neutral", Dislike => "Dislike", Other => "Other" });

/// A subject the student wants time allocated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub priority: Priority,
    pub weakness: Weakness,
    pub mood: Mood,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Subject {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        priority: Priority,
        weakness: Weakness,
        mood: Mood,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            priority,
            weakness,
            mood,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}
