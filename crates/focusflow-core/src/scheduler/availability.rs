//! Free-time window detection from a student profile.

use crate::clock::{ClockTime, TimeRange};
use crate::profile::Profile;

use super::SchedulerConfig;

/// Find the windows in which study slots may be placed.
///
/// Resolution order, first match wins:
/// 1. An explicit study window. A window that crosses midnight is split into
///    an evening part ending at 23:59 and a morning part starting at 00:00.
/// 2. The profile's explicit available slots, verbatim.
/// 3. The free time around school hours inside the configured day envelope.
pub fn availability_windows(
    profile: &Profile,
    slot_minutes: u32,
    config: &SchedulerConfig,
) -> Vec<TimeRange> {
    if let Some(windows) = study_window(profile, slot_minutes) {
        return windows;
    }

    if !profile.available_slots.is_empty() {
        return profile.available_slots.clone();
    }

    school_day_windows(profile, slot_minutes, config)
}

fn study_window(profile: &Profile, slot_minutes: u32) -> Option<Vec<TimeRange>> {
    let (start, end) = (profile.study_start?, profile.study_end?);

    if end.minutes() > start.minutes() + slot_minutes {
        return Some(vec![TimeRange::new(start, end)]);
    }

    if start > end {
        let windows = [
            TimeRange::new(start, ClockTime::END_OF_DAY),
            TimeRange::new(ClockTime::MIDNIGHT, end),
        ]
        .into_iter()
        .filter(|w| w.can_fit(slot_minutes))
        .collect();
        return Some(windows);
    }

    // Window is shorter than one slot (or empty): let the next rule decide.
    None
}

fn school_day_windows(profile: &Profile, slot_minutes: u32, config: &SchedulerConfig) -> Vec<TimeRange> {
    let school_start = profile.school_start.unwrap_or(config.default_school_start);
    let school_end = profile.school_end.unwrap_or(config.default_school_end);

    let mut windows = Vec::with_capacity(2);

    let morning = TimeRange::new(config.day_start, school_start);
    if morning.can_fit(slot_minutes) {
        windows.push(morning);
    }

    if let Some(after_school) = school_end.checked_add_minutes(config.post_school_buffer_minutes) {
        let evening = TimeRange::new(after_school, config.day_end);
        if evening.can_fit(slot_minutes) {
            windows.push(evening);
        }
    }

    windows
}
