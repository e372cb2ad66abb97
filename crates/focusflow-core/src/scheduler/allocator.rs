//! Weighted, shuffled assignment of subjects to fixed-length slots.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::clock::TimeRange;
use crate::plan::{ScheduledSlot, SlotStatus};
use crate::profile::Subject;

use super::weighting::Weighting;

/// Multiset of subject references, one entry per unit of weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionPool<'a> {
    entries: Vec<&'a Subject>,
}

impl<'a> DistributionPool<'a> {
    /// Heaviest subjects first; ties keep input order.
    pub fn build(weighting: &Weighting<'a>) -> Self {
        let mut weighted = weighting.subjects.clone();
        weighted.sort_by(|a, b| b.weight.cmp(&a.weight));

        let mut entries = Vec::with_capacity(weighting.total_weight as usize);
        for w in &weighted {
            entries.extend(std::iter::repeat(w.subject).take(w.weight as usize));
        }
        Self { entries }
    }

    /// Uniform Fisher-Yates permutation. Adjacent duplicates may remain.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.entries.shuffle(rng);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, wrapping around the pool.
    pub fn cycled(&self, index: usize) -> Option<&'a Subject> {
        if self.entries.is_empty() {
            return None;
        }
        Some(self.entries[index % self.entries.len()])
    }

    /// How many entries belong to `subject_id`.
    pub fn count_of(&self, subject_id: &str) -> usize {
        self.entries.iter().filter(|s| s.id == subject_id).count()
    }

    pub fn entries(&self) -> &[&'a Subject] {
        &self.entries
    }
}

/// Walks availability windows and fills them with study slots.
#[derive(Debug, Clone)]
pub struct SlotAllocator<'c> {
    slot_minutes: u32,
    break_minutes: u32,
    default_color: &'c str,
}

impl<'c> SlotAllocator<'c> {
    pub fn new(slot_minutes: u32, break_minutes: u32, default_color: &'c str) -> Self {
        Self {
            slot_minutes,
            break_minutes,
            default_color,
        }
    }

    /// Fill `windows` in order, drawing subjects from `pool` cyclically.
    ///
    /// A break follows each slot only when the time after it is still inside
    /// the window. With the default 10 minute break a skipped break also
    /// means no further slot fits; a longer configured break can leave room
    /// for one more slot, which then starts immediately.
    pub fn allocate(&self, windows: &[TimeRange], pool: &DistributionPool<'_>) -> Vec<ScheduledSlot> {
        let mut slots = Vec::new();
        if self.slot_minutes == 0 {
            return slots;
        }

        let mut pool_index = 0usize;
        for window in windows {
            let before = slots.len();
            let mut current = window.start;

            while let Some(slot_end) = current
                .checked_add_minutes(self.slot_minutes)
                .filter(|end| *end <= window.end)
            {
                let Some(subject) = pool.cycled(pool_index) else {
                    break;
                };

                slots.push(ScheduledSlot {
                    subject_id: Some(subject.id.clone()),
                    subject_name: subject.name.clone(),
                    color: subject
                        .color
                        .clone()
                        .unwrap_or_else(|| self.default_color.to_string()),
                    start_time: current,
                    end_time: slot_end,
                    status: SlotStatus::Pending,
                });

                current = slot_end;
                if let Some(after_break) = current
                    .checked_add_minutes(self.break_minutes)
                    .filter(|t| *t < window.end)
                {
                    current = after_break;
                }
                pool_index += 1;
            }

            tracing::debug!(
                window_start = %window.start,
                window_end = %window.end,
                slots = slots.len() - before,
                "filled availability window"
            );
        }
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ClockTime;
    use crate::profile::{Mood, Priority, Weakness};
    use crate::scheduler::weighting::weigh_subjects;
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn range(start: &str, end: &str) -> TimeRange {
        TimeRange::new(t(start), t(end))
    }

    fn subjects() -> Vec<Subject> {
        vec![
            Subject::new("math", "Math", Priority::High, Weakness::Weak, Mood::Dislike),
            Subject::new("art", "Art", Priority::Low, Weakness::Strong, Mood::Like)
                .with_color("#10b981"),
        ]
    }

    #[test]
    fn pool_size_follows_weights() {
        let subjects = subjects();
        let weighting = weigh_subjects(&subjects);
        let pool = DistributionPool::build(&weighting);
        assert_eq!(pool.len(), 8);
        assert_eq!(pool.count_of("math"), 6);
        assert_eq!(pool.count_of("art"), 2);
        // Heaviest first before shuffling.
        assert_eq!(pool.entries()[0].id, "math");
        assert_eq!(pool.entries()[7].id, "art");
    }

    #[test]
    fn shuffle_is_a_permutation_and_reproducible() {
        let subjects = subjects();
        let weighting = weigh_subjects(&subjects);

        let mut a = DistributionPool::build(&weighting);
        let mut b = DistributionPool::build(&weighting);
        a.shuffle(&mut Mcg128Xsl64::seed_from_u64(7));
        b.shuffle(&mut Mcg128Xsl64::seed_from_u64(7));

        assert_eq!(a, b);
        assert_eq!(a.count_of("math"), 6);
        assert_eq!(a.count_of("art"), 2);
    }

    #[test]
    fn empty_pool_yields_no_slots() {
        let weighting = weigh_subjects(&[]);
        let pool = DistributionPool::build(&weighting);
        assert!(pool.cycled(3).is_none());
        let slots = SlotAllocator::new(30, 10, "#3b82f6").allocate(&[range("09:00", "12:00")], &pool);
        assert!(slots.is_empty());
    }

    #[test]
    fn slots_are_separated_by_breaks() {
        let subjects = subjects();
        let pool = DistributionPool::build(&weigh_subjects(&subjects));
        let slots = SlotAllocator::new(45, 10, "#3b82f6").allocate(&[range("16:00", "18:00")], &pool);

        let times: Vec<_> = slots
            .iter()
            .map(|s| (s.start_time.to_24h_string(), s.end_time.to_24h_string()))
            .collect();
        assert_eq!(
            times,
            vec![
                ("16:00".to_string(), "16:45".to_string()),
                ("16:55".to_string(), "17:40".to_string()),
            ]
        );
        assert!(slots.iter().all(|s| s.status == SlotStatus::Pending));
    }

    #[test]
    fn last_slot_may_end_exactly_at_window_end() {
        let subjects = subjects();
        let pool = DistributionPool::build(&weigh_subjects(&subjects));
        // 30 + 10 + 30 = 70 minutes fills the window exactly.
        let slots = SlotAllocator::new(30, 10, "#3b82f6").allocate(&[range("09:00", "10:10")], &pool);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].start_time, t("09:40"));
        assert_eq!(slots[1].end_time, t("10:10"));
    }

    #[test]
    fn skipped_break_never_hides_a_fitting_slot() {
        let subjects = subjects();
        let pool = DistributionPool::build(&weigh_subjects(&subjects));
        let allocator = SlotAllocator::new(30, 10, "#3b82f6");
        // Room after the first slot ranges from 0 to 39 minutes: never a second slot.
        for extra in 0..40 {
            let end = t("09:30").checked_add_minutes(extra).unwrap();
            let window = TimeRange::new(t("09:00"), end);
            assert_eq!(allocator.allocate(&[window], &pool).len(), 1, "extra={extra}");
        }
        let window = TimeRange::new(t("09:00"), t("10:10"));
        assert_eq!(allocator.allocate(&[window], &pool).len(), 2);
    }

    #[test]
    fn window_shorter_than_slot_is_empty() {
        let subjects = subjects();
        let pool = DistributionPool::build(&weigh_subjects(&subjects));
        let slots = SlotAllocator::new(60, 10, "#3b82f6").allocate(&[range("09:00", "09:59")], &pool);
        assert!(slots.is_empty());
    }

    #[test]
    fn pool_cycles_across_windows() {
        let subjects = vec![Subject::new("solo", "Solo", Priority::Low, Weakness::Strong, Mood::Like)];
        let pool = DistributionPool::build(&weigh_subjects(&subjects));
        assert_eq!(pool.len(), 2);
        let slots = SlotAllocator::new(30, 10, "#abcdef")
            .allocate(&[range("06:00", "08:00"), range("16:00", "18:00")], &pool);
        assert_eq!(slots.len(), 6);
        assert!(slots.iter().all(|s| s.subject_id.as_deref() == Some("solo")));
        assert!(slots.iter().all(|s| s.color == "#abcdef"));
        assert_eq!(slots[3].start_time, t("16:00"));
    }

    #[test]
    fn window_ending_at_last_minute_of_day() {
        let subjects = subjects();
        let pool = DistributionPool::build(&weigh_subjects(&subjects));
        let slots = SlotAllocator::new(60, 10, "#3b82f6")
            .allocate(&[TimeRange::new(t("22:00"), ClockTime::END_OF_DAY)], &pool);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].end_time, t("23:00"));
    }
}
