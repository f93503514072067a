use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::model::{Slot, TableId};

/// Per-date, per-half-hour-slot occupancy: date → slot → occupied tables.
///
/// Entries exist only for dates inside the currently loaded window; absence
/// of data reads as free, which is sound because the index is rebuilt for
/// exactly that window before it is queried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotIndex {
    days: HashMap<NaiveDate, HashMap<Slot, HashSet<TableId>>>,
}

impl SlotIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `table` occupied for every half-hour slot in
    /// `[start, start + duration_slots)`. The start slot is written once up
    /// front and again by the loop; the duplicate is a no-op under set
    /// semantics. Idempotent.
    pub fn mark_occupied(
        &mut self,
        date: NaiveDate,
        start: Slot,
        duration_slots: u16,
        table: TableId,
    ) {
        let day = self.days.entry(date).or_default();
        day.entry(start).or_default().insert(table);

        for offset in 0..duration_slots {
            day.entry(start.offset(offset)).or_default().insert(table);
        }
    }

    pub fn is_occupied(&self, date: NaiveDate, slot: Slot, table: TableId) -> bool {
        self.days
            .get(&date)
            .and_then(|day| day.get(&slot))
            .is_some_and(|tables| tables.contains(&table))
    }

    /// Tables occupied at that exact slot, sorted; empty when none.
    pub fn occupants_at(&self, date: NaiveDate, slot: Slot) -> Vec<TableId> {
        let mut occupants: Vec<TableId> = self
            .days
            .get(&date)
            .and_then(|day| day.get(&slot))
            .map(|tables| tables.iter().copied().collect())
            .unwrap_or_default();
        occupants.sort();
        occupants
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Number of dates carrying at least one entry.
    pub fn day_count(&self) -> usize {
        self.days.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn slot(hour: f64) -> Slot {
        Slot::from_hour_number(hour).unwrap()
    }

    #[test]
    fn marks_every_half_hour_of_the_duration() {
        let mut index = SlotIndex::new();
        index.mark_occupied(d("2026-08-07"), slot(12.0), 3, TableId(7));

        assert!(index.is_occupied(d("2026-08-07"), slot(12.0), TableId(7)));
        assert!(index.is_occupied(d("2026-08-07"), slot(12.5), TableId(7)));
        assert!(index.is_occupied(d("2026-08-07"), slot(13.0), TableId(7)));
        assert!(!index.is_occupied(d("2026-08-07"), slot(13.5), TableId(7)));
        assert!(!index.is_occupied(d("2026-08-07"), slot(11.5), TableId(7)));
    }

    #[test]
    fn absent_date_or_slot_reads_free() {
        let index = SlotIndex::new();
        assert!(!index.is_occupied(d("2026-08-07"), slot(12.0), TableId(1)));
        assert!(index.occupants_at(d("2026-08-07"), slot(12.0)).is_empty());

        let mut index = SlotIndex::new();
        index.mark_occupied(d("2026-08-07"), slot(12.0), 1, TableId(1));
        assert!(!index.is_occupied(d("2026-08-07"), slot(18.0), TableId(1)));
        assert!(!index.is_occupied(d("2026-08-08"), slot(12.0), TableId(1)));
    }

    #[test]
    fn duplicate_start_marker_is_a_no_op() {
        let mut index = SlotIndex::new();
        index.mark_occupied(d("2026-08-07"), slot(18.0), 4, TableId(5));
        assert_eq!(index.occupants_at(d("2026-08-07"), slot(18.0)), vec![TableId(5)]);
    }

    #[test]
    fn marking_is_idempotent() {
        let mut once = SlotIndex::new();
        once.mark_occupied(d("2026-08-07"), slot(18.0), 2, TableId(5));

        let mut twice = SlotIndex::new();
        twice.mark_occupied(d("2026-08-07"), slot(18.0), 2, TableId(5));
        twice.mark_occupied(d("2026-08-07"), slot(18.0), 2, TableId(5));

        assert_eq!(once, twice);
    }

    #[test]
    fn occupants_sorted_across_tables() {
        let mut index = SlotIndex::new();
        index.mark_occupied(d("2026-08-07"), slot(18.0), 1, TableId(9));
        index.mark_occupied(d("2026-08-07"), slot(18.0), 1, TableId(2));
        index.mark_occupied(d("2026-08-07"), slot(18.0), 1, TableId(5));

        assert_eq!(
            index.occupants_at(d("2026-08-07"), slot(18.0)),
            vec![TableId(2), TableId(5), TableId(9)]
        );
    }

    #[test]
    fn overlapping_reservations_share_a_slot() {
        let mut index = SlotIndex::new();
        index.mark_occupied(d("2026-08-07"), slot(18.0), 4, TableId(1));
        index.mark_occupied(d("2026-08-07"), slot(19.0), 2, TableId(2));

        assert_eq!(
            index.occupants_at(d("2026-08-07"), slot(19.5)),
            vec![TableId(1), TableId(2)]
        );
        assert_eq!(index.occupants_at(d("2026-08-07"), slot(18.0)), vec![TableId(1)]);
    }
}
