use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, warn};

use crate::api::RecordSource;
use crate::model::{duration_slots, Occurrence, RawRecord, ReservationRecord, Slot, VisibleWindow};

use super::error::BookingError;
use super::index::SlotIndex;

/// Validate a wire record against the ingestion rules and the window.
pub fn validate(raw: &RawRecord, window: &VisibleWindow) -> Result<ReservationRecord, BookingError> {
    let start = Slot::parse_hhmm(&raw.hour)
        .ok_or_else(|| BookingError::InvalidHour(raw.hour.clone()))?;
    let duration_slots =
        duration_slots(raw.duration).ok_or(BookingError::InvalidDuration(raw.duration))?;

    let occurrence = match &raw.repeat {
        None | Some(serde_json::Value::Null) | Some(serde_json::Value::Bool(false)) => {
            let date = raw.date.ok_or(BookingError::MissingDate)?;
            if !window.contains(date) {
                return Err(BookingError::OutsideWindow(date));
            }
            Occurrence::On(date)
        }
        Some(serde_json::Value::String(tag)) if tag == "daily" => Occurrence::Daily,
        Some(other) => return Err(BookingError::UnknownRecurrence(other.to_string())),
    };

    Ok(ReservationRecord {
        occurrence,
        start,
        duration_slots,
        table: raw.table,
    })
}

/// Apply one record stream to the index. Rejected records are logged,
/// counted and skipped; the build continues.
pub fn populate(index: &mut SlotIndex, records: &[RawRecord], window: &VisibleWindow) {
    for raw in records {
        match validate(raw, window) {
            Ok(record) => apply(index, &record, window),
            Err(e) => {
                warn!("rejected record for table {}: {e}", raw.table);
                metrics::counter!(crate::observability::RECORDS_REJECTED_TOTAL).increment(1);
            }
        }
    }
}

fn apply(index: &mut SlotIndex, record: &ReservationRecord, window: &VisibleWindow) {
    match record.occurrence {
        Occurrence::On(date) => {
            index.mark_occupied(date, record.start, record.duration_slots, record.table);
        }
        Occurrence::Daily => {
            for day in window.days() {
                index.mark_occupied(day, record.start, record.duration_slots, record.table);
            }
        }
    }
}

/// Fetch all three streams concurrently and expand them into a fresh index.
/// Any fetch failure aborts the whole build; no partial index escapes.
pub async fn load_index(
    source: &dyn RecordSource,
    window: &VisibleWindow,
) -> Result<SlotIndex, BookingError> {
    let (bookings, events_current, events_repeat) = futures::try_join!(
        source.bookings(window),
        source.events_current(window),
        source.events_repeat(window),
    )
    .map_err(BookingError::Fetch)?;

    let mut index = SlotIndex::new();
    populate(&mut index, &bookings, window);
    populate(&mut index, &events_current, window);
    populate(&mut index, &events_repeat, window);
    Ok(index)
}

/// Owns the shared slot index and rebuilds it from the record streams.
///
/// The index is swapped atomically as a whole: readers never observe a
/// half-applied build, and a failed build leaves the previous index in
/// effect. A generation counter closes the overlapping-build race: a
/// completed build is dropped when a newer one has started since.
pub struct AvailabilityBuilder {
    index: RwLock<SlotIndex>,
    generation: AtomicU64,
}

impl Default for AvailabilityBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityBuilder {
    pub fn new() -> Self {
        Self {
            index: RwLock::new(SlotIndex::new()),
            generation: AtomicU64::new(0),
        }
    }

    pub async fn index(&self) -> RwLockReadGuard<'_, SlotIndex> {
        self.index.read().await
    }

    /// Write access for the controller's optimistic insert.
    pub async fn index_mut(&self) -> RwLockWriteGuard<'_, SlotIndex> {
        self.index.write().await
    }

    /// Rebuild from scratch for the given window. Returns `Ok(true)` when
    /// the fresh index was installed, `Ok(false)` when it was discarded as
    /// stale.
    pub async fn rebuild(
        &self,
        source: &dyn RecordSource,
        window: &VisibleWindow,
    ) -> Result<bool, BookingError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        metrics::counter!(crate::observability::BUILDS_TOTAL).increment(1);

        let fresh = match load_index(source, window).await {
            Ok(index) => index,
            Err(e) => {
                metrics::counter!(crate::observability::BUILD_FAILURES_TOTAL).increment(1);
                return Err(e);
            }
        };

        let mut guard = self.index.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            metrics::counter!(crate::observability::BUILDS_DISCARDED_TOTAL).increment(1);
            debug!("discarding stale availability build {generation}");
            return Ok(false);
        }
        *guard = fresh;
        debug!(
            "availability build {generation} installed, {} dates",
            guard.day_count()
        );
        Ok(true)
    }
}
