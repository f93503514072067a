use chrono::NaiveDate;
use tracing::{info, warn};
use ulid::Ulid;

use crate::api::ReservationGateway;
use crate::config::OpeningHours;
use crate::model::{duration_slots, GuestDetails, Reservation, Slot, TableId};

use super::builder::AvailabilityBuilder;
use super::error::BookingError;
use super::index::SlotIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Free,
    Booked,
    Selected,
}

/// A table element as the core sees it: a typed identifier plus the two
/// mutually exclusive visual markers.
pub trait TableView {
    fn table_id(&self) -> TableId;
    fn set_booked(&mut self, booked: bool);
    fn set_selected(&mut self, selected: bool);
}

/// Tracks the single currently selected table and performs the optimistic
/// local reservation on submit. At most one table is selected at a time.
#[derive(Debug, Default)]
pub struct ReservationController {
    selected: Option<TableId>,
}

impl ReservationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_table(&self) -> Option<TableId> {
        self.selected
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn status_of(
        &self,
        index: &SlotIndex,
        date: NaiveDate,
        slot: Slot,
        table: TableId,
    ) -> TableStatus {
        if index.is_occupied(date, slot, table) {
            TableStatus::Booked
        } else if self.selected == Some(table) {
            TableStatus::Selected
        } else {
            TableStatus::Free
        }
    }

    /// Re-evaluate every table against the index for the current query
    /// context. Selection survives only while its table is not booked.
    pub fn refresh<V: TableView>(
        &mut self,
        index: &SlotIndex,
        date: NaiveDate,
        slot: Slot,
        views: &mut [V],
    ) {
        if let Some(selected) = self.selected
            && index.is_occupied(date, slot, selected)
        {
            self.selected = None;
        }

        for view in views {
            let booked = index.is_occupied(date, slot, view.table_id());
            view.set_booked(booked);
            view.set_selected(!booked && self.selected == Some(view.table_id()));
        }
    }

    /// User action "pick table". No-op on a booked table; picking the
    /// selected table again toggles it off; otherwise the previous
    /// selection is replaced. Returns the table's resulting status.
    pub fn pick(
        &mut self,
        table: TableId,
        index: &SlotIndex,
        date: NaiveDate,
        slot: Slot,
    ) -> TableStatus {
        if index.is_occupied(date, slot, table) {
            return TableStatus::Booked;
        }
        if self.selected == Some(table) {
            self.selected = None;
            return TableStatus::Free;
        }
        self.selected = Some(table);
        TableStatus::Selected
    }

    /// Build the reservation payload for the current selection. Rejected
    /// locally when nothing is selected, the slot does not fit the opening
    /// hours, or the target became booked since selection.
    pub fn compose(
        &self,
        index: &SlotIndex,
        date: NaiveDate,
        start: Slot,
        duration_hours: f64,
        hours: &OpeningHours,
        details: &GuestDetails,
    ) -> Result<Reservation, BookingError> {
        let table = self.selected.ok_or(BookingError::NoTableSelected)?;
        let slots =
            duration_slots(duration_hours).ok_or(BookingError::InvalidDuration(duration_hours))?;
        if start < hours.open || start.offset(slots) > hours.close {
            return Err(BookingError::OutsideHours(start));
        }
        if index.is_occupied(date, start, table) {
            return Err(BookingError::TableUnavailable(table));
        }

        Ok(Reservation {
            id: Ulid::new(),
            date,
            hour: start,
            table,
            duration: duration_hours,
            ppl: details.people,
            starters: details.starters.clone(),
            phone: details.phone.clone(),
            address: details.address.clone(),
        })
    }

    /// Submit the current selection: mark the slot occupied locally before
    /// any network confirmation, clear the selection, then hand the payload
    /// to the transport. A transport failure is logged and counted but the
    /// optimistic mark is not rolled back.
    pub async fn submit(
        &mut self,
        builder: &AvailabilityBuilder,
        date: NaiveDate,
        start: Slot,
        duration_hours: f64,
        hours: &OpeningHours,
        details: &GuestDetails,
        gateway: &dyn ReservationGateway,
    ) -> Result<Reservation, BookingError> {
        let slots =
            duration_slots(duration_hours).ok_or(BookingError::InvalidDuration(duration_hours))?;

        let reservation = {
            let mut index = builder.index_mut().await;
            let reservation = self.compose(&index, date, start, duration_hours, hours, details)?;
            index.mark_occupied(date, start, slots, reservation.table);
            self.selected = None;
            reservation
        };

        metrics::counter!(crate::observability::RESERVATIONS_SUBMITTED_TOTAL).increment(1);
        info!(
            "reservation {} for table {} at {} {}",
            reservation.id, reservation.table, reservation.date, reservation.hour
        );

        if let Err(e) = gateway.send_reservation(&reservation).await {
            metrics::counter!(crate::observability::RESERVATION_SUBMIT_FAILURES_TOTAL).increment(1);
            warn!("reservation {} submit failed: {e}", reservation.id);
        }

        Ok(reservation)
    }
}
