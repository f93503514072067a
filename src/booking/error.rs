use chrono::NaiveDate;

use crate::api::ApiError;
use crate::model::{Slot, TableId};

#[derive(Debug)]
pub enum BookingError {
    Fetch(ApiError),
    InvalidDuration(f64),
    InvalidHour(String),
    UnknownRecurrence(String),
    MissingDate,
    OutsideWindow(NaiveDate),
    OutsideHours(Slot),
    NoTableSelected,
    TableUnavailable(TableId),
}

impl std::fmt::Display for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingError::Fetch(e) => write!(f, "record fetch failed: {e}"),
            BookingError::InvalidDuration(hours) => {
                write!(f, "duration {hours} is not a positive half-hour multiple")
            }
            BookingError::InvalidHour(raw) => write!(f, "hour {raw:?} is not half-hour aligned"),
            BookingError::UnknownRecurrence(tag) => write!(f, "unknown recurrence tag: {tag}"),
            BookingError::MissingDate => write!(f, "one-off record carries no date"),
            BookingError::OutsideWindow(date) => {
                write!(f, "date {date} is outside the visible window")
            }
            BookingError::OutsideHours(slot) => {
                write!(f, "reservation at {slot} does not fit the opening hours")
            }
            BookingError::NoTableSelected => write!(f, "no table selected"),
            BookingError::TableUnavailable(table) => {
                write!(f, "table {table} is already booked at that slot")
            }
        }
    }
}

impl std::error::Error for BookingError {}

impl From<ApiError> for BookingError {
    fn from(e: ApiError) -> Self {
        BookingError::Fetch(e)
    }
}
