mod builder;
mod controller;
mod error;
mod index;

pub use builder::{load_index, populate, validate, AvailabilityBuilder};
pub use controller::{ReservationController, TableStatus, TableView};
pub use error::BookingError;
pub use index::SlotIndex;
