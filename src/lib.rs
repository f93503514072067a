//! Restaurant front-end core: menu pricing, cart totals, and the
//! table-booking availability engine, synchronized with a REST backend.

pub mod api;
pub mod booking;
pub mod cart;
pub mod config;
pub mod menu;
pub mod model;
pub mod observability;
