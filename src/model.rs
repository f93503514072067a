use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Half-hours since midnight, the resolution of occupancy tracking.
///
/// Every representable value is half-hour aligned by construction, so a
/// `Slot` can be used directly as a map key where the wire speaks in
/// fractional hour numbers (12, 12.5, 13 …).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot(u16);

impl Slot {
    pub const PER_HOUR: u16 = 2;

    /// Last slot boundary accepted from the wire ("24:00").
    const MAX_INDEX: u16 = 48;

    pub fn from_index(half_hours: u16) -> Self {
        Self(half_hours)
    }

    pub fn index(self) -> u16 {
        self.0
    }

    /// Parse a fractional hour number (13.5 → 13:30). `None` unless the
    /// value lands exactly on a half-hour boundary.
    pub fn from_hour_number(hour: f64) -> Option<Self> {
        if !hour.is_finite() || hour < 0.0 {
            return None;
        }
        let scaled = hour * Self::PER_HOUR as f64;
        if scaled.fract() != 0.0 || scaled > Self::MAX_INDEX as f64 {
            return None;
        }
        Some(Self(scaled as u16))
    }

    /// Parse an "HH:MM" wire hour. Minutes must be 00 or 30.
    pub fn parse_hhmm(raw: &str) -> Option<Self> {
        let (h, m) = raw.trim().split_once(':')?;
        let hours: u16 = h.parse().ok()?;
        let minutes: u16 = m.parse().ok()?;
        if hours > 24 || (minutes != 0 && minutes != 30) {
            return None;
        }
        let index = hours * Self::PER_HOUR + minutes / 30;
        if index > Self::MAX_INDEX {
            return None;
        }
        Some(Self(index))
    }

    pub fn hour_number(self) -> f64 {
        self.0 as f64 / Self::PER_HOUR as f64
    }

    pub fn offset(self, half_hours: u16) -> Self {
        Self(self.0 + half_hours)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / Self::PER_HOUR, (self.0 % Self::PER_HOUR) * 30)
    }
}

impl Serialize for Slot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Convert a duration in hours to a half-hour slot count. `None` unless the
/// duration is a positive multiple of 0.5 no longer than a full day.
pub fn duration_slots(hours: f64) -> Option<u16> {
    if !hours.is_finite() || hours <= 0.0 {
        return None;
    }
    let scaled = hours * Slot::PER_HOUR as f64;
    if scaled.fract() != 0.0 || scaled > Slot::MAX_INDEX as f64 {
        return None;
    }
    Some(scaled as u16)
}

/// Typed table identifier. The wire may carry it as a JSON number or a
/// numeric string; both deserialize to the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TableId(pub u32);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for TableId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct Visitor;

        impl serde::de::Visitor<'_> for Visitor {
            type Value = TableId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table id as a number or numeric string")
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<TableId, E> {
                u32::try_from(v)
                    .map(TableId)
                    .map_err(|_| E::custom("table id out of range"))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<TableId, E> {
                u32::try_from(v)
                    .map(TableId)
                    .map_err(|_| E::custom("table id out of range"))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<TableId, E> {
                v.trim()
                    .parse::<u32>()
                    .map(TableId)
                    .map_err(|_| E::custom("table id is not numeric"))
            }
        }

        deserializer.deserialize_any(Visitor)
    }
}

/// Inclusive date range over which the slot index is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl VisibleWindow {
    pub fn new(min: NaiveDate, max: NaiveDate) -> Self {
        debug_assert!(min <= max, "window min must not exceed max");
        Self { min, max }
    }

    pub fn of(provider: &impl RangeProvider) -> Self {
        Self::new(provider.min_date(), provider.max_date())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }

    /// Calendar days of the window, inclusive on both ends.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let max = self.max;
        self.min.iter_days().take_while(move |d| *d <= max)
    }
}

/// Date-selection widget boundary: the only source of the visible range and
/// the currently chosen day.
pub trait RangeProvider {
    fn min_date(&self) -> NaiveDate;
    fn max_date(&self) -> NaiveDate;
    fn selected_date(&self) -> NaiveDate;
}

/// Default range provider: a window rolling forward from today.
#[derive(Debug, Clone, Copy)]
pub struct RollingWindow {
    pub today: NaiveDate,
    pub days_ahead: u32,
    pub selected: NaiveDate,
}

impl RollingWindow {
    pub fn starting(today: NaiveDate, days_ahead: u32) -> Self {
        Self { today, days_ahead, selected: today }
    }
}

impl RangeProvider for RollingWindow {
    fn min_date(&self) -> NaiveDate {
        self.today
    }

    fn max_date(&self) -> NaiveDate {
        self.today + chrono::Days::new(self.days_ahead as u64)
    }

    fn selected_date(&self) -> NaiveDate {
        self.selected
    }
}

/// A reservation/event record as the backend returns it. Unknown fields are
/// ignored; `repeat` arrives as a bool or a tag string depending on the
/// record stream.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub hour: String,
    pub duration: f64,
    pub table: TableId,
    #[serde(default)]
    pub repeat: Option<serde_json::Value>,
}

/// When a validated record occupies its slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    /// One-off, on this calendar day.
    On(NaiveDate),
    /// Replayed once per day across the visible window.
    Daily,
}

/// A record that passed ingestion validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationRecord {
    pub occurrence: Occurrence,
    pub start: Slot,
    pub duration_slots: u16,
    pub table: TableId,
}

/// Guest-supplied form fields carried on a reservation submit.
#[derive(Debug, Clone, Default)]
pub struct GuestDetails {
    pub people: u32,
    pub starters: Vec<String>,
    pub phone: String,
    pub address: String,
}

/// The reservation payload handed to the transport on submit.
#[derive(Debug, Clone, Serialize)]
pub struct Reservation {
    pub id: Ulid,
    pub date: NaiveDate,
    pub hour: Slot,
    pub table: TableId,
    pub duration: f64,
    pub ppl: u32,
    pub starters: Vec<String>,
    pub phone: String,
    pub address: String,
}

/// The amount-widget value contract: a clamped integer where out-of-range
/// or unparsable updates are ignored and the previous value is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedAmount {
    value: u32,
    min: u32,
    max: u32,
}

impl BoundedAmount {
    pub fn new(default: u32, min: u32, max: u32) -> Self {
        debug_assert!(min <= max);
        Self { value: default.clamp(min, max), min, max }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn set(&mut self, candidate: u32) {
        if candidate != self.value && candidate >= self.min && candidate <= self.max {
            self.value = candidate;
        }
    }

    pub fn set_from_str(&mut self, raw: &str) {
        if let Ok(candidate) = raw.trim().parse() {
            self.set(candidate);
        }
    }

    pub fn step(&mut self, delta: i32) {
        let candidate = self.value as i64 + delta as i64;
        if let Ok(candidate) = u32::try_from(candidate) {
            self.set(candidate);
        }
    }
}
