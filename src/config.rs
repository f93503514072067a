use crate::model::{BoundedAmount, Slot};

/// Explicit configuration passed into each component's constructor.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub hours: OpeningHours,
    pub booking: BookingConfig,
    pub cart: CartConfig,
}

/// Backend endpoint names and the query-parameter vocabulary of its
/// range-filter API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub booking_endpoint: String,
    pub event_endpoint: String,
    pub order_endpoint: String,
    pub product_endpoint: String,
    pub date_start_param: String,
    pub date_end_param: String,
    /// Filter selecting one-off event records.
    pub one_off_filter: (String, String),
    /// Filter selecting repeating event records.
    pub repeating_filter: (String, String),
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3131".into(),
            booking_endpoint: "booking".into(),
            event_endpoint: "event".into(),
            order_endpoint: "order".into(),
            product_endpoint: "product".into(),
            date_start_param: "date_gte".into(),
            date_end_param: "date_lte".into(),
            one_off_filter: ("repeat".into(), "false".into()),
            repeating_filter: ("repeat_ne".into(), "false".into()),
        }
    }
}

/// Service hours; reservations must fit inside `[open, close)`.
#[derive(Debug, Clone, Copy)]
pub struct OpeningHours {
    pub open: Slot,
    pub close: Slot,
}

impl Default for OpeningHours {
    fn default() -> Self {
        Self {
            open: Slot::from_index(12 * Slot::PER_HOUR),
            close: Slot::from_index(24 * Slot::PER_HOUR),
        }
    }
}

/// Default/min/max for an amount-widget value.
#[derive(Debug, Clone, Copy)]
pub struct AmountBounds {
    pub default: u32,
    pub min: u32,
    pub max: u32,
}

impl AmountBounds {
    pub fn amount(&self) -> BoundedAmount {
        BoundedAmount::new(self.default, self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BookingConfig {
    /// How far ahead of today the visible window reaches.
    pub max_days_ahead: u32,
    pub duration_hours: AmountBounds,
    pub people: AmountBounds,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            max_days_ahead: 14,
            duration_hours: AmountBounds { default: 1, min: 1, max: 12 },
            people: AmountBounds { default: 1, min: 1, max: 9 },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CartConfig {
    pub default_delivery_fee: i64,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self { default_delivery_fee: 20 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_hours_cover_the_evening() {
        let hours = OpeningHours::default();
        assert_eq!(hours.open.to_string(), "12:00");
        assert_eq!(hours.close.to_string(), "24:00");
    }

    #[test]
    fn amount_bounds_seed_the_widget_value() {
        let bounds = AmountBounds { default: 1, min: 1, max: 9 };
        let mut amount = bounds.amount();
        assert_eq!(amount.value(), 1);
        amount.set(12);
        assert_eq!(amount.value(), 1);
    }
}
