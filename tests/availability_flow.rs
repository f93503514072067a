//! End-to-end flow over the public API: build availability from record
//! streams, drive table selection, submit a reservation optimistically.

use async_trait::async_trait;
use chrono::NaiveDate;

use bistro::api::{ApiError, RecordSource, ReservationGateway};
use bistro::booking::{AvailabilityBuilder, BookingError, ReservationController, TableStatus};
use bistro::config::OpeningHours;
use bistro::model::{GuestDetails, RawRecord, Reservation, Slot, TableId, VisibleWindow};

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn slot(hour: f64) -> Slot {
    Slot::from_hour_number(hour).unwrap()
}

struct SeededBackend {
    records: Vec<serde_json::Value>,
    fail_events: bool,
    sent: std::sync::Mutex<Vec<Reservation>>,
}

impl SeededBackend {
    fn parse(&self, filter: impl Fn(&serde_json::Value) -> bool) -> Vec<RawRecord> {
        self.records
            .iter()
            .filter(|r| filter(r))
            .map(|r| serde_json::from_value((*r).clone()).unwrap())
            .collect()
    }
}

#[async_trait]
impl RecordSource for SeededBackend {
    async fn bookings(&self, _window: &VisibleWindow) -> Result<Vec<RawRecord>, ApiError> {
        Ok(self.parse(|r| r.get("kind").is_none()))
    }

    async fn events_current(&self, _window: &VisibleWindow) -> Result<Vec<RawRecord>, ApiError> {
        if self.fail_events {
            return Err(ApiError::Status(502));
        }
        Ok(self.parse(|r| r["kind"] == "event" && r["repeat"] == false))
    }

    async fn events_repeat(&self, _window: &VisibleWindow) -> Result<Vec<RawRecord>, ApiError> {
        Ok(self.parse(|r| r["kind"] == "event" && r["repeat"] == "daily"))
    }
}

#[async_trait]
impl ReservationGateway for SeededBackend {
    async fn send_reservation(&self, reservation: &Reservation) -> Result<(), ApiError> {
        self.sent.lock().unwrap().push(reservation.clone());
        Ok(())
    }
}

fn backend() -> SeededBackend {
    SeededBackend {
        records: vec![
            // one-off booking, table 1, Friday evening
            serde_json::json!({
                "id": 1, "date": "2026-08-07", "hour": "19:00",
                "duration": 2, "table": 1, "ppl": 2
            }),
            // one-off event, table 2
            serde_json::json!({
                "kind": "event", "repeat": false,
                "date": "2026-08-08", "hour": "13:00", "duration": 3, "table": 2
            }),
            // daily event, table 3
            serde_json::json!({
                "kind": "event", "repeat": "daily",
                "hour": "12:00", "duration": 1, "table": 3
            }),
        ],
        fail_events: false,
        sent: std::sync::Mutex::new(Vec::new()),
    }
}

#[tokio::test]
async fn build_select_and_reserve() {
    let window = VisibleWindow::new(d("2026-08-07"), d("2026-08-09"));
    let builder = AvailabilityBuilder::new();
    let backend = backend();
    assert!(builder.rebuild(&backend, &window).await.unwrap());

    let mut controller = ReservationController::new();
    let date = d("2026-08-07");
    let hour = slot(19.0);

    {
        let index = builder.index().await;
        // booked by the seeded reservation
        assert_eq!(
            controller.status_of(&index, date, hour, TableId(1)),
            TableStatus::Booked
        );
        // the daily event occupies 12:00 on every window day, not 19:00
        assert!(index.is_occupied(d("2026-08-09"), slot(12.0), TableId(3)));
        assert!(!index.is_occupied(date, hour, TableId(3)));

        assert_eq!(controller.pick(TableId(1), &index, date, hour), TableStatus::Booked);
        assert_eq!(controller.pick(TableId(4), &index, date, hour), TableStatus::Selected);
    }

    let details = GuestDetails {
        people: 4,
        starters: vec!["lemon water".into()],
        phone: "600100200".into(),
        address: "1 Main St".into(),
    };
    let reservation = controller
        .submit(&builder, date, hour, 1.5, &OpeningHours::default(), &details, &backend)
        .await
        .unwrap();

    // occupied locally before any confirmation was needed
    let index = builder.index().await;
    assert!(index.is_occupied(date, slot(19.0), TableId(4)));
    assert!(index.is_occupied(date, slot(20.0), TableId(4)));
    assert!(!index.is_occupied(date, slot(20.5), TableId(4)));

    let sent = backend.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].id, reservation.id);
}

#[tokio::test]
async fn failed_stream_keeps_availability_stale_but_intact() {
    let window = VisibleWindow::new(d("2026-08-07"), d("2026-08-09"));
    let builder = AvailabilityBuilder::new();

    let healthy = backend();
    assert!(builder.rebuild(&healthy, &window).await.unwrap());

    let mut broken = backend();
    broken.fail_events = true;
    broken.records.clear();

    let result = builder.rebuild(&broken, &window).await;
    assert!(matches!(result, Err(BookingError::Fetch(_))));

    // the stale index still answers from the last successful build
    let index = builder.index().await;
    assert!(index.is_occupied(d("2026-08-07"), slot(19.0), TableId(1)));
}
