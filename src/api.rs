use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cart::OrderPayload;
use crate::config::ApiConfig;
use crate::menu::ProductSpec;
use crate::model::{RawRecord, Reservation, VisibleWindow};

#[derive(Debug)]
pub enum ApiError {
    Http(String),
    Status(u16),
    Decode(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Http(e) => write!(f, "http error: {e}"),
            ApiError::Status(code) => write!(f, "unexpected status: {code}"),
            ApiError::Decode(e) => write!(f, "decode error: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Http(e.to_string())
        }
    }
}

/// The three read-only record streams, each scoped by the visible window.
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn bookings(&self, window: &VisibleWindow) -> Result<Vec<RawRecord>, ApiError>;
    async fn events_current(&self, window: &VisibleWindow) -> Result<Vec<RawRecord>, ApiError>;
    async fn events_repeat(&self, window: &VisibleWindow) -> Result<Vec<RawRecord>, ApiError>;
}

/// Write side of the booking collaborator. Fire-and-forget from the UI's
/// perspective; the response never gates local state.
#[async_trait]
pub trait ReservationGateway: Send + Sync {
    async fn send_reservation(&self, reservation: &Reservation) -> Result<(), ApiError>;
}

pub struct RestApi {
    http: reqwest::Client,
    cfg: ApiConfig,
}

impl RestApi {
    pub fn new(cfg: ApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            cfg,
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.cfg.base_url.trim_end_matches('/'), endpoint)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
        stream: &'static str,
    ) -> Result<T, ApiError> {
        let started = Instant::now();
        let response = self.http.get(self.url(endpoint)).query(query).send().await?;
        metrics::histogram!(crate::observability::FETCH_DURATION_SECONDS, "stream" => stream)
            .record(started.elapsed().as_secs_f64());
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn post_json<T: Serialize + Sync>(&self, endpoint: &str, body: &T) -> Result<(), ApiError> {
        let response = self.http.post(self.url(endpoint)).json(body).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status().as_u16()));
        }
        Ok(())
    }

    pub async fn fetch_products(&self) -> Result<Vec<ProductSpec>, ApiError> {
        self.get_json(&self.cfg.product_endpoint, &[], "products")
            .await
    }

    pub async fn send_order(&self, order: &OrderPayload) -> Result<(), ApiError> {
        self.post_json(&self.cfg.order_endpoint, order).await?;
        metrics::counter!(crate::observability::ORDERS_SUBMITTED_TOTAL).increment(1);
        Ok(())
    }
}

#[async_trait]
impl RecordSource for RestApi {
    async fn bookings(&self, window: &VisibleWindow) -> Result<Vec<RawRecord>, ApiError> {
        let query = [
            (self.cfg.date_start_param.as_str(), window.min.to_string()),
            (self.cfg.date_end_param.as_str(), window.max.to_string()),
        ];
        self.get_json(&self.cfg.booking_endpoint, &query, "bookings")
            .await
    }

    async fn events_current(&self, window: &VisibleWindow) -> Result<Vec<RawRecord>, ApiError> {
        let query = [
            (self.cfg.one_off_filter.0.as_str(), self.cfg.one_off_filter.1.clone()),
            (self.cfg.date_start_param.as_str(), window.min.to_string()),
            (self.cfg.date_end_param.as_str(), window.max.to_string()),
        ];
        self.get_json(&self.cfg.event_endpoint, &query, "events_current")
            .await
    }

    // The repeating stream is only bounded on the far end; expansion clips
    // to the window anyway.
    async fn events_repeat(&self, window: &VisibleWindow) -> Result<Vec<RawRecord>, ApiError> {
        let query = [
            (self.cfg.repeating_filter.0.as_str(), self.cfg.repeating_filter.1.clone()),
            (self.cfg.date_end_param.as_str(), window.max.to_string()),
        ];
        self.get_json(&self.cfg.event_endpoint, &query, "events_repeat")
            .await
    }
}

#[async_trait]
impl ReservationGateway for RestApi {
    async fn send_reservation(&self, reservation: &Reservation) -> Result<(), ApiError> {
        self.post_json(&self.cfg.booking_endpoint, reservation)
            .await
    }
}
