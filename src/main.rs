use std::time::Duration;

use chrono::Local;
use tracing::{info, warn};

use bistro::api::RestApi;
use bistro::booking::AvailabilityBuilder;
use bistro::config::AppConfig;
use bistro::model::{RollingWindow, Slot, TableId, VisibleWindow};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let metrics_port: Option<u16> = std::env::var("BISTRO_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    bistro::observability::init(metrics_port);

    let mut config = AppConfig::default();
    if let Ok(url) = std::env::var("BISTRO_API_URL") {
        config.api.base_url = url;
    }
    if let Some(days) = std::env::var("BISTRO_DAYS_AHEAD")
        .ok()
        .and_then(|s| s.parse().ok())
    {
        config.booking.max_days_ahead = days;
    }
    let tables: Vec<TableId> = std::env::var("BISTRO_TABLES")
        .unwrap_or_else(|_| "1,2,3".into())
        .split(',')
        .filter_map(|s| s.trim().parse().ok())
        .map(TableId)
        .collect();
    let refresh_secs: Option<u64> = std::env::var("BISTRO_REFRESH_SECS")
        .ok()
        .and_then(|s| s.parse().ok());

    let today = Local::now().date_naive();
    let provider = RollingWindow::starting(today, config.booking.max_days_ahead);
    let window = VisibleWindow::of(&provider);

    let api = RestApi::new(config.api.clone());
    let builder = AvailabilityBuilder::new();

    info!("bistro availability console");
    info!("  api: {}", config.api.base_url);
    info!("  window: {} .. {}", window.min, window.max);
    info!("  tables: {}", tables.len());
    info!("  metrics: {}", metrics_port.map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics")));

    loop {
        match builder.rebuild(&api, &window).await {
            Ok(true) => report(&builder, &window, &tables, &config).await,
            Ok(false) => {}
            Err(e) => warn!("availability build failed, availability may be stale: {e}"),
        }

        match refresh_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => break,
        }
    }

    Ok(())
}

/// Log a free-slot summary per day and table over the service hours.
async fn report(
    builder: &AvailabilityBuilder,
    window: &VisibleWindow,
    tables: &[TableId],
    config: &AppConfig,
) {
    let index = builder.index().await;
    let open = config.hours.open.index();
    let close = config.hours.close.index();
    let slots_per_day = close - open;

    for day in window.days() {
        let mut summary = String::new();
        for table in tables {
            let free = (open..close)
                .filter(|i| !index.is_occupied(day, Slot::from_index(*i), *table))
                .count();
            summary.push_str(&format!("  table {table}: {free}/{slots_per_day}"));
        }
        info!("{day}{summary}");
    }
}
