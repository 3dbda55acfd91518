use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use llum_engine::{api, config::Config, pricing, telemetry};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let cfg = Config::load()?;

    let feed = pricing::EsiosFeed::new(
        cfg.prices.base_url.clone(),
        Duration::from_secs(cfg.prices.http_timeout_seconds),
        cfg.prices.api_key.clone(),
    )?;
    let resolver = Arc::new(pricing::PriceResolver::new(
        Arc::new(feed),
        Arc::new(pricing::SystemClock),
        pricing::ResolverParams {
            cache_ttl: chrono::Duration::seconds(cfg.prices.cache_ttl_seconds as i64),
            wholesale_floor_eur_kwh: cfg.prices.wholesale_floor_eur_kwh,
            wholesale_uplift: cfg.prices.wholesale_uplift,
        },
    ));

    let app = api::router(api::AppState::new(resolver), &cfg);
    let addr = cfg.server.socket_addr()?;

    info!(%addr, "starting llum-engine");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(telemetry::shutdown_signal())
        .await?;

    info!("shutdown complete");
    Ok(())
}
