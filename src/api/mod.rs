pub mod billing;
pub mod error;
pub mod forecast;
pub mod health;
pub mod invoice;
pub mod prices;
pub mod solar;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{config::Config, pricing::PriceResolver};

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<PriceResolver>,
}

impl AppState {
    pub fn new(resolver: Arc<PriceResolver>) -> Self {
        Self { resolver }
    }
}

pub fn router(state: AppState, cfg: &Config) -> Router {
    let v1 = Router::new()
        .route("/health", get(health::health))
        .route("/regions", get(prices::list_regions))
        .route("/prices/:region", get(prices::get_price))
        .route("/prices/:region/tariffs", get(prices::get_tariff_prices))
        .route("/invoice/parse", post(invoice::parse_invoice))
        .route("/bill/simulate", post(billing::simulate_bill))
        .route("/bill/compare", post(billing::compare_tariffs))
        .route("/solar/estimate", post(solar::estimate_solar))
        .route("/forecast/consumption", post(forecast::forecast_consumption))
        .route("/insights/score", post(forecast::score_household))
        .with_state(state);

    let mut router = Router::new().nest("/api/v1", v1);

    if cfg.server.enable_cors {
        use tower_http::cors::CorsLayer;
        router = router.layer(CorsLayer::permissive());
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(1024 * 1024))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    cfg.server.request_timeout_secs,
                ))),
        )
        .layer(TraceLayer::new_for_http())
}
