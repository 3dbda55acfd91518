use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::{error::ApiError, AppState},
    domain::{Orientation, Region, SolarEstimate},
    solar,
};

#[derive(Debug, Deserialize, Validate)]
pub struct SolarEstimateRequest {
    pub region: Region,
    #[validate(range(min = 1.0, max = 1000.0))]
    pub roof_area_m2: f64,
    pub orientation: Orientation,
    #[validate(range(min = 0.0, max = 500_000.0))]
    pub annual_consumption_kwh: f64,
    /// Retail €/kWh; the region's resolved reference price when absent.
    pub price_eur_kwh: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SolarEstimateResponse {
    pub price_eur_kwh: f64,
    /// Present when the price came from the live feed.
    pub price_source: Option<String>,
    pub estimate: SolarEstimate,
}

/// POST /api/v1/solar/estimate
pub async fn estimate_solar(
    State(state): State<AppState>,
    Json(req): Json<SolarEstimateRequest>,
) -> Result<Json<SolarEstimateResponse>, ApiError> {
    req.validate()?;

    let (price, source) = match req.price_eur_kwh {
        Some(price) if price > 0.0 => (price, None),
        Some(_) => {
            return Err(ApiError::BadRequest(
                "price_eur_kwh must be positive".to_string(),
            ))
        }
        None => {
            let info = state.resolver.resolve(req.region).await;
            (info.price_eur_kwh, info.source_label)
        }
    };

    let estimate = solar::estimate(
        req.region,
        req.roof_area_m2,
        req.orientation,
        req.annual_consumption_kwh,
        price,
    );
    Ok(Json(SolarEstimateResponse {
        price_eur_kwh: price,
        price_source: source,
        estimate,
    }))
}
