use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    api::error::ApiError,
    domain::{ConsumptionReference, Region},
    forecast::{self, ForecastPoint, MonthlyConsumption},
    insights::{self, EnergyScore},
};

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    /// Monthly history in chronological order.
    pub history: Vec<MonthlyConsumption>,
}

/// POST /api/v1/forecast/consumption
pub async fn forecast_consumption(Json(req): Json<ForecastRequest>) -> Json<Vec<ForecastPoint>> {
    Json(forecast::predict_consumption(&req.history))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ScoreRequest {
    #[validate(range(min = 0.0))]
    pub annual_consumption_kwh: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub power_kw: f64,
    #[validate(range(min = 0.0, max = 5.0))]
    pub price_eur_kwh: f64,
    /// When present, the monthly consumption is also compared against the
    /// regional average.
    pub region: Option<Region>,
    pub monthly_consumption_kwh: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    #[serde(flatten)]
    pub score: EnergyScore,
    pub reference: Option<ConsumptionReference>,
}

/// POST /api/v1/insights/score
pub async fn score_household(
    Json(req): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, ApiError> {
    req.validate()?;

    let score = insights::score_household(
        req.annual_consumption_kwh,
        req.power_kw,
        req.price_eur_kwh,
    );
    let reference = match (req.region, req.monthly_consumption_kwh) {
        (Some(region), Some(monthly)) => Some(region.compare_monthly_consumption(monthly)),
        _ => None,
    };
    Ok(Json(ScoreResponse { score, reference }))
}
