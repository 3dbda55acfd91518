use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use validator::Validate;

use crate::{
    api::{error::ApiError, AppState},
    billing,
    domain::{BillBreakdown, Region, TariffComparison, TariffKind},
    pricing::RegionPriceInfo,
};

#[derive(Debug, Deserialize, Validate)]
pub struct SimulateRequest {
    #[validate(range(min = 0.0))]
    pub consumption_kwh: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub power_kw: f64,
    #[validate(range(min = 1, max = 730))]
    pub period_days: u32,
    #[validate(range(min = 0.0, max = 5.0))]
    pub price_eur_kwh: f64,
}

/// POST /api/v1/bill/simulate
pub async fn simulate_bill(
    Json(req): Json<SimulateRequest>,
) -> Result<Json<BillBreakdown>, ApiError> {
    req.validate()?;
    Ok(Json(billing::simulate(
        req.consumption_kwh,
        req.power_kw,
        req.period_days,
        req.price_eur_kwh,
    )))
}

#[derive(Debug, Deserialize, Validate)]
pub struct TariffFactor {
    pub name: String,
    /// Multiplier over the baseline price; negative factors would produce
    /// negative bills.
    #[validate(range(min = 0.0))]
    pub factor: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CompareRequest {
    #[validate(range(min = 0.0))]
    pub consumption_kwh: f64,
    #[validate(range(min = 0.0, max = 100.0))]
    pub power_kw: f64,
    #[validate(range(min = 1, max = 730))]
    pub period_days: u32,
    pub region: Region,
    /// Overrides the resolved reference price when present.
    pub baseline_price_eur_kwh: Option<f64>,
    /// Candidate tariffs in ranking tie-break order; defaults to the
    /// built-in catalog.
    #[validate(nested)]
    pub tariffs: Option<Vec<TariffFactor>>,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub baseline: RegionPriceInfo,
    pub comparisons: Vec<TariffComparison>,
}

/// POST /api/v1/bill/compare
pub async fn compare_tariffs(
    State(state): State<AppState>,
    Json(req): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, ApiError> {
    req.validate()?;

    let mut baseline = state.resolver.resolve(req.region).await;
    if let Some(price) = req.baseline_price_eur_kwh {
        if price <= 0.0 {
            return Err(ApiError::BadRequest(
                "baseline_price_eur_kwh must be positive".to_string(),
            ));
        }
        baseline.price_eur_kwh = price;
        baseline.source_label = None;
    }

    let tariffs: Vec<(String, f64)> = match req.tariffs {
        Some(list) => list.into_iter().map(|t| (t.name, t.factor)).collect(),
        None => TariffKind::iter()
            .map(|kind| (kind.name().to_string(), kind.factor()))
            .collect(),
    };

    let comparisons = billing::compare(
        req.consumption_kwh,
        req.power_kw,
        req.period_days,
        baseline.price_eur_kwh,
        &tariffs,
    );
    Ok(Json(CompareResponse {
        baseline,
        comparisons,
    }))
}
