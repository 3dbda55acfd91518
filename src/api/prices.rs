use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::{
    api::AppState,
    domain::{PriceZone, Region, TariffKind},
    pricing::RegionPriceInfo,
};

#[derive(Debug, Serialize)]
pub struct RegionCatalogEntry {
    pub region: Region,
    pub zone: PriceZone,
    pub fallback_price_eur_kwh: f64,
    pub solar_yield_kwh_per_kwp: f64,
    pub avg_monthly_consumption_kwh: f64,
}

/// GET /api/v1/regions - static catalog of the known regions
pub async fn list_regions() -> Json<Vec<RegionCatalogEntry>> {
    let entries = Region::iter()
        .filter(|r| *r != Region::Altres)
        .map(|region| RegionCatalogEntry {
            region,
            zone: region.price_zone(),
            fallback_price_eur_kwh: region.fallback_price_eur_kwh(),
            solar_yield_kwh_per_kwp: region.solar_yield_kwh_per_kwp(),
            avg_monthly_consumption_kwh: region.avg_monthly_consumption_kwh(),
        })
        .collect();
    Json(entries)
}

/// GET /api/v1/prices/{region} - resolved reference price
///
/// Unknown region names resolve to peninsula defaults rather than 404,
/// keeping the answer best-effort.
pub async fn get_price(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Json<RegionPriceInfo> {
    let region = Region::from_name(&region);
    Json(state.resolver.resolve(region).await)
}

#[derive(Debug, Serialize)]
pub struct TariffPrice {
    pub name: &'static str,
    pub description: &'static str,
    pub factor: f64,
    pub price_eur_kwh: f64,
}

#[derive(Debug, Serialize)]
pub struct TariffPricesResponse {
    pub baseline: RegionPriceInfo,
    pub tariffs: Vec<TariffPrice>,
}

/// GET /api/v1/prices/{region}/tariffs - effective price per tariff kind
pub async fn get_tariff_prices(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Json<TariffPricesResponse> {
    let region = Region::from_name(&region);
    let baseline = state.resolver.resolve(region).await;
    let tariffs = TariffKind::iter()
        .map(|kind| TariffPrice {
            name: kind.name(),
            description: kind.description(),
            factor: kind.factor(),
            price_eur_kwh: baseline.price_eur_kwh * kind.factor(),
        })
        .collect();
    Json(TariffPricesResponse { baseline, tariffs })
}
