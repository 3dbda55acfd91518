//! Household efficiency scoring against Spanish residential averages.

use serde::Serialize;

/// National reference household: annual kWh, contracted kW, €/kWh.
const REF_ANNUAL_KWH: f64 = 3500.0;
const REF_POWER_KW: f64 = 4.6;
const REF_PRICE_EUR_KWH: f64 = 0.20;

/// Share of annual consumption recoverable through optimization
/// (EU studies put the range at 10-18%).
const OPTIMIZATION_SAVINGS_RATIO: f64 = 0.14;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct EnergyScore {
    /// 0 (worst) to 100 (best).
    pub score: u8,
    /// kWh/year recoverable through optimization.
    pub estimated_savings_kwh: f64,
}

/// Scores a household against the national average consumption, power and
/// price. Each deviation subtracts from a perfect 100.
pub fn energy_score(annual_consumption_kwh: f64, power_kw: f64, price_eur_kwh: f64) -> u8 {
    let score = 100.0
        - (annual_consumption_kwh - REF_ANNUAL_KWH) / 100.0
        - (power_kw - REF_POWER_KW) * 5.0
        - (price_eur_kwh - REF_PRICE_EUR_KWH) * 120.0;
    (score as i64).clamp(0, 100) as u8
}

/// Annual kWh a household could recover through usage optimization.
pub fn estimated_savings_kwh(annual_consumption_kwh: f64) -> f64 {
    annual_consumption_kwh * OPTIMIZATION_SAVINGS_RATIO
}

pub fn score_household(
    annual_consumption_kwh: f64,
    power_kw: f64,
    price_eur_kwh: f64,
) -> EnergyScore {
    EnergyScore {
        score: energy_score(annual_consumption_kwh, power_kw, price_eur_kwh),
        estimated_savings_kwh: estimated_savings_kwh(annual_consumption_kwh),
    }
}
