//! Rooftop photovoltaic production and return-on-investment estimation.
//!
//! The model is deliberately coarse: regional annual yield, two derates
//! (orientation and system losses), and a monotone heuristic for the
//! self-consumption split. Calibrated against residential simulations,
//! not a time-series engine.

use serde::{Deserialize, Serialize};

use crate::domain::{Orientation, Region, SolarEstimate};

/// Tunable constants of the solar model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolarParams {
    /// Roof area needed per installed kWp, m².
    pub m2_per_kwp: f64,
    /// Inverter, wiring, soiling and temperature losses combined.
    pub system_loss_factor: f64,
    /// Upper bound of the self-consumption ratio.
    pub self_consumption_max: f64,
    /// Lower bound of the self-consumption ratio.
    pub self_consumption_min: f64,
    /// Slope of the self-consumption model around the production ==
    /// consumption point.
    pub self_consumption_slope: f64,
    /// Surplus compensation as a fraction of the retail price.
    pub export_price_factor: f64,
    /// Absolute ceiling for the surplus price, €/kWh.
    pub export_price_cap_eur_kwh: f64,
    /// Turn-key installation cost, €/kWp.
    pub cost_per_kwp_eur: f64,
    /// Grid emissions avoided per produced kWh, kg CO₂.
    pub co2_factor_kg_per_kwh: f64,
}

impl Default for SolarParams {
    fn default() -> Self {
        Self {
            m2_per_kwp: 5.0,
            system_loss_factor: 0.86,
            self_consumption_max: 0.8,
            self_consumption_min: 0.3,
            self_consumption_slope: 0.5,
            export_price_factor: 0.5,
            export_price_cap_eur_kwh: 0.12,
            cost_per_kwp_eur: 1200.0,
            co2_factor_kg_per_kwh: 0.25,
        }
    }
}

/// Estimates production, self-consumption split, savings and payback for a
/// roof in the given region.
///
/// Pure arithmetic; zero consumption or zero savings degrade to defined
/// values instead of faulting.
pub fn estimate(
    region: Region,
    roof_area_m2: f64,
    orientation: Orientation,
    annual_consumption_kwh: f64,
    price_eur_kwh: f64,
) -> SolarEstimate {
    estimate_with(
        region,
        roof_area_m2,
        orientation,
        annual_consumption_kwh,
        price_eur_kwh,
        &SolarParams::default(),
    )
}

pub fn estimate_with(
    region: Region,
    roof_area_m2: f64,
    orientation: Orientation,
    annual_consumption_kwh: f64,
    price_eur_kwh: f64,
    params: &SolarParams,
) -> SolarEstimate {
    let installable_kw = roof_area_m2 / params.m2_per_kwp;

    let annual_production_kwh = installable_kw
        * region.solar_yield_kwh_per_kwp()
        * orientation.derate()
        * params.system_loss_factor;

    // As production overtakes consumption a larger share must be exported;
    // as it falls short, self-consumption approaches its upper bound.
    let coverage = if annual_consumption_kwh > 0.0 {
        annual_production_kwh / annual_consumption_kwh
    } else {
        f64::INFINITY
    };
    let self_consumption_ratio = (params.self_consumption_max
        - params.self_consumption_slope * (coverage - 1.0))
        .clamp(params.self_consumption_min, params.self_consumption_max);

    let self_consumed_kwh =
        (annual_production_kwh * self_consumption_ratio).min(annual_consumption_kwh);
    let surplus_kwh = (annual_production_kwh - self_consumed_kwh).max(0.0);

    // Surplus is always compensated below retail and below an absolute cap.
    let export_price = (price_eur_kwh * params.export_price_factor)
        .min(params.export_price_cap_eur_kwh);

    let annual_savings_eur = self_consumed_kwh * price_eur_kwh + surplus_kwh * export_price;
    let installation_cost_eur = installable_kw * params.cost_per_kwp_eur;
    let payback_years = if annual_savings_eur > 0.0 {
        installation_cost_eur / annual_savings_eur
    } else {
        0.0
    };

    SolarEstimate {
        installable_kw,
        annual_production_kwh,
        self_consumption_ratio,
        self_consumed_kwh,
        surplus_kwh,
        annual_savings_eur,
        installation_cost_eur,
        payback_years,
        co2_avoided_kg: annual_production_kwh * params.co2_factor_kg_per_kwh,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn madrid_south_roof_scenario() {
        let est = estimate(Region::Madrid, 50.0, Orientation::South, 6000.0, 0.21);

        assert!((est.installable_kw - 10.0).abs() < EPS);
        // 10 kWp × 1650 kWh/kWp × 1.0 orientation × 0.86 losses
        assert!((est.annual_production_kwh - 14_190.0).abs() < 1e-6);
        assert!(est.payback_years > 0.0);
        assert!((est.installation_cost_eur - 12_000.0).abs() < EPS);
        assert!((est.co2_avoided_kg - 14_190.0 * 0.25).abs() < 1e-6);
    }

    #[test]
    fn orientation_derate_chain() {
        let south = estimate(Region::Madrid, 50.0, Orientation::South, 6000.0, 0.21);
        let north = estimate(Region::Madrid, 50.0, Orientation::North, 6000.0, 0.21);
        assert!((north.annual_production_kwh - south.annual_production_kwh * 0.60).abs() < 1e-6);
    }

    #[test]
    fn oversized_system_exports_most_production() {
        // Production far above consumption drives the ratio to its floor.
        let est = estimate(Region::Andalusia, 200.0, Orientation::South, 2000.0, 0.21);
        assert!((est.self_consumption_ratio - 0.3).abs() < EPS);
        assert!(est.surplus_kwh > est.self_consumed_kwh);
    }

    #[test]
    fn undersized_system_self_consumes_most_production() {
        let est = estimate(Region::PaisBasc, 10.0, Orientation::North, 20_000.0, 0.21);
        assert!((est.self_consumption_ratio - 0.8).abs() < EPS);
        assert_eq!(est.surplus_kwh, (est.annual_production_kwh - est.self_consumed_kwh).max(0.0));
    }

    #[test]
    fn zero_consumption_degrades_gracefully() {
        let est = estimate(Region::Madrid, 50.0, Orientation::South, 0.0, 0.21);
        assert_eq!(est.self_consumed_kwh, 0.0);
        assert!((est.surplus_kwh - est.annual_production_kwh).abs() < EPS);
        assert!((est.self_consumption_ratio - 0.3).abs() < EPS);
    }

    #[test]
    fn zero_savings_means_zero_payback() {
        let est = estimate(Region::Madrid, 0.0, Orientation::South, 6000.0, 0.21);
        assert_eq!(est.annual_savings_eur, 0.0);
        assert_eq!(est.payback_years, 0.0);
    }

    #[test]
    fn export_price_is_capped() {
        // At 0.30 €/kWh retail, half-retail would be 0.15; the cap holds
        // the surplus price at 0.12.
        let est = estimate(Region::Madrid, 100.0, Orientation::South, 1000.0, 0.30);
        let expected = est.self_consumed_kwh * 0.30 + est.surplus_kwh * 0.12;
        assert!((est.annual_savings_eur - expected).abs() < 1e-6);
    }

    #[test]
    fn higher_price_never_lowers_savings() {
        let low = estimate(Region::Madrid, 50.0, Orientation::South, 6000.0, 0.15);
        let high = estimate(Region::Madrid, 50.0, Orientation::South, 6000.0, 0.25);
        assert!(high.annual_savings_eur >= low.annual_savings_eur);
    }

    proptest! {
        #[test]
        fn self_consumption_invariants(
            roof in 0.0f64..500.0,
            consumption in 0.0f64..100_000.0,
            price in 0.01f64..1.0,
        ) {
            let est = estimate(
                Region::Catalunya,
                roof,
                Orientation::South,
                consumption,
                price,
            );
            prop_assert!(est.self_consumption_ratio >= 0.3 - EPS);
            prop_assert!(est.self_consumption_ratio <= 0.8 + EPS);
            prop_assert!(est.self_consumed_kwh <= consumption + EPS);
            prop_assert!(est.self_consumed_kwh <= est.annual_production_kwh + EPS);
            prop_assert!(est.surplus_kwh >= -EPS);
            prop_assert!(
                (est.surplus_kwh
                    - (est.annual_production_kwh - est.self_consumed_kwh).max(0.0))
                .abs() < 1e-6
            );
        }
    }
}
