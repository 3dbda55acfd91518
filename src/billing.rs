//! Residential bill simulation with the regulated tax/fee stacking used on
//! Spanish electricity bills, and a comparator over tariff factors.
//!
//! The stacking order is fixed: energy + power + meter rental form the
//! taxable base, the electricity excise applies to the base, and VAT
//! applies to base plus excise. Constants follow the CNMC comparator
//! (2.0TD access tariff).

use crate::domain::{BillBreakdown, TariffComparison};

/// Regulated power toll, €/kW/day (CNMC, 2.0TD).
pub const POWER_TOLL_EUR_KW_DAY: f64 = 0.048;
/// Meter rental, €/day.
pub const METER_RENTAL_EUR_DAY: f64 = 0.02;
/// Electricity excise tax rate.
pub const EXCISE_RATE: f64 = 0.051_126_963_2;
/// Domestic VAT rate.
pub const VAT_RATE: f64 = 0.10;

/// Simulates an itemized bill for one billing period.
///
/// Pure and deterministic; increasing any input never decreases the total.
/// Zero consumption yields an effective price of 0 instead of a division
/// fault.
pub fn simulate(
    consumption_kwh: f64,
    power_kw: f64,
    period_days: u32,
    price_eur_kwh: f64,
) -> BillBreakdown {
    let days = period_days as f64;

    let energy_term = consumption_kwh * price_eur_kwh;
    let power_term = power_kw * days * POWER_TOLL_EUR_KW_DAY;
    let meter_rental = days * METER_RENTAL_EUR_DAY;

    let taxable_base = energy_term + power_term + meter_rental;
    let excise_tax = taxable_base * EXCISE_RATE;
    let base_with_excise = taxable_base + excise_tax;
    let vat = base_with_excise * VAT_RATE;
    let total = base_with_excise + vat;

    let effective_price = if consumption_kwh > 0.0 {
        total / consumption_kwh
    } else {
        0.0
    };

    BillBreakdown {
        energy_term_eur: energy_term,
        power_term_eur: power_term,
        meter_rental_eur: meter_rental,
        taxable_base_eur: taxable_base,
        excise_tax_eur: excise_tax,
        vat_eur: vat,
        total_eur: total,
        consumption_kwh,
        power_kw,
        period_days,
        effective_price_eur_kwh: effective_price,
    }
}

/// Simulates the same billing period once per candidate tariff and ranks
/// the results by total cost, cheapest first.
///
/// `tariffs` is an ordered list of `(name, factor-over-baseline)` pairs;
/// the sort is stable, so equal totals keep their input order.
pub fn compare(
    consumption_kwh: f64,
    power_kw: f64,
    period_days: u32,
    baseline_price_eur_kwh: f64,
    tariffs: &[(String, f64)],
) -> Vec<TariffComparison> {
    let mut results: Vec<TariffComparison> = tariffs
        .iter()
        .map(|(name, factor)| {
            let price = baseline_price_eur_kwh * factor;
            TariffComparison {
                tariff_name: name.clone(),
                price_eur_kwh: price,
                breakdown: simulate(consumption_kwh, power_kw, period_days, price),
                factor_vs_baseline: *factor,
            }
        })
        .collect();
    results.sort_by(|a, b| a.breakdown.total_eur.total_cmp(&b.breakdown.total_eur));
    results
}

/// Annual saving from switching the energy price, simulated over 365 days.
///
/// Returns `(saving_eur, saving_percent)`; the percentage is 0 when the
/// current bill totals 0.
pub fn switch_savings(
    annual_consumption_kwh: f64,
    power_kw: f64,
    current_price_eur_kwh: f64,
    new_price_eur_kwh: f64,
) -> (f64, f64) {
    let current = simulate(annual_consumption_kwh, power_kw, 365, current_price_eur_kwh);
    let candidate = simulate(annual_consumption_kwh, power_kw, 365, new_price_eur_kwh);
    let saving = current.total_eur - candidate.total_eur;
    let percent = if current.total_eur > 0.0 {
        saving / current.total_eur * 100.0
    } else {
        0.0
    };
    (saving, percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    const EPS: f64 = 1e-9;

    #[test]
    fn breakdown_matches_the_stacked_formula() {
        let bill = simulate(350.0, 4.6, 30, 0.21);

        assert!((bill.energy_term_eur - 350.0 * 0.21).abs() < EPS);
        assert!((bill.power_term_eur - 4.6 * 30.0 * POWER_TOLL_EUR_KW_DAY).abs() < EPS);
        assert!((bill.meter_rental_eur - 30.0 * METER_RENTAL_EUR_DAY).abs() < EPS);

        let base = bill.energy_term_eur + bill.power_term_eur + bill.meter_rental_eur;
        let expected_total = base * (1.0 + EXCISE_RATE) * (1.0 + VAT_RATE);
        assert!((bill.total_eur - expected_total).abs() < 1e-6);
        assert!((bill.effective_price_eur_kwh - bill.total_eur / 350.0).abs() < EPS);
    }

    #[test]
    fn zero_consumption_has_zero_effective_price() {
        let bill = simulate(0.0, 4.6, 30, 0.21);
        assert_eq!(bill.effective_price_eur_kwh, 0.0);
        assert_eq!(bill.energy_term_eur, 0.0);
        // Fixed terms still accrue.
        assert!(bill.total_eur > 0.0);
    }

    #[rstest]
    #[case(100.0, 3.45, 30)]
    #[case(350.0, 4.6, 60)]
    #[case(3500.0, 5.75, 365)]
    fn all_components_are_non_negative(
        #[case] kwh: f64,
        #[case] kw: f64,
        #[case] days: u32,
    ) {
        let bill = simulate(kwh, kw, days, 0.23);
        for v in [
            bill.energy_term_eur,
            bill.power_term_eur,
            bill.meter_rental_eur,
            bill.excise_tax_eur,
            bill.vat_eur,
            bill.total_eur,
        ] {
            assert!(v >= 0.0);
        }
    }

    #[test]
    fn comparison_is_sorted_by_total_ascending() {
        let tariffs = vec![
            ("Cara".to_string(), 1.35),
            ("PVPC".to_string(), 1.0),
            ("Fixa".to_string(), 1.15),
        ];
        let ranked = compare(300.0, 4.6, 30, 0.2, &tariffs);
        assert_eq!(ranked[0].tariff_name, "PVPC");
        assert_eq!(ranked[1].tariff_name, "Fixa");
        assert_eq!(ranked[2].tariff_name, "Cara");
        assert!(ranked.windows(2).all(|w| {
            w[0].breakdown.total_eur <= w[1].breakdown.total_eur
        }));
    }

    #[test]
    fn equal_totals_keep_input_order() {
        let tariffs = vec![
            ("Primera".to_string(), 1.1),
            ("Segona".to_string(), 1.1),
            ("Tercera".to_string(), 1.1),
        ];
        let ranked = compare(300.0, 4.6, 30, 0.2, &tariffs);
        let names: Vec<&str> = ranked.iter().map(|c| c.tariff_name.as_str()).collect();
        assert_eq!(names, ["Primera", "Segona", "Tercera"]);
    }

    #[test]
    fn comparison_records_factor_and_price() {
        let tariffs = vec![("Fixa".to_string(), 1.15)];
        let ranked = compare(300.0, 4.6, 30, 0.2, &tariffs);
        assert_eq!(ranked[0].factor_vs_baseline, 1.15);
        assert!((ranked[0].price_eur_kwh - 0.23).abs() < EPS);
    }

    #[test]
    fn switching_to_a_cheaper_price_saves_money() {
        let (saving, percent) = switch_savings(3500.0, 4.6, 0.25, 0.20);
        assert!(saving > 0.0);
        assert!(percent > 0.0 && percent < 100.0);
    }

    #[test]
    fn equal_prices_save_nothing() {
        let (saving, percent) = switch_savings(3500.0, 4.6, 0.22, 0.22);
        assert!(saving.abs() < EPS);
        assert!(percent.abs() < EPS);
    }

    proptest! {
        #[test]
        fn total_is_monotone_in_consumption(
            kwh in 0.0f64..50_000.0,
            extra in 0.0f64..10_000.0,
            kw in 1.0f64..15.0,
            days in 1u32..365,
            price in 0.05f64..1.0,
        ) {
            let a = simulate(kwh, kw, days, price);
            let b = simulate(kwh + extra, kw, days, price);
            prop_assert!(b.total_eur >= a.total_eur - EPS);
        }

        #[test]
        fn total_is_monotone_in_power_and_days(
            kwh in 0.0f64..50_000.0,
            kw in 1.0f64..15.0,
            extra_kw in 0.0f64..10.0,
            days in 1u32..364,
            price in 0.05f64..1.0,
        ) {
            let a = simulate(kwh, kw, days, price);
            let b = simulate(kwh, kw + extra_kw, days, price);
            let c = simulate(kwh, kw, days + 1, price);
            prop_assert!(b.total_eur >= a.total_eur - EPS);
            prop_assert!(c.total_eur >= a.total_eur - EPS);
        }

        #[test]
        fn tax_identity_holds(
            kwh in 0.0f64..50_000.0,
            kw in 0.0f64..15.0,
            days in 0u32..730,
            price in 0.0f64..1.0,
        ) {
            let bill = simulate(kwh, kw, days, price);
            let expected = (bill.energy_term_eur + bill.power_term_eur + bill.meter_rental_eur)
                * (1.0 + EXCISE_RATE)
                * (1.0 + VAT_RATE);
            prop_assert!((bill.total_eur - expected).abs() < 1e-6);
        }
    }
}
