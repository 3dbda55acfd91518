//! Linear trend projection of monthly consumption.
//!
//! A deliberately simple least-squares fit over the row order of the
//! history; rows are the time axis, no calendar arithmetic. Shares the
//! plain-kWh data model of the billing side.

use serde::{Deserialize, Serialize};

/// Abbreviated Catalan month labels, as shown in the consumption charts.
pub const MONTHS: [&str; 12] = [
    "Gen", "Feb", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Des",
];

pub const HORIZON_MONTHS: usize = 12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyConsumption {
    pub month: String,
    pub consumption_kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: String,
    pub predicted_kwh: f64,
}

/// Labels for the 12 months following `last_label`, wrapping the year;
/// generic "Futur_n" labels when the input is not a known month.
fn next_month_labels(last_label: &str) -> Vec<String> {
    if let Some(idx) = MONTHS.iter().position(|m| *m == last_label) {
        (0..HORIZON_MONTHS)
            .map(|i| MONTHS[(idx + i + 1) % 12].to_string())
            .collect()
    } else {
        (0..HORIZON_MONTHS)
            .map(|i| format!("Futur_{}", i + 1))
            .collect()
    }
}

/// Projects the next 12 months of consumption from an ordered history.
///
/// Empty history yields 12 zero points; a degenerate fit (single row, or
/// no variance in the index) yields a flat line at the mean.
pub fn predict_consumption(history: &[MonthlyConsumption]) -> Vec<ForecastPoint> {
    if history.is_empty() {
        return next_month_labels("")
            .into_iter()
            .map(|month| ForecastPoint {
                month,
                predicted_kwh: 0.0,
            })
            .collect();
    }

    let n = history.len() as f64;
    let mean_x = (history.len() - 1) as f64 / 2.0;
    let mean_y: f64 = history.iter().map(|r| r.consumption_kwh).sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (i, row) in history.iter().enumerate() {
        let dx = i as f64 - mean_x;
        sxx += dx * dx;
        sxy += dx * (row.consumption_kwh - mean_y);
    }

    let (slope, intercept) = if sxx > 0.0 {
        let slope = sxy / sxx;
        (slope, mean_y - slope * mean_x)
    } else {
        (0.0, mean_y)
    };

    let labels = next_month_labels(&history[history.len() - 1].month);
    labels
        .into_iter()
        .enumerate()
        .map(|(i, month)| {
            let x = (history.len() + i) as f64;
            ForecastPoint {
                month,
                predicted_kwh: slope * x + intercept,
            }
        })
        .collect()
}
