//! Heuristic extraction of invoice fields from OCR text.
//!
//! Each field is recovered by an ordered cascade of regular expressions,
//! most specific first, each pattern's preferred match guarded by a
//! plausibility range.
//! The pattern set covers the vocabulary of the large Spanish utilities
//! (Endesa, Iberdrola, Naturgy) in Spanish and Catalan. Extraction never
//! fails: a field no pattern can place simply stays unset.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::InvoiceFields;

/// Which of a pattern's matches to prefer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pick {
    First,
    /// Billing totals usually appear after the itemized lines, so the
    /// last occurrence is the most trustworthy.
    Last,
}

/// How a matched substring becomes an f64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberFormat {
    /// Decimal comma or dot, no grouping: "4,6" or "4.6".
    Plain,
    /// Currency style with optional thousands separators: "1.234,56".
    Currency,
}

/// One field's extraction rule: the cascade plus its plausibility range.
struct FieldRule {
    patterns: &'static Lazy<Vec<Regex>>,
    /// Accepted values lie strictly inside or on these bounds.
    min: f64,
    max: f64,
    inclusive: bool,
    pick: Pick,
    format: NumberFormat,
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("invoice pattern must compile"))
        .collect()
}

static CONSUMPTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"consumo\s*(?:activo|activa)?\s*[:\s]*(\d+(?:[.,]\d+)?)\s*k?wh",
        r"energ[ií]a\s*activa\s*[:\s]*(\d+(?:[.,]\d+)?)\s*k?wh",
        r"(\d+(?:[.,]\d+)?)\s*kwh",
        r"(\d+(?:[.,]\d+)?)\s*k\s*wh",
        r"consum\s*[:\s]*(\d+(?:[.,]\d+)?)",
    ])
});

static POWER_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"potencia\s*(?:contractada|contratada)\s*[:\s]*(\d+(?:[.,]\d+)?)\s*kw",
        r"potencia\s*[:\s]*(\d+(?:[.,]\d+)?)\s*kw",
        r"(\d+(?:[.,]\d+)?)\s*kw\s*(?:contractada|contratada)?",
        r"(\d[,.]?\d)\s*kw",
    ])
});

static AMOUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"total\s*(?:a\s*pagar|factura)?\s*[:\s]*(\d+(?:[.,]\d+)?)\s*€?",
        r"importe\s*total\s*[:\s]*(\d+(?:[.,]\d+)?)",
        r"(\d+(?:[.,]\d+)?)\s*€\s*(?:total|final)?",
        r"total\s*[:\s]*(\d+(?:[.,]\d+)?)\s*eur",
        r"(\d{1,3}(?:[.,]\d{3})*(?:[.,]\d{2})?)\s*€",
    ])
});

static PERIOD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    compile(&[
        r"(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})\s*[-a]\s*(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})",
        r"desde\s*(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})\s*hasta\s*(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})",
        r"periodo\s*[:\s]*(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})\s*[-a]\s*(\d{1,2}[/\-]\d{1,2}[/\-]\d{2,4})",
    ])
});

static CONSUMPTION_RULE: FieldRule = FieldRule {
    patterns: &CONSUMPTION_PATTERNS,
    min: 1.0,
    max: 100_000.0,
    inclusive: false,
    pick: Pick::First,
    format: NumberFormat::Plain,
};

static POWER_RULE: FieldRule = FieldRule {
    patterns: &POWER_PATTERNS,
    min: 1.0,
    max: 15.0,
    inclusive: true,
    pick: Pick::First,
    format: NumberFormat::Plain,
};

static AMOUNT_RULE: FieldRule = FieldRule {
    patterns: &AMOUNT_PATTERNS,
    min: 1.0,
    max: 5_000.0,
    inclusive: false,
    pick: Pick::Last,
    format: NumberFormat::Currency,
};

impl FieldRule {
    fn in_range(&self, value: f64) -> bool {
        if self.inclusive {
            value >= self.min && value <= self.max
        } else {
            value > self.min && value < self.max
        }
    }

    fn parse(&self, raw: &str) -> Option<f64> {
        let normalized = match self.format {
            NumberFormat::Plain => raw.replace(',', "."),
            // Grouping dots are dropped first, then the decimal comma.
            NumberFormat::Currency => raw.replace('.', "").replace(',', "."),
        };
        normalized.parse::<f64>().ok()
    }

    /// Runs the cascade over already-lowercased text. Each pattern is
    /// judged by its preferred match only (first, or last for billing
    /// totals): if that value is implausible the whole pattern is skipped
    /// and the cascade advances. Candidates that fail to parse as numbers
    /// do not count as the preferred match.
    fn extract(&self, text: &str) -> Option<f64> {
        for pattern in self.patterns.iter() {
            let candidates: Vec<&str> = pattern
                .captures_iter(text)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str())
                .collect();

            let mut picked: Box<dyn Iterator<Item = &&str>> = match self.pick {
                Pick::First => Box::new(candidates.iter()),
                Pick::Last => Box::new(candidates.iter().rev()),
            };
            if let Some(value) = picked.find_map(|raw| self.parse(raw)) {
                if self.in_range(value) {
                    return Some(value);
                }
            }
        }
        None
    }
}

fn extract_period(text: &str) -> Option<(String, String)> {
    for pattern in PERIOD_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(text) {
            if let (Some(start), Some(end)) = (caps.get(1), caps.get(2)) {
                return Some((start.as_str().to_string(), end.as_str().to_string()));
            }
        }
    }
    None
}

/// Extracts consumption, contracted power, total amount and billing-period
/// boundaries from raw OCR text.
///
/// Case-insensitive, deterministic, single pass per field. Absent or
/// implausible values stay `None` rather than erroring out.
pub fn extract(raw_text: &str) -> InvoiceFields {
    let text = raw_text.to_lowercase();

    let (period_start, period_end) = match extract_period(&text) {
        Some((start, end)) => (Some(start), Some(end)),
        None => (None, None),
    };

    InvoiceFields {
        consumption_kwh: CONSUMPTION_RULE.extract(&text),
        contracted_power_kw: POWER_RULE.extract(&text),
        total_amount_eur: AMOUNT_RULE.extract(&text),
        period_start,
        period_end,
        raw_text: raw_text.to_string(),
    }
}
