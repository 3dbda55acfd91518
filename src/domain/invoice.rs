use serde::{Deserialize, Serialize};

/// Fields recovered from the OCR text of an electricity invoice.
///
/// Extraction is best-effort: a field the parser could not locate, or whose
/// value fell outside its plausibility range, stays `None`. Callers must
/// treat `None` as "ask the user", never as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceFields {
    pub consumption_kwh: Option<f64>,
    pub contracted_power_kw: Option<f64>,
    pub total_amount_eur: Option<f64>,
    /// Billing-period boundaries as they appeared in the text; deliberately
    /// not parsed into date types.
    pub period_start: Option<String>,
    pub period_end: Option<String>,
    pub raw_text: String,
}

impl InvoiceFields {
    pub fn empty(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Self::default()
        }
    }

    /// True when at least one numeric field was recovered.
    pub fn has_any_value(&self) -> bool {
        self.consumption_kwh.is_some()
            || self.contracted_power_kw.is_some()
            || self.total_amount_eur.is_some()
    }
}
