use axum::Json;
use serde::Deserialize;

use crate::{domain::InvoiceFields, invoice};

#[derive(Debug, Deserialize)]
pub struct ParseInvoiceRequest {
    /// Raw OCR text of the bill, any length, any language.
    pub text: String,
}

/// POST /api/v1/invoice/parse
///
/// Extraction is best-effort: fields the parser could not place come back
/// null and the caller should prompt for manual entry.
pub async fn parse_invoice(Json(req): Json<ParseInvoiceRequest>) -> Json<InvoiceFields> {
    Json(invoice::extract(&req.text))
}
