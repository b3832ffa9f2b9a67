use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

use crate::error::FetchError;

/// One customer's invoice as returned by the invoice API
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct InvoiceRecord {
    pub customer_name: String,
    #[serde(default)]
    pub line_items: Vec<LineItem>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub total: Decimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub profit: Decimal,
}

/// A product line on an invoice. Totals are computed by the server.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LineItem {
    pub name: String,
    #[serde(deserialize_with = "lenient_decimal")]
    pub quantity: Decimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub item_total: Decimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub item_profit: Decimal,
}

impl InvoiceRecord {
    pub fn new(customer_name: impl Into<String>, total: Decimal, profit: Decimal) -> Self {
        Self {
            customer_name: customer_name.into(),
            line_items: Vec::new(),
            total,
            profit,
        }
    }

    pub fn with_item(mut self, item: LineItem) -> Self {
        self.line_items.push(item);
        self
    }
}

impl LineItem {
    pub fn new(
        name: impl Into<String>,
        quantity: Decimal,
        item_total: Decimal,
        item_profit: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            quantity,
            item_total,
            item_profit,
        }
    }
}

/// Convert a JSON number to a decimal through its shortest text form.
/// Values beyond the decimal range are clamped instead of failing the decode.
fn decimal_from_f64(value: f64) -> Decimal {
    if let Ok(decimal) = Decimal::from_str(&value.to_string()) {
        return decimal;
    }
    if let Some(decimal) = Decimal::from_f64(value) {
        return decimal;
    }
    tracing::warn!(value, "amount outside decimal range, clamping");
    if value.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

fn lenient_decimal<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
    f64::deserialize(deserializer).map(decimal_from_f64)
}

/// Decode an API response body into invoice records
pub fn parse_invoices(body: &str) -> Result<Vec<InvoiceRecord>, FetchError> {
    Ok(serde_json::from_str(body)?)
}
