/// Exchange rate payload and its flattened row representation
///
/// The upstream API returns `{base, rates: {date: {currency: rate}}}`.
/// Flattening produces one `RateRow` per (date, target currency) pair.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while decoding a raw rate payload
#[derive(Debug, Error)]
pub enum RateDocumentError {
    #[error("Invalid rate document: {0}")]
    InvalidJson(String),
}

/// One ingested rate payload for a base currency and date range
///
/// Unknown upstream fields (`amount`, `start_date`, `end_date`) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateDocument {
    /// Base currency code (e.g. "USD")
    pub base: String,
    /// date -> (target currency -> rate)
    #[serde(default)]
    pub rates: BTreeMap<String, BTreeMap<String, f64>>,
}

/// One flattened (date, target currency) observation
///
/// Field order is the column order of every processed artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRow {
    pub base_currency: String,
    pub target_currency: String,
    pub rate: f64,
    pub date: String,
}

impl RateDocument {
    /// Decode a raw JSON object body
    pub fn from_slice(bytes: &[u8]) -> Result<Self, RateDocumentError> {
        serde_json::from_slice(bytes).map_err(|e| RateDocumentError::InvalidJson(e.to_string()))
    }

    /// Number of rows `flatten` will produce
    pub fn row_count(&self) -> usize {
        self.rates.values().map(BTreeMap::len).sum()
    }

    /// Flatten the nested rate map into rows
    ///
    /// Rows are ordered by date, then by target currency.
    pub fn flatten(&self) -> Vec<RateRow> {
        let mut rows = Vec::with_capacity(self.row_count());

        for (date, rates) in &self.rates {
            for (currency, rate) in rates {
                rows.push(RateRow {
                    base_currency: self.base.clone(),
                    target_currency: currency.clone(),
                    rate: *rate,
                    date: date.clone(),
                });
            }
        }

        rows
    }
}
