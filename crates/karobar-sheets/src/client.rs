//! # Tabular Data Source Adapter
//!
//! Wraps the spreadsheet REST proxy. One call per sheet, returning a
//! validated [`Table`] or a hard error - mappers never see a failed fetch.
//!
//! ## Wire Shape
//! ```text
//! GET {proxy_url}?sheet=Customers[&key=...]
//!
//! { "success": true,
//!   "data": [ ["Shop_ID", "Shop_Name", ...],     <- row 0 = headers
//!             ["SH-001", "Bismillah Store", ...],
//!             ... ],
//!   "error": null }
//! ```
//!
//! Cells arrive as arbitrary JSON scalars (the proxy does not promise
//! strings) and are normalized here: null becomes `""`, numbers and bools
//! are stringified. Short rows pass through; the core's `Row::cell` reads
//! missing trailing cells as empty.

use futures::future::try_join_all;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use karobar_core::table::Table;

use crate::config::SheetsConfig;
use crate::error::{SheetsError, SheetsResult};

/// Async client for the spreadsheet REST proxy.
#[derive(Debug, Clone)]
pub struct SheetsClient {
    http: reqwest::Client,
    proxy_url: String,
    api_key: Option<String>,
}

/// The proxy's response envelope.
#[derive(Debug, Deserialize)]
struct FetchEnvelope {
    success: bool,
    data: Option<Vec<Vec<Value>>>,
    error: Option<String>,
}

impl SheetsClient {
    /// Builds a client with the configured per-request timeout.
    pub fn new(config: &SheetsConfig) -> SheetsResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(SheetsClient {
            http,
            proxy_url: config.proxy_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Fetches one sheet and validates the envelope.
    ///
    /// `success: false` or a missing `data` array is a hard error here, at
    /// the boundary - by the time a [`Table`] exists, it is safe to map.
    #[instrument(skip(self))]
    pub async fn fetch_table(&self, sheet: &str) -> SheetsResult<Table> {
        let mut request = self.http.get(&self.proxy_url).query(&[("sheet", sheet)]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        let envelope: FetchEnvelope = request.send().await?.error_for_status()?.json().await?;
        let table = table_from_envelope(sheet, envelope)?;
        debug!(sheet, rows = table.len(), "fetched sheet");
        Ok(table)
    }

    /// Fetches several sheets concurrently (fan-out/fan-in).
    ///
    /// Tables come back in argument order. The branches are independent:
    /// each table's mapping needs nothing from the others.
    pub async fn fetch_tables(&self, sheets: &[&str]) -> SheetsResult<Vec<Table>> {
        try_join_all(sheets.iter().map(|sheet| self.fetch_table(sheet))).await
    }
}

/// Envelope validation + cell normalization, separated from the transport
/// so it is testable without a server.
fn table_from_envelope(sheet: &str, envelope: FetchEnvelope) -> SheetsResult<Table> {
    if !envelope.success {
        let message = envelope.error.unwrap_or_else(|| "unspecified".to_string());
        warn!(sheet, %message, "proxy reported failure");
        return Err(SheetsError::Api {
            sheet: sheet.to_string(),
            message,
        });
    }

    let grid = envelope.data.ok_or_else(|| SheetsError::MissingData {
        sheet: sheet.to_string(),
    })?;

    let grid: Vec<Vec<String>> = grid
        .into_iter()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    Ok(Table::from_grid(grid))
}

/// Normalizes one JSON cell to the string form the core parses.
fn cell_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        // nested structures should not occur; keep them inspectable
        other => other.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> FetchEnvelope {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_successful_envelope_becomes_table() {
        let env = envelope(
            r#"{ "success": true,
                 "data": [["Shop_ID", "Credit_Limit"], ["SH-001", 1000], [null, true]] }"#,
        );
        let table = table_from_envelope("Customers", env).unwrap();
        assert_eq!(table.headers(), &["Shop_ID", "Credit_Limit"]);
        assert_eq!(table.len(), 2);

        // numeric, null, and bool cells normalized to strings
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].cell(Some(1)), "1000");
        assert_eq!(rows[1].cell(Some(0)), "");
        assert_eq!(rows[1].cell(Some(1)), "true");
    }

    #[test]
    fn test_failure_envelope_is_hard_error() {
        let env = envelope(r#"{ "success": false, "error": "quota exceeded" }"#);
        let err = table_from_envelope("Orders", env).unwrap_err();
        assert!(matches!(err, SheetsError::Api { .. }));
        assert!(err.to_string().contains("quota exceeded"));
    }

    #[test]
    fn test_missing_data_is_hard_error() {
        let env = envelope(r#"{ "success": true }"#);
        let err = table_from_envelope("Orders", env).unwrap_err();
        assert!(matches!(err, SheetsError::MissingData { .. }));
    }

    #[test]
    fn test_empty_grid_is_valid_empty_table() {
        let env = envelope(r#"{ "success": true, "data": [] }"#);
        let table = table_from_envelope("Vendors", env).unwrap();
        assert!(table.is_empty());
    }
}
