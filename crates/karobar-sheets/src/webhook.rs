//! # Write Path: Automation Webhooks
//!
//! All mutations leave through per-intent automation webhooks; nothing in
//! this workspace writes to the spreadsheet directly. The payload the
//! dashboard assembled is POSTed as-is - the receiving automation owns
//! validation and sheet placement, and the next fetch makes the write
//! visible.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::config::SheetsConfig;
use crate::error::{SheetsError, SheetsResult};

// =============================================================================
// Write Intents
// =============================================================================

/// The mutations the dashboard can request. Each maps to one configured
/// webhook URL; see [`SheetsConfig::webhook_url`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteIntent {
    AddCustomer,
    AddProduct,
    AddVendor,
    UpdatePrice,
    UpdateStock,
    DeleteProduct,
    SubmitOrder,
    AssignDelivery,
}

impl WriteIntent {
    /// Stable label used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteIntent::AddCustomer => "add_customer",
            WriteIntent::AddProduct => "add_product",
            WriteIntent::AddVendor => "add_vendor",
            WriteIntent::UpdatePrice => "update_price",
            WriteIntent::UpdateStock => "update_stock",
            WriteIntent::DeleteProduct => "delete_product",
            WriteIntent::SubmitOrder => "submit_order",
            WriteIntent::AssignDelivery => "assign_delivery",
        }
    }
}

// =============================================================================
// Webhook Client
// =============================================================================

/// Posts write payloads to the configured automation endpoints.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
    config: SheetsConfig,
}

impl WebhookClient {
    /// Builds a client with the configured per-request timeout.
    pub fn new(config: SheetsConfig) -> SheetsResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(WebhookClient { http, config })
    }

    /// Submits one write. The payload goes out unchanged.
    ///
    /// An unconfigured intent fails immediately with
    /// [`SheetsError::WebhookNotConfigured`]; a non-2xx answer becomes
    /// [`SheetsError::Webhook`] with the status attached. There is no retry:
    /// the user sees the failure and decides.
    #[instrument(skip(self, payload), fields(intent = intent.as_str()))]
    pub async fn submit(&self, intent: WriteIntent, payload: Value) -> SheetsResult<()> {
        let url = self
            .config
            .webhook_url(intent)
            .ok_or(SheetsError::WebhookNotConfigured(intent))?;

        let response = self.http.post(url).json(&payload).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "webhook rejected submission");
            return Err(SheetsError::Webhook {
                intent,
                status: status.as_u16(),
            });
        }

        info!("webhook accepted submission");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn unconfigured() -> SheetsConfig {
        SheetsConfig {
            proxy_url: "http://proxy".into(),
            api_key: None,
            request_timeout_secs: 5,
            webhook_add_customer: None,
            webhook_add_product: None,
            webhook_add_vendor: None,
            webhook_update_price: None,
            webhook_update_stock: None,
            webhook_delete_product: None,
            webhook_submit_order: None,
            webhook_assign_delivery: None,
        }
    }

    #[tokio::test]
    async fn test_unconfigured_intent_fails_without_network() {
        let client = WebhookClient::new(unconfigured()).unwrap();
        let err = client
            .submit(WriteIntent::SubmitOrder, serde_json::json!({"order_id": "ORD-001"}))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SheetsError::WebhookNotConfigured(WriteIntent::SubmitOrder)
        ));
    }

    #[test]
    fn test_intent_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&WriteIntent::AssignDelivery).unwrap(),
            "\"assign_delivery\""
        );
        assert_eq!(WriteIntent::UpdateStock.as_str(), "update_stock");
    }
}
