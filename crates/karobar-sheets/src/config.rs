//! Edge configuration.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults, so a dev checkout runs against the staging proxy with zero
//! setup.

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::SheetsError;
use crate::webhook::WriteIntent;

/// Configuration for the proxy client and the webhook client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    /// Base URL of the spreadsheet REST proxy.
    pub proxy_url: String,

    /// Optional API key forwarded as a query parameter.
    pub api_key: Option<String>,

    /// Per-request timeout in seconds. The source dashboard had none and a
    /// hung request stalled the view indefinitely; this bounds it.
    pub request_timeout_secs: u64,

    /// Webhook endpoints, one per write intent. A missing URL means that
    /// write path is disabled (submit returns `WebhookNotConfigured`).
    pub webhook_add_customer: Option<String>,
    pub webhook_add_product: Option<String>,
    pub webhook_add_vendor: Option<String>,
    pub webhook_update_price: Option<String>,
    pub webhook_update_stock: Option<String>,
    pub webhook_delete_product: Option<String>,
    pub webhook_submit_order: Option<String>,
    pub webhook_assign_delivery: Option<String>,
}

impl SheetsConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, SheetsError> {
        Ok(SheetsConfig {
            proxy_url: env::var("KAROBAR_PROXY_URL")
                .unwrap_or_else(|_| "http://localhost:8787/api/sheets".to_string()),

            api_key: env::var("KAROBAR_API_KEY").ok(),

            request_timeout_secs: env::var("KAROBAR_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .map_err(|_| SheetsError::InvalidConfig("KAROBAR_REQUEST_TIMEOUT_SECS".into()))?,

            webhook_add_customer: env::var("KAROBAR_WEBHOOK_ADD_CUSTOMER").ok(),
            webhook_add_product: env::var("KAROBAR_WEBHOOK_ADD_PRODUCT").ok(),
            webhook_add_vendor: env::var("KAROBAR_WEBHOOK_ADD_VENDOR").ok(),
            webhook_update_price: env::var("KAROBAR_WEBHOOK_UPDATE_PRICE").ok(),
            webhook_update_stock: env::var("KAROBAR_WEBHOOK_UPDATE_STOCK").ok(),
            webhook_delete_product: env::var("KAROBAR_WEBHOOK_DELETE_PRODUCT").ok(),
            webhook_submit_order: env::var("KAROBAR_WEBHOOK_SUBMIT_ORDER").ok(),
            webhook_assign_delivery: env::var("KAROBAR_WEBHOOK_ASSIGN_DELIVERY").ok(),
        })
    }

    /// The webhook URL for a write intent, if configured.
    pub fn webhook_url(&self, intent: WriteIntent) -> Option<&str> {
        let url = match intent {
            WriteIntent::AddCustomer => &self.webhook_add_customer,
            WriteIntent::AddProduct => &self.webhook_add_product,
            WriteIntent::AddVendor => &self.webhook_add_vendor,
            WriteIntent::UpdatePrice => &self.webhook_update_price,
            WriteIntent::UpdateStock => &self.webhook_update_stock,
            WriteIntent::DeleteProduct => &self.webhook_delete_product,
            WriteIntent::SubmitOrder => &self.webhook_submit_order,
            WriteIntent::AssignDelivery => &self.webhook_assign_delivery,
        };
        url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_config() -> SheetsConfig {
        SheetsConfig {
            proxy_url: "http://proxy".into(),
            api_key: None,
            request_timeout_secs: 30,
            webhook_add_customer: Some("http://hooks/add-customer".into()),
            webhook_add_product: None,
            webhook_add_vendor: None,
            webhook_update_price: None,
            webhook_update_stock: None,
            webhook_delete_product: None,
            webhook_submit_order: None,
            webhook_assign_delivery: None,
        }
    }

    #[test]
    fn test_webhook_url_lookup() {
        let config = bare_config();
        assert_eq!(
            config.webhook_url(WriteIntent::AddCustomer),
            Some("http://hooks/add-customer")
        );
        assert_eq!(config.webhook_url(WriteIntent::SubmitOrder), None);
    }
}
