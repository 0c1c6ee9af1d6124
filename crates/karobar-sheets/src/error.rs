//! Boundary error types.
//!
//! These are the only failures the dashboard ever has to handle itself;
//! everything row-level is recovered inside karobar-core's mappers.

use thiserror::Error;

use crate::webhook::WriteIntent;

/// Failures at the network edge.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// Transport-level failure (connect, timeout, TLS, bad JSON body).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The proxy answered but reported `success: false`.
    #[error("proxy reported failure for sheet '{sheet}': {message}")]
    Api { sheet: String, message: String },

    /// The proxy claimed success but sent no `data` array.
    #[error("proxy response for sheet '{sheet}' is missing data")]
    MissingData { sheet: String },

    /// Username/password did not match any staff row.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No webhook URL configured for this write intent.
    #[error("no webhook configured for {0:?}")]
    WebhookNotConfigured(WriteIntent),

    /// The webhook endpoint rejected the submission.
    #[error("webhook {intent:?} rejected with status {status}")]
    Webhook { intent: WriteIntent, status: u16 },

    /// Configuration problem at startup.
    #[error("invalid configuration value for {0}")]
    InvalidConfig(String),
}

/// Convenience alias for boundary results.
pub type SheetsResult<T> = Result<T, SheetsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SheetsError::Api {
            sheet: "Customers".into(),
            message: "quota exceeded".into(),
        };
        assert_eq!(
            err.to_string(),
            "proxy reported failure for sheet 'Customers': quota exceeded"
        );

        assert_eq!(
            SheetsError::MissingData { sheet: "Orders".into() }.to_string(),
            "proxy response for sheet 'Orders' is missing data"
        );
        assert_eq!(SheetsError::InvalidCredentials.to_string(), "invalid credentials");
    }
}
