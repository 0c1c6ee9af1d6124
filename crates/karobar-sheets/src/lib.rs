//! # karobar-sheets: The Network Edge
//!
//! Adapter between the outside world and [`karobar_core`]:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        karobar-sheets                                   │
//! │                                                                         │
//! │  Spreadsheet REST proxy ──► SheetsClient::fetch_table ──► Table ──►     │
//! │                             (validates {success, data})    karobar-core │
//! │                                                                         │
//! │  Staff sheet ──► authenticate ──► Session ──► SessionManager            │
//! │                                               (login / logout / read)   │
//! │                                                                         │
//! │  Dashboard form state ──► WebhookClient::submit ──► automation webhook  │
//! │                           (payload passed through UNCHANGED)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//!
//! A failed or unsuccessful fetch is a hard [`SheetsError`]: the mappers in
//! karobar-core are never handed a bad payload - either the fetch validated
//! cleanly and the core runs, or the dashboard shows the error and offers a
//! manual refresh. There is no retry/backoff; a per-request timeout keeps a
//! hung proxy from stalling a view forever.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod webhook;

pub use auth::{authenticate, Session, SessionManager};
pub use client::SheetsClient;
pub use config::SheetsConfig;
pub use error::SheetsError;
pub use webhook::{WebhookClient, WriteIntent};

/// Installs the process-wide tracing subscriber, honoring `RUST_LOG`.
///
/// Call once at startup from whatever hosts this crate.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}
