//! # karobar-core: Pure Analytics for the Karobar Dashboard
//!
//! This crate is the **heart** of Karobar. It turns raw spreadsheet rows into
//! typed, annotated business records as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Karobar Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Browser Dashboard (external)                    │   │
//! │  │    Admin view ──► Sales view ──► Rider view ──► Forms           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                karobar-sheets (boundary crate)                  │   │
//! │  │    fetch_table, authenticate, webhook submit                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Table (headers + rows)                 │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ karobar-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   table   │  │  mappers  │  │  metrics  │  │  summary  │   │   │
//! │  │   │  resolver │  │ Customer  │  │  credit   │  │ dashboard │   │   │
//! │  │   │   cells   │  │ Delivery… │  │  priority │  │   top-N   │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS • SAME IN = SAME OUT     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`table`] - Tabular grid type and tolerant column resolution
//! - [`parse`] - Safe cell parsers (amounts, dates, return-item payloads)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Domain records (Customer, Product, Delivery, etc.)
//! - [`metrics`] - Derived-metric calculators (credit status, priority matrix)
//! - [`mappers`] - Per-entity `(Table, today) -> Vec<Record>` mapping
//! - [`summary`] - Dashboard aggregations and top-performer extraction
//! - [`query`] - Filter / sort / search over mapped records
//! - [`error`] - Row-level decode errors (recovered, never propagated)
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same `(headers, rows, today)` always yields the
//!    same records - "today" is an explicit parameter, never read from a clock
//! 2. **No I/O**: the spreadsheet proxy, webhooks, and session storage live
//!    in karobar-sheets; this crate only ever sees an in-memory [`Table`]
//! 3. **Never throw across the mapper boundary**: a bad row is logged and
//!    skipped; a missing column substitutes a documented default
//! 4. **Integer Money**: all amounts are paisas (i64), ratios are guarded f64
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use karobar_core::mappers::map_customers;
//! use karobar_core::table::Table;
//!
//! let table = Table::from_grid(vec![
//!     vec!["Shop_ID".into(), "Credit_Limit".into(), "Current_Balance".into()],
//!     vec!["SH-001".into(), "1000".into(), "900".into()],
//! ]);
//! let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
//!
//! let customers = map_customers(&table, today);
//! assert_eq!(customers.len(), 1);
//! assert_eq!(customers[0].utilization_pct, 90.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod mappers;
pub mod metrics;
pub mod money;
pub mod parse;
pub mod query;
pub mod summary;
pub mod table;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use karobar_core::Money` instead of
// `use karobar_core::money::Money`

pub use error::{RowError, RowResult};
pub use money::Money;
pub use query::{Query, Queryable, SortOrder};
pub use table::Table;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Stock quantity below which a product is flagged low-stock.
///
/// ## Business Reason
/// Distribution shops reorder in case lots; under ten units of anything means
/// the next van run should restock it.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// A shop counts as recently visited when last seen within this many days.
pub const RECENT_VISIT_DAYS: i64 = 7;

/// A shop needs a follow-up visit after this many days without one.
/// Shops with no recorded visit at all always need a follow-up.
pub const FOLLOW_UP_DAYS: i64 = 30;

/// Credit utilization (percent) above which an outstanding balance is
/// escalated from `Outstanding` to `OverLimit`.
pub const OVER_LIMIT_UTILIZATION_PCT: f64 = 80.0;

/// A product not purchased within this many days counts as stale for the
/// purchase-priority matrix.
pub const STALE_PURCHASE_DAYS: i64 = 30;

/// A delivery counts as recent when completed within this many days.
pub const RECENT_DELIVERY_DAYS: i64 = 1;
