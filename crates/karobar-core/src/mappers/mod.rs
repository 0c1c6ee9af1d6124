//! # Record Mappers
//!
//! One mapper per entity: `(Table, today) -> Vec<Record>`. Mappers are the
//! only place raw cells are read; everything downstream works with named,
//! typed fields.
//!
//! ## Contract (identical for every mapper)
//!
//! - **Never errors.** A row that cannot be decoded is logged at `warn`
//!   level and skipped; mapping continues with the remaining rows. No
//!   partial record is ever emitted for a failed row.
//! - **Missing columns are not errors.** The resolver returns `None` and
//!   the mapper substitutes the default from the table below.
//! - **Output order = input order**, except where documented: Customer
//!   deduplicates by `shop_id` (first occurrence wins), and the purchase
//!   aggregations emit one record per distinct key in order of first
//!   appearance.
//! - **Deterministic.** "Today" is a parameter; the same input always
//!   produces deep-equal output.
//!
//! ## Defaults Table
//!
//! When a column is absent (or a cell is empty), every mapper substitutes
//! from this one table rather than inventing per-call-site defaults:
//!
//! | Field kind              | Default            |
//! |-------------------------|--------------------|
//! | text (names, IDs, links)| `""`               |
//! | vendor/rider label      | `"Unknown"`        |
//! | amount                  | `Rs 0.00`          |
//! | quantity                | `0`                |
//! | date                    | never / unknown    |
//! | return items            | empty list         |
//!
//! The key field of each entity (Shop_ID, Product_ID, ...) is the one
//! exception: a row without it is skipped, because a record that cannot be
//! referenced is useless to every screen.

mod customer;
mod delivery;
mod order;
mod product;
mod purchase;
mod vendor;

pub use customer::map_customers;
pub use delivery::map_deliveries;
pub use order::{map_orders, normalize_order_id};
pub use product::map_products;
pub use purchase::{map_purchase_lines, map_vendor_performance};
pub use vendor::{map_vendors, next_vendor_id};

/// Label substituted when a foreign key points at nothing.
pub const UNKNOWN_LABEL: &str = "Unknown";
