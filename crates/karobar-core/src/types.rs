//! # Domain Types
//!
//! Typed projections over the spreadsheet rows, built fresh on every fetch
//! cycle and never mutated afterwards.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Records                                  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Customer     │   │    Product      │   │    Delivery     │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  shop_id (key)  │   │  product_id     │   │  order_id       │        │
//! │  │  balances       │   │  prices, stock  │   │  rider, cash    │        │
//! │  │  + utilization  │   │  + margin       │   │  + returns      │        │
//! │  │  + CreditStatus │   │  + low-stock    │   │  + DeliveryStatus│       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐  ┌──────────────────┐       │
//! │  │  Order / Vendor │   │  PurchaseLine    │  │ VendorPerformance│       │
//! │  │  row-per-record │   │  folded per      │  │ folded per       │       │
//! │  │                 │   │  product         │  │ vendor           │       │
//! │  └─────────────────┘   └──────────────────┘  └──────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Derived Fields
//! Every derived field (utilization, margin, days-since, risk, priority) is
//! computed exactly once, at construction inside the mapper. Records are
//! read-only after that - a new fetch cycle replaces the whole sequence.
//!
//! All relationships are foreign-key string equality (shop_id, product_id,
//! vendor_id, rider_id). Nothing enforces referential integrity; a dangling
//! reference shows up as an "Unknown" label downstream, never an error.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Credit Status
// =============================================================================

/// Where a shop stands against its credit limit.
///
/// Assigned by [`crate::metrics::credit_status`] with strict precedence:
/// `OverLimit` beats `Outstanding` beats `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CreditStatus {
    /// No outstanding balance.
    Active,
    /// Owes money, within the comfortable band.
    Outstanding,
    /// Owes money and utilization is past the escalation threshold.
    OverLimit,
}

impl CreditStatus {
    /// Canonical string form, used by the filter engine and the dashboard.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CreditStatus::Active => "active",
            CreditStatus::Outstanding => "outstanding",
            CreditStatus::OverLimit => "over_limit",
        }
    }
}

impl Default for CreditStatus {
    fn default() -> Self {
        CreditStatus::Active
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A retail shop served by the distribution business.
///
/// `shop_id` is unique within one fetch cycle: the mapper deduplicates, the
/// first sheet row for an ID wins and later duplicates are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub shop_id: String,
    pub shop_name: String,
    pub owner_name: String,
    pub owner_mobile: String,
    pub area_id: String,
    pub credit_limit: Money,
    pub current_balance: Money,

    /// Parsed last visit date; `None` means never visited / unparsable.
    #[ts(as = "Option<String>")]
    pub last_visit: Option<NaiveDate>,
    /// The cell as typed, kept for display when it was not a valid date.
    pub last_visit_raw: String,

    // --- derived at construction ---
    /// `max(credit_limit - current_balance, 0)` - never negative.
    pub available_limit: Money,
    /// `current_balance / credit_limit × 100`, 0 when the limit is ≤ 0.
    pub utilization_pct: f64,
    pub status: CreditStatus,
    /// Whole days since the last visit; `None` when never visited.
    pub days_since_visit: Option<i64>,
    /// Visited within [`crate::RECENT_VISIT_DAYS`].
    pub is_recently_visited: bool,
    /// Never visited, or not visited within [`crate::FOLLOW_UP_DAYS`].
    pub requires_follow_up: bool,
}

// =============================================================================
// Product
// =============================================================================

/// A product carried in the godown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub vendor_id: String,
    pub vendor_name: String,
    pub cost_price: Money,
    pub sale_price: Money,
    pub stock_qty: i64,
    pub unit: String,
    pub category: String,

    // --- derived at construction ---
    /// `sale_price - cost_price` (negative means selling at a loss).
    pub profit: Money,
    /// `profit / cost_price × 100`, 0 when cost is ≤ 0.
    pub margin_pct: f64,
    /// `sale_price × stock_qty`.
    pub stock_value: Money,
    /// `cost_price × stock_qty`.
    pub cost_value: Money,
    /// `stock_qty < LOW_STOCK_THRESHOLD`.
    pub is_low_stock: bool,
}

// =============================================================================
// Vendor
// =============================================================================

/// A supplier. Generated IDs follow `V` + zero-padded sequence (`V001`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Vendor {
    pub vendor_id: String,
    pub name: String,
    pub category: String,
    pub city: String,
    pub contact: String,
}

// =============================================================================
// Order
// =============================================================================

/// A sales order booked by staff.
///
/// `order_id` is normalized to always carry the `ORD-` prefix, whichever
/// way the booking form wrote it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Order {
    pub order_id: String,
    #[ts(as = "Option<String>")]
    pub order_date: Option<NaiveDate>,
    pub order_date_raw: String,
    pub shop_id: String,
    pub staff_id: String,
    pub total_amount: Money,
    /// Free-text order status straight from the sheet (not normalized).
    pub status: String,
    pub proof_link: String,

    // --- derived at construction ---
    /// Order date falls on or after local midnight of "today".
    pub is_today: bool,
}

// =============================================================================
// Delivery
// =============================================================================

/// Normalized delivery outcome.
///
/// Built from free-text by [`DeliveryStatus::from_raw`]
/// (lower-cased substring match in fixed priority order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Delivered,
    PartialReturn,
    FullyReturned,
    Failed,
    Pending,
}

impl DeliveryStatus {
    /// Canonical string form, used by the filter engine and the dashboard.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Delivered => "delivered",
            DeliveryStatus::PartialReturn => "partial_return",
            DeliveryStatus::FullyReturned => "fully_returned",
            DeliveryStatus::Failed => "failed",
            DeliveryStatus::Pending => "pending",
        }
    }
}

impl Default for DeliveryStatus {
    fn default() -> Self {
        DeliveryStatus::Pending
    }
}

/// One item handed back by the shop during a delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReturnItem {
    pub name: String,
    pub quantity: i64,
}

/// A rider's delivery attempt against an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Delivery {
    pub order_id: String,
    pub shop_id: String,
    pub rider_id: String,
    pub rider_name: String,
    pub cash_received: Money,
    pub status: DeliveryStatus,
    /// The status cell as typed, kept for display/auditing.
    pub status_raw: String,
    #[ts(as = "Option<String>")]
    pub delivered_at: Option<NaiveDate>,
    pub delivered_at_raw: String,
    /// Unparsable payloads degrade to an empty list, never an error.
    pub return_items: Vec<ReturnItem>,

    // --- derived at construction ---
    /// Whole days since the delivery; `None` when the timestamp is unknown.
    pub days_ago: Option<i64>,
    /// Delivered within [`crate::RECENT_DELIVERY_DAYS`].
    pub is_recent: bool,
}

impl Delivery {
    /// Number of distinct return-item entries on this delivery.
    #[inline]
    pub fn return_count(&self) -> usize {
        self.return_items.len()
    }

    /// True when the shop handed anything back.
    #[inline]
    pub fn has_returns(&self) -> bool {
        !self.return_items.is_empty()
    }
}

// =============================================================================
// Purchase Aggregates
// =============================================================================

/// Supply-chain risk from how many vendors can supply a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// How urgently a product should be re-purchased.
///
/// Assigned by [`crate::metrics::purchase_priority`] from the
/// staleness × sourcing decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PurchasePriority {
    Low,
    Medium,
    High,
}

impl PurchasePriority {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PurchasePriority::Low => "low",
            PurchasePriority::Medium => "medium",
            PurchasePriority::High => "high",
        }
    }
}

/// Purchase history folded per product across all purchase rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PurchaseLine {
    pub product_id: String,
    pub product_name: String,
    pub total_quantity: i64,
    pub total_cost: Money,
    #[ts(as = "Option<String>")]
    pub last_purchase: Option<NaiveDate>,
    /// Display names of every distinct vendor that ever supplied this
    /// product, in order of first appearance.
    pub vendors: Vec<String>,
    /// Size of the distinct-vendor set across ALL purchase rows.
    pub vendor_count: usize,

    // --- derived at construction ---
    /// `total_cost / total_quantity`, zero when nothing was bought.
    pub average_unit_cost: Money,
    /// Whole days since the last purchase; `None` when never purchased.
    pub days_since_last_purchase: Option<i64>,
    pub vendor_risk: RiskLevel,
    pub priority: PurchasePriority,
}

/// Purchase history folded per vendor across all purchase rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VendorPerformance {
    pub vendor_id: String,
    pub vendor_name: String,
    pub total_spent: Money,
    /// Distinct products ever bought from this vendor.
    pub product_count: usize,
    /// Purchase rows attributed to this vendor.
    pub purchase_count: usize,

    // --- derived at construction ---
    /// `total_spent / purchase_count`, zero when there are no purchases.
    pub avg_purchase_value: Money,
}

// =============================================================================
// Staff Roles
// =============================================================================

/// Canonical staff roles the dashboard renders views for.
///
/// The Staff sheet stores roles as free text; [`Role::from_source`] maps
/// them through a static lookup with `Sales` as the default for anything
/// unrecognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Sales,
    Rider,
}

impl Role {
    /// Maps a free-text source role to a canonical role.
    pub fn from_source(raw: &str) -> Role {
        match raw.trim().to_lowercase().as_str() {
            "admin" | "administrator" | "owner" | "manager" => Role::Admin,
            "rider" | "delivery" | "delivery boy" | "deliveryboy" => Role::Rider,
            _ => Role::Sales,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Sales => "sales",
            Role::Rider => "rider",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Sales
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_status_default() {
        assert_eq!(CreditStatus::default(), CreditStatus::Active);
    }

    #[test]
    fn test_delivery_status_default() {
        assert_eq!(DeliveryStatus::default(), DeliveryStatus::Pending);
    }

    #[test]
    fn test_role_from_source_lookup() {
        assert_eq!(Role::from_source("Admin"), Role::Admin);
        assert_eq!(Role::from_source("  MANAGER "), Role::Admin);
        assert_eq!(Role::from_source("Rider"), Role::Rider);
        assert_eq!(Role::from_source("Delivery Boy"), Role::Rider);
        assert_eq!(Role::from_source("sales"), Role::Sales);
        // unrecognized values default to sales
        assert_eq!(Role::from_source("accountant"), Role::Sales);
        assert_eq!(Role::from_source(""), Role::Sales);
    }

    #[test]
    fn test_delivery_return_helpers() {
        let delivery = Delivery {
            order_id: "ORD-1".into(),
            shop_id: "SH-1".into(),
            rider_id: "R-1".into(),
            rider_name: "Bilal".into(),
            cash_received: Money::zero(),
            status: DeliveryStatus::PartialReturn,
            status_raw: "Partially Delivered".into(),
            delivered_at: None,
            delivered_at_raw: String::new(),
            return_items: vec![ReturnItem {
                name: "Pepsi 1.5L".into(),
                quantity: 2,
            }],
            days_ago: None,
            is_recent: false,
        };
        assert_eq!(delivery.return_count(), 1);
        assert!(delivery.has_returns());
    }
}
