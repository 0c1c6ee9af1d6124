//! # Derived-Metric Calculators
//!
//! The business rules of the dashboard, as small pure functions. Each one is
//! called exactly once per record, inside the mappers, so every rule lives
//! here and nowhere else.
//!
//! ## The Purchase Priority Decision Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stale (>30 days since     single-sourced                               │
//! │  last purchase)            (exactly one vendor)         Priority        │
//! │  ────────────────────      ──────────────────────       ────────        │
//! │       true                       true                     High          │
//! │       true                       false                    Medium        │
//! │       false                      true                     Medium        │
//! │       false                      false                    Low           │
//! │                                                                         │
//! │  Staleness alone or single-sourcing alone is a moderate supply-chain    │
//! │  risk; both together is urgent.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::money::Money;
use crate::parse::days_between;
use crate::types::{CreditStatus, DeliveryStatus, PurchasePriority, RiskLevel};
use crate::{
    FOLLOW_UP_DAYS, OVER_LIMIT_UTILIZATION_PCT, RECENT_VISIT_DAYS, STALE_PURCHASE_DAYS,
};

// =============================================================================
// Credit
// =============================================================================

/// Credit utilization percentage: `balance / limit × 100`, 0 when the limit
/// is zero or negative.
#[inline]
pub fn utilization_pct(balance: Money, limit: Money) -> f64 {
    balance.pct_of(limit)
}

/// Credit left to extend: `max(limit - balance, 0)`. Never negative, even
/// when the balance has overrun the limit.
#[inline]
pub fn available_limit(balance: Money, limit: Money) -> Money {
    (limit - balance).max(Money::zero())
}

/// Credit status with strict precedence - evaluate in order, first match
/// wins:
///
/// 1. balance > 0 AND utilization > 80 → `OverLimit`
/// 2. balance > 0 → `Outstanding`
/// 3. otherwise → `Active`
pub fn credit_status(balance: Money, utilization_pct: f64) -> CreditStatus {
    if balance.is_positive() && utilization_pct > OVER_LIMIT_UTILIZATION_PCT {
        CreditStatus::OverLimit
    } else if balance.is_positive() {
        CreditStatus::Outstanding
    } else {
        CreditStatus::Active
    }
}

// =============================================================================
// Visit Recency
// =============================================================================

/// Whole days since the last visit. `None` when there is no usable date.
#[inline]
pub fn days_since_visit(last_visit: Option<NaiveDate>, today: NaiveDate) -> Option<i64> {
    last_visit.map(|d| days_between(d, today))
}

/// Visited within the recent-visit window. A future-dated visit (negative
/// day count, a typo'd cell) does not count as recent.
#[inline]
pub fn is_recently_visited(days: Option<i64>) -> bool {
    matches!(days, Some(d) if (0..=RECENT_VISIT_DAYS).contains(&d))
}

/// Needs a follow-up: never visited, or last visit past the follow-up window.
#[inline]
pub fn requires_follow_up(days: Option<i64>) -> bool {
    match days {
        None => true,
        Some(d) => d > FOLLOW_UP_DAYS,
    }
}

// =============================================================================
// Delivery Status Normalization
// =============================================================================

impl DeliveryStatus {
    /// Normalizes free-text delivery status by lower-cased substring match
    /// in fixed priority order.
    ///
    /// "partial" and "fully" are checked before "delivered": the riders
    /// write statuses like "Partially Delivered", and the qualifier is the
    /// signal, not the word "delivered" around it.
    pub fn from_raw(raw: &str) -> DeliveryStatus {
        let s = raw.trim().to_lowercase();
        if s.contains("partial") {
            DeliveryStatus::PartialReturn
        } else if s.contains("fully") {
            DeliveryStatus::FullyReturned
        } else if s.contains("delivered") {
            DeliveryStatus::Delivered
        } else if s.contains("failed") {
            DeliveryStatus::Failed
        } else {
            // "pending", unknown wording, and the empty cell all land here
            DeliveryStatus::Pending
        }
    }
}

// =============================================================================
// Purchase Risk & Priority
// =============================================================================

/// Vendor risk from the distinct-vendor count for a product:
/// three or more vendors is comfortable, two is watchful, single-sourced
/// is high risk.
pub fn vendor_risk(vendor_count: usize) -> RiskLevel {
    match vendor_count {
        n if n >= 3 => RiskLevel::Low,
        2 => RiskLevel::Medium,
        _ => RiskLevel::High,
    }
}

/// The staleness × sourcing decision table (see module docs).
///
/// A product with no purchase date at all counts as stale - never purchased
/// is at least as urgent as purchased long ago.
pub fn purchase_priority(
    days_since_last_purchase: Option<i64>,
    vendor_count: usize,
) -> PurchasePriority {
    let stale = days_since_last_purchase.map_or(true, |d| d > STALE_PURCHASE_DAYS);
    let single_sourced = vendor_count <= 1;

    match (stale, single_sourced) {
        (true, true) => PurchasePriority::High,
        (true, false) | (false, true) => PurchasePriority::Medium,
        (false, false) => PurchasePriority::Low,
    }
}

// =============================================================================
// Margins
// =============================================================================

/// Margin percentage: `(sale - cost) / cost × 100`, 0 when cost is ≤ 0.
#[inline]
pub fn margin_pct(cost_price: Money, sale_price: Money) -> f64 {
    (sale_price - cost_price).pct_of(cost_price)
}

// =============================================================================
// Unit Tests
// =============================================================================
