//! # Aggregation Builders
//!
//! Straight reductions over mapped records into the summary objects the
//! dashboard cards render. Every ratio is guarded; empty input produces a
//! well-formed all-zero summary (or the "No data" sentinel for top-metric
//! extraction), never a null.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{Customer, Delivery, DeliveryStatus, Product};

// =============================================================================
// Customer Dashboard Summary
// =============================================================================

/// The numbers on the main dashboard's customer cards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerSummary {
    pub total_shops: usize,
    pub recently_visited: usize,
    pub with_outstanding: usize,
    pub requires_follow_up: usize,
    /// Sum of positive balances (negative balances are advances).
    pub total_outstanding: Money,
    /// `total_outstanding / total_shops`, zero for an empty fetch.
    pub average_balance: Money,
    /// Distinct non-empty area IDs.
    pub unique_areas: usize,
}

impl CustomerSummary {
    /// Reduces a mapped customer sequence into the dashboard summary.
    pub fn from_customers(customers: &[Customer]) -> Self {
        let total_shops = customers.len();
        let total_outstanding: Money = customers
            .iter()
            .map(|c| c.current_balance)
            .filter(|b| b.is_positive())
            .sum();
        let areas: HashSet<&str> = customers
            .iter()
            .map(|c| c.area_id.as_str())
            .filter(|a| !a.is_empty())
            .collect();

        CustomerSummary {
            total_shops,
            recently_visited: customers.iter().filter(|c| c.is_recently_visited).count(),
            with_outstanding: customers
                .iter()
                .filter(|c| c.current_balance.is_positive())
                .count(),
            requires_follow_up: customers.iter().filter(|c| c.requires_follow_up).count(),
            total_outstanding,
            average_balance: total_outstanding.avg_over(total_shops),
            unique_areas: areas.len(),
        }
    }
}

// =============================================================================
// Delivery Stats
// =============================================================================

/// Per-status delivery counts plus cash and returns totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryStats {
    pub total: usize,
    pub delivered: usize,
    pub partial_return: usize,
    pub fully_returned: usize,
    pub failed: usize,
    pub pending: usize,
    pub total_cash: Money,
    /// Sum of per-delivery return-item counts.
    pub returns_count: usize,
    /// `(delivered + partial_return) / total × 100`, zero when empty.
    pub success_rate: f64,
}

impl DeliveryStats {
    /// Reduces a mapped delivery sequence into the rider dashboard stats.
    pub fn from_deliveries(deliveries: &[Delivery]) -> Self {
        let mut stats = DeliveryStats {
            total: deliveries.len(),
            ..DeliveryStats::default()
        };

        for delivery in deliveries {
            match delivery.status {
                DeliveryStatus::Delivered => stats.delivered += 1,
                DeliveryStatus::PartialReturn => stats.partial_return += 1,
                DeliveryStatus::FullyReturned => stats.fully_returned += 1,
                DeliveryStatus::Failed => stats.failed += 1,
                DeliveryStatus::Pending => stats.pending += 1,
            }
            stats.total_cash += delivery.cash_received;
            stats.returns_count += delivery.return_count();
        }

        if stats.total > 0 {
            let successful = (stats.delivered + stats.partial_return) as f64;
            stats.success_rate = successful / stats.total as f64 * 100.0;
        }
        stats
    }
}

// =============================================================================
// Product Stock Summary
// =============================================================================

/// Inventory-screen headline numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductStockSummary {
    pub total_products: usize,
    pub low_stock_count: usize,
    /// Sum of `sale_price × qty` over the godown.
    pub total_stock_value: Money,
    /// Sum of `cost_price × qty` over the godown.
    pub total_cost_value: Money,
}

impl ProductStockSummary {
    pub fn from_products(products: &[Product]) -> Self {
        ProductStockSummary {
            total_products: products.len(),
            low_stock_count: products.iter().filter(|p| p.is_low_stock).count(),
            total_stock_value: products.iter().map(|p| p.stock_value).sum(),
            total_cost_value: products.iter().map(|p| p.cost_value).sum(),
        }
    }
}

// =============================================================================
// Top-Metric Extraction
// =============================================================================

/// The best row by one named metric, with a label the card can render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TopPerformer {
    pub label: String,
    pub value: f64,
}

impl TopPerformer {
    /// Sentinel rendered when there is nothing to rank. The dashboard shows
    /// it as-is instead of special-casing empty data.
    pub fn no_data() -> Self {
        TopPerformer {
            label: "No data".to_string(),
            value: 0.0,
        }
    }
}

/// Single linear pass selecting the record with the maximum metric value.
///
/// Ties keep the first-encountered record: the comparison is strictly
/// greater-than, so an equal later row never replaces an earlier one.
pub fn top_by_metric<T>(records: &[T], metric: impl Fn(&T) -> f64) -> Option<&T> {
    let mut best: Option<(&T, f64)> = None;
    for record in records {
        let value = metric(record);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((record, value)),
        }
    }
    best.map(|(record, _)| record)
}

/// [`top_by_metric`] packaged for a dashboard card: yields the sentinel
/// instead of `None` when the sequence is empty.
pub fn top_performer<T>(
    records: &[T],
    label: impl Fn(&T) -> String,
    metric: impl Fn(&T) -> f64,
) -> TopPerformer {
    top_by_metric(records, &metric)
        .map(|record| TopPerformer {
            label: label(record),
            value: metric(record),
        })
        .unwrap_or_else(TopPerformer::no_data)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mappers::{map_customers, map_deliveries};
    use crate::table::Table;
    use chrono::NaiveDate;

    fn grid(rows: &[&[&str]]) -> Table {
        Table::from_grid(
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()
    }

    #[test]
    fn test_customer_summary() {
        let table = grid(&[
            &["Shop_ID", "Area_ID", "Credit_Limit", "Current_Balance", "Last_Visit_Date"],
            &["SH-1", "A-1", "1000", "400", "2025-06-28"],
            &["SH-2", "A-1", "1000", "0", "2025-05-01"],
            &["SH-3", "A-2", "500", "200", ""],
        ]);
        let summary = CustomerSummary::from_customers(&map_customers(&table, today()));

        assert_eq!(summary.total_shops, 3);
        assert_eq!(summary.recently_visited, 1);
        assert_eq!(summary.with_outstanding, 2);
        assert_eq!(summary.requires_follow_up, 2); // stale visit + never visited
        assert_eq!(summary.total_outstanding, Money::from_rupees(600));
        assert_eq!(summary.average_balance, Money::from_rupees(200));
        assert_eq!(summary.unique_areas, 2);
    }

    #[test]
    fn test_customer_summary_empty_is_all_zero() {
        let summary = CustomerSummary::from_customers(&[]);
        assert_eq!(summary.total_shops, 0);
        assert_eq!(summary.average_balance, Money::zero()); // no divide-by-zero
    }

    #[test]
    fn test_delivery_stats() {
        let table = grid(&[
            &["Order_ID", "Cash_Received", "Status", "Return_Items"],
            &["1", "1000", "Delivered", ""],
            &["2", "500", "Partially Delivered", r#"[{"name":"Pepsi","qty":2}]"#],
            &["3", "0", "Failed", ""],
            &["4", "0", "", ""],
        ]);
        let stats = DeliveryStats::from_deliveries(&map_deliveries(&table, today()));

        assert_eq!(stats.total, 4);
        assert_eq!(stats.delivered, 1);
        assert_eq!(stats.partial_return, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.total_cash, Money::from_rupees(1500));
        assert_eq!(stats.returns_count, 1);
        // (1 + 1) / 4 × 100
        assert_eq!(stats.success_rate, 50.0);
    }

    #[test]
    fn test_delivery_stats_empty_guarded() {
        let stats = DeliveryStats::from_deliveries(&[]);
        assert_eq!(stats.success_rate, 0.0);
    }

    #[test]
    fn test_top_by_metric_ties_keep_first() {
        let rows = [("A", 5.0), ("B", 9.0), ("C", 9.0), ("D", 2.0)];
        let top = top_by_metric(&rows, |r| r.1).unwrap();
        assert_eq!(top.0, "B"); // C ties but B came first
    }

    #[test]
    fn test_top_performer_sentinel() {
        let rows: [(&str, f64); 0] = [];
        let top = top_performer(&rows, |r| r.0.to_string(), |r| r.1);
        assert_eq!(top.label, "No data");
        assert_eq!(top.value, 0.0);
    }

    #[test]
    fn test_top_performer_labels_winner() {
        let rows = [("Area A", 100.0), ("Area B", 250.0)];
        let top = top_performer(&rows, |r| r.0.to_string(), |r| r.1);
        assert_eq!(top.label, "Area B");
        assert_eq!(top.value, 250.0);
    }
}
