//! Purchase-sheet aggregations: one [`PurchaseLine`] per distinct product
//! and one [`VendorPerformance`] per distinct vendor, folded over every
//! purchase row.
//!
//! These are the only mappers that group instead of mapping row-per-record.
//! Output order is the order each key first appears in the sheet.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{RowError, RowResult};
use crate::mappers::UNKNOWN_LABEL;
use crate::metrics;
use crate::money::Money;
use crate::parse::{days_between, parse_amount, parse_date, parse_quantity};
use crate::table::{Row, Table};
use crate::types::{PurchaseLine, VendorPerformance};

struct Columns {
    product_id: Option<usize>,
    product_name: Option<usize>,
    vendor_id: Option<usize>,
    vendor_name: Option<usize>,
    quantity: Option<usize>,
    unit_cost: Option<usize>,
    total_cost: Option<usize>,
    purchase_date: Option<usize>,
}

impl Columns {
    fn resolve(table: &Table) -> Self {
        Columns {
            product_id: table.column("Product_ID"),
            product_name: table.column("Product_Name"),
            vendor_id: table.column("Vendor_ID"),
            vendor_name: table.column("Vendor_Name"),
            quantity: table.column("Quantity"),
            unit_cost: table.column("Unit_Cost"),
            total_cost: table.column("Total_Cost"),
            purchase_date: table.column("Purchase_Date"),
        }
    }
}

/// One decoded purchase row, before grouping.
struct PurchaseRow {
    product_id: String,
    product_name: String,
    vendor_key: String,
    vendor_name: String,
    quantity: i64,
    cost: Money,
    date: Option<NaiveDate>,
}

fn decode_row(cols: &Columns, row: Row<'_>) -> RowResult<PurchaseRow> {
    if row.is_blank() {
        return Err(RowError::Blank);
    }

    let product_id = row.cell(cols.product_id);
    if product_id.is_empty() {
        return Err(RowError::MissingKey { field: "Product_ID" });
    }

    let quantity = parse_quantity(row.cell(cols.quantity));
    // prefer the explicit total; older sheets only carry unit cost
    let total_cell = row.cell(cols.total_cost);
    let cost = if total_cell.is_empty() {
        parse_amount(row.cell(cols.unit_cost)).times(quantity)
    } else {
        parse_amount(total_cell)
    };

    let vendor_id = row.cell(cols.vendor_id);
    let vendor_name = row.cell(cols.vendor_name);
    // distinct-vendor identity prefers the ID; display prefers the name
    let vendor_key = if vendor_id.is_empty() { vendor_name } else { vendor_id };
    let vendor_name = if vendor_name.is_empty() {
        UNKNOWN_LABEL.to_string()
    } else {
        vendor_name.to_string()
    };

    Ok(PurchaseRow {
        product_id: product_id.to_string(),
        product_name: row.cell(cols.product_name).to_string(),
        vendor_key: vendor_key.to_string(),
        vendor_name,
        quantity,
        cost,
        date: parse_date(row.cell(cols.purchase_date)),
    })
}

fn decode_rows(table: &Table) -> Vec<PurchaseRow> {
    let cols = Columns::resolve(table);
    let mut rows = Vec::with_capacity(table.len());
    for (index, row) in table.rows().enumerate() {
        match decode_row(&cols, row) {
            Ok(decoded) => rows.push(decoded),
            Err(RowError::Blank) => {}
            Err(err) => warn!(row = index, %err, "skipping purchase row"),
        }
    }
    rows
}

// =============================================================================
// Per-Product Fold
// =============================================================================

/// Accumulator for one product while folding.
struct LineAcc {
    product_id: String,
    product_name: String,
    total_quantity: i64,
    total_cost: Money,
    last_purchase: Option<NaiveDate>,
    vendor_keys: Vec<String>,
    vendor_names: Vec<String>,
}

/// Folds the purchase sheet into one [`PurchaseLine`] per distinct product.
///
/// `vendor_count` is the size of the distinct-vendor set across ALL rows
/// for the product, which drives both the risk level and the priority cell
/// of the staleness × sourcing table.
pub fn map_purchase_lines(table: &Table, today: NaiveDate) -> Vec<PurchaseLine> {
    let mut order: Vec<String> = Vec::new();
    let mut accs: HashMap<String, LineAcc> = HashMap::new();

    for row in decode_rows(table) {
        let acc = accs.entry(row.product_id.clone()).or_insert_with(|| {
            order.push(row.product_id.clone());
            LineAcc {
                product_id: row.product_id.clone(),
                product_name: String::new(),
                total_quantity: 0,
                total_cost: Money::zero(),
                last_purchase: None,
                vendor_keys: Vec::new(),
                vendor_names: Vec::new(),
            }
        });

        if acc.product_name.is_empty() && !row.product_name.is_empty() {
            acc.product_name = row.product_name.clone();
        }
        acc.total_quantity += row.quantity;
        acc.total_cost += row.cost;
        if let Some(date) = row.date {
            acc.last_purchase = Some(acc.last_purchase.map_or(date, |d| d.max(date)));
        }
        if !row.vendor_key.is_empty() && !acc.vendor_keys.contains(&row.vendor_key) {
            acc.vendor_keys.push(row.vendor_key.clone());
            acc.vendor_names.push(row.vendor_name.clone());
        }
    }

    let lines: Vec<PurchaseLine> = order
        .iter()
        .filter_map(|key| accs.remove(key))
        .map(|acc| finalize_line(acc, today))
        .collect();

    debug!(products = lines.len(), rows = table.len(), "aggregated purchase lines");
    lines
}

fn finalize_line(acc: LineAcc, today: NaiveDate) -> PurchaseLine {
    let vendor_count = acc.vendor_keys.len();
    let days_since_last_purchase = acc.last_purchase.map(|d| days_between(d, today));
    let average_unit_cost = if acc.total_quantity > 0 {
        acc.total_cost.avg_over(acc.total_quantity as usize)
    } else {
        Money::zero()
    };

    PurchaseLine {
        product_id: acc.product_id,
        product_name: acc.product_name,
        total_quantity: acc.total_quantity,
        total_cost: acc.total_cost,
        last_purchase: acc.last_purchase,
        vendors: acc.vendor_names,
        vendor_count,
        average_unit_cost,
        days_since_last_purchase,
        vendor_risk: metrics::vendor_risk(vendor_count),
        priority: metrics::purchase_priority(days_since_last_purchase, vendor_count),
    }
}

// =============================================================================
// Per-Vendor Fold
// =============================================================================

struct VendorAcc {
    vendor_id: String,
    vendor_name: String,
    total_spent: Money,
    product_keys: Vec<String>,
    purchase_count: usize,
}

/// Folds the purchase sheet into one [`VendorPerformance`] per distinct
/// vendor.
pub fn map_vendor_performance(table: &Table) -> Vec<VendorPerformance> {
    let mut order: Vec<String> = Vec::new();
    let mut accs: HashMap<String, VendorAcc> = HashMap::new();

    for row in decode_rows(table) {
        if row.vendor_key.is_empty() {
            continue;
        }
        let acc = accs.entry(row.vendor_key.clone()).or_insert_with(|| {
            order.push(row.vendor_key.clone());
            VendorAcc {
                vendor_id: row.vendor_key.clone(),
                vendor_name: row.vendor_name.clone(),
                total_spent: Money::zero(),
                product_keys: Vec::new(),
                purchase_count: 0,
            }
        });

        acc.total_spent += row.cost;
        acc.purchase_count += 1;
        if !acc.product_keys.contains(&row.product_id) {
            acc.product_keys.push(row.product_id.clone());
        }
    }

    order
        .iter()
        .filter_map(|key| accs.remove(key))
        .map(|acc| VendorPerformance {
            avg_purchase_value: acc.total_spent.avg_over(acc.purchase_count),
            vendor_id: acc.vendor_id,
            vendor_name: acc.vendor_name,
            product_count: acc.product_keys.len(),
            purchase_count: acc.purchase_count,
            total_spent: acc.total_spent,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PurchasePriority, RiskLevel};

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

    const HEADERS: &[&str] = &[
        "Product_ID",
        "Product_Name",
        "Vendor_ID",
        "Vendor_Name",
        "Quantity",
        "Total_Cost",
        "Purchase_Date",
    ];

    #[test]
    fn test_folds_per_product() {
        let table = grid(&[
            HEADERS,
            &["P-1", "Lays 30g", "V001", "PepsiCo", "100", "2000", "2025-06-20"],
            &["P-2", "Rio", "V002", "Candyland", "50", "1500", "2025-04-01"],
            &["P-1", "Lays 30g", "V002", "Candyland", "60", "1300", "2025-06-25"],
        ]);
        let lines = map_purchase_lines(&table, today());
        assert_eq!(lines.len(), 2);

        // insertion order of first appearance
        let lays = &lines[0];
        assert_eq!(lays.product_id, "P-1");
        assert_eq!(lays.total_quantity, 160);
        assert_eq!(lays.total_cost, Money::from_rupees(3300));
        assert_eq!(lays.last_purchase, NaiveDate::from_ymd_opt(2025, 6, 25));
        assert_eq!(lays.vendor_count, 2);
        assert_eq!(lays.vendors, vec!["PepsiCo", "Candyland"]);
        assert_eq!(lays.days_since_last_purchase, Some(5));
        assert_eq!(lays.vendor_risk, RiskLevel::Medium);
        // fresh + multi-sourced
        assert_eq!(lays.priority, PurchasePriority::Low);

        let rio = &lines[1];
        // stale + single-sourced
        assert_eq!(rio.vendor_risk, RiskLevel::High);
        assert_eq!(rio.priority, PurchasePriority::High);
    }

    #[test]
    fn test_vendor_risk_scenarios() {
        let table = grid(&[
            HEADERS,
            &["P-1", "A", "V1", "One", "1", "10", "2025-06-29"],
            &["P-2", "B", "V1", "One", "1", "10", "2025-06-29"],
            &["P-2", "B", "V2", "Two", "1", "10", "2025-06-29"],
            &["P-2", "B", "V3", "Three", "1", "10", "2025-06-29"],
        ]);
        let lines = map_purchase_lines(&table, today());
        // single vendor across all rows -> High
        assert_eq!(lines[0].vendor_risk, RiskLevel::High);
        // three distinct vendors -> Low
        assert_eq!(lines[1].vendor_risk, RiskLevel::Low);
    }

    #[test]
    fn test_duplicate_vendor_rows_count_once() {
        let table = grid(&[
            HEADERS,
            &["P-1", "A", "V1", "One", "1", "10", ""],
            &["P-1", "A", "V1", "One", "2", "20", ""],
        ]);
        let lines = map_purchase_lines(&table, today());
        assert_eq!(lines[0].vendor_count, 1);
        assert_eq!(lines[0].total_quantity, 3);
        // never purchased on record (no dates) counts as stale
        assert_eq!(lines[0].days_since_last_purchase, None);
        assert_eq!(lines[0].priority, PurchasePriority::High);
    }

    #[test]
    fn test_average_unit_cost_guarded() {
        let table = grid(&[HEADERS, &["P-1", "A", "V1", "One", "0", "500", ""]]);
        let lines = map_purchase_lines(&table, today());
        assert_eq!(lines[0].average_unit_cost, Money::zero());
    }

    #[test]
    fn test_unit_cost_fallback() {
        let table = grid(&[
            &["Product_ID", "Vendor_ID", "Quantity", "Unit_Cost"],
            &["P-1", "V1", "10", "25"],
        ]);
        let lines = map_purchase_lines(&table, today());
        assert_eq!(lines[0].total_cost, Money::from_rupees(250));
        assert_eq!(lines[0].average_unit_cost, Money::from_rupees(25));
    }

    #[test]
    fn test_vendor_performance_fold() {
        let table = grid(&[
            HEADERS,
            &["P-1", "A", "V1", "PepsiCo", "1", "1000", ""],
            &["P-2", "B", "V1", "PepsiCo", "1", "500", ""],
            &["P-1", "A", "V2", "Candyland", "1", "300", ""],
            &["P-1", "A", "V1", "PepsiCo", "1", "600", ""],
        ]);
        let perf = map_vendor_performance(&table);
        assert_eq!(perf.len(), 2);

        let pepsi = &perf[0];
        assert_eq!(pepsi.vendor_id, "V1");
        assert_eq!(pepsi.total_spent, Money::from_rupees(2100));
        assert_eq!(pepsi.purchase_count, 3);
        assert_eq!(pepsi.product_count, 2); // P-1 counted once
        assert_eq!(pepsi.avg_purchase_value, Money::from_rupees(700));
    }
}
