//! Order mapper: booking rows to [`Order`] records.
//!
//! The orders sheet is one of the hand-edited ones, so columns are resolved
//! by alias list (substring match) rather than exact name.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{RowError, RowResult};
use crate::parse::{parse_amount, parse_date};
use crate::table::{Row, Table};
use crate::types::Order;

struct Columns {
    order_id: Option<usize>,
    order_date: Option<usize>,
    shop_id: Option<usize>,
    staff_id: Option<usize>,
    total_amount: Option<usize>,
    status: Option<usize>,
    proof_link: Option<usize>,
}

impl Columns {
    fn resolve(table: &Table) -> Self {
        Columns {
            order_id: table.column_any(&["order_id", "order id", "order no", "order number"]),
            order_date: table.column_any(&["order_date", "order date", "date"]),
            shop_id: table.column_any(&["shop_id", "shop id", "shop"]),
            staff_id: table.column_any(&["staff_id", "staff id", "staff", "booked_by"]),
            total_amount: table.column_any(&["total_amount", "total amount", "total", "amount"]),
            status: table.column_any(&["status"]),
            proof_link: table.column_any(&["proof_link", "proof", "receipt"]),
        }
    }
}

/// Normalizes an order ID so it always carries the `ORD-` prefix.
///
/// `"123"` becomes `"ORD-123"`; an ID already prefixed (any casing) is
/// kept as typed.
pub fn normalize_order_id(raw: &str) -> String {
    let raw = raw.trim();
    let prefixed = raw.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("ORD-"));
    if prefixed {
        raw.to_string()
    } else {
        format!("ORD-{raw}")
    }
}

/// Maps the orders sheet into [`Order`] records, input order preserved.
pub fn map_orders(table: &Table, today: NaiveDate) -> Vec<Order> {
    let cols = Columns::resolve(table);
    let mut orders = Vec::with_capacity(table.len());

    for (index, row) in table.rows().enumerate() {
        match decode_row(&cols, row, today) {
            Ok(order) => orders.push(order),
            Err(RowError::Blank) => {}
            Err(err) => warn!(row = index, %err, "skipping order row"),
        }
    }

    debug!(mapped = orders.len(), total = table.len(), "mapped orders");
    orders
}

fn decode_row(cols: &Columns, row: Row<'_>, today: NaiveDate) -> RowResult<Order> {
    if row.is_blank() {
        return Err(RowError::Blank);
    }

    let raw_id = row.cell(cols.order_id);
    if raw_id.is_empty() {
        return Err(RowError::MissingKey { field: "Order_ID" });
    }

    let order_date_raw = row.cell(cols.order_date).to_string();
    let order_date = parse_date(&order_date_raw);

    Ok(Order {
        order_id: normalize_order_id(raw_id),
        order_date,
        order_date_raw,
        shop_id: row.cell(cols.shop_id).to_string(),
        staff_id: row.cell(cols.staff_id).to_string(),
        total_amount: parse_amount(row.cell(cols.total_amount)),
        status: row.cell(cols.status).to_string(),
        proof_link: row.cell(cols.proof_link).to_string(),
        // "today" = on or after local midnight of now
        is_today: order_date.is_some_and(|d| d >= today),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

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
    fn test_normalize_order_id() {
        assert_eq!(normalize_order_id("123"), "ORD-123");
        assert_eq!(normalize_order_id("ORD-123"), "ORD-123");
        assert_eq!(normalize_order_id("ord-45"), "ord-45");
        assert_eq!(normalize_order_id(" 77 "), "ORD-77");
    }

    #[test]
    fn test_maps_with_drifted_headers() {
        // headers matched by alias/substring, not exact names
        let table = grid(&[
            &["Order No.", "Date", "Shop", "Staff", "Total Amount", "Status", "Proof"],
            &["101", "2025-06-30", "SH-001", "ST-2", "4,500", "Booked", "http://x"],
            &["ORD-102", "2025-06-01", "SH-002", "ST-2", "800", "Dispatched", ""],
        ]);
        let orders = map_orders(&table, today());
        assert_eq!(orders.len(), 2);

        assert_eq!(orders[0].order_id, "ORD-101");
        assert_eq!(orders[0].total_amount, Money::from_rupees(4500));
        assert!(orders[0].is_today);

        assert_eq!(orders[1].order_id, "ORD-102");
        assert!(!orders[1].is_today);
    }

    #[test]
    fn test_unparsable_date_is_not_today() {
        let table = grid(&[
            &["Order_ID", "Order_Date"],
            &["1", "sometime"],
        ]);
        let orders = map_orders(&table, today());
        assert_eq!(orders[0].order_date, None);
        assert_eq!(orders[0].order_date_raw, "sometime");
        assert!(!orders[0].is_today);
    }

    #[test]
    fn test_future_date_counts_as_today() {
        // "on or after local midnight of now"
        let table = grid(&[&["Order_ID", "Order_Date"], &["1", "2025-07-02"]]);
        assert!(map_orders(&table, today())[0].is_today);
    }
}
