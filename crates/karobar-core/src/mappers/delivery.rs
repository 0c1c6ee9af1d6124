//! Delivery mapper: rider rows to [`Delivery`] records with normalized
//! status and parsed return items.
//!
//! Like the orders sheet, the deliveries sheet is hand-edited, so columns
//! are resolved by alias list.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{RowError, RowResult};
use crate::mappers::order::normalize_order_id;
use crate::mappers::UNKNOWN_LABEL;
use crate::parse::{days_between, parse_amount, parse_date, parse_return_items};
use crate::table::{Row, Table};
use crate::types::{Delivery, DeliveryStatus};
use crate::RECENT_DELIVERY_DAYS;

struct Columns {
    order_id: Option<usize>,
    shop_id: Option<usize>,
    rider_id: Option<usize>,
    rider_name: Option<usize>,
    cash_received: Option<usize>,
    status: Option<usize>,
    timestamp: Option<usize>,
    return_items: Option<usize>,
}

impl Columns {
    fn resolve(table: &Table) -> Self {
        Columns {
            // underscore and space variants both occur in the wild; the
            // qualified aliases come first so "rider" cannot steal the
            // Rider_ID column for the name field
            order_id: table.column_any(&["order_id", "order id", "order"]),
            shop_id: table.column_any(&["shop_id", "shop id", "shop"]),
            rider_id: table.column_any(&["rider_id", "rider id"]),
            rider_name: table.column_any(&["rider_name", "rider name"]),
            cash_received: table.column_any(&["cash_received", "cash received", "cash"]),
            status: table.column_any(&["status"]),
            timestamp: table.column_any(&["timestamp", "delivered_at", "delivery date", "date"]),
            return_items: table.column_any(&["return_items", "return items", "returns", "return"]),
        }
    }
}

/// Maps the deliveries sheet into [`Delivery`] records, input order
/// preserved.
pub fn map_deliveries(table: &Table, today: NaiveDate) -> Vec<Delivery> {
    let cols = Columns::resolve(table);
    let mut deliveries = Vec::with_capacity(table.len());

    for (index, row) in table.rows().enumerate() {
        match decode_row(&cols, row, today) {
            Ok(delivery) => deliveries.push(delivery),
            Err(RowError::Blank) => {}
            Err(err) => warn!(row = index, %err, "skipping delivery row"),
        }
    }

    debug!(mapped = deliveries.len(), total = table.len(), "mapped deliveries");
    deliveries
}

fn decode_row(cols: &Columns, row: Row<'_>, today: NaiveDate) -> RowResult<Delivery> {
    if row.is_blank() {
        return Err(RowError::Blank);
    }

    let raw_order_id = row.cell(cols.order_id);
    if raw_order_id.is_empty() {
        return Err(RowError::MissingKey { field: "Order_ID" });
    }

    let status_raw = row.cell(cols.status).to_string();
    let delivered_at_raw = row.cell(cols.timestamp).to_string();
    let delivered_at = parse_date(&delivered_at_raw);
    let days_ago = delivered_at.map(|d| days_between(d, today));

    let rider_name = row.cell(cols.rider_name);
    let rider_name = if rider_name.is_empty() {
        UNKNOWN_LABEL.to_string()
    } else {
        rider_name.to_string()
    };

    Ok(Delivery {
        order_id: normalize_order_id(raw_order_id),
        shop_id: row.cell(cols.shop_id).to_string(),
        rider_id: row.cell(cols.rider_id).to_string(),
        rider_name,
        cash_received: parse_amount(row.cell(cols.cash_received)),
        status: DeliveryStatus::from_raw(&status_raw),
        status_raw,
        delivered_at,
        delivered_at_raw,
        return_items: parse_return_items(row.cell(cols.return_items)),
        days_ago,
        // future-dated timestamps (negative day counts) are not recent
        is_recent: days_ago.is_some_and(|d| (0..=RECENT_DELIVERY_DAYS).contains(&d)),
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

    const HEADERS: &[&str] = &[
        "Order ID",
        "Shop",
        "Rider_ID",
        "Rider Name",
        "Cash Received",
        "Status",
        "Timestamp",
        "Return Items",
    ];

    #[test]
    fn test_maps_delivery_row() {
        let table = grid(&[
            HEADERS,
            &[
                "101",
                "SH-001",
                "R-1",
                "Bilal",
                "3,200",
                "Delivered",
                "2025-06-30",
                "",
            ],
        ]);
        let deliveries = map_deliveries(&table, today());
        assert_eq!(deliveries.len(), 1);

        let d = &deliveries[0];
        assert_eq!(d.order_id, "ORD-101");
        assert_eq!(d.cash_received, Money::from_rupees(3200));
        assert_eq!(d.status, DeliveryStatus::Delivered);
        assert_eq!(d.days_ago, Some(0));
        assert!(d.is_recent);
        assert!(!d.has_returns());
    }

    #[test]
    fn test_status_normalization_through_mapper() {
        let table = grid(&[
            HEADERS,
            &["1", "", "", "", "", "Partially Delivered", "", ""],
            &["2", "", "", "", "", "", "", ""],
            &["3", "", "", "", "", "DELIVERED OK", "", ""],
            &["4", "", "", "", "", "Pending Review", "", ""],
        ]);
        let deliveries = map_deliveries(&table, today());
        assert_eq!(deliveries[0].status, DeliveryStatus::PartialReturn);
        assert_eq!(deliveries[1].status, DeliveryStatus::Pending);
        assert_eq!(deliveries[2].status, DeliveryStatus::Delivered);
        assert_eq!(deliveries[3].status, DeliveryStatus::Pending);
        // the raw cell survives for display
        assert_eq!(deliveries[0].status_raw, "Partially Delivered");
    }

    #[test]
    fn test_return_items_degrade_to_empty() {
        let table = grid(&[
            HEADERS,
            &["1", "", "", "", "", "partial return", "", r#"[{"name":"Pepsi","qty":2}]"#],
            &["2", "", "", "", "", "partial return", "", "not json at all"],
        ]);
        let deliveries = map_deliveries(&table, today());
        assert_eq!(deliveries[0].return_count(), 1);
        assert_eq!(deliveries[0].return_items[0].quantity, 2);
        // garbage payload: empty list, row still mapped
        assert_eq!(deliveries[1].return_count(), 0);
    }

    #[test]
    fn test_recency_window() {
        let table = grid(&[
            HEADERS,
            &["1", "", "", "", "", "delivered", "2025-06-29", ""],
            &["2", "", "", "", "", "delivered", "2025-06-27", ""],
            &["3", "", "", "", "", "delivered", "", ""],
            &["4", "", "", "", "", "delivered", "2025-07-05", ""],
        ]);
        let deliveries = map_deliveries(&table, today());
        assert!(deliveries[0].is_recent); // 1 day ago
        assert!(!deliveries[1].is_recent); // 3 days ago
        assert!(!deliveries[2].is_recent); // unknown timestamp
        assert_eq!(deliveries[2].days_ago, None);
        // typo'd future timestamp: negative day count, not recent
        assert_eq!(deliveries[3].days_ago, Some(-5));
        assert!(!deliveries[3].is_recent);
    }

    #[test]
    fn test_unknown_rider_label() {
        let table = grid(&[HEADERS, &["1", "", "", "", "", "", "", ""]]);
        assert_eq!(map_deliveries(&table, today())[0].rider_name, "Unknown");
    }
}
