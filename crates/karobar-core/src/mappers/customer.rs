//! Customer mapper: shop rows to [`Customer`] records with credit and
//! visit-recency annotations.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::{RowError, RowResult};
use crate::metrics;
use crate::parse::{parse_amount, parse_date};
use crate::table::{Row, Table};
use crate::types::Customer;

/// Resolved column positions for the customer sheet.
///
/// Resolved once per mapping call, not once per row.
struct Columns {
    shop_id: Option<usize>,
    shop_name: Option<usize>,
    owner_name: Option<usize>,
    owner_mobile: Option<usize>,
    area_id: Option<usize>,
    credit_limit: Option<usize>,
    current_balance: Option<usize>,
    last_visit: Option<usize>,
}

impl Columns {
    fn resolve(table: &Table) -> Self {
        Columns {
            shop_id: table.column("Shop_ID"),
            shop_name: table.column("Shop_Name"),
            owner_name: table.column("Owner_Name"),
            owner_mobile: table.column("Owner_Mobile"),
            area_id: table.column("Area_ID"),
            credit_limit: table.column("Credit_Limit"),
            current_balance: table.column("Current_Balance"),
            last_visit: table.column("Last_Visit_Date"),
        }
    }
}

/// Maps the customer sheet into [`Customer`] records.
///
/// Duplicate `shop_id`s are deduplicated: the first occurrence wins and
/// later rows with the same ID are dropped.
pub fn map_customers(table: &Table, today: NaiveDate) -> Vec<Customer> {
    let cols = Columns::resolve(table);
    let mut seen: HashSet<String> = HashSet::new();
    let mut customers = Vec::with_capacity(table.len());

    for (index, row) in table.rows().enumerate() {
        match decode_row(&cols, row, today) {
            Ok(customer) => {
                if seen.insert(customer.shop_id.clone()) {
                    customers.push(customer);
                } else {
                    debug!(shop_id = %customer.shop_id, row = index, "duplicate shop row dropped");
                }
            }
            Err(RowError::Blank) => {}
            Err(err) => warn!(row = index, %err, "skipping customer row"),
        }
    }

    debug!(mapped = customers.len(), total = table.len(), "mapped customers");
    customers
}

fn decode_row(cols: &Columns, row: Row<'_>, today: NaiveDate) -> RowResult<Customer> {
    if row.is_blank() {
        return Err(RowError::Blank);
    }

    let shop_id = row.cell(cols.shop_id);
    if shop_id.is_empty() {
        return Err(RowError::MissingKey { field: "Shop_ID" });
    }

    let credit_limit = parse_amount(row.cell(cols.credit_limit));
    let current_balance = parse_amount(row.cell(cols.current_balance));
    let last_visit_raw = row.cell(cols.last_visit).to_string();
    let last_visit = parse_date(&last_visit_raw);

    let utilization_pct = metrics::utilization_pct(current_balance, credit_limit);
    let days_since_visit = metrics::days_since_visit(last_visit, today);

    Ok(Customer {
        shop_id: shop_id.to_string(),
        shop_name: row.cell(cols.shop_name).to_string(),
        owner_name: row.cell(cols.owner_name).to_string(),
        owner_mobile: row.cell(cols.owner_mobile).to_string(),
        area_id: row.cell(cols.area_id).to_string(),
        credit_limit,
        current_balance,
        last_visit,
        last_visit_raw,
        available_limit: metrics::available_limit(current_balance, credit_limit),
        utilization_pct,
        status: metrics::credit_status(current_balance, utilization_pct),
        days_since_visit,
        is_recently_visited: metrics::is_recently_visited(days_since_visit),
        requires_follow_up: metrics::requires_follow_up(days_since_visit),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
