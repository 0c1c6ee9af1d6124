//! Product mapper: inventory rows to [`Product`] records with margin and
//! stock annotations.

use tracing::{debug, warn};

use crate::error::{RowError, RowResult};
use crate::mappers::UNKNOWN_LABEL;
use crate::metrics;
use crate::parse::{parse_amount, parse_quantity};
use crate::table::{Row, Table};
use crate::types::Product;
use crate::LOW_STOCK_THRESHOLD;

struct Columns {
    product_id: Option<usize>,
    name: Option<usize>,
    vendor_id: Option<usize>,
    vendor_name: Option<usize>,
    cost_price: Option<usize>,
    sale_price: Option<usize>,
    stock_qty: Option<usize>,
    unit: Option<usize>,
    category: Option<usize>,
}

impl Columns {
    fn resolve(table: &Table) -> Self {
        Columns {
            product_id: table.column("Product_ID"),
            // older sheets call the column plain "Name"
            name: table.column("Product_Name").or_else(|| table.column("Name")),
            vendor_id: table.column("Vendor_ID"),
            vendor_name: table.column("Vendor_Name"),
            cost_price: table.column("Cost_Price"),
            sale_price: table.column("Sale_Price"),
            stock_qty: table.column("Current_Stock_Qty"),
            unit: table.column("Unit"),
            category: table.column("Category"),
        }
    }
}

/// Maps the product sheet into [`Product`] records, input order preserved.
pub fn map_products(table: &Table) -> Vec<Product> {
    let cols = Columns::resolve(table);
    let mut products = Vec::with_capacity(table.len());

    for (index, row) in table.rows().enumerate() {
        match decode_row(&cols, row) {
            Ok(product) => products.push(product),
            Err(RowError::Blank) => {}
            Err(err) => warn!(row = index, %err, "skipping product row"),
        }
    }

    debug!(mapped = products.len(), total = table.len(), "mapped products");
    products
}

fn decode_row(cols: &Columns, row: Row<'_>) -> RowResult<Product> {
    if row.is_blank() {
        return Err(RowError::Blank);
    }

    let product_id = row.cell(cols.product_id);
    if product_id.is_empty() {
        return Err(RowError::MissingKey { field: "Product_ID" });
    }

    let cost_price = parse_amount(row.cell(cols.cost_price));
    let sale_price = parse_amount(row.cell(cols.sale_price));
    let stock_qty = parse_quantity(row.cell(cols.stock_qty));

    let vendor_name = row.cell(cols.vendor_name);
    let vendor_name = if vendor_name.is_empty() {
        UNKNOWN_LABEL.to_string()
    } else {
        vendor_name.to_string()
    };

    Ok(Product {
        product_id: product_id.to_string(),
        name: row.cell(cols.name).to_string(),
        vendor_id: row.cell(cols.vendor_id).to_string(),
        vendor_name,
        cost_price,
        sale_price,
        stock_qty,
        unit: row.cell(cols.unit).to_string(),
        category: row.cell(cols.category).to_string(),
        profit: sale_price - cost_price,
        margin_pct: metrics::margin_pct(cost_price, sale_price),
        stock_value: sale_price.times(stock_qty),
        cost_value: cost_price.times(stock_qty),
        is_low_stock: stock_qty < LOW_STOCK_THRESHOLD,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
