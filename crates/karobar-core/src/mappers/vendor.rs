//! Vendor mapper, plus next-ID generation for the add-vendor form.

use tracing::{debug, warn};

use crate::error::{RowError, RowResult};
use crate::parse::next_sequence_id;
use crate::table::{Row, Table};
use crate::types::Vendor;

/// Width of the numeric part of generated vendor IDs (`V001`).
const VENDOR_ID_WIDTH: usize = 3;

struct Columns {
    vendor_id: Option<usize>,
    name: Option<usize>,
    category: Option<usize>,
    city: Option<usize>,
    contact: Option<usize>,
}

impl Columns {
    fn resolve(table: &Table) -> Self {
        Columns {
            vendor_id: table.column("Vendor_ID"),
            name: table.column("Vendor_Name").or_else(|| table.column("Name")),
            category: table.column("Category"),
            city: table.column("City"),
            contact: table.column("Contact"),
        }
    }
}

/// Maps the vendor sheet into [`Vendor`] records, input order preserved.
pub fn map_vendors(table: &Table) -> Vec<Vendor> {
    let cols = Columns::resolve(table);
    let mut vendors = Vec::with_capacity(table.len());

    for (index, row) in table.rows().enumerate() {
        match decode_row(&cols, row) {
            Ok(vendor) => vendors.push(vendor),
            Err(RowError::Blank) => {}
            Err(err) => warn!(row = index, %err, "skipping vendor row"),
        }
    }

    debug!(mapped = vendors.len(), total = table.len(), "mapped vendors");
    vendors
}

fn decode_row(cols: &Columns, row: Row<'_>) -> RowResult<Vendor> {
    if row.is_blank() {
        return Err(RowError::Blank);
    }

    let vendor_id = row.cell(cols.vendor_id);
    if vendor_id.is_empty() {
        return Err(RowError::MissingKey { field: "Vendor_ID" });
    }

    Ok(Vendor {
        vendor_id: vendor_id.to_string(),
        name: row.cell(cols.name).to_string(),
        category: row.cell(cols.category).to_string(),
        city: row.cell(cols.city).to_string(),
        contact: row.cell(cols.contact).to_string(),
    })
}

/// The ID the add-vendor form should use next: `V` + zero-padded sequence,
/// one past the highest sequence number already in the sheet.
pub fn next_vendor_id(vendors: &[Vendor]) -> String {
    next_sequence_id("V", VENDOR_ID_WIDTH, vendors.iter().map(|v| v.vendor_id.as_str()))
}

// =============================================================================
// Unit Tests
// =============================================================================
