//! # Table Module
//!
//! The tabular grid the spreadsheet proxy hands us, plus tolerant column
//! resolution.
//!
//! ## Why Tolerant Resolution?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The source sheets are edited by hand. Header names drift:              │
//! │                                                                         │
//! │    "Shop_ID"  "shop id"  "ShopID "  "Shop_Id"                           │
//! │                                                                         │
//! │  Column lookup is therefore case-insensitive and trimmed, and the       │
//! │  messier sheets (orders, deliveries) get alias lists matched by         │
//! │  substring in either direction.                                         │
//! │                                                                         │
//! │  A column that cannot be found is NOT an error: the resolver returns    │
//! │  None and the mapper substitutes the documented default for that        │
//! │  entity ("" / 0 / "Unknown" / never-visited).                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Table
// =============================================================================

/// An in-memory table: one header row plus zero or more value rows.
///
/// Rows may be ragged - a short row simply reads as empty for its missing
/// trailing cells. The boundary crate guarantees a `Table` is only built
/// from a *successful* proxy response; mappers never see a failed fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table from a raw grid where row 0 is the header row.
    ///
    /// An empty grid yields an empty table (no headers, no rows).
    pub fn from_grid(mut grid: Vec<Vec<String>>) -> Self {
        if grid.is_empty() {
            return Table::default();
        }
        let headers = grid.remove(0);
        Table {
            headers,
            rows: grid,
        }
    }

    /// Builds a table from already-split headers and rows (test helper and
    /// boundary-crate constructor).
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Table { headers, rows }
    }

    /// The header row.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of value rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when the table has no value rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates the value rows.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row { cells })
    }

    /// Resolves a column by exact name: trimmed, case-insensitive full match.
    pub fn column(&self, name: &str) -> Option<usize> {
        resolve_column(&self.headers, name)
    }

    /// Resolves a column by alias list: first header that matches any alias
    /// by substring containment in either direction, case-insensitive.
    ///
    /// Used for the messier sheets (orders, deliveries) whose headers have
    /// drifted over time.
    pub fn column_any(&self, aliases: &[&str]) -> Option<usize> {
        resolve_column_any(&self.headers, aliases)
    }
}

/// Exact-name column resolution: full match after trim, case-insensitive.
///
/// Returns `None` (never errors) when no header matches; callers treat that
/// as "field absent" and substitute the entity's documented default.
pub fn resolve_column(headers: &[String], name: &str) -> Option<usize> {
    let wanted = name.trim();
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(wanted))
}

/// Alias-list column resolution: substring containment either direction.
///
/// The first header (in header order) matching the first alias that hits
/// wins, so alias order expresses preference.
pub fn resolve_column_any(headers: &[String], aliases: &[&str]) -> Option<usize> {
    for alias in aliases {
        let alias = alias.trim().to_lowercase();
        if alias.is_empty() {
            continue;
        }
        let hit = headers.iter().position(|h| {
            let h = h.trim().to_lowercase();
            !h.is_empty() && (h.contains(&alias) || alias.contains(&h))
        });
        if hit.is_some() {
            return hit;
        }
    }
    None
}

// =============================================================================
// Row
// =============================================================================

/// A borrowed view of one value row.
///
/// All cell access goes through [`Row::cell`], which is total: an unresolved
/// column or an out-of-range index reads as `""`, so short rows are
/// tolerated everywhere without bounds checks at call sites.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    cells: &'a [String],
}

impl<'a> Row<'a> {
    /// Returns the trimmed cell at the resolved column, or `""` when the
    /// column was not resolved or the row is too short.
    pub fn cell(&self, column: Option<usize>) -> &'a str {
        column
            .and_then(|idx| self.cells.get(idx))
            .map(|s| s.trim())
            .unwrap_or("")
    }

    /// Returns the cell exactly as it appears in the sheet, untrimmed.
    ///
    /// For the rare field where surrounding whitespace is significant
    /// (passwords). Everything else goes through [`Row::cell`].
    pub fn cell_raw(&self, column: Option<usize>) -> &'a str {
        column
            .and_then(|idx| self.cells.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// True when every cell in the row is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_from_grid_splits_headers() {
        let table = Table::from_grid(vec![strs(&["A", "B"]), strs(&["1", "2"])]);
        assert_eq!(table.headers(), &["A", "B"]);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_from_grid_empty() {
        let table = Table::from_grid(vec![]);
        assert!(table.is_empty());
        assert!(table.headers().is_empty());
    }

    #[test]
    fn test_resolve_column_exact() {
        let headers = strs(&["Shop_ID", " Shop_Name ", "Credit_Limit"]);
        assert_eq!(resolve_column(&headers, "shop_id"), Some(0));
        assert_eq!(resolve_column(&headers, "SHOP_NAME"), Some(1));
        assert_eq!(resolve_column(&headers, "Credit_Limit "), Some(2));
        // Exact lookup does NOT fall back to substring
        assert_eq!(resolve_column(&headers, "Shop"), None);
        assert_eq!(resolve_column(&headers, "Missing"), None);
    }

    #[test]
    fn test_resolve_column_any_substring_both_directions() {
        let headers = strs(&["Order No.", "Rider Name", "Cash Received"]);
        // alias contained in header
        assert_eq!(resolve_column_any(&headers, &["order"]), Some(0));
        // header contained in alias
        assert_eq!(resolve_column_any(&headers, &["rider name (staff)"]), Some(1));
        // first matching alias wins
        assert_eq!(resolve_column_any(&headers, &["missing", "cash"]), Some(2));
        assert_eq!(resolve_column_any(&headers, &["missing"]), None);
    }

    #[test]
    fn test_row_cell_tolerates_short_rows() {
        let table = Table::from_grid(vec![
            strs(&["A", "B", "C"]),
            strs(&["1"]), // ragged: B and C missing
        ]);
        let row = table.rows().next().unwrap();
        assert_eq!(row.cell(Some(0)), "1");
        assert_eq!(row.cell(Some(2)), "");
        assert_eq!(row.cell(None), "");
    }

    #[test]
    fn test_cell_raw_preserves_whitespace() {
        let table = Table::from_grid(vec![strs(&["A", "B"]), strs(&[" padded ", ""])]);
        let row = table.rows().next().unwrap();
        assert_eq!(row.cell(Some(0)), "padded");
        assert_eq!(row.cell_raw(Some(0)), " padded ");
        assert_eq!(row.cell_raw(Some(5)), "");
        assert_eq!(row.cell_raw(None), "");
    }

    #[test]
    fn test_row_is_blank() {
        let table = Table::from_grid(vec![strs(&["A", "B"]), strs(&["", "  "]), strs(&["x", ""])]);
        let mut rows = table.rows();
        assert!(rows.next().unwrap().is_blank());
        assert!(!rows.next().unwrap().is_blank());
    }
}
