//! # Error Types
//!
//! Row-level decode errors for karobar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  karobar-core errors (this file)                                        │
//! │  └── RowError     - One row failed to decode; caught by the mapper,     │
//! │                     logged, and the row is skipped                      │
//! │                                                                         │
//! │  karobar-sheets errors (separate crate)                                 │
//! │  └── SheetsError  - Fetch/auth/webhook failures, surfaced to the UI     │
//! │                                                                         │
//! │  Flow: RowError never crosses a mapper boundary. Mappers always         │
//! │  return the rows that did decode; only whole-fetch failures from        │
//! │  karobar-sheets ever reach the dashboard.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. A missing *column* is not an error - the resolver returns `None` and
//!    the mapper substitutes the documented default
//! 3. A missing *key field* on one row is an error for that row only

use thiserror::Error;

// =============================================================================
// Row Error
// =============================================================================

/// A single row could not be decoded into a record.
///
/// Mappers catch these per-row: the row is logged at `warn` level and
/// skipped, mapping continues with the remaining rows, and no partial
/// record is emitted for the failed row.
#[derive(Debug, Error)]
pub enum RowError {
    /// Every cell in the row is empty (trailing filler rows in the sheet).
    #[error("row is blank")]
    Blank,

    /// The row is missing the field that identifies the record.
    #[error("missing key field: {field}")]
    MissingKey { field: &'static str },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for per-row decode results.
pub type RowResult<T> = Result<T, RowError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(RowError::Blank.to_string(), "row is blank");
        assert_eq!(
            RowError::MissingKey { field: "Shop_ID" }.to_string(),
            "missing key field: Shop_ID"
        );
    }
}
