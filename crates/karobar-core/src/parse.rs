//! # Safe Cell Parsers
//!
//! Every cell in the source sheets is free text typed by hand. These parsers
//! never fail: a value that cannot be understood degrades to a documented
//! default (zero amount, zero quantity, "unknown" date, empty return list)
//! instead of propagating an error into a mapper.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use crate::money::Money;
use crate::types::ReturnItem;

// =============================================================================
// Numbers
// =============================================================================

/// Parses a rupee amount cell into [`Money`]. Falls back to zero.
///
/// Tolerates thousands separators and a currency prefix:
/// `"1,500.50"`, `"Rs 1500.5"`, `"rs. 1500"` all parse to Rs 1,500.50 /
/// Rs 1,500.00.
pub fn parse_amount(raw: &str) -> Money {
    let cleaned: String = raw
        .trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit() && c != '-')
        .chars()
        .filter(|c| !matches!(c, ',' | ' ' | '_'))
        .collect();

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Money::from_paisas((v * 100.0).round() as i64),
        _ => Money::zero(),
    }
}

/// Parses a quantity cell into an integer. Falls back to zero.
///
/// Accepts `"5"`, `"5.0"`, and `"1,200"`.
pub fn parse_quantity(raw: &str) -> i64 {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',' && *c != ' ').collect();
    if let Ok(n) = cleaned.parse::<i64>() {
        return n;
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v.round() as i64,
        _ => 0,
    }
}

// =============================================================================
// Dates
// =============================================================================

/// Date formats seen in the sheets, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Datetime formats tried after the plain date formats.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M"];

/// Parses a date cell. `None` means "never / unknown".
///
/// The raw string is kept separately by the mappers for display; this
/// function only decides whether the cell participates in derived-date
/// calculations (days-since-visit, staleness, "today" checks).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    // Full RFC 3339 timestamps come back from the proxy for edited cells
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    None
}

/// Whole-day difference between a past date and "today".
///
/// Both sides are already midnight-normalized (`NaiveDate` has no time
/// component), so this is the calendar-day distance the dashboard shows.
/// Negative when `earlier` is in the future.
pub fn days_between(earlier: NaiveDate, today: NaiveDate) -> i64 {
    (today - earlier).num_days()
}

// =============================================================================
// Return-Item Payloads
// =============================================================================

/// Parses a delivery's return-items cell.
///
/// The automation webhooks have written this cell three different ways over
/// the sheet's lifetime, so parsing attempts, in order:
///
/// 1. as-is, when the trimmed cell looks like a JSON array (`[...]`)
/// 2. after unescaping `\"` to `"` (and stripping wrapping quotes), for
///    payloads that were serialized twice
/// 3. as-is, catch-all
///
/// Any failure at any stage yields an empty list. This function never
/// errors and never panics, whatever the cell contains.
pub fn parse_return_items(raw: &str) -> Vec<ReturnItem> {
    let raw = raw.trim();
    if raw.is_empty() || raw == "null" {
        return Vec::new();
    }

    if raw.starts_with('[') {
        if let Ok(values) = serde_json::from_str::<Vec<Value>>(raw) {
            return coerce_return_items(values);
        }
    }

    let unescaped = raw.trim_matches('"').replace("\\\"", "\"");
    if let Ok(values) = serde_json::from_str::<Vec<Value>>(&unescaped) {
        return coerce_return_items(values);
    }

    serde_json::from_str::<Vec<Value>>(raw)
        .map(coerce_return_items)
        .unwrap_or_default()
}

/// Turns loosely-shaped JSON array elements into [`ReturnItem`]s.
///
/// Strings become a named item with quantity 1. Objects read
/// `name`/`item`/`product` and `quantity`/`qty`. Anything else is dropped.
fn coerce_return_items(values: Vec<Value>) -> Vec<ReturnItem> {
    values
        .into_iter()
        .filter_map(|value| match value {
            Value::String(name) if !name.trim().is_empty() => Some(ReturnItem {
                name: name.trim().to_string(),
                quantity: 1,
            }),
            Value::Object(map) => {
                let name = ["name", "item", "product"]
                    .iter()
                    .find_map(|k| map.get(*k).and_then(Value::as_str))
                    .map(|s| s.trim().to_string())?;
                let quantity = ["quantity", "qty"]
                    .iter()
                    .find_map(|k| map.get(*k))
                    .map(json_quantity)
                    .unwrap_or(1);
                Some(ReturnItem { name, quantity })
            }
            _ => None,
        })
        .collect()
}

/// Quantity values arrive as JSON numbers or numeric strings.
fn json_quantity(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n.as_i64().unwrap_or_else(|| {
            n.as_f64().map(|f| f.round() as i64).unwrap_or(1)
        }),
        Value::String(s) => parse_quantity(s),
        _ => 1,
    }
}

// =============================================================================
// Sequence IDs
// =============================================================================

/// Generates the next ID in a `PREFIX` + zero-padded sequence by scanning
/// the IDs already present (`V001`, `V002`, ... -> `V003`).
///
/// IDs that do not carry the prefix or do not end in digits are ignored, so
/// a hand-typed odd ID cannot break new-record creation.
pub fn next_sequence_id<I, S>(prefix: &str, width: usize, existing: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut max_seen: u64 = 0;
    for id in existing {
        let id = id.as_ref().trim();
        if id.len() <= prefix.len() {
            continue;
        }
        let (head, tail) = id.split_at(prefix.len());
        if !head.eq_ignore_ascii_case(prefix) {
            continue;
        }
        if let Ok(n) = tail.trim_start_matches('-').parse::<u64>() {
            max_seen = max_seen.max(n);
        }
    }
    format!("{}{:0width$}", prefix, max_seen + 1, width = width)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1500"), Money::from_rupees(1500));
        assert_eq!(parse_amount("1,500.50"), Money::from_paisas(150050));
        assert_eq!(parse_amount("Rs 1500.5"), Money::from_paisas(150050));
        assert_eq!(parse_amount("rs. 1,500"), Money::from_rupees(1500));
        assert_eq!(parse_amount(""), Money::zero());
        assert_eq!(parse_amount("N/A"), Money::zero());
        assert_eq!(parse_amount("-250"), Money::from_rupees(-250));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("5"), 5);
        assert_eq!(parse_quantity("5.0"), 5);
        assert_eq!(parse_quantity("1,200"), 1200);
        assert_eq!(parse_quantity(""), 0);
        assert_eq!(parse_quantity("a few"), 0);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(parse_date("2025-06-01"), Some(expected));
        assert_eq!(parse_date("01/06/2025"), Some(expected));
        assert_eq!(parse_date("2025-06-01 10:30:00"), Some(expected));
        assert_eq!(parse_date("2025-06-01T10:30:00+05:00"), Some(expected));
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("last week"), None);
    }

    #[test]
    fn test_days_between() {
        let a = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let b = NaiveDate::from_ymd_opt(2025, 6, 11).unwrap();
        assert_eq!(days_between(a, b), 10);
        assert_eq!(days_between(b, a), -10);
        assert_eq!(days_between(a, a), 0);
    }

    #[test]
    fn test_parse_return_items_plain_json() {
        let items = parse_return_items(r#"[{"name":"Lays 30g","quantity":2},"Pepsi 1.5L"]"#);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Lays 30g");
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[1].name, "Pepsi 1.5L");
        assert_eq!(items[1].quantity, 1);
    }

    #[test]
    fn test_parse_return_items_escaped() {
        let items = parse_return_items(r#""[{\"name\":\"Lays 30g\",\"qty\":\"3\"}]""#);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Lays 30g");
        assert_eq!(items[0].quantity, 3);
    }

    #[test]
    fn test_parse_return_items_never_fails() {
        // Garbage in, empty list out - for ANY string input
        for garbage in ["", "null", "not json", "{]", "{\"a\":1}", "[not, json", "42"] {
            assert!(parse_return_items(garbage).is_empty(), "input: {garbage:?}");
        }
    }

    #[test]
    fn test_next_sequence_id() {
        assert_eq!(next_sequence_id("V", 3, ["V001", "V007", "V002"]), "V008");
        assert_eq!(next_sequence_id("V", 3, Vec::<&str>::new()), "V001");
        // odd hand-typed IDs are ignored
        assert_eq!(next_sequence_id("V", 3, ["V004", "VENDOR-X", "9"]), "V005");
        // hyphenated variants still count
        assert_eq!(next_sequence_id("V", 3, ["V-011"]), "V012");
    }
}
