//! # Filter / Sort / Search Engine
//!
//! One engine for every list screen, instead of a bespoke copy per page.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI criteria                       apply()                              │
//! │                                                                         │
//! │  search: "akram"      ──►  case-insensitive substring OR'd across       │
//! │                            the entity's fixed searchable fields         │
//! │  filters: status=...  ──►  exact match on one attribute,                │
//! │                            "all" bypasses the filter                    │
//! │  sort: balance desc   ──►  stable, type-aware comparator; desc is       │
//! │                            the inversion of asc (exact mirror)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Customer, Delivery, Order, Product, PurchaseLine, Vendor};

// =============================================================================
// Sort Primitives
// =============================================================================

/// Sort direction. `Desc` is implemented as comparator inversion, not a
/// separate code path, so ascending and descending are exact mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Asc
    }
}

/// A type-aware sort key value extracted from a record.
///
/// Three extractor shapes cover every sortable column: lower-cased text,
/// numeric, and date (`None` = unknown, ordered first ascending).
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
    Date(Option<NaiveDate>),
}

impl SortValue {
    /// Lower-cases at construction so comparison is plain `str::cmp`.
    pub fn text(value: &str) -> SortValue {
        SortValue::Text(value.to_lowercase())
    }

    /// Total order across same-variant values; mixed variants (a caller
    /// bug - one key always extracts one variant) compare equal.
    fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

// =============================================================================
// Query
// =============================================================================

/// UI-selected list criteria, applied in order: search, filters, sort.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Query {
    /// Case-insensitive substring, OR'd across the entity's searchable
    /// fields. Empty/absent means no search filtering.
    pub search: Option<String>,
    /// `(field, value)` exact-match pairs; the value `"all"` bypasses.
    pub filters: Vec<(String, String)>,
    /// Named sort key; unknown keys leave the order untouched.
    pub sort_key: Option<String>,
    #[serde(default)]
    pub sort_order: SortOrder,
}

impl Query {
    fn matches<T: Queryable>(&self, record: &T) -> bool {
        if let Some(term) = self.search.as_deref() {
            let term = term.trim().to_lowercase();
            if !term.is_empty()
                && !record
                    .search_text()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
            {
                return false;
            }
        }

        self.filters.iter().all(|(field, value)| {
            if value == "all" {
                return true;
            }
            match record.field(field) {
                Some(actual) => actual == *value,
                // filtering on a field the entity doesn't have matches nothing
                None => false,
            }
        })
    }
}

// =============================================================================
// Queryable
// =============================================================================

/// What a record type exposes to the engine: its searchable text, its
/// filterable attributes, and its sort-key extractors.
pub trait Queryable {
    /// The fixed list of fields the search box looks through.
    fn search_text(&self) -> Vec<&str>;

    /// Exact-match filter attribute by name; `None` for unknown names.
    fn field(&self, name: &str) -> Option<String>;

    /// Type-aware sort value for a named key; `None` for unknown keys.
    fn sort_value(&self, key: &str) -> Option<SortValue>;
}

/// Applies search, filters, and sort to a record sequence.
///
/// Sorting tie-breaks on original position, which makes the order total:
/// ascending is stable, and descending is the exact reverse of ascending
/// (`sort(asc) == reverse(sort(desc))` for every input).
pub fn apply<T: Queryable + Clone>(records: &[T], query: &Query) -> Vec<T> {
    let filtered: Vec<T> = records
        .iter()
        .filter(|r| query.matches(*r))
        .cloned()
        .collect();

    let Some(key) = query.sort_key.as_deref() else {
        return filtered;
    };
    if filtered.first().and_then(|r| r.sort_value(key)).is_none() {
        // unknown sort key: leave input order untouched
        return filtered;
    }

    let mut indexed: Vec<(usize, T)> = filtered.into_iter().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| {
        let ord = match (a.sort_value(key), b.sort_value(key)) {
            (Some(va), Some(vb)) => va.compare(&vb),
            _ => Ordering::Equal,
        }
        .then(ia.cmp(ib));
        match query.sort_order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    indexed.into_iter().map(|(_, record)| record).collect()
}

// =============================================================================
// Per-Entity Implementations
// =============================================================================

impl Queryable for Customer {
    fn search_text(&self) -> Vec<&str> {
        vec![
            &self.shop_id,
            &self.shop_name,
            &self.owner_name,
            &self.owner_mobile,
            &self.area_id,
        ]
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "status" => Some(self.status.as_str().to_string()),
            "area_id" => Some(self.area_id.clone()),
            _ => None,
        }
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        Some(match key {
            "shop_name" => SortValue::text(&self.shop_name),
            "current_balance" => SortValue::Number(self.current_balance.paisas() as f64),
            "available_limit" => SortValue::Number(self.available_limit.paisas() as f64),
            "utilization_pct" => SortValue::Number(self.utilization_pct),
            "last_visit" => SortValue::Date(self.last_visit),
            _ => return None,
        })
    }
}

impl Queryable for Product {
    fn search_text(&self) -> Vec<&str> {
        vec![&self.product_id, &self.name, &self.vendor_name, &self.category]
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "category" => Some(self.category.clone()),
            "vendor_id" => Some(self.vendor_id.clone()),
            _ => None,
        }
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        Some(match key {
            "name" => SortValue::text(&self.name),
            "sale_price" => SortValue::Number(self.sale_price.paisas() as f64),
            "margin_pct" => SortValue::Number(self.margin_pct),
            "stock_qty" => SortValue::Number(self.stock_qty as f64),
            "stock_value" => SortValue::Number(self.stock_value.paisas() as f64),
            _ => return None,
        })
    }
}

impl Queryable for Vendor {
    fn search_text(&self) -> Vec<&str> {
        vec![&self.vendor_id, &self.name, &self.city, &self.category]
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "category" => Some(self.category.clone()),
            "city" => Some(self.city.clone()),
            _ => None,
        }
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        Some(match key {
            "name" => SortValue::text(&self.name),
            "city" => SortValue::text(&self.city),
            _ => return None,
        })
    }
}

impl Queryable for Order {
    fn search_text(&self) -> Vec<&str> {
        vec![&self.order_id, &self.shop_id, &self.staff_id]
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "status" => Some(self.status.clone()),
            "shop_id" => Some(self.shop_id.clone()),
            "staff_id" => Some(self.staff_id.clone()),
            _ => None,
        }
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        Some(match key {
            "order_id" => SortValue::text(&self.order_id),
            "order_date" => SortValue::Date(self.order_date),
            "total_amount" => SortValue::Number(self.total_amount.paisas() as f64),
            _ => return None,
        })
    }
}

impl Queryable for Delivery {
    fn search_text(&self) -> Vec<&str> {
        vec![&self.order_id, &self.shop_id, &self.rider_name]
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "status" => Some(self.status.as_str().to_string()),
            "rider_id" => Some(self.rider_id.clone()),
            _ => None,
        }
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        Some(match key {
            "delivered_at" => SortValue::Date(self.delivered_at),
            "cash_received" => SortValue::Number(self.cash_received.paisas() as f64),
            "rider_name" => SortValue::text(&self.rider_name),
            _ => return None,
        })
    }
}

impl Queryable for PurchaseLine {
    fn search_text(&self) -> Vec<&str> {
        vec![&self.product_id, &self.product_name]
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "priority" => Some(self.priority.as_str().to_string()),
            "vendor_risk" => Some(self.vendor_risk.as_str().to_string()),
            _ => None,
        }
    }

    fn sort_value(&self, key: &str) -> Option<SortValue> {
        Some(match key {
            "product_name" => SortValue::text(&self.product_name),
            "total_cost" => SortValue::Number(self.total_cost.paisas() as f64),
            "total_quantity" => SortValue::Number(self.total_quantity as f64),
            "last_purchase" => SortValue::Date(self.last_purchase),
            _ => return None,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
