//! In-memory seek plan execution
//!
//! The reference backing provider: filters rows by the plan predicate,
//! sorts by the primary directives (stable, multi-key), truncates to the
//! page size, and re-orders the selected window by the secondary
//! directives when present. Re-sorting the bounded window in memory
//! replaces the original two-query identity-join reorder; the window never
//! exceeds the page size.

use serde_json::Value;
use std::cmp::Ordering;

use crate::predicate::{evaluate, field_date, lookup_path};

use super::keys::{SeekPlan, SortDirective, SortOrder};

/// Executes seek plans over in-memory rows
pub struct MemoryExecutor;

impl MemoryExecutor {
    /// Runs a plan against a row set and returns the selected page
    pub fn execute(plan: &SeekPlan, rows: &[Value]) -> Vec<Value> {
        let mut selected: Vec<Value> = rows
            .iter()
            .filter(|row| match &plan.filter {
                Some(filter) => evaluate(filter, row),
                None => true,
            })
            .cloned()
            .collect();

        Self::sort_rows(&mut selected, &plan.primary_sort);

        if let Some(page_size) = plan.page_size {
            selected.truncate(page_size);
        }

        if let Some(secondary) = &plan.secondary_sort {
            Self::sort_rows(&mut selected, secondary);
        }

        selected
    }

    /// Stable multi-key sort; earlier keys dominate
    fn sort_rows(rows: &mut [Value], keys: &[SortDirective]) {
        rows.sort_by(|a, b| {
            for directive in keys {
                let left = lookup_path(a, &directive.path);
                let right = lookup_path(b, &directive.path);
                let ordering = if directive.date_only {
                    Self::compare_dates(left, right)
                } else {
                    Self::compare_values(left, right)
                };
                let ordering = match directive.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
    }

    /// Date-only comparison: values truncate to their calendar date, so
    /// rows on the same day tie regardless of time-of-day. Missing or
    /// unparseable values sort first.
    fn compare_dates(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        let a = a.and_then(field_date);
        let b = b.and_then(field_date);
        a.cmp(&b)
    }

    /// Compares two JSON values for sorting.
    ///
    /// Missing sorts before present; across types null < bool < number <
    /// string; within a type, natural ordering. RFC 3339 date strings
    /// order chronologically under ordinal string comparison.
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        let (a, b) = match (a, b) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(a), Some(b)) => (a, b),
        };

        let type_order = |value: &Value| -> u8 {
            match value {
                Value::Null => 0,
                Value::Bool(_) => 1,
                Value::Number(_) => 2,
                Value::String(_) => 3,
                Value::Array(_) => 4,
                Value::Object(_) => 5,
            }
        };

        let order = type_order(a).cmp(&type_order(b));
        if order != Ordering::Equal {
            return order;
        }

        match (a, b) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            // Integers compare exactly; f64 is a last resort since it
            // cannot represent the full u64 range
            (Value::Number(a), Value::Number(b)) => {
                if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
                    a.cmp(&b)
                } else if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
                    a.cmp(&b)
                } else {
                    let a = a.as_f64().unwrap_or(0.0);
                    let b = b.as_f64().unwrap_or(0.0);
                    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
                }
            }
            (Value::String(a), Value::String(b)) => a.cmp(b),
            // Arrays and objects are not ordered
            _ => Ordering::Equal,
        }
    }
}
