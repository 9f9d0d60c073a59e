//! Sort key and plan structures

use crate::predicate::{FieldPath, PredicateNode};

/// Sort direction for one key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// Returns the opposite direction
    pub fn reversed(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

/// Which page of the ordered set is requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekDirection {
    /// The first page; cursor values are ignored
    First,
    /// The page after the cursor (`last_value` boundaries)
    Next,
    /// The page before the cursor (`first_value` boundaries)
    Previous,
    /// The final page, in forward order
    Last,
}

/// One seek sort key with optional cursor boundary values.
///
/// `first_value` is the key's value on the first row of the current page
/// (used walking backward); `last_value` the value on its last row (used
/// walking forward). `is_unique` marks a key that alone guarantees total
/// order, so no tie-break disjunct is needed once it is reached.
/// `is_date_only` orders by calendar date, ignoring time-of-day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub order: SortOrder,
    pub first_value: Option<String>,
    pub last_value: Option<String>,
    pub is_unique: bool,
    pub is_date_only: bool,
}

impl SortKey {
    /// Creates an ascending key
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
            ..Self::default()
        }
    }

    /// Creates a descending key
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
            ..Self::default()
        }
    }

    /// Marks the key as uniquely ordering
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Marks the key as ordering by calendar date, ignoring time-of-day
    pub fn date_only(mut self) -> Self {
        self.is_date_only = true;
        self
    }

    /// Sets the last-row cursor value (walking forward)
    pub fn with_last_value(mut self, value: impl Into<String>) -> Self {
        self.last_value = Some(value.into());
        self
    }

    /// Sets the first-row cursor value (walking backward)
    pub fn with_first_value(mut self, value: impl Into<String>) -> Self {
        self.first_value = Some(value.into());
        self
    }
}

/// One derived sort directive of a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortDirective {
    pub path: FieldPath,
    pub order: SortOrder,
    /// Compare values truncated to their calendar date
    pub date_only: bool,
}

/// Derived filter + sort + limit plan; never persisted.
///
/// `primary_sort` orders the bounded scan. When present, `secondary_sort`
/// restores the stated key order over the selected window: the plan was
/// built with a reversed primary to fetch a window that ends at the cursor
/// (or the tail of the set).
#[derive(Debug, Clone, PartialEq)]
pub struct SeekPlan {
    /// Combined base filter and boundary predicate, if any
    pub filter: Option<PredicateNode>,
    /// Scan order
    pub primary_sort: Vec<SortDirective>,
    /// Window re-order, present only for backward/tail walks
    pub secondary_sort: Option<Vec<SortDirective>>,
    /// Row budget; `None` for keyless plans, which degrade to plain filters
    pub page_size: Option<usize>,
}
