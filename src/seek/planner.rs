//! Seek plan derivation
//!
//! Builds the composite boundary predicate with the classic keyset
//! technique: for key index k, a conjunction asserting equality on keys
//! 0..k-1 and the strict directional inequality on key k; the conjunctions
//! are OR-ed across all keys. The inequality always points away from the
//! cursor, toward unseen rows. The boundary is rendered in the standard
//! filter grammar, AND-combined with the base filter, and compiled through
//! the regular pipeline, so planning failures surface as ordinary compile
//! errors.

use crate::catalog::{Catalog, FieldKind};
use crate::compiler::compile;
use crate::errors::{SearchError, SearchResult};
use crate::predicate::FieldPath;

use super::keys::{SeekDirection, SeekPlan, SortDirective, SortKey, SortOrder};

/// Derives a seek plan for one page request.
///
/// Keys with blank field names are skipped. With no usable keys the plan
/// degrades to the plain compiled base filter, unsorted and unbounded.
pub fn plan(
    base_filter: Option<&str>,
    keys: &[SortKey],
    page_size: usize,
    direction: SeekDirection,
    catalog: &Catalog,
) -> SearchResult<SeekPlan> {
    let active: Vec<&SortKey> = keys
        .iter()
        .filter(|key| !key.field.trim().is_empty())
        .collect();

    if active.is_empty() {
        return Ok(SeekPlan {
            filter: compile_optional(base_filter, catalog)?,
            primary_sort: Vec::new(),
            secondary_sort: None,
            page_size: None,
        });
    }

    let mut primary = Vec::with_capacity(active.len());
    let mut secondary = Vec::with_capacity(active.len());
    let mut two_pass = false;

    let mut disjuncts: Vec<String> = Vec::new();
    let mut prefix_eq: Vec<String> = Vec::new();

    for (index, key) in active.iter().enumerate() {
        let path = resolve_sort_path(&key.field, catalog)?;

        // Backward and tail walks scan in reverse and restore the stated
        // order over the selected window afterwards.
        let reversed = match direction {
            SeekDirection::Last => true,
            SeekDirection::Previous => nonblank(key.first_value.as_deref()).is_some(),
            SeekDirection::First | SeekDirection::Next => false,
        };
        let directive = SortDirective {
            path: path.clone(),
            order: key.order,
            date_only: key.is_date_only,
        };
        secondary.push(directive.clone());
        if reversed {
            two_pass = true;
            primary.push(SortDirective {
                order: key.order.reversed(),
                ..directive
            });
        } else {
            primary.push(directive);
        }

        // First and last pages carry no cursor boundary.
        if matches!(direction, SeekDirection::First | SeekDirection::Last) {
            continue;
        }

        let (value, inequality) = match direction {
            SeekDirection::Previous => match nonblank(key.first_value.as_deref()) {
                Some(value) => (
                    value,
                    match key.order {
                        SortOrder::Asc => "<",
                        SortOrder::Desc => ">",
                    },
                ),
                None => continue,
            },
            SeekDirection::Next => match nonblank(key.last_value.as_deref()) {
                Some(value) => (
                    value,
                    match key.order {
                        SortOrder::Asc => ">",
                        SortOrder::Desc => "<",
                    },
                ),
                None => continue,
            },
            _ => unreachable!(),
        };

        let dotted = path.dotted();
        disjuncts.push(conjunction(
            &prefix_eq,
            &format!("{}{}{}", dotted, inequality, value),
        ));

        // A non-unique final key needs one more disjunct covering rows
        // that tie with the cursor on every key; a unique final key makes
        // such ties impossible.
        if index + 1 == active.len() && !key.is_unique {
            disjuncts.push(conjunction(&prefix_eq, &format!("{}={}", dotted, value)));
        }

        if !key.is_unique {
            prefix_eq.push(format!("{}={}", dotted, value));
        }
    }

    let boundary =
        (!disjuncts.is_empty()).then(|| format!("({})", disjuncts.join("or")));

    let filter_text = match (base_filter.and_then(nonblank_str), boundary) {
        (Some(base), Some(boundary)) => Some(format!("({})and{}", base, boundary)),
        (Some(base), None) => Some(base.to_string()),
        (None, Some(boundary)) => Some(boundary),
        (None, None) => None,
    };
    let filter = filter_text
        .as_deref()
        .map(|text| compile(text, catalog))
        .transpose()?;

    Ok(SeekPlan {
        filter,
        primary_sort: primary,
        secondary_sort: two_pass.then_some(secondary),
        page_size: Some(page_size),
    })
}

fn compile_optional(
    filter: Option<&str>,
    catalog: &Catalog,
) -> SearchResult<Option<crate::predicate::PredicateNode>> {
    filter
        .and_then(nonblank_str)
        .map(|text| compile(text, catalog))
        .transpose()
}

fn conjunction(prefix_eq: &[String], term: &str) -> String {
    if prefix_eq.is_empty() {
        format!("({})", term)
    } else {
        format!("({}and{})", prefix_eq.join("and"), term)
    }
}

/// Resolves a dotted sort path against the catalog.
///
/// Sort paths may traverse nested objects but not collections; an
/// unresolvable or collection-crossing path is an unknown field.
fn resolve_sort_path(field: &str, catalog: &Catalog) -> SearchResult<FieldPath> {
    let segments: Vec<&str> = field.trim().split('.').collect();
    let mut resolved = Vec::with_capacity(segments.len());
    let mut current = catalog;

    for (depth, segment) in segments.iter().enumerate() {
        let (canonical, descriptor) = current
            .resolve(segment)
            .ok_or_else(|| SearchError::unknown_field(field))?;
        resolved.push(canonical.to_string());

        if depth + 1 < segments.len() {
            match (&descriptor.kind, descriptor.is_collection) {
                (FieldKind::Object { fields }, false) => current = fields,
                _ => return Err(SearchError::unknown_field(field)),
            }
        }
    }

    Ok(FieldPath::new(resolved))
}

fn nonblank(value: Option<&str>) -> Option<&str> {
    value.and_then(nonblank_str)
}

fn nonblank_str(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FieldDescriptor;
    use crate::predicate::emit;

    fn catalog() -> Catalog {
        Catalog::new()
            .with_field("Id", FieldDescriptor::int())
            .with_field("Age", FieldDescriptor::int())
            .with_field("Name", FieldDescriptor::string())
            .with_field("Created", FieldDescriptor::date())
    }

    #[test]
    fn test_forward_boundary_unique_key() {
        let keys = [SortKey::asc("id").unique().with_last_value("2")];
        let plan = plan(None, &keys, 2, SeekDirection::Next, &catalog()).unwrap();

        assert_eq!(emit(plan.filter.as_ref().unwrap()), "Id>2");
        assert_eq!(plan.primary_sort[0].order, SortOrder::Asc);
        assert_eq!(plan.secondary_sort, None);
        assert_eq!(plan.page_size, Some(2));
    }

    #[test]
    fn test_backward_boundary_reverses_scan() {
        let keys = [SortKey::asc("id").unique().with_first_value("3")];
        let plan = plan(None, &keys, 2, SeekDirection::Previous, &catalog()).unwrap();

        assert_eq!(emit(plan.filter.as_ref().unwrap()), "Id<3");
        assert_eq!(plan.primary_sort[0].order, SortOrder::Desc);
        let secondary = plan.secondary_sort.unwrap();
        assert_eq!(secondary[0].order, SortOrder::Asc);
    }

    #[test]
    fn test_last_page_has_no_boundary() {
        let keys = [SortKey::asc("id").unique().with_last_value("2")];
        let plan = plan(None, &keys, 2, SeekDirection::Last, &catalog()).unwrap();

        assert_eq!(plan.filter, None);
        assert_eq!(plan.primary_sort[0].order, SortOrder::Desc);
        assert!(plan.secondary_sort.is_some());
    }

    #[test]
    fn test_composite_boundary_equality_prefix() {
        let keys = [
            SortKey::asc("age").with_last_value("30"),
            SortKey::asc("id").unique().with_last_value("17"),
        ];
        let plan = plan(None, &keys, 10, SeekDirection::Next, &catalog()).unwrap();

        // OR over: strict inequality on age; age tie + strict on id
        assert_eq!(
            emit(plan.filter.as_ref().unwrap()),
            "Age>30 or Age=30 and Id>17"
        );
    }

    #[test]
    fn test_non_unique_final_key_gets_tie_disjunct() {
        let keys = [SortKey::asc("name").with_last_value("m")];
        let plan = plan(None, &keys, 10, SeekDirection::Next, &catalog()).unwrap();

        assert_eq!(emit(plan.filter.as_ref().unwrap()), "Name>m or Name=m");
    }

    #[test]
    fn test_base_filter_combined_with_and() {
        let keys = [SortKey::asc("id").unique().with_last_value("2")];
        let plan = plan(
            Some("age>=30"),
            &keys,
            2,
            SeekDirection::Next,
            &catalog(),
        )
        .unwrap();

        assert_eq!(emit(plan.filter.as_ref().unwrap()), "Age>=30 and Id>2");
    }

    #[test]
    fn test_keyless_plan_degrades_to_filter() {
        let plan = plan(Some("age>=30"), &[], 5, SeekDirection::Next, &catalog()).unwrap();
        assert!(plan.filter.is_some());
        assert!(plan.primary_sort.is_empty());
        assert_eq!(plan.page_size, None);
    }

    #[test]
    fn test_blank_key_names_skipped() {
        let keys = [SortKey::asc("  "), SortKey::asc("id").unique()];
        let plan = plan(None, &keys, 5, SeekDirection::First, &catalog()).unwrap();
        assert_eq!(plan.primary_sort.len(), 1);
    }

    #[test]
    fn test_unknown_sort_field_rejected() {
        let keys = [SortKey::asc("height")];
        let result = plan(None, &keys, 5, SeekDirection::First, &catalog());
        assert_eq!(result, Err(SearchError::unknown_field("height")));
    }

    #[test]
    fn test_first_page_ignores_cursor_values() {
        let keys = [SortKey::asc("id").unique().with_last_value("2")];
        let plan = plan(None, &keys, 2, SeekDirection::First, &catalog()).unwrap();

        assert_eq!(plan.filter, None);
        assert_eq!(plan.primary_sort[0].order, SortOrder::Asc);
        assert_eq!(plan.secondary_sort, None);
    }

    #[test]
    fn test_date_only_key_carried_into_directives() {
        let keys = [
            SortKey::desc("created").date_only(),
            SortKey::asc("id").unique(),
        ];
        let plan = plan(None, &keys, 5, SeekDirection::Last, &catalog()).unwrap();

        assert!(plan.primary_sort[0].date_only);
        assert!(!plan.primary_sort[1].date_only);
        // The reversed primary keeps the flag alongside the flipped order
        assert_eq!(plan.primary_sort[0].order, SortOrder::Asc);
        assert!(plan.secondary_sort.unwrap()[0].date_only);
    }
}
