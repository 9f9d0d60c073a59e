//! Filter compilation tests
//!
//! End-to-end coverage of the string-to-predicate pipeline:
//! - segmentation invariants and bracket checking
//! - type dispatch per field kind, including the preserved quirks
//! - AND/OR precedence with explicit grouping
//! - the error taxonomy
//! - emitter round-trips

use searchstring::catalog::{Catalog, FieldDescriptor};
use searchstring::compiler::compile;
use searchstring::errors::SearchError;
use searchstring::parser::{prefix_fields, segment};
use searchstring::predicate::{emit, evaluate, PredicateNode};
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn people_catalog() -> Catalog {
    let address = Catalog::new()
        .with_field("City", FieldDescriptor::string())
        .with_field("Zip", FieldDescriptor::string());
    let order = Catalog::new()
        .with_field("Product", FieldDescriptor::string())
        .with_field("Price", FieldDescriptor::int());

    Catalog::new()
        .with_field("Name", FieldDescriptor::string())
        .with_field("Role", FieldDescriptor::string())
        .with_field("City", FieldDescriptor::string())
        .with_field("Age", FieldDescriptor::int())
        .with_field("Rating", FieldDescriptor::float())
        .with_field("Active", FieldDescriptor::boolean())
        .with_field("Joined", FieldDescriptor::date())
        .with_field("Id", FieldDescriptor::guid())
        .with_field(
            "Status",
            FieldDescriptor::enumeration([("Active", 1), ("Suspended", 2), ("Deleted", 3)]),
        )
        .with_field(
            "Permissions",
            FieldDescriptor::flags([("Read", 1), ("Write", 2), ("Delete", 4)]),
        )
        .with_field("Address", FieldDescriptor::object(address))
        .with_field("Orders", FieldDescriptor::collection(order))
}

fn matches(input: &str, object: &Value) -> bool {
    let node = compile(input, &people_catalog()).expect("query should compile");
    evaluate(&node, object)
}

// =============================================================================
// Segmentation
// =============================================================================

/// Valid bracket-balanced inputs always yield one more clause than connectives.
#[test]
fn test_clause_count_invariant() {
    for input in [
        "age>=30",
        "age>=30 and city=Paris",
        "age>30 or age<10 and active=true",
        "(name=A* or name=B*) and age!=0",
    ] {
        let (clauses, connectives) = segment(input).unwrap();
        assert_eq!(clauses.len(), connectives.len() + 1, "input: {input}");
    }
}

#[test]
fn test_unbalanced_brackets_are_syntax_errors() {
    let catalog = people_catalog();
    assert!(matches!(
        compile("(age>30 and city=Paris", &catalog),
        Err(SearchError::Syntax { .. })
    ));
    assert!(matches!(
        compile("age>30) and (city=Paris", &catalog),
        Err(SearchError::Syntax { .. })
    ));
}

// =============================================================================
// Basic Comparisons
// =============================================================================

/// Blank search strings compile to a predicate that is true for everything.
#[test]
fn test_blank_input_matches_everything() {
    assert!(matches("", &json!({})));
    assert!(matches("   ", &json!({"Age": 1})));
}

#[test]
fn test_numeric_boundary() {
    assert!(matches("age>=30", &json!({"Age": 30})));
    assert!(!matches("age>=30", &json!({"Age": 29})));
}

#[test]
fn test_float_comparison() {
    assert!(matches("rating>4.5", &json!({"Rating": 4.7})));
    assert!(!matches("rating>4.5", &json!({"Rating": 4.5})));
}

#[test]
fn test_string_relational_is_ordinal() {
    assert!(matches("name>adam", &json!({"Name": "mike"})));
    assert!(matches("name<=mike", &json!({"Name": "mike"})));
}

#[test]
fn test_not_equal_matches_missing_field() {
    assert!(matches("name!=John", &json!({})));
    assert!(matches("name!=John", &json!({"Name": "Jane"})));
    assert!(!matches("name!=John", &json!({"Name": "John"})));
}

#[test]
fn test_empty_operator() {
    assert!(matches("name empty and age>0", &json!({"Age": 1})));
    assert!(matches("name empty and age>0", &json!({"Name": "", "Age": 1})));
    assert!(!matches("name empty and age>0", &json!({"Name": "x", "Age": 1})));
}

// =============================================================================
// Wildcards
// =============================================================================

/// `name=Jo*n` is startswith("Jo") AND endswith("n").
#[test]
fn test_wildcard_prefix_suffix() {
    assert!(matches("name=Jo*n", &json!({"Name": "John"})));
    assert!(matches("name=Jo*n", &json!({"Name": "Jon"})));
    assert!(!matches("name=Jo*n", &json!({"Name": "Johnny"})));
}

#[test]
fn test_wildcard_combined_with_other_clauses() {
    let object = json!({"Name": "John", "City": "Paris"});
    assert!(matches("name=John* or city=Paris", &object));
    assert!(matches("name=J*n and city=Paris", &object));
}

// =============================================================================
// Precedence
// =============================================================================

/// `status=Active and (role=Admin or role=Owner)` against all 8 truth
/// combinations of the three leaves.
#[test]
fn test_precedence_truth_table() {
    let input = "status=Active and (role=Admin or role=Owner)";
    for status_active in [true, false] {
        for role in ["Admin", "Owner", "Viewer"] {
            let object = json!({
                "Status": if status_active { "Active" } else { "Suspended" },
                "Role": role,
            });
            let expected = status_active && (role == "Admin" || role == "Owner");
            assert_eq!(matches(input, &object), expected, "status_active={status_active} role={role}");
        }
    }
}

/// Without parens AND binds tighter: a or b and c == a or (b and c).
#[test]
fn test_and_binds_tighter_than_or() {
    let input = "city=Paris or age>40 and active=true";
    assert!(matches(input, &json!({"City": "Paris", "Age": 10, "Active": false})));
    assert!(matches(input, &json!({"City": "Lyon", "Age": 50, "Active": true})));
    assert!(!matches(input, &json!({"City": "Lyon", "Age": 50, "Active": false})));
}

#[test]
fn test_parens_override_precedence() {
    let input = "(city=Paris or age>40) and active=true";
    assert!(!matches(input, &json!({"City": "Paris", "Age": 10, "Active": false})));
    assert!(matches(input, &json!({"City": "Paris", "Age": 10, "Active": true})));
}

// =============================================================================
// Kind-specific dispatch
// =============================================================================

#[test]
fn test_date_equality_truncates_time() {
    let input = "joined=01.05.2024";
    assert!(matches(input, &json!({"Joined": "2024-05-01T23:59:59Z"})));
    assert!(!matches(input, &json!({"Joined": "2024-05-02T00:00:01Z"})));
}

#[test]
fn test_date_relational() {
    assert!(matches("joined<01.01.2025", &json!({"Joined": "2024-12-31"})));
    assert!(!matches("joined<01.01.2025", &json!({"Joined": "2025-01-01"})));
}

#[test]
fn test_flags_membership() {
    // Permissions 3 = Read|Write
    assert!(matches("permissions=Read", &json!({"Permissions": 3})));
    assert!(matches("permissions=Write", &json!({"Permissions": 3})));
    assert!(!matches("permissions=Delete", &json!({"Permissions": 3})));
    assert!(matches("permissions!=Delete", &json!({"Permissions": 3})));
}

#[test]
fn test_flags_relational_rejected() {
    let result = compile("permissions>Read", &people_catalog());
    assert_eq!(
        result,
        Err(SearchError::operator_not_allowed(">", "Permissions", "=,!="))
    );
}

#[test]
fn test_enum_by_member_name() {
    assert!(matches("status=Suspended", &json!({"Status": "Suspended"})));
    assert!(matches("status=Suspended", &json!({"Status": 2})));
    assert!(matches("status>Active", &json!({"Status": 3})));
}

#[test]
fn test_guid_equality_is_case_insensitive() {
    let input = "id=6f9619ff-8b86-d011-b42d-00c04fc964ff";
    assert!(matches(input, &json!({"Id": "6F9619FF-8B86-D011-B42D-00C04FC964FF"})));
    assert!(!matches(input, &json!({"Id": "00000000-0000-0000-0000-000000000000"})));
}

/// Relational operators on booleans behave as != against the literal.
#[test]
fn test_boolean_relational_quirk() {
    assert!(matches("active>false", &json!({"Active": true})));
    assert!(!matches("active>false", &json!({"Active": false})));
    assert!(matches("active<=true", &json!({"Active": false})));
}

// =============================================================================
// Paths
// =============================================================================

#[test]
fn test_nested_object_path() {
    assert!(matches("address.city=Paris", &json!({"Address": {"City": "Paris"}})));
    assert!(!matches("address.city=Paris", &json!({"Address": {"City": "Lyon"}})));
    assert!(!matches("address.city=Paris", &json!({})));
}

/// A path through a collection quantifies existentially over its elements.
#[test]
fn test_collection_path_is_existential() {
    let object = json!({"Orders": [
        {"Product": "chair", "Price": 40},
        {"Product": "desk", "Price": 200},
    ]});
    assert!(matches("orders.price>100", &object));
    assert!(matches("orders.product=desk", &object));
    assert!(!matches("orders.price>500", &object));
}

// =============================================================================
// Error taxonomy
// =============================================================================

#[test]
fn test_unknown_field_error() {
    let result = compile("height>180", &people_catalog());
    assert_eq!(result, Err(SearchError::unknown_field("height")));
}

#[test]
fn test_invalid_value_errors() {
    let catalog = people_catalog();
    assert!(matches!(
        compile("age>tall", &catalog),
        Err(SearchError::InvalidValue { .. })
    ));
    assert!(matches!(
        compile("joined=2024-05-01", &catalog),
        Err(SearchError::InvalidValue { .. })
    ));
    assert!(matches!(
        compile("status=Dormant", &catalog),
        Err(SearchError::InvalidValue { .. })
    ));
    assert!(matches!(
        compile("id=xyz", &catalog),
        Err(SearchError::InvalidValue { .. })
    ));
}

#[test]
fn test_operator_not_allowed_reports_allowed_set() {
    match compile("id>6f9619ff-8b86-d011-b42d-00c04fc964ff", &people_catalog()) {
        Err(SearchError::OperatorNotAllowed { operator, field, allowed }) => {
            assert_eq!(operator, ">");
            assert_eq!(field, "Id");
            assert!(allowed.contains("=,!="));
        }
        other => panic!("expected OperatorNotAllowed, got {:?}", other),
    }
}

// =============================================================================
// Round-trips
// =============================================================================

/// Re-deriving the printable form preserves grouping paren positions for
/// inputs whose and/or splitting is unambiguous.
#[test]
fn test_emit_round_trip_preserves_grouping() {
    let catalog = people_catalog();
    for input in [
        "Age>=30",
        "Status=Active and (Role=Admin or Role=Owner)",
        "(City=Paris or Age>40) and Active=true",
        "City=Paris or Age>40 and Active=true",
    ] {
        let node = compile(input, &catalog).unwrap();
        let emitted = emit(&node);
        assert_eq!(emitted, input, "round-trip of {input}");

        let reparsed = compile(&emitted, &catalog).unwrap();
        assert_eq!(reparsed, node, "recompile of {emitted}");
    }
}

#[test]
fn test_emitted_existential_recompiles() {
    let catalog = people_catalog();
    let node = compile("orders.price>100", &catalog).unwrap();
    assert_eq!(emit(&node), "Orders.Price>100");
    assert_eq!(compile(&emit(&node), &catalog).unwrap(), node);
}

/// A query written against a child type can be nested under its parent
/// field and compiled against the parent catalog.
#[test]
fn test_prefix_fields_nests_a_query() {
    let rewritten = prefix_fields("city=Paris or zip=75", "address").unwrap();
    assert_eq!(rewritten, "address.city=Paris or address.zip=75");

    let node = compile(&rewritten, &people_catalog()).unwrap();
    assert!(evaluate(&node, &json!({"Address": {"City": "Paris"}})));
    assert!(evaluate(&node, &json!({"Address": {"Zip": "75"}})));
    assert!(!evaluate(&node, &json!({"Address": {"City": "Lyon"}})));
}

#[test]
fn test_blank_emits_blank() {
    let node = compile("", &people_catalog()).unwrap();
    assert_eq!(node, PredicateNode::Always(true));
    assert_eq!(emit(&node), "");
}
