//! Catalog type definitions
//!
//! Supported field kinds:
//! - string: UTF-8 string
//! - int: 64-bit signed integer
//! - float: 64-bit floating point
//! - bool: Boolean
//! - date: calendar date (comparisons are date-only)
//! - guid: identifier with strict GUID syntax
//! - enum: named members over an underlying integer
//! - flags: bit-flag members over an underlying integer
//! - object: nested object with its own catalog

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Resolved kind of a catalog field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldKind {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Int,
    /// 64-bit floating point
    Float,
    /// Boolean
    Bool,
    /// Calendar date; literals use the fixed `dd.MM.yyyy` pattern
    Date,
    /// Identifier parsed with strict GUID syntax
    Guid,
    /// Plain enumeration: member name -> underlying integer value
    Enum { members: HashMap<String, i64> },
    /// Flagged enumeration: member name -> bit value
    Flags { members: HashMap<String, i64> },
    /// Nested object with its own field catalog
    Object { fields: Catalog },
}

impl FieldKind {
    /// Returns the kind name for error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Int => "int",
            FieldKind::Float => "float",
            FieldKind::Bool => "bool",
            FieldKind::Date => "date",
            FieldKind::Guid => "guid",
            FieldKind::Enum { .. } => "enum",
            FieldKind::Flags { .. } => "flags",
            FieldKind::Object { .. } => "object",
        }
    }
}

/// Descriptor for one catalog field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field kind; for collections, the element kind
    #[serde(flatten)]
    pub kind: FieldKind,
    /// True for collection-valued fields; a non-terminal collection segment
    /// triggers existential compilation of the remaining path suffix
    #[serde(default)]
    pub is_collection: bool,
}

impl FieldDescriptor {
    /// Create a string field
    pub fn string() -> Self {
        Self {
            kind: FieldKind::String,
            is_collection: false,
        }
    }

    /// Create an int field
    pub fn int() -> Self {
        Self {
            kind: FieldKind::Int,
            is_collection: false,
        }
    }

    /// Create a float field
    pub fn float() -> Self {
        Self {
            kind: FieldKind::Float,
            is_collection: false,
        }
    }

    /// Create a bool field
    pub fn boolean() -> Self {
        Self {
            kind: FieldKind::Bool,
            is_collection: false,
        }
    }

    /// Create a date field
    pub fn date() -> Self {
        Self {
            kind: FieldKind::Date,
            is_collection: false,
        }
    }

    /// Create a guid field
    pub fn guid() -> Self {
        Self {
            kind: FieldKind::Guid,
            is_collection: false,
        }
    }

    /// Create a plain enumeration field
    pub fn enumeration(members: impl IntoIterator<Item = (impl Into<String>, i64)>) -> Self {
        Self {
            kind: FieldKind::Enum {
                members: members.into_iter().map(|(n, v)| (n.into(), v)).collect(),
            },
            is_collection: false,
        }
    }

    /// Create a flagged enumeration field
    pub fn flags(members: impl IntoIterator<Item = (impl Into<String>, i64)>) -> Self {
        Self {
            kind: FieldKind::Flags {
                members: members.into_iter().map(|(n, v)| (n.into(), v)).collect(),
            },
            is_collection: false,
        }
    }

    /// Create a nested object field
    pub fn object(fields: Catalog) -> Self {
        Self {
            kind: FieldKind::Object { fields },
            is_collection: false,
        }
    }

    /// Create a collection of nested objects
    pub fn collection(element_fields: Catalog) -> Self {
        Self {
            kind: FieldKind::Object {
                fields: element_fields,
            },
            is_collection: true,
        }
    }

    /// Returns the nested catalog for object-kind fields
    pub fn nested(&self) -> Option<&Catalog> {
        match &self.kind {
            FieldKind::Object { fields } => Some(fields),
            _ => None,
        }
    }
}

/// Read-only field catalog for one object type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    fields: HashMap<String, FieldDescriptor>,
}

impl Catalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Adds a field, builder-style
    pub fn with_field(mut self, name: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(name.into(), descriptor);
        self
    }

    /// Resolves a field name case-insensitively.
    ///
    /// Returns the canonical (catalog-cased) name alongside the descriptor;
    /// compiled predicates carry the canonical name.
    pub fn resolve(&self, name: &str) -> Option<(&str, &FieldDescriptor)> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(key, descriptor)| (key.as_str(), descriptor))
    }

    /// Returns the number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the catalog has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
