#![deny(missing_docs)]

//! # Type Mapping
//!
//! Converts OpenAPI type and format specifiers into Rust type names.
//! A two tier table drives the conversion: the defaults bundled with this
//! crate, and per project overrides merged on top of them at format
//! granularity.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use openapiv3::{
    IntegerFormat, NumberFormat, Schema, SchemaKind, StringFormat, Type, VariantOrUnknownOrEmpty,
};
use serde::{Deserialize, Serialize};

/// A Rust type, eg. `DateTime<Utc>`, with the crate providing it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetType {
    /// The type name as it would appear in source code.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Whether values of this type may be null on the wire.
    #[serde(default)]
    pub nullable: bool,
    /// The crate to import for this type. `None` for std and primitives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub import: Option<String>,
}

/// The target types for every format of one OpenAPI type specifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatMappings {
    /// Fallback type name when the schema names no format, or a format
    /// with no entry of its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    /// Per format target types, keyed by the wire format name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub formats: BTreeMap<String, TargetType>,
}

/// Maps an OpenAPI type specifier ("string", "integer", ...) to the target
/// types for its formats.
pub type TypeMapping = BTreeMap<String, FormatMappings>;

static DEFAULT_TYPE_MAPPING_YAML: &str = include_str!("defaults/typemapping.yaml");

static DEFAULT_TYPE_MAPPING: Lazy<TypeMapping> = Lazy::new(|| {
    // The bundled table ships inside the binary and is covered by a unit
    // test, so this parse does not fail at runtime.
    serde_yaml::from_str(DEFAULT_TYPE_MAPPING_YAML).expect("bundled type mapping must parse")
});

/// The immutable default table bundled with this crate.
pub fn default_type_mapping() -> &'static TypeMapping {
    &DEFAULT_TYPE_MAPPING
}

/// Returns a new mapping where entries in `base` are replaced or
/// supplemented with entries from `overrides`.
///
/// The merge works per format: overriding `integer/int32` leaves every
/// other integer format untouched. A type level default is only replaced
/// when the override supplies one.
pub fn merge_type_mappings(base: &TypeMapping, overrides: &TypeMapping) -> TypeMapping {
    let mut merged = TypeMapping::new();

    for layer in [base, overrides] {
        for (type_name, mappings) in layer {
            let entry = merged.entry(type_name.clone()).or_default();
            if mappings.default.is_some() {
                entry.default = mappings.default.clone();
            }
            for (format, target) in &mappings.formats {
                entry.formats.insert(format.clone(), target.clone());
            }
        }
    }

    merged
}

/// Resolves the target type for a primitive schema through `mapping`.
///
/// Composite schemas (`allOf` and friends) describe shapes rather than
/// single values and resolve to `None`, as do types the table does not
/// know. A format without an entry of its own falls back to the type level
/// default.
pub fn resolve_target_type(schema: &Schema, mapping: &TypeMapping) -> Option<TargetType> {
    let (type_name, format) = primitive_type_and_format(schema)?;
    let entry = mapping.get(&type_name)?;

    if let Some(format) = format {
        if let Some(target) = entry.formats.get(&format) {
            return Some(target.clone());
        }
    }

    entry.default.as_ref().map(|name| TargetType {
        type_name: name.clone(),
        nullable: false,
        import: None,
    })
}

/// Extracts the wire level (type, format) pair of a schema, if it has one.
fn primitive_type_and_format(schema: &Schema) -> Option<(String, Option<String>)> {
    match &schema.schema_kind {
        SchemaKind::Type(Type::String(string)) => {
            Some(("string".to_string(), string_format(&string.format)))
        }
        SchemaKind::Type(Type::Integer(integer)) => {
            Some(("integer".to_string(), integer_format(&integer.format)))
        }
        SchemaKind::Type(Type::Number(number)) => {
            Some(("number".to_string(), number_format(&number.format)))
        }
        SchemaKind::Type(Type::Boolean(_)) => Some(("boolean".to_string(), None)),
        SchemaKind::Type(Type::Array(_)) => Some(("array".to_string(), None)),
        SchemaKind::Type(Type::Object(_)) => Some(("object".to_string(), None)),
        // Untyped schemas keep their raw specifiers, which may name formats
        // the table has entries for.
        SchemaKind::Any(any) => any.typ.clone().map(|typ| (typ, any.format.clone())),
        SchemaKind::OneOf { .. }
        | SchemaKind::AllOf { .. }
        | SchemaKind::AnyOf { .. }
        | SchemaKind::Not { .. } => None,
    }
}

fn string_format(format: &VariantOrUnknownOrEmpty<StringFormat>) -> Option<String> {
    match format {
        VariantOrUnknownOrEmpty::Item(StringFormat::Date) => Some("date".to_string()),
        VariantOrUnknownOrEmpty::Item(StringFormat::DateTime) => Some("date-time".to_string()),
        VariantOrUnknownOrEmpty::Item(StringFormat::Password) => Some("password".to_string()),
        VariantOrUnknownOrEmpty::Item(StringFormat::Byte) => Some("byte".to_string()),
        VariantOrUnknownOrEmpty::Item(StringFormat::Binary) => Some("binary".to_string()),
        VariantOrUnknownOrEmpty::Unknown(other) => Some(other.clone()),
        VariantOrUnknownOrEmpty::Empty => None,
    }
}

fn integer_format(format: &VariantOrUnknownOrEmpty<IntegerFormat>) -> Option<String> {
    match format {
        VariantOrUnknownOrEmpty::Item(IntegerFormat::Int32) => Some("int32".to_string()),
        VariantOrUnknownOrEmpty::Item(IntegerFormat::Int64) => Some("int64".to_string()),
        VariantOrUnknownOrEmpty::Unknown(other) => Some(other.clone()),
        VariantOrUnknownOrEmpty::Empty => None,
    }
}

fn number_format(format: &VariantOrUnknownOrEmpty<NumberFormat>) -> Option<String> {
    match format {
        VariantOrUnknownOrEmpty::Item(NumberFormat::Float) => Some("float".to_string()),
        VariantOrUnknownOrEmpty::Item(NumberFormat::Double) => Some("double".to_string()),
        VariantOrUnknownOrEmpty::Unknown(other) => Some(other.clone()),
        VariantOrUnknownOrEmpty::Empty => None,
    }
}
