#![deny(missing_docs)]

//! # Type Definitions
//!
//! Turns the indexed schema locations into language neutral type
//! descriptors. This is the hand-off point to a rendering backend: each
//! descriptor carries the tree path, the friendly name when one could be
//! assigned, the resolved target type for primitives and the raw schema
//! for everything a backend needs to inspect itself.

use openapiv3::{ReferenceOr, Schema};
use serde::Serialize;

use crate::config::Configuration;
use crate::error::{AppError, AppResult};
use crate::flatten::PathIndex;
use crate::tree::{NodeId, Payload, SchemaTree};
use crate::type_mapping::{resolve_target_type, TargetType};

/// One type to generate, described independently of any target language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDefinition {
    /// The tree path this definition was derived from.
    pub schema_path: String,
    /// The unique friendly name, when the naming pass found one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// The mapped target type, when the schema is a mappable primitive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_type: Option<TargetType>,
    /// The schema as it appeared in the document.
    pub raw_schema: ReferenceOr<Schema>,
}

/// Produces the type definitions for every indexed node, in index order.
///
/// Parameters, request bodies and responses describe wiring around
/// schemas rather than types of their own; the schemas they embed are
/// indexed separately, so those payloads produce nothing here. Header and
/// security scheme payloads have no descriptor form yet and fail
/// generation outright rather than silently dropping document content.
pub fn generate_type_definitions(
    tree: &SchemaTree,
    index: &PathIndex,
    config: &Configuration,
) -> AppResult<Vec<TypeDefinition>> {
    let mut definitions = Vec::new();

    for (path, id) in index {
        let node = tree.node(*id);
        if node.reference.is_some() {
            continue;
        }

        match &node.payload {
            Payload::Schema(schema) => {
                definitions.extend(schema_type_definitions(tree, *id, path, schema, config)?);
            }
            Payload::Parameter(_) | Payload::RequestBody(_) | Payload::Response(_) => {}
            Payload::Header(_) | Payload::SecurityScheme(_) => {
                return Err(AppError::UnsupportedPayload {
                    path: path.clone(),
                    kind: node.payload.kind(),
                });
            }
            Payload::Structural => {}
        }
    }

    Ok(definitions)
}

/// The definitions for a single schema node. Today this is one descriptor
/// per node; the seam returns a vector so a schema can later expand into
/// several definitions (an enum and its values, say) without touching the
/// caller.
fn schema_type_definitions(
    tree: &SchemaTree,
    id: NodeId,
    path: &str,
    schema: &ReferenceOr<Schema>,
    config: &Configuration,
) -> AppResult<Vec<TypeDefinition>> {
    let target_type = match schema {
        ReferenceOr::Item(item) => resolve_target_type(item, config.type_mapping()),
        ReferenceOr::Reference { .. } => None,
    };

    Ok(vec![TypeDefinition {
        schema_path: path.to_string(),
        type_name: tree.node(id).friendly_name.clone(),
        target_type,
        raw_schema: schema.clone(),
    }])
}
