#![deny(missing_docs)]

//! # OAG Core
//!
//! Core library of the OpenAPI generator front end: walks a document into
//! a path tree, indexes and names the schemas it finds and maps them to
//! target language types.

/// Shared error types.
pub mod error;

/// The schema path tree.
pub mod tree;

/// Document walk building the tree.
pub mod gather;

/// Tree flattening into the path index.
pub mod flatten;

/// Primitive type mapping (schema type/format -> target type).
pub mod type_mapping;

/// Configuration loading and merging.
pub mod config;

/// Friendly name assignment.
pub mod naming;

/// Type definition derivation.
pub mod typedef;

/// The end to end generation pipeline.
pub mod codegen;

pub use codegen::generate;
pub use config::{Configuration, ImportSpec};
pub use error::{AppError, AppResult};
pub use flatten::{flatten_tree, PathIndex};
pub use gather::build_schema_tree;
pub use naming::assign_friendly_names;
pub use tree::{NodeId, PathNode, Payload, SchemaTree};
pub use type_mapping::{
    default_type_mapping, merge_type_mappings, resolve_target_type, FormatMappings, TargetType,
    TypeMapping,
};
pub use typedef::{generate_type_definitions, TypeDefinition};
