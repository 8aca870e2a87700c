#![deny(missing_docs)]

//! # Generation Pipeline
//!
//! Ties the stages together: walk the document into a path tree, index the
//! addressable nodes, assign friendly names, derive type definitions and
//! serialize them as YAML.

use std::io::Write;

use openapiv3::OpenAPI;
use tracing::debug;

use crate::config::Configuration;
use crate::error::{AppError, AppResult};
use crate::flatten::flatten_tree;
use crate::gather::build_schema_tree;
use crate::naming::assign_friendly_names;
use crate::typedef::generate_type_definitions;

/// Runs the whole pipeline over `spec` and writes the resulting type
/// definitions to `output` as a YAML sequence.
pub fn generate<W: Write>(spec: &OpenAPI, config: &Configuration, output: &mut W) -> AppResult<()> {
    // 1. Walk the document into the path tree.
    let mut tree = build_schema_tree(spec);

    // 2. Index every addressable node.
    let index = flatten_tree(&tree);
    debug!("found {} addressable schema paths", index.len());
    for path in index.keys() {
        debug!(%path, "schema path");
    }

    // 3. Assign unique friendly names across the document.
    assign_friendly_names(&mut tree, &index);

    // 4. Derive the definitions and emit them.
    let definitions = generate_type_definitions(&tree, &index, config)?;
    serde_yaml::to_writer(output, &definitions)
        .map_err(|e| AppError::General(format!("serializing type definitions: {}", e)))
}
