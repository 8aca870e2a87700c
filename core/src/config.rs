#![deny(missing_docs)]

//! # Configuration
//!
//! The YAML configuration document controlling generation. Today it holds
//! the import mapping handed to the rendering stage and the type mapping
//! overrides, which are merged onto the bundled defaults at load time.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::type_mapping::{default_type_mapping, merge_type_mappings, TypeMapping};

/// An external package to import for a generated type, eg. `chrono`,
/// optionally under an alias.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportSpec {
    /// Alias to import the package under.
    #[serde(default)]
    pub alias: Option<String>,
    /// The package to import.
    pub package: String,
}

/// Generation settings loaded from the user's configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    /// Packages to import per type name, in the order the file lists them.
    #[serde(rename = "import-mapping", default)]
    pub import_mapping: IndexMap<String, ImportSpec>,

    /// Type mapping overrides, merged onto the defaults.
    #[serde(rename = "type-mapping", default)]
    pub type_overrides: TypeMapping,

    /// The composite of the default mapping and the overrides.
    #[serde(skip)]
    type_mapping: TypeMapping,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            import_mapping: IndexMap::new(),
            type_overrides: TypeMapping::new(),
            type_mapping: default_type_mapping().clone(),
        }
    }
}

impl Configuration {
    /// Loads a configuration from YAML and computes the effective type
    /// mapping. Empty input behaves like a missing file and yields the
    /// defaults.
    pub fn from_yaml(input: &str) -> AppResult<Configuration> {
        if input.trim().is_empty() {
            return Ok(Configuration::default());
        }

        let mut config: Configuration = serde_yaml::from_str(input)
            .map_err(|e| AppError::Config(format!("loading configuration: {}", e)))?;

        config.type_mapping = merge_type_mappings(default_type_mapping(), &config.type_overrides);
        Ok(config)
    }

    /// The effective type mapping: defaults with the overrides applied.
    pub fn type_mapping(&self) -> &TypeMapping {
        &self.type_mapping
    }
}
