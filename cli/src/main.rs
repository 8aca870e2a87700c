#![deny(missing_docs)]

//! # OAG CLI
//!
//! Command line front end for the OpenAPI type definition generator. Reads
//! a specification document, runs the generation pipeline and prints the
//! derived type definitions to stdout as YAML. Diagnostics never share
//! stdout with the output: they go to a log file when one is requested and
//! are discarded otherwise.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use oag_core::Configuration;
use openapiv3::OpenAPI;
use tracing::debug;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::{CliError, CliResult};

mod error;

#[derive(Parser, Debug)]
#[clap(name = "oag", author, version, about = "OpenAPI type definition generator")]
struct Cli {
    /// The OpenAPI document to generate from. Parsed as JSON when the file
    /// extension says so, as YAML otherwise.
    spec: PathBuf,

    /// Configuration file with type and import mappings.
    #[clap(long)]
    config: Option<PathBuf>,

    /// Write diagnostics to this file. The file is truncated on start.
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    init_logging(cli.log_file.as_deref())?;

    let config = load_configuration(cli.config.as_deref())?;
    let spec = load_spec(&cli.spec)?;
    debug!(spec = %cli.spec.display(), title = %spec.info.title, "loaded specification");

    let mut output = Vec::new();
    oag_core::generate(&spec, &config, &mut output)?;
    debug!(bytes = output.len(), "generation finished");
    std::io::stdout().write_all(&output)?;

    Ok(())
}

/// Installs the tracing subscriber. `RUST_LOG` overrides the default
/// filter, which enables debug output for this tool's own crates only.
fn init_logging(log_file: Option<&Path>) -> CliResult<()> {
    let writer = match log_file {
        Some(path) => BoxMakeWriter::new(Arc::new(File::create(path)?)),
        None => BoxMakeWriter::new(std::io::sink),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("oag=debug,oag_core=debug"));

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_filter(filter);

    if tracing_subscriber::registry().with(layer).try_init().is_err() {
        eprintln!("warning: logging already initialized, keeping the existing subscriber");
    }
    Ok(())
}

/// Loads the configuration, or the defaults when no file is given.
fn load_configuration(path: Option<&Path>) -> CliResult<Configuration> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            Ok(Configuration::from_yaml(&raw)?)
        }
        None => Ok(Configuration::default()),
    }
}

/// Reads and parses the OpenAPI document.
fn load_spec(path: &Path) -> CliResult<OpenAPI> {
    let raw = std::fs::read_to_string(path)?;
    let spec = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&raw)
            .map_err(|e| CliError::Spec(format!("parsing {}: {}", path.display(), e)))?
    } else {
        serde_yaml::from_str(&raw)
            .map_err(|e| CliError::Spec(format!("parsing {}: {}", path.display(), e)))?
    };
    Ok(spec)
}
