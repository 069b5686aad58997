//! modelkit Command-Line Compiler
//!
//! Loads a JSON array of entity specs, compiles it, and prints the resolved
//! schema graph.

mod config;
mod error;
mod formatter;

use clap::Parser;
use config::Args;
use error::CliError;
use modelkit_core::{CompilerConfig, EntitySpec, SchemaCompiler};
use std::path::Path;
use tracing::debug;

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("modelkit_cli=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<String, CliError> {
    let specs = load_specs(&args.file)?;
    debug!(path = %args.file.display(), entities = specs.len(), "Loaded schema document");

    let compiler = SchemaCompiler::with_config(CompilerConfig::from(args));
    let schema = compiler.compile(specs)?;

    formatter::create_formatter(args.format).format_schema(&schema)
}

/// Read and validate the entity specs in a JSON document.
fn load_specs(path: &Path) -> Result<Vec<EntitySpec>, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
