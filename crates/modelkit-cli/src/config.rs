//! Command-line arguments.

use crate::formatter::OutputFormat;
use clap::Parser;
use modelkit_core::{CompilerConfig, DEFAULT_BOUND_TYPE_NAME};
use std::path::PathBuf;

/// modelkit schema compiler
#[derive(Parser, Debug)]
#[command(name = "modelkit")]
#[command(version, about = "Compile a declarative entity schema and print the resolved graph")]
pub struct Args {
    /// JSON document containing an array of entity specs
    #[arg(short = 'f', long)]
    pub file: PathBuf,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,

    /// Require inverse pairs to target each other's owning entities
    #[arg(long)]
    pub strict_inverses: bool,

    /// Bound type name for entities that do not declare one
    #[arg(long, default_value = DEFAULT_BOUND_TYPE_NAME)]
    pub default_bound_type: String,

    /// Do not warn about storage hints on small attribute types
    #[arg(long)]
    pub quiet_storage_hints: bool,
}

impl From<&Args> for CompilerConfig {
    fn from(args: &Args) -> Self {
        let mut config =
            CompilerConfig::new().with_default_bound_type_name(args.default_bound_type.clone());
        if args.strict_inverses {
            config = config.with_strict_inverses();
        }
        if args.quiet_storage_hints {
            config = config.without_storage_hint_warnings();
        }
        config
    }
}
