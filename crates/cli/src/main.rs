mod backend;
mod cli;
mod commands;
mod loader;

use anyhow::{Context, Result};
use clap::Parser;
use metafield_core::config::{load_dotenv, Config};

use crate::cli::{CliArgs, Command, OutputFormat};

fn main() -> Result<()> {
    load_dotenv();
    let config = Config::from_env();

    // Initialize tracing; logs go to stderr so stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    config.log_summary();

    let args = CliArgs::parse();
    let output = args
        .output
        .unwrap_or_else(|| OutputFormat::from_config(&config.schema.output));

    let definition = args
        .definition
        .clone()
        .or_else(|| config.schema.definition.clone())
        .context("no metadata definition given (use --definition or METAFIELD_DEFINITION)")?;
    let fields = commands::load_fields(&definition)?;

    match &args.command {
        Command::Fields => commands::run_fields(&fields, output),
        Command::Extract { document } => commands::run_extract(&fields, document, output),
        Command::Compile { query } => commands::run_compile(&fields, query, output),
        Command::Verify { document, stored } => commands::run_verify(&fields, document, stored),
    }
}
