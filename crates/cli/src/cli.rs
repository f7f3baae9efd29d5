use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Inspect metadata search fields and compile queries against them.
///
/// Every command reads a metadata definition (YAML or JSON) whose
/// `dataset.search_fields` section declares the fields.
#[derive(Parser, Debug)]
#[command(name = "metafield", about = "Inspect metadata search fields and compile queries")]
pub struct CliArgs {
    /// Metadata definition file (default: METAFIELD_DEFINITION)
    #[arg(long, short, global = true)]
    pub definition: Option<PathBuf>,

    /// Output format (default: METAFIELD_OUTPUT, then text)
    #[arg(long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the declared search fields with their types
    Fields,

    /// Extract every search field from a document
    Extract {
        /// Metadata document (YAML or JSON)
        document: PathBuf,
    },

    /// Compile a query into expressions
    Compile {
        /// Inline query mapping, or `@path` to read it from a file
        query: String,
    },

    /// Check a document's field values against previously stored values
    Verify {
        /// Metadata document (YAML or JSON)
        document: PathBuf,
        /// Flat mapping of field name to stored value
        stored: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    /// Parse the configured default, falling back to text.
    pub fn from_config(value: &str) -> Self {
        <OutputFormat as ValueEnum>::from_str(value, true).unwrap_or(OutputFormat::Text)
    }
}
