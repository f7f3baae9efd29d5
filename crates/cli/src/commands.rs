//! Subcommand implementations.
//!
//! Each command splits into a pure part working on parsed values (tested
//! below) and a thin printing wrapper.

use std::path::Path;

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use metafield_core::FieldError;
use metafield_fields::{extract_fields, get_dataset_fields, SearchField, SearchValue};
use metafield_query::{check_field_equivalence, to_expressions, Expression, Query};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::backend::InspectBackend;
use crate::cli::OutputFormat;
use crate::loader::{read_inline_or_file, read_value};

/// Subject used in verification failures.
const VERIFY_SUBJECT: &str = "Dataset";

// ── Pure operations ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRow {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: String,
}

pub fn field_rows(fields: &IndexMap<String, SearchField>) -> Vec<FieldRow> {
    fields
        .iter()
        .map(|(name, field)| FieldRow {
            name: name.clone(),
            type_name: field.type_name().to_string(),
            description: field.description().to_string(),
        })
        .collect()
}

pub fn compile(
    fields: &IndexMap<String, SearchField>,
    query: &Value,
) -> Result<Vec<Expression>> {
    let query: Query = serde_json::from_value(query.clone()).context("query must be a mapping")?;
    let backend = InspectBackend::from_search_fields(fields);
    Ok(to_expressions(&backend, &query)?)
}

/// Compare every stored value against the value extracted from `document`.
///
/// Only names present in `stored` are checked; a stored name with no search
/// field is an unknown field.
pub fn verify(
    fields: &IndexMap<String, SearchField>,
    document: &Value,
    stored: &Map<String, Value>,
) -> metafield_core::Result<()> {
    let mut observations: Vec<(String, Option<SearchValue>, Option<SearchValue>)> =
        Vec::with_capacity(stored.len());
    for (name, raw) in stored {
        let field = fields
            .get(name)
            .ok_or_else(|| FieldError::UnknownField(name.clone()))?;
        observations.push((name.clone(), field.extract(document)?, field.convert(raw)?));
    }
    check_field_equivalence(observations, VERIFY_SUBJECT)
}

// ── Printing wrappers ───────────────────────────────────────────────

pub fn load_fields(definition: &Path) -> Result<IndexMap<String, SearchField>> {
    let value = read_value(definition)?;
    let fields = get_dataset_fields(&value)
        .with_context(|| format!("invalid search fields in {}", definition.display()))?;
    info!(definition = %definition.display(), count = fields.len(), "loaded search fields");
    Ok(fields)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Stored values must be a mapping of field name to value.
fn stored_mapping<'a>(value: &'a Value, source: &Path) -> Result<&'a Map<String, Value>> {
    match value.as_object() {
        Some(map) => Ok(map),
        None => bail!(
            "{} must be a mapping of field name to value, got {}",
            source.display(),
            value
        ),
    }
}

pub fn run_fields(fields: &IndexMap<String, SearchField>, output: OutputFormat) -> Result<()> {
    let rows = field_rows(fields);
    match output {
        OutputFormat::Json => print_json(&rows),
        OutputFormat::Text => {
            for row in rows {
                println!("{:<20} {:<16} {}", row.name, row.type_name, row.description);
            }
            Ok(())
        }
    }
}

pub fn run_extract(
    fields: &IndexMap<String, SearchField>,
    document: &Path,
    output: OutputFormat,
) -> Result<()> {
    let doc = read_value(document)?;
    let values = extract_fields(fields, &doc)
        .with_context(|| format!("failed to extract fields from {}", document.display()))?;
    match output {
        OutputFormat::Json => print_json(&values),
        OutputFormat::Text => {
            for (name, value) in &values {
                println!("{:<20} {}", name, value);
            }
            Ok(())
        }
    }
}

pub fn run_compile(
    fields: &IndexMap<String, SearchField>,
    query: &str,
    output: OutputFormat,
) -> Result<()> {
    let query = read_inline_or_file(query)?;
    let expressions = compile(fields, &query)?;
    match output {
        OutputFormat::Json => print_json(&expressions),
        OutputFormat::Text => {
            for expr in &expressions {
                println!("{}", expr);
            }
            Ok(())
        }
    }
}

pub fn run_verify(
    fields: &IndexMap<String, SearchField>,
    document: &Path,
    stored: &Path,
) -> Result<()> {
    let doc = read_value(document)?;
    let stored_values = read_value(stored)?;
    let stored_values = stored_mapping(&stored_values, stored)?;
    verify(fields, &doc, stored_values)
        .with_context(|| format!("{} does not match {}", document.display(), stored.display()))?;
    println!("ok");
    Ok(())
}
