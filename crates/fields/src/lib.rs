//! Search field schema and document extractors.
//!
//! This crate provides:
//! - [`FieldDescriptor`] deserialization for `dataset.search_fields` entries
//! - [`parse_search_field`] / [`get_dataset_fields`] to build extractors
//! - [`SimpleField`] and [`RangeField`] to read typed values out of documents

pub mod converter;
pub mod field;
pub mod schema;

pub use converter::Converter;
pub use field::{extract_fields, RangeField, SearchField, SearchValue, SimpleField};
pub use schema::{get_dataset_fields, parse_search_field, parse_search_field_value, FieldDescriptor};
