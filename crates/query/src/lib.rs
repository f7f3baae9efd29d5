//! Backend-agnostic query compilation.
//!
//! This crate provides:
//! - the [`Field`] / [`FieldCatalog`] contract that storage backends implement
//! - the [`Expression`] tree those fields produce
//! - [`to_expressions`] to compile a flat [`Query`] into expressions
//! - [`check_field_equivalence`] to reconcile two sources of field values

pub mod builder;
pub mod capability;
pub mod equivalence;
pub mod expression;
pub mod query;

pub use builder::to_expressions;
pub use capability::{Field, FieldCatalog};
pub use equivalence::check_field_equivalence;
pub use expression::Expression;
pub use query::{Query, QueryTerm};
