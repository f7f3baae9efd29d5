//! Compiles a flat [`Query`] into expression trees.

use metafield_core::{FieldError, Result};
use tracing::{debug, trace};

use crate::capability::{Field, FieldCatalog};
use crate::expression::Expression;
use crate::query::{Query, QueryTerm};

/// Compile every query entry into one expression, in query order.
///
/// - a range becomes `field.between(begin, end)`
/// - a list becomes an [`Expression::Or`] of its compiled elements, order and
///   duplicates kept
/// - anything else becomes `field.equals(value)`
///
/// An unknown field name aborts the whole compilation. Errors raised by the
/// backend's `equals`/`between` are returned as they are.
pub fn to_expressions<C: FieldCatalog + ?Sized>(
    catalog: &C,
    query: &Query,
) -> Result<Vec<Expression>> {
    let expressions = query
        .iter()
        .map(|(name, term)| {
            let field = catalog
                .lookup(name)
                .ok_or_else(|| FieldError::UnknownField(name.to_string()))?;
            compile_term(field, term)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(entries = query.len(), "compiled query into expressions");
    Ok(expressions)
}

fn compile_term(field: &dyn Field, term: &QueryTerm) -> Result<Expression> {
    trace!(field = field.name(), ?term, "compiling query term");
    match term {
        QueryTerm::Range(range) => field.between(range.begin.as_ref(), range.end.as_ref()),
        QueryTerm::Any(terms) => terms
            .iter()
            .map(|t| compile_term(field, t))
            .collect::<Result<Vec<_>>>()
            .map(Expression::Or),
        QueryTerm::Value(value) => field.equals(value),
    }
}
