use std::collections::BTreeSet;

use metafield_core::{FieldError, Result};
use tracing::debug;

/// Verify that two independently derived values agree for every key.
///
/// Each observation is `(key, computed, stored)`. All disagreeing keys are
/// reported at once, sorted, so the error reads the same whatever the input
/// order.
pub fn check_field_equivalence<K, V, I>(observations: I, subject: &str) -> Result<()>
where
    K: Into<String>,
    V: PartialEq,
    I: IntoIterator<Item = (K, V, V)>,
{
    let mut mismatched = BTreeSet::new();
    for (key, computed, stored) in observations {
        if computed != stored {
            let key = key.into();
            debug!(subject, key = %key, "value differs from stored");
            mismatched.insert(key);
        }
    }

    if mismatched.is_empty() {
        return Ok(());
    }
    Err(FieldError::Equivalence {
        subject: subject.to_string(),
        keys: mismatched.into_iter().collect(),
    })
}
