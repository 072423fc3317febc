//! Bounded text field validation

use crate::error::{InputError, Result};

/// Reject empty values and values longer than `max` characters
pub fn ensure_text(field: &'static str, value: &str, max: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(InputError::EmptyField(field).into());
    }
    if value.chars().count() > max {
        return Err(InputError::FieldTooLong { field, max }.into());
    }
    Ok(())
}
