//! Field-presence validation for create/update inputs.
//!
//! Create endpoints require string presence only (a field must exist and
//! contain a non-whitespace character); semantic validation beyond that
//! lives on the request DTOs.

use crate::error::CoreError;

/// Check that a required string field is present and non-blank.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Check a batch of `(field, value)` pairs, failing on the first blank one.
pub fn require_all_non_empty(fields: &[(&str, &str)]) -> Result<(), CoreError> {
    for (field, value) in fields {
        require_non_empty(field, value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_passes() {
        assert!(require_non_empty("title", "My first post").is_ok());
    }

    #[test]
    fn test_blank_fails_with_field_name() {
        let err = require_non_empty("title", "   ").unwrap_err();
        assert!(err.to_string().contains("title is required"));
    }

    #[test]
    fn test_batch_fails_on_first_blank() {
        let result = require_all_non_empty(&[
            ("title", "ok"),
            ("category", ""),
            ("description", "also ok"),
        ]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("category is required"));
    }
}
