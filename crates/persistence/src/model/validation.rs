//! Field constraint checks shared by the entity types.

use regex::Regex;

use crate::error::ValidationError;

fn invalid(entity: &str, field: &str, message: String) -> ValidationError {
    ValidationError::InvalidField {
        entity: entity.to_string(),
        field: field.to_string(),
        message,
    }
}

/// Requires at least `min` characters.
pub(crate) fn min_length(
    entity: &str,
    field: &str,
    value: &str,
    min: usize,
) -> Result<(), ValidationError> {
    if value.chars().count() < min {
        return Err(invalid(
            entity,
            field,
            format!("size must be at least {}", min),
        ));
    }
    Ok(())
}

/// Allows at most `max` characters; absent values pass.
pub(crate) fn max_length(
    entity: &str,
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.chars().count() > max => Err(invalid(
            entity,
            field,
            format!("size must be at most {}", max),
        )),
        _ => Ok(()),
    }
}

/// Requires the whole value to match `pattern`.
pub(crate) fn matches(
    entity: &str,
    field: &str,
    value: &str,
    pattern: &Regex,
) -> Result<(), ValidationError> {
    if !pattern.is_match(value) {
        return Err(invalid(
            entity,
            field,
            format!("must match \"{}\"", pattern.as_str()),
        ));
    }
    Ok(())
}
