//! Field validation shared by every create and update path.

use uuid::Uuid;

use crate::error::DomainError;

/// Returns the names of the required fields that are absent or blank.
pub fn missing_fields(fields: &[(&'static str, Option<&str>)]) -> Vec<&'static str> {
    fields
        .iter()
        .filter(|(_, value)| value.is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect()
}

/// Fails with [`DomainError::MissingFields`] naming every absent required field.
pub fn require(fields: &[(&'static str, Option<&str>)]) -> Result<(), DomainError> {
    let missing = missing_fields(fields);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::MissingFields(missing))
    }
}

/// An optional update field may be omitted, but never supplied blank.
pub fn non_blank(field: &'static str, value: Option<String>) -> Result<Option<String>, DomainError> {
    match value {
        Some(v) if v.trim().is_empty() => Err(DomainError::Validation(format!(
            "`{field}` must not be empty"
        ))),
        other => Ok(other),
    }
}

/// Parses an identifier supplied in a request body.
pub fn parse_id(field: &'static str, raw: &str) -> Result<Uuid, DomainError> {
    raw.trim()
        .parse()
        .map_err(|_| DomainError::Validation(format!("`{field}` is not a valid id: {raw}")))
}

/// An update may repeat the target id in its body; if it does, it must agree
/// with the id taken from the path.
pub fn ensure_same_id(path: Uuid, declared: Option<&str>) -> Result<(), DomainError> {
    match declared {
        Some(raw) if raw.trim().parse::<Uuid>().ok() != Some(path) => Err(DomainError::IdMismatch {
            path,
            declared: raw.to_string(),
        }),
        _ => Ok(()),
    }
}
