//! Exact field-set validation of received table rows.
//!
//! The table-row format can silently change between contract versions.
//! Validating that each row carries exactly the expected field set turns
//! schema drift into an explicit failure instead of handing malformed
//! typed objects to the caller.

use itertools::Itertools;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Checks that a row is an object carrying exactly the expected fields.
///
/// Pure validation pass-through: never mutates or coerces values.
/// The first missing field fails immediately; surplus fields are checked
/// after all expected fields are known present and reported all at once.
pub fn validate_row(row: &Value, entity: &str, expected: &[&str]) -> Result<()> {
    let Some(object) = row.as_object() else {
        return Err(Error::ProtocolViolation(format!(
            "{entity} row is not an object"
        )));
    };
    check_fields(object, entity, expected)
}

/// Applies the single-row check to every element of a sequence and hands
/// the sequence back unchanged.
pub fn validate_rows<'a>(rows: &'a [Value], entity: &str, expected: &[&str]) -> Result<&'a [Value]> {
    for row in rows {
        validate_row(row, entity, expected)?;
    }
    Ok(rows)
}

/// Single-row lookup that must exist.
pub fn required_row<'a>(row: Option<&'a Value>, entity: &str, expected: &[&str]) -> Result<&'a Value> {
    let row = row.ok_or_else(|| Error::EntityNotFound(entity.to_string()))?;
    validate_row(row, entity, expected)?;
    Ok(row)
}

/// Single-row lookup that may legitimately be absent.
pub fn optional_row<'a>(
    row: Option<&'a Value>,
    entity: &str,
    expected: &[&str],
) -> Result<Option<&'a Value>> {
    match row {
        None => Ok(None),
        Some(row) => {
            validate_row(row, entity, expected)?;
            Ok(Some(row))
        }
    }
}

fn check_fields(row: &Map<String, Value>, entity: &str, expected: &[&str]) -> Result<()> {
    for field in expected {
        if !row.contains_key(*field) {
            return Err(Error::MissingField {
                entity: entity.to_string(),
                field: (*field).to_string(),
            });
        }
    }
    if row.len() != expected.len() {
        let fields = row
            .keys()
            .filter(|key| !expected.contains(&key.as_str()))
            .join(", ");
        return Err(Error::UnexpectedFields {
            entity: entity.to_string(),
            fields,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const EXPECTED: &[&str] = &["a", "b"];

    #[test]
    fn test_matching_row_passes_through_unchanged() {
        let row = json!({"a": 1, "b": 2});
        let checked = required_row(Some(&row), "thing", EXPECTED).unwrap();
        assert_eq!(checked, &row);
    }

    #[test]
    fn test_missing_row() {
        assert!(matches!(
            required_row(None, "thing", EXPECTED),
            Err(Error::EntityNotFound(entity)) if entity == "thing"
        ));
        assert_eq!(optional_row(None, "thing", EXPECTED).unwrap(), None);
    }

    #[test]
    fn test_missing_field() {
        let row = json!({"a": 1});
        assert!(matches!(
            validate_row(&row, "thing", EXPECTED),
            Err(Error::MissingField { entity, field }) if entity == "thing" && field == "b"
        ));
    }

    #[test]
    fn test_unexpected_fields_reported_together() {
        let row = json!({"a": 1, "b": 2, "c": 3, "d": 4});
        assert!(matches!(
            validate_row(&row, "thing", EXPECTED),
            Err(Error::UnexpectedFields { entity, fields }) if entity == "thing" && fields == "c, d"
        ));
    }

    #[test]
    fn test_sequence_returned_unchanged() {
        let rows = vec![json!({"a": 1, "b": 2}), json!({"a": 3, "b": 4})];
        let checked = validate_rows(&rows, "thing", EXPECTED).unwrap();
        assert_eq!(checked, rows.as_slice());
    }

    #[test]
    fn test_sequence_fails_on_any_bad_element() {
        let rows = vec![json!({"a": 1, "b": 2}), json!({"a": 3})];
        assert!(validate_rows(&rows, "thing", EXPECTED).is_err());
    }

    #[test]
    fn test_validation_is_idempotent() {
        let row = json!({"a": 1, "b": 2});
        let once = required_row(Some(&row), "thing", EXPECTED).unwrap();
        let twice = required_row(Some(once), "thing", EXPECTED).unwrap();
        assert_eq!(twice, &row);
    }

    #[test]
    fn test_non_object_row() {
        assert!(matches!(
            validate_row(&json!([1, 2]), "thing", EXPECTED),
            Err(Error::ProtocolViolation(_))
        ));
    }
}
