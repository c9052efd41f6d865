//! Built-in field validators
//!
//! Validators take over a field completely: no coercion, no constraints.

use serde_json::Value;
use uuid::Uuid;

use super::errors::{ErrorCode, FieldError, FieldResult};
use super::value::FieldValue;

/// Accepts a version 4 UUID given as text and normalizes it to the
/// lowercase hyphenated form.
pub fn uuid4(field_path: &str, value: &FieldValue) -> FieldResult<FieldValue> {
    let invalid = || {
        FieldError::new(
            ErrorCode::ErroneousFieldType,
            field_path,
            format!("{} should be UUID4", field_path),
            Value::Null,
        )
    };

    let text = value.as_str().ok_or_else(invalid)?;
    let parsed = Uuid::parse_str(text.trim()).map_err(|_| invalid())?;
    if parsed.get_version_num() != 4 {
        return Err(invalid());
    }

    Ok(FieldValue::Str(parsed.hyphenated().to_string()))
}
