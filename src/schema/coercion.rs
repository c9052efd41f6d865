//! Coercion of raw values to declared types
//!
//! Resolution order:
//! 1. Custom adapter: the adapter parses the value
//! 2. Native shape match: the value passes through
//! 3. Auto-coercion (opt-in): text to int, float or bool
//! 4. Anything else fails

use super::adapters::{CastError, DataType, NativeType, TypeAdapter};
use super::value::FieldValue;

/// Casts `value` to `data_type`.
///
/// The caller turns a failure into a type error carrying
/// `data_type.describe()`.
pub fn type_cast(
    value: &FieldValue,
    data_type: &DataType,
    auto_type_cast: bool,
) -> Result<FieldValue, CastError> {
    match data_type {
        DataType::Custom(adapter) => adapter.parse(value),
        DataType::Native(native) => match native.parse(value) {
            Ok(typed) => Ok(typed),
            Err(err) => match value {
                FieldValue::Str(text) if auto_type_cast && native.is_primitive() => {
                    cast_text(text, *native)
                }
                _ => Err(err),
            },
        },
    }
}

/// Converts text to a primitive. Booleans accept only `true`/`false` in any
/// case.
fn cast_text(text: &str, target: NativeType) -> Result<FieldValue, CastError> {
    match target {
        NativeType::Int => text
            .trim()
            .parse::<i64>()
            .map(FieldValue::Int)
            .map_err(|e| CastError::new(format!("'{}' is not an int: {}", text, e))),
        NativeType::Float => text
            .trim()
            .parse::<f64>()
            .map(FieldValue::Float)
            .map_err(|e| CastError::new(format!("'{}' is not a float: {}", text, e))),
        NativeType::Bool => match text.to_lowercase().as_str() {
            "true" => Ok(FieldValue::Bool(true)),
            "false" => Ok(FieldValue::Bool(false)),
            _ => Err(CastError::new(format!("'{}' is not a bool", text))),
        },
        other => Err(CastError::new(format!("no text conversion to {}", other))),
    }
}
