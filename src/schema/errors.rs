//! Error types for argument preprocessing
//!
//! Error codes:
//! - MISSING_MANDATORY_FIELD
//! - ERRONEOUS_FIELD_TYPE
//! - FIELD_MIN_RANGE_VIOLATED / FIELD_MAX_RANGE_VIOLATED
//! - FIELD_VALUE_NOT_IN_ALLOWED_LIST
//! - FIELD_MIN_LENGTH_VIOLATED / FIELD_MAX_LENGTH_VIOLATED
//! - FIELD_REGEX_VALIDATION_FAILED
//! - UN_RECOGNIZED_FIELD
//!
//! A parse call fails with exactly one `FieldError`: the first violation
//! found in traversal order.

use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

use super::value::FieldValue;

/// Field error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Required field absent or empty, with no default
    MissingMandatoryField,
    /// Value could not be coerced to the declared type
    ErroneousFieldType,
    /// Value below `min_val`
    FieldMinRangeViolated,
    /// Value above `max_val`
    FieldMaxRangeViolated,
    /// Value not a member of `value_list`
    FieldValueNotInAllowedList,
    /// Length below `min_len`
    FieldMinLengthViolated,
    /// Length above `max_len`
    FieldMaxLengthViolated,
    /// Text did not match `regex`
    FieldRegexValidationFailed,
    /// Strict mode found undeclared keys
    UnRecognizedField,
}

impl ErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::MissingMandatoryField => "MISSING_MANDATORY_FIELD",
            ErrorCode::ErroneousFieldType => "ERRONEOUS_FIELD_TYPE",
            ErrorCode::FieldMinRangeViolated => "FIELD_MIN_RANGE_VIOLATED",
            ErrorCode::FieldMaxRangeViolated => "FIELD_MAX_RANGE_VIOLATED",
            ErrorCode::FieldValueNotInAllowedList => "FIELD_VALUE_NOT_IN_ALLOWED_LIST",
            ErrorCode::FieldMinLengthViolated => "FIELD_MIN_LENGTH_VIOLATED",
            ErrorCode::FieldMaxLengthViolated => "FIELD_MAX_LENGTH_VIOLATED",
            ErrorCode::FieldRegexValidationFailed => "FIELD_REGEX_VALIDATION_FAILED",
            ErrorCode::UnRecognizedField => "UN_RECOGNIZED_FIELD",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A path-qualified field error
///
/// `data` carries the structured detail for the code, e.g. `{"minValue": 1}`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    code: ErrorCode,
    field_path: String,
    message: String,
    data: Value,
}

impl FieldError {
    /// Create an error with an explicit code, message and data.
    ///
    /// Custom validators use this to decide their own error shape.
    pub fn new(
        code: ErrorCode,
        field_path: impl Into<String>,
        message: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            code,
            field_path: field_path.into(),
            message: message.into(),
            data,
        }
    }

    /// Create a missing mandatory field error
    pub fn missing_field(field_path: impl Into<String>) -> Self {
        let path = field_path.into();
        Self {
            code: ErrorCode::MissingMandatoryField,
            message: format!("{} is a mandatory field", path),
            field_path: path,
            data: Value::Null,
        }
    }

    /// Create a type mismatch error naming the expected type descriptor
    pub fn type_mismatch(field_path: impl Into<String>, expected: impl Into<String>) -> Self {
        let path = field_path.into();
        let expected = expected.into();
        Self {
            code: ErrorCode::ErroneousFieldType,
            message: format!("{} should be of type {}", path, expected),
            field_path: path,
            data: json!({ "expectedType": expected }),
        }
    }

    /// Create a min range error
    pub fn min_range(field_path: impl Into<String>, min: &FieldValue) -> Self {
        let path = field_path.into();
        Self {
            code: ErrorCode::FieldMinRangeViolated,
            message: format!("{} should be greater than or equal to {}", path, min),
            field_path: path,
            data: json!({ "minValue": min.to_json() }),
        }
    }

    /// Create a max range error
    pub fn max_range(field_path: impl Into<String>, max: &FieldValue) -> Self {
        let path = field_path.into();
        Self {
            code: ErrorCode::FieldMaxRangeViolated,
            message: format!("{} should be lesser than or equal to {}", path, max),
            field_path: path,
            data: json!({ "maxValue": max.to_json() }),
        }
    }

    /// Create a not-in-allowed-list error
    pub fn not_allowed(field_path: impl Into<String>, allowed: &[FieldValue]) -> Self {
        let path = field_path.into();
        let listing = FieldValue::List(allowed.to_vec());
        Self {
            code: ErrorCode::FieldValueNotInAllowedList,
            message: format!("{} should be one of these - {}", path, listing),
            field_path: path,
            data: json!({ "allowedValue": listing.to_json() }),
        }
    }

    /// Create a min length error
    pub fn min_length(field_path: impl Into<String>, min_len: usize) -> Self {
        let path = field_path.into();
        Self {
            code: ErrorCode::FieldMinLengthViolated,
            message: format!("{} has a minimum length of {}", path, min_len),
            field_path: path,
            data: json!({ "minLength": min_len }),
        }
    }

    /// Create a max length error
    pub fn max_length(field_path: impl Into<String>, max_len: usize) -> Self {
        let path = field_path.into();
        Self {
            code: ErrorCode::FieldMaxLengthViolated,
            message: format!("{} has a maximum length of {}", path, max_len),
            field_path: path,
            data: json!({ "maxLength": max_len }),
        }
    }

    /// Create a pattern error, preferring `custom_message` when given
    pub fn pattern(
        field_path: impl Into<String>,
        regex: &str,
        custom_message: Option<&str>,
    ) -> Self {
        let path = field_path.into();
        let message = match custom_message {
            Some(m) => m.to_string(),
            None => format!("{} should be of format - {}", path, regex),
        };
        Self {
            code: ErrorCode::FieldRegexValidationFailed,
            message,
            field_path: path,
            data: json!({ "regex": regex }),
        }
    }

    /// Create an unrecognized field error for the keys left over at one level
    pub fn unrecognized(field_path: impl Into<String>, keys: Vec<String>) -> Self {
        let listing = keys
            .iter()
            .map(|k| format!("'{}'", k))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            code: ErrorCode::UnRecognizedField,
            field_path: field_path.into(),
            message: format!("Unexpected params [{}]", listing),
            data: json!({ "unrecognizedFields": keys }),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Returns the field path (empty for the top-level input itself)
    pub fn field_path(&self) -> &str {
        &self.field_path
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the structured error data
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Renders the error as a JSON object
    pub fn to_json(&self) -> Value {
        json!({
            "code": self.code.code(),
            "field": self.field_path,
            "message": self.message,
            "data": self.data,
        })
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.code(), self.message)
    }
}

impl std::error::Error for FieldError {}

/// Result type for preprocessing calls
pub type FieldResult<T> = Result<T, FieldError>;

/// Errors raised while building or loading a definition
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Invalid regex '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Duplicate field '{0}'")]
    DuplicateField(String),

    #[error("Duplicate alias '{alias}' at '{path}'")]
    DuplicateAlias { path: String, alias: String },

    #[error("Field '{0}' has min_len greater than max_len")]
    InvalidLengthBounds(String),

    #[error("Field '{0}' declares an empty nested schema")]
    EmptyNestedSchema(String),

    #[error("Unknown data type '{0}'")]
    UnknownType(String),

    #[error("Unknown validator '{0}'")]
    UnknownValidator(String),

    #[error("Malformed definition at '{path}': {reason}")]
    Malformed { path: String, reason: String },

    #[error("Failed to read definition '{path}': {reason}")]
    Io { path: String, reason: String },
}

/// Result type for definition construction
pub type SchemaResult<T> = Result<T, SchemaError>;
