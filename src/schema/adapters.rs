//! Type adapters
//!
//! A field's data type is either a native type or a custom adapter. Both
//! parse a raw value into a typed one and describe themselves for error
//! messages; the coercion step branches on which kind it holds.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use super::value::FieldValue;

/// Failure to turn a raw value into the declared type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CastError(pub String);

impl CastError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Parsing and description capability for a scalar type.
///
/// `parse` must fail on malformed input; `describe` is used verbatim as the
/// expected-type descriptor in type errors.
pub trait TypeAdapter: fmt::Debug + Send + Sync {
    fn parse(&self, raw: &FieldValue) -> Result<FieldValue, CastError>;

    fn describe(&self) -> String;
}

/// Native types, checked by shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    String,
    Int,
    Float,
    Bool,
    List,
    Object,
}

impl NativeType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            NativeType::String => "string",
            NativeType::Int => "int",
            NativeType::Float => "float",
            NativeType::Bool => "bool",
            NativeType::List => "list",
            NativeType::Object => "object",
        }
    }

    /// Looks a native type up by name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" | "str" => Some(NativeType::String),
            "int" => Some(NativeType::Int),
            "float" => Some(NativeType::Float),
            "bool" => Some(NativeType::Bool),
            "list" => Some(NativeType::List),
            "object" | "dict" => Some(NativeType::Object),
            _ => None,
        }
    }

    /// Whether the type is one the textual auto-coercion applies to
    pub fn is_primitive(&self) -> bool {
        matches!(self, NativeType::Int | NativeType::Float | NativeType::Bool)
    }
}

impl TypeAdapter for NativeType {
    fn parse(&self, raw: &FieldValue) -> Result<FieldValue, CastError> {
        match (self, raw) {
            (NativeType::String, FieldValue::Str(_))
            | (NativeType::Int, FieldValue::Int(_))
            | (NativeType::Float, FieldValue::Float(_))
            | (NativeType::Bool, FieldValue::Bool(_))
            | (NativeType::List, FieldValue::List(_))
            | (NativeType::Object, FieldValue::Map(_)) => Ok(raw.clone()),
            // JSON has no separate integer-valued float
            (NativeType::Float, FieldValue::Int(i)) => Ok(FieldValue::Float(*i as f64)),
            _ => Err(CastError::new(format!(
                "expected {}, got {}",
                self.type_name(),
                raw.type_name()
            ))),
        }
    }

    fn describe(&self) -> String {
        self.type_name().to_string()
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Date parsed from text under a strftime-style format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateArg {
    format: String,
}

impl DateArg {
    pub fn new(format: impl Into<String>) -> Self {
        Self { format: format.into() }
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

impl TypeAdapter for DateArg {
    fn parse(&self, raw: &FieldValue) -> Result<FieldValue, CastError> {
        match raw {
            FieldValue::Date(_) => Ok(raw.clone()),
            FieldValue::Str(s) => NaiveDate::parse_from_str(s, &self.format)
                .map(FieldValue::Date)
                .map_err(|e| {
                    CastError::new(format!("'{}' does not match '{}': {}", s, self.format, e))
                }),
            other => Err(CastError::new(format!(
                "expected date text, got {}",
                other.type_name()
            ))),
        }
    }

    fn describe(&self) -> String {
        descriptor("date", &self.format)
    }
}

/// Datetime parsed from text under a strftime-style format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeArg {
    format: String,
}

impl DateTimeArg {
    pub fn new(format: impl Into<String>) -> Self {
        Self { format: format.into() }
    }

    pub fn format(&self) -> &str {
        &self.format
    }
}

impl TypeAdapter for DateTimeArg {
    fn parse(&self, raw: &FieldValue) -> Result<FieldValue, CastError> {
        match raw {
            FieldValue::DateTime(_) => Ok(raw.clone()),
            FieldValue::Str(s) => NaiveDateTime::parse_from_str(s, &self.format)
                .map(FieldValue::DateTime)
                .map_err(|e| {
                    CastError::new(format!("'{}' does not match '{}': {}", s, self.format, e))
                }),
            other => Err(CastError::new(format!(
                "expected datetime text, got {}",
                other.type_name()
            ))),
        }
    }

    fn describe(&self) -> String {
        descriptor("datetime", &self.format)
    }
}

/// Renders `{"type": kind, "format": format}` as JSON with `", "` and `": "`
/// separators.
fn descriptor(kind: &str, format: &str) -> String {
    format!(
        r#"{{"type": {}, "format": {}}}"#,
        Value::from(kind),
        Value::from(format)
    )
}

/// Declared type of a field: native, or a custom adapter
#[derive(Debug, Clone)]
pub enum DataType {
    Native(NativeType),
    Custom(Arc<dyn TypeAdapter>),
}

impl DataType {
    pub const STRING: DataType = DataType::Native(NativeType::String);
    pub const INT: DataType = DataType::Native(NativeType::Int);
    pub const FLOAT: DataType = DataType::Native(NativeType::Float);
    pub const BOOL: DataType = DataType::Native(NativeType::Bool);
    pub const LIST: DataType = DataType::Native(NativeType::List);
    pub const OBJECT: DataType = DataType::Native(NativeType::Object);

    /// Date under `format`, e.g. `%Y-%m-%d`
    pub fn date(format: impl Into<String>) -> Self {
        DataType::Custom(Arc::new(DateArg::new(format)))
    }

    /// Datetime under `format`, e.g. `%Y-%m-%d %H:%M:%S`
    pub fn datetime(format: impl Into<String>) -> Self {
        DataType::Custom(Arc::new(DateTimeArg::new(format)))
    }

    pub fn custom<A: TypeAdapter + 'static>(adapter: A) -> Self {
        DataType::Custom(Arc::new(adapter))
    }

    /// Expected-type descriptor used in type errors
    pub fn describe(&self) -> String {
        match self {
            DataType::Native(native) => native.describe(),
            DataType::Custom(adapter) => adapter.describe(),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, DataType::Native(NativeType::List))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, DataType::Native(NativeType::Object))
    }
}

impl From<NativeType> for DataType {
    fn from(native: NativeType) -> Self {
        DataType::Native(native)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_shape_check() {
        assert!(NativeType::Int.parse(&FieldValue::Int(3)).is_ok());
        assert!(NativeType::Int.parse(&FieldValue::from("3")).is_err());
        assert!(NativeType::String.parse(&FieldValue::Int(3)).is_err());
        assert!(NativeType::Bool.parse(&FieldValue::Int(1)).is_err());
    }

    #[test]
    fn test_float_accepts_integers() {
        assert_eq!(
            NativeType::Float.parse(&FieldValue::Int(100)).unwrap(),
            FieldValue::Float(100.0)
        );
    }

    #[test]
    fn test_native_names_round_trip() {
        for native in [
            NativeType::String,
            NativeType::Int,
            NativeType::Float,
            NativeType::Bool,
            NativeType::List,
            NativeType::Object,
        ] {
            assert_eq!(NativeType::from_name(native.type_name()), Some(native));
        }
        assert_eq!(NativeType::from_name("decimal"), None);
    }

    #[test]
    fn test_date_adapter() {
        let adapter = DateArg::new("%Y-%m-%d");
        let parsed = adapter.parse(&FieldValue::from("2020-03-15")).unwrap();
        assert_eq!(parsed, FieldValue::Date(NaiveDate::from_ymd_opt(2020, 3, 15).unwrap()));

        assert!(adapter.parse(&FieldValue::from("afsa")).is_err());
        assert!(adapter.parse(&FieldValue::from("15/03/2020")).is_err());
        assert!(adapter.parse(&FieldValue::Int(20200315)).is_err());

        // typed values pass through
        assert_eq!(adapter.parse(&parsed).unwrap(), parsed);
    }

    #[test]
    fn test_datetime_adapter() {
        let adapter = DateTimeArg::new("%Y-%m-%d %H:%M:%S");
        let parsed = adapter.parse(&FieldValue::from("2020-06-08 10:30:00")).unwrap();
        let expected = NaiveDate::from_ymd_opt(2020, 6, 8)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        assert_eq!(parsed, FieldValue::DateTime(expected));
        assert!(adapter.parse(&FieldValue::from("2020-06-08")).is_err());
    }

    #[test]
    fn test_descriptors() {
        assert_eq!(DataType::INT.describe(), "int");
        assert_eq!(
            DataType::date("%Y-%m-%d").describe(),
            r#"{"type": "date", "format": "%Y-%m-%d"}"#
        );
        assert_eq!(
            DataType::datetime("%Y-%m-%d %H:%M:%S").describe(),
            r#"{"type": "datetime", "format": "%Y-%m-%d %H:%M:%S"}"#
        );
    }

    #[test]
    fn test_descriptor_escapes_format() {
        let described = DataType::date("%Y \"at\" %m\\%d").describe();
        let parsed: Value = serde_json::from_str(&described).unwrap();
        assert_eq!(parsed["type"], "date");
        assert_eq!(parsed["format"], "%Y \"at\" %m\\%d");
    }
}
