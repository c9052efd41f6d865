//! Value model shared by raw input and normalized output
//!
//! Raw input arrives as JSON-shaped data; adapters may turn text into typed
//! values (dates, datetimes), so normalized output needs a richer model than
//! `serde_json::Value`.

use chrono::{NaiveDate, NaiveDateTime};
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Mapping used for objects, both in input and in normalized output
pub type ValueMap = BTreeMap<String, FieldValue>;

/// A raw or normalized argument value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    List(Vec<FieldValue>),
    Map(ValueMap),
}

impl FieldValue {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Str(_) => "string",
            FieldValue::Date(_) => "date",
            FieldValue::DateTime(_) => "datetime",
            FieldValue::List(_) => "list",
            FieldValue::Map(_) => "object",
        }
    }

    /// Whether the value counts as supplied.
    ///
    /// Null, whitespace-only text, and empty lists or objects are absent.
    /// `0` and `false` are present.
    pub fn is_present(&self) -> bool {
        match self {
            FieldValue::Null => false,
            FieldValue::Str(s) => !s.trim().is_empty(),
            FieldValue::List(items) => !items.is_empty(),
            FieldValue::Map(map) => !map.is_empty(),
            _ => true,
        }
    }

    /// Length for values that have one: characters of text, list items,
    /// object members. Everything else has no length.
    pub fn length(&self) -> Option<usize> {
        match self {
            FieldValue::Str(s) => Some(s.chars().count()),
            FieldValue::List(items) => Some(items.len()),
            FieldValue::Map(map) => Some(map.len()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Orders two values.
    ///
    /// Numbers compare numerically across `Int` and `Float`; text, dates and
    /// datetimes compare within their own kind. Any other pairing is
    /// incomparable and yields `None`.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => Some(a.cmp(b)),
            (FieldValue::Int(a), FieldValue::Float(b)) => (*a as f64).partial_cmp(b),
            (FieldValue::Float(a), FieldValue::Int(b)) => a.partial_cmp(&(*b as f64)),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.partial_cmp(b),
            (FieldValue::Str(a), FieldValue::Str(b)) => Some(a.cmp(b)),
            (FieldValue::Date(a), FieldValue::Date(b)) => Some(a.cmp(b)),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => Some(a.cmp(b)),
            (FieldValue::Bool(a), FieldValue::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Equality used for allowed-value membership; `1` equals `1.0`.
    pub fn same_value(&self, other: &FieldValue) -> bool {
        match (self, other) {
            (FieldValue::Int(_), FieldValue::Float(_))
            | (FieldValue::Float(_), FieldValue::Int(_)) => {
                self.compare(other) == Some(Ordering::Equal)
            }
            (FieldValue::List(a), FieldValue::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_value(y))
            }
            _ => self == other,
        }
    }

    /// Converts to JSON. Dates and datetimes render as their ISO text.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(i) => Value::Number((*i).into()),
            FieldValue::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            FieldValue::Str(s) => Value::String(s.clone()),
            FieldValue::Date(d) => Value::String(d.to_string()),
            FieldValue::DateTime(dt) => Value::String(dt.to_string()),
            FieldValue::List(items) => {
                Value::Array(items.iter().map(FieldValue::to_json).collect())
            }
            FieldValue::Map(map) => {
                Value::Object(map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect())
            }
        }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => write!(f, "'{}'", s),
            other => write!(f, "{}", other),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(x) => write!(f, "{}", x),
            FieldValue::Str(s) => write!(f, "{}", s),
            FieldValue::Date(d) => write!(f, "{}", d),
            FieldValue::DateTime(dt) => write!(f, "{}", dt),
            FieldValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.fmt_nested(f)?;
                }
                write!(f, "]")
            }
            FieldValue::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{}': ", key)?;
                    value.fmt_nested(f)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                // u64 beyond i64 and real numbers
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => FieldValue::Str(s.clone()),
            Value::Array(items) => FieldValue::List(items.iter().map(FieldValue::from).collect()),
            Value::Object(map) => FieldValue::Map(
                map.iter().map(|(k, v)| (k.clone(), FieldValue::from(v))).collect(),
            ),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        FieldValue::from(&value)
    }
}

impl From<&FieldValue> for Value {
    fn from(value: &FieldValue) -> Self {
        value.to_json()
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Str(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Str(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        FieldValue::Date(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<Vec<FieldValue>> for FieldValue {
    fn from(value: Vec<FieldValue>) -> Self {
        FieldValue::List(value)
    }
}

impl From<ValueMap> for FieldValue {
    fn from(value: ValueMap) -> Self {
        FieldValue::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_presence() {
        assert!(!FieldValue::Null.is_present());
        assert!(!FieldValue::from("   ").is_present());
        assert!(!FieldValue::List(vec![]).is_present());
        assert!(!FieldValue::Map(ValueMap::new()).is_present());
        assert!(FieldValue::Int(0).is_present());
        assert!(FieldValue::Bool(false).is_present());
        assert!(FieldValue::from(" x ").is_present());
    }

    #[test]
    fn test_length_notion() {
        assert_eq!(FieldValue::from("héllo").length(), Some(5));
        assert_eq!(FieldValue::List(vec![FieldValue::Null]).length(), Some(1));
        assert_eq!(FieldValue::Int(12345).length(), None);
        assert_eq!(FieldValue::Bool(true).length(), None);
    }

    #[test]
    fn test_numeric_comparison_across_kinds() {
        assert_eq!(FieldValue::Int(2).compare(&FieldValue::Float(1.5)), Some(Ordering::Greater));
        assert_eq!(FieldValue::Float(1.0).compare(&FieldValue::Int(1)), Some(Ordering::Equal));
        assert_eq!(FieldValue::from("a").compare(&FieldValue::Int(1)), None);
    }

    #[test]
    fn test_same_value_numbers() {
        assert!(FieldValue::Int(1).same_value(&FieldValue::Float(1.0)));
        assert!(!FieldValue::Int(1).same_value(&FieldValue::from("1")));
    }

    #[test]
    fn test_from_json() {
        let value = FieldValue::from(json!({"a": [1, 2.5, "x", null, true]}));
        let map = value.as_map().unwrap();
        let items = map["a"].as_list().unwrap();
        assert_eq!(items[0], FieldValue::Int(1));
        assert_eq!(items[1], FieldValue::Float(2.5));
        assert_eq!(items[2], FieldValue::from("x"));
        assert_eq!(items[3], FieldValue::Null);
        assert_eq!(items[4], FieldValue::Bool(true));
    }

    #[test]
    fn test_large_unsigned_becomes_float() {
        let value = FieldValue::from(json!(u64::MAX));
        assert!(matches!(value, FieldValue::Float(_)));
    }

    #[test]
    fn test_dates_render_as_iso_text() {
        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(FieldValue::Date(date).to_json(), json!("2020-01-01"));
        assert_eq!(FieldValue::Date(date).to_string(), "2020-01-01");
    }

    #[test]
    fn test_list_display_quotes_text() {
        let list = FieldValue::List(vec![FieldValue::from("a"), FieldValue::Int(1)]);
        assert_eq!(list.to_string(), "['a', 1]");
    }
}
