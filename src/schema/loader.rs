//! Definition loader for JSON schema documents
//!
//! A document is an object of field key to options; key order is the
//! traversal order. Example:
//!
//! ```json
//! {
//!   "pageNo": {"data_type": "int", "min_val": 1, "max_val": 10, "alias": "page_no"},
//!   "start_date": {"data_type": {"date": "%Y-%m-%d"}, "min_val": "2020-01-01"},
//!   "id_list": {"data_type": "list", "nested": "int", "value_list": [0, 1, 2, 3]},
//!   "holidays": {"data_type": "list", "nested": {"date": "%Y-%m-%d"}, "default": []},
//!   "request_id": {"validator": "uuid4", "required": true}
//! }
//! ```
//!
//! Validators cannot be written in JSON; documents name them, and the
//! loader resolves the names against its registry.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::adapters::{CastError, DataType, NativeType};
use super::definition::{make_path, Definition, FieldSpec, Validator};
use super::errors::{SchemaError, SchemaResult};
use super::validators;
use super::value::FieldValue;

/// Options of one field as written in a document
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDoc {
    data_type: Option<Value>,
    nested: Option<Value>,
    validator: Option<String>,
    #[serde(default)]
    required: bool,
    alias: Option<String>,
    default: Option<Value>,
    min_val: Option<Value>,
    max_val: Option<Value>,
    value_list: Option<Vec<Value>>,
    regex: Option<String>,
    regex_error_message: Option<String>,
    min_len: Option<usize>,
    max_len: Option<usize>,
    description: Option<String>,
}

/// Builds definitions from JSON documents.
pub struct DefinitionLoader {
    validators: HashMap<String, Validator>,
}

impl Default for DefinitionLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionLoader {
    /// Creates a loader with the built-in validators registered.
    pub fn new() -> Self {
        let mut loader = Self {
            validators: HashMap::new(),
        };
        loader.register_validator("uuid4", Validator::new(validators::uuid4));
        loader
    }

    /// Registers a validator documents can refer to by name.
    pub fn register_validator(&mut self, name: impl Into<String>, validator: Validator) {
        self.validators.insert(name.into(), validator);
    }

    pub fn has_validator(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Loads a definition from a JSON file.
    pub fn load_file(&self, path: &Path) -> SchemaResult<Definition> {
        let content = fs::read_to_string(path).map_err(|e| SchemaError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        self.load_str(&content)
    }

    /// Loads a definition from JSON text.
    pub fn load_str(&self, content: &str) -> SchemaResult<Definition> {
        let document: Value = serde_json::from_str(content).map_err(|e| SchemaError::Malformed {
            path: "$root".into(),
            reason: format!("Invalid JSON: {}", e),
        })?;
        self.load_value(&document)
    }

    /// Loads a definition from an already-parsed JSON document.
    pub fn load_value(&self, document: &Value) -> SchemaResult<Definition> {
        let fields = document.as_object().ok_or_else(|| SchemaError::Malformed {
            path: "$root".into(),
            reason: "definition must be an object".into(),
        })?;
        let definition = self.build_definition(fields, "")?;
        definition.validate_structure()?;
        Ok(definition)
    }

    fn build_definition(
        &self,
        fields: &Map<String, Value>,
        prefix: &str,
    ) -> SchemaResult<Definition> {
        let mut definition = Definition::new();
        for (key, options) in fields {
            let path = make_path(prefix, key);
            let doc: FieldDoc = serde_json::from_value(options.clone()).map_err(|e| {
                SchemaError::Malformed {
                    path: path.clone(),
                    reason: e.to_string(),
                }
            })?;
            definition.push(key.clone(), self.build_field(doc, &path)?);
        }
        Ok(definition)
    }

    fn build_field(&self, doc: FieldDoc, path: &str) -> SchemaResult<FieldSpec> {
        if doc.validator.is_some() && doc.nested.is_some() {
            return Err(malformed(path, "validator cannot be combined with nested"));
        }
        let (spec, literals) = match (&doc.validator, &doc.data_type) {
            (Some(_), Some(_)) => {
                return Err(malformed(path, "validator and data_type are exclusive"));
            }
            (Some(name), None) => {
                let validator = self
                    .validators
                    .get(name)
                    .cloned()
                    .ok_or_else(|| SchemaError::UnknownValidator(name.clone()))?;
                (FieldSpec::with_validator(validator), Literals::Raw)
            }
            (None, Some(data_type)) => {
                let data_type = parse_type(data_type)?;
                self.build_typed(data_type, doc.nested.as_ref(), path)?
            }
            (None, None) => return Err(malformed(path, "data_type or validator is required")),
        };

        // Bounds, defaults and allowed values are written as JSON literals;
        // they are read through the type the checked values will have.
        let convert = |value: &Value, option: &str| -> SchemaResult<FieldValue> {
            literals.read(value).map_err(|e| {
                malformed(path, &format!("{} does not match the field type: {}", option, e))
            })
        };

        let mut spec = spec.set_required(doc.required);
        if let Some(alias) = doc.alias {
            spec = spec.alias(alias);
        }
        if let Some(default) = &doc.default {
            let default = match (&literals, default) {
                (Literals::Elements(_), Value::Array(items)) => FieldValue::List(
                    items
                        .iter()
                        .map(|item| convert(item, "default"))
                        .collect::<SchemaResult<Vec<_>>>()?,
                ),
                (Literals::Elements(_), _) => {
                    return Err(malformed(path, "default of a list field must be a list"));
                }
                _ => convert(default, "default")?,
            };
            spec = spec.default(default);
        }
        if let Some(min) = &doc.min_val {
            spec = spec.min_val(convert(min, "min_val")?);
        }
        if let Some(max) = &doc.max_val {
            spec = spec.max_val(convert(max, "max_val")?);
        }
        if let Some(values) = &doc.value_list {
            let allowed = values
                .iter()
                .map(|v| convert(v, "value_list"))
                .collect::<SchemaResult<Vec<_>>>()?;
            spec = spec.value_list(allowed);
        }
        if let Some(pattern) = &doc.regex {
            spec = spec.regex(pattern)?;
        }
        if let Some(message) = doc.regex_error_message {
            spec = spec.regex_error_message(message);
        }
        if let Some(min_len) = doc.min_len {
            spec = spec.min_len(min_len);
        }
        if let Some(max_len) = doc.max_len {
            spec = spec.max_len(max_len);
        }
        if let Some(description) = doc.description {
            spec = spec.description(description);
        }

        Ok(spec)
    }

    /// Builds a typed spec and returns the type its literals are read as.
    fn build_typed(
        &self,
        data_type: DataType,
        nested: Option<&Value>,
        path: &str,
    ) -> SchemaResult<(FieldSpec, Literals)> {
        match nested {
            None => Ok((FieldSpec::new(data_type.clone()), Literals::Typed(data_type))),
            Some(Value::Object(fields)) if data_type.is_object() => Ok((
                FieldSpec::object(self.build_definition(fields, path)?),
                Literals::Raw,
            )),
            Some(Value::Object(fields)) if data_type.is_list() => match adapter_form(fields) {
                Some(element_type) => Ok((
                    FieldSpec::list_of(element_type.clone()),
                    Literals::Elements(element_type),
                )),
                None => Ok((
                    FieldSpec::list_of_objects(self.build_definition(fields, path)?),
                    Literals::Raw,
                )),
            },
            Some(Value::Object(_)) => Err(malformed(
                path,
                "nested schema requires a list or object type",
            )),
            Some(element) if data_type.is_list() => {
                let element_type = parse_type(element)?;
                Ok((
                    FieldSpec::list_of(element_type.clone()),
                    Literals::Elements(element_type),
                ))
            }
            Some(_) => Err(malformed(path, "nested element type requires a list type")),
        }
    }
}

/// How the JSON literals of a field's options are read
enum Literals {
    /// Kept as written
    Raw,
    /// Read through the field's own type
    Typed(DataType),
    /// Read through the element type of a list field
    Elements(DataType),
}

impl Literals {
    fn read(&self, value: &Value) -> Result<FieldValue, CastError> {
        let raw = FieldValue::from(value);
        match self {
            Literals::Typed(DataType::Custom(adapter))
            | Literals::Elements(DataType::Custom(adapter)) => adapter.parse(&raw),
            _ => Ok(raw),
        }
    }
}

/// Parses `"int"`, `{"date": fmt}` or `{"datetime": fmt}`.
fn parse_type(value: &Value) -> SchemaResult<DataType> {
    match value {
        Value::String(name) => NativeType::from_name(name)
            .map(DataType::Native)
            .ok_or_else(|| SchemaError::UnknownType(name.clone())),
        Value::Object(map) => {
            adapter_form(map).ok_or_else(|| SchemaError::UnknownType(value.to_string()))
        }
        other => Err(SchemaError::UnknownType(other.to_string())),
    }
}

/// Recognizes `{"date": fmt}` and `{"datetime": fmt}`.
///
/// A nested field named `date` has an object of options, never a string, so
/// this never mistakes a sub-schema for a type.
fn adapter_form(map: &Map<String, Value>) -> Option<DataType> {
    if map.len() != 1 {
        return None;
    }
    let (kind, format) = map.iter().next()?;
    match (kind.as_str(), format.as_str()?) {
        ("date", format) => Some(DataType::date(format)),
        ("datetime", format) => Some(DataType::datetime(format)),
        _ => None,
    }
}

fn malformed(path: &str, reason: &str) -> SchemaError {
    SchemaError::Malformed {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
