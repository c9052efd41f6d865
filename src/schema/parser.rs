//! Recursive argument parser
//!
//! Walks a `Definition` against raw input in declaration order and returns
//! the normalized arguments, keyed by alias, or the first violation.
//!
//! Per field, the error that wins is:
//! validator > type coercion > nested recursion > constraint > missing field.
//!
//! The definition is only ever read. Each call builds its own output map.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::observability::{Event, Logger};

use super::adapters::DataType;
use super::coercion::type_cast;
use super::constraints::check_constraints;
use super::definition::{make_index_path, make_path, Definition, FieldRule, FieldSpec, Nested};
use super::errors::{FieldError, FieldResult, SchemaResult};
use super::value::{FieldValue, ValueMap};

/// Normalized arguments: alias to value
pub type ParsedArgs = ValueMap;

/// Engine-level configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserOptions {
    /// Reject undeclared keys at every level the traversal enters
    #[serde(default = "default_is_strict")]
    pub is_strict: bool,

    /// Convert text to int, float or bool when those types are declared
    #[serde(default)]
    pub auto_type_cast: bool,
}

fn default_is_strict() -> bool {
    true
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            is_strict: default_is_strict(),
            auto_type_cast: false,
        }
    }
}

impl ParserOptions {
    /// Strict mode, no auto-coercion
    pub fn strict() -> Self {
        Self::default()
    }

    /// Undeclared keys are ignored
    pub fn lenient() -> Self {
        Self {
            is_strict: false,
            ..Default::default()
        }
    }

    pub fn with_auto_type_cast(mut self, enabled: bool) -> Self {
        self.auto_type_cast = enabled;
        self
    }
}

/// Validates and normalizes raw arguments against a definition.
///
/// Safe to share across threads: parsing never mutates the definition.
#[derive(Debug, Clone)]
pub struct ArgPreprocessor {
    definition: Definition,
    options: ParserOptions,
}

impl ArgPreprocessor {
    /// Creates a preprocessor after validating the definition's structure.
    pub fn new(definition: Definition, options: ParserOptions) -> SchemaResult<Self> {
        if let Err(e) = definition.validate_structure() {
            Logger::warn(Event::DefinitionRejected.as_str(), &[("reason", &e.to_string())]);
            return Err(e);
        }

        Logger::trace(
            Event::DefinitionLoaded.as_str(),
            &[
                ("fields", &definition.len().to_string()),
                ("strict", &options.is_strict.to_string()),
            ],
        );

        Ok(Self { definition, options })
    }

    pub fn definition(&self) -> &Definition {
        &self.definition
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Parses raw input. Absent or empty input is treated as an empty object.
    pub fn parse(&self, raw: &FieldValue) -> FieldResult<ParsedArgs> {
        match self.parse_level(raw, &self.definition, "") {
            Ok(parsed) => {
                Logger::trace(
                    Event::ArgsAccepted.as_str(),
                    &[("fields", &parsed.len().to_string())],
                );
                Ok(parsed)
            }
            Err(e) => {
                Logger::info(
                    Event::ArgsRejected.as_str(),
                    &[("code", e.code().code()), ("field", e.field_path())],
                );
                Err(e)
            }
        }
    }

    /// Parses JSON input
    pub fn parse_json(&self, raw: &Value) -> FieldResult<ParsedArgs> {
        self.parse(&FieldValue::from(raw))
    }

    /// Parses `raw` and hands the normalized arguments to `handler`.
    pub fn call<R, F>(&self, raw: &FieldValue, handler: F) -> FieldResult<R>
    where
        F: FnOnce(ParsedArgs) -> R,
    {
        let parsed = self.parse(raw)?;
        Ok(handler(parsed))
    }

    /// Wraps `handler` so it only ever runs on normalized arguments.
    pub fn wrap<R, F>(self, handler: F) -> impl Fn(&FieldValue) -> FieldResult<R>
    where
        F: Fn(ParsedArgs) -> R,
    {
        move |raw| self.call(raw, &handler)
    }

    /// Parses one object level against `definition`.
    fn parse_level(
        &self,
        raw: &FieldValue,
        definition: &Definition,
        parent: &str,
    ) -> FieldResult<ValueMap> {
        let empty = ValueMap::new();
        let params = match raw {
            value if !value.is_present() => &empty,
            FieldValue::Map(map) => map,
            _ => return Err(FieldError::type_mismatch(parent, DataType::OBJECT.describe())),
        };

        let mut parsed = ValueMap::new();

        for (key, spec) in definition.iter() {
            let field_path = make_path(parent, key);

            match params.get(key).filter(|value| value.is_present()) {
                Some(value) => {
                    let normalized = self.parse_field(value, spec, &field_path)?;
                    parsed.insert(spec.output_key(key).to_string(), normalized);
                }
                None => {
                    if let Some(default) = spec.default_value() {
                        parsed.insert(spec.output_key(key).to_string(), default.resolve());
                    } else if spec.is_required() {
                        return Err(FieldError::missing_field(field_path));
                    }
                }
            }
        }

        if self.options.is_strict {
            let unrecognized: Vec<String> = params
                .keys()
                .filter(|key| !definition.contains_key(key))
                .cloned()
                .collect();
            if !unrecognized.is_empty() {
                return Err(FieldError::unrecognized(parent, unrecognized));
            }
        }

        Ok(parsed)
    }

    /// Produces the normalized value of one present field.
    fn parse_field(
        &self,
        value: &FieldValue,
        spec: &FieldSpec,
        field_path: &str,
    ) -> FieldResult<FieldValue> {
        let (data_type, nested) = match spec.rule() {
            FieldRule::Validator(validator) => return validator.call(field_path, value),
            FieldRule::Typed { data_type, nested } => (data_type, nested),
        };

        let typed = self.cast(value, data_type, field_path)?;

        match nested {
            Some(Nested::Schema(schema)) if data_type.is_object() => {
                let parsed = self.parse_level(&typed, schema, field_path)?;
                Ok(FieldValue::Map(parsed))
            }
            Some(Nested::Schema(schema)) if data_type.is_list() => {
                let items = typed.as_list().unwrap_or(&[]);
                let mut parsed = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let item_path = make_index_path(field_path, i);
                    parsed.push(FieldValue::Map(self.parse_level(item, schema, &item_path)?));
                }
                Ok(FieldValue::List(parsed))
            }
            Some(Nested::Scalar(element_type)) if data_type.is_list() => {
                let items = typed.as_list().unwrap_or(&[]);
                let mut parsed = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let item_path = make_index_path(field_path, i);
                    let item = self.cast(item, element_type, &item_path)?;
                    check_constraints(&item, &item_path, spec.constraints())?;
                    parsed.push(item);
                }
                Ok(FieldValue::List(parsed))
            }
            _ => {
                check_constraints(&typed, field_path, spec.constraints())?;
                Ok(typed)
            }
        }
    }

    fn cast(
        &self,
        value: &FieldValue,
        data_type: &DataType,
        field_path: &str,
    ) -> FieldResult<FieldValue> {
        type_cast(value, data_type, self.options.auto_type_cast)
            .map_err(|_| FieldError::type_mismatch(field_path, data_type.describe()))
    }
}
