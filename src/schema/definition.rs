//! Declarative schema model
//!
//! A `Definition` is built once and shared read-only by every parse call.
//! Nothing in here is mutated during parsing; per-call state lives in the
//! parser.

use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::adapters::DataType;
use super::errors::{FieldResult, SchemaError, SchemaResult};
use super::value::FieldValue;

type Producer = dyn Fn() -> FieldValue + Send + Sync;
type ValidatorFn = dyn Fn(&str, &FieldValue) -> FieldResult<FieldValue> + Send + Sync;

/// A bound or default given either as a literal or as a zero-argument
/// producer evaluated at the moment of use (e.g. "today").
#[derive(Clone)]
pub enum BoundValue {
    Literal(FieldValue),
    Deferred(Arc<Producer>),
}

impl BoundValue {
    pub fn deferred<F>(producer: F) -> Self
    where
        F: Fn() -> FieldValue + Send + Sync + 'static,
    {
        BoundValue::Deferred(Arc::new(producer))
    }

    /// Resolves the value, invoking the producer if deferred
    pub fn resolve(&self) -> FieldValue {
        match self {
            BoundValue::Literal(value) => value.clone(),
            BoundValue::Deferred(producer) => producer(),
        }
    }
}

impl fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            BoundValue::Deferred(_) => write!(f, "Deferred(..)"),
        }
    }
}

impl<T: Into<FieldValue>> From<T> for BoundValue {
    fn from(value: T) -> Self {
        BoundValue::Literal(value.into())
    }
}

/// Custom field validator, called as `(field_path, value)`.
///
/// It replaces type coercion and constraint checks for its field and decides
/// the shape of its own errors.
#[derive(Clone)]
pub struct Validator(Arc<ValidatorFn>);

impl Validator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &FieldValue) -> FieldResult<FieldValue> + Send + Sync + 'static,
    {
        Validator(Arc::new(f))
    }

    pub fn call(&self, field_path: &str, value: &FieldValue) -> FieldResult<FieldValue> {
        (self.0)(field_path, value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validator(..)")
    }
}

/// Optional value constraints, checked after coercion
#[derive(Debug, Clone, Default)]
pub struct Constraints {
    pub min_val: Option<BoundValue>,
    pub max_val: Option<BoundValue>,
    pub value_list: Option<Vec<FieldValue>>,
    pub regex: Option<Regex>,
    pub regex_error_message: Option<String>,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
}

/// Element rule of an aggregate field
#[derive(Debug, Clone)]
pub enum Nested {
    /// Each list element is cast to this type and constraint-checked
    Scalar(DataType),
    /// The object, or each list element, is parsed against this schema
    Schema(Definition),
}

/// How a field's value is produced
#[derive(Debug, Clone)]
pub enum FieldRule {
    Typed {
        data_type: DataType,
        nested: Option<Nested>,
    },
    Validator(Validator),
}

/// One schema entry
#[derive(Debug, Clone)]
pub struct FieldSpec {
    rule: FieldRule,
    required: bool,
    alias: Option<String>,
    default: Option<BoundValue>,
    constraints: Constraints,
    description: Option<String>,
}

impl FieldSpec {
    fn with_rule(rule: FieldRule) -> Self {
        Self {
            rule,
            required: false,
            alias: None,
            default: None,
            constraints: Constraints::default(),
            description: None,
        }
    }

    /// Scalar field of the given type
    pub fn new(data_type: impl Into<DataType>) -> Self {
        Self::with_rule(FieldRule::Typed {
            data_type: data_type.into(),
            nested: None,
        })
    }

    pub fn string() -> Self {
        Self::new(DataType::STRING)
    }

    pub fn int() -> Self {
        Self::new(DataType::INT)
    }

    pub fn float() -> Self {
        Self::new(DataType::FLOAT)
    }

    pub fn boolean() -> Self {
        Self::new(DataType::BOOL)
    }

    /// Object field parsed against `schema`
    pub fn object(schema: Definition) -> Self {
        Self::with_rule(FieldRule::Typed {
            data_type: DataType::OBJECT,
            nested: Some(Nested::Schema(schema)),
        })
    }

    /// List whose elements are cast to `element` and checked one by one
    pub fn list_of(element: impl Into<DataType>) -> Self {
        Self::with_rule(FieldRule::Typed {
            data_type: DataType::LIST,
            nested: Some(Nested::Scalar(element.into())),
        })
    }

    /// List whose elements are each parsed against `schema`
    pub fn list_of_objects(schema: Definition) -> Self {
        Self::with_rule(FieldRule::Typed {
            data_type: DataType::LIST,
            nested: Some(Nested::Schema(schema)),
        })
    }

    /// Field handled entirely by a custom validator
    pub fn validated<F>(f: F) -> Self
    where
        F: Fn(&str, &FieldValue) -> FieldResult<FieldValue> + Send + Sync + 'static,
    {
        Self::with_rule(FieldRule::Validator(Validator::new(f)))
    }

    pub fn with_validator(validator: Validator) -> Self {
        Self::with_rule(FieldRule::Validator(validator))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn set_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn default(mut self, value: impl Into<BoundValue>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn default_with<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> FieldValue + Send + Sync + 'static,
    {
        self.default = Some(BoundValue::deferred(producer));
        self
    }

    pub fn min_val(mut self, value: impl Into<BoundValue>) -> Self {
        self.constraints.min_val = Some(value.into());
        self
    }

    pub fn min_val_with<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> FieldValue + Send + Sync + 'static,
    {
        self.constraints.min_val = Some(BoundValue::deferred(producer));
        self
    }

    pub fn max_val(mut self, value: impl Into<BoundValue>) -> Self {
        self.constraints.max_val = Some(value.into());
        self
    }

    pub fn max_val_with<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> FieldValue + Send + Sync + 'static,
    {
        self.constraints.max_val = Some(BoundValue::deferred(producer));
        self
    }

    pub fn value_list<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        self.constraints.value_list = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Pattern the text must contain a match of
    pub fn regex(mut self, pattern: &str) -> SchemaResult<Self> {
        let compiled = Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        self.constraints.regex = Some(compiled);
        Ok(self)
    }

    pub fn regex_error_message(mut self, message: impl Into<String>) -> Self {
        self.constraints.regex_error_message = Some(message.into());
        self
    }

    pub fn min_len(mut self, min_len: usize) -> Self {
        self.constraints.min_len = Some(min_len);
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.constraints.max_len = Some(max_len);
        self
    }

    /// Documentation only
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn rule(&self) -> &FieldRule {
        &self.rule
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Output key: the alias, or the field key itself
    pub fn output_key<'a>(&'a self, key: &'a str) -> &'a str {
        self.alias.as_deref().unwrap_or(key)
    }

    pub fn default_value(&self) -> Option<&BoundValue> {
        self.default.as_ref()
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Ordered mapping of field key to spec; declaration order is traversal order
#[derive(Debug, Clone, Default)]
pub struct Definition {
    fields: Vec<(String, FieldSpec)>,
}

impl Definition {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field, builder style
    pub fn field(mut self, key: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.push((key.into(), spec));
        self
    }

    pub fn push(&mut self, key: impl Into<String>, spec: FieldSpec) {
        self.fields.push((key.into(), spec));
    }

    pub fn get(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, spec)| spec)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(k, spec)| (k.as_str(), spec))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validates the definition itself (not an input), recursively.
    ///
    /// Rejects duplicate keys, two fields writing the same output key,
    /// `min_len > max_len`, and empty nested schemas.
    pub fn validate_structure(&self) -> SchemaResult<()> {
        self.validate_level("")
    }

    fn validate_level(&self, prefix: &str) -> SchemaResult<()> {
        let mut keys = HashSet::new();
        let mut aliases = HashSet::new();

        for (key, spec) in &self.fields {
            let path = make_path(prefix, key);

            if !keys.insert(key.as_str()) {
                return Err(SchemaError::DuplicateField(path));
            }
            let output_key = spec.output_key(key);
            if !aliases.insert(output_key) {
                return Err(SchemaError::DuplicateAlias {
                    path: if prefix.is_empty() { "$root".into() } else { prefix.to_string() },
                    alias: output_key.to_string(),
                });
            }

            if let (Some(min), Some(max)) = (spec.constraints.min_len, spec.constraints.max_len) {
                if min > max {
                    return Err(SchemaError::InvalidLengthBounds(path));
                }
            }

            if let FieldRule::Typed {
                nested: Some(Nested::Schema(schema)),
                ..
            } = &spec.rule
            {
                if schema.is_empty() {
                    return Err(SchemaError::EmptyNestedSchema(path));
                }
                schema.validate_level(&path)?;
            }
        }

        Ok(())
    }
}

/// Creates a field path from prefix and field name.
pub(crate) fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

/// Creates an element path from a list path and index.
pub(crate) fn make_index_path(prefix: &str, index: usize) -> String {
    format!("{}[{}]", prefix, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn contact_schema() -> Definition {
        Definition::new()
            .field("first_name", FieldSpec::string().required())
            .field("phone_number", FieldSpec::string().required())
    }

    #[test]
    fn test_declaration_order_preserved() {
        let def = Definition::new()
            .field("zebra", FieldSpec::int())
            .field("apple", FieldSpec::int())
            .field("mango", FieldSpec::int());
        let keys: Vec<_> = def.keys().collect();
        assert_eq!(keys, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_alias_defaults_to_key() {
        let spec = FieldSpec::int();
        assert_eq!(spec.output_key("pageNo"), "pageNo");
        let spec = FieldSpec::int().alias("page_no");
        assert_eq!(spec.output_key("pageNo"), "page_no");
    }

    #[test]
    fn test_deferred_bound_resolved_each_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let bound = BoundValue::deferred(move || {
            FieldValue::Int(counter.fetch_add(1, Ordering::SeqCst) as i64)
        });
        assert_eq!(bound.resolve(), FieldValue::Int(0));
        assert_eq!(bound.resolve(), FieldValue::Int(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let result = FieldSpec::string().regex("[0-9");
        assert!(matches!(result, Err(SchemaError::InvalidPattern { .. })));
    }

    #[test]
    fn test_structure_valid() {
        let def = Definition::new()
            .field("name", FieldSpec::string().required())
            .field("contact", FieldSpec::object(contact_schema()))
            .field("tags", FieldSpec::list_of(DataType::STRING).max_len(5));
        assert!(def.validate_structure().is_ok());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let def = Definition::new()
            .field("name", FieldSpec::string())
            .field("name", FieldSpec::int());
        assert!(matches!(def.validate_structure(), Err(SchemaError::DuplicateField(_))));
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let def = Definition::new()
            .field("pageNo", FieldSpec::int().alias("page"))
            .field("page", FieldSpec::int());
        assert!(matches!(
            def.validate_structure(),
            Err(SchemaError::DuplicateAlias { .. })
        ));
    }

    #[test]
    fn test_length_bounds_checked() {
        let def = Definition::new().field("name", FieldSpec::string().min_len(5).max_len(2));
        assert!(matches!(
            def.validate_structure(),
            Err(SchemaError::InvalidLengthBounds(_))
        ));
    }

    #[test]
    fn test_nested_errors_carry_path() {
        let inner = Definition::new()
            .field("x", FieldSpec::int())
            .field("x", FieldSpec::int());
        let def = Definition::new().field("outer", FieldSpec::list_of_objects(inner));
        match def.validate_structure() {
            Err(SchemaError::DuplicateField(path)) => assert_eq!(path, "outer.x"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_nested_schema_rejected() {
        let def = Definition::new().field("contact", FieldSpec::object(Definition::new()));
        assert!(matches!(
            def.validate_structure(),
            Err(SchemaError::EmptyNestedSchema(_))
        ));
    }

    #[test]
    fn test_make_paths() {
        assert_eq!(make_path("", "a"), "a");
        assert_eq!(make_path("a", "b"), "a.b");
        assert_eq!(make_index_path("a.b", 3), "a.b[3]");
    }
}
