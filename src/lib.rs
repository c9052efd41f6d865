//! argcheck - schema-driven validation and normalization of call arguments
//!
//! Raw structured input is checked against a declarative `Definition` before
//! a handler runs. The result is either a flat map of normalized values keyed
//! by alias, or a single path-qualified error describing the first violation.
//!
//! ```
//! use argcheck::schema::{ArgPreprocessor, Definition, FieldSpec, FieldValue, ParserOptions};
//! use serde_json::json;
//!
//! let definition = Definition::new().field(
//!     "pageNo",
//!     FieldSpec::int().min_val(1).max_val(10).alias("page_no"),
//! );
//! let preprocessor = ArgPreprocessor::new(
//!     definition,
//!     ParserOptions::strict().with_auto_type_cast(true),
//! )
//! .unwrap();
//!
//! let args = preprocessor.parse_json(&json!({"pageNo": "10"})).unwrap();
//! assert_eq!(args["page_no"], FieldValue::Int(10));
//! ```

pub mod cli;
pub mod observability;
pub mod schema;
