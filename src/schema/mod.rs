//! Schema-driven argument preprocessing
//!
//! A `Definition` describes the accepted arguments once; an
//! `ArgPreprocessor` applies it to raw input on every call and returns the
//! normalized arguments or the first `FieldError`.
//!
//! # Design Principles
//!
//! - Definitions are immutable templates shared by all calls
//! - Declaration order is traversal order
//! - Fail fast: the first violation ends the call
//! - Coercion from text is opt-in
//! - Errors carry the full field path (`location[0].contact_person.phone_number`)

mod adapters;
mod coercion;
mod constraints;
mod definition;
mod errors;
mod loader;
mod parser;
mod value;
pub mod validators;

pub use adapters::{CastError, DataType, DateArg, DateTimeArg, NativeType, TypeAdapter};
pub use coercion::type_cast;
pub use constraints::check_constraints;
pub use definition::{BoundValue, Constraints, Definition, FieldRule, FieldSpec, Nested, Validator};
pub use errors::{ErrorCode, FieldError, FieldResult, SchemaError, SchemaResult};
pub use loader::DefinitionLoader;
pub use parser::{ArgPreprocessor, ParsedArgs, ParserOptions};
pub use value::{FieldValue, ValueMap};
