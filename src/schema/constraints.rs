//! Constraint checks on an already-typed value
//!
//! Fixed order, first violation wins:
//! 1. min_val
//! 2. max_val
//! 3. value_list
//! 4. min_len / max_len (only for values that have a length)
//! 5. regex (only for text)

use std::cmp::Ordering;

use super::definition::Constraints;
use super::errors::{FieldError, FieldResult};
use super::value::FieldValue;

/// Checks `value` at `field_path` against `constraints`.
///
/// Deferred bounds are resolved here, immediately before use. A bound that
/// cannot be ordered against the value counts as violated.
pub fn check_constraints(
    value: &FieldValue,
    field_path: &str,
    constraints: &Constraints,
) -> FieldResult<()> {
    if let Some(bound) = &constraints.min_val {
        let min = bound.resolve();
        match value.compare(&min) {
            Some(Ordering::Less) | None => return Err(FieldError::min_range(field_path, &min)),
            _ => {}
        }
    }

    if let Some(bound) = &constraints.max_val {
        let max = bound.resolve();
        match value.compare(&max) {
            Some(Ordering::Greater) | None => return Err(FieldError::max_range(field_path, &max)),
            _ => {}
        }
    }

    if let Some(allowed) = &constraints.value_list {
        if !allowed.iter().any(|candidate| value.same_value(candidate)) {
            return Err(FieldError::not_allowed(field_path, allowed));
        }
    }

    // Values without a length skip length checks.
    if let Some(length) = value.length() {
        if let Some(min_len) = constraints.min_len {
            if length < min_len {
                return Err(FieldError::min_length(field_path, min_len));
            }
        }
        if let Some(max_len) = constraints.max_len {
            if length > max_len {
                return Err(FieldError::max_length(field_path, max_len));
            }
        }
    }

    if let (Some(regex), FieldValue::Str(text)) = (&constraints.regex, value) {
        if !regex.is_match(text) {
            return Err(FieldError::pattern(
                field_path,
                regex.as_str(),
                constraints.regex_error_message.as_deref(),
            ));
        }
    }

    Ok(())
}
