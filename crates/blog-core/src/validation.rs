//! Field checks for decoded JSON request bodies.
//!
//! Messages are collected into [`ValidationErrors`] so that one response
//! reports every bad field at once.

use serde_json::{Map, Value};

use crate::error::ValidationErrors;

/// The body as a JSON object, or a non-field error naming what was sent.
pub fn expect_object(body: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    body.as_object().ok_or_else(|| {
        ValidationErrors::single(
            ValidationErrors::NON_FIELD,
            format!(
                "Invalid data. Expected a dictionary, but got {}.",
                json_type_name(body)
            ),
        )
    })
}

/// A required, non-blank string field.
///
/// Returns the raw value; blankness is judged on the trimmed text.
pub fn text_field<'a>(
    object: &'a Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a str> {
    match object.get(field) {
        None => {
            errors.add(field, "This field is required.");
            None
        }
        Some(Value::Null) => {
            errors.add(field, "This field may not be null.");
            None
        }
        Some(Value::String(text)) if text.trim().is_empty() => {
            errors.add(field, "This field may not be blank.");
            None
        }
        Some(Value::String(text)) => Some(text),
        Some(_) => {
            errors.add(field, "Not a valid string.");
            None
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}
