//! Assertions over responses and decoded JSON bodies.
//!
//! Each function returns `Ok(())` when the check holds and an
//! [`AssertionError`] naming the test case otherwise. JSON "maps" are
//! `serde_json::Value`s; a value that is not an object behaves as an
//! empty map.

use apiprobe_domain::{AssertionError, JsonType, ResponseSpec, StatusExpectation};
use serde_json::{Map, Value};

/// Result of a single check.
pub type AssertionResult = Result<(), AssertionError>;

fn fields_of(value: &Value) -> Option<&Map<String, Value>> {
    value.as_object()
}

fn contains(value: &Value, field: &str) -> bool {
    fields_of(value).is_some_and(|map| map.contains_key(field))
}

fn lookup<'a>(value: &'a Value, field: &str) -> Option<&'a Value> {
    fields_of(value).and_then(|map| map.get(field))
}

/// Renders a value for messages; strings appear without JSON quotes.
fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Asserts the response status equals `expected`.
///
/// # Errors
///
/// Fails with both the expected and actual code in the message.
pub fn assert_status_code(
    response: &ResponseSpec,
    expected: u16,
    test_case: Option<&str>,
) -> AssertionResult {
    let actual = response.status;
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::new(
            test_case,
            "status_code",
            format!("Expected status code {expected}, got {actual}"),
        ))
    }
}

/// Asserts the response status is one of `expected`.
///
/// # Errors
///
/// Fails when the status matches none of the codes.
pub fn assert_status_in(
    response: &ResponseSpec,
    expected: &[u16],
    test_case: Option<&str>,
) -> AssertionResult {
    let expectation = StatusExpectation(expected.to_vec());
    let actual = response.status;
    if expectation.matches(actual) {
        Ok(())
    } else {
        Err(AssertionError::new(
            test_case,
            "status_in",
            format!(
                "Expected status code {}, got {actual}",
                expectation.description()
            ),
        ))
    }
}

/// Asserts the measured latency is at most `max_ms` milliseconds.
///
/// # Errors
///
/// Fails with the measured and allowed latency in the message.
pub fn assert_response_time(
    response: &ResponseSpec,
    max_ms: u64,
    test_case: Option<&str>,
) -> AssertionResult {
    let actual = response.elapsed_ms();
    #[allow(clippy::cast_precision_loss)]
    let limit = max_ms as f64;
    if actual <= limit {
        Ok(())
    } else {
        Err(AssertionError::new(
            test_case,
            "response_time",
            format!("Response time {actual}ms exceeds limit {max_ms}ms"),
        ))
    }
}

/// Asserts every name in `fields` is present.
///
/// # Errors
///
/// Fails listing the missing subset.
pub fn assert_json_contains(
    value: &Value,
    fields: &[&str],
    test_case: Option<&str>,
) -> AssertionResult {
    let missing: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|field| !contains(value, field))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AssertionError::new(
            test_case,
            "json_contains",
            format!("Missing fields: {missing:?}"),
        ))
    }
}

/// Asserts none of the names in `fields` is present.
///
/// # Errors
///
/// Fails listing the offending subset.
pub fn assert_json_not_contains(
    value: &Value,
    fields: &[&str],
    test_case: Option<&str>,
) -> AssertionResult {
    let present: Vec<&str> = fields
        .iter()
        .copied()
        .filter(|field| contains(value, field))
        .collect();

    if present.is_empty() {
        Ok(())
    } else {
        Err(AssertionError::new(
            test_case,
            "json_not_contains",
            format!("Forbidden fields present: {present:?}"),
        ))
    }
}

/// Asserts `field` has runtime type `expected`. An absent field passes.
///
/// Runtime types are strict: `1.0` is a number, not an integer, and
/// booleans are never numbers.
///
/// # Errors
///
/// Fails naming the expected and actual type.
pub fn assert_field_type(
    value: &Value,
    field: &str,
    expected: JsonType,
    test_case: Option<&str>,
) -> AssertionResult {
    let Some(actual) = lookup(value, field) else {
        return Ok(());
    };

    let actual_type = JsonType::of(actual);
    if actual_type == expected {
        Ok(())
    } else {
        Err(AssertionError::new(
            test_case,
            "field_type",
            format!("Field '{field}' expected {expected}, got {actual_type}"),
        ))
    }
}

/// Asserts `field` equals `expected`, comparing type and value. An absent
/// field compares as `null`.
///
/// # Errors
///
/// Fails with both values in the message.
pub fn assert_field_value(
    value: &Value,
    field: &str,
    expected: &Value,
    test_case: Option<&str>,
) -> AssertionResult {
    let actual = lookup(value, field).unwrap_or(&Value::Null);
    if actual == expected {
        return Ok(());
    }

    let (expected_text, actual_text) = (display(expected), display(actual));
    let message = if expected_text == actual_text {
        // Same rendering, so only the types tell them apart
        format!(
            "Field '{field}' expected '{expected_text}' ({}), got '{actual_text}' ({})",
            JsonType::of(expected),
            JsonType::of(actual)
        )
    } else {
        format!("Field '{field}' expected '{expected_text}', got '{actual_text}'")
    };
    Err(AssertionError::new(test_case, "field_value", message))
}

/// Asserts `field` is a string with at least one character.
///
/// # Errors
///
/// Fails when the field is absent, not a string, or empty.
pub fn assert_non_empty_string(
    value: &Value,
    field: &str,
    test_case: Option<&str>,
) -> AssertionResult {
    match lookup(value, field) {
        Some(Value::String(s)) if !s.is_empty() => Ok(()),
        other => Err(AssertionError::new(
            test_case,
            "non_empty_string",
            format!(
                "Field '{field}' should be non-empty string, got: {}",
                other.map_or_else(|| "null".to_string(), display)
            ),
        )),
    }
}
