//! Structural validation of JSON bodies against named schemas.

use std::sync::LazyLock;

use apiprobe_domain::{Constraint, FieldRule, Schema, SchemaRegistry, StringFormat};
use regex::Regex;
use serde_json::Value;

#[allow(clippy::expect_used)]
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid regex"));

/// Result of validating a value against a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Whether the value conforms.
    pub ok: bool,
    /// Human-readable description of the result.
    pub message: String,
}

impl ValidationOutcome {
    fn pass(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Validates JSON values against the schemas in a [`SchemaRegistry`].
///
/// Validation never panics; unknown schemas and mismatches are reported
/// through [`ValidationOutcome`].
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    registry: SchemaRegistry,
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaValidator {
    /// Creates a validator over the built-in schemas.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(SchemaRegistry::builtin())
    }

    /// Creates a validator over a custom registry.
    #[must_use]
    pub const fn with_registry(registry: SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Returns the schema registry.
    #[must_use]
    pub const fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Validates `value` against the schema named `schema_name`.
    #[must_use]
    pub fn validate(&self, value: &Value, schema_name: &str) -> ValidationOutcome {
        let Some(schema) = self.registry.get(schema_name) else {
            return ValidationOutcome::fail(format!("Schema '{schema_name}' not found"));
        };

        match check(value, schema) {
            Ok(()) => ValidationOutcome::pass("Schema validation passed"),
            Err(reason) => ValidationOutcome::fail(format!("Schema validation failed: {reason}")),
        }
    }

    /// Validates every element of an array against `schema_name`.
    ///
    /// Stops at the first failing element.
    #[must_use]
    pub fn validate_list(&self, value: &Value, schema_name: &str) -> ValidationOutcome {
        let Some(items) = value.as_array() else {
            return ValidationOutcome::fail("Response is not a list");
        };

        for (index, item) in items.iter().enumerate() {
            let outcome = self.validate(item, schema_name);
            if !outcome.ok {
                return ValidationOutcome::fail(format!("Item {index}: {}", outcome.message));
            }
        }

        ValidationOutcome::pass(format!(
            "All {} items passed schema validation",
            items.len()
        ))
    }
}

/// Checks the object shape, then required fields, then each declared field.
fn check(value: &Value, schema: &Schema) -> Result<(), String> {
    let Some(object) = value.as_object() else {
        return Err(format!("{value} is not of type 'object'"));
    };

    let missing: Vec<String> = schema
        .required_fields()
        .filter(|name| !object.contains_key(*name))
        .map(|name| format!("'{name}'"))
        .collect();
    match missing.len() {
        0 => {}
        1 => return Err(format!("{} is a required property", missing[0])),
        _ => return Err(format!("{} are required properties", missing.join(", "))),
    }

    for rule in schema.fields() {
        if let Some(field_value) = object.get(&rule.name) {
            check_field(field_value, rule)?;
        }
    }

    Ok(())
}

fn check_field(value: &Value, rule: &FieldRule) -> Result<(), String> {
    if !rule.kind.accepts(value) {
        return Err(format!(
            "{value} is not of type '{}' (field '{}')",
            rule.kind, rule.name
        ));
    }

    for constraint in &rule.constraints {
        match constraint {
            Constraint::OneOf { values } => {
                if !value.as_str().is_some_and(|s| values.iter().any(|v| v.as_str() == s)) {
                    return Err(format!(
                        "{value} is not one of {values:?} (field '{}')",
                        rule.name
                    ));
                }
            }
            Constraint::Format { format } => {
                if !value.as_str().is_some_and(|s| matches_format(s, *format)) {
                    return Err(format!(
                        "{value} is not a '{}' (field '{}')",
                        format.as_str(),
                        rule.name
                    ));
                }
            }
            Constraint::MinLength { min } => {
                if value.as_str().is_some_and(|s| s.chars().count() < *min) {
                    return Err(format!("{value} is too short (field '{}')", rule.name));
                }
            }
        }
    }

    Ok(())
}

fn matches_format(value: &str, format: StringFormat) -> bool {
    match format {
        StringFormat::Email => EMAIL.is_match(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apiprobe_domain::JsonType;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn user() -> Value {
        json!({
            "id": 7_412_301,
            "name": "Jane Roe",
            "email": "jane.roe@example.com",
            "gender": "female",
            "status": "active"
        })
    }

    #[test]
    fn test_valid_post() {
        let validator = SchemaValidator::new();
        let post = json!({"id": 1, "title": "t", "body": "b", "userId": 1});
        let outcome = validator.validate(&post, "post");
        assert!(outcome.ok, "{}", outcome.message);
        assert_eq!(outcome.message, "Schema validation passed");
    }

    #[test]
    fn test_unknown_schema() {
        let outcome = SchemaValidator::new().validate(&json!({}), "comment");
        assert_eq!(
            outcome,
            ValidationOutcome {
                ok: false,
                message: "Schema 'comment' not found".to_string()
            }
        );
    }

    #[test]
    fn test_hyphenated_names_resolve() {
        let outcome = SchemaValidator::new().validate(&json!({"token": "abc"}), "login-success");
        assert!(outcome.ok);
    }

    #[test]
    fn test_all_missing_required_fields_reported() {
        let outcome = SchemaValidator::new().validate(&json!({"name": "John Doe"}), "user");
        assert!(!outcome.ok);
        for field in ["id", "email", "gender", "status"] {
            assert!(
                outcome.message.contains(&format!("'{field}'")),
                "{} should mention {field}",
                outcome.message
            );
        }
        assert!(!outcome.message.contains("'name'"));
    }

    #[test]
    fn test_not_an_object() {
        let outcome = SchemaValidator::new().validate(&json!("text"), "error_response");
        assert!(!outcome.ok);
        assert!(outcome.message.contains("is not of type 'object'"));
    }

    #[test]
    fn test_type_checked_before_enum() {
        let mut value = user();
        value["gender"] = json!(1);
        let outcome = SchemaValidator::new().validate(&value, "user");
        assert!(outcome.message.contains("is not of type 'string'"));
    }

    #[test]
    fn test_enum_violation() {
        let mut value = user();
        value["status"] = json!("invalid_status");
        let outcome = SchemaValidator::new().validate(&value, "user");
        assert!(!outcome.ok);
        assert!(outcome.message.contains("\"invalid_status\" is not one of"));
    }

    #[test]
    fn test_first_violation_in_declaration_order() {
        let mut value = user();
        value["email"] = json!("invalid-email");
        value["gender"] = json!("invalid_gender");
        let outcome = SchemaValidator::new().validate(&value, "user");
        assert!(outcome.message.contains("field 'email'"));
        assert!(!outcome.message.contains("gender"));
    }

    #[test]
    fn test_email_format() {
        let validator = SchemaValidator::new();
        assert!(validator.validate(&user(), "user").ok);

        for bad in ["invalid-email", "user@", "@domain.com", "user.domain.com", "user@domain"] {
            let mut value = user();
            value["email"] = json!(bad);
            assert!(!validator.validate(&value, "user").ok, "{bad} accepted");
        }
    }

    #[test]
    fn test_min_length() {
        let outcome = SchemaValidator::new().validate(&json!({"token": ""}), "login_success");
        assert!(!outcome.ok);
        assert!(outcome.message.contains("is too short"));
    }

    #[test]
    fn test_integer_accepts_whole_float() {
        let post = json!({"id": 1.0, "title": "t", "body": "b", "userId": 2});
        assert!(SchemaValidator::new().validate(&post, "post").ok);
    }

    #[test]
    fn test_optional_fields() {
        let validator = SchemaValidator::new();
        assert!(validator.validate(&json!({}), "validation_error").ok);
        assert!(!validator.validate(&json!({"field": 3}), "validation_error").ok);
    }

    #[test]
    fn test_validate_list() {
        let validator = SchemaValidator::new();

        let outcome = validator.validate_list(&json!({"id": 1}), "post");
        assert_eq!(outcome.message, "Response is not a list");

        let posts = json!([
            {"id": 1, "title": "a", "body": "b", "userId": 1},
            {"id": 2, "title": "a", "body": "b", "userId": 1}
        ]);
        let outcome = validator.validate_list(&posts, "post");
        assert!(outcome.ok);
        assert_eq!(outcome.message, "All 2 items passed schema validation");

        let posts = json!([
            {"id": 1, "title": "a", "body": "b", "userId": 1},
            {"id": 2, "title": "a"}
        ]);
        let outcome = validator.validate_list(&posts, "post");
        assert!(!outcome.ok);
        assert!(outcome.message.starts_with("Item 1: "));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let validator = SchemaValidator::new();
        let value = json!({"name": "John Doe"});
        assert_eq!(
            validator.validate(&value, "user"),
            validator.validate(&value, "user")
        );
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = SchemaRegistry::new();
        registry.register(Schema::new(
            "comment",
            vec![FieldRule::required("postId", JsonType::Integer)],
        ));
        let validator = SchemaValidator::with_registry(registry);
        assert!(validator.validate(&json!({"postId": 1}), "comment").ok);
        assert!(!validator.validate(&json!({}), "post").ok);
    }
}
