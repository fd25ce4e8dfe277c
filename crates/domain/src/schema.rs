//! Structural response schemas.
//!
//! A [`Schema`] is a named, immutable contract over the fields of a JSON
//! object. Schemas are registered once in a [`SchemaRegistry`] and looked
//! up by name.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Runtime type tag of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// Whole number.
    Integer,
    /// Any number; as a runtime tag only non-integral numbers.
    Number,
    /// String.
    String,
    /// Array.
    Array,
    /// Object.
    Object,
}

impl JsonType {
    /// Returns the runtime type of a value.
    ///
    /// Numbers stored as integers are `Integer`; all other numbers are
    /// `Number`, so `1.0` and `1` have different runtime types.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Returns true if `value` satisfies this type as a schema constraint.
    ///
    /// Schema typing is looser than runtime typing: `integer` accepts
    /// numbers with a zero fractional part and `number` accepts integers.
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Integer, Value::Number(n)) => {
                n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0)
            }
            (Self::Number, Value::Number(_)) => true,
            _ => Self::of(value) == self,
        }
    }

    /// Returns the lowercase type name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named string formats a field may be required to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringFormat {
    /// An email-shaped string (`local@domain.tld`).
    Email,
}

impl StringFormat {
    /// Returns the format name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
        }
    }
}

/// A constraint applied to a field value after its type has matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    /// The value must be one of these strings.
    OneOf {
        /// Allowed values.
        values: Vec<String>,
    },
    /// The string must match a named format.
    Format {
        /// Required format.
        format: StringFormat,
    },
    /// The string must have at least this many characters.
    MinLength {
        /// Minimum length in characters.
        min: usize,
    },
}

/// Rule for a single field of an object schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Field name.
    pub name: String,
    /// Expected type.
    pub kind: JsonType,
    /// Whether the field must be present.
    pub required: bool,
    /// Additional constraints, checked in order.
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl FieldRule {
    /// Creates a required field rule.
    #[must_use]
    pub fn required(name: impl Into<String>, kind: JsonType) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            constraints: Vec::new(),
        }
    }

    /// Creates an optional field rule.
    #[must_use]
    pub fn optional(name: impl Into<String>, kind: JsonType) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            constraints: Vec::new(),
        }
    }

    /// Restricts the value to an enumerated set.
    #[must_use]
    pub fn one_of(mut self, values: &[&str]) -> Self {
        self.constraints.push(Constraint::OneOf {
            values: values.iter().map(ToString::to_string).collect(),
        });
        self
    }

    /// Requires the value to match a string format.
    #[must_use]
    pub fn format(mut self, format: StringFormat) -> Self {
        self.constraints.push(Constraint::Format { format });
        self
    }

    /// Requires a minimum string length.
    #[must_use]
    pub fn min_length(mut self, min: usize) -> Self {
        self.constraints.push(Constraint::MinLength { min });
        self
    }
}

/// An immutable object schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    fields: Vec<FieldRule>,
}

impl Schema {
    /// Creates a schema from its field rules.
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<FieldRule>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Returns the schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field rules in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    /// Returns the names of the required fields in declaration order.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
    }
}

/// Lookup table of schemas by name.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in response schemas:
    /// `post`, `user`, `login_success`, `error_response` and
    /// `validation_error`.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();

        registry.register(Schema::new(
            "post",
            vec![
                FieldRule::required("id", JsonType::Integer),
                FieldRule::required("title", JsonType::String),
                FieldRule::required("body", JsonType::String),
                FieldRule::required("userId", JsonType::Integer),
            ],
        ));

        registry.register(Schema::new(
            "user",
            vec![
                FieldRule::required("id", JsonType::Integer),
                FieldRule::required("name", JsonType::String),
                FieldRule::required("email", JsonType::String).format(StringFormat::Email),
                FieldRule::required("gender", JsonType::String).one_of(&["male", "female"]),
                FieldRule::required("status", JsonType::String).one_of(&["active", "inactive"]),
            ],
        ));

        registry.register(Schema::new(
            "login_success",
            vec![FieldRule::required("token", JsonType::String).min_length(1)],
        ));

        registry.register(Schema::new(
            "error_response",
            vec![FieldRule::required("error", JsonType::String)],
        ));

        registry.register(Schema::new(
            "validation_error",
            vec![
                FieldRule::optional("field", JsonType::String),
                FieldRule::optional("message", JsonType::String),
            ],
        ));

        registry
    }

    /// Registers a schema, replacing any schema with the same name.
    pub fn register(&mut self, schema: Schema) {
        self.schemas.insert(normalize(schema.name()), schema);
    }

    /// Looks up a schema by name.
    ///
    /// Hyphens and underscores are interchangeable, so `login-success`
    /// finds `login_success`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.schemas.get(&normalize(name))
    }

    /// Returns the registered schema names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.schemas.values().map(Schema::name).collect();
        names.sort_unstable();
        names
    }
}

fn normalize(name: &str) -> String {
    name.trim().replace('-', "_")
}
