//! Schema validation and normalization.

use super::datetime::{format_datetime, parse_loose_datetime};
use super::{Field, ObjectSchema, Schema};
use crate::error::{FlowdaptError, Result, Violation};
use serde_json::{Map, Value};

/// Validates JSON values against a [`Schema`].
///
/// Validation is pure: it returns a normalized copy of the input with
/// defaults filled in, timestamps rewritten to RFC 3339 UTC and undeclared
/// object keys dropped. All violations in the document are collected
/// before failing.
pub struct SchemaValidator {
    violations: Vec<Violation>,
}

impl SchemaValidator {
    /// Validate `raw` against `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowdaptError::SchemaValidation`] listing every violation.
    pub fn validate(schema: &Schema, raw: &Value) -> Result<Value> {
        let mut validator = Self {
            violations: Vec::new(),
        };

        let normalized = validator.check(schema, raw, "");

        match normalized {
            Some(value) if validator.violations.is_empty() => Ok(value),
            _ => Err(FlowdaptError::validation(
                schema.name(),
                validator.violations,
            )),
        }
    }

    /// Validate each element of a JSON array against `item`.
    ///
    /// The whole list fails if any element fails; violation paths are
    /// prefixed with the element index.
    pub fn validate_list(item: &Schema, raw: &Value) -> Result<Vec<Value>> {
        let name = format!("{}[]", item.name());
        let Value::Array(elements) = raw else {
            let expected = format!("array of {}", item.describe());
            return Err(FlowdaptError::validation(
                name,
                vec![Violation::new("", expected, describe_value(raw))],
            ));
        };

        let mut validator = Self {
            violations: Vec::new(),
        };
        let mut out = Vec::with_capacity(elements.len());
        for (idx, element) in elements.iter().enumerate() {
            if let Some(v) = validator.check(item, element, &index_path("", idx)) {
                out.push(v);
            }
        }

        if validator.violations.is_empty() {
            Ok(out)
        } else {
            Err(FlowdaptError::validation(name, validator.violations))
        }
    }

    fn fail(&mut self, path: &str, expected: impl Into<String>, actual: &Value) -> Option<Value> {
        self.violations
            .push(Violation::new(path, expected, describe_value(actual)));
        None
    }

    fn check(&mut self, schema: &Schema, value: &Value, path: &str) -> Option<Value> {
        match schema {
            Schema::Any => Some(value.clone()),
            Schema::String => match value {
                Value::String(_) => Some(value.clone()),
                _ => self.fail(path, "string", value),
            },
            Schema::Uuid => match value {
                Value::String(s) if uuid::Uuid::parse_str(s).is_ok() => Some(value.clone()),
                _ => self.fail(path, "uuid string", value),
            },
            Schema::Number => match value {
                Value::Number(_) => Some(value.clone()),
                _ => self.fail(path, "number", value),
            },
            Schema::Integer => match value {
                Value::Number(n) if n.is_u64() || n.is_i64() => Some(value.clone()),
                _ => self.fail(path, "integer", value),
            },
            Schema::Boolean => match value {
                Value::Bool(_) => Some(value.clone()),
                _ => self.fail(path, "boolean", value),
            },
            Schema::DateTime => match parse_loose_datetime(value) {
                Some(dt) => Some(Value::String(format_datetime(&dt))),
                None => self.fail(path, "date", value),
            },
            Schema::Enum(allowed) => match value {
                Value::String(s) if allowed.contains(&s.as_str()) => Some(value.clone()),
                _ => self.fail(path, schema.describe(), value),
            },
            Schema::Literal(expected) => match value {
                Value::String(s) if s == expected => Some(value.clone()),
                _ => self.fail(path, schema.describe(), value),
            },
            Schema::Array(items) => match value {
                Value::Array(elements) => {
                    let mut out = Vec::with_capacity(elements.len());
                    let mut ok = true;
                    for (idx, element) in elements.iter().enumerate() {
                        match self.check(items, element, &index_path(path, idx)) {
                            Some(v) => out.push(v),
                            None => ok = false,
                        }
                    }
                    ok.then_some(Value::Array(out))
                }
                _ => self.fail(path, schema.describe(), value),
            },
            Schema::Record(values) => match value {
                Value::Object(entries) => {
                    let mut out = Map::new();
                    let mut ok = true;
                    for (key, entry) in entries {
                        match self.check(values, entry, &field_path(path, key)) {
                            Some(v) => {
                                out.insert(key.clone(), v);
                            }
                            None => ok = false,
                        }
                    }
                    ok.then_some(Value::Object(out))
                }
                _ => self.fail(path, schema.describe(), value),
            },
            Schema::Object(object) => self.check_object(object, value, path),
            Schema::Union(alternatives) => {
                for alternative in alternatives {
                    if let Ok(v) = Self::validate(alternative, value) {
                        return Some(v);
                    }
                }
                self.fail(path, schema.describe(), value)
            }
        }
    }

    fn check_object(&mut self, object: &ObjectSchema, value: &Value, path: &str) -> Option<Value> {
        let Value::Object(entries) = value else {
            return self.fail(path, format!("object {}", object.name), value);
        };

        let mut out = Map::new();
        let mut ok = true;

        for field in &object.fields {
            let field_path = field_path(path, field.name);
            match self.check_field(field, entries.get(field.name), &field_path) {
                FieldOutcome::Value(v) => {
                    out.insert(field.name.to_string(), v);
                }
                FieldOutcome::Absent => {}
                FieldOutcome::Invalid => ok = false,
            }
        }

        ok.then_some(Value::Object(out))
    }

    fn check_field(&mut self, field: &Field, value: Option<&Value>, path: &str) -> FieldOutcome {
        match value {
            None => match (&field.default, field.optional) {
                (Some(default), _) => FieldOutcome::Value(default.clone()),
                (None, true) => FieldOutcome::Absent,
                (None, false) => {
                    self.violations
                        .push(Violation::new(path, field.schema.describe(), "missing"));
                    FieldOutcome::Invalid
                }
            },
            Some(Value::Null) if field.nullable || matches!(field.schema, Schema::Any) => {
                FieldOutcome::Value(Value::Null)
            }
            Some(v) => match self.check(&field.schema, v, path) {
                Some(normalized) => FieldOutcome::Value(normalized),
                None => FieldOutcome::Invalid,
            },
        }
    }
}

enum FieldOutcome {
    Value(Value),
    Absent,
    Invalid,
}

fn field_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn index_path(parent: &str, idx: usize) -> String {
    format!("{}[{}]", parent, idx)
}

/// Short rendering of a value for violation messages.
pub(crate) fn describe_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) if s.chars().count() > 32 => {
            let head: String = s.chars().take(32).collect();
            format!("string \"{}...\"", head)
        }
        Value::String(s) => format!("string \"{}\"", s),
        Value::Array(items) => format!("array of {} items", items.len()),
        Value::Object(_) => "object".to_string(),
    }
}
