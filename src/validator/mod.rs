//! Request payload validation.
//!
//! Payloads arrive as raw JSON so that a failure can be reported per field and
//! localized, instead of being rejected by the body extractor. Reading a
//! payload happens in two steps: `Fields` coerces the raw JSON into an
//! `Option` per field, then the rules declared with `#[derive(Validate)]` on
//! the request struct run over the coerced values.

use std::fmt;

use ::validator::Validate;
use serde_json::{Map, Value};

pub mod role;
pub mod user;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    Required,
    String,
    Boolean,
    Number,
    Email,
    MinLength(usize),
    MaxLength(usize),
}

impl Rule {
    /// Rule name, also the suffix of its `validation.*` message key.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Required => "required",
            Rule::String => "string",
            Rule::Boolean => "boolean",
            Rule::Number => "number",
            Rule::Email => "email",
            Rule::MinLength(_) => "minLength",
            Rule::MaxLength(_) => "maxLength",
        }
    }

    /// Rule behind a failure reported by a `Validate` derive.
    /// Only the rules used by the request structs are known.
    pub fn from_error(err: &::validator::ValidationError) -> Option<Self> {
        let param = |key: &str| {
            err.params
                .get(key)
                .and_then(|x| x.as_u64())
                .map(|x| x as usize)
        };
        match err.code.as_ref() {
            "required" => Some(Rule::Required),
            "email" => Some(Rule::Email),
            "length" => param("min")
                .map(Rule::MinLength)
                .or_else(|| param("max").map(Rule::MaxLength)),
            _ => None,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldFailure {
    pub field: &'static str,
    pub rule: Rule,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", describe(.failures))]
pub struct ValidationError {
    pub failures: Vec<FieldFailure>,
}

fn describe(failures: &[FieldFailure]) -> String {
    failures
        .iter()
        .map(|x| format!("{}.{}", x.field, x.rule))
        .collect::<Vec<String>>()
        .join(", ")
}

/// A named schema for one endpoint payload.
pub trait Validator {
    type Output;

    fn validate(payload: &Value) -> Result<Self::Output, ValidationError>;
}

/// Coerces fields out of a JSON object, recording a failure for every value
/// of the wrong type. Absent, null and blank values read as `None`.
pub(crate) struct Fields<'a> {
    payload: Option<&'a Map<String, Value>>,
    failures: Vec<FieldFailure>,
}

impl<'a> Fields<'a> {
    pub fn new(payload: &'a Value) -> Self {
        Self {
            payload: payload.as_object(),
            failures: vec![],
        }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.payload
            .and_then(|x| x.get(field))
            .filter(|x| !x.is_null())
    }

    fn fail(&mut self, field: &'static str, rule: Rule) {
        self.failures.push(FieldFailure { field, rule });
    }

    pub fn string(&mut self, field: &'static str) -> Option<String> {
        match self.get(field) {
            Some(Value::String(val)) => Some(val.trim().to_string()).filter(|x| !x.is_empty()),
            Some(_) => {
                self.fail(field, Rule::String);
                None
            }
            None => None,
        }
    }

    pub fn boolean(&mut self, field: &'static str) -> Option<bool> {
        let value = self.get(field)?;
        let coerced = coerce_boolean(value);
        if coerced.is_none() {
            self.fail(field, Rule::Boolean);
        }
        coerced
    }

    pub fn number(&mut self, field: &'static str) -> Option<i32> {
        let value = self.get(field)?;
        let coerced = coerce_number(value);
        if coerced.is_none() {
            self.fail(field, Rule::Number);
        }
        coerced
    }

    /// Run the derived rules of `input` and report every failure in `order`.
    /// A field that already failed coercion keeps only that failure.
    pub fn finish<T: Validate>(
        self,
        input: &T,
        order: &[&'static str],
    ) -> Result<(), ValidationError> {
        let mut failures = self.failures;
        if let Err(errors) = input.validate() {
            let field_errors = errors.field_errors();
            for field in order {
                if failures.iter().any(|x| x.field == *field) {
                    continue;
                }
                if let Some(errs) = field_errors.get(*field) {
                    failures.extend(errs.iter().filter_map(Rule::from_error).map(|rule| {
                        FieldFailure {
                            field: *field,
                            rule,
                        }
                    }));
                }
            }
        }
        if failures.is_empty() {
            return Ok(());
        }
        failures.sort_by_key(|x| {
            order
                .iter()
                .position(|field| *field == x.field)
                .unwrap_or(order.len())
        });
        Err(ValidationError { failures })
    }
}

fn coerce_boolean(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(val) => Some(*val),
        Value::Number(val) => match val.as_i64() {
            Some(1) => Some(true),
            Some(0) => Some(false),
            _ => None,
        },
        Value::String(val) => match val.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "on" => Some(true),
            "false" | "0" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn coerce_number(value: &Value) -> Option<i32> {
    match value {
        Value::Number(val) => val.as_i64().and_then(|x| i32::try_from(x).ok()),
        Value::String(val) => val.trim().parse::<i32>().ok(),
        _ => None,
    }
}
