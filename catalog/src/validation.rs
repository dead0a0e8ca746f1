//! Field-level request validation.
//!
//! Request payloads are deserialized leniently, one raw JSON value per field, and
//! then checked by a [`Validator`]. Failures accumulate per field into
//! [`ValidationErrors`] rather than stopping at the first problem, so clients can
//! highlight every invalid input at once.
//!
//! Input normalization mirrors a typical HTML form submission: strings are
//! trimmed, and an empty string counts as `null`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Per-field validation messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Messages recorded for a field, if any
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A payload field after normalization
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Field not sent at all
    Absent,
    /// Field sent as `null` or as a blank string
    Null,
    Value(Value),
}

impl Input {
    /// Normalize a raw field as produced by `serde_with::rust::double_option`
    pub fn from_raw(raw: Option<Option<Value>>) -> Self {
        match raw {
            None => Input::Absent,
            Some(None) | Some(Some(Value::Null)) => Input::Null,
            Some(Some(Value::String(s))) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Input::Null
                } else {
                    Input::Value(Value::String(trimmed.to_string()))
                }
            }
            Some(Some(value)) => Input::Value(value),
        }
    }
}

/// Whether a field must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The field must be sent and non-null
    Required,
    /// The field is validated only when sent
    Sometimes,
}

/// Accumulates field errors while converting raw inputs into typed values
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a single field.
    ///
    /// Returns `None` when the field is absent or invalid, `Some(None)` for an accepted `null`
    /// (only when `nullable`), and `Some(Some(value))` for a valid value.
    pub fn field<T>(
        &mut self,
        field: &str,
        input: Input,
        presence: Presence,
        nullable: bool,
        parse: impl FnOnce(&str, &Value) -> Result<T, String>,
    ) -> Option<Option<T>> {
        match input {
            Input::Absent => {
                if presence == Presence::Required {
                    self.errors.add(field, format!("The {field} field is required."));
                }
                None
            }
            Input::Null if nullable => Some(None),
            Input::Null => {
                match presence {
                    Presence::Required => self.errors.add(field, format!("The {field} field is required.")),
                    Presence::Sometimes => self.errors.add(field, format!("The {field} field must not be empty.")),
                }
                None
            }
            Input::Value(value) => match parse(field, &value) {
                Ok(parsed) => Some(Some(parsed)),
                Err(message) => {
                    self.errors.add(field, message);
                    None
                }
            },
        }
    }

    /// Finish validation, yielding the output only when every field passed
    pub fn finish<T>(self, output: Option<T>) -> Result<T, ValidationErrors> {
        match output {
            Some(value) if self.errors.is_empty() => Ok(value),
            _ => Err(self.errors),
        }
    }
}

/// A string of at most `max_chars` characters
pub fn string(max_chars: Option<usize>) -> impl FnOnce(&str, &Value) -> Result<String, String> {
    move |field, value| {
        let Value::String(s) = value else {
            return Err(format!("The {field} field must be a string."));
        };
        if let Some(max) = max_chars
            && s.chars().count() > max
        {
            return Err(format!("The {field} field must not be greater than {max} characters."));
        }
        Ok(s.clone())
    }
}

/// A number (JSON number or numeric string) in `0..=max`, rounded to `scale` decimal places
pub fn non_negative_decimal(max: Decimal, scale: u32) -> impl FnOnce(&str, &Value) -> Result<Decimal, String> {
    move |field, value| {
        let not_a_number = || format!("The {field} field must be a number.");
        let text = match value {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => return Err(not_a_number()),
        };
        let parsed = Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|_| not_a_number())?;

        if parsed.is_sign_negative() && !parsed.is_zero() {
            return Err(format!("The {field} field must be at least 0."));
        }
        let rounded = parsed.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
        if rounded > max {
            return Err(format!("The {field} field must not be greater than {max}."));
        }
        Ok(rounded)
    }
}

/// An integer (JSON integer or integer string) in `0..=i32::MAX`
pub fn non_negative_i32() -> impl FnOnce(&str, &Value) -> Result<i32, String> {
    move |field, value| {
        let not_an_integer = || format!("The {field} field must be an integer.");
        let parsed: i64 = match value {
            Value::Number(n) => match (n.as_i64(), n.as_u64()) {
                (Some(i), _) => i,
                (None, Some(_)) => i64::MAX,
                (None, None) => return Err(not_an_integer()),
            },
            Value::String(s) => s.parse::<i64>().map_err(|_| not_an_integer())?,
            _ => return Err(not_an_integer()),
        };

        if parsed < 0 {
            return Err(format!("The {field} field must be at least 0."));
        }
        i32::try_from(parsed).map_err(|_| format!("The {field} field must not be greater than {}.", i32::MAX))
    }
}
