//! Typed accessors over a raw JSON record
//!
//! Every accessor either returns the normalized value or a `ValidationError`
//! naming the field (and element index for arrays).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;
use serde_json::{Map, Value};

use super::ValidationError;
use crate::models::StringEnum;

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid slug regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub struct RecordReader<'a> {
    entity: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> RecordReader<'a> {
    /// Records must be JSON objects; anything else fails on the pseudo-field `record`
    pub fn new(entity: &'static str, raw: &'a Value) -> Result<Self, ValidationError> {
        match raw {
            Value::Object(map) => Ok(Self { entity, map }),
            other => Err(ValidationError::new(
                entity,
                "record",
                format!("expected object, found {}", type_name(other)),
            )),
        }
    }

    pub fn error(&self, field: impl Into<String>, problem: impl Into<String>) -> ValidationError {
        ValidationError::new(self.entity, field, problem)
    }

    /// Present and not null
    fn present(&self, field: &str) -> Option<&'a Value> {
        self.map.get(field).filter(|v| !v.is_null())
    }

    // ------------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------------

    pub fn required_str(&self, field: &str) -> Result<String, ValidationError> {
        let value = self
            .present(field)
            .ok_or_else(|| self.error(field, "missing required field"))?;
        self.non_blank(field, value)
    }

    /// Absent, null and blank all read as `None`
    pub fn optional_str(&self, field: &str) -> Result<Option<String>, ValidationError> {
        match self.present(field) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(value) => self.non_blank(field, value).map(Some),
        }
    }

    pub fn slug(&self, field: &str) -> Result<String, ValidationError> {
        let slug = self.required_str(field)?;
        if !SLUG_RE.is_match(&slug) {
            return Err(self.error(field, format!("'{}' is not a lowercase kebab-case slug", slug)));
        }
        Ok(slug)
    }

    pub fn email(&self, field: &str) -> Result<String, ValidationError> {
        let email = self.required_str(field)?;
        self.check_email(field, email)
    }

    pub fn optional_email(&self, field: &str) -> Result<Option<String>, ValidationError> {
        self.optional_str(field)?
            .map(|email| self.check_email(field, email))
            .transpose()
    }

    fn check_email(&self, field: &str, email: String) -> Result<String, ValidationError> {
        if EMAIL_RE.is_match(&email) {
            Ok(email)
        } else {
            Err(self.error(field, format!("'{}' is not a valid email address", email)))
        }
    }

    /// Required string whose trimmed length (in characters) lies in `min..=max`
    pub fn bounded_str(&self, field: &str, min: usize, max: usize) -> Result<String, ValidationError> {
        let text = self.required_str(field)?;
        let len = text.trim().chars().count();
        if len < min {
            return Err(self.error(field, format!("must be at least {} characters", min)));
        }
        if len > max {
            return Err(self.error(field, format!("must be at most {} characters", max)));
        }
        Ok(text)
    }

    fn non_blank(&self, field: &str, value: &Value) -> Result<String, ValidationError> {
        match value {
            Value::String(s) if s.trim().is_empty() => Err(self.error(field, "must not be blank")),
            // returned verbatim, surrounding whitespace included
            Value::String(s) => Ok(s.clone()),
            other => Err(self.error(field, format!("expected string, found {}", type_name(other)))),
        }
    }

    // ------------------------------------------------------------------------
    // String lists
    // ------------------------------------------------------------------------

    pub fn string_list(&self, field: &str) -> Result<Vec<String>, ValidationError> {
        let value = self
            .present(field)
            .ok_or_else(|| self.error(field, "missing required field"))?;
        self.list_items(field, value)
    }

    /// Absent or null reads as an empty list
    pub fn optional_string_list(&self, field: &str) -> Result<Vec<String>, ValidationError> {
        match self.present(field) {
            None => Ok(Vec::new()),
            Some(value) => self.list_items(field, value),
        }
    }

    /// Required list with set semantics: duplicates dropped, first occurrence wins
    pub fn tag_set(&self, field: &str) -> Result<Vec<String>, ValidationError> {
        let items = self.string_list(field)?;
        let mut seen = FxHashSet::default();
        Ok(items.into_iter().filter(|t| seen.insert(t.clone())).collect())
    }

    fn list_items(&self, field: &str, value: &Value) -> Result<Vec<String>, ValidationError> {
        let items = value.as_array().ok_or_else(|| {
            self.error(field, format!("expected array of strings, found {}", type_name(value)))
        })?;

        items
            .iter()
            .enumerate()
            .map(|(i, item)| self.non_blank(&format!("{}[{}]", field, i), item))
            .collect()
    }

    // ------------------------------------------------------------------------
    // Enums, dates, numbers
    // ------------------------------------------------------------------------

    pub fn choice<E: StringEnum>(&self, field: &str) -> Result<E, ValidationError> {
        let text = self.required_str(field)?;
        self.parse_choice(field, &text)
    }

    pub fn optional_choice<E: StringEnum>(&self, field: &str, default: E) -> Result<E, ValidationError> {
        match self.optional_str(field)? {
            None => Ok(default),
            Some(text) => self.parse_choice(field, &text),
        }
    }

    fn parse_choice<E: StringEnum>(&self, field: &str, text: &str) -> Result<E, ValidationError> {
        E::parse(text).ok_or_else(|| {
            self.error(field, format!("'{}' is not one of: {}", text, E::expected()))
        })
    }

    pub fn date(&self, field: &str) -> Result<NaiveDate, ValidationError> {
        let text = self.required_str(field)?;
        self.parse_date(field, &text)
    }

    pub fn optional_date(&self, field: &str) -> Result<Option<NaiveDate>, ValidationError> {
        self.optional_str(field)?
            .map(|text| self.parse_date(field, &text))
            .transpose()
    }

    fn parse_date(&self, field: &str, text: &str) -> Result<NaiveDate, ValidationError> {
        NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map_err(|_| self.error(field, format!("'{}' is not a YYYY-MM-DD date", text)))
    }

    pub fn optional_non_negative(&self, field: &str) -> Result<Option<f64>, ValidationError> {
        match self.present(field) {
            None => Ok(None),
            Some(value) => match value.as_f64() {
                Some(n) if n >= 0.0 => Ok(Some(n)),
                Some(_) => Err(self.error(field, "must not be negative")),
                None => Err(self.error(field, format!("expected number, found {}", type_name(value)))),
            },
        }
    }

    pub fn optional_count(&self, field: &str) -> Result<Option<u32>, ValidationError> {
        match self.present(field) {
            None => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| self.error(field, "expected non-negative integer")),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
