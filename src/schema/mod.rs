//! Schema validators
//!
//! One explicit validation function per entity. Each takes a raw JSON record
//! and either returns the typed entity or the first offending field. Fields
//! are checked in declaration order, so the reported field is deterministic.
//! Unknown extra fields are ignored so content authors can add keys ahead of
//! code changes.
//!
//! Normalization is limited to: trimming strings, string -> enum
//! (case-insensitive), string -> calendar date, and collapsing duplicate tags.

mod entities;
mod fields;

use thiserror::Error;

pub use entities::{
    validate_application, validate_contact_form, validate_faculty, validate_news,
    validate_program, validate_research,
};
pub use fields::RecordReader;

/// First field of a record that failed its schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity}.{field}: {problem}")]
pub struct ValidationError {
    pub entity: &'static str,
    pub field: String,
    pub problem: String,
}

impl ValidationError {
    pub fn new(entity: &'static str, field: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            entity,
            field: field.into(),
            problem: problem.into(),
        }
    }
}
