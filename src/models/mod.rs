//! Content entities
//!
//! Every entity is built once by its validator and never mutated afterwards.
//! Lookups are written against the small traits below rather than concrete
//! types, so find-by-id, related items and field filters work for any
//! collection that carries the matching keys.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::schema::ValidationError;

/// Closed set of string values with case-insensitive parsing
pub trait StringEnum: Copy + Sized + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse(text: &str) -> Option<Self> {
        let wanted = text.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
    }

    /// Comma-separated list of accepted values, for error messages
    fn expected() -> String {
        Self::ALL
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $crate::models::StringEnum for $name {
            const ALL: &'static [Self] = &[$($name::$variant),+];

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::models::StringEnum::as_str(self))
            }
        }
    };
}

mod academics;
mod news;
mod people;

pub use academics::{ApplicationInfo, ApplicationStatus, DegreeType, Program, ProgramFormat, ProjectStatus, ResearchProject};
pub use news::NewsArticle;
pub use people::{ContactFormData, FacultyMember, InquiryType};

// ============================================================================
// Collections
// ============================================================================

/// Named collections in the content directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Faculty,
    Research,
    Programs,
    News,
    Applications,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Faculty,
        Collection::Research,
        Collection::Programs,
        Collection::News,
        Collection::Applications,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Faculty => "faculty",
            Collection::Research => "research",
            Collection::Programs => "programs",
            Collection::News => "news",
            Collection::Applications => "applications",
        }
    }

    /// File backing this collection inside the content directory
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Entity traits
// ============================================================================

/// A record type stored in one collection
pub trait Entity: Clone + Serialize + Send + Sync + 'static {
    const COLLECTION: Collection;

    /// Human-readable name used in "not found" messages
    const LABEL: &'static str;

    fn validate(raw: &Value) -> Result<Self, ValidationError>;

    /// (field, value) pairs that must be unique across the collection
    fn unique_keys(&self) -> Vec<(&'static str, &str)> {
        Vec::new()
    }
}

pub trait Identified {
    fn id(&self) -> &str;
}

pub trait Slugged {
    fn slug(&self) -> &str;
}

pub trait Tagged {
    fn tags(&self) -> &[String];
}

/// String-valued fields addressable by their wire name, for query filters
pub trait Fielded {
    fn field(&self, name: &str) -> Option<&str>;
}
