//! Error taxonomy for the content layer
//!
//! Loaders and lookups never let these escape as panics or early returns past
//! their boundary; they travel inside an [`crate::Envelope`] and the route
//! adapters map [`ErrorKind`] to a status code.

use serde::Serialize;
use thiserror::Error;

use crate::models::Collection;
use crate::schema::ValidationError;

/// Coarse classification used for status mapping and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Collection loaded fine but the requested entity is absent
    NotFound,
    /// The caller's input was unusable (blank id, bad contact form)
    InvalidInput,
    /// Backing file for a collection does not exist
    MissingCollection,
    /// Backing content is not valid JSON or has the wrong top-level shape
    Parse,
    /// A stored record violates its schema
    Validation,
    /// Any other read failure
    Io,
    /// A dependent stage failed (index rebuild, cache)
    Upstream,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContentError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, key: String },

    #[error("{0}")]
    InvalidInput(String),

    #[error("{collection} collection not found at {path}")]
    MissingCollection { collection: Collection, path: String },

    #[error("failed to parse {collection} collection: {message}")]
    Parse { collection: Collection, message: String },

    #[error("invalid {collection} record at index {index}: {source}")]
    Validation {
        collection: Collection,
        index: usize,
        #[source]
        source: ValidationError,
    },

    #[error("failed to read {collection} collection: {message}")]
    Io { collection: Collection, message: String },

    #[error("{stage} failed: {message}")]
    Upstream { stage: &'static str, message: String },
}

impl ContentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContentError::NotFound { .. } => ErrorKind::NotFound,
            ContentError::InvalidInput(_) => ErrorKind::InvalidInput,
            ContentError::MissingCollection { .. } => ErrorKind::MissingCollection,
            ContentError::Parse { .. } => ErrorKind::Parse,
            ContentError::Validation { .. } => ErrorKind::Validation,
            ContentError::Io { .. } => ErrorKind::Io,
            ContentError::Upstream { .. } => ErrorKind::Upstream,
        }
    }

    /// Wrap a failure from an earlier stage so the caller sees which stage broke
    pub fn upstream(stage: &'static str, cause: &ContentError) -> Self {
        ContentError::Upstream {
            stage,
            message: cause.to_string(),
        }
    }

    /// Map an I/O failure while reading a collection file
    pub(crate) fn from_io(collection: Collection, path: &std::path::Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            ContentError::MissingCollection {
                collection,
                path: path.display().to_string(),
            }
        } else {
            ContentError::Io {
                collection,
                message: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn not_found_message_names_entity() {
        let err = ContentError::NotFound {
            entity: "Faculty member",
            key: "dr-who".to_string(),
        };
        assert_eq!(err.to_string(), "Faculty member not found");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn missing_file_maps_to_missing_collection() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ContentError::from_io(Collection::Programs, Path::new("/tmp/programs.json"), io);
        assert_eq!(err.kind(), ErrorKind::MissingCollection);
        assert!(err.to_string().contains("/tmp/programs.json"));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = ContentError::from_io(Collection::Programs, Path::new("/tmp/programs.json"), io);
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn validation_message_carries_field() {
        let err = ContentError::Validation {
            collection: Collection::News,
            index: 2,
            source: ValidationError::new("NewsArticle", "slug", "missing required field"),
        };
        let text = err.to_string();
        assert!(text.contains("news"));
        assert!(text.contains("index 2"));
        assert!(text.contains("slug"));
    }
}
