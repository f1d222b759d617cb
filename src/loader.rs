//! Data Loading
//!
//! Reads one named collection from the content directory, parses it and runs
//! every record through its validator. Loads are fail-fast: the first invalid
//! record fails the whole collection, so callers never see a partial list.
//!
//! Expected directory structure under the content root:
//!   - faculty.json
//!   - research.json
//!   - programs.json
//!   - applications.json
//!   - news.json
//!
//! Each file is either a top-level array of records or an object with one
//! key named after the collection that holds the array.

use rustc_hash::FxHashMap;
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::envelope::Envelope;
use crate::error::ContentError;
use crate::models::{Collection, Entity};
use crate::schema::ValidationError;

/// Read-only handle on the content directory
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

impl ContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn collection_path(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.file_name())
    }

    /// Load and validate a collection. Always resolves to an envelope.
    pub async fn load<T: Entity>(&self) -> Envelope<Vec<T>> {
        Envelope::from(self.try_load::<T>().await)
    }

    pub async fn try_load<T: Entity>(&self) -> Result<Vec<T>, ContentError> {
        let collection = T::COLLECTION;
        let records = self.read_records(collection).await?;
        let items = validate_records::<T>(&records)?;
        tracing::debug!("Loaded {} {} records", items.len(), collection);
        Ok(items)
    }

    /// Raw records of a collection, before validation
    pub async fn read_records(&self, collection: Collection) -> Result<Vec<Value>, ContentError> {
        let path = self.collection_path(collection);
        tracing::debug!("Reading {} from {}", collection, path.display());

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ContentError::from_io(collection, &path, e))?;

        parse_records(collection, &contents)
    }
}

/// Parse file contents into the record array
pub fn parse_records(collection: Collection, contents: &str) -> Result<Vec<Value>, ContentError> {
    let value: Value = serde_json::from_str(contents).map_err(|e| ContentError::Parse {
        collection,
        message: e.to_string(),
    })?;

    match value {
        Value::Array(records) => Ok(records),
        Value::Object(mut map) => match map.remove(collection.name()) {
            Some(Value::Array(records)) => Ok(records),
            _ => Err(ContentError::Parse {
                collection,
                message: format!("expected an array or an object with a '{}' array", collection.name()),
            }),
        },
        _ => Err(ContentError::Parse {
            collection,
            message: "expected an array of records".to_string(),
        }),
    }
}

/// Validate every record, stopping at the first failure. Also rejects
/// duplicate values for the entity's unique keys.
pub fn validate_records<T: Entity>(records: &[Value]) -> Result<Vec<T>, ContentError> {
    let collection = T::COLLECTION;
    let mut items = Vec::with_capacity(records.len());
    let mut seen: FxHashMap<(&'static str, String), usize> = FxHashMap::default();

    for (index, raw) in records.iter().enumerate() {
        let item = T::validate(raw).map_err(|source| ContentError::Validation {
            collection,
            index,
            source,
        })?;

        for (field, value) in item.unique_keys() {
            if let Some(first) = seen.insert((field, value.to_string()), index) {
                return Err(ContentError::Validation {
                    collection,
                    index,
                    source: ValidationError::new(
                        T::LABEL,
                        field,
                        format!("duplicate value '{}' (first used at index {})", value, first),
                    ),
                });
            }
        }

        items.push(item);
    }

    Ok(items)
}
