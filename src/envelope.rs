//! Uniform success/failure wrapper returned by loaders, lookups and routes
//!
//! Wire shape is either `{"success": true, "data": ...}` or
//! `{"success": false, "error": "...", "data": null}`. The envelope wraps a
//! `Result`, so a successful envelope always carries data and a failed one
//! always carries an error.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{ContentError, ErrorKind};

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<T> {
    result: Result<T, ContentError>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self { result: Ok(data) }
    }

    pub fn fail(error: ContentError) -> Self {
        Self { result: Err(error) }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn data(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ContentError> {
        self.result.as_ref().err()
    }

    /// Error classification, used by the route adapters for status mapping
    pub fn kind(&self) -> Option<ErrorKind> {
        self.error().map(ContentError::kind)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            result: self.result.map(f),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> Result<U, ContentError>) -> Envelope<U> {
        Envelope {
            result: self.result.and_then(f),
        }
    }

    pub fn into_result(self) -> Result<T, ContentError> {
        self.result
    }
}

impl<T> From<Result<T, ContentError>> for Envelope<T> {
    fn from(result: Result<T, ContentError>) -> Self {
        Self { result }
    }
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.result {
            Ok(data) => {
                let mut s = serializer.serialize_struct("Envelope", 2)?;
                s.serialize_field("success", &true)?;
                s.serialize_field("data", data)?;
                s.end()
            }
            Err(error) => {
                let mut s = serializer.serialize_struct("Envelope", 3)?;
                s.serialize_field("success", &false)?;
                s.serialize_field("error", &error.to_string())?;
                s.serialize_field("data", &Option::<()>::None)?;
                s.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_serializes_with_data() {
        let env = Envelope::ok(vec![1, 2, 3]);
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({"success": true, "data": [1, 2, 3]})
        );
        assert!(env.error().is_none());
    }

    #[test]
    fn failure_serializes_with_null_data() {
        let env: Envelope<Vec<u8>> = Envelope::fail(ContentError::NotFound {
            entity: "Program",
            key: "x".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({"success": false, "error": "Program not found", "data": null})
        );
        assert_eq!(env.kind(), Some(ErrorKind::NotFound));
        assert!(env.data().is_none());
    }

    #[test]
    fn and_then_turns_success_into_failure() {
        let env = Envelope::ok(3).and_then(|n| {
            if n > 2 {
                Err(ContentError::InvalidInput("too big".to_string()))
            } else {
                Ok(n)
            }
        });
        assert!(!env.is_success());
        assert_eq!(env.kind(), Some(ErrorKind::InvalidInput));
    }
}
