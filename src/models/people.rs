use serde::Serialize;
use serde_json::Value;

use super::{Collection, Entity, Fielded, Identified};
use crate::schema::{self, ValidationError};

/// Faculty profile shown on the people pages
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyMember {
    pub id: String,
    pub name: String,
    pub title: String,
    pub bio: String,
    /// Display order matters, so this stays a sequence
    pub research_interests: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub education: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub publications: Vec<String>,
}

impl Entity for FacultyMember {
    const COLLECTION: Collection = Collection::Faculty;
    const LABEL: &'static str = "Faculty member";

    fn validate(raw: &Value) -> Result<Self, ValidationError> {
        schema::validate_faculty(raw)
    }

    fn unique_keys(&self) -> Vec<(&'static str, &str)> {
        vec![("id", &self.id)]
    }
}

impl Identified for FacultyMember {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Fielded for FacultyMember {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            "title" => Some(&self.title),
            "department" => self.department.as_deref(),
            _ => None,
        }
    }
}

string_enum! {
    /// Routing hint for contact submissions
    InquiryType {
        General => "general",
        Admissions => "admissions",
        Research => "research",
        Partnership => "partnership",
        Media => "media",
    }
}

/// Contact form submission. Lives for one request and is never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    pub inquiry_type: InquiryType,
}
