use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::{Collection, Entity, Fielded, Identified, StringEnum, Tagged};
use crate::schema::{self, ValidationError};

// ============================================================================
// Research
// ============================================================================

string_enum! {
    ProjectStatus {
        Active => "active",
        Completed => "completed",
        Planned => "planned",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchProject {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Set semantics: duplicates are collapsed at validation, first occurrence kept
    pub tags: Vec<String>,
    pub status: ProjectStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_faculty_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_source: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub team: Vec<String>,
}

impl Entity for ResearchProject {
    const COLLECTION: Collection = Collection::Research;
    const LABEL: &'static str = "Research project";

    fn validate(raw: &Value) -> Result<Self, ValidationError> {
        schema::validate_research(raw)
    }

    fn unique_keys(&self) -> Vec<(&'static str, &str)> {
        vec![("id", &self.id)]
    }
}

impl Identified for ResearchProject {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Tagged for ResearchProject {
    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Fielded for ResearchProject {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "title" => Some(&self.title),
            "status" => Some(self.status.as_str()),
            "leadFacultyId" => self.lead_faculty_id.as_deref(),
            "fundingSource" => self.funding_source.as_deref(),
            _ => None,
        }
    }
}

// ============================================================================
// Programs
// ============================================================================

string_enum! {
    DegreeType {
        Certificate => "certificate",
        Masters => "masters",
        Doctoral => "doctoral",
        Fellowship => "fellowship",
        Residency => "residency",
    }
}

string_enum! {
    ProgramFormat {
        InPerson => "in-person",
        Online => "online",
        Hybrid => "hybrid",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub id: String,
    pub name: String,
    pub description: String,
    pub degree_type: DegreeType,
    pub duration: String,
    pub format: ProgramFormat,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub curriculum: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outcomes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<u32>,
}

impl Entity for Program {
    const COLLECTION: Collection = Collection::Programs;
    const LABEL: &'static str = "Program";

    fn validate(raw: &Value) -> Result<Self, ValidationError> {
        schema::validate_program(raw)
    }

    fn unique_keys(&self) -> Vec<(&'static str, &str)> {
        vec![("id", &self.id)]
    }
}

impl Identified for Program {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Fielded for Program {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "id" => Some(&self.id),
            "name" => Some(&self.name),
            "degreeType" => Some(self.degree_type.as_str()),
            "format" => Some(self.format.as_str()),
            _ => None,
        }
    }
}

// ============================================================================
// Applications
// ============================================================================

string_enum! {
    ApplicationStatus {
        Open => "open",
        Closed => "closed",
        Upcoming => "upcoming",
    }
}

/// Application window for a program. `program_id` is a foreign key into
/// `Program::id` and is not unique: one program may list several terms.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInfo {
    pub program_id: String,
    pub term: String,
    pub deadline: NaiveDate,
    pub requirements: Vec<String>,
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<f64>,
}

impl Entity for ApplicationInfo {
    const COLLECTION: Collection = Collection::Applications;
    const LABEL: &'static str = "Application";

    fn validate(raw: &Value) -> Result<Self, ValidationError> {
        schema::validate_application(raw)
    }
}

impl Fielded for ApplicationInfo {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "programId" => Some(&self.program_id),
            "term" => Some(&self.term),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }
}
