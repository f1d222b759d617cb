use serde_json::Value;

use super::{RecordReader, ValidationError};
use crate::models::{
    ApplicationInfo, ApplicationStatus, ContactFormData, FacultyMember, InquiryType, NewsArticle,
    Program, ProgramFormat, ProjectStatus, ResearchProject,
};

const MESSAGE_MIN_CHARS: usize = 10;
const MESSAGE_MAX_CHARS: usize = 5000;

pub fn validate_faculty(raw: &Value) -> Result<FacultyMember, ValidationError> {
    let r = RecordReader::new("FacultyMember", raw)?;
    Ok(FacultyMember {
        id: r.required_str("id")?,
        name: r.required_str("name")?,
        title: r.required_str("title")?,
        bio: r.required_str("bio")?,
        research_interests: r.string_list("researchInterests")?,
        department: r.optional_str("department")?,
        email: r.optional_email("email")?,
        image_url: r.optional_str("imageUrl")?,
        education: r.optional_string_list("education")?,
        publications: r.optional_string_list("publications")?,
    })
}

pub fn validate_research(raw: &Value) -> Result<ResearchProject, ValidationError> {
    let r = RecordReader::new("ResearchProject", raw)?;
    Ok(ResearchProject {
        id: r.required_str("id")?,
        title: r.required_str("title")?,
        description: r.required_str("description")?,
        tags: r.tag_set("tags")?,
        status: r.optional_choice("status", ProjectStatus::Active)?,
        lead_faculty_id: r.optional_str("leadFacultyId")?,
        start_date: r.optional_date("startDate")?,
        funding_source: r.optional_str("fundingSource")?,
        team: r.optional_string_list("team")?,
    })
}

pub fn validate_program(raw: &Value) -> Result<Program, ValidationError> {
    let r = RecordReader::new("Program", raw)?;
    Ok(Program {
        id: r.required_str("id")?,
        name: r.required_str("name")?,
        description: r.required_str("description")?,
        degree_type: r.choice("degreeType")?,
        duration: r.required_str("duration")?,
        format: r.optional_choice("format", ProgramFormat::InPerson)?,
        curriculum: r.optional_string_list("curriculum")?,
        outcomes: r.optional_string_list("outcomes")?,
        credits: r.optional_count("credits")?,
    })
}

pub fn validate_application(raw: &Value) -> Result<ApplicationInfo, ValidationError> {
    let r = RecordReader::new("ApplicationInfo", raw)?;
    Ok(ApplicationInfo {
        program_id: r.required_str("programId")?,
        term: r.required_str("term")?,
        deadline: r.date("deadline")?,
        requirements: r.string_list("requirements")?,
        status: r.optional_choice("status", ApplicationStatus::Open)?,
        application_url: r.optional_str("applicationUrl")?,
        fee: r.optional_non_negative("fee")?,
    })
}

pub fn validate_news(raw: &Value) -> Result<NewsArticle, ValidationError> {
    let r = RecordReader::new("NewsArticle", raw)?;
    Ok(NewsArticle {
        id: r.required_str("id")?,
        slug: r.slug("slug")?,
        title: r.required_str("title")?,
        summary: r.required_str("summary")?,
        content: r.required_str("content")?,
        author: r.required_str("author")?,
        published_at: r.date("publishedAt")?,
        tags: r.tag_set("tags")?,
        category: r.optional_str("category")?,
        image_url: r.optional_str("imageUrl")?,
    })
}

pub fn validate_contact_form(raw: &Value) -> Result<ContactFormData, ValidationError> {
    let r = RecordReader::new("ContactFormData", raw)?;
    Ok(ContactFormData {
        name: r.required_str("name")?,
        email: r.email("email")?,
        message: r.bounded_str("message", MESSAGE_MIN_CHARS, MESSAGE_MAX_CHARS)?,
        subject: r.optional_str("subject")?,
        organization: r.optional_str("organization")?,
        inquiry_type: r.optional_choice("inquiryType", InquiryType::General)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DegreeType;
    use serde_json::json;

    fn faculty_json() -> Value {
        json!({
            "id": "jchen",
            "name": "Dr. Julia Chen",
            "title": "Associate Professor",
            "bio": "Works on clinical decision support.",
            "researchInterests": ["Clinical NLP", "Decision support"],
            "email": "jchen@med.example.edu",
            "hobbies": ["sailing"]
        })
    }

    #[test]
    fn faculty_valid_record_ignores_unknown_fields() {
        let member = validate_faculty(&faculty_json()).unwrap();
        assert_eq!(member.id, "jchen");
        assert_eq!(member.research_interests, vec!["Clinical NLP", "Decision support"]);
        assert!(member.education.is_empty());
        assert_eq!(member.department, None);
    }

    #[test]
    fn faculty_reports_first_offending_field() {
        let mut raw = faculty_json();
        raw["name"] = json!(42);
        raw["bio"] = Value::Null;
        let err = validate_faculty(&raw).unwrap_err();
        assert_eq!(err.entity, "FacultyMember");
        assert_eq!(err.field, "name");
    }

    #[test]
    fn faculty_rejects_bad_optional_email() {
        let mut raw = faculty_json();
        raw["email"] = json!("not-an-email");
        assert_eq!(validate_faculty(&raw).unwrap_err().field, "email");
    }

    #[test]
    fn research_defaults_and_normalizes() {
        let raw = json!({
            "id": "sepsis-early-warning",
            "title": "Sepsis early warning",
            "description": "Predicting sepsis onset from vitals.",
            "tags": ["icu", "prediction", "icu"],
            "startDate": "2024-09-01"
        });
        let project = validate_research(&raw).unwrap();
        assert_eq!(project.status, ProjectStatus::Active);
        assert_eq!(project.tags, vec!["icu", "prediction"]);
        assert!(project.start_date.is_some());
    }

    #[test]
    fn program_requires_known_degree_type() {
        let raw = json!({
            "id": "ms-clinical-ai",
            "name": "MS in Clinical AI",
            "description": "Two-year program.",
            "degreeType": "Masters",
            "duration": "2 years",
            "format": "Hybrid",
            "credits": 36
        });
        let program = validate_program(&raw).unwrap();
        assert_eq!(program.degree_type, DegreeType::Masters);
        assert_eq!(program.format, ProgramFormat::Hybrid);

        let mut missing = raw.clone();
        missing.as_object_mut().unwrap().remove("degreeType");
        let err = validate_program(&missing).unwrap_err();
        assert_eq!(err.field, "degreeType");
        assert_eq!(err.problem, "missing required field");
    }

    #[test]
    fn application_needs_valid_deadline() {
        let raw = json!({
            "programId": "ms-clinical-ai",
            "term": "Fall 2027",
            "deadline": "January 15",
            "requirements": ["Transcript"]
        });
        assert_eq!(validate_application(&raw).unwrap_err().field, "deadline");
    }

    #[test]
    fn news_slug_must_be_kebab_case() {
        let raw = json!({
            "id": "n1",
            "slug": "Big News!",
            "title": "Big news",
            "summary": "s",
            "content": "c",
            "author": "a",
            "publishedAt": "2026-01-01",
            "tags": []
        });
        assert_eq!(validate_news(&raw).unwrap_err().field, "slug");
    }

    #[test]
    fn news_content_keeps_surrounding_whitespace() {
        let raw = json!({
            "id": "n2",
            "slug": "code-sample",
            "title": "Code sample",
            "summary": "s",
            "content": "    let x = 1;\n",
            "author": "a",
            "publishedAt": "2026-01-01",
            "tags": ["rust"]
        });
        let article = validate_news(&raw).unwrap();
        assert_eq!(article.content, "    let x = 1;\n");
        assert!(crate::markdown::render_markdown(&article.content).contains("<pre><code>let x = 1;"));
    }

    #[test]
    fn contact_form_rules() {
        let ok = json!({
            "name": "Pat Doe",
            "email": "pat@example.org",
            "message": "I would like to learn more about the fellowship.",
            "inquiryType": "admissions"
        });
        let form = validate_contact_form(&ok).unwrap();
        assert_eq!(form.inquiry_type, InquiryType::Admissions);

        let mut short = ok.clone();
        short["message"] = json!("hi");
        assert_eq!(validate_contact_form(&short).unwrap_err().field, "message");

        let mut bad_type = ok.clone();
        bad_type["inquiryType"] = json!("sales");
        assert_eq!(validate_contact_form(&bad_type).unwrap_err().field, "inquiryType");
    }
}
