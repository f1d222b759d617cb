//! Route adapters
//!
//! Plain functions from request values to an [`ApiResponse`]. They hold no
//! transport types beyond the status code, so they are tested directly;
//! `api_server` only extracts parameters and calls them.
//!
//! Status mapping:
//! - success -> 200 `{success: true, data}`
//! - entity absent -> 404 `{success: false, error: "<Entity> not found", data: null}`
//! - unusable input -> 400 `{success: false, error, data: null}`
//! - any other failure -> 500 `{success: false, error: <generic>, details, data: null}`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::envelope::Envelope;
use crate::error::{ContentError, ErrorKind};
use crate::lookup;
use crate::models::{
    DegreeType, FacultyMember, Program, ProgramFormat, ProjectStatus, ResearchProject, StringEnum,
};
use crate::schema::validate_contact_form;
use crate::service::ContentService;

const DEFAULT_SEARCH_LIMIT: usize = 10;
const MAX_SEARCH_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    /// 200 with `{success: true, data}`
    pub fn success<T: Serialize>(data: T) -> Self {
        Self::serialized(StatusCode::OK, &Envelope::ok(data))
    }

    /// Status chosen from the error kind; `generic` replaces the message on 500s
    pub fn failure(error: &ContentError, generic: &str) -> Self {
        let status = status_for(error.kind());
        if status.is_server_error() {
            tracing::error!("{}: {}", generic, error);
            Self::new(
                status,
                json!({
                    "success": false,
                    "error": generic,
                    "details": error.to_string(),
                    "data": null,
                }),
            )
        } else {
            Self::new(
                status,
                json!({
                    "success": false,
                    "error": error.to_string(),
                    "data": null,
                }),
            )
        }
    }

    fn serialized<T: Serialize>(status: StatusCode, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => Self::new(status, value),
            Err(e) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "success": false,
                    "error": "Failed to serialize response",
                    "details": e.to_string(),
                    "data": null,
                }),
            ),
        }
    }

    fn from_envelope<T: Serialize>(envelope: Envelope<T>, generic: &str) -> Self {
        match envelope.into_result() {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(&e, generic),
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::MissingCollection
        | ErrorKind::Parse
        | ErrorKind::Validation
        | ErrorKind::Io
        | ErrorKind::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ============================================================================
// Faculty
// ============================================================================

pub async fn faculty_list(service: &ContentService, department: Option<&str>) -> ApiResponse {
    let envelope = service
        .load_faculty()
        .await
        .map(|items| lookup::filter_by_field(&items, "department", department));
    ApiResponse::from_envelope(envelope, "Failed to fetch faculty")
}

pub async fn faculty_detail(service: &ContentService, id: &str) -> ApiResponse {
    let envelope = service.find_by_id::<FacultyMember>(id).await;
    ApiResponse::from_envelope(envelope, "Failed to fetch faculty member")
}

// ============================================================================
// Research
// ============================================================================

pub async fn research_list(service: &ContentService, status: Option<&str>, tag: Option<&str>) -> ApiResponse {
    let status = enum_filter::<ProjectStatus>(status);
    let envelope = service.load_research().await.map(|items| {
        let by_status = lookup::filter_by_field(&items, "status", status);
        lookup::filter_by_tag(&by_status, tag)
    });
    ApiResponse::from_envelope(envelope, "Failed to fetch research projects")
}

pub async fn research_detail(service: &ContentService, id: &str) -> ApiResponse {
    if id.trim().is_empty() {
        let err = ContentError::InvalidInput("Research project ID is required".to_string());
        return ApiResponse::failure(&err, "Failed to fetch research project");
    }
    let envelope = service.find_by_id::<ResearchProject>(id).await;
    ApiResponse::from_envelope(envelope, "Failed to fetch research project")
}

// ============================================================================
// Programs
// ============================================================================

pub async fn program_list(
    service: &ContentService,
    degree_type: Option<&str>,
    format: Option<&str>,
) -> ApiResponse {
    let degree_type = enum_filter::<DegreeType>(degree_type);
    let format = enum_filter::<ProgramFormat>(format);
    let envelope = service.load_programs().await.map(|items| {
        let by_degree = lookup::filter_by_field(&items, "degreeType", degree_type);
        lookup::filter_by_field(&by_degree, "format", format)
    });
    ApiResponse::from_envelope(envelope, "Failed to fetch programs")
}

pub async fn program_detail(service: &ContentService, id: &str) -> ApiResponse {
    let envelope = service.find_by_id::<Program>(id).await;
    ApiResponse::from_envelope(envelope, "Failed to fetch program")
}

pub async fn applications(service: &ContentService, program_id: Option<&str>) -> ApiResponse {
    let envelope = service.applications(program_id).await;
    ApiResponse::from_envelope(envelope, "Failed to fetch application information")
}

// ============================================================================
// News
// ============================================================================

/// Newest first, optionally filtered by category and tag
pub async fn news_list(
    service: &ContentService,
    category: Option<&str>,
    tag: Option<&str>,
    limit: Option<&str>,
) -> ApiResponse {
    let limit = match parse_limit(limit, usize::MAX) {
        Ok(limit) => limit,
        Err(e) => return ApiResponse::failure(&e, "Failed to fetch news"),
    };

    let envelope = service.load_news().await.map(|items| {
        let by_category = lookup::filter_by_field(&items, "category", category);
        let mut articles = lookup::filter_by_tag(&by_category, tag);
        // stable sort keeps collection order for same-day articles
        articles.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        articles.truncate(limit);
        articles
    });
    ApiResponse::from_envelope(envelope, "Failed to fetch news")
}

pub async fn news_detail(service: &ContentService, slug: &str) -> ApiResponse {
    let envelope = service.article_detail(slug).await;
    ApiResponse::from_envelope(envelope, "Failed to fetch article")
}

// ============================================================================
// Health and search
// ============================================================================

pub async fn content_health(service: &ContentService) -> ApiResponse {
    ApiResponse::from_envelope(service.health().await, "Content health check failed")
}

pub async fn rebuild_search(service: &ContentService) -> ApiResponse {
    match service.rebuild_search_index().await.into_result() {
        Ok(stats) => ApiResponse::new(
            StatusCode::OK,
            json!({
                "success": true,
                "message": format!("Search index rebuilt with {} documents", stats.document_count),
                "timestamp": Utc::now().to_rfc3339(),
            }),
        ),
        Err(e) => ApiResponse::failure(&e, "Failed to rebuild search index"),
    }
}

pub fn search(service: &ContentService, query: Option<&str>, limit: Option<&str>) -> ApiResponse {
    let query = query.map(str::trim).unwrap_or("");
    if query.is_empty() {
        let err = ContentError::InvalidInput("Search query is required".to_string());
        return ApiResponse::failure(&err, "Search failed");
    }
    match parse_limit(limit, DEFAULT_SEARCH_LIMIT) {
        Ok(limit) => ApiResponse::success(service.search(query, limit.min(MAX_SEARCH_LIMIT))),
        Err(e) => ApiResponse::failure(&e, "Search failed"),
    }
}

// ============================================================================
// Contact
// ============================================================================

/// Validate a contact submission. Nothing is stored; the submission is
/// logged by inquiry type only.
pub fn contact(body: &[u8]) -> ApiResponse {
    let raw: Value = match serde_json::from_slice(body) {
        Ok(raw) => raw,
        Err(e) => {
            let err = ContentError::InvalidInput(format!("Request body is not valid JSON: {}", e));
            return ApiResponse::failure(&err, "Failed to submit contact form");
        }
    };

    match validate_contact_form(&raw) {
        Ok(form) => {
            tracing::info!("Contact form received (inquiry type: {})", form.inquiry_type);
            ApiResponse::success(json!({
                "message": "Thank you for reaching out. We will respond within two business days.",
                "inquiryType": form.inquiry_type,
            }))
        }
        Err(e) => {
            let err = ContentError::InvalidInput(format!("Invalid contact form: {}", e));
            ApiResponse::failure(&err, "Failed to submit contact form")
        }
    }
}

/// Enum filter values match the stored spelling regardless of case; values
/// that name no variant pass through and match nothing
fn enum_filter<E: StringEnum>(raw: Option<&str>) -> Option<&str> {
    raw.map(|text| E::parse(text).map_or(text, |value| value.as_str()))
}

fn parse_limit(raw: Option<&str>, default: usize) -> Result<usize, ContentError> {
    match raw.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(text) => text
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ContentError::InvalidInput(format!("limit must be a positive integer, got '{}'", text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ContentCache;
    use crate::loader::ContentStore;
    use std::path::Path;
    use std::time::Duration;

    fn service(dir: &Path) -> ContentService {
        ContentService::new(
            ContentStore::new(dir),
            ContentCache::new(16, Duration::from_secs(60)),
            3,
        )
    }

    fn write_research(dir: &Path) {
        let body = json!([{
            "id": "sepsis-early-warning",
            "title": "Sepsis early warning",
            "description": "Predicting sepsis onset.",
            "tags": ["icu", "prediction"],
            "status": "active"
        }]);
        std::fs::write(dir.join("research.json"), body.to_string()).unwrap();
    }

    #[test]
    fn status_mapping() {
        assert_eq!(status_for(ErrorKind::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorKind::InvalidInput), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorKind::Validation), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status_for(ErrorKind::MissingCollection), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn research_blank_id_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        write_research(dir.path());
        let svc = service(dir.path());

        let resp = research_detail(&svc, "").await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.body["error"], "Research project ID is required");
        assert!(resp.body["data"].is_null());
    }

    #[tokio::test]
    async fn research_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        write_research(dir.path());
        let svc = service(dir.path());

        let resp = research_detail(&svc, "not-a-real-id").await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(resp.body["error"], "Research project not found");
        assert_eq!(resp.body["success"], false);

        let resp = research_detail(&svc, "sepsis-early-warning").await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["data"]["tags"], json!(["icu", "prediction"]));
    }

    #[tokio::test]
    async fn loader_failure_is_server_error_with_details() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());

        let resp = faculty_detail(&svc, "anyone").await;
        assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(resp.body["error"], "Failed to fetch faculty member");
        assert!(resp.body["details"].as_str().unwrap().contains("faculty collection not found"));
    }

    #[tokio::test]
    async fn enum_filters_ignore_case() {
        let dir = tempfile::tempdir().unwrap();
        write_research(dir.path());
        let svc = service(dir.path());

        let resp = research_list(&svc, Some("ACTIVE"), None).await;
        assert_eq!(resp.body["data"].as_array().unwrap().len(), 1);

        let resp = research_list(&svc, Some("paused"), None).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["data"], json!([]));
    }

    #[test]
    fn search_requires_query() {
        let dir = tempfile::tempdir().unwrap();
        let svc = service(dir.path());
        assert_eq!(search(&svc, Some("  "), None).status, StatusCode::BAD_REQUEST);
        assert_eq!(search(&svc, Some("ai"), Some("zero")).status, StatusCode::BAD_REQUEST);

        let resp = search(&svc, Some("ai"), None);
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["data"], json!([]));
    }

    #[test]
    fn contact_validation() {
        let resp = contact(b"{ nope");
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);

        let resp = contact(br#"{"name": "Pat", "email": "pat@example", "message": "Hello there, a question."}"#);
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert!(resp.body["error"].as_str().unwrap().contains("email"));

        let resp = contact(
            br#"{"name": "Pat", "email": "pat@example.org", "message": "Hello there, a question.", "inquiryType": "Research"}"#,
        );
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["data"]["inquiryType"], "research");
    }
}
