// Axum API Server Module
//
// Purpose: JSON content API for the division website, one handler per resource.
// Handlers only extract request values and delegate to `routes`.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::de::DeserializeOwned;
use std::any::Any;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::error::ContentError;
use crate::routes::{self, ApiResponse};
use crate::service::ContentService;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ContentService>,
}

impl AppState {
    pub async fn new(config: &ServerConfig) -> anyhow::Result<Self> {
        if !config.content_dir.is_dir() {
            anyhow::bail!(
                "Content directory not found: {}\nSet CONTENT_DIR to the folder holding faculty.json, programs.json, ...",
                config.content_dir.display()
            );
        }

        tracing::info!("Initializing content service...");
        let service = Arc::new(ContentService::from_config(config));

        // Startup continues with an empty index if any collection fails to load
        tracing::info!("Building search index...");
        if let Some(e) = service.rebuild_search_index().await.error() {
            tracing::warn!("Starting with an empty search index: {}", e);
        }

        Ok(Self { service })
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Liveness
        .route("/health", get(health_check))

        // Faculty
        .route("/api/faculty", get(list_faculty))
        .route("/api/faculty/:id", get(get_faculty))

        // Research
        .route("/api/research", get(list_research))
        .route("/api/research/", get(get_research_missing_id))
        .route("/api/research/:id", get(get_research))

        // Programs
        // IMPORTANT: static `applications` segment takes priority over :id
        .route("/api/programs", get(list_programs))
        .route("/api/programs/applications", get(get_applications))
        .route("/api/programs/:id", get(get_program))

        // News
        .route("/api/news", get(list_news))
        .route("/api/news/:slug", get(get_article))

        // Content health and search
        .route("/api/content/health", get(content_health))
        .route("/api/search", get(search))
        .route("/api/search/rebuild", post(rebuild_search))

        // Contact form
        .route("/api/contact", post(submit_contact))

        .fallback(route_not_found)

        // Middleware (applied in reverse order)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CompressionLayer::new()) // gzip + brotli compression
        .layer(CorsLayer::permissive()) // Public read-only content
        .layer(TraceLayer::new_for_http()) // Request logging
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn list_faculty(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<FacultyQuery>,
) -> ApiResponse {
    routes::faculty_list(&state.service, params.department.as_deref()).await
}

async fn get_faculty(State(state): State<AppState>, ApiPath(id): ApiPath<String>) -> ApiResponse {
    tracing::debug!("Fetching faculty member {}", id);
    routes::faculty_detail(&state.service, &id).await
}

async fn list_research(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ResearchQuery>,
) -> ApiResponse {
    routes::research_list(&state.service, params.status.as_deref(), params.tag.as_deref()).await
}

async fn get_research_missing_id(State(state): State<AppState>) -> ApiResponse {
    routes::research_detail(&state.service, "").await
}

async fn get_research(State(state): State<AppState>, ApiPath(id): ApiPath<String>) -> ApiResponse {
    tracing::debug!("Fetching research project {}", id);
    routes::research_detail(&state.service, &id).await
}

async fn list_programs(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ProgramQuery>,
) -> ApiResponse {
    routes::program_list(
        &state.service,
        params.degree_type.as_deref(),
        params.format.as_deref(),
    )
    .await
}

async fn get_program(State(state): State<AppState>, ApiPath(id): ApiPath<String>) -> ApiResponse {
    tracing::debug!("Fetching program {}", id);
    routes::program_detail(&state.service, &id).await
}

async fn get_applications(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ApplicationsQuery>,
) -> ApiResponse {
    routes::applications(&state.service, params.program_id.as_deref()).await
}

async fn list_news(State(state): State<AppState>, ApiQuery(params): ApiQuery<NewsQuery>) -> ApiResponse {
    routes::news_list(
        &state.service,
        params.category.as_deref(),
        params.tag.as_deref(),
        params.limit.as_deref(),
    )
    .await
}

async fn get_article(State(state): State<AppState>, ApiPath(slug): ApiPath<String>) -> ApiResponse {
    tracing::debug!("Fetching article {}", slug);
    routes::news_detail(&state.service, &slug).await
}

async fn content_health(State(state): State<AppState>) -> ApiResponse {
    routes::content_health(&state.service).await
}

async fn search(State(state): State<AppState>, ApiQuery(params): ApiQuery<SearchQuery>) -> ApiResponse {
    routes::search(&state.service, params.q.as_deref(), params.limit.as_deref())
}

async fn rebuild_search(State(state): State<AppState>) -> ApiResponse {
    tracing::info!("Search index rebuild requested");
    routes::rebuild_search(&state.service).await
}

async fn submit_contact(body: Bytes) -> ApiResponse {
    routes::contact(&body)
}

async fn route_not_found() -> ApiResponse {
    ApiResponse::new(
        StatusCode::NOT_FOUND,
        serde_json::json!({
            "success": false,
            "error": "Route not found",
            "data": null,
        }),
    )
}

/// Panics become a 500 envelope; the payload message goes in `details`
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("Handler panicked: {}", details);

    ApiResponse::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({
            "success": false,
            "error": "Internal server error",
            "details": details,
            "data": null,
        }),
    )
    .into_response()
}

// ============================================================================
// Request Types
// ============================================================================

/// `Query` whose rejection is a 400 JSON envelope instead of plain text
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(bad_request(rejection.body_text())),
        }
    }
}

/// `Path` whose rejection is a 400 JSON envelope instead of plain text
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiResponse;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(bad_request(rejection.body_text())),
        }
    }
}

fn bad_request(message: String) -> ApiResponse {
    tracing::debug!("Rejected request: {}", message);
    ApiResponse::failure(&ContentError::InvalidInput(message), "Invalid request")
}

#[derive(serde::Deserialize, Debug)]
struct FacultyQuery {
    department: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
struct ResearchQuery {
    status: Option<String>,
    tag: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ProgramQuery {
    degree_type: Option<String>,
    format: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ApplicationsQuery {
    program_id: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
struct NewsQuery {
    category: Option<String>,
    tag: Option<String>,
    // parsed by the route so a bad value still gets a JSON envelope
    limit: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
struct SearchQuery {
    q: Option<String>,
    limit: Option<String>,
}
