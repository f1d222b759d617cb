//! Medical AI Division content service
//!
//! Read-only JSON content API for the division website: faculty profiles,
//! research projects, academic programs and their application windows, news
//! articles and contact form intake.
//!
//! Layering, leaves first:
//! - `models/`: typed entities and the traits lookups are written against
//! - `schema/`: per-entity validators (fail-fast, first offending field)
//! - `loader`: reads a collection from the content directory and validates it
//! - `lookup`: find-by-id, find-by-slug, related items, field filters
//! - `service`: cache-backed loaders and lookups returning envelopes
//! - `routes` / `api_server`: HTTP adapters (feature `api`)

pub mod cache;
pub mod config;
pub mod envelope;
pub mod error;
pub mod loader;
pub mod lookup;
pub mod markdown;
pub mod models;
pub mod schema;
pub mod search_index;
pub mod service;

#[cfg(feature = "api")]
pub mod api_server;
#[cfg(feature = "api")]
pub mod routes;

// Re-export commonly used types
pub use cache::ContentCache;
pub use config::ServerConfig;
pub use envelope::Envelope;
pub use error::{ContentError, ErrorKind};
pub use loader::ContentStore;
pub use models::{
    ApplicationInfo, Collection, ContactFormData, FacultyMember, NewsArticle, Program,
    ResearchProject,
};
pub use schema::ValidationError;
pub use search_index::{SearchHit, SearchIndex, SearchIndexStats};
pub use service::{ArticleDetail, ContentHealth, ContentService, ContentSnapshot};

#[cfg(feature = "api")]
pub use api_server::{create_router, AppState};
