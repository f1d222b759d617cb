//! Content Service - loaders and lookups behind the read-through cache
//!
//! Every public operation resolves to an [`Envelope`]; nothing here returns an
//! error past its boundary. The service owns the two pieces of shared state:
//! the collection cache and the current search index.

use chrono::Utc;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};

use crate::cache::ContentCache;
use crate::config::ServerConfig;
use crate::envelope::Envelope;
use crate::error::ContentError;
use crate::loader::ContentStore;
use crate::lookup;
use crate::markdown::render_markdown;
use crate::models::{
    ApplicationInfo, Entity, FacultyMember, Identified, NewsArticle, Program, ResearchProject,
    Slugged,
};
use crate::search_index::{SearchHit, SearchIndex, SearchIndexStats};

/// Every collection, loaded and validated
#[derive(Clone)]
pub struct ContentSnapshot {
    pub faculty: Arc<Vec<FacultyMember>>,
    pub research: Arc<Vec<ResearchProject>>,
    pub programs: Arc<Vec<Program>>,
    pub news: Arc<Vec<NewsArticle>>,
    pub applications: Arc<Vec<ApplicationInfo>>,
}

impl ContentSnapshot {
    pub fn counts(&self) -> CollectionCounts {
        CollectionCounts {
            faculty: self.faculty.len(),
            research: self.research.len(),
            programs: self.programs.len(),
            news: self.news.len(),
            applications: self.applications.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionCounts {
    pub faculty: usize,
    pub research: usize,
    pub programs: usize,
    pub news: usize,
    pub applications: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentHealth {
    pub status: &'static str,
    pub timestamp: String,
    pub collections: CollectionCounts,
    pub search_index: SearchIndexStats,
}

/// News article with its related articles and rendered body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDetail {
    pub article: NewsArticle,
    pub related_articles: Vec<NewsArticle>,
    pub content_html: String,
}

pub struct ContentService {
    store: ContentStore,
    cache: ContentCache,
    search_index: RwLock<Arc<SearchIndex>>,
    related_limit: usize,
}

impl ContentService {
    pub fn new(store: ContentStore, cache: ContentCache, related_limit: usize) -> Self {
        Self {
            store,
            cache,
            search_index: RwLock::new(Arc::new(SearchIndex::empty())),
            related_limit,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            ContentStore::new(&config.content_dir),
            ContentCache::new(config.cache_max_entries, config.cache_ttl),
            config.related_limit,
        )
    }

    pub fn store(&self) -> &ContentStore {
        &self.store
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    // ========================================================================
    // Loaders
    // ========================================================================

    /// Validated collection for `T`, served from cache when possible
    pub async fn load<T: Entity>(&self) -> Envelope<Arc<Vec<T>>> {
        let result = self.cache.get_or_load(self.store.try_load::<T>()).await;
        if let Err(e) = &result {
            tracing::warn!("Loading {} failed: {}", T::COLLECTION, e);
        }
        Envelope::from(result)
    }

    pub async fn load_faculty(&self) -> Envelope<Arc<Vec<FacultyMember>>> {
        self.load().await
    }

    pub async fn load_research(&self) -> Envelope<Arc<Vec<ResearchProject>>> {
        self.load().await
    }

    pub async fn load_programs(&self) -> Envelope<Arc<Vec<Program>>> {
        self.load().await
    }

    pub async fn load_news(&self) -> Envelope<Arc<Vec<NewsArticle>>> {
        self.load().await
    }

    pub async fn load_applications(&self) -> Envelope<Arc<Vec<ApplicationInfo>>> {
        self.load().await
    }

    /// Load every collection concurrently; the first failure fails the snapshot
    pub async fn load_all(&self) -> Result<ContentSnapshot, ContentError> {
        let (faculty, research, programs, news, applications) = tokio::join!(
            self.load_faculty(),
            self.load_research(),
            self.load_programs(),
            self.load_news(),
            self.load_applications(),
        );

        Ok(ContentSnapshot {
            faculty: faculty.into_result()?,
            research: research.into_result()?,
            programs: programs.into_result()?,
            news: news.into_result()?,
            applications: applications.into_result()?,
        })
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    pub async fn find_by_id<T: Entity + Identified>(&self, id: &str) -> Envelope<T> {
        self.load::<T>()
            .await
            .and_then(|items| lookup::get_by_id(&items, id))
    }

    pub async fn find_by_slug<T: Entity + Slugged>(&self, slug: &str) -> Envelope<T> {
        self.load::<T>()
            .await
            .and_then(|items| lookup::get_by_slug(&items, slug))
    }

    /// Article by slug plus up to `related_limit` articles sharing a tag
    pub async fn article_detail(&self, slug: &str) -> Envelope<ArticleDetail> {
        self.load_news().await.and_then(|articles| {
            let article = lookup::get_by_slug(&articles, slug)?;
            let related_articles =
                lookup::related_items(&articles, &article, &article.id, self.related_limit);
            let content_html = render_markdown(&article.content);
            Ok(ArticleDetail {
                article,
                related_articles,
                content_html,
            })
        })
    }

    /// Application entries, optionally narrowed to one program
    pub async fn applications(&self, program_id: Option<&str>) -> Envelope<Vec<ApplicationInfo>> {
        self.load_applications()
            .await
            .map(|items| lookup::filter_by_field(&items, "programId", program_id))
    }

    // ========================================================================
    // Health and search
    // ========================================================================

    /// All-or-nothing: any collection that fails to load fails the check
    pub async fn health(&self) -> Envelope<ContentHealth> {
        let snapshot = self.load_all().await;
        let search_index = self.search_stats();
        Envelope::from(snapshot).map(|snapshot| ContentHealth {
            status: "healthy",
            timestamp: Utc::now().to_rfc3339(),
            collections: snapshot.counts(),
            search_index,
        })
    }

    /// Drop cached collections, reload everything and swap in a fresh index.
    /// On failure the previous index stays live.
    pub async fn rebuild_search_index(&self) -> Envelope<SearchIndexStats> {
        self.cache.invalidate_all();

        let result = match self.load_all().await {
            Ok(snapshot) => SearchIndex::build(&snapshot),
            Err(e) => Err(ContentError::upstream("content reload", &e)),
        };

        match result {
            Ok(index) => {
                let stats = index.stats();
                *self.search_index.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(index);
                tracing::info!("Search index rebuilt ({} documents)", stats.document_count);
                Envelope::ok(stats)
            }
            Err(e) => {
                tracing::error!("Search index rebuild failed: {}", e);
                Envelope::fail(e)
            }
        }
    }

    fn current_index(&self) -> Arc<SearchIndex> {
        self.search_index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        self.current_index()
            .search(query, limit)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn search_stats(&self) -> SearchIndexStats {
        self.current_index().stats()
    }
}
