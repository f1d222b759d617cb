//! Content Cache - validated collections kept in memory between requests
//!
//! Owns the collection -> validated-list mapping explicitly instead of hiding
//! it in module state. Only successful loads are stored, so a broken content
//! file is re-read on every request until it is fixed. Concurrent misses for
//! the same collection share a single load.

use moka::future::Cache;
use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ContentError;
use crate::models::{Collection, Entity};

type CachedList = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
pub struct ContentCache {
    inner: Cache<Collection, CachedList>,
}

impl ContentCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { inner }
    }

    /// Cached collection for `T`, running `load` on a miss
    pub async fn get_or_load<T, F>(&self, load: F) -> Result<Arc<Vec<T>>, ContentError>
    where
        T: Entity,
        F: Future<Output = Result<Vec<T>, ContentError>>,
    {
        let collection = T::COLLECTION;

        if let Some(cached) = self.inner.get(&collection).await {
            tracing::debug!("Cache hit for {}", collection);
            return downcast::<T>(cached);
        }

        tracing::debug!("Cache miss for {}", collection);
        let cached = self
            .inner
            .try_get_with(collection, async move {
                load.await.map(|items| Arc::new(items) as CachedList)
            })
            .await
            .map_err(|e: Arc<ContentError>| (*e).clone())?;

        downcast::<T>(cached)
    }

    pub async fn invalidate(&self, collection: Collection) {
        self.inner.invalidate(&collection).await;
    }

    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
        tracing::info!("Content cache invalidated");
    }

    pub async fn contains(&self, collection: Collection) -> bool {
        self.inner.get(&collection).await.is_some()
    }
}

fn downcast<T: Entity>(cached: CachedList) -> Result<Arc<Vec<T>>, ContentError> {
    cached.downcast::<Vec<T>>().map_err(|_| ContentError::Upstream {
        stage: "content cache",
        message: format!("cached {} entry has an unexpected type", T::COLLECTION),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FacultyMember;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn member(id: &str) -> FacultyMember {
        FacultyMember {
            id: id.to_string(),
            name: "Name".to_string(),
            title: "Professor".to_string(),
            bio: "Bio".to_string(),
            research_interests: vec![],
            department: None,
            email: None,
            image_url: None,
            education: vec![],
            publications: vec![],
        }
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() {
        let cache = ContentCache::new(16, Duration::from_secs(60));
        let loads = AtomicUsize::new(0);

        for _ in 0..3 {
            let items = cache
                .get_or_load::<FacultyMember, _>(async {
                    loads.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![member("a")])
                })
                .await
                .unwrap();
            assert_eq!(items.len(), 1);
        }
        assert_eq!(loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let cache = ContentCache::new(16, Duration::from_secs(60));

        let err = cache
            .get_or_load::<FacultyMember, _>(async {
                Err(ContentError::Parse {
                    collection: Collection::Faculty,
                    message: "bad".to_string(),
                })
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Parse);
        assert!(!cache.contains(Collection::Faculty).await);

        let items = cache
            .get_or_load::<FacultyMember, _>(async { Ok(vec![member("a"), member("b")]) })
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let cache = ContentCache::new(16, Duration::from_secs(60));
        cache
            .get_or_load::<FacultyMember, _>(async { Ok(vec![member("a")]) })
            .await
            .unwrap();
        assert!(cache.contains(Collection::Faculty).await);

        cache.invalidate_all();
        let items = cache
            .get_or_load::<FacultyMember, _>(async { Ok(vec![member("a"), member("b")]) })
            .await
            .unwrap();
        assert_eq!(items.len(), 2);

        cache.invalidate(Collection::Faculty).await;
        assert!(!cache.contains(Collection::Faculty).await);
    }
}
