use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Rendered HTML keyed by (path, owner).
///
/// Pages are rendered from the record store on a miss and served from here
/// until a mutation marks the path stale. Each path carries a generation
/// that `revalidate_path` bumps; a render may only be stored under the
/// generation it read the store in.
#[derive(Default)]
pub struct PageCache {
    inner: RwLock<Entries>,
}

#[derive(Default)]
struct Entries {
    pages: HashMap<(String, Uuid), String>,
    generations: HashMap<String, u64>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, path: &str, owner: Uuid) -> Option<String> {
        self.inner
            .read()
            .await
            .pages
            .get(&(path.to_string(), owner))
            .cloned()
    }

    /// Current generation of `path`. Read it before loading the rows a page
    /// is rendered from.
    pub async fn generation(&self, path: &str) -> u64 {
        self.inner
            .read()
            .await
            .generations
            .get(path)
            .copied()
            .unwrap_or_default()
    }

    /// Stores `html` unless `path` was revalidated since `generation` was
    /// read. Returns whether the page was kept.
    pub async fn insert(&self, path: &str, owner: Uuid, generation: u64, html: String) -> bool {
        let mut inner = self.inner.write().await;
        let current = inner.generations.get(path).copied().unwrap_or_default();
        if current != generation {
            debug!("Discarded stale render of {path} (generation {generation}, now {current})");
            return false;
        }
        inner.pages.insert((path.to_string(), owner), html);
        true
    }

    /// Marks `path` stale for every owner.
    pub async fn revalidate_path(&self, path: &str) {
        let mut inner = self.inner.write().await;
        *inner.generations.entry(path.to_string()).or_default() += 1;
        let before = inner.pages.len();
        inner.pages.retain(|(cached_path, _), _| cached_path != path);
        debug!(
            "Revalidated {path}: dropped {} cached page(s)",
            before - inner.pages.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_entries_are_per_owner() {
        let cache = PageCache::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let generation = cache.generation("/app").await;
        assert!(cache.insert("/app", alice, generation, "alice".to_string()).await);

        assert_eq!(cache.get("/app", alice).await.as_deref(), Some("alice"));
        assert_eq!(cache.get("/app", bob).await, None);
    }

    #[tokio::test]
    async fn test_revalidate_drops_only_that_path() {
        let cache = PageCache::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let app = cache.generation("/app").await;
        let other = cache.generation("/other").await;
        cache.insert("/app", alice, app, "a".to_string()).await;
        cache.insert("/app", bob, app, "b".to_string()).await;
        cache.insert("/other", alice, other, "c".to_string()).await;

        cache.revalidate_path("/app").await;

        assert_eq!(cache.get("/app", alice).await, None);
        assert_eq!(cache.get("/app", bob).await, None);
        assert_eq!(cache.get("/other", alice).await.as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn test_render_started_before_revalidation_is_not_stored() {
        let cache = PageCache::new();
        let alice = Uuid::new_v4();
        let before_write = cache.generation("/app").await;

        cache.revalidate_path("/app").await;

        assert!(!cache.insert("/app", alice, before_write, "old rows".to_string()).await);
        assert_eq!(cache.get("/app", alice).await, None);

        let after_write = cache.generation("/app").await;
        assert!(cache.insert("/app", alice, after_write, "new rows".to_string()).await);
        assert_eq!(cache.get("/app", alice).await.as_deref(), Some("new rows"));
    }
}
