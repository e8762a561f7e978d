use std::sync::Arc;

use crate::auth::AuthBridge;
use crate::config::Config;
use crate::pages::cache::PageCache;
use crate::store::RecordStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Job and bullet rows. Postgres in production.
    pub store: Arc<dyn RecordStore>,
    /// Hosted identity service that owns sessions.
    pub auth: Arc<dyn AuthBridge>,
    /// Rendered dashboard pages, invalidated after every mutation.
    pub pages: Arc<PageCache>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, auth: Arc<dyn AuthBridge>, config: Config) -> Self {
        Self {
            store,
            auth,
            pages: Arc::new(PageCache::new()),
            config,
        }
    }
}
