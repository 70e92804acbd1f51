use moka::future::Cache;
use std::time::Duration;
use uuid::Uuid;

use crate::engine::Viewer;

/// Resolved viewers keyed by portal user id.
///
/// Entries expire after a short TTL so role and supplier changes made elsewhere are
/// picked up; registering a vendor invalidates the caller's entry right away.
#[derive(Clone)]
pub struct ViewerCache {
    cache: Cache<Uuid, Viewer>,
}

impl ViewerCache {
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(10_000)
            .build();
        Self { cache }
    }

    pub async fn get(&self, user_id: &Uuid) -> Option<Viewer> {
        self.cache.get(user_id).await
    }

    pub async fn insert(&self, user_id: Uuid, viewer: Viewer) {
        self.cache.insert(user_id, viewer).await;
    }

    pub async fn invalidate(&self, user_id: &Uuid) {
        self.cache.invalidate(user_id).await;
    }
}
