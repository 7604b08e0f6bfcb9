//! Behavioral tests for the read-through cache over a counting backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use mediateca::application::store::{ContentParams, ContentStore, StoreError};
use mediateca::cache::{CacheConfig, CachedStore};
use mediateca::domain::entities::ContentRecord;
use mediateca::infra::db::MemoryStore;

/// Wraps the in-memory store and counts how often each operation
/// actually reaches the backend.
struct CountingStore {
    inner: MemoryStore,
    reads: AtomicUsize,
    read_alls: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            reads: AtomicUsize::new(0),
            read_alls: AtomicUsize::new(0),
        }
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn read_alls(&self) -> usize {
        self.read_alls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for CountingStore {
    async fn create(&self, params: ContentParams) -> Result<ContentRecord, StoreError> {
        self.inner.create(params).await
    }

    async fn read(&self, id: Uuid) -> Result<Option<ContentRecord>, StoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.read(id).await
    }

    async fn read_all(&self) -> Result<Vec<ContentRecord>, StoreError> {
        self.read_alls.fetch_add(1, Ordering::SeqCst);
        self.inner.read_all().await
    }

    async fn update(
        &self,
        id: Uuid,
        params: ContentParams,
    ) -> Result<Option<ContentRecord>, StoreError> {
        self.inner.update(id, params).await
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Uuid>, StoreError> {
        self.inner.delete(id).await
    }
}

fn cached(config: CacheConfig) -> (Arc<CountingStore>, CachedStore) {
    let backend = Arc::new(CountingStore::new());
    let cache = CachedStore::new(backend.clone(), config);
    (backend, cache)
}

fn titled(title: &str) -> ContentParams {
    ContentParams {
        title: Some(title.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn read_populates_cache_and_serves_hits() {
    let (backend, cache) = cached(CacheConfig::default());
    let created = cache.create(titled("one")).await.expect("create");

    // Create does not populate the per-record entry; the first read is a
    // miss, the second a hit.
    let first = cache.read(created.id).await.expect("read");
    let second = cache.read(created.id).await.expect("read");

    assert_eq!(first, second);
    assert_eq!(backend.reads(), 1);
}

#[tokio::test]
async fn not_found_is_never_cached() {
    let (backend, cache) = cached(CacheConfig::default());
    let id = Uuid::new_v4();

    assert!(cache.read(id).await.expect("read").is_none());
    assert!(cache.read(id).await.expect("read").is_none());

    assert_eq!(backend.reads(), 2);
}

#[tokio::test]
async fn expired_entry_refetches_from_backend() {
    let config = CacheConfig {
        ttl: Duration::from_millis(20),
        ..Default::default()
    };
    let (backend, cache) = cached(config);
    let created = cache.create(titled("short-lived")).await.expect("create");

    cache.read(created.id).await.expect("read");
    tokio::time::sleep(Duration::from_millis(50)).await;
    cache.read(created.id).await.expect("read");

    assert_eq!(backend.reads(), 2);
}

#[tokio::test]
async fn update_refreshes_the_record_entry() {
    let (backend, cache) = cached(CacheConfig::default());
    let created = cache.create(titled("before")).await.expect("create");

    cache
        .update(created.id, titled("after"))
        .await
        .expect("update")
        .expect("record exists");

    // The updated value is served from cache without a backend read.
    let fetched = cache.read(created.id).await.expect("read").expect("record");
    assert_eq!(fetched.title, "after");
    assert_eq!(backend.reads(), 0);
}

#[tokio::test]
async fn later_update_wins_in_the_cache() {
    let (backend, cache) = cached(CacheConfig::default());
    let created = cache.create(titled("original")).await.expect("create");

    cache
        .update(created.id, titled("first"))
        .await
        .expect("update")
        .expect("record exists");
    cache
        .update(created.id, titled("second"))
        .await
        .expect("update")
        .expect("record exists");

    let fetched = cache.read(created.id).await.expect("read").expect("record");
    assert_eq!(fetched.title, "second");
    assert_eq!(backend.reads(), 0);
}

#[tokio::test]
async fn delete_evicts_the_record_entry() {
    let (backend, cache) = cached(CacheConfig::default());
    let created = cache.create(titled("doomed")).await.expect("create");

    cache.read(created.id).await.expect("read");
    cache.delete(created.id).await.expect("delete").expect("deleted");

    // No stale per-record hit: the read goes to the backend and finds
    // nothing.
    assert!(cache.read(created.id).await.expect("read").is_none());
    assert_eq!(backend.reads(), 2);
}

#[tokio::test]
async fn collection_serves_hits_within_ttl() {
    let (backend, cache) = cached(CacheConfig::default());
    cache.create(titled("one")).await.expect("create");

    let first = cache.read_all().await.expect("read_all");
    let second = cache.read_all().await.expect("read_all");

    assert_eq!(first, second);
    assert_eq!(backend.read_alls(), 1);
}

#[tokio::test]
async fn writes_invalidate_the_collection_entry() {
    let (backend, cache) = cached(CacheConfig::default());
    let first = cache.create(titled("one")).await.expect("create");

    assert_eq!(cache.read_all().await.expect("read_all").len(), 1);

    // Create, update and delete each drop the collection entry, so
    // read_all reflects every write immediately.
    let second = cache.create(titled("two")).await.expect("create");
    assert_eq!(cache.read_all().await.expect("read_all").len(), 2);

    cache
        .update(first.id, titled("renamed"))
        .await
        .expect("update")
        .expect("record exists");
    let all = cache.read_all().await.expect("read_all");
    assert!(all.iter().any(|record| record.title == "renamed"));

    cache.delete(second.id).await.expect("delete").expect("deleted");
    assert_eq!(cache.read_all().await.expect("read_all").len(), 1);

    assert_eq!(backend.read_alls(), 4);
}

/// A backend whose reads block until released, used to interleave a slow
/// read with a faster write.
struct GatedStore {
    inner: MemoryStore,
    gate: tokio::sync::Notify,
}

#[async_trait]
impl ContentStore for GatedStore {
    async fn create(&self, params: ContentParams) -> Result<ContentRecord, StoreError> {
        self.inner.create(params).await
    }

    async fn read(&self, id: Uuid) -> Result<Option<ContentRecord>, StoreError> {
        self.gate.notified().await;
        self.inner.read(id).await
    }

    async fn read_all(&self) -> Result<Vec<ContentRecord>, StoreError> {
        self.inner.read_all().await
    }

    async fn update(
        &self,
        id: Uuid,
        params: ContentParams,
    ) -> Result<Option<ContentRecord>, StoreError> {
        self.inner.update(id, params).await
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Uuid>, StoreError> {
        self.inner.delete(id).await
    }
}

#[tokio::test]
async fn stale_read_cannot_clobber_a_newer_update() {
    let backend = Arc::new(GatedStore {
        inner: MemoryStore::new(),
        gate: tokio::sync::Notify::new(),
    });
    let cache = Arc::new(CachedStore::new(backend.clone(), CacheConfig::default()));

    let created = backend.inner.create(titled("old")).await.expect("create");
    let id = created.id;

    // The read snapshots its generation, then parks inside the backend.
    let reader = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.read(id).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    // An update completes while the read is still in flight. The backend
    // row it will return is now the updated one, but even a pre-update
    // snapshot could not win: the refresh bumped the generation.
    cache
        .update(id, titled("new"))
        .await
        .expect("update")
        .expect("record exists");

    backend.gate.notify_one();
    reader.await.expect("join").expect("read");

    let fetched = cache.read(id).await.expect("read").expect("record");
    assert_eq!(fetched.title, "new");
}
