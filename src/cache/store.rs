//! TTL cache storage for content records.
//!
//! Holds per-record entries in a bounded LRU map plus a single
//! collection entry. Each entry expires after the configured TTL.
//! Generation counters let callers insert with compare-and-set so a
//! stale read can never clobber the result of a newer write.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use lru::LruCache;
use uuid::Uuid;

use crate::domain::entities::ContentRecord;

use super::config::CacheConfig;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

#[derive(Clone)]
struct Entry<T> {
    value: T,
    expires_at: Instant,
}

impl<T> Entry<T> {
    fn new(value: T, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_live(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

pub struct TtlStore {
    ttl: Duration,
    records: RwLock<LruCache<Uuid, Entry<ContentRecord>>>,
    // Generations outlive their entries: a record evicted for capacity
    // keeps its counter so a stale in-flight read still loses the CAS.
    record_generations: DashMap<Uuid, u64>,
    collection: RwLock<Option<Entry<Vec<ContentRecord>>>>,
    collection_generation: AtomicU64,
}

impl TtlStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            ttl: config.ttl,
            records: RwLock::new(LruCache::new(config.record_limit_non_zero())),
            record_generations: DashMap::new(),
            collection: RwLock::new(None),
            collection_generation: AtomicU64::new(0),
        }
    }

    // ========================================================================
    // Per-record entries
    // ========================================================================

    pub fn get_record(&self, id: Uuid) -> Option<ContentRecord> {
        let mut records = rw_write(&self.records, SOURCE, "get_record");
        match records.peek(&id).map(Entry::is_live) {
            Some(true) => records.get(&id).map(|entry| entry.value.clone()),
            Some(false) => {
                records.pop(&id);
                None
            }
            None => None,
        }
    }

    /// Snapshot the generation of an identifier before a backend fetch.
    pub fn record_generation(&self, id: Uuid) -> u64 {
        self.record_generations.get(&id).map(|g| *g).unwrap_or(0)
    }

    /// Populate a per-record entry only if no write or eviction happened
    /// since `generation` was captured. Returns whether it was inserted.
    pub fn put_record_if_current(
        &self,
        id: Uuid,
        generation: u64,
        record: ContentRecord,
    ) -> bool {
        let mut records = rw_write(&self.records, SOURCE, "put_record_if_current");
        if self.record_generation(id) != generation {
            return false;
        }
        records.put(id, Entry::new(record, self.ttl));
        true
    }

    /// Replace the per-record entry after a confirmed write, bumping the
    /// generation so in-flight stale reads lose the CAS.
    pub fn refresh_record(&self, record: ContentRecord) {
        let mut records = rw_write(&self.records, SOURCE, "refresh_record");
        self.bump_record_generation(record.id);
        records.put(record.id, Entry::new(record, self.ttl));
    }

    /// Drop the per-record entry outright after a confirmed delete.
    pub fn evict_record(&self, id: Uuid) {
        let mut records = rw_write(&self.records, SOURCE, "evict_record");
        self.bump_record_generation(id);
        records.pop(&id);
    }

    fn bump_record_generation(&self, id: Uuid) {
        *self.record_generations.entry(id).or_insert(0) += 1;
    }

    // ========================================================================
    // Collection entry
    // ========================================================================

    pub fn get_collection(&self) -> Option<Vec<ContentRecord>> {
        let collection = rw_read(&self.collection, SOURCE, "get_collection");
        collection
            .as_ref()
            .filter(|entry| entry.is_live())
            .map(|entry| entry.value.clone())
    }

    pub fn collection_generation(&self) -> u64 {
        self.collection_generation.load(Ordering::Acquire)
    }

    pub fn put_collection_if_current(
        &self,
        generation: u64,
        items: Vec<ContentRecord>,
    ) -> bool {
        let mut collection = rw_write(&self.collection, SOURCE, "put_collection_if_current");
        if self.collection_generation.load(Ordering::Acquire) != generation {
            return false;
        }
        *collection = Some(Entry::new(items, self.ttl));
        true
    }

    /// Drop the collection entry after any confirmed write so `read_all`
    /// never serves pre-write state.
    pub fn invalidate_collection(&self) {
        let mut collection = rw_write(&self.collection, SOURCE, "invalidate_collection");
        self.collection_generation.fetch_add(1, Ordering::AcqRel);
        *collection = None;
    }
}
