//! Read-through caching for content records.
//!
//! Two kinds of entries, each with a fixed time-to-live:
//!
//! - **Per-record entries** keyed by identifier, in a bounded LRU map.
//! - **One collection entry** for the full "all records" result.
//!
//! Every successful write invalidates the collection entry, so `read_all`
//! never serves pre-write state. Per-record entries refresh on update and
//! evict on delete. A generation counter per entry keeps a slow
//! concurrent read from repopulating the cache with a value older than a
//! later-completing write.
//!
//! Configured via `mediateca.toml`:
//!
//! ```toml
//! [cache]
//! enabled = true
//! ttl_seconds = 60
//! record_limit = 500
//! ```

mod config;
mod layer;
mod lock;
mod store;

pub use config::CacheConfig;
pub use layer::CachedStore;
pub use store::TtlStore;
