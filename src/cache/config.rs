//! Cache configuration.

use std::num::NonZeroUsize;
use std::time::Duration;

const DEFAULT_TTL_SECS: u64 = 60;
const DEFAULT_RECORD_LIMIT: usize = 500;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Enable the read-through cache; when off, calls pass straight to
    /// the backend.
    pub enabled: bool,
    /// Lifetime of every cache entry.
    pub ttl: Duration,
    /// Maximum per-record entries before LRU eviction.
    pub record_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            record_limit: DEFAULT_RECORD_LIMIT,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            ttl: Duration::from_secs(settings.ttl_seconds.get()),
            record_limit: settings.record_limit,
        }
    }
}

impl CacheConfig {
    /// Returns the record limit as NonZeroUsize, clamping to 1 if zero.
    pub fn record_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.record_limit).unwrap_or(NonZeroUsize::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.ttl, Duration::from_secs(60));
        assert_eq!(config.record_limit, 500);
    }

    #[test]
    fn non_zero_clamps_to_min() {
        let config = CacheConfig {
            record_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.record_limit_non_zero().get(), 1);
    }
}
