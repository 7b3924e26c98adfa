use chrono::{DateTime, Duration, Local};
use std::collections::HashMap;

use crate::schedule::ActivityOption;

/// Cache key of the activity-type directory listing
pub const ACTIVITY_TYPES_KEY: &str = "activity-types";

/// Options fetched for one key
#[derive(Debug, Clone)]
pub struct CachedOptions {
    pub options: Vec<ActivityOption>,
    pub fetched_at: DateTime<Local>,
}

/// Short-lived cache of directory lookups, keyed by endpoint identifier
#[derive(Debug, Clone)]
pub struct OptionsCache {
    pub entries: HashMap<String, CachedOptions>,
    ttl: Duration,
}

impl OptionsCache {
    pub fn new(ttl_secs: i64) -> Self {
        OptionsCache {
            entries: HashMap::new(),
            ttl: Duration::seconds(ttl_secs.max(0)),
        }
    }

    /// Options for `key` if fetched within the validity window
    pub fn fresh(&self, key: &str) -> Option<&[ActivityOption]> {
        self.entries
            .get(key)
            .filter(|cached| !self.is_expired(cached, Local::now()))
            .map(|cached| cached.options.as_slice())
    }

    pub fn insert(&mut self, key: &str, options: Vec<ActivityOption>) {
        tracing::debug!(key, count = options.len(), "Caching activity options");
        self.entries.insert(
            key.to_string(),
            CachedOptions {
                options,
                fetched_at: Local::now(),
            },
        );
    }

    /// Check if the entry for `key` is missing or older than the window
    pub fn is_stale(&self, key: &str) -> bool {
        match self.entries.get(key) {
            Some(cached) => self.is_expired(cached, Local::now()),
            None => true,
        }
    }

    pub fn invalidate(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn is_expired(&self, cached: &CachedOptions, now: DateTime<Local>) -> bool {
        now.signed_duration_since(cached.fetched_at) > self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: i64, code: &str) -> ActivityOption {
        ActivityOption {
            id,
            code: code.to_string(),
            name: code.to_uppercase(),
        }
    }

    #[test]
    fn test_empty_cache_is_stale() {
        let cache = OptionsCache::new(30);
        assert!(cache.is_stale(ACTIVITY_TYPES_KEY));
        assert!(cache.fresh(ACTIVITY_TYPES_KEY).is_none());
    }

    #[test]
    fn test_fresh_within_window() {
        let mut cache = OptionsCache::new(30);
        cache.insert(ACTIVITY_TYPES_KEY, vec![option(1, "consulta")]);

        assert!(!cache.is_stale(ACTIVITY_TYPES_KEY));
        assert_eq!(cache.fresh(ACTIVITY_TYPES_KEY).unwrap().len(), 1);
    }

    #[test]
    fn test_expires_after_window() {
        let mut cache = OptionsCache::new(30);
        cache.insert(ACTIVITY_TYPES_KEY, vec![option(1, "consulta")]);

        // Pretend the fetch happened a minute ago
        cache
            .entries
            .get_mut(ACTIVITY_TYPES_KEY)
            .unwrap()
            .fetched_at = Local::now() - Duration::seconds(60);

        assert!(cache.is_stale(ACTIVITY_TYPES_KEY));
        assert!(cache.fresh(ACTIVITY_TYPES_KEY).is_none());
    }

    #[test]
    fn test_invalidate_only_drops_one_key() {
        let mut cache = OptionsCache::new(30);
        cache.insert(ACTIVITY_TYPES_KEY, vec![option(1, "consulta")]);
        cache.insert("other", vec![]);

        cache.invalidate(ACTIVITY_TYPES_KEY);
        assert!(cache.is_stale(ACTIVITY_TYPES_KEY));
        assert!(!cache.is_stale("other"));
    }
}
