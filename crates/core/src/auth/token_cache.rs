//! Bearer token cache keyed by credential fingerprint
//!
//! Entries expire by TTL only. The key space is the set of configured
//! accounts, so there is no capacity bound.

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use crate::time::{Clock, SystemClock};

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Concurrent map from cache key to bearer token.
///
/// Writes for a key always replace the previous entry, so at most one token
/// is held per account.
pub struct TokenCache {
    entries: DashMap<String, CachedToken>,
    clock: Arc<dyn Clock>,
}

static SHARED: OnceLock<Arc<TokenCache>> = OnceLock::new();

impl TokenCache {
    /// Empty cache reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { entries: DashMap::new(), clock }
    }

    /// Process-wide cache backed by the system clock.
    pub fn shared() -> Arc<Self> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::default())))
    }

    /// Token for `key` if it has not expired.
    pub fn get(&self, key: &str) -> Option<String> {
        let now = self.clock.now();
        let entry = self.entries.get(key)?;
        if now < entry.expires_at {
            return Some(entry.token.clone());
        }
        drop(entry);
        self.entries.remove_if(key, |_, cached| cached.expires_at <= now);
        debug!(cache_key = key, "token_cache_expired");
        None
    }

    /// Store `token` under `key` for `ttl`, replacing any previous entry.
    pub fn set(&self, key: &str, token: impl Into<String>, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        self.entries.insert(key.to_string(), CachedToken { token: token.into(), expires_at });
    }

    /// Drop the entry for `key`, if any.
    pub fn invalidate(&self, key: &str) {
        if self.entries.remove(key).is_some() {
            debug!(cache_key = key, "token_cache_invalidated");
        }
    }

    /// Number of entries, expired ones included until next read.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::MockClock;

    fn cache_with_clock() -> (TokenCache, MockClock) {
        let clock = MockClock::new();
        (TokenCache::new(Arc::new(clock.clone())), clock)
    }

    #[test]
    fn returns_token_until_expiry() {
        let (cache, clock) = cache_with_clock();
        cache.set("fb:443:u", "tok1", Duration::from_secs(60));

        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.get("fb:443:u").as_deref(), Some("tok1"));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get("fb:443:u"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn set_overwrites_existing_entry() {
        let (cache, _clock) = cache_with_clock();
        cache.set("k", "old", Duration::from_secs(60));
        cache.set("k", "new", Duration::from_secs(60));

        assert_eq!(cache.get("k").as_deref(), Some("new"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn invalidate_removes_entry() {
        let (cache, _clock) = cache_with_clock();
        cache.set("k", "tok", Duration::from_secs(60));
        cache.invalidate("k");
        assert_eq!(cache.get("k"), None);
        cache.invalidate("missing");
    }

    #[test]
    fn keys_are_isolated() {
        let (cache, _clock) = cache_with_clock();
        cache.set("a", "tok-a", Duration::from_secs(60));
        cache.set("b", "tok-b", Duration::from_secs(60));
        cache.invalidate("a");
        assert_eq!(cache.get("b").as_deref(), Some("tok-b"));
    }

    #[test]
    fn shared_returns_same_instance() {
        assert!(Arc::ptr_eq(&TokenCache::shared(), &TokenCache::shared()));
    }
}
