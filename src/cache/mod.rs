//! In-memory TTL cache and a caching wrapper around any [`StatsProvider`].
//!
//! Entries live in process memory only. Expired entries are dropped lazily on
//! read and in bulk by an optional background sweeper.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::fetch::{FetchError, StatsProvider};
use crate::models::{LifetimeStats, MatchId, MatchRecord, MatchScoreboard, PlayerId, PlayerProfile};

struct Entry<V> {
    value: V,
    /// `None` when the TTL reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

/// Thread-safe map whose entries expire after a fixed time-to-live.
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, Entry<V>>>,
    ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
        // A panic while holding the lock cannot leave a half-written entry
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Store a value, replacing any previous entry for the key.
    pub fn insert(&self, key: K, value: V) {
        let expires_at = Instant::now().checked_add(self.ttl);
        self.lock().insert(key, Entry { value, expires_at });
    }

    /// Clone out a live value. An expired entry is removed and reads as a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.lock();
        let expired = entries.get(key)?.is_expired(Instant::now());
        if expired {
            entries.remove(key);
            return None;
        }
        entries.get(key).map(|e| e.value.clone())
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.lock().remove(key).map(|e| e.value)
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired(now));
        before - entries.len()
    }

    /// Entry count, including entries that have expired but not been swept.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn profile_key(nickname: &str) -> String {
    format!("profile:{}", nickname)
}

pub fn stats_key(player_id: &PlayerId, game: &str) -> String {
    format!("stats:{}:{}", player_id, game)
}

pub fn matches_key(player_id: &PlayerId, game: &str, limit: usize) -> String {
    format!("matches:{}:{}:{}", player_id, game, limit)
}

pub fn match_stats_key(match_id: &MatchId) -> String {
    format!("match_stats:{}", match_id)
}

/// Snapshot of cache occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub ttl: Duration,
}

/// Provider wrapper that serves repeated lookups from memory.
///
/// Only successful responses are stored.
pub struct CachedProvider<P> {
    inner: P,
    profiles: TtlCache<String, PlayerProfile>,
    lifetime: TtlCache<String, LifetimeStats>,
    matches: TtlCache<String, Vec<MatchRecord>>,
    scoreboards: TtlCache<String, MatchScoreboard>,
    ttl: Duration,
}

impl<P: StatsProvider> CachedProvider<P> {
    pub fn new(inner: P, ttl: Duration) -> Self {
        Self {
            inner,
            profiles: TtlCache::new(ttl),
            lifetime: TtlCache::new(ttl),
            matches: TtlCache::new(ttl),
            scoreboards: TtlCache::new(ttl),
            ttl,
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            entries: self.profiles.len()
                + self.lifetime.len()
                + self.matches.len()
                + self.scoreboards.len(),
            ttl: self.ttl,
        }
    }

    /// Remove expired entries from every table.
    pub fn sweep_expired(&self) -> usize {
        self.profiles.sweep_expired()
            + self.lifetime.sweep_expired()
            + self.matches.sweep_expired()
            + self.scoreboards.sweep_expired()
    }
}

impl<P: StatsProvider + 'static> CachedProvider<P> {
    /// Sweep expired entries every `every` until the provider is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            // First tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(cache) = weak.upgrade() else {
                    debug!("Cache dropped, stopping sweeper");
                    break;
                };
                let removed = cache.sweep_expired();
                if removed > 0 {
                    debug!("Swept {} expired cache entries", removed);
                }
            }
        })
    }
}

#[async_trait]
impl<P: StatsProvider> StatsProvider for CachedProvider<P> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn player_by_nickname(&self, nickname: &str) -> Result<PlayerProfile, FetchError> {
        let key = profile_key(nickname);
        if let Some(profile) = self.profiles.get(&key) {
            trace!("Cache hit {}", key);
            return Ok(profile);
        }
        let profile = self.inner.player_by_nickname(nickname).await?;
        self.profiles.insert(key, profile.clone());
        Ok(profile)
    }

    async fn lifetime_stats(
        &self,
        player_id: &PlayerId,
        game: &str,
    ) -> Result<LifetimeStats, FetchError> {
        let key = stats_key(player_id, game);
        if let Some(stats) = self.lifetime.get(&key) {
            trace!("Cache hit {}", key);
            return Ok(stats);
        }
        let stats = self.inner.lifetime_stats(player_id, game).await?;
        self.lifetime.insert(key, stats.clone());
        Ok(stats)
    }

    async fn recent_matches(
        &self,
        player_id: &PlayerId,
        game: &str,
        limit: usize,
    ) -> Result<Vec<MatchRecord>, FetchError> {
        let key = matches_key(player_id, game, limit);
        if let Some(matches) = self.matches.get(&key) {
            trace!("Cache hit {}", key);
            return Ok(matches);
        }
        let matches = self.inner.recent_matches(player_id, game, limit).await?;
        self.matches.insert(key, matches.clone());
        Ok(matches)
    }

    async fn match_scoreboard(&self, match_id: &MatchId) -> Result<MatchScoreboard, FetchError> {
        let key = match_stats_key(match_id);
        if let Some(board) = self.scoreboards.get(&key) {
            trace!("Cache hit {}", key);
            return Ok(board);
        }
        let board = self.inner.match_scoreboard(match_id).await?;
        self.scoreboards.insert(key, board.clone());
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::test_support::records;
    use crate::fetch::mock::MockProvider;
    use crate::models::MatchResult::{Loss, Win};

    #[test]
    fn test_insert_and_get() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert("a".to_string(), 1);

        assert_eq!(cache.get(&"a".to_string()), Some(1));
        assert_eq!(cache.get(&"b".to_string()), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_removed_on_read() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert("a".to_string(), 1);
        assert_eq!(cache.len(), 1);

        assert_eq!(cache.get(&"a".to_string()), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_sweep_expired() {
        let cache = TtlCache::new(Duration::ZERO);
        cache.insert(1, "x");
        cache.insert(2, "y");

        assert_eq!(cache.sweep_expired(), 2);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_remove() {
        let cache = TtlCache::new(Duration::from_secs(60));
        cache.insert(1, "x");
        cache.insert(2, "y");

        assert_eq!(cache.remove(&1), Some("x"));
        assert_eq!(cache.remove(&1), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_unbounded_ttl_never_expires() {
        let cache = TtlCache::new(Duration::MAX);
        cache.insert("a".to_string(), 1);

        assert_eq!(cache.get(&"a".to_string()), Some(1));
        assert_eq!(cache.sweep_expired(), 0);
    }

    #[test]
    fn test_key_formats() {
        let player = PlayerId::new("p1");
        assert_eq!(profile_key("s1mple"), "profile:s1mple");
        assert_eq!(stats_key(&player, "cs2"), "stats:p1:cs2");
        assert_eq!(matches_key(&player, "cs2", 20), "matches:p1:cs2:20");
        assert_eq!(match_stats_key(&MatchId::new("1-abc")), "match_stats:1-abc");
    }

    #[tokio::test]
    async fn test_cached_provider_serves_repeat_lookups() {
        let mock = MockProvider::new().with_player("alice", records(&[Win, Loss, Win]));
        let cached = CachedProvider::new(mock, Duration::from_secs(60));

        let profile = cached.player_by_nickname("alice").await.unwrap();
        let again = cached.player_by_nickname("alice").await.unwrap();
        assert_eq!(profile, again);
        assert_eq!(cached.inner().calls(), 1);
        assert_eq!(cached.name(), "mock");

        let first = cached.recent_matches(&profile.id, "cs2", 3).await.unwrap();
        let second = cached.recent_matches(&profile.id, "cs2", 3).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(cached.inner().calls(), 2);

        // Different limit is a different key
        cached.recent_matches(&profile.id, "cs2", 2).await.unwrap();
        assert_eq!(cached.inner().calls(), 3);
        assert_eq!(cached.cache_stats().entries, 3);
    }

    #[tokio::test]
    async fn test_cached_provider_does_not_cache_errors() {
        let cached = CachedProvider::new(MockProvider::new(), Duration::from_secs(60));

        assert!(cached.player_by_nickname("ghost").await.is_err());
        assert!(cached.player_by_nickname("ghost").await.is_err());
        assert_eq!(cached.inner().calls(), 2);
        assert_eq!(cached.cache_stats().entries, 0);
    }

    #[tokio::test]
    async fn test_cached_provider_expiry() {
        let mock = MockProvider::new().with_player("alice", records(&[Win]));
        let cached = CachedProvider::new(mock, Duration::ZERO);

        cached.player_by_nickname("alice").await.unwrap();
        cached.player_by_nickname("alice").await.unwrap();
        assert_eq!(cached.inner().calls(), 2);
    }

    #[tokio::test]
    async fn test_cached_provider_with_saturated_ttl() {
        let mock = MockProvider::new().with_player("alice", records(&[Win]));
        let cached = CachedProvider::new(mock, Duration::from_secs(u64::MAX));

        cached.player_by_nickname("alice").await.unwrap();
        cached.player_by_nickname("alice").await.unwrap();
        assert_eq!(cached.inner().calls(), 1);
    }

    #[tokio::test]
    async fn test_sweeper_stops_when_dropped() {
        let mock = MockProvider::new();
        let cached = Arc::new(CachedProvider::new(mock, Duration::from_secs(60)));
        let handle = cached.spawn_sweeper(Duration::from_millis(10));

        drop(cached);
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("sweeper should exit")
            .unwrap();
    }
}
