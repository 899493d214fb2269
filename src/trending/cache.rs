//! Per-category trending cache
//!
//! Each category's list is stored under two keys: the JSON article list and
//! the fetch time in epoch milliseconds. An entry is usable while
//! `now - fetched_at` is strictly below the freshness window; anything older,
//! incomplete, or unparseable is treated as absent.
//!
//! Every network fetch holds a [`FetchTicket`]. Starting a new fetch for a
//! category supersedes older tickets for it, and a superseded result is
//! dropped without touching the store.

use super::source::TrendingSource;
use crate::article::Article;
use crate::category::CategoryKey;
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;

/// Default freshness window.
pub const DEFAULT_FRESHNESS_HOURS: i64 = 24;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// A persisted trending list.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendingCacheEntry {
    pub category: CategoryKey,
    /// Display order, rank 1 first
    pub articles: Vec<Article>,
    pub fetched_at: DateTime<Utc>,
}

impl TrendingCacheEntry {
    /// Whether the entry can be used without re-fetching.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        now - self.fetched_at < window
    }
}

/// Result of [`TrendingCache::load`].
#[derive(Debug, Clone, PartialEq)]
pub struct TrendingLoad {
    pub articles: Vec<Article>,
    pub from_cache: bool,
}

/// Handle for one in-flight fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    category: CategoryKey,
    generation: u64,
}

impl FetchTicket {
    pub fn category(&self) -> CategoryKey {
        self.category
    }
}

/// What happened to a completed fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// The result was the latest for its category and has been cached
    Applied(Vec<Article>),
    /// A newer fetch for the same category started; the result was dropped
    Superseded,
}

// ─────────────────────────────────────────────────────────────────────────────
// Cache
// ─────────────────────────────────────────────────────────────────────────────

/// Trending lists cached per category in a [`KeyValueStore`].
pub struct TrendingCache<S, F> {
    store: S,
    source: F,
    freshness: Duration,
    next_generation: u64,
    in_flight: HashMap<CategoryKey, u64>,
}

impl<S: KeyValueStore, F: TrendingSource> TrendingCache<S, F> {
    /// Create a cache with the default 24 hour freshness window.
    pub fn new(store: S, source: F) -> Self {
        Self {
            store,
            source,
            freshness: Duration::hours(DEFAULT_FRESHNESS_HOURS),
            next_generation: 0,
            in_flight: HashMap::new(),
        }
    }

    /// Use a different freshness window.
    pub fn with_freshness(mut self, freshness: Duration) -> Self {
        self.freshness = freshness;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn source(&self) -> &F {
        &self.source
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Public operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Return the cached list if fresh, otherwise fetch it.
    ///
    /// A corrupt entry is deleted and treated as a miss.
    pub fn load(&mut self, category: CategoryKey) -> Result<TrendingLoad> {
        match self.read_entry(category) {
            Ok(Some(entry)) if entry.is_fresh(Utc::now(), self.freshness) => {
                debug!(
                    "Using cached trending articles for {} (fetched {})",
                    category, entry.fetched_at
                );
                return Ok(TrendingLoad {
                    articles: entry.articles,
                    from_cache: true,
                });
            }
            Ok(Some(entry)) => {
                debug!(
                    "Cached trending articles for {} expired (fetched {})",
                    category, entry.fetched_at
                );
            }
            Ok(None) => {}
            Err(Error::CacheParse { key, message }) => {
                warn!("Discarding corrupt cache entry {}: {}", key, message);
                self.remove_entry(category)?;
            }
            Err(e) => return Err(e),
        }

        let articles = self.fetch(category)?;
        Ok(TrendingLoad {
            articles,
            from_cache: false,
        })
    }

    /// Fetch from the network and replace the cached entry on success.
    ///
    /// On failure the existing entry is left as it was.
    pub fn fetch(&mut self, category: CategoryKey) -> Result<Vec<Article>> {
        self.run_fetch(category, false)
    }

    /// Drop the cached entry and fetch again, bypassing freshness.
    pub fn refresh(&mut self, category: CategoryKey) -> Result<Vec<Article>> {
        info!("Refreshing trending articles for {}", category);
        self.remove_entry(category)?;
        self.run_fetch(category, true)
    }

    /// Delete the entries for every listed category.
    pub fn invalidate_all(&mut self, categories: &[CategoryKey]) -> Result<()> {
        for category in categories {
            self.remove_entry(*category)?;
        }
        info!("Invalidated {} trending cache entries", categories.len());
        Ok(())
    }

    /// Read the stored entry regardless of freshness.
    pub fn cached_entry(&self, category: CategoryKey) -> Option<TrendingCacheEntry> {
        self.read_entry(category).ok().flatten()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Split fetch for callers that run the request themselves
    // ─────────────────────────────────────────────────────────────────────────

    /// Start a fetch for `category`, superseding any fetch already running for it.
    pub fn begin_fetch(&mut self, category: CategoryKey) -> FetchTicket {
        self.next_generation += 1;
        let generation = self.next_generation;
        if self.in_flight.insert(category, generation).is_some() {
            debug!("Superseding in-flight trending request for {}", category);
        }
        FetchTicket {
            category,
            generation,
        }
    }

    /// Whether a fetch for `category` has begun and not yet completed.
    pub fn is_in_flight(&self, category: CategoryKey) -> bool {
        self.in_flight.contains_key(&category)
    }

    /// Apply the result of the fetch identified by `ticket`.
    ///
    /// Superseded tickets are dropped whatever their result. For the latest
    /// ticket, success replaces the entry and failure leaves it untouched.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Article>>,
    ) -> Result<FetchOutcome> {
        if self.in_flight.get(&ticket.category) != Some(&ticket.generation) {
            debug!(
                "Discarding superseded trending response for {}",
                ticket.category
            );
            return Ok(FetchOutcome::Superseded);
        }
        self.in_flight.remove(&ticket.category);

        let articles = result?;
        self.write_entry(ticket.category, &articles, Utc::now())?;
        Ok(FetchOutcome::Applied(articles))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    fn run_fetch(&mut self, category: CategoryKey, force_refresh: bool) -> Result<Vec<Article>> {
        let ticket = self.begin_fetch(category);
        let result = self.source.fetch_trending(category, force_refresh);
        match self.complete_fetch(ticket, result)? {
            FetchOutcome::Applied(articles) => Ok(articles),
            FetchOutcome::Superseded => Err(Error::Application(format!(
                "Trending request for '{}' was superseded",
                category
            ))),
        }
    }

    fn read_entry(&self, category: CategoryKey) -> Result<Option<TrendingCacheEntry>> {
        let articles_key = category.articles_key();
        let timestamp_key = category.timestamp_key();

        let (raw_articles, raw_timestamp) = match (
            self.store.get(&articles_key)?,
            self.store.get(&timestamp_key)?,
        ) {
            (None, None) => return Ok(None),
            (Some(a), Some(t)) => (a, t),
            (Some(_), None) => {
                return Err(Error::CacheParse {
                    key: timestamp_key,
                    message: "missing fetch time".to_string(),
                })
            }
            (None, Some(_)) => {
                return Err(Error::CacheParse {
                    key: articles_key,
                    message: "missing article list".to_string(),
                })
            }
        };

        let articles: Vec<Article> =
            serde_json::from_str(&raw_articles).map_err(|e| Error::CacheParse {
                key: articles_key.clone(),
                message: e.to_string(),
            })?;

        let fetched_at = raw_timestamp
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or_else(|| Error::CacheParse {
                key: timestamp_key.clone(),
                message: format!("invalid timestamp {:?}", raw_timestamp),
            })?;

        Ok(Some(TrendingCacheEntry {
            category,
            articles,
            fetched_at,
        }))
    }

    fn write_entry(
        &mut self,
        category: CategoryKey,
        articles: &[Article],
        fetched_at: DateTime<Utc>,
    ) -> Result<()> {
        let json = serde_json::to_string(articles).map_err(|e| Error::Store {
            message: e.to_string(),
        })?;
        self.store.set(&category.articles_key(), &json)?;
        self.store
            .set(&category.timestamp_key(), &fetched_at.timestamp_millis().to_string())?;
        debug!("Cached {} trending articles for {}", articles.len(), category);
        Ok(())
    }

    fn remove_entry(&mut self, category: CategoryKey) -> Result<()> {
        self.store.delete(&category.articles_key())?;
        self.store.delete(&category.timestamp_key())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::cell::{Cell, RefCell};

    /// Serves a fixed list, counts calls, and can be told to fail.
    #[derive(Default)]
    struct FakeSource {
        articles: Vec<Article>,
        fail: Cell<bool>,
        calls: Cell<usize>,
        forced: RefCell<Vec<bool>>,
    }

    impl FakeSource {
        fn serving(titles: &[&str]) -> Self {
            Self {
                articles: titles
                    .iter()
                    .map(|t| Article::new(*t, format!("{} subtitle", t), "body"))
                    .collect(),
                ..Default::default()
            }
        }
    }

    impl TrendingSource for FakeSource {
        fn fetch_trending(&self, category: CategoryKey, force_refresh: bool) -> Result<Vec<Article>> {
            self.calls.set(self.calls.get() + 1);
            self.forced.borrow_mut().push(force_refresh);
            if self.fail.get() {
                return Err(Error::Network {
                    category: category.to_string(),
                    message: "backend down".to_string(),
                });
            }
            Ok(self.articles.clone())
        }
    }

    fn cache_with(titles: &[&str]) -> TrendingCache<MemoryStore, FakeSource> {
        TrendingCache::new(MemoryStore::new(), FakeSource::serving(titles))
    }

    fn titles(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.title.as_str()).collect()
    }

    #[test]
    fn test_second_load_within_window_uses_cache() {
        let mut cache = cache_with(&["A", "B"]);

        let first = cache.load(CategoryKey::Tech).unwrap();
        let second = cache.load(CategoryKey::Tech).unwrap();

        assert!(!first.from_cache);
        assert!(second.from_cache);
        assert_eq!(second.articles, first.articles);
        assert_eq!(cache.source().calls.get(), 1);
    }

    #[test]
    fn test_refresh_always_hits_network() {
        let mut cache = cache_with(&["A"]);
        cache.load(CategoryKey::Tech).unwrap();

        cache.refresh(CategoryKey::Tech).unwrap();
        cache.refresh(CategoryKey::Tech).unwrap();

        assert_eq!(cache.source().calls.get(), 3);
        assert_eq!(*cache.source().forced.borrow(), vec![false, true, true]);
    }

    #[test]
    fn test_expired_entry_is_refetched_and_overwritten() {
        let mut cache = cache_with(&["Fresh"]);
        let stale_time = Utc::now() - Duration::hours(25);
        cache
            .write_entry(CategoryKey::Tech, &[Article::new("Stale", "", "")], stale_time)
            .unwrap();

        let loaded = cache.load(CategoryKey::Tech).unwrap();

        assert!(!loaded.from_cache);
        assert_eq!(titles(&loaded.articles), vec!["Fresh"]);
        assert_eq!(cache.source().calls.get(), 1);
        let entry = cache.cached_entry(CategoryKey::Tech).unwrap();
        assert!(entry.fetched_at > stale_time);
        assert!(entry.is_fresh(Utc::now(), Duration::hours(24)));
    }

    #[test]
    fn test_freshness_boundary_is_strict() {
        let now = Utc::now();
        let entry = TrendingCacheEntry {
            category: CategoryKey::All,
            articles: Vec::new(),
            fetched_at: now - Duration::hours(24),
        };
        assert!(!entry.is_fresh(now, Duration::hours(24)));
        assert!(entry.is_fresh(now - Duration::seconds(1), Duration::hours(24)));
    }

    #[test]
    fn test_miss_fetches_and_persists_both_keys() {
        let mut cache = cache_with(&["A", "B"]);

        let loaded = cache.load(CategoryKey::Finance).unwrap();

        assert!(!loaded.from_cache);
        assert_eq!(titles(&loaded.articles), vec!["A", "B"]);
        let store = cache.store();
        assert!(store.contains_key("trending_articles_finance"));
        assert!(store.contains_key("trending_articles_timestamp_finance"));
    }

    #[test]
    fn test_corrupt_entry_is_discarded_and_refetched() {
        let mut store = MemoryStore::new();
        store.set("trending_articles_tech", "{not json").unwrap();
        store
            .set(
                "trending_articles_timestamp_tech",
                &Utc::now().timestamp_millis().to_string(),
            )
            .unwrap();
        let source = FakeSource::serving(&["A"]);
        source.fail.set(true);
        let mut cache = TrendingCache::new(store, source);

        // Fetch fails, so the corrupt keys must already be gone.
        assert!(cache.load(CategoryKey::Tech).is_err());
        assert!(!cache.store().contains_key("trending_articles_tech"));
        assert!(!cache.store().contains_key("trending_articles_timestamp_tech"));
        assert_eq!(cache.source().calls.get(), 1);
    }

    #[test]
    fn test_corrupt_timestamp_is_a_miss() {
        let mut store = MemoryStore::new();
        store.set("trending_articles_tech", "[]").unwrap();
        store.set("trending_articles_timestamp_tech", "yesterday").unwrap();
        let mut cache = TrendingCache::new(store, FakeSource::serving(&["A"]));

        let loaded = cache.load(CategoryKey::Tech).unwrap();
        assert!(!loaded.from_cache);
        assert_eq!(titles(&loaded.articles), vec!["A"]);
    }

    #[test]
    fn test_half_written_entry_is_a_miss() {
        let mut store = MemoryStore::new();
        store.set("trending_articles_tech", "[]").unwrap();
        let mut cache = TrendingCache::new(store, FakeSource::serving(&["A"]));

        assert!(!cache.load(CategoryKey::Tech).unwrap().from_cache);
    }

    #[test]
    fn test_failed_fetch_keeps_existing_entry() {
        let mut cache = cache_with(&["A"]);
        cache.fetch(CategoryKey::Health).unwrap();
        let before = cache.cached_entry(CategoryKey::Health).unwrap();

        cache.source().fail.set(true);
        let err = cache.fetch(CategoryKey::Health).unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(cache.cached_entry(CategoryKey::Health).unwrap(), before);
        assert!(!cache.is_in_flight(CategoryKey::Health));
    }

    #[test]
    fn test_categories_are_independent() {
        let mut cache = cache_with(&["A"]);
        cache.load(CategoryKey::Tech).unwrap();
        cache.load(CategoryKey::Sports).unwrap();

        assert!(cache.load(CategoryKey::Tech).unwrap().from_cache);
        assert!(cache.load(CategoryKey::Sports).unwrap().from_cache);
        assert_eq!(cache.source().calls.get(), 2);
    }

    #[test]
    fn test_invalidate_all_clears_listed_categories() {
        let mut cache = cache_with(&["A"]);
        cache.load(CategoryKey::Tech).unwrap();
        cache.load(CategoryKey::Food).unwrap();

        cache.invalidate_all(CategoryKey::all()).unwrap();

        assert!(cache.store().is_empty());
        assert!(!cache.load(CategoryKey::Tech).unwrap().from_cache);
    }

    #[test]
    fn test_superseded_result_is_discarded() {
        let mut cache = cache_with(&[]);
        let older = cache.begin_fetch(CategoryKey::Tech);
        let newer = cache.begin_fetch(CategoryKey::Tech);
        assert!(cache.is_in_flight(CategoryKey::Tech));

        let applied = cache
            .complete_fetch(newer, Ok(vec![Article::new("New", "", "")]))
            .unwrap();
        let stale = cache
            .complete_fetch(older, Ok(vec![Article::new("Old", "", "")]))
            .unwrap();

        assert!(matches!(applied, FetchOutcome::Applied(_)));
        assert_eq!(stale, FetchOutcome::Superseded);
        let entry = cache.cached_entry(CategoryKey::Tech).unwrap();
        assert_eq!(titles(&entry.articles), vec!["New"]);
        assert!(!cache.is_in_flight(CategoryKey::Tech));
    }

    #[test]
    fn test_superseded_error_is_discarded() {
        let mut cache = cache_with(&[]);
        let older = cache.begin_fetch(CategoryKey::Tech);
        let _newer = cache.begin_fetch(CategoryKey::Tech);

        let outcome = cache
            .complete_fetch(
                older,
                Err(Error::Network {
                    category: "tech".to_string(),
                    message: "timeout".to_string(),
                }),
            )
            .unwrap();

        assert_eq!(outcome, FetchOutcome::Superseded);
        assert!(cache.is_in_flight(CategoryKey::Tech));
    }

    #[test]
    fn test_tickets_for_other_categories_do_not_interfere() {
        let mut cache = cache_with(&[]);
        let tech = cache.begin_fetch(CategoryKey::Tech);
        let _finance = cache.begin_fetch(CategoryKey::Finance);

        let outcome = cache.complete_fetch(tech, Ok(Vec::new())).unwrap();
        assert_eq!(outcome, FetchOutcome::Applied(Vec::new()));
        assert_eq!(tech.category(), CategoryKey::Tech);
    }

    #[test]
    fn test_custom_freshness_window() {
        let mut cache = cache_with(&["A"]).with_freshness(Duration::hours(1));
        cache
            .write_entry(CategoryKey::Tech, &[], Utc::now() - Duration::hours(2))
            .unwrap();

        assert!(!cache.load(CategoryKey::Tech).unwrap().from_cache);
    }
}
