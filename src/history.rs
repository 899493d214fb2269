//! Article history and favorites
//!
//! History keeps the most recently generated articles, newest first, capped
//! at [`HISTORY_LIMIT`]. Favorites is an unbounded list of articles keyed by
//! id. Both are JSON arrays in the same [`KeyValueStore`] as the library.

use crate::article::Article;
use crate::error::{Error, Result};
use crate::library::{read_articles, unique_stamp_id, write_articles, DEFAULT_SAVED_CATEGORY};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::HashSet;

/// Storage key of the history list.
pub const HISTORY_KEY: &str = "articleHistory";

/// Storage key of the favorites list.
pub const FAVORITES_KEY: &str = "articleFavorites";

/// Number of history entries kept.
pub const HISTORY_LIMIT: usize = 50;

/// History and favorites kept in a [`KeyValueStore`].
pub struct ArticleHistory<S> {
    store: S,
}

impl<S: KeyValueStore> ArticleHistory<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // History
    // ─────────────────────────────────────────────────────────────────────────

    /// History entries, newest first, with `is_favorite` filled in.
    pub fn entries(&self) -> Result<Vec<Article>> {
        let favorite_ids: HashSet<String> = self
            .favorites()?
            .into_iter()
            .filter_map(|a| a.id)
            .collect();

        let mut entries = read_articles(&self.store, HISTORY_KEY)?;
        for entry in &mut entries {
            entry.is_favorite = entry
                .id
                .as_ref()
                .is_some_and(|id| favorite_ids.contains(id));
        }
        Ok(entries)
    }

    /// Look up a history entry by id.
    pub fn get(&self, id: &str) -> Result<Article> {
        self.entries()?
            .into_iter()
            .find(|a| a.id.as_deref() == Some(id))
            .ok_or_else(|| Error::ArticleNotFound(id.to_string()))
    }

    /// Record a generated article at the front of the history.
    ///
    /// The stored copy always gets a fresh id, the current time and the
    /// `Generated` category. Returns that copy.
    pub fn record(&mut self, article: &Article) -> Result<Article> {
        self.record_at(article, Utc::now())
    }

    fn record_at(&mut self, article: &Article, now: DateTime<Utc>) -> Result<Article> {
        let mut entries = read_articles(&self.store, HISTORY_KEY)?;

        let mut entry = article.clone();
        entry.id = Some(unique_stamp_id(&entries, now));
        entry.timestamp = Some(now.to_rfc3339());
        entry.category = Some(DEFAULT_SAVED_CATEGORY.to_string());
        entry.is_favorite = false;

        entries.insert(0, entry.clone());
        if entries.len() > HISTORY_LIMIT {
            debug!("History over {} entries, dropping oldest", HISTORY_LIMIT);
            entries.truncate(HISTORY_LIMIT);
        }

        write_articles(&mut self.store, HISTORY_KEY, &entries)?;
        info!("Recorded '{}' in history", entry.title);
        Ok(entry)
    }

    /// Forget every history entry. Favorites are kept.
    pub fn clear(&mut self) -> Result<()> {
        self.store.delete(HISTORY_KEY)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Favorites
    // ─────────────────────────────────────────────────────────────────────────

    /// Favorite articles, most recently added first.
    pub fn favorites(&self) -> Result<Vec<Article>> {
        read_articles(&self.store, FAVORITES_KEY)
    }

    /// Add an article to favorites.
    ///
    /// Missing id, timestamp or category are filled in. Returns `false` when
    /// an article with the same id is already a favorite.
    pub fn add_favorite(&mut self, article: &Article) -> Result<bool> {
        self.add_favorite_at(article, Utc::now())
    }

    fn add_favorite_at(&mut self, article: &Article, now: DateTime<Utc>) -> Result<bool> {
        let mut favorites = self.favorites()?;

        let mut favorite = article.clone();
        if favorite.id.is_none() {
            favorite.id = Some(unique_stamp_id(&favorites, now));
        }
        if favorite.timestamp.is_none() {
            favorite.timestamp = Some(now.to_rfc3339());
        }
        if favorite.category.is_none() {
            favorite.category = Some(DEFAULT_SAVED_CATEGORY.to_string());
        }
        favorite.is_favorite = true;

        if favorites.iter().any(|f| f.id == favorite.id) {
            debug!("'{}' is already a favorite", favorite.title);
            return Ok(false);
        }

        favorites.insert(0, favorite);
        write_articles(&mut self.store, FAVORITES_KEY, &favorites)?;
        Ok(true)
    }

    /// Remove a favorite. Returns whether anything was removed.
    pub fn remove_favorite(&mut self, id: &str) -> Result<bool> {
        let mut favorites = self.favorites()?;
        let before = favorites.len();
        favorites.retain(|f| f.id.as_deref() != Some(id));
        if favorites.len() == before {
            return Ok(false);
        }
        write_articles(&mut self.store, FAVORITES_KEY, &favorites)?;
        Ok(true)
    }

    pub fn is_favorite(&self, id: &str) -> Result<bool> {
        Ok(self
            .favorites()?
            .iter()
            .any(|f| f.id.as_deref() == Some(id)))
    }

    /// Forget every favorite. History is kept.
    pub fn clear_favorites(&mut self) -> Result<()> {
        self.store.delete(FAVORITES_KEY)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::Duration;

    fn history() -> ArticleHistory<MemoryStore> {
        ArticleHistory::new(MemoryStore::new())
    }

    #[test]
    fn test_record_stamps_and_prepends() {
        let mut h = history();
        let mut article = Article::new("First", "", "");
        article.category = Some("tech".to_string());
        article.id = Some("from-backend".to_string());

        let first = h.record(&article).unwrap();
        let second = h.record(&Article::new("Second", "", "")).unwrap();

        assert_ne!(first.id.as_deref(), Some("from-backend"));
        assert_eq!(first.category.as_deref(), Some(DEFAULT_SAVED_CATEGORY));
        assert!(first.timestamp.is_some());

        let titles: Vec<_> = h.entries().unwrap().into_iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["Second", "First"]);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_history_keeps_last_fifty() {
        let mut h = history();
        let start = Utc::now();
        for i in 0..HISTORY_LIMIT + 5 {
            let article = Article::new(format!("Article {}", i), "", "");
            h.record_at(&article, start + Duration::milliseconds(i as i64))
                .unwrap();
        }

        let entries = h.entries().unwrap();
        assert_eq!(entries.len(), HISTORY_LIMIT);
        assert_eq!(entries[0].title, "Article 54");
        assert_eq!(entries[HISTORY_LIMIT - 1].title, "Article 5");
    }

    #[test]
    fn test_clear_history_keeps_favorites() {
        let mut h = history();
        let entry = h.record(&Article::new("T", "", "")).unwrap();
        h.add_favorite(&entry).unwrap();

        h.clear().unwrap();
        assert!(h.entries().unwrap().is_empty());
        assert_eq!(h.favorites().unwrap().len(), 1);
    }

    #[test]
    fn test_favorites_dedup_by_id() {
        let mut h = history();
        let entry = h.record(&Article::new("T", "", "")).unwrap();
        let id = entry.id.clone().unwrap();

        assert!(h.add_favorite(&entry).unwrap());
        assert!(!h.add_favorite(&entry).unwrap());
        assert_eq!(h.favorites().unwrap().len(), 1);
        assert!(h.is_favorite(&id).unwrap());
        assert!(h.get(&id).unwrap().is_favorite);

        assert!(h.remove_favorite(&id).unwrap());
        assert!(!h.remove_favorite(&id).unwrap());
        assert!(!h.is_favorite(&id).unwrap());
        assert!(!h.get(&id).unwrap().is_favorite);
    }

    #[test]
    fn test_favorite_fills_missing_fields() {
        let mut h = history();
        let mut with_category = Article::new("B", "", "");
        with_category.category = Some("finance".to_string());

        h.add_favorite(&Article::new("A", "", "")).unwrap();
        h.add_favorite(&with_category).unwrap();

        let favorites = h.favorites().unwrap();
        assert_eq!(favorites[0].title, "B");
        assert_eq!(favorites[0].category.as_deref(), Some("finance"));
        assert_eq!(favorites[1].category.as_deref(), Some(DEFAULT_SAVED_CATEGORY));
        assert!(favorites.iter().all(|f| f.id.is_some() && f.timestamp.is_some()));
        assert_ne!(favorites[0].id, favorites[1].id);
    }

    #[test]
    fn test_clear_favorites() {
        let mut h = history();
        h.add_favorite(&Article::new("A", "", "")).unwrap();
        h.clear_favorites().unwrap();
        assert!(h.favorites().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_history_is_not_overwritten() {
        let mut store = MemoryStore::new();
        store.set(HISTORY_KEY, "{broken").unwrap();
        let mut h = ArticleHistory::new(&mut store);

        assert!(matches!(
            h.record(&Article::new("T", "", "")),
            Err(Error::Store { .. })
        ));
        assert_eq!(store.get(HISTORY_KEY).unwrap().as_deref(), Some("{broken"));
    }
}
