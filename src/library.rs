//! Saved-article library
//!
//! The library is a single JSON array stored under `savedArticles`. An
//! article is identified by its `id`; saving a second article with the same
//! title and subtitle is refused. A stored array that fails to decode is
//! reported, never replaced.

use crate::article::Article;
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Storage key of the library.
pub const LIBRARY_KEY: &str = "savedArticles";

/// Category given to articles saved without one.
pub const DEFAULT_SAVED_CATEGORY: &str = "Generated";

// ─────────────────────────────────────────────────────────────────────────────
// Query Types
// ─────────────────────────────────────────────────────────────────────────────

/// Sort order for library listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    Title,
}

/// Filter, search and sort options for [`Library::query`].
#[derive(Debug, Clone, Default)]
pub struct LibraryQuery {
    /// Keep only this category; `None` or `"all"` keeps everything
    pub category: Option<String>,
    /// Case-insensitive match against title or subtitle
    pub search: Option<String>,
    pub sort: SortOrder,
}

/// Result of [`Library::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Stored under this id
    Saved(String),
    /// An article with the same title and subtitle is already saved
    AlreadySaved,
}

// ─────────────────────────────────────────────────────────────────────────────
// Library
// ─────────────────────────────────────────────────────────────────────────────

/// Saved articles kept in a [`KeyValueStore`].
pub struct Library<S> {
    store: S,
}

impl<S: KeyValueStore> Library<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// All saved articles in insertion order.
    ///
    /// A missing library reads as empty. A library that cannot be decoded is
    /// an error, and nothing is written over it.
    pub fn list(&self) -> Result<Vec<Article>> {
        read_articles(&self.store, LIBRARY_KEY)
    }

    /// Look up a saved article by id.
    pub fn get(&self, id: &str) -> Result<Article> {
        self.list()?
            .into_iter()
            .find(|a| a.id.as_deref() == Some(id))
            .ok_or_else(|| Error::ArticleNotFound(id.to_string()))
    }

    /// Save an article, stamping id, save time, category and tags.
    pub fn save(&mut self, article: &Article) -> Result<SaveOutcome> {
        self.save_at(article, Utc::now())
    }

    fn save_at(&mut self, article: &Article, now: DateTime<Utc>) -> Result<SaveOutcome> {
        let mut articles = self.list()?;

        if articles.iter().any(|saved| saved.same_entry(article)) {
            debug!("Article '{}' already in library", article.title);
            return Ok(SaveOutcome::AlreadySaved);
        }

        let id = unique_stamp_id(&articles, now);

        let mut to_save = article.clone();
        to_save.id = Some(id.clone());
        to_save.saved_at = Some(now.to_rfc3339());
        to_save.tags = Vec::new();
        if to_save.category.is_none() {
            to_save.category = Some(DEFAULT_SAVED_CATEGORY.to_string());
        }
        articles.push(to_save);

        self.write(&articles)?;
        info!("Article '{}' saved to library as {}", article.title, id);
        Ok(SaveOutcome::Saved(id))
    }

    /// Remove a saved article.
    pub fn delete(&mut self, id: &str) -> Result<()> {
        let mut articles = self.list()?;
        let before = articles.len();
        articles.retain(|a| a.id.as_deref() != Some(id));
        if articles.len() == before {
            return Err(Error::ArticleNotFound(id.to_string()));
        }
        self.write(&articles)
    }

    /// Append a tag. Blank tags are ignored.
    pub fn add_tag(&mut self, id: &str, tag: &str) -> Result<()> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Ok(());
        }
        self.update(id, |article| article.tags.push(tag.to_string()))
    }

    /// Remove every occurrence of a tag.
    pub fn remove_tag(&mut self, id: &str, tag: &str) -> Result<()> {
        self.update(id, |article| article.tags.retain(|t| t != tag))
    }

    /// Filter, search and sort the library.
    pub fn query(&self, query: &LibraryQuery) -> Result<Vec<Article>> {
        let search = query.search.as_deref().map(str::to_lowercase);
        let category = query.category.as_deref().filter(|c| *c != "all");

        let mut articles: Vec<Article> = self
            .list()?
            .into_iter()
            .filter(|a| category.map_or(true, |c| a.category.as_deref() == Some(c)))
            .filter(|a| match &search {
                Some(term) => {
                    a.title.to_lowercase().contains(term)
                        || a.subtitle.to_lowercase().contains(term)
                }
                None => true,
            })
            .collect();

        match query.sort {
            SortOrder::Newest => articles.sort_by(|a, b| saved_time(b).cmp(&saved_time(a))),
            SortOrder::Oldest => articles.sort_by(|a, b| saved_time(a).cmp(&saved_time(b))),
            SortOrder::Title => articles.sort_by(|a, b| a.title.cmp(&b.title)),
        }
        Ok(articles)
    }

    fn update(&mut self, id: &str, change: impl FnOnce(&mut Article)) -> Result<()> {
        let mut articles = self.list()?;
        let article = articles
            .iter_mut()
            .find(|a| a.id.as_deref() == Some(id))
            .ok_or_else(|| Error::ArticleNotFound(id.to_string()))?;
        change(article);
        self.write(&articles)
    }

    fn write(&mut self, articles: &[Article]) -> Result<()> {
        write_articles(&mut self.store, LIBRARY_KEY, articles)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stored article lists
// ─────────────────────────────────────────────────────────────────────────────

/// Decode the article list stored under `key`.
pub(crate) fn read_articles<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Vec<Article>> {
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&raw).map_err(|e| {
        warn!("Stored list '{}' could not be decoded: {}", key, e);
        Error::Store {
            message: format!("'{}' is not a valid article list: {}", key, e),
        }
    })
}

pub(crate) fn write_articles<S: KeyValueStore + ?Sized>(
    store: &mut S,
    key: &str,
    articles: &[Article],
) -> Result<()> {
    let json = serde_json::to_string(articles).map_err(|e| Error::Store {
        message: e.to_string(),
    })?;
    store.set(key, &json)
}

/// Millisecond id for `now`, bumped past any id already taken in `articles`.
pub(crate) fn unique_stamp_id(articles: &[Article], now: DateTime<Utc>) -> String {
    let mut stamp = now.timestamp_millis();
    while articles
        .iter()
        .any(|a| a.id.as_deref() == Some(stamp.to_string().as_str()))
    {
        stamp += 1;
    }
    stamp.to_string()
}

fn saved_time(article: &Article) -> Option<DateTime<Utc>> {
    article
        .saved_at
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
