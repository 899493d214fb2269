//! End-to-end checks through the public API: trending lists cached in a JSON
//! file store, saved to the library and exported, plus history and favorites.

use folio::export::{export_article, ExportFormat, ExportOptions};
use folio::history::ArticleHistory;
use folio::library::{Library, LibraryQuery, SaveOutcome};
use folio::storage::{JsonFileStore, KeyValueStore};
use folio::trending::{TrendingCache, TrendingSource};
use folio::{Article, CategoryKey, Error, Result};
use std::cell::Cell;
use std::fs;
use tempfile::TempDir;

struct CountingSource {
    calls: Cell<usize>,
}

impl TrendingSource for CountingSource {
    fn fetch_trending(&self, category: CategoryKey, _force_refresh: bool) -> Result<Vec<Article>> {
        self.calls.set(self.calls.get() + 1);
        if category == CategoryKey::Sports {
            return Err(Error::Network {
                category: category.to_string(),
                message: "503 Service Unavailable".to_string(),
            });
        }
        Ok(vec![
            Article::new("Side hustles that pay", "Ranked first", "**Start** small"),
            Article::new("Digital detox", "Ranked second", "- log off\n- go outside"),
        ])
    }
}

#[test]
fn test_cache_survives_reopening_the_store() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");
    let source = CountingSource { calls: Cell::new(0) };

    {
        let mut store = JsonFileStore::open(&path).unwrap();
        let mut cache = TrendingCache::new(&mut store, &source);
        let loaded = cache.load(CategoryKey::Finance).unwrap();
        assert!(!loaded.from_cache);
        assert_eq!(loaded.articles[0].title, "Side hustles that pay");
    }

    let mut store = JsonFileStore::open(&path).unwrap();
    assert!(store.get("trending_articles_finance").unwrap().is_some());
    assert!(store
        .get("trending_articles_timestamp_finance")
        .unwrap()
        .is_some());

    let mut cache = TrendingCache::new(&mut store, &source);
    let again = cache.load(CategoryKey::Finance).unwrap();
    assert!(again.from_cache);
    assert_eq!(source.calls.get(), 1);
}

#[test]
fn test_failed_category_does_not_disturb_others() {
    let temp = TempDir::new().unwrap();
    let mut store = JsonFileStore::open(temp.path().join("store.json")).unwrap();
    let source = CountingSource { calls: Cell::new(0) };
    let mut cache = TrendingCache::new(&mut store, &source);

    cache.load(CategoryKey::Tech).unwrap();
    let err = cache.load(CategoryKey::Sports).unwrap_err();

    assert!(err.is_retryable());
    assert!(cache.cached_entry(CategoryKey::Sports).is_none());
    assert!(cache.load(CategoryKey::Tech).unwrap().from_cache);
}

#[test]
fn test_trending_article_saved_and_exported() {
    let temp = TempDir::new().unwrap();
    let mut store = JsonFileStore::open(temp.path().join("store.json")).unwrap();
    let source = CountingSource { calls: Cell::new(0) };

    let articles = TrendingCache::new(&mut store, &source)
        .refresh(CategoryKey::Lifestyle)
        .unwrap();

    let mut library = Library::new(&mut store);
    let id = match library.save(&articles[1]).unwrap() {
        SaveOutcome::Saved(id) => id,
        SaveOutcome::AlreadySaved => panic!("library should start empty"),
    };
    assert_eq!(
        library.save(&articles[1]).unwrap(),
        SaveOutcome::AlreadySaved
    );

    let saved = library.get(&id).unwrap();
    let found = library
        .query(&LibraryQuery {
            search: Some("detox".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(found.len(), 1);

    let out_dir = temp.path().join("exports");
    let txt = export_article(
        &saved,
        &ExportOptions::new(ExportFormat::Txt).with_directory(out_dir.clone()),
    )
    .unwrap();
    let html = export_article(
        &saved,
        &ExportOptions::new(ExportFormat::Html).with_directory(out_dir),
    )
    .unwrap();

    assert!(txt.ends_with("digital_detox.txt"));
    assert_eq!(
        fs::read_to_string(&txt).unwrap(),
        "# Digital detox\n\n## Ranked second\n\n- log off\n- go outside"
    );
    let html = fs::read_to_string(&html).unwrap();
    assert!(html.contains("<li>log off</li><br><li>go outside</li>"));
}

#[test]
fn test_history_and_favorites_survive_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");

    let id = {
        let mut store = JsonFileStore::open(&path).unwrap();
        let mut history = ArticleHistory::new(&mut store);
        let entry = history
            .record(&Article::new("Remote work", "Five habits", "Body"))
            .unwrap();
        assert!(history.add_favorite(&entry).unwrap());
        entry.id.unwrap()
    };

    let mut store = JsonFileStore::open(&path).unwrap();
    let mut history = ArticleHistory::new(&mut store);
    assert!(history.get(&id).unwrap().is_favorite);

    history.clear().unwrap();
    assert!(history.entries().unwrap().is_empty());
    assert!(history.is_favorite(&id).unwrap());
}

#[test]
fn test_corrupt_store_file_is_kept_aside() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");
    fs::write(&path, "{\"savedArticles\": [truncated").unwrap();

    let mut store = JsonFileStore::open(&path).unwrap();
    Library::new(&mut store)
        .save(&Article::new("Fresh start", "", ""))
        .unwrap();

    let aside = temp.path().join("store.json.corrupt");
    assert_eq!(
        fs::read_to_string(aside).unwrap(),
        "{\"savedArticles\": [truncated"
    );
    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(Library::new(reopened).list().unwrap().len(), 1);
}
