//! Trending categories
//!
//! `CategoryKey` replaces free-form category strings so cache keys can only be
//! derived from a known topic bucket.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated trending category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKey {
    /// Wildcard covering every topic
    #[default]
    All,
    Tech,
    Finance,
    Lifestyle,
    Business,
    Health,
    Education,
    Entertainment,
    Travel,
    Food,
    Sports,
    Science,
}

impl CategoryKey {
    /// Get all known categories, wildcard first.
    pub fn all() -> &'static [CategoryKey] {
        &[
            CategoryKey::All,
            CategoryKey::Tech,
            CategoryKey::Finance,
            CategoryKey::Lifestyle,
            CategoryKey::Business,
            CategoryKey::Health,
            CategoryKey::Education,
            CategoryKey::Entertainment,
            CategoryKey::Travel,
            CategoryKey::Food,
            CategoryKey::Sports,
            CategoryKey::Science,
        ]
    }

    /// The identifier used in API queries and storage keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKey::All => "all",
            CategoryKey::Tech => "tech",
            CategoryKey::Finance => "finance",
            CategoryKey::Lifestyle => "lifestyle",
            CategoryKey::Business => "business",
            CategoryKey::Health => "health",
            CategoryKey::Education => "education",
            CategoryKey::Entertainment => "entertainment",
            CategoryKey::Travel => "travel",
            CategoryKey::Food => "food",
            CategoryKey::Sports => "sports",
            CategoryKey::Science => "science",
        }
    }

    /// Get the display label for this category.
    pub fn label(&self) -> &'static str {
        match self {
            CategoryKey::All => "All Topics",
            CategoryKey::Tech => "Technology",
            CategoryKey::Finance => "Finance",
            CategoryKey::Lifestyle => "Lifestyle",
            CategoryKey::Business => "Business",
            CategoryKey::Health => "Health",
            CategoryKey::Education => "Education",
            CategoryKey::Entertainment => "Entertainment",
            CategoryKey::Travel => "Travel",
            CategoryKey::Food => "Food",
            CategoryKey::Sports => "Sports",
            CategoryKey::Science => "Science",
        }
    }

    /// Storage key holding the cached article list.
    pub fn articles_key(&self) -> String {
        format!("trending_articles_{}", self.as_str())
    }

    /// Storage key holding the fetch time of the cached list.
    pub fn timestamp_key(&self) -> String {
        format!("trending_articles_timestamp_{}", self.as_str())
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        CategoryKey::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}
