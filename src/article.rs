//! Article data model
//!
//! Articles come from the generation and trending endpoints and are stored in
//! the saved-article library. Field names follow the backend's camelCase JSON.

use serde::{Deserialize, Deserializer, Serialize};

/// A generated or saved article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Article {
    /// Opaque stable identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(deserialize_with = "null_as_default")]
    pub subtitle: String,

    /// Body in the markdown-like format understood by [`crate::export::formatter`]
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,

    /// RFC 3339 timestamp, set when the article is added to the library
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<String>,

    /// RFC 3339 timestamp, set when the article enters history or favorites
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub medium_url: Option<String>,

    #[serde(deserialize_with = "null_as_default")]
    pub ai_detected: bool,

    #[serde(deserialize_with = "null_as_default")]
    pub ai_score: f64,

    #[serde(deserialize_with = "null_as_default")]
    pub is_favorite: bool,
}

/// Read an explicit `null` as the field's default.
///
/// Records written by older clients carry `"tags": null` and similar; they
/// must decode rather than fail the whole list.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Article {
    /// Create an article with just the required text fields.
    pub fn new(
        title: impl Into<String>,
        subtitle: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Whether the title carries any non-whitespace text.
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Two articles are the same library entry when title and subtitle match.
    pub fn same_entry(&self, other: &Article) -> bool {
        self.title == other.title && self.subtitle == other.subtitle
    }
}

/// Response body of the trending endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrendingResponse {
    pub success: bool,
    pub articles: Vec<Article>,
    pub message: Option<String>,
}

impl Default for TrendingResponse {
    fn default() -> Self {
        Self {
            success: false,
            articles: Vec::new(),
            message: None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
