//! Trending API client
//!
//! The cache only needs "give me the list for this category"; the HTTP
//! details live here behind [`TrendingSource`].

use crate::article::{Article, TrendingResponse};
use crate::category::CategoryKey;
use crate::config::Settings;
use crate::error::{Error, Result};
use log::{debug, info};
use reqwest::blocking::Client;
use std::time::Duration;

/// Where trending articles come from.
pub trait TrendingSource {
    /// Fetch the ranked trending list for `category`.
    ///
    /// `force_refresh` asks the backend to regenerate rather than serve its
    /// own cached list.
    fn fetch_trending(&self, category: CategoryKey, force_refresh: bool) -> Result<Vec<Article>>;
}

impl<T: TrendingSource + ?Sized> TrendingSource for &T {
    fn fetch_trending(&self, category: CategoryKey, force_refresh: bool) -> Result<Vec<Article>> {
        (**self).fetch_trending(category, force_refresh)
    }
}

/// Blocking HTTP client for `/api/trending`.
pub struct HttpTrendingSource {
    client: Client,
    base_url: String,
}

impl HttpTrendingSource {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Application(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.api_base_url.clone(), settings.request_timeout())
    }

    /// URL of the list endpoint, or of the forced-refresh endpoint.
    pub fn endpoint_url(&self, force_refresh: bool) -> String {
        if force_refresh {
            format!("{}/api/trending/refresh", self.base_url)
        } else {
            format!("{}/api/trending", self.base_url)
        }
    }
}

fn network_error(category: CategoryKey, message: impl ToString) -> Error {
    Error::Network {
        category: category.to_string(),
        message: message.to_string(),
    }
}

impl TrendingSource for HttpTrendingSource {
    fn fetch_trending(&self, category: CategoryKey, force_refresh: bool) -> Result<Vec<Article>> {
        let url = self.endpoint_url(force_refresh);
        debug!("Requesting {} for category {}", url, category);

        let request = if force_refresh {
            self.client.post(&url)
        } else {
            self.client.get(&url)
        };

        let response = request
            .query(&[("category", category.as_str())])
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| network_error(category, e))?;

        let body: TrendingResponse = response.json().map_err(|e| network_error(category, e))?;

        if !body.success {
            return Err(network_error(
                category,
                body.message
                    .unwrap_or_else(|| "Failed to load trending articles".to_string()),
            ));
        }

        info!(
            "Fetched {} trending articles for {}",
            body.articles.len(),
            category
        );
        Ok(body.articles)
    }
}
