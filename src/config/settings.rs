//! User settings for Folio
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::category::CategoryKey;
use crate::export::ExportFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable that overrides the configured API base URL.
pub const API_URL_ENV: &str = "FOLIO_API_URL";

/// Backend used when nothing is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

/// All user-configurable settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Backend
    // ─────────────────────────────────────────────────────────────────────────
    /// Base URL of the article backend, without trailing slash
    pub api_base_url: String,

    /// Timeout applied to each trending request
    pub request_timeout_secs: u64,

    // ─────────────────────────────────────────────────────────────────────────
    // Trending
    // ─────────────────────────────────────────────────────────────────────────
    /// How long a fetched trending list stays usable
    pub cache_freshness_hours: u32,

    /// Category shown when none is given
    pub default_category: CategoryKey,

    // ─────────────────────────────────────────────────────────────────────────
    // Export Settings
    // ─────────────────────────────────────────────────────────────────────────
    /// Last directory used for file export
    pub last_export_directory: Option<PathBuf>,

    /// Format used when none is given
    pub default_export_format: ExportFormat,

    /// Whether to open exported files after export
    pub open_after_export: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            cache_freshness_hours: 24,
            default_category: CategoryKey::All,
            last_export_directory: None,
            default_export_format: ExportFormat::Txt,
            open_after_export: false,
        }
    }
}

impl Settings {
    pub const MIN_TIMEOUT_SECS: u64 = 1;
    pub const MAX_TIMEOUT_SECS: u64 = 300;
    pub const MIN_FRESHNESS_HOURS: u32 = 1;
    pub const MAX_FRESHNESS_HOURS: u32 = 168;

    /// Sanitize settings to ensure all values are within valid ranges.
    pub fn sanitize(&mut self) {
        self.request_timeout_secs = self
            .request_timeout_secs
            .clamp(Self::MIN_TIMEOUT_SECS, Self::MAX_TIMEOUT_SECS);

        self.cache_freshness_hours = self
            .cache_freshness_hours
            .clamp(Self::MIN_FRESHNESS_HOURS, Self::MAX_FRESHNESS_HOURS);

        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        self.api_base_url = if trimmed.is_empty() {
            DEFAULT_API_BASE_URL.to_string()
        } else {
            trimmed.to_string()
        };
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }

    /// Apply an API URL override, if one is given, and re-sanitize.
    pub fn with_api_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.api_base_url = url;
            self.sanitize();
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn freshness_window(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.cache_freshness_hours))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
