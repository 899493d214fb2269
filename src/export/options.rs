//! Export Options and Configuration
//!
//! This module defines the export format types and the per-run options for
//! writing an article to disk.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Export Format
// ─────────────────────────────────────────────────────────────────────────────

/// Supported file export formats for articles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Plain text with markdown markers kept
    #[default]
    Txt,
    /// The plain-text article under a `.doc` name
    Doc,
    /// Standalone HTML document with an inline stylesheet
    Html,
}

impl ExportFormat {
    /// Get the display label for this format.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "Text File",
            ExportFormat::Doc => "Word Document",
            ExportFormat::Html => "HTML File",
        }
    }

    /// Get the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Txt => "txt",
            ExportFormat::Doc => "doc",
            ExportFormat::Html => "html",
        }
    }

    /// MIME type of the exported file.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Txt | ExportFormat::Doc => "text/plain",
            ExportFormat::Html => "text/html",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Options
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration options for a single export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ExportOptions {
    /// The export format to use
    pub format: ExportFormat,

    /// Directory to write into; the working directory when unset
    pub directory: Option<PathBuf>,

    /// Whether to open the exported file after export
    pub open_after_export: bool,
}

impl ExportOptions {
    /// Create options for the given format.
    pub fn new(format: ExportFormat) -> Self {
        Self {
            format,
            ..Default::default()
        }
    }

    /// Set the export directory.
    pub fn with_directory(mut self, dir: PathBuf) -> Self {
        self.directory = Some(dir);
        self
    }

    /// Open the file with the system handler once written.
    pub fn with_open_after_export(mut self, open: bool) -> Self {
        self.open_after_export = open;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
