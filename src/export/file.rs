//! Article file export
//!
//! Renders an article in one of the [`ExportFormat`]s and writes it next to
//! other exports, named after the article title.

use super::formatter::build_plain_article;
use super::html::build_standalone_document;
use super::options::{ExportFormat, ExportOptions};
use crate::article::Article;
use crate::error::{Error, Result};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;

/// Derive the export filename from an article title.
///
/// Every character other than an ASCII letter or digit becomes `_`, the
/// result is lower-cased and the format's extension appended.
pub fn export_filename(title: &str, format: ExportFormat) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}.{}", stem, format.extension())
}

/// Render the file body for an article.
pub fn render_export(article: &Article, format: ExportFormat) -> String {
    match format {
        ExportFormat::Txt | ExportFormat::Doc => {
            build_plain_article(&article.title, &article.subtitle, &article.content)
        }
        ExportFormat::Html => {
            build_standalone_document(&article.title, &article.subtitle, &article.content)
        }
    }
}

/// Write an article to disk according to `options`.
///
/// Returns the path of the written file. A failed write only fails this export.
pub fn export_article(article: &Article, options: &ExportOptions) -> Result<PathBuf> {
    let dir = options.directory.clone().unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(export_filename(&article.title, options.format));
    let body = render_export(article, options.format);

    if !dir.exists() {
        fs::create_dir_all(&dir).map_err(|source| Error::FileExport {
            path: dir.clone(),
            source,
        })?;
    }

    fs::write(&path, body).map_err(|source| Error::FileExport {
        path: path.clone(),
        source,
    })?;

    info!(
        "Article exported as {} ({}) to {}",
        options.format.extension().to_uppercase(),
        options.format.mime_type(),
        path.display()
    );

    if options.open_after_export {
        if let Err(e) = open::that(&path) {
            warn!("Failed to open exported file {}: {}", path.display(), e);
        }
    }

    Ok(path)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
