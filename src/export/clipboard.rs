//! Clipboard Operations for Article Export
//!
//! Copying an article offers both an HTML and a plain-text representation.
//! If the rich write fails, the plain text is written on its own; if that
//! fails too, the caller gets a [`RichWriteResult::TotalFailure`] to show.

// - enum_variant_names: Error variants follow standard naming convention
#![allow(clippy::enum_variant_names)]

use super::formatter::{build_full_article_html, build_plain_article, format_to_html};
use crate::article::Article;
use arboard::Clipboard;
use log::{debug, warn};

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Error
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during clipboard operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// Failed to access clipboard
    AccessError(String),
    /// Failed to set clipboard content
    WriteError(String),
}

impl std::fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardError::AccessError(msg) => write!(f, "Clipboard access error: {}", msg),
            ClipboardError::WriteError(msg) => write!(f, "Clipboard write error: {}", msg),
        }
    }
}

impl std::error::Error for ClipboardError {}

impl From<arboard::Error> for ClipboardError {
    fn from(err: arboard::Error) -> Self {
        ClipboardError::WriteError(err.to_string())
    }
}

impl From<ClipboardError> for crate::error::Error {
    fn from(err: ClipboardError) -> Self {
        crate::error::Error::Clipboard(err.to_string())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Clipboard Backend
// ─────────────────────────────────────────────────────────────────────────────

/// Something that can receive clipboard writes.
pub trait ClipboardBackend {
    /// Offer HTML with a plain-text alternative in one write.
    fn set_html(&mut self, html: &str, plain_text: &str) -> Result<(), ClipboardError>;

    /// Write plain text only.
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The system clipboard, via arboard.
pub struct SystemClipboard {
    clipboard: Clipboard,
}

impl SystemClipboard {
    /// Open the system clipboard.
    pub fn new() -> Result<Self, ClipboardError> {
        let clipboard =
            Clipboard::new().map_err(|e| ClipboardError::AccessError(e.to_string()))?;
        Ok(Self { clipboard })
    }
}

impl ClipboardBackend for SystemClipboard {
    fn set_html(&mut self, html: &str, plain_text: &str) -> Result<(), ClipboardError> {
        self.clipboard.set_html(html, Some(plain_text))?;
        Ok(())
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.clipboard.set_text(text)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rich Write With Fallback
// ─────────────────────────────────────────────────────────────────────────────

/// Outcome of a rich clipboard write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichWriteResult {
    /// HTML and plain text were both offered
    Success,
    /// The rich write failed; plain text alone was written
    FallbackToPlainText,
    /// Neither write succeeded
    TotalFailure(ClipboardError),
}

impl RichWriteResult {
    /// Whether anything ended up on the clipboard.
    pub fn is_copied(&self) -> bool {
        !matches!(self, RichWriteResult::TotalFailure(_))
    }

    /// Short status line for the user.
    pub fn message(&self, what: &str) -> String {
        match self {
            RichWriteResult::Success => format!("{} copied with formatting!", what),
            RichWriteResult::FallbackToPlainText => format!("{} copied!", what),
            RichWriteResult::TotalFailure(_) => {
                format!("Failed to copy {}", what.to_lowercase())
            }
        }
    }
}

/// Write `html` and `plain_text` together, falling back to `plain_text` alone.
pub fn write_rich_with_fallback<B: ClipboardBackend + ?Sized>(
    backend: &mut B,
    html: &str,
    plain_text: &str,
) -> RichWriteResult {
    let rich_err = match backend.set_html(html, plain_text) {
        Ok(()) => return RichWriteResult::Success,
        Err(e) => e,
    };
    debug!("HTML copy failed, trying plain text: {}", rich_err);

    match backend.set_text(plain_text) {
        Ok(()) => RichWriteResult::FallbackToPlainText,
        Err(e) => {
            warn!("Failed to copy to clipboard: {}", e);
            RichWriteResult::TotalFailure(e)
        }
    }
}

/// Copy title, subtitle and body ("Copy Full Article").
pub fn copy_full_article<B: ClipboardBackend + ?Sized>(
    backend: &mut B,
    article: &Article,
) -> RichWriteResult {
    let html = build_full_article_html(&article.title, &article.subtitle, &article.content);
    let plain = build_plain_article(&article.title, &article.subtitle, &article.content);
    write_rich_with_fallback(backend, &html, &plain)
}

/// Copy only the body ("Copy Content"). The plain half is the raw content.
pub fn copy_content<B: ClipboardBackend + ?Sized>(
    backend: &mut B,
    article: &Article,
) -> RichWriteResult {
    let html = format_to_html(&article.content);
    write_rich_with_fallback(backend, &html, &article.content)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
