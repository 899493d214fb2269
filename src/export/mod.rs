//! Article Export Module for Folio
//!
//! This module turns articles into the formats users take elsewhere: HTML
//! for rich paste, plain text with markdown markers, and standalone files.
//!
//! # Architecture
//!
//! - `formatter.rs` - Markdown-like body to HTML, plain-text article
//! - `html.rs` - Standalone HTML document with inline stylesheet
//! - `clipboard.rs` - Rich clipboard write with plain-text fallback
//! - `options.rs` - Export formats and options
//! - `file.rs` - Filename derivation and writing exports to disk

pub mod clipboard;
pub mod file;
pub mod formatter;
pub mod html;
pub mod options;

pub use clipboard::{
    copy_content, copy_full_article, write_rich_with_fallback, ClipboardBackend, ClipboardError,
    RichWriteResult, SystemClipboard,
};
pub use file::{export_article, export_filename, render_export};
pub use formatter::{build_full_article_html, build_plain_article, format_bold, format_to_html};
pub use html::build_standalone_document;
pub use options::{ExportFormat, ExportOptions};
