//! HTML Document Generation
//!
//! This module wraps formatted article HTML into a complete standalone
//! document with an inlined stylesheet, for "export as HTML file".

use super::formatter::build_full_article_html;

/// Stylesheet inlined into every exported document.
const DOCUMENT_CSS: &str = r#"
body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; line-height: 1.6; }
h1 { color: #333; border-bottom: 2px solid #667eea; padding-bottom: 10px; }
h2 { color: #666; margin-top: 30px; }
h3 { color: #555; margin-top: 25px; }
h4 { color: #666; margin-top: 20px; }
p { margin-bottom: 15px; }
strong { font-weight: bold; }
em { font-style: italic; }
li { margin-bottom: 5px; }
"#;

/// Generate a complete HTML document for an article.
///
/// The body is exactly [`build_full_article_html`]; the title also appears
/// (escaped) in the document `<title>`.
///
/// # Arguments
///
/// * `title` - Article title, used for `<title>` and the leading `<h1>`
/// * `subtitle` - Article subtitle
/// * `content` - Markdown-like article body
pub fn build_standalone_document(title: &str, subtitle: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="Folio">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
{body}
</body>
</html>
"#,
        title = html_escape(title),
        css = DOCUMENT_CSS,
        body = build_full_article_html(title, subtitle, content),
    )
}

/// HTML-escape a string.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
