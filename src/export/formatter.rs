//! Article Content Formatting
//!
//! Converts the constrained markdown-like article format into HTML. The
//! conversion is a fixed sequence of line-local substitutions:
//!
//! 1. `**bold**` → `<strong>`
//! 2. `*italic*` → `<em>` (bold markers are already consumed)
//! 3. `#` .. `####` headings → `<h1>` .. `<h4>`
//! 4. `- item` lines → standalone `<li>` (no enclosing `<ul>`)
//! 5. blank lines → `</p><p>`, single newlines → `<br>`, whole string in one `<p>`
//!
//! Patterns run in CRLF mode, so `.` never swallows a `\r` and line anchors
//! sit before `\r\n` as well as `\n`.
//!
//! The output is meant to be produced once from source text. Feeding HTML back
//! through [`format_to_html`] is not supported.

use regex::Regex;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Substitution Rules
// ─────────────────────────────────────────────────────────────────────────────

struct Rules {
    bold: Regex,
    italic: Regex,
    /// Index 0 is `#`, index 3 is `####`
    headings: [Regex; 4],
    list_item: Regex,
}

static RULES: OnceLock<Rules> = OnceLock::new();

fn rules() -> &'static Rules {
    RULES.get_or_init(|| Rules {
        bold: compile(r"(?R)\*\*(.*?)\*\*"),
        italic: compile(r"(?R)\*(.*?)\*"),
        headings: [
            compile(r"(?mR)^# (.*)$"),
            compile(r"(?mR)^## (.*)$"),
            compile(r"(?mR)^### (.*)$"),
            compile(r"(?mR)^#### (.*)$"),
        ],
        list_item: compile(r"(?mR)^- (.*)$"),
    })
}

/// Compile one of the fixed patterns above.
fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        // The patterns are literals; failing here is a programming error.
        Err(e) => panic!("invalid built-in pattern {:?}: {}", pattern, e),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Formatting
// ─────────────────────────────────────────────────────────────────────────────

/// Replace `**text**` with `<strong>text</strong>` and nothing else.
///
/// Used for titles and subtitles, which never carry other markup.
pub fn format_bold(text: &str) -> String {
    rules()
        .bold
        .replace_all(text, "<strong>${1}</strong>")
        .into_owned()
}

/// Convert article body text into an HTML fragment.
///
/// # Example
///
/// ```
/// use folio::export::formatter::format_to_html;
///
/// let html = format_to_html("## Intro\n\n**Bold** and *soft*");
/// assert_eq!(
///     html,
///     "<p><h2>Intro</h2></p><p><strong>Bold</strong> and <em>soft</em></p>"
/// );
/// ```
pub fn format_to_html(content: &str) -> String {
    let rules = rules();

    let text = format_bold(content);
    let mut text = rules
        .italic
        .replace_all(&text, "<em>${1}</em>")
        .into_owned();

    for (level, heading) in rules.headings.iter().enumerate() {
        let replacement = format!("<h{n}>${{1}}</h{n}>", n = level + 1);
        text = heading.replace_all(&text, replacement.as_str()).into_owned();
    }

    let text = rules.list_item.replace_all(&text, "<li>${1}</li>");

    let body = text.replace("\n\n", "</p><p>").replace('\n', "<br>");
    format!("<p>{}</p>", body)
}

/// Build the HTML used for "Copy Full Article".
///
/// Title and subtitle only get bold substitution; the body gets the full pipeline.
pub fn build_full_article_html(title: &str, subtitle: &str, content: &str) -> String {
    format!(
        "<h1>{}</h1><h2>{}</h2><div>{}</div>",
        format_bold(title),
        format_bold(subtitle),
        format_to_html(content)
    )
}

/// Build the plain-text article. `content` is passed through untouched.
pub fn build_plain_article(title: &str, subtitle: &str, content: &str) -> String {
    format!("# {}\n\n## {}\n\n{}", title, subtitle, content)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
