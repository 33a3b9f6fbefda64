//! Markdown to HTML conversion for note bodies.
//!
//! Bodies go through [pulldown-cmark](https://docs.rs/pulldown-cmark) with
//! tables, footnotes and strikethrough enabled. Conversion never fails; the
//! cases that would otherwise corrupt the page or surprise the author are
//! degraded and reported as [`MarkupWarning`]s:
//!
//! - **Raw HTML** in a body is emitted as escaped text, so a stray `<div>`
//!   cannot unbalance the page template around it.
//! - **Unclosed delimiters** (`**bold`, `` `code``) are left by the parser as
//!   literal characters; they are reported so the author can fix them.
//! - **`javascript:` links** are rewritten to `#`.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, TextMergeStream, html::push_html};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupWarning {
    RawHtml(String),
    UnclosedDelimiter(String),
    UnsafeLink(String),
}

impl fmt::Display for MarkupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkupWarning::RawHtml(s) => write!(f, "raw HTML rendered as text: {s}"),
            MarkupWarning::UnclosedDelimiter(s) => {
                write!(f, "unclosed inline markup rendered as text: {s}")
            }
            MarkupWarning::UnsafeLink(s) => write!(f, "unsafe link target replaced: {s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub html: String,
    pub warnings: Vec<MarkupWarning>,
}

const SNIPPET_CHARS: usize = 40;

pub fn markdown_to_html(markdown: &str) -> Converted {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_FOOTNOTES | Options::ENABLE_STRIKETHROUGH;

    let mut events = Vec::new();
    let mut warnings = Vec::new();
    let mut in_code_block = false;

    for event in TextMergeStream::new(Parser::new_ext(markdown, options)) {
        events.push(match event {
            Event::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                event
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
                event
            }
            Event::Html(raw) | Event::InlineHtml(raw) => {
                warnings.push(MarkupWarning::RawHtml(snippet(raw.trim())));
                Event::Text(raw)
            }
            Event::Text(text) if !in_code_block => {
                if let Some(fragment) = unclosed_delimiter(&text) {
                    warnings.push(MarkupWarning::UnclosedDelimiter(fragment));
                }
                Event::Text(text)
            }
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                title,
                id,
            }) if is_script_url(&dest_url) => {
                warnings.push(MarkupWarning::UnsafeLink(snippet(&dest_url)));
                Event::Start(Tag::Link {
                    link_type,
                    dest_url: "#".into(),
                    title,
                    id,
                })
            }
            _ => event,
        });
    }

    let mut html = String::with_capacity(markdown.len() * 3 / 2);
    push_html(&mut html, events.into_iter());

    Converted { html, warnings }
}

fn is_script_url(url: &str) -> bool {
    let scheme: String = url
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(11)
        .collect();
    scheme.to_ascii_lowercase().starts_with("javascript:")
}

/// Fragment around a delimiter the parser left unmatched, if any.
///
/// A `*` or `_` run counts when it opens a word (start of text or after a
/// non-alphanumeric character, followed by a non-space), which is how an
/// unclosed emphasis looks once the parser has given up on it. Any literal
/// backtick outside code counts.
fn unclosed_delimiter(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        let hit = match c {
            '`' => true,
            '*' | '_' => {
                let opens = i == 0 || !chars[i - 1].is_alphanumeric() && chars[i - 1] != c;
                let next = chars[i + 1..].iter().find(|&&n| n != c);
                opens && next.is_some_and(|n| !n.is_whitespace())
            }
            _ => false,
        };
        if hit {
            let fragment: String = chars[i..].iter().collect();
            return Some(snippet(&fragment));
        }
    }
    None
}

fn snippet(text: &str) -> String {
    if text.chars().count() > SNIPPET_CHARS {
        let cut: String = text.chars().take(SNIPPET_CHARS).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(markdown: &str) -> String {
        markdown_to_html(markdown).html
    }

    #[test]
    fn headings_lists_and_emphasis() {
        let out = html("## Sub\n\n- one\n- **two**\n\n1. first\n2. *second*\n");
        assert!(out.contains("<h2>Sub</h2>"));
        assert!(out.contains("<ul>"));
        assert!(out.contains("<strong>two</strong>"));
        assert!(out.contains("<ol>"));
        assert!(out.contains("<em>second</em>"));
    }

    #[test]
    fn links_blockquotes_and_inline_code() {
        let out = html("> quoted\n\nSee [paper](https://doi.org/x) and `IL-6`.");
        assert!(out.contains("<blockquote>"));
        assert!(out.contains(r#"<a href="https://doi.org/x">paper</a>"#));
        assert!(out.contains("<code>IL-6</code>"));
    }

    #[test]
    fn tables_are_enabled() {
        let out = html("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(out.contains("<table>"));
    }

    #[test]
    fn clean_markdown_has_no_warnings() {
        let converted = markdown_to_html("Plain *emphasis*, snake_case and 2 * 3.\n");
        assert!(converted.warnings.is_empty(), "{:?}", converted.warnings);
    }

    #[test]
    fn unclosed_emphasis_degrades_to_text() {
        let converted = markdown_to_html("Some **unclosed emphasis here\n\nNext paragraph.");
        assert!(converted.html.contains("**unclosed emphasis here"));
        assert!(converted.html.contains("<p>Next paragraph.</p>"));
        assert!(!converted.html.contains("<strong>"));
        assert!(matches!(
            converted.warnings.as_slice(),
            [MarkupWarning::UnclosedDelimiter(_)]
        ));
    }

    #[test]
    fn unclosed_code_span_degrades_to_text() {
        let converted = markdown_to_html("Call `render( without closing");
        assert!(converted.html.contains("`render( without closing"));
        assert_eq!(converted.warnings.len(), 1);
    }

    #[test]
    fn raw_html_is_escaped() {
        let converted = markdown_to_html("Text <div class=\"x\"> more\n\n<script>alert(1)</script>\n");
        assert!(!converted.html.contains("<div"));
        assert!(!converted.html.contains("<script>"));
        assert!(converted.html.contains("&lt;script&gt;"));
        assert!(
            converted
                .warnings
                .iter()
                .all(|w| matches!(w, MarkupWarning::RawHtml(_)))
        );
        assert!(!converted.warnings.is_empty());
    }

    #[test]
    fn code_blocks_are_not_checked_for_delimiters() {
        let converted = markdown_to_html("```\nlet x = *ptr;\n```\n");
        assert!(converted.warnings.is_empty());
        assert!(converted.html.contains("<pre><code>"));
    }

    #[test]
    fn script_links_are_neutralised() {
        let converted = markdown_to_html("[click](javascript:alert(1))");
        assert!(converted.html.contains(r##"href="#""##));
        assert!(!converted.html.contains("javascript:"));
        assert!(matches!(
            converted.warnings.as_slice(),
            [MarkupWarning::UnsafeLink(_)]
        ));
    }

    #[test]
    fn snippet_truncates() {
        let long = "x".repeat(100);
        assert_eq!(snippet(&long).len(), SNIPPET_CHARS + 3);
    }
}
