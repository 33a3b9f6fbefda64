//! The parsed note and the values derived from it.
//!
//! A [`Document`] is built once per build from one source file and never
//! persisted. Besides the front matter it carries two derived values:
//!
//! - **slug**: the detail page directory name, derived from the file stem
//!   (`Inflammaging 101.md` → `inflammaging-101`). Letters that do not fold
//!   to ASCII (e.g. `炎症衰老.md`) are replaced by the first eight hex digits
//!   of the stem's SHA-256: `note-<hash>` when nothing else is left, and
//!   `<ascii>-<hash>` for mixed stems such as `2025-炎症`.
//! - **summary**: the author's `summary` if given, otherwise the first body
//!   paragraph with Markdown stripped, truncated for listing cards.

use crate::category::Category;
use crate::frontmatter::{self, ParseError};
use jiff::civil::Date;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Display text for notes without a date.
pub const UNDATED: &str = "未注明日期";
/// Display text for notes without tags.
pub const NO_TAGS: &str = "暂无标签";

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub date: Option<Date>,
    pub tags: Vec<String>,
    pub category: Category,
    pub summary: String,
    pub extra: BTreeMap<String, String>,
    /// Raw Markdown body.
    pub body: String,
    pub slug: String,
    /// Source file name, e.g. `inflammaging.md`. Tie-breaker for ordering.
    pub source_name: String,
}

impl Document {
    /// Build a document from a source file's name and text.
    ///
    /// Title resolution: front-matter `title` → first `# ` heading → file stem.
    pub fn from_source(
        source_name: &str,
        text: &str,
        excerpt_length: usize,
    ) -> Result<Self, ParseError> {
        let parsed = frontmatter::parse(text)?;
        let stem = file_stem(source_name);

        let title = parsed
            .meta
            .title
            .or_else(|| first_heading(&parsed.body))
            .unwrap_or_else(|| stem.to_string());

        let summary = parsed
            .meta
            .summary
            .unwrap_or_else(|| excerpt(&parsed.body, excerpt_length));

        Ok(Self {
            title,
            date: parsed.meta.date,
            tags: parsed.meta.tags,
            category: parsed.meta.category,
            summary,
            extra: parsed.meta.extra,
            body: parsed.body,
            slug: slug_for_stem(stem),
            source_name: source_name.to_string(),
        })
    }

    pub fn date_display(&self) -> String {
        self.date
            .map(|d| d.to_string())
            .unwrap_or_else(|| UNDATED.to_string())
    }

    /// `2025-01-01 · tag-a，tag-b`
    pub fn meta_line(&self) -> String {
        let tags = if self.tags.is_empty() {
            NO_TAGS.to_string()
        } else {
            self.tags.join("，")
        };
        format!("{} · {}", self.date_display(), tags)
    }
}

fn file_stem(source_name: &str) -> &str {
    match source_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => source_name,
    }
}

fn first_heading(body: &str) -> Option<String> {
    body.lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
}

/// Slug for a file stem, with a hash suffix when letters were dropped.
pub fn slug_for_stem(stem: &str) -> String {
    let slug = slugify(stem);
    let dropped = stem
        .chars()
        .any(|c| c.is_alphanumeric() && fold_char(c).is_none());
    if !dropped {
        return if slug.is_empty() { "note".to_string() } else { slug };
    }
    let digest = format!("{:x}", Sha256::digest(stem.as_bytes()));
    let hash = &digest[..8];
    if slug.is_empty() {
        format!("note-{hash}")
    } else {
        format!("{slug}-{hash}")
    }
}

/// Lowercase ASCII slug: `[a-z0-9]` runs joined by single dashes.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        match fold_char(c) {
            Some(c) => {
                if pending_dash && !slug.is_empty() {
                    slug.push('-');
                }
                pending_dash = false;
                slug.push(c);
            }
            None => pending_dash = true,
        }
    }
    slug
}

/// Fold a character to a lowercase `[a-z0-9]`, or `None` for a separator.
///
/// Covers ASCII and the Latin-1 accented letters; everything else separates.
fn fold_char(c: char) -> Option<char> {
    if c.is_ascii_alphanumeric() {
        return Some(c.to_ascii_lowercase());
    }
    let folded = match c.to_lowercase().next()? {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(folded)
}

/// Excerpt from the first prose paragraph of a body.
///
/// Headings, blockquotes and fenced code are skipped. Markdown syntax is
/// stripped and the result is cut to `max_chars` characters with a trailing `…`.
pub fn excerpt(body: &str, max_chars: usize) -> String {
    let mut paragraph: Vec<&str> = Vec::new();
    let mut fence: Option<&str> = None;
    for line in body.lines() {
        let trimmed = line.trim();
        if let Some(marker) = fence {
            if trimmed.starts_with(marker) {
                fence = None;
            }
            continue;
        }
        if let Some(marker) = fence_marker(trimmed) {
            if !paragraph.is_empty() {
                break;
            }
            fence = Some(marker);
            continue;
        }
        let is_break = trimmed.is_empty()
            || trimmed.starts_with('>')
            || trimmed.starts_with('#')
            || is_rule(trimmed);
        if is_break {
            if paragraph.is_empty() {
                continue;
            }
            break;
        }
        paragraph.push(trimmed);
    }

    let plain = paragraph
        .iter()
        .map(|line| strip_markdown(line))
        .collect::<Vec<_>>()
        .join(" ");
    let plain = plain.trim();

    if plain.chars().count() > max_chars {
        let cut: String = plain.chars().take(max_chars).collect();
        format!("{}…", cut.trim_end())
    } else {
        plain.to_string()
    }
}

fn fence_marker(line: &str) -> Option<&'static str> {
    ["```", "~~~"].into_iter().find(|m| line.starts_with(*m))
}

fn is_rule(line: &str) -> bool {
    let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|&m| compact.chars().all(|c| c == m))
}

/// Remove inline Markdown syntax from a single line for plain-text display.
fn strip_markdown(line: &str) -> String {
    let line = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("+ "))
        .unwrap_or(line);
    strip_links(line)
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '~' | '`'))
        .collect()
}

/// `[text](url)` → `text`
fn strip_links(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        let Some(close) = after.find("](") else {
            break;
        };
        let Some(end) = after[close + 2..].find(')') else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push_str(&after[..close]);
        rest = &after[close + 2 + end + 1..];
    }
    out.push_str(rest);
    out
}
