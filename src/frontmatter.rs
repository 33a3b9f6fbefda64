//! Front-matter parsing for note sources.
//!
//! A note starts with a YAML block between two `---` lines, followed by the
//! Markdown body:
//!
//! ```text
//! ---
//! title: Inflammaging in one page
//! date: 2025-02-01
//! tags: [inflammation, aging]
//! category: basics
//! ---
//! # Inflammaging in one page
//! ...
//! ```
//!
//! ## Recognized keys
//!
//! - `title`: display title (optional here; see [`crate::document`] for fallbacks)
//! - `date`: `YYYY-MM-DD`; a trailing time part (`2025-01-01T09:30`) is ignored
//! - `tags`: a sequence (`[a, b]`, `["a", "b"]`) or a plain string; full-width
//!   `，` and `、` separators split items too
//! - `category`: one of the [`Category`] tokens, required
//! - `summary`: listing-page excerpt (optional)
//!
//! Keys are matched case-insensitively. Any other key is kept in
//! [`FrontMatter::extra`].
//!
//! ## Blockquote metadata
//!
//! Older notes carry date, tags and summary as blockquote lines at the top of
//! the body (`> Date: 2025-01-01`, `> 标签：炎症、衰老`). Only the first
//! blockquote of the body is read, optionally after a `# ` heading. Its
//! metadata lines fill in whatever the front matter leaves out and are
//! removed so the rendered page does not show them twice.

use crate::category::Category;
use gray_matter::{Matter, engine::YAML};
use jiff::civil::Date;
use serde::{
    Deserialize, Deserializer,
    de::{Error as DeError, Unexpected},
};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("no front matter block (file must start with a `---` line and close it with another)")]
    MissingFrontMatter,
    #[error("malformed front matter: {0}")]
    Malformed(String),
    #[error("{} (expected one of: basics, papers, pathways, stories)", describe_category(.0))]
    InvalidCategory(Option<String>),
    #[error("invalid date `{0}` (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

fn describe_category(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("unknown category `{v}`"),
        None => "missing `category`".to_string(),
    }
}

/// Metadata parsed from the front matter block (plus blockquote fallbacks).
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<Date>,
    pub tags: Vec<String>,
    pub category: Category,
    pub summary: Option<String>,
    /// Unrecognized keys, lowercased, in sorted order.
    pub extra: BTreeMap<String, String>,
}

/// A source file split into metadata and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSource {
    pub meta: FrontMatter,
    /// Markdown body with metadata blockquote lines removed.
    pub body: String,
}

/// A field value that failed to parse keeps its raw text for the error.
type Checked<T> = Result<T, String>;

#[derive(Deserialize)]
struct RawFrontMatter {
    #[serde(default, deserialize_with = "deserialize_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_date")]
    date: Option<Checked<Date>>,
    #[serde(default, deserialize_with = "deserialize_tags")]
    tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "deserialize_category")]
    category: Option<Checked<Category>>,
    #[serde(default, deserialize_with = "deserialize_text")]
    summary: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

/// Parse a note source into front matter and body.
pub fn parse(text: &str) -> Result<ParsedSource, ParseError> {
    let text = text.trim_start_matches('\u{feff}').trim_start();
    let parsed = Matter::<YAML>::new().parse(text);

    let data: Value = parsed
        .data
        .ok_or(ParseError::MissingFrontMatter)?
        .deserialize()
        .map_err(|e| ParseError::Malformed(e.to_string()))?;
    let Value::Object(fields) = data else {
        return Err(ParseError::Malformed(
            "expected `key: value` lines".to_string(),
        ));
    };
    let fields: Map<String, Value> = fields
        .into_iter()
        .map(|(key, value)| (key.to_lowercase(), value))
        .collect();
    let raw: RawFrontMatter = serde_json::from_value(Value::Object(fields))
        .map_err(|e| ParseError::Malformed(e.to_string()))?;

    let category = match raw.category {
        Some(checked) => checked.map_err(|raw| ParseError::InvalidCategory(Some(raw)))?,
        None => return Err(ParseError::InvalidCategory(None)),
    };
    let mut date = raw.date.transpose().map_err(ParseError::InvalidDate)?;
    let mut tags = raw.tags;
    let mut summary = raw.summary.filter(|s| !s.is_empty());

    let (found, body) = take_blockquote_meta(&parsed.content);
    for (field, value) in found {
        match field {
            BlockquoteField::Date => {
                if date.is_none() {
                    date = find_date(value);
                }
            }
            BlockquoteField::Tags => {
                if tags.is_none() {
                    tags = Some(split_tags(value, &[',', '，', '、']));
                }
            }
            BlockquoteField::Summary => {
                if summary.is_none() && !value.is_empty() {
                    summary = Some(value.to_string());
                }
            }
        }
    }

    let extra = raw
        .extra
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect();

    Ok(ParsedSource {
        meta: FrontMatter {
            title: raw.title.filter(|t| !t.is_empty()),
            date,
            tags: tags.unwrap_or_default(),
            category,
            summary,
            extra,
        },
        body,
    })
}

/// Text of a scalar value; `None` for null or an empty string.
fn scalar<E: DeError>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => {
            let s = s.trim();
            Ok((!s.is_empty()).then(|| s.to_string()))
        }
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) => Err(DeError::invalid_type(Unexpected::Seq, &"a single value")),
        Value::Object(_) => Err(DeError::invalid_type(Unexpected::Map, &"a single value")),
    }
}

fn deserialize_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    scalar(Value::deserialize(deserializer)?)
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<Checked<Date>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = scalar(Value::deserialize(deserializer)?)?;
    Ok(raw.map(|raw| {
        let day = raw.split(['T', ' ']).next().unwrap_or(&raw);
        day.parse::<Date>().map_err(|_| raw.clone())
    }))
}

fn deserialize_category<'de, D>(deserializer: D) -> Result<Option<Checked<Category>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = scalar(Value::deserialize(deserializer)?)?;
    Ok(raw.map(|raw| raw.parse::<Category>().map_err(|e| e.0)))
}

/// A sequence keeps its items, each split again on full-width separators. A
/// plain string is split on `,` as well.
fn deserialize_tags<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Array(items) => {
            let mut tags = Vec::new();
            for item in items {
                if let Some(text) = scalar::<D::Error>(item)? {
                    tags.extend(split_tags(&text, &['，', '、']));
                }
            }
            Ok(Some(tags))
        }
        other => Ok(Some(
            scalar::<D::Error>(other)?
                .map(|text| split_tags(&text, &[',', '，', '、']))
                .unwrap_or_default(),
        )),
    }
}

fn split_tags(value: &str, separators: &[char]) -> Vec<String> {
    value
        .split(separators)
        .map(|t| t.trim().trim_matches(['"', '\'']).trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// First `YYYY-MM-DD` substring that is a valid date.
fn find_date(text: &str) -> Option<Date> {
    let bytes = text.as_bytes();
    (0..bytes.len().saturating_sub(9)).find_map(|start| {
        let candidate = text.get(start..start + 10)?;
        let shape_ok = candidate.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
        if shape_ok {
            candidate.parse::<Date>().ok()
        } else {
            None
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockquoteField {
    Date,
    Tags,
    Summary,
}

const BLOCKQUOTE_LABELS: &[(&str, BlockquoteField)] = &[
    ("date", BlockquoteField::Date),
    ("日期", BlockquoteField::Date),
    ("tags", BlockquoteField::Tags),
    ("标签", BlockquoteField::Tags),
    ("summary", BlockquoteField::Summary),
    ("摘要", BlockquoteField::Summary),
];

/// Recognize `> Label: value` / `> 标签：value` metadata lines.
fn blockquote_field(line: &str) -> Option<(BlockquoteField, &str)> {
    let rest = line.trim_start().strip_prefix('>')?;
    let rest = rest.trim_start_matches(['>', ' ']);
    let (label, value) = rest.split_once([':', '：'])?;
    let label = label.trim();
    BLOCKQUOTE_LABELS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label))
        .map(|&(_, field)| (field, value.trim()))
}

/// Pull metadata lines out of the blockquote that opens the body.
///
/// The opening blockquote may follow blank lines and one `# ` heading. Any
/// other line ends the search, so later quotes and fenced code are never
/// read. Returns the fields found and the body without their lines.
fn take_blockquote_meta(body: &str) -> (Vec<(BlockquoteField, &str)>, String) {
    let lines: Vec<&str> = body.lines().collect();
    let skip_blank = |mut i: usize| {
        while i < lines.len() && lines[i].trim().is_empty() {
            i += 1;
        }
        i
    };

    let mut start = skip_blank(0);
    if lines.get(start).is_some_and(|l| l.starts_with("# ")) {
        start = skip_blank(start + 1);
    }

    let mut found = Vec::new();
    let mut consumed = Vec::new();
    for (i, line) in lines.iter().enumerate().skip(start) {
        if !line.trim_start().starts_with('>') {
            break;
        }
        if let Some(field) = blockquote_field(line) {
            found.push(field);
            consumed.push(i);
        }
    }

    if consumed.is_empty() {
        return (found, body.to_string());
    }
    let kept: Vec<&str> = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !consumed.contains(i))
        .map(|(_, line)| *line)
        .collect();
    (found, kept.join("\n"))
}
