//! Shared test utilities for the notes-site test suite.
//!
//! Fixture writers for source directories and a constructor for in-memory
//! documents, so routing and rendering tests don't need the filesystem.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_scenario();
//! write_note(tmp.path(), "d.md", "stories", None, "Body");
//!
//! let note = doc("a.md", Category::Basics, Some("2025-01-01"));
//! assert_eq!(note.slug, "a");
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::category::Category;
use crate::document::{Document, slug_for_stem};

// =========================================================================
// Fixture setup
// =========================================================================

/// Write a note source with a minimal front matter block.
pub fn write_note(dir: &Path, name: &str, category: &str, date: Option<&str>, body: &str) {
    let mut text = format!("---\ncategory: {category}\n");
    if let Some(date) = date {
        text.push_str(&format!("date: {date}\n"));
    }
    text.push_str("---\n");
    text.push_str(body);
    fs::write(dir.join(name), text).unwrap();
}

/// Source directory with three notes:
///
/// | File   | Category | Date       |
/// |--------|----------|------------|
/// | `a.md` | basics   | 2025-01-01 |
/// | `b.md` | basics   | 2025-02-01 |
/// | `c.md` | papers   | 2025-01-15 |
pub fn setup_scenario() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_note(tmp.path(), "a.md", "basics", Some("2025-01-01"), "# Note A\n\nFirst note.\n");
    write_note(tmp.path(), "b.md", "basics", Some("2025-02-01"), "# Note B\n\nSecond note.\n");
    write_note(tmp.path(), "c.md", "papers", Some("2025-01-15"), "# Note C\n\nA paper.\n");
    tmp
}

// =========================================================================
// In-memory documents
// =========================================================================

/// A document named after `source_name`, with an empty body and no tags.
pub fn doc(source_name: &str, category: Category, date: Option<&str>) -> Document {
    let stem = source_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(source_name);
    Document {
        title: stem.to_string(),
        date: date.map(|d| d.parse().unwrap()),
        tags: Vec::new(),
        category,
        summary: String::new(),
        extra: BTreeMap::new(),
        body: String::new(),
        slug: slug_for_stem(stem),
        source_name: source_name.to_string(),
    }
}
