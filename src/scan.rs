//! Source directory scanning.
//!
//! First stage of the build: list the note sources, read and parse each
//! one, and sort the results into documents and skipped files.
//!
//! ## Source layout
//!
//! ```text
//! notes-src/
//! ├── config.toml               # Site configuration (optional)
//! ├── inflammaging-101.md       # A note
//! ├── il-6-paper.markdown       # Also a note
//! ├── .draft.md                 # Hidden: ignored
//! └── images/                   # Subdirectories: ignored
//! ```
//!
//! Only `*.md` and `*.markdown` files directly inside the source directory
//! are notes. They are visited in file name order.
//!
//! ## Failure isolation
//!
//! A file that cannot be read or parsed does not stop the scan: it is
//! recorded as a [`Skipped`] entry with its reason and the remaining files
//! carry on. Only a missing or unlistable source directory is an error.

use crate::config::SiteConfig;
use crate::document::Document;
use crate::frontmatter::ParseError;
use log::debug;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("source directory not found: {0}")]
    MissingSource(PathBuf),
    #[error("failed to list source directory {path}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Why a source file was left out of the build.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SkipReason {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("unreadable: {0}")]
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub source_name: String,
    pub reason: SkipReason,
}

#[derive(Debug)]
pub struct ScanResult {
    /// Parsed documents in file name order.
    pub documents: Vec<Document>,
    /// Files that failed to read or parse, in file name order.
    pub skipped: Vec<Skipped>,
}

pub const SOURCE_EXTENSIONS: &[&str] = &["md", "markdown"];

/// Scan `root` for note sources and parse them.
///
/// Parsing runs on the current rayon pool; result order is file name order
/// regardless of thread count.
pub fn scan(root: &Path, config: &SiteConfig) -> Result<ScanResult, ScanError> {
    let sources = collect_sources(root)?;
    debug!("found {} note sources in {}", sources.len(), root.display());

    let loaded: Vec<(String, Result<Document, SkipReason>)> = sources
        .par_iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let result = load_document(path, &name, config.excerpt_length);
            (name, result)
        })
        .collect();

    let mut documents = Vec::new();
    let mut skipped = Vec::new();
    for (source_name, result) in loaded {
        match result {
            Ok(doc) => documents.push(doc),
            Err(reason) => skipped.push(Skipped {
                source_name,
                reason,
            }),
        }
    }

    Ok(ScanResult { documents, skipped })
}

fn load_document(path: &Path, name: &str, excerpt_length: usize) -> Result<Document, SkipReason> {
    let text = fs::read_to_string(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    Ok(Document::from_source(name, &text, excerpt_length)?)
}

/// Note source paths directly inside `root`, sorted by file name.
fn collect_sources(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingSource(root.to_path_buf()));
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ScanError::List {
            path: root.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() && is_source(entry.path()) {
            sources.push(entry.into_path());
        }
    }
    Ok(sources)
}

fn is_source(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .map(|n| n.to_string_lossy().starts_with('.'))
        .unwrap_or(true);
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    !hidden && SOURCE_EXTENSIONS.contains(&ext.as_str())
}
