//! Site generation module.
//!
//! Final stage of the build: turns routed documents into HTML pages and
//! writes them to the output directory.
//!
//! Generation is split into two steps so that a dry run can do all the work
//! except touching the filesystem:
//!
//! 1. [`render_site`] converts every body and renders every page in memory.
//!    Detail pages render in parallel on the current rayon pool; the page
//!    list comes back in a fixed order regardless of thread count.
//! 2. [`write_site`] writes the pages and prunes stale detail pages.
//!
//! ## Output Structure
//!
//! ```text
//! site/
//! ├── basics.html                  # One listing page per category,
//! ├── papers.html                  # always written, even when empty
//! ├── pathways-methods.html
//! ├── stories-evolution.html
//! └── notes/
//!     ├── inflammaging-101/
//!     │   └── index.html           # Detail page
//!     └── il-6-paper/
//!         └── index.html
//! ```
//!
//! Anything else in the output directory (stylesheet, home page, contact
//! page) is left alone. Inside `notes/`, a directory holding only
//! `index.html` whose name is no longer a current slug is removed, so deleted
//! or renamed notes do not linger. Asset folders are never touched.

use crate::category::Category;
use crate::config::SiteConfig;
use crate::markup::{self, MarkupWarning};
use crate::render;
use crate::route::Routes;
use log::debug;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DETAIL_FILE: &str = "index.html";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prune stale pages in {path}: {source}")]
    Prune {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// Path relative to the output directory.
    pub path: PathBuf,
    pub html: String,
}

/// A markup warning attributed to the note it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentWarning {
    pub slug: String,
    pub warning: MarkupWarning,
}

#[derive(Debug, Clone, Default)]
pub struct RenderedSite {
    /// Detail pages in routing order, then listing pages in navigation order.
    pub pages: Vec<RenderedPage>,
    pub warnings: Vec<DocumentWarning>,
    /// Slugs of all detail pages; everything else under `notes_dir` is stale.
    pub slugs: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteSummary {
    pub written: usize,
    /// Names of removed stale detail directories, sorted.
    pub pruned: Vec<String>,
}

/// Render every page of the site in memory.
pub fn render_site(routes: &Routes, config: &SiteConfig) -> RenderedSite {
    let documents: Vec<_> = routes.documents().collect();

    let details: Vec<(RenderedPage, Vec<DocumentWarning>)> = documents
        .par_iter()
        .map(|doc| {
            let converted = markup::markdown_to_html(&doc.body);
            let html = render::render_detail_page(doc, &converted.html, config).into_string();
            let warnings = converted
                .warnings
                .into_iter()
                .map(|warning| DocumentWarning {
                    slug: doc.slug.clone(),
                    warning,
                })
                .collect();
            let page = RenderedPage {
                path: detail_path(config, &doc.slug),
                html,
            };
            (page, warnings)
        })
        .collect();

    let mut site = RenderedSite {
        slugs: documents.iter().map(|d| d.slug.clone()).collect(),
        ..RenderedSite::default()
    };
    for (page, warnings) in details {
        site.pages.push(page);
        site.warnings.extend(warnings);
    }

    for category in Category::ALL {
        let html = render::render_listing_page(routes.group(category), config).into_string();
        site.pages.push(RenderedPage {
            path: PathBuf::from(category.listing_file()),
            html,
        });
    }

    site
}

/// Detail page path relative to the output directory.
pub fn detail_path(config: &SiteConfig, slug: &str) -> PathBuf {
    Path::new(&config.notes_dir).join(slug).join(DETAIL_FILE)
}

/// Write rendered pages under `output_dir` and prune stale detail pages.
///
/// Existing files are overwritten.
pub fn write_site(
    site: &RenderedSite,
    output_dir: &Path,
    config: &SiteConfig,
) -> Result<WriteSummary, GenerateError> {
    let mut summary = WriteSummary::default();

    for page in &site.pages {
        let path = output_dir.join(&page.path);
        write_page(&path, &page.html)?;
        debug!("wrote {}", path.display());
        summary.written += 1;
    }

    summary.pruned = prune_stale(&output_dir.join(&config.notes_dir), &site.slugs)?;
    Ok(summary)
}

fn write_page(path: &Path, html: &str) -> Result<(), GenerateError> {
    let to_error = |source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(path, html).map_err(to_error)
}

/// Remove detail page directories of `notes_root` not named after a current
/// slug. A directory counts as a detail page only if it holds nothing but
/// `index.html`; anything else under `notes_root` is left alone.
fn prune_stale(notes_root: &Path, slugs: &BTreeSet<String>) -> Result<Vec<String>, GenerateError> {
    if !notes_root.is_dir() {
        return Ok(Vec::new());
    }
    let to_error = |source| GenerateError::Prune {
        path: notes_root.to_path_buf(),
        source,
    };

    let mut pruned = Vec::new();
    for entry in fs::read_dir(notes_root).map_err(to_error)? {
        let entry = entry.map_err(to_error)?;
        if !entry.file_type().map_err(to_error)?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !slugs.contains(&name) && is_detail_dir(&entry.path()).map_err(to_error)? {
            fs::remove_dir_all(entry.path()).map_err(to_error)?;
            debug!("pruned stale {}", entry.path().display());
            pruned.push(name);
        }
    }
    pruned.sort();
    Ok(pruned)
}

fn is_detail_dir(dir: &Path) -> io::Result<bool> {
    let mut entries = fs::read_dir(dir)?;
    let Some(first) = entries.next().transpose()? else {
        return Ok(false);
    };
    Ok(first.file_name() == DETAIL_FILE
        && first.file_type()?.is_file()
        && entries.next().is_none())
}
