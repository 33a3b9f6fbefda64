//! Build orchestration.
//!
//! [`run`] drives one build from source directory to output directory:
//!
//! ```text
//! load config → scan + parse → route → render → write + prune
//! ```
//!
//! Parsing and rendering run on a local rayon pool sized from
//! `processing.max_threads`, so a library caller can run builds without
//! touching the global pool.
//!
//! Per-document problems (bad front matter, unreadable files, markup
//! warnings) never fail a run; they are collected into the [`BuildReport`].
//! Environment problems (missing source directory, invalid config, output
//! not writable) and duplicate slugs do.

use crate::category::Category;
use crate::config::{self, ConfigError, SiteConfig};
use crate::generate::{self, DocumentWarning, GenerateError, WriteSummary};
use crate::route::{self, RouteError};
use crate::scan::{self, ScanError, Skipped};
use log::{info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Render and write.
    Build,
    /// Render everything, write nothing.
    DryRun,
}

/// What one run did.
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub mode: Mode,
    pub output: PathBuf,
    /// Documents per category, in navigation order.
    pub per_category: Vec<(Category, usize)>,
    pub skipped: Vec<Skipped>,
    pub warnings: Vec<DocumentWarning>,
    /// Pages rendered, whether or not they were written.
    pub pages: usize,
    pub written: usize,
    pub pruned: Vec<String>,
}

impl BuildReport {
    pub fn processed(&self) -> usize {
        self.per_category.iter().map(|(_, n)| n).sum()
    }
}

/// Build the site from `source` into `output`.
pub fn run(source: &Path, output: &Path, mode: Mode) -> Result<BuildReport, PipelineError> {
    let config = config::load_config(source)?;
    let threads = config::effective_threads(&config.processing);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()?;
    pool.install(|| build(source, output, mode, &config))
}

fn build(
    source: &Path,
    output: &Path,
    mode: Mode,
    config: &SiteConfig,
) -> Result<BuildReport, PipelineError> {
    let scanned = scan::scan(source, config)?;
    for skipped in &scanned.skipped {
        warn!("skipping {}: {}", skipped.source_name, skipped.reason);
    }

    let routes = route::route(scanned.documents)?;
    info!(
        "routed {} notes ({} skipped) from {}",
        routes.len(),
        scanned.skipped.len(),
        source.display()
    );

    let site = generate::render_site(&routes, config);
    for w in &site.warnings {
        warn!("{}: {}", w.slug, w.warning);
    }

    let summary = match mode {
        Mode::Build => generate::write_site(&site, output, config)?,
        Mode::DryRun => WriteSummary::default(),
    };

    Ok(BuildReport {
        mode,
        output: output.to_path_buf(),
        per_category: routes.counts(),
        skipped: scanned.skipped,
        pages: site.pages.len(),
        warnings: site.warnings,
        written: summary.written,
        pruned: summary.pruned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn build_writes_pages_and_reports_counts() {
        let src = setup_scenario();
        let out = TempDir::new().unwrap();

        let report = run(src.path(), out.path(), Mode::Build).unwrap();

        assert_eq!(report.processed(), 3);
        assert_eq!(
            report.per_category,
            vec![
                (Category::Basics, 2),
                (Category::Papers, 1),
                (Category::Pathways, 0),
                (Category::Stories, 0),
            ]
        );
        assert_eq!(report.pages, 7);
        assert_eq!(report.written, 7);
        assert!(out.path().join("basics.html").exists());
        assert!(out.path().join("notes/c/index.html").exists());
    }

    #[test]
    fn dry_run_writes_nothing() {
        let src = setup_scenario();
        let out = TempDir::new().unwrap();
        let target = out.path().join("site");

        let report = run(src.path(), &target, Mode::DryRun).unwrap();

        assert_eq!(report.pages, 7);
        assert_eq!(report.written, 0);
        assert!(!target.exists());
    }

    #[test]
    fn config_in_source_dir_is_applied() {
        let src = setup_scenario();
        fs::write(src.path().join("config.toml"), "notes_dir = \"articles\"\n").unwrap();
        let out = TempDir::new().unwrap();

        run(src.path(), out.path(), Mode::Build).unwrap();

        assert!(out.path().join("articles/a/index.html").exists());
        assert!(!out.path().join("notes").exists());
    }

    #[test]
    fn invalid_config_is_fatal() {
        let src = setup_scenario();
        fs::write(src.path().join("config.toml"), "excerpt_length = 0\n").unwrap();
        let out = TempDir::new().unwrap();

        let err = run(src.path(), out.path(), Mode::Build).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn missing_source_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let err = run(&tmp.path().join("nope"), tmp.path(), Mode::Build).unwrap_err();
        assert!(matches!(err, PipelineError::Scan(ScanError::MissingSource(_))));
    }

    #[test]
    fn skipped_documents_do_not_fail_the_run() {
        let src = setup_scenario();
        fs::write(src.path().join("bare.md"), "No front matter.\n").unwrap();
        let out = TempDir::new().unwrap();

        let report = run(src.path(), out.path(), Mode::Build).unwrap();
        assert_eq!(report.processed(), 3);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].source_name, "bare.md");
    }

    #[test]
    fn single_thread_matches_default_output() {
        let src = setup_scenario();
        let parallel = TempDir::new().unwrap();
        run(src.path(), parallel.path(), Mode::Build).unwrap();

        fs::write(
            src.path().join("config.toml"),
            "[processing]\nmax_threads = 1\n",
        )
        .unwrap();
        let serial = TempDir::new().unwrap();
        run(src.path(), serial.path(), Mode::Build).unwrap();

        for page in ["basics.html", "papers.html", "notes/a/index.html"] {
            assert_eq!(
                fs::read(parallel.path().join(page)).unwrap(),
                fs::read(serial.path().join(page)).unwrap(),
                "{page}"
            );
        }
    }
}
