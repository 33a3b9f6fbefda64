//! CLI output formatting for the build summary.
//!
//! # Output Format
//!
//! ```text
//! Basics｜基础概念 → basics.html (2 notes)
//! Papers｜论文拆解 → papers.html (1 note)
//! Pathways & Methods｜通路与方法区 → pathways-methods.html (0 notes)
//! Stories & Evolution｜人类演化 & 疾病小随笔 → stories-evolution.html (0 notes)
//!
//! Skipped
//!     bare.md: no front matter block (...)
//!
//! Warnings
//!     il-6-paper: unclosed inline markup rendered as text: **IL-6
//!
//! Processed 3 notes, skipped 1, 1 markup warning
//! Wrote 7 pages to site, pruned 1 stale
//! ```
//!
//! # Architecture
//!
//! [`format_summary`] returns `Vec<String>` for testability and
//! [`print_summary`] writes it to stdout. The format function is pure.

use crate::pipeline::{BuildReport, Mode};

/// `1 note`, `2 notes`
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

pub fn format_summary(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (category, n) in &report.per_category {
        lines.push(format!(
            "{} → {} ({})",
            category.page_title(),
            category.listing_file(),
            count(*n, "note")
        ));
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for skipped in &report.skipped {
            lines.push(format!(
                "{}{}: {}",
                indent(1),
                skipped.source_name,
                skipped.reason
            ));
        }
    }

    if !report.warnings.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for w in &report.warnings {
            lines.push(format!("{}{}: {}", indent(1), w.slug, w.warning));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Processed {}, skipped {}, {}",
        count(report.processed(), "note"),
        report.skipped.len(),
        count(report.warnings.len(), "markup warning")
    ));

    lines.push(match report.mode {
        Mode::Build => {
            let mut line = format!(
                "Wrote {} to {}",
                count(report.written, "page"),
                report.output.display()
            );
            if !report.pruned.is_empty() {
                line.push_str(&format!(", pruned {} stale", report.pruned.len()));
            }
            line
        }
        Mode::DryRun => format!(
            "Dry run: {} rendered, nothing written to {}",
            count(report.pages, "page"),
            report.output.display()
        ),
    });

    lines
}

/// Print the build summary to stdout.
pub fn print_summary(report: &BuildReport) {
    for line in format_summary(report) {
        println!("{}", line);
    }
}
