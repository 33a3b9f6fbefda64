//! # Notes Site
//!
//! A static site builder for a collection of Markdown research notes.
//! Each note is a Markdown file with a front matter block; the build renders
//! one detail page per note and one listing page per category.
//!
//! # Architecture: Single-Pass Pipeline
//!
//! ```text
//! 1. Scan      notes-src/*.md  →  Vec<Document>   (files → parsed notes)
//! 2. Route     Vec<Document>   →  Routes          (notes → category groups)
//! 3. Generate  Routes          →  site/           (groups → HTML pages)
//! ```
//!
//! Nothing is cached between runs. Every build re-derives the whole site from
//! the sources, and the same sources always produce byte-identical output.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`frontmatter`] | Splits a source file into its metadata block and body |
//! | [`document`] | The parsed note: title fallback, slug and excerpt derivation |
//! | [`category`] | The closed set of site sections and their page metadata |
//! | [`scan`] | Stage 1: lists and parses sources, isolating per-file failures |
//! | [`route`] | Stage 2: groups notes by category, newest first; rejects duplicate slugs |
//! | [`markup`] | Markdown → HTML for note bodies, with degraded-markup warnings |
//! | [`render`] | Maud templates for listing and detail pages |
//! | [`generate`] | Stage 3: renders all pages, writes them, prunes stale detail pages |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`pipeline`] | Runs the stages on a sized rayon pool and collects a report |
//! | [`output`] | CLI formatting of the build report |
//! | [`logging`] | stderr logger setup |
//!
//! # Design Decisions
//!
//! ## Bad Notes Are Skipped, Not Fatal
//!
//! A note with no front matter, an unknown category or a malformed date is
//! left out of the site and named in the build summary. The rest of the site
//! still builds. Only environment problems (unreadable source directory,
//! invalid config, unwritable output) and duplicate slugs stop a build.
//!
//! ## Closed Category Set
//!
//! The four categories are an enum, not strings. A typo in `category:` is a
//! reported error instead of a note quietly filed under a default page.
//!
//! ## Maud Over Template Engines
//!
//! Pages are rendered with [Maud](https://maud.lambda.xyz/). Every
//! interpolated value is escaped, so note titles and tags cannot inject
//! markup.

pub mod category;
pub mod config;
pub mod document;
pub mod frontmatter;
pub mod generate;
pub mod logging;
pub mod markup;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod route;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
