use clap::{Parser, Subcommand};
use notes_site::pipeline::{self, Mode};
use notes_site::{config, logging, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "notes-site")]
#[command(about = "Static site builder for Markdown research notes")]
#[command(long_about = "\
Static site builder for Markdown research notes

Every .md file in the source directory is a note. It starts with a front
matter block that names its category:

  ---
  title: Inflammaging 101
  date: 2025-01-01
  tags: [IL-6, SASP]
  category: basics
  ---
  Body in Markdown...

Categories: basics, papers, pathways, stories.

Output structure:

  site/
  ├── basics.html                  # One listing page per category
  ├── papers.html
  ├── pathways-methods.html
  ├── stories-evolution.html
  └── notes/
      └── inflammaging-101/
          └── index.html           # One detail page per note

Notes with missing or invalid front matter are skipped and listed in the
summary; the rest of the site still builds.

Run 'notes-site gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Notes source directory
    #[arg(long, default_value = "notes-src", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "site", global = true)]
    output: PathBuf,

    /// Render everything but write nothing
    #[arg(long, global = true)]
    dry_run: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the site (default)
    Build,
    /// Parse and render without writing; fails if any note was skipped
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let _logger = logging::init_logging(cli.verbose, cli.quiet)?;

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let mode = if cli.dry_run { Mode::DryRun } else { Mode::Build };
            let report = pipeline::run(&cli.source, &cli.output, mode)?;
            output::print_summary(&report);
        }
        Command::Check => {
            let report = pipeline::run(&cli.source, &cli.output, Mode::DryRun)?;
            output::print_summary(&report);
            if !report.skipped.is_empty() {
                return Err(format!("{} note(s) failed to parse", report.skipped.len()).into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
