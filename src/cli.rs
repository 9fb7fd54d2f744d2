//! Command-line interface module for sortdir.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Logging setup
//! - Running the organizer on a background thread while events are printed
//! - Rendering the final summary or JSON report

use crate::config::{ExcludeRules, FilterConfig};
use crate::event::OrganizeEvent;
use crate::file_organizer::{OrganizeError, OrganizeResult, Organizer, Summary};
use crate::output::OutputFormatter;
use crate::worker::spawn_organize;
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, ValueHint};
use indicatif::ProgressBar;
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sort the files of a directory into category folders by extension.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Directory whose files should be organized
    #[arg(value_hint = ValueHint::DirPath)]
    pub directory: PathBuf,

    /// Show where files would go without moving anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Leave files starting with a dot in place
    #[arg(long)]
    pub skip_hidden: bool,

    /// Leave files with this exact name in place
    #[arg(long = "exclude", value_name = "NAME")]
    pub exclude_names: Vec<String>,

    /// Leave files with this extension in place
    #[arg(long = "exclude-ext", value_name = "EXT")]
    pub exclude_extensions: Vec<String>,

    /// Leave files whose name matches this glob in place
    #[arg(long = "exclude-glob", value_name = "GLOB")]
    pub exclude_globs: Vec<String>,

    /// Leave files whose name matches this regex in place
    #[arg(long = "exclude-regex", value_name = "REGEX")]
    pub exclude_regexes: Vec<String>,

    /// Print a JSON report instead of the human-readable summary
    #[arg(long)]
    pub json: bool,

    /// Only print the summary
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Collects the filter flags into a [`FilterConfig`].
    pub fn filter_config(&self) -> FilterConfig {
        FilterConfig {
            skip_hidden: self.skip_hidden,
            exclude: ExcludeRules {
                filenames: self.exclude_names.clone(),
                patterns: self.exclude_globs.clone(),
                extensions: self.exclude_extensions.clone(),
                regex: self.exclude_regexes.clone(),
            },
        }
    }

    fn prints_events(&self) -> bool {
        !self.quiet && !self.json
    }
}

/// A file that could not be moved, as listed in the JSON report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub file_name: String,
    pub reason: String,
}

/// Everything known about a finished run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub directory: PathBuf,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub summary: Summary,
    pub moved: usize,
    pub failed: Vec<FailedFile>,
}

/// Installs the `tracing` subscriber used by the binary.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` picks the level for this
/// crate. Logs go to stderr so they never mix with the progress lines.
pub fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "sortdir=error",
        1 => "sortdir=info",
        2 => "sortdir=debug",
        _ => "sortdir=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Runs one organization as described by `args`.
///
/// The organizer works on a background thread; its events are printed here
/// as they arrive.
///
/// # Errors
///
/// Fails when the directory does not exist or is not a directory, when the
/// filter flags do not compile, or when listing the directory fails.
pub fn run_cli(args: &Args) -> OrganizeResult<RunReport> {
    let directory = &args.directory;
    if !directory.is_dir() {
        let kind = if directory.exists() {
            io::ErrorKind::NotADirectory
        } else {
            io::ErrorKind::NotFound
        };
        return Err(OrganizeError::ListDirectory {
            path: directory.clone(),
            source: io::Error::new(kind, "not an existing directory"),
        });
    }

    let filters = args.filter_config();
    tracing::debug!(?filters, "filters configured");
    let organizer = Organizer::new()
        .with_filters(filters.compile()?)
        .dry_run(args.dry_run);

    let started_at = Utc::now();
    let handle = spawn_organize(organizer, directory.clone());

    let spinner = if args.prints_events() {
        OutputFormatter::create_spinner()
    } else {
        ProgressBar::hidden()
    };

    let mut failed = Vec::new();
    for event in handle.events() {
        if args.prints_events() {
            spinner.suspend(|| OutputFormatter::event(&event));
        }
        match event {
            OrganizeEvent::Started { .. } => continue,
            OrganizeEvent::AlreadyExists { file_name } => failed.push(FailedFile {
                file_name,
                reason: "Target file already exists.".to_string(),
            }),
            OrganizeEvent::Failed { file_name, reason } => {
                failed.push(FailedFile { file_name, reason })
            }
            OrganizeEvent::Moved { .. } | OrganizeEvent::Planned { .. } => {}
        }
        spinner.inc(1);
    }
    spinner.finish_and_clear();

    let summary = handle.join()?;
    Ok(RunReport {
        directory: directory.clone(),
        dry_run: args.dry_run,
        started_at,
        finished_at: Utc::now(),
        moved: summary.total(),
        summary,
        failed,
    })
}

/// Prints the outcome of a run, either as JSON or for humans.
pub fn print_report(report: &RunReport, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    if report.dry_run {
        OutputFormatter::header("--- DRY RUN COMPLETE, NOTHING WAS MOVED ---");
    } else {
        OutputFormatter::header("--- ORGANIZATION COMPLETE! ---");
    }

    if report.summary.is_empty() {
        println!("No files to organize in {}.", report.directory.display());
    } else {
        OutputFormatter::summary_lines(&report.summary, report.dry_run);
        OutputFormatter::summary_table(&report.summary);
    }

    if !report.failed.is_empty() {
        OutputFormatter::warning(&format!(
            "{} files could not be moved. Please review the errors above.",
            report.failed.len()
        ));
    }
    Ok(())
}
