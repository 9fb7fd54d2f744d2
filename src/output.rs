//! Output formatting and styling module.
//!
//! Everything the command line prints to the user goes through
//! [`OutputFormatter`]: progress lines, the per-category summary and the
//! spinner shown while files are being moved. Diagnostics go to `tracing`.

use crate::event::OrganizeEvent;
use crate::file_category::Category;
use crate::file_organizer::Summary;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints one progress event, colored by kind.
    pub fn event(event: &OrganizeEvent) {
        let line = event.to_string();
        match event {
            OrganizeEvent::Started { .. } => println!("{}", line.cyan()),
            OrganizeEvent::Moved { .. } => println!("{}", line.green()),
            OrganizeEvent::Planned { .. } => println!("{}", line.yellow()),
            OrganizeEvent::AlreadyExists { .. } | OrganizeEvent::Failed { .. } => {
                println!("{}", line.red())
            }
        }
    }

    /// Creates a spinner counting processed files.
    ///
    /// The spinner draws to stderr and hides itself when that is not a
    /// terminal.
    pub fn create_spinner() -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {pos} files processed {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb
    }

    /// Prints one line per category that received files.
    pub fn summary_lines(summary: &Summary, dry_run: bool) {
        for (category, count) in summary.iter() {
            println!("{}", summary_line(category, count, dry_run));
        }
    }

    /// Prints a summary table with file counts by category.
    pub fn summary_table(summary: &Summary) {
        Self::header("SUMMARY");

        let width = summary
            .iter()
            .map(|(category, _)| category.dir_name().len())
            .max()
            .unwrap_or(0)
            .max("Category".len());

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));

        for (category, count) in summary.iter() {
            println!(
                "{:<width$} | {} {}",
                category.dir_name(),
                count.to_string().green(),
                plural(count),
                width = width
            );
        }

        let total = summary.total();
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            plural(total),
            width = width
        );
    }
}

/// The closing line reported for one category.
///
/// ```
/// use sortdir::file_category::Category;
/// use sortdir::output::summary_line;
///
/// assert_eq!(
///     summary_line(Category::Images, 3, false),
///     "Successfully moved 3 files into the 'Images' folder."
/// );
/// ```
pub fn summary_line(category: Category, count: usize, dry_run: bool) -> String {
    if dry_run {
        format!("Would move {} files into the '{}' folder.", count, category)
    } else {
        format!(
            "Successfully moved {} files into the '{}' folder.",
            count, category
        )
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
