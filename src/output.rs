//! Output formatting and styling module.
//!
//! Provides a centralized interface for all user-facing CLI output: per-file
//! move reports, warnings, and the end-of-pass summaries. Diagnostic detail
//! goes through the `log` facade instead.

use colored::*;
use std::path::Path;

const RULE: &str = "--------------------";

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sift::output::OutputFormatter;
    /// OutputFormatter::success("Sifting Complete!");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[Dry Run] {}", message).yellow());
    }

    /// Reports a completed move.
    pub fn moved(from: &Path, to: &Path) {
        println!("Moved {} -> {}", from.display(), to.display());
    }

    /// Reports a move that would happen under dry run.
    pub fn previewed(from: &Path, to: &Path) {
        Self::dry_run_notice(&format!("Move {} -> {}", from.display(), to.display()));
    }

    /// Prints the end-of-pass summary.
    pub fn organize_summary(files_moved: usize, files_skipped: usize) {
        println!("\n{}", RULE);
        Self::success("Sifting Complete!");
        println!("Files Moved: {}", files_moved.to_string().green());
        let skipped = files_skipped.to_string();
        println!(
            "Files Skipped (due to errors): {}",
            if files_skipped == 0 {
                skipped.normal()
            } else {
                skipped.red()
            }
        );
        println!("{}", RULE);
    }

    /// Prints the undo summary.
    pub fn undo_summary(files_reverted: usize, log_cleared: bool) {
        println!("\n{}", RULE);
        if log_cleared {
            Self::success("Undo Complete!");
        } else {
            Self::warning("Undo Incomplete");
        }
        println!("Files Reverted: {}", files_reverted.to_string().green());
        if log_cleared {
            println!("Undo log cleared.");
        }
        println!("{}", RULE);
    }
}
