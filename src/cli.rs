//! Command-line interface module for sift.
//!
//! This module handles all CLI-related functionality including:
//! - Command and flag definitions
//! - Loading rules and building the exclusion set
//! - Running an organize or undo pass
//! - Reporting every per-file outcome and the final summary

use crate::config::{RuleConfig, parse_exclude_list};
use crate::file_category::RuleSet;
use crate::file_organizer::{FileOrganizer, FileOutcome, OrganizeMode, OrganizeOptions};
use crate::output::OutputFormatter;
use crate::undo::UndoManager;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Sort files into category or date sub-folders, with dry-run and undo.
#[derive(Debug, Parser)]
#[command(author, version, name = "sift", about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Print debug information (pruned directories, each reverted file)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Organize files in a directory.
    Organize(OrganizeArgs),
    /// Undo the previous organization.
    Undo(UndoArgs),
}

#[derive(Debug, Clone, Args)]
pub struct OrganizeArgs {
    /// The source directory to organize
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub source: PathBuf,

    /// Simulate the organization without moving files
    #[arg(short, long)]
    pub dry_run: bool,

    /// Path to a custom TOML config file
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Organize files by date (YYYY/MM-Month)
    #[arg(short, long)]
    pub by_date: bool,

    /// Comma-separated list of folder names to exclude
    #[arg(short, long, value_name = "FOLDERS")]
    pub exclude: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct UndoArgs {
    /// The directory where the organization was performed
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub source: PathBuf,
}

/// Runs the CLI application with the given command.
///
/// # Examples
///
/// ```no_run
/// use sift::cli::{run_cli, Command, UndoArgs};
/// use std::path::PathBuf;
///
/// let command = Command::Undo(UndoArgs { source: PathBuf::from("/path/to/directory") });
/// match run_cli(&command) {
///     Ok(()) => println!("Operation completed successfully"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(command: &Command) -> Result<(), String> {
    match command {
        Command::Organize(args) => organize_directory(args),
        Command::Undo(args) => undo_organization(&args.source),
    }
}

/// Organizes a directory by type or by date.
///
/// This function:
/// 1. Loads the rule configuration (if available)
/// 2. Merges configured and command-line exclusions
/// 3. Runs one organize pass
/// 4. Reports every moved, previewed, or failed file as it happens
/// 5. Prints the moved/skipped summary
fn organize_directory(args: &OrganizeArgs) -> Result<(), String> {
    OutputFormatter::header("Welcome to Sift - Your Smart File Organizer!");

    let config = RuleConfig::load(args.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let extra_exclusions = args
        .exclude
        .as_deref()
        .map(parse_exclude_list)
        .unwrap_or_default();
    let options = OrganizeOptions {
        dry_run: args.dry_run,
        exclusions: config.exclusion_set(extra_exclusions),
    };
    let rules = RuleSet::from_config(&config);

    if args.dry_run {
        OutputFormatter::warning("DRY RUN MODE ENABLED: No files will be moved.");
    }
    OutputFormatter::info(&format!(
        "Processing directory: {}",
        args.source.display()
    ));

    let mode = if args.by_date {
        OutputFormatter::info("Organizing by date...");
        OrganizeMode::ByDate
    } else {
        OutputFormatter::info("Organizing by file type...");
        OrganizeMode::ByType(&rules)
    };

    let report =
        FileOrganizer::organize_with_progress(&args.source, mode, &options, report_outcome)
            .map_err(|e| format!("Error: {}", e))?;

    if let Some(error) = &report.traversal_error {
        OutputFormatter::error(&format!("Walk stopped early: {}", error));
    }
    if report.unrecorded_moves > 0 {
        OutputFormatter::warning(&format!(
            "{} moves could not be written to the undo log and cannot be undone.",
            report.unrecorded_moves
        ));
    }

    OutputFormatter::organize_summary(report.files_moved, report.files_skipped);

    if report.log_path.is_some() && report.files_moved > 0 {
        OutputFormatter::info(&format!(
            "Use 'sift undo --source {}' to revert changes.",
            args.source.display()
        ));
    }

    Ok(())
}

fn report_outcome(outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Moved { from, to } => OutputFormatter::moved(from, to),
        FileOutcome::Previewed { from, to } => OutputFormatter::previewed(from, to),
        FileOutcome::Failed { error, .. } => OutputFormatter::error(&error.to_string()),
    }
}

/// Undoes the previous organize pass.
///
/// Returns an error when there is nothing to undo or when the replay stopped
/// on a failure; in the latter case the undo log is kept for a retry.
fn undo_organization(source: &Path) -> Result<(), String> {
    OutputFormatter::header("Sift Undo Operation");

    let report = UndoManager::undo(source).map_err(|e| format!("Error: {}", e))?;

    OutputFormatter::info(&format!(
        "Read {} entries from the undo log.",
        report.total_records
    ));
    if !report.malformed_lines.is_empty() {
        OutputFormatter::warning(&format!(
            "Skipped {} malformed log entries.",
            report.malformed_lines.len()
        ));
    }

    if let Some((path, reason)) = &report.halted_at {
        OutputFormatter::error(&format!(
            "Error reverting file {}: {}",
            path.display(),
            reason
        ));
        OutputFormatter::warning("Stopping undo operation to prevent data loss.");
        OutputFormatter::undo_summary(report.restored_files, false);
        return Err(format!(
            "Undo stopped after reverting {} files; the undo log was kept.",
            report.restored_files
        ));
    }

    if !report.log_removed {
        OutputFormatter::warning("Could not remove the undo log file.");
    }
    OutputFormatter::undo_summary(report.restored_files, report.log_removed);

    Ok(())
}
