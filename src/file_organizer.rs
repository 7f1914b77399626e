/// Organize engine: moves files into category or date sub-folders.
///
/// This module drives one pass over a source directory. Each file found by
/// the traverser gets a destination directory (by extension category or by
/// modification date), a collision-free name, and is then moved, with the
/// move appended to the undo log. Under dry-run nothing is touched and no
/// undo log is written.
use crate::file_category::RuleSet;
use crate::path_resolver::resolve_collision;
use crate::traverser::Traverser;
use crate::undo_log::{UndoLogWriter, UndoRecord, check_recordable, log_file_path};
use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that can occur during organize and undo operations.
#[derive(Debug)]
pub enum OrganizeError {
    /// Failed to create a destination directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file to its destination.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
    /// Could not read a file's modification time.
    MetadataUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The base directory path is invalid or doesn't exist.
    InvalidBasePath {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The path cannot be written to the undo log and read back unchanged.
    UnrecordablePath { path: PathBuf, reason: &'static str },
    /// Reading the directory tree failed part way through.
    Traversal {
        path: Option<PathBuf>,
        reason: String,
    },
    /// Failed to create or write the undo log.
    HistoryWriteFailed { source: std::io::Error },
    /// Failed to read the undo log.
    HistoryReadFailed { source: std::io::Error },
    /// There is no undo log in the given directory.
    NoUndoLog { path: PathBuf },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::MetadataUnavailable { path, source } => {
                write!(f, "Could not get file info for {}: {}", path.display(), source)
            }
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
            Self::UnrecordablePath { path, reason } => {
                write!(f, "Cannot record move of {}: {}", path.display(), reason)
            }
            Self::Traversal { path, reason } => match path {
                Some(path) => write!(f, "Error walking {}: {}", path.display(), reason),
                None => write!(f, "Error walking directory tree: {}", reason),
            },
            Self::HistoryWriteFailed { source } => {
                write!(f, "Failed to write undo log: {}", source)
            }
            Self::HistoryReadFailed { source } => {
                write!(f, "Failed to read undo log: {}", source)
            }
            Self::NoUndoLog { path } => {
                write!(
                    f,
                    "No undo log file found in {}. Cannot perform undo.",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {}

impl From<walkdir::Error> for OrganizeError {
    fn from(error: walkdir::Error) -> Self {
        Self::Traversal {
            path: error.path().map(Path::to_path_buf),
            reason: error
                .io_error()
                .map_or_else(|| error.to_string(), ToString::to_string),
        }
    }
}

/// Result type for organize and undo operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// How destination folders are chosen for one pass.
#[derive(Debug, Clone, Copy)]
pub enum OrganizeMode<'a> {
    /// `<source>/<category>` from the file extension.
    ByType(&'a RuleSet),
    /// `<source>/<year>/<MM-MonthName>` from the modification time.
    ByDate,
}

/// Options shared by both organize modes.
#[derive(Debug, Clone, Default)]
pub struct OrganizeOptions {
    /// Report intended moves without touching the filesystem.
    pub dry_run: bool,
    /// Directory names that are never descended into.
    pub exclusions: HashSet<String>,
}

/// What happened to a single file during a pass.
#[derive(Debug)]
pub enum FileOutcome {
    /// The file was moved and the move recorded in the undo log.
    Moved { from: PathBuf, to: PathBuf },
    /// Dry run: the file would be moved here.
    Previewed { from: PathBuf, to: PathBuf },
    /// The file was left in place because of an error.
    Failed { path: PathBuf, error: OrganizeError },
}

/// Summary of one organize pass.
#[derive(Debug, Default)]
pub struct OrganizeReport {
    /// Files moved (or, under dry run, that would be moved).
    pub files_moved: usize,
    /// Files left in place because of an error.
    pub files_skipped: usize,
    /// Per-file outcomes in traversal order.
    pub outcomes: Vec<FileOutcome>,
    /// Set when the walk stopped early on a read error.
    pub traversal_error: Option<OrganizeError>,
    /// The undo log written by this pass, if any.
    pub log_path: Option<PathBuf>,
    /// Moves that succeeded but could not be appended to the undo log.
    pub unrecorded_moves: usize,
}

impl OrganizeReport {
    /// Returns true if every file was handled and the walk completed.
    pub fn is_complete_success(&self) -> bool {
        self.files_skipped == 0 && self.traversal_error.is_none() && self.unrecorded_moves == 0
    }
}

/// Organizes files by moving them into category or date subdirectories.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Organizes `source_dir` into extension-category folders.
    ///
    /// Folders named after any destination category are treated as earlier
    /// output and never descended into.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sift::file_category::RuleSet;
    /// use sift::file_organizer::{FileOrganizer, OrganizeOptions};
    /// use std::path::Path;
    ///
    /// let report = FileOrganizer::organize_by_type(
    ///     Path::new("/path/to/downloads"),
    ///     &RuleSet::default(),
    ///     &OrganizeOptions::default(),
    /// );
    ///
    /// match report {
    ///     Ok(report) => println!("Moved {} files", report.files_moved),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn organize_by_type(
        source_dir: &Path,
        rules: &RuleSet,
        options: &OrganizeOptions,
    ) -> OrganizeResult<OrganizeReport> {
        Self::organize(source_dir, OrganizeMode::ByType(rules), options)
    }

    /// Organizes `source_dir` into `<year>/<MM-MonthName>` folders by modification time.
    pub fn organize_by_date(
        source_dir: &Path,
        options: &OrganizeOptions,
    ) -> OrganizeResult<OrganizeReport> {
        Self::organize(source_dir, OrganizeMode::ByDate, options)
    }

    /// Runs one organize pass in the given mode.
    ///
    /// # Errors
    ///
    /// Fails before any file is processed if the source directory is invalid or
    /// the undo log cannot be created. Per-file failures and a walk aborted by a
    /// read error are reported in the returned [`OrganizeReport`] instead.
    pub fn organize(
        source_dir: &Path,
        mode: OrganizeMode<'_>,
        options: &OrganizeOptions,
    ) -> OrganizeResult<OrganizeReport> {
        Self::organize_with_progress(source_dir, mode, options, |_| {})
    }

    /// Like [`FileOrganizer::organize`], calling `on_outcome` for each file as
    /// soon as it has been handled.
    ///
    /// The callback runs before the walk moves on, so an interrupted pass has
    /// already reported every move it completed.
    pub fn organize_with_progress<F>(
        source_dir: &Path,
        mode: OrganizeMode<'_>,
        options: &OrganizeOptions,
        mut on_outcome: F,
    ) -> OrganizeResult<OrganizeReport>
    where
        F: FnMut(&FileOutcome),
    {
        let source = canonical_source(source_dir)?;
        let log_path = log_file_path(&source);

        let log = if options.dry_run {
            None
        } else {
            Some(UndoLogWriter::create(&source)?)
        };

        let destination_categories = match mode {
            OrganizeMode::ByType(rules) => Some(rules.destination_categories()),
            OrganizeMode::ByDate => None,
        };
        let traverser = Traverser::new(
            &source,
            &log_path,
            &options.exclusions,
            destination_categories.as_ref(),
        );

        let mut pass = Pass {
            source: &source,
            dry_run: options.dry_run,
            log,
            report: OrganizeReport::default(),
            on_outcome: &mut on_outcome,
        };

        let walked = traverser.walk(|path| match mode {
            OrganizeMode::ByType(rules) => {
                let category = rules.classify_path(path);
                let destination = pass.source.join(category);
                pass.relocate(path, destination);
            }
            OrganizeMode::ByDate => match date_destination(pass.source, path) {
                Ok(destination) => pass.relocate(path, destination),
                Err(error) => pass.fail(path, error),
            },
        });

        if let Err(error) = walked {
            pass.report.traversal_error = Some(error.into());
        }

        let mut report = pass.report;
        report.log_path = pass.log.map(|log| log.path().to_path_buf());
        Ok(report)
    }
}

/// Mutable state of one organize pass.
struct Pass<'a> {
    source: &'a Path,
    dry_run: bool,
    log: Option<UndoLogWriter>,
    report: OrganizeReport,
    on_outcome: &'a mut dyn FnMut(&FileOutcome),
}

impl Pass<'_> {
    /// Moves `file` into `destination_dir` under a collision-free name.
    fn relocate(&mut self, file: &Path, destination_dir: PathBuf) {
        let Some(file_name) = file.file_name() else {
            self.fail(
                file,
                OrganizeError::FileMoveFailure {
                    source: file.to_path_buf(),
                    destination: destination_dir,
                    source_error: std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        "file has no name component",
                    ),
                },
            );
            return;
        };

        let candidate = destination_dir.join(file_name);
        if candidate == file {
            log::debug!("Already in place: {}", file.display());
            return;
        }

        let final_path = resolve_collision(&candidate);

        for path in [file, final_path.as_path()] {
            if let Err(reason) = check_recordable(path) {
                let error = OrganizeError::UnrecordablePath {
                    path: path.to_path_buf(),
                    reason,
                };
                self.fail(file, error);
                return;
            }
        }

        if self.dry_run {
            self.report.files_moved += 1;
            self.emit(FileOutcome::Previewed {
                from: file.to_path_buf(),
                to: final_path,
            });
            return;
        }

        if let Err(e) = fs::create_dir_all(&destination_dir) {
            self.fail(
                file,
                OrganizeError::DirectoryCreationFailed {
                    path: destination_dir,
                    source: e,
                },
            );
            return;
        }

        if let Err(e) = fs::rename(file, &final_path) {
            self.fail(
                file,
                OrganizeError::FileMoveFailure {
                    source: file.to_path_buf(),
                    destination: final_path,
                    source_error: e,
                },
            );
            return;
        }

        if let Some(log) = self.log.as_mut() {
            let record = UndoRecord::new(final_path.clone(), file.to_path_buf());
            if let Err(e) = log.append(&record) {
                log::warn!("Move of {} was not recorded: {}", file.display(), e);
                self.report.unrecorded_moves += 1;
            }
        }

        self.report.files_moved += 1;
        self.emit(FileOutcome::Moved {
            from: file.to_path_buf(),
            to: final_path,
        });
    }

    fn fail(&mut self, file: &Path, error: OrganizeError) {
        self.report.files_skipped += 1;
        self.emit(FileOutcome::Failed {
            path: file.to_path_buf(),
            error,
        });
    }

    fn emit(&mut self, outcome: FileOutcome) {
        (self.on_outcome)(&outcome);
        self.report.outcomes.push(outcome);
    }
}

/// Resolves the source directory to an absolute path, requiring a directory.
fn canonical_source(source_dir: &Path) -> OrganizeResult<PathBuf> {
    let source = fs::canonicalize(source_dir).map_err(|e| OrganizeError::InvalidBasePath {
        path: source_dir.to_path_buf(),
        source: e,
    })?;

    if !source.is_dir() {
        return Err(OrganizeError::InvalidBasePath {
            path: source_dir.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        });
    }

    Ok(source)
}

/// `<source>/<YYYY>/<MM-MonthName>` for a file's modification time.
fn date_destination(source: &Path, file: &Path) -> OrganizeResult<PathBuf> {
    let modified = file
        .symlink_metadata()
        .and_then(|metadata| metadata.modified())
        .map_err(|e| OrganizeError::MetadataUnavailable {
            path: file.to_path_buf(),
            source: e,
        })?;

    let (year, month) = date_folder_names(DateTime::<Local>::from(modified));
    Ok(source.join(year).join(month))
}

/// Year and month folder names, e.g. `("2024", "01-January")`.
pub fn date_folder_names(timestamp: DateTime<Local>) -> (String, String) {
    (
        timestamp.format("%Y").to_string(),
        timestamp.format("%m-%B").to_string(),
    )
}
