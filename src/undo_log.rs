/// On-disk undo log written by an organize pass and consumed by undo.
///
/// The log is plain text, one record per line:
/// `<new path>::SFT::<original path>`. Records are appended in the order files
/// were moved and flushed one by one, so an interrupted pass still leaves a
/// valid log of every move that actually happened.
use crate::file_organizer::{OrganizeError, OrganizeResult};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the undo log, created at the root of the organized directory.
pub const LOG_FILE_NAME: &str = ".sift_log";

/// Token separating the two paths of a record.
pub const LOG_SEPARATOR: &str = "::SFT::";

/// A single completed move: where the file is now and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoRecord {
    /// Where the file was moved to.
    pub new_path: PathBuf,
    /// Where the file lived before the move.
    pub original_path: PathBuf,
}

impl UndoRecord {
    pub fn new(new_path: PathBuf, original_path: PathBuf) -> Self {
        Self {
            new_path,
            original_path,
        }
    }

    /// Formats this record as a log line, without the trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{}{}{}",
            self.new_path.to_string_lossy(),
            LOG_SEPARATOR,
            self.original_path.to_string_lossy()
        )
    }

    /// Parses a log line back into a record.
    ///
    /// Returns `None` unless the line holds exactly two separator-delimited
    /// fields, both absolute paths.
    ///
    /// # Examples
    ///
    /// ```
    /// use sift::undo_log::UndoRecord;
    ///
    /// let record = UndoRecord::parse_line("/a/Images/x.png::SFT::/a/x.png").unwrap();
    /// assert_eq!(record.original_path.to_str(), Some("/a/x.png"));
    /// assert!(UndoRecord::parse_line("no separator here").is_none());
    /// ```
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = line.split(LOG_SEPARATOR);
        let new_path = fields.next()?;
        let original_path = fields.next()?;
        if fields.next().is_some() {
            return None;
        }
        let (new_path, original_path) = (PathBuf::from(new_path), PathBuf::from(original_path));
        if !new_path.is_absolute() || !original_path.is_absolute() {
            return None;
        }
        Some(Self::new(new_path, original_path))
    }
}

/// Checks that `path` survives a write to the undo log and a read back.
///
/// The log is line-oriented UTF-8, so a path that is not valid UTF-8, holds a
/// line break, or contains [`LOG_SEPARATOR`] cannot be recorded faithfully.
pub fn check_recordable(path: &Path) -> Result<(), &'static str> {
    let Some(text) = path.to_str() else {
        return Err("path is not valid UTF-8");
    };
    if text.contains(['\n', '\r']) {
        return Err("path contains a line break");
    }
    if text.contains(LOG_SEPARATOR) {
        return Err("path contains the undo log separator");
    }
    Ok(())
}

/// Returns the location of the undo log for a source directory.
pub fn log_file_path(source_dir: &Path) -> PathBuf {
    source_dir.join(LOG_FILE_NAME)
}

/// Append-only writer held open for the duration of one organize pass.
pub struct UndoLogWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    records_written: usize,
}

impl UndoLogWriter {
    /// Creates (or truncates) the undo log under `source_dir`.
    pub fn create(source_dir: &Path) -> OrganizeResult<Self> {
        let path = log_file_path(source_dir);
        let file =
            File::create(&path).map_err(|e| OrganizeError::HistoryWriteFailed { source: e })?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
            records_written: 0,
        })
    }

    /// Appends one record and flushes it to disk before returning.
    pub fn append(&mut self, record: &UndoRecord) -> OrganizeResult<()> {
        writeln!(self.writer, "{}", record.to_line())
            .and_then(|()| self.writer.flush())
            .map_err(|e| OrganizeError::HistoryWriteFailed { source: e })?;
        self.records_written += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }
}

/// Reads every line of the undo log in append order.
///
/// A missing log yields `OrganizeError::NoUndoLog`.
pub fn read_log_lines(source_dir: &Path) -> OrganizeResult<Vec<String>> {
    let path = log_file_path(source_dir);
    if !path.is_file() {
        return Err(OrganizeError::NoUndoLog {
            path: source_dir.to_path_buf(),
        });
    }

    let content =
        fs::read_to_string(&path).map_err(|e| OrganizeError::HistoryReadFailed { source: e })?;
    Ok(content.lines().map(str::to_string).collect())
}
