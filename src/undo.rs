/// Undo functionality for reverting an organize pass.
///
/// This module reads the undo log written by the last organize pass and moves
/// every file back to where it came from, newest move first.
use crate::file_organizer::OrganizeResult;
use crate::undo_log::{UndoRecord, log_file_path, read_log_lines};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the result of an undo operation.
#[derive(Debug, Default)]
pub struct UndoReport {
    /// Number of lines in the undo log.
    pub total_records: usize,
    /// Number of files successfully moved back.
    pub restored_files: usize,
    /// Log lines that could not be parsed and were skipped.
    pub malformed_lines: Vec<String>,
    /// The record whose reversal failed, with the reason. Replay stopped here.
    pub halted_at: Option<(PathBuf, String)>,
    /// Whether the undo log was removed afterwards.
    pub log_removed: bool,
}

impl UndoReport {
    /// Returns true if every record was replayed and the log was cleared.
    pub fn is_complete_success(&self) -> bool {
        self.halted_at.is_none() && self.log_removed
    }
}

/// Manages undo operations for file organization.
pub struct UndoManager;

impl UndoManager {
    /// Undoes the most recent organize pass in `base_path`.
    ///
    /// Records are replayed strictly in reverse order. The first failed move,
    /// including one whose original location is occupied again, stops the
    /// replay and leaves the undo log untouched so the undo can be retried.
    /// A fully successful replay deletes the log. Malformed log lines are
    /// skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::NoUndoLog` when there is nothing to undo, and
    /// `OrganizeError::HistoryReadFailed` when the log cannot be read.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use sift::undo::UndoManager;
    /// use std::path::Path;
    ///
    /// let result = UndoManager::undo(Path::new("/path/to/directory"));
    /// match result {
    ///     Ok(report) => println!("Restored {} files", report.restored_files),
    ///     Err(e) => eprintln!("Undo failed: {}", e),
    /// }
    /// ```
    pub fn undo(base_path: &Path) -> OrganizeResult<UndoReport> {
        let lines = read_log_lines(base_path)?;

        let mut report = UndoReport {
            total_records: lines.len(),
            ..UndoReport::default()
        };

        let progress = Self::progress_bar(lines.len() as u64);
        for line in lines.iter().rev() {
            progress.inc(1);

            let Some(record) = UndoRecord::parse_line(line) else {
                log::warn!("Skipping malformed log entry: {}", line);
                report.malformed_lines.push(line.clone());
                continue;
            };

            log::debug!(
                "Reverting {} -> {}",
                record.new_path.display(),
                record.original_path.display()
            );
            if let Err(reason) = Self::restore(&record) {
                report.halted_at = Some((record.new_path, reason));
                break;
            }
            report.restored_files += 1;
        }
        progress.finish_and_clear();

        if report.halted_at.is_none() {
            match fs::remove_file(log_file_path(base_path)) {
                Ok(()) => report.log_removed = true,
                Err(e) => log::warn!("Could not remove undo log file: {}", e),
            }
        }

        Ok(report)
    }

    /// Moves one file back. An occupied original location is a failure, never overwritten.
    fn restore(record: &UndoRecord) -> Result<(), String> {
        if record.original_path.symlink_metadata().is_ok() {
            return Err(format!(
                "{} already exists",
                record.original_path.display()
            ));
        }
        fs::rename(&record.new_path, &record.original_path).map_err(|e| e.to_string())
    }

    fn progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        if let Ok(style) =
            ProgressStyle::default_bar().template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len}")
        {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_organizer::OrganizeError;
    use crate::undo_log::LOG_FILE_NAME;
    use std::fs;
    use tempfile::TempDir;

    fn write_log(base_path: &Path, records: &[(PathBuf, PathBuf)]) {
        let content: String = records
            .iter()
            .map(|(new, original)| {
                UndoRecord::new(new.clone(), original.clone()).to_line() + "\n"
            })
            .collect();
        fs::write(base_path.join(LOG_FILE_NAME), content).expect("Failed to write log");
    }

    #[test]
    fn test_undo_no_history() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = UndoManager::undo(temp_dir.path());
        assert!(matches!(result, Err(OrganizeError::NoUndoLog { .. })));
    }

    #[test]
    fn test_undo_single_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::create_dir(base_path.join("Documents")).expect("mkdir failed");
        let moved = base_path.join("Documents/test.txt");
        let original = base_path.join("test.txt");
        fs::write(&moved, "test content").expect("Failed to write test file");
        write_log(base_path, &[(moved.clone(), original.clone())]);

        let report = UndoManager::undo(base_path).expect("Undo failed");

        assert_eq!(report.restored_files, 1);
        assert!(report.is_complete_success());
        assert!(original.exists());
        assert!(!moved.exists());
        assert!(!base_path.join(LOG_FILE_NAME).exists());
    }

    #[test]
    fn test_undo_replays_in_reverse_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let step0 = base_path.join("a.txt");
        let step1 = base_path.join("b.txt");
        let step2 = base_path.join("c.txt");
        fs::write(&step2, "payload").expect("write failed");

        // The file went a -> b, then b -> c. Only reverse replay brings it home.
        write_log(
            base_path,
            &[(step1.clone(), step0.clone()), (step2.clone(), step1.clone())],
        );

        let report = UndoManager::undo(base_path).expect("Undo failed");

        assert_eq!(report.restored_files, 2);
        assert!(report.is_complete_success());
        assert_eq!(fs::read_to_string(&step0).expect("missing"), "payload");
        assert!(!step1.exists());
        assert!(!step2.exists());
    }

    #[test]
    fn test_undo_stops_at_first_failure() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let (a_new, a_orig) = (base_path.join("A.new"), base_path.join("a.orig"));
        let (b_new, b_orig) = (base_path.join("B.new"), base_path.join("b.orig"));
        let (c_new, c_orig) = (base_path.join("C.new"), base_path.join("c.orig"));
        fs::write(&a_new, "a").expect("write failed");
        fs::write(&c_new, "c").expect("write failed");
        // B.new is missing, so reverting B fails.
        write_log(
            base_path,
            &[
                (a_new.clone(), a_orig.clone()),
                (b_new.clone(), b_orig),
                (c_new.clone(), c_orig.clone()),
            ],
        );
        let log_before = fs::read_to_string(base_path.join(LOG_FILE_NAME)).expect("log missing");

        let report = UndoManager::undo(base_path).expect("Undo failed");

        assert_eq!(report.restored_files, 1);
        assert_eq!(report.halted_at.as_ref().map(|(p, _)| p), Some(&b_new));
        assert!(!report.is_complete_success());
        assert!(!report.log_removed);
        assert!(c_orig.exists());
        assert!(a_new.exists(), "A must never be attempted");
        assert!(!a_orig.exists());
        assert_eq!(
            fs::read_to_string(base_path.join(LOG_FILE_NAME)).expect("log missing"),
            log_before
        );
    }

    #[test]
    fn test_undo_skips_malformed_lines() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let moved = base_path.join("moved.txt");
        let original = base_path.join("original.txt");
        fs::write(&moved, "x").expect("write failed");
        let content = format!(
            "garbage without separator\n{}\n/x::SFT::/y::SFT::/z\n",
            UndoRecord::new(moved.clone(), original.clone()).to_line()
        );
        fs::write(base_path.join(LOG_FILE_NAME), content).expect("write failed");

        let report = UndoManager::undo(base_path).expect("Undo failed");

        assert_eq!(report.total_records, 3);
        assert_eq!(report.restored_files, 1);
        assert_eq!(report.malformed_lines.len(), 2);
        assert!(report.is_complete_success());
        assert!(original.exists());
    }

    #[test]
    fn test_undo_refuses_to_overwrite() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        let moved = base_path.join("moved.txt");
        let original = base_path.join("original.txt");
        fs::write(&moved, "organized").expect("write failed");
        fs::write(&original, "newer file").expect("write failed");
        write_log(base_path, &[(moved.clone(), original.clone())]);

        let report = UndoManager::undo(base_path).expect("Undo failed");

        assert_eq!(report.restored_files, 0);
        assert!(report.halted_at.is_some());
        assert_eq!(fs::read_to_string(&original).expect("missing"), "newer file");
        assert!(moved.exists());
        assert!(base_path.join(LOG_FILE_NAME).exists());
    }

    #[test]
    fn test_undo_empty_log_is_cleared() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let base_path = temp_dir.path();
        fs::write(base_path.join(LOG_FILE_NAME), "").expect("write failed");

        let report = UndoManager::undo(base_path).expect("Undo failed");

        assert_eq!(report.restored_files, 0);
        assert!(report.log_removed);
        assert!(!base_path.join(LOG_FILE_NAME).exists());
    }
}
