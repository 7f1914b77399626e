/// Single-pass, pre-order walk of a source directory.
///
/// Every entry below the root gets an explicit [`Visit`] decision: the undo
/// log is skipped, excluded and already-organized folders are pruned, other
/// folders are descended into and files are handed to the caller.
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What the walk does with one visited entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Ignore this entry (the undo log itself).
    Skip,
    /// Do not descend into this directory or touch anything inside it.
    Prune,
    /// Walk into this directory.
    Descend,
    /// Hand this file to the organizer.
    Process,
}

/// Walks one source tree, applying exclusion and destination pruning.
pub struct Traverser<'a> {
    root: PathBuf,
    log_path: PathBuf,
    exclusions: &'a HashSet<String>,
    destination_categories: Option<&'a HashSet<String>>,
}

impl<'a> Traverser<'a> {
    /// Creates a traverser rooted at `root`.
    ///
    /// `destination_categories` is `None` when organizing by date, which only
    /// prunes on the exclusion set.
    pub fn new(
        root: &Path,
        log_path: &Path,
        exclusions: &'a HashSet<String>,
        destination_categories: Option<&'a HashSet<String>>,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            log_path: log_path.to_path_buf(),
            exclusions,
            destination_categories,
        }
    }

    /// Decides what to do with an entry at `depth` below the root.
    ///
    /// The root (depth 0) is always descended, whatever its name.
    pub fn decide(&self, path: &Path, is_dir: bool, depth: usize) -> Visit {
        if depth == 0 {
            return Visit::Descend;
        }

        if path == self.log_path {
            return if is_dir { Visit::Prune } else { Visit::Skip };
        }

        if !is_dir {
            return Visit::Process;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.exclusions.contains(name.as_ref()) {
            log::debug!("Excluding directory: {}", path.display());
            return Visit::Prune;
        }

        if self
            .destination_categories
            .is_some_and(|categories| categories.contains(name.as_ref()))
        {
            log::debug!("Skipping already organized directory: {}", path.display());
            return Visit::Prune;
        }

        Visit::Descend
    }

    /// Walks the tree, calling `on_file` for every entry decided as [`Visit::Process`].
    ///
    /// Directory listings are read in file-name order when a directory is
    /// entered, so folders created by `on_file` at a level that was already
    /// listed are never visited. The first read error stops the walk.
    pub fn walk<F>(&self, mut on_file: F) -> Result<(), walkdir::Error>
    where
        F: FnMut(&Path),
    {
        let mut entries = WalkDir::new(&self.root).sort_by_file_name().into_iter();

        while let Some(entry) = entries.next() {
            let entry = entry?;
            match self.decide(entry.path(), entry.file_type().is_dir(), entry.depth()) {
                Visit::Skip | Visit::Descend => {}
                Visit::Prune => entries.skip_current_dir(),
                Visit::Process => on_file(entry.path()),
            }
        }

        Ok(())
    }
}
