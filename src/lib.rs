//! sift - sort a directory tree into category or date sub-folders
//!
//! This library walks a source directory, moves each file into a folder named
//! after its extension category (or its modification year and month), and
//! records every move in an undo log so a pass can be reverted exactly.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;
pub mod path_resolver;
pub mod traverser;
pub mod undo;
pub mod undo_log;

pub use config::{ConfigError, RuleConfig};
pub use file_category::{FALLBACK_CATEGORY, RuleSet};
pub use file_organizer::{
    FileOrganizer, FileOutcome, OrganizeError, OrganizeMode, OrganizeOptions, OrganizeReport,
    OrganizeResult,
};
pub use path_resolver::resolve_collision;
pub use undo::{UndoManager, UndoReport};
pub use undo_log::{LOG_FILE_NAME, LOG_SEPARATOR, UndoRecord};

pub use cli::{Cli, Command, run_cli};
