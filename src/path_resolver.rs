/// Collision-free destination naming.
///
/// When the destination already holds an entry with the same name, a numbered
/// suffix is appended to the file stem: `photo.jpg` becomes `photo (1).jpg`,
/// then `photo (2).jpg`, and so on. Existing parenthesised numbers are plain
/// text, so `report (1).pdf` collides into `report (1) (1).pdf`.
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Returns `candidate` if nothing exists there, otherwise the lowest-numbered
/// `"<stem> (<n>)<.ext>"` sibling that does not exist.
///
/// The filesystem is probed with `symlink_metadata`, so a dangling symlink
/// still counts as an occupied name.
///
/// # Examples
///
/// ```no_run
/// use sift::path_resolver::resolve_collision;
/// use std::path::Path;
///
/// let target = resolve_collision(Path::new("/data/Images/photo.jpg"));
/// println!("moving to {}", target.display());
/// ```
pub fn resolve_collision(candidate: &Path) -> PathBuf {
    if !is_occupied(candidate) {
        return candidate.to_path_buf();
    }

    let parent = candidate.parent().unwrap_or_else(|| Path::new(""));
    let stem = candidate.file_stem().unwrap_or_default();
    let extension = candidate.extension();

    (1u64..)
        .map(|n| parent.join(numbered_name(stem, extension, n)))
        .find(|path| !is_occupied(path))
        .unwrap_or_else(|| candidate.to_path_buf())
}

fn numbered_name(stem: &OsStr, extension: Option<&OsStr>, n: u64) -> OsString {
    let mut name = OsString::from(stem);
    name.push(format!(" ({n})"));
    if let Some(ext) = extension {
        name.push(".");
        name.push(ext);
    }
    name
}

fn is_occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}
