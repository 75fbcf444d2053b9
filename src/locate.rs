use tracing::debug;
use walkdir::WalkDir;

use std::path::{Path, PathBuf};

use crate::{
    error::{Error, Result},
    pattern::Pattern,
};

/// Returns the regular files under `root` matching `pattern`, recursively,
/// in lexicographic path order.
///
/// Symbolic links to files are included; directories never are, and
/// symlinked directories are not descended into. The returned iterator is
/// lazy and yields nothing at all if no file matches.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if `root` does not exist, or
/// [`Error::NotADirectory`] if it is not a directory. The iterator yields
/// [`Error::Walk`] if part of the tree cannot be read.
pub fn find_files<'a>(root: impl AsRef<Path>, pattern: &'a Pattern) -> Result<Files<'a>> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(Error::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(Error::NotADirectory(root.to_path_buf()));
    }
    Ok(Files {
        root: root.to_path_buf(),
        pattern,
        walker: WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter(),
    })
}

/// Iterator over matching files, created by [`find_files`].
pub struct Files<'a> {
    root: PathBuf,
    pattern: &'a Pattern,
    walker: walkdir::IntoIter,
}

impl Iterator for Files<'_> {
    type Item = Result<PathBuf>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };
            // Follows a symlink to see what it points at.
            if !entry.path().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            if self.pattern.is_match(relative) {
                debug!(path = %entry.path().display(), "found matching file");
                return Some(Ok(entry.into_path()));
            }
        }
    }
}
