//! Directory tree walking with exclude-list pruning.
//!
//! The walk is depth-first in the order the filesystem enumerates entries.
//! Excluded directories are pruned before `walkdir` descends into them, so
//! nothing below an excluded directory is ever visited.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use walkdir::DirEntry;
use walkdir::WalkDir;

use crate::ExcludeSet;
use crate::PackitError;
use crate::Result;
use crate::excludes::SIDECAR_FILE;
use crate::excludes::normalize_key;

/// A node visited during the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackEntry {
    /// Full filesystem path.
    pub path: PathBuf,
    /// Path relative to the walk root with `/` separators. Used as the
    /// container entry name.
    pub name: String,
}

/// Item produced by [`PackWalker::walk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkItem {
    /// Regular file (or symlink to one) that should be archived.
    File(PackEntry),
    /// Node that cannot be stored as file contents: sockets, FIFOs,
    /// dangling symlinks, symlinks to directories.
    Skipped(PackEntry),
}

/// Walks the working directory, leaving out the container being written,
/// the sidecar file, and everything in the exclude set.
///
/// # Examples
///
/// ```no_run
/// use packit_core::ExcludeSet;
/// use packit_core::creation::walker::PackWalker;
/// use packit_core::creation::walker::WalkItem;
/// use std::path::Path;
///
/// let excludes = ExcludeSet::from_entries(["target"]);
/// let walker = PackWalker::new(Path::new("."), "project.zip", &excludes);
///
/// for item in walker.walk() {
///     if let WalkItem::File(entry) = item? {
///         println!("would add {}", entry.name);
///     }
/// }
/// # Ok::<(), packit_core::PackitError>(())
/// ```
pub struct PackWalker<'a> {
    root: &'a Path,
    archive_key: String,
    excludes: &'a ExcludeSet,
}

impl<'a> PackWalker<'a> {
    /// Creates a walker over `root`. `archive_name` is the output file,
    /// relative to `root`.
    #[must_use]
    pub fn new(root: &'a Path, archive_name: &str, excludes: &'a ExcludeSet) -> Self {
        Self {
            root,
            archive_key: normalize_key(archive_name),
            excludes,
        }
    }

    /// Returns an iterator over the entries to archive.
    ///
    /// Directories are descended into but never yielded.
    ///
    /// # Errors
    ///
    /// Items are `Err(PackitError::Walk)` when a directory cannot be read.
    pub fn walk(&self) -> impl Iterator<Item = Result<WalkItem>> + '_ {
        WalkDir::new(self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(move |entry| !self.is_excluded(entry))
            .filter_map(move |entry| match entry {
                Ok(entry) => self.classify(&entry).transpose(),
                Err(e) => Some(Err(self.walk_error(e))),
            })
    }

    /// Decides whether `entry` (and its subtree, for directories) is left
    /// out.
    fn is_excluded(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }
        let Some(relative) = relative_name(self.root, entry.path()) else {
            return false;
        };

        if relative == self.archive_key {
            debug!(entry = %relative, "skipping the archive being written");
            return true;
        }
        if relative == SIDECAR_FILE {
            return true;
        }
        if self.excludes.contains(&relative) {
            if entry.file_type().is_dir() {
                debug!(dir = %relative, "excluded directory, not descending");
            } else {
                debug!(file = %relative, "excluded file");
            }
            return true;
        }
        false
    }

    fn classify(&self, entry: &DirEntry) -> Result<Option<WalkItem>> {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            return Ok(None);
        }

        let path = entry.path().to_path_buf();
        let name = relative_name(self.root, &path).ok_or_else(|| {
            PackitError::walk(
                &path,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "path is outside the archive root",
                ),
            )
        })?;
        if name.contains(char::REPLACEMENT_CHARACTER) {
            debug!(entry = %name, "file name is not valid UTF-8, stored lossily");
        }
        let packed = PackEntry { path, name };

        if file_type.is_file() {
            return Ok(Some(WalkItem::File(packed)));
        }

        // Symlinks are stored as the contents of their target, as long as
        // the target is a regular file.
        if file_type.is_symlink() && fs::metadata(&packed.path).is_ok_and(|m| m.is_file()) {
            return Ok(Some(WalkItem::File(packed)));
        }

        Ok(Some(WalkItem::Skipped(packed)))
    }

    fn walk_error(&self, err: walkdir::Error) -> PackitError {
        let path = err.path().unwrap_or(self.root).to_path_buf();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
        PackitError::walk(path, source)
    }
}

/// Computes the `/`-separated path of `path` relative to `root`.
///
/// Components that are not valid UTF-8 are converted lossily. Returns
/// `None` if `path` is outside `root`.
///
/// # Examples
///
/// ```
/// use packit_core::creation::walker::relative_name;
/// use std::path::Path;
///
/// let name = relative_name(Path::new("/work"), Path::new("/work/b/c.txt"));
/// assert_eq!(name.as_deref(), Some("b/c.txt"));
/// ```
#[must_use]
pub fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    Some(parts.join("/"))
}
