//! Sidecar exclude list (`.packit`).
//!
//! The sidecar is a plain UTF-8 file in the working directory with one
//! relative path per line. Entries are exact paths, not patterns: `docs`
//! excludes the `docs` directory and everything below it, `docs/a.md`
//! excludes only that file.
//!
//! Keys are normalized before matching so the stored text and the walk
//! agree: a leading `./` and trailing `/` are dropped, and blank lines are
//! ignored.

use std::collections::HashSet;
use std::fs;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;

use crate::PackitError;
use crate::Result;

/// File name of the sidecar exclude list.
pub const SIDECAR_FILE: &str = ".packit";

/// Normalizes an exclude entry or walk path into its matching key.
///
/// # Examples
///
/// ```
/// use packit_core::excludes::normalize_key;
///
/// assert_eq!(normalize_key("build/"), "build");
/// assert_eq!(normalize_key("./dist/out.bin"), "dist/out.bin");
/// assert_eq!(normalize_key("notes.txt"), "notes.txt");
/// ```
#[must_use]
pub fn normalize_key(entry: &str) -> String {
    #[cfg(windows)]
    let entry = entry.replace('\\', "/");
    #[cfg(windows)]
    let entry = entry.as_str();

    let mut key = entry.trim_end_matches('/');
    while let Some(rest) = key.strip_prefix("./") {
        key = rest;
    }
    key.to_string()
}

/// Loaded exclude entries.
///
/// Keeps the entries in file order for display and a key set for
/// membership checks. Duplicates are kept in `entries()`.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    entries: Vec<String>,
    keys: HashSet<String>,
    sidecar_present: bool,
}

impl ExcludeSet {
    /// Builds a set from raw entries, dropping blank ones.
    ///
    /// # Examples
    ///
    /// ```
    /// use packit_core::ExcludeSet;
    ///
    /// let set = ExcludeSet::from_entries(["target/", "", "notes.txt"]);
    /// assert!(set.contains("target"));
    /// assert!(set.contains("notes.txt"));
    /// assert!(!set.contains(""));
    /// assert_eq!(set.len(), 2);
    /// ```
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for entry in entries {
            let entry = entry.into();
            let key = normalize_key(&entry);
            if key.trim().is_empty() {
                continue;
            }
            set.keys.insert(key);
            set.entries.push(entry);
        }
        set
    }

    /// Returns `true` if the relative path is excluded.
    ///
    /// Only exact matches count; callers prune directory subtrees.
    #[must_use]
    pub fn contains(&self, relative: &str) -> bool {
        if self.keys.is_empty() {
            return false;
        }
        self.keys.contains(&normalize_key(relative))
    }

    /// Entries in the order they were loaded.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Consumes the set and returns its entries in load order.
    #[must_use]
    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }

    /// Number of entries, counting duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the sidecar file existed when this set was loaded.
    #[must_use]
    pub const fn sidecar_present(&self) -> bool {
        self.sidecar_present
    }
}

/// Result of [`ExcludeStore::add`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddOutcome {
    /// Entries appended to the sidecar, in input order.
    pub added: Vec<String>,
}

impl AddOutcome {
    /// Returns `true` if nothing was written.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty()
    }
}

/// Reads and appends the sidecar exclude file of one directory.
#[derive(Debug, Clone)]
pub struct ExcludeStore {
    sidecar: PathBuf,
}

impl ExcludeStore {
    /// Creates a store for the sidecar in `root`.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self {
            sidecar: root.join(SIDECAR_FILE),
        }
    }

    /// Path of the sidecar file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.sidecar
    }

    /// Loads the exclude set.
    ///
    /// A missing sidecar is not an error: an empty set is returned and
    /// [`ExcludeSet::sidecar_present`] is `false`.
    ///
    /// # Errors
    ///
    /// Returns `SidecarRead` if the file exists but cannot be read or is not
    /// valid UTF-8.
    pub fn load(&self) -> Result<ExcludeSet> {
        let Some(content) = self.read_raw()? else {
            info!(path = %self.sidecar.display(), "no exclude file, nothing will be ignored");
            return Ok(ExcludeSet::default());
        };

        let mut set = ExcludeSet::from_entries(parse_lines(&content));
        set.sidecar_present = true;
        debug!(entries = set.len(), "loaded exclude file");
        Ok(set)
    }

    /// Lists the entries in file order.
    ///
    /// # Errors
    ///
    /// Same as [`ExcludeStore::load`].
    pub fn list(&self) -> Result<Vec<String>> {
        self.load().map(ExcludeSet::into_entries)
    }

    /// Appends the entries not already present, creating the sidecar if
    /// needed.
    ///
    /// Nothing is written when every entry is already listed.
    ///
    /// # Errors
    ///
    /// Returns `SidecarRead` if the current list cannot be read and
    /// `SidecarWrite` if the file cannot be opened or appended.
    pub fn add<S: AsRef<str>>(&self, new_entries: &[S]) -> Result<AddOutcome> {
        let raw = self.read_raw()?;
        let current = raw
            .as_deref()
            .map(|content| ExcludeSet::from_entries(parse_lines(content)))
            .unwrap_or_default();

        let added = novel_entries(&current, new_entries);
        if added.is_empty() {
            debug!("no new exclude entries");
            return Ok(AddOutcome::default());
        }

        let mut payload = String::new();
        if raw.as_deref().is_some_and(|c| !c.is_empty() && !c.ends_with('\n')) {
            payload.push('\n');
        }
        for entry in &added {
            payload.push_str(entry);
            payload.push('\n');
        }

        let write_err = |source| PackitError::SidecarWrite {
            path: self.sidecar.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.sidecar)
            .map_err(write_err)?;
        file.write_all(payload.as_bytes()).map_err(write_err)?;
        file.flush().map_err(write_err)?;

        info!(count = added.len(), path = %self.sidecar.display(), "appended exclude entries");
        Ok(AddOutcome { added })
    }

    fn read_raw(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.sidecar) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PackitError::SidecarRead {
                path: self.sidecar.clone(),
                source,
            }),
        }
    }
}

/// Entries of `new_entries` that `current` does not contain, in input
/// order and without repeats.
///
/// # Examples
///
/// ```
/// use packit_core::ExcludeSet;
/// use packit_core::excludes::novel_entries;
///
/// let current = ExcludeSet::from_entries(["a", "b/"]);
/// let novel = novel_entries(&current, &["b", "c", "a", "c", "d"]);
/// assert_eq!(novel, vec!["c", "d"]);
/// ```
pub fn novel_entries<S: AsRef<str>>(current: &ExcludeSet, new_entries: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    new_entries
        .iter()
        .map(|entry| entry.as_ref())
        .filter(|entry| {
            let key = normalize_key(entry);
            !key.trim().is_empty() && !current.keys.contains(&key) && seen.insert(key)
        })
        .map(str::to_string)
        .collect()
}

fn parse_lines(content: &str) -> impl Iterator<Item = &str> {
    content.lines().filter(|line| !line.trim().is_empty())
}
