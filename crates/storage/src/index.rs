//! The ordered collection of images to annotate.
//!
//! Discovery order is cached in a one-column CSV next to the store so the
//! sequence stays stable across sessions even if the directory changes.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;

use crate::csv_line;
use crate::repository::StorageError;

/// Extension substrings matched by default, both cases spelled out because
/// matching is case-sensitive.
pub const DEFAULT_EXTENSIONS: [&str; 8] = [
    ".jpg", ".JPG", ".jpeg", ".JPEG", ".png", ".PNG", ".bmp", ".BMP",
];

const INDEX_HEADER: &str = "file_name";

/// Recursively collect files under `root` whose filename contains any of the
/// extension substrings, sorted lexicographically by full path.
///
/// This is a substring match, not a suffix match: "x.jpg.bak" matches
/// ".jpg". A missing root or a directory with no matches yields an empty
/// list, which is a valid empty session.
#[must_use]
pub fn scan(root: &Path, extensions: &[&str]) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            extensions.iter().any(|ext| name.contains(ext))
        })
        .map(|entry| entry.path().to_string_lossy().into_owned())
        .collect();
    files.sort();
    files
}

/// Ordered, immutable-for-the-session list of item identities.
///
/// Invariant: no duplicates, and the order never changes after the initial
/// build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileIndex {
    entries: Vec<String>,
}

impl FileIndex {
    #[must_use]
    pub fn from_entries(entries: Vec<String>) -> Self {
        Self { entries }
    }

    /// Load the cached index at `cache_path`, or scan `root` and write the
    /// cache on first run. The cache is read verbatim afterwards, never
    /// re-derived from the directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` for filesystem failures and
    /// `StorageError::Serialization` for a malformed cache file.
    pub fn load_or_create(
        cache_path: impl Into<PathBuf>,
        root: &Path,
        extensions: &[&str],
    ) -> Result<Self, StorageError> {
        let cache_path = cache_path.into();
        if cache_path.exists() {
            let index = Self::read_cache(&cache_path)?;
            info!(
                path = %cache_path.display(),
                entries = index.len(),
                "loaded file index cache"
            );
            Ok(index)
        } else {
            let entries = scan(root, extensions);
            let index = Self { entries };
            index.write_cache(&cache_path)?;
            info!(
                root = %root.display(),
                entries = index.len(),
                "scanned image directory and wrote index cache"
            );
            Ok(index)
        }
    }

    fn read_cache(path: &Path) -> Result<Self, StorageError> {
        let content = fs::read_to_string(path)?;
        let mut records = csv_line::parse_records(&content)?.into_iter();

        let header = records
            .next()
            .ok_or_else(|| StorageError::Serialization("missing header row".into()))?;
        if header.as_slice() != [INDEX_HEADER] {
            return Err(StorageError::Serialization(format!(
                "unexpected index header: {header:?}"
            )));
        }

        let entries = records
            .map(|mut r| {
                if r.len() == 1 {
                    Ok(r.remove(0))
                } else {
                    Err(StorageError::Serialization(format!(
                        "expected one column, found {}",
                        r.len()
                    )))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { entries })
    }

    fn write_cache(&self, path: &Path) -> Result<(), StorageError> {
        let mut out = csv_line::write_record(&[INDEX_HEADER.to_owned()]);
        for entry in &self.entries {
            out.push_str(&csv_line::write_record(std::slice::from_ref(entry)));
        }
        fs::write(path, out)?;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, position: usize) -> Option<&str> {
        self.entries.get(position).map(String::as_str)
    }

    /// Position of an identity in discovery order.
    #[must_use]
    pub fn position_of(&self, identity: &str) -> Option<usize> {
        self.entries.iter().position(|e| e == identity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
