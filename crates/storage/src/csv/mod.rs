//! File-backed annotation store.
//!
//! Every save rewrites the whole file. That keeps the on-disk snapshot
//! consistent with memory at the cost of O(N) I/O per step, which is fine at
//! human interaction latency for a single annotator.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::csv_line;
use crate::index::FileIndex;
use crate::repository::{AnnotationRepository, AnnotationRow, StorageError};

mod codec;

pub struct CsvAnnotationStore {
    path: PathBuf,
    rows: Vec<AnnotationRow>,
}

impl CsvAnnotationStore {
    /// Open the store at `path`, creating it from the file index if absent.
    ///
    /// An existing file is loaded verbatim: rows are never reconciled
    /// against the current index, so entries for removed files stay and
    /// newly discovered files are not appended.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` for filesystem failures and
    /// `StorageError::Serialization` for malformed or partially filled rows.
    pub fn load_or_init(path: impl Into<PathBuf>, index: &FileIndex) -> Result<Self, StorageError> {
        let path = path.into();
        if path.exists() {
            let rows = Self::read(&path)?;
            info!(path = %path.display(), rows = rows.len(), "loaded annotation store");
            Ok(Self { path, rows })
        } else {
            let rows: Vec<AnnotationRow> = index
                .iter()
                .map(AnnotationRow::unset)
                .collect();
            let store = Self { path, rows };
            store.rewrite()?;
            info!(
                path = %store.path.display(),
                rows = store.rows.len(),
                "initialized annotation store"
            );
            Ok(store)
        }
    }

    fn read(path: &Path) -> Result<Vec<AnnotationRow>, StorageError> {
        let content = fs::read_to_string(path)?;
        let mut records = csv_line::parse_records(&content)?.into_iter();

        let header = records
            .next()
            .ok_or_else(|| StorageError::Serialization("missing header row".into()))?;
        if header != codec::HEADER {
            return Err(StorageError::Serialization(format!(
                "unexpected header: {header:?}"
            )));
        }

        records.map(|r| codec::decode_row(&r)).collect()
    }

    /// Serialize every row and replace the file contents.
    fn rewrite(&self) -> Result<(), StorageError> {
        let header: Vec<String> = codec::HEADER.iter().map(|h| (*h).to_owned()).collect();
        let mut out = csv_line::write_record(&header);
        for row in &self.rows {
            out.push_str(&csv_line::write_record(&codec::encode_row(row)));
        }
        fs::write(&self.path, out)?;
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AnnotationRepository for CsvAnnotationStore {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn get(&self, position: usize) -> Result<AnnotationRow, StorageError> {
        self.rows
            .get(position)
            .cloned()
            .ok_or(StorageError::OutOfBounds {
                position,
                len: self.rows.len(),
            })
    }

    fn save(&mut self, position: usize, row: AnnotationRow) -> Result<(), StorageError> {
        let len = self.rows.len();
        let slot = self
            .rows
            .get_mut(position)
            .ok_or(StorageError::OutOfBounds { position, len })?;
        *slot = row;
        self.rewrite()?;
        debug!(position, "saved annotation row");
        Ok(())
    }

    fn first_unset(&self) -> Option<usize> {
        self.rows.iter().position(AnnotationRow::is_unset)
    }
}
