use thiserror::Error;

use tirads_core::Assessment;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("position {position} out of bounds for store of length {len}")]
    OutOfBounds { position: usize, len: usize },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persisted shape for one image's annotation.
///
/// The assessment is all-or-nothing: `None` means the image has not been
/// annotated yet, `Some` carries every field plus the derived score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRow {
    pub filename: String,
    pub assessment: Option<Assessment>,
}

impl AnnotationRow {
    #[must_use]
    pub fn unset(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            assessment: None,
        }
    }

    #[must_use]
    pub fn set(filename: impl Into<String>, assessment: Assessment) -> Self {
        Self {
            filename: filename.into(),
            assessment: Some(assessment),
        }
    }

    #[must_use]
    pub fn is_unset(&self) -> bool {
        self.assessment.is_none()
    }
}

/// Repository contract for the annotation store.
///
/// Rows are addressed by the store's own physical order, which matches the
/// file index only at creation time; existing stores are never reconciled
/// against a rescan.
pub trait AnnotationRepository {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fetch the row at `position`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::OutOfBounds` if `position` is past the end.
    fn get(&self, position: usize) -> Result<AnnotationRow, StorageError>;

    /// Overwrite the row at `position` and make the whole store durable
    /// before returning.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::OutOfBounds` for a position past the end, or
    /// an I/O error if persisting fails.
    fn save(&mut self, position: usize, row: AnnotationRow) -> Result<(), StorageError>;

    /// Position of the first row whose assessment is unset, if any.
    fn first_unset(&self) -> Option<usize>;
}

/// In-memory store for tests and prototyping.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAnnotationStore {
    rows: Vec<AnnotationRow>,
}

impl InMemoryAnnotationStore {
    #[must_use]
    pub fn new(rows: Vec<AnnotationRow>) -> Self {
        Self { rows }
    }

    /// One unset row per identity, in order.
    pub fn from_identities<I, S>(identities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: identities.into_iter().map(AnnotationRow::unset).collect(),
        }
    }
}

impl AnnotationRepository for InMemoryAnnotationStore {
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
        Ok(())
    }

    fn first_unset(&self) -> Option<usize> {
        self.rows.iter().position(AnnotationRow::is_unset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tirads_core::{Composition, Echogenicity, FociSet, Margin, NoduleShape};

    fn sample() -> Assessment {
        Assessment::new(
            Composition::Spongiform,
            Echogenicity::Anechoic,
            NoduleShape::WiderThanTall,
            Margin::Smooth,
            FociSet::new(),
        )
    }

    #[test]
    fn save_then_get_round_trips() {
        let mut store = InMemoryAnnotationStore::from_identities(["a.jpg", "b.jpg"]);
        store.save(1, AnnotationRow::set("b.jpg", sample())).unwrap();

        let row = store.get(1).unwrap();
        assert_eq!(row.filename, "b.jpg");
        assert_eq!(row.assessment, Some(sample()));
        assert!(store.get(0).unwrap().is_unset());
    }

    #[test]
    fn first_unset_skips_completed_rows() {
        let mut store = InMemoryAnnotationStore::from_identities(["a.jpg", "b.jpg", "c.jpg"]);
        assert_eq!(store.first_unset(), Some(0));

        store.save(0, AnnotationRow::set("a.jpg", sample())).unwrap();
        assert_eq!(store.first_unset(), Some(1));

        store.save(1, AnnotationRow::set("b.jpg", sample())).unwrap();
        store.save(2, AnnotationRow::set("c.jpg", sample())).unwrap();
        assert_eq!(store.first_unset(), None);
    }

    #[test]
    fn out_of_bounds_access_fails_fast() {
        let mut store = InMemoryAnnotationStore::from_identities(["a.jpg"]);
        assert!(matches!(
            store.get(1),
            Err(StorageError::OutOfBounds { position: 1, len: 1 })
        ));
        assert!(matches!(
            store.save(5, AnnotationRow::unset("x.jpg")),
            Err(StorageError::OutOfBounds { position: 5, len: 1 })
        ));
    }
}
