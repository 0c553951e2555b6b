use std::fmt;

use storage::{AnnotationRepository, AnnotationRow, FileIndex};
use tirads_core::Assessment;
use tracing::{debug, warn};

use super::position::Position;
use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── STEP RESULTS ──────────────────────────────────────────────────────────────
//

/// Informational boundary signal. Not an error: the record was saved and the
/// session continues at the clamped position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryNotice {
    StartOfCollection,
    EndOfCollection,
}

impl fmt::Display for BoundaryNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartOfCollection => f.write_str(
                "This was the first image in the database. Cannot move backwards. Reloading first image",
            ),
            Self::EndOfCollection => f.write_str(
                "This was the last image in the database. You have annotated all images.",
            ),
        }
    }
}

/// What the presentation layer redisplays after a navigation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub identity: String,
    pub assessment: Assessment,
    pub progress: SessionProgress,
    pub notice: Option<BoundaryNotice>,
}

/// Initial view of the session before any navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentView {
    pub identity: String,
    pub assessment: Assessment,
    pub progress: SessionProgress,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One annotator's pass over the image collection.
///
/// Owns the file index, the store, and the only mutable cursor. Every
/// navigation step persists the just-edited record before the cursor moves,
/// so the store never lags the screen by more than the in-flight step.
pub struct AnnotationSession<S> {
    index: FileIndex,
    store: S,
    cursor: Position,
}

impl<S: AnnotationRepository> AnnotationSession<S> {
    /// Open a session, placing the cursor on the first not-yet-annotated
    /// item (0 if everything is annotated, the edge state if the index is
    /// empty). The cursor is never persisted; it is recomputed here on every
    /// start.
    #[must_use]
    pub fn start(index: FileIndex, store: S) -> Self {
        let cursor = if index.is_empty() {
            Position::Edge
        } else {
            // A store reused over a shrunk directory can point past the
            // index; clamp to the last displayable item.
            let first = store.first_unset().unwrap_or(0);
            Position::At(first.min(index.len() - 1))
        };
        Self {
            index,
            store,
            cursor,
        }
    }

    #[must_use]
    pub fn index(&self) -> &FileIndex {
        &self.index
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Map a displayed identity back to a cursor position.
    ///
    /// The documented boundary rule: a position past `N - 2` folds into
    /// `Edge`, losing its concrete index.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownIdentity` if the identity is not in the
    /// file index.
    pub fn resolve(&self, identity: &str) -> Result<Position, SessionError> {
        let pos = self
            .index
            .position_of(identity)
            .ok_or_else(|| SessionError::UnknownIdentity {
                identity: identity.to_owned(),
            })?;
        Ok(if pos + 2 > self.index.len() {
            Position::Edge
        } else {
            Position::At(pos)
        })
    }

    /// The item and fields to display when the session opens. `None` for an
    /// empty collection.
    ///
    /// # Errors
    ///
    /// Propagates store read failures.
    pub fn current(&self) -> Result<Option<CurrentView>, SessionError> {
        let Some(pos) = self.cursor.index() else {
            return Ok(None);
        };
        Ok(Some(CurrentView {
            identity: self.identity_at(pos),
            assessment: self.assessment_at(pos)?,
            progress: self.progress(),
        }))
    }

    /// Save the edited record for `identity`, then step forward.
    ///
    /// From the edge state the record is saved at the last position and the
    /// last item is redisplayed with an end-of-collection notice.
    ///
    /// # Errors
    ///
    /// `SessionError::Empty` for an empty collection,
    /// `SessionError::UnknownIdentity` for an identity outside the index,
    /// and any store failure. A failed save aborts the step: the cursor does
    /// not move.
    pub fn advance(
        &mut self,
        assessment: Assessment,
        identity: &str,
    ) -> Result<StepOutcome, SessionError> {
        let n = self.index.len();
        if n == 0 {
            return Err(SessionError::Empty);
        }

        let (save_at, next, notice) = match self.resolve(identity)? {
            Position::Edge => (n - 1, n - 1, Some(BoundaryNotice::EndOfCollection)),
            Position::At(pos) => (pos, pos + 1, None),
        };
        self.save(save_at, identity, assessment)?;
        self.step_to(next, notice)
    }

    /// Save the edited record for `identity`, then step backward.
    ///
    /// At position 0 the record is saved and the first item redisplayed with
    /// a start-of-collection notice; from the edge state the save lands at
    /// the last position and the cursor moves to `N - 2`.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::advance`].
    pub fn retreat(
        &mut self,
        assessment: Assessment,
        identity: &str,
    ) -> Result<StepOutcome, SessionError> {
        let n = self.index.len();
        if n == 0 {
            return Err(SessionError::Empty);
        }

        let (save_at, next, notice) = match self.resolve(identity)? {
            Position::At(0) => (0, 0, Some(BoundaryNotice::StartOfCollection)),
            Position::Edge => (n - 1, n.saturating_sub(2), None),
            Position::At(pos) => (pos, pos - 1, None),
        };
        self.save(save_at, identity, assessment)?;
        self.step_to(next, notice)
    }

    fn save(
        &mut self,
        position: usize,
        identity: &str,
        assessment: Assessment,
    ) -> Result<(), SessionError> {
        self.store
            .save(position, AnnotationRow::set(identity, assessment))?;
        debug!(position, identity, "persisted annotation");
        Ok(())
    }

    fn step_to(
        &mut self,
        next: usize,
        notice: Option<BoundaryNotice>,
    ) -> Result<StepOutcome, SessionError> {
        if let Some(notice) = notice {
            warn!(%notice, "collection boundary reached");
        }
        self.cursor = Position::At(next);
        Ok(StepOutcome {
            identity: self.identity_at(next),
            assessment: self.assessment_at(next)?,
            progress: self.progress(),
            notice,
        })
    }

    fn identity_at(&self, position: usize) -> String {
        // Step targets are derived from in-bounds positions only.
        self.index
            .get(position)
            .expect("step target stays within the file index")
            .to_owned()
    }

    /// Stored record at `position`, or the fixed default fill when unset.
    /// Persisted points/level come back verbatim, never recomputed.
    fn assessment_at(&self, position: usize) -> Result<Assessment, SessionError> {
        let row = self.store.get(position)?;
        Ok(row.assessment.unwrap_or_else(Assessment::default_fill))
    }

    fn progress(&self) -> SessionProgress {
        SessionProgress {
            done: self.store.first_unset().unwrap_or_else(|| self.store.len()),
            total: self.index.len(),
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
