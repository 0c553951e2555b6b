mod position;
mod progress;
mod service;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use position::Position;
pub use progress::SessionProgress;
pub use service::{AnnotationSession, BoundaryNotice, CurrentView, StepOutcome};
