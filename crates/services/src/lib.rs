#![forbid(unsafe_code)]

pub mod error;
pub mod session;

pub use error::SessionError;
pub use session::{
    AnnotationSession, BoundaryNotice, CurrentView, Position, SessionProgress, StepOutcome,
};
