use std::fmt;

/// Aggregated view of session progress, useful for the presentation layer.
///
/// `done` counts store rows up to the first unset one; `total` is the file
/// index length. The two can differ when an old store file is reused over a
/// changed directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub done: usize,
    pub total: usize,
}

impl fmt::Display for SessionProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} out of {} done.", self.done, self.total)
    }
}
