/// Cursor location over the file index.
///
/// `Edge` is the folded end-of-collection state: an identity resolving past
/// `N - 2` loses its concrete position. Advancing from `Edge` saves and
/// redisplays the last item; retreating from it lands on `N - 2`. This makes
/// the boundary rule explicit instead of hiding it in an out-of-range
/// integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    At(usize),
    Edge,
}

impl Position {
    #[must_use]
    pub fn is_edge(self) -> bool {
        matches!(self, Self::Edge)
    }

    /// Concrete index position, if not folded into the edge state.
    #[must_use]
    pub fn index(self) -> Option<usize> {
        match self {
            Self::At(p) => Some(p),
            Self::Edge => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_none_at_the_edge() {
        assert_eq!(Position::At(3).index(), Some(3));
        assert_eq!(Position::Edge.index(), None);
        assert!(Position::Edge.is_edge());
        assert!(!Position::At(0).is_edge());
    }
}
