use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::fields::EchogenicFocus;

/// Duplicate-free selection of echogenic foci.
///
/// Kept in the enum's declaration order so serialization is deterministic
/// regardless of the order the annotator clicked the findings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FociSet(BTreeSet<EchogenicFocus>);

impl FociSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the focus was newly added.
    pub fn insert(&mut self, focus: EchogenicFocus) -> bool {
        self.0.insert(focus)
    }

    /// Returns true if the focus was present.
    pub fn remove(&mut self, focus: EchogenicFocus) -> bool {
        self.0.remove(&focus)
    }

    /// Add the focus if absent, remove it if present.
    pub fn toggle(&mut self, focus: EchogenicFocus) {
        if !self.0.insert(focus) {
            self.0.remove(&focus);
        }
    }

    #[must_use]
    pub fn contains(&self, focus: EchogenicFocus) -> bool {
        self.0.contains(&focus)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EchogenicFocus> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<EchogenicFocus> for FociSet {
    fn from_iter<I: IntoIterator<Item = EchogenicFocus>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[EchogenicFocus; N]> for FociSet {
    fn from(values: [EchogenicFocus; N]) -> Self {
        values.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut foci = FociSet::new();
        foci.toggle(EchogenicFocus::Macrocalcifications);
        assert!(foci.contains(EchogenicFocus::Macrocalcifications));
        foci.toggle(EchogenicFocus::Macrocalcifications);
        assert!(foci.is_empty());
    }

    #[test]
    fn duplicates_collapse() {
        let foci: FociSet = [
            EchogenicFocus::PunctateEchogenicFoci,
            EchogenicFocus::PunctateEchogenicFoci,
        ]
        .into();
        assert_eq!(foci.len(), 1);
    }

    #[test]
    fn serializes_as_label_array() {
        let foci: FociSet = [
            EchogenicFocus::Macrocalcifications,
            EchogenicFocus::NoneOrLargeCometTail,
        ]
        .into();
        let json = serde_json::to_string(&foci).unwrap();
        assert_eq!(
            json,
            "[\"None or large comet-tail artifacts\",\"Macrocalcifications\"]"
        );
        let back: FociSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, foci);
    }

    #[test]
    fn empty_set_round_trips() {
        let json = serde_json::to_string(&FociSet::new()).unwrap();
        assert_eq!(json, "[]");
        let back: FociSet = serde_json::from_str(&json).unwrap();
        assert!(back.is_empty());
    }
}
