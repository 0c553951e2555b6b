use serde::{Deserialize, Serialize};

use crate::model::{Composition, EchogenicFocus, Echogenicity, FociSet, Margin, NoduleShape};
use crate::scoring::{self, TiradsLevel};

/// One complete annotation for an image: the five categorical selections
/// plus the derived point total and level.
///
/// A record in the store is either fully unset or holds one of these; a
/// partially-filled assessment never exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub composition: Composition,
    pub echogenicity: Echogenicity,
    pub shape: NoduleShape,
    pub margin: Margin,
    pub foci: FociSet,
    pub points: u8,
    pub level: TiradsLevel,
}

impl Assessment {
    /// Build an assessment from fresh selections, deriving points and level.
    #[must_use]
    pub fn new(
        composition: Composition,
        echogenicity: Echogenicity,
        shape: NoduleShape,
        margin: Margin,
        foci: FociSet,
    ) -> Self {
        let (points, level) = scoring::score(composition, echogenicity, shape, margin, &foci);
        Self {
            composition,
            echogenicity,
            shape,
            margin,
            foci,
            points,
            level,
        }
    }

    /// Rehydrate an assessment from storage, keeping the persisted points
    /// and level verbatim rather than recomputing them.
    #[must_use]
    pub fn from_persisted(
        composition: Composition,
        echogenicity: Echogenicity,
        shape: NoduleShape,
        margin: Margin,
        foci: FociSet,
        points: u8,
        level: TiradsLevel,
    ) -> Self {
        Self {
            composition,
            echogenicity,
            shape,
            margin,
            foci,
            points,
            level,
        }
    }

    /// The fixed pre-fill shown for a not-yet-annotated image.
    #[must_use]
    pub fn default_fill() -> Self {
        Self {
            composition: Composition::SolidOrCompletelySolid,
            echogenicity: Echogenicity::Hypoechoic,
            shape: NoduleShape::WiderThanTall,
            margin: Margin::IllDefined,
            foci: [EchogenicFocus::NoneOrLargeCometTail].into(),
            points: 4,
            level: TiradsLevel::Tr4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_derives_points_and_level() {
        let a = Assessment::new(
            Composition::MixedCysticAndSolid,
            Echogenicity::Hypoechoic,
            NoduleShape::WiderThanTall,
            Margin::LobulatedOrIrregular,
            FociSet::new(),
        );
        assert_eq!(a.points, 1 + 2 + 2);
        assert_eq!(a.level, TiradsLevel::Tr4);
    }

    #[test]
    fn from_persisted_does_not_recompute() {
        // A stored record keeps whatever points/level it was saved with,
        // even if they disagree with the current table.
        let a = Assessment::from_persisted(
            Composition::Spongiform,
            Echogenicity::Anechoic,
            NoduleShape::WiderThanTall,
            Margin::Smooth,
            FociSet::new(),
            9,
            TiradsLevel::Tr5,
        );
        assert_eq!(a.points, 9);
        assert_eq!(a.level, TiradsLevel::Tr5);
    }

    #[test]
    fn default_fill_is_consistent_with_scoring() {
        let d = Assessment::default_fill();
        let (points, level) =
            crate::scoring::score(d.composition, d.echogenicity, d.shape, d.margin, &d.foci);
        assert_eq!(d.points, points);
        assert_eq!(d.level, level);
        assert_eq!(d.points, 4);
        assert_eq!(d.level, TiradsLevel::Tr4);
    }
}
