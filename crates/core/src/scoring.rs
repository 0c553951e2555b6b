use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::{Composition, EchogenicFocus, Echogenicity, FociSet, Margin, NoduleShape};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized TI-RADS level label: {label:?}")]
pub struct ParseLevelError {
    pub label: String,
}

//
// ─── LEVEL ─────────────────────────────────────────────────────────────────────
//

/// Discrete severity bucket derived from the summed points.
///
/// The `Display` label ("TI-RADS 1".."TI-RADS 5") is the persisted form and
/// must stay stable for existing annotation stores.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TiradsLevel {
    #[serde(rename = "TI-RADS 1")]
    Tr1,
    #[serde(rename = "TI-RADS 2")]
    Tr2,
    #[serde(rename = "TI-RADS 3")]
    Tr3,
    #[serde(rename = "TI-RADS 4")]
    Tr4,
    #[serde(rename = "TI-RADS 5")]
    Tr5,
}

impl TiradsLevel {
    /// Map a point total to its level.
    ///
    /// Thresholds are exclusive upper bounds checked in ascending order:
    /// `<1`, `<3`, `<4`, `<7`, else level 5. Total for every input.
    #[must_use]
    pub fn from_points(points: u8) -> Self {
        if points < 1 {
            Self::Tr1
        } else if points < 3 {
            Self::Tr2
        } else if points < 4 {
            Self::Tr3
        } else if points < 7 {
            Self::Tr4
        } else {
            Self::Tr5
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Tr1 => "TI-RADS 1",
            Self::Tr2 => "TI-RADS 2",
            Self::Tr3 => "TI-RADS 3",
            Self::Tr4 => "TI-RADS 4",
            Self::Tr5 => "TI-RADS 5",
        }
    }

    /// Numeric bucket, 1 through 5.
    #[must_use]
    pub fn value(self) -> u8 {
        match self {
            Self::Tr1 => 1,
            Self::Tr2 => 2,
            Self::Tr3 => 3,
            Self::Tr4 => 4,
            Self::Tr5 => 5,
        }
    }
}

impl fmt::Display for TiradsLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TiradsLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [Self::Tr1, Self::Tr2, Self::Tr3, Self::Tr4, Self::Tr5]
            .into_iter()
            .find(|l| l.label() == s)
            .ok_or_else(|| ParseLevelError {
                label: s.to_owned(),
            })
    }
}

//
// ─── POINT TABLE ───────────────────────────────────────────────────────────────
//

fn composition_points(composition: Composition) -> u8 {
    match composition {
        Composition::CysticOrCompletelyCystic | Composition::Spongiform => 0,
        Composition::MixedCysticAndSolid => 1,
        Composition::SolidOrCompletelySolid => 2,
    }
}

fn echogenicity_points(echogenicity: Echogenicity) -> u8 {
    match echogenicity {
        Echogenicity::Anechoic => 0,
        Echogenicity::HyperechoicOrIsoechoic => 1,
        Echogenicity::Hypoechoic => 2,
        Echogenicity::VeryHypoechoic => 3,
    }
}

fn shape_points(shape: NoduleShape) -> u8 {
    match shape {
        NoduleShape::WiderThanTall => 0,
        NoduleShape::TallerThanWide => 3,
    }
}

fn margin_points(margin: Margin) -> u8 {
    match margin {
        Margin::Smooth | Margin::IllDefined => 0,
        Margin::LobulatedOrIrregular => 2,
        Margin::ExtraThyroidalExtension => 3,
    }
}

fn focus_points(focus: EchogenicFocus) -> u8 {
    match focus {
        EchogenicFocus::NoneOrLargeCometTail => 0,
        EchogenicFocus::Macrocalcifications => 1,
        EchogenicFocus::PeripheralCalcifications => 2,
        EchogenicFocus::PunctateEchogenicFoci => 3,
    }
}

/// Compute the TI-RADS point total and level for one set of selections.
///
/// Each field contributes independently; foci contribute the sum over the
/// selected set (additive, not max-of). Pure and deterministic.
#[must_use]
pub fn score(
    composition: Composition,
    echogenicity: Echogenicity,
    shape: NoduleShape,
    margin: Margin,
    foci: &FociSet,
) -> (u8, TiradsLevel) {
    let points = composition_points(composition)
        + echogenicity_points(echogenicity)
        + shape_points(shape)
        + margin_points(margin)
        + foci.iter().map(focus_points).sum::<u8>();

    (points, TiradsLevel::from_points(points))
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
