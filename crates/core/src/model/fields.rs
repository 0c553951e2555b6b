use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a stored label does not match any known category.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unrecognized {field} label: {label:?}")]
pub struct FieldParseError {
    pub field: &'static str,
    pub label: String,
}

impl FieldParseError {
    fn new(field: &'static str, label: &str) -> Self {
        Self {
            field,
            label: label.to_owned(),
        }
    }
}

// ─── Composition ───────────────────────────────────────────────────────────────

/// Nodule composition category.
///
/// The `Display`/`FromStr` labels are the exact strings persisted in the
/// annotation store, so they must never change for existing data.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Composition {
    #[serde(rename = "Cystic or completely cystic")]
    CysticOrCompletelyCystic,
    #[serde(rename = "Spongiform")]
    Spongiform,
    #[serde(rename = "Mixed cystic and solid")]
    MixedCysticAndSolid,
    #[serde(rename = "Solid or completely solid")]
    SolidOrCompletelySolid,
}

impl Composition {
    pub const ALL: [Self; 4] = [
        Self::CysticOrCompletelyCystic,
        Self::Spongiform,
        Self::MixedCysticAndSolid,
        Self::SolidOrCompletelySolid,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::CysticOrCompletelyCystic => "Cystic or completely cystic",
            Self::Spongiform => "Spongiform",
            Self::MixedCysticAndSolid => "Mixed cystic and solid",
            Self::SolidOrCompletelySolid => "Solid or completely solid",
        }
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Composition {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.label() == s)
            .ok_or_else(|| FieldParseError::new("composition", s))
    }
}

// ─── Echogenicity ──────────────────────────────────────────────────────────────

/// Nodule echogenicity category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Echogenicity {
    #[serde(rename = "Anechoic")]
    Anechoic,
    #[serde(rename = "Hyperechoic or isoechoic")]
    HyperechoicOrIsoechoic,
    #[serde(rename = "Hypoechoic")]
    Hypoechoic,
    #[serde(rename = "Very hypoechoic")]
    VeryHypoechoic,
}

impl Echogenicity {
    pub const ALL: [Self; 4] = [
        Self::Anechoic,
        Self::HyperechoicOrIsoechoic,
        Self::Hypoechoic,
        Self::VeryHypoechoic,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Anechoic => "Anechoic",
            Self::HyperechoicOrIsoechoic => "Hyperechoic or isoechoic",
            Self::Hypoechoic => "Hypoechoic",
            Self::VeryHypoechoic => "Very hypoechoic",
        }
    }
}

impl fmt::Display for Echogenicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Echogenicity {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.label() == s)
            .ok_or_else(|| FieldParseError::new("echogenicity", s))
    }
}

// ─── Shape ─────────────────────────────────────────────────────────────────────

/// Nodule shape on the transverse view.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum NoduleShape {
    #[serde(rename = "Wider than tall")]
    WiderThanTall,
    #[serde(rename = "Taller than wide")]
    TallerThanWide,
}

impl NoduleShape {
    pub const ALL: [Self; 2] = [Self::WiderThanTall, Self::TallerThanWide];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::WiderThanTall => "Wider than tall",
            Self::TallerThanWide => "Taller than wide",
        }
    }
}

impl fmt::Display for NoduleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NoduleShape {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.label() == s)
            .ok_or_else(|| FieldParseError::new("nod_shape", s))
    }
}

// ─── Margin ────────────────────────────────────────────────────────────────────

/// Nodule margin category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Margin {
    #[serde(rename = "Smooth")]
    Smooth,
    #[serde(rename = "Ill defined")]
    IllDefined,
    #[serde(rename = "Lobulated or irregular")]
    LobulatedOrIrregular,
    #[serde(rename = "Extra thyroidal extension")]
    ExtraThyroidalExtension,
}

impl Margin {
    pub const ALL: [Self; 4] = [
        Self::Smooth,
        Self::IllDefined,
        Self::LobulatedOrIrregular,
        Self::ExtraThyroidalExtension,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Smooth => "Smooth",
            Self::IllDefined => "Ill defined",
            Self::LobulatedOrIrregular => "Lobulated or irregular",
            Self::ExtraThyroidalExtension => "Extra thyroidal extension",
        }
    }
}

impl fmt::Display for Margin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Margin {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.label() == s)
            .ok_or_else(|| FieldParseError::new("margin", s))
    }
}

// ─── Echogenic foci ────────────────────────────────────────────────────────────

/// One echogenic-focus finding; zero or more may apply to a nodule.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum EchogenicFocus {
    #[serde(rename = "None or large comet-tail artifacts")]
    NoneOrLargeCometTail,
    #[serde(rename = "Macrocalcifications")]
    Macrocalcifications,
    #[serde(rename = "Peripheral (rim) calcifications")]
    PeripheralCalcifications,
    #[serde(rename = "Punctate echogenic foci")]
    PunctateEchogenicFoci,
}

impl EchogenicFocus {
    pub const ALL: [Self; 4] = [
        Self::NoneOrLargeCometTail,
        Self::Macrocalcifications,
        Self::PeripheralCalcifications,
        Self::PunctateEchogenicFoci,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::NoneOrLargeCometTail => "None or large comet-tail artifacts",
            Self::Macrocalcifications => "Macrocalcifications",
            Self::PeripheralCalcifications => "Peripheral (rim) calcifications",
            Self::PunctateEchogenicFoci => "Punctate echogenic foci",
        }
    }
}

impl fmt::Display for EchogenicFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EchogenicFocus {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.label() == s)
            .ok_or_else(|| FieldParseError::new("echogenic_foci", s))
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composition_label_round_trips() {
        for value in Composition::ALL {
            let parsed: Composition = value.label().parse().unwrap();
            assert_eq!(parsed, value);
        }
    }

    #[test]
    fn margin_label_round_trips() {
        for value in Margin::ALL {
            let parsed: Margin = value.label().parse().unwrap();
            assert_eq!(parsed, value);
        }
    }

    #[test]
    fn focus_label_round_trips() {
        for value in EchogenicFocus::ALL {
            let parsed: EchogenicFocus = value.label().parse().unwrap();
            assert_eq!(parsed, value);
        }
    }

    #[test]
    fn unknown_label_is_an_error() {
        let err = "Solidish".parse::<Composition>().unwrap_err();
        assert_eq!(err.field, "composition");
        assert_eq!(err.label, "Solidish");
    }

    #[test]
    fn labels_match_serde_names() {
        // The JSON encoding of a focus must be its display label, since the
        // store's multi-value cell is a JSON array of labels.
        let json = serde_json::to_string(&EchogenicFocus::PeripheralCalcifications).unwrap();
        assert_eq!(json, "\"Peripheral (rim) calcifications\"");
    }
}
