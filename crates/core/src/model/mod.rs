mod fields;
mod foci;
mod record;

pub use fields::{
    Composition, EchogenicFocus, Echogenicity, FieldParseError, Margin, NoduleShape,
};
pub use foci::FociSet;
pub use record::Assessment;
