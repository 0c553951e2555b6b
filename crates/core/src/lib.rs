#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod scoring;

pub use error::Error;
pub use model::{
    Assessment, Composition, EchogenicFocus, Echogenicity, FieldParseError, FociSet, Margin,
    NoduleShape,
};
pub use scoring::{TiradsLevel, score};
