use thiserror::Error;

use crate::model::FieldParseError;
use crate::scoring::ParseLevelError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    FieldParse(#[from] FieldParseError),
    #[error(transparent)]
    LevelParse(#[from] ParseLevelError),
}
