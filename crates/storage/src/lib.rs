#![forbid(unsafe_code)]

pub mod csv;
mod csv_line;
pub mod index;
pub mod repository;

pub use csv::CsvAnnotationStore;
pub use index::FileIndex;
pub use repository::{AnnotationRepository, AnnotationRow, InMemoryAnnotationStore, StorageError};
