//! Export surfaces: lean ISO 15926 JSON, per-category CSV files, and a
//! pretty-printed XML model for downstream CAD/data-exchange tooling.

pub mod csv;
pub mod iso15926;
pub mod xml;

pub use iso15926::to_iso15926;
pub use xml::document_to_xml;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
