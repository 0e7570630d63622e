pub mod normalizer;
pub mod orchestrator;
pub mod postprocess;
pub mod prompt;
pub mod response;
pub mod validate;
pub mod vision;

pub use normalizer::*;
pub use orchestrator::*;
pub use postprocess::*;
pub use response::*;
pub use validate::*;
pub use vision::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Vision model endpoint is not reachable at {0}")]
    ModelConnection(String),

    #[error("Vision model returned error (status {status}): {body}")]
    ModelError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("JSON parsing error: {0}")]
    JsonParsing(String),

    #[error("Schema validation failed: {0}")]
    Schema(#[from] validate::SchemaViolation),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
