pub mod types;
pub mod ocr;
pub mod vision_ocr;
pub mod simulated;
pub mod medical_correction;

pub use types::*;
pub use ocr::*;
pub use vision_ocr::*;
pub use simulated::*;
pub use medical_correction::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Recognizer is not reachable at {0}")]
    Connection(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Recognizer returned error (status {status}): {body}")]
    RecognizerStatus { status: u16, body: String },

    #[error("Malformed recognizer response: {0}")]
    MalformedResponse(String),

    #[error("Recognizer produced no text")]
    EmptyText,

    #[error("OCR processing failed: {0}")]
    OcrProcessing(String),
}
