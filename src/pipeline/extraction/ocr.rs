use super::types::TextRecognizer;
use super::ExtractionError;

/// Mock recognizer returning fixed text, for unit testing.
pub struct MockRecognizer {
    pub text: String,
}

impl MockRecognizer {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl TextRecognizer for MockRecognizer {
    fn recognize(&self, _image_bytes: &[u8], _language: &str) -> Result<String, ExtractionError> {
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Recognizer that always fails, for exercising the simulated-text fallback.
pub struct FailingRecognizer;

impl TextRecognizer for FailingRecognizer {
    fn recognize(&self, _image_bytes: &[u8], _language: &str) -> Result<String, ExtractionError> {
        Err(ExtractionError::OcrProcessing("recognizer unavailable".into()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}
