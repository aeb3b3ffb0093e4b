use super::ExtractionError;

/// Text source for report images (allows mocking for tests).
///
/// Implementations may block; async callers run them on a blocking thread.
pub trait TextRecognizer: Send + Sync {
    /// Recognize the text of one image. `language` is a recognition target
    /// tag such as `"eng"`.
    fn recognize(&self, image_bytes: &[u8], language: &str) -> Result<String, ExtractionError>;

    /// Short name for logs.
    fn name(&self) -> &str;
}
