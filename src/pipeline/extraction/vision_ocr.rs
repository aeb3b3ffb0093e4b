//! Text recognition through a local Ollama vision model.
//!
//! Images are sent base64-encoded to `/api/chat`; the model is asked to
//! transcribe the report verbatim, without summarizing.

use std::time::{Duration, Instant};

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use super::types::TextRecognizer;
use super::ExtractionError;
use crate::config::ExtractionConfig;

const SYSTEM_PROMPT: &str = "\
You are a transcription engine for scanned laboratory reports. \
Return only the text visible in the image, line by line, exactly as printed. \
Do not summarize, explain or add anything.";

/// Recognizer backed by an Ollama vision model (llava, medgemma, ...).
#[derive(Debug, Clone)]
pub struct VisionRecognizer {
    base_url: String,
    model: String,
    timeout_secs: u64,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl VisionRecognizer {
    pub fn new(base_url: &str, model: &str, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout_secs,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(
            &config.vision_url,
            &config.vision_model,
            config.vision_timeout_secs,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn build_request<'a>(&'a self, image_bytes: &[u8], language: &str) -> ChatRequest<'a> {
        let image = base64::engine::general_purpose::STANDARD.encode(image_bytes);
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                    images: None,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(language),
                    images: Some(vec![image]),
                },
            ],
            stream: false,
        }
    }

    fn map_send_error(&self, e: reqwest::Error) -> ExtractionError {
        if e.is_connect() {
            ExtractionError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            ExtractionError::HttpClient(format!(
                "Request timed out after {}s",
                self.timeout_secs
            ))
        } else {
            ExtractionError::HttpClient(e.to_string())
        }
    }
}

impl TextRecognizer for VisionRecognizer {
    fn recognize(&self, image_bytes: &[u8], language: &str) -> Result<String, ExtractionError> {
        let _span = tracing::info_span!(
            "vision_recognize",
            model = %self.model,
            image_size = image_bytes.len(),
        )
        .entered();
        let start = Instant::now();

        // Built per call: the blocking client must not be created on an async worker.
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| ExtractionError::HttpClient(e.to_string()))?;

        let body = self.build_request(image_bytes, language);
        let response = client
            .post(self.chat_url())
            .json(&body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExtractionError::RecognizerStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| ExtractionError::MalformedResponse(e.to_string()))?;
        let text = clean_transcription(&parsed.message.content);
        if text.is_empty() {
            return Err(ExtractionError::EmptyText);
        }

        tracing::info!(
            elapsed_ms = %start.elapsed().as_millis(),
            text_len = text.len(),
            "Vision recognition complete"
        );
        Ok(text)
    }

    fn name(&self) -> &str {
        "vision"
    }
}

fn user_prompt(language: &str) -> String {
    format!(
        "Transcribe all text in this laboratory report image. \
         The report language is '{language}'. Keep numbers, units and dates exactly as printed."
    )
}

/// Trim the reply and drop a surrounding Markdown code fence if present.
fn clean_transcription(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Skip an info string such as ```text
    let body = match inner.split_once('\n') {
        Some((first, rest)) if !first.trim().contains(' ') => rest,
        _ => inner,
    };
    body.trim().to_string()
}
