//! Report processing: image or text in, one extracted observation out.
//!
//! Recognition runs on a blocking thread. A missing or failing recognizer
//! never fails the request; sample report text is used instead so the caller
//! always gets an observation.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::config::ExtractionConfig;
use crate::models::enums::{ExtractionTier, TextOrigin};
use crate::models::ExtractedObservation;
use crate::pipeline::extraction::medical_correction::correct_medical_terms;
use crate::pipeline::extraction::simulated::SimulatedTextSource;
use crate::pipeline::extraction::types::TextRecognizer;
use crate::pipeline::structuring::orchestrator::ObservationExtractor;

/// Result of processing one upload.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingOutcome {
    pub observation: ExtractedObservation,
    pub text_origin: TextOrigin,
    pub tier: ExtractionTier,
}

pub struct ReportProcessor {
    recognizer: Option<Arc<dyn TextRecognizer>>,
    simulator: SimulatedTextSource,
    extractor: ObservationExtractor,
    config: ExtractionConfig,
}

impl ReportProcessor {
    pub fn new(recognizer: Option<Arc<dyn TextRecognizer>>, config: ExtractionConfig) -> Self {
        Self {
            recognizer,
            simulator: SimulatedTextSource,
            extractor: ObservationExtractor::from_config(&config),
            config,
        }
    }

    /// Processor that always uses sample report text.
    pub fn simulated(config: ExtractionConfig) -> Self {
        Self::new(None, config)
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Recognize `image` and extract an observation from its text.
    pub async fn process_image(&self, image: Vec<u8>, filename: &str) -> ProcessingOutcome {
        let (text, origin) = self.recognize_or_simulate(image, filename).await;
        self.finish(&text, origin, filename)
    }

    /// Extract an observation from text the caller already has.
    pub fn process_text(&self, text: &str, filename: &str) -> ProcessingOutcome {
        self.finish(text, TextOrigin::Provided, filename)
    }

    async fn recognize_or_simulate(&self, image: Vec<u8>, filename: &str) -> (String, TextOrigin) {
        let Some(recognizer) = self.recognizer.clone() else {
            tracing::info!(file = %filename, "No recognizer configured, using sample report text");
            return (self.simulated_text(), TextOrigin::Simulated);
        };

        let engine = recognizer.name().to_string();
        let language = self.config.ocr_language.clone();
        let joined =
            tokio::task::spawn_blocking(move || recognizer.recognize(&image, &language)).await;

        match joined {
            Ok(Ok(text)) => (text, TextOrigin::Recognized),
            Ok(Err(e)) => {
                tracing::warn!(
                    file = %filename,
                    engine = %engine,
                    error = %e,
                    "Text recognition failed, using sample report text"
                );
                (self.simulated_text(), TextOrigin::Simulated)
            }
            Err(e) => {
                tracing::warn!(
                    file = %filename,
                    engine = %engine,
                    error = %e,
                    "Recognition task aborted, using sample report text"
                );
                (self.simulated_text(), TextOrigin::Simulated)
            }
        }
    }

    fn simulated_text(&self) -> String {
        self.simulator.generate(today())
    }

    fn finish(&self, text: &str, origin: TextOrigin, filename: &str) -> ProcessingOutcome {
        let correct = self.config.correct_ocr_terms && origin != TextOrigin::Simulated;
        let (observation, tier) = if correct {
            let corrected = correct_medical_terms(text);
            let (mut observation, tier) = self.extractor.extract_on(&corrected, filename, today());
            // Reviewers see what was recognized, not the corrected text.
            observation.source_text = text.to_string();
            (observation, tier)
        } else {
            self.extractor.extract_on(text, filename, today())
        };
        tracing::info!(
            file = %filename,
            origin = origin.as_str(),
            tier = tier.as_str(),
            test_name = %observation.test_name,
            status = observation.status.as_str(),
            "Report processed"
        );

        ProcessingOutcome {
            observation,
            text_origin: origin,
            tier,
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
