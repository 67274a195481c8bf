//! The end-to-end analysis pipeline.
//!
//! One request in, one `AnalysisOutcome` out, always. Every external call
//! (OCR, sentiment, face) is caught at its call site and degraded into an
//! inline warning; a missing signal lowers the display accuracy but never
//! aborts the rest of the run.

use tracing::{info, warn};

use mindgauge_core::{
    AnalysisOutcome, AnalysisRequest, CombinedResult, MentalState, MindError, SentenceResult,
};
use mindgauge_understanding::face::{analyze_face, FaceProvider};
use mindgauge_understanding::ocr::{extract_text, OcrEngine};

use crate::aggregate;
use crate::classify::{self, SentimentBackend};

/// Warning shown when the request carries no usable input at all.
pub const EMPTY_INPUT_WARNING: &str =
    "Please enter some text or provide an image to analyze.";

/// A configured pipeline. All parts are optional; missing ones degrade the
/// outcome with warnings instead of failing it.
#[derive(Default)]
pub struct Pipeline {
    pub sentiment: Option<Box<dyn SentimentBackend>>,
    pub ocr: Option<OcrEngine>,
    pub face: Option<FaceProvider>,
}

impl Pipeline {
    /// Run one request start to finish. Never returns an error: failures of
    /// individual stages surface as warnings on the outcome.
    pub async fn run(&self, request: &AnalysisRequest) -> AnalysisOutcome {
        let mut outcome = AnalysisOutcome::default();

        if request.is_empty() {
            outcome.warn(EMPTY_INPUT_WARNING);
            return outcome;
        }

        if let Some(image) = &request.ocr_image {
            self.run_ocr(image, &mut outcome).await;
        }

        let text = collect_text(request, &outcome);
        if !text.trim().is_empty() {
            self.run_text_analysis(&text, &mut outcome).await;
        }

        if let Some(image) = &request.face_image {
            self.run_face(image, &mut outcome).await;
        }

        self.finish(&mut outcome);
        outcome
    }

    async fn run_ocr(&self, image: &std::path::Path, outcome: &mut AnalysisOutcome) {
        let Some(engine) = &self.ocr else {
            outcome.warn("An OCR image was provided but no OCR engine is configured.");
            return;
        };
        match extract_text(engine, image).await {
            Ok(text) if text.is_empty() => {
                outcome.warn("OCR found no readable text in the image.");
            }
            Ok(text) => {
                info!(chars = text.len(), "OCR extracted text");
                outcome.ocr_text = Some(text);
            }
            Err(e) => {
                warn!(error = %e, "OCR failed");
                outcome.warn(
                    MindError::OcrFailed {
                        engine: engine.name().to_string(),
                        message: e.to_string(),
                    }
                    .to_string(),
                );
            }
        }
    }

    async fn run_text_analysis(&self, text: &str, outcome: &mut AnalysisOutcome) {
        let backend = self.sentiment.as_deref();

        let mut fallback_warned = false;
        for sentence in classify::split_sentences(text) {
            match classify::classify_text(&sentence, backend).await {
                Ok(c) => outcome.sentences.push(SentenceResult {
                    sentence,
                    detected: c.state,
                    scale: classify::scale_from_confidence(c.confidence),
                    sentiment_label: c.sentiment_label,
                    sentiment_score: c.sentiment_score,
                }),
                Err(e) => {
                    if !fallback_warned {
                        outcome.warn(MindError::SentimentUnavailable(e.to_string()).to_string());
                        fallback_warned = true;
                    }
                    outcome.sentences.push(SentenceResult {
                        sentence,
                        detected: MentalState::Neutral,
                        sentiment_label: "UNAVAILABLE".to_string(),
                        sentiment_score: 0.0,
                        scale: 1,
                    });
                }
            }
        }

        match classify::classify_text(text, backend).await {
            Ok(c) => outcome.text_verdict = Some((c.state, c.confidence)),
            Err(e) => {
                if !fallback_warned {
                    outcome.warn(MindError::SentimentUnavailable(e.to_string()).to_string());
                }
                outcome.text_verdict = Some((MentalState::Neutral, 0.0));
            }
        }
    }

    async fn run_face(&self, image: &std::path::Path, outcome: &mut AnalysisOutcome) {
        let Some(provider) = &self.face else {
            outcome.warn("A face image was provided but no face provider is configured.");
            return;
        };
        match analyze_face(provider, image).await {
            Ok(result) => outcome.face = Some(result),
            Err(e) => {
                warn!(error = %e, "Face analysis failed");
                outcome.warn(
                    MindError::FaceFailed {
                        provider: provider.name().to_string(),
                        message: e.to_string(),
                    }
                    .to_string(),
                );
            }
        }
    }

    /// Aggregate the signals and attach the advice payload.
    fn finish(&self, outcome: &mut AnalysisOutcome) {
        let Some((state, blended_confidence)) =
            aggregate::combine(outcome.text_verdict, outcome.face.as_ref())
        else {
            if outcome.warnings.is_empty() {
                outcome.warn("No analyzable signal was produced from the inputs.");
            }
            return;
        };

        let display_accuracy = aggregate::display_accuracy(
            outcome.text_verdict.map(|(_, c)| c),
            outcome.face.as_ref().map(|f| f.confidence),
            outcome.warnings.len(),
        );

        outcome.combined = Some(CombinedResult {
            state,
            blended_confidence,
            display_accuracy,
            tips: mindgauge_tips::tips_for(state),
            foods: mindgauge_tips::foods_for(state),
            medication_info: mindgauge_tips::medication_info(state),
        });
    }
}

/// Diary text and OCR text are analyzed together, diary first.
fn collect_text(request: &AnalysisRequest, outcome: &AnalysisOutcome) -> String {
    let mut parts = Vec::new();
    if let Some(diary) = request.diary_text.as_deref() {
        if !diary.trim().is_empty() {
            parts.push(diary.trim().to_string());
        }
    }
    if let Some(ocr) = outcome.ocr_text.as_deref() {
        parts.push(ocr.to_string());
    }
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{ACCURACY_MAX, ACCURACY_MIN};

    fn text_request(text: &str) -> AnalysisRequest {
        AnalysisRequest {
            diary_text: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn empty_input_is_a_warning_state() {
        let pipeline = Pipeline::default();
        let outcome = pipeline.run(&text_request("   \n ")).await;
        assert!(outcome.is_warning_only());
        assert_eq!(outcome.warnings, vec![EMPTY_INPUT_WARNING.to_string()]);
        assert!(outcome.sentences.is_empty());
        assert!(outcome.text_verdict.is_none());
    }

    #[tokio::test]
    async fn keyword_text_produces_full_outcome_without_any_provider() {
        let pipeline = Pipeline::default();
        let outcome = pipeline
            .run(&text_request("I was anxious before the meeting. It went great!"))
            .await;

        let combined = outcome.combined.expect("combined result");
        assert_eq!(combined.state, MentalState::Anxiety);
        assert!((combined.blended_confidence - 0.95).abs() < 1e-9);
        assert!((ACCURACY_MIN..=ACCURACY_MAX).contains(&combined.display_accuracy));
        assert_eq!(outcome.sentences.len(), 2);
        assert_eq!(outcome.sentences[1].detected, MentalState::PositiveNeutral);
        assert!(!combined.tips.is_empty());
        assert!(!combined.foods.is_empty());
    }

    #[tokio::test]
    async fn failing_ocr_degrades_instead_of_failing() {
        let pipeline = Pipeline {
            ocr: Some(OcrEngine::Tesseract {
                command: "no-such-ocr-binary".to_string(),
            }),
            ..Default::default()
        };
        let request = AnalysisRequest {
            diary_text: Some("felt worried all morning".to_string()),
            ocr_image: Some("missing.png".into()),
            ..Default::default()
        };

        let outcome = pipeline.run(&request).await;

        assert!(
            outcome.warnings.iter().any(|w| w.contains("OCR failed")),
            "warnings: {:?}",
            outcome.warnings
        );
        // The text half of the pipeline still ran.
        let combined = outcome.combined.expect("combined result survives OCR failure");
        assert_eq!(combined.state, MentalState::Anxiety);
    }

    #[tokio::test]
    async fn ocr_image_without_engine_warns() {
        let pipeline = Pipeline::default();
        let request = AnalysisRequest {
            ocr_image: Some("diary.png".into()),
            ..Default::default()
        };
        let outcome = pipeline.run(&request).await;
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.contains("no OCR engine")));
    }

    #[tokio::test]
    async fn non_keyword_text_without_model_is_neutral_with_warning() {
        let pipeline = Pipeline::default();
        let outcome = pipeline.run(&text_request("The report is due on Monday.")).await;

        assert_eq!(outcome.text_verdict, Some((MentalState::Neutral, 0.0)));
        assert!(outcome
            .warnings
            .iter()
            .any(|w| w.contains("Sentiment model unavailable")));
        let combined = outcome.combined.expect("still produces a combined result");
        assert_eq!(combined.state, MentalState::Neutral);
    }
}
