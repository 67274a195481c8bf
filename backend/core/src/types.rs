use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The one shared label taxonomy for the whole pipeline.
///
/// Classifier, face adapter, aggregator, tips, and report all speak this enum;
/// display strings are the canonical user-facing labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentalState {
    Anxiety,
    DepressionStress,
    PositiveNeutral,
    Neutral,
}

impl MentalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anxiety => "Anxiety",
            Self::DepressionStress => "Depression/Stress",
            Self::PositiveNeutral => "Positive/Neutral",
            Self::Neutral => "Neutral",
        }
    }

    /// True for states that warrant attention in the aggregation rules
    /// (anything that is neither neutral nor positive).
    pub fn is_concerning(&self) -> bool {
        matches!(self, Self::Anxiety | Self::DepressionStress)
    }

    pub fn all() -> &'static [MentalState] {
        &[
            Self::Anxiety,
            Self::DepressionStress,
            Self::PositiveNeutral,
            Self::Neutral,
        ]
    }
}

impl fmt::Display for MentalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One analysis request: diary text and/or images, evaluated statelessly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Free-text diary entry.
    pub diary_text: Option<String>,
    /// Image containing text to OCR into the diary.
    pub ocr_image: Option<PathBuf>,
    /// Face photo for emotion analysis.
    pub face_image: Option<PathBuf>,
    /// Render a PDF report alongside the markdown summary.
    #[serde(default)]
    pub generate_pdf: bool,
}

impl AnalysisRequest {
    /// A request with no usable signal at all.
    pub fn is_empty(&self) -> bool {
        self.diary_text
            .as_deref()
            .map(|t| t.trim().is_empty())
            .unwrap_or(true)
            && self.ocr_image.is_none()
            && self.face_image.is_none()
    }
}

/// Per-sentence classification result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentenceResult {
    pub sentence: String,
    pub detected: MentalState,
    /// Raw verdict from the model ("POSITIVE"/"NEGATIVE") or "KEYWORD".
    pub sentiment_label: String,
    pub sentiment_score: f64,
    /// Severity scale derived from the score, 1..=10.
    pub scale: u8,
}

/// Result of the face-emotion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceResult {
    pub status: MentalState,
    pub dominant_emotion: String,
    /// Raw per-emotion percentages as returned by the provider (0–100).
    pub raw_scores: BTreeMap<String, f64>,
    /// Per-emotion scores normalized into 0–10.
    pub normalized_scores: BTreeMap<String, f64>,
    /// Heuristic confidence, clamped to [0.30, 0.85]. Cosmetic, not a
    /// statistically meaningful interval.
    pub confidence: f64,
}

/// Final aggregated verdict with its advice payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombinedResult {
    pub state: MentalState,
    /// 0.6 text / 0.4 face weighted blend.
    pub blended_confidence: f64,
    /// Separate display figure: 0.7/0.3 blend plus quality adjustment and
    /// jitter, clamped to [0.40, 0.82].
    pub display_accuracy: f64,
    pub tips: Vec<String>,
    pub foods: Vec<String>,
    pub medication_info: String,
}

/// Everything one pipeline run produced, degradations included.
///
/// External-call failures never escape the pipeline; they land here as
/// inline warning strings and the rest of the fields degrade gracefully.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    /// Text extracted from the OCR image, if one was supplied and readable.
    pub ocr_text: Option<String>,
    /// Overall text verdict (state, confidence), when any text was analyzed.
    pub text_verdict: Option<(MentalState, f64)>,
    pub sentences: Vec<SentenceResult>,
    pub face: Option<FaceResult>,
    pub combined: Option<CombinedResult>,
    pub warnings: Vec<String>,
}

impl AnalysisOutcome {
    pub fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// True when the request yielded no classification at all (e.g. empty
    /// input), leaving only warnings to show.
    pub fn is_warning_only(&self) -> bool {
        self.combined.is_none() && !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_labels_are_canonical() {
        assert_eq!(MentalState::DepressionStress.to_string(), "Depression/Stress");
        assert_eq!(MentalState::PositiveNeutral.to_string(), "Positive/Neutral");
    }

    #[test]
    fn concerning_states() {
        assert!(MentalState::Anxiety.is_concerning());
        assert!(MentalState::DepressionStress.is_concerning());
        assert!(!MentalState::PositiveNeutral.is_concerning());
        assert!(!MentalState::Neutral.is_concerning());
    }

    #[test]
    fn whitespace_only_request_is_empty() {
        let req = AnalysisRequest {
            diary_text: Some("   \n\t".to_string()),
            ..Default::default()
        };
        assert!(req.is_empty());

        let req = AnalysisRequest {
            face_image: Some("face.jpg".into()),
            ..Default::default()
        };
        assert!(!req.is_empty());
    }
}
