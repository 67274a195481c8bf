//! Text classifier: keyword lists first, pre-trained sentiment model second.
//!
//! Keyword lists are checked in a fixed order (Anxiety, then
//! Depression/Stress, then Positive); the first list with a hit wins at a
//! fixed confidence. Only keyword-free text reaches the model.

use anyhow::{bail, Result};
use async_trait::async_trait;

use mindgauge_core::MentalState;
use mindgauge_understanding::sentiment::{classify_sentiment, SentimentProvider, SentimentVerdict};

/// Confidence assigned to any keyword hit.
pub const KEYWORD_CONFIDENCE: f64 = 0.95;

/// Model input is truncated to this many characters before the call.
pub const MAX_MODEL_INPUT_CHARS: usize = 512;

const ANXIETY_KEYWORDS: &[&str] = &["anxious", "anxiety", "nervous", "worried", "panic"];
const DEPRESSION_KEYWORDS: &[&str] =
    &["depressed", "depression", "sad", "unhappy", "lonely", "stress"];
const POSITIVE_KEYWORDS: &[&str] = &["happy", "joy", "excited", "good", "great", "motivated"];

/// A classified piece of text: the state plus the evidence behind it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextClassification {
    pub state: MentalState,
    pub confidence: f64,
    /// "KEYWORD" for list hits, otherwise the model's verdict label.
    pub sentiment_label: String,
    pub sentiment_score: f64,
}

/// Seam for the sentiment model so tests can stub the network call.
#[async_trait]
pub trait SentimentBackend: Send + Sync {
    async fn classify(&self, text: &str) -> Result<SentimentVerdict>;
}

#[async_trait]
impl SentimentBackend for SentimentProvider {
    async fn classify(&self, text: &str) -> Result<SentimentVerdict> {
        classify_sentiment(self, text).await
    }
}

/// Substring search over the keyword lists, first match wins.
///
/// List order is the tie-break: text containing both an anxiety keyword and a
/// depression keyword classifies as Anxiety.
pub fn keyword_classify(text: &str) -> Option<TextClassification> {
    let lower = text.to_lowercase();
    let lists = [
        (MentalState::Anxiety, ANXIETY_KEYWORDS),
        (MentalState::DepressionStress, DEPRESSION_KEYWORDS),
        (MentalState::PositiveNeutral, POSITIVE_KEYWORDS),
    ];
    for (state, keywords) in lists {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return Some(TextClassification {
                state,
                confidence: KEYWORD_CONFIDENCE,
                sentiment_label: "KEYWORD".to_string(),
                sentiment_score: KEYWORD_CONFIDENCE,
            });
        }
    }
    None
}

/// Truncate to the model limit on a char boundary.
fn truncate_for_model(text: &str) -> String {
    text.chars().take(MAX_MODEL_INPUT_CHARS).collect()
}

/// Classify via the sentiment model: POSITIVE maps to Positive/Neutral,
/// anything else to Depression/Stress, with the model's probability as
/// confidence.
pub async fn model_classify(
    text: &str,
    backend: &dyn SentimentBackend,
) -> Result<TextClassification> {
    let verdict = backend.classify(&truncate_for_model(text)).await?;
    let state = if verdict.label == "POSITIVE" {
        MentalState::PositiveNeutral
    } else {
        MentalState::DepressionStress
    };
    Ok(TextClassification {
        state,
        confidence: verdict.score,
        sentiment_score: verdict.score,
        sentiment_label: verdict.label,
    })
}

/// Full classifier contract: keywords first, model fallback.
///
/// Errors when the fallback is needed but no backend is configured; the
/// pipeline converts that into a warning and a Neutral verdict.
pub async fn classify_text(
    text: &str,
    backend: Option<&dyn SentimentBackend>,
) -> Result<TextClassification> {
    if let Some(hit) = keyword_classify(text) {
        return Ok(hit);
    }
    match backend {
        Some(backend) => model_classify(text, backend).await,
        None => bail!("no sentiment provider configured and no keyword matched"),
    }
}

/// Split diary text into sentences on `.`, `!`, `?` terminators.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split_inclusive(['.', '!', '?'])
        .map(|s| s.trim().trim_end_matches(['.', '!', '?']).trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Map a confidence in [0,1] onto the 1..=10 severity scale.
pub fn scale_from_confidence(confidence: f64) -> u8 {
    ((confidence * 10.0).round() as i64).clamp(1, 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct StubBackend {
        label: &'static str,
        score: f64,
        seen: Mutex<Vec<String>>,
    }

    impl StubBackend {
        fn new(label: &'static str, score: f64) -> Self {
            Self { label, score, seen: Mutex::new(Vec::new()) }
        }
    }

    #[async_trait]
    impl SentimentBackend for StubBackend {
        async fn classify(&self, text: &str) -> Result<SentimentVerdict> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(SentimentVerdict { label: self.label.to_string(), score: self.score })
        }
    }

    fn as_backend(stub: &StubBackend) -> Option<&dyn SentimentBackend> {
        Some(stub)
    }

    #[tokio::test]
    async fn anxious_always_wins_with_fixed_confidence() {
        let result = classify_text("Today I felt anxious about everything", None)
            .await
            .unwrap();
        assert_eq!(result.state, MentalState::Anxiety);
        assert_eq!(result.confidence, KEYWORD_CONFIDENCE);
        assert_eq!(result.sentiment_label, "KEYWORD");
    }

    #[tokio::test]
    async fn anxiety_list_precedes_depression_list() {
        // Contains both "worried" (anxiety) and "sad" (depression).
        let result = classify_text("worried and sad all day", None).await.unwrap();
        assert_eq!(result.state, MentalState::Anxiety);
    }

    #[tokio::test]
    async fn keyword_hit_never_calls_the_model() {
        let backend = StubBackend::new("NEGATIVE", 0.99);
        let result = classify_text("feeling great", as_backend(&backend)).await.unwrap();
        assert_eq!(result.state, MentalState::PositiveNeutral);
        assert!(backend.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn model_fallback_maps_positive() {
        let backend = StubBackend::new("POSITIVE", 0.87);
        let result = classify_text("the weather held up", as_backend(&backend)).await.unwrap();
        assert_eq!(result.state, MentalState::PositiveNeutral);
        assert!((result.confidence - 0.87).abs() < 1e-9);
        assert_eq!(result.sentiment_label, "POSITIVE");
    }

    #[tokio::test]
    async fn model_fallback_maps_negative_to_depression_stress() {
        let backend = StubBackend::new("NEGATIVE", 0.71);
        let result = classify_text("the weather held up", as_backend(&backend)).await.unwrap();
        assert_eq!(result.state, MentalState::DepressionStress);
    }

    #[tokio::test]
    async fn model_input_is_truncated_to_512_chars() {
        let backend = StubBackend::new("POSITIVE", 0.5);
        let long = "x".repeat(2000);
        classify_text(&long, as_backend(&backend)).await.unwrap();
        let seen = backend.seen.lock().unwrap();
        assert_eq!(seen[0].chars().count(), MAX_MODEL_INPUT_CHARS);
    }

    #[tokio::test]
    async fn no_keyword_and_no_backend_is_an_error() {
        assert!(classify_text("the weather held up", None).await.is_err());
    }

    #[test]
    fn sentence_splitting() {
        let sentences = split_sentences("Slept badly. Work was fine! Tomorrow?");
        assert_eq!(sentences, vec!["Slept badly", "Work was fine", "Tomorrow"]);
    }

    #[test]
    fn severity_scale_bounds() {
        assert_eq!(scale_from_confidence(0.0), 1);
        assert_eq!(scale_from_confidence(0.95), 10);
        assert_eq!(scale_from_confidence(0.44), 4);
        assert_eq!(scale_from_confidence(1.0), 10);
    }
}
