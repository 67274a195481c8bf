//! Sentiment model adapter.
//!
//! Wraps a pre-trained binary sentiment classifier behind HTTP: either the
//! HuggingFace Inference API or a self-hosted text-classification endpoint
//! speaking the same response shape.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Verdict from the sentiment model: label ("POSITIVE"/"NEGATIVE") plus the
/// model's own probability for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentVerdict {
    pub label: String,
    pub score: f64,
}

pub enum SentimentProvider {
    HuggingFace { api_key: Option<String>, model: String },
    Endpoint { url: String },
}

impl SentimentProvider {
    pub fn huggingface(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self::HuggingFace { api_key, model: model.into() }
    }
    pub fn endpoint(url: impl Into<String>) -> Self {
        Self::Endpoint { url: url.into() }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::HuggingFace { .. } => "huggingface",
            Self::Endpoint { .. } => "endpoint",
        }
    }
}

/// Classify text with the sentiment model. Callers are expected to have
/// truncated the input already; the text is sent as-is.
pub async fn classify_sentiment(
    provider: &SentimentProvider,
    text: &str,
) -> Result<SentimentVerdict> {
    let (url, api_key) = match provider {
        SentimentProvider::HuggingFace { api_key, model } => (
            format!("https://api-inference.huggingface.co/models/{model}"),
            api_key.clone(),
        ),
        SentimentProvider::Endpoint { url } => (url.clone(), None),
    };

    info!(provider = provider.name(), "Classifying sentiment");
    let client = reqwest::Client::new();
    let mut req = client.post(&url).json(&serde_json::json!({ "inputs": text }));
    if let Some(key) = api_key {
        req = req.bearer_auth(key);
    }
    let resp = req.send().await?;
    if !resp.status().is_success() {
        bail!(
            "sentiment provider returned {}: {}",
            resp.status(),
            resp.text().await.unwrap_or_default()
        );
    }

    let json: serde_json::Value = resp.json().await?;
    parse_verdict(&json).context("Unexpected sentiment response shape")
}

/// Accepts both `[[{label,score},...]]` (HF Inference API) and
/// `[{label,score},...]` (bare pipeline servers); takes the top candidate.
fn parse_verdict(json: &serde_json::Value) -> Result<SentimentVerdict> {
    let top = if json[0].is_array() { &json[0][0] } else { &json[0] };
    let label = top["label"]
        .as_str()
        .context("missing 'label'")?
        .to_string();
    let score = top["score"].as_f64().context("missing 'score'")?;
    Ok(SentimentVerdict { label, score })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hf_nested_shape() {
        let json = serde_json::json!([[
            { "label": "NEGATIVE", "score": 0.93 },
            { "label": "POSITIVE", "score": 0.07 }
        ]]);
        let v = parse_verdict(&json).unwrap();
        assert_eq!(v.label, "NEGATIVE");
        assert!((v.score - 0.93).abs() < 1e-9);
    }

    #[test]
    fn parses_flat_shape() {
        let json = serde_json::json!([{ "label": "POSITIVE", "score": 0.88 }]);
        let v = parse_verdict(&json).unwrap();
        assert_eq!(v.label, "POSITIVE");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_verdict(&serde_json::json!({ "error": "loading" })).is_err());
    }
}
