use thiserror::Error;

/// Degradation errors raised by individual pipeline stages.
///
/// These never abort a run; the pipeline renders them into the outcome's
/// warning list, so the Display strings double as user-facing messages.
#[derive(Debug, Error)]
pub enum MindError {
    #[error("OCR failed ({engine}): {message}")]
    OcrFailed { engine: String, message: String },

    #[error("Sentiment model unavailable: {0}")]
    SentimentUnavailable(String),

    #[error("Face analysis failed ({provider}): {message}")]
    FaceFailed { provider: String, message: String },

    #[error("PDF generation failed: {0}")]
    ReportFailed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_failing_component() {
        let e = MindError::OcrFailed {
            engine: "tesseract".to_string(),
            message: "binary not found".to_string(),
        };
        assert_eq!(e.to_string(), "OCR failed (tesseract): binary not found");

        let e = MindError::SentimentUnavailable("connection refused".to_string());
        assert!(e.to_string().starts_with("Sentiment model unavailable"));
    }
}
