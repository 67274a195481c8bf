//! Report rendering: markdown summary, HTML for the web UI, optional PDF.
//!
//! PDF generation can fail (missing directory, permissions); the failure is
//! captured on the bundle and the markdown summary is always returned.

pub mod markdown;
pub mod pdf;

use std::path::{Path, PathBuf};

use tracing::warn;

use mindgauge_core::{AnalysisOutcome, MindError};

/// Everything the presentation layer produced for one outcome.
#[derive(Debug, Clone)]
pub struct ReportBundle {
    pub markdown: String,
    /// Written PDF, when requested and successful.
    pub pdf_path: Option<PathBuf>,
    /// Inline message when PDF generation was requested but failed.
    pub pdf_error: Option<String>,
}

/// Render the outcome; optionally also write a PDF into `output_dir`.
pub fn build_report(
    outcome: &AnalysisOutcome,
    generate_pdf: bool,
    output_dir: &Path,
) -> ReportBundle {
    let markdown = markdown::build_markdown(outcome);

    let (pdf_path, pdf_error) = if generate_pdf {
        match pdf::write_pdf(&markdown, output_dir) {
            Ok(path) => (Some(path), None),
            Err(e) => {
                warn!(error = %e, "PDF generation failed");
                (None, Some(MindError::ReportFailed(e.to_string()).to_string()))
            }
        }
    } else {
        (None, None)
    };

    ReportBundle { markdown, pdf_path, pdf_error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindgauge_core::MentalState;

    fn outcome_with_verdict() -> AnalysisOutcome {
        let mut outcome = AnalysisOutcome::default();
        outcome.text_verdict = Some((MentalState::Anxiety, 0.95));
        outcome.combined = Some(mindgauge_core::CombinedResult {
            state: MentalState::Anxiety,
            blended_confidence: 0.95,
            display_accuracy: 0.7,
            tips: vec!["Practice deep breathing exercises.".to_string()],
            foods: vec!["Chamomile tea.".to_string()],
            medication_info: "Educational information only.".to_string(),
        });
        outcome
    }

    #[test]
    fn pdf_failure_does_not_suppress_markdown() {
        let outcome = outcome_with_verdict();
        let bundle = build_report(
            &outcome,
            true,
            Path::new("/proc/definitely-not-writable/reports"),
        );
        assert!(bundle.markdown.contains("Anxiety"));
        assert!(bundle.pdf_path.is_none());
        assert!(bundle.pdf_error.as_deref().unwrap().contains("PDF generation failed"));
    }

    #[test]
    fn no_pdf_requested_means_no_pdf_error() {
        let outcome = outcome_with_verdict();
        let bundle = build_report(&outcome, false, Path::new("reports"));
        assert!(bundle.pdf_path.is_none());
        assert!(bundle.pdf_error.is_none());
    }

    #[test]
    fn pdf_written_into_temp_dir() {
        let dir = std::env::temp_dir().join(format!("mindgauge-report-{}", std::process::id()));
        let outcome = outcome_with_verdict();
        let bundle = build_report(&outcome, true, &dir);
        let path = bundle.pdf_path.expect("pdf path");
        assert!(path.exists());
        assert!(path.file_name().unwrap().to_string_lossy().ends_with(".pdf"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
