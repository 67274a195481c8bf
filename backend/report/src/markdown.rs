//! Markdown summary builder and HTML renderer.

use std::fmt::Write as _;

use chrono::Utc;
use pulldown_cmark::{Options, Parser, html};

use mindgauge_core::AnalysisOutcome;

/// Build the full markdown summary for one analysis outcome.
pub fn build_markdown(outcome: &AnalysisOutcome) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# Mental Health Analysis");
    let _ = writeln!(md, "\n_Generated {}_\n", Utc::now().format("%Y-%m-%d %H:%M UTC"));

    if let Some(combined) = &outcome.combined {
        let _ = writeln!(md, "## Verdict\n");
        let _ = writeln!(md, "**Predicted mental state: {}**\n", combined.state);
        let _ = writeln!(
            md,
            "- Confidence: {:.2}\n- Estimated accuracy: {:.0}% (heuristic display figure)\n",
            combined.blended_confidence,
            combined.display_accuracy * 100.0
        );
    }

    if let Some(text) = &outcome.ocr_text {
        let _ = writeln!(md, "## Extracted Text (OCR)\n");
        let _ = writeln!(md, "> {}\n", text.replace('\n', "\n> "));
    }

    if !outcome.sentences.is_empty() {
        let _ = writeln!(md, "## Sentence Analysis\n");
        let _ = writeln!(md, "| Sentence | State | Signal | Scale (1-10) |");
        let _ = writeln!(md, "| --- | --- | --- | --- |");
        for s in &outcome.sentences {
            let _ = writeln!(
                md,
                "| {} | {} | {} ({:.2}) | {} |",
                s.sentence.replace('|', "\\|"),
                s.detected,
                s.sentiment_label,
                s.sentiment_score,
                s.scale
            );
        }
        let _ = writeln!(md);
    }

    if let Some(face) = &outcome.face {
        let _ = writeln!(md, "## Face Analysis\n");
        let _ = writeln!(
            md,
            "Dominant emotion: **{}** → {} (confidence {:.2}, heuristic)\n",
            face.dominant_emotion, face.status, face.confidence
        );
        let _ = writeln!(md, "| Emotion | Score (0-10) |");
        let _ = writeln!(md, "| --- | --- |");
        for (emotion, score) in &face.normalized_scores {
            let _ = writeln!(md, "| {} | {:.1} |", emotion, score);
        }
        let _ = writeln!(md);
    }

    if let Some(combined) = &outcome.combined {
        let _ = writeln!(md, "## Daily Health Tips\n");
        for tip in &combined.tips {
            let _ = writeln!(md, "- {}", tip);
        }
        let _ = writeln!(md, "\n## Helpful Foods\n");
        for food in &combined.foods {
            let _ = writeln!(md, "- {}", food);
        }
        let _ = writeln!(md, "\n## Medication Information\n");
        let _ = writeln!(md, "{}\n", combined.medication_info);
    }

    if !outcome.warnings.is_empty() {
        let _ = writeln!(md, "## Notes\n");
        for warning in &outcome.warnings {
            let _ = writeln!(md, "- ⚠ {}", warning);
        }
    }

    md
}

/// Render markdown to an HTML fragment for the web front end.
pub fn to_html(markdown: &str) -> String {
    let mut out = String::with_capacity(markdown.len() * 2);
    html::push_html(&mut out, Parser::new_ext(markdown, Options::ENABLE_TABLES));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindgauge_core::{CombinedResult, MentalState, SentenceResult};

    #[test]
    fn warning_only_outcome_still_renders() {
        let mut outcome = AnalysisOutcome::default();
        outcome.warn("Please enter some text or provide an image to analyze.");
        let md = build_markdown(&outcome);
        assert!(md.contains("## Notes"));
        assert!(md.contains("Please enter some text"));
        assert!(!md.contains("## Verdict"));
    }

    #[test]
    fn full_outcome_renders_every_section() {
        let mut outcome = AnalysisOutcome::default();
        outcome.ocr_text = Some("felt low today".to_string());
        outcome.sentences.push(SentenceResult {
            sentence: "felt low today".to_string(),
            detected: MentalState::DepressionStress,
            sentiment_label: "KEYWORD".to_string(),
            sentiment_score: 0.95,
            scale: 10,
        });
        outcome.combined = Some(CombinedResult {
            state: MentalState::DepressionStress,
            blended_confidence: 0.95,
            display_accuracy: 0.66,
            tips: vec!["Go outside and get sunlight daily.".to_string()],
            foods: vec!["Leafy greens and whole grains.".to_string()],
            medication_info: "Educational information only.".to_string(),
        });

        let md = build_markdown(&outcome);
        for section in [
            "## Verdict",
            "## Extracted Text (OCR)",
            "## Sentence Analysis",
            "## Daily Health Tips",
            "## Helpful Foods",
            "## Medication Information",
        ] {
            assert!(md.contains(section), "missing section {section}");
        }
        assert!(md.contains("Depression/Stress"));
    }

    #[test]
    fn html_rendering_produces_headings() {
        let html = to_html("# Title\n\n- item\n");
        assert!(html.contains("<h1>"));
        assert!(html.contains("<li>"));
    }
}
