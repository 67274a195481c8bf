//! Terminal output: ANSI formatting and result rendering for `analyze`.

use mindgauge_core::{AnalysisOutcome, MentalState};

// ---------------------------------------------------------------------------
// ANSI Color/Style helpers
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM").map(|t| t != "dumb").unwrap_or(false))
}

fn paint(color: &str, text: &str) -> String {
    if supports_color() {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}

fn state_color(state: MentalState) -> &'static str {
    match state {
        MentalState::Anxiety => YELLOW,
        MentalState::DepressionStress => RED,
        MentalState::PositiveNeutral => GREEN,
        MentalState::Neutral => CYAN,
    }
}

// ---------------------------------------------------------------------------
// Formatted notes
// ---------------------------------------------------------------------------

/// Print a formatted INFO note to stdout.
pub fn note_info(msg: &str) {
    if supports_color() {
        println!("{CYAN}{BOLD}ℹ{RESET} {msg}");
    } else {
        println!("INFO: {msg}");
    }
}

/// Print a formatted WARNING note.
pub fn note_warn(msg: &str) {
    if supports_color() {
        println!("{YELLOW}{BOLD}⚠{RESET} {msg}");
    } else {
        println!("WARN: {msg}");
    }
}

/// Print a formatted ERROR note.
pub fn note_error(msg: &str) {
    if supports_color() {
        println!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        println!("ERROR: {msg}");
    }
}

// ---------------------------------------------------------------------------
// Outcome rendering
// ---------------------------------------------------------------------------

/// Render the whole analysis outcome for the terminal.
pub fn print_outcome(outcome: &AnalysisOutcome) {
    if let Some(combined) = &outcome.combined {
        println!();
        println!(
            "Predicted mental state: {}",
            paint(state_color(combined.state), &format!("{BOLD}{}{RESET}", combined.state))
        );
        println!(
            "Confidence: {:.2}   Estimated accuracy: {:.0}% {}",
            combined.blended_confidence,
            combined.display_accuracy * 100.0,
            paint(DIM, "(heuristic)")
        );
    }

    if let Some(text) = &outcome.ocr_text {
        println!("\n{}", paint(BOLD, "Extracted text (OCR):"));
        for line in text.lines() {
            println!("  {}", paint(DIM, line));
        }
    }

    if !outcome.sentences.is_empty() {
        println!("\n{}", paint(BOLD, "Sentence analysis:"));
        for s in &outcome.sentences {
            println!(
                "  [{:>2}/10] {} — {}",
                s.scale,
                paint(state_color(s.detected), s.detected.as_str()),
                s.sentence
            );
        }
    }

    if let Some(face) = &outcome.face {
        println!("\n{}", paint(BOLD, "Face analysis:"));
        println!(
            "  Dominant emotion: {} → {} (confidence {:.2})",
            face.dominant_emotion,
            paint(state_color(face.status), face.status.as_str()),
            face.confidence
        );
        for (emotion, score) in &face.normalized_scores {
            println!("  {:<10} {:.1}/10", emotion, score);
        }
    }

    if let Some(combined) = &outcome.combined {
        println!("\n{}", paint(BOLD, "Daily health tips:"));
        for tip in &combined.tips {
            println!("  - {tip}");
        }
        println!("\n{}", paint(BOLD, "Helpful foods:"));
        for food in &combined.foods {
            println!("  - {food}");
        }
        println!("\n{}", paint(BOLD, "Medication information:"));
        println!("  {}", combined.medication_info);
    }

    for warning in &outcome.warnings {
        note_warn(warning);
    }
}
