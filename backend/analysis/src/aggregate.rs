//! Aggregator: blends the text and face signals into one verdict.
//!
//! Two separate figures come out of this module, both heuristic display
//! material rather than calibrated probabilities:
//!
//! * `blended_confidence` — the 0.6 text / 0.4 face weighted blend attached
//!   to the final state.
//! * `display_accuracy` — a separately weighted 0.7/0.3 figure with a data
//!   quality adjustment and random jitter, clamped to [0.40, 0.82].

use mindgauge_core::{FaceResult, MentalState};
use rand::Rng;

/// Blend weights for the final confidence.
pub const TEXT_BLEND_WEIGHT: f64 = 0.6;
pub const FACE_BLEND_WEIGHT: f64 = 0.4;

/// A confident, non-neutral text verdict above this threshold resists a
/// concerning face override.
pub const TEXT_OVERRIDE_THRESHOLD: f64 = 0.7;

/// Weights for the display-accuracy figure.
pub const ACCURACY_TEXT_WEIGHT: f64 = 0.7;
pub const ACCURACY_FACE_WEIGHT: f64 = 0.3;

/// Bonus when both signals are present; penalty per degradation warning.
pub const QUALITY_BONUS: f64 = 0.05;
pub const QUALITY_PENALTY: f64 = 0.05;

/// Uniform jitter applied to the display accuracy.
pub const ACCURACY_JITTER: f64 = 0.03;

/// Hard bounds on the display accuracy.
pub const ACCURACY_MIN: f64 = 0.40;
pub const ACCURACY_MAX: f64 = 0.82;

/// Combine zero, one, or two signals into a final (state, blended confidence).
///
/// With both present, a concerning face state (Anxiety or Depression/Stress)
/// overrides the text state unless the text verdict is both confident
/// (> 0.7) and not Neutral. Returns `None` when no signal exists.
pub fn combine(
    text: Option<(MentalState, f64)>,
    face: Option<&FaceResult>,
) -> Option<(MentalState, f64)> {
    match (text, face) {
        (Some((text_state, text_conf)), Some(face)) => {
            let text_holds =
                text_conf > TEXT_OVERRIDE_THRESHOLD && text_state != MentalState::Neutral;
            let state = if face.status.is_concerning() && !text_holds {
                face.status
            } else {
                text_state
            };
            let confidence =
                TEXT_BLEND_WEIGHT * text_conf + FACE_BLEND_WEIGHT * face.confidence;
            Some((state, confidence))
        }
        (Some(text), None) => Some(text),
        (None, Some(face)) => Some((face.status, face.confidence)),
        (None, None) => None,
    }
}

/// Compute the display-accuracy figure shown alongside the verdict.
pub fn display_accuracy(
    text_confidence: Option<f64>,
    face_confidence: Option<f64>,
    warning_count: usize,
) -> f64 {
    display_accuracy_with_rng(
        text_confidence,
        face_confidence,
        warning_count,
        &mut rand::thread_rng(),
    )
}

pub fn display_accuracy_with_rng(
    text_confidence: Option<f64>,
    face_confidence: Option<f64>,
    warning_count: usize,
    rng: &mut impl Rng,
) -> f64 {
    let mut accuracy = ACCURACY_TEXT_WEIGHT * text_confidence.unwrap_or(0.0)
        + ACCURACY_FACE_WEIGHT * face_confidence.unwrap_or(0.0);

    // Data quality: reward having both signals, penalize each degradation.
    if text_confidence.is_some() && face_confidence.is_some() {
        accuracy += QUALITY_BONUS;
    }
    accuracy -= QUALITY_PENALTY * warning_count as f64;

    accuracy += rng.gen_range(-ACCURACY_JITTER..ACCURACY_JITTER);
    accuracy.clamp(ACCURACY_MIN, ACCURACY_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    fn face(status: MentalState, confidence: f64) -> FaceResult {
        FaceResult {
            status,
            dominant_emotion: "test".to_string(),
            raw_scores: BTreeMap::new(),
            normalized_scores: BTreeMap::new(),
            confidence,
        }
    }

    #[test]
    fn concerning_face_overrides_weak_text() {
        let f = face(MentalState::DepressionStress, 0.6);
        let (state, conf) =
            combine(Some((MentalState::PositiveNeutral, 0.6)), Some(&f)).unwrap();
        assert_eq!(state, MentalState::DepressionStress);
        assert!((conf - (0.6 * 0.6 + 0.4 * 0.6)).abs() < 1e-9);
    }

    #[test]
    fn confident_text_resists_face_override() {
        let f = face(MentalState::DepressionStress, 0.8);
        let (state, _) = combine(Some((MentalState::Anxiety, 0.95)), Some(&f)).unwrap();
        assert_eq!(state, MentalState::Anxiety);
    }

    #[test]
    fn confident_neutral_text_does_not_resist() {
        let f = face(MentalState::Anxiety, 0.5);
        let (state, _) = combine(Some((MentalState::Neutral, 0.9)), Some(&f)).unwrap();
        assert_eq!(state, MentalState::Anxiety);
    }

    #[test]
    fn positive_face_never_overrides() {
        let f = face(MentalState::PositiveNeutral, 0.9);
        let (state, _) =
            combine(Some((MentalState::DepressionStress, 0.5)), Some(&f)).unwrap();
        assert_eq!(state, MentalState::DepressionStress);
    }

    #[test]
    fn single_signals_pass_through() {
        assert_eq!(
            combine(Some((MentalState::Anxiety, 0.95)), None),
            Some((MentalState::Anxiety, 0.95))
        );
        let f = face(MentalState::PositiveNeutral, 0.5);
        assert_eq!(
            combine(None, Some(&f)),
            Some((MentalState::PositiveNeutral, 0.5))
        );
        assert_eq!(combine(None, None), None);
    }

    #[test]
    fn accuracy_stays_clamped_for_any_seed() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            for (t, f, w) in [
                (Some(1.0), Some(1.0), 0usize),
                (Some(0.95), None, 0),
                (None, Some(0.85), 5),
                (None, None, 10),
                (Some(0.0), Some(0.0), 0),
            ] {
                let acc = display_accuracy_with_rng(t, f, w, &mut rng);
                assert!(
                    (ACCURACY_MIN..=ACCURACY_MAX).contains(&acc),
                    "seed {seed} inputs ({t:?},{f:?},{w}) produced {acc}"
                );
            }
        }
    }

    #[test]
    fn warnings_drag_accuracy_down() {
        let mut rng = StdRng::seed_from_u64(11);
        let clean = display_accuracy_with_rng(Some(0.9), Some(0.7), 0, &mut rng);
        let mut rng = StdRng::seed_from_u64(11);
        let degraded = display_accuracy_with_rng(Some(0.9), Some(0.7), 3, &mut rng);
        assert!(degraded < clean);
    }
}
