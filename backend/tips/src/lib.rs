//! Static health-tip, food, and medication-education tables.
//!
//! Pure lookup by state; the content is canned advice, not medical guidance,
//! and the medication text is explicitly educational.

use mindgauge_core::MentalState;

/// Shown for states with no dedicated advice (Neutral / unknown).
const FALLBACK_TIP: &str = "Maintain a healthy routine and positive mindset.";

/// Daily tips for a state, in display order.
pub fn tips_for(state: MentalState) -> Vec<String> {
    let tips: &[&str] = match state {
        MentalState::DepressionStress => &[
            "Go outside and get sunlight daily.",
            "Exercise 20-30 minutes each day.",
            "Maintain a consistent sleep schedule (7-9 hours).",
            "Practice mindfulness or meditation.",
            "Connect with friends or family and share your feelings.",
        ],
        MentalState::Anxiety => &[
            "Practice deep breathing exercises.",
            "Write down your worries and possible solutions.",
            "Limit caffeine and sugar intake.",
            "Take short breaks from stressful activities.",
            "Engage in hobbies that relax your mind.",
        ],
        MentalState::PositiveNeutral => &[
            "Keep up your good mental habits.",
            "Maintain regular exercise and healthy diet.",
            "Continue connecting with loved ones.",
            "Try new activities that make you happy.",
        ],
        MentalState::Neutral => &[FALLBACK_TIP],
    };
    tips.iter().map(|t| t.to_string()).collect()
}

/// Mood-supporting foods for a state, in display order.
pub fn foods_for(state: MentalState) -> Vec<String> {
    let foods: &[&str] = match state {
        MentalState::DepressionStress => &[
            "Fatty fish rich in omega-3 (salmon, sardines).",
            "Leafy greens and whole grains.",
            "Fermented foods (yogurt, kefir) for gut health.",
            "Dark chocolate in moderation.",
        ],
        MentalState::Anxiety => &[
            "Chamomile or green tea instead of coffee.",
            "Magnesium-rich foods (almonds, spinach, pumpkin seeds).",
            "Complex carbohydrates (oats, brown rice).",
            "Citrus fruits and berries.",
        ],
        MentalState::PositiveNeutral => &[
            "A balanced plate: vegetables, protein, whole grains.",
            "Plenty of water through the day.",
            "Nuts and seeds as snacks.",
        ],
        MentalState::Neutral => &["A balanced diet with regular meals."],
    };
    foods.iter().map(|f| f.to_string()).collect()
}

/// Educational paragraph about medication for a state.
///
/// Deliberately generic: names drug classes, never doses, and always points
/// at a professional.
pub fn medication_info(state: MentalState) -> String {
    let body = match state {
        MentalState::Anxiety => {
            "Anxiety disorders are commonly treated with SSRIs or SNRIs, and \
             short-term options exist for acute episodes. Only a qualified \
             clinician can decide whether medication is appropriate."
        }
        MentalState::DepressionStress => {
            "Depression is commonly treated with SSRIs, SNRIs, or atypical \
             antidepressants, usually alongside talk therapy. Diagnosis and \
             prescription belong to a qualified clinician."
        }
        MentalState::PositiveNeutral | MentalState::Neutral => {
            "No medication guidance applies. If your mood changes \
             persistently, talk to a healthcare professional."
        }
    };
    format!(
        "Educational information only, not a prescription: {} If you are in \
         crisis, contact local emergency services or a crisis hotline.",
        body
    )
}
