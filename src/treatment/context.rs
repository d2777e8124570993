use crate::chemistry::{CHLORINE_DEPLETED_PPM, PH};
use crate::models::{Measurements, TreatmentStep};

fn advisory(title: &str, product: &str, instruction: &str) -> TreatmentStep {
    TreatmentStep {
        order: 0,
        title: title.to_string(),
        product: product.to_string(),
        dose: 0,
        unit: "-".to_string(),
        instruction: instruction.to_string(),
        wait_duration: "-".to_string(),
    }
}

fn both(current: Option<f64>, previous: Option<f64>, stuck: impl Fn(f64) -> bool) -> bool {
    matches!((current, previous), (Some(c), Some(p)) if stuck(c) && stuck(p))
}

/// Compares the current readings with the previous analysis and returns
/// advisory steps (dose 0) for problems the last treatment did not fix.
///
/// Steps are returned with `order == 0`; the engine numbers them when it
/// places them ahead of the corrective steps.
pub fn detect_persistent_issues(current: &Measurements, previous: &Measurements) -> Vec<TreatmentStep> {
    let mut steps = Vec::new();

    if both(current.ph, previous.ph, |v| PH.is_low(v)) {
        steps.push(advisory(
            "pH continues low",
            "Check Product / Dosage",
            "The pH was low in the last analysis and has not risen. Check whether the pH increaser has expired or whether alkalinity is holding the pH down.",
        ));
    } else if both(current.ph, previous.ph, |v| PH.is_high(v)) {
        steps.push(advisory(
            "pH continues high",
            "Check Application",
            "The pH has not dropped since the last measurement. Make sure the previous dose was applied correctly.",
        ));
    }

    if both(current.chlorine, previous.chlorine, |v| v < CHLORINE_DEPLETED_PPM) {
        steps.push(advisory(
            "Chlorine is being consumed quickly",
            "Investigation",
            "Chlorine keeps dropping to zero. This may point to heavy organic contamination or too much stabilizer (cyanuric acid). Consider a stronger shock treatment.",
        ));
    }

    steps
}
