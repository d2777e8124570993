use std::fmt::Write as _;

use crate::models::{Status, TreatmentResult};

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Ok => "Balanced water",
        Status::Warning => "Attention needed",
        Status::Critical => "Critical",
    }
}

/// Plain-text rendering of a result, suitable for pasting into a message.
///
/// Dosed steps list quantity and product; advisories (dose 0) only name what
/// to check.
pub fn share_text(result: &TreatmentResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "PoolSense result - {}", result.date.format("%Y-%m-%d"));
    let _ = writeln!(out, "Status: {}", status_label(result.status));
    out.push('\n');
    out.push_str("Products needed:\n");
    if result.steps.is_empty() {
        out.push_str("- None\n");
    }
    for step in &result.steps {
        if step.is_advisory() {
            let _ = writeln!(out, "- {}: check {}", step.title, step.product);
        } else {
            let _ = writeln!(
                out,
                "- {}: {}{} of {}",
                step.title, step.dose, step.unit, step.product
            );
        }
    }
    out.push('\n');
    out.push_str("Generated by PoolSense");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Measurements, TreatmentStep, VisualState};
    use chrono::DateTime;

    fn step(title: &str, product: &str, dose: u32, unit: &str) -> TreatmentStep {
        TreatmentStep {
            order: 1,
            title: title.into(),
            product: product.into(),
            dose,
            unit: unit.into(),
            instruction: String::new(),
            wait_duration: String::new(),
        }
    }

    #[test]
    fn renders_dosed_and_advisory_steps() {
        let result = TreatmentResult {
            id: "1".into(),
            date: DateTime::from_timestamp(1_760_572_800, 0).unwrap(),
            status: Status::Warning,
            summary: Status::Warning.summary().into(),
            steps: vec![
                step("Raise pH", "pH Increaser (Soda Ash)", 240, "g"),
                step("High calcium hardness", "Water Replacement", 0, "-"),
            ],
            measurements: Measurements::default(),
            visual: VisualState::default(),
        };
        let text = share_text(&result);
        assert!(text.starts_with("PoolSense result - 2025-10-16\nStatus: Attention needed\n"));
        assert!(text.contains("- Raise pH: 240g of pH Increaser (Soda Ash)\n"));
        assert!(text.contains("- High calcium hardness: check Water Replacement\n"));
        assert!(text.ends_with("Generated by PoolSense"));
    }
}
