use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::catalog::{ProductCatalog, TreatmentCategory};
use crate::chemistry::{ALKALINITY, Band, CHLORINE, HARDNESS, PH, SHOCK_INCREMENT_PPM};
use crate::models::{
    Appearance, ChlorineForm, Measurements, Pool, Status, TreatmentResult, TreatmentStep,
    VisualState,
};
use crate::treatment::context::detect_persistent_issues;
use crate::treatment::dose::{compute_dose, proportional_dose, tablet_dose};

/// Whether the visual stage already prescribed a chlorine shock. Threaded
/// into the maintenance stage, which is skipped when it did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShockApplied(pub bool);

/// Steps emitted so far together with the running status.
#[derive(Debug, Default)]
struct StepLog {
    steps: Vec<TreatmentStep>,
    status: Status,
}

impl StepLog {
    fn push(&mut self, mut step: TreatmentStep) {
        step.order = self.steps.len() as u32 + 1;
        debug!("step {}: {} ({} {})", step.order, step.title, step.dose, step.unit);
        self.steps.push(step);
    }

    fn escalate(&mut self, to: Status) {
        self.status = self.status.escalate(to);
    }
}

/// Inputs shared by every stage of one evaluation.
struct Stage<'a> {
    pool: &'a Pool,
    measurements: &'a Measurements,
    catalog: &'a ProductCatalog,
}

impl Stage<'_> {
    /// A dosed step that moves `current` to the band's ideal value.
    fn correction(
        &self,
        category: TreatmentCategory,
        title: &str,
        band: &Band,
        current: f64,
        wait: &str,
    ) -> TreatmentStep {
        let product = self.catalog.resolve(category);
        TreatmentStep {
            order: 0,
            title: title.to_string(),
            product: product.name.to_string(),
            dose: compute_dose(product, band.ideal, current, self.pool.volume_l),
            unit: product.unit.to_string(),
            instruction: product.instructions.to_string(),
            wait_duration: wait.to_string(),
        }
    }

    fn alkalinity(&self, log: &mut StepLog) {
        let Some(alk) = self.measurements.alkalinity else {
            return;
        };
        if ALKALINITY.is_low(alk) {
            debug!("alkalinity {alk} ppm below {}", ALKALINITY.min);
            log.escalate(Status::Warning);
            log.push(self.correction(
                TreatmentCategory::AlkUp,
                "Adjust low alkalinity",
                &ALKALINITY,
                alk,
                "6 hours filtering",
            ));
        } else if ALKALINITY.is_high(alk) {
            debug!("alkalinity {alk} ppm above {}", ALKALINITY.max);
            log.escalate(Status::Warning);
            log.push(self.correction(
                TreatmentCategory::AlkDown,
                "Lower high alkalinity",
                &ALKALINITY,
                alk,
                "6 hours circulating",
            ));
        }
    }

    fn ph(&self, log: &mut StepLog) {
        let Some(ph) = self.measurements.ph else {
            return;
        };
        if PH.is_low(ph) {
            debug!("pH {ph} below {}", PH.min);
            log.push(self.correction(
                TreatmentCategory::PhUp,
                "Raise pH",
                &PH,
                ph,
                "1 hour circulating",
            ));
            log.escalate(Status::Warning);
        } else if PH.is_high(ph) {
            debug!("pH {ph} above {}", PH.max);
            log.push(self.correction(
                TreatmentCategory::PhDown,
                "Lower pH",
                &PH,
                ph,
                "1 hour circulating",
            ));
            log.escalate(Status::Warning);
        }
    }

    fn hardness(&self, log: &mut StepLog) {
        let Some(hardness) = self.measurements.hardness else {
            return;
        };
        if HARDNESS.is_low(hardness) {
            debug!("hardness {hardness} ppm below {}", HARDNESS.min);
            log.escalate(Status::Warning);
            log.push(self.correction(
                TreatmentCategory::HardnessUp,
                "Adjust calcium hardness",
                &HARDNESS,
                hardness,
                "2 to 4 hours circulating",
            ));
        } else if HARDNESS.is_high(hardness) {
            debug!("hardness {hardness} ppm above {}", HARDNESS.max);
            log.escalate(Status::Warning);
            log.push(TreatmentStep {
                order: 0,
                title: "High calcium hardness".into(),
                product: "Water Replacement".into(),
                dose: 0,
                unit: "-".into(),
                instruction: "Hardness is too high. No product lowers it: drain part of the water and refill with fresh water.".into(),
                wait_duration: "-".into(),
            });
        }
    }

    fn visual(&self, appearance: Appearance, log: &mut StepLog) -> ShockApplied {
        let volume = self.pool.volume_l;
        if appearance.needs_shock() {
            debug!("appearance {appearance:?}: shock treatment");
            log.escalate(Status::Critical);

            // Always a full shock, counted from zero chlorine.
            let chlorine = self.catalog.resolve(TreatmentCategory::Chlorine);
            log.push(TreatmentStep {
                order: 0,
                title: "Shock treatment (green water)".into(),
                product: chlorine.name.to_string(),
                dose: compute_dose(chlorine, SHOCK_INCREMENT_PPM, 0.0, volume),
                unit: chlorine.unit.to_string(),
                instruction: "The pool has algae. Treatment needs granular shock chlorine; tablets dissolve too slowly.".into(),
                wait_duration: "Filter for 8 to 12 hours".into(),
            });

            let algicide = self.catalog.resolve(TreatmentCategory::Algicide);
            log.push(TreatmentStep {
                order: 0,
                title: "Apply algicide".into(),
                product: algicide.name.to_string(),
                dose: proportional_dose(algicide, volume),
                unit: algicide.unit.to_string(),
                instruction: "Apply 1 hour after the chlorine. Brush the pool walls.".into(),
                wait_duration: "Filter together with the chlorine".into(),
            });
            return ShockApplied(true);
        }

        if appearance == Appearance::Cloudy {
            debug!("appearance cloudy: clarifier");
            log.escalate(Status::Warning);
            let clarifier = self.catalog.resolve(TreatmentCategory::Clarifier);
            log.push(TreatmentStep {
                order: 0,
                title: "Clarify water".into(),
                product: clarifier.name.to_string(),
                dose: proportional_dose(clarifier, volume),
                unit: clarifier.unit.to_string(),
                instruction: clarifier.instructions.to_string(),
                wait_duration: "6 to 8 hours".into(),
            });
        }
        ShockApplied(false)
    }

    fn chlorine(&self, shock: ShockApplied, log: &mut StepLog) {
        if shock.0 {
            return;
        }
        let Some(chlorine) = self.measurements.chlorine else {
            return;
        };
        if !CHLORINE.is_low(chlorine) {
            return;
        }

        debug!(
            "chlorine {chlorine} ppm below {}, form {:?}",
            CHLORINE.min, self.pool.chlorine_form
        );
        match self.pool.chlorine_form {
            ChlorineForm::Tablet => {
                let tablets = tablet_dose(self.pool.volume_l);
                log.push(TreatmentStep {
                    order: 0,
                    title: "Replenish chlorine (tablet)".into(),
                    product: tablets.label(),
                    dose: tablets.count,
                    unit: "unit(s)".into(),
                    instruction: "Place the tablet in a floating dispenser or the skimmer basket. Never drop it directly into the pool, it stains the lining.".into(),
                    wait_duration: "Check dissolution weekly".into(),
                });
            }
            ChlorineForm::Granular => {
                log.push(self.correction(
                    TreatmentCategory::Chlorine,
                    "Replenish chlorine",
                    &CHLORINE,
                    chlorine,
                    "1 hour after application",
                ));
            }
        }
        log.escalate(Status::Warning);
    }
}

/// Runs every rule against the readings and returns the ordered treatment
/// plan, stamped with the current time.
///
/// `previous` should be the measurements of the most recent earlier analysis
/// when this is a new analysis, and `None` when editing. `existing_id`
/// keeps the identifier of the result being edited.
pub fn calculate_treatment(
    pool: &Pool,
    measurements: &Measurements,
    visual: &VisualState,
    catalog: &ProductCatalog,
    previous: Option<&Measurements>,
    existing_id: Option<&str>,
) -> TreatmentResult {
    calculate_treatment_at(
        pool,
        measurements,
        visual,
        catalog,
        previous,
        existing_id,
        Utc::now(),
    )
}

/// Same as [`calculate_treatment`] with an explicit evaluation time.
///
/// The returned `date` is always `now`, also when an existing result is
/// recalculated. An empty `existing_id` counts as absent.
pub fn calculate_treatment_at(
    pool: &Pool,
    measurements: &Measurements,
    visual: &VisualState,
    catalog: &ProductCatalog,
    previous: Option<&Measurements>,
    existing_id: Option<&str>,
    now: DateTime<Utc>,
) -> TreatmentResult {
    let stage = Stage {
        pool,
        measurements,
        catalog,
    };
    let mut log = StepLog::default();

    if let Some(prev) = previous {
        for step in detect_persistent_issues(measurements, prev) {
            log.push(step);
        }
    }
    stage.alkalinity(&mut log);
    stage.ph(&mut log);
    stage.hardness(&mut log);
    let shock = stage.visual(visual.appearance, &mut log);
    stage.chlorine(shock, &mut log);

    let id = existing_id
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| now.timestamp_millis().to_string());
    info!(
        "treatment {id} for pool '{}': {:?}, {} step(s)",
        pool.name,
        log.status,
        log.steps.len()
    );

    TreatmentResult {
        id,
        date: now,
        status: log.status,
        summary: log.status.summary().to_string(),
        steps: log.steps,
        measurements: measurements.clone(),
        visual: visual.clone(),
    }
}
