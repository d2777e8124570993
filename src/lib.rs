pub mod adapters;
pub mod catalog;
pub mod chemistry;
pub mod error;
pub mod history;
pub mod models;
pub mod treatment;

pub use crate::adapters::share::share_text;
pub use crate::catalog::{
    ChemicalProduct, ProductCatalog, ProductDraft, TreatmentCategory, default_product,
    resolve_product,
};
pub use crate::error::AppError;
pub use crate::history::History;
pub use crate::models::{
    Appearance, ChlorineForm, Coating, DEFAULT_POOL_NAME, Measurements, Pool, PoolDimensions,
    PoolKind, PoolShape, Status, TreatmentResult, TreatmentStep, VisualState,
};
pub use crate::treatment::context::detect_persistent_issues;
pub use crate::treatment::dose::{TabletDose, compute_dose, proportional_dose, tablet_dose};
pub use crate::treatment::engine::{ShockApplied, calculate_treatment, calculate_treatment_at};
