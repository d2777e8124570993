use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolShape {
    Rectangular,
    Round,
    Custom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolKind {
    Pool,
    Spa,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coating {
    Tile,
    Fiberglass,
    Vinyl,
}

/// Preferred delivery form for maintenance chlorine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChlorineForm {
    #[default]
    Granular,
    Tablet,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pool {
    pub id: String,
    pub name: String,
    pub volume_l: f64,
    pub shape: PoolShape,
    #[serde(rename = "type")]
    pub kind: PoolKind,
    pub coating: Coating,
    #[serde(default)]
    pub chlorine_form: ChlorineForm,
}

impl Pool {
    /// Creates a pool from setup data. A blank name becomes
    /// [`DEFAULT_POOL_NAME`]; the volume comes from `dimensions`.
    pub fn from_setup(
        id: impl Into<String>,
        name: &str,
        dimensions: &PoolDimensions,
        kind: PoolKind,
        coating: Coating,
        chlorine_form: ChlorineForm,
    ) -> Result<Pool, AppError> {
        let name = match name.trim() {
            "" => DEFAULT_POOL_NAME,
            n => n,
        };
        Ok(Pool {
            id: id.into(),
            name: name.to_string(),
            volume_l: dimensions.volume_l()?,
            shape: dimensions.shape(),
            kind,
            coating,
            chlorine_form,
        })
    }

    /// Boundary check for records coming from outside the engine.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.volume_l.is_finite() || self.volume_l <= 0.0 {
            return Err(AppError::InvalidPool(format!(
                "volume must be a positive number of liters, got {}",
                self.volume_l
            )));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::InvalidPool("name must not be empty".into()));
        }
        Ok(())
    }
}

/// Name given to a pool set up without one.
pub const DEFAULT_POOL_NAME: &str = "My Pool";

/// How the pool's volume is known at setup: measured dimensions in meters,
/// or a volume entered directly (required for custom shapes).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PoolDimensions {
    Rectangular {
        length_m: f64,
        width_m: f64,
        depth_m: f64,
    },
    Round {
        diameter_m: f64,
        depth_m: f64,
    },
    Manual {
        shape: PoolShape,
        volume_l: f64,
    },
}

impl PoolDimensions {
    pub fn shape(&self) -> PoolShape {
        match *self {
            PoolDimensions::Rectangular { .. } => PoolShape::Rectangular,
            PoolDimensions::Round { .. } => PoolShape::Round,
            PoolDimensions::Manual { shape, .. } => shape,
        }
    }

    /// Volume in whole liters (1 m³ = 1000 L).
    pub fn volume_l(&self) -> Result<f64, AppError> {
        let raw = match *self {
            PoolDimensions::Rectangular {
                length_m,
                width_m,
                depth_m,
            } => length_m * width_m * depth_m * 1000.0,
            PoolDimensions::Round {
                diameter_m,
                depth_m,
            } => {
                let radius = diameter_m / 2.0;
                std::f64::consts::PI * radius * radius * depth_m * 1000.0
            }
            PoolDimensions::Manual { volume_l, .. } => volume_l,
        };
        if !raw.is_finite() || raw <= 0.0 {
            return Err(AppError::InvalidPool(format!(
                "dimensions give no usable volume ({raw} L)"
            )));
        }
        Ok(raw.round())
    }
}

/// One test-kit reading per field; `None` means the parameter was not measured.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    #[serde(default)]
    pub ph: Option<f64>,
    #[serde(default)]
    pub chlorine: Option<f64>,
    #[serde(default)]
    pub alkalinity: Option<f64>,
    #[serde(default)]
    pub hardness: Option<f64>,
    #[serde(default)]
    pub cyanuric: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Appearance {
    #[default]
    Clear,
    Cloudy,
    Green,
    Brown,
    Algae,
}

impl Appearance {
    /// Green water and visible algae both call for a shock treatment.
    pub fn needs_shock(self) -> bool {
        matches!(self, Appearance::Green | Appearance::Algae)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    #[serde(default)]
    pub appearance: Appearance,
    // Recorded with the analysis; no rule reads these yet.
    #[serde(default)]
    pub strong_odor: bool,
    #[serde(default)]
    pub heavy_usage: bool,
}

/// Overall severity of a result. Ordered so that escalation is `max`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Ok,
    Warning,
    Critical,
}

impl Status {
    pub fn escalate(self, to: Status) -> Status {
        self.max(to)
    }

    pub fn summary(self) -> &'static str {
        match self {
            Status::Ok => "Water is balanced and ready to use.",
            Status::Warning => "Adjustments needed to balance the water.",
            Status::Critical => "Critical conditions: do not use the pool until treated.",
        }
    }
}

/// A single recommended action. `dose == 0` marks an advisory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreatmentStep {
    pub order: u32,
    pub title: String,
    pub product: String,
    pub dose: u32,
    pub unit: String,
    pub instruction: String,
    pub wait_duration: String,
}

impl TreatmentStep {
    pub fn is_advisory(&self) -> bool {
        self.dose == 0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreatmentResult {
    pub id: String,
    pub date: DateTime<Utc>,
    pub status: Status,
    pub summary: String,
    pub steps: Vec<TreatmentStep>,
    pub measurements: Measurements,
    pub visual: VisualState,
}
