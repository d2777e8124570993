//! Chemistry module: target bands and thresholds for pool and spa water.
//!
//! This module provides:
//! - Acceptable bands (min / ideal / max) for pH, total alkalinity, free chlorine and calcium hardness
//! - Thresholds used to spot readings that stayed out of range between two analyses
//! - The fixed shock increment and tablet sizing used for sanitizer dosing
//! - A rounding helper for doses
//!
//! Units conventions:
//! - pH is unitless
//! - Chlorine, alkalinity, hardness and cyanuric acid are ppm
//! - Volumes are liters
//!
//! Design notes:
//! - Readings strictly below `min` or strictly above `max` are out of band; the bounds themselves are in band
//! - Corrections always aim at `ideal`, not at the nearest bound
//!
//! # Examples
//! ```rust
//! use poolsense_rs::chemistry::{PH, ALKALINITY, round_dose};
//!
//! assert!(PH.is_low(7.0));
//! assert!(!PH.is_low(7.2));
//! assert!(ALKALINITY.is_high(130.0));
//! assert_eq!(round_dose(2.5), 3);
//! ```

/// Acceptable range for one chemical parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Band {
    pub min: f64,
    pub ideal: f64,
    pub max: f64,
}

impl Band {
    pub fn is_low(&self, value: f64) -> bool {
        value < self.min
    }

    pub fn is_high(&self, value: f64) -> bool {
        value > self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        !self.is_low(value) && !self.is_high(value)
    }
}

/// pH band.
pub const PH: Band = Band {
    min: 7.2,
    ideal: 7.4,
    max: 7.6,
};
/// Total alkalinity band (ppm).
pub const ALKALINITY: Band = Band {
    min: 80.0,
    ideal: 100.0,
    max: 120.0,
};
/// Free chlorine band (ppm).
pub const CHLORINE: Band = Band {
    min: 1.0,
    ideal: 2.0,
    max: 3.0,
};
/// Calcium hardness band (ppm).
pub const HARDNESS: Band = Band {
    min: 200.0,
    ideal: 300.0,
    max: 400.0,
};

/// Free chlorine (ppm) under which two consecutive readings count as depleted.
pub const CHLORINE_DEPLETED_PPM: f64 = 0.5;

/// Chlorine increase (ppm) a shock treatment aims for, counted from zero.
pub const SHOCK_INCREMENT_PPM: f64 = 12.0;

/// Pools at or below this volume (liters) use mini tablets.
pub const SMALL_POOL_MAX_L: f64 = 10_000.0;
pub const MINI_TABLET_GRAMS: u32 = 20;
pub const MINI_TABLET_COVERAGE_L: f64 = 2_000.0;
pub const LARGE_TABLET_GRAMS: u32 = 200;
pub const LARGE_TABLET_COVERAGE_L: f64 = 30_000.0;

/// Round a raw dose to the nearest whole unit, half away from zero.
///
/// Negative and non-finite values (only reachable through malformed custom
/// products) saturate to 0.
pub fn round_dose(x: f64) -> u32 {
    if !x.is_finite() || x <= 0.0 {
        return 0;
    }
    // `as` saturates at u32::MAX
    x.round() as u32
}
