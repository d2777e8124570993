use crate::catalog::ChemicalProduct;
use crate::chemistry::{
    LARGE_TABLET_COVERAGE_L, LARGE_TABLET_GRAMS, MINI_TABLET_COVERAGE_L, MINI_TABLET_GRAMS,
    SMALL_POOL_MAX_L, round_dose,
};

/// Dose needed to move a parameter from `current` to `target` in a pool of
/// `pool_volume_l` liters, using the product's proportional rule:
///
/// `round(|target - current| / effect_change * dose_quantity * volume / volume_reference)`
///
/// A product with a zero `effect_change` or `volume_reference_l` yields 0.
pub fn compute_dose(product: &ChemicalProduct, target: f64, current: f64, pool_volume_l: f64) -> u32 {
    if product.effect_change == 0.0 || product.volume_reference_l == 0.0 {
        return 0;
    }
    let delta = (target - current).abs();
    let factor = delta / product.effect_change;
    round_dose(factor * product.dose_quantity * (pool_volume_l / product.volume_reference_l))
}

/// Fixed per-volume dose for products with no target reading
/// (algicide, clarifier): `round(dose_quantity * volume / volume_reference)`.
pub fn proportional_dose(product: &ChemicalProduct, pool_volume_l: f64) -> u32 {
    if product.volume_reference_l == 0.0 {
        return 0;
    }
    round_dose(product.dose_quantity * (pool_volume_l / product.volume_reference_l))
}

/// Slow-dissolving chlorine tablets for a pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TabletDose {
    pub count: u32,
    pub tablet_grams: u32,
}

impl TabletDose {
    pub fn label(&self) -> String {
        if self.tablet_grams == MINI_TABLET_GRAMS {
            format!("Chlorine Mini Tablet ({}g)", self.tablet_grams)
        } else {
            format!("Chlorine Large Tablet ({}g)", self.tablet_grams)
        }
    }
}

/// Mini tablets (one per 2,000 L) up to 10,000 L, large tablets (one per
/// 30,000 L) above. Never less than one tablet.
pub fn tablet_dose(pool_volume_l: f64) -> TabletDose {
    let (coverage_l, tablet_grams) = if pool_volume_l <= SMALL_POOL_MAX_L {
        (MINI_TABLET_COVERAGE_L, MINI_TABLET_GRAMS)
    } else {
        (LARGE_TABLET_COVERAGE_L, LARGE_TABLET_GRAMS)
    };
    let raw = (pool_volume_l / coverage_l).ceil();
    let count = if raw.is_finite() && raw > 1.0 { raw as u32 } else { 1 };
    TabletDose {
        count,
        tablet_grams,
    }
}
