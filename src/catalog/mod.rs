//! Product catalog: one built-in product per treatment category, with
//! optional user products layered on top.
//!
//! Each product carries a proportional rule: `dose_quantity` units of the
//! product change the target parameter by `effect_change` in
//! `volume_reference_l` liters of water. Defaults are immutable statics;
//! user products never modify them, they only shadow them during lookup.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatmentCategory {
    PhUp,
    PhDown,
    AlkUp,
    AlkDown,
    Chlorine,
    HardnessUp,
    Algicide,
    Clarifier,
}

impl TreatmentCategory {
    pub const ALL: [TreatmentCategory; 8] = [
        TreatmentCategory::PhUp,
        TreatmentCategory::PhDown,
        TreatmentCategory::AlkUp,
        TreatmentCategory::AlkDown,
        TreatmentCategory::Chlorine,
        TreatmentCategory::HardnessUp,
        TreatmentCategory::Algicide,
        TreatmentCategory::Clarifier,
    ];
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChemicalProduct {
    pub name: Cow<'static, str>,
    pub category: TreatmentCategory,
    pub dose_quantity: f64,
    pub unit: Cow<'static, str>,
    pub effect_change: f64,
    pub volume_reference_l: f64,
    #[serde(default)]
    pub instructions: Cow<'static, str>,
    #[serde(default)]
    pub is_default: bool,
}

const fn builtin(
    name: &'static str,
    category: TreatmentCategory,
    dose_quantity: f64,
    unit: &'static str,
    effect_change: f64,
    instructions: &'static str,
) -> ChemicalProduct {
    ChemicalProduct {
        name: Cow::Borrowed(name),
        category,
        dose_quantity,
        unit: Cow::Borrowed(unit),
        effect_change,
        volume_reference_l: 1000.0,
        instructions: Cow::Borrowed(instructions),
        is_default: true,
    }
}

static PH_UP: ChemicalProduct = builtin(
    "pH Increaser (Soda Ash)",
    TreatmentCategory::PhUp,
    6.0,
    "g",
    0.1,
    "The pH is acidic. Dissolve beforehand and spread over the pool.",
);
static PH_DOWN: ChemicalProduct = builtin(
    "pH Reducer (Liquid)",
    TreatmentCategory::PhDown,
    8.0,
    "ml",
    0.1,
    "The pH is high. Dilute the reducer in a bucket of water and apply.",
);
static ALK_UP: ChemicalProduct = builtin(
    "Alkalinity Increaser (Sodium Bicarbonate)",
    TreatmentCategory::AlkUp,
    17.0,
    "g",
    10.0,
    "Dissolve in a bucket of pool water and spread over the surface.",
);
static ALK_DOWN: ChemicalProduct = builtin(
    "pH and Alkalinity Reducer (Liquid)",
    TreatmentCategory::AlkDown,
    10.0,
    "ml",
    10.0,
    "Alkalinity is high. Dilute the reducer in a bucket of water and pour it along the edges. This also lowers the pH.",
);
static CHLORINE: ChemicalProduct = builtin(
    "Granular Chlorine",
    TreatmentCategory::Chlorine,
    3.0,
    "g",
    1.0,
    "Protection level is low. Top up the chlorine.",
);
static HARDNESS_UP: ChemicalProduct = builtin(
    "Hardness Increaser (Calcium Chloride)",
    TreatmentCategory::HardnessUp,
    15.0,
    "g",
    10.0,
    "Low hardness can corrode equipment and grout. Dissolve and apply.",
);
static ALGICIDE: ChemicalProduct = builtin(
    "Shock Algicide",
    TreatmentCategory::Algicide,
    5.0,
    "ml",
    1.0,
    "Apply over the whole surface and brush the pool walls.",
);
static CLARIFIER: ChemicalProduct = builtin(
    "Clarifier / Flocculant",
    TreatmentCategory::Clarifier,
    4.0,
    "ml",
    1.0,
    "The water is cloudy. Add the clarifier and keep filtering.",
);

/// Built-in product for `category`.
pub fn default_product(category: TreatmentCategory) -> &'static ChemicalProduct {
    match category {
        TreatmentCategory::PhUp => &PH_UP,
        TreatmentCategory::PhDown => &PH_DOWN,
        TreatmentCategory::AlkUp => &ALK_UP,
        TreatmentCategory::AlkDown => &ALK_DOWN,
        TreatmentCategory::Chlorine => &CHLORINE,
        TreatmentCategory::HardnessUp => &HARDNESS_UP,
        TreatmentCategory::Algicide => &ALGICIDE,
        TreatmentCategory::Clarifier => &CLARIFIER,
    }
}

/// First user product for `category`, falling back to the built-in one.
pub fn resolve_product(
    category: TreatmentCategory,
    user_products: &[ChemicalProduct],
) -> &ChemicalProduct {
    user_products
        .iter()
        .find(|p| p.category == category && !p.is_default)
        .unwrap_or_else(|| default_product(category))
}

/// Built-in products plus at most one user override per category.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductCatalog {
    overrides: Vec<ChemicalProduct>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from a stored product list. The first entry for a
    /// category wins, matching [`resolve_product`]; later entries for the same
    /// category and products flagged as defaults are dropped.
    pub fn from_products(products: impl IntoIterator<Item = ChemicalProduct>) -> Self {
        let mut catalog = Self::new();
        for p in products {
            if p.is_default || catalog.overrides.iter().any(|o| o.category == p.category) {
                continue;
            }
            catalog.overrides.push(p);
        }
        catalog
    }

    /// Sets the user product for its category, replacing any previous one.
    pub fn with_override(mut self, product: ChemicalProduct) -> Self {
        if product.is_default {
            return self;
        }
        self.remove_override(product.category);
        self.overrides.push(product);
        self
    }

    /// Drops the user product for `category`, restoring the default.
    pub fn remove_override(&mut self, category: TreatmentCategory) -> Option<ChemicalProduct> {
        let idx = self.overrides.iter().position(|p| p.category == category)?;
        Some(self.overrides.remove(idx))
    }

    pub fn resolve(&self, category: TreatmentCategory) -> &ChemicalProduct {
        resolve_product(category, &self.overrides)
    }

    pub fn overrides(&self) -> &[ChemicalProduct] {
        &self.overrides
    }

    /// Effective product for every category, in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = &ChemicalProduct> + '_ {
        TreatmentCategory::ALL.into_iter().map(|c| self.resolve(c))
    }
}

/// A product being edited. Only becomes a [`ChemicalProduct`] through
/// [`ProductDraft::build`], which checks the fields the dose math relies on.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub category: Option<TreatmentCategory>,
    pub name: Option<String>,
    pub dose_quantity: Option<f64>,
    pub unit: Option<String>,
    pub effect_change: Option<f64>,
    pub volume_reference_l: Option<f64>,
    pub instructions: Option<String>,
}

impl ProductDraft {
    pub fn new(category: TreatmentCategory) -> Self {
        Self {
            category: Some(category),
            ..Default::default()
        }
    }

    /// Seeds a draft with every field of an existing product.
    pub fn from_product(product: &ChemicalProduct) -> Self {
        Self {
            category: Some(product.category),
            name: Some(product.name.to_string()),
            dose_quantity: Some(product.dose_quantity),
            unit: Some(product.unit.to_string()),
            effect_change: Some(product.effect_change),
            volume_reference_l: Some(product.volume_reference_l),
            instructions: Some(product.instructions.to_string()),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn dose_quantity(mut self, v: f64) -> Self {
        self.dose_quantity = Some(v);
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn effect_change(mut self, v: f64) -> Self {
        self.effect_change = Some(v);
        self
    }

    pub fn volume_reference_l(mut self, v: f64) -> Self {
        self.volume_reference_l = Some(v);
        self
    }

    pub fn instructions(mut self, text: impl Into<String>) -> Self {
        self.instructions = Some(text.into());
        self
    }

    /// Validates the draft and promotes it to a user product.
    ///
    /// Missing `unit` and `effect_change` are taken from the category's
    /// built-in product.
    pub fn build(self) -> Result<ChemicalProduct, AppError> {
        let category = self.category.ok_or_else(|| AppError::InvalidProduct {
            field: "category",
            reason: "is required".into(),
        })?;
        let fallback = default_product(category);

        let name = self
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::InvalidProduct {
                field: "name",
                reason: "must not be empty".into(),
            })?;
        let dose_quantity = positive("dose_quantity", self.dose_quantity)?;
        let volume_reference_l = positive("volume_reference_l", self.volume_reference_l)?;
        let effect_change = match self.effect_change {
            Some(v) if !v.is_finite() || v == 0.0 => {
                return Err(AppError::InvalidProduct {
                    field: "effect_change",
                    reason: format!("must be a non-zero number, got {v}"),
                });
            }
            Some(v) => v,
            None => fallback.effect_change,
        };
        let unit = match self.unit.map(|u| u.trim().to_string()) {
            Some(u) if !u.is_empty() => Cow::Owned(u),
            _ => fallback.unit.clone(),
        };

        Ok(ChemicalProduct {
            name: Cow::Owned(name),
            category,
            dose_quantity,
            unit,
            effect_change,
            volume_reference_l,
            instructions: Cow::Owned(self.instructions.unwrap_or_default()),
            is_default: false,
        })
    }
}

fn positive(field: &'static str, value: Option<f64>) -> Result<f64, AppError> {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => Ok(v),
        Some(v) => Err(AppError::InvalidProduct {
            field,
            reason: format!("must be greater than zero, got {v}"),
        }),
        None => Err(AppError::InvalidProduct {
            field,
            reason: "is required".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_a_matching_default() {
        for category in TreatmentCategory::ALL {
            let p = default_product(category);
            assert_eq!(p.category, category);
            assert!(p.is_default);
            assert_eq!(p.volume_reference_l, 1000.0);
        }
    }

    #[test]
    fn default_table_values() {
        let alk = default_product(TreatmentCategory::AlkUp);
        assert_eq!((alk.dose_quantity, alk.effect_change), (17.0, 10.0));
        assert_eq!(alk.unit, "g");
        let ph_down = default_product(TreatmentCategory::PhDown);
        assert_eq!((ph_down.dose_quantity, ph_down.effect_change), (8.0, 0.1));
        assert_eq!(ph_down.unit, "ml");
        assert_eq!(default_product(TreatmentCategory::Chlorine).dose_quantity, 3.0);
        assert_eq!(default_product(TreatmentCategory::Algicide).dose_quantity, 5.0);
    }

    #[test]
    fn resolve_ignores_products_marked_default() {
        let mut shadow = default_product(TreatmentCategory::PhUp).clone();
        shadow.dose_quantity = 99.0;
        let products = [shadow];
        let found = resolve_product(TreatmentCategory::PhUp, &products);
        assert_eq!(found.dose_quantity, 6.0);
    }

    #[test]
    fn resolve_takes_first_user_product_for_category() {
        let a = ProductDraft::new(TreatmentCategory::Chlorine)
            .name("A")
            .dose_quantity(4.0)
            .volume_reference_l(1000.0)
            .build()
            .unwrap();
        let b = ProductDraft::new(TreatmentCategory::Chlorine)
            .name("B")
            .dose_quantity(5.0)
            .volume_reference_l(1000.0)
            .build()
            .unwrap();
        let products = [a, b];
        let found = resolve_product(TreatmentCategory::Chlorine, &products);
        assert_eq!(found.name, "A");

        let catalog = ProductCatalog::from_products(products.clone());
        assert_eq!(catalog.overrides().len(), 1);
        assert_eq!(catalog.resolve(TreatmentCategory::Chlorine).name, "A");
    }

    #[test]
    fn catalog_keeps_one_override_per_category() {
        let first = ProductDraft::new(TreatmentCategory::Clarifier)
            .name("First")
            .dose_quantity(2.0)
            .volume_reference_l(1000.0)
            .build()
            .unwrap();
        let second = ProductDraft::from_product(&first).name("Second").build().unwrap();
        let mut catalog = ProductCatalog::new().with_override(first).with_override(second);
        assert_eq!(catalog.overrides().len(), 1);
        assert_eq!(catalog.resolve(TreatmentCategory::Clarifier).name, "Second");

        catalog.remove_override(TreatmentCategory::Clarifier);
        assert!(catalog.resolve(TreatmentCategory::Clarifier).is_default);
        assert_eq!(catalog.entries().count(), 8);
    }

    #[test]
    fn draft_falls_back_to_category_unit_and_effect() {
        let p = ProductDraft::new(TreatmentCategory::PhDown)
            .name("Acid")
            .dose_quantity(12.0)
            .volume_reference_l(1000.0)
            .build()
            .unwrap();
        assert_eq!(p.unit, "ml");
        assert_eq!(p.effect_change, 0.1);
        assert!(!p.is_default);
    }

    #[test]
    fn draft_rejects_missing_required_fields() {
        let err = ProductDraft::new(TreatmentCategory::PhUp)
            .name("   ")
            .dose_quantity(1.0)
            .volume_reference_l(1000.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidProduct { field: "name", .. }));

        let err = ProductDraft::new(TreatmentCategory::PhUp)
            .name("X")
            .dose_quantity(1.0)
            .volume_reference_l(0.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidProduct { field: "volume_reference_l", .. }));

        let err = ProductDraft::new(TreatmentCategory::PhUp)
            .name("X")
            .dose_quantity(1.0)
            .volume_reference_l(1000.0)
            .effect_change(0.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidProduct { field: "effect_change", .. }));

        let err = ProductDraft::default().build().unwrap_err();
        assert!(matches!(err, AppError::InvalidProduct { field: "category", .. }));
    }
}
