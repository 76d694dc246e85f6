// 🏷️ Pricing Rules - Rules as Data
// Tax factor, per-category markups, price floor and discount in one table

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Factor used when a category has no entry in the table
pub const UNRECOGNIZED_FACTOR: f64 = 1.0;

// ============================================================================
// CATEGORY
// ============================================================================

/// Known catalog categories (the `TIPO` column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    DisplayMontado,
    OpenCell,
    PlacaFonte,
    Outros,
    /// Compressors and other high value items
    Outros2,
    PlacaDeCircuitoImpresso,
    ComponenteMecanico,
}

impl Category {
    /// Label exactly as it appears in the catalog
    pub fn label(&self) -> &'static str {
        match self {
            Category::DisplayMontado => "DISPLAY MONTADO",
            Category::OpenCell => "OPEN CELL",
            Category::PlacaFonte => "PLACA FONTE",
            Category::Outros => "OUTROS",
            Category::Outros2 => "OUTROS_2",
            Category::PlacaDeCircuitoImpresso => "PLACA DE CIRCUITO IMPRESSO",
            Category::ComponenteMecanico => "COMPONENTE MECÂNICO",
        }
    }
}

// ============================================================================
// MULTIPLIER TABLE
// ============================================================================

/// MultiplierTable - every number the engine needs, passed in at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplierTable {
    /// Applied to every record (1.35 = 35% overhead)
    pub tax_factor: f64,

    /// Category label → markup factor
    #[serde(default)]
    pub category_factors: BTreeMap<String, f64>,

    /// Final prices below this are raised to it
    #[serde(default)]
    pub price_floor: Option<f64>,

    /// Applied after the floor (0.90 = 10% off)
    #[serde(default)]
    pub discount_factor: Option<f64>,

    /// Recompute markup after clamping so base + tax + markup == final
    #[serde(default = "default_reconcile")]
    pub reconcile_markup_after_floor: bool,
}

fn default_reconcile() -> bool {
    true
}

impl MultiplierTable {
    /// Table with only a tax factor; every category falls back to 1.0
    pub fn new(tax_factor: f64) -> Self {
        MultiplierTable {
            tax_factor,
            category_factors: BTreeMap::new(),
            price_floor: None,
            discount_factor: None,
            reconcile_markup_after_floor: true,
        }
    }

    /// Storefront values: all categories, R$ 250 floor, 10% discount
    pub fn standard() -> Self {
        MultiplierTable::basic()
            .with_floor(250.0)
            .with_discount(0.90)
    }

    /// The same markups without floor or discount
    pub fn basic() -> Self {
        MultiplierTable::new(1.35)
            .with_category(Category::DisplayMontado, 1.5)
            .with_category(Category::OpenCell, 1.85)
            .with_category(Category::PlacaFonte, 4.0)
            .with_category(Category::Outros, 6.2)
            .with_category(Category::Outros2, 1.6)
            .with_category(Category::PlacaDeCircuitoImpresso, 1.0)
            .with_category(Category::ComponenteMecanico, 2.7)
    }

    /// Builder pattern: set a known category factor
    pub fn with_category(self, category: Category, factor: f64) -> Self {
        self.with_factor(category.label(), factor)
    }

    /// Builder pattern: set a factor for any label
    pub fn with_factor(mut self, label: &str, factor: f64) -> Self {
        self.category_factors.insert(label.to_string(), factor);
        self
    }

    /// Builder pattern: add a price floor
    pub fn with_floor(mut self, floor: f64) -> Self {
        self.price_floor = Some(floor);
        self
    }

    /// Builder pattern: add a discount factor
    pub fn with_discount(mut self, factor: f64) -> Self {
        self.discount_factor = Some(factor);
        self
    }

    /// Builder pattern: choose the post-floor markup policy
    pub fn with_reconcile(mut self, reconcile: bool) -> Self {
        self.reconcile_markup_after_floor = reconcile;
        self
    }

    /// Markup factor for a category label, 1.0 when unknown
    pub fn factor_for(&self, category: &str) -> f64 {
        self.category_factors
            .get(category)
            .copied()
            .unwrap_or(UNRECOGNIZED_FACTOR)
    }

    /// Whether `discountedValue` is part of the output shape
    pub fn has_discount(&self) -> bool {
        self.discount_factor.is_some()
    }

    /// Reject tables that would make prices meaningless
    pub fn validate(&self) -> Result<()> {
        if !self.tax_factor.is_finite() || self.tax_factor <= 0.0 {
            bail!("tax_factor must be a positive number, got {}", self.tax_factor);
        }

        for (label, factor) in &self.category_factors {
            if !factor.is_finite() || *factor < 0.0 {
                bail!("factor for category {:?} must be >= 0, got {}", label, factor);
            }
        }

        if let Some(floor) = self.price_floor {
            if !floor.is_finite() || floor < 0.0 {
                bail!("price_floor must be >= 0, got {}", floor);
            }
        }

        if let Some(discount) = self.discount_factor {
            if !discount.is_finite() || discount <= 0.0 {
                bail!("discount_factor must be a positive number, got {}", discount);
            }
        }

        Ok(())
    }
}

impl Default for MultiplierTable {
    fn default() -> Self {
        Self::standard()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_factors() {
        let table = MultiplierTable::standard();

        assert_eq!(table.tax_factor, 1.35);
        assert_eq!(table.factor_for("DISPLAY MONTADO"), 1.5);
        assert_eq!(table.factor_for("OPEN CELL"), 1.85);
        assert_eq!(table.factor_for("PLACA FONTE"), 4.0);
        assert_eq!(table.factor_for("OUTROS"), 6.2);
        assert_eq!(table.factor_for("OUTROS_2"), 1.6);
        assert_eq!(table.factor_for("PLACA DE CIRCUITO IMPRESSO"), 1.0);
        assert_eq!(table.factor_for("COMPONENTE MECÂNICO"), 2.7);
        assert_eq!(table.price_floor, Some(250.0));
        assert_eq!(table.discount_factor, Some(0.90));
        assert!(table.reconcile_markup_after_floor);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::Outros2.label(), "OUTROS_2");
        assert_eq!(Category::ComponenteMecanico.label(), "COMPONENTE MECÂNICO");
    }

    #[test]
    fn test_basic_has_no_floor_or_discount() {
        let table = MultiplierTable::basic();
        assert_eq!(table.price_floor, None);
        assert!(!table.has_discount());
        assert_eq!(table.category_factors.len(), 7);
    }

    #[test]
    fn test_unknown_category_falls_back() {
        let table = MultiplierTable::standard();
        assert_eq!(table.factor_for("CABO FLAT"), UNRECOGNIZED_FACTOR);
        assert_eq!(table.factor_for(""), UNRECOGNIZED_FACTOR);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let table: MultiplierTable = serde_json::from_str(r#"{ "tax_factor": 1.2 }"#).unwrap();

        assert_eq!(table.tax_factor, 1.2);
        assert!(table.category_factors.is_empty());
        assert_eq!(table.price_floor, None);
        assert!(table.reconcile_markup_after_floor);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(MultiplierTable::new(0.0).validate().is_err());
        assert!(MultiplierTable::new(1.35).with_factor("X", -1.0).validate().is_err());
        assert!(MultiplierTable::new(1.35).with_floor(-10.0).validate().is_err());
        assert!(MultiplierTable::new(1.35).with_discount(0.0).validate().is_err());
        assert!(MultiplierTable::standard().validate().is_ok());
    }
}
