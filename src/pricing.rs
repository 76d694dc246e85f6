// 🧮 Pricing Engine
// CatalogRecord + MultiplierTable → PriceBreakdown. Pure, total, never fails.

use crate::catalog::CatalogRecord;
use crate::currency::{parse_currency, round_cents, serialize_money, serialize_optional_money, ParseMode};
use crate::rules::MultiplierTable;
use serde::Serialize;

// ============================================================================
// BREAKDOWN
// ============================================================================

/// PriceBreakdown - what the UI renders
///
/// Money fields are rounded to cents independently, each one from the
/// full-precision intermediate value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    #[serde(serialize_with = "serialize_money")]
    pub base_price: f64,

    #[serde(serialize_with = "serialize_money")]
    pub tax_amount: f64,

    #[serde(serialize_with = "serialize_money")]
    pub markup_amount: f64,

    #[serde(serialize_with = "serialize_money")]
    pub final_value: f64,

    /// Only present when the table carries a discount
    #[serde(
        serialize_with = "serialize_optional_money",
        skip_serializing_if = "Option::is_none"
    )]
    pub discounted_value: Option<f64>,

    pub total_multiplier: f64,
    pub category_factor: f64,
    pub floor_applied: bool,
}

impl PriceBreakdown {
    /// Fallback for missing or unparsable prices
    pub fn zeroed(table: &MultiplierTable) -> Self {
        PriceBreakdown {
            base_price: 0.0,
            tax_amount: 0.0,
            markup_amount: 0.0,
            final_value: 0.0,
            discounted_value: if table.has_discount() { Some(0.0) } else { None },
            total_multiplier: 0.0,
            category_factor: 0.0,
            floor_applied: false,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.base_price == 0.0 && self.final_value == 0.0
    }
}

/// PriceQuote - breakdown plus the selected code, the shape shown on reveal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub model: String,
    pub found: bool,
    #[serde(flatten)]
    pub breakdown: PriceBreakdown,
}

// ============================================================================
// COMPUTATION
// ============================================================================

/// Compute a breakdown with the default (lenient) currency parsing
pub fn compute(record: Option<&CatalogRecord>, table: &MultiplierTable) -> PriceBreakdown {
    compute_with_mode(record, table, ParseMode::default())
}

/// Compute a breakdown
///
/// # Steps:
/// 1. Parse the base price; missing or malformed → zeroed breakdown
/// 2. total = tax × category factor (1.0 for unknown categories)
/// 3. Clamp to the price floor, reconciling markup if configured
/// 4. Apply the discount to the clamped value
pub fn compute_with_mode(
    record: Option<&CatalogRecord>,
    table: &MultiplierTable,
    mode: ParseMode,
) -> PriceBreakdown {
    let base_price = match record.and_then(|r| parse_currency(&r.raw_value, mode)) {
        Some(value) => value,
        None => return PriceBreakdown::zeroed(table),
    };

    // record is Some here: parse succeeded
    let category = record.map(|r| r.category.as_str()).unwrap_or_default();
    let category_factor = table.factor_for(category);

    let total_multiplier = table.tax_factor * category_factor;
    let tax_amount = base_price * (table.tax_factor - 1.0);
    let mut final_value = base_price * total_multiplier;
    let mut markup_amount = final_value - base_price - tax_amount;

    let mut floor_applied = false;
    if let Some(floor) = table.price_floor {
        if final_value < floor {
            final_value = floor;
            floor_applied = true;
            if table.reconcile_markup_after_floor {
                markup_amount = final_value - base_price - tax_amount;
            }
        }
    }

    let discounted_value = table.discount_factor.map(|d| final_value * d);

    PriceBreakdown {
        base_price: round_cents(base_price),
        tax_amount: round_cents(tax_amount),
        markup_amount: round_cents(markup_amount),
        final_value: round_cents(final_value),
        discounted_value: discounted_value.map(round_cents),
        total_multiplier,
        category_factor,
        floor_applied,
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// PricingEngine - owns a table, shareable across threads
#[derive(Debug, Clone)]
pub struct PricingEngine {
    table: MultiplierTable,
    mode: ParseMode,
}

impl PricingEngine {
    pub fn new(table: MultiplierTable) -> Self {
        PricingEngine {
            table,
            mode: ParseMode::default(),
        }
    }

    /// Builder pattern: choose currency parsing
    pub fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn table(&self) -> &MultiplierTable {
        &self.table
    }

    pub fn parse_mode(&self) -> ParseMode {
        self.mode
    }

    pub fn compute(&self, record: Option<&CatalogRecord>) -> PriceBreakdown {
        compute_with_mode(record, &self.table, self.mode)
    }

    /// Breakdown tagged with the code it was computed for
    pub fn quote(&self, code: &str, record: Option<&CatalogRecord>) -> PriceQuote {
        let breakdown = self.compute(record);
        tracing::debug!(
            code,
            final_value = breakdown.final_value,
            floor_applied = breakdown.floor_applied,
            "computed quote"
        );

        PriceQuote {
            model: code.to_string(),
            found: record.is_some(),
            breakdown,
        }
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(MultiplierTable::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
