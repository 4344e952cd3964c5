use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{round_display, Money, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One product or service line in a sales mix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDetail {
    pub name: String,
    /// Selling price per unit
    pub price: Money,
    /// Variable cost per unit
    pub variable_cost: Money,
    /// Relative weight (share or expected quantity). Negative weights count as zero.
    pub mix: Decimal,
}

/// One named fixed-cost line (rent, salaries, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedCostDetail {
    pub name: String,
    pub amount: Money,
}

/// Mix-weighted price and variable cost per unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitEconomics {
    pub p: Money,
    pub vc: Money,
}

/// A product's share of the total mix weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixShare {
    pub name: String,
    pub share: Rate,
}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

fn weight(product: &ProductDetail) -> Decimal {
    product.mix.max(Decimal::ZERO)
}

fn total_weight(products: &[ProductDetail]) -> Decimal {
    products
        .iter()
        .fold(Decimal::ZERO, |acc, product| acc.saturating_add(weight(product)))
}

/// Mix-weighted average price and variable cost, rounded to display
/// precision. An empty list or zero total weight collapses both to zero.
pub fn weighted_average(products: &[ProductDetail]) -> UnitEconomics {
    let total_mix = total_weight(products);
    if total_mix.is_zero() {
        return UnitEconomics::default();
    }

    let (price_sum, vc_sum) =
        products
            .iter()
            .fold((Decimal::ZERO, Decimal::ZERO), |(ps, vs), product| {
                let w = weight(product);
                (
                    ps.saturating_add(product.price.saturating_mul(w)),
                    vs.saturating_add(product.variable_cost.saturating_mul(w)),
                )
            });

    UnitEconomics {
        p: round_display(price_sum.checked_div(total_mix).unwrap_or(Decimal::MAX)),
        vc: round_display(vc_sum.checked_div(total_mix).unwrap_or(Decimal::MAX)),
    }
}

/// Each product's fraction of the total mix weight.
pub fn mix_shares(products: &[ProductDetail]) -> Vec<MixShare> {
    let total_mix = total_weight(products);
    products
        .iter()
        .map(|product| MixShare {
            name: product.name.clone(),
            share: if total_mix.is_zero() {
                Decimal::ZERO
            } else {
                weight(product) / total_mix
            },
        })
        .collect()
}

/// Sum of the fixed-cost detail lines.
pub fn fixed_cost_total(details: &[FixedCostDetail]) -> Money {
    details
        .iter()
        .fold(Decimal::ZERO, |acc, d| acc.saturating_add(d.amount))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
