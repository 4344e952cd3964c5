use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::types::{with_metadata, ComputationOutput, Extent, Money, Rate};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which of `tp` / `tp_rate` the user entered. The other one is a display
/// value derived after evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetProfitMode {
    #[default]
    Amount,
    Rate,
}

/// One snapshot of the business model. Absent numeric fields read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialInputs {
    /// Total fixed cost for the period
    pub fc: Money,
    /// Selling price per unit
    pub p: Money,
    /// Variable cost per unit
    pub vc: Money,
    /// Target gross profit amount (authoritative in amount mode)
    pub tp: Money,
    /// Target gross margin on revenue, as a percentage 0-100
    /// (authoritative in rate mode)
    pub tp_rate: Decimal,
    pub tp_mode: TargetProfitMode,
    /// Selling expenses outside fc/vc, deducted only at the net level
    pub sales_expenses: Money,
    /// tp - sales_expenses
    pub target_net_profit: Money,
}

/// Everything derived from one `FinancialInputs` snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResults {
    /// Contribution margin per unit: p - vc
    pub cm: Money,
    /// Contribution margin ratio: cm / p
    pub cmr: Rate,
    /// fc / cm
    pub bep_units: Extent,
    /// fc / cmr
    pub bep_amount: Extent,
    /// (fc + sales_expenses) / cm
    pub bep_net_units: Extent,
    /// (fc + sales_expenses) / cmr
    pub bep_net_amount: Extent,
    pub target_units: Extent,
    pub target_amount: Extent,
    /// target_units * vc
    pub total_vc: Extent,
    /// fc + total_vc
    pub total_business_cost: Extent,
    /// total_business_cost + sales_expenses
    pub total_all_cost: Extent,
    /// Gross profit actually earned at the target point
    pub effective_gross_tp: Extent,
    /// effective_gross_tp - sales_expenses
    pub effective_net_tp: Extent,
    /// (target_amount - bep_amount) / target_amount
    pub safety_margin: Rate,
    pub is_valid: bool,
}

impl CalculationResults {
    /// The degenerate result: every figure zero, `is_valid = false`.
    pub fn invalid() -> Self {
        CalculationResults {
            cm: Decimal::ZERO,
            cmr: Decimal::ZERO,
            bep_units: Extent::ZERO,
            bep_amount: Extent::ZERO,
            bep_net_units: Extent::ZERO,
            bep_net_amount: Extent::ZERO,
            target_units: Extent::ZERO,
            target_amount: Extent::ZERO,
            total_vc: Extent::ZERO,
            total_business_cost: Extent::ZERO,
            total_all_cost: Extent::ZERO,
            effective_gross_tp: Extent::ZERO,
            effective_net_tp: Extent::ZERO,
            safety_margin: Decimal::ZERO,
            is_valid: false,
        }
    }

    pub fn is_target_reachable(&self) -> bool {
        self.is_valid && self.target_amount.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Function 1: evaluate
// ---------------------------------------------------------------------------

/// Derive margins, gross and net break-even, the target point, its cost
/// breakdown and the safety margin.
///
/// Total: never panics and never errors. A non-positive contribution margin
/// yields `CalculationResults::invalid()`; an unreachable target margin rate
/// yields `Extent::Unbounded` target figures.
pub fn evaluate(inputs: &FinancialInputs) -> CalculationResults {
    // A non-positive price is degenerate too: it only passes `p > vc` with a
    // negative variable cost, and cmr would divide by zero.
    if inputs.p <= inputs.vc || inputs.p <= Decimal::ZERO {
        debug!(p = %inputs.p, vc = %inputs.vc, "non-positive contribution margin");
        return CalculationResults::invalid();
    }

    // A price so small against a negative variable cost that cm / p leaves
    // Decimal range is treated as degenerate as well.
    let Some((cm, cmr)) = inputs
        .p
        .checked_sub(inputs.vc)
        .and_then(|cm| cm.checked_div(inputs.p).map(|cmr| (cm, cmr)))
    else {
        debug!(p = %inputs.p, vc = %inputs.vc, "contribution margin ratio out of range");
        return CalculationResults::invalid();
    };

    // Gross break-even covers fixed cost only
    let bep_units = Extent::ratio(inputs.fc, cm);
    let bep_amount = bep_units * inputs.p;

    // Net break-even also covers sales expenses
    let bep_net_units = (Extent::Finite(inputs.fc) + inputs.sales_expenses).divided_by(cm);
    let bep_net_amount = bep_net_units * inputs.p;

    let (target_units, target_amount, effective_gross_tp) = resolve_target(inputs, cm, cmr);

    let total_vc = target_units * inputs.vc;
    let total_business_cost = total_vc + inputs.fc;
    let total_all_cost = total_business_cost + inputs.sales_expenses;

    let effective_net_tp = effective_gross_tp - inputs.sales_expenses;
    let safety_margin = safety_margin(target_amount, bep_amount);

    debug!(
        cm = %cm,
        target_amount = %target_amount,
        safety_margin = %safety_margin,
        "evaluated financial inputs"
    );

    CalculationResults {
        cm,
        cmr,
        bep_units,
        bep_amount,
        bep_net_units,
        bep_net_amount,
        target_units,
        target_amount,
        total_vc,
        total_business_cost,
        total_all_cost,
        effective_gross_tp,
        effective_net_tp,
        safety_margin,
        is_valid: true,
    }
}

/// Returns (target_units, target_amount, effective_gross_tp).
fn resolve_target(inputs: &FinancialInputs, cm: Money, cmr: Rate) -> (Extent, Extent, Extent) {
    match inputs.tp_mode {
        TargetProfitMode::Rate => {
            let rate = inputs.tp_rate / dec!(100);
            if cmr > rate {
                // A gap beyond Decimal range leaves nothing to cover
                let target_amount = cmr
                    .checked_sub(rate)
                    .map_or(Extent::ZERO, |gap| Extent::ratio(inputs.fc, gap));
                let target_units = target_amount.divided_by(inputs.p);
                (target_units, target_amount, target_amount * rate)
            } else {
                // Every extra unit adds less margin than the rate demands.
                (Extent::Unbounded, Extent::Unbounded, Extent::Unbounded)
            }
        }
        TargetProfitMode::Amount => {
            let target_units = (Extent::Finite(inputs.fc) + inputs.tp).divided_by(cm);
            let target_amount = target_units * inputs.p;
            (target_units, target_amount, Extent::Finite(inputs.tp))
        }
    }
}

fn safety_margin(target_amount: Extent, bep_amount: Extent) -> Rate {
    match (target_amount, bep_amount) {
        (Extent::Finite(target), Extent::Finite(bep)) if target > Decimal::ZERO => target
            .checked_sub(bep)
            .and_then(|cushion| cushion.checked_div(target))
            .unwrap_or(Decimal::ZERO),
        _ => Decimal::ZERO,
    }
}

// ---------------------------------------------------------------------------
// Function 2: evaluate_with_metadata
// ---------------------------------------------------------------------------

/// `evaluate` wrapped in the standard output envelope, with warnings a
/// reader of the numbers should see.
pub fn evaluate_with_metadata(inputs: &FinancialInputs) -> ComputationOutput<CalculationResults> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    for (field, value) in [
        ("fc", inputs.fc),
        ("p", inputs.p),
        ("vc", inputs.vc),
        ("sales_expenses", inputs.sales_expenses),
    ] {
        if value < Decimal::ZERO {
            warnings.push(format!("{} is negative ({})", field, value));
        }
    }

    if inputs.tp_mode == TargetProfitMode::Rate
        && (inputs.tp_rate < Decimal::ZERO || inputs.tp_rate > dec!(100))
    {
        warnings.push(format!(
            "Target margin rate {}% is outside 0-100%",
            inputs.tp_rate
        ));
    }

    let result = evaluate(inputs);

    if !result.is_valid {
        warnings.push(
            "Contribution margin is zero or negative — price must exceed variable cost".to_string(),
        );
    } else {
        if result.target_amount.is_unbounded() {
            warnings.push(format!(
                "Target margin rate {}% is not below the contribution margin ratio {}%; target is unreachable",
                inputs.tp_rate,
                result.cmr.saturating_mul(dec!(100)).round_dp(2)
            ));
        }
        if result.safety_margin < Decimal::ZERO {
            warnings.push("Target sales are below gross break-even".to_string());
        }
        if let Some(net) = result.effective_net_tp.finite() {
            if net < Decimal::ZERO {
                warnings.push(format!(
                    "Sales expenses exceed gross profit at target; net profit is {}",
                    net
                ));
            }
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;

    with_metadata(
        "Contribution Margin Break-even and Target Profit Analysis",
        &serde_json::json!({
            "fc": inputs.fc.to_string(),
            "p": inputs.p.to_string(),
            "vc": inputs.vc.to_string(),
            "tp_mode": inputs.tp_mode,
            "tp": inputs.tp.to_string(),
            "tp_rate": inputs.tp_rate.to_string(),
            "sales_expenses": inputs.sales_expenses.to_string(),
        }),
        warnings,
        elapsed,
        result,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
