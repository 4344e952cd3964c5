//! Plain-text summary of a calculation, used as a console report and as the
//! context block handed to a conversational assistant.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::engine::{CalculationResults, FinancialInputs, TargetProfitMode};
use crate::types::{round_display, Extent, Rate};

/// How much room the target leaves above gross break-even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Safety margin of 30% or more
    Comfortable,
    /// 10% up to 30%
    Moderate,
    /// Below 10%, including a target under break-even
    Thin,
}

impl RiskLevel {
    pub fn from_safety_margin(safety_margin: Rate) -> Self {
        if safety_margin >= dec!(0.3) {
            RiskLevel::Comfortable
        } else if safety_margin >= dec!(0.1) {
            RiskLevel::Moderate
        } else {
            RiskLevel::Thin
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Comfortable => "comfortable",
            RiskLevel::Moderate => "moderate",
            RiskLevel::Thin => "thin",
        }
    }
}

/// Group the integer part in thousands; keep two decimals only when the
/// rounded value has a fractional part.
pub fn format_amount(value: Decimal) -> String {
    let rounded = round_display(value);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let abs = rounded.abs();
    let whole = abs.trunc();
    let frac = abs - whole;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if !frac.is_zero() {
        let cents = (frac * dec!(100)).round().to_string();
        grouped.push('.');
        grouped.push_str(&format!("{:0>2}", cents));
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_extent(value: Extent) -> String {
    match value {
        Extent::Finite(v) => format_amount(v),
        Extent::Unbounded => "unreachable".to_string(),
    }
}

/// A fraction as a percentage with two decimals: 0.3333 -> "33.33%".
pub fn format_rate(rate: Rate) -> String {
    format!("{:.2}%", round_display(rate.saturating_mul(dec!(100))))
}

/// Build the report. `question` is appended verbatim when present.
pub fn build_report(
    inputs: &FinancialInputs,
    results: &CalculationResults,
    question: Option<&str>,
) -> String {
    let mut out = String::from("Break-even analysis\n\n");

    out.push_str("Inputs:\n");
    out.push_str(&format!("- Fixed costs: {}\n", format_amount(inputs.fc)));
    out.push_str(&format!("- Price per unit: {}\n", format_amount(inputs.p)));
    out.push_str(&format!(
        "- Variable cost per unit: {}\n",
        format_amount(inputs.vc)
    ));
    out.push_str(&format!(
        "- Sales expenses: {}\n",
        format_amount(inputs.sales_expenses)
    ));
    match inputs.tp_mode {
        TargetProfitMode::Amount => out.push_str(&format!(
            "- Target: gross profit of {} (net {})\n",
            format_amount(inputs.tp),
            format_amount(inputs.tp.saturating_sub(inputs.sales_expenses))
        )),
        TargetProfitMode::Rate => out.push_str(&format!(
            "- Target: gross margin of {:.2}% of revenue\n",
            inputs.tp_rate
        )),
    }
    out.push('\n');

    if !results.is_valid {
        out.push_str(
            "Results: not available. The price per unit must be higher than the \
             variable cost per unit for any break-even point to exist.\n",
        );
        append_question(&mut out, question);
        return out;
    }

    out.push_str("Results:\n");
    out.push_str(&format!(
        "- Contribution margin: {} per unit ({} of price)\n",
        format_amount(results.cm),
        format_rate(results.cmr)
    ));
    out.push_str(&format!(
        "- Gross break-even: {} units, {} in sales\n",
        format_extent(results.bep_units),
        format_extent(results.bep_amount)
    ));
    out.push_str(&format!(
        "- Net break-even (incl. sales expenses): {} units, {} in sales\n",
        format_extent(results.bep_net_units),
        format_extent(results.bep_net_amount)
    ));

    if results.target_amount.is_unbounded() {
        out.push_str(&format!(
            "- Target sales: unreachable. A gross margin of {:.2}% is not below the \
             contribution margin ratio of {}, so no sales volume achieves it.\n",
            inputs.tp_rate,
            format_rate(results.cmr)
        ));
    } else {
        out.push_str(&format!(
            "- Target sales: {} units, {} in sales\n",
            format_extent(results.target_units),
            format_extent(results.target_amount)
        ));
        out.push_str(&format!(
            "- Costs at target: variable {}, business total {}, all-in {}\n",
            format_extent(results.total_vc),
            format_extent(results.total_business_cost),
            format_extent(results.total_all_cost)
        ));
        out.push_str(&format!(
            "- Profit at target: gross {}, net {}\n",
            format_extent(results.effective_gross_tp),
            format_extent(results.effective_net_tp)
        ));
        out.push_str(&format!(
            "- Safety margin: {} ({})\n",
            format_rate(results.safety_margin),
            RiskLevel::from_safety_margin(results.safety_margin).label()
        ));
    }

    append_question(&mut out, question);
    out
}

fn append_question(out: &mut String, question: Option<&str>) {
    if let Some(q) = question.map(str::trim).filter(|q| !q.is_empty()) {
        out.push_str(&format!("\nQuestion: {}\n", q));
    }
}
