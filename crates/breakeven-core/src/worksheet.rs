//! Editor-side state around a `FinancialInputs` snapshot.
//!
//! A `Worksheet` owns the inputs plus the optional fixed-cost and product
//! detail lists, and keeps them consistent after every edit. Each edit names
//! the field that changed, so the recompute rule is chosen by the variant
//! rather than by the order of writes.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::engine::{evaluate, CalculationResults, FinancialInputs, TargetProfitMode};
use crate::mix::{fixed_cost_total, weighted_average, FixedCostDetail, ProductDetail};
use crate::types::{round_display, Money};

/// Whether a total is typed directly or derived from a detail list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryMode {
    #[default]
    Simple,
    Detailed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Worksheet {
    pub inputs: FinancialInputs,
    pub fc_mode: EntryMode,
    pub fc_details: Vec<FixedCostDetail>,
    pub unit_mode: EntryMode,
    pub products: Vec<ProductDetail>,
}

/// A single user edit, tagged with the field it touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum Edit {
    FixedCost(Money),
    Price(Money),
    VariableCost(Money),
    TargetProfit(Money),
    TargetNetProfit(Money),
    TargetProfitRate(Decimal),
    TargetProfitMode(TargetProfitMode),
    SalesExpenses(Money),
    FixedCostMode(EntryMode),
    AddFixedCost(FixedCostDetail),
    UpdateFixedCost { index: usize, detail: FixedCostDetail },
    RemoveFixedCost(usize),
    UnitMode(EntryMode),
    AddProduct(ProductDetail),
    UpdateProduct { index: usize, product: ProductDetail },
    RemoveProduct(usize),
}

impl Worksheet {
    pub fn new(inputs: FinancialInputs) -> Self {
        Worksheet {
            inputs,
            ..Default::default()
        }
    }

    /// Apply one edit and reconcile the fields that depend on it.
    pub fn apply(&mut self, edit: Edit) {
        match edit {
            Edit::FixedCost(amount) => {
                if self.fc_mode == EntryMode::Simple {
                    self.inputs.fc = amount;
                } else {
                    warn!("fixed cost is derived from details in detailed mode; edit ignored");
                }
            }
            Edit::Price(price) => {
                if self.unit_mode == EntryMode::Simple {
                    self.inputs.p = price;
                } else {
                    warn!("price is derived from the product mix in detailed mode; edit ignored");
                }
            }
            Edit::VariableCost(cost) => {
                if self.unit_mode == EntryMode::Simple {
                    self.inputs.vc = cost;
                } else {
                    warn!("variable cost is derived from the product mix in detailed mode; edit ignored");
                }
            }
            Edit::TargetProfit(tp) => {
                self.inputs.tp = tp;
                self.sync_net_from_gross();
            }
            Edit::TargetNetProfit(net) => {
                self.inputs.target_net_profit = net;
                self.inputs.tp = net.saturating_add(self.inputs.sales_expenses);
            }
            Edit::TargetProfitRate(rate) => self.inputs.tp_rate = rate,
            Edit::TargetProfitMode(mode) => self.inputs.tp_mode = mode,
            Edit::SalesExpenses(expenses) => {
                self.inputs.sales_expenses = expenses;
                if self.inputs.tp_mode == TargetProfitMode::Amount {
                    self.sync_net_from_gross();
                }
            }
            Edit::FixedCostMode(mode) => {
                self.fc_mode = mode;
                self.resum_fixed_costs();
            }
            Edit::AddFixedCost(detail) => {
                self.fc_details.push(detail);
                self.resum_fixed_costs();
            }
            Edit::UpdateFixedCost { index, detail } => {
                match self.fc_details.get_mut(index) {
                    Some(slot) => *slot = detail,
                    None => warn!(index, "no fixed-cost line at index; edit ignored"),
                }
                self.resum_fixed_costs();
            }
            Edit::RemoveFixedCost(index) => {
                if index < self.fc_details.len() {
                    self.fc_details.remove(index);
                } else {
                    warn!(index, "no fixed-cost line at index; edit ignored");
                }
                self.resum_fixed_costs();
            }
            Edit::UnitMode(mode) => {
                self.unit_mode = mode;
                self.reaverage_units();
            }
            Edit::AddProduct(product) => {
                self.products.push(product);
                self.reaverage_units();
            }
            Edit::UpdateProduct { index, product } => {
                match self.products.get_mut(index) {
                    Some(slot) => *slot = product,
                    None => warn!(index, "no product at index; edit ignored"),
                }
                self.reaverage_units();
            }
            Edit::RemoveProduct(index) => {
                if index < self.products.len() {
                    self.products.remove(index);
                } else {
                    warn!(index, "no product at index; edit ignored");
                }
                self.reaverage_units();
            }
        }
    }

    /// Bring derived totals back in line with the detail lists. Needed after
    /// a worksheet is loaded whole rather than built edit by edit.
    pub fn reconcile(&mut self) {
        self.resum_fixed_costs();
        self.reaverage_units();
    }

    /// Reconcile, evaluate the current inputs and back-fill the
    /// non-authoritative target field for display.
    pub fn evaluate(&mut self) -> CalculationResults {
        self.reconcile();
        let results = evaluate(&self.inputs);
        if !results.is_valid {
            return results;
        }

        match self.inputs.tp_mode {
            TargetProfitMode::Rate => {
                if let Some(gross) = results.effective_gross_tp.finite() {
                    self.inputs.tp = round_display(gross);
                    self.sync_net_from_gross();
                }
            }
            TargetProfitMode::Amount => {
                if let Some(amount) = results.target_amount.finite() {
                    let rate = Some(amount)
                        .filter(|amount| *amount > Decimal::ZERO)
                        .and_then(|amount| self.inputs.tp.checked_div(amount))
                        .and_then(|share| share.checked_mul(dec!(100)));
                    if let Some(rate) = rate {
                        self.inputs.tp_rate = round_display(rate);
                    }
                }
            }
        }
        results
    }

    fn sync_net_from_gross(&mut self) {
        self.inputs.target_net_profit = self.inputs.tp.saturating_sub(self.inputs.sales_expenses);
    }

    // Detailed mode only; in simple mode the list is kept but ignored.
    fn resum_fixed_costs(&mut self) {
        if self.fc_mode == EntryMode::Detailed {
            self.inputs.fc = fixed_cost_total(&self.fc_details);
        }
    }

    fn reaverage_units(&mut self) {
        if self.unit_mode == EntryMode::Detailed {
            let unit = weighted_average(&self.products);
            self.inputs.p = unit.p;
            self.inputs.vc = unit.vc;
        }
    }
}
