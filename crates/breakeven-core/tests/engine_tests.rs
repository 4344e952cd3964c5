use breakeven_core::engine::{evaluate, CalculationResults, FinancialInputs, TargetProfitMode};
use breakeven_core::mix::{weighted_average, ProductDetail};
use breakeven_core::types::Extent;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn approx(actual: Extent, expected: Decimal) -> bool {
    match actual {
        Extent::Finite(v) => (v - expected).abs() < dec!(0.000001),
        Extent::Unbounded => false,
    }
}

fn scenario_a() -> FinancialInputs {
    FinancialInputs {
        fc: dec!(2000000),
        p: dec!(15000),
        vc: dec!(5000),
        tp: dec!(1000000),
        tp_rate: dec!(0),
        tp_mode: TargetProfitMode::Amount,
        sales_expenses: dec!(0),
        target_net_profit: dec!(1000000),
    }
}

/// A spread of valid models: (fc, p, vc, sales_expenses)
fn valid_models() -> Vec<(Decimal, Decimal, Decimal, Decimal)> {
    vec![
        (dec!(2000000), dec!(15000), dec!(5000), dec!(0)),
        (dec!(10000), dec!(50), dec!(30), dec!(2500)),
        (dec!(0), dec!(9.99), dec!(3.33), dec!(100)),
        (dec!(123456.78), dec!(7), dec!(0), dec!(0.5)),
        (dec!(1), dec!(100000), dec!(99999), dec!(0)),
    ]
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn test_scenario_a_amount_target() {
    let result = evaluate(&scenario_a());
    assert!(result.is_valid);
    assert_eq!(result.cm, dec!(10000));
    assert_eq!(result.cmr.round_dp(4), dec!(0.6667));
    assert_eq!(result.bep_units, Extent::Finite(dec!(200)));
    assert!(approx(result.bep_amount, dec!(3000000)));
    assert_eq!(result.target_units, Extent::Finite(dec!(300)));
    assert!(approx(result.target_amount, dec!(4500000)));
    assert_eq!(result.effective_gross_tp, Extent::Finite(dec!(1000000)));
    assert_eq!(result.safety_margin.round_dp(4), dec!(0.3333));
}

#[test]
fn test_scenario_b_rate_above_cmr_is_unreachable() {
    let mut inputs = scenario_a();
    inputs.tp_mode = TargetProfitMode::Rate;
    inputs.tp_rate = dec!(80);
    let result = evaluate(&inputs);
    assert!(result.is_valid);
    assert_eq!(result.target_amount, Extent::Unbounded);
    assert_eq!(result.target_units, Extent::Unbounded);
    assert_eq!(result.effective_gross_tp, Extent::Unbounded);
    assert_eq!(result.effective_net_tp, Extent::Unbounded);
    assert_eq!(result.total_vc, Extent::Unbounded);
    assert_eq!(result.total_business_cost, Extent::Unbounded);
    assert_eq!(result.total_all_cost, Extent::Unbounded);
    // break-even does not depend on the target
    assert_eq!(result.bep_units, Extent::Finite(dec!(200)));
}

#[test]
fn test_scenario_c_price_equals_variable_cost() {
    for fc in [dec!(0), dec!(1), dec!(2000000)] {
        let inputs = FinancialInputs {
            fc,
            p: dec!(5000),
            vc: dec!(5000),
            ..scenario_a()
        };
        assert_eq!(evaluate(&inputs), CalculationResults::invalid());
    }
}

#[test]
fn test_scenario_d_product_mix() {
    let products = vec![
        ProductDetail {
            name: "Basic".to_string(),
            price: dec!(8000),
            variable_cost: dec!(2000),
            mix: dec!(40),
        },
        ProductDetail {
            name: "Standard".to_string(),
            price: dec!(18000),
            variable_cost: dec!(6000),
            mix: dec!(50),
        },
        ProductDetail {
            name: "Premium".to_string(),
            price: dec!(35000),
            variable_cost: dec!(12000),
            mix: dec!(10),
        },
    ];
    let unit = weighted_average(&products);
    assert_eq!(unit.p, dec!(15700));
    assert_eq!(unit.vc, dec!(5000));
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_degenerate_inputs_zero_everything() {
    for (p, vc) in [
        (dec!(0), dec!(0)),
        (dec!(10), dec!(10)),
        (dec!(10), dec!(25)),
        (dec!(0), dec!(3)),
    ] {
        let inputs = FinancialInputs {
            p,
            vc,
            ..scenario_a()
        };
        let result = evaluate(&inputs);
        assert!(!result.is_valid);
        assert_eq!(result.cm, dec!(0));
        assert_eq!(result.cmr, dec!(0));
        assert_eq!(result.bep_amount, Extent::ZERO);
        assert_eq!(result.target_units, Extent::ZERO);
        assert_eq!(result.total_all_cost, Extent::ZERO);
        assert_eq!(result.effective_net_tp, Extent::ZERO);
        assert_eq!(result.safety_margin, dec!(0));
    }
}

#[test]
fn test_margin_consistency() {
    for (fc, p, vc, se) in valid_models() {
        let inputs = FinancialInputs {
            fc,
            p,
            vc,
            sales_expenses: se,
            ..scenario_a()
        };
        let result = evaluate(&inputs);
        assert!(result.is_valid);
        assert_eq!(result.cm, p - vc);
        assert_eq!(result.cmr, result.cm / p);
        assert!(result.cm > dec!(0));
    }
}

#[test]
fn test_breakeven_covers_costs() {
    for (fc, p, vc, se) in valid_models() {
        let inputs = FinancialInputs {
            fc,
            p,
            vc,
            sales_expenses: se,
            ..scenario_a()
        };
        let result = evaluate(&inputs);
        let gross = result.bep_units.finite().unwrap() * result.cm;
        let net = result.bep_net_units.finite().unwrap() * result.cm;
        assert!((gross - fc).abs() < dec!(0.000001), "gross {} vs {}", gross, fc);
        assert!((net - (fc + se)).abs() < dec!(0.000001), "net {} vs {}", net, fc + se);
    }
}

#[test]
fn test_amount_target_covers_fixed_cost_and_profit() {
    for tp in [dec!(0), dec!(500), dec!(1000000), dec!(-200)] {
        let inputs = FinancialInputs { tp, ..scenario_a() };
        let result = evaluate(&inputs);
        let covered = result.target_units.finite().unwrap() * result.cm;
        assert!((covered - (inputs.fc + tp)).abs() < dec!(0.000001));
        assert_eq!(result.effective_gross_tp, Extent::Finite(tp));
    }
}

#[test]
fn test_reachable_rate_target_hits_rate() {
    for rate in [dec!(0), dec!(10), dec!(33.3), dec!(66)] {
        let inputs = FinancialInputs {
            tp_mode: TargetProfitMode::Rate,
            tp_rate: rate,
            ..scenario_a()
        };
        let result = evaluate(&inputs);
        let amount = result.target_amount.finite().unwrap();
        let gross = result.effective_gross_tp.finite().unwrap();
        let achieved = gross / amount;
        assert!(
            (achieved - rate / dec!(100)).abs() < dec!(0.0000001),
            "rate {} achieved {}",
            rate,
            achieved
        );
    }
}

#[test]
fn test_unreachable_rate_targets() {
    // cmr = 2/3
    for rate in [dec!(66.67), dec!(80), dec!(100), dec!(250)] {
        let inputs = FinancialInputs {
            tp_mode: TargetProfitMode::Rate,
            tp_rate: rate,
            ..scenario_a()
        };
        let result = evaluate(&inputs);
        assert_eq!(result.target_amount, Extent::Unbounded);
        assert_eq!(result.target_units, Extent::Unbounded);
        assert_eq!(result.effective_gross_tp, Extent::Unbounded);
    }
}

#[test]
fn test_net_profit_is_gross_less_sales_expenses() {
    for (mode, rate) in [
        (TargetProfitMode::Amount, dec!(0)),
        (TargetProfitMode::Rate, dec!(25)),
        (TargetProfitMode::Rate, dec!(90)),
    ] {
        let inputs = FinancialInputs {
            tp_mode: mode,
            tp_rate: rate,
            sales_expenses: dec!(350000),
            ..scenario_a()
        };
        let result = evaluate(&inputs);
        assert_eq!(
            result.effective_net_tp,
            result.effective_gross_tp - dec!(350000)
        );
    }
}

#[test]
fn test_safety_margin_bounds() {
    for (fc, p, vc, se) in valid_models() {
        let inputs = FinancialInputs {
            fc,
            p,
            vc,
            sales_expenses: se,
            tp: dec!(1000),
            ..scenario_a()
        };
        let result = evaluate(&inputs);
        let target = result.target_amount.finite().unwrap();
        let bep = result.bep_amount.finite().unwrap();
        // With no fixed cost every sale is above break-even.
        if fc > dec!(0) {
            assert!(result.safety_margin < dec!(1));
        } else {
            assert_eq!(result.safety_margin, dec!(1));
        }
        if target > dec!(0) {
            let expected = (target - bep) / target;
            assert!((result.safety_margin - expected).abs() < dec!(0.0000001));
        }
    }
}
