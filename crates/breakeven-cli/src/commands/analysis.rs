use clap::Args;
use serde_json::Value;
use std::time::Instant;

use breakeven_core::engine::{self, FinancialInputs};
use breakeven_core::mix::{self, ProductDetail};
use breakeven_core::narrative;
use breakeven_core::types::with_metadata;

use crate::commands::open_repository;
use crate::input;

/// Arguments for evaluating a set of financial inputs
#[derive(Args)]
pub struct EvaluateArgs {
    /// Path to a JSON/YAML file with the financial inputs
    #[arg(long, conflicts_with = "project")]
    pub input: Option<String>,
    /// Evaluate a saved project instead
    #[arg(long)]
    pub project: Option<String>,
}

/// Arguments for the product-mix weighted average
#[derive(Args)]
pub struct MixArgs {
    /// Path to a JSON/YAML file with a list of products
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the narrative report
#[derive(Args)]
pub struct ReportArgs {
    /// Path to a JSON/YAML file with the financial inputs
    #[arg(long, conflicts_with = "project")]
    pub input: Option<String>,
    /// Report on a saved project instead
    #[arg(long)]
    pub project: Option<String>,
    /// Question to append to the report
    #[arg(long, short)]
    pub question: Option<String>,
}

fn resolve_inputs(
    path: Option<&str>,
    project: Option<&str>,
    store: &str,
) -> Result<FinancialInputs, Box<dyn std::error::Error>> {
    match project {
        Some(name) => {
            let mut worksheet = open_repository(store)?.load(name)?.worksheet;
            // Bring derived display fields up to date before reading them.
            worksheet.evaluate();
            Ok(worksheet.inputs)
        }
        None => input::load(path, "evaluation"),
    }
}

pub fn run_evaluate(args: EvaluateArgs, store: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = resolve_inputs(args.input.as_deref(), args.project.as_deref(), store)?;
    let result = engine::evaluate_with_metadata(&inputs);
    Ok(serde_json::to_value(result)?)
}

pub fn run_mix(args: MixArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let products: Vec<ProductDetail> = input::load(args.input.as_deref(), "product mix")?;

    let mut warnings = Vec::new();
    if products.iter().all(|p| p.mix <= rust_decimal::Decimal::ZERO) {
        warnings.push("Total mix weight is zero; price and variable cost default to 0".to_string());
    }

    let unit = mix::weighted_average(&products);
    let shares = mix::mix_shares(&products);
    let output = with_metadata(
        "Mix-weighted Unit Price and Variable Cost",
        &serde_json::json!({ "products": products.len() }),
        warnings,
        start.elapsed().as_micros() as u64,
        serde_json::json!({
            "p": unit.p,
            "vc": unit.vc,
            "shares": shares,
        }),
    );
    Ok(serde_json::to_value(output)?)
}

/// The report is text, so it is returned as a JSON string and printed as is
/// by every output format except json.
pub fn run_report(args: ReportArgs, store: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs = resolve_inputs(args.input.as_deref(), args.project.as_deref(), store)?;
    let results = engine::evaluate(&inputs);
    let report = narrative::build_report(&inputs, &results, args.question.as_deref());
    Ok(Value::String(report))
}
