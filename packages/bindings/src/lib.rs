use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use breakeven_core::engine::{self, FinancialInputs};
use breakeven_core::mix::{self, ProductDetail};
use breakeven_core::narrative;
use breakeven_core::worksheet::{Edit, Worksheet};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[napi]
pub fn evaluate(input_json: String) -> NapiResult<String> {
    let inputs: FinancialInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = engine::evaluate_with_metadata(&inputs);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn build_report(input_json: String, question: Option<String>) -> NapiResult<String> {
    let inputs: FinancialInputs = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let results = engine::evaluate(&inputs);
    Ok(narrative::build_report(&inputs, &results, question.as_deref()))
}

// ---------------------------------------------------------------------------
// Editor helpers
// ---------------------------------------------------------------------------

#[napi]
pub fn weighted_average(products_json: String) -> NapiResult<String> {
    let products: Vec<ProductDetail> =
        serde_json::from_str(&products_json).map_err(to_napi_error)?;
    serde_json::to_string(&mix::weighted_average(&products)).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct EditRequest {
    worksheet: Worksheet,
    edits: Vec<Edit>,
}

/// Apply edits in order, evaluate, and return `{ worksheet, results }`.
#[napi]
pub fn apply_edits(request_json: String) -> NapiResult<String> {
    let request: EditRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let mut worksheet = request.worksheet;
    worksheet.reconcile();
    for edit in request.edits {
        worksheet.apply(edit);
    }
    let results = worksheet.evaluate();
    serde_json::to_string(&serde_json::json!({
        "worksheet": worksheet,
        "results": results,
    }))
    .map_err(to_napi_error)
}

#[napi]
pub fn evaluate_worksheet(worksheet_json: String) -> NapiResult<String> {
    let mut worksheet: Worksheet = serde_json::from_str(&worksheet_json).map_err(to_napi_error)?;
    let results = worksheet.evaluate();
    serde_json::to_string(&serde_json::json!({
        "worksheet": worksheet,
        "results": results,
    }))
    .map_err(to_napi_error)
}
