use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use startup_forecast_core::advisory::{build_prompt, AdvisorySummary};
use startup_forecast_core::catalog::Catalog;
use startup_forecast_core::format;
use startup_forecast_core::projection::{self, ProjectionInput};
use startup_forecast_core::Currency;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_plan(input_json: &str) -> NapiResult<ProjectionInput> {
    ProjectionInput::from_json(input_json).map_err(to_napi_error)
}

fn resolve_currency(code: &str) -> NapiResult<Currency> {
    Currency::preset(code).ok_or_else(|| to_napi_error(format!("Unknown currency '{code}'")))
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[napi]
pub fn build_projection(input_json: String) -> NapiResult<String> {
    let input = parse_plan(&input_json)?;
    let output = projection::build_projection(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn revenue_series(input_json: String) -> NapiResult<String> {
    let input = parse_plan(&input_json)?;
    let output = projection::build_projection(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output.map(|p| p.revenue_series)).map_err(to_napi_error)
}

#[napi]
pub fn annual_statements(input_json: String) -> NapiResult<String> {
    let input = parse_plan(&input_json)?;
    let output = projection::build_projection(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output.map(|p| p.annual_statements)).map_err(to_napi_error)
}

#[napi]
pub fn monthly_treasury(input_json: String) -> NapiResult<String> {
    let input = parse_plan(&input_json)?;
    let output = projection::build_projection(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output.map(|p| p.monthly_treasury)).map_err(to_napi_error)
}

#[napi]
pub fn financing_plan(input_json: String) -> NapiResult<String> {
    let input = parse_plan(&input_json)?;
    let output = projection::build_projection(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output.map(|p| p.financing_plan)).map_err(to_napi_error)
}

#[napi]
pub fn charges_from_flat_keys(cells_json: String) -> NapiResult<String> {
    let cells = serde_json::from_str(&cells_json).map_err(to_napi_error)?;
    let table = projection::FixedChargeTable::from_flat_keys(&cells).map_err(to_napi_error)?;
    serde_json::to_string(&table).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

#[napi]
pub fn standard_catalog() -> NapiResult<String> {
    serde_json::to_string(&Catalog::standard()).map_err(to_napi_error)
}

#[napi]
pub fn currency_presets() -> NapiResult<String> {
    serde_json::to_string(&Currency::presets()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct FormatRequest {
    value: Decimal,
    currency: String,
    #[serde(default)]
    report: bool,
}

/// `{"value": "1200000", "currency": "XOF", "report": false}` -> `"1 200 000 FCFA"`
#[napi]
pub fn format_amount(request_json: String) -> NapiResult<String> {
    let request: FormatRequest = serde_json::from_str(&request_json).map_err(to_napi_error)?;
    let currency = resolve_currency(&request.currency)?;
    Ok(if request.report {
        format::format_report_value(request.value, &currency)
    } else {
        format::format_amount(request.value, &currency)
    })
}

#[napi]
pub fn advisory_prompt(input_json: String, currency_code: String) -> NapiResult<String> {
    let input = parse_plan(&input_json)?;
    let currency = resolve_currency(&currency_code)?;
    let output = projection::build_projection(&input).map_err(to_napi_error)?;
    let summary = AdvisorySummary::from_projection(&input, &output.result.summary);
    Ok(build_prompt(&summary, &currency))
}
