use clap::Args;
use serde_json::Value;

use startup_forecast_core::projection::{self, ProjectionInput, ProjectionOutput};
use startup_forecast_core::ComputationOutput;

use crate::input;

/// Arguments for the full five-year projection
#[derive(Args)]
pub struct ProjectionArgs {
    /// Path to JSON or YAML plan document
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for a single projection stage
#[derive(Args)]
pub struct StageArgs {
    /// Path to JSON or YAML plan document
    #[arg(long)]
    pub input: Option<String>,
}

pub(crate) fn project(
    path: Option<&str>,
    what: &str,
) -> Result<ComputationOutput<ProjectionOutput>, Box<dyn std::error::Error>> {
    let plan: ProjectionInput = input::load(path, what)?;
    Ok(projection::build_projection(&plan)?)
}

pub fn run_project(args: ProjectionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let output = project(args.input.as_deref(), "projection")?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_revenue(args: StageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let output = project(args.input.as_deref(), "revenue series")?;
    Ok(serde_json::to_value(output.map(|p| p.revenue_series))?)
}

pub fn run_statements(args: StageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let output = project(args.input.as_deref(), "annual statements")?;
    Ok(serde_json::to_value(output.map(|p| p.annual_statements))?)
}

pub fn run_treasury(args: StageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let output = project(args.input.as_deref(), "monthly treasury")?;
    Ok(serde_json::to_value(output.map(|p| p.monthly_treasury))?)
}

pub fn run_financing_plan(args: StageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let output = project(args.input.as_deref(), "financing plan")?;
    Ok(serde_json::to_value(output.map(|p| p.financing_plan))?)
}
