//! Five-year startup projection: revenue series, annual statements, first
//! year cash budget and financing plan, all computed from one input snapshot.

pub mod annual;
mod checked;
#[cfg(feature = "financing_plan")]
pub mod financing_plan;
pub mod input;
pub mod revenue;
pub mod summary;
#[cfg(feature = "treasury")]
pub mod treasury;

use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, instrument};

use crate::types::{with_metadata, ComputationOutput, Money};
use crate::ForecastResult;

pub use annual::{AnnualStatement, Payroll};
#[cfg(feature = "financing_plan")]
pub use financing_plan::FinancingPlanYear;
pub use input::{
    validate_input, ActivityType, FinancingSource, FixedChargeTable, InvestmentItem,
    ProjectProfile, ProjectionInput, ProjectionSettings, RevenueAssumptions, RevenueModel,
    MONTHS_PER_YEAR, PROJECTION_YEARS,
};
pub use summary::PlanSummary;
#[cfg(feature = "treasury")]
pub use treasury::{MonthlyTreasury, TreasuryBudget};

/// Everything the report renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionOutput {
    pub summary: PlanSummary,
    pub revenue_series: [Money; PROJECTION_YEARS],
    pub annual_statements: Vec<AnnualStatement>,
    #[cfg(feature = "treasury")]
    pub monthly_treasury: TreasuryBudget,
    #[cfg(feature = "financing_plan")]
    pub financing_plan: Vec<FinancingPlanYear>,
}

/// Run the full projection on a plan snapshot.
///
/// Only structural problems (unknown categories, rows longer than the
/// horizon, half-specified loans) and figures leaving the `Decimal` range
/// are errors. Numeric inputs are otherwise taken as given; zero
/// denominators yield zero.
#[instrument(skip_all, fields(
    investments = input.investments.len(),
    financing = input.financing.len(),
))]
pub fn build_projection(
    input: &ProjectionInput,
) -> ForecastResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();

    validate_input(input)?;

    let revenue_series = revenue::build_revenue_series(&input.revenue.model)?;
    let annual_statements = annual::compute_annual_statements(input, &revenue_series)?;

    #[cfg(feature = "treasury")]
    let monthly_treasury = treasury::project_monthly_treasury(input, &annual_statements[0])?;

    #[cfg(feature = "financing_plan")]
    let financing_plan = financing_plan::build_financing_plan(input, &annual_statements)?;

    let summary = summary::summarize(input, &annual_statements)?;
    #[allow(unused_mut)]
    let mut warnings = summary::plan_warnings(&summary, &annual_statements);

    #[cfg(feature = "treasury")]
    {
        let first_negative = monthly_treasury
            .months
            .iter()
            .find(|m| m.cumulative_balance < rust_decimal::Decimal::ZERO);
        if let Some(m) = first_negative {
            warnings.push(format!(
                "Month {}: cumulative cash balance turns negative ({})",
                m.month,
                m.cumulative_balance.round_dp(0)
            ));
        }
    }

    info!(warnings = warnings.len(), "projection built");

    let output = ProjectionOutput {
        summary,
        revenue_series,
        annual_statements,
        #[cfg(feature = "treasury")]
        monthly_treasury,
        #[cfg(feature = "financing_plan")]
        financing_plan,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        concat!(
            "Five-year startup projection (straight-line amortization, ",
            "flat-rate tax and charges, 360-day credit terms)",
        ),
        &serde_json::json!({
            "currency_agnostic": true,
            "tax_rate": input.settings.corporate_tax_rate.to_string(),
            "director_charge_rate": input.settings.director_charge_rate.to_string(),
            "director_charge_rate_accre": input.settings.director_charge_rate_accre.to_string(),
            "employee_charge_rate": input.settings.employee_charge_rate.to_string(),
            "days_per_year": input.settings.days_per_year.to_string(),
            "interest_decay_per_year": input.settings.interest_decay_per_year.to_string(),
            "loan_repayment_years": input.settings.loan_repayment_years.to_string(),
            "monthly_opening_balance": "zero",
        }),
        warnings,
        elapsed,
        output,
    ))
}
