use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::annual::AnnualStatement;
use super::input::ProjectionInput;
use crate::types::Money;
use crate::ForecastResult;

/// Plan-level totals shown above the detailed statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_investment: Money,
    pub total_financing: Money,
    pub total_loans: Money,
    /// Financing less investment; negative means the needs are not covered
    pub initial_treasury: Money,
    pub first_year_revenue: Money,
    pub first_year_fixed_costs: Money,
    pub first_year_net_result: Money,
    pub final_year_treasury: Money,
    /// First year whose net result is positive, if any
    pub first_profitable_year: Option<u32>,
}

pub fn summarize(
    input: &ProjectionInput,
    statements: &[AnnualStatement],
) -> ForecastResult<PlanSummary> {
    let first = statements.first();
    let pick = |f: fn(&AnnualStatement) -> Money| first.map(f).unwrap_or(Decimal::ZERO);

    Ok(PlanSummary {
        total_investment: input.total_investment()?,
        total_financing: input.total_financing()?,
        total_loans: input.total_loans()?,
        initial_treasury: input.initial_treasury()?,
        first_year_revenue: pick(|s| s.revenue),
        first_year_fixed_costs: pick(|s| s.fixed_costs),
        first_year_net_result: pick(|s| s.net_result),
        final_year_treasury: statements
            .last()
            .map(|s| s.end_of_year_treasury)
            .unwrap_or(Decimal::ZERO),
        first_profitable_year: statements
            .iter()
            .find(|s| s.net_result > Decimal::ZERO)
            .map(|s| s.year),
    })
}

/// Human-readable observations about the plan. Never alters a figure.
pub fn plan_warnings(summary: &PlanSummary, statements: &[AnnualStatement]) -> Vec<String> {
    let mut warnings = Vec::new();

    if summary.initial_treasury < Decimal::ZERO {
        warnings.push(format!(
            "Financing ({}) does not cover startup needs ({}): shortfall of {}",
            summary.total_financing,
            summary.total_investment,
            -summary.initial_treasury
        ));
    }

    for s in statements {
        let year = s.year;
        if s.revenue < Decimal::ZERO {
            warnings.push(format!("Year {year}: negative revenue ({})", s.revenue));
        }
        if s.net_result < Decimal::ZERO {
            warnings.push(format!("Year {year}: net loss ({})", s.net_result));
        }
        if s.revenue > Decimal::ZERO
            && s.break_even_revenue > Decimal::ZERO
            && s.revenue < s.break_even_revenue
        {
            warnings.push(format!(
                "Year {year}: revenue {} is below break-even {}",
                s.revenue,
                s.break_even_revenue.round_dp(0)
            ));
        }
        if s.end_of_year_treasury < Decimal::ZERO {
            warnings.push(format!(
                "Year {year}: negative end-of-year treasury ({})",
                s.end_of_year_treasury.round_dp(0)
            ));
        }
    }

    warnings
}
