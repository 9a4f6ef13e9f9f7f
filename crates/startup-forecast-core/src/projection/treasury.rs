use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::annual::AnnualStatement;
use super::checked;
use super::input::{ProjectionInput, MONTHS_PER_YEAR};
use crate::types::Money;
use crate::ForecastResult;

const MONTHS: Decimal = dec!(12);

/// Cash budget line for one month of the first year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTreasury {
    /// 1-based month
    pub month: u32,
    pub revenue: Money,
    pub financing_inflow: Money,
    pub total_encashments: Money,
    pub investment_outflow: Money,
    pub purchases: Money,
    pub fixed_charges: Money,
    pub payroll: Money,
    pub total_disbursements: Money,
    pub net_flow: Money,
    pub cumulative_balance: Money,
}

/// Column totals of the first-year cash budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasuryTotals {
    pub revenue: Money,
    pub total_encashments: Money,
    pub purchases: Money,
    pub fixed_charges: Money,
    pub payroll: Money,
    pub total_disbursements: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreasuryBudget {
    pub months: Vec<MonthlyTreasury>,
    pub totals: TreasuryTotals,
}

/// First-year monthly cash budget.
///
/// The running balance opens at zero: financing arrives and investments are
/// paid as month-1 flows, so they are not also counted in an opening
/// balance. Fixed charges and payroll are spread evenly; purchases follow
/// each month's revenue. Loan principal, VAT and working-capital timing are
/// not modelled at this granularity.
#[instrument(skip_all)]
pub fn project_monthly_treasury(
    input: &ProjectionInput,
    first_year: &AnnualStatement,
) -> ForecastResult<TreasuryBudget> {
    let monthly_revenue = input.revenue.model.year1_months();
    let total_financing = input.total_financing()?;
    let total_investment = input.total_investment()?;

    let fixed_charges = checked::div(first_year.fixed_costs, MONTHS, "monthly fixed charges")?;
    let payroll = checked::div(first_year.payroll_burden, MONTHS, "monthly payroll")?;

    let mut cumulative_balance = Decimal::ZERO;
    let mut months = Vec::with_capacity(MONTHS_PER_YEAR);

    for (m, &revenue) in monthly_revenue.iter().enumerate() {
        let opening_month = m == 0;

        let financing_inflow = if opening_month {
            total_financing
        } else {
            Decimal::ZERO
        };
        let total_encashments = checked::add(revenue, financing_inflow, "monthly encashments")?;

        let investment_outflow = if opening_month {
            total_investment
        } else {
            Decimal::ZERO
        };
        let purchases = input.revenue.cost_of_goods(revenue)?;
        let total_disbursements = checked::sum(
            [investment_outflow, fixed_charges, payroll, purchases],
            "monthly disbursements",
        )?;

        let net_flow = checked::sub(total_encashments, total_disbursements, "monthly net flow")?;
        cumulative_balance = checked::add(cumulative_balance, net_flow, "cumulative balance")?;

        months.push(MonthlyTreasury {
            month: m as u32 + 1,
            revenue,
            financing_inflow,
            total_encashments,
            investment_outflow,
            purchases,
            fixed_charges,
            payroll,
            total_disbursements,
            net_flow,
            cumulative_balance,
        });
    }

    let column = |f: fn(&MonthlyTreasury) -> Money, figure: &str| {
        checked::sum(months.iter().map(f), figure)
    };
    let totals = TreasuryTotals {
        revenue: column(|m| m.revenue, "treasury revenue total")?,
        total_encashments: column(|m| m.total_encashments, "treasury encashments total")?,
        purchases: column(|m| m.purchases, "treasury purchases total")?,
        fixed_charges: column(|m| m.fixed_charges, "treasury fixed charges total")?,
        payroll: column(|m| m.payroll, "treasury payroll total")?,
        total_disbursements: column(|m| m.total_disbursements, "treasury disbursements total")?,
        closing_balance: cumulative_balance,
    };

    Ok(TreasuryBudget { months, totals })
}
