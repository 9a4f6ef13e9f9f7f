use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::annual::AnnualStatement;
use super::checked;
use super::input::ProjectionInput;
use crate::types::Money;
use crate::ForecastResult;

/// One column of the five-year financing plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingPlanYear {
    pub year: u32,
    // Needs
    pub investment: Money,
    pub working_capital_change: Money,
    pub loan_repayment: Money,
    pub total_needs: Money,
    // Resources
    pub initial_financing: Money,
    pub caf: Money,
    pub total_resources: Money,
    /// Resources less needs for the year
    pub surplus: Money,
    /// CAF left after repaying loans
    pub net_self_financing: Money,
}

/// Needs vs. resources per year. Investment and initial financing land in
/// year 1; working capital enters as its change over the prior year.
pub fn build_financing_plan(
    input: &ProjectionInput,
    statements: &[AnnualStatement],
) -> ForecastResult<Vec<FinancingPlanYear>> {
    let total_investment = input.total_investment()?;
    let total_financing = input.total_financing()?;

    let mut previous_bfr = Decimal::ZERO;
    let mut plan = Vec::with_capacity(statements.len());

    for s in statements {
        let first_year = s.year == 1;
        let investment = if first_year {
            total_investment
        } else {
            Decimal::ZERO
        };
        let initial_financing = if first_year {
            total_financing
        } else {
            Decimal::ZERO
        };

        let working_capital_change = checked::sub(
            s.working_capital_requirement,
            previous_bfr,
            "working capital change",
        )?;
        previous_bfr = s.working_capital_requirement;

        let total_needs = checked::sum(
            [investment, working_capital_change, s.loan_repayment],
            "total needs",
        )?;
        let total_resources = checked::add(initial_financing, s.caf, "total resources")?;

        plan.push(FinancingPlanYear {
            year: s.year,
            investment,
            working_capital_change,
            loan_repayment: s.loan_repayment,
            total_needs,
            initial_financing,
            caf: s.caf,
            total_resources,
            surplus: checked::sub(total_resources, total_needs, "financing surplus")?,
            net_self_financing: checked::sub(s.caf, s.loan_repayment, "net self-financing")?,
        });
    }

    Ok(plan)
}
