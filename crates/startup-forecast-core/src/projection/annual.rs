use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::checked;
use super::input::{ProjectionInput, PROJECTION_YEARS};
use crate::types::{CategoryAmount, Money, Rate};
use crate::ForecastResult;

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Income statement, self-financing and working-capital figures for one year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualStatement {
    /// 1-based projection year
    pub year: u32,
    pub revenue: Money,
    pub cost_of_goods: Money,
    pub gross_margin: Money,
    pub fixed_costs: Money,
    pub fixed_costs_detail: Vec<CategoryAmount>,
    pub amortization: Money,
    pub amortization_detail: Vec<CategoryAmount>,
    /// Gross margin less external fixed charges
    pub value_added: Money,
    pub employee_salaries: Money,
    pub director_compensation: Money,
    pub director_social_charges: Money,
    pub employee_social_charges: Money,
    /// Salaries, compensation and both employer charges
    pub payroll_burden: Money,
    /// Excédent brut d'exploitation
    pub ebe: Money,
    pub operating_result: Money,
    pub financial_charges: Money,
    pub pre_tax_result: Money,
    pub tax: Money,
    pub net_result: Money,
    /// Capacité d'autofinancement: net result + amortization
    pub caf: Money,
    pub cumulative_caf: Money,
    pub loan_repayment: Money,
    pub client_credit: Money,
    pub supplier_debt: Money,
    /// Besoin en fonds de roulement; negative when suppliers finance the cycle
    pub working_capital_requirement: Money,
    pub margin_rate: Rate,
    /// External fixed charges plus payroll burden
    pub total_fixed_costs: Money,
    pub break_even_revenue: Money,
    /// Day of the (360-day) year on which break-even revenue is reached
    pub break_even_days: Decimal,
    pub end_of_year_treasury: Money,
}

/// Payroll figures for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payroll {
    pub employee_salaries: Money,
    pub director_compensation: Money,
    pub director_social_charges: Money,
    pub employee_social_charges: Money,
}

impl Payroll {
    pub fn for_year(input: &ProjectionInput, year_idx: usize) -> ForecastResult<Self> {
        let settings = &input.settings;
        let revenue = &input.revenue;

        let director_rate = if revenue.accre_exemption && year_idx == 0 {
            settings.director_charge_rate_accre
        } else {
            settings.director_charge_rate
        };
        let employee_salaries = revenue.employee_salary(year_idx);
        let director_compensation = revenue.director_compensation(year_idx);

        Ok(Payroll {
            employee_salaries,
            director_compensation,
            director_social_charges: checked::mul(
                director_compensation,
                director_rate,
                "director social charges",
            )?,
            employee_social_charges: checked::mul(
                employee_salaries,
                settings.employee_charge_rate,
                "employee social charges",
            )?,
        })
    }

    pub fn total(&self) -> ForecastResult<Money> {
        checked::sum(
            [
                self.employee_salaries,
                self.director_compensation,
                self.director_social_charges,
                self.employee_social_charges,
            ],
            "payroll burden",
        )
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the five annual statements from the input and its revenue series.
///
/// Years are processed in order because the treasury line depends on the
/// CAF accumulated over all prior years.
#[instrument(skip_all)]
pub fn compute_annual_statements(
    input: &ProjectionInput,
    revenue: &[Money; PROJECTION_YEARS],
) -> ForecastResult<Vec<AnnualStatement>> {
    let settings = &input.settings;
    let initial_treasury = input.initial_treasury()?;
    let annual_interest = input.annual_interest()?;
    let loan_repayment = checked::div(
        input.total_loans()?,
        settings.loan_repayment_years,
        "loan repayment",
    )?;

    let mut cumulative_caf = Decimal::ZERO;
    let mut statements = Vec::with_capacity(PROJECTION_YEARS);

    for (idx, &revenue) in revenue.iter().enumerate() {
        // -------------------------------------------------------------------
        // Margin
        // -------------------------------------------------------------------
        let cost_of_goods = input.revenue.cost_of_goods(revenue)?;
        let gross_margin = checked::sub(revenue, cost_of_goods, "gross margin")?;

        // -------------------------------------------------------------------
        // Fixed charges and depreciation
        // -------------------------------------------------------------------
        let fixed_costs_detail = fixed_costs_for_year(input, idx);
        let fixed_costs = checked::sum(fixed_costs_detail.iter().map(|c| c.amount), "fixed costs")?;

        let amortization_detail = amortization_for_year(input, idx)?;
        let amortization =
            checked::sum(amortization_detail.iter().map(|c| c.amount), "amortization")?;

        let value_added = checked::sub(gross_margin, fixed_costs, "value added")?;

        // -------------------------------------------------------------------
        // Payroll and operating result
        // -------------------------------------------------------------------
        let payroll = Payroll::for_year(input, idx)?;
        let payroll_burden = payroll.total()?;

        let ebe = checked::sub(value_added, payroll_burden, "EBE")?;
        let operating_result = checked::sub(ebe, amortization, "operating result")?;

        // -------------------------------------------------------------------
        // Financing and tax
        // -------------------------------------------------------------------
        let elapsed = checked::mul(
            Decimal::from(idx as u64),
            settings.interest_decay_per_year,
            "interest decay",
        )?;
        let decay = checked::sub(Decimal::ONE, elapsed, "interest decay")?;
        let financial_charges =
            checked::mul(annual_interest, decay, "financial charges")?.max(Decimal::ZERO);

        let pre_tax_result = checked::sub(operating_result, financial_charges, "pre-tax result")?;
        let tax = if pre_tax_result > Decimal::ZERO {
            checked::mul(pre_tax_result, settings.corporate_tax_rate, "corporate tax")?
        } else {
            Decimal::ZERO
        };
        let net_result = checked::sub(pre_tax_result, tax, "net result")?;
        let caf = checked::add(net_result, amortization, "CAF")?;

        // -------------------------------------------------------------------
        // Working capital
        // -------------------------------------------------------------------
        let client_credit = days_of(
            revenue,
            input.revenue.client_credit_days,
            settings.days_per_year,
            "client credit",
        )?;
        let supplier_debt = days_of(
            cost_of_goods,
            input.revenue.supplier_credit_days,
            settings.days_per_year,
            "supplier debt",
        )?;
        let working_capital_requirement =
            checked::sub(client_credit, supplier_debt, "working capital requirement")?;

        // -------------------------------------------------------------------
        // Break-even
        // -------------------------------------------------------------------
        let margin_rate = checked::div(gross_margin, revenue, "margin rate")?;
        let total_fixed_costs = checked::add(fixed_costs, payroll_burden, "total fixed costs")?;
        let break_even_revenue =
            checked::div(total_fixed_costs, margin_rate, "break-even revenue")?;
        let break_even_days = checked::mul(
            checked::div(break_even_revenue, revenue, "break-even days")?,
            settings.days_per_year,
            "break-even days",
        )?;

        // -------------------------------------------------------------------
        // Treasury
        // -------------------------------------------------------------------
        cumulative_caf = checked::add(cumulative_caf, caf, "cumulative CAF")?;
        let repaid_to_date = checked::mul(
            loan_repayment,
            Decimal::from(idx as u64 + 1),
            "loan repayment",
        )?;
        let end_of_year_treasury = checked::sum(
            [
                initial_treasury,
                cumulative_caf,
                -working_capital_requirement,
                -repaid_to_date,
            ],
            "end-of-year treasury",
        )?;

        let year = idx as u32 + 1;
        debug!(
            year,
            %revenue,
            %ebe,
            %net_result,
            %caf,
            %end_of_year_treasury,
            "annual statement computed"
        );

        statements.push(AnnualStatement {
            year,
            revenue,
            cost_of_goods,
            gross_margin,
            fixed_costs,
            fixed_costs_detail,
            amortization,
            amortization_detail,
            value_added,
            employee_salaries: payroll.employee_salaries,
            director_compensation: payroll.director_compensation,
            director_social_charges: payroll.director_social_charges,
            employee_social_charges: payroll.employee_social_charges,
            payroll_burden,
            ebe,
            operating_result,
            financial_charges,
            pre_tax_result,
            tax,
            net_result,
            caf,
            cumulative_caf,
            loan_repayment,
            client_credit,
            supplier_debt,
            working_capital_requirement,
            margin_rate,
            total_fixed_costs,
            break_even_revenue,
            break_even_days,
            end_of_year_treasury,
        });
    }

    Ok(statements)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `amount * days / per`, zero when `per` is zero.
fn days_of(amount: Money, days: Decimal, per: Decimal, figure: &str) -> ForecastResult<Money> {
    checked::div(checked::mul(amount, days, figure)?, per, figure)
}

/// Fixed charges of one year, one entry per catalog charge category.
fn fixed_costs_for_year(input: &ProjectionInput, year_idx: usize) -> Vec<CategoryAmount> {
    input
        .catalog
        .charges
        .iter()
        .map(|c| CategoryAmount {
            id: c.id.clone(),
            label: c.label.clone(),
            amount: input.charges.amount(&c.id, year_idx),
        })
        .collect()
}

/// Straight-line depreciation of one year, one entry per catalog investment
/// category. An item stops contributing once `year_idx` reaches its schedule.
fn amortization_for_year(
    input: &ProjectionInput,
    year_idx: usize,
) -> ForecastResult<Vec<CategoryAmount>> {
    input
        .catalog
        .investments
        .iter()
        .map(|category| {
            let amount = match input.investments.get(&category.id) {
                Some(item) => {
                    let years = item.effective_amortization_years(category);
                    if years > 0 && (year_idx as i64) < i64::from(years) {
                        checked::div(item.amount, Decimal::from(years), "amortization")?
                    } else {
                        Decimal::ZERO
                    }
                }
                None => Decimal::ZERO,
            };
            Ok(CategoryAmount {
                id: category.id.clone(),
                label: category.label.clone(),
                amount,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
