use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::checked;
use crate::catalog::{Catalog, InvestmentCategory};
use crate::error::ForecastError;
use crate::types::{Days, Money, Percent, Rate};
use crate::ForecastResult;

// ---------------------------------------------------------------------------
// Horizon
// ---------------------------------------------------------------------------

pub const PROJECTION_YEARS: usize = 5;
pub const MONTHS_PER_YEAR: usize = 12;
pub const GROWTH_STEPS: usize = PROJECTION_YEARS - 1;

// ---------------------------------------------------------------------------
// Input snapshot
// ---------------------------------------------------------------------------

/// Complete snapshot of a startup plan as collected by the wizard.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectionInput {
    /// Descriptive project information, used only by reports and advice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProjectProfile>,
    /// Category lists the plan is keyed against (standard list when absent)
    #[serde(default)]
    pub catalog: Catalog,
    /// Simplified tax and social-charge assumptions
    #[serde(default)]
    pub settings: ProjectionSettings,
    /// Startup needs keyed by investment category id
    #[serde(default)]
    pub investments: BTreeMap<String, InvestmentItem>,
    /// Financing sources in entry order
    #[serde(default)]
    pub financing: Vec<FinancingSource>,
    /// Fixed charges per category and year
    #[serde(default)]
    pub charges: FixedChargeTable,
    #[serde(default)]
    pub revenue: RevenueAssumptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectProfile {
    #[serde(default)]
    pub holder_name: String,
    #[serde(default)]
    pub project_title: String,
    #[serde(default)]
    pub legal_status: String,
    #[serde(default)]
    pub activity: ActivityType,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    #[default]
    Services,
    Goods,
    Mixed,
}

impl std::fmt::Display for ActivityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityType::Services => write!(f, "services"),
            ActivityType::Goods => write!(f, "goods"),
            ActivityType::Mixed => write!(f, "mixed"),
        }
    }
}

/// Flat-rate tax and payroll assumptions. Not tax-law accurate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    /// Corporate income tax on positive pre-tax result
    pub corporate_tax_rate: Rate,
    /// Employer charge on director compensation
    pub director_charge_rate: Rate,
    /// Director charge rate during the first year under ACCRE
    pub director_charge_rate_accre: Rate,
    /// Employer charge on employee salaries
    pub employee_charge_rate: Rate,
    /// Commercial year used for credit-term conversions
    pub days_per_year: Days,
    /// Share of first-year loan interest that disappears each year
    pub interest_decay_per_year: Rate,
    /// All loans are repaid in equal annual instalments over this many years
    pub loan_repayment_years: Decimal,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        ProjectionSettings {
            corporate_tax_rate: dec!(0.25),
            director_charge_rate: dec!(0.15),
            director_charge_rate_accre: dec!(0.05),
            employee_charge_rate: dec!(0.30),
            days_per_year: dec!(360),
            interest_decay_per_year: dec!(0.2),
            loan_repayment_years: dec!(5),
        }
    }
}

// ---------------------------------------------------------------------------
// Investments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvestmentItem {
    #[serde(default)]
    pub amount: Money,
    /// Straight-line schedule; absent means the catalog default, zero or
    /// negative means not amortized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amortization_years: Option<i32>,
    #[serde(default)]
    pub details: String,
}

impl InvestmentItem {
    pub fn new(amount: Money) -> Self {
        InvestmentItem {
            amount,
            amortization_years: None,
            details: String::new(),
        }
    }

    pub fn with_amortization(amount: Money, years: i32) -> Self {
        InvestmentItem {
            amount,
            amortization_years: Some(years),
            details: String::new(),
        }
    }

    pub fn effective_amortization_years(&self, category: &InvestmentCategory) -> i32 {
        self.amortization_years
            .unwrap_or(category.default_amortization_years)
    }
}

// ---------------------------------------------------------------------------
// Financing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancingSource {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub amount: Money,
    /// Annual interest in percent; set together with `term_months` for loans
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate_pct: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_months: Option<u32>,
}

/// Interest and duration of a loan-type financing source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanTerms {
    pub interest_rate_pct: Percent,
    pub term_months: u32,
}

impl FinancingSource {
    pub fn equity(id: &str, label: &str, amount: Money) -> Self {
        FinancingSource {
            id: id.to_string(),
            label: label.to_string(),
            amount,
            interest_rate_pct: None,
            term_months: None,
        }
    }

    pub fn loan(id: &str, label: &str, amount: Money, rate_pct: Percent, term_months: u32) -> Self {
        FinancingSource {
            id: id.to_string(),
            label: label.to_string(),
            amount,
            interest_rate_pct: Some(rate_pct),
            term_months: Some(term_months),
        }
    }

    pub fn loan_terms(&self) -> Option<LoanTerms> {
        match (self.interest_rate_pct, self.term_months) {
            (Some(interest_rate_pct), Some(term_months)) => Some(LoanTerms {
                interest_rate_pct,
                term_months,
            }),
            _ => None,
        }
    }

    pub fn is_loan(&self) -> bool {
        self.loan_terms().is_some()
    }
}

// ---------------------------------------------------------------------------
// Fixed charges
// ---------------------------------------------------------------------------

/// Sparse `(charge category, year) -> amount` table. Missing cells read as 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixedChargeTable(BTreeMap<String, Vec<Money>>);

impl FixedChargeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(&self, category_id: &str, year_idx: usize) -> Money {
        self.0
            .get(category_id)
            .and_then(|row| row.get(year_idx))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn set(&mut self, category_id: &str, year_idx: usize, amount: Money) {
        let row = self.0.entry(category_id.to_string()).or_default();
        if row.len() <= year_idx {
            row.resize(year_idx + 1, Decimal::ZERO);
        }
        row[year_idx] = amount;
    }

    /// Same amount for every projected year.
    pub fn set_all_years(&mut self, category_id: &str, amount: Money) {
        self.0
            .insert(category_id.to_string(), vec![amount; PROJECTION_YEARS]);
    }

    pub fn rows(&self) -> impl Iterator<Item = (&String, &Vec<Money>)> {
        self.0.iter()
    }

    /// Parse the wizard's storage format, where each cell is keyed
    /// `"<category>-<year index>"` (e.g. `"loyer-0"`).
    pub fn from_flat_keys(cells: &BTreeMap<String, Money>) -> ForecastResult<Self> {
        let mut table = FixedChargeTable::new();
        for (key, amount) in cells {
            let (category_id, year) = key.rsplit_once('-').ok_or_else(|| {
                ForecastError::InvalidInput {
                    field: format!("charges.{key}"),
                    reason: "Expected '<category>-<year index>'".into(),
                }
            })?;
            let year_idx: usize = year.parse().map_err(|_| ForecastError::InvalidInput {
                field: format!("charges.{key}"),
                reason: format!("Year index '{year}' is not a number"),
            })?;
            if year_idx >= PROJECTION_YEARS {
                return Err(ForecastError::InvalidInput {
                    field: format!("charges.{key}"),
                    reason: format!("Year index must be below {PROJECTION_YEARS}"),
                });
            }
            table.set(category_id, year_idx, *amount);
        }
        Ok(table)
    }
}

// ---------------------------------------------------------------------------
// Revenue
// ---------------------------------------------------------------------------

/// How annual revenue is entered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RevenueModel {
    /// Twelve months of year 1, then one growth rate per following year
    ExplicitGrowth {
        #[serde(default)]
        monthly_year1: Vec<Money>,
        #[serde(default)]
        annual_growth_pct: Vec<Percent>,
    },
    /// Twelve months typed in for each of the five years
    FullManual {
        #[serde(default)]
        monthly_by_year: Vec<Vec<Money>>,
    },
}

impl Default for RevenueModel {
    fn default() -> Self {
        RevenueModel::ExplicitGrowth {
            monthly_year1: Vec::new(),
            annual_growth_pct: Vec::new(),
        }
    }
}

impl RevenueModel {
    /// Monthly revenue backing the first projected year.
    pub fn year1_months(&self) -> [Money; MONTHS_PER_YEAR] {
        let months: &[Money] = match self {
            RevenueModel::ExplicitGrowth { monthly_year1, .. } => monthly_year1.as_slice(),
            RevenueModel::FullManual { monthly_by_year } => {
                monthly_by_year.first().map(Vec::as_slice).unwrap_or(&[])
            }
        };
        let mut out = [Decimal::ZERO; MONTHS_PER_YEAR];
        for (slot, value) in out.iter_mut().zip(months) {
            *slot = *value;
        }
        out
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RevenueAssumptions {
    #[serde(default)]
    pub model: RevenueModel,
    /// Purchases consumed, as percent of revenue
    #[serde(default)]
    pub cost_of_goods_pct: Percent,
    #[serde(default)]
    pub client_credit_days: Days,
    #[serde(default)]
    pub supplier_credit_days: Days,
    #[serde(default)]
    pub employee_salaries: Vec<Money>,
    #[serde(default)]
    pub director_compensation: Vec<Money>,
    /// First-year reduction of the director's employer charges
    #[serde(default)]
    pub accre_exemption: bool,
}

impl RevenueAssumptions {
    pub fn employee_salary(&self, year_idx: usize) -> Money {
        year_value(&self.employee_salaries, year_idx)
    }

    pub fn director_compensation(&self, year_idx: usize) -> Money {
        year_value(&self.director_compensation, year_idx)
    }

    pub fn cost_of_goods(&self, revenue: Money) -> ForecastResult<Money> {
        checked::percent_of(revenue, self.cost_of_goods_pct, "cost of goods")
    }
}

fn year_value(values: &[Money], year_idx: usize) -> Money {
    values.get(year_idx).copied().unwrap_or(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Plan-level totals
// ---------------------------------------------------------------------------

impl ProjectionInput {
    /// Parse a plan document. Malformed JSON is a `SerializationError`.
    pub fn from_json(json: &str) -> ForecastResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn total_investment(&self) -> ForecastResult<Money> {
        checked::sum(self.investments.values().map(|i| i.amount), "total investment")
    }

    pub fn total_financing(&self) -> ForecastResult<Money> {
        checked::sum(self.financing.iter().map(|f| f.amount), "total financing")
    }

    /// Opening cash once every need is paid for: financing - investment.
    pub fn initial_treasury(&self) -> ForecastResult<Money> {
        checked::sub(
            self.total_financing()?,
            self.total_investment()?,
            "initial treasury",
        )
    }

    pub fn total_loans(&self) -> ForecastResult<Money> {
        checked::sum(
            self.financing
                .iter()
                .filter(|f| f.is_loan())
                .map(|f| f.amount),
            "total loans",
        )
    }

    /// First-year interest across all loans, before decay.
    pub fn annual_interest(&self) -> ForecastResult<Money> {
        let mut total = Decimal::ZERO;
        for source in &self.financing {
            if let Some(terms) = source.loan_terms() {
                let interest =
                    checked::percent_of(source.amount, terms.interest_rate_pct, "loan interest")?;
                total = checked::add(total, interest, "loan interest")?;
            }
        }
        Ok(total)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Structural checks only. Numeric domain (negative amounts, rates over 100)
/// is the collection layer's concern and flows through untouched.
pub fn validate_input(input: &ProjectionInput) -> ForecastResult<()> {
    for id in input.investments.keys() {
        input.catalog.require_investment(id)?;
    }

    for (id, row) in input.charges.rows() {
        input.catalog.require_charge(id)?;
        check_len(&format!("charges.{id}"), row.len(), PROJECTION_YEARS)?;
    }

    for (i, source) in input.financing.iter().enumerate() {
        if source.interest_rate_pct.is_some() != source.term_months.is_some() {
            return Err(ForecastError::InvalidInput {
                field: format!("financing[{i}]"),
                reason: "interest_rate_pct and term_months must be set together".into(),
            });
        }
    }

    let revenue = &input.revenue;
    match &revenue.model {
        RevenueModel::ExplicitGrowth {
            monthly_year1,
            annual_growth_pct,
        } => {
            check_len("revenue.monthly_year1", monthly_year1.len(), MONTHS_PER_YEAR)?;
            check_len(
                "revenue.annual_growth_pct",
                annual_growth_pct.len(),
                GROWTH_STEPS,
            )?;
        }
        RevenueModel::FullManual { monthly_by_year } => {
            check_len(
                "revenue.monthly_by_year",
                monthly_by_year.len(),
                PROJECTION_YEARS,
            )?;
            for (y, row) in monthly_by_year.iter().enumerate() {
                check_len(
                    &format!("revenue.monthly_by_year[{y}]"),
                    row.len(),
                    MONTHS_PER_YEAR,
                )?;
            }
        }
    }
    check_len(
        "revenue.employee_salaries",
        revenue.employee_salaries.len(),
        PROJECTION_YEARS,
    )?;
    check_len(
        "revenue.director_compensation",
        revenue.director_compensation.len(),
        PROJECTION_YEARS,
    )?;

    Ok(())
}

fn check_len(field: &str, len: usize, max: usize) -> ForecastResult<()> {
    if len > max {
        return Err(ForecastError::HorizonExceeded {
            field: field.to_string(),
            len,
            max,
        });
    }
    Ok(())
}
