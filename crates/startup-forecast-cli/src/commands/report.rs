use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use startup_forecast_core::advisory::{build_prompt, AdvisorySummary};
use startup_forecast_core::catalog::InvestmentGroup;
use startup_forecast_core::format::{format_amount, format_percent, format_report_value};
use startup_forecast_core::projection::{self, ProjectionInput, ProjectionOutput};
use startup_forecast_core::{Currency, ForecastError, ForecastResult};

use crate::input;

/// Arguments for the formatted report
#[derive(Args)]
pub struct ReportArgs {
    /// Path to JSON or YAML plan document
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the advisory prompt
#[derive(Args)]
pub struct PromptArgs {
    /// Path to JSON or YAML plan document
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_report(
    args: ReportArgs,
    currency: &Currency,
) -> Result<Value, Box<dyn std::error::Error>> {
    let plan: ProjectionInput = input::load(args.input.as_deref(), "report")?;
    let output = projection::build_projection(&plan)?;
    let sections = render_report(&plan, &output.result, currency)?;
    let report = output.map(|_| sections);
    Ok(serde_json::to_value(report)?)
}

pub fn run_prompt(
    args: PromptArgs,
    currency: &Currency,
) -> Result<Value, Box<dyn std::error::Error>> {
    let plan: ProjectionInput = input::load(args.input.as_deref(), "advisory prompt")?;
    let output = projection::build_projection(&plan)?;
    let summary = AdvisorySummary::from_projection(&plan, &output.result.summary);
    Ok(json!({ "result": { "prompt": build_prompt(&summary, currency) } }))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Report groups in page order, with their heading.
const GROUPS: [(InvestmentGroup, &str); 5] = [
    (InvestmentGroup::Intangible, "Intangible assets"),
    (InvestmentGroup::Tangible, "Tangible assets"),
    (InvestmentGroup::Deposit, "Deposits"),
    (InvestmentGroup::Stock, "Stock"),
    (InvestmentGroup::Cash, "Starting treasury"),
];

/// Every figure of the projection as display strings, one table per section.
///
/// Section keys carry a two-digit prefix so the sorted map keeps page order.
fn render_report(
    plan: &ProjectionInput,
    p: &ProjectionOutput,
    currency: &Currency,
) -> ForecastResult<Value> {
    let st = &p.annual_statements;
    let money = |label: &str, f: &dyn Fn(usize) -> Decimal| {
        year_row(label, (0..st.len()).map(|i| format_report_value(f(i), currency)))
    };

    let summary = vec![
        line("Total investment", format_amount(p.summary.total_investment, currency)),
        line("Total financing", format_amount(p.summary.total_financing, currency)),
        line("Of which loans", format_amount(p.summary.total_loans, currency)),
        line("Initial treasury", format_amount(p.summary.initial_treasury, currency)),
        line(
            "First profitable year",
            p.summary
                .first_profitable_year
                .map(|y| format!("Year {y}"))
                .unwrap_or_else(|| "-".to_string()),
        ),
    ];

    let salaries = vec![
        year_row(
            "ACCRE rate applied",
            (0..st.len()).map(|i| {
                let applied = plan.revenue.accre_exemption && i == 0;
                String::from(if applied { "Yes" } else { "No" })
            }),
        ),
        money("Director compensation", &|i| st[i].director_compensation),
        money("Director social charges", &|i| st[i].director_social_charges),
        money("Employee salaries", &|i| st[i].employee_salaries),
        money("Employee social charges", &|i| st[i].employee_social_charges),
        money("Total payroll", &|i| st[i].payroll_burden),
    ];

    let income_statement = vec![
        money("Revenue", &|i| st[i].revenue),
        money("Cost of goods sold", &|i| st[i].cost_of_goods),
        money("Gross margin", &|i| st[i].gross_margin),
        money("External charges", &|i| st[i].fixed_costs),
        money("Value added", &|i| st[i].value_added),
        money("Employee salaries", &|i| st[i].employee_salaries),
        money("Employee social charges", &|i| st[i].employee_social_charges),
        money("Director compensation", &|i| st[i].director_compensation),
        money("Director social charges", &|i| st[i].director_social_charges),
        money("EBE", &|i| st[i].ebe),
        money("Amortization", &|i| st[i].amortization),
        money("Operating result", &|i| st[i].operating_result),
        money("Financial charges", &|i| st[i].financial_charges),
        money("Pre-tax result", &|i| st[i].pre_tax_result),
        money("Corporate tax", &|i| st[i].tax),
        money("Net result", &|i| st[i].net_result),
    ];

    let self_financing = vec![
        money("Net result", &|i| st[i].net_result),
        money("Amortization", &|i| st[i].amortization),
        money("CAF", &|i| st[i].caf),
        money("Loan repayment", &|i| st[i].loan_repayment),
        money("Net self-financing", &|i| p.financing_plan[i].net_self_financing),
    ];

    let working_capital = vec![
        money("Client receivables", &|i| st[i].client_credit),
        money("Supplier debt", &|i| st[i].supplier_debt),
        money("Working capital requirement", &|i| st[i].working_capital_requirement),
    ];

    let day_count = days(currency);
    let break_even = vec![
        year_row(
            "Margin rate",
            st.iter().map(|s| format_percent(s.margin_rate)),
        ),
        money("Fixed costs", &|i| st[i].total_fixed_costs),
        money("Break-even revenue", &|i| st[i].break_even_revenue),
        year_row(
            "Break-even (days)",
            st.iter().map(|s| format_report_value(s.break_even_days, &day_count)),
        ),
        money("End-of-year treasury", &|i| st[i].end_of_year_treasury),
    ];

    let mut sections = Map::new();
    sections.insert("01_summary".into(), Value::Array(summary));
    sections.insert(
        "02_investments_and_financing".into(),
        Value::Array(investments_and_financing(plan, p, currency)?),
    );
    sections.insert("03_salaries".into(), Value::Array(salaries));
    sections.insert(
        "04_amortization_detail".into(),
        Value::Array(amortization_detail(plan, p, currency)?),
    );
    sections.insert("05_income_statement".into(), Value::Array(income_statement));
    sections.insert("06_self_financing".into(), Value::Array(self_financing));
    sections.insert("07_working_capital".into(), Value::Array(working_capital));
    sections.insert("08_break_even".into(), Value::Array(break_even));

    let fp = &p.financing_plan;
    let plan_row = |label: &str, f: &dyn Fn(usize) -> Decimal| {
        year_row(label, (0..fp.len()).map(|i| format_report_value(f(i), currency)))
    };
    sections.insert(
        "09_financing_plan".into(),
        Value::Array(vec![
            plan_row("Investment", &|i| fp[i].investment),
            plan_row("Working capital change", &|i| fp[i].working_capital_change),
            plan_row("Loan repayment", &|i| fp[i].loan_repayment),
            plan_row("Total needs", &|i| fp[i].total_needs),
            plan_row("Initial financing", &|i| fp[i].initial_financing),
            plan_row("CAF", &|i| fp[i].caf),
            plan_row("Total resources", &|i| fp[i].total_resources),
            plan_row("Surplus", &|i| fp[i].surplus),
        ]),
    );

    let mt = &p.monthly_treasury;
    let month = |label: &str, f: &dyn Fn(usize) -> Decimal, total: Option<Decimal>| {
        let mut row = Map::new();
        row.insert("line".into(), Value::String(label.to_string()));
        for i in 0..mt.months.len() {
            row.insert(
                format!("month_{:02}", i + 1),
                Value::String(format_report_value(f(i), currency)),
            );
        }
        row.insert(
            "total".into(),
            Value::String(
                total
                    .map(|t| format_report_value(t, currency))
                    .unwrap_or_default(),
            ),
        );
        Value::Object(row)
    };
    let m = &mt.months;
    let t = &mt.totals;
    sections.insert(
        "10_monthly_treasury".into(),
        Value::Array(vec![
            month("Revenue", &|i| m[i].revenue, Some(t.revenue)),
            month("Financing", &|i| m[i].financing_inflow, None),
            month(
                "Total encashments",
                &|i| m[i].total_encashments,
                Some(t.total_encashments),
            ),
            month("Investment", &|i| m[i].investment_outflow, None),
            month("Purchases", &|i| m[i].purchases, Some(t.purchases)),
            month("Fixed charges", &|i| m[i].fixed_charges, Some(t.fixed_charges)),
            month("Payroll", &|i| m[i].payroll, Some(t.payroll)),
            month(
                "Total disbursements",
                &|i| m[i].total_disbursements,
                Some(t.total_disbursements),
            ),
            month("Net flow", &|i| m[i].net_flow, None),
            month(
                "Cumulative balance",
                &|i| m[i].cumulative_balance,
                Some(t.closing_balance),
            ),
        ]),
    );

    sections.insert(
        "currency".into(),
        Value::String(format!("{} ({})", currency.name, currency.symbol)),
    );

    Ok(Value::Object(sections))
}

/// Startup needs by balance-sheet group, then one line per financing source.
fn investments_and_financing(
    plan: &ProjectionInput,
    p: &ProjectionOutput,
    currency: &Currency,
) -> ForecastResult<Vec<Value>> {
    let amount_of = |id: &str| {
        plan.investments
            .get(id)
            .map(|item| item.amount)
            .unwrap_or_default()
    };

    let mut rows = Vec::new();
    for (group, heading) in GROUPS {
        let categories: Vec<_> = plan
            .catalog
            .investments
            .iter()
            .filter(|c| c.group == group)
            .collect();
        if categories.is_empty() {
            continue;
        }
        let subtotal = total(categories.iter().map(|c| amount_of(&c.id)), heading)?;
        rows.push(line(heading, format_report_value(subtotal, currency)));
        for category in categories {
            rows.push(line(
                &format!("  {}", category.label),
                format_report_value(amount_of(&category.id), currency),
            ));
        }
    }
    rows.push(line(
        "Total needs",
        format_amount(p.summary.total_investment, currency),
    ));

    for source in &plan.financing {
        let label = match source.loan_terms() {
            Some(terms) => format!(
                "  {} (rate {}%, {} months)",
                source.label,
                terms.interest_rate_pct.normalize(),
                terms.term_months
            ),
            None => format!("  {}", source.label),
        };
        rows.push(line(&label, format_report_value(source.amount, currency)));
    }
    rows.push(line(
        "Total resources",
        format_amount(p.summary.total_financing, currency),
    ));
    Ok(rows)
}

/// Yearly allowance per amortizable item, subtotalled by group.
fn amortization_detail(
    plan: &ProjectionInput,
    p: &ProjectionOutput,
    currency: &Currency,
) -> ForecastResult<Vec<Value>> {
    let st = &p.annual_statements;
    let allowance = |year: usize, id: &str| {
        st[year]
            .amortization_detail
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.amount)
            .unwrap_or_default()
    };

    let mut rows = Vec::new();
    for (group, heading) in GROUPS {
        // categories amortized by default, or by a user schedule
        let categories: Vec<_> = plan
            .catalog
            .investments
            .iter()
            .filter(|c| c.group == group)
            .filter(|c| {
                c.default_amortization_years > 0
                    || (0..st.len()).any(|y| !allowance(y, &c.id).is_zero())
            })
            .collect();
        if categories.is_empty() {
            continue;
        }
        let mut subtotals = Vec::with_capacity(st.len());
        for year in 0..st.len() {
            subtotals.push(total(
                categories.iter().map(|c| allowance(year, &c.id)),
                heading,
            )?);
        }
        rows.push(year_row(
            heading,
            subtotals.iter().map(|v| format_report_value(*v, currency)),
        ));
        for category in categories {
            rows.push(year_row(
                &format!("  {}", category.label),
                (0..st.len()).map(|y| format_report_value(allowance(y, &category.id), currency)),
            ));
        }
    }
    rows.push(year_row(
        "Total amortization",
        st.iter().map(|s| format_report_value(s.amortization, currency)),
    ));
    Ok(rows)
}

fn total(mut values: impl Iterator<Item = Decimal>, figure: &str) -> ForecastResult<Decimal> {
    values.try_fold(Decimal::ZERO, |acc, v| {
        acc.checked_add(v)
            .ok_or_else(|| ForecastError::ArithmeticOverflow {
                figure: figure.to_string(),
            })
    })
}

fn line(label: &str, value: String) -> Value {
    json!({ "line": label, "value": value })
}

fn year_row(label: &str, cells: impl Iterator<Item = String>) -> Value {
    let mut row = Map::new();
    row.insert("line".into(), Value::String(label.to_string()));
    for (i, cell) in cells.enumerate() {
        row.insert(format!("year_{}", i + 1), Value::String(cell));
    }
    Value::Object(row)
}

/// Day counts share the currency grouping rules but never carry decimals.
fn days(currency: &Currency) -> Currency {
    Currency {
        decimals: 0,
        ..currency.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use startup_forecast_core::projection::{FinancingSource, InvestmentItem, RevenueModel};

    fn sample_plan() -> ProjectionInput {
        let mut plan = ProjectionInput::default();
        plan.investments
            .insert("stock".into(), InvestmentItem::new(dec!(2_000_000)));
        plan.financing
            .push(FinancingSource::equity("a", "Apport", dec!(2_500_000)));
        plan.revenue.model = RevenueModel::ExplicitGrowth {
            monthly_year1: vec![dec!(100_000); 12],
            annual_growth_pct: vec![Decimal::ZERO; 4],
        };
        plan.revenue.cost_of_goods_pct = dec!(50);
        plan
    }

    /// Sample plan plus five-year equipment bought with a bank loan.
    fn equipped_plan() -> ProjectionInput {
        let mut plan = sample_plan();
        plan.investments
            .insert("materiel".into(), InvestmentItem::new(dec!(600_000)));
        plan.financing.push(FinancingSource::loan(
            "b",
            "Banque",
            dec!(600_000),
            dec!(5),
            60,
        ));
        plan
    }

    fn render(plan: &ProjectionInput, currency: &Currency) -> Value {
        let output = projection::build_projection(plan).unwrap().result;
        render_report(plan, &output, currency).unwrap()
    }

    fn row<'a>(report: &'a Value, section: &str, label: &str) -> &'a Value {
        report[section]
            .as_array()
            .unwrap()
            .iter()
            .find(|r| r["line"] == label)
            .unwrap_or_else(|| panic!("no {label:?} line in {section}"))
    }

    fn labels(report: &Value, section: &str) -> Vec<String> {
        report[section]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["line"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_report_sections_present() {
        let report = render(&sample_plan(), &Currency::default());
        let keys: Vec<&String> = report.as_object().unwrap().keys().collect();
        assert_eq!(
            keys,
            vec![
                "01_summary",
                "02_investments_and_financing",
                "03_salaries",
                "04_amortization_detail",
                "05_income_statement",
                "06_self_financing",
                "07_working_capital",
                "08_break_even",
                "09_financing_plan",
                "10_monthly_treasury",
                "currency",
            ]
        );
    }

    #[test]
    fn test_report_cells_are_formatted() {
        let report = render(&sample_plan(), &Currency::default());
        let revenue = &report["05_income_statement"][0];
        assert_eq!(revenue["line"], "Revenue");
        assert_eq!(revenue["year_1"], "1\u{202f}200\u{202f}000");
        // no financial charges: zero renders as a dash
        assert_eq!(report["05_income_statement"][12]["year_1"], "-");
        assert_eq!(
            report["01_summary"][3]["value"],
            "500\u{202f}000 FCFA"
        );
    }

    #[test]
    fn test_report_monthly_keys_sort_in_calendar_order() {
        let report = render(&sample_plan(), &Currency::default());
        let row = report["10_monthly_treasury"][0].as_object().unwrap();
        let keys: Vec<&String> = row.keys().collect();
        assert_eq!(keys.first().map(|k| k.as_str()), Some("line"));
        assert_eq!(keys.last().map(|k| k.as_str()), Some("total"));
        assert_eq!(keys[1], "month_01");
        assert_eq!(keys[12], "month_12");
    }

    #[test]
    fn test_investments_grouped_by_category_group() {
        let report = render(&equipped_plan(), &Currency::default());
        let section = "02_investments_and_financing";

        let names = labels(&report, section);
        let position = |label: &str| names.iter().position(|n| n == label).unwrap();
        assert!(position("Intangible assets") < position("Tangible assets"));
        assert!(position("Tangible assets") < position("  Matériel"));
        assert!(position("  Matériel") < position("Deposits"));
        assert!(position("Stock") < position("Starting treasury"));

        assert_eq!(row(&report, section, "Tangible assets")["value"], "600\u{202f}000");
        assert_eq!(row(&report, section, "  Matériel")["value"], "600\u{202f}000");
        assert_eq!(row(&report, section, "Intangible assets")["value"], "-");
        assert_eq!(row(&report, section, "Stock")["value"], "2\u{202f}000\u{202f}000");
        assert_eq!(
            row(&report, section, "Total needs")["value"],
            "2\u{202f}600\u{202f}000 FCFA"
        );
    }

    #[test]
    fn test_financing_sources_listed_one_per_line() {
        let report = render(&equipped_plan(), &Currency::default());
        let section = "02_investments_and_financing";
        assert_eq!(
            row(&report, section, "  Apport")["value"],
            "2\u{202f}500\u{202f}000"
        );
        assert_eq!(
            row(&report, section, "  Banque (rate 5%, 60 months)")["value"],
            "600\u{202f}000"
        );
        assert_eq!(
            row(&report, section, "Total resources")["value"],
            "3\u{202f}100\u{202f}000 FCFA"
        );
        let names = labels(&report, section);
        assert_eq!(names.last().map(String::as_str), Some("Total resources"));
    }

    #[test]
    fn test_amortization_detail_lists_each_item() {
        let report = render(&equipped_plan(), &Currency::default());
        let section = "04_amortization_detail";

        let equipment = row(&report, section, "  Matériel");
        for year in 1..=5 {
            assert_eq!(equipment[format!("year_{year}")], "120\u{202f}000");
        }
        assert_eq!(
            row(&report, section, "Tangible assets")["year_1"],
            "120\u{202f}000"
        );
        assert_eq!(
            row(&report, section, "Total amortization")["year_1"],
            "120\u{202f}000"
        );
        // stock and starting cash are never amortized
        let names = labels(&report, section);
        assert!(!names.iter().any(|n| n == "  Stock initial"));
        assert!(!names.iter().any(|n| n == "Starting treasury"));
    }

    #[test]
    fn test_salaries_section_flags_accre_in_first_year_only() {
        let mut plan = sample_plan();
        plan.revenue.accre_exemption = true;
        plan.revenue.director_compensation = vec![dec!(1_000_000); 5];
        let report = render(&plan, &Currency::default());

        let accre = row(&report, "03_salaries", "ACCRE rate applied");
        assert_eq!(accre["year_1"], "Yes");
        assert_eq!(accre["year_2"], "No");
        assert_eq!(
            row(&report, "03_salaries", "Director compensation")["year_3"],
            "1\u{202f}000\u{202f}000"
        );
    }

    #[test]
    fn test_monthly_treasury_shows_net_flow_before_cumulative_balance() {
        let plan = equipped_plan();
        let output = projection::build_projection(&plan).unwrap().result;
        let currency = Currency::default();
        let report = render_report(&plan, &output, &currency).unwrap();

        let names = labels(&report, "10_monthly_treasury");
        let net = names.iter().position(|n| n == "Net flow").unwrap();
        assert_eq!(names[net + 1], "Cumulative balance");

        let net_flow = row(&report, "10_monthly_treasury", "Net flow");
        let months = &output.monthly_treasury.months;
        assert_eq!(
            net_flow["month_02"],
            format_report_value(months[1].net_flow, &currency).as_str()
        );
        assert_eq!(net_flow["total"], "");
    }

    #[test]
    fn test_day_counts_follow_currency_grouping() {
        let usd = Currency::preset("USD").unwrap();
        let day_count = days(&usd);
        assert_eq!(day_count.decimals, 0);
        assert_eq!(day_count.code, "USD");
        assert_eq!(format_report_value(dec!(1800), &day_count), "1,800");
        assert_eq!(
            format_report_value(dec!(1800), &days(&Currency::default())),
            "1\u{202f}800"
        );
    }
}
