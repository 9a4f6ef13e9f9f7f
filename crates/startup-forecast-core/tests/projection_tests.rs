use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use startup_forecast_core::projection::{
    self, build_projection, FinancingSource, InvestmentItem, ProjectionInput, RevenueModel,
};
use startup_forecast_core::ForecastError;

// ===========================================================================
// Fixtures
// ===========================================================================

fn flat_year(monthly: Decimal) -> Vec<Decimal> {
    vec![monthly; 12]
}

/// Needs of 2,000,000 (none amortizable) covered by 2,500,000 of equity,
/// 1,200,000 of flat first-year revenue at 50% cost of goods.
fn bakery_plan() -> ProjectionInput {
    let mut input = ProjectionInput::default();
    input
        .investments
        .insert("stock".into(), InvestmentItem::new(dec!(1_500_000)));
    input
        .investments
        .insert("caution".into(), InvestmentItem::new(dec!(500_000)));
    input.financing.push(FinancingSource::equity(
        "apport",
        "Apport personnel",
        dec!(2_500_000),
    ));
    input.revenue.model = RevenueModel::ExplicitGrowth {
        monthly_year1: flat_year(dec!(100_000)),
        annual_growth_pct: vec![Decimal::ZERO; 4],
    };
    input.revenue.cost_of_goods_pct = dec!(50);
    input
}

// ===========================================================================
// End-to-end
// ===========================================================================

#[test]
fn test_end_to_end_first_year() {
    let out = build_projection(&bakery_plan()).unwrap();
    let p = &out.result;

    assert_eq!(p.summary.initial_treasury, dec!(500_000));

    let y1 = &p.annual_statements[0];
    assert_eq!(y1.revenue, dec!(1_200_000));
    assert_eq!(y1.cost_of_goods, dec!(600_000));
    assert_eq!(y1.gross_margin, dec!(600_000));
    assert_eq!(y1.value_added, dec!(600_000));
    assert_eq!(y1.ebe, dec!(600_000));
    assert_eq!(y1.operating_result, dec!(600_000));
    assert_eq!(y1.financial_charges, Decimal::ZERO);
    assert_eq!(y1.pre_tax_result, dec!(600_000));
    assert_eq!(y1.tax, dec!(150_000));
    assert_eq!(y1.net_result, dec!(450_000));
    assert_eq!(y1.amortization, Decimal::ZERO);
    assert_eq!(y1.caf, dec!(450_000));
    assert_eq!(y1.end_of_year_treasury, dec!(950_000));
    assert_eq!(p.summary.first_profitable_year, Some(1));
    assert!(out.warnings.is_empty());
}

#[test]
fn test_end_to_end_sections_are_consistent() {
    let p = build_projection(&bakery_plan()).unwrap().result;

    assert_eq!(p.revenue_series.len(), 5);
    assert_eq!(p.annual_statements.len(), 5);
    assert_eq!(p.monthly_treasury.months.len(), 12);
    assert_eq!(p.financing_plan.len(), 5);

    // Month 1 receives the equity and pays the needs
    let m1 = &p.monthly_treasury.months[0];
    assert_eq!(m1.financing_inflow, dec!(2_500_000));
    assert_eq!(m1.investment_outflow, dec!(2_000_000));
    // 100,000 revenue - 50,000 purchases per month on top of the 500,000 opening cash
    assert_eq!(p.monthly_treasury.totals.closing_balance, dec!(1_100_000));

    // Financing plan: resources 2.5M + CAF, needs 2M
    let f1 = &p.financing_plan[0];
    assert_eq!(f1.total_resources, dec!(2_950_000));
    assert_eq!(f1.total_needs, dec!(2_000_000));
    assert_eq!(f1.surplus, dec!(950_000));
}

#[test]
fn test_determinism() {
    let input = bakery_plan();
    let a = serde_json::to_string(&build_projection(&input).unwrap().result).unwrap();
    let b = serde_json::to_string(&build_projection(&input).unwrap().result).unwrap();
    assert_eq!(a, b);
}

// ===========================================================================
// Revenue
// ===========================================================================

#[test]
fn test_growth_compounding() {
    let mut input = bakery_plan();
    input.revenue.model = RevenueModel::ExplicitGrowth {
        monthly_year1: flat_year(dec!(100_000)),
        annual_growth_pct: vec![dec!(10); 4],
    };
    let series = build_projection(&input).unwrap().result.revenue_series;
    assert_eq!(
        series.to_vec(),
        vec![
            dec!(1_200_000),
            dec!(1_320_000),
            dec!(1_452_000),
            dec!(1_597_200),
            dec!(1_756_920),
        ]
    );
}

#[test]
fn test_manual_mode_series_length() {
    let mut input = bakery_plan();
    input.revenue.model = RevenueModel::FullManual {
        monthly_by_year: vec![flat_year(dec!(1))],
    };
    let series = build_projection(&input).unwrap().result.revenue_series;
    assert_eq!(series.len(), 5);
    assert_eq!(series[0], dec!(12));
    assert_eq!(series[1], Decimal::ZERO);
}

// ===========================================================================
// Amortization
// ===========================================================================

#[test]
fn test_amortization_schedule_terminates() {
    let mut input = ProjectionInput::default();
    input.investments.insert(
        "materiel".into(),
        InvestmentItem::with_amortization(dec!(500_000), 5),
    );
    input.investments.insert(
        "logiciels-formations".into(),
        InvestmentItem::with_amortization(dec!(300_000), 3),
    );
    let statements = build_projection(&input).unwrap().result.annual_statements;

    let materiel: Vec<Decimal> = statements
        .iter()
        .map(|s| {
            s.amortization_detail
                .iter()
                .find(|c| c.id == "materiel")
                .unwrap()
                .amount
        })
        .collect();
    assert_eq!(materiel, vec![dec!(100_000); 5]);

    let totals: Vec<Decimal> = statements.iter().map(|s| s.amortization).collect();
    assert_eq!(
        totals,
        vec![
            dec!(200_000),
            dec!(200_000),
            dec!(200_000),
            dec!(100_000),
            dec!(100_000)
        ]
    );
}

// ===========================================================================
// Guards and sign propagation
// ===========================================================================

#[test]
fn test_break_even_zero_revenue() {
    let mut input = ProjectionInput::default();
    input.charges.set_all_years("loyer", dec!(1_000_000));
    let y1 = &build_projection(&input).unwrap().result.annual_statements[0];
    assert_eq!(y1.revenue, Decimal::ZERO);
    assert_eq!(y1.break_even_revenue, Decimal::ZERO);
}

#[test]
fn test_negative_caf_propagates() {
    let mut input = ProjectionInput::default();
    input.charges.set_all_years("loyer", dec!(1_000_000));
    input.investments.insert(
        "materiel".into(),
        InvestmentItem::with_amortization(dec!(500_000), 5),
    );
    let out = build_projection(&input).unwrap();
    let y1 = &out.result.annual_statements[0];

    assert_eq!(y1.pre_tax_result, dec!(-1_100_000));
    assert_eq!(y1.tax, Decimal::ZERO);
    assert_eq!(y1.net_result, dec!(-1_100_000));
    assert_eq!(y1.caf, dec!(-1_000_000));
    assert_eq!(out.result.annual_statements[4].cumulative_caf, dec!(-5_000_000));
    assert!(out.warnings.iter().any(|w| w.contains("Year 1: net loss")));
}

#[test]
fn test_supplier_financed_working_capital_is_negative() {
    let mut input = bakery_plan();
    input.revenue.cost_of_goods_pct = dec!(80);
    input.revenue.client_credit_days = dec!(0);
    input.revenue.supplier_credit_days = dec!(60);
    let y1 = &build_projection(&input).unwrap().result.annual_statements[0];
    // 960,000 purchases * 60 / 360
    assert_eq!(y1.supplier_debt, dec!(160_000));
    assert!(y1.working_capital_requirement < Decimal::ZERO);
    assert_eq!(y1.working_capital_requirement, dec!(-160_000));
}

#[test]
fn test_loan_interest_decay() {
    let mut input = ProjectionInput::default();
    input.financing.push(FinancingSource::loan(
        "pret",
        "Prêt bancaire",
        dec!(1_000_000),
        dec!(10),
        60,
    ));
    let charges: Vec<Decimal> = build_projection(&input)
        .unwrap()
        .result
        .annual_statements
        .iter()
        .map(|s| s.financial_charges)
        .collect();
    assert_eq!(
        charges,
        vec![
            dec!(100_000),
            dec!(80_000),
            dec!(60_000),
            dec!(40_000),
            dec!(20_000)
        ]
    );
}

#[test]
fn test_runaway_growth_is_reported_not_panicked() {
    let mut input = ProjectionInput::default();
    input.revenue.model = RevenueModel::ExplicitGrowth {
        monthly_year1: vec![dec!(1_000_000_000_000_000); 12],
        annual_growth_pct: vec![dec!(1_000_000); 4],
    };
    let outcome = std::panic::catch_unwind(|| build_projection(&input));
    let result = outcome.expect("projection must not panic");
    assert!(matches!(
        result,
        Err(ForecastError::ArithmeticOverflow { .. })
    ));
}

#[test]
fn test_extreme_amounts_are_reported_not_panicked() {
    let mut input = ProjectionInput::default();
    input
        .investments
        .insert("materiel".into(), InvestmentItem::new(Decimal::MAX));
    input
        .investments
        .insert("stock".into(), InvestmentItem::new(Decimal::MAX));
    let err = build_projection(&input).unwrap_err();
    assert_eq!(err.to_string(), "Arithmetic overflow computing total investment");
}

#[test]
fn test_negative_monthly_balance_warning() {
    let mut input = bakery_plan();
    // Equity only covers 1,900,000 of the 2,000,000 needs
    input.financing[0].amount = dec!(1_900_000);
    let out = build_projection(&input).unwrap();
    assert_eq!(
        out.result.monthly_treasury.months[0].cumulative_balance,
        dec!(-50_000)
    );
    assert!(out
        .warnings
        .contains(&"Month 1: cumulative cash balance turns negative (-50000)".to_string()));
}

#[test]
fn test_warnings_do_not_change_figures() {
    // Same activity, once fully financed and once short of cash
    let healthy = build_projection(&bakery_plan()).unwrap();
    let mut short = bakery_plan();
    short.investments.insert(
        "tresorerie-depart".into(),
        InvestmentItem::new(dec!(1_000_000)),
    );
    let short = build_projection(&short).unwrap();

    assert!(healthy.warnings.is_empty());
    assert!(!short.warnings.is_empty());

    let ops = |p: &projection::ProjectionOutput| {
        p.annual_statements
            .iter()
            .map(|s| (s.revenue, s.ebe, s.net_result, s.caf))
            .collect::<Vec<_>>()
    };
    assert_eq!(ops(&healthy.result), ops(&short.result));
    assert_eq!(healthy.result.revenue_series, short.result.revenue_series);
    assert_eq!(
        short.result.annual_statements[0].end_of_year_treasury,
        healthy.result.annual_statements[0].end_of_year_treasury - dec!(1_000_000)
    );
}

// ===========================================================================
// Structural errors
// ===========================================================================

#[test]
fn test_unknown_charge_category_is_an_error() {
    let mut input = ProjectionInput::default();
    input.charges.set_all_years("casino", dec!(1));
    let err = build_projection(&input).unwrap_err();
    assert!(matches!(err, ForecastError::UnknownCategory { .. }));
    assert_eq!(err.to_string(), "Unknown charge category: casino");
}

#[test]
fn test_thirteen_months_is_an_error() {
    let mut input = ProjectionInput::default();
    input.revenue.model = RevenueModel::ExplicitGrowth {
        monthly_year1: vec![dec!(1); 13],
        annual_growth_pct: Vec::new(),
    };
    assert!(matches!(
        build_projection(&input),
        Err(ForecastError::HorizonExceeded { len: 13, max: 12, .. })
    ));
}

// ===========================================================================
// Wire format
// ===========================================================================

#[test]
fn test_plan_from_json_document() {
    let doc = serde_json::json!({
        "profile": { "project_title": "Atelier couture", "activity": "mixed" },
        "investments": {
            "materiel": { "amount": 600000 },
            "tresorerie-depart": { "amount": 200000, "details": "fonds de roulement" }
        },
        "financing": [
            { "id": "a1", "label": "Apport personnel", "amount": 400000 },
            { "id": "p1", "label": "Prêt bancaire", "amount": 500000,
              "interest_rate_pct": 8, "term_months": 48 }
        ],
        "charges": { "loyer": [240000, 240000, 260000, 260000, 260000] },
        "revenue": {
            "model": {
                "mode": "explicit_growth",
                "monthly_year1": [80000, 80000, 80000, 80000, 80000, 80000,
                                  80000, 80000, 80000, 80000, 80000, 80000],
                "annual_growth_pct": [5, 5, 5, 5]
            },
            "cost_of_goods_pct": 40,
            "client_credit_days": 30,
            "supplier_credit_days": 30,
            "employee_salaries": [0, 0, 0, 0, 0],
            "director_compensation": [120000, 120000, 120000, 120000, 120000],
            "accre_exemption": true
        }
    });
    let input: ProjectionInput = serde_json::from_value(doc).unwrap();
    let p = build_projection(&input).unwrap().result;

    assert_eq!(p.summary.total_investment, dec!(800_000));
    assert_eq!(p.summary.total_financing, dec!(900_000));
    assert_eq!(p.summary.total_loans, dec!(500_000));

    let y1 = &p.annual_statements[0];
    assert_eq!(y1.revenue, dec!(960_000));
    // materiel defaults to 5 years
    assert_eq!(y1.amortization, dec!(120_000));
    assert_eq!(y1.director_social_charges, dec!(6_000));
    assert_eq!(y1.financial_charges, dec!(40_000));
    assert_eq!(y1.loan_repayment, dec!(100_000));
    assert_eq!(p.annual_statements[1].director_social_charges, dec!(18_000));
    assert_eq!(p.annual_statements[2].fixed_costs, dec!(260_000));
}

#[test]
fn test_revenue_stage_is_reusable_alone() {
    let model = RevenueModel::FullManual {
        monthly_by_year: vec![flat_year(dec!(5)); 5],
    };
    let series = projection::revenue::build_revenue_series(&model).unwrap();
    assert!(series.iter().all(|r| *r == dec!(60)));
}
