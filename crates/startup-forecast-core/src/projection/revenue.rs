use rust_decimal::Decimal;
use tracing::instrument;

use super::checked;
use super::input::{RevenueModel, PROJECTION_YEARS};
use crate::types::Money;
use crate::ForecastResult;

/// Annual revenue for each projected year.
///
/// Manual entry sums each year's months (missing months count as 0).
/// Explicit growth sums year 1, then compounds year over year:
/// `revenue[i] = revenue[i - 1] * (1 + growth[i - 1] / 100)`.
/// Negative growth is applied as-is, with no floor. Compounding past the
/// `Decimal` range is an error, never a panic.
#[instrument(skip_all)]
pub fn build_revenue_series(model: &RevenueModel) -> ForecastResult<[Money; PROJECTION_YEARS]> {
    let mut series = [Decimal::ZERO; PROJECTION_YEARS];

    match model {
        RevenueModel::FullManual { monthly_by_year } => {
            for (total, months) in series.iter_mut().zip(monthly_by_year) {
                *total = checked::sum(months.iter().copied(), "annual revenue")?;
            }
        }
        RevenueModel::ExplicitGrowth {
            monthly_year1,
            annual_growth_pct,
        } => {
            series[0] = checked::sum(monthly_year1.iter().copied(), "annual revenue")?;
            for i in 1..PROJECTION_YEARS {
                let growth = annual_growth_pct
                    .get(i - 1)
                    .copied()
                    .unwrap_or(Decimal::ZERO);
                let increase = checked::percent_of(series[i - 1], growth, "revenue growth")?;
                series[i] = checked::add(series[i - 1], increase, "annual revenue")?;
            }
        }
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn flat_year(monthly: Money) -> Vec<Money> {
        vec![monthly; 12]
    }

    #[test]
    fn test_growth_compounds_sequentially() {
        let model = RevenueModel::ExplicitGrowth {
            monthly_year1: flat_year(dec!(100_000)),
            annual_growth_pct: vec![dec!(10); 4],
        };
        let series = build_revenue_series(&model).unwrap();
        assert_eq!(
            series,
            [
                dec!(1_200_000),
                dec!(1_320_000),
                dec!(1_452_000),
                dec!(1_597_200),
                dec!(1_756_920),
            ]
        );
    }

    #[test]
    fn test_zero_growth_freezes_revenue() {
        let model = RevenueModel::ExplicitGrowth {
            monthly_year1: flat_year(dec!(50)),
            annual_growth_pct: vec![dec!(0); 4],
        };
        let series = build_revenue_series(&model).unwrap();
        assert!(series.iter().all(|r| *r == dec!(600)));
    }

    #[test]
    fn test_missing_growth_rates_count_as_zero() {
        let model = RevenueModel::ExplicitGrowth {
            monthly_year1: flat_year(dec!(10)),
            annual_growth_pct: vec![dec!(50)],
        };
        let series = build_revenue_series(&model).unwrap();
        assert_eq!(series[1], dec!(180));
        assert_eq!(series[4], dec!(180));
    }

    #[test]
    fn test_negative_growth_shrinks_revenue() {
        let model = RevenueModel::ExplicitGrowth {
            monthly_year1: flat_year(dec!(100)),
            annual_growth_pct: vec![dec!(-50), dec!(-50), dec!(-150), dec!(0)],
        };
        let series = build_revenue_series(&model).unwrap();
        assert_eq!(series[1], dec!(600));
        assert_eq!(series[2], dec!(300));
        // No floor: a rate below -100% turns revenue negative
        assert_eq!(series[3], dec!(-150));
    }

    #[test]
    fn test_runaway_growth_is_an_error() {
        let model = RevenueModel::ExplicitGrowth {
            monthly_year1: flat_year(dec!(1_000_000_000_000_000)),
            annual_growth_pct: vec![dec!(1_000_000); 4],
        };
        assert!(matches!(
            build_revenue_series(&model),
            Err(crate::ForecastError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn test_manual_mode_sums_each_year() {
        let model = RevenueModel::FullManual {
            monthly_by_year: vec![
                flat_year(dec!(1)),
                flat_year(dec!(2)),
                vec![dec!(5), dec!(5)],
            ],
        };
        let series = build_revenue_series(&model).unwrap();
        assert_eq!(
            series,
            [dec!(12), dec!(24), dec!(10), Decimal::ZERO, Decimal::ZERO]
        );
    }

    #[test]
    fn test_series_always_has_five_years() {
        let empty_manual = RevenueModel::FullManual {
            monthly_by_year: Vec::new(),
        };
        assert_eq!(build_revenue_series(&empty_manual).unwrap().len(), PROJECTION_YEARS);
        assert_eq!(
            build_revenue_series(&RevenueModel::default()).unwrap().len(),
            PROJECTION_YEARS
        );
    }
}
