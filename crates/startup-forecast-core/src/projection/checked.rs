//! Overflow-checked decimal arithmetic for the projection stages.
//!
//! `Decimal` operators panic outside roughly ±7.9e28. Every stage goes
//! through these helpers instead, so an absurd plan yields
//! [`ForecastError::ArithmeticOverflow`] naming the figure being computed.

use rust_decimal::Decimal;

use crate::error::ForecastError;
use crate::ForecastResult;

fn overflow(figure: &str) -> ForecastError {
    ForecastError::ArithmeticOverflow {
        figure: figure.to_string(),
    }
}

pub(crate) fn add(a: Decimal, b: Decimal, figure: &str) -> ForecastResult<Decimal> {
    a.checked_add(b).ok_or_else(|| overflow(figure))
}

pub(crate) fn sub(a: Decimal, b: Decimal, figure: &str) -> ForecastResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| overflow(figure))
}

pub(crate) fn mul(a: Decimal, b: Decimal, figure: &str) -> ForecastResult<Decimal> {
    a.checked_mul(b).ok_or_else(|| overflow(figure))
}

/// Division where a zero denominator yields zero.
pub(crate) fn div(
    numerator: Decimal,
    denominator: Decimal,
    figure: &str,
) -> ForecastResult<Decimal> {
    if denominator.is_zero() {
        return Ok(Decimal::ZERO);
    }
    numerator
        .checked_div(denominator)
        .ok_or_else(|| overflow(figure))
}

/// `value * pct / 100`
pub(crate) fn percent_of(value: Decimal, pct: Decimal, figure: &str) -> ForecastResult<Decimal> {
    div(mul(value, pct, figure)?, Decimal::ONE_HUNDRED, figure)
}

pub(crate) fn sum<I>(values: I, figure: &str) -> ForecastResult<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| add(acc, v, figure))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_denominator_is_zero() {
        assert_eq!(div(dec!(5), Decimal::ZERO, "x").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_overflow_names_the_figure() {
        let err = mul(Decimal::MAX, dec!(2), "revenue").unwrap_err();
        assert_eq!(err.to_string(), "Arithmetic overflow computing revenue");
        assert!(sum([Decimal::MAX, Decimal::MAX], "total").is_err());
        assert!(sub(Decimal::MIN, Decimal::MAX, "gap").is_err());
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec!(1200), dec!(25), "x").unwrap(), dec!(300));
    }
}
