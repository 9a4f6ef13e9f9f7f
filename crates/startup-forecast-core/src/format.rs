//! Currency rendering for reports. Arithmetic never goes through here: the
//! engine works on raw decimals and callers format at the edge.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::types::{Currency, Rate, SymbolPlacement};

/// Separators used by a locale when writing numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberStyle {
    pub grouping: char,
    pub decimal: char,
}

/// Separator conventions keyed on the language part of a BCP 47 tag.
pub fn number_style(locale: &str) -> NumberStyle {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match language.as_str() {
        // Intl uses a narrow no-break space for French grouping
        "fr" => NumberStyle {
            grouping: '\u{202f}',
            decimal: ',',
        },
        "de" | "es" | "it" | "nl" | "pt" | "id" | "tr" => NumberStyle {
            grouping: '.',
            decimal: ',',
        },
        _ => NumberStyle {
            grouping: ',',
            decimal: '.',
        },
    }
}

/// Round half away from zero to `decimals` places.
pub fn round_amount(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounded, grouped number without currency symbol.
pub fn format_number(value: Decimal, decimals: u32, locale: &str) -> String {
    let style = number_style(locale);
    let mut rounded = round_amount(value, decimals);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded.set_sign_positive(true);
    rounded.rescale(decimals);

    let plain = rounded.to_string();
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, style.grouping));
    if let Some(frac) = frac_part {
        out.push(style.decimal);
        out.push_str(frac);
    }
    out
}

/// Amount with the currency symbol, e.g. `1 200 000 FCFA` or `$1,200.50`.
pub fn format_amount(value: Decimal, currency: &Currency) -> String {
    let body = format_number(value, currency.decimals, &currency.locale);
    match currency.symbol_placement {
        SymbolPlacement::Suffix => format!("{body} {}", currency.symbol),
        SymbolPlacement::Prefix => match body.strip_prefix('-') {
            Some(abs) => format!("-{}{abs}", currency.symbol),
            None => format!("{}{body}", currency.symbol),
        },
    }
}

/// Report cell: rounded number, `-` when it rounds to zero.
pub fn format_report_value(value: Decimal, currency: &Currency) -> String {
    if round_amount(value, currency.decimals).is_zero() {
        "-".to_string()
    } else {
        format_number(value, currency.decimals, &currency.locale)
    }
}

/// Whole percent of a fraction: `0.4` -> `40%`.
pub fn format_percent(rate: Rate) -> String {
    let pct = round_amount(rate * Decimal::ONE_HUNDRED, 0);
    format!("{}%", pct.normalize())
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.chars().count();
    let mut grouped = String::with_capacity(len + len / 3 * separator.len_utf8());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}
