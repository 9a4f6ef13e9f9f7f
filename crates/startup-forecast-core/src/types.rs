use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages as entered by the user (10 = 10%).
pub type Percent = Decimal;

/// Rates expressed as decimals (0.05 = 5%).
pub type Rate = Decimal;

/// Day counts for credit terms
pub type Days = Decimal;

/// Where the currency symbol sits relative to the amount
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolPlacement {
    Prefix,
    #[default]
    Suffix,
}

/// Display currency. Presentation only: the engine never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub symbol_placement: SymbolPlacement,
    pub decimals: u32,
    pub locale: String,
}

impl Currency {
    fn new(
        code: &str,
        name: &str,
        symbol: &str,
        symbol_placement: SymbolPlacement,
        decimals: u32,
        locale: &str,
    ) -> Self {
        Currency {
            code: code.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            symbol_placement,
            decimals,
            locale: locale.to_string(),
        }
    }

    /// Built-in currencies offered by the plan wizard.
    pub fn presets() -> Vec<Currency> {
        use SymbolPlacement::{Prefix, Suffix};
        vec![
            Currency::new("XOF", "Franc CFA (BCEAO)", "FCFA", Suffix, 0, "fr-SN"),
            Currency::new("XAF", "Franc CFA (BEAC)", "FCFA", Suffix, 0, "fr-CM"),
            Currency::new("EUR", "Euro", "€", Suffix, 2, "fr-FR"),
            Currency::new("USD", "US Dollar", "$", Prefix, 2, "en-US"),
            Currency::new("GBP", "Pound Sterling", "£", Prefix, 2, "en-GB"),
            Currency::new("MAD", "Dirham marocain", "DH", Suffix, 2, "fr-MA"),
            Currency::new("CAD", "Dollar canadien", "$", Suffix, 2, "fr-CA"),
        ]
    }

    /// Look up a preset by ISO code, case-insensitively.
    pub fn preset(code: &str) -> Option<Currency> {
        Self::presets()
            .into_iter()
            .find(|c| c.code.eq_ignore_ascii_case(code))
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::new(
            "XOF",
            "Franc CFA (BCEAO)",
            "FCFA",
            SymbolPlacement::Suffix,
            0,
            "fr-SN",
        )
    }
}

/// An amount attributed to one catalog category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub id: String,
    pub label: String,
    pub amount: Money,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

impl<T: Serialize> ComputationOutput<T> {
    /// Keep the envelope, replace the result (e.g. to expose one section).
    pub fn map<U: Serialize>(self, f: impl FnOnce(T) -> U) -> ComputationOutput<U> {
        ComputationOutput {
            result: f(self.result),
            methodology: self.methodology,
            assumptions: self.assumptions,
            warnings: self.warnings,
            metadata: self.metadata,
        }
    }
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
