use clap::Args;
use serde_json::{json, Value};

use startup_forecast_core::catalog::Catalog;
use startup_forecast_core::Currency;

/// Arguments for catalog listing
#[derive(Args)]
pub struct CatalogArgs {
    /// Also list the built-in currency presets
    #[arg(long)]
    pub currencies: bool,
}

pub fn run_catalog(args: CatalogArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = Catalog::standard();
    let mut result = serde_json::to_value(&catalog)?;
    if args.currencies {
        if let Value::Object(ref mut map) = result {
            map.insert("currencies".into(), serde_json::to_value(Currency::presets())?);
        }
    }
    Ok(json!({ "result": result }))
}
