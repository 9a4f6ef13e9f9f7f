pub mod catalog;
pub mod error;
pub mod format;
pub mod projection;
pub mod types;

#[cfg(feature = "advisory")]
pub mod advisory;

pub use error::ForecastError;
pub use types::*;

/// Standard result type for all forecast operations
pub type ForecastResult<T> = Result<T, ForecastError>;
