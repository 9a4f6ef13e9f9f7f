use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown {kind} category: {id}")]
    UnknownCategory { kind: CategoryKind, id: String },

    #[error("Horizon exceeded: {field} has {len} entries, at most {max} allowed")]
    HorizonExceeded {
        field: String,
        len: usize,
        max: usize,
    },

    #[error("Arithmetic overflow computing {figure}")]
    ArithmeticOverflow { figure: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Which catalog list a category id was looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryKind {
    Investment,
    Charge,
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryKind::Investment => write!(f, "investment"),
            CategoryKind::Charge => write!(f, "charge"),
        }
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(e: serde_json::Error) -> Self {
        ForecastError::SerializationError(e.to_string())
    }
}
