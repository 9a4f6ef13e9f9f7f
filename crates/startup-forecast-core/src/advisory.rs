//! Contract with the external advice generator.
//!
//! The generator receives a short textual digest of the plan and returns free
//! text. It is best-effort: failures degrade to [`ADVICE_UNAVAILABLE`] and
//! never touch the computed figures.

use thiserror::Error;
use tracing::{debug, warn};

use crate::format::format_amount;
use crate::projection::{PlanSummary, ProjectProfile, ProjectionInput};
use crate::types::{Currency, Money};

/// Shown in place of advice when the generator cannot answer.
pub const ADVICE_UNAVAILABLE: &str =
    "Advice is not available at the moment for analysing your plan.";

#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("Advisory service unavailable: {0}")]
    Unavailable(String),

    #[error("Advisory service returned an empty answer")]
    EmptyResponse,
}

/// Anything that can turn a prompt into advice text (LLM API, canned
/// responses in tests, ...).
pub trait AdvisoryClient {
    fn generate(&self, prompt: &str) -> Result<String, AdvisoryError>;
}

/// Figures the advice prompt is built from.
#[derive(Debug, Clone, PartialEq)]
pub struct AdvisorySummary {
    pub profile: Option<ProjectProfile>,
    pub total_investment: Money,
    pub total_financing: Money,
    pub first_year_revenue: Money,
    pub first_year_fixed_costs: Money,
}

impl AdvisorySummary {
    pub fn from_projection(input: &ProjectionInput, summary: &PlanSummary) -> Self {
        AdvisorySummary {
            profile: input.profile.clone(),
            total_investment: summary.total_investment,
            total_financing: summary.total_financing,
            first_year_revenue: summary.first_year_revenue,
            first_year_fixed_costs: summary.first_year_fixed_costs,
        }
    }
}

pub fn build_prompt(summary: &AdvisorySummary, currency: &Currency) -> String {
    let mut prompt = String::from(
        "Act as a senior chartered accountant and financial adviser for small-business \
         creation. Review the following startup plan figures.\n\n",
    );

    if let Some(profile) = &summary.profile {
        let title = if profile.project_title.is_empty() {
            "Untitled project"
        } else {
            profile.project_title.as_str()
        };
        prompt.push_str(&format!("Project: {title} ({})", profile.activity));
        if !profile.city.is_empty() {
            prompt.push_str(&format!(", city: {}", profile.city));
        }
        prompt.push('\n');
    }

    let lines = [
        ("Total startup needs", summary.total_investment),
        ("Total financing", summary.total_financing),
        ("Estimated year 1 revenue", summary.first_year_revenue),
        ("Year 1 fixed charges", summary.first_year_fixed_costs),
    ];
    for (label, value) in lines {
        prompt.push_str(&format!("{label}: {}\n", format_amount(value, currency)));
    }

    prompt.push_str(
        "\nGive three short strategic recommendations (two sentences at most each):\n\
         1. On the viability of the project.\n\
         2. On the structure of its charges.\n\
         3. On its financing needs or treasury.\n\
         Answer directly with a bulleted list.",
    );
    prompt
}

/// Ask the client for advice, falling back to a fixed message on any failure.
pub fn request_advice(
    client: &dyn AdvisoryClient,
    summary: &AdvisorySummary,
    currency: &Currency,
) -> String {
    let prompt = build_prompt(summary, currency);
    debug!(prompt_len = prompt.len(), "requesting advice");

    match client.generate(&prompt) {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => {
            warn!(error = %AdvisoryError::EmptyResponse, "falling back to static advice");
            ADVICE_UNAVAILABLE.to_string()
        }
        Err(e) => {
            warn!(error = %e, "falling back to static advice");
            ADVICE_UNAVAILABLE.to_string()
        }
    }
}
