//! Category catalogs for startup needs and recurring charges.
//!
//! The catalog is plain data handed to the engine: the projection iterates
//! it in order, so swapping in a synthetic catalog changes which categories
//! are summed without touching the formulas.

use serde::{Deserialize, Serialize};

use crate::error::{CategoryKind, ForecastError};
use crate::ForecastResult;

/// Balance-sheet family of an investment category (report grouping only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentGroup {
    Intangible,
    Tangible,
    Deposit,
    Stock,
    Cash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentCategory {
    pub id: String,
    pub label: String,
    /// Straight-line schedule suggested when the user leaves it blank; 0 means
    /// the category is never amortized.
    pub default_amortization_years: i32,
    pub group: InvestmentGroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargeCategory {
    pub id: String,
    pub label: String,
}

/// Ordered investment and charge categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub investments: Vec<InvestmentCategory>,
    pub charges: Vec<ChargeCategory>,
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::standard()
    }
}

impl Catalog {
    /// The startup-need and fixed-charge lists of the French-language wizard.
    pub fn standard() -> Self {
        use InvestmentGroup::*;

        let investments = [
            ("frais-etablissement", "Frais d'établissement", 5, Intangible),
            ("frais-compteurs", "Frais d'ouverture de compteurs", 5, Intangible),
            ("logiciels-formations", "Logiciels, formations", 3, Intangible),
            ("droits-entrees", "Droits d'entrées", 5, Intangible),
            ("achat-fonds-commerce", "Achat fonds de commerce", 10, Intangible),
            ("depot-marque", "Dépôt marque, brevet", 5, Intangible),
            ("droit-bail", "Droit au bail", 10, Intangible),
            ("caution", "Caution / Dépôt de garantie", 0, Deposit),
            ("frais-dossier", "Frais de dossier", 1, Intangible),
            ("frais-notaire", "Frais de notaire / expert", 5, Intangible),
            ("enseigne-communication", "Enseigne & Communication", 3, Tangible),
            ("achat-immobilier", "Achat immobilier", 20, Tangible),
            ("travaux-amenagement", "Travaux & Aménagements", 10, Tangible),
            ("materiel", "Matériel", 5, Tangible),
            ("materiel-bureau", "Matériel de bureau", 5, Tangible),
            ("stock", "Stock initial", 0, Stock),
            ("tresorerie-depart", "Trésorerie de départ", 0, Cash),
        ]
        .into_iter()
        .map(|(id, label, years, group)| InvestmentCategory {
            id: id.to_string(),
            label: label.to_string(),
            default_amortization_years: years,
            group,
        })
        .collect();

        let charges = [
            ("assurances", "Assurances"),
            ("telephone", "Téléphone, Internet"),
            ("abonnements", "Autres abonnements"),
            ("carburant", "Carburant, transports"),
            ("deplacement", "Frais de déplacement"),
            ("energie", "Eau, électricité, gaz"),
            ("autorites", "Autorités"),
            ("fournitures", "Fournitures diverses"),
            ("entretien", "Entretien matériel"),
            ("nettoyage", "Nettoyage des locaux"),
            ("publicite", "Budget publicité"),
            ("loyer", "Loyer et charges"),
            ("expert", "Expert comptable"),
            ("bancaires", "Frais bancaires"),
            ("taxes", "Taxes, CFE"),
        ]
        .into_iter()
        .map(|(id, label)| ChargeCategory {
            id: id.to_string(),
            label: label.to_string(),
        })
        .collect();

        Catalog {
            investments,
            charges,
        }
    }

    pub fn investment(&self, id: &str) -> Option<&InvestmentCategory> {
        self.investments.iter().find(|c| c.id == id)
    }

    pub fn charge(&self, id: &str) -> Option<&ChargeCategory> {
        self.charges.iter().find(|c| c.id == id)
    }

    pub(crate) fn require_investment(&self, id: &str) -> ForecastResult<&InvestmentCategory> {
        self.investment(id)
            .ok_or_else(|| ForecastError::UnknownCategory {
                kind: CategoryKind::Investment,
                id: id.to_string(),
            })
    }

    pub(crate) fn require_charge(&self, id: &str) -> ForecastResult<&ChargeCategory> {
        self.charge(id).ok_or_else(|| ForecastError::UnknownCategory {
            kind: CategoryKind::Charge,
            id: id.to_string(),
        })
    }
}
