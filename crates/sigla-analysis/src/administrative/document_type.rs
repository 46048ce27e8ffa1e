//! Document-type classification from marker and commodity presence.

use serde::{Deserialize, Serialize};
use sigla_core::config::AdministrativeConfig;
use sigla_core::corpus::{Inscription, InscriptionId, TokenClass};
use sigla_core::types::interning::SignInterner;

pub const DEFAULT_BALANCE_MARKER: &str = "SA-RA2";
pub const DEFAULT_PERSONNEL_LOGOGRAM: &str = "VIR";
pub const DEFAULT_RITUAL_MARKERS: &[&str] = &["KA-PA", "A-DU", "JE-DI"];
pub const DEFAULT_COMMODITIES: &[&str] = &[
    "GRA", "HORD", "VIN", "OLE", "OLIV", "FIC", "CYP", "NI", "AROM", "TELA", "BOS", "OVIS", "CAP", "SUS",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    BalanceSheet,
    WorkforceRoster,
    DebtRegister,
    OfferingRecord,
    DistributionList,
    Unclassified,
}

impl DocumentType {
    pub fn name(self) -> &'static str {
        match self {
            Self::BalanceSheet => "balance_sheet",
            Self::WorkforceRoster => "workforce_roster",
            Self::DebtRegister => "debt_register",
            Self::OfferingRecord => "offering_record",
            Self::DistributionList => "distribution_list",
            Self::Unclassified => "unclassified",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentClassification {
    pub inscription: InscriptionId,
    pub site: String,
    pub document_type: DocumentType,
    /// Markers that drove the decision.
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DocumentClassifier {
    total_marker: String,
    deficit_marker: String,
    balance_marker: String,
    personnel: String,
    ritual: Vec<String>,
    commodities: Vec<String>,
}

impl Default for DocumentClassifier {
    fn default() -> Self {
        Self::from_config(&AdministrativeConfig::default())
    }
}

impl DocumentClassifier {
    pub fn from_config(config: &AdministrativeConfig) -> Self {
        Self {
            total_marker: SignInterner::normalize(config.effective_total_marker()),
            deficit_marker: SignInterner::normalize(config.effective_deficit_marker()),
            balance_marker: DEFAULT_BALANCE_MARKER.to_string(),
            personnel: DEFAULT_PERSONNEL_LOGOGRAM.to_string(),
            ritual: DEFAULT_RITUAL_MARKERS.iter().map(|s| s.to_string()).collect(),
            commodities: DEFAULT_COMMODITIES.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Ligatures such as `OLE+U` count as their base commodity.
    fn is_commodity(&self, text: &str) -> bool {
        let base = text.split('+').next().unwrap_or(text);
        self.commodities.iter().any(|c| c == base)
    }

    pub fn classify(&self, inscription: &Inscription) -> DocumentClassification {
        let balance = inscription.has_token(&self.balance_marker);
        let total = inscription.has_token(&self.total_marker);
        let deficit = inscription.has_token(&self.deficit_marker);
        let personnel = inscription.has_token(&self.personnel);
        let ritual: Vec<&String> = self
            .ritual
            .iter()
            .filter(|m| inscription.has_token(m.as_str()))
            .collect();
        let commodities: Vec<String> = {
            let mut found: Vec<String> = inscription
                .tokens()
                .filter(|t| t.class == TokenClass::Logogram && self.is_commodity(&t.text))
                .map(|t| t.text.clone())
                .collect();
            found.sort();
            found.dedup();
            found
        };
        let commodity = !commodities.is_empty();

        let mut evidence = Vec::new();
        let document_type = if balance && deficit {
            evidence.extend([self.balance_marker.clone(), self.deficit_marker.clone()]);
            DocumentType::BalanceSheet
        } else if personnel && total {
            evidence.extend([self.personnel.clone(), self.total_marker.clone()]);
            DocumentType::WorkforceRoster
        } else if deficit {
            evidence.push(self.deficit_marker.clone());
            DocumentType::DebtRegister
        } else if !ritual.is_empty() && commodity {
            evidence.extend(ritual.into_iter().cloned());
            evidence.extend(commodities);
            DocumentType::OfferingRecord
        } else if total || commodity {
            if total {
                evidence.push(self.total_marker.clone());
            }
            evidence.extend(commodities);
            DocumentType::DistributionList
        } else {
            DocumentType::Unclassified
        };

        DocumentClassification {
            inscription: inscription.id.clone(),
            site: inscription.site.clone(),
            document_type,
            evidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigla_core::corpus::{Corpus, RawInscription};

    const LOGOGRAMS: &[&str] = &["GRA", "VIR", "OLE", "OLE+U", "NI"];

    fn classify(lines: &[&str]) -> DocumentClassification {
        let corpus =
            Corpus::load(vec![RawInscription::from_words("X 1", "HT", lines, LOGOGRAMS)]).unwrap();
        DocumentClassifier::default().classify(&corpus.inscriptions()[0])
    }

    #[test]
    fn balance_sheet_needs_both_markers() {
        assert_eq!(
            classify(&["SA-RA2 GRA 3", "KI-RO 1"]).document_type,
            DocumentType::BalanceSheet
        );
    }

    #[test]
    fn personnel_with_total_is_a_roster() {
        let c = classify(&["A-DU VIR 2", "KU-RO 2", "KI-RO 1"]);
        assert_eq!(c.document_type, DocumentType::WorkforceRoster);
        assert_eq!(c.evidence, ["VIR", "KU-RO"]);
    }

    #[test]
    fn deficit_alone_is_a_debt_register() {
        assert_eq!(classify(&["KI-RO PA-DE 1"]).document_type, DocumentType::DebtRegister);
    }

    #[test]
    fn ritual_marker_with_commodity_is_an_offering() {
        let c = classify(&["KA-PA OLE+U 2", "JE-DI OLE 1"]);
        assert_eq!(c.document_type, DocumentType::OfferingRecord);
        assert!(c.evidence.contains(&"OLE+U".to_string()));
    }

    #[test]
    fn fallbacks() {
        assert_eq!(classify(&["DA-RE GRA 5"]).document_type, DocumentType::DistributionList);
        assert_eq!(classify(&["DA-RE KU-RO 5"]).document_type, DocumentType::DistributionList);
        assert_eq!(classify(&["DA-RE PA-JA-RE"]).document_type, DocumentType::Unclassified);
    }
}
