//! Arithmetic consistency of stated totals.
//!
//! A section opens at the start of an inscription and after every deficit
//! marker. A total marker followed by numerals states the section's total;
//! those stated numerals are never themselves summed. Numerals right after a
//! deficit marker are the first entry of the new section and are summed like
//! any other entry.

use serde::{Deserialize, Serialize};
use sigla_core::config::AdministrativeConfig;
use sigla_core::constants::ARITHMETIC_TOLERANCE;
use sigla_core::corpus::{Inscription, InscriptionId, Token, TokenClass};
use sigla_core::types::interning::SignInterner;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticStatus {
    Pass,
    Fail,
    /// No stated numeral, or an unreadable value in the section.
    Indeterminate,
}

impl ArithmeticStatus {
    pub fn name(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Indeterminate => "indeterminate",
        }
    }
}

/// One total marker checked against its section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalCheck {
    /// Line of the total marker.
    pub line: usize,
    pub section: usize,
    /// Number of numeric entries summed.
    pub items: usize,
    pub computed: Option<f64>,
    pub stated: Option<f64>,
    /// `stated − computed`, present whenever both are known.
    pub delta: Option<f64>,
    pub status: ArithmeticStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArithmeticReport {
    pub inscription: InscriptionId,
    pub checks: Vec<TotalCheck>,
    /// `Fail` if any check fails, else `Indeterminate` if any is, else `Pass`.
    pub status: ArithmeticStatus,
}

#[derive(Debug, Clone)]
pub struct ArithmeticChecker {
    total_marker: String,
    deficit_marker: String,
    tolerance: f64,
}

#[derive(Default)]
struct Section {
    index: usize,
    sum: f64,
    items: usize,
    unreadable: bool,
}

impl Section {
    fn reset(&mut self) {
        self.index += 1;
        self.sum = 0.0;
        self.items = 0;
        self.unreadable = false;
    }
}

impl ArithmeticChecker {
    pub fn new(total_marker: &str, deficit_marker: &str) -> Self {
        Self {
            total_marker: SignInterner::normalize(total_marker),
            deficit_marker: SignInterner::normalize(deficit_marker),
            tolerance: ARITHMETIC_TOLERANCE,
        }
    }

    pub fn from_config(config: &AdministrativeConfig) -> Self {
        Self::new(config.effective_total_marker(), config.effective_deficit_marker())
    }

    /// `None` when the inscription carries no total marker.
    pub fn check(&self, inscription: &Inscription) -> Option<ArithmeticReport> {
        let tokens: Vec<&Token> = inscription.tokens().collect();
        if !tokens.iter().any(|t| t.text == self.total_marker) {
            return None;
        }

        let mut checks = Vec::new();
        let mut section = Section::default();
        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            if token.text == self.deficit_marker {
                // The marker itself carries no amount; what follows belongs to the new section.
                section.reset();
                i += 1;
                continue;
            }
            if token.text == self.total_marker {
                let stated_run: Vec<&Token> = tokens[i + 1..]
                    .iter()
                    .take_while(|t| t.class == TokenClass::Number)
                    .copied()
                    .collect();
                checks.push(self.evaluate(token.line, &section, &stated_run));
                i += 1 + stated_run.len();
                continue;
            }
            if token.class == TokenClass::Number {
                match token.value {
                    Some(v) => section.sum += v,
                    None => section.unreadable = true,
                }
                section.items += 1;
            }
            i += 1;
        }

        let status = if checks.iter().any(|c| c.status == ArithmeticStatus::Fail) {
            ArithmeticStatus::Fail
        } else if checks.iter().any(|c| c.status == ArithmeticStatus::Indeterminate) {
            ArithmeticStatus::Indeterminate
        } else {
            ArithmeticStatus::Pass
        };

        Some(ArithmeticReport {
            inscription: inscription.id.clone(),
            checks,
            status,
        })
    }

    fn evaluate(&self, line: usize, section: &Section, stated_run: &[&Token]) -> TotalCheck {
        let computed = (!section.unreadable).then_some(section.sum);
        let stated = if stated_run.is_empty() {
            None
        } else {
            stated_run
                .iter()
                .map(|t| t.value)
                .sum::<Option<f64>>()
        };
        let delta = computed.zip(stated).map(|(c, s)| s - c);
        let status = match delta {
            Some(d) if d.abs() <= self.tolerance => ArithmeticStatus::Pass,
            Some(_) => ArithmeticStatus::Fail,
            None => ArithmeticStatus::Indeterminate,
        };
        TotalCheck {
            line,
            section: section.index,
            items: section.items,
            computed,
            stated,
            delta,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigla_core::corpus::{Corpus, RawInscription};

    fn check(lines: &[&str]) -> Option<ArithmeticReport> {
        let corpus =
            Corpus::load(vec![RawInscription::from_words("HT 1", "HT", lines, &["GRA"])]).unwrap();
        ArithmeticChecker::new("KU-RO", "KI-RO").check(&corpus.inscriptions()[0])
    }

    #[test]
    fn matching_total_passes_with_zero_delta() {
        let r = check(&["SA-RA2 GRA 3", "KA-PA GRA 4", "DA-RE GRA 5", "KU-RO 12"]).unwrap();
        assert_eq!(r.status, ArithmeticStatus::Pass);
        assert_eq!(r.checks[0].delta, Some(0.0));
        assert_eq!(r.checks[0].items, 3);
    }

    #[test]
    fn mismatch_reports_negative_delta() {
        let r = check(&["SA-RA2 GRA 3", "KA-PA GRA 4", "DA-RE GRA 5", "KU-RO 11"]).unwrap();
        assert_eq!(r.status, ArithmeticStatus::Fail);
        assert_eq!(r.checks[0].delta, Some(-1.0));
    }

    #[test]
    fn deficit_marker_opens_a_new_section() {
        let r = check(&["A-DU 2", "KU-PA3-NU 3", "KU-RO 5", "KI-RO 1", "PA-JA-RE 1", "KU-RO 2"]).unwrap();
        assert_eq!(r.checks.len(), 2);
        assert_eq!(r.checks[1].section, 1);
        assert_eq!(r.checks[1].computed, Some(2.0));
        assert_eq!(r.status, ArithmeticStatus::Pass);
    }

    #[test]
    fn amount_after_deficit_marker_is_an_entry() {
        let r = check(&["A-DU 2", "KU-RO 2", "KI-RO 4", "KU-RO 4"]).unwrap();
        let owed = &r.checks[1];
        assert_eq!(owed.section, 1);
        assert_eq!(owed.items, 1);
        assert_eq!(owed.computed, Some(4.0));
        assert_eq!(owed.status, ArithmeticStatus::Pass);

        // The opening section does not see it.
        assert_eq!(r.checks[0].computed, Some(2.0));
    }

    #[test]
    fn fractions_in_stated_total_are_included() {
        let r = check(&["TE-TU 56", "TE-KI 27 1/2", "RE-ZA 47", "KU-RO 130 1/2"]).unwrap();
        assert_eq!(r.checks[0].stated, Some(130.5));
        assert_eq!(r.status, ArithmeticStatus::Pass);
    }

    #[test]
    fn missing_numeral_is_indeterminate() {
        let r = check(&["DA-TA-RE 1", "KU-RO"]).unwrap();
        assert_eq!(r.status, ArithmeticStatus::Indeterminate);
        assert_eq!(r.checks[0].delta, None);
    }

    #[test]
    fn inscriptions_without_total_are_skipped() {
        assert!(check(&["DA-RE GRA 5"]).is_none());
    }
}
