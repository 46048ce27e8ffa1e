//! Agreement rules as data, and the registry that holds them.

use serde::{Deserialize, Serialize};
use sigla_core::errors::AnalysisError;

use super::predicate::SignPredicate;
use super::template::SlotTemplate;

/// How antecedent and consequent relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Antecedent holds ⇒ consequent holds. Testable only where the antecedent holds.
    #[default]
    Implies,
    /// Antecedent holds ⇔ consequent holds. Testable wherever both sides are decidable.
    Iff,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotCondition {
    pub slot: String,
    pub predicate: SignPredicate,
}

impl SlotCondition {
    pub fn new(slot: &str, predicate: SignPredicate) -> Self {
        Self {
            slot: slot.to_string(),
            predicate,
        }
    }
}

/// "If slot X matches P, then slot Y must match Q."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgreementRule {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: RuleKind,
    pub antecedent: SlotCondition,
    pub consequent: SlotCondition,
}

/// Ordered collection of rules. New rules are registered, never coded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleRegistry {
    rules: Vec<AgreementRule>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: AgreementRule) -> Result<(), AnalysisError> {
        if self.rules.iter().any(|r| r.id == rule.id) {
            return Err(AnalysisError::DuplicateRule { rule: rule.id });
        }
        self.rules.push(rule);
        Ok(())
    }

    /// Parse a JSON array of rule definitions.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let rules: Vec<AgreementRule> = serde_json::from_str(json)?;
        Ok(Self { rules })
    }

    /// Every referenced slot must exist in `template`; ids must be unique.
    pub fn validate_against(&self, template: &SlotTemplate) -> Result<(), AnalysisError> {
        for (i, rule) in self.rules.iter().enumerate() {
            if self.rules[..i].iter().any(|r| r.id == rule.id) {
                return Err(AnalysisError::DuplicateRule {
                    rule: rule.id.clone(),
                });
            }
            for slot in [&rule.antecedent.slot, &rule.consequent.slot] {
                if !template.has_slot(slot) {
                    return Err(AnalysisError::UnknownSlot {
                        rule: rule.id.clone(),
                        slot: slot.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn rules(&self) -> &[AgreementRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Agreement hypotheses for the libation formula.
    pub fn libation() -> Self {
        use SignPredicate as P;
        let rule = |id: &str, description: &str, kind, a: SlotCondition, c: SlotCondition| AgreementRule {
            id: id.to_string(),
            description: description.to_string(),
            kind,
            antecedent: a,
            consequent: c,
        };
        Self {
            rules: vec![
                rule(
                    "I",
                    "beta lacks J- iff delta carries -RU-",
                    RuleKind::Iff,
                    SlotCondition::new("beta", P::starts_with("JA").negate()),
                    SlotCondition::new("delta", P::contains("RU")),
                ),
                rule(
                    "IIa",
                    "alpha ending -E requires epsilon ending -MI-NA",
                    RuleKind::Implies,
                    SlotCondition::new("alpha", P::ends_with("E")),
                    SlotCondition::new("epsilon", P::ends_with("MI-NA")),
                ),
                rule(
                    "IIb",
                    "alpha ending -E requires delta ending -TI",
                    RuleKind::Implies,
                    SlotCondition::new("alpha", P::ends_with("E")),
                    SlotCondition::new("delta", P::ends_with("TI")),
                ),
                rule(
                    "III",
                    "alpha ending -TI requires gamma ending -NA",
                    RuleKind::Implies,
                    SlotCondition::new("alpha", P::ends_with("TI")),
                    SlotCondition::new("gamma", P::ends_with("NA")),
                ),
                rule(
                    "IV",
                    "alpha ending -E requires gamma without J-",
                    RuleKind::Implies,
                    SlotCondition::new("alpha", P::ends_with("E")),
                    SlotCondition::new("gamma", P::starts_with("JA").negate()),
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn libation_rules_reference_template_slots() {
        let registry = RuleRegistry::libation();
        assert_eq!(registry.len(), 5);
        registry.validate_against(&SlotTemplate::libation()).unwrap();
    }

    #[test]
    fn registering_duplicate_id_fails() {
        let mut registry = RuleRegistry::libation();
        let dup = registry.rules()[0].clone();
        assert!(matches!(registry.register(dup), Err(AnalysisError::DuplicateRule { .. })));
    }

    #[test]
    fn unknown_slot_is_reported() {
        let mut registry = RuleRegistry::new();
        registry
            .register(AgreementRule {
                id: "X".into(),
                description: String::new(),
                kind: RuleKind::Implies,
                antecedent: SlotCondition::new("omega", SignPredicate::has_sign("KU")),
                consequent: SlotCondition::new("alpha", SignPredicate::has_sign("RO")),
            })
            .unwrap();
        let err = registry.validate_against(&SlotTemplate::libation()).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::UnknownSlot {
                rule: "X".into(),
                slot: "omega".into()
            }
        );
    }

    #[test]
    fn kind_defaults_to_implies_in_json() {
        let registry = RuleRegistry::from_json(
            r#"[{"id":"R","antecedent":{"slot":"alpha","predicate":{"op":"ends_with","signs":["E"]}},
                 "consequent":{"slot":"gamma","predicate":{"op":"has_sign","sign":"SA"}}}]"#,
        )
        .unwrap();
        assert_eq!(registry.rules()[0].kind, RuleKind::Implies);
    }
}
