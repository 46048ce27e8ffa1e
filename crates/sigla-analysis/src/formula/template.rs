//! Slot templates: ordered slot labels, each with a recognizer predicate.

use serde::{Deserialize, Serialize};
use sigla_core::errors::AnalysisError;

use super::predicate::SignPredicate;

fn one() -> usize {
    1
}

/// One structural position of a formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotSpec {
    pub label: String,
    pub recognizer: SignPredicate,
    #[serde(default)]
    pub mandatory: bool,
    /// Consecutive recognized tokens a slot may absorb.
    #[serde(default = "one")]
    pub max_tokens: usize,
}

impl SlotSpec {
    pub fn new(label: &str, recognizer: SignPredicate) -> Self {
        Self {
            label: label.to_string(),
            recognizer,
            mandatory: false,
            max_tokens: 1,
        }
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }
}

/// An ordered list of slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotTemplate {
    pub name: String,
    pub slots: Vec<SlotSpec>,
}

impl SlotTemplate {
    pub fn new(name: &str, slots: Vec<SlotSpec>) -> Result<Self, AnalysisError> {
        let template = Self {
            name: name.to_string(),
            slots,
        };
        template.validate()?;
        Ok(template)
    }

    /// Reject empty templates and repeated labels.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.slots.is_empty() {
            return Err(AnalysisError::EmptyTemplate);
        }
        for (i, slot) in self.slots.iter().enumerate() {
            if self.slots[..i].iter().any(|s| s.label == slot.label) {
                return Err(AnalysisError::DuplicateSlot {
                    label: slot.label.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|s| s.label.as_str())
    }

    pub fn has_slot(&self, label: &str) -> bool {
        self.slots.iter().any(|s| s.label == label)
    }

    pub fn mandatory_count(&self) -> usize {
        self.slots.iter().filter(|s| s.mandatory).count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The six-slot libation formula (α…ζ).
    ///
    /// α and γ are mandatory; the remaining slots are optional.
    pub fn libation() -> Self {
        use SignPredicate as P;
        Self {
            name: "libation".to_string(),
            slots: vec![
                SlotSpec::new(
                    "alpha",
                    P::any_of(vec![
                        P::starts_with("A-TA-I"),
                        P::starts_with("TA-NA"),
                        P::starts_with("TA-NU"),
                    ]),
                )
                .mandatory(),
                SlotSpec::new("beta", P::contains("DI-KI-TE")),
                SlotSpec::new("gamma", P::contains("SA-SA-RA")).mandatory(),
                SlotSpec::new("delta", P::starts_with("U-NA")),
                SlotSpec::new(
                    "epsilon",
                    P::any_of(vec![P::starts_with("I-PI-NA"), P::starts_with("SE-TO")]),
                ),
                SlotSpec::new(
                    "zeta",
                    P::all_of(vec![
                        P::starts_with("SI-RU-TE"),
                        P::ends_with("SI-RU-TE"),
                    ]),
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn libation_template_is_valid() {
        let t = SlotTemplate::libation();
        t.validate().unwrap();
        assert_eq!(t.len(), 6);
        assert_eq!(t.mandatory_count(), 2);
        assert_eq!(
            t.labels().collect::<Vec<_>>(),
            ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"]
        );
    }

    #[test]
    fn duplicate_labels_rejected() {
        let err = SlotTemplate::new(
            "bad",
            vec![
                SlotSpec::new("a", SignPredicate::has_sign("KU")),
                SlotSpec::new("a", SignPredicate::has_sign("RO")),
            ],
        )
        .unwrap_err();
        assert_eq!(err, AnalysisError::DuplicateSlot { label: "a".into() });
        assert_eq!(SlotTemplate::new("empty", vec![]).unwrap_err(), AnalysisError::EmptyTemplate);
    }
}
