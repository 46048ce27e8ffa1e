//! Sign-sequence predicates evaluated in three-valued logic.
//!
//! `Some(true)` / `Some(false)` are decided; `None` means an illegible sign
//! makes the answer undecidable.

use serde::{Deserialize, Serialize};
use sigla_core::constants::UNKNOWN_SIGN;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SignPredicate {
    StartsWith { signs: Vec<String> },
    EndsWith { signs: Vec<String> },
    Contains { signs: Vec<String> },
    HasSign { sign: String },
    MinLength { signs: usize },
    Not { predicate: Box<SignPredicate> },
    AnyOf { predicates: Vec<SignPredicate> },
    AllOf { predicates: Vec<SignPredicate> },
}

/// Outcome of comparing one pattern sign against one observed sign.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Cmp {
    Match,
    Mismatch,
    Unknown,
}

fn compare(observed: &str, expected: &str) -> Cmp {
    if observed == UNKNOWN_SIGN {
        Cmp::Unknown
    } else if observed.eq_ignore_ascii_case(expected) {
        Cmp::Match
    } else {
        Cmp::Mismatch
    }
}

/// Match `pattern` against `window` position by position.
fn window(window: &[&str], pattern: &[String]) -> Option<bool> {
    let mut unknown = false;
    for (obs, exp) in window.iter().zip(pattern) {
        match compare(obs, exp) {
            Cmp::Mismatch => return Some(false),
            Cmp::Unknown => unknown = true,
            Cmp::Match => {}
        }
    }
    if unknown {
        None
    } else {
        Some(true)
    }
}

fn split(text: &str) -> Vec<String> {
    text.split('-')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl SignPredicate {
    /// `starts_with("JA")` or `starts_with("A-TA-I")`.
    pub fn starts_with(signs: &str) -> Self {
        Self::StartsWith {
            signs: split(signs),
        }
    }

    pub fn ends_with(signs: &str) -> Self {
        Self::EndsWith {
            signs: split(signs),
        }
    }

    pub fn contains(signs: &str) -> Self {
        Self::Contains {
            signs: split(signs),
        }
    }

    pub fn has_sign(sign: &str) -> Self {
        Self::HasSign {
            sign: sign.trim().to_uppercase(),
        }
    }

    pub fn negate(self) -> Self {
        Self::Not {
            predicate: Box::new(self),
        }
    }

    pub fn any_of(predicates: Vec<SignPredicate>) -> Self {
        Self::AnyOf { predicates }
    }

    pub fn all_of(predicates: Vec<SignPredicate>) -> Self {
        Self::AllOf { predicates }
    }

    /// Evaluate against a token's signs, in reading order.
    pub fn evaluate(&self, signs: &[&str]) -> Option<bool> {
        match self {
            Self::StartsWith { signs: pattern } => {
                if signs.len() < pattern.len() {
                    return Some(false);
                }
                window(&signs[..pattern.len()], pattern)
            }
            Self::EndsWith { signs: pattern } => {
                if signs.len() < pattern.len() {
                    return Some(false);
                }
                window(&signs[signs.len() - pattern.len()..], pattern)
            }
            Self::Contains { signs: pattern } => {
                if pattern.is_empty() {
                    return Some(true);
                }
                if signs.len() < pattern.len() {
                    return Some(false);
                }
                let mut undecided = false;
                for start in 0..=signs.len() - pattern.len() {
                    match window(&signs[start..start + pattern.len()], pattern) {
                        Some(true) => return Some(true),
                        None => undecided = true,
                        Some(false) => {}
                    }
                }
                if undecided {
                    None
                } else {
                    Some(false)
                }
            }
            Self::HasSign { sign } => {
                let mut undecided = false;
                for s in signs {
                    match compare(s, sign) {
                        Cmp::Match => return Some(true),
                        Cmp::Unknown => undecided = true,
                        Cmp::Mismatch => {}
                    }
                }
                if undecided {
                    None
                } else {
                    Some(false)
                }
            }
            Self::MinLength { signs: n } => Some(signs.len() >= *n),
            Self::Not { predicate } => predicate.evaluate(signs).map(|v| !v),
            Self::AnyOf { predicates } => {
                let mut undecided = false;
                for p in predicates {
                    match p.evaluate(signs) {
                        Some(true) => return Some(true),
                        None => undecided = true,
                        Some(false) => {}
                    }
                }
                if undecided {
                    None
                } else {
                    Some(false)
                }
            }
            Self::AllOf { predicates } => {
                let mut undecided = false;
                for p in predicates {
                    match p.evaluate(signs) {
                        Some(false) => return Some(false),
                        None => undecided = true,
                        Some(true) => {}
                    }
                }
                if undecided {
                    None
                } else {
                    Some(true)
                }
            }
        }
    }

    /// Convenience for hyphenated text.
    pub fn evaluate_text(&self, text: &str) -> Option<bool> {
        let signs: Vec<&str> = text.split('-').collect();
        self.evaluate(&signs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_and_suffix() {
        let p = SignPredicate::starts_with("JA");
        assert_eq!(p.evaluate_text("JA-DI-KI-TE"), Some(true));
        assert_eq!(p.evaluate_text("DI-KI-TE"), Some(false));
        assert_eq!(p.evaluate_text("?-DI-KI-TE"), None);

        let s = SignPredicate::ends_with("MI-NA");
        assert_eq!(s.evaluate_text("I-PI-NA-MI-NA"), Some(true));
        assert_eq!(s.evaluate_text("I-PI-NA-MA"), Some(false));
        assert_eq!(s.evaluate_text("NA"), Some(false));
    }

    #[test]
    fn known_mismatch_beats_unknown() {
        let p = SignPredicate::starts_with("A-TA-I");
        assert_eq!(p.evaluate_text("?-NA-I"), Some(false));
    }

    #[test]
    fn contains_with_wildcard_window() {
        let p = SignPredicate::contains("RU");
        assert_eq!(p.evaluate_text("U-NA-RU-KA"), Some(true));
        assert_eq!(p.evaluate_text("U-NA-KA-NA-SI"), Some(false));
        assert_eq!(p.evaluate_text("U-NA-?-KA"), None);
        // A decided hit wins over an undecidable window.
        assert_eq!(p.evaluate_text("?-RU"), Some(true));
    }

    #[test]
    fn combinators_follow_three_valued_logic() {
        let any = SignPredicate::any_of(vec![
            SignPredicate::starts_with("TA-NA"),
            SignPredicate::starts_with("TA-NU"),
        ]);
        assert_eq!(any.evaluate_text("TA-NU-MU-TI"), Some(true));
        assert_eq!(any.evaluate_text("?-NA-SU"), None);
        assert_eq!(any.evaluate_text("A-TA-I"), Some(false));

        let not = SignPredicate::starts_with("JA").negate();
        assert_eq!(not.evaluate_text("DI-KI"), Some(true));
        assert_eq!(not.evaluate_text("?-KI"), None);

        let all = SignPredicate::all_of(vec![
            SignPredicate::has_sign("SA"),
            SignPredicate::MinLength { signs: 4 },
        ]);
        assert_eq!(all.evaluate_text("SA-SA-RA-ME"), Some(true));
        assert_eq!(all.evaluate_text("SA-RA"), Some(false));
    }

    #[test]
    fn deserializes_from_tagged_json() {
        let p: SignPredicate =
            serde_json::from_str(r#"{"op":"not","predicate":{"op":"starts_with","signs":["JA"]}}"#)
                .unwrap();
        assert_eq!(p, SignPredicate::starts_with("JA").negate());
    }
}
