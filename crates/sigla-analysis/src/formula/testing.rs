//! Agreement-rule testing over extracted variants.
//!
//! Only the testable subset counts: variants where both slots are present and
//! the predicates needed are decidable. A rule nobody can test is `Untestable`,
//! never `Confirmed`. A tie between confirmations and violations is never
//! `Confirmed` either: the rate must exceed the threshold.

use serde::{Deserialize, Serialize};
use sigla_core::config::FormulaConfig;
use statrs::distribution::{Beta, ContinuousCDF};
use sigla_core::corpus::InscriptionId;
use tracing::{debug, info};

use super::rule::{AgreementRule, RuleKind, RuleRegistry};
use super::variant::FormulaVariant;

/// Posterior mass inside [`confirmation_interval`].
pub const CREDIBLE_MASS: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleVerdict {
    /// No variant could test the rule.
    Untestable,
    /// Some testable instances, fewer than the minimum.
    Insufficient,
    Confirmed,
    Contradicted,
}

impl RuleVerdict {
    pub fn name(self) -> &'static str {
        match self {
            Self::Untestable => "UNTESTABLE",
            Self::Insufficient => "INSUFFICIENT",
            Self::Confirmed => "CONFIRMED",
            Self::Contradicted => "CONTRADICTED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule_id: String,
    pub description: String,
    pub confirmed_count: usize,
    pub tested_count: usize,
    pub violating_examples: Vec<InscriptionId>,
    pub confirming_examples: Vec<InscriptionId>,
    /// Both slots present but a predicate was undecidable.
    pub undecidable_count: usize,
    pub verdict: RuleVerdict,
    /// `confirmed / tested`; `None` when untestable.
    pub confirmation_rate: Option<f64>,
    /// 95% Beta credible interval on the rate; `None` when untestable.
    pub credible_interval: Option<(f64, f64)>,
}

/// Aggregate over a registry. Untestable rules are excluded from rates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySummary {
    pub rules: usize,
    pub untestable: usize,
    pub insufficient: usize,
    pub confirmed: usize,
    pub contradicted: usize,
    pub instances_tested: usize,
    pub instances_confirmed: usize,
    /// Pooled confirmation rate over testable instances; `None` when none exist.
    pub confirmation_rate: Option<f64>,
}

enum Check {
    Absent,
    Undecidable,
    NotApplicable,
    Confirmed,
    Violated,
}

pub struct RuleTester {
    min_tested: usize,
    confirm_rate: f64,
}

impl RuleTester {
    pub fn new(min_tested: usize, confirm_rate: f64) -> Self {
        Self {
            min_tested: min_tested.max(1),
            confirm_rate,
        }
    }

    pub fn from_config(config: &FormulaConfig) -> Self {
        Self::new(config.effective_min_tested(), config.effective_confirm_rate())
    }

    /// Test every registered rule, in registry order.
    pub fn test_all(&self, registry: &RuleRegistry, variants: &[FormulaVariant]) -> Vec<RuleOutcome> {
        let _span = tracing::info_span!("sigla.formula.rules", rules = registry.len()).entered();
        let outcomes: Vec<RuleOutcome> = registry
            .rules()
            .iter()
            .map(|rule| self.test(rule, variants))
            .collect();
        info!(
            rules = outcomes.len(),
            untestable = outcomes
                .iter()
                .filter(|o| o.verdict == RuleVerdict::Untestable)
                .count(),
            "agreement rules tested"
        );
        outcomes
    }

    pub fn test(&self, rule: &AgreementRule, variants: &[FormulaVariant]) -> RuleOutcome {
        let mut confirming = Vec::new();
        let mut violating = Vec::new();
        let mut undecidable = 0;

        for variant in variants {
            match check(rule, variant) {
                Check::Confirmed => confirming.push(variant.inscription.clone()),
                Check::Violated => violating.push(variant.inscription.clone()),
                Check::Undecidable => undecidable += 1,
                Check::Absent | Check::NotApplicable => {}
            }
        }

        let confirmed = confirming.len();
        let tested = confirmed + violating.len();
        let rate = (tested > 0).then(|| confirmed as f64 / tested as f64);
        let verdict = match rate {
            None => RuleVerdict::Untestable,
            Some(_) if tested < self.min_tested => RuleVerdict::Insufficient,
            Some(r) if r > self.confirm_rate => RuleVerdict::Confirmed,
            Some(_) => RuleVerdict::Contradicted,
        };
        debug!(rule = %rule.id, confirmed, tested, verdict = verdict.name(), "rule tested");

        RuleOutcome {
            rule_id: rule.id.clone(),
            description: rule.description.clone(),
            confirmed_count: confirmed,
            tested_count: tested,
            violating_examples: violating,
            confirming_examples: confirming,
            undecidable_count: undecidable,
            verdict,
            confirmation_rate: rate,
            credible_interval: confirmation_interval(confirmed, tested),
        }
    }

    pub fn summarize(outcomes: &[RuleOutcome]) -> RegistrySummary {
        let count = |v: RuleVerdict| outcomes.iter().filter(|o| o.verdict == v).count();
        let instances_tested: usize = outcomes.iter().map(|o| o.tested_count).sum();
        let instances_confirmed: usize = outcomes.iter().map(|o| o.confirmed_count).sum();
        RegistrySummary {
            rules: outcomes.len(),
            untestable: count(RuleVerdict::Untestable),
            insufficient: count(RuleVerdict::Insufficient),
            confirmed: count(RuleVerdict::Confirmed),
            contradicted: count(RuleVerdict::Contradicted),
            instances_tested,
            instances_confirmed,
            confirmation_rate: (instances_tested > 0)
                .then(|| instances_confirmed as f64 / instances_tested as f64),
        }
    }
}

/// Equal-tailed credible interval on a rule's confirmation rate under a
/// uniform prior: Beta(1 + confirmed, 1 + violated). `None` when untested.
pub fn confirmation_interval(confirmed: usize, tested: usize) -> Option<(f64, f64)> {
    if tested == 0 || confirmed > tested {
        return None;
    }
    let posterior = Beta::new(1.0 + confirmed as f64, 1.0 + (tested - confirmed) as f64).ok()?;
    let tail = (1.0 - CREDIBLE_MASS) / 2.0;
    let low = posterior.inverse_cdf(tail);
    let high = posterior.inverse_cdf(1.0 - tail);
    Some((low.clamp(0.0, 1.0), high.clamp(0.0, 1.0)))
}

fn check(rule: &AgreementRule, variant: &FormulaVariant) -> Check {
    let (Some(a), Some(c)) = (
        variant.slot(&rule.antecedent.slot),
        variant.slot(&rule.consequent.slot),
    ) else {
        return Check::Absent;
    };
    let antecedent = rule.antecedent.predicate.evaluate(&a.sign_strs());
    let consequent = rule.consequent.predicate.evaluate(&c.sign_strs());

    match rule.kind {
        RuleKind::Implies => match (antecedent, consequent) {
            (Some(false), _) => Check::NotApplicable,
            (None, _) | (Some(true), None) => Check::Undecidable,
            (Some(true), Some(true)) => Check::Confirmed,
            (Some(true), Some(false)) => Check::Violated,
        },
        RuleKind::Iff => match (antecedent, consequent) {
            (Some(x), Some(y)) if x == y => Check::Confirmed,
            (Some(_), Some(_)) => Check::Violated,
            _ => Check::Undecidable,
        },
    }
}
