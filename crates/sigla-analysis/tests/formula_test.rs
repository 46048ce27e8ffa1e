//! Tests for formula-variant extraction and agreement-rule testing.

use serde::Deserialize;
use sigla_analysis::formula::{
    confirmation_interval, AgreementRule, FormulaAnalyzer, RuleKind, RuleRegistry, RuleTester, RuleVerdict,
    SignPredicate, SlotCondition, SlotSpec, SlotTemplate, SuffixInventory, SuffixProfile,
};
use sigla_core::corpus::{Corpus, RawInscription};
use sigla_core::errors::AnalysisError;
use test_fixtures::{load_fixture, load_fixture_value};

#[derive(Deserialize)]
struct Expected {
    variants: usize,
    rule: String,
    confirmed: usize,
    tested: usize,
    violating: Vec<String>,
    untestable: Vec<String>,
}

#[derive(Deserialize)]
struct Scenario {
    corpus: String,
    min_slots: usize,
    rules: Vec<AgreementRule>,
    expected: Expected,
}

fn libation() -> Corpus {
    let raw: Vec<RawInscription> = load_fixture("corpus/libation_three_variants.json");
    Corpus::load(raw).unwrap()
}

fn registry(rules: Vec<AgreementRule>) -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    for rule in rules {
        registry.register(rule).unwrap();
    }
    registry
}

// ─── End-to-end scenario ────────────────────────────────────────────────────

#[test]
fn single_rule_scenario_reports_one_of_two() {
    let scenario: Scenario = load_fixture("formula/single_rule_scenario.json");
    let raw: Vec<RawInscription> = load_fixture(&scenario.corpus);
    let corpus = Corpus::load(raw).unwrap();

    let analyzer = FormulaAnalyzer::new(SlotTemplate::libation(), scenario.min_slots).unwrap();
    let extraction = analyzer.extract(&corpus);
    assert_eq!(extraction.variants.len(), scenario.expected.variants);

    let registry = registry(scenario.rules);
    registry.validate_against(analyzer.template()).unwrap();
    let outcomes = RuleTester::new(3, 0.5).test_all(&registry, &extraction.variants);

    let rule = outcomes
        .iter()
        .find(|o| o.rule_id == scenario.expected.rule)
        .unwrap();
    assert_eq!(rule.confirmed_count, scenario.expected.confirmed);
    assert_eq!(rule.tested_count, scenario.expected.tested);
    let violating: Vec<&str> = rule.violating_examples.iter().map(|id| id.as_str()).collect();
    assert_eq!(violating, scenario.expected.violating);
    assert_eq!(rule.confirmation_rate, Some(0.5));
    // Two instances is below the minimum of three.
    assert_eq!(rule.verdict, RuleVerdict::Insufficient);

    for id in &scenario.expected.untestable {
        let o = outcomes.iter().find(|o| &o.rule_id == id).unwrap();
        assert_eq!(o.verdict, RuleVerdict::Untestable);
        assert_eq!(o.tested_count, 0);
        assert_eq!(o.confirmation_rate, None);
        assert_eq!(o.credible_interval, None);
    }
}

#[test]
fn confirmed_when_rate_exceeds_threshold() {
    let corpus = Corpus::load(vec![
        RawInscription::from_words("A", "PK", &["A-TA-I-JA JA-SA-SA-RA-ME"], &[]),
        RawInscription::from_words("B", "PK", &["A-TA-I-JA JA-SA-SA-RA-ME"], &[]),
        RawInscription::from_words("C", "PK", &["A-TA-I-JA U-NA-KA-NA-SI"], &[]),
    ])
    .unwrap();
    let template = SlotTemplate::new(
        "pair",
        vec![
            SlotSpec::new("alpha", SignPredicate::starts_with("A-TA-I")).mandatory(),
            SlotSpec::new("gamma", SignPredicate::ends_with("ME")),
            SlotSpec::new("delta", SignPredicate::ends_with("SI")),
        ],
    )
    .unwrap();
    let rule = AgreementRule {
        id: "J".into(),
        description: String::new(),
        kind: RuleKind::Implies,
        antecedent: SlotCondition::new("alpha", SignPredicate::ends_with("JA")),
        consequent: SlotCondition::new("gamma", SignPredicate::starts_with("JA")),
    };
    let variants = FormulaAnalyzer::new(template, 1).unwrap().extract(&corpus).variants;
    let outcome = RuleTester::new(2, 0.5).test(&rule, &variants);
    // C has no gamma slot and does not count.
    assert_eq!((outcome.confirmed_count, outcome.tested_count), (2, 2));
    assert_eq!(outcome.verdict, RuleVerdict::Confirmed);
    assert_eq!(RuleTester::new(2, 0.99).test(&rule, &variants).verdict, RuleVerdict::Confirmed);
}

#[test]
fn credible_interval_tightens_with_evidence() {
    assert_eq!(confirmation_interval(0, 0), None);
    assert_eq!(confirmation_interval(3, 2), None);

    let (low, high) = confirmation_interval(0, 1).unwrap();
    assert!(low < 0.05 && high > 0.75 && high < 1.0);
    let (l2, h2) = confirmation_interval(1, 2).unwrap();
    let (l100, h100) = confirmation_interval(50, 100).unwrap();
    assert!(h100 - l100 < h2 - l2);
    assert!(l100 < 0.5 && h100 > 0.5);
    // Equal confirmed and violated counts give a posterior symmetric about one half.
    let (lu, hu) = confirmation_interval(5, 10).unwrap();
    assert!((lu - (1.0 - hu)).abs() < 1e-9);
}

#[test]
fn scenario_rules_parse_through_registry_json() {
    let value = load_fixture_value("formula/single_rule_scenario.json");
    let rules = serde_json::to_string(&value["rules"]).unwrap();
    let registry = RuleRegistry::from_json(&rules).unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.rules()[0].kind, RuleKind::Iff);
    assert_eq!(registry.rules()[1].kind, RuleKind::Implies);
}

#[test]
fn libation_registry_over_fixture() {
    let corpus = libation();
    let extraction = FormulaAnalyzer::new(SlotTemplate::libation(), 2)
        .unwrap()
        .extract(&corpus);
    let outcomes = RuleTester::new(1, 0.5).test_all(&RuleRegistry::libation(), &extraction.variants);
    assert_eq!(outcomes.len(), 5);

    for o in &outcomes {
        assert!(o.confirmed_count <= o.tested_count);
        assert_eq!(o.tested_count == 0, o.verdict == RuleVerdict::Untestable);
    }

    // One confirming and one violating instance: a tie is not a confirmation.
    let rule_i = &outcomes[0];
    assert_eq!((rule_i.confirmed_count, rule_i.tested_count), (1, 2));
    assert_eq!(rule_i.verdict, RuleVerdict::Contradicted);

    let summary = RuleTester::summarize(&outcomes);
    assert_eq!(summary.rules, 5);
    assert_eq!(summary.untestable, 4);
    assert_eq!(summary.instances_tested, 2);
    assert_eq!(summary.confirmation_rate, Some(0.5));
}

// ─── Extraction ─────────────────────────────────────────────────────────────

#[test]
fn variants_keep_slot_order_and_completeness() {
    let corpus = libation();
    let extraction = FormulaAnalyzer::new(SlotTemplate::libation(), 2)
        .unwrap()
        .extract(&corpus);

    let pk12 = extraction
        .variants
        .iter()
        .find(|v| v.inscription.as_str() == "PK Za 12")
        .unwrap();
    assert_eq!(pk12.present_labels(), ["alpha", "beta", "gamma", "delta"]);
    assert_eq!(pk12.absent_labels(), ["epsilon", "zeta"]);
    assert!(!pk12.complete);
    assert_eq!(pk12.slot("gamma").unwrap().text, "JA-SA-SA-RA-ME");

    let io6 = extraction
        .variants
        .iter()
        .find(|v| v.inscription.as_str() == "IO Za 6")
        .unwrap();
    assert_eq!(io6.present_count(), 2);
    assert!(io6.slot("beta").is_none());
}

#[test]
fn threshold_excludes_rather_than_pads() {
    let corpus = libation();
    let extraction = FormulaAnalyzer::new(SlotTemplate::libation(), 3)
        .unwrap()
        .extract(&corpus);
    assert_eq!(extraction.variants.len(), 2);
    assert_eq!(extraction.excluded.len(), 1);
    assert_eq!(extraction.excluded[0].as_str(), "IO Za 6");
    assert_eq!(extraction.scanned, 3);
}

#[test]
fn missing_mandatory_slot_excludes() {
    let corpus = Corpus::load(vec![RawInscription::from_words(
        "X 1",
        "PK",
        &["A-TA-I-*301-WA-JA DI-KI-TE U-NA-KA-NA-SI"],
        &[],
    )])
    .unwrap();
    let extraction = FormulaAnalyzer::new(SlotTemplate::libation(), 2)
        .unwrap()
        .extract(&corpus);
    assert!(extraction.variants.is_empty());
    assert_eq!(extraction.excluded.len(), 1);
}

#[test]
fn optional_slot_yields_to_later_mandatory_slot() {
    let corpus = Corpus::load(vec![
        RawInscription::from_words("A 1", "PK", &["JA-SA-SA-RA-ME U-NA-KA-NA-SI"], &[]),
        RawInscription::from_words("B 1", "PK", &["JA-DI-KI-TU JA-SA-SA-RA-ME"], &[]),
    ])
    .unwrap();
    let template = SlotTemplate::new(
        "ja",
        vec![
            SlotSpec::new("alpha", SignPredicate::starts_with("JA")),
            SlotSpec::new("gamma", SignPredicate::starts_with("JA-SA")).mandatory(),
        ],
    )
    .unwrap();
    let extraction = FormulaAnalyzer::new(template, 1).unwrap().extract(&corpus);
    assert!(extraction.excluded.is_empty());

    let a = extraction.variants.iter().find(|v| v.inscription.as_str() == "A 1").unwrap();
    assert!(a.slot("alpha").is_none());
    assert_eq!(a.slot("gamma").unwrap().text, "JA-SA-SA-RA-ME");

    let b = extraction.variants.iter().find(|v| v.inscription.as_str() == "B 1").unwrap();
    assert_eq!(b.slot("alpha").unwrap().text, "JA-DI-KI-TU");
    assert_eq!(b.slot("gamma").unwrap().text, "JA-SA-SA-RA-ME");
}

#[test]
fn threshold_larger_than_template_is_rejected() {
    let err = FormulaAnalyzer::new(SlotTemplate::libation(), 7).err().unwrap();
    assert_eq!(
        err,
        AnalysisError::ThresholdExceedsTemplate {
            min_slots: 7,
            template_size: 6
        }
    );
}

// ─── Rules ──────────────────────────────────────────────────────────────────

#[test]
fn illegible_sign_makes_instance_undecidable() {
    let corpus = Corpus::load(vec![
        RawInscription::from_words("A", "PK", &["A-TA-I-*301-WA-? JA-SA-SA-RA-ME"], &[]),
        RawInscription::from_words("B", "PK", &["A-TA-I-*301-WA-JA JA-SA-SA-RA-ME"], &[]),
    ])
    .unwrap();
    let template = SlotTemplate::new(
        "pair",
        vec![
            SlotSpec::new("alpha", SignPredicate::starts_with("A-TA-I")).mandatory(),
            SlotSpec::new("gamma", SignPredicate::contains("SA-SA-RA")).mandatory(),
        ],
    )
    .unwrap();
    let rule = AgreementRule {
        id: "J".into(),
        description: String::new(),
        kind: RuleKind::Implies,
        antecedent: SlotCondition::new("alpha", SignPredicate::ends_with("JA")),
        consequent: SlotCondition::new("gamma", SignPredicate::starts_with("JA")),
    };
    let variants = FormulaAnalyzer::new(template, 2).unwrap().extract(&corpus).variants;
    let outcome = RuleTester::new(1, 0.5).test(&rule, &variants);
    assert_eq!(outcome.tested_count, 1);
    assert_eq!(outcome.undecidable_count, 1);
    assert_eq!(outcome.confirming_examples[0].as_str(), "B");
}

#[test]
fn rule_referencing_unknown_slot_fails_validation() {
    let registry = registry(vec![AgreementRule {
        id: "X".into(),
        description: String::new(),
        kind: RuleKind::Implies,
        antecedent: SlotCondition::new("omega", SignPredicate::ends_with("E")),
        consequent: SlotCondition::new("gamma", SignPredicate::ends_with("NA")),
    }]);
    assert!(matches!(
        registry.validate_against(&SlotTemplate::libation()),
        Err(AnalysisError::UnknownSlot { .. })
    ));
}

// ─── Suffixes ───────────────────────────────────────────────────────────────

#[test]
fn suffix_profile_and_inventory() {
    let corpus = libation();
    let extraction = FormulaAnalyzer::new(SlotTemplate::libation(), 2)
        .unwrap()
        .extract(&corpus);
    let profile = SuffixProfile::from_variants(&extraction.variants);
    assert_eq!(profile.endings("gamma"), ["ME"]);

    let inventory = SuffixInventory::from_corpus(&corpus);
    assert!(inventory.attested(2).contains(&"ME".to_string()));
    assert!(inventory.share("ME") > 0.0);
    assert_eq!(inventory.share("ZZ"), 0.0);
}
