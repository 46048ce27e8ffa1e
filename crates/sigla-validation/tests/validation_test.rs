//! Validation procedures against the scoring fixtures and the reference families.

use serde::Deserialize;
use sigla_core::config::{NegativeControlConfig, ValidationConfig};
use sigla_scoring::reference::{corpus_profile, families, linear_b_control};
use sigla_scoring::{CandidateRow, DimensionResolver, DimensionSchema, ScoreMatrix, WeightVector};
use sigla_validation::{
    Ablation, AblationVerdict, Bootstrap, LexicalControl, NegativeControl, PermutationTest,
    Perturbation, Significance, ValidationEngine, ValidationStatus, ValidationTest,
};
use std::collections::BTreeMap;
use test_fixtures::load_fixture;

#[derive(Deserialize)]
struct FixtureRow {
    id: String,
    scores: Vec<f64>,
}

#[derive(Deserialize)]
struct DominantFixture {
    dimensions: Vec<String>,
    candidates: Vec<FixtureRow>,
    expected_leader: String,
    min_win_rate: f64,
}

#[derive(Deserialize)]
struct ControlFixture {
    dimensions: Vec<String>,
    candidates: Vec<FixtureRow>,
    control: FixtureRow,
}

#[derive(Deserialize)]
struct AblationFixture {
    dimensions: Vec<String>,
    weights: BTreeMap<String, f64>,
    candidates: Vec<FixtureRow>,
    zero_weight_dimension: String,
    separating_dimension: String,
}

fn uniform(dimensions: &[String]) -> WeightVector {
    WeightVector::uniform(&DimensionSchema::from_ids(dimensions)).unwrap()
}

fn rows(candidates: Vec<FixtureRow>) -> Vec<(String, Vec<f64>)> {
    candidates.into_iter().map(|c| (c.id, c.scores)).collect()
}

fn dominant() -> (DominantFixture, ScoreMatrix, WeightVector) {
    let mut fixture: DominantFixture = load_fixture("scoring/dominant_candidate.json");
    let candidates = std::mem::take(&mut fixture.candidates);
    let matrix = ScoreMatrix::from_rows(&fixture.dimensions, rows(candidates)).unwrap();
    let weights = uniform(&fixture.dimensions);
    (fixture, matrix, weights)
}

fn reference_matrix() -> (ScoreMatrix, WeightVector) {
    let schema = DimensionSchema::standard();
    let mut all = families();
    all.push(linear_b_control());
    let matrix = DimensionResolver::new(schema.clone())
        .resolve(&corpus_profile(), &all)
        .unwrap();
    (matrix, WeightVector::uniform(&schema).unwrap())
}

// ─── Bootstrap ──────────────────────────────────────────────────────────────

#[test]
fn dominant_candidate_wins_ten_thousand_resamples() {
    let (fixture, matrix, weights) = dominant();
    let report = Bootstrap::new(10_000, 42).run(&matrix, &weights).unwrap();

    assert_eq!(report.leader.as_deref(), Some(fixture.expected_leader.as_str()));
    assert!(report.leader_win_rate >= fixture.min_win_rate, "{}", report.leader_win_rate);
    assert_eq!(report.significance, Significance::P05);
    assert_eq!(report.status, ValidationStatus::Pass);
    assert!((report.leader_rank_distribution[0] - report.leader_win_rate).abs() < 1e-12);

    let leader = &report.candidates[0];
    let interval = leader.interval.unwrap();
    assert!(interval.low <= leader.mean_composite && leader.mean_composite <= interval.high);
}

#[test]
fn bootstrap_is_reproducible_from_the_seed() {
    let (_, matrix, weights) = dominant();
    let a = Bootstrap::new(500, 99).with_jitter(true).run(&matrix, &weights).unwrap();
    let b = Bootstrap::new(500, 99).with_jitter(true).run(&matrix, &weights).unwrap();
    assert_eq!(a, b);
}

#[test]
fn jitter_within_uncertainty_moves_the_interval() {
    let dims = ["x", "y"];
    let mut a = CandidateRow::new("a", vec![0.6, 0.6]);
    a.uncertainty = vec![0.2, 0.2];
    let b = CandidateRow::new("b", vec![0.5, 0.5]);
    let matrix = ScoreMatrix::new(dims.iter().map(|d| d.to_string()).collect(), vec![a, b]).unwrap();
    let weights = WeightVector::uniform(&DimensionSchema::from_ids(dims)).unwrap();

    let still = Bootstrap::new(1_000, 5).run(&matrix, &weights).unwrap();
    let jittered = Bootstrap::new(1_000, 5).with_jitter(true).run(&matrix, &weights).unwrap();
    assert_eq!(still.win_rate("a"), Some(1.0));
    assert!(jittered.win_rate("a").unwrap() < 1.0);
}

// ─── Permutation ────────────────────────────────────────────────────────────

#[test]
fn dominant_candidate_is_significant_under_permutation() {
    let (_, matrix, weights) = dominant();
    let report = PermutationTest::new(2_000, 42).run(&matrix, &weights).unwrap();
    assert!(report.p_value < 0.05, "p = {}", report.p_value);
    assert_eq!(report.status, ValidationStatus::Pass);
    assert_eq!(report.outcome().test, ValidationTest::Permutation);
}

// ─── Ablation ───────────────────────────────────────────────────────────────

#[test]
fn ablation_fixture_exercises_both_cases() {
    let fixture: AblationFixture = load_fixture("scoring/ablation_cases.json");
    let schema = DimensionSchema::from_ids(&fixture.dimensions);
    let weights = WeightVector::from_map(&schema, &fixture.weights).unwrap();
    let matrix = ScoreMatrix::from_rows(&fixture.dimensions, rows(fixture.candidates)).unwrap();

    let report = Ablation.run(&matrix, &weights).unwrap();
    let by_dim = |d: &str| report.dimensions.iter().find(|a| a.dimension == d).unwrap();

    let ignored = by_dim(&fixture.zero_weight_dimension);
    assert!(!ignored.leader_changed);
    assert!(ignored.composite_delta.abs() < 1e-12);

    let separator = by_dim(&fixture.separating_dimension);
    assert!(separator.leader_changed);
    assert_eq!(report.flipping_dimensions(), [fixture.separating_dimension.as_str()]);
    assert_eq!(report.verdict, AblationVerdict::LargelyRobust);
    assert_eq!(report.warnings().len(), 1);
}

// ─── Negative control ───────────────────────────────────────────────────────

#[test]
fn unrelated_control_ranks_below_every_candidate() {
    let fixture: ControlFixture = load_fixture("reference/negative_control.json");
    let mut candidate_rows: Vec<CandidateRow> = fixture
        .candidates
        .into_iter()
        .map(|c| CandidateRow::new(&c.id, c.scores))
        .collect();
    candidate_rows.push(CandidateRow::new(&fixture.control.id, fixture.control.scores).as_control());
    let matrix = ScoreMatrix::new(fixture.dimensions.clone(), candidate_rows).unwrap();

    let report = NegativeControl::default().run(&matrix, &uniform(&fixture.dimensions)).unwrap();
    let control = &report.controls[0];
    assert_eq!(report.status, ValidationStatus::Pass);
    assert_eq!(control.rank, control.field);
    assert_eq!(control.outranks, 0);
}

#[test]
fn linear_b_passes_the_reference_control() {
    let (matrix, weights) = reference_matrix();
    let report = NegativeControl::default().run(&matrix, &weights).unwrap();
    let control = &report.controls[0];
    assert_eq!(control.control, "linear_b_control");
    assert!(control.passed);
    assert!(control.composite < 0.55);
    assert!(control.rank > 2);
}

// ─── Perturbation ───────────────────────────────────────────────────────────

#[test]
fn dominant_candidate_survives_default_noise() {
    let (_, matrix, weights) = dominant();
    let report = Perturbation::new(500, 42).run(&matrix, &weights).unwrap();
    assert_eq!(report.levels.len(), 5);
    for level in &report.levels {
        assert!(level.survival_rate >= 0.9, "p={} survival {}", level.level, level.survival_rate);
    }
    assert_eq!(report.status, ValidationStatus::Pass);
}

// ─── Lexical ────────────────────────────────────────────────────────────────

#[test]
fn lexical_control_reports_null_percentiles() {
    let report = LexicalControl::reference().with_iterations(300).with_seed(7).run();
    assert_eq!(report.words, 9);
    assert!(report.p95 <= report.p99);
    assert!((0.0..=1.0).contains(&report.p_value));
    assert!(report.actual > 0.25 && report.actual < 0.4, "{}", report.actual);
    assert!(report.null_mean > 0.0);
}

// ─── Engine ─────────────────────────────────────────────────────────────────

#[test]
fn engine_runs_every_procedure_on_the_reference_families() {
    let (matrix, weights) = reference_matrix();
    let config = ValidationConfig {
        bootstrap_iterations: Some(1_000),
        permutation_iterations: Some(1_000),
        perturbation_trials: Some(200),
        lexical_iterations: Some(200),
        ..Default::default()
    };
    let engine = ValidationEngine::from_config(&config, &NegativeControlConfig::default())
        .with_lexical(LexicalControl::reference().configured(&config));
    let report = engine.run_all(&matrix, &weights).unwrap();

    assert_eq!(report.outcomes.len(), 7);
    assert!(report.is_valid());
    assert_eq!(report.bootstrap.leader.as_deref(), Some("hurro_urartian"));
    assert_eq!(report.ablation.verdict, AblationVerdict::Robust);
    assert!(report.outcomes.iter().all(|o| o.status != ValidationStatus::Insufficient));
}

#[test]
fn engine_reports_insufficient_for_a_single_candidate() {
    let matrix = ScoreMatrix::from_rows(&["x"], vec![("only".to_string(), vec![0.7])]).unwrap();
    let weights = WeightVector::uniform(&DimensionSchema::from_ids(["x"])).unwrap();
    let config = ValidationConfig {
        bootstrap_iterations: Some(50),
        permutation_iterations: Some(50),
        perturbation_trials: Some(50),
        ..Default::default()
    };
    let report = ValidationEngine::from_config(&config, &NegativeControlConfig::default())
        .run_all(&matrix, &weights)
        .unwrap();
    assert!(report
        .outcomes
        .iter()
        .all(|o| o.status == ValidationStatus::Insufficient));
    assert!(report.warnings.is_empty());
}
