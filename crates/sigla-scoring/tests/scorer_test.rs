//! Tests for the candidate scorer: purity, ordering, ablation fixtures, invalid weights.

use proptest::prelude::*;
use serde::Deserialize;
use sigla_core::errors::{InvalidWeightingError, ScoringError};
use sigla_scoring::{CandidateScorer, DimensionSchema, ScoreMatrix, WeightVector};
use std::collections::BTreeMap;
use test_fixtures::load_fixture;

#[derive(Deserialize)]
struct FixtureCandidate {
    id: String,
    scores: Vec<f64>,
}

#[derive(Deserialize)]
struct AblationFixture {
    dimensions: Vec<String>,
    weights: BTreeMap<String, f64>,
    candidates: Vec<FixtureCandidate>,
    zero_weight_dimension: String,
    separating_dimension: String,
    leader: String,
    leader_without_separator: String,
}

fn ablation() -> (AblationFixture, ScoreMatrix, WeightVector) {
    let fixture: AblationFixture = load_fixture("scoring/ablation_cases.json");
    let matrix = ScoreMatrix::from_rows(
        &fixture.dimensions,
        fixture
            .candidates
            .iter()
            .map(|c| (c.id.clone(), c.scores.clone()))
            .collect(),
    )
    .unwrap();
    let schema = DimensionSchema::from_ids(fixture.dimensions.iter());
    let weights = WeightVector::from_map(&schema, &fixture.weights).unwrap();
    (fixture, matrix, weights)
}

#[test]
fn ranking_is_idempotent() {
    let (_, matrix, weights) = ablation();
    let first = CandidateScorer::rank(&matrix, &weights).unwrap();
    let second = CandidateScorer::rank(&matrix, &weights).unwrap();
    assert_eq!(first, second);
}

#[test]
fn contributions_sum_to_composite() {
    let (_, matrix, weights) = ablation();
    let table = CandidateScorer::rank(&matrix, &weights).unwrap();
    for result in &table.results {
        let sum: f64 = result.dimensions.iter().map(|d| d.contribution).sum();
        assert!((sum - result.composite).abs() < 1e-12);
    }
}

#[test]
fn zero_weight_dimension_does_not_move_the_ranking() {
    let (fixture, matrix, weights) = ablation();
    let full = CandidateScorer::rank(&matrix, &weights).unwrap();
    let without = weights.without(&fixture.zero_weight_dimension).unwrap();
    let ablated = CandidateScorer::rank(&matrix, &without).unwrap();

    assert_eq!(full.order(), ablated.order());
    for (a, b) in full.results.iter().zip(&ablated.results) {
        assert!((a.composite - b.composite).abs() < 1e-12);
    }
}

#[test]
fn removing_the_separator_changes_the_leader() {
    let (fixture, matrix, weights) = ablation();
    let full = CandidateScorer::rank(&matrix, &weights).unwrap();
    assert_eq!(full.leader().unwrap().candidate, fixture.leader);

    let without = weights.without(&fixture.separating_dimension).unwrap();
    let ablated = CandidateScorer::rank(&matrix, &without).unwrap();
    assert_eq!(ablated.leader().unwrap().candidate, fixture.leader_without_separator);
}

#[test]
fn ties_break_by_candidate_id() {
    let matrix = ScoreMatrix::from_rows(
        &["x", "y"],
        vec![
            ("zeta".to_string(), vec![0.5, 0.5]),
            ("alpha".to_string(), vec![0.5, 0.5]),
            ("mid".to_string(), vec![0.2, 0.2]),
        ],
    )
    .unwrap();
    let weights = WeightVector::uniform(&DimensionSchema::from_ids(["x", "y"])).unwrap();
    let table = CandidateScorer::rank(&matrix, &weights).unwrap();
    assert_eq!(table.order(), ["alpha", "zeta", "mid"]);
    assert_eq!(table.gap(), Some(0.0));
}

#[test]
fn unnormalized_weights_are_rejected_before_scoring() {
    let (_, matrix, _) = ablation();
    let schema = DimensionSchema::from_ids(["separator", "shared_a"]);
    let err = WeightVector::new(&schema, &[("separator", 0.7), ("shared_a", 0.7)]).unwrap_err();
    assert!(matches!(err, InvalidWeightingError::NotNormalized { .. }));

    let negative = WeightVector::new(&schema, &[("separator", 1.5), ("shared_a", -0.5)]).unwrap_err();
    assert!(matches!(negative, InvalidWeightingError::Negative { .. }));

    let unknown = WeightVector::new(&DimensionSchema::from_ids(["elsewhere"]), &[("elsewhere", 1.0)]).unwrap();
    assert!(matches!(
        CandidateScorer::rank(&matrix, &unknown),
        Err(ScoringError::InvalidWeighting(InvalidWeightingError::UnknownDimension { .. }))
    ));
}

#[test]
fn controls_do_not_count_towards_degeneracy() {
    let matrix = ScoreMatrix::new(
        vec!["x".to_string()],
        vec![
            sigla_scoring::CandidateRow::new("only", vec![0.6]),
            sigla_scoring::CandidateRow::new("control", vec![0.2]).as_control(),
        ],
    )
    .unwrap();
    let weights = WeightVector::uniform(&DimensionSchema::from_ids(["x"])).unwrap();
    let table = CandidateScorer::rank(&matrix, &weights).unwrap();
    assert!(table.is_degenerate());
    assert!(table.get("control").unwrap().control);
}

proptest! {
    #[test]
    fn ranking_ignores_input_order(
        scores in proptest::collection::vec(proptest::collection::vec(0.0f64..=1.0, 3), 2..7),
        rotate in 0usize..6,
    ) {
        let rows: Vec<(String, Vec<f64>)> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| (format!("c{i}"), s.clone()))
            .collect();
        let mut rotated = rows.clone();
        let n = rotated.len();
        rotated.rotate_left(rotate % n);

        let dims = ["a", "b", "c"];
        let weights = WeightVector::new(
            &DimensionSchema::from_ids(dims),
            &[("a", 0.5), ("b", 0.3), ("c", 0.2)],
        ).unwrap();
        let original = CandidateScorer::rank(&ScoreMatrix::from_rows(&dims, rows).unwrap(), &weights).unwrap();
        let shuffled = CandidateScorer::rank(&ScoreMatrix::from_rows(&dims, rotated).unwrap(), &weights).unwrap();

        prop_assert_eq!(original.order(), shuffled.order());
        for r in &original.results {
            prop_assert!(r.composite >= 0.0 && r.composite <= 1.0 + 1e-12);
        }
    }
}
