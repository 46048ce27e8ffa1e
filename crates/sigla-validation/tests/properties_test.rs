//! Property tests over randomly generated score matrices.

use proptest::prelude::*;
use sigla_scoring::{CandidateScorer, DimensionSchema, ScoreMatrix, WeightVector};
use sigla_validation::{Ablation, Bootstrap, PermutationTest};

fn matrix_strategy() -> impl Strategy<Value = ScoreMatrix> {
    proptest::collection::vec(proptest::collection::vec(0.0f64..=1.0, 4), 2..6).prop_map(|rows| {
        ScoreMatrix::from_rows(
            &["a", "b", "c", "d"],
            rows.into_iter()
                .enumerate()
                .map(|(i, s)| (format!("cand_{i}"), s))
                .collect(),
        )
        .unwrap()
    })
}

fn weights() -> WeightVector {
    WeightVector::uniform(&DimensionSchema::from_ids(["a", "b", "c", "d"])).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn bootstrap_win_rates_sum_to_one(matrix in matrix_strategy(), seed in any::<u64>()) {
        let report = Bootstrap::new(200, seed).run(&matrix, &weights()).unwrap();
        let total: f64 = report.candidates.iter().map(|c| c.win_rate).sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
        let ranks: f64 = report.leader_rank_distribution.iter().sum();
        prop_assert!((ranks - 1.0).abs() < 1e-9);
    }

    #[test]
    fn permutation_p_value_is_a_probability(matrix in matrix_strategy(), seed in any::<u64>()) {
        let report = PermutationTest::new(100, seed).run(&matrix, &weights()).unwrap();
        prop_assert!((0.0..=1.0).contains(&report.p_value));
        prop_assert!(report.exceedances <= report.iterations);
    }

    #[test]
    fn ablation_never_touches_the_baseline(matrix in matrix_strategy()) {
        let before = CandidateScorer::rank(&matrix, &weights()).unwrap();
        let report = Ablation.run(&matrix, &weights()).unwrap();
        let after = CandidateScorer::rank(&matrix, &weights()).unwrap();
        prop_assert_eq!(before.clone(), after);
        prop_assert_eq!(report.baseline_leader.as_deref(), before.leader().map(|r| r.candidate.as_str()));
        prop_assert_eq!(report.dimensions.len(), 4);
    }
}
