use proptest::prelude::*;
use stenoscore::{
    align::{self, EditTable, WordOp},
    engine::{Engine, EvaluateOptions},
    language::Language,
    speed::ScoringMode,
};

// --- STRATEGIES ---

// a small vocabulary so equal words are common
fn arb_words(max: usize) -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(
        prop_oneof![
            Just("the".to_string()),
            Just("The".to_string()),
            Just("new".to_string()),
            Just("york".to_string()),
            Just("newyork".to_string()),
            Just("cats".to_string()),
            Just("cat".to_string()),
            Just("50%".to_string()),
            Just("percent".to_string()),
            Just("over.".to_string()),
            "[a-z]{1,4}",
        ],
        0..max,
    )
}

fn reference_coverage(ops: &[WordOp]) -> Vec<usize> {
    ops.iter().flat_map(WordOp::reference_indices).collect()
}

fn typed_coverage(ops: &[WordOp]) -> Vec<usize> {
    ops.iter().filter_map(WordOp::typed_index).collect()
}

proptest! {
    #[test]
    fn alignment_covers_both_sequences_in_order(
        reference in arb_words(20),
        typed in arb_words(20),
    ) {
        let ops = align::align(&reference, &typed);
        prop_assert_eq!(reference_coverage(&ops), (0..reference.len()).collect::<Vec<_>>());
        prop_assert_eq!(typed_coverage(&ops), (0..typed.len()).collect::<Vec<_>>());
    }

    #[test]
    fn alignment_cost_is_the_edit_distance(
        reference in arb_words(20),
        typed in arb_words(20),
    ) {
        let ops = align::align(&reference, &typed);
        let cost: usize = ops.iter().map(WordOp::cost).sum();
        prop_assert_eq!(cost as u32, EditTable::build(&reference, &typed).distance());
    }

    #[test]
    fn equal_ops_carry_equal_words(
        reference in arb_words(20),
        typed in arb_words(20),
    ) {
        for op in align::align(&reference, &typed) {
            match op {
                WordOp::Equal { reference, typed, .. } => prop_assert_eq!(reference, typed),
                WordOp::Substitute { reference, typed, .. } => prop_assert_ne!(reference, typed),
                _ => {}
            }
        }
    }

    #[test]
    fn merging_is_idempotent_and_keeps_coverage(
        reference in arb_words(16),
        typed in arb_words(16),
    ) {
        let lower = |w: &str| w.to_lowercase();
        let ops = align::align(&reference, &typed);
        let once = align::merge_missing_spaces(ops.clone(), lower);
        let twice = align::merge_missing_spaces(once.clone(), lower);

        prop_assert!(once.len() <= ops.len());
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(reference_coverage(&once), (0..reference.len()).collect::<Vec<_>>());
        prop_assert_eq!(typed_coverage(&once), (0..typed.len()).collect::<Vec<_>>());
    }

    #[test]
    fn evaluation_stays_within_bounds(
        reference in arb_words(24),
        typed in arb_words(24),
        elapsed in -10.0..600.0f64,
        word_count in any::<bool>(),
        profile in prop_oneof![Just(None), Just(Some("HSSC_C")), Just(Some("SSC_D"))],
    ) {
        let engine = Engine::with_builtin_profiles().unwrap();
        let mode = if word_count { ScoringMode::WordCount } else { ScoringMode::Positional };
        let options = EvaluateOptions {
            exam_profile: profile.map(str::to_string),
            scoring_mode: mode,
        };
        let result = engine.evaluate(
            &reference.join(" "),
            &typed.join(" "),
            elapsed,
            Language::English,
            &options,
        );

        prop_assert!(result.elapsed_seconds >= 1.0);
        prop_assert!((0.0..=100.0).contains(&result.accuracy_percent));
        prop_assert!(result.net_wpm <= result.gross_wpm + 1e-9);
        prop_assert!(result.net_wpm >= 0.0);
        prop_assert_eq!(
            result.mistakes.len(),
            result.full_mistake_count + result.half_mistake_count + result.ignored_mistake_count
        );
        prop_assert_eq!(
            result.weighted_mistake_score,
            result.full_mistake_count as f64 + 0.5 * result.half_mistake_count as f64
        );
        prop_assert_eq!(result.passed, result.weighted_mistake_score <= result.allowed_max as f64);
    }
}
