//! Property tests for the aggregation laws: certainty-factor combination
//! and max aggregation must not care about rule or contribution order, and
//! membership degrees must stay inside [0, 1].

use kompos_core::{
    Combinator, FuzzySet, QualityBand, Reading, Rule, RuleTable, ScoringSpec, SetShape, Variable,
};
use kompos_fuzzy::{combine_cf, max_strength, FuzzyEngine};
use proptest::prelude::*;

fn contributions_and_permutation() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec(0.0..=1.0f64, 1..10)
        .prop_flat_map(|values| (Just(values.clone()), Just(values).prop_shuffle()))
}

fn demo_variables() -> Vec<Variable> {
    vec![
        Variable::numeric(
            "a",
            0.0,
            10.0,
            vec![
                FuzzySet::new(
                    "low",
                    SetShape::RampLow {
                        shoulder: 2.0,
                        foot: 8.0,
                    },
                ),
                FuzzySet::new(
                    "high",
                    SetShape::RampHigh {
                        foot: 2.0,
                        shoulder: 8.0,
                    },
                ),
            ],
        ),
        Variable::numeric(
            "b",
            0.0,
            10.0,
            vec![
                FuzzySet::new(
                    "low",
                    SetShape::RampLow {
                        shoulder: 3.0,
                        foot: 7.0,
                    },
                ),
                FuzzySet::new(
                    "high",
                    SetShape::RampHigh {
                        foot: 3.0,
                        shoulder: 7.0,
                    },
                ),
            ],
        ),
        Variable::scored(
            "score",
            ScoringSpec {
                min: 0.0,
                max: 100.0,
                step: 1.0,
                bands: vec![
                    QualityBand::new(50.0, "poor"),
                    QualityBand::new(100.0, "good"),
                ],
                overrides: vec![],
            },
            vec![
                FuzzySet::new(
                    "poor",
                    SetShape::RampLow {
                        shoulder: 30.0,
                        foot: 50.0,
                    },
                ),
                FuzzySet::new(
                    "good",
                    SetShape::Triangle {
                        left: 50.0,
                        peak: 75.0,
                        right: 100.0,
                    },
                ),
            ],
        ),
        Variable::concluded("verdict", &["Alert", "Calm"]),
    ]
}

fn demo_rules() -> Vec<Rule> {
    vec![
        Rule::new("r1").when("a", "low").when("b", "low").then("score", "good"),
        Rule::new("r2")
            .when("a", "high")
            .when("b", "high")
            .with_combinator(Combinator::Or)
            .then("score", "poor"),
        Rule::new("r3")
            .when("a", "high")
            .then("verdict", "Alert")
            .with_weight(0.85),
        Rule::new("r4")
            .when("b", "high")
            .then("verdict", "Alert")
            .with_weight(0.6),
        Rule::new("r5")
            .when("a", "low")
            .when("b", "low")
            .then("verdict", "Calm")
            .with_weight(0.9),
        Rule::new("veto")
            .when("a", "high")
            .when("b", "high")
            .then("score", "poor")
            .as_override(),
    ]
}

proptest! {
    #[test]
    fn cf_combination_is_order_independent(
        (original, permuted) in contributions_and_permutation()
    ) {
        prop_assert_eq!(combine_cf(&original), combine_cf(&permuted));
    }

    #[test]
    fn cf_combination_stays_in_unit_range(
        values in prop::collection::vec(0.0..=1.0f64, 0..12)
    ) {
        let combined = combine_cf(&values);
        prop_assert!((0.0..=1.0).contains(&combined));
    }

    #[test]
    fn cf_combination_grows_with_more_evidence(
        values in prop::collection::vec(0.0..=1.0f64, 1..10)
    ) {
        for cut in 1..values.len() {
            prop_assert!(combine_cf(&values[..cut]) <= combine_cf(&values));
        }
    }

    #[test]
    fn max_aggregation_is_order_independent(
        (original, permuted) in contributions_and_permutation()
    ) {
        prop_assert_eq!(max_strength(&original), max_strength(&permuted));
        prop_assert_eq!(
            max_strength(&original),
            original.iter().copied().fold(0.0, f64::max)
        );
    }

    #[test]
    fn rule_order_never_changes_the_report(
        shuffled in Just(demo_rules()).prop_shuffle(),
        a in 0.0..=10.0f64,
        b in 0.0..=10.0f64,
    ) {
        let baseline =
            FuzzyEngine::new(demo_variables(), RuleTable::new(demo_rules())).unwrap();
        let reordered =
            FuzzyEngine::new(demo_variables(), RuleTable::new(shuffled)).unwrap();

        let reading = Reading::new().with("a", a).with("b", b);
        prop_assert_eq!(baseline.infer(&reading), reordered.infer(&reading));
    }

    #[test]
    fn triangle_membership_stays_in_unit_range(
        left in -100.0..100.0f64,
        rise in 0.1..50.0f64,
        fall in 0.1..50.0f64,
        x in -200.0..300.0f64,
    ) {
        let shape = SetShape::Triangle {
            left,
            peak: left + rise,
            right: left + rise + fall,
        };
        let degree = shape.membership(x);
        prop_assert!((0.0..=1.0).contains(&degree));
    }
}
