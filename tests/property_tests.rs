//! Property-based tests using proptest.
//!
//! These tests check invariants of the risk rules, the scaler and the trained
//! classifier over generated inputs.

use std::sync::OnceLock;

use proptest::prelude::*;
use stress2health::prelude::*;
use stress2health::risk::{assess_obesity_risk, bmi_category};

fn level_strategy() -> impl Strategy<Value = Level> {
    prop_oneof![Just(Level::Low), Just(Level::Medium), Just(Level::High)]
}

fn sample_strategy() -> impl Strategy<Value = LifestyleSample> {
    (
        0.0f32..=24.0,
        10.0f32..=50.0,
        level_strategy(),
        0.0f32..=24.0,
        level_strategy(),
    )
        .prop_map(|(sleep, bmi, activity, work, social)| {
            LifestyleSample::new(sleep, bmi, activity, work, social)
                .expect("Generated sample should be in range")
        })
}

// Strategy for small matrices with the encoder's feature width
fn matrix_strategy(rows: usize) -> impl Strategy<Value = Matrix<f32>> {
    proptest::collection::vec(-100.0f32..100.0, rows * 4).prop_map(move |data| {
        Matrix::from_vec(rows, 4, data).expect("Test data should be valid")
    })
}

/// One classifier per strategy, trained once on noisy clusters that
/// only use two of the three labels.
fn classifiers() -> &'static Vec<StressClassifier> {
    static TRAINED: OnceLock<Vec<StressClassifier>> = OnceLock::new();
    TRAINED.get_or_init(|| {
        let mut data = Vec::new();
        for i in 0..30 {
            let d = (i % 6) as f32 * 0.3;
            data.push(LabeledSample::with_level(
                LifestyleSample::new(4.0 + d, 28.0, Level::Low, 12.0 - d, Level::Low)
                    .expect("valid"),
                Level::High,
            ));
            data.push(LabeledSample::with_level(
                LifestyleSample::new(8.0 - d, 21.0, Level::High, 6.0 + d, Level::Medium)
                    .expect("valid"),
                Level::Low,
            ));
        }
        ModelKind::ALL
            .iter()
            .map(|&kind| {
                let mut clf = StressClassifier::new(TrainingConfig::for_model(kind));
                clf.train(&data).expect("Failed to train");
                clf
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn assessment_is_pure(
        stress in level_strategy(),
        bmi in 10.0f32..50.0,
        activity in level_strategy(),
        sleep in 0.0f32..24.0,
    ) {
        let a = comprehensive_assessment(stress, bmi, activity, sleep);
        let b = comprehensive_assessment(stress, bmi, activity, sleep);
        prop_assert_eq!(a, b);
        prop_assert_eq!(a.overall_stress, stress);
        prop_assert_eq!(a.bmi_category, bmi_category(bmi));
    }

    #[test]
    fn obese_bmi_always_high_obesity_risk(
        stress in level_strategy(),
        bmi in 30.0f32..50.0,
        activity in level_strategy(),
        sleep in 0.0f32..24.0,
    ) {
        prop_assert_eq!(assess_obesity_risk(stress, bmi, activity, sleep), RiskLevel::High);
    }

    #[test]
    fn bmi_category_is_monotone(a in 10.0f32..50.0, b in 10.0f32..50.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(bmi_category(lo) as u8 <= bmi_category(hi) as u8);
    }

    #[test]
    fn guidance_sections_match_risks(
        stress in level_strategy(),
        bmi in 10.0f32..50.0,
        activity in level_strategy(),
        sleep in 0.0f32..24.0,
    ) {
        let assessment = comprehensive_assessment(stress, bmi, activity, sleep);
        let guidance = guide(&assessment);
        prop_assert_eq!(guidance.high_priority.len(), assessment.high_risks().len());
        prop_assert_eq!(guidance.preventive.len(), assessment.medium_risks().len());
        prop_assert!(guidance.stress_tips.len() <= 5);
        prop_assert!(quick_tips(&assessment).len() <= 5);
    }

    #[test]
    fn scaler_inverse_roundtrip(x in matrix_strategy(8)) {
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&x).expect("fit");
        let restored = scaler.inverse_transform(&scaled).expect("inverse");
        for (orig, back) in x.as_slice().iter().zip(restored.as_slice()) {
            prop_assert!((orig - back).abs() < 1e-2, "{} vs {}", orig, back);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    #[test]
    fn probabilities_form_a_distribution(sample in sample_strategy()) {
        for clf in classifiers() {
            let proba = clf.predict_proba(&sample).expect("proba");
            prop_assert_eq!(proba.len(), 2);
            let total: f32 = proba.values().sum();
            prop_assert!((total - 1.0).abs() < 1e-4, "{}: {}", clf.model_kind(), total);
            prop_assert!(proba.values().all(|p| (0.0..=1.0 + 1e-6).contains(p)));
        }
    }

    #[test]
    fn predictions_only_use_training_labels(sample in sample_strategy()) {
        for clf in classifiers() {
            let level = clf.predict(&sample).expect("predict");
            prop_assert_ne!(level, Level::Medium);
        }
    }
}
