use super::*;
use crate::config::TrainingConfig;

fn three_clusters() -> (Matrix<f32>, Vec<usize>) {
    let x = Matrix::from_vec(
        9,
        2,
        vec![
            -2.0, -2.0, -2.2, -1.8, -1.9, -2.1, // class 0
            0.0, 0.1, 0.1, -0.1, -0.1, 0.0, // class 1
            2.0, 2.0, 1.8, 2.2, 2.1, 1.9, // class 2
        ],
    )
    .expect("9x2 matrix with 18 values");
    (x, vec![0, 0, 0, 1, 1, 1, 2, 2, 2])
}

#[test]
fn test_softmax_in_place_sums_to_one() {
    let mut logits = vec![1.0, 2.0, 3.0];
    softmax_in_place(&mut logits);
    let sum: f32 = logits.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6);
    assert!(logits[2] > logits[1] && logits[1] > logits[0]);
}

#[test]
fn test_softmax_in_place_large_logits() {
    let mut logits = vec![1000.0, 1000.0];
    softmax_in_place(&mut logits);
    assert!((logits[0] - 0.5).abs() < 1e-6);
    assert!(logits.iter().all(|p| p.is_finite()));
}

#[test]
fn test_softmax_regression_builder() {
    let model = SoftmaxRegression::new()
        .with_learning_rate(0.5)
        .with_max_iter(10)
        .with_tolerance(1e-2)
        .with_l2(0.0);
    assert!((model.learning_rate - 0.5).abs() < 1e-6);
    assert_eq!(model.max_iter, 10);
    assert!(model.weights().is_none());
    assert!(model.n_classes().is_none());
}

#[test]
fn test_softmax_regression_separates_clusters() {
    let (x, y) = three_clusters();
    let mut model = SoftmaxRegression::new().with_max_iter(2000);
    model.fit(&x, &y).expect("fit");

    assert_eq!(model.n_classes(), Some(3));
    assert_eq!(model.predict(&x).expect("predict"), y);
    let weights = model.weights().expect("fitted");
    assert_eq!(weights.shape(), (3, 2));
    assert_eq!(model.intercepts().len(), 3);
}

#[test]
fn test_softmax_regression_proba_rows_sum_to_one() {
    let (x, y) = three_clusters();
    let mut model = SoftmaxRegression::new();
    model.fit(&x, &y).expect("fit");
    let proba = model.predict_proba(&x).expect("proba");
    for row in proba.rows() {
        let sum: f32 = row.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }
}

#[test]
fn test_softmax_regression_not_fitted() {
    let model = SoftmaxRegression::new();
    let x = Matrix::zeros(1, 2);
    assert!(matches!(model.predict(&x), Err(HealthError::ModelNotLoaded)));
}

#[test]
fn test_softmax_regression_width_mismatch() {
    let (x, y) = three_clusters();
    let mut model = SoftmaxRegression::new().with_max_iter(5);
    model.fit(&x, &y).expect("fit");
    let wrong = Matrix::zeros(1, 3);
    assert!(matches!(
        model.predict(&wrong),
        Err(HealthError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_softmax_regression_rejects_bad_inputs() {
    let (x, _) = three_clusters();
    let mut model = SoftmaxRegression::new();
    assert!(model.fit(&x, &[0, 1]).is_err());

    let mut model = SoftmaxRegression::new().with_learning_rate(0.0);
    let (x, y) = three_clusters();
    assert!(matches!(
        model.fit(&x, &y),
        Err(HealthError::InvalidHyperparameter { .. })
    ));
}

#[test]
fn test_model_kind_parse_and_display() {
    for kind in ModelKind::ALL {
        let parsed: ModelKind = kind.as_str().parse().expect("roundtrip");
        assert_eq!(parsed, kind);
        assert_eq!(kind.to_string(), kind.as_str());
    }
    assert_eq!(
        "Random-Forest".parse::<ModelKind>().expect("alias"),
        ModelKind::RandomForest
    );
    assert!("svm".parse::<ModelKind>().is_err());
    assert_eq!(ModelKind::default(), ModelKind::Logistic);
}

#[test]
fn test_model_kind_serde_snake_case() {
    let json = serde_json::to_string(&ModelKind::DecisionTree).expect("serialize");
    assert_eq!(json, "\"decision_tree\"");
}

#[test]
fn test_every_strategy_fits_and_normalises() {
    let (x, y) = three_clusters();
    for kind in ModelKind::ALL {
        let mut config = TrainingConfig::for_model(kind);
        config.forest.n_estimators = 10;
        config.neural.epochs = 30;
        let mut model = config.build_model();
        assert!(model.n_classes().is_none(), "{kind} fitted before fit");

        model.fit(&x, &y).expect("fit");
        assert_eq!(model.kind(), kind);
        assert_eq!(model.n_classes(), Some(3));

        let proba = model.predict_proba(&x).expect("proba");
        assert_eq!(proba.shape(), (9, 3));
        for row in proba.rows() {
            let sum: f32 = row.iter().sum();
            assert!((sum - 1.0).abs() < 1e-4, "{kind} row sums to {sum}");
        }
        assert!(model.predict(&x).expect("predict").iter().all(|&c| c < 3));
    }
}

#[test]
fn test_stress_model_bincode_roundtrip() {
    let (x, y) = three_clusters();
    let mut model = TrainingConfig::for_model(ModelKind::DecisionTree).build_model();
    model.fit(&x, &y).expect("fit");

    let bytes = bincode::serialize(&model).expect("serialize");
    let restored: StressModel = bincode::deserialize(&bytes).expect("deserialize");
    assert_eq!(restored, model);
    assert_eq!(
        restored.predict(&x).expect("predict"),
        model.predict(&x).expect("predict")
    );
}
