//! Tests for preprocessing module.

use super::*;

fn lifestyle_rows() -> Matrix<f32> {
    // sleep, activity, work, social
    Matrix::from_vec(
        4,
        4,
        vec![
            5.0, 0.0, 12.0, 0.0, //
            6.5, 1.0, 9.0, 1.0, //
            7.5, 2.0, 8.0, 2.0, //
            9.0, 1.0, 7.0, 2.0,
        ],
    )
    .expect("valid matrix dimensions")
}

#[test]
fn test_new_is_unfitted() {
    let scaler = StandardScaler::new();
    assert!(!scaler.is_fitted());
    assert!(scaler.mean().is_none());
    assert!(scaler.n_features().is_none());
    assert_eq!(scaler, StandardScaler::default());
}

#[test]
fn test_fit_basic() {
    let data = Matrix::from_vec(3, 2, vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0])
        .expect("valid matrix dimensions");

    let mut scaler = StandardScaler::new();
    scaler.fit(&data).expect("fit should succeed with valid data");

    let mean = scaler.mean().expect("fitted");
    assert!((mean[0] - 2.0).abs() < 1e-6);
    assert!((mean[1] - 20.0).abs() < 1e-6);

    // Population std: sqrt(2/3)
    let std = scaler.std().expect("fitted");
    let expected_std = (2.0_f32 / 3.0).sqrt();
    assert!((std[0] - expected_std).abs() < 1e-4);
    assert!((std[1] - expected_std * 10.0).abs() < 1e-3);
    assert_eq!(scaler.n_features(), Some(2));
}

#[test]
fn test_transform_zero_mean_unit_variance() {
    let data = lifestyle_rows();
    let mut scaler = StandardScaler::new();
    let scaled = scaler.fit_transform(&data).expect("fit_transform");

    for j in 0..4 {
        let col = scaled.column(j);
        let mean: f32 = col.iter().sum::<f32>() / 4.0;
        let var: f32 = col.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / 4.0;
        assert!(mean.abs() < 1e-5, "column {j} mean {mean}");
        assert!((var - 1.0).abs() < 1e-4, "column {j} var {var}");
    }
}

#[test]
fn test_inverse_transform_recovers_input() {
    let data = lifestyle_rows();
    let mut scaler = StandardScaler::new();
    let scaled = scaler.fit_transform(&data).expect("fit_transform");
    let restored = scaler.inverse_transform(&scaled).expect("inverse");

    for (a, b) in data.as_slice().iter().zip(restored.as_slice()) {
        assert!((a - b).abs() < 1e-4);
    }
}

#[test]
fn test_transform_new_data_uses_training_stats() {
    let train = Matrix::from_vec(2, 1, vec![6.0, 8.0]).expect("2x1");
    let mut scaler = StandardScaler::new();
    scaler.fit(&train).expect("fit");

    let new = Matrix::from_vec(1, 1, vec![10.0]).expect("1x1");
    let out = scaler.transform(&new).expect("transform");
    // mean 7, std 1
    assert!((out.get(0, 0) - 3.0).abs() < 1e-6);
    // transforming again must not refit
    assert_eq!(scaler.mean(), Some(&[7.0_f32][..]));
}

#[test]
fn test_transform_row_matches_matrix_transform() {
    let data = lifestyle_rows();
    let mut scaler = StandardScaler::new();
    let scaled = scaler.fit_transform(&data).expect("fit_transform");
    let row = scaler.transform_row(data.row(2)).expect("row");
    for (a, b) in row.iter().zip(scaled.row(2)) {
        assert!((a - b).abs() < 1e-6);
    }
}

#[test]
fn test_without_mean() {
    let data = Matrix::from_vec(2, 1, vec![2.0, 4.0]).expect("2x1");
    let mut scaler = StandardScaler::new().with_mean(false);
    let out = scaler.fit_transform(&data).expect("fit_transform");
    // std = 1, no centering
    assert!((out.get(0, 0) - 2.0).abs() < 1e-6);
}

#[test]
fn test_without_std() {
    let data = Matrix::from_vec(2, 1, vec![2.0, 4.0]).expect("2x1");
    let mut scaler = StandardScaler::new().with_std(false);
    let out = scaler.fit_transform(&data).expect("fit_transform");
    assert!((out.get(0, 0) + 1.0).abs() < 1e-6);
    assert!((out.get(1, 0) - 1.0).abs() < 1e-6);
}

#[test]
fn test_constant_feature_is_only_centered() {
    let data = Matrix::from_vec(3, 2, vec![1.0, 5.0, 2.0, 5.0, 3.0, 5.0]).expect("3x2");
    let mut scaler = StandardScaler::new();
    let out = scaler.fit_transform(&data).expect("fit_transform");
    for i in 0..3 {
        assert!(out.get(i, 1).abs() < 1e-6);
        assert!(out.get(i, 1).is_finite());
    }
}

#[test]
fn test_empty_data_error() {
    let data = Matrix::from_vec(0, 4, vec![]).expect("0x4");
    let mut scaler = StandardScaler::new();
    assert!(scaler.fit(&data).is_err());
}

#[test]
fn test_transform_not_fitted_error() {
    let scaler = StandardScaler::new();
    let err = scaler.transform(&lifestyle_rows()).unwrap_err();
    assert!(err.to_string().contains("not fitted"));
    assert!(scaler.inverse_transform(&lifestyle_rows()).is_err());
}

#[test]
fn test_dimension_mismatch_error() {
    let mut scaler = StandardScaler::new();
    scaler.fit(&lifestyle_rows()).expect("fit");
    let narrow = Matrix::from_vec(1, 3, vec![1.0, 2.0, 3.0]).expect("1x3");
    assert!(matches!(
        scaler.transform(&narrow),
        Err(HealthError::DimensionMismatch { .. })
    ));
    assert!(scaler.transform_row(&[1.0]).is_err());
}

#[test]
fn test_serde_roundtrip_preserves_transform() {
    let mut scaler = StandardScaler::new();
    scaler.fit(&lifestyle_rows()).expect("fit");
    let json = serde_json::to_string(&scaler).expect("serialize");
    let restored: StandardScaler = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(restored, scaler);
}
