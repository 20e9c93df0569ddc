pub(crate) use super::*;

#[test]
fn test_from_vec() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.shape(), (2, 3));
    assert!((m.get(0, 0) - 1.0).abs() < 1e-6);
    assert!((m.get(1, 2) - 6.0).abs() < 1e-6);
}

#[test]
fn test_from_vec_error() {
    let result = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0]);
    assert!(matches!(result, Err(HealthError::DimensionMismatch { .. })));
}

#[test]
fn test_from_rows() {
    let m = Matrix::from_rows(&[[1.0_f32, 2.0], [3.0, 4.0], [5.0, 6.0]]).expect("equal widths");
    assert_eq!(m.shape(), (3, 2));
    assert_eq!(m.row(2), &[5.0, 6.0]);
}

#[test]
fn test_from_rows_ragged() {
    let rows = vec![vec![1.0_f32, 2.0], vec![3.0]];
    assert!(Matrix::from_rows(&rows).is_err());
}

#[test]
fn test_zeros() {
    let m = Matrix::zeros(2, 3);
    assert_eq!(m.shape(), (2, 3));
    assert!(m.as_slice().iter().all(|&x| x == 0.0));
}

#[test]
fn test_row_and_column() {
    let m = Matrix::from_vec(2, 3, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0])
        .expect("test data has correct dimensions: 2*3=6 elements");
    assert_eq!(m.row(1), &[4.0, 5.0, 6.0]);
    assert_eq!(m.column(1), vec![2.0, 5.0]);
}

#[test]
fn test_rows_iterator() {
    let m = Matrix::from_vec(3, 2, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("3x2");
    let rows: Vec<&[f32]> = m.rows().collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[1], &[3.0, 4.0]);
}

#[test]
fn test_rows_iterator_zero_width() {
    let m = Matrix::<f32>::from_vec(2, 0, vec![]).expect("2x0");
    assert_eq!(m.rows().count(), 0);
}

#[test]
fn test_select_rows_with_duplicates() {
    let m = Matrix::from_vec(3, 2, vec![1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("3x2");
    let s = m.select_rows(&[2, 0, 2]);
    assert_eq!(s.shape(), (3, 2));
    assert_eq!(s.as_slice(), &[5.0, 6.0, 1.0, 2.0, 5.0, 6.0]);
}

#[test]
fn test_set() {
    let mut m = Matrix::zeros(2, 2);
    m.set(1, 0, 7.5);
    assert!((m.get(1, 0) - 7.5).abs() < 1e-6);
}

#[test]
fn test_argmax_rows_tie_breaks_low() {
    let m = Matrix::from_vec(2, 3, vec![0.2_f32, 0.5, 0.3, 0.4, 0.4, 0.2]).expect("2x3");
    assert_eq!(m.argmax_rows(), vec![1, 0]);
}

#[test]
fn test_filled_generic() {
    let m = Matrix::filled(2, 3, 7usize);
    assert_eq!(m.shape(), (2, 3));
    assert!(m.as_slice().iter().all(|&v| v == 7));
}
