//! Input predicates.
//!
//! Every predicate is total: it answers `false` for anything outside the
//! expected form and never panics.

use std::collections::HashSet;

use ndarray::Array2;

/// Test whether `value` is an integer greater than zero.
///
/// Values that do not fit in `i64` are rejected.
///
/// # Examples
///
/// ```
/// use exdesign::utils::is_positive_int;
///
/// assert!(is_positive_int(3));
/// assert!(is_positive_int(3usize));
/// assert!(!is_positive_int(0));
/// assert!(!is_positive_int(-2i32));
/// assert!(!is_positive_int(u64::MAX));
/// ```
#[must_use]
pub fn is_positive_int<T: TryInto<i64>>(value: T) -> bool {
    let converted: Result<i64, _> = value.try_into();
    converted.map_or(false, |v| v > 0)
}

/// Test whether `value` is an integer greater than or equal to zero.
///
/// # Examples
///
/// ```
/// use exdesign::utils::is_non_negative_int;
///
/// assert!(is_non_negative_int(0));
/// assert!(!is_non_negative_int(-1));
/// ```
#[must_use]
pub fn is_non_negative_int<T: TryInto<i64>>(value: T) -> bool {
    let converted: Result<i64, _> = value.try_into();
    converted.map_or(false, |v| v >= 0)
}

/// Test whether `values` is non-empty and every element is a positive integer.
///
/// # Examples
///
/// ```
/// use exdesign::utils::is_positive_int_list;
///
/// assert!(is_positive_int_list(&[1, 2, 3]));
/// assert!(!is_positive_int_list(&[1, 2, 0]));
/// assert!(!is_positive_int_list::<i32>(&[]));
/// ```
#[must_use]
pub fn is_positive_int_list<T: Copy + TryInto<i64>>(values: &[T]) -> bool {
    !values.is_empty() && values.iter().all(|&v| is_positive_int(v))
}

/// Test whether `values` is non-empty and every element is a non-negative integer.
#[must_use]
pub fn is_non_negative_int_list<T: Copy + TryInto<i64>>(values: &[T]) -> bool {
    !values.is_empty() && values.iter().all(|&v| is_non_negative_int(v))
}

/// Test whether every element of `matrix` is 0 or 1.
///
/// # Examples
///
/// ```
/// use exdesign::utils::is_binary_matrix;
/// use ndarray::array;
///
/// assert!(is_binary_matrix(&array![[1, 0], [0, 1]]));
/// assert!(!is_binary_matrix(&array![[1, -1], [0, 1]]));
/// ```
#[must_use]
pub fn is_binary_matrix(matrix: &Array2<i32>) -> bool {
    matrix.iter().all(|&v| v == 0 || v == 1)
}

/// Test whether every element of a float matrix is a finite whole number
/// representable as `i32`.
#[must_use]
pub fn is_int_matrix(matrix: &Array2<f64>) -> bool {
    matrix.iter().all(|&v| {
        v.is_finite() && v.fract() == 0.0 && v >= f64::from(i32::MIN) && v <= f64::from(i32::MAX)
    })
}

/// Test whether `ids` is a non-empty, duplicate-free list of column indices
/// of `matrix`.
///
/// # Examples
///
/// ```
/// use exdesign::utils::is_correct_id_list;
/// use ndarray::Array2;
///
/// let m = Array2::<i32>::ones((4, 4));
/// assert!(is_correct_id_list(&[0, 1], &m));
/// assert!(!is_correct_id_list(&[1, 1, 1], &m));
/// assert!(!is_correct_id_list(&[1, 2, 4], &m));
/// assert!(!is_correct_id_list(&[], &m));
/// ```
#[must_use]
pub fn is_correct_id_list<T>(ids: &[usize], matrix: &Array2<T>) -> bool {
    let mut seen = HashSet::with_capacity(ids.len());
    !ids.is_empty() && ids.iter().all(|&id| id < matrix.ncols() && seen.insert(id))
}
