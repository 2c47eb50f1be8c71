//! Numeric helpers and input validators.
//!
//! The validators are plain predicates; the generators and analyzers turn a
//! `false` into an [`Error`](crate::Error) that names the offending value.

mod primality;
mod validators;

pub use primality::is_prime;
pub use validators::{
    is_binary_matrix, is_correct_id_list, is_int_matrix, is_non_negative_int,
    is_non_negative_int_list, is_positive_int, is_positive_int_list,
};

use ndarray::Array2;

use crate::error::{Error, Result};

/// Compute binomial coefficient C(n, k) = n! / (k! * (n-k)!)
///
/// Returns `None` if the result would overflow `u64`.
///
/// # Examples
///
/// ```
/// use exdesign::utils::binomial;
///
/// assert_eq!(binomial(5, 2), Some(10));
/// assert_eq!(binomial(3, 5), Some(0)); // k > n
/// ```
#[must_use]
pub fn binomial(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }

    let k = k.min(n - k);
    let mut result: u64 = 1;
    for i in 0..k {
        result = result.checked_mul(n - i)?;
        result /= i + 1;
    }

    Some(result)
}

/// Compute `base^exp mod modulus` by binary exponentiation.
///
/// # Panics
///
/// Panics if `modulus` is 0.
///
/// # Examples
///
/// ```
/// use exdesign::utils::mod_pow;
///
/// assert_eq!(mod_pow(2, 10, 1000), 24);
/// assert_eq!(mod_pow(3, 5, 7), 5);
/// ```
#[must_use]
pub fn mod_pow(mut base: u64, mut exp: u64, modulus: u64) -> u64 {
    assert!(modulus > 0, "modulus must be positive");

    if modulus == 1 {
        return 0;
    }

    let mut result = 1u64;
    base %= modulus;

    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % modulus;
        }
        exp >>= 1;
        base = base * base % modulus;
    }

    result
}

/// Quadratic character χ(a) modulo an odd prime `p`.
///
/// Returns 0 when `p` divides `a`, 1 for a nonzero square and -1 otherwise.
/// Negative arguments are reduced first, so `legendre(j - i, p)` can be used
/// directly on index differences.
///
/// # Examples
///
/// ```
/// use exdesign::utils::legendre;
///
/// assert_eq!(legendre(0, 7), 0);
/// assert_eq!(legendre(2, 7), 1);  // 3² = 9 ≡ 2
/// assert_eq!(legendre(-1, 7), -1); // 7 ≡ 3 (mod 4)
/// ```
#[must_use]
pub fn legendre(a: i64, p: u32) -> i32 {
    let p64 = i64::from(p);
    let a = a.rem_euclid(p64).unsigned_abs();
    if a == 0 {
        return 0;
    }

    // Euler's criterion
    if mod_pow(a, u64::from((p - 1) / 2), u64::from(p)) == 1 {
        1
    } else {
        -1
    }
}

/// Generate all k-combinations of indices 0..n in lexicographic order.
///
/// # Examples
///
/// ```
/// use exdesign::utils::combinations;
///
/// let combos: Vec<Vec<usize>> = combinations(4, 2).collect();
/// assert_eq!(combos.len(), 6);
/// assert_eq!(combos[0], vec![0, 1]);
/// assert_eq!(combos[5], vec![2, 3]);
/// ```
pub fn combinations(n: usize, k: usize) -> impl Iterator<Item = Vec<usize>> {
    CombinationIterator::new(n, k)
}

struct CombinationIterator {
    n: usize,
    k: usize,
    indices: Vec<usize>,
    finished: bool,
}

impl CombinationIterator {
    fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            k,
            indices: (0..k.min(n)).collect(),
            finished: k > n,
        }
    }
}

impl Iterator for CombinationIterator {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.indices.clone();

        // Advance the rightmost index that still has room
        let mut i = self.k;
        while i > 0 {
            i -= 1;
            if self.indices[i] < self.n - self.k + i {
                self.indices[i] += 1;
                for j in (i + 1)..self.k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                return Some(result);
            }
        }

        self.finished = true;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            (0, Some(0))
        } else {
            let count = binomial(self.n as u64, self.k as u64)
                .and_then(|c| usize::try_from(c).ok())
                .unwrap_or(usize::MAX);
            (0, Some(count))
        }
    }
}

/// Names of every factor combination of size `1..=max_dim`.
///
/// Single factors come first, then pairs, and so on; within one size the
/// order follows [`combinations`]. Members of a combination are joined with
/// `operator`.
///
/// # Examples
///
/// ```
/// use exdesign::utils::interaction_names;
///
/// let names = interaction_names(&["a", "b", "c"], 2, ":");
/// assert_eq!(names, vec!["a", "b", "c", "a:b", "a:c", "b:c"]);
/// ```
#[must_use]
pub fn interaction_names<S: AsRef<str>>(names: &[S], max_dim: usize, operator: &str) -> Vec<String> {
    (1..=max_dim)
        .flat_map(|dim| combinations(names.len(), dim))
        .map(|combo| {
            combo
                .iter()
                .map(|&i| names[i].as_ref())
                .collect::<Vec<_>>()
                .join(operator)
        })
        .collect()
}

/// Convert a floating-point matrix of whole numbers into an integer exmatrix.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if any element is not a finite whole
/// number that fits in `i32`.
///
/// # Examples
///
/// ```
/// use exdesign::utils::to_int_matrix;
/// use ndarray::array;
///
/// let ex = to_int_matrix(&array![[1.0, -1.0], [0.0, 1.0]]).unwrap();
/// assert_eq!(ex, array![[1, -1], [0, 1]]);
///
/// assert!(to_int_matrix(&array![[1.2, 1.0]]).is_err());
/// ```
pub fn to_int_matrix(matrix: &Array2<f64>) -> Result<Array2<i32>> {
    if !is_int_matrix(matrix) {
        return Err(Error::invalid_argument(format!(
            "exmatrix expected a 2d matrix in which all elements are integer, got:\n{matrix}"
        )));
    }

    // Every element was checked to be a whole number in i32 range
    #[allow(clippy::cast_possible_truncation)]
    let converted = matrix.mapv(|v| v as i32);
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(0, 0), Some(1));
        assert_eq!(binomial(5, 5), Some(1));
        assert_eq!(binomial(10, 3), Some(120));
        assert_eq!(binomial(20, 10), Some(184_756));
    }

    #[test]
    fn test_mod_pow() {
        assert_eq!(mod_pow(2, 0, 7), 1);
        assert_eq!(mod_pow(0, 5, 7), 0);
        assert_eq!(mod_pow(7, 3, 11), 2);
    }

    #[test]
    fn test_legendre_matches_squares() {
        for p in [3u32, 5, 7, 11, 13, 43, 47] {
            let squares: Vec<u32> = (1..p).map(|x| x * x % p).collect();
            for a in 1..p {
                let expected = if squares.contains(&a) { 1 } else { -1 };
                assert_eq!(legendre(i64::from(a), p), expected, "a={a}, p={p}");
            }
        }
    }

    #[test]
    fn test_legendre_negative_arguments() {
        // -1 is a square exactly when p ≡ 1 (mod 4)
        assert_eq!(legendre(-1, 13), 1);
        assert_eq!(legendre(-1, 11), -1);
        assert_eq!(legendre(-13, 13), 0);
    }

    #[test]
    fn test_combinations() {
        let c: Vec<_> = combinations(4, 2).collect();
        assert_eq!(
            c,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3]
            ]
        );

        assert_eq!(combinations(5, 3).count(), 10);
        assert_eq!(combinations(3, 0).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
        assert_eq!(combinations(3, 4).count(), 0);
    }

    #[test]
    fn test_interaction_names() {
        let names = interaction_names(&["x1", "x2", "x3"], 3, "*");
        assert_eq!(names.len(), 7);
        assert_eq!(names[3], "x1*x2");
        assert_eq!(names[6], "x1*x2*x3");

        let names = interaction_names(&["a", "b"], 1, "");
        assert_eq!(names, vec!["a", "b"]);

        // Dimensions beyond the factor count contribute nothing
        assert_eq!(interaction_names(&["a", "b"], 5, "").len(), 3);
    }

    #[test]
    fn test_to_int_matrix() {
        let m = to_int_matrix(&array![[0.0, 1.0, 2.0], [-3.0, 4.0, 5.0]]).unwrap();
        assert_eq!(m, array![[0, 1, 2], [-3, 4, 5]]);

        let err = to_int_matrix(&array![[f64::NAN]]).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        let err = to_int_matrix(&array![[1.2, 1.0]]).unwrap_err();
        assert!(err.to_string().contains("1.2"));
    }
}
