//! Hadamard matrices normalised to a trailing all-ones column.
//!
//! A Plackett-Burman base design of run count R is the first R-1 columns of
//! a Hadamard matrix H of order R whose last column is all +1, so that
//! `[design | 1]` satisfies `H Hᵀ = R I`. Three constructions cover every
//! supported order:
//!
//! - Paley, cyclic: R-1 a prime ≡ 3 (mod 4)
//! - doubling: `[[H, H], [-H, H]]`, which keeps the last column at +1
//! - from a symmetric conference matrix S of order R/2

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::utils::{is_prime, legendre};

/// Order-`n` Sylvester matrix built by repeated doubling from `[1]`.
///
/// `n` must be a power of two.
pub(crate) fn sylvester(n: usize) -> Result<Array2<i32>> {
    if !n.is_power_of_two() {
        return Err(Error::construction_failed(format!(
            "Sylvester construction requires a power of 2, got {n}"
        )));
    }

    let mut h = Array2::from_elem((1, 1), 1);
    while h.nrows() < n {
        h = doubled(&h);
    }
    Ok(h)
}

/// `[[H, H], [-H, H]]`.
pub(crate) fn doubled(h: &Array2<i32>) -> Array2<i32> {
    let n = h.nrows();
    Array2::from_shape_fn((2 * n, 2 * n), |(i, j)| {
        let v = h[[i % n, j % n]];
        if i >= n && j < n {
            -v
        } else {
            v
        }
    })
}

/// Paley construction of order p+1 for a prime p ≡ 3 (mod 4).
///
/// Row i < p is the i-th cyclic shift of the generator `g` with `g[0] = +1`
/// and `g[j] = χ(j)`; the last row is all -1. A +1 is appended to every row.
pub(crate) fn paley_cyclic(p: usize) -> Result<Array2<i32>> {
    let prime = u32::try_from(p)
        .ok()
        .filter(|&q| is_prime(q) && q % 4 == 3)
        .ok_or_else(|| {
            Error::construction_failed(format!(
                "cyclic Paley construction requires a prime ≡ 3 (mod 4), got {p}"
            ))
        })?;

    let generator: Vec<i32> = (0..p)
        .map(|j| if j == 0 { 1 } else { legendre(j as i64, prime) })
        .collect();

    Ok(Array2::from_shape_fn((p + 1, p + 1), |(i, j)| {
        if j == p {
            1
        } else if i == p {
            -1
        } else {
            generator[(j + p - i) % p]
        }
    }))
}

/// Hadamard matrix of order 2n from a symmetric conference matrix of order n.
///
/// Replaces each off-diagonal entry s by `s·[[1, 1], [1, -1]]` and each
/// (zero) diagonal entry by `[[1, -1], [-1, -1]]`, then negates rows so that
/// the last column is +1.
pub(crate) fn from_symmetric_conference(s: &Array2<i32>) -> Result<Array2<i32>> {
    let n = s.nrows();
    if s != &s.t() {
        return Err(Error::construction_failed(format!(
            "conference matrix of order {n} is not symmetric"
        )));
    }

    let mut h = Array2::from_shape_fn((2 * n, 2 * n), |(r, c)| {
        let (i, u) = (r / 2, r % 2);
        let (j, v) = (c / 2, c % 2);
        if i == j {
            match (u, v) {
                (0, 0) => 1,
                _ => -1,
            }
        } else {
            let sign = if u == 1 && v == 1 { -1 } else { 1 };
            sign * s[[i, j]]
        }
    });

    normalize_last_column(&mut h);
    Ok(h)
}

/// Negate every row whose last entry is -1.
pub(crate) fn normalize_last_column(h: &mut Array2<i32>) {
    let last = h.ncols() - 1;
    for mut row in h.rows_mut() {
        if row[last] < 0 {
            row.mapv_inplace(|v| -v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn assert_hadamard(h: &Array2<i32>) {
        let n = h.nrows();
        let gram = h.dot(&h.t());
        for i in 0..n {
            for j in 0..n {
                let expected = if i == j { n as i32 } else { 0 };
                assert_eq!(gram[[i, j]], expected, "order {n}, entry ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_sylvester_orthogonality() {
        for n in [1, 2, 4, 8, 16, 64] {
            let h = sylvester(n).unwrap();
            assert_eq!(h.dim(), (n, n));
            assert_hadamard(&h);
            assert!(h.column(n - 1).iter().all(|&v| v == 1));
        }
        assert!(sylvester(12).is_err());
    }

    #[test]
    fn test_paley_cyclic_order_4() {
        let h = paley_cyclic(3).unwrap();
        assert_eq!(
            h,
            array![[1, 1, -1, 1], [-1, 1, 1, 1], [1, -1, 1, 1], [-1, -1, -1, 1]]
        );
    }

    #[test]
    fn test_paley_cyclic_orthogonality() {
        for p in [3, 7, 11, 19, 23, 31, 43, 47, 59, 67, 71, 79, 83] {
            let h = paley_cyclic(p).unwrap();
            assert_hadamard(&h);
        }
    }

    #[test]
    fn test_paley_cyclic_rejects_bad_prime() {
        assert!(paley_cyclic(5).is_err());
        assert!(paley_cyclic(15).is_err());
    }

    #[test]
    fn test_doubling_preserves_orthogonality() {
        let h = doubled(&paley_cyclic(11).unwrap());
        assert_eq!(h.dim(), (24, 24));
        assert_hadamard(&h);
        assert!(h.column(23).iter().all(|&v| v == 1));
    }

    #[test]
    fn test_from_symmetric_conference_order_6() {
        // Paley conference matrix of order 6 (q = 5)
        let s = array![
            [0, 1, 1, 1, 1, 1],
            [1, 0, 1, -1, -1, 1],
            [1, 1, 0, 1, -1, -1],
            [1, -1, 1, 0, 1, -1],
            [1, -1, -1, 1, 0, 1],
            [1, 1, -1, -1, 1, 0],
        ];
        let h = from_symmetric_conference(&s).unwrap();
        assert_eq!(h.dim(), (12, 12));
        assert_hadamard(&h);
        assert!(h.column(11).iter().all(|&v| v == 1));
    }

    #[test]
    fn test_from_conference_rejects_skew() {
        let skew = array![[0, -1], [1, 0]];
        assert!(from_symmetric_conference(&skew).is_err());
    }
}
