//! Conference matrices for definitive screening designs.
//!
//! A conference matrix C of order m has a zero diagonal, ±1 elsewhere and
//! satisfies `Cᵀ C = (m-1) I`. The constructions here are each used for a
//! fixed set of orders; see [`DsdClass`](super::DsdClass) for the mapping.

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::utils::{is_prime, legendre};

/// Generator vectors `(a, b)` for a bordered two-circulant conference matrix.
///
/// `a` is symmetric (`a[k] = a[n-k]`) with `a[0] = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CirculantPair {
    /// First row of the symmetric circulant block A.
    pub a: &'static [i32],
    /// First row of the circulant block B.
    pub b: &'static [i32],
    /// Whether the result is an exact conference matrix.
    pub exact: bool,
}

/// Generators for a symmetric core of `block × block` circulants.
///
/// Row `i` holds the first rows of the circulants in block-row `i`, left to
/// right, so every row is `rows.len() * block` long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CirculantBlocks {
    /// Size of each circulant block.
    pub block: usize,
    /// Concatenated first rows, one slice per block-row.
    pub rows: &'static [&'static [i32]],
}

/// Four ±1 generator vectors for the Goethals-Seidel array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CirculantQuad {
    /// First rows of the circulant blocks A, B, C and D.
    pub rows: [&'static [i32]; 4],
}

pub(crate) const PAIR_10: CirculantPair = CirculantPair {
    a: &[0, -1, 1, -1],
    b: &[1, 1, -1, -1],
    exact: true,
};

pub(crate) const PAIR_22: CirculantPair = CirculantPair {
    a: &[0, 1, 1, -1, -1, -1, -1, -1, 1, 1],
    b: &[1, 1, 1, -1, -1, 1, -1, 1, -1, -1],
    exact: false,
};

pub(crate) const PAIR_26: CirculantPair = CirculantPair {
    a: &[0, -1, 1, 1, -1, -1, 1, -1, -1, 1, 1, -1],
    b: &[1, 1, 1, 1, -1, 1, -1, 1, -1, -1, -1, -1],
    exact: true,
};

pub(crate) const PAIR_34: CirculantPair = CirculantPair {
    a: &[0, 1, 1, -1, 1, -1, -1, -1, 1, -1, -1, -1, 1, -1, 1, 1],
    b: &[1, 1, 1, -1, 1, 1, -1, -1, -1, 1, -1, 1, 1, -1, -1, -1],
    exact: false,
};

pub(crate) const PAIR_50: CirculantPair = CirculantPair {
    a: &[
        0, 1, -1, -1, 1, -1, 1, 1, 1, -1, -1, -1, 1, -1, -1, -1, 1, 1, 1, -1, 1, -1, -1, 1,
    ],
    b: &[
        1, 1, -1, 1, -1, 1, -1, -1, 1, 1, 1, 1, 1, -1, 1, 1, -1, -1, 1, -1, -1, -1, -1, -1,
    ],
    exact: true,
};

pub(crate) const BLOCKS_46: CirculantBlocks = CirculantBlocks {
    block: 5,
    rows: &[
        &[
            0, -1, 1, 1, -1, -1, -1, -1, -1, -1, 1, -1, 1, -1, -1, 1, -1, 1, -1, -1, 1, 1, 1, -1,
            -1, 1, 1, -1, 1, -1, 1, 1, 1, -1, -1, 1, 1, 1, -1, -1, 1, 1, 1, 1, -1,
        ],
        &[
            -1, -1, -1, -1, -1, 0, -1, 1, 1, -1, 1, 1, 1, -1, -1, -1, 1, 1, 1, 1, -1, 1, -1, 1, -1,
            1, 1, -1, -1, 1, 1, -1, -1, 1, 1, 1, -1, 1, 1, -1, 1, -1, 1, -1, -1,
        ],
        &[
            1, -1, -1, 1, -1, 1, -1, -1, 1, 1, 0, -1, 1, 1, -1, -1, 1, 1, -1, -1, 1, 1, 1, 1, 1, -1,
            -1, -1, -1, 1, -1, 1, -1, -1, 1, -1, 1, 1, -1, 1, 1, -1, -1, -1, 1,
        ],
        &[
            1, -1, -1, 1, -1, -1, 1, 1, 1, 1, -1, -1, -1, 1, 1, 0, -1, -1, -1, -1, 1, 1, -1, -1, -1,
            1, 1, 1, -1, -1, 1, -1, 1, 1, 1, -1, 1, -1, 1, -1, 1, -1, 1, -1, 1,
        ],
        &[
            1, -1, -1, 1, 1, -1, -1, 1, -1, 1, 1, 1, 1, 1, 1, 1, -1, -1, -1, 1, 0, -1, 1, 1, -1, 1,
            -1, 1, -1, 1, -1, 1, -1, 1, -1, 1, -1, -1, -1, -1, 1, 1, -1, -1, -1,
        ],
        &[
            1, -1, 1, -1, 1, 1, 1, -1, -1, 1, -1, 1, -1, -1, -1, 1, -1, -1, 1, 1, 1, 1, -1, 1, -1,
            0, 1, 1, 1, 1, -1, -1, -1, -1, 1, -1, 1, 1, -1, -1, 1, -1, -1, 1, -1,
        ],
        &[
            1, -1, -1, 1, 1, 1, 1, 1, -1, -1, -1, 1, -1, -1, 1, 1, 1, 1, 1, -1, -1, -1, 1, -1, 1,
            -1, 1, -1, -1, -1, 0, 1, -1, -1, 1, 1, -1, -1, -1, -1, 1, -1, 1, 1, 1,
        ],
        &[
            1, -1, -1, 1, 1, 1, -1, 1, 1, -1, -1, 1, -1, 1, 1, -1, -1, 1, -1, 1, 1, -1, -1, -1, -1,
            -1, -1, -1, 1, 1, 1, -1, -1, -1, -1, 0, 1, 1, 1, 1, -1, 1, 1, 1, -1,
        ],
        &[
            1, -1, 1, 1, 1, 1, -1, -1, 1, -1, 1, 1, -1, -1, -1, 1, 1, -1, 1, -1, 1, -1, -1, -1, 1,
            1, -1, 1, -1, -1, 1, 1, 1, 1, -1, -1, -1, 1, 1, 1, 0, -1, -1, -1, -1,
        ],
    ],
};

pub(crate) const QUAD_7: CirculantQuad = CirculantQuad {
    rows: [
        &[1, 1, 1, 1, -1, -1, -1],
        &[1, 1, -1, 1, 1, -1, 1],
        &[1, 1, -1, 1, 1, -1, 1],
        &[1, -1, 1, 1, 1, 1, -1],
    ],
};

pub(crate) const QUAD_9: CirculantQuad = CirculantQuad {
    rows: [
        &[1, 1, 1, 1, -1, 1, -1, -1, -1],
        &[1, 1, 1, -1, 1, 1, -1, 1, 1],
        &[1, 1, -1, 1, -1, -1, 1, -1, 1],
        &[1, -1, -1, -1, 1, 1, -1, -1, -1],
    ],
};

/// `circ(x)[i][j] = x[(j - i) mod n]`.
fn circulant(x: &[i32], i: usize, j: usize) -> i32 {
    let n = x.len();
    x[(j + n - i % n) % n]
}

/// Paley conference matrix of order q+1 for a prime q.
///
/// Symmetric when q ≡ 1 (mod 4) and skew when q ≡ 3 (mod 4). The first row is
/// constant (+1 or -1 respectively) and the first column is +1.
pub(crate) fn paley(q: usize) -> Result<Array2<i32>> {
    let prime = u32::try_from(q)
        .ok()
        .filter(|&p| p > 2 && is_prime(p))
        .ok_or_else(|| {
            Error::construction_failed(format!("Paley conference matrix requires an odd prime, got {q}"))
        })?;
    let head = if prime % 4 == 3 { -1 } else { 1 };

    Ok(Array2::from_shape_fn((q + 1, q + 1), |(i, j)| match (i, j) {
        (0, 0) => 0,
        (0, _) => head,
        (_, 0) => 1,
        _ => legendre(j as i64 - i as i64, prime),
    }))
}

/// Order-2m matrix from a skew conference matrix C of order m.
///
/// With `H = C + I`, returns `[[H, H], [-Hᵀ, Hᵀ]] - I`.
pub(crate) fn skew_doubled(c: &Array2<i32>) -> Result<Array2<i32>> {
    let m = c.nrows();
    if c != &c.t().mapv(|v| -v) {
        return Err(Error::construction_failed(format!(
            "conference matrix of order {m} is not skew"
        )));
    }

    let h = |i: usize, j: usize| c[[i, j]] + i32::from(i == j);
    Ok(Array2::from_shape_fn((2 * m, 2 * m), |(i, j)| {
        let value = match (i < m, j < m) {
            (true, true) => h(i, j),
            (true, false) => h(i, j - m),
            (false, true) => -h(j, i - m),
            (false, false) => h(j - m, i - m),
        };
        value - i32::from(i == j)
    }))
}

/// Goethals-Seidel array minus the identity.
///
/// With circulants A, B, C, D and the back-diagonal R:
///
/// ```text
///  A     BR    CR    DR
/// -BR    A     DᵀR  -CᵀR
/// -CR   -DᵀR   A     BᵀR
/// -DR    CᵀR  -BᵀR   A
/// ```
pub(crate) fn goethals_seidel(quad: &CirculantQuad) -> Array2<i32> {
    // (block, sign, form): form 0 = X, 1 = XR, 2 = XᵀR
    const LAYOUT: [[(usize, i32, u8); 4]; 4] = [
        [(0, 1, 0), (1, 1, 1), (2, 1, 1), (3, 1, 1)],
        [(1, -1, 1), (0, 1, 0), (3, 1, 2), (2, -1, 2)],
        [(2, -1, 1), (3, -1, 2), (0, 1, 0), (1, 1, 2)],
        [(3, -1, 1), (2, 1, 2), (1, -1, 2), (0, 1, 0)],
    ];

    let n = quad.rows[0].len();
    Array2::from_shape_fn((4 * n, 4 * n), |(r, c)| {
        let (block, sign, form) = LAYOUT[r / n][c / n];
        let (i, j) = (r % n, c % n);
        let x = quad.rows[block];
        let value = match form {
            0 => circulant(x, i, j),
            // (XR)[i][j] = X[i][n-1-j]
            1 => circulant(x, i, n - 1 - j),
            // (XᵀR)[i][j] = X[n-1-j][i]
            _ => circulant(x, n - 1 - j, i),
        };
        sign * value - i32::from(r == c)
    })
}

/// Bordered two-circulant matrix of order 2n+2.
///
/// ```text
///  0   1   eᵀ   eᵀ
///  1   0   eᵀ  -eᵀ
///  e   e   A    B
///  e  -e   Bᵀ  -A
/// ```
pub(crate) fn bordered_circulant(pair: &CirculantPair) -> Array2<i32> {
    let n = pair.a.len();
    let border = |k: usize| if k < n + 2 { 1 } else { -1 };
    Array2::from_shape_fn((2 * n + 2, 2 * n + 2), |(r, c)| match (r, c) {
        (0, 0) | (1, 1) => 0,
        (0, _) | (_, 0) => 1,
        (1, _) => border(c),
        (_, 1) => border(r),
        _ => {
            let (i, j) = ((r - 2) % n, (c - 2) % n);
            match (r < n + 2, c < n + 2) {
                (true, true) => circulant(pair.a, i, j),
                (true, false) => circulant(pair.b, i, j),
                (false, true) => circulant(pair.b, j, i),
                (false, false) => -circulant(pair.a, i, j),
            }
        }
    })
}

/// Core of circulant blocks bordered by a zero corner and a row of ones.
///
/// ```text
///  0   eᵀ
///  e   S
/// ```
pub(crate) fn bordered_blocks(blocks: &CirculantBlocks) -> Array2<i32> {
    let b = blocks.block;
    let order = blocks.rows.len() * b + 1;
    Array2::from_shape_fn((order, order), |(r, c)| match (r, c) {
        (0, 0) => 0,
        (0, _) | (_, 0) => 1,
        _ => {
            let (row, col) = (r - 1, c - 1);
            let generator = &blocks.rows[row / b][col / b * b..(col / b + 1) * b];
            circulant(generator, row % b, col % b)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    /// Largest off-diagonal magnitude of CᵀC, after checking the conference shape.
    fn gram_deviation(c: &Array2<i32>) -> i32 {
        let m = c.nrows();
        for i in 0..m {
            for j in 0..m {
                if i == j {
                    assert_eq!(c[[i, j]], 0, "diagonal of order {m}");
                } else {
                    assert_eq!(c[[i, j]].abs(), 1, "entry ({i}, {j}) of order {m}");
                }
            }
        }

        let gram = c.t().dot(c);
        let mut worst = 0;
        for i in 0..m {
            for j in 0..m {
                if i == j {
                    assert_eq!(gram[[i, i]], m as i32 - 1);
                } else {
                    worst = worst.max(gram[[i, j]].abs());
                }
            }
        }
        worst
    }

    #[test]
    fn test_paley_small() {
        let c = paley(3).unwrap();
        assert_eq!(
            c,
            array![[0, -1, -1, -1], [1, 0, 1, -1], [1, -1, 0, 1], [1, 1, -1, 0]]
        );
    }

    #[test]
    fn test_paley_orders() {
        for q in [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47] {
            let c = paley(q).unwrap();
            assert_eq!(gram_deviation(&c), 0, "Paley q = {q}");
        }
        assert!(paley(2).is_err());
        assert!(paley(9).is_err());
    }

    #[test]
    fn test_paley_symmetry_follows_residue_class() {
        let symmetric = paley(13).unwrap();
        assert_eq!(symmetric, symmetric.t());

        let skew = paley(11).unwrap();
        assert_eq!(skew, skew.t().mapv(|v| -v));
    }

    #[test]
    fn test_skew_doubled() {
        for (q, order) in [(7, 16), (19, 40)] {
            let c = skew_doubled(&paley(q).unwrap()).unwrap();
            assert_eq!(c.nrows(), order);
            assert_eq!(gram_deviation(&c), 0);
        }
        assert!(skew_doubled(&paley(13).unwrap()).is_err());
    }

    #[test]
    fn test_goethals_seidel() {
        for (quad, order) in [(QUAD_7, 28), (QUAD_9, 36)] {
            let c = goethals_seidel(&quad);
            assert_eq!(c.nrows(), order);
            assert_eq!(gram_deviation(&c), 0);
        }
    }

    #[test]
    fn test_bordered_circulant_exact() {
        for (pair, order) in [(PAIR_10, 10), (PAIR_26, 26), (PAIR_50, 50)] {
            let c = bordered_circulant(&pair);
            assert_eq!(c.nrows(), order);
            assert_eq!(c, c.t());
            assert_eq!(gram_deviation(&c), 0, "order {order}");
        }
    }

    #[test]
    fn test_bordered_circulant_near() {
        for pair in [PAIR_22, PAIR_34] {
            let c = bordered_circulant(&pair);
            assert_eq!(c, c.t());
            let worst = gram_deviation(&c);
            assert!(worst > 0 && worst <= 4);
        }
    }

    #[test]
    fn test_bordered_blocks_46() {
        assert!(BLOCKS_46.rows.iter().all(|row| row.len() == 45));
        let c = bordered_blocks(&BLOCKS_46);
        assert_eq!(c.nrows(), 46);
        assert_eq!(c, c.t());
        assert_eq!(gram_deviation(&c), 0);
    }
}
