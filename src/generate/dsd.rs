//! Definitive screening designs.
//!
//! For `m = n_factor + n_fake` (rounded up to even) and a conference matrix
//! C of order m, the design is the foldover
//!
//! ```text
//!  C
//! -C
//!  0
//! ```
//!
//! truncated to the first `n_factor` columns: `2m + 1` runs of values in
//! `{-1, 0, 1}`, with the last run at the center.

use ndarray::Array2;
use tracing::{debug, warn};

use super::{check_n_rep, ExMatrix, Generator};
use crate::error::{Error, Result};
use crate::tables::{conference_matrix, dsd_class};

/// Smallest supported `n_factor + n_fake`.
pub const MIN_TOTAL_FACTORS: usize = 3;
/// Largest supported `n_factor + n_fake`.
pub const MAX_TOTAL_FACTORS: usize = 50;

/// Definitive screening design generator.
///
/// Parameters are `(n_factor, n_fake)`.
///
/// # Example
///
/// ```
/// use exdesign::generate::{Dsd, Generator};
///
/// let ex = Dsd::new(2).unwrap().get_exmatrix(&(6, 2)).unwrap();
///
/// assert_eq!(ex.dim(), (34, 6));
/// assert_eq!(ex.row(0).to_vec(), vec![0, -1, -1, -1, -1, -1]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dsd {
    n_rep: usize,
}

impl Dsd {
    /// Create a generator that replicates each design `n_rep` times.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `n_rep` is 0.
    pub fn new(n_rep: usize) -> Result<Self> {
        Ok(Self {
            n_rep: check_n_rep(n_rep)?,
        })
    }

    /// Conference matrix order used for the given factor counts.
    ///
    /// Saturates at the largest even `usize` instead of overflowing.
    #[must_use]
    pub fn order(n_factor: usize, n_fake: usize) -> usize {
        let total = n_factor.saturating_add(n_fake);
        total.saturating_add(total % 2).min(usize::MAX - 1)
    }
}

impl Generator for Dsd {
    type Params = (usize, usize);

    fn name(&self) -> &'static str {
        "DefinitiveScreening"
    }

    fn n_rep(&self) -> usize {
        self.n_rep
    }

    fn base_matrix(&self, &(n_factor, n_fake): &(usize, usize)) -> Result<ExMatrix> {
        if n_factor == 0 {
            return Err(Error::invalid_argument(
                "n_factor expected a positive integer, got 0",
            ));
        }
        if n_fake == 0 {
            return Err(Error::invalid_argument(
                "n_fake expected a positive integer, got 0",
            ));
        }

        let total = n_factor.saturating_add(n_fake);
        if !(MIN_TOTAL_FACTORS..=MAX_TOTAL_FACTORS).contains(&total) {
            return Err(Error::unsupported(format!(
                "n_factor + n_fake expected a value in [{MIN_TOTAL_FACTORS}, {MAX_TOTAL_FACTORS}], got {total}"
            )));
        }

        let m = Self::order(n_factor, n_fake);
        let class = dsd_class(m).ok_or_else(|| {
            Error::construction_failed(format!("no conference matrix class for order {m}"))
        })?;
        if !class.is_exact() {
            warn!(
                order = m,
                class = class.name(),
                "no exact conference matrix for this order, using a near-conference matrix"
            );
        }

        let c = conference_matrix(m)?;
        debug!(n_factor, n_fake, order = m, n_rep = self.n_rep, "building definitive screening design");

        Ok(Array2::from_shape_fn((2 * m + 1, n_factor), |(r, j)| {
            if r < m {
                c[[r, j]]
            } else if r < 2 * m {
                -c[[r - m, j]]
            } else {
                0
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::s;

    #[test]
    fn test_dsd_fixture() {
        let ex = Dsd::new(2).unwrap().get_exmatrix(&(6, 2)).unwrap();
        assert_eq!(ex.dim(), (34, 6));
        assert!(ex.iter().all(|&v| (-1..=1).contains(&v)));

        for block in [ex.slice(s![..17, ..]), ex.slice(s![17.., ..])] {
            let zero_rows = block.rows().into_iter().filter(|r| r.iter().all(|&v| v == 0)).count();
            assert_eq!(zero_rows, 1);
        }
    }

    #[test]
    fn test_dsd_every_size() {
        let dsd = Dsd::new(2).unwrap();
        for total in MIN_TOTAL_FACTORS..=MAX_TOTAL_FACTORS {
            let m = total + total % 2;
            for n_factor in 1..total {
                let n_fake = total - n_factor;
                let ex = dsd.get_exmatrix(&(n_factor, n_fake)).unwrap();
                assert_eq!(ex.dim(), ((2 * m + 1) * 2, n_factor), "total {total}");
                assert!(ex.iter().all(|&v| (-1..=1).contains(&v)));
            }
        }
    }

    #[test]
    fn test_dsd_foldover_structure() {
        let ex = Dsd::new(1).unwrap().get_exmatrix(&(9, 1)).unwrap();
        let m = 10;
        for i in 0..m {
            for j in 0..9 {
                assert_eq!(ex[[i, j]], -ex[[i + m, j]]);
            }
        }
        assert!(ex.row(2 * m).iter().all(|&v| v == 0));
    }

    #[test]
    fn test_dsd_odd_total_is_evened() {
        assert_eq!(Dsd::order(4, 1), 6);
        assert_eq!(Dsd::order(4, 2), 6);
        let ex = Dsd::new(1).unwrap().get_exmatrix(&(4, 1)).unwrap();
        assert_eq!(ex.dim(), (13, 4));
    }

    #[test]
    fn test_dsd_order_saturates() {
        assert_eq!(Dsd::order(usize::MAX, 1), usize::MAX - 1);
        assert_eq!(Dsd::order(usize::MAX - 2, 0), usize::MAX - 1);

        let err = Dsd::new(1).unwrap().get_exmatrix(&(usize::MAX, 1)).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_dsd_huge_n_rep_is_an_error() {
        let err = Dsd::new(usize::MAX).unwrap().get_exmatrix(&(4, 2)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
        assert!(err.to_string().contains("n_rep"));
    }

    #[test]
    fn test_dsd_main_effects_orthogonal_for_exact_orders() {
        for (n_factor, n_fake) in [(10, 2), (44, 2)] {
            let ex = Dsd::new(1).unwrap().get_exmatrix(&(n_factor, n_fake)).unwrap();
            let m = Dsd::order(n_factor, n_fake) as i32;
            let gram = ex.t().dot(&ex);
            for i in 0..n_factor {
                for j in 0..n_factor {
                    let expected = if i == j { 2 * (m - 1) } else { 0 };
                    assert_eq!(gram[[i, j]], expected, "order {m} entry ({i}, {j})");
                }
            }
        }
    }

    #[test]
    fn test_dsd_rejects_bad_input() {
        let dsd = Dsd::new(1).unwrap();

        let err = dsd.get_exmatrix(&(0, 3)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
        let err = dsd.get_exmatrix(&(3, 0)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        let err = dsd.get_exmatrix(&(1, 1)).unwrap_err();
        assert!(err.is_unsupported());
        let err = dsd.get_exmatrix(&(48, 3)).unwrap_err();
        assert!(err.is_unsupported());
        assert!(err.to_string().contains("51"));
    }
}
