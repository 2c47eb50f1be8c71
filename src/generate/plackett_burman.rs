//! Plackett-Burman resolution-III screening designs.
//!
//! The run count for `n_factor` factors is the smallest multiple of 4 above
//! `n_factor`. The design is the leading `n_factor` columns of the base
//! matrix for that run count; see [`crate::tables`] for how each base
//! matrix is built.

use ndarray::s;
use tracing::debug;

use super::{check_n_rep, ExMatrix, Generator};
use crate::error::{Error, Result};
use crate::tables::{pb_base_matrix, pb_run_count, pb_strategy};

/// Largest factor count a Plackett-Burman design is built for.
pub const MAX_FACTORS: usize = 99;

/// Plackett-Burman generator.
///
/// # Example
///
/// ```
/// use exdesign::generate::{Generator, PlackettBurman};
///
/// let pb = PlackettBurman::new(1).unwrap();
/// let ex = pb.get_exmatrix(&11).unwrap();
/// assert_eq!(ex.dim(), (12, 11));
///
/// // 88..=91 factors would need the 92-run table entry
/// assert!(pb.get_exmatrix(&90).unwrap_err().is_unsupported());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlackettBurman {
    n_rep: usize,
}

impl PlackettBurman {
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
}

impl Generator for PlackettBurman {
    type Params = usize;

    fn name(&self) -> &'static str {
        "PlackettBurman"
    }

    fn n_rep(&self) -> usize {
        self.n_rep
    }

    fn base_matrix(&self, &n_factor: &usize) -> Result<ExMatrix> {
        if n_factor == 0 || n_factor > MAX_FACTORS {
            return Err(Error::invalid_argument(format!(
                "n_factor expected an integer in [1, {MAX_FACTORS}], got {n_factor}"
            )));
        }

        let run_count = pb_run_count(n_factor);
        let base = pb_base_matrix(run_count).map_err(|e| match e {
            Error::UnsupportedConfiguration { .. } => Error::unsupported(format!(
                "Plackett-Burman design for n_factor = {n_factor} needs {run_count} runs, which is not available"
            )),
            other => other,
        })?;

        debug!(
            n_factor,
            run_count,
            strategy = ?pb_strategy(run_count),
            n_rep = self.n_rep,
            "building Plackett-Burman design"
        );
        Ok(base.slice(s![.., ..n_factor]).to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_plackett_burman_fixture() {
        let ex = PlackettBurman::new(2).unwrap().get_exmatrix(&3).unwrap();
        let expected = array![
            [1, 1, -1],
            [-1, 1, 1],
            [1, -1, 1],
            [-1, -1, -1],
            [1, 1, -1],
            [-1, 1, 1],
            [1, -1, 1],
            [-1, -1, -1],
        ];
        assert_eq!(ex, expected);
    }

    #[test]
    fn test_plackett_burman_every_supported_size() {
        let pb = PlackettBurman::new(1).unwrap();
        for run_count in (4..=100).step_by(4).filter(|&r| r != 92) {
            let ex = pb.get_exmatrix(&(run_count - 1)).unwrap();
            assert_eq!(ex.dim(), (run_count, run_count - 1));

            let mut augmented = Array2::ones((run_count, run_count));
            augmented.slice_mut(s![.., ..run_count - 1]).assign(&ex);
            let gram = augmented.dot(&augmented.t());
            assert_eq!(gram, Array2::<i32>::eye(run_count) * run_count as i32);
        }
    }

    #[test]
    fn test_plackett_burman_table_boundary() {
        let pb = PlackettBurman::new(1).unwrap();
        // 4 factors need 8 runs; 3 factors fit the 4-run entry
        assert_eq!(pb.get_exmatrix(&3).unwrap().nrows(), 4);
        assert_eq!(pb.get_exmatrix(&4).unwrap().nrows(), 8);
        assert_eq!(pb.get_exmatrix(&8).unwrap().nrows(), 12);
        assert_eq!(pb.get_exmatrix(&7).unwrap().nrows(), 8);
    }

    #[test]
    fn test_plackett_burman_columns_are_prefix() {
        let pb = PlackettBurman::new(1).unwrap();
        let wide = pb.get_exmatrix(&11).unwrap();
        let narrow = pb.get_exmatrix(&8).unwrap();
        assert_eq!(narrow, wide.slice(s![.., ..8]));
    }

    #[test]
    fn test_plackett_burman_92_unsupported() {
        let pb = PlackettBurman::new(3).unwrap();
        for n_factor in 88..=91 {
            let err = pb.get_exmatrix(&n_factor).unwrap_err();
            assert!(err.is_unsupported());
            assert!(err.to_string().contains(&n_factor.to_string()));
        }
    }

    #[test]
    fn test_plackett_burman_rejects_out_of_range() {
        let pb = PlackettBurman::new(1).unwrap();
        for n_factor in [0, 100, 150] {
            let err = pb.get_exmatrix(&n_factor).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument { .. }));
            assert!(err.to_string().contains(&n_factor.to_string()));
        }
    }
}
