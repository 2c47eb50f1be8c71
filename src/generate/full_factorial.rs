//! Full-factorial designs.
//!
//! The base design is the Cartesian product of `0..levels[i]` over every
//! factor, in lexicographic order with the last factor varying fastest.
//!
//! ## Example
//!
//! ```
//! use exdesign::generate::{FullFactorial, Generator};
//!
//! let ff = FullFactorial::new(1).unwrap();
//! let ex = ff.get_exmatrix(&[2, 3]).unwrap();
//!
//! assert_eq!(ex.dim(), (6, 2));
//! assert_eq!(ex.row(1).to_vec(), vec![0, 1]);
//! assert_eq!(ex.row(3).to_vec(), vec![1, 0]);
//! ```

use ndarray::Array2;
use tracing::debug;

use super::{check_n_rep, ExMatrix, Generator};
use crate::error::{Error, Result};
use crate::utils::is_positive_int_list;

/// Full-factorial generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullFactorial {
    n_rep: usize,
}

impl FullFactorial {
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

    /// Number of runs in one replicate, or `None` on overflow.
    #[must_use]
    pub fn runs(levels: &[usize]) -> Option<usize> {
        levels.iter().try_fold(1usize, |acc, &l| acc.checked_mul(l))
    }
}

impl Generator for FullFactorial {
    type Params = [usize];

    fn name(&self) -> &'static str {
        "FullFactorial"
    }

    fn n_rep(&self) -> usize {
        self.n_rep
    }

    fn base_matrix(&self, levels: &[usize]) -> Result<ExMatrix> {
        if !is_positive_int_list(levels) {
            return Err(Error::invalid_argument(format!(
                "levels expected a non-empty list of positive integers, got {levels:?}"
            )));
        }

        let runs = Self::runs(levels).ok_or_else(|| {
            Error::invalid_argument(format!("levels {levels:?} give too many runs"))
        })?;
        let max_level = levels.iter().copied().max().unwrap_or(1);
        if i32::try_from(max_level).is_err() {
            return Err(Error::invalid_argument(format!(
                "level {max_level} does not fit a coded design value"
            )));
        }

        // strides[j] = product of levels[j+1..]
        let mut strides = vec![1usize; levels.len()];
        for j in (0..levels.len().saturating_sub(1)).rev() {
            strides[j] = strides[j + 1] * levels[j + 1];
        }

        debug!(?levels, runs, n_rep = self.n_rep, "building full-factorial design");

        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        let ex = Array2::from_shape_fn((runs, levels.len()), |(r, j)| {
            ((r / strides[j]) % levels[j]) as i32
        });
        Ok(ex)
    }
}
