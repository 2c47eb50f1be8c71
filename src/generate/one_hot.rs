//! One-factor-at-a-time designs.
//!
//! Each run switches on exactly one factor. An optional all-zero row acts as
//! a negative control.

use ndarray::Array2;
use tracing::debug;

use super::{check_n_rep, ExMatrix, Generator};
use crate::error::{Error, Result};

/// One-hot generator: the identity matrix, optionally with a control row.
///
/// # Example
///
/// ```
/// use exdesign::generate::{Generator, OneHot};
/// use ndarray::array;
///
/// let oh = OneHot::new(1).unwrap().with_control_row(true);
/// let ex = oh.get_exmatrix(&2).unwrap();
///
/// assert_eq!(ex, array![[1, 0], [0, 1], [0, 0]]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneHot {
    n_rep: usize,
    control_row: bool,
}

impl OneHot {
    /// Create a generator without a control row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `n_rep` is 0.
    pub fn new(n_rep: usize) -> Result<Self> {
        Ok(Self {
            n_rep: check_n_rep(n_rep)?,
            control_row: false,
        })
    }

    /// Append an all-zero negative-control row to every replicate.
    #[must_use]
    pub fn with_control_row(mut self, control_row: bool) -> Self {
        self.control_row = control_row;
        self
    }

    /// Whether the design carries a control row.
    #[must_use]
    pub fn control_row(&self) -> bool {
        self.control_row
    }
}

impl Generator for OneHot {
    type Params = usize;

    fn name(&self) -> &'static str {
        "OneHot"
    }

    fn n_rep(&self) -> usize {
        self.n_rep
    }

    fn base_matrix(&self, &n_factor: &usize) -> Result<ExMatrix> {
        if n_factor == 0 {
            return Err(Error::invalid_argument(
                "n_factor expected a positive integer, got 0",
            ));
        }

        let runs = n_factor + usize::from(self.control_row);
        debug!(n_factor, runs, control_row = self.control_row, "building one-hot design");

        Ok(Array2::from_shape_fn((runs, n_factor), |(i, j)| i32::from(i == j)))
    }
}
