//! Main-effect table for one-hot designs.
//!
//! For a 0/1 design X and results Y, the effect of factor i on result j is
//! the mean of the centred results over the runs where factor i is on:
//!
//! ```text
//! effect = (X / colsum(X))ᵀ · (Y - colmean(Y))
//! ```

use ndarray::{Array2, Axis};
use tracing::debug;

use super::types::MetResult;
use super::{validate_pair, Analyzer};
use crate::error::{Error, Result};
use crate::generate::ExMatrix;
use crate::utils::is_binary_matrix;

/// Main-effect table analyzer.
///
/// # Example
///
/// ```
/// use exdesign::doe::{Analyzer, MainEffectTable};
/// use ndarray::array;
///
/// let met = MainEffectTable::new(1).unwrap();
/// let result = met
///     .analyze(
///         &array![[1, 1, 0, 1], [1, 1, 1, 0], [1, 0, 1, 1], [1, 0, 0, 0]],
///         &array![[3., 4., 7.], [4., 9., 8.], [5., 8., 3.], [8., 3., 6.]],
///     )
///     .unwrap();
///
/// assert_eq!(result.effectmatrix.row(1).to_vec(), vec![-1.5, 0.5, 1.5]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MainEffectTable {
    max_dim_inter: usize,
}

/// Short alias for [`MainEffectTable`].
pub type Met = MainEffectTable;

impl MainEffectTable {
    /// Create a main-effect table analyzer.
    ///
    /// Only single-factor effects are available, so `max_dim_inter` must be 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `max_dim_inter` is 0 and
    /// [`Error::UnsupportedConfiguration`] if it is greater than 1.
    pub fn new(max_dim_inter: usize) -> Result<Self> {
        match max_dim_inter {
            0 => Err(Error::invalid_argument(
                "max_dim_inter: number of dimension expected positive integer, got 0",
            )),
            1 => Ok(Self { max_dim_inter }),
            _ => Err(Error::unsupported(format!(
                "max_dim_inter expected 1, the main-effect table only covers single factors, got {max_dim_inter}"
            ))),
        }
    }

    /// Highest interaction order analysed.
    #[must_use]
    pub fn max_dim_inter(&self) -> usize {
        self.max_dim_inter
    }
}

impl Default for MainEffectTable {
    fn default() -> Self {
        Self { max_dim_inter: 1 }
    }
}

impl Analyzer for MainEffectTable {
    type Output = MetResult;

    fn analyze(&self, exmatrix: &ExMatrix, resmatrix: &Array2<f64>) -> Result<MetResult> {
        validate_pair(exmatrix, resmatrix)?;
        if !is_binary_matrix(exmatrix) {
            return Err(Error::invalid_argument(format!(
                "exmatrix expected a matrix in which all elements are 0 or 1, got:\n{exmatrix}"
            )));
        }

        let x = exmatrix.mapv(f64::from);
        let scaled = &x / &x.sum_axis(Axis(0));
        let Some(mean) = resmatrix.mean_axis(Axis(0)) else {
            return Err(Error::invalid_argument("resmatrix has no runs"));
        };
        let centred = resmatrix - &mean;
        let effectmatrix = scaled.t().dot(&centred);

        debug!(
            runs = exmatrix.nrows(),
            factors = exmatrix.ncols(),
            results = resmatrix.ncols(),
            "computed main-effect table"
        );

        Ok(MetResult {
            exmatrix: exmatrix.clone(),
            resmatrix: resmatrix.clone(),
            effectmatrix,
        })
    }
}
