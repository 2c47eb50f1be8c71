//! Analysis of executed experiments.
//!
//! An [`Analyzer`] takes the design matrix that was run (`exmatrix`, one row
//! per run) together with the observed results (`resmatrix`, one row per run
//! and one column per measured response) and turns them into effect
//! estimates.
//!
//! ## Quick Start
//!
//! ```rust
//! use exdesign::doe::{Analyzer, AnovaConfig, MainEffectTable, OnewayAnova};
//! use exdesign::generate::{Generator, OneHot};
//! use ndarray::array;
//!
//! # fn main() -> exdesign::Result<()> {
//! let ex = OneHot::new(2)?.get_exmatrix(&3)?;
//! let res = array![[1.0], [2.0], [3.0], [1.5], [2.5], [3.5]];
//!
//! let met = MainEffectTable::default().analyze(&ex, &res)?;
//! assert!((met.effectmatrix[[2, 0]] - 1.0).abs() < 1e-12);
//!
//! let anova = OnewayAnova::new(AnovaConfig::default()).analyze(&ex, &res)?;
//! assert_eq!(anova.table.rows.len(), 3 * 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Analyzers
//!
//! ### Main-effect table
//!
//! For one-hot style 0/1 designs: the mean centred response over the runs
//! where each factor is switched on.
//!
//! ### One-way ANOVA
//!
//! Partitions the variation of every result column by the levels of every
//! factor column, with F statistics and p-values.
//!
//! ### Linear analysis
//!
//! Prepares an OLS, WLS or GLS problem and delegates the fit to a
//! [`LinearModel`] supplied by the caller.

mod anova;
mod linear;
mod main_effects;
mod stats;
mod types;

pub use anova::OnewayAnova;
pub use linear::{LinearAnalysis, LinearModel};
pub use main_effects::{MainEffectTable, Met};
pub use stats::{f_distribution_p_value, ln_gamma, regularized_incomplete_beta};
pub use types::{
    AnovaConfig, AnovaResult, AnovaRow, AnovaSource, AnovaTable, LinearAnalysisResult, LinearFit,
    LinearFitOptions, LinearProblem, MetResult, MissingPolicy, ModelKind,
};

#[cfg(feature = "parallel")]
pub(crate) use anova::{factor_rows, resolve_ids};
#[cfg(all(test, feature = "parallel"))]
pub(crate) use anova::tests::fixture as anova_fixture;

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::generate::ExMatrix;

/// Turns a design matrix and its observed results into an analysis.
pub trait Analyzer {
    /// The analysis result.
    type Output;

    /// Analyse `resmatrix`, observed on the runs of `exmatrix`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShapeMismatch`] when the matrices have different run
    /// counts and [`Error::InvalidArgument`] when either is empty or fails
    /// the analyzer's own checks.
    fn analyze(&self, exmatrix: &ExMatrix, resmatrix: &Array2<f64>) -> Result<Self::Output>;
}

/// Check that a design and its results are non-empty and have the same runs.
pub(crate) fn validate_pair(exmatrix: &ExMatrix, resmatrix: &Array2<f64>) -> Result<()> {
    if exmatrix.is_empty() {
        return Err(Error::invalid_argument(format!(
            "exmatrix expected at least one run and one factor, got shape {:?}",
            exmatrix.dim()
        )));
    }
    if resmatrix.is_empty() {
        return Err(Error::invalid_argument(format!(
            "resmatrix expected at least one run and one result, got shape {:?}",
            resmatrix.dim()
        )));
    }
    if exmatrix.nrows() != resmatrix.nrows() {
        return Err(Error::shape_mismatch(exmatrix.dim(), resmatrix.dim()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_validate_pair() {
        assert!(validate_pair(&array![[1, 0]], &array![[2.0]]).is_ok());

        let err = validate_pair(&array![[1], [0]], &array![[2.0]]).unwrap_err();
        assert_eq!(err, Error::shape_mismatch((2, 1), (1, 1)));

        let empty = ExMatrix::zeros((0, 3));
        let err = validate_pair(&empty, &Array2::zeros((0, 1))).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        let err = validate_pair(&array![[1]], &Array2::zeros((1, 0))).unwrap_err();
        assert!(err.to_string().contains("resmatrix"));
    }

    #[test]
    fn test_analyzers_share_trait() {
        fn runs<A: Analyzer>(analyzer: &A, ex: &ExMatrix, res: &Array2<f64>) -> bool {
            analyzer.analyze(ex, res).is_ok()
        }

        let ex = array![[1, 0], [0, 1], [1, 0], [0, 1]];
        let res = array![[1.0], [2.0], [1.5], [2.5]];
        assert!(runs(&MainEffectTable::default(), &ex, &res));
        assert!(runs(&OnewayAnova::default(), &ex, &res));
    }
}
