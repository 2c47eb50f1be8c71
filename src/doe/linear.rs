//! Least-squares analysis over an external model.
//!
//! [`LinearAnalysis`] prepares the regression problem (shape checks, NaN
//! handling, constant column, weights and error variances) and hands it to a
//! [`LinearModel`] supplied by the caller. The crate does not estimate
//! coefficients itself.

use ndarray::{Array1, Array2, Axis};
use tracing::debug;

use super::types::{
    LinearAnalysisResult, LinearFit, LinearFitOptions, LinearProblem, MissingPolicy, ModelKind,
};
use super::{validate_pair, Analyzer};
use crate::error::{Error, Result};
use crate::generate::ExMatrix;

/// A least-squares estimator.
///
/// Closures of the form `Fn(&LinearProblem) -> Result<LinearFit>` implement
/// this trait.
pub trait LinearModel {
    /// Fit the problem and return coefficients, standard errors and R².
    ///
    /// # Errors
    ///
    /// Whatever the estimator reports, for example a singular design.
    fn fit(&self, problem: &LinearProblem) -> Result<LinearFit>;
}

impl<F> LinearModel for F
where
    F: Fn(&LinearProblem) -> Result<LinearFit>,
{
    fn fit(&self, problem: &LinearProblem) -> Result<LinearFit> {
        self(problem)
    }
}

/// Linear regression analyzer.
#[derive(Debug, Clone)]
pub struct LinearAnalysis<M> {
    kind: ModelKind,
    model: M,
    options: LinearFitOptions,
}

impl<M: LinearModel> LinearAnalysis<M> {
    /// Create an analyzer with default options.
    pub fn new(kind: ModelKind, model: M) -> Self {
        Self {
            kind,
            model,
            options: LinearFitOptions::default(),
        }
    }

    /// Create an analyzer from a model name: `"OLS"`, `"WLS"` or `"GLS"`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for any other name.
    pub fn from_name(name: &str, model: M) -> Result<Self> {
        Ok(Self::new(name.parse()?, model))
    }

    /// Replace the fit options.
    #[must_use]
    pub fn with_options(mut self, options: LinearFitOptions) -> Self {
        self.options = options;
        self
    }

    /// Model family.
    #[must_use]
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Fit options.
    #[must_use]
    pub fn options(&self) -> &LinearFitOptions {
        &self.options
    }

    /// Build the problem that would be passed to the model.
    ///
    /// # Errors
    ///
    /// - [`Error::ShapeMismatch`] if the run counts differ.
    /// - [`Error::InvalidArgument`] for an empty matrix, weights or sigma of
    ///   the wrong length, NaN results under [`MissingPolicy::Raise`], or no
    ///   runs left under [`MissingPolicy::Drop`].
    pub fn problem(&self, exmatrix: &ExMatrix, resmatrix: &Array2<f64>) -> Result<LinearProblem> {
        validate_pair(exmatrix, resmatrix)?;
        let n = exmatrix.nrows();

        let weights = match (self.kind, &self.options.weights) {
            (ModelKind::Wls, Some(w)) if w.len() == n => Some(Array1::from(w.clone())),
            (ModelKind::Wls, Some(w)) => {
                return Err(Error::invalid_argument(format!(
                    "weights expected {n} values, one per run, got {}",
                    w.len()
                )))
            }
            (ModelKind::Wls, None) => Some(Array1::ones(n)),
            _ => None,
        };
        let sigma = match (self.kind, &self.options.sigma) {
            (ModelKind::Gls, Some(s)) if s.len() == 1 => Some(Array1::from_elem(n, s[0])),
            (ModelKind::Gls, Some(s)) if s.len() == n => Some(Array1::from(s.clone())),
            (ModelKind::Gls, Some(s)) => {
                return Err(Error::invalid_argument(format!(
                    "sigma expected 1 or {n} values, got {}",
                    s.len()
                )))
            }
            _ => None,
        };

        let complete: Vec<usize> = (0..n)
            .filter(|&run| resmatrix.row(run).iter().all(|v| !v.is_nan()))
            .collect();
        let keep = match self.options.missing {
            MissingPolicy::None => None,
            MissingPolicy::Raise if complete.len() < n => {
                return Err(Error::invalid_argument(format!(
                    "resmatrix contains NaN in {} of {n} runs",
                    n - complete.len()
                )))
            }
            MissingPolicy::Raise => None,
            MissingPolicy::Drop if complete.is_empty() => {
                return Err(Error::invalid_argument(
                    "resmatrix has no run without NaN",
                ))
            }
            MissingPolicy::Drop => Some(complete),
        };

        let mut exog = exmatrix.mapv(f64::from);
        let mut endog = resmatrix.clone();
        let (mut weights, mut sigma) = (weights, sigma);
        if let Some(rows) = &keep {
            exog = exog.select(Axis(0), rows);
            endog = endog.select(Axis(0), rows);
            weights = weights.map(|w| w.select(Axis(0), rows));
            sigma = sigma.map(|s| s.select(Axis(0), rows));
        }

        let detected = has_constant_column(&exog);
        let added = self.options.add_const && !detected;
        if added {
            exog = Array2::from_shape_fn((exog.nrows(), exog.ncols() + 1), |(i, j)| {
                if j == 0 {
                    1.0
                } else {
                    exog[[i, j - 1]]
                }
            });
        }
        let has_const = self.options.has_const.unwrap_or(detected || added);

        debug!(
            model = %self.kind,
            runs = exog.nrows(),
            regressors = exog.ncols(),
            dropped = n - exog.nrows(),
            added_const = added,
            "prepared linear problem"
        );

        Ok(LinearProblem {
            kind: self.kind,
            exog,
            endog,
            has_const,
            weights,
            sigma,
        })
    }
}

impl<M: LinearModel> Analyzer for LinearAnalysis<M> {
    type Output = LinearAnalysisResult;

    fn analyze(&self, exmatrix: &ExMatrix, resmatrix: &Array2<f64>) -> Result<LinearAnalysisResult> {
        let problem = self.problem(exmatrix, resmatrix)?;
        let fit = self.model.fit(&problem)?;

        let expected = (problem.exog.ncols(), problem.endog.ncols());
        if fit.params.dim() != expected {
            return Err(Error::shape_mismatch(expected, fit.params.dim()));
        }
        if fit.bse.dim() != expected {
            return Err(Error::shape_mismatch(expected, fit.bse.dim()));
        }
        if fit.rsquared.len() != expected.1 {
            return Err(Error::shape_mismatch((expected.1, 1), (fit.rsquared.len(), 1)));
        }

        Ok(LinearAnalysisResult {
            exmatrix: exmatrix.clone(),
            resmatrix: resmatrix.clone(),
            kind: self.kind,
            params: fit.params,
            bse: fit.bse,
            rsquared: fit.rsquared,
        })
    }
}

/// A column with one nonzero value repeated in every run.
fn has_constant_column(exog: &Array2<f64>) -> bool {
    exog.columns().into_iter().any(|column| {
        let first = column[0];
        first != 0.0 && column.iter().all(|&v| v == first)
    })
}
