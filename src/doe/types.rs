//! Analyzer configuration and result types.

use std::fmt;
use std::str::FromStr;

use ndarray::{Array1, Array2};

use crate::error::{Error, Result};
use crate::generate::ExMatrix;

/// Result of a main-effect table analysis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetResult {
    /// The analysed design matrix.
    pub exmatrix: ExMatrix,
    /// The analysed result matrix.
    pub resmatrix: Array2<f64>,
    /// Effects, one row per factor and one column per result.
    pub effectmatrix: Array2<f64>,
}

/// Selection of columns for a one-way ANOVA.
///
/// `None` selects every column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnovaConfig {
    /// Factor (exmatrix column) indices, in output order.
    pub factor_ids: Option<Vec<usize>>,
    /// Result (resmatrix column) indices, in output order.
    pub result_ids: Option<Vec<usize>>,
}

/// Which line of an ANOVA pair a row is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnovaSource {
    /// Between-group variation of the factor.
    Group,
    /// Within-group variation.
    Residual,
}

impl fmt::Display for AnovaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group => f.write_str("group"),
            Self::Residual => f.write_str("Residual"),
        }
    }
}

/// One line of a one-way ANOVA table.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnovaRow {
    /// Group or residual line.
    pub source: AnovaSource,
    /// Degrees of freedom.
    pub df: usize,
    /// Sum of squares.
    pub sum_sq: f64,
    /// Mean square (`sum_sq / df`).
    pub mean_sq: f64,
    /// F statistic; NaN on residual lines.
    pub f_value: f64,
    /// Upper-tail p-value of `f_value`; NaN on residual lines.
    pub p_value: f64,
    /// Result column the line belongs to.
    pub result_id: usize,
    /// Position of the factor in the analysed selection.
    pub factor_id: usize,
}

/// A one-way ANOVA table.
///
/// Rows come in group/residual pairs, ordered by factor and then by result.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnovaTable {
    /// Table rows.
    pub rows: Vec<AnovaRow>,
}

impl AnovaTable {
    /// Column names of [`AnovaTable::to_array`].
    pub const COLUMNS: [&'static str; 7] =
        ["df", "sum_sq", "mean_sq", "F", "PR(>F)", "result_id", "factor_id"];

    /// Row labels, `group` or `Residual`.
    #[must_use]
    pub fn index(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.source.to_string()).collect()
    }

    /// The table as a numeric matrix with [`AnovaTable::COLUMNS`].
    #[must_use]
    pub fn to_array(&self) -> Array2<f64> {
        let mut out = Array2::zeros((self.rows.len(), Self::COLUMNS.len()));
        for (mut line, row) in out.rows_mut().into_iter().zip(&self.rows) {
            let values = [
                row.df as f64,
                row.sum_sq,
                row.mean_sq,
                row.f_value,
                row.p_value,
                row.result_id as f64,
                row.factor_id as f64,
            ];
            for (cell, value) in line.iter_mut().zip(values) {
                *cell = value;
            }
        }
        out
    }

    /// The group line for a factor position and result column.
    #[must_use]
    pub fn group_row(&self, factor_id: usize, result_id: usize) -> Option<&AnovaRow> {
        self.rows.iter().find(|row| {
            row.source == AnovaSource::Group
                && row.factor_id == factor_id
                && row.result_id == result_id
        })
    }
}

/// Result of a one-way ANOVA.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnovaResult {
    /// The analysed design matrix.
    pub exmatrix: ExMatrix,
    /// The analysed result matrix.
    pub resmatrix: Array2<f64>,
    /// The ANOVA table.
    pub table: AnovaTable,
}

/// Least-squares model family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ModelKind {
    /// Ordinary least squares.
    Ols,
    /// Weighted least squares.
    Wls,
    /// Generalized least squares.
    Gls,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ols => "OLS",
            Self::Wls => "WLS",
            Self::Gls => "GLS",
        })
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "OLS" => Ok(Self::Ols),
            "WLS" => Ok(Self::Wls),
            "GLS" => Ok(Self::Gls),
            _ => Err(Error::invalid_argument(format!(
                "model expected 'OLS', 'WLS', or 'GLS', got {s:?}"
            ))),
        }
    }
}

/// Handling of runs whose results contain NaN.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MissingPolicy {
    /// Pass every run to the model unchanged.
    #[default]
    None,
    /// Drop runs with a NaN result.
    Drop,
    /// Fail if any result is NaN.
    Raise,
}

/// Options for [`LinearAnalysis`](super::LinearAnalysis).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearFitOptions {
    /// Prepend a constant column unless the design already has one (default: true).
    pub add_const: bool,
    /// NaN handling (default: [`MissingPolicy::None`]).
    pub missing: MissingPolicy,
    /// Whether the regressors contain a constant; detected when `None`.
    pub has_const: Option<bool>,
    /// Per-run weights, used by [`ModelKind::Wls`].
    pub weights: Option<Vec<f64>>,
    /// Per-run error variances (or one shared value), used by [`ModelKind::Gls`].
    pub sigma: Option<Vec<f64>>,
}

impl Default for LinearFitOptions {
    fn default() -> Self {
        Self {
            add_const: true,
            missing: MissingPolicy::None,
            has_const: None,
            weights: None,
            sigma: None,
        }
    }
}

/// Everything a [`LinearModel`](super::LinearModel) needs to fit.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearProblem {
    /// Model family.
    pub kind: ModelKind,
    /// Regressors, with the constant column first when one was added.
    pub exog: Array2<f64>,
    /// Responses, one column per result.
    pub endog: Array2<f64>,
    /// Whether `exog` contains a constant column.
    pub has_const: bool,
    /// Per-run weights for WLS.
    pub weights: Option<Array1<f64>>,
    /// Error variances for GLS.
    pub sigma: Option<Array1<f64>>,
}

/// Estimates returned by a [`LinearModel`](super::LinearModel).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearFit {
    /// Coefficients, one row per regressor and one column per result.
    pub params: Array2<f64>,
    /// Standard errors, same shape as `params`.
    pub bse: Array2<f64>,
    /// Coefficient of determination per result.
    pub rsquared: Array1<f64>,
}

/// Result of a linear analysis.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearAnalysisResult {
    /// The analysed design matrix.
    pub exmatrix: ExMatrix,
    /// The analysed result matrix.
    pub resmatrix: Array2<f64>,
    /// Model family that was fitted.
    pub kind: ModelKind,
    /// Coefficients.
    pub params: Array2<f64>,
    /// Standard errors.
    pub bse: Array2<f64>,
    /// Coefficient of determination per result.
    pub rsquared: Array1<f64>,
}
