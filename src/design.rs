//! Read-only inspection of design matrices.
//!
//! Nothing here modifies a design; these helpers answer the questions a
//! caller asks before running an experiment: how many runs, which levels
//! appear, whether factors are balanced, and how strongly they correlate.

use std::collections::BTreeMap;
use std::fmt;

use ndarray::{Array1, Array2, Axis};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::generate::ExMatrix;

/// Sum of each column.
///
/// # Example
///
/// ```
/// use exdesign::design::column_sums;
/// use ndarray::array;
///
/// assert_eq!(column_sums(&array![[1, 0], [1, 1]]).to_vec(), vec![2, 1]);
/// ```
#[must_use]
pub fn column_sums(exmatrix: &ExMatrix) -> Array1<i32> {
    exmatrix.sum_axis(Axis(0))
}

/// Pearson correlation between every pair of factor columns.
///
/// Only main effects (`max_dim = 1`) are supported. A constant column has no
/// defined correlation, so its row and column are NaN.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `max_dim` is 0 or the matrix has
/// fewer than two runs, and [`Error::UnsupportedConfiguration`] if
/// `max_dim > 1`.
///
/// # Example
///
/// ```
/// use exdesign::design::correlation_matrix;
/// use exdesign::generate::{Generator, OneHot};
///
/// let ex = OneHot::new(1).unwrap().get_exmatrix(&3).unwrap();
/// let corr = correlation_matrix(&ex, 1).unwrap();
///
/// assert!((corr[[0, 0]] - 1.0).abs() < 1e-12);
/// assert!((corr[[0, 1]] + 0.5).abs() < 1e-12);
/// ```
pub fn correlation_matrix(exmatrix: &ExMatrix, max_dim: usize) -> Result<Array2<f64>> {
    match max_dim {
        0 => {
            return Err(Error::invalid_argument(
                "max_dim expected a positive integer, got 0",
            ))
        }
        1 => {}
        _ => {
            return Err(Error::unsupported(format!(
                "correlation of interactions is not available, max_dim expected 1, got {max_dim}"
            )))
        }
    }

    let (runs, k) = exmatrix.dim();
    if runs < 2 {
        return Err(Error::invalid_argument(format!(
            "correlation needs at least 2 runs, got {runs}"
        )));
    }

    let x = exmatrix.mapv(f64::from);
    let Some(mean) = x.mean_axis(Axis(0)) else {
        return Err(Error::invalid_argument("exmatrix has no runs"));
    };
    let centered = &x - &mean;
    let cross = centered.t().dot(&centered);

    Ok(Array2::from_shape_fn((k, k), |(i, j)| {
        let norm = (cross[[i, i]] * cross[[j, j]]).sqrt();
        if norm > 0.0 {
            cross[[i, j]] / norm
        } else {
            f64::NAN
        }
    }))
}

/// Structural summary of a design matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DesignSummary {
    /// Number of runs (rows).
    pub runs: usize,
    /// Number of factors (columns).
    pub factors: usize,
    /// Count of every value, per column, in ascending value order.
    pub level_counts: Vec<BTreeMap<i32, usize>>,
    /// Whether each column uses all of its values equally often.
    pub balanced: Vec<bool>,
    /// Whether `XᵀX` is diagonal, i.e. every pair of columns is orthogonal.
    pub orthogonal: bool,
}

impl DesignSummary {
    /// Summarise a design matrix.
    ///
    /// # Example
    ///
    /// ```
    /// use exdesign::design::DesignSummary;
    /// use exdesign::generate::{Generator, PlackettBurman};
    ///
    /// let ex = PlackettBurman::new(1).unwrap().get_exmatrix(&7).unwrap();
    /// let summary = DesignSummary::of(&ex);
    ///
    /// assert_eq!((summary.runs, summary.factors), (8, 7));
    /// assert!(summary.orthogonal);
    /// assert!(summary.balanced.iter().all(|&b| b));
    /// ```
    #[must_use]
    pub fn of(exmatrix: &ExMatrix) -> Self {
        let (runs, factors) = exmatrix.dim();

        let level_counts: Vec<BTreeMap<i32, usize>> = exmatrix
            .columns()
            .into_iter()
            .map(|column| {
                let mut counts = BTreeMap::new();
                for &v in column {
                    *counts.entry(v).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let balanced = level_counts
            .iter()
            .map(|counts| {
                let mut values = counts.values();
                values
                    .next()
                    .map_or(true, |first| values.all(|count| count == first))
            })
            .collect();

        let gram = exmatrix.t().dot(exmatrix);
        let orthogonal = gram
            .indexed_iter()
            .all(|((i, j), &v)| i == j || v == 0);

        Self {
            runs,
            factors,
            level_counts,
            balanced,
            orthogonal,
        }
    }

    /// Distinct values of one column, ascending.
    ///
    /// Returns `None` if `factor` is out of range.
    #[must_use]
    pub fn levels(&self, factor: usize) -> Option<Vec<i32>> {
        self.level_counts
            .get(factor)
            .map(|counts| counts.keys().copied().collect())
    }
}

impl fmt::Display for DesignSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} runs x {} factors", self.runs, self.factors)?;
        for (j, counts) in self.level_counts.iter().enumerate() {
            let levels: Vec<String> = counts.iter().map(|(v, n)| format!("{v}:{n}")).collect();
            writeln!(
                f,
                "  factor {j}: {}{}",
                levels.join(" "),
                if self.balanced[j] { "" } else { " (unbalanced)" }
            )?;
        }
        write!(f, "  orthogonal: {}", self.orthogonal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{Dsd, FullFactorial, Generator, OneHot};
    use ndarray::array;

    #[test]
    fn test_correlation_one_hot() {
        let ex = OneHot::new(1).unwrap().get_exmatrix(&4).unwrap();
        let corr = correlation_matrix(&ex, 1).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == j { 1.0 } else { -1.0 / 3.0 };
                assert!((corr[[i, j]] - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_correlation_constant_column_is_nan() {
        let ex = array![[1, 0], [1, 1], [1, 0]];
        let corr = correlation_matrix(&ex, 1).unwrap();
        assert!(corr[[0, 0]].is_nan());
        assert!(corr[[0, 1]].is_nan());
        assert!((corr[[1, 1]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_dsd_is_zero() {
        let ex = Dsd::new(1).unwrap().get_exmatrix(&(5, 1)).unwrap();
        let corr = correlation_matrix(&ex, 1).unwrap();
        for i in 0..5 {
            for j in 0..5 {
                if i != j {
                    assert!(corr[[i, j]].abs() < 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_correlation_options() {
        let ex = array![[1, 0], [0, 1]];
        assert!(correlation_matrix(&ex, 2).unwrap_err().is_unsupported());
        assert!(matches!(
            correlation_matrix(&ex, 0).unwrap_err(),
            Error::InvalidArgument { .. }
        ));
        assert!(correlation_matrix(&array![[1, 0]], 1).is_err());
    }

    #[test]
    fn test_summary_full_factorial() {
        let ex = FullFactorial::new(1).unwrap().get_exmatrix(&[2, 3]).unwrap();
        let summary = DesignSummary::of(&ex);

        assert_eq!(summary.runs, 6);
        assert_eq!(summary.levels(1), Some(vec![0, 1, 2]));
        assert_eq!(summary.level_counts[0][&0], 3);
        assert!(summary.balanced.iter().all(|&b| b));
        assert_eq!(summary.levels(2), None);
        // 0/1/2 coding is not centred, so XᵀX is not diagonal
        assert!(!summary.orthogonal);
    }

    #[test]
    fn test_summary_unbalanced() {
        let ex = OneHot::new(1).unwrap().with_control_row(true).get_exmatrix(&2).unwrap();
        let summary = DesignSummary::of(&ex);
        assert_eq!(summary.balanced, vec![false, false]);

        let text = summary.to_string();
        assert!(text.starts_with("3 runs x 2 factors"));
        assert!(text.contains("unbalanced"));
    }
}
