//! Parallel replication and analysis using Rayon.
//!
//! Enable with the `parallel` feature flag. Every function here returns
//! exactly what its sequential counterpart returns.
//!
//! # Usage
//!
//! ```
//! use exdesign::generate::{replicate, FullFactorial, Generator};
//! use exdesign::parallel::par_replicate;
//!
//! let base = FullFactorial::new(1).unwrap().base_matrix(&[3, 3]).unwrap();
//! assert_eq!(par_replicate(&base, 4).unwrap(), replicate(&base, 4).unwrap());
//! ```
//!
//! # Performance
//!
//! Parallelism pays off for large designs and wide result matrices. For
//! small inputs the sequential versions may be faster due to scheduling
//! overhead.

use ndarray::Array2;
use rayon::prelude::*;

use crate::error::Result;
use crate::generate::{replicated_shape, ExMatrix};

#[cfg(feature = "doe")]
use crate::doe::{factor_rows, resolve_ids, AnovaConfig, AnovaResult, AnovaTable};

/// Stack `n_rep` copies of `base`, generating rows in parallel.
///
/// Equal to [`replicate`](crate::generate::replicate).
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) when the
/// stacked design would not be addressable, checked before any allocation.
pub fn par_replicate(base: &ExMatrix, n_rep: usize) -> Result<ExMatrix> {
    let (total, factors) = replicated_shape(base, n_rep)?;
    let runs = base.nrows();

    let rows: Vec<Vec<i32>> = (0..total)
        .into_par_iter()
        .map(|run| base.row(run % runs).to_vec())
        .collect();

    let mut data = Array2::zeros((total, factors));
    for (mut line, row) in data.rows_mut().into_iter().zip(rows) {
        for (cell, value) in line.iter_mut().zip(row) {
            *cell = value;
        }
    }
    Ok(data)
}

/// One-way ANOVA with factors processed on the Rayon pool.
///
/// Equal to [`OnewayAnova::analyze`](crate::doe::OnewayAnova) with the same
/// configuration, row order included.
///
/// # Errors
///
/// Same as [`OnewayAnova`](crate::doe::OnewayAnova): mismatched run counts,
/// empty matrices and invalid column selections.
#[cfg(feature = "doe")]
pub fn par_anova(
    exmatrix: &ExMatrix,
    resmatrix: &Array2<f64>,
    config: &AnovaConfig,
) -> Result<AnovaResult> {
    let (factor_ids, result_ids) = resolve_ids(config, exmatrix, resmatrix)?;

    let rows = factor_ids
        .par_iter()
        .enumerate()
        .map(|(position, &factor)| factor_rows(exmatrix, resmatrix, position, factor, &result_ids))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect();

    Ok(AnovaResult {
        exmatrix: exmatrix.clone(),
        resmatrix: resmatrix.clone(),
        table: AnovaTable { rows },
    })
}
