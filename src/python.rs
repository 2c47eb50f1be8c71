//! Python bindings for exdesign.
//!
//! This module exposes the generators and analyzers to Python using PyO3.
//! Enable the `python` feature to use this. Matrices cross the boundary as
//! lists of lists.

use ndarray::Array2;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::doe::{Analyzer, AnovaConfig, AnovaTable, MainEffectTable, OnewayAnova};
use crate::error::Error;
use crate::generate::{Dsd, ExMatrix, FullFactorial, Generator, OneHot, PlackettBurman};
use crate::utils::to_int_matrix;

fn to_py_err(err: Error) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Accept integer-valued floats, as numeric arrays from Python usually are.
fn exmatrix_from_rows(rows: &[Vec<f64>]) -> PyResult<ExMatrix> {
    to_int_matrix(&from_rows("exmatrix", rows)?).map_err(to_py_err)
}

fn to_rows<T: Copy>(matrix: &Array2<T>) -> Vec<Vec<T>> {
    matrix.rows().into_iter().map(|row| row.to_vec()).collect()
}

fn from_rows<T: Copy + Default>(name: &str, rows: &[Vec<T>]) -> PyResult<Array2<T>> {
    let ncols = rows.first().map_or(0, Vec::len);
    if rows.iter().any(|row| row.len() != ncols) {
        return Err(PyValueError::new_err(format!(
            "{name} expected rows of equal length"
        )));
    }
    let mut matrix = Array2::default((rows.len(), ncols));
    for (mut line, row) in matrix.rows_mut().into_iter().zip(rows) {
        for (cell, value) in line.iter_mut().zip(row) {
            *cell = *value;
        }
    }
    Ok(matrix)
}

/// Full-factorial design over the given level counts.
#[pyfunction]
#[pyo3(signature = (levels, n_rep=1))]
fn full_factorial(levels: Vec<usize>, n_rep: usize) -> PyResult<Vec<Vec<i32>>> {
    let generator = FullFactorial::new(n_rep).map_err(to_py_err)?;
    let ex = generator.get_exmatrix(&levels).map_err(to_py_err)?;
    Ok(to_rows(&ex))
}

/// One-hot design, optionally with an all-zero control run.
#[pyfunction]
#[pyo3(signature = (n_factor, n_rep=1, control_row=false))]
fn one_hot(n_factor: usize, n_rep: usize, control_row: bool) -> PyResult<Vec<Vec<i32>>> {
    let generator = OneHot::new(n_rep)
        .map_err(to_py_err)?
        .with_control_row(control_row);
    let ex = generator.get_exmatrix(&n_factor).map_err(to_py_err)?;
    Ok(to_rows(&ex))
}

/// Plackett-Burman screening design.
#[pyfunction]
#[pyo3(signature = (n_factor, n_rep=1))]
fn plackett_burman(n_factor: usize, n_rep: usize) -> PyResult<Vec<Vec<i32>>> {
    let generator = PlackettBurman::new(n_rep).map_err(to_py_err)?;
    let ex = generator.get_exmatrix(&n_factor).map_err(to_py_err)?;
    Ok(to_rows(&ex))
}

/// Definitive screening design.
#[pyfunction]
#[pyo3(signature = (n_factor, n_fake=2, n_rep=1))]
fn dsd(n_factor: usize, n_fake: usize, n_rep: usize) -> PyResult<Vec<Vec<i32>>> {
    let generator = Dsd::new(n_rep).map_err(to_py_err)?;
    let ex = generator.get_exmatrix(&(n_factor, n_fake)).map_err(to_py_err)?;
    Ok(to_rows(&ex))
}

/// Main-effect table of a 0/1 design, one row per factor.
#[pyfunction]
fn main_effect_table(exmatrix: Vec<Vec<f64>>, resmatrix: Vec<Vec<f64>>) -> PyResult<Vec<Vec<f64>>> {
    let ex = exmatrix_from_rows(&exmatrix)?;
    let res = from_rows("resmatrix", &resmatrix)?;
    let result = MainEffectTable::default()
        .analyze(&ex, &res)
        .map_err(to_py_err)?;
    Ok(to_rows(&result.effectmatrix))
}

/// One-way ANOVA table as rows of
/// `[df, sum_sq, mean_sq, F, PR(>F), result_id, factor_id]`.
#[pyfunction]
#[pyo3(signature = (exmatrix, resmatrix, factor_ids=None, result_ids=None))]
fn oneway_anova(
    exmatrix: Vec<Vec<f64>>,
    resmatrix: Vec<Vec<f64>>,
    factor_ids: Option<Vec<usize>>,
    result_ids: Option<Vec<usize>>,
) -> PyResult<Vec<Vec<f64>>> {
    let ex = exmatrix_from_rows(&exmatrix)?;
    let res = from_rows("resmatrix", &resmatrix)?;
    let anova = OnewayAnova::new(AnovaConfig {
        factor_ids,
        result_ids,
    });
    let result = anova.analyze(&ex, &res).map_err(to_py_err)?;
    Ok(to_rows(&result.table.to_array()))
}

/// The exdesign Python module.
#[pymodule]
fn exdesign(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    m.add("ANOVA_COLUMNS", AnovaTable::COLUMNS.to_vec())?;
    m.add_function(wrap_pyfunction!(full_factorial, m)?)?;
    m.add_function(wrap_pyfunction!(one_hot, m)?)?;
    m.add_function(wrap_pyfunction!(plackett_burman, m)?)?;
    m.add_function(wrap_pyfunction!(dsd, m)?)?;
    m.add_function(wrap_pyfunction!(main_effect_table, m)?)?;
    m.add_function(wrap_pyfunction!(oneway_anova, m)?)?;
    Ok(())
}
