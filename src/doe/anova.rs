//! One-way ANOVA of every selected result against every selected factor.
//!
//! Each factor column splits the runs into groups by coded level. For a
//! result column y with n runs and k groups:
//!
//! - group: `df = k - 1`, `SS = Σ nᵢ (ȳᵢ - ȳ)²`
//! - residual: `df = n - k`, `SS = Σ (y - ȳᵢ)²`
//!
//! `F = MS_group / MS_residual` and the p-value is its F-distribution upper
//! tail.

use std::collections::BTreeMap;

use ndarray::{Array2, ArrayView1};
use tracing::{debug, trace};

use super::stats::f_distribution_p_value;
use super::types::{AnovaConfig, AnovaResult, AnovaRow, AnovaSource, AnovaTable};
use super::{validate_pair, Analyzer};
use crate::error::{Error, Result};
use crate::generate::ExMatrix;
use crate::utils::is_correct_id_list;

/// One-way ANOVA analyzer.
///
/// # Example
///
/// ```
/// use exdesign::doe::{Analyzer, AnovaConfig, OnewayAnova};
/// use ndarray::array;
///
/// let ex = array![[0], [0], [1], [1]];
/// let res = array![[1.0, 5.0], [2.0, 5.0], [4.0, 6.0], [5.0, 7.0]];
///
/// let anova = OnewayAnova::new(AnovaConfig {
///     result_ids: Some(vec![0]),
///     ..Default::default()
/// });
/// let table = anova.analyze(&ex, &res).unwrap().table;
///
/// assert_eq!(table.rows.len(), 2);
/// assert_eq!(table.rows[0].df, 1);
/// assert!((table.rows[0].sum_sq - 9.0).abs() < 1e-12);
/// assert!((table.rows[1].sum_sq - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnewayAnova {
    config: AnovaConfig,
}

impl OnewayAnova {
    /// Create an analyzer for the selected columns.
    #[must_use]
    pub fn new(config: AnovaConfig) -> Self {
        Self { config }
    }

    /// Get the column selection.
    #[must_use]
    pub fn config(&self) -> &AnovaConfig {
        &self.config
    }
}

impl Analyzer for OnewayAnova {
    type Output = AnovaResult;

    fn analyze(&self, exmatrix: &ExMatrix, resmatrix: &Array2<f64>) -> Result<AnovaResult> {
        let (factor_ids, result_ids) = resolve_ids(&self.config, exmatrix, resmatrix)?;

        let rows = factor_ids
            .iter()
            .enumerate()
            .flat_map(|(position, &factor)| {
                factor_rows(exmatrix, resmatrix, position, factor, &result_ids)
            })
            .collect();

        debug!(
            factors = factor_ids.len(),
            results = result_ids.len(),
            "computed one-way ANOVA"
        );

        Ok(AnovaResult {
            exmatrix: exmatrix.clone(),
            resmatrix: resmatrix.clone(),
            table: AnovaTable { rows },
        })
    }
}

/// Validate the pair and resolve the factor and result selections.
pub(crate) fn resolve_ids(
    config: &AnovaConfig,
    exmatrix: &ExMatrix,
    resmatrix: &Array2<f64>,
) -> Result<(Vec<usize>, Vec<usize>)> {
    validate_pair(exmatrix, resmatrix)?;

    let factor_ids = config
        .factor_ids
        .clone()
        .unwrap_or_else(|| (0..exmatrix.ncols()).collect());
    if !is_correct_id_list(&factor_ids, exmatrix) {
        return Err(Error::invalid_argument(format!(
            "factor_ids expected distinct column indices below {}, got {factor_ids:?}",
            exmatrix.ncols()
        )));
    }

    let result_ids = config
        .result_ids
        .clone()
        .unwrap_or_else(|| (0..resmatrix.ncols()).collect());
    if !is_correct_id_list(&result_ids, resmatrix) {
        return Err(Error::invalid_argument(format!(
            "result_ids expected distinct column indices below {}, got {result_ids:?}",
            resmatrix.ncols()
        )));
    }

    Ok((factor_ids, result_ids))
}

/// Group and residual rows of one factor against every selected result.
pub(crate) fn factor_rows(
    exmatrix: &ExMatrix,
    resmatrix: &Array2<f64>,
    position: usize,
    factor: usize,
    result_ids: &[usize],
) -> Vec<AnovaRow> {
    // Run indices per level, in ascending level order
    let mut groups: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (run, &level) in exmatrix.column(factor).iter().enumerate() {
        groups.entry(level).or_default().push(run);
    }
    let groups: Vec<Vec<usize>> = groups.into_values().collect();

    result_ids
        .iter()
        .flat_map(|&result| {
            let pair = one_way(resmatrix.column(result), &groups, position, result);
            trace!(
                factor,
                result,
                f = pair[0].f_value,
                p = pair[0].p_value,
                "one-way ANOVA pair"
            );
            pair
        })
        .collect()
}

fn one_way(y: ArrayView1<'_, f64>, groups: &[Vec<usize>], factor_id: usize, result_id: usize) -> [AnovaRow; 2] {
    let n = y.len();
    let k = groups.len();
    let grand_mean = y.sum() / n as f64;

    let mut ss_group = 0.0;
    let mut ss_residual = 0.0;
    for runs in groups {
        let mean = runs.iter().map(|&r| y[r]).sum::<f64>() / runs.len() as f64;
        ss_group += runs.len() as f64 * (mean - grand_mean).powi(2);
        ss_residual += runs.iter().map(|&r| (y[r] - mean).powi(2)).sum::<f64>();
    }

    let df_group = k - 1;
    let df_residual = n - k;
    let ms_group = ss_group / df_group as f64;
    let ms_residual = ss_residual / df_residual as f64;
    let f_value = ms_group / ms_residual;
    let p_value = f_distribution_p_value(f_value, df_group, df_residual);

    [
        AnovaRow {
            source: AnovaSource::Group,
            df: df_group,
            sum_sq: ss_group,
            mean_sq: ms_group,
            f_value,
            p_value,
            result_id,
            factor_id,
        },
        AnovaRow {
            source: AnovaSource::Residual,
            df: df_residual,
            sum_sq: ss_residual,
            mean_sq: ms_residual,
            f_value: f64::NAN,
            p_value: f64::NAN,
            result_id,
            factor_id,
        },
    ]
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ndarray::array;

    /// 17-run definitive screening design with three random result columns.
    pub(crate) fn fixture() -> (ExMatrix, Array2<f64>) {
        let ex = array![
            [-1, -1, 1, -1, 1, 1],
            [0, 1, 1, 1, 1, 1],
            [0, -1, -1, -1, -1, -1],
            [1, -1, -1, 0, 1, 1],
            [1, -1, 1, -1, -1, 0],
            [1, 1, 1, -1, 1, -1],
            [-1, -1, -1, 1, -1, 1],
            [1, 0, 1, 1, -1, 1],
            [-1, 1, 0, -1, -1, 1],
            [1, 1, -1, 1, -1, -1],
            [-1, 1, 1, 0, -1, -1],
            [-1, 1, -1, 1, 1, 0],
            [-1, 0, -1, -1, 1, -1],
            [-1, -1, 1, 1, 0, -1],
            [1, 1, -1, -1, 0, 1],
            [1, -1, 0, 1, 1, -1],
            [0, 0, 0, 0, 0, 0],
        ];
        let res = array![
            [0.630_192_97, 0.586_197_56, 0.434_113_74],
            [0.917_477_24, 0.323_934_29, 0.043_663_32],
            [0.215_242_66, 0.818_151_03, 0.402_125_19],
            [0.883_892_54, 0.257_441_92, 0.030_661_48],
            [0.594_105_09, 0.961_623_65, 0.623_169_69],
            [0.569_273_98, 0.395_965_78, 0.768_879_92],
            [0.496_899_7, 0.350_147_33, 0.741_775_65],
            [0.062_232_79, 0.176_303_25, 0.676_721_64],
            [0.636_368_81, 0.250_713_43, 0.553_939_37],
            [0.389_086_74, 0.593_770_07, 0.181_331_65],
            [0.067_536_05, 0.719_093_72, 0.670_571_74],
            [0.736_434_59, 0.252_539_43, 0.982_259],
            [0.885_228_78, 0.378_855_63, 0.690_057_22],
            [0.634_320_06, 0.934_613_94, 0.803_179_58],
            [0.136_110_39, 0.546_388_13, 0.049_598_3],
            [0.572_506_79, 0.616_332_24, 0.521_582_36],
            [0.911_446_91, 0.640_980_09, 0.176_612_29],
        ];
        (ex, res)
    }

    fn assert_rel(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-6 * expected.abs().max(1e-3),
            "{actual} vs {expected}"
        );
    }

    #[test]
    fn test_anova_fixture() {
        let (ex, res) = fixture();
        let table = OnewayAnova::default().analyze(&ex, &res).unwrap().table;
        assert_eq!(table.rows.len(), 6 * 3 * 2);

        let group = &table.rows[0];
        assert_eq!((group.source, group.df, group.result_id, group.factor_id), (AnovaSource::Group, 2, 0, 0));
        assert_rel(group.sum_sq, 0.118_829_914);
        assert_rel(group.mean_sq, 0.059_414_957);
        assert_rel(group.f_value, 0.686_278_714);
        assert_rel(group.p_value, 0.519_605_071);

        let residual = &table.rows[1];
        assert_eq!((residual.source, residual.df), (AnovaSource::Residual, 14));
        assert_rel(residual.sum_sq, 1.212_057_70);
        assert_rel(residual.mean_sq, 0.086_575_549_8);
        assert!(residual.f_value.is_nan() && residual.p_value.is_nan());
    }

    #[test]
    fn test_anova_fixture_selected_pairs() {
        let (ex, res) = fixture();
        let table = OnewayAnova::default().analyze(&ex, &res).unwrap().table;

        // (factor, result, F, p)
        let cases = [
            (0, 2, 4.914_193_77, 0.024_167_607_9),
            (1, 2, 0.043_027_812, 0.958_010_914),
            (4, 0, 4.693_619_58, 0.027_545_049_2),
            (5, 1, 3.365_113_91, 0.064_071_918_2),
        ];
        for (factor, result, f, p) in cases {
            let row = table.group_row(factor, result).unwrap();
            assert_rel(row.f_value, f);
            assert_rel(row.p_value, p);
        }
    }

    #[test]
    fn test_anova_row_order_and_ids() {
        let (ex, res) = fixture();
        let anova = OnewayAnova::new(AnovaConfig {
            factor_ids: Some(vec![5, 2]),
            result_ids: Some(vec![2, 0]),
        });
        let table = anova.analyze(&ex, &res).unwrap().table;

        let ids: Vec<(usize, usize)> = table.rows.iter().map(|r| (r.factor_id, r.result_id)).collect();
        assert_eq!(
            ids,
            vec![(0, 2), (0, 2), (0, 0), (0, 0), (1, 2), (1, 2), (1, 0), (1, 0)]
        );

        // position 0 is exmatrix column 5
        let full = OnewayAnova::default().analyze(&ex, &res).unwrap().table;
        assert_eq!(table.rows[0], full.group_row(5, 2).map(|r| AnovaRow { factor_id: 0, ..*r }).unwrap());

        let array = table.to_array();
        assert_eq!(array.dim(), (8, 7));
        assert_eq!(array[[4, 6]], 1.0);
    }

    #[test]
    fn test_anova_ss_decomposition() {
        let (ex, res) = fixture();
        let table = OnewayAnova::default().analyze(&ex, &res).unwrap().table;
        for pair in table.rows.chunks(2) {
            let y = res.column(pair[0].result_id);
            let mean = y.sum() / y.len() as f64;
            let total: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
            assert!((pair[0].sum_sq + pair[1].sum_sq - total).abs() < 1e-12);
            assert_eq!(pair[0].df + pair[1].df, 16);
        }
    }

    #[test]
    fn test_anova_invalid_ids() {
        let (ex, res) = fixture();

        let err = OnewayAnova::new(AnovaConfig {
            factor_ids: Some(vec![0, 0]),
            result_ids: None,
        })
        .analyze(&ex, &res)
        .unwrap_err();
        assert!(err.to_string().contains("factor_ids"));

        // result ids are checked against the result columns, not the factors
        let err = OnewayAnova::new(AnovaConfig {
            factor_ids: None,
            result_ids: Some(vec![3]),
        })
        .analyze(&ex, &res)
        .unwrap_err();
        assert!(err.to_string().contains("result_ids"));

        assert!(OnewayAnova::new(AnovaConfig {
            factor_ids: Some(vec![]),
            result_ids: None,
        })
        .analyze(&ex, &res)
        .is_err());
    }

    #[test]
    fn test_anova_shape_mismatch() {
        let (ex, res) = fixture();
        let short = res.slice(ndarray::s![..16, ..]).to_owned();
        let err = OnewayAnova::default().analyze(&ex, &short).unwrap_err();
        assert_eq!(err, Error::shape_mismatch((17, 6), (16, 3)));
    }
}
