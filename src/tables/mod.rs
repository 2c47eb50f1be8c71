//! Reference sign matrices for the screening designs.
//!
//! Both tables are explicit size → construction mappings. The only stored
//! data are the short generator vectors in [`conference`]; every matrix is
//! derived from them deterministically, so two lookups of the same size
//! always return identical matrices.
//!
//! ## Plackett-Burman
//!
//! | Run count R | Strategy |
//! |---|---|
//! | 4, 8, 12, 20, 24, 32, 44, 48, 60, 68, 72, 80, 84 | [`PbStrategy::Cyclic`] |
//! | 16, 64 | [`PbStrategy::Sylvester`] |
//! | 40, 56, 88, 96 | [`PbStrategy::Doubled`] |
//! | 28, 36, 52, 76, 100 | [`PbStrategy::FromConference`] |
//! | 92 | [`PbStrategy::Unsupported`] |
//!
//! ## Definitive screening
//!
//! | Order m | Class |
//! |---|---|
//! | 4, 6, 8, 12, 14, 18, 20, 24, 30, 32, 38, 42, 44, 48 | [`DsdClass::Paley`] |
//! | 10, 22, 26, 34, 50 | [`DsdClass::BorderedCirculant`] |
//! | 16, 40 | [`DsdClass::SkewDoubled`] |
//! | 28, 36 | [`DsdClass::GoethalsSeidel`] |
//! | 46 | [`DsdClass::Enumerated46`] |
//!
//! Orders 22 and 34 admit no conference matrix and use a symmetric
//! near-conference matrix: zero diagonal, ±1 elsewhere, exact diagonal in
//! `CᵀC`, off-diagonal entries of `CᵀC` at most 4 in magnitude. Order 46 is
//! exact, bordered from a stored core of 5×5 circulant blocks.

pub mod conference;
mod hadamard;

pub use conference::{CirculantBlocks, CirculantPair, CirculantQuad};

use ndarray::{s, Array2};
use tracing::debug;

use crate::error::{Error, Result};

/// How the Hadamard matrix behind a Plackett-Burman run count is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PbStrategy {
    /// Cyclic shifts of the Paley generator; R-1 is a prime ≡ 3 (mod 4).
    Cyclic,
    /// Sylvester doubling from `[1]`; R is a power of two.
    Sylvester,
    /// `[[H, H], [-H, H]]` applied to the table entry for R/2.
    Doubled,
    /// Built from the symmetric conference matrix of order R/2.
    FromConference,
    /// No construction is available for this run count.
    Unsupported,
}

/// Plackett-Burman run counts and their strategies.
pub const PB_TABLE: [(usize, PbStrategy); 25] = [
    (4, PbStrategy::Cyclic),
    (8, PbStrategy::Cyclic),
    (12, PbStrategy::Cyclic),
    (16, PbStrategy::Sylvester),
    (20, PbStrategy::Cyclic),
    (24, PbStrategy::Cyclic),
    (28, PbStrategy::FromConference),
    (32, PbStrategy::Cyclic),
    (36, PbStrategy::FromConference),
    (40, PbStrategy::Doubled),
    (44, PbStrategy::Cyclic),
    (48, PbStrategy::Cyclic),
    (52, PbStrategy::FromConference),
    (56, PbStrategy::Doubled),
    (60, PbStrategy::Cyclic),
    (64, PbStrategy::Sylvester),
    (68, PbStrategy::Cyclic),
    (72, PbStrategy::Cyclic),
    (76, PbStrategy::FromConference),
    (80, PbStrategy::Cyclic),
    (84, PbStrategy::Cyclic),
    (88, PbStrategy::Doubled),
    (92, PbStrategy::Unsupported),
    (96, PbStrategy::Doubled),
    (100, PbStrategy::FromConference),
];

/// Look up the strategy for a run count.
///
/// Returns `None` for run counts outside the table.
#[must_use]
pub fn pb_strategy(run_count: usize) -> Option<PbStrategy> {
    PB_TABLE
        .iter()
        .find(|(size, _)| *size == run_count)
        .map(|&(_, strategy)| strategy)
}

/// Run count of the Plackett-Burman design for `n_factor` factors.
///
/// The smallest multiple of 4 strictly greater than `n_factor`.
///
/// # Example
///
/// ```
/// use exdesign::tables::pb_run_count;
///
/// assert_eq!(pb_run_count(3), 4);
/// assert_eq!(pb_run_count(4), 8);
/// assert_eq!(pb_run_count(11), 12);
/// ```
#[must_use]
pub fn pb_run_count(n_factor: usize) -> usize {
    4 * (n_factor / 4 + 1)
}

/// Hadamard matrix of order `run_count` whose last column is all +1.
///
/// # Errors
///
/// Returns [`Error::UnsupportedConfiguration`] for 92 and
/// [`Error::InvalidArgument`] for run counts outside the table.
pub fn hadamard_matrix(run_count: usize) -> Result<Array2<i32>> {
    let strategy = pb_strategy(run_count).ok_or_else(|| {
        Error::invalid_argument(format!(
            "Plackett-Burman run count expected a multiple of 4 in [4, 100], got {run_count}"
        ))
    })?;

    match strategy {
        PbStrategy::Cyclic => hadamard::paley_cyclic(run_count - 1),
        PbStrategy::Sylvester => hadamard::sylvester(run_count),
        PbStrategy::Doubled => Ok(hadamard::doubled(&hadamard_matrix(run_count / 2)?)),
        PbStrategy::FromConference => {
            hadamard::from_symmetric_conference(&conference_matrix(run_count / 2)?)
        }
        PbStrategy::Unsupported => Err(Error::unsupported(format!(
            "Plackett-Burman design with {run_count} runs is not available"
        ))),
    }
}

/// Base Plackett-Burman design of shape `(run_count, run_count - 1)`.
///
/// Appending an all-ones column gives a Hadamard matrix.
///
/// # Errors
///
/// Same as [`hadamard_matrix`].
///
/// # Example
///
/// ```
/// use exdesign::tables::pb_base_matrix;
/// use ndarray::array;
///
/// let base = pb_base_matrix(4).unwrap();
/// assert_eq!(base, array![[1, 1, -1], [-1, 1, 1], [1, -1, 1], [-1, -1, -1]]);
///
/// assert!(pb_base_matrix(92).unwrap_err().is_unsupported());
/// ```
pub fn pb_base_matrix(run_count: usize) -> Result<Array2<i32>> {
    let h = hadamard_matrix(run_count)?;
    debug!(run_count, strategy = ?pb_strategy(run_count), "built Plackett-Burman base matrix");
    Ok(h.slice(s![.., ..run_count - 1]).to_owned())
}

/// How the conference matrix of a DSD order is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DsdClass {
    /// Paley construction over GF(m-1).
    Paley,
    /// Doubling of the skew Paley matrix of order m/2.
    SkewDoubled,
    /// Goethals-Seidel array over four circulant blocks.
    GoethalsSeidel(CirculantQuad),
    /// Bordered two-circulant matrix from a generator pair.
    BorderedCirculant(CirculantPair),
    /// The fixed order-46 matrix, bordered from 9×9 circulant blocks of order 5.
    Enumerated46,
}

impl DsdClass {
    /// Whether the class yields an exact conference matrix.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        match self {
            Self::Paley | Self::SkewDoubled | Self::GoethalsSeidel(_) | Self::Enumerated46 => true,
            Self::BorderedCirculant(pair) => pair.exact,
        }
    }

    /// Short name for logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Paley => "paley",
            Self::SkewDoubled => "skew-doubled",
            Self::GoethalsSeidel(_) => "goethals-seidel",
            Self::BorderedCirculant(_) => "bordered-circulant",
            Self::Enumerated46 => "enumerated-46",
        }
    }
}

/// Conference matrix orders (even, 4..=50) and their classes.
pub const DSD_TABLE: [(usize, DsdClass); 24] = [
    (4, DsdClass::Paley),
    (6, DsdClass::Paley),
    (8, DsdClass::Paley),
    (10, DsdClass::BorderedCirculant(conference::PAIR_10)),
    (12, DsdClass::Paley),
    (14, DsdClass::Paley),
    (16, DsdClass::SkewDoubled),
    (18, DsdClass::Paley),
    (20, DsdClass::Paley),
    (22, DsdClass::BorderedCirculant(conference::PAIR_22)),
    (24, DsdClass::Paley),
    (26, DsdClass::BorderedCirculant(conference::PAIR_26)),
    (28, DsdClass::GoethalsSeidel(conference::QUAD_7)),
    (30, DsdClass::Paley),
    (32, DsdClass::Paley),
    (34, DsdClass::BorderedCirculant(conference::PAIR_34)),
    (36, DsdClass::GoethalsSeidel(conference::QUAD_9)),
    (38, DsdClass::Paley),
    (40, DsdClass::SkewDoubled),
    (42, DsdClass::Paley),
    (44, DsdClass::Paley),
    (46, DsdClass::Enumerated46),
    (48, DsdClass::Paley),
    (50, DsdClass::BorderedCirculant(conference::PAIR_50)),
];

/// Look up the class for a conference matrix order.
#[must_use]
pub fn dsd_class(order: usize) -> Option<DsdClass> {
    DSD_TABLE
        .iter()
        .find(|(size, _)| *size == order)
        .map(|&(_, class)| class)
}

/// Conference (or near-conference) matrix of the given order.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `order` is not an even number in
/// `[4, 50]`.
///
/// # Example
///
/// ```
/// use exdesign::tables::conference_matrix;
///
/// let c = conference_matrix(6).unwrap();
/// let gram = c.t().dot(&c);
/// assert_eq!(gram, ndarray::Array2::<i32>::eye(6) * 5);
/// ```
pub fn conference_matrix(order: usize) -> Result<Array2<i32>> {
    let class = dsd_class(order).ok_or_else(|| {
        Error::invalid_argument(format!(
            "conference matrix order expected an even number in [4, 50], got {order}"
        ))
    })?;

    let c = match class {
        DsdClass::Paley => conference::paley(order - 1)?,
        DsdClass::SkewDoubled => conference::skew_doubled(&conference::paley(order / 2 - 1)?)?,
        DsdClass::GoethalsSeidel(quad) => conference::goethals_seidel(&quad),
        DsdClass::BorderedCirculant(pair) => conference::bordered_circulant(&pair),
        DsdClass::Enumerated46 => conference::bordered_blocks(&conference::BLOCKS_46),
    };

    debug!(order, class = class.name(), exact = class.is_exact(), "built conference matrix");
    Ok(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pb_table_covers_every_multiple_of_four() {
        let sizes: Vec<usize> = PB_TABLE.iter().map(|(size, _)| *size).collect();
        let expected: Vec<usize> = (1..=25).map(|k| 4 * k).collect();
        assert_eq!(sizes, expected);
    }

    #[test]
    fn test_pb_base_matrices_are_hadamard() {
        for (run_count, strategy) in PB_TABLE {
            if strategy == PbStrategy::Unsupported {
                continue;
            }
            let base = pb_base_matrix(run_count).unwrap();
            assert_eq!(base.dim(), (run_count, run_count - 1));
            assert!(base.iter().all(|&v| v == 1 || v == -1));

            let mut augmented = Array2::ones((run_count, run_count));
            augmented.slice_mut(s![.., ..run_count - 1]).assign(&base);
            let gram = augmented.dot(&augmented.t());
            let expected = Array2::<i32>::eye(run_count) * run_count as i32;
            assert_eq!(gram, expected, "run count {run_count} ({strategy:?})");
        }
    }

    #[test]
    fn test_pb_92_is_unsupported() {
        let err = pb_base_matrix(92).unwrap_err();
        assert!(err.is_unsupported());
        assert!(err.to_string().contains("92"));
    }

    #[test]
    fn test_pb_off_table_run_counts() {
        for run_count in [0, 2, 6, 104] {
            let err = pb_base_matrix(run_count).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument { .. }));
        }
    }

    #[test]
    fn test_pb_run_count_boundaries() {
        assert_eq!(pb_run_count(1), 4);
        assert_eq!(pb_run_count(7), 8);
        assert_eq!(pb_run_count(8), 12);
        assert_eq!(pb_run_count(87), 88);
        assert_eq!(pb_run_count(99), 100);
    }

    #[test]
    fn test_dsd_table_covers_even_orders() {
        let orders: Vec<usize> = DSD_TABLE.iter().map(|(order, _)| *order).collect();
        let expected: Vec<usize> = (2..=25).map(|k| 2 * k).collect();
        assert_eq!(orders, expected);
    }

    #[test]
    fn test_conference_matrices() {
        for (order, class) in DSD_TABLE {
            let c = conference_matrix(order).unwrap();
            assert_eq!(c.dim(), (order, order));
            for i in 0..order {
                assert_eq!(c[[i, i]], 0);
            }
            assert!(c.iter().all(|&v| (-1..=1).contains(&v)));

            let gram = c.t().dot(&c);
            let m = order as i32;
            for i in 0..order {
                assert_eq!(gram[[i, i]], m - 1, "order {order}");
                for j in 0..order {
                    if i != j {
                        let limit = if class.is_exact() { 0 } else { 4 };
                        assert!(
                            gram[[i, j]].abs() <= limit,
                            "order {order} ({}) entry ({i}, {j}) = {}",
                            class.name(),
                            gram[[i, j]]
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_inexact_orders() {
        let inexact: Vec<usize> = DSD_TABLE
            .iter()
            .filter(|(_, class)| !class.is_exact())
            .map(|(order, _)| *order)
            .collect();
        assert_eq!(inexact, vec![22, 34]);
    }

    #[test]
    fn test_conference_off_table() {
        for order in [2, 5, 52] {
            assert!(conference_matrix(order).is_err());
        }
    }
}
