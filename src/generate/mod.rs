//! Design-matrix generators.
//!
//! Every generator is built with a replication count and produces its base
//! design from family-specific parameters. The replicated matrix is the base
//! design stacked `n_rep` times, each copy identical.
//!
//! ## Available Generators
//!
//! | Generator | Parameters | Base runs | Values |
//! |-----------|------------|-----------|--------|
//! | [`FullFactorial`] | `levels: &[usize]` | ∏ levels | `0..level` |
//! | [`OneHot`] | `n_factor` | n_factor (+1 with control row) | `{0, 1}` |
//! | [`PlackettBurman`] | `n_factor` | `4 * (n_factor / 4 + 1)` | `{-1, 1}` |
//! | [`Dsd`] | `(n_factor, n_fake)` | `2m + 1`, m = even(n_factor + n_fake) | `{-1, 0, 1}` |
//!
//! ## Usage
//!
//! ```
//! use exdesign::generate::{Generator, PlackettBurman};
//!
//! let pb = PlackettBurman::new(2).unwrap();
//! let ex = pb.get_exmatrix(&3).unwrap();
//!
//! assert_eq!(ex.dim(), (8, 3));
//! assert_eq!(ex.row(0).to_vec(), vec![1, 1, -1]);
//! ```

mod dsd;
mod full_factorial;
mod one_hot;
mod plackett_burman;

pub use dsd::Dsd;
pub use full_factorial::FullFactorial;
pub use one_hot::OneHot;
pub use plackett_burman::PlackettBurman;

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};

use ndarray::Array2;

use crate::error::{Error, Result};

/// Coded design matrix: rows are runs, columns are factors.
pub type ExMatrix = Array2<i32>;

/// Trait for design-matrix generators.
///
/// Implementors only build the base design; replication is shared.
pub trait Generator: Send + Sync {
    /// Family-specific parameters accepted by [`Generator::get_exmatrix`].
    type Params: ?Sized;

    /// Get the name of the design family.
    fn name(&self) -> &'static str;

    /// Get the replication count.
    fn n_rep(&self) -> usize;

    /// Build one replicate of the design.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for malformed parameters and
    /// [`Error::UnsupportedConfiguration`] for sizes without a construction.
    fn base_matrix(&self, params: &Self::Params) -> Result<ExMatrix>;

    /// Build the replicated design.
    ///
    /// # Errors
    ///
    /// Same as [`Generator::base_matrix`].
    fn get_exmatrix(&self, params: &Self::Params) -> Result<ExMatrix> {
        let base = self.base_matrix(params)?;
        replicate(&base, self.n_rep())
    }
}

/// Validate a replication count.
pub(crate) fn check_n_rep(n_rep: usize) -> Result<usize> {
    if n_rep == 0 {
        return Err(Error::invalid_argument(
            "n_rep expected a positive integer, got 0",
        ));
    }
    Ok(n_rep)
}

/// Shape of `base` stacked `n_rep` times.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the stacked design would not fit in
/// memory addressable by an array.
pub fn replicated_shape(base: &ExMatrix, n_rep: usize) -> Result<(usize, usize)> {
    let (runs, factors) = base.dim();
    runs.checked_mul(n_rep)
        .filter(|&total| {
            total
                .checked_mul(factors)
                .map_or(false, |len| isize::try_from(len).is_ok())
        })
        .map(|total| (total, factors))
        .ok_or_else(|| {
            Error::invalid_argument(format!(
                "n_rep expected a count that keeps the design addressable, got {n_rep} replicates of {runs} runs"
            ))
        })
}

/// Stack `base` vertically `n_rep` times.
///
/// # Errors
///
/// Same as [`replicated_shape`].
///
/// # Example
///
/// ```
/// use exdesign::generate::replicate;
/// use ndarray::array;
///
/// let ex = replicate(&array![[0, 1], [1, 0]], 2).unwrap();
/// assert_eq!(ex, array![[0, 1], [1, 0], [0, 1], [1, 0]]);
/// ```
pub fn replicate(base: &ExMatrix, n_rep: usize) -> Result<ExMatrix> {
    let shape = replicated_shape(base, n_rep)?;
    let runs = base.nrows();
    Ok(Array2::from_shape_fn(shape, |(i, j)| base[[i % runs, j]]))
}

type CacheKey<G> = <<G as Generator>::Params as ToOwned>::Owned;

/// A generator whose replicated matrices are cached by parameters.
///
/// The cache belongs to this instance and sits behind a mutex, so a
/// `Memoized` can be shared across threads.
///
/// # Example
///
/// ```
/// use exdesign::generate::{Dsd, Generator, Memoized};
///
/// let dsd = Memoized::new(Dsd::new(1).unwrap());
/// let first = dsd.get_exmatrix(&(6, 2)).unwrap();
/// let second = dsd.get_exmatrix(&(6, 2)).unwrap();
///
/// assert_eq!(first, second);
/// assert_eq!(dsd.cached(), 1);
/// ```
pub struct Memoized<G>
where
    G: Generator,
    G::Params: ToOwned,
    CacheKey<G>: Hash + Eq,
{
    inner: G,
    cache: Mutex<HashMap<CacheKey<G>, ExMatrix>>,
}

impl<G> Memoized<G>
where
    G: Generator,
    G::Params: ToOwned,
    CacheKey<G>: Hash + Eq,
{
    /// Wrap a generator with an empty cache.
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Get the wrapped generator.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Number of cached matrices.
    pub fn cached(&self) -> usize {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Drop every cached matrix.
    pub fn clear(&self) {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl<G> Generator for Memoized<G>
where
    G: Generator,
    G::Params: ToOwned,
    CacheKey<G>: Hash + Eq + Send,
{
    type Params = G::Params;

    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn n_rep(&self) -> usize {
        self.inner.n_rep()
    }

    fn base_matrix(&self, params: &Self::Params) -> Result<ExMatrix> {
        self.inner.base_matrix(params)
    }

    fn get_exmatrix(&self, params: &Self::Params) -> Result<ExMatrix> {
        let key = <G::Params as ToOwned>::to_owned(params);
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get::<CacheKey<G>>(&key)
        {
            return Ok(hit.clone());
        }

        // Built outside the lock; a concurrent miss only duplicates work
        let ex = self.inner.get_exmatrix(params)?;
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, ex.clone());
        Ok(ex)
    }
}
