//! Builder and registry for design families.
//!
//! The builder gives a single entry point for every generator, selected by
//! [`DesignFamily`]. Families also describe the parameters they need, so a
//! front end can collect them by name and hand them over as text.
//!
//! # Example
//!
//! ```
//! use exdesign::{DesignBuilder, DesignFamily};
//!
//! let ex = DesignBuilder::new()
//!     .family(DesignFamily::PlackettBurman)
//!     .factors(7)
//!     .replicates(2)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(ex.dim(), (16, 7));
//! ```
//!
//! Or by name with text parameters:
//!
//! ```
//! use exdesign::build_design;
//!
//! let ex = build_design("fullfact", &[("n_rep", "1"), ("levels", "2 3")]).unwrap();
//! assert_eq!(ex.dim(), (6, 2));
//! ```

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::generate::{Dsd, ExMatrix, FullFactorial, Generator, OneHot, PlackettBurman};

/// Fake factors used for a definitive screening design when none are given.
pub const DEFAULT_FAKE_FACTORS: usize = 2;

/// The supported design families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DesignFamily {
    /// [`FullFactorial`].
    FullFactorial,
    /// [`OneHot`].
    OneHot,
    /// [`PlackettBurman`].
    PlackettBurman,
    /// [`Dsd`].
    DefinitiveScreening,
}

/// Kind of value a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// A single positive integer, e.g. `3`.
    PositiveInt,
    /// Whitespace- or comma-separated positive integers, e.g. `1 2 3`.
    PositiveIntList,
}

/// A parameter a design family requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    /// Prompt shown to a user, with an example value.
    pub prompt: &'static str,
    /// Parameter name as accepted by [`DesignBuilder::set`].
    pub name: &'static str,
    /// Accepted value kind.
    pub kind: ParamKind,
}

const N_REP: ParamSpec = ParamSpec {
    prompt: "number of replication (ex. 2)",
    name: "n_rep",
    kind: ParamKind::PositiveInt,
};

const N_FACTOR: ParamSpec = ParamSpec {
    prompt: "number of factor (ex. 3)",
    name: "n_factor",
    kind: ParamKind::PositiveInt,
};

const FULL_FACTORIAL_PARAMS: &[ParamSpec] = &[
    N_REP,
    ParamSpec {
        prompt: "number of levels (ex. 1 2 3)",
        name: "levels",
        kind: ParamKind::PositiveIntList,
    },
];

const SINGLE_COUNT_PARAMS: &[ParamSpec] = &[N_REP, N_FACTOR];

const DSD_PARAMS: &[ParamSpec] = &[
    N_REP,
    N_FACTOR,
    ParamSpec {
        prompt: "number of fake factor (ex. 2)",
        name: "n_fake",
        kind: ParamKind::PositiveInt,
    },
];

impl DesignFamily {
    /// Every family, in registry order.
    pub const ALL: [Self; 4] = [
        Self::FullFactorial,
        Self::OneHot,
        Self::PlackettBurman,
        Self::DefinitiveScreening,
    ];

    /// Canonical short name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::FullFactorial => "fullfact",
            Self::OneHot => "onehot",
            Self::PlackettBurman => "pb",
            Self::DefinitiveScreening => "dsd",
        }
    }

    /// Ordered parameters this family needs.
    ///
    /// # Example
    ///
    /// ```
    /// use exdesign::builder::{DesignFamily, ParamKind};
    ///
    /// let params = DesignFamily::FullFactorial.required_params();
    /// assert_eq!(params[0].name, "n_rep");
    /// assert_eq!(params[1].prompt, "number of levels (ex. 1 2 3)");
    /// assert_eq!(params[1].kind, ParamKind::PositiveIntList);
    /// ```
    #[must_use]
    pub fn required_params(self) -> &'static [ParamSpec] {
        match self {
            Self::FullFactorial => FULL_FACTORIAL_PARAMS,
            Self::OneHot | Self::PlackettBurman => SINGLE_COUNT_PARAMS,
            Self::DefinitiveScreening => DSD_PARAMS,
        }
    }
}

impl fmt::Display for DesignFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DesignFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fullfact" | "fullfactorial" => Ok(Self::FullFactorial),
            "onehot" => Ok(Self::OneHot),
            "pb" | "plackettburman" => Ok(Self::PlackettBurman),
            "dsd" => Ok(Self::DefinitiveScreening),
            _ => Err(Error::invalid_argument(format!(
                "design family expected one of fullfact, onehot, pb, dsd, got {s:?}"
            ))),
        }
    }
}

fn parse_positive(name: &str, text: &str) -> Result<usize> {
    text.trim()
        .parse::<usize>()
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| {
            Error::invalid_argument(format!("{name} expected a positive integer, got {text:?}"))
        })
}

fn parse_positive_list(name: &str, text: &str) -> Result<Vec<usize>> {
    let values = text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<usize>().ok().filter(|&v| v > 0))
        .collect::<Option<Vec<_>>>()
        .filter(|values| !values.is_empty());

    values.ok_or_else(|| {
        Error::invalid_argument(format!(
            "{name} expected a list of positive integers, got {text:?}"
        ))
    })
}

/// Builder for design matrices of any family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignBuilder {
    family: Option<DesignFamily>,
    levels: Option<Vec<usize>>,
    factors: Option<usize>,
    fake_factors: Option<usize>,
    replicates: usize,
    control_row: bool,
}

impl Default for DesignBuilder {
    fn default() -> Self {
        Self {
            family: None,
            levels: None,
            factors: None,
            fake_factors: None,
            replicates: 1,
            control_row: false,
        }
    }
}

impl DesignBuilder {
    /// Create a new builder with one replicate and no family.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the design family.
    #[must_use]
    pub fn family(mut self, family: DesignFamily) -> Self {
        self.family = Some(family);
        self
    }

    /// Set the level count of each factor (full factorial only).
    #[must_use]
    pub fn levels(mut self, levels: Vec<usize>) -> Self {
        self.levels = Some(levels);
        self
    }

    /// Set the number of factors.
    #[must_use]
    pub fn factors(mut self, factors: usize) -> Self {
        self.factors = Some(factors);
        self
    }

    /// Set the number of fake factors (definitive screening only).
    ///
    /// Defaults to [`DEFAULT_FAKE_FACTORS`].
    #[must_use]
    pub fn fake_factors(mut self, fake_factors: usize) -> Self {
        self.fake_factors = Some(fake_factors);
        self
    }

    /// Set the replication count.
    #[must_use]
    pub fn replicates(mut self, replicates: usize) -> Self {
        self.replicates = replicates;
        self
    }

    /// Add a negative-control row (one-hot only).
    #[must_use]
    pub fn control_row(mut self, control_row: bool) -> Self {
        self.control_row = control_row;
        self
    }

    /// Set a parameter by name from its text form.
    ///
    /// Accepts `n_rep`, `n_factor`, `n_fake` and `levels`; values are parsed
    /// as [`ParamKind`] describes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an unknown name or a value that
    /// does not parse.
    pub fn set(self, name: &str, value: &str) -> Result<Self> {
        match name {
            "n_rep" => Ok(self.replicates(parse_positive(name, value)?)),
            "n_factor" => Ok(self.factors(parse_positive(name, value)?)),
            "n_fake" => Ok(self.fake_factors(parse_positive(name, value)?)),
            "levels" => Ok(self.levels(parse_positive_list(name, value)?)),
            _ => Err(Error::invalid_argument(format!(
                "parameter name expected one of n_rep, n_factor, n_fake, levels, got {name:?}"
            ))),
        }
    }

    /// Build the replicated design matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the family or one of its required
    /// parameters is missing, and otherwise whatever the generator returns.
    pub fn build(self) -> Result<ExMatrix> {
        let family = self
            .family
            .ok_or_else(|| Error::invalid_argument("design family must be specified"))?;
        let missing = |name: &str| {
            Error::invalid_argument(format!("{name} must be specified for {family} designs"))
        };

        match family {
            DesignFamily::FullFactorial => {
                let levels = self.levels.ok_or_else(|| missing("levels"))?;
                FullFactorial::new(self.replicates)?.get_exmatrix(&levels)
            }
            DesignFamily::OneHot => {
                let n_factor = self.factors.ok_or_else(|| missing("n_factor"))?;
                OneHot::new(self.replicates)?
                    .with_control_row(self.control_row)
                    .get_exmatrix(&n_factor)
            }
            DesignFamily::PlackettBurman => {
                let n_factor = self.factors.ok_or_else(|| missing("n_factor"))?;
                PlackettBurman::new(self.replicates)?.get_exmatrix(&n_factor)
            }
            DesignFamily::DefinitiveScreening => {
                let n_factor = self.factors.ok_or_else(|| missing("n_factor"))?;
                let n_fake = self.fake_factors.unwrap_or(DEFAULT_FAKE_FACTORS);
                Dsd::new(self.replicates)?.get_exmatrix(&(n_factor, n_fake))
            }
        }
    }
}

/// Build a design from a family name and named text parameters.
///
/// Every parameter in [`DesignFamily::required_params`] must be present.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] for an unknown family, a missing or
/// malformed parameter, and otherwise whatever the generator returns.
///
/// # Example
///
/// ```
/// use exdesign::build_design;
///
/// let ex = build_design("DSD", &[("n_rep", "2"), ("n_factor", "6"), ("n_fake", "2")]).unwrap();
/// assert_eq!(ex.dim(), (34, 6));
/// ```
pub fn build_design(family: &str, params: &[(&str, &str)]) -> Result<ExMatrix> {
    let family: DesignFamily = family.parse()?;

    for spec in family.required_params() {
        if !params.iter().any(|(name, _)| *name == spec.name) {
            return Err(Error::invalid_argument(format!(
                "{} ({}) is required for {family} designs",
                spec.name, spec.prompt
            )));
        }
    }

    params
        .iter()
        .try_fold(DesignBuilder::new().family(family), |builder, (name, value)| {
            builder.set(name, value)
        })?
        .build()
}
