//! # exdesign
//!
//! Design-of-experiments matrices and the analyzers that read them back.
//!
//! ## Overview
//!
//! A design matrix (`exmatrix`) has one row per experimental run and one
//! column per factor; each entry is the coded level of that factor in that
//! run. This library provides:
//! - Generators for full-factorial, one-hot, Plackett-Burman and definitive
//!   screening designs, with replication
//! - Deterministic reference tables (Hadamard and conference matrices) behind
//!   the screening designs
//! - Analyzers: main-effect table, one-way ANOVA and a linear-regression
//!   boundary
//! - Validators and a structural summary for design matrices
//!
//! ## Quick Start
//!
//! The easiest way to create a design is with the builder:
//!
//! ```rust
//! use exdesign::{DesignBuilder, DesignFamily};
//!
//! let ex = DesignBuilder::new()
//!     .family(DesignFamily::DefinitiveScreening)
//!     .factors(6)
//!     .fake_factors(2)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(ex.dim(), (17, 6));
//! assert_eq!(ex.row(0).to_vec(), vec![0, -1, -1, -1, -1, -1]);
//! ```
//!
//! Or use a specific generator directly:
//!
//! ```rust
//! use exdesign::generate::{FullFactorial, Generator};
//!
//! let ex = FullFactorial::new(2)
//!     .unwrap()
//!     .get_exmatrix(&[2, 3])
//!     .unwrap();
//!
//! assert_eq!(ex.dim(), (12, 2));
//! assert_eq!(ex.row(1).to_vec(), vec![0, 1]);
//! ```
//!
//! ## Logging
//!
//! The library emits [`tracing`] events and never installs a subscriber.
//! Construction is logged at `debug`, approximate conference matrices at
//! `warn` and individual ANOVA pairs at `trace`.
//!
//! ## Features
//!
//! - `doe` (default): Enable the analyzers
//! - `serde`: Enable serialization/deserialization of configs and results
//! - `parallel`: Enable parallel replication and ANOVA using rayon
//! - `python`: Enable Python bindings via PyO3

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod design;
#[cfg(feature = "doe")]
pub mod doe;
pub mod error;
pub mod generate;
#[cfg(feature = "python")]
pub mod python;
pub mod tables;
pub mod utils;

#[cfg(feature = "parallel")]
pub mod parallel;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::builder::{build_design, DesignBuilder, DesignFamily, ParamKind, ParamSpec};
    pub use crate::design::{correlation_matrix, DesignSummary};
    pub use crate::error::{Error, Result};
    pub use crate::generate::{
        replicate, Dsd, ExMatrix, FullFactorial, Generator, Memoized, OneHot, PlackettBurman,
    };
    pub use crate::utils::{
        interaction_names, is_binary_matrix, is_correct_id_list, is_int_matrix,
        is_positive_int_list,
    };

    #[cfg(feature = "parallel")]
    pub use crate::parallel::par_replicate;

    #[cfg(all(feature = "parallel", feature = "doe"))]
    pub use crate::parallel::par_anova;

    #[cfg(feature = "doe")]
    pub use crate::doe::{
        Analyzer, AnovaConfig, AnovaResult, AnovaTable, LinearAnalysis, LinearFitOptions,
        LinearModel, MainEffectTable, Met, MetResult, ModelKind, OnewayAnova,
    };
}

// Re-export commonly used items at crate root
pub use builder::{build_design, DesignBuilder, DesignFamily};
pub use error::{Error, Result};
pub use generate::{Dsd, ExMatrix, FullFactorial, Generator, OneHot, PlackettBurman};

#[cfg(feature = "parallel")]
pub use parallel::par_replicate;
