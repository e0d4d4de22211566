//! # u-statengine
//!
//! Statistical computation engine: descriptive summaries, hypothesis
//! tests, correlation, regression and distribution fitting, each paired
//! with effect sizes and plain-language interpretation.
//!
//! Every engine operation is a pure function over in-memory numeric
//! slices. Nothing holds state between calls, so calls may run in
//! parallel freely.
//!
//! ## Engines
//!
//! - [`descriptive`] — central tendency, dispersion, percentiles
//! - [`distribution`] — normality diagnostics, normal fit, goodness of fit,
//!   two-sample comparison
//! - [`correlation`] — Pearson, Spearman, Kendall and correlation matrices
//! - [`inferential`] — t, χ², ANOVA, Mann–Whitney, Wilcoxon, Kruskal–Wallis
//! - [`regression`] — simple, multiple and polynomial least squares
//! - [`effect_size`] — effect-size thresholds and labels
//!
//! ## Primitives
//!
//! - [`special`] — normal, t, F, χ² and Kolmogorov distributions
//! - [`stats`] — numerically stable moments, quantiles and ranks
//! - [`distributions`] — fitted reference distributions
//! - [`linalg`] — dense matrices and QR least squares
//! - [`normality`] — Shapiro–Wilk W and p-value
//! - [`rank_sum`] — Mann–Whitney U statistic and its null distribution
//!
//! ## Design Philosophy
//!
//! - **Numerical stability first**: Welford's algorithm for variance,
//!   Neumaier summation, upper-tail survival functions, QR instead of
//!   normal equations
//! - **Typed failures**: every operation returns [`StatsResult`]; invalid
//!   input is rejected before any numeric work
//! - **Property-based testing**: mathematical invariants verified via proptest
//!
//! ## Example
//!
//! ```
//! use u_statengine::{descriptive, inferential, TestOptions};
//!
//! let control = [4.1, 3.9, 4.4, 4.0, 4.2, 3.8];
//! let treated = [5.0, 5.3, 4.9, 5.6, 5.1, 5.4];
//!
//! let summary = descriptive::basic_stats(&treated).unwrap();
//! assert!(summary.mean > 5.0);
//!
//! let t = inferential::t_test(&control, Some(&treated), false, &TestOptions::default()).unwrap();
//! assert!(t.reject_null);
//! println!("{}", t.interpretation);
//! ```

pub mod config;
pub mod correlation;
pub mod descriptive;
pub mod distribution;
pub mod distributions;
pub mod effect_size;
pub mod error;
pub mod inferential;
pub mod linalg;
pub mod normality;
pub mod rank_sum;
pub mod regression;
pub mod special;
pub mod stats;

pub use config::{Alternative, ComparisonMethod, DistributionKind, TestOptions};
pub use effect_size::EffectSizeLabel;
pub use error::{ErrorKind, StatsError, StatsResult};
pub use inferential::TestResult;
