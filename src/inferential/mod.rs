//! Hypothesis testing.
//!
//! Every test follows the same pipeline: validate inputs, compute the raw
//! statistic, derive its p-value from the null distribution, adjust for a
//! one-sided alternative, look up the critical value, decide, then size
//! and label the effect.
//!
//! - [`parametric`]: t-tests, chi-squared tests, one-way ANOVA.
//! - [`nonparametric`]: Mann–Whitney U, Wilcoxon signed-rank, Kruskal–Wallis.
//!
//! # Examples
//!
//! ```
//! use u_statengine::config::TestOptions;
//! use u_statengine::inferential::t_test;
//!
//! let a = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let b = [6.0, 7.0, 8.0, 9.0, 10.0];
//! let r = t_test(&a, Some(&b), false, &TestOptions::default()).unwrap();
//! assert!(r.statistic < 0.0);
//! assert!(r.reject_null);
//! ```

mod decision;
pub mod nonparametric;
pub mod parametric;

use serde::Serialize;

use crate::effect_size::EffectSizeLabel;

pub use decision::decide;
pub use nonparametric::{kruskal_wallis, mann_whitney, wilcoxon, MannWhitneyResult};
pub use parametric::{anova, chi_square, t_test, AnovaResult, ChiSquareResult};

/// Outcome of a hypothesis test.
///
/// Fields that only exist under some sample-size or mode conditions are
/// `None` rather than split into separate result types.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestResult {
    /// Test statistic (t, χ², F, U, W or H depending on the test).
    pub statistic: f64,
    /// p-value under the chosen alternative, in `[0, 1]`.
    pub p_value: f64,
    /// For F tests, the numerator degrees of freedom.
    pub degrees_of_freedom: Option<f64>,
    /// Critical value at `alpha`. Rank tests report it on the z scale
    /// and only alongside `z_score`; exact rank tests leave it `None`.
    pub critical_value: Option<f64>,
    /// Significance level the decision was made at.
    pub alpha: f64,
    /// `p_value < alpha`.
    pub reject_null: bool,
    pub effect_size: Option<f64>,
    pub effect_size_label: Option<EffectSizeLabel>,
    /// Normal-approximation z-score (rank tests on larger samples).
    pub z_score: Option<f64>,
    /// Confidence interval for the mean (two-sided one-sample t-test only).
    pub confidence_interval: Option<[f64; 2]>,
    pub interpretation: String,
}

impl TestResult {
    /// Decides at `alpha` and labels the effect, if any.
    pub(crate) fn decided(
        statistic: f64,
        p_value: f64,
        alpha: f64,
        effect: Option<(f64, EffectSizeLabel)>,
    ) -> Self {
        let p_value = p_value.clamp(0.0, 1.0);
        let label = effect.map(|(_, l)| l);
        let (reject_null, interpretation) = decide(p_value, alpha, label);
        Self {
            statistic,
            p_value,
            degrees_of_freedom: None,
            critical_value: None,
            alpha,
            reject_null,
            effect_size: effect.map(|(v, _)| v),
            effect_size_label: label,
            z_score: None,
            confidence_interval: None,
            interpretation,
        }
    }

    pub(crate) fn with_df(mut self, df: f64) -> Self {
        self.degrees_of_freedom = Some(df);
        self
    }

    pub(crate) fn with_critical_value(mut self, critical: f64) -> Self {
        self.critical_value = Some(critical);
        self
    }
}
