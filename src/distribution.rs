//! Distribution engine: normality diagnostics, parametric fits and
//! goodness-of-fit against named distributions.
//!
//! # Normality diagnostics
//!
//! | Test | Sample size | Statistic |
//! |---|---|---|
//! | [`shapiro_wilk`] | 3 ≤ n ≤ 5000 | W |
//! | [`kolmogorov_smirnov`] | n ≥ 1 | Dₙ against a fitted distribution |
//! | [`anderson_darling`] | n ≥ 8 | A² |
//!
//! Each diagnostic is independent; a normality verdict passes when the
//! p-value exceeds 0.05.
//!
//! # References
//! - Royston (1992), "Approximating the Shapiro-Wilk W-test for
//!   non-normality", *Statistics and Computing* 2, 117–119.
//! - Royston (1995), "Remark AS R94", *Applied Statistics* 44(4), 547–551.
//! - Stephens (1974), "EDF statistics for goodness of fit and some
//!   comparisons", *JASA* 69, 730–737.
//! - D'Agostino & Stephens (1986), *Goodness-of-Fit Techniques*.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::{
    validate_alpha, Alternative, ComparisonMethod, DistributionKind, DEFAULT_ALPHA,
};
use crate::distributions::FittedDistribution;
use crate::error::{check_sample, StatsError, StatsResult};
use crate::normality;
use crate::rank_sum;
use crate::special;
use crate::stats;

/// Minimum sample size for fits and goodness-of-fit tests.
const MIN_FIT_SAMPLE: usize = 8;

/// Largest sample the Shapiro–Wilk approximation supports.
const SHAPIRO_WILK_MAX: usize = 5000;

// ============================================================================
// Result types
// ============================================================================

/// Outcome of a single normality diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalityTest {
    pub statistic: f64,
    pub p_value: f64,
    /// `p_value > 0.05`.
    pub is_normal: bool,
}

impl NormalityTest {
    fn new(statistic: f64, p_value: f64) -> Self {
        let p_value = p_value.clamp(0.0, 1.0);
        Self {
            statistic,
            p_value,
            is_normal: p_value > DEFAULT_ALPHA,
        }
    }
}

/// Anderson–Darling normality test with tabulated critical values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AndersonDarlingTest {
    /// Unadjusted A².
    pub statistic: f64,
    /// Approximate p-value from the size-adjusted A*².
    pub p_value: f64,
    /// Significance levels in percent, paired with `critical_values`.
    pub significance_levels: [f64; 5],
    pub critical_values: [f64; 5],
    /// `statistic` is below the 5 % critical value.
    pub is_normal: bool,
}

/// Normal fit with confidence interval and normality diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalFitResult {
    pub mean: f64,
    pub std: f64,
    pub variance: f64,
    pub confidence_level: f64,
    /// t-based interval for the mean.
    pub confidence_interval: [f64; 2],
    pub skewness: f64,
    pub kurtosis: f64,
    /// `None` above 5000 observations.
    pub shapiro_wilk: Option<NormalityTest>,
    pub kolmogorov_smirnov: NormalityTest,
    pub anderson_darling: AndersonDarlingTest,
    pub sample_size: usize,
}

/// Goodness of fit against a named distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionResult {
    pub distribution: DistributionKind,
    pub parameters: BTreeMap<String, f64>,
    /// Kolmogorov–Smirnov Dₙ.
    pub statistic: f64,
    pub p_value: f64,
    pub alpha: f64,
    /// `p_value > alpha`.
    pub is_good_fit: bool,
    pub sample_size: usize,
}

/// Two-sample distribution comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    pub method: ComparisonMethod,
    pub statistic: f64,
    pub p_value: f64,
    /// `p_value > 0.05`.
    pub same_distribution: bool,
    pub sample_size_1: usize,
    pub sample_size_2: usize,
}

// ============================================================================
// Engine operations
// ============================================================================

/// Fits a normal distribution and runs the normality diagnostics.
///
/// Mean, sample standard deviation (n − 1) and variance, a confidence
/// interval `x̄ ± t₍₁₊c₎/₂,ₙ₋₁ · s/√n`, biased skewness and excess
/// kurtosis, then Shapiro–Wilk (n ≤ 5000), Kolmogorov–Smirnov against
/// N(x̄, s²) and Anderson–Darling.
///
/// # Errors
/// - `InsufficientData` for fewer than 8 values.
/// - `InvalidInput` if `confidence_level` is outside `(0, 1)`.
/// - `DegenerateComputation` for a zero-variance sample.
#[instrument(level = "debug", skip(sample), fields(n = sample.len()))]
pub fn normal_fit(sample: &[f64], confidence_level: f64) -> StatsResult<NormalFitResult> {
    check_sample("normal fit", sample, MIN_FIT_SAMPLE)?;
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(StatsError::InvalidInput(format!(
            "confidence level must lie in (0, 1), got {confidence_level}"
        )));
    }

    let fitted = FittedDistribution::fit(DistributionKind::Normal, sample)?;
    let n = sample.len();
    let mean = stats::mean(sample).unwrap_or(0.0);
    let std = stats::std_dev(sample).unwrap_or(0.0);

    let t_crit = special::t_distribution_quantile((1.0 + confidence_level) / 2.0, (n - 1) as f64);
    let margin = t_crit * std / (n as f64).sqrt();

    let shapiro = if n <= SHAPIRO_WILK_MAX {
        Some(shapiro_wilk(sample)?)
    } else {
        None
    };
    let ks = kolmogorov_smirnov(sample, &fitted)?;
    let ad = anderson_darling(sample)?;

    debug!(
        mean,
        std,
        shapiro_p = shapiro.map(|s| s.p_value),
        ks_p = ks.p_value,
        ad = ad.statistic,
        "normal fit complete"
    );
    Ok(NormalFitResult {
        mean,
        std,
        variance: std * std,
        confidence_level,
        confidence_interval: [mean - margin, mean + margin],
        skewness: stats::skewness(sample).unwrap_or(0.0),
        kurtosis: stats::kurtosis(sample).unwrap_or(0.0),
        shapiro_wilk: shapiro,
        kolmogorov_smirnov: ks,
        anderson_darling: ad,
        sample_size: n,
    })
}

/// Kolmogorov–Smirnov goodness of fit against a distribution fitted to
/// the sample.
///
/// - normal: N(x̄, s²)
/// - uniform: U[min, max]
/// - exponential: Exp(λ = 1/x̄)
///
/// # Errors
/// - `InsufficientData` for fewer than 8 values.
/// - `InvalidInput` if `alpha` is outside `(0, 1)`.
/// - `DegenerateComputation` if the sample admits no fit.
#[instrument(level = "debug", skip(sample), fields(n = sample.len()))]
pub fn goodness_of_fit(
    sample: &[f64],
    kind: DistributionKind,
    alpha: f64,
) -> StatsResult<DistributionResult> {
    validate_alpha(alpha)?;
    check_sample("goodness of fit", sample, MIN_FIT_SAMPLE)?;

    let fitted = FittedDistribution::fit(kind, sample)?;
    let d = ks_statistic(sample, |x| fitted.cdf(x));
    let p_value = special::ks_one_sample_sf(sample.len(), d).clamp(0.0, 1.0);

    debug!(d, p_value, "goodness of fit complete");
    Ok(DistributionResult {
        distribution: kind,
        parameters: fitted.parameters(),
        statistic: d,
        p_value,
        alpha,
        is_good_fit: p_value > alpha,
        sample_size: sample.len(),
    })
}

/// Like [`goodness_of_fit`], resolving the distribution by name.
///
/// # Errors
/// `UnsupportedDistribution` for a name other than `normal`, `uniform` or
/// `exponential`, plus the errors of [`goodness_of_fit`].
pub fn goodness_of_fit_named(
    sample: &[f64],
    distribution: &str,
    alpha: f64,
) -> StatsResult<DistributionResult> {
    goodness_of_fit(sample, distribution.parse()?, alpha)
}

/// Tests whether two samples come from the same distribution.
///
/// Kolmogorov–Smirnov uses the limiting Kolmogorov distribution at the
/// effective size `nₑ = n₁n₂/(n₁+n₂)` with Stephens' correction;
/// Mann–Whitney uses the two-sided U test. Both verdicts are symmetric in
/// the argument order.
///
/// # Errors
/// - `InsufficientData` if either sample is empty.
/// - `DegenerateComputation` from the Mann–Whitney test when every value
///   is identical.
#[instrument(level = "debug", skip(sample1, sample2), fields(n1 = sample1.len(), n2 = sample2.len()))]
pub fn compare_distributions(
    sample1: &[f64],
    sample2: &[f64],
    method: ComparisonMethod,
) -> StatsResult<ComparisonResult> {
    check_sample("comparison sample1", sample1, 1)?;
    check_sample("comparison sample2", sample2, 1)?;

    let (statistic, p_value) = match method {
        ComparisonMethod::KolmogorovSmirnov => {
            let d = two_sample_ks_statistic(sample1, sample2);
            let (n1, n2) = (sample1.len() as f64, sample2.len() as f64);
            let en = (n1 * n2 / (n1 + n2)).sqrt();
            (d, special::kolmogorov_sf((en + 0.12 + 0.11 / en) * d))
        }
        ComparisonMethod::MannWhitney => {
            let u = rank_sum::u_statistic(sample1, sample2)?;
            (u.u1, u.p_value(Alternative::TwoSided))
        }
    };

    let p_value = p_value.clamp(0.0, 1.0);
    debug!(statistic, p_value, "distribution comparison complete");
    Ok(ComparisonResult {
        method,
        statistic,
        p_value,
        same_distribution: p_value > DEFAULT_ALPHA,
        sample_size_1: sample1.len(),
        sample_size_2: sample2.len(),
    })
}

// ============================================================================
// Kolmogorov–Smirnov
// ============================================================================

/// One-sample Kolmogorov–Smirnov test against `dist`.
///
/// p-value from the exact distribution of Dₙ for n ≤ 100, the
/// Stephens-corrected asymptotic one above.
pub fn kolmogorov_smirnov(sample: &[f64], dist: &FittedDistribution) -> StatsResult<NormalityTest> {
    check_sample("kolmogorov-smirnov", sample, 1)?;
    let d = ks_statistic(sample, |x| dist.cdf(x));
    Ok(NormalityTest::new(d, special::ks_one_sample_sf(sample.len(), d)))
}

/// Dₙ = sup |Fₙ(x) − F(x)|.
fn ks_statistic(sample: &[f64], cdf: impl Fn(f64) -> f64) -> f64 {
    let sorted = stats::sorted_copy(sample);
    let n = sorted.len() as f64;
    sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let f = cdf(x);
            let above = (i + 1) as f64 / n - f;
            let below = f - i as f64 / n;
            above.max(below)
        })
        .fold(0.0, f64::max)
}

/// sup |F₁(x) − F₂(x)| over the pooled sample.
fn two_sample_ks_statistic(a: &[f64], b: &[f64]) -> f64 {
    let a = stats::sorted_copy(a);
    let b = stats::sorted_copy(b);
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0, 0);
    let mut d: f64 = 0.0;
    while i < a.len() && j < b.len() {
        let x = a[i].min(b[j]);
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        d = d.max((i as f64 / n1 - j as f64 / n2).abs());
    }
    d
}

// ============================================================================
// Anderson–Darling
// ============================================================================

const AD_SIGNIFICANCE_LEVELS: [f64; 5] = [15.0, 10.0, 5.0, 2.5, 1.0];
const AD_BASE_CRITICAL: [f64; 5] = [0.576, 0.656, 0.787, 0.918, 1.092];

/// Anderson–Darling test for normality with estimated mean and variance.
///
/// # Algorithm
/// `A² = −n − (1/n) Σ (2i−1)[ln Φ(zᵢ) + ln(1 − Φ(z₍ₙ₊₁₋ᵢ₎))]` on the
/// standardized order statistics. Critical values are the Stephens table
/// scaled by `1/(1 + 4/n − 25/n²)`; the p-value follows the piecewise
/// approximation of D'Agostino & Stephens on `A*² = A²(1 + 0.75/n + 2.25/n²)`.
///
/// # Errors
/// - `InsufficientData` for fewer than 8 values.
/// - `DegenerateComputation` for a zero-variance sample.
pub fn anderson_darling(sample: &[f64]) -> StatsResult<AndersonDarlingTest> {
    check_sample("anderson-darling", sample, MIN_FIT_SAMPLE)?;
    let mean = stats::mean(sample).unwrap_or(0.0);
    let sd = stats::std_dev(sample).unwrap_or(0.0);
    if sd <= 0.0 {
        return Err(StatsError::degenerate(
            "anderson-darling is undefined for a zero-variance sample",
        ));
    }

    let x = stats::sorted_copy(sample);
    let n = x.len();
    let nf = n as f64;
    let mut s = 0.0;
    for i in 0..n {
        // clamp keeps ln finite for extreme outliers
        let lo = special::standard_normal_cdf((x[i] - mean) / sd).clamp(1e-15, 1.0 - 1e-15);
        let hi = special::standard_normal_cdf((x[n - 1 - i] - mean) / sd).clamp(1e-15, 1.0 - 1e-15);
        s += (2 * i + 1) as f64 * (lo.ln() + (1.0 - hi).ln());
    }
    let a2 = -nf - s / nf;
    let a2_star = a2 * (1.0 + 0.75 / nf + 2.25 / (nf * nf));

    let p = if a2_star >= 0.6 {
        (1.2937 - 5.709 * a2_star + 0.0186 * a2_star * a2_star).exp()
    } else if a2_star > 0.34 {
        (0.9177 - 4.279 * a2_star - 1.38 * a2_star * a2_star).exp()
    } else if a2_star > 0.2 {
        1.0 - (-8.318 + 42.796 * a2_star - 59.938 * a2_star * a2_star).exp()
    } else {
        1.0 - (-13.436 + 101.14 * a2_star - 223.73 * a2_star * a2_star).exp()
    };

    let scale = 1.0 + 4.0 / nf - 25.0 / (nf * nf);
    let critical_values = AD_BASE_CRITICAL.map(|c| c / scale);

    Ok(AndersonDarlingTest {
        statistic: a2,
        p_value: p.clamp(0.0, 1.0),
        significance_levels: AD_SIGNIFICANCE_LEVELS,
        critical_values,
        is_normal: a2 < critical_values[2],
    })
}

// ============================================================================
// Shapiro–Wilk
// ============================================================================

/// Shapiro–Wilk test of normality (Royston's AS R94 approximation).
///
/// Limited to the range the approximation was fitted on; see
/// [`normality::shapiro_wilk`] for the unbounded kernel.
///
/// # Errors
/// - `InsufficientData` for fewer than 3 values.
/// - `InvalidInput` above 5000 values.
/// - `DegenerateComputation` if every value is identical.
pub fn shapiro_wilk(sample: &[f64]) -> StatsResult<NormalityTest> {
    let n = sample.len();
    if n > SHAPIRO_WILK_MAX {
        return Err(StatsError::InvalidInput(format!(
            "shapiro-wilk supports at most {SHAPIRO_WILK_MAX} values, got {n}"
        )));
    }
    let sw = normality::shapiro_wilk(sample)?;
    Ok(NormalityTest::new(sw.w, sw.p_value))
}
