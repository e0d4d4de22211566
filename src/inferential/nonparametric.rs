//! Rank-based tests: Mann–Whitney U, Wilcoxon signed-rank, Kruskal–Wallis H.
//!
//! Ties receive averaged ranks everywhere. Small tie-free samples use the
//! exact null distribution of the statistic; otherwise the tie-corrected
//! normal (or χ²) approximation applies.
//!
//! # References
//! - Mann & Whitney (1947), "On a test of whether one of two random
//!   variables is stochastically larger than the other".
//! - Wilcoxon (1945), "Individual comparisons by ranking methods".
//! - Kruskal & Wallis (1952), "Use of ranks in one-criterion variance analysis".

use serde::Serialize;
use tracing::{debug, instrument};

use super::TestResult;
use crate::config::{validate_alpha, Alternative, TestOptions};
use crate::effect_size::{interpret_correlation, interpret_eta_squared};
use crate::error::{check_same_len, check_sample, StatsError, StatsResult};
use crate::rank_sum;
use crate::special;
use crate::stats;

/// Largest number of non-zero pairs for the exact signed-rank distribution.
const WILCOXON_EXACT_MAX: usize = 50;

/// Mann–Whitney z-score and effect size are reported above this total size.
const MANN_WHITNEY_Z_MIN_TOTAL: usize = 20;

/// Wilcoxon z-score and effect size are reported above this pair count.
const WILCOXON_Z_MIN_PAIRS: usize = 25;

// ============================================================================
// Mann–Whitney U
// ============================================================================

/// Mann–Whitney result with the rank sum of each sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MannWhitneyResult {
    /// `statistic` is U for `sample1`.
    #[serde(flatten)]
    pub test: TestResult,
    pub rank_sum_1: f64,
    pub rank_sum_2: f64,
}

/// Mann–Whitney U test for two independent samples.
///
/// `statistic` is U₁ = R₁ − n₁(n₁+1)/2, the number of pairs in which the
/// `sample1` value exceeds the `sample2` value (ties count one half).
/// `greater` tests whether `sample1` tends to be larger.
///
/// # Algorithm
/// - Both samples ≤ 8 and no ties: exact p-value from the counting
///   distribution of U.
/// - Otherwise: normal approximation with continuity correction and the
///   tie-corrected variance
///   `σ² = n₁n₂/12 · ((N+1) − Σ(t³−t)/(N(N−1)))`.
///
/// When N > 20 the z-score `(U₁ − n₁n₂/2)/σ`, the rank-biserial
/// effect size `|z|/√N` and the standard normal critical value at `alpha`
/// are also reported.
///
/// # Errors
/// - `InsufficientData` if either sample is empty.
/// - `DegenerateComputation` if every value is identical.
#[instrument(level = "debug", skip_all, fields(n1 = sample1.len(), n2 = sample2.len(), alternative = %options.alternative))]
pub fn mann_whitney(
    sample1: &[f64],
    sample2: &[f64],
    options: &TestOptions,
) -> StatsResult<MannWhitneyResult> {
    options.validate()?;
    let u = rank_sum::u_statistic(sample1, sample2)?;
    let p_value = u.p_value(options.alternative);

    let (effect, z) = if u.n1 + u.n2 > MANN_WHITNEY_Z_MIN_TOTAL {
        let z = u.z_score();
        let r = z.abs() / ((u.n1 + u.n2) as f64).sqrt();
        (Some((r, interpret_correlation(r))), Some(z))
    } else {
        (None, None)
    };

    let mut test = TestResult::decided(u.u1, p_value, options.alpha, effect);
    if z.is_some() {
        test.z_score = z;
        test.critical_value = Some(z_critical(options));
    }

    debug!(u1 = u.u1, p_value, exact = u.is_exact(), "mann-whitney complete");
    Ok(MannWhitneyResult {
        test,
        rank_sum_1: u.rank_sum_1,
        rank_sum_2: u.rank_sum_2,
    })
}

/// Standard normal critical value at `alpha` for the alternative.
fn z_critical(options: &TestOptions) -> f64 {
    match options.alternative {
        Alternative::TwoSided => special::inverse_normal_cdf(1.0 - options.alpha / 2.0),
        Alternative::Less | Alternative::Greater => special::inverse_normal_cdf(1.0 - options.alpha),
    }
}

// ============================================================================
// Wilcoxon signed-rank
// ============================================================================

/// Wilcoxon signed-rank test on the paired differences `sample1 − sample2`.
///
/// Zero differences are dropped before ranking. The statistic is
/// min(W⁺, W⁻) for the two-sided alternative and W⁺ (the rank sum of
/// positive differences) for one-sided alternatives.
///
/// # Algorithm
/// - At most 50 non-zero differences, no tied magnitudes and no dropped
///   zeros: exact p-value from the subset-sum distribution of W⁺.
/// - Otherwise: normal approximation with mean n(n+1)/4 and
///   tie-corrected variance `n(n+1)(2n+1)/24 − Σ(t³−t)/48`.
///
/// When there are more than 25 pairs the z-score, the effect size
/// `r = |z|/√n` and the standard normal critical value at `alpha` are
/// also reported.
///
/// # Errors
/// - `InsufficientData` if either sample is empty.
/// - `MismatchedLength` if the samples differ in length.
/// - `DegenerateComputation` if every difference is zero.
#[instrument(level = "debug", skip_all, fields(pairs = sample1.len(), alternative = %options.alternative))]
pub fn wilcoxon(sample1: &[f64], sample2: &[f64], options: &TestOptions) -> StatsResult<TestResult> {
    options.validate()?;
    check_sample("wilcoxon sample1", sample1, 1)?;
    check_sample("wilcoxon sample2", sample2, 1)?;
    check_same_len("wilcoxon", sample1.len(), sample2.len())?;

    let diffs: Vec<f64> = sample1
        .iter()
        .zip(sample2)
        .map(|(a, b)| a - b)
        .filter(|&d| d != 0.0)
        .collect();
    let dropped_zeros = diffs.len() < sample1.len();
    if diffs.is_empty() {
        return Err(StatsError::degenerate(
            "wilcoxon is undefined when every paired difference is zero",
        ));
    }

    let magnitudes: Vec<f64> = diffs.iter().map(|d| d.abs()).collect();
    let ranks = stats::average_ranks(&magnitudes);
    // fold from +0.0; an empty f64 sum is −0.0
    let w_plus = diffs
        .iter()
        .zip(&ranks)
        .filter(|(d, _)| **d > 0.0)
        .fold(0.0, |acc, (_, r)| acc + r);

    let n = diffs.len();
    let nf = n as f64;
    let w_total = nf * (nf + 1.0) / 2.0;
    let w_minus = w_total - w_plus;
    let ties = stats::tie_correction(&magnitudes);

    let statistic = match options.alternative {
        Alternative::TwoSided => w_plus.min(w_minus),
        Alternative::Less | Alternative::Greater => w_plus,
    };

    let mu = w_total / 2.0;
    let var = nf * (nf + 1.0) * (2.0 * nf + 1.0) / 24.0 - ties / 48.0;
    if var <= 0.0 {
        return Err(StatsError::degenerate("wilcoxon variance is zero"));
    }
    let sigma = var.sqrt();

    let exact = n <= WILCOXON_EXACT_MAX && ties == 0.0 && !dropped_zeros;
    let p_value = if exact {
        let dist = SignedRankDistribution::new(n);
        match options.alternative {
            Alternative::TwoSided => 2.0 * dist.cdf(statistic),
            Alternative::Greater => dist.sf(w_plus),
            Alternative::Less => dist.cdf(w_plus),
        }
    } else {
        let z = (statistic - mu) / sigma;
        match options.alternative {
            Alternative::TwoSided => 2.0 * special::standard_normal_cdf(z),
            Alternative::Greater => special::standard_normal_sf(z),
            Alternative::Less => special::standard_normal_cdf(z),
        }
    };

    let (effect, z) = if sample1.len() > WILCOXON_Z_MIN_PAIRS {
        let z = (w_plus - mu) / sigma;
        let r = z.abs() / nf.sqrt();
        (Some((r, interpret_correlation(r))), Some(z))
    } else {
        (None, None)
    };

    let mut result = TestResult::decided(statistic, p_value, options.alpha, effect);
    if z.is_some() {
        result.z_score = z;
        result.critical_value = Some(z_critical(options));
    }

    debug!(w_plus, w_minus, p_value, exact, "wilcoxon complete");
    Ok(result)
}

/// Null distribution of W⁺ for `n` distinct non-zero ranks.
struct SignedRankDistribution {
    counts: Vec<f64>,
    total: f64,
}

impl SignedRankDistribution {
    /// Counts subsets of `{1, …, n}` by their sum.
    fn new(n: usize) -> Self {
        let max = n * (n + 1) / 2;
        let mut counts = vec![0.0; max + 1];
        counts[0] = 1.0;
        for k in 1..=n {
            for s in (k..=max).rev() {
                counts[s] += counts[s - k];
            }
        }
        Self {
            counts,
            total: 2.0_f64.powi(n as i32),
        }
    }

    /// P(W ≤ w).
    fn cdf(&self, w: f64) -> f64 {
        if w < 0.0 {
            return 0.0;
        }
        let end = (w.floor() as usize).min(self.counts.len() - 1);
        self.counts[..=end].iter().sum::<f64>() / self.total
    }

    /// P(W ≥ w).
    fn sf(&self, w: f64) -> f64 {
        let start = w.ceil().max(0.0) as usize;
        if start >= self.counts.len() {
            return 0.0;
        }
        self.counts[start..].iter().sum::<f64>() / self.total
    }
}

// ============================================================================
// Kruskal–Wallis H
// ============================================================================

/// Kruskal–Wallis H test across two or more independent groups.
///
/// # Algorithm
/// `H = 12/(N(N+1)) · Σ nᵢ(R̄ᵢ − R̄)²` divided by the tie correction
/// `1 − Σ(t³−t)/(N³−N)`; p-value from χ²(k − 1).
///
/// Effect size `(H − k + 1)/(N − k)` is reported when N > k and labelled
/// with eta-squared thresholds.
///
/// # Errors
/// - `InsufficientData` for fewer than 2 groups or an empty group.
/// - `DegenerateComputation` if every observation is identical.
#[instrument(level = "debug", skip(groups), fields(k = groups.len()))]
pub fn kruskal_wallis(groups: &[&[f64]], alpha: f64) -> StatsResult<TestResult> {
    validate_alpha(alpha)?;
    if groups.len() < 2 {
        return Err(StatsError::InsufficientData {
            context: "kruskal-wallis groups",
            required: 2,
            actual: groups.len(),
        });
    }
    for g in groups {
        check_sample("kruskal-wallis group", g, 1)?;
    }

    let combined: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let n = combined.len() as f64;
    let k = groups.len() as f64;
    let ranks = stats::average_ranks(&combined);
    let mean_rank = (n + 1.0) / 2.0;

    let mut h = 0.0;
    let mut offset = 0;
    for g in groups {
        let group_ranks = &ranks[offset..offset + g.len()];
        offset += g.len();
        let ni = g.len() as f64;
        let rbar = group_ranks.iter().sum::<f64>() / ni;
        h += ni * (rbar - mean_rank).powi(2);
    }
    h *= 12.0 / (n * (n + 1.0));

    let correction = 1.0 - stats::tie_correction(&combined) / (n * n * n - n);
    if correction <= 0.0 {
        return Err(StatsError::degenerate(
            "kruskal-wallis is undefined when every value is identical",
        ));
    }
    h /= correction;

    let df = k - 1.0;
    let p_value = special::chi_squared_sf(h, df);
    let effect = (n > k).then(|| {
        let e = (h - k + 1.0) / (n - k);
        (e, interpret_eta_squared(e))
    });

    debug!(h, df, p_value, "kruskal-wallis complete");
    Ok(TestResult::decided(h, p_value, alpha, effect)
        .with_df(df)
        .with_critical_value(special::chi_squared_quantile(1.0 - alpha, df)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect_size::EffectSizeLabel;

    fn opts(alternative: Alternative) -> TestOptions {
        TestOptions::default().with_alternative(alternative)
    }

    // --- Mann–Whitney ---

    #[test]
    fn test_mann_whitney_exact_separated() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let r = mann_whitney(&a, &b, &TestOptions::default()).unwrap();
        assert_eq!(r.test.statistic, 0.0);
        assert_eq!(r.rank_sum_1, 6.0);
        assert_eq!(r.rank_sum_2, 15.0);
        // C(6,3) = 20 arrangements, one with U = 9
        assert!((r.test.p_value - 0.1).abs() < 1e-12);
        assert!(r.test.z_score.is_none());
        assert!(r.test.effect_size.is_none());
        assert!(r.test.critical_value.is_none());

        let less = mann_whitney(&a, &b, &opts(Alternative::Less)).unwrap();
        assert!((less.test.p_value - 0.05).abs() < 1e-12);
        let greater = mann_whitney(&a, &b, &opts(Alternative::Greater)).unwrap();
        assert!((greater.test.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mann_whitney_asymptotic_with_z() {
        let a: Vec<f64> = (1..=11).map(f64::from).collect();
        let b: Vec<f64> = (12..=22).map(f64::from).collect();
        let r = mann_whitney(&a, &b, &TestOptions::default()).unwrap();
        assert_eq!(r.test.statistic, 0.0);
        assert!(r.test.p_value < 1e-3 && r.test.p_value > 1e-6, "p = {}", r.test.p_value);
        let z = r.test.z_score.unwrap();
        // σ² = 121·23/12
        let expected_z = -60.5 / (121.0 * 23.0 / 12.0_f64).sqrt();
        assert!((z - expected_z).abs() < 1e-12);
        let eff = r.test.effect_size.unwrap();
        assert!((eff - expected_z.abs() / 22.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(r.test.effect_size_label, Some(EffectSizeLabel::Large));
        assert!((r.test.critical_value.unwrap() - 1.959963984540054).abs() < 1e-6);

        let greater = mann_whitney(&a, &b, &opts(Alternative::Greater)).unwrap();
        assert!((greater.test.critical_value.unwrap() - 1.6448536269514722).abs() < 1e-6);
    }

    #[test]
    fn test_mann_whitney_ties_use_average_ranks() {
        let a = [1.0, 2.0, 2.0];
        let b = [2.0, 3.0, 4.0];
        let r = mann_whitney(&a, &b, &TestOptions::default()).unwrap();
        // ranks: 1, 3, 3 | 3, 5, 6
        assert_eq!(r.rank_sum_1, 7.0);
        assert_eq!(r.rank_sum_2, 14.0);
        assert_eq!(r.test.statistic, 1.0);
        assert!(r.test.p_value > 0.05);
    }

    #[test]
    fn test_mann_whitney_identical_values() {
        assert!(matches!(
            mann_whitney(&[1.0, 1.0], &[1.0, 1.0], &TestOptions::default()),
            Err(StatsError::DegenerateComputation(_))
        ));
        assert!(mann_whitney(&[], &[1.0], &TestOptions::default()).is_err());
    }

    // --- Wilcoxon ---

    #[test]
    fn test_wilcoxon_exact_all_positive() {
        let s1 = [2.0, 4.0, 6.0, 8.0, 10.0];
        let s2 = [1.0, 2.0, 3.0, 4.0, 5.0];
        let r = wilcoxon(&s1, &s2, &TestOptions::default()).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert!((r.p_value - 2.0 / 32.0).abs() < 1e-15);
        assert!(!r.reject_null);

        let g = wilcoxon(&s1, &s2, &opts(Alternative::Greater)).unwrap();
        assert_eq!(g.statistic, 15.0);
        assert!((g.p_value - 1.0 / 32.0).abs() < 1e-15);
        assert!(g.reject_null);

        let l = wilcoxon(&s1, &s2, &opts(Alternative::Less)).unwrap();
        assert!((l.p_value - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_wilcoxon_no_positive_differences_gives_positive_zero() {
        let s1 = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let s2 = [2.0, 4.0, 6.0, 8.0, 10.0, 12.0];
        let r = wilcoxon(&s1, &s2, &opts(Alternative::Less)).unwrap();
        assert_eq!(r.statistic, 0.0);
        assert!(r.statistic.is_sign_positive());
        assert!((r.p_value - 1.0 / 64.0).abs() < 1e-15);

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["statistic"].to_string(), "0.0");
    }

    #[test]
    fn test_wilcoxon_zero_differences_use_normal_approximation() {
        let s1 = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let s2 = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0];
        let r = wilcoxon(&s1, &s2, &TestOptions::default()).unwrap();
        // five non-zero differences, all positive
        assert_eq!(r.statistic, 0.0);
        let z = -7.5 / (5.0 * 6.0 * 11.0 / 24.0_f64).sqrt();
        assert!((r.p_value - 2.0 * special::standard_normal_cdf(z)).abs() < 1e-12);
    }

    #[test]
    fn test_wilcoxon_z_only_above_25_pairs() {
        let s1: Vec<f64> = (0..30).map(|i| f64::from(i) + 0.5).collect();
        let s2: Vec<f64> = (0..30).map(|i| f64::from(i) * 0.9).collect();
        let r = wilcoxon(&s1, &s2, &TestOptions::default()).unwrap();
        assert!(r.z_score.is_some());
        assert!(r.effect_size.unwrap() > 0.0);
        assert!((r.critical_value.unwrap() - 1.959963984540054).abs() < 1e-6);

        let r = wilcoxon(&s1[..10], &s2[..10], &TestOptions::default()).unwrap();
        assert!(r.z_score.is_none());
        assert!(r.effect_size.is_none());
        assert!(r.critical_value.is_none());
    }

    #[test]
    fn test_wilcoxon_validation() {
        assert!(matches!(
            wilcoxon(&[1.0, 2.0], &[1.0], &TestOptions::default()),
            Err(StatsError::MismatchedLength { .. })
        ));
        assert!(matches!(
            wilcoxon(&[1.0, 2.0], &[1.0, 2.0], &TestOptions::default()),
            Err(StatsError::DegenerateComputation(_))
        ));
    }

    #[test]
    fn test_signed_rank_distribution() {
        let d = SignedRankDistribution::new(4);
        // subset sums of {1,2,3,4}: 16 subsets, sums 0..=10
        assert_eq!(d.counts.iter().sum::<f64>(), 16.0);
        assert_eq!(d.counts[5], 2.0);
        assert!((d.cdf(10.0) - 1.0).abs() < 1e-15);
        assert!((d.sf(10.0) - 1.0 / 16.0).abs() < 1e-15);
    }

    // --- Kruskal–Wallis ---

    #[test]
    fn test_kruskal_wallis_separated_groups() {
        let r = kruskal_wallis(&[&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]], 0.05).unwrap();
        assert!((r.statistic - 7.2).abs() < 1e-12);
        assert_eq!(r.degrees_of_freedom, Some(2.0));
        assert!((r.p_value - (-3.6_f64).exp()).abs() < 1e-12);
        assert!(r.reject_null);
        assert!((r.effect_size.unwrap() - 5.2 / 6.0).abs() < 1e-12);
        assert!((r.critical_value.unwrap() - 5.991464547107979).abs() < 1e-6);
    }

    #[test]
    fn test_kruskal_wallis_tie_correction_raises_h() {
        let groups: [&[f64]; 2] = [&[1.0, 1.0, 2.0], &[2.0, 3.0, 3.0]];
        let r = kruskal_wallis(&groups, 0.05).unwrap();
        // ranks 1.5,1.5,3.5 | 3.5,5.5,5.5; uncorrected H = 12/42·3·(2·(4/3)²) = 64/21
        let uncorrected = 64.0 / 21.0;
        let c = 1.0 - 18.0 / 210.0;
        assert!((r.statistic - uncorrected / c).abs() < 1e-12);
    }

    #[test]
    fn test_kruskal_wallis_effect_omitted_when_n_equals_k() {
        let r = kruskal_wallis(&[&[1.0], &[2.0]], 0.05).unwrap();
        assert!(r.effect_size.is_none());
    }

    #[test]
    fn test_kruskal_wallis_degenerate() {
        assert!(matches!(
            kruskal_wallis(&[&[2.0, 2.0], &[2.0]], 0.05),
            Err(StatsError::DegenerateComputation(_))
        ));
        assert!(kruskal_wallis(&[&[1.0, 2.0]], 0.05).is_err());
        assert!(kruskal_wallis(&[&[1.0], &[2.0]], 0.0).is_err());
    }
}
