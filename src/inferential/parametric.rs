//! Parametric tests: Student's t, chi-squared, one-way ANOVA.

use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::TestResult;
use crate::config::{Alternative, TestOptions, DEFAULT_ALPHA};
use crate::effect_size::{interpret_cohens_d, interpret_correlation, interpret_eta_squared};
use crate::error::{check_same_len, check_sample, StatsError, StatsResult};
use crate::special;
use crate::stats;

// ---------------------------------------------------------------------------
// t-tests
// ---------------------------------------------------------------------------

/// Student's t-test in one of three modes.
///
/// - `sample2 == None`: one-sample test of H₀: μ = 0, df = n − 1.
/// - `paired`: one-sample test on `sample1[i] − sample2[i]`, df = n − 1.
/// - otherwise: independent two-sample test with pooled variance,
///   df = n₁ + n₂ − 2.
///
/// One-sided p-values are derived from the two-sided one: `p/2` when the
/// statistic points toward the alternative, `1 − p/2` otherwise.
///
/// Effect size is Cohen's d: `mean/std` (one-sample), `mean(diff)/std(diff)`
/// (paired), `(mean₁ − mean₂)/pooled_std` (independent). The confidence
/// interval for the mean is reported only for two-sided one-sample tests.
///
/// # Errors
/// - `InsufficientData` if a sample has fewer than 2 values.
/// - `MismatchedLength` for paired samples of different lengths.
/// - `DegenerateComputation` if the relevant variance is zero.
#[instrument(level = "debug", skip(sample1, sample2, options), fields(
    n1 = sample1.len(),
    n2 = sample2.map_or(0, <[f64]>::len),
    alternative = %options.alternative,
))]
pub fn t_test(
    sample1: &[f64],
    sample2: Option<&[f64]>,
    paired: bool,
    options: &TestOptions,
) -> StatsResult<TestResult> {
    options.validate()?;
    check_sample("t-test sample1", sample1, 2)?;

    let (t, df, d) = match sample2 {
        None => one_sample_t(sample1)?,
        Some(s2) if paired => {
            check_sample("t-test sample2", s2, 2)?;
            check_same_len("paired t-test", sample1.len(), s2.len())?;
            let diffs: Vec<f64> = sample1.iter().zip(s2).map(|(a, b)| a - b).collect();
            one_sample_t(&diffs)?
        }
        Some(s2) => {
            check_sample("t-test sample2", s2, 2)?;
            independent_t(sample1, s2)?
        }
    };

    let p_two_sided = 2.0 * special::t_distribution_sf(t.abs(), df);
    let p_value = adjust_for_alternative(p_two_sided, t, options.alternative);

    let critical = match options.alternative {
        Alternative::TwoSided => special::t_distribution_quantile(1.0 - options.alpha / 2.0, df),
        _ => special::t_distribution_quantile(1.0 - options.alpha, df),
    };

    let mut result = TestResult::decided(t, p_value, options.alpha, Some((d, interpret_cohens_d(d))))
        .with_df(df)
        .with_critical_value(critical);

    if sample2.is_none() && options.alternative == Alternative::TwoSided {
        let n = sample1.len() as f64;
        let m = stats::mean(sample1).unwrap_or(0.0);
        let sem = stats::std_dev(sample1).unwrap_or(0.0) / n.sqrt();
        result.confidence_interval = Some([m - critical * sem, m + critical * sem]);
    }

    debug!(t, df, p_value, cohens_d = d, "t-test complete");
    Ok(result)
}

/// Returns `(t, df, d)` for H₀: μ = 0.
fn one_sample_t(data: &[f64]) -> StatsResult<(f64, f64, f64)> {
    let n = data.len() as f64;
    let m = stats::mean(data).ok_or(StatsError::NonFinite { context: "t-test" })?;
    let sd = stats::std_dev(data).ok_or(StatsError::NonFinite { context: "t-test" })?;
    if sd == 0.0 {
        return Err(StatsError::degenerate(
            "t-test is undefined for a sample with zero variance",
        ));
    }
    Ok((m / (sd / n.sqrt()), n - 1.0, m / sd))
}

/// Returns `(t, df, d)` for the pooled-variance two-sample test.
fn independent_t(a: &[f64], b: &[f64]) -> StatsResult<(f64, f64, f64)> {
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let nonfinite = StatsError::NonFinite { context: "t-test" };
    let (m1, m2) = (
        stats::mean(a).ok_or_else(|| nonfinite.clone())?,
        stats::mean(b).ok_or_else(|| nonfinite.clone())?,
    );
    let (v1, v2) = (
        stats::variance(a).ok_or_else(|| nonfinite.clone())?,
        stats::variance(b).ok_or(nonfinite)?,
    );
    let df = n1 + n2 - 2.0;
    let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / df;
    if pooled == 0.0 {
        return Err(StatsError::degenerate(
            "t-test is undefined when both samples have zero variance",
        ));
    }
    let t = (m1 - m2) / (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();
    Ok((t, df, (m1 - m2) / pooled.sqrt()))
}

/// Converts a two-sided p-value into the p-value for `alternative`.
fn adjust_for_alternative(p_two_sided: f64, statistic: f64, alternative: Alternative) -> f64 {
    let half = p_two_sided / 2.0;
    match alternative {
        Alternative::TwoSided => p_two_sided,
        Alternative::Less if statistic < 0.0 => half,
        Alternative::Greater if statistic > 0.0 => half,
        Alternative::Less | Alternative::Greater => 1.0 - half,
    }
}

// ---------------------------------------------------------------------------
// Chi-squared tests
// ---------------------------------------------------------------------------

/// Chi-squared test result with the expected frequency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquareResult {
    #[serde(flatten)]
    pub test: TestResult,
    pub expected_frequencies: Vec<Vec<f64>>,
}

/// Chi-squared test of independence or goodness of fit.
///
/// Without `expected`, `observed` is a contingency table: expected counts
/// come from the marginal totals, df = (rows − 1)(cols − 1), the Yates
/// continuity correction is applied when df = 1, and Cramér's V is the
/// effect size.
///
/// With `expected`, both tables are flattened and compared cell by cell:
/// df = cells − 1 and the effect size is Cohen's w = √(χ²/N).
///
/// The decision and critical value always use α = 0.05.
///
/// # Errors
/// - `InvalidInput` for negative or non-finite counts, ragged or too-small
///   tables, non-positive expected counts, or totals that disagree.
/// - `MismatchedLength` if `expected` has a different number of cells.
/// - `DegenerateComputation` if a row or column total is zero.
#[instrument(level = "debug", skip_all, fields(rows = observed.len(), goodness_of_fit = expected.is_some()))]
pub fn chi_square(observed: &[Vec<f64>], expected: Option<&[Vec<f64>]>) -> StatsResult<ChiSquareResult> {
    if observed.is_empty() || observed.iter().all(Vec::is_empty) {
        return Err(StatsError::InsufficientData {
            context: "chi-square observed table",
            required: 1,
            actual: 0,
        });
    }
    if observed.iter().flatten().any(|&v| !v.is_finite() || v < 0.0) {
        return Err(StatsError::InvalidInput(
            "observed frequencies must be finite and non-negative".into(),
        ));
    }

    let result = match expected {
        None => chi_square_independence(observed)?,
        Some(exp) => chi_square_goodness_of_fit(observed, exp)?,
    };
    debug!(
        statistic = result.test.statistic,
        p_value = result.test.p_value,
        "chi-square complete"
    );
    Ok(result)
}

fn chi_square_independence(table: &[Vec<f64>]) -> StatsResult<ChiSquareResult> {
    let n_rows = table.len();
    let n_cols = table[0].len();
    for row in table {
        check_same_len("contingency table row", n_cols, row.len())?;
    }
    if n_rows < 2 || n_cols < 2 {
        return Err(StatsError::InvalidInput(format!(
            "contingency table needs at least 2 rows and 2 columns, got {n_rows}×{n_cols}"
        )));
    }

    let row_sums: Vec<f64> = table.iter().map(|r| r.iter().sum()).collect();
    let col_sums: Vec<f64> = (0..n_cols).map(|j| table.iter().map(|r| r[j]).sum()).collect();
    let total: f64 = row_sums.iter().sum();
    if row_sums.iter().chain(&col_sums).any(|&s| s <= 0.0) {
        return Err(StatsError::degenerate(
            "contingency table has a zero row or column total",
        ));
    }

    let expected: Vec<Vec<f64>> = row_sums
        .iter()
        .map(|&r| col_sums.iter().map(|&c| r * c / total).collect())
        .collect();

    let df = ((n_rows - 1) * (n_cols - 1)) as f64;
    let yates = df == 1.0;
    let mut chi2 = 0.0;
    for (obs_row, exp_row) in table.iter().zip(&expected) {
        for (&o, &e) in obs_row.iter().zip(exp_row) {
            let mut diff = (o - e).abs();
            if yates {
                diff = (diff - 0.5).max(0.0);
            }
            chi2 += diff * diff / e;
        }
    }

    let k = n_rows.min(n_cols) as f64;
    let cramers_v = (chi2 / (total * (k - 1.0))).sqrt();
    let p_value = special::chi_squared_sf(chi2, df);
    let test = TestResult::decided(
        chi2,
        p_value,
        DEFAULT_ALPHA,
        Some((cramers_v, interpret_correlation(cramers_v))),
    )
    .with_df(df)
    .with_critical_value(special::chi_squared_quantile(1.0 - DEFAULT_ALPHA, df));

    Ok(ChiSquareResult {
        test,
        expected_frequencies: expected,
    })
}

fn chi_square_goodness_of_fit(
    observed: &[Vec<f64>],
    expected: &[Vec<f64>],
) -> StatsResult<ChiSquareResult> {
    let obs: Vec<f64> = observed.iter().flatten().copied().collect();
    let exp: Vec<f64> = expected.iter().flatten().copied().collect();
    check_same_len("chi-square expected frequencies", obs.len(), exp.len())?;
    if obs.len() < 2 {
        return Err(StatsError::InsufficientData {
            context: "chi-square goodness of fit",
            required: 2,
            actual: obs.len(),
        });
    }
    if exp.iter().any(|&e| !e.is_finite() || e <= 0.0) {
        return Err(StatsError::InvalidInput(
            "expected frequencies must be finite and positive".into(),
        ));
    }
    let obs_total: f64 = obs.iter().sum();
    let exp_total: f64 = exp.iter().sum();
    if (obs_total - exp_total).abs() > 1e-8 * obs_total.max(exp_total) {
        return Err(StatsError::InvalidInput(format!(
            "observed and expected totals differ ({obs_total} vs {exp_total})"
        )));
    }

    let chi2: f64 = obs.iter().zip(&exp).map(|(&o, &e)| (o - e).powi(2) / e).sum();
    let df = (obs.len() - 1) as f64;
    let w = if obs_total > 0.0 { (chi2 / obs_total).sqrt() } else { 0.0 };
    let test = TestResult::decided(
        chi2,
        special::chi_squared_sf(chi2, df),
        DEFAULT_ALPHA,
        Some((w, interpret_correlation(w))),
    )
    .with_df(df)
    .with_critical_value(special::chi_squared_quantile(1.0 - DEFAULT_ALPHA, df));

    Ok(ChiSquareResult {
        test,
        expected_frequencies: expected.to_vec(),
    })
}

// ---------------------------------------------------------------------------
// One-way ANOVA
// ---------------------------------------------------------------------------

/// One-way ANOVA table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaResult {
    /// `statistic` is F; effect size is η².
    #[serde(flatten)]
    pub test: TestResult,
    pub df_between: usize,
    pub df_within: usize,
    pub ss_between: f64,
    pub ss_within: f64,
    pub ms_between: f64,
    pub ms_within: f64,
}

/// One-way analysis of variance across two or more groups.
///
/// # Algorithm
/// SSB = Σ nᵢ(x̄ᵢ − x̄)², SSW = ΣΣ (xᵢⱼ − x̄ᵢ)², F = (SSB/(k−1)) / (SSW/(N−k)),
/// η² = SSB / (SSB + SSW). Decision and critical value at α = 0.05.
///
/// `test.degrees_of_freedom` is the numerator df `k − 1`; the denominator
/// df `N − k` is in [`AnovaResult::df_within`].
///
/// When every group is internally constant but the group means differ,
/// F is reported as +∞ with p = 0.
///
/// # Errors
/// - `InsufficientData` for fewer than 2 groups, an empty group, or N ≤ k.
/// - `DegenerateComputation` if every observation is identical.
#[instrument(level = "debug", skip_all, fields(k = groups.len()))]
pub fn anova(groups: &[&[f64]]) -> StatsResult<AnovaResult> {
    if groups.len() < 2 {
        return Err(StatsError::InsufficientData {
            context: "anova groups",
            required: 2,
            actual: groups.len(),
        });
    }
    for g in groups {
        check_sample("anova group", g, 1)?;
    }
    let k = groups.len();
    let n_total: usize = groups.iter().map(|g| g.len()).sum();
    if n_total <= k {
        return Err(StatsError::InsufficientData {
            context: "anova observations",
            required: k + 1,
            actual: n_total,
        });
    }

    let all: Vec<f64> = groups.iter().flat_map(|g| g.iter().copied()).collect();
    let grand_mean = stats::kahan_sum(&all) / n_total as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for g in groups {
        let m = stats::kahan_sum(g) / g.len() as f64;
        ss_between += g.len() as f64 * (m - grand_mean).powi(2);
        ss_within += g.iter().map(|&x| (x - m).powi(2)).sum::<f64>();
    }

    let df_between = k - 1;
    let df_within = n_total - k;
    let ms_between = ss_between / df_between as f64;
    let ms_within = ss_within / df_within as f64;

    let (f, p_value) = if ss_within == 0.0 {
        if ss_between == 0.0 {
            return Err(StatsError::degenerate(
                "anova is undefined when every observation is identical",
            ));
        }
        warn!(ss_between, "zero within-group variance; reporting F = +inf, p = 0");
        (f64::INFINITY, 0.0)
    } else {
        let f = ms_between / ms_within;
        (f, special::f_distribution_sf(f, df_between as f64, df_within as f64))
    };

    let eta_sq = ss_between / (ss_between + ss_within);
    let test = TestResult::decided(
        f,
        p_value,
        DEFAULT_ALPHA,
        Some((eta_sq, interpret_eta_squared(eta_sq))),
    )
    .with_df(df_between as f64)
    .with_critical_value(special::f_distribution_quantile(
        1.0 - DEFAULT_ALPHA,
        df_between as f64,
        df_within as f64,
    ));

    debug!(f, p_value, eta_sq, "anova complete");
    Ok(AnovaResult {
        test,
        df_between,
        df_within,
        ss_between,
        ss_within,
        ms_between,
        ms_within,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect_size::EffectSizeLabel;

    // --- t-test ---

    #[test]
    fn test_independent_t_separated_samples() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [6.0, 7.0, 8.0, 9.0, 10.0];
        let r = t_test(&a, Some(&b), false, &TestOptions::default()).unwrap();
        // pooled var 2.5, se = 1 → t = −5, df = 8
        assert!((r.statistic + 5.0).abs() < 1e-12);
        assert_eq!(r.degrees_of_freedom, Some(8.0));
        assert!(r.p_value < 0.01, "p = {}", r.p_value);
        assert!(r.reject_null);
        let d = r.effect_size.unwrap();
        assert!((d + 5.0 / 2.5_f64.sqrt()).abs() < 1e-12);
        assert_eq!(r.effect_size_label, Some(EffectSizeLabel::Large));
        assert!(r.confidence_interval.is_none());
    }

    #[test]
    fn test_one_sample_t_known_value() {
        // mean 3, sd √2.5, t = 3/(√2.5/√5) = 4.2426…, df 4
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let r = t_test(&data, None, false, &TestOptions::default()).unwrap();
        assert!((r.statistic - 18.0_f64.sqrt()).abs() < 1e-12);
        assert!((r.p_value - 0.0132356).abs() < 1e-5, "p = {}", r.p_value);
        let ci = r.confidence_interval.unwrap();
        assert!(ci[0] < 3.0 && 3.0 < ci[1]);
        let crit = r.critical_value.unwrap();
        assert!((crit - 2.776445105).abs() < 1e-6);
        assert!((ci[1] - 3.0 - crit * (0.5_f64).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_paired_t_uses_differences() {
        let before = [10.0, 12.0, 9.0, 11.0, 13.0];
        let after = [12.0, 13.0, 11.0, 12.0, 15.0];
        let r = t_test(&after, Some(&before), true, &TestOptions::default()).unwrap();
        // differences [2,1,2,1,2]: mean 1.6, sd √0.3
        let expected_t = 1.6 / (0.3_f64.sqrt() / 5.0_f64.sqrt());
        assert!((r.statistic - expected_t).abs() < 1e-10);
        assert_eq!(r.degrees_of_freedom, Some(4.0));
        assert!((r.effect_size.unwrap() - 1.6 / 0.3_f64.sqrt()).abs() < 1e-10);
        assert!(r.confidence_interval.is_none());
    }

    #[test]
    fn test_paired_t_mismatched_length() {
        let err = t_test(&[1.0, 2.0, 3.0], Some(&[1.0, 2.0]), true, &TestOptions::default());
        assert!(matches!(err, Err(StatsError::MismatchedLength { .. })));
    }

    #[test]
    fn test_t_zero_variance_is_degenerate() {
        let r = t_test(&[5.0, 5.0, 5.0, 5.0], None, false, &TestOptions::default());
        assert!(matches!(r, Err(StatsError::DegenerateComputation(_))));
    }

    #[test]
    fn test_t_one_sided_adjustment() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [6.0, 7.0, 8.0, 9.0, 10.0];
        let two = t_test(&a, Some(&b), false, &TestOptions::default()).unwrap();
        let less = t_test(&a, Some(&b), false, &TestOptions::default().with_alternative(Alternative::Less)).unwrap();
        let greater = t_test(
            &a,
            Some(&b),
            false,
            &TestOptions::default().with_alternative(Alternative::Greater),
        )
        .unwrap();
        assert!((less.p_value - two.p_value / 2.0).abs() < 1e-15);
        assert!((greater.p_value - (1.0 - two.p_value / 2.0)).abs() < 1e-15);
        assert!(less.reject_null);
        assert!(!greater.reject_null);
        // one-sided critical value uses 1 − α
        assert!(less.critical_value.unwrap() < two.critical_value.unwrap());
    }

    #[test]
    fn test_t_rejects_bad_alpha_and_short_samples() {
        let opts = TestOptions::default().with_alpha(1.5);
        assert!(matches!(
            t_test(&[1.0, 2.0, 3.0], None, false, &opts),
            Err(StatsError::InvalidInput(_))
        ));
        assert!(matches!(
            t_test(&[1.0], None, false, &TestOptions::default()),
            Err(StatsError::InsufficientData { required: 2, .. })
        ));
    }

    // --- chi-square ---

    #[test]
    fn test_chi_square_independence_with_yates() {
        // 2×2 with df = 1 → Yates correction
        let table = vec![vec![30.0, 10.0], vec![20.0, 40.0]];
        let r = chi_square(&table, None).unwrap();
        // expected [[20,20],[30,30]]; |O−E| = 10 → (9.5²)(1/20+1/20+1/30+1/30)
        let expected_chi2 = 9.5_f64.powi(2) * (2.0 / 20.0 + 2.0 / 30.0);
        assert!((r.test.statistic - expected_chi2).abs() < 1e-10);
        assert_eq!(r.test.degrees_of_freedom, Some(1.0));
        assert!((r.expected_frequencies[0][0] - 20.0).abs() < 1e-12);
        assert!((r.expected_frequencies[1][1] - 30.0).abs() < 1e-12);
        assert!(r.test.reject_null);
        assert!((r.test.critical_value.unwrap() - 3.841458820694124).abs() < 1e-6);
        let v = r.test.effect_size.unwrap();
        assert!((v - (expected_chi2 / 100.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_chi_square_independence_no_yates_for_larger_tables() {
        let table = vec![vec![10.0, 20.0, 30.0], vec![30.0, 20.0, 10.0]];
        let r = chi_square(&table, None).unwrap();
        // expected 20 everywhere: Σ(O−E)²/E = (100+0+100)·2/20
        assert!((r.test.statistic - 20.0).abs() < 1e-10);
        assert_eq!(r.test.degrees_of_freedom, Some(2.0));
        assert!((r.test.p_value - (-10.0_f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_chi_square_goodness_of_fit() {
        let observed = vec![vec![50.0, 30.0, 20.0]];
        let expected = vec![vec![40.0, 35.0, 25.0]];
        let r = chi_square(&observed, Some(&expected)).unwrap();
        let chi2 = 100.0 / 40.0 + 25.0 / 35.0 + 25.0 / 25.0;
        assert!((r.test.statistic - chi2).abs() < 1e-12);
        assert_eq!(r.test.degrees_of_freedom, Some(2.0));
        assert!((r.test.p_value - (-chi2 / 2.0).exp()).abs() < 1e-12);
        assert_eq!(r.expected_frequencies, expected);
    }

    #[test]
    fn test_chi_square_validation() {
        assert!(chi_square(&[], None).is_err());
        assert!(matches!(
            chi_square(&[vec![1.0, -2.0], vec![3.0, 4.0]], None),
            Err(StatsError::InvalidInput(_))
        ));
        assert!(matches!(
            chi_square(&[vec![1.0, 2.0], vec![3.0]], None),
            Err(StatsError::MismatchedLength { .. })
        ));
        assert!(matches!(
            chi_square(&[vec![0.0, 0.0], vec![3.0, 4.0]], None),
            Err(StatsError::DegenerateComputation(_))
        ));
        assert!(matches!(
            chi_square(&[vec![10.0, 10.0]], Some(&[vec![5.0, 5.0]])),
            Err(StatsError::InvalidInput(_))
        ));
        assert!(matches!(
            chi_square(&[vec![10.0, 10.0]], Some(&[vec![20.0]])),
            Err(StatsError::MismatchedLength { .. })
        ));
    }

    // --- anova ---

    #[test]
    fn test_anova_identical_groups() {
        let g = [1.0, 2.0, 3.0];
        let r = anova(&[&g, &g, &g]).unwrap();
        assert_eq!(r.test.statistic, 0.0);
        assert!((r.test.p_value - 1.0).abs() < 1e-12);
        assert!(!r.test.reject_null);
        assert_eq!(r.df_between, 2);
        assert_eq!(r.df_within, 6);
        assert_eq!(r.test.effect_size, Some(0.0));
    }

    #[test]
    fn test_anova_known_table() {
        let g1 = [1.0, 2.0, 3.0];
        let g2 = [4.0, 5.0, 6.0];
        let g3 = [7.0, 8.0, 9.0];
        let r = anova(&[&g1, &g2, &g3]).unwrap();
        // grand mean 5; SSB = 3·(9+0+9) = 54; SSW = 3·2 = 6
        assert!((r.ss_between - 54.0).abs() < 1e-10);
        assert!((r.ss_within - 6.0).abs() < 1e-10);
        assert!((r.ms_between - 27.0).abs() < 1e-10);
        assert!((r.ms_within - 1.0).abs() < 1e-10);
        assert!((r.test.statistic - 27.0).abs() < 1e-10);
        assert_eq!(r.test.degrees_of_freedom, Some(2.0));
        // F(0.95; 2, 6)
        assert!((r.test.critical_value.unwrap() - 5.143253).abs() < 1e-4);
        assert!(r.test.reject_null);
        assert!((r.test.effect_size.unwrap() - 0.9).abs() < 1e-12);
        assert_eq!(r.test.effect_size_label, Some(EffectSizeLabel::Large));
    }

    #[test]
    fn test_anova_zero_within_variance_gives_infinite_f() {
        let r = anova(&[&[1.0, 1.0], &[2.0, 2.0]]).unwrap();
        assert!(r.test.statistic.is_infinite());
        assert_eq!(r.test.p_value, 0.0);
        assert!(r.test.reject_null);
    }

    #[test]
    fn test_anova_degenerate_and_invalid() {
        assert!(matches!(
            anova(&[&[3.0, 3.0], &[3.0, 3.0]]),
            Err(StatsError::DegenerateComputation(_))
        ));
        assert!(matches!(
            anova(&[&[1.0, 2.0]]),
            Err(StatsError::InsufficientData { .. })
        ));
        assert!(matches!(
            anova(&[&[1.0], &[2.0]]),
            Err(StatsError::InsufficientData { .. })
        ));
        assert!(anova(&[&[1.0, 2.0], &[]]).is_err());
    }
}
