//! Correlation engine: Pearson, Spearman and Kendall coefficients with
//! p-values and confidence intervals, plus pairwise correlation matrices.
//!
//! # Confidence intervals
//!
//! Pearson and Spearman use the Fisher transform `z = atanh(r)` with
//! standard error `1/√(n−3)`. Kendall's τ uses the normal-theory standard
//! error `√(2(2n+5)/(9n(n−1)))` on the raw scale, clamped to `[−1, 1]`.
//! All intervals are 95 %.
//!
//! # References
//! - Fisher (1921), "On the probable error of a coefficient of correlation".
//! - Kendall (1945), "The treatment of ties in ranking problems".

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::DEFAULT_CONFIDENCE_LEVEL;
use crate::effect_size::{interpret_correlation, EffectSizeLabel};
use crate::error::{check_same_len, check_sample, StatsError, StatsResult};
use crate::special;
use crate::stats;

/// Largest tie-free sample for the exact Kendall p-value.
const KENDALL_EXACT_MAX: usize = 33;

// ============================================================================
// Labels
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    Pearson,
    Spearman,
    Kendall,
}

impl CorrelationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pearson => "pearson",
            Self::Spearman => "spearman",
            Self::Kendall => "kendall",
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strength of a correlation by `|r|`: 0.3, 0.5, 0.7 and 0.9 bound the bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl CorrelationStrength {
    pub fn from_coefficient(r: f64) -> Self {
        let a = r.abs();
        if a >= 0.9 {
            Self::VeryStrong
        } else if a >= 0.7 {
            Self::Strong
        } else if a >= 0.5 {
            Self::Moderate
        } else if a >= 0.3 {
            Self::Weak
        } else {
            Self::VeryWeak
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryWeak => "very weak",
            Self::Weak => "weak",
            Self::Moderate => "moderate",
            Self::Strong => "strong",
            Self::VeryStrong => "very strong",
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationDirection {
    Positive,
    Negative,
    None,
}

impl CorrelationDirection {
    pub fn from_coefficient(r: f64) -> Self {
        if r > 0.0 {
            Self::Positive
        } else if r < 0.0 {
            Self::Negative
        } else {
            Self::None
        }
    }
}

// ============================================================================
// Results
// ============================================================================

/// Pairwise correlation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationResult {
    pub method: CorrelationMethod,
    /// In `[−1, 1]`.
    pub coefficient: f64,
    /// Two-sided.
    pub p_value: f64,
    /// 95 % interval, `low ≤ coefficient ≤ high`.
    pub confidence_interval: [f64; 2],
    pub strength: CorrelationStrength,
    pub direction: CorrelationDirection,
    /// Direction then strength, e.g. `"positive strong correlation"`.
    pub interpretation: String,
    /// Coefficient of determination r².
    pub effect_size: f64,
    pub effect_size_label: EffectSizeLabel,
    pub n: usize,
}

impl CorrelationResult {
    fn new(
        method: CorrelationMethod,
        coefficient: f64,
        p_value: f64,
        confidence_interval: [f64; 2],
        n: usize,
    ) -> Self {
        let strength = CorrelationStrength::from_coefficient(coefficient);
        let direction = CorrelationDirection::from_coefficient(coefficient);
        let interpretation = match direction {
            CorrelationDirection::Positive => format!("positive {strength} correlation"),
            CorrelationDirection::Negative => format!("negative {strength} correlation"),
            CorrelationDirection::None => "no correlation".to_string(),
        };
        Self {
            method,
            coefficient,
            p_value: p_value.clamp(0.0, 1.0),
            confidence_interval,
            strength,
            direction,
            interpretation,
            effect_size: coefficient * coefficient,
            effect_size_label: interpret_correlation(coefficient),
            n,
        }
    }
}

/// Symmetric Pearson correlation matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Column names in input order.
    pub columns: Vec<String>,
    pub coefficients: Vec<Vec<f64>>,
    pub p_values: Vec<Vec<f64>>,
}

// ============================================================================
// Coefficients
// ============================================================================

fn check_pair(context: &'static str, x: &[f64], y: &[f64]) -> StatsResult<()> {
    check_sample(context, x, 3)?;
    check_sample(context, y, 3)?;
    check_same_len(context, x.len(), y.len())
}

/// Pearson product-moment correlation.
///
/// p-value from `t = r·√((n−2)/(1−r²))` with n − 2 df.
///
/// # Errors
/// - `InsufficientData` for fewer than 3 pairs.
/// - `MismatchedLength` if `x` and `y` differ in length.
/// - `DegenerateComputation` if either variable is constant.
///
/// # Examples
/// ```
/// use u_statengine::correlation::pearson;
///
/// let r = pearson(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]).unwrap();
/// assert!((r.coefficient - 1.0).abs() < 1e-12);
/// ```
#[instrument(level = "debug", skip_all, fields(n = x.len()))]
pub fn pearson(x: &[f64], y: &[f64]) -> StatsResult<CorrelationResult> {
    check_pair("pearson", x, y)?;
    let r = pearson_coefficient(x, y)?;
    let n = x.len();
    debug!(r, "pearson complete");
    Ok(CorrelationResult::new(
        CorrelationMethod::Pearson,
        r,
        t_test_p_value(r, n),
        fisher_interval(r, n),
        n,
    ))
}

/// Spearman rank correlation: Pearson on average ranks.
///
/// # Errors
/// As [`pearson`].
#[instrument(level = "debug", skip_all, fields(n = x.len()))]
pub fn spearman(x: &[f64], y: &[f64]) -> StatsResult<CorrelationResult> {
    check_pair("spearman", x, y)?;
    let rx = stats::average_ranks(x);
    let ry = stats::average_ranks(y);
    let rho = pearson_coefficient(&rx, &ry)?;
    let n = x.len();
    debug!(rho, "spearman complete");
    Ok(CorrelationResult::new(
        CorrelationMethod::Spearman,
        rho,
        t_test_p_value(rho, n),
        fisher_interval(rho, n),
        n,
    ))
}

/// Kendall's τ-b.
///
/// # Algorithm
/// `τ_b = (C − D)/√((n₀ − n₁)(n₀ − n₂))` over concordant and discordant
/// pairs, with n₀ = n(n−1)/2 and n₁, n₂ the tied pairs in x and y.
///
/// Without ties and with n ≤ 33 the p-value is exact, from the
/// distribution of the number of inversions of a random permutation.
/// Otherwise it uses the tie-corrected normal approximation of S = C − D.
///
/// # Errors
/// As [`pearson`].
#[instrument(level = "debug", skip_all, fields(n = x.len()))]
pub fn kendall(x: &[f64], y: &[f64]) -> StatsResult<CorrelationResult> {
    check_pair("kendall", x, y)?;
    let n = x.len();
    let tx = stats::tie_group_sizes(x);
    let ty = stats::tie_group_sizes(y);
    if tx.len() == 1 || ty.len() == 1 {
        return Err(StatsError::degenerate(
            "kendall correlation is undefined for a constant variable",
        ));
    }

    let (mut concordant, mut discordant) = (0u64, 0u64);
    for i in 0..n {
        for j in (i + 1)..n {
            if x[i] == x[j] || y[i] == y[j] {
                continue;
            }
            if (x[i] - x[j]).signum() == (y[i] - y[j]).signum() {
                concordant += 1;
            } else {
                discordant += 1;
            }
        }
    }

    let pairs = |t: &[usize]| t.iter().map(|&t| (t * (t - 1) / 2) as f64).sum::<f64>();
    let nf = n as f64;
    let n0 = nf * (nf - 1.0) / 2.0;
    let (n1, n2) = (pairs(&tx), pairs(&ty));
    let s = concordant as f64 - discordant as f64;
    let tau = (s / ((n0 - n1) * (n0 - n2)).sqrt()).clamp(-1.0, 1.0);

    let no_ties = n1 == 0.0 && n2 == 0.0;
    let p_value = if no_ties && n <= KENDALL_EXACT_MAX {
        kendall_exact_p(n, discordant as usize)
    } else {
        kendall_normal_p(s, n, &tx, &ty)
    };

    let z = special::inverse_normal_cdf((1.0 + DEFAULT_CONFIDENCE_LEVEL) / 2.0);
    let se = (2.0 * (2.0 * nf + 5.0) / (9.0 * nf * (nf - 1.0))).sqrt();
    let interval = [(tau - z * se).max(-1.0), (tau + z * se).min(1.0)];

    debug!(tau, p_value, "kendall complete");
    Ok(CorrelationResult::new(CorrelationMethod::Kendall, tau, p_value, interval, n))
}

/// Pairwise Pearson matrix over equal-length columns.
///
/// The diagonal is fixed at coefficient 1 with p-value 0.
///
/// # Errors
/// - `InsufficientData` for fewer than 2 columns or 3 rows.
/// - `MismatchedLength` for ragged columns or a name count that differs
///   from the column count.
/// - `DegenerateComputation` if a column is constant.
#[instrument(level = "debug", skip_all, fields(columns = data.len()))]
pub fn correlation_matrix(data: &[Vec<f64>], column_names: &[&str]) -> StatsResult<CorrelationMatrix> {
    if data.len() < 2 {
        return Err(StatsError::InsufficientData {
            context: "correlation matrix columns",
            required: 2,
            actual: data.len(),
        });
    }
    check_same_len("correlation matrix column names", data.len(), column_names.len())?;
    let rows = data[0].len();
    for col in data {
        check_sample("correlation matrix column", col, 3)?;
        check_same_len("correlation matrix column", rows, col.len())?;
    }

    let k = data.len();
    let mut coefficients = vec![vec![1.0; k]; k];
    let mut p_values = vec![vec![0.0; k]; k];
    for i in 0..k {
        for j in (i + 1)..k {
            let r = pearson_coefficient(&data[i], &data[j])?;
            let p = t_test_p_value(r, rows);
            coefficients[i][j] = r;
            coefficients[j][i] = r;
            p_values[i][j] = p;
            p_values[j][i] = p;
        }
    }

    Ok(CorrelationMatrix {
        columns: column_names.iter().map(|s| s.to_string()).collect(),
        coefficients,
        p_values,
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn pearson_coefficient(x: &[f64], y: &[f64]) -> StatsResult<f64> {
    let nonfinite = || StatsError::NonFinite {
        context: "correlation",
    };
    let cov = stats::covariance(x, y).ok_or_else(nonfinite)?;
    let vx = stats::variance(x).ok_or_else(nonfinite)?;
    let vy = stats::variance(y).ok_or_else(nonfinite)?;
    if vx == 0.0 || vy == 0.0 {
        return Err(StatsError::degenerate(
            "correlation is undefined for a constant variable",
        ));
    }
    Ok((cov / (vx * vy).sqrt()).clamp(-1.0, 1.0))
}

/// Two-sided p-value of `r` under H₀: ρ = 0 (t with n − 2 df).
fn t_test_p_value(r: f64, n: usize) -> f64 {
    if r.abs() >= 1.0 {
        return 0.0;
    }
    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    2.0 * special::t_distribution_sf(t.abs(), df)
}

/// 95 % Fisher-z interval.
fn fisher_interval(r: f64, n: usize) -> [f64; 2] {
    if r.abs() >= 1.0 {
        return [r, r];
    }
    if n <= 3 {
        return [-1.0, 1.0];
    }
    let z = r.atanh();
    let se = 1.0 / ((n - 3) as f64).sqrt();
    let q = special::inverse_normal_cdf((1.0 + DEFAULT_CONFIDENCE_LEVEL) / 2.0);
    [(z - q * se).tanh(), (z + q * se).tanh()]
}

/// Exact two-sided p-value from the inversion-count distribution.
fn kendall_exact_p(n: usize, discordant: usize) -> f64 {
    let max = n * (n - 1) / 2;
    // probability mass of k inversions among permutations of m elements
    let mut prob = vec![0.0; max + 1];
    prob[0] = 1.0;
    for m in 2..=n {
        let top = m * (m - 1) / 2;
        let mut next = vec![0.0; max + 1];
        for (k, slot) in next.iter_mut().enumerate().take(top + 1) {
            let lo = k.saturating_sub(m - 1);
            *slot = prob[lo..=k].iter().sum::<f64>() / m as f64;
        }
        prob = next;
    }
    let d = discordant.min(max - discordant);
    let tail: f64 = prob[..=d].iter().sum();
    (2.0 * tail).min(1.0)
}

/// Two-sided p-value of S under the tie-corrected normal approximation.
fn kendall_normal_p(s: f64, n: usize, tx: &[usize], ty: &[usize]) -> f64 {
    let nf = n as f64;
    let sum = |t: &[usize], f: fn(f64) -> f64| t.iter().map(|&t| f(t as f64)).sum::<f64>();
    let v0 = nf * (nf - 1.0) * (2.0 * nf + 5.0);
    let vt = sum(tx, |t| t * (t - 1.0) * (2.0 * t + 5.0));
    let vu = sum(ty, |u| u * (u - 1.0) * (2.0 * u + 5.0));
    let v1 = sum(tx, |t| t * (t - 1.0)) * sum(ty, |u| u * (u - 1.0));
    let v2 = sum(tx, |t| t * (t - 1.0) * (t - 2.0)) * sum(ty, |u| u * (u - 1.0) * (u - 2.0));
    let var = (v0 - vt - vu) / 18.0
        + v1 / (2.0 * nf * (nf - 1.0))
        + v2 / (9.0 * nf * (nf - 1.0) * (nf - 2.0));
    if var <= 0.0 {
        return 1.0;
    }
    2.0 * special::standard_normal_sf(s.abs() / var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pearson_perfect() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let r = pearson(&x, &x).unwrap();
        assert!((r.coefficient - 1.0).abs() < 1e-12);
        assert_eq!(r.p_value, 0.0);
        assert_eq!(r.confidence_interval, [r.coefficient, r.coefficient]);
        assert_eq!(r.strength, CorrelationStrength::VeryStrong);
        assert_eq!(r.interpretation, "positive very strong correlation");
        assert_eq!(r.effect_size_label, EffectSizeLabel::Large);

        let neg: Vec<f64> = x.iter().map(|v| -v).collect();
        let r = pearson(&x, &neg).unwrap();
        assert!((r.coefficient + 1.0).abs() < 1e-12);
        assert_eq!(r.direction, CorrelationDirection::Negative);
        assert_eq!(r.interpretation, "negative very strong correlation");
    }

    #[test]
    fn test_pearson_known_value() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 1.0, 4.0, 3.0, 5.0];
        let r = pearson(&x, &y).unwrap();
        // Sxy = 8, Sxx = Syy = 10
        assert!((r.coefficient - 0.8).abs() < 1e-12);
        let t = 0.8 * (3.0 / 0.36_f64).sqrt();
        assert!((r.p_value - 2.0 * special::t_distribution_sf(t, 3.0)).abs() < 1e-12);
        let [lo, hi] = r.confidence_interval;
        assert!(lo < 0.8 && 0.8 < hi);
        assert!((lo.atanh() + hi.atanh() - 2.0 * 0.8_f64.atanh()).abs() < 1e-9);
        assert!((r.effect_size - 0.64).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_n3_interval_is_full_range() {
        let r = pearson(&[1.0, 2.0, 3.0], &[1.0, 3.0, 2.0]).unwrap();
        assert_eq!(r.confidence_interval, [-1.0, 1.0]);
    }

    #[test]
    fn test_pearson_errors() {
        assert!(matches!(
            pearson(&[1.0, 2.0], &[1.0, 2.0]),
            Err(StatsError::InsufficientData { .. })
        ));
        assert!(matches!(
            pearson(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 4.0]),
            Err(StatsError::MismatchedLength { .. })
        ));
        assert!(matches!(
            pearson(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]),
            Err(StatsError::DegenerateComputation(_))
        ));
    }

    #[test]
    fn test_spearman_monotone_nonlinear() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y: Vec<f64> = x.iter().map(|v: &f64| v.powi(3)).collect();
        let r = spearman(&x, &y).unwrap();
        assert!((r.coefficient - 1.0).abs() < 1e-12);
        assert_eq!(r.method, CorrelationMethod::Spearman);
    }

    #[test]
    fn test_spearman_with_ties() {
        let x = [1.0, 2.0, 2.0, 3.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        let r = spearman(&x, &y).unwrap();
        // ranks x: 1, 2.5, 2.5, 4
        let expected = 4.5 / (4.5_f64 * 5.0).sqrt();
        assert!((r.coefficient - expected).abs() < 1e-12);
    }

    #[test]
    fn test_kendall_exact() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let r = kendall(&x, &x).unwrap();
        assert!((r.coefficient - 1.0).abs() < 1e-12);
        // one of 120 permutations has no inversions
        assert!((r.p_value - 2.0 / 120.0).abs() < 1e-12);
        assert!(r.confidence_interval[1] <= 1.0);

        let y = [2.0, 1.0, 4.0, 3.0, 5.0];
        let r = kendall(&x, &y).unwrap();
        // 8 concordant, 2 discordant
        assert!((r.coefficient - 0.6).abs() < 1e-12);
        // P(inversions ≤ 2) for n = 5: (1 + 4 + 9)/120
        assert!((r.p_value - 28.0 / 120.0).abs() < 1e-12);
    }

    #[test]
    fn test_kendall_tau_b_with_ties() {
        let x = [1.0, 2.0, 2.0, 3.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        let r = kendall(&x, &y).unwrap();
        // C = 5, D = 0, n0 = 6, n1 = 1, n2 = 0
        assert!((r.coefficient - 5.0 / 30.0_f64.sqrt()).abs() < 1e-12);
        assert!(r.p_value > 0.0 && r.p_value < 1.0);
    }

    #[test]
    fn test_inversion_distribution_tails() {
        for n in [3usize, 7, 20, 33] {
            let n_factorial: f64 = (1..=n).map(|v| v as f64).product();
            assert!((kendall_exact_p(n, 0) - 2.0 / n_factorial).abs() < 1e-12);
            // the lower half holds at least half the mass
            let half = n * (n - 1) / 4;
            assert!((kendall_exact_p(n, half) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_correlation_matrix() {
        let cols = vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![2.0, 4.0, 6.0, 8.0],
            vec![4.0, 3.0, 2.0, 1.0],
        ];
        let m = correlation_matrix(&cols, &["a", "b", "c"]).unwrap();
        assert_eq!(m.columns, vec!["a", "b", "c"]);
        for i in 0..3 {
            assert_eq!(m.coefficients[i][i], 1.0);
            assert_eq!(m.p_values[i][i], 0.0);
            for j in 0..3 {
                assert_eq!(m.coefficients[i][j], m.coefficients[j][i]);
            }
        }
        assert!((m.coefficients[0][1] - 1.0).abs() < 1e-12);
        assert!((m.coefficients[0][2] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_matrix_errors() {
        let one = vec![vec![1.0, 2.0, 3.0]];
        assert!(correlation_matrix(&one, &["a"]).is_err());
        let ragged = vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0, 3.0, 4.0]];
        assert!(matches!(
            correlation_matrix(&ragged, &["a", "b"]),
            Err(StatsError::MismatchedLength { .. })
        ));
        let ok = vec![vec![1.0, 2.0, 3.0], vec![3.0, 1.0, 2.0]];
        assert!(matches!(
            correlation_matrix(&ok, &["a"]),
            Err(StatsError::MismatchedLength { .. })
        ));
    }
}
