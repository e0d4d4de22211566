//! Numerically stable sample statistics.
//!
//! Low-level building blocks shared by every engine. Functions return
//! `Option` and reject NaN/Inf themselves; engines translate `None` into a
//! typed error at their boundary.
//!
//! # Algorithms
//!
//! - **Mean**: Neumaier compensated summation for O(ε) error independent of n.
//! - **Variance/StdDev**: Welford's online algorithm.
//!   Reference: Welford (1962), "Note on a Method for Calculating
//!   Corrected Sums of Squares and Products", *Technometrics* 4(3).
//! - **Quantile**: R-7 linear interpolation (default in R, NumPy, Excel).
//!   Reference: Hyndman & Fan (1996), "Sample Quantiles in Statistical
//!   Packages", *The American Statistician* 50(4).
//! - **Ranks**: mid-ranks for tied values, as required by every rank test.

/// Computes the arithmetic mean using Neumaier compensated summation.
///
/// # Returns
/// - `None` if `data` is empty or contains any NaN/Inf.
///
/// # Examples
/// ```
/// use u_statengine::stats::mean;
/// let v = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert!((mean(&v).unwrap() - 3.0).abs() < 1e-15);
/// ```
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(kahan_sum(data) / data.len() as f64)
}

/// Computes the sample variance (denominator `n − 1`) with Welford's algorithm.
///
/// Reference: Welford (1962), *Technometrics* 4(3), pp. 419–420.
///
/// # Returns
/// - `None` if `data.len() < 2` or contains NaN/Inf.
///
/// # Examples
/// ```
/// use u_statengine::stats::variance;
/// let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
/// assert!((variance(&v).unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
pub fn variance(data: &[f64]) -> Option<f64> {
    if data.len() < 2 || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    WelfordAccumulator::from_slice(data).sample_variance()
}

/// Computes the sample standard deviation, `sqrt(variance(data))`.
pub fn std_dev(data: &[f64]) -> Option<f64> {
    variance(data).map(f64::sqrt)
}

/// Sum of squared deviations from the mean, `Σ(xᵢ − x̄)²`.
///
/// Returns `None` for empty or non-finite input.
pub fn sum_squared_deviations(data: &[f64]) -> Option<f64> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    let m = kahan_sum(data) / data.len() as f64;
    Some(data.iter().map(|&x| (x - m) * (x - m)).sum())
}

/// Returns the minimum value in the slice, or `None` if empty or NaN is present.
pub fn min(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.iter().copied().try_fold(f64::INFINITY, |acc, x| {
        if x.is_nan() {
            None
        } else {
            Some(acc.min(x))
        }
    })
}

/// Returns the maximum value in the slice, or `None` if empty or NaN is present.
pub fn max(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    data.iter().copied().try_fold(f64::NEG_INFINITY, |acc, x| {
        if x.is_nan() {
            None
        } else {
            Some(acc.max(x))
        }
    })
}

/// Returns an ascending copy of `data`.
///
/// NaN values sort last under [`f64::total_cmp`]; callers validate
/// finiteness before relying on the order.
pub fn sorted_copy(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    sorted
}

/// Computes the median of `data` without mutating the input.
///
/// # Examples
/// ```
/// use u_statengine::stats::median;
/// assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
pub fn median(data: &[f64]) -> Option<f64> {
    if data.is_empty() || data.iter().any(|x| x.is_nan()) {
        return None;
    }
    quantile_sorted(&sorted_copy(data), 0.5)
}

/// Computes the `p`-th quantile using the R-7 linear interpolation method.
///
/// # Returns
/// - `None` if `data` is empty, `p` is outside `[0, 1]`, or data contains NaN.
///
/// # Examples
/// ```
/// use u_statengine::stats::quantile;
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(quantile(&data, 0.0), Some(1.0));
/// assert_eq!(quantile(&data, 0.5), Some(3.0));
/// ```
pub fn quantile(data: &[f64], p: f64) -> Option<f64> {
    if data.is_empty() || !(0.0..=1.0).contains(&p) || data.iter().any(|x| x.is_nan()) {
        return None;
    }
    quantile_sorted(&sorted_copy(data), p)
}

/// Computes the `p`-th quantile on **pre-sorted** data (R-7 method).
///
/// # Algorithm
/// For sorted data `x[0..n]` and `p ∈ [0, 1]`:
/// 1. `h = (n − 1) × p`
/// 2. `j = ⌊h⌋`, `g = h − j`
/// 3. return `(1 − g) × x[j] + g × x[j+1]`
///
/// Reference: Hyndman & Fan (1996), *The American Statistician* 50(4), pp. 361–365.
pub fn quantile_sorted(sorted_data: &[f64], p: f64) -> Option<f64> {
    let n = sorted_data.len();
    if n == 0 || !(0.0..=1.0).contains(&p) {
        return None;
    }
    if n == 1 {
        return Some(sorted_data[0]);
    }

    let h = (n - 1) as f64 * p;
    let j = h.floor() as usize;
    let g = h - h.floor();

    if j + 1 >= n {
        Some(sorted_data[n - 1])
    } else {
        Some((1.0 - g) * sorted_data[j] + g * sorted_data[j + 1])
    }
}

/// Biased sample skewness `g₁ = m₃ / m₂^{3/2}`.
///
/// `m₂`, `m₃` are the population (denominator n) central moments. This is
/// the moment estimator reported by `scipy.stats.skew` with default
/// arguments.
///
/// # Returns
/// - `None` if `data.len() < 3`, data contains NaN/Inf, or variance is zero.
///
/// # Examples
/// ```
/// use u_statengine::stats::skewness;
/// assert!(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap().abs() < 1e-14);
/// assert!(skewness(&[1.0, 2.0, 3.0, 4.0, 50.0]).unwrap() > 0.0);
/// ```
pub fn skewness(data: &[f64]) -> Option<f64> {
    if data.len() < 3 || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    WelfordAccumulator::from_slice(data).skewness()
}

/// Biased excess kurtosis `g₂ = m₄ / m₂² − 3`.
///
/// Zero for a normal distribution, positive for heavy tails, negative for
/// light tails.
///
/// # Returns
/// - `None` if `data.len() < 4`, data contains NaN/Inf, or variance is zero.
pub fn kurtosis(data: &[f64]) -> Option<f64> {
    if data.len() < 4 || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    WelfordAccumulator::from_slice(data).kurtosis()
}

/// Computes the sample covariance `Σ(xᵢ − x̄)(yᵢ − ȳ) / (n − 1)`.
///
/// # Returns
/// - `None` if `x.len() != y.len()`, `n < 2`, or data contains NaN/Inf.
///
/// # Examples
/// ```
/// use u_statengine::stats::covariance;
/// let cov = covariance(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0]).unwrap();
/// assert!((cov - 5.0).abs() < 1e-14);
/// ```
pub fn covariance(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n != y.len() || n < 2 || !x.iter().chain(y.iter()).all(|v| v.is_finite()) {
        return None;
    }
    let nf = n as f64;
    let mean_x = kahan_sum(x) / nf;
    let mean_y = kahan_sum(y) / nf;
    let sum: f64 = x
        .iter()
        .zip(y)
        .map(|(&a, &b)| (a - mean_x) * (b - mean_y))
        .sum();
    Some(sum / (nf - 1.0))
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// Assigns 1-based ranks, giving tied values the average of the ranks they span.
///
/// # Examples
/// ```
/// use u_statengine::stats::average_ranks;
/// assert_eq!(average_ranks(&[10.0, 20.0, 20.0, 30.0]), vec![1.0, 2.5, 2.5, 4.0]);
/// ```
pub fn average_ranks(data: &[f64]) -> Vec<f64> {
    let n = data.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| data[a].total_cmp(&data[b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && data[order[j]] == data[order[i]] {
            j += 1;
        }
        // positions i..j share ranks i+1..=j
        let avg = (i + 1 + j) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = avg;
        }
        i = j;
    }
    ranks
}

/// Sizes of the groups of equal values (groups of size 1 included).
pub fn tie_group_sizes(data: &[f64]) -> Vec<usize> {
    let sorted = sorted_copy(data);
    let mut sizes = Vec::new();
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i + 1;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        sizes.push(j - i);
        i = j;
    }
    sizes
}

/// Tie correction term `Σ (t³ − t)` over tie groups of size `t`.
pub fn tie_correction(data: &[f64]) -> f64 {
    tie_group_sizes(data)
        .into_iter()
        .filter(|&t| t > 1)
        .map(|t| {
            let t = t as f64;
            t * t * t - t
        })
        .sum()
}

// ---------------------------------------------------------------------------
// Compensated summation
// ---------------------------------------------------------------------------

/// Neumaier compensated summation for O(ε) error independent of `n`.
///
/// An improved Kahan summation that also handles the case where the
/// addend is larger in magnitude than the running sum.
///
/// Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
/// zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.
pub fn kahan_sum(data: &[f64]) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for &x in data {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

// ---------------------------------------------------------------------------
// Welford online accumulator
// ---------------------------------------------------------------------------

/// Streaming accumulator for mean, variance, skewness and kurtosis.
///
/// # Algorithm
/// Maintains central moment sums M₂, M₃, M₄ incrementally. The update
/// order (M₄ → M₃ → M₂) uses the *previous* values of lower moments.
///
/// References:
/// - Welford (1962), *Technometrics* 4(3), pp. 419–420.
/// - Pébay (2008), "Formulas for Robust, One-Pass Parallel Computation
///   of Covariances and Arbitrary-Order Statistical Moments",
///   Sandia Report SAND2008-6212.
///
/// # Examples
/// ```
/// use u_statengine::stats::WelfordAccumulator;
/// let acc = WelfordAccumulator::from_slice(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
/// assert!((acc.mean().unwrap() - 5.0).abs() < 1e-15);
/// assert!((acc.sample_variance().unwrap() - 4.571428571428571).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct WelfordAccumulator {
    count: u64,
    mean_acc: f64,
    m2: f64,
    m3: f64,
    m4: f64,
}

impl WelfordAccumulator {
    /// Creates a new empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an accumulator over every value of `data`.
    pub fn from_slice(data: &[f64]) -> Self {
        let mut acc = Self::new();
        for &x in data {
            acc.update(x);
        }
        acc
    }

    /// Feeds a new sample into the accumulator.
    pub fn update(&mut self, value: f64) {
        let n1 = self.count;
        self.count += 1;

        if n1 == 0 {
            // avoids delta² overflow for huge first values
            self.mean_acc = value;
            return;
        }

        let n = self.count as f64;
        let delta = value - self.mean_acc;
        let delta_n = delta / n;
        let delta_n2 = delta_n * delta_n;
        let term1 = delta * delta_n * n1 as f64;

        self.m4 += term1 * delta_n2 * (n * n - 3.0 * n + 3.0) + 6.0 * delta_n2 * self.m2
            - 4.0 * delta_n * self.m3;
        self.m3 += term1 * delta_n * (n - 2.0) - 3.0 * delta_n * self.m2;
        self.m2 += term1;
        self.mean_acc += delta_n;
    }

    /// Number of samples seen so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Running mean, or `None` if no samples have been added.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean_acc)
    }

    /// Sample variance (n − 1 denominator), or `None` below 2 samples.
    pub fn sample_variance(&self) -> Option<f64> {
        (self.count >= 2).then(|| self.m2 / (self.count - 1) as f64)
    }

    /// Biased skewness g₁, or `None` below 3 samples or for zero variance.
    pub fn skewness(&self) -> Option<f64> {
        if self.count < 3 || self.m2 == 0.0 {
            return None;
        }
        let n = self.count as f64;
        Some(n.sqrt() * self.m3 / self.m2.powf(1.5))
    }

    /// Biased excess kurtosis g₂, or `None` below 4 samples or for zero variance.
    pub fn kurtosis(&self) -> Option<f64> {
        if self.count < 4 || self.m2 == 0.0 {
            return None;
        }
        let n = self.count as f64;
        Some(n * self.m4 / (self.m2 * self.m2) - 3.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- mean / variance ---

    #[test]
    fn test_mean_basic() {
        assert_eq!(mean(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(3.0));
        assert_eq!(mean(&[42.0]), Some(42.0));
    }

    #[test]
    fn test_mean_rejects_empty_and_non_finite() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, f64::NAN, 3.0]), None);
        assert_eq!(mean(&[1.0, f64::INFINITY, 3.0]), None);
    }

    #[test]
    fn test_variance_basic() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((variance(&v).unwrap() - 4.571428571428571).abs() < 1e-10);
        assert!((std_dev(&v).unwrap() - 4.571428571428571_f64.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn test_variance_too_short() {
        assert_eq!(variance(&[1.0]), None);
        assert_eq!(variance(&[]), None);
    }

    #[test]
    fn test_variance_large_offset() {
        let data: Vec<f64> = (1..=5).map(|i| 1e9 + i as f64).collect();
        let var = variance(&data).unwrap();
        assert!((var - 2.5).abs() < 1e-5, "got {var}");
    }

    #[test]
    fn test_sum_squared_deviations() {
        let ss = sum_squared_deviations(&[1.0, 2.0, 3.0]).unwrap();
        assert!((ss - 2.0).abs() < 1e-15);
    }

    // --- order statistics ---

    #[test]
    fn test_min_max() {
        let v = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        assert_eq!(min(&v), Some(1.0));
        assert_eq!(max(&v), Some(9.0));
        assert_eq!(min(&[1.0, f64::NAN]), None);
        assert_eq!(max(&[]), None);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[7.0]), Some(7.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn test_quantile_interpolation() {
        // h = 0.75, j = 0, g = 0.75 → 0.25·1 + 0.75·2
        let q = quantile(&[1.0, 2.0, 3.0, 4.0], 0.25).unwrap();
        assert!((q - 1.75).abs() < 1e-15);
    }

    #[test]
    fn test_quantile_invalid_p() {
        assert_eq!(quantile(&[1.0, 2.0], -0.1), None);
        assert_eq!(quantile(&[1.0, 2.0], 1.1), None);
        assert_eq!(quantile(&[], 0.5), None);
    }

    // --- moments ---

    #[test]
    fn test_skewness_known_value() {
        // [1,2,3,4,8]: m2 = 5.84, m3 = 12.672 → g1 = 12.672 / 5.84^1.5
        let s = skewness(&[1.0, 2.0, 3.0, 4.0, 8.0]).unwrap();
        let expected = 12.672 / 5.84_f64.powf(1.5);
        assert!((s - expected).abs() < 1e-12, "got {s}, expected {expected}");
    }

    #[test]
    fn test_skewness_sign() {
        assert!(skewness(&[-50.0, 1.0, 2.0, 3.0, 4.0]).unwrap() < 0.0);
        assert_eq!(skewness(&[5.0, 5.0, 5.0]), None);
        assert_eq!(skewness(&[1.0, 2.0]), None);
    }

    #[test]
    fn test_kurtosis_known_value() {
        // 1..=10: m2 = 8.25, m4 = 120.8625 → g2 = 120.8625/68.0625 − 3
        let k = kurtosis(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]).unwrap();
        assert!((k - (120.8625 / 68.0625 - 3.0)).abs() < 1e-12, "got {k}");
    }

    #[test]
    fn test_kurtosis_heavy_tails() {
        let data = [0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 100.0];
        assert!(kurtosis(&data).unwrap() > 0.0);
        assert_eq!(kurtosis(&[5.0, 5.0, 5.0, 5.0]), None);
    }

    #[test]
    fn test_covariance() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [10.0, 8.0, 6.0, 4.0, 2.0];
        assert!((covariance(&x, &y).unwrap() + 5.0).abs() < 1e-14);
        assert_eq!(covariance(&[1.0, 2.0], &[1.0]), None);
    }

    // --- ranks ---

    #[test]
    fn test_average_ranks_no_ties() {
        assert_eq!(average_ranks(&[3.0, 1.0, 2.0]), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_average_ranks_with_ties() {
        let r = average_ranks(&[5.0, 1.0, 5.0, 5.0, 2.0]);
        assert_eq!(r, vec![4.0, 1.0, 4.0, 4.0, 2.0]);
    }

    #[test]
    fn test_tie_helpers() {
        let data = [1.0, 2.0, 2.0, 3.0, 3.0, 3.0];
        assert_eq!(tie_group_sizes(&data), vec![1, 2, 3]);
        // (8 − 2) + (27 − 3)
        assert_eq!(tie_correction(&data), 30.0);
    }

    // --- compensated summation ---

    #[test]
    fn test_kahan_sum_precision() {
        let result = kahan_sum(&[1e16, 1.0, -1e16]);
        assert!((result - 1.0).abs() < 1e-10, "got {result}");
    }

    #[test]
    fn test_welford_matches_batch() {
        let data = [1.0, 2.0, 3.0, 4.0, 50.0];
        let acc = WelfordAccumulator::from_slice(&data);
        assert_eq!(acc.count(), 5);
        assert!((acc.mean().unwrap() - mean(&data).unwrap()).abs() < 1e-14);

        let m = 12.0;
        let m2: f64 = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / 5.0;
        let m3: f64 = data.iter().map(|x| (x - m).powi(3)).sum::<f64>() / 5.0;
        let direct = m3 / m2.powf(1.5);
        assert!((acc.skewness().unwrap() - direct).abs() < 1e-10);
    }

    #[test]
    fn test_welford_empty() {
        let acc = WelfordAccumulator::new();
        assert_eq!(acc.mean(), None);
        assert_eq!(acc.sample_variance(), None);
        assert_eq!(acc.skewness(), None);
    }
}
