//! Descriptive engine: central tendency, dispersion, shape and percentiles.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::{DEFAULT_ALPHA, DEFAULT_PERCENTILES};
use crate::error::{check_sample, StatsResult};
use crate::normality;
use crate::stats;

/// Location and spread of a sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicStats {
    pub mean: f64,
    pub median: f64,
    /// Every value tied for the highest frequency, ascending; empty when
    /// all values are distinct.
    pub mode: Vec<f64>,
    /// Sample standard deviation (n − 1); 0 for a single value.
    pub std: f64,
    /// Sample variance (n − 1); 0 for a single value.
    pub variance: f64,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub count: usize,
}

/// Shape of a sample with a Shapiro–Wilk normality verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionStats {
    /// Biased skewness g₁.
    pub skewness: f64,
    /// Biased excess kurtosis g₂.
    pub kurtosis: f64,
    pub normality_statistic: f64,
    pub normality_p_value: f64,
    /// `normality_p_value > 0.05`.
    pub is_normal: bool,
}

/// One requested percentile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Percentile {
    /// In `[0, 100]`.
    pub percentile: f64,
    pub value: f64,
}

/// Requested percentiles and the quartile summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PercentileStats {
    /// Accepted percentiles in request order.
    pub percentiles: Vec<Percentile>,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub iqr: f64,
}

/// Location and spread summary.
///
/// # Errors
/// `InsufficientData` for an empty sample, `NonFinite` for NaN or ±∞.
///
/// # Examples
/// ```
/// use u_statengine::descriptive::basic_stats;
///
/// let s = basic_stats(&[2.0, 4.0, 4.0, 5.0]).unwrap();
/// assert_eq!(s.median, 4.0);
/// assert_eq!(s.mode, vec![4.0]);
/// assert_eq!(s.range, 3.0);
/// ```
#[instrument(level = "debug", skip_all, fields(n = sample.len()))]
pub fn basic_stats(sample: &[f64]) -> StatsResult<BasicStats> {
    check_sample("basic stats", sample, 1)?;
    let sorted = stats::sorted_copy(sample);
    let count = sorted.len();
    let min = sorted[0];
    let max = sorted[count - 1];
    let variance = if count >= 2 {
        stats::variance(sample).unwrap_or(0.0)
    } else {
        0.0
    };

    let result = BasicStats {
        mean: stats::mean(sample).unwrap_or(min),
        median: stats::quantile_sorted(&sorted, 0.5).unwrap_or(min),
        mode: modes(&sorted),
        std: variance.sqrt(),
        variance,
        min,
        max,
        range: max - min,
        count,
    };
    debug!(mean = result.mean, std = result.std, "basic stats complete");
    Ok(result)
}

/// Most frequent values of sorted data; empty when every value is unique.
fn modes(sorted: &[f64]) -> Vec<f64> {
    let mut runs: Vec<(f64, usize)> = Vec::new();
    for &x in sorted {
        match runs.last_mut() {
            Some((v, c)) if *v == x => *c += 1,
            _ => runs.push((x, 1)),
        }
    }
    let top = runs.iter().map(|&(_, c)| c).max().unwrap_or(0);
    if top <= 1 {
        return Vec::new();
    }
    runs.into_iter().filter(|&(_, c)| c == top).map(|(v, _)| v).collect()
}

/// Skewness, excess kurtosis and a Shapiro–Wilk normality verdict.
///
/// Shapiro–Wilk runs at every sample size; above 5000 values its
/// p-value comes from the extrapolated Royston approximation.
///
/// # Errors
/// - `InsufficientData` for fewer than 3 values.
/// - `DegenerateComputation` if every value is identical.
#[instrument(level = "debug", skip_all, fields(n = sample.len()))]
pub fn distribution_stats(sample: &[f64]) -> StatsResult<DistributionStats> {
    check_sample("distribution stats", sample, 3)?;
    let sw = normality::shapiro_wilk(sample)?;
    Ok(DistributionStats {
        skewness: stats::skewness(sample).unwrap_or(0.0),
        kurtosis: stats::kurtosis(sample).unwrap_or(0.0),
        normality_statistic: sw.w,
        normality_p_value: sw.p_value,
        is_normal: sw.p_value > DEFAULT_ALPHA,
    })
}

/// Percentiles by linear interpolation between order statistics.
///
/// Requested values outside `[0, 100]` (or NaN) are skipped. An empty
/// request reports the 25th, 50th and 75th percentiles.
///
/// # Errors
/// `InsufficientData` for an empty sample, `NonFinite` for NaN or ±∞.
#[instrument(level = "debug", skip_all, fields(n = sample.len(), requested = requested.len()))]
pub fn percentiles(sample: &[f64], requested: &[f64]) -> StatsResult<PercentileStats> {
    check_sample("percentiles", sample, 1)?;
    let sorted = stats::sorted_copy(sample);
    let at = |p: f64| stats::quantile_sorted(&sorted, p / 100.0).unwrap_or(sorted[0]);

    let requested = if requested.is_empty() {
        &DEFAULT_PERCENTILES[..]
    } else {
        requested
    };
    let percentiles = requested
        .iter()
        .filter(|p| (0.0..=100.0).contains(*p))
        .map(|&p| Percentile {
            percentile: p,
            value: at(p),
        })
        .collect();

    let (q1, q2, q3) = (at(25.0), at(50.0), at(75.0));
    Ok(PercentileStats {
        percentiles,
        q1,
        q2,
        q3,
        iqr: q3 - q1,
    })
}
