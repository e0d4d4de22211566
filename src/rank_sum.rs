//! Wilcoxon rank-sum (Mann–Whitney U) statistic and its null distribution.
//!
//! Ranks the pooled samples with averaged ties and derives U, its
//! tie-corrected normal moments and p-values under any alternative.
//!
//! Reference: Mann & Whitney (1947), "On a test of whether one of two
//! random variables is stochastically larger than the other",
//! *Annals of Mathematical Statistics* 18(1), 50–60.

use crate::config::Alternative;
use crate::error::{check_sample, StatsError, StatsResult};
use crate::special;
use crate::stats;

/// Largest per-sample size for the exact U distribution.
pub const EXACT_MAX: usize = 8;

/// Rank sums and U statistics of two independent samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UStatistic {
    pub n1: usize,
    pub n2: usize,
    pub rank_sum_1: f64,
    pub rank_sum_2: f64,
    /// Pairs in which the first sample wins, ties counting one half.
    pub u1: f64,
    pub u2: f64,
    /// Tie-corrected standard deviation of U under H₀.
    pub sigma: f64,
    /// Whether the pooled sample has tied values.
    pub has_ties: bool,
}

/// Ranks both samples together and computes U₁ = R₁ − n₁(n₁+1)/2.
///
/// # Errors
/// - `InsufficientData` if either sample is empty.
/// - `NonFinite` for NaN or ±∞.
/// - `DegenerateComputation` if every value is identical.
///
/// # Examples
/// ```
/// use u_statengine::rank_sum::u_statistic;
///
/// let u = u_statistic(&[4.0, 5.0, 6.0], &[1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(u.u1, 9.0);
/// assert_eq!(u.u2, 0.0);
/// ```
pub fn u_statistic(sample1: &[f64], sample2: &[f64]) -> StatsResult<UStatistic> {
    check_sample("rank-sum sample1", sample1, 1)?;
    check_sample("rank-sum sample2", sample2, 1)?;

    let (n1, n2) = (sample1.len(), sample2.len());
    let combined: Vec<f64> = sample1.iter().chain(sample2).copied().collect();
    let ranks = stats::average_ranks(&combined);
    let rank_sum_1: f64 = ranks[..n1].iter().sum();
    let rank_sum_2: f64 = ranks[n1..].iter().sum();

    let (n1f, n2f) = (n1 as f64, n2 as f64);
    let n = n1f + n2f;
    let u1 = rank_sum_1 - n1f * (n1f + 1.0) / 2.0;

    let ties = stats::tie_correction(&combined);
    let var = if n > 1.0 {
        n1f * n2f / 12.0 * ((n + 1.0) - ties / (n * (n - 1.0)))
    } else {
        0.0
    };
    if var <= 0.0 {
        return Err(StatsError::degenerate(
            "rank-sum statistic is undefined when every value is identical",
        ));
    }

    Ok(UStatistic {
        n1,
        n2,
        rank_sum_1,
        rank_sum_2,
        u1,
        u2: n1f * n2f - u1,
        sigma: var.sqrt(),
        has_ties: ties > 0.0,
    })
}

impl UStatistic {
    /// Null mean n₁n₂/2.
    pub fn mean(&self) -> f64 {
        self.n1 as f64 * self.n2 as f64 / 2.0
    }

    /// Standardized U₁, without continuity correction.
    pub fn z_score(&self) -> f64 {
        (self.u1 - self.mean()) / self.sigma
    }

    /// Whether [`p_value`](Self::p_value) comes from the exact distribution.
    pub fn is_exact(&self) -> bool {
        self.n1 <= EXACT_MAX && self.n2 <= EXACT_MAX && !self.has_ties
    }

    /// p-value for `alternative`; `Greater` means sample 1 tends larger.
    ///
    /// Exact for small tie-free samples, otherwise normal with a 0.5
    /// continuity correction.
    pub fn p_value(&self, alternative: Alternative) -> f64 {
        let p = if self.is_exact() {
            let table = UDistribution::new(self.n1, self.n2);
            match alternative {
                Alternative::TwoSided => 2.0 * table.sf(self.u1.max(self.u2)),
                Alternative::Greater => table.sf(self.u1),
                Alternative::Less => table.sf(self.u2),
            }
        } else {
            let mu = self.mean();
            let tail = |u: f64| special::standard_normal_sf((u - mu - 0.5) / self.sigma);
            match alternative {
                Alternative::TwoSided => 2.0 * tail(self.u1.max(self.u2)),
                Alternative::Greater => tail(self.u1),
                Alternative::Less => tail(self.u2),
            }
        };
        p.clamp(0.0, 1.0)
    }
}

/// Null distribution of U for tie-free samples of sizes `n1` and `n2`.
struct UDistribution {
    counts: Vec<f64>,
    total: f64,
}

impl UDistribution {
    /// Builds the frequency table by the recurrence
    /// `f(i, j; u) = f(i−1, j; u−j) + f(i, j−1; u)`: the largest of the
    /// `i + j` values either belongs to sample 1 (beating all `j` values of
    /// sample 2) or to sample 2.
    fn new(n1: usize, n2: usize) -> Self {
        // freq[i][j] has length i·j + 1
        let mut freq: Vec<Vec<Vec<f64>>> = vec![vec![Vec::new(); n2 + 1]; n1 + 1];
        for i in 0..=n1 {
            for j in 0..=n2 {
                freq[i][j] = if i == 0 || j == 0 {
                    vec![1.0]
                } else {
                    let mut row = vec![0.0; i * j + 1];
                    for (u, &c) in freq[i - 1][j].iter().enumerate() {
                        row[u + j] += c;
                    }
                    for (u, &c) in freq[i][j - 1].iter().enumerate() {
                        row[u] += c;
                    }
                    row
                };
            }
        }
        let counts = std::mem::take(&mut freq[n1][n2]);
        let total = counts.iter().sum();
        Self { counts, total }
    }

    /// P(U ≥ u).
    fn sf(&self, u: f64) -> f64 {
        let start = u.ceil().max(0.0) as usize;
        if start >= self.counts.len() {
            return 0.0;
        }
        self.counts[start..].iter().sum::<f64>() / self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u_distribution_is_symmetric_and_normalised() {
        let d = UDistribution::new(4, 5);
        assert_eq!(d.counts.len(), 21);
        assert_eq!(d.total, 126.0);
        for u in 0..=20 {
            assert_eq!(d.counts[u], d.counts[20 - u]);
        }
        assert!((d.sf(0.0) - 1.0).abs() < 1e-15);
        assert_eq!(d.sf(21.0), 0.0);
    }

    #[test]
    fn test_u_statistic_moments() {
        let u = u_statistic(&[1.0, 3.0, 5.0], &[2.0, 4.0, 6.0, 8.0]).unwrap();
        // ranks 1, 3, 5 | 2, 4, 6, 7
        assert_eq!((u.rank_sum_1, u.rank_sum_2), (9.0, 19.0));
        assert_eq!((u.u1, u.u2), (3.0, 9.0));
        assert_eq!(u.mean(), 6.0);
        assert!((u.sigma - (12.0 * 8.0 / 12.0_f64).sqrt()).abs() < 1e-12);
        assert!(u.is_exact());
        assert!(!u.has_ties);
    }

    #[test]
    fn test_p_value_symmetric_in_argument_order() {
        let a = [1.2, 3.4, 2.2, 5.0, 4.1];
        let b = [2.5, 6.1, 7.3, 3.9];
        let ab = u_statistic(&a, &b).unwrap();
        let ba = u_statistic(&b, &a).unwrap();
        assert_eq!(ab.u1, ba.u2);
        assert!((ab.p_value(Alternative::TwoSided) - ba.p_value(Alternative::TwoSided)).abs() < 1e-15);
        assert!((ab.p_value(Alternative::Less) - ba.p_value(Alternative::Greater)).abs() < 1e-15);
    }

    #[test]
    fn test_ties_force_normal_approximation() {
        let u = u_statistic(&[1.0, 2.0, 2.0], &[2.0, 3.0, 4.0]).unwrap();
        assert!(u.has_ties);
        assert!(!u.is_exact());
        assert!(matches!(
            u_statistic(&[1.0, 1.0], &[1.0]),
            Err(StatsError::DegenerateComputation(_))
        ));
    }
}
