//! Reference distributions for goodness-of-fit testing.
//!
//! Each type carries validated parameters and CDF evaluation.
//! [`FittedDistribution`] estimates parameters from a sample and exposes
//! the named parameter map reported to callers.
//!
//! # Supported Distributions
//!
//! | Distribution | Parameters | Mean | Variance |
//! |---|---|---|---|
//! | [`Normal`] | μ, σ | μ | σ² |
//! | [`Uniform`] | min, max | (a+b)/2 | (b−a)²/12 |
//! | [`Exponential`] | λ | 1/λ | 1/λ² |

use std::collections::BTreeMap;

use crate::config::DistributionKind;
use crate::error::{StatsError, StatsResult};
use crate::special;
use crate::stats;

// ============================================================================
// Normal Distribution
// ============================================================================

/// Normal distribution N(μ, σ²).
///
/// - CDF: Φ((x−μ)/σ)
#[derive(Debug, Clone, PartialEq)]
pub struct Normal {
    mu: f64,
    sigma: f64,
}

impl Normal {
    /// Creates a new normal distribution N(μ, σ).
    ///
    /// # Errors
    /// `InvalidInput` if `sigma ≤ 0` or parameters are not finite.
    pub fn new(mu: f64, sigma: f64) -> StatsResult<Self> {
        if !mu.is_finite() || !sigma.is_finite() || sigma <= 0.0 {
            return Err(StatsError::InvalidInput(format!(
                "normal distribution requires finite μ and σ > 0, got μ={mu}, σ={sigma}"
            )));
        }
        Ok(Self { mu, sigma })
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn variance(&self) -> f64 {
        self.sigma * self.sigma
    }

    pub fn cdf(&self, x: f64) -> f64 {
        special::standard_normal_cdf((x - self.mu) / self.sigma)
    }
}

// ============================================================================
// Uniform Distribution
// ============================================================================

/// Continuous uniform distribution on `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform {
    min: f64,
    max: f64,
}

impl Uniform {
    /// Creates a new uniform distribution on `[min, max]`.
    ///
    /// # Errors
    /// `InvalidInput` if `min >= max` or either bound is not finite.
    pub fn new(min: f64, max: f64) -> StatsResult<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return Err(StatsError::InvalidInput(format!(
                "uniform distribution requires min < max, got min={min}, max={max}"
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// CDF: (x−min)/(max−min), clamped to [0, 1].
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= self.min {
            0.0
        } else if x >= self.max {
            1.0
        } else {
            (x - self.min) / (self.max - self.min)
        }
    }
}

// ============================================================================
// Exponential Distribution
// ============================================================================

/// Exponential distribution with rate λ on `[0, ∞)`.
///
/// - CDF: F(x) = 1 − exp(−λx)
/// - Scale: 1/λ
#[derive(Debug, Clone, PartialEq)]
pub struct Exponential {
    rate: f64,
}

impl Exponential {
    /// Creates an exponential distribution with rate `λ > 0`.
    ///
    /// # Errors
    /// `InvalidInput` if `rate ≤ 0` or is not finite.
    pub fn new(rate: f64) -> StatsResult<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(StatsError::InvalidInput(format!(
                "exponential distribution requires rate > 0, got {rate}"
            )));
        }
        Ok(Self { rate })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Scale parameter 1/λ.
    pub fn scale(&self) -> f64 {
        1.0 / self.rate
    }

    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            -(-self.rate * x).exp_m1()
        }
    }
}

// ============================================================================
// Fitting
// ============================================================================

/// A reference distribution with parameters estimated from a sample.
#[derive(Debug, Clone, PartialEq)]
pub enum FittedDistribution {
    Normal(Normal),
    Uniform(Uniform),
    Exponential(Exponential),
}

impl FittedDistribution {
    /// Estimates the parameters of `kind` from `sample`.
    ///
    /// - normal: sample mean and sample standard deviation (n − 1)
    /// - uniform: sample minimum and maximum
    /// - exponential: rate λ = 1 / mean
    ///
    /// # Errors
    /// `DegenerateComputation` when the sample admits no valid parameters
    /// (all-identical values, or a non-positive mean for the exponential).
    pub fn fit(kind: DistributionKind, sample: &[f64]) -> StatsResult<Self> {
        let too_short = || StatsError::InsufficientData {
            context: "distribution fit",
            required: 2,
            actual: sample.len(),
        };
        match kind {
            DistributionKind::Normal => {
                let mu = stats::mean(sample).ok_or_else(too_short)?;
                let sigma = stats::std_dev(sample).ok_or_else(too_short)?;
                if sigma <= 0.0 {
                    return Err(StatsError::degenerate(
                        "cannot fit a normal distribution to a sample with zero variance",
                    ));
                }
                Ok(Self::Normal(Normal::new(mu, sigma)?))
            }
            DistributionKind::Uniform => {
                let lo = stats::min(sample).ok_or_else(too_short)?;
                let hi = stats::max(sample).ok_or_else(too_short)?;
                if lo >= hi {
                    return Err(StatsError::degenerate(
                        "cannot fit a uniform distribution to identical values",
                    ));
                }
                Ok(Self::Uniform(Uniform::new(lo, hi)?))
            }
            DistributionKind::Exponential => {
                let m = stats::mean(sample).ok_or_else(too_short)?;
                if m <= 0.0 {
                    return Err(StatsError::degenerate(format!(
                        "exponential fit requires a positive sample mean, got {m}"
                    )));
                }
                Ok(Self::Exponential(Exponential::new(1.0 / m)?))
            }
        }
    }

    pub fn kind(&self) -> DistributionKind {
        match self {
            Self::Normal(_) => DistributionKind::Normal,
            Self::Uniform(_) => DistributionKind::Uniform,
            Self::Exponential(_) => DistributionKind::Exponential,
        }
    }

    pub fn cdf(&self, x: f64) -> f64 {
        match self {
            Self::Normal(d) => d.cdf(x),
            Self::Uniform(d) => d.cdf(x),
            Self::Exponential(d) => d.cdf(x),
        }
    }

    /// Named parameters as reported in results.
    pub fn parameters(&self) -> BTreeMap<String, f64> {
        let pairs: Vec<(&str, f64)> = match self {
            Self::Normal(d) => vec![("mean", d.mu()), ("std", d.sigma()), ("variance", d.variance())],
            Self::Uniform(d) => vec![("min", d.min()), ("max", d.max())],
            Self::Exponential(d) => vec![("lambda", d.rate()), ("scale", d.scale())],
        };
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }
}
