//! Engine options.
//!
//! The recognised configuration surface is small: a significance level, an
//! alternative hypothesis, a distribution name, a two-sample comparison
//! method, a polynomial degree and a percentile list. Option types derive
//! `Deserialize` so a request layer can decode them directly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// Default significance level.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Default confidence level for mean intervals.
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

/// Smallest accepted polynomial degree.
pub const MIN_POLYNOMIAL_DEGREE: usize = 1;

/// Largest accepted polynomial degree.
pub const MAX_POLYNOMIAL_DEGREE: usize = 10;

/// Percentiles reported when the caller requests none.
pub const DEFAULT_PERCENTILES: [f64; 3] = [25.0, 50.0, 75.0];

/// Alternative hypothesis of a test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Alternative {
    /// H₁: the parameter differs from its null value.
    #[default]
    TwoSided,
    /// H₁: the parameter is below its null value.
    Less,
    /// H₁: the parameter is above its null value.
    Greater,
}

impl Alternative {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TwoSided => "two-sided",
            Self::Less => "less",
            Self::Greater => "greater",
        }
    }
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Alternative {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "two-sided" | "two_sided" => Ok(Self::TwoSided),
            "less" => Ok(Self::Less),
            "greater" => Ok(Self::Greater),
            _ => Err(StatsError::UnsupportedOption {
                option: "alternative",
                value: s.to_string(),
            }),
        }
    }
}

/// Significance level and alternative shared by the hypothesis tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestOptions {
    /// Significance level, in `(0, 1)`.
    pub alpha: f64,
    /// Alternative hypothesis.
    pub alternative: Alternative,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            alternative: Alternative::TwoSided,
        }
    }
}

impl TestOptions {
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_alternative(mut self, alternative: Alternative) -> Self {
        self.alternative = alternative;
        self
    }

    /// Checks that `alpha` lies strictly inside `(0, 1)`.
    pub fn validate(&self) -> StatsResult<()> {
        validate_alpha(self.alpha)
    }
}

/// Checks that a significance level lies strictly inside `(0, 1)`.
pub fn validate_alpha(alpha: f64) -> StatsResult<()> {
    if alpha.is_finite() && alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(StatsError::InvalidInput(format!(
            "alpha must lie in (0, 1), got {alpha}"
        )))
    }
}

/// Theoretical distributions supported by goodness-of-fit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    Normal,
    Uniform,
    Exponential,
}

impl DistributionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Uniform => "uniform",
            Self::Exponential => "exponential",
        }
    }
}

impl fmt::Display for DistributionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionKind {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "uniform" => Ok(Self::Uniform),
            "exponential" => Ok(Self::Exponential),
            _ => Err(StatsError::UnsupportedDistribution(s.to_string())),
        }
    }
}

/// Two-sample test used to compare distributions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMethod {
    /// Two-sample Kolmogorov–Smirnov test.
    #[default]
    #[serde(alias = "ks")]
    KolmogorovSmirnov,
    /// Mann–Whitney U test.
    #[serde(alias = "mannwhitney")]
    MannWhitney,
}

impl ComparisonMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KolmogorovSmirnov => "kolmogorov_smirnov",
            Self::MannWhitney => "mann_whitney",
        }
    }
}

impl fmt::Display for ComparisonMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonMethod {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ks" | "kolmogorov_smirnov" => Ok(Self::KolmogorovSmirnov),
            "mannwhitney" | "mann_whitney" => Ok(Self::MannWhitney),
            _ => Err(StatsError::UnsupportedOption {
                option: "comparison method",
                value: s.to_string(),
            }),
        }
    }
}

/// Checks a polynomial degree against `[MIN_POLYNOMIAL_DEGREE, MAX_POLYNOMIAL_DEGREE]`.
pub fn validate_degree(degree: usize) -> StatsResult<()> {
    if (MIN_POLYNOMIAL_DEGREE..=MAX_POLYNOMIAL_DEGREE).contains(&degree) {
        Ok(())
    } else {
        Err(StatsError::InvalidInput(format!(
            "polynomial degree must lie in [{MIN_POLYNOMIAL_DEGREE}, {MAX_POLYNOMIAL_DEGREE}], got {degree}"
        )))
    }
}
