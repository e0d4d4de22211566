//! Effect-size interpretation.
//!
//! Maps the magnitude of an effect size onto a qualitative label using
//! ordered threshold tables. Each table lists the lower bounds of the
//! `small`, `medium` and `large` bands; anything below the first bound is
//! `negligible`.
//!
//! # References
//! Cohen (1988), *Statistical Power Analysis for the Behavioral Sciences*,
//! 2nd ed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Qualitative size of an effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectSizeLabel {
    Negligible,
    Small,
    Medium,
    Large,
}

impl EffectSizeLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Negligible => "negligible",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for EffectSizeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds of the small, medium and large bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub small: f64,
    pub medium: f64,
    pub large: f64,
}

/// Cohen's d (standardized mean difference).
pub const COHENS_D: Thresholds = Thresholds {
    small: 0.2,
    medium: 0.5,
    large: 0.8,
};

/// Eta-squared (proportion of variance explained).
pub const ETA_SQUARED: Thresholds = Thresholds {
    small: 0.01,
    medium: 0.06,
    large: 0.14,
};

/// Correlation-type effects (r, Cramér's V, rank-biserial r).
pub const CORRELATION: Thresholds = Thresholds {
    small: 0.1,
    medium: 0.3,
    large: 0.5,
};

impl Thresholds {
    /// Labels `|value|`. NaN is labelled negligible.
    pub fn label(&self, value: f64) -> EffectSizeLabel {
        let v = value.abs();
        if v >= self.large {
            EffectSizeLabel::Large
        } else if v >= self.medium {
            EffectSizeLabel::Medium
        } else if v >= self.small {
            EffectSizeLabel::Small
        } else {
            EffectSizeLabel::Negligible
        }
    }
}

pub fn interpret_cohens_d(d: f64) -> EffectSizeLabel {
    COHENS_D.label(d)
}

pub fn interpret_eta_squared(eta_sq: f64) -> EffectSizeLabel {
    ETA_SQUARED.label(eta_sq)
}

pub fn interpret_correlation(r: f64) -> EffectSizeLabel {
    CORRELATION.label(r)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn label_is_monotone_in_magnitude(a in 0.0_f64..2.0, b in 0.0_f64..2.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            for table in [COHENS_D, ETA_SQUARED, CORRELATION] {
                prop_assert!(table.label(lo) <= table.label(hi));
                prop_assert_eq!(table.label(lo), table.label(-lo));
            }
        }
    }
}
